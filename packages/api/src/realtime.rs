//! Real-time portal events.

use portal_core::PortalEvent;
use tokio::sync::broadcast;

/// Global event broadcaster.
static EVENT_TX: std::sync::LazyLock<broadcast::Sender<PortalEvent>> =
    std::sync::LazyLock::new(|| {
        let (tx, _) = broadcast::channel(1024);
        tx
    });

/// Get the global event broadcaster.
pub fn event_broadcaster() -> broadcast::Sender<PortalEvent> {
    EVENT_TX.clone()
}

/// Subscribe to the global event stream.
pub fn subscribe_events() -> broadcast::Receiver<PortalEvent> {
    EVENT_TX.subscribe()
}

/// Log every portal event until the stream closes.
pub(crate) fn spawn_event_logger() {
    let mut rx = subscribe_events();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => tracing::info!(target: "portal::events", "{}", event.description()),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event logger skipped {} event(s)", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;
    use chrono::Utc;
    use portal_core::AccountId;

    #[tokio::test]
    async fn subscribers_see_broadcast_events() {
        let mut rx = subscribe_events();
        let account_id = AccountId::parse("emp-001").unwrap();
        event_broadcaster()
            .send(PortalEvent::AccountApproved {
                account_id: account_id.clone(),
                timestamp: Utc::now(),
            })
            .unwrap();

        // Other tests may publish on the shared channel
        loop {
            if let PortalEvent::AccountApproved { account_id: seen, .. } = rx.recv().await.unwrap() {
                if seen == account_id {
                    break;
                }
            }
        }
    }
}
