//! Admin activity feed.

use dioxus::prelude::*;
use portal_core::PortalEvent;

/// Most recent portal events, newest first.
#[get("/api/events/recent")]
pub async fn recent_events(
    token: String,
    limit: Option<usize>,
) -> Result<Vec<PortalEvent>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use actors::{RECENT_EVENT_LIMIT, SupervisorMessage};

        use crate::session::{call_supervisor, require_admin};

        require_admin(&token).await?;
        let limit = limit.unwrap_or(20).min(RECENT_EVENT_LIMIT);

        call_supervisor(|reply| SupervisorMessage::RecentEvents { limit, reply })
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}
