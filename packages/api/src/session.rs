//! Session checks and error mapping shared by the server functions.

use actors::{ActorError, SupervisorMessage, global_registry};
use db::DbError;
use db::repositories::SessionRepository;
use dioxus::prelude::ServerFnError;
use portal_core::{AccountId, PortalEvent, Session, ValidationError};

/// Make sure the portal is initialized before touching the database.
pub(crate) async fn ready() -> Result<(), ServerFnError> {
    crate::ensure_initialized()
        .await
        .map_err(|e| ServerFnError::new(format!("Initialization failed: {}", e)))
}

/// Resolve a session token, failing if it is unknown.
pub(crate) async fn require_session(token: &str) -> Result<Session, ServerFnError> {
    ready().await?;
    SessionRepository::get(token)
        .await
        .map_err(db_error)?
        .ok_or_else(|| ServerFnError::new("Your session has expired. Please sign in again."))
}

/// Resolve a session token that must belong to an admin.
pub(crate) async fn require_admin(token: &str) -> Result<Session, ServerFnError> {
    let session = require_session(token).await?;
    if !session.is_admin() {
        return Err(ServerFnError::new("Admin access required"));
    }
    Ok(session)
}

/// The session must belong to `owner`, or to an admin when `allow_admin` is set.
pub(crate) fn require_owner(
    session: &Session,
    owner: &AccountId,
    allow_admin: bool,
) -> Result<(), ServerFnError> {
    if &session.account_id == owner || (allow_admin && session.is_admin()) {
        Ok(())
    } else {
        Err(ServerFnError::new("You do not have access to this record"))
    }
}

pub(crate) fn db_error(err: DbError) -> ServerFnError {
    match err {
        DbError::NotFound(msg) | DbError::Conflict(msg) => ServerFnError::new(msg),
        other => {
            tracing::warn!("Database error: {}", other);
            ServerFnError::new(format!("Database error: {}", other))
        }
    }
}

pub(crate) fn invalid(err: ValidationError) -> ServerFnError {
    ServerFnError::new(err.to_string())
}

/// Hand an event to the supervisor for broadcast.
pub(crate) fn publish(event: PortalEvent) {
    match global_registry().get_supervisor() {
        Some(supervisor) => {
            if let Err(e) = supervisor.send_message(SupervisorMessage::BroadcastEvent { event }) {
                tracing::warn!("Failed to publish event: {}", e);
            }
        }
        None => tracing::warn!("{}", ActorError::NotRunning),
    }
}

/// Ask the supervisor something and wait for the answer.
pub(crate) async fn call_supervisor<T>(
    build: impl FnOnce(actors::RpcReplyPort<T>) -> SupervisorMessage,
) -> Result<T, ActorError>
where
    T: Send + 'static,
{
    let supervisor = global_registry()
        .get_supervisor()
        .ok_or(ActorError::NotRunning)?;

    let (tx, rx) = actors::concurrency::oneshot();
    supervisor
        .send_message(build(tx.into()))
        .map_err(|e| ActorError::Actor(format!("Failed to send message: {}", e)))?;

    rx.await.map_err(|_| ActorError::NoWorkers)
}
