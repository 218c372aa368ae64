//! Message types for actor communication.

use portal_core::{PortalEvent, UploadBatch, UploadOutcome};
use ractor::RpcReplyPort;

/// Messages for an OCR worker.
#[derive(Debug)]
pub enum OcrWorkerMessage {
    /// Recognize, deduplicate and store one upload batch.
    Process {
        batch: Box<UploadBatch>,
        reply: RpcReplyPort<Result<UploadOutcome, String>>,
    },

    /// Shutdown the worker.
    Shutdown,
}

/// Messages for the Supervisor.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// Hand an upload to the next worker in the pool.
    ProcessUpload {
        batch: Box<UploadBatch>,
        reply: RpcReplyPort<Result<UploadOutcome, String>>,
    },

    /// Most recent events, newest first.
    RecentEvents {
        limit: usize,
        reply: RpcReplyPort<Vec<PortalEvent>>,
    },

    /// Number of live workers.
    WorkerCount { reply: RpcReplyPort<usize> },

    /// Subscribe to events.
    Subscribe {
        sender: tokio::sync::broadcast::Sender<PortalEvent>,
    },

    /// Broadcast an event to all subscribers.
    BroadcastEvent { event: PortalEvent },

    /// Append an event to the recent-events feed.
    RecordEvent { event: PortalEvent },

    /// Shutdown the supervisor and its workers.
    Shutdown,

    /// Periodic tick for housekeeping.
    Tick,
}

/// Error type for actor operations.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    #[error("OCR supervisor is not running")]
    NotRunning,

    #[error("No OCR worker available")]
    NoWorkers,

    #[error("Actor error: {0}")]
    Actor(String),
}
