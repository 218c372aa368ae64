//! Actor system for receipt OCR.
//!
//! # Architecture
//!
//! - `Supervisor` - Top-level actor that owns a fixed pool of OCR workers,
//!   respawns them when they die and keeps the recent-events feed
//! - `OcrWorker` - Sends an upload to the OCR engine, extracts receipts,
//!   skips duplicates, stores images and saves the rest
//!
//! # Usage
//!
//! ```ignore
//! use actors::{SupervisorArgs, SupervisorMessage, start_supervisor};
//!
//! let (supervisor, _handle) = start_supervisor(args).await?;
//!
//! let (tx, rx) = actors::concurrency::oneshot();
//! supervisor.send_message(SupervisorMessage::ProcessUpload { batch, reply: tx.into() })?;
//! let outcome = rx.await?;
//! ```

mod engine;
mod messages;
mod ocr_worker;
pub mod registry;
mod supervisor;

pub use engine::{
    EngineFuture, EngineResult, FnEngine, HttpOcrEngine, OcrEngine, OcrError, UnconfiguredEngine,
    engine_for_endpoint,
};
pub use messages::{ActorError, OcrWorkerMessage, SupervisorMessage};
pub use ocr_worker::{OcrWorker, OcrWorkerArgs};
pub use registry::{ActorRegistry, global_registry};
pub use supervisor::{RECENT_EVENT_LIMIT, Supervisor, SupervisorArgs, start_supervisor};

/// Re-export ractor types for convenience.
pub use ractor::{Actor, ActorRef, RpcReplyPort, concurrency};
