//! Supervisor actor for the OCR worker pool and the portal event feed.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use portal_core::PortalEvent;
use ractor::{Actor, ActorProcessingErr, ActorRef, MessagingErr, SupervisionEvent};
use storage::Storage;
use tokio::sync::broadcast;

use crate::engine::OcrEngine;
use crate::messages::{OcrWorkerMessage, SupervisorMessage};
use crate::ocr_worker::{OcrWorker, OcrWorkerArgs};

/// Events kept for the admin notification feed.
pub const RECENT_EVENT_LIMIT: usize = 100;

/// Supervisor start-up arguments.
pub struct SupervisorArgs {
    pub engine: Arc<dyn OcrEngine>,
    pub storage: Storage,
    /// Pool size. At least one worker is always started.
    pub workers: usize,
    /// Per-upload OCR timeout.
    pub timeout: Duration,
}

struct PooledWorker {
    id: String,
    actor: ActorRef<OcrWorkerMessage>,
}

/// State for the supervisor actor.
pub struct SupervisorState {
    workers: Vec<PooledWorker>,
    /// Round-robin cursor into `workers`.
    next: usize,
    pool_size: usize,
    engine: Arc<dyn OcrEngine>,
    storage: Storage,
    timeout: Duration,
    /// Event broadcaster.
    pub event_tx: broadcast::Sender<PortalEvent>,
    recent: VecDeque<PortalEvent>,
    worker_counter: u64,
}

impl SupervisorState {
    fn new(args: SupervisorArgs) -> Self {
        let (event_tx, _) = broadcast::channel(1024);
        Self {
            workers: Vec::new(),
            next: 0,
            pool_size: args.workers.max(1),
            engine: args.engine,
            storage: args.storage,
            timeout: args.timeout,
            event_tx,
            recent: VecDeque::with_capacity(RECENT_EVENT_LIMIT),
            worker_counter: 0,
        }
    }

    fn next_worker_id(&mut self) -> String {
        self.worker_counter += 1;
        format!("ocr-worker-{}", self.worker_counter)
    }

    fn worker_args(&mut self) -> OcrWorkerArgs {
        OcrWorkerArgs {
            worker_id: self.next_worker_id(),
            engine: self.engine.clone(),
            storage: self.storage.clone(),
            timeout: self.timeout,
            event_tx: self.event_tx.clone(),
        }
    }

    fn record(&mut self, event: PortalEvent) {
        if self.recent.len() == RECENT_EVENT_LIMIT {
            self.recent.pop_front();
        }
        self.recent.push_back(event);
    }

    fn recent_events(&self, limit: usize) -> Vec<PortalEvent> {
        self.recent.iter().rev().take(limit).cloned().collect()
    }
}

async fn spawn_worker(
    myself: &ActorRef<SupervisorMessage>,
    state: &mut SupervisorState,
) -> Result<(), ActorProcessingErr> {
    let args = state.worker_args();
    let id = args.worker_id.clone();
    let (actor, _handle) = Actor::spawn_linked(None, OcrWorker, args, myself.get_cell())
        .await
        .map_err(|e| ActorProcessingErr::from(format!("Failed to spawn {}: {}", id, e)))?;
    state.workers.push(PooledWorker { id, actor });
    Ok(())
}

async fn fill_pool(myself: &ActorRef<SupervisorMessage>, state: &mut SupervisorState) {
    while state.workers.len() < state.pool_size {
        if let Err(e) = spawn_worker(myself, state).await {
            tracing::warn!("{}", e);
            break;
        }
    }
}

/// Supervisor actor that owns the OCR worker pool.
pub struct Supervisor;

impl Actor for Supervisor {
    type Msg = SupervisorMessage;
    type State = SupervisorState;
    type Arguments = SupervisorArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("Starting OCR supervisor with {} worker(s)", args.workers.max(1));

        let mut state = SupervisorState::new(args);
        fill_pool(&myself, &mut state).await;

        // Keep a copy of every event for the notification feed
        let mut rx = state.event_tx.subscribe();
        let feed = myself.clone();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if feed.send_message(SupervisorMessage::RecordEvent { event }).is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("Event feed skipped {} event(s)", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        // Start periodic tick
        let myself_clone = myself.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(30));
            loop {
                interval.tick().await;
                if myself_clone.send_message(SupervisorMessage::Tick).is_err() {
                    break;
                }
            }
        });

        Ok(state)
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            SupervisorMessage::ProcessUpload { batch, reply } => {
                // Workers reply to the caller directly so the supervisor never waits on OCR.
                let mut message = OcrWorkerMessage::Process { batch, reply };
                for _ in 0..state.workers.len() {
                    let index = state.next % state.workers.len();
                    state.next = state.next.wrapping_add(1);
                    let worker = &state.workers[index];
                    tracing::debug!("Dispatching upload to {}", worker.id);
                    match worker.actor.send_message(message) {
                        Ok(()) => return Ok(()),
                        Err(MessagingErr::SendErr(returned)) => message = returned,
                        Err(e) => {
                            tracing::warn!("Worker {} unreachable: {}", worker.id, e);
                            return Ok(());
                        }
                    }
                }
                if let OcrWorkerMessage::Process { reply, .. } = message {
                    let _ = reply.send(Err("No OCR worker available".into()));
                }
            }

            SupervisorMessage::RecentEvents { limit, reply } => {
                let _ = reply.send(state.recent_events(limit));
            }

            SupervisorMessage::WorkerCount { reply } => {
                let _ = reply.send(state.workers.len());
            }

            SupervisorMessage::Subscribe { sender } => {
                // Merge event streams - forward from our channel to subscriber's
                let mut rx = state.event_tx.subscribe();
                tokio::spawn(async move {
                    while let Ok(event) = rx.recv().await {
                        if sender.send(event).is_err() {
                            break;
                        }
                    }
                });
            }

            SupervisorMessage::BroadcastEvent { event } => {
                let _ = state.event_tx.send(event);
            }

            SupervisorMessage::RecordEvent { event } => {
                state.record(event);
            }

            SupervisorMessage::Shutdown => {
                tracing::info!("Shutting down OCR supervisor");
                // Drop the pool first so terminations are not treated as crashes
                for worker in state.workers.drain(..) {
                    let _ = worker.actor.send_message(OcrWorkerMessage::Shutdown);
                }
                state.pool_size = 0;
                myself.stop(None);
            }

            SupervisorMessage::Tick => {
                if state.workers.len() < state.pool_size {
                    tracing::info!(
                        "OCR pool below size ({}/{}), refilling",
                        state.workers.len(),
                        state.pool_size
                    );
                    fill_pool(&myself, state).await;
                }
            }
        }

        Ok(())
    }

    async fn handle_supervisor_evt(
        &self,
        myself: ActorRef<Self::Msg>,
        message: SupervisionEvent,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let (cell, reason) = match message {
            SupervisionEvent::ActorTerminated(cell, _, reason) => {
                (cell, reason.unwrap_or_else(|| "stopped".to_string()))
            }
            SupervisionEvent::ActorFailed(cell, err) => (cell, err.to_string()),
            _ => return Ok(()),
        };

        let Some(position) = state
            .workers
            .iter()
            .position(|w| w.actor.get_id() == cell.get_id())
        else {
            return Ok(());
        };

        let worker = state.workers.remove(position);
        tracing::warn!("OCR worker {} terminated: {}", worker.id, reason);

        if state.workers.len() < state.pool_size {
            if let Err(e) = spawn_worker(&myself, state).await {
                tracing::warn!("Failed to respawn OCR worker: {}", e);
            }
        }
        Ok(())
    }
}

/// Start the supervisor and its worker pool.
pub async fn start_supervisor(
    args: SupervisorArgs,
) -> Result<(ActorRef<SupervisorMessage>, tokio::task::JoinHandle<()>), ractor::SpawnErr> {
    let (actor, handle) =
        Actor::spawn(Some("ocr-supervisor".to_string()), Supervisor, args).await?;

    Ok((actor, handle))
}
