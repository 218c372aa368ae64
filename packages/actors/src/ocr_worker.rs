//! OCR worker actor: turns an upload batch into stored receipts.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use db::repositories::ReceiptRepository;
use portal_core::ocr::{ExtractionContext, OcrRequest, receipt_from_page};
use portal_core::{ExpenseReceipt, PortalEvent, UploadBatch, UploadImage, UploadOutcome, split_duplicates};
use ractor::{Actor, ActorProcessingErr, ActorRef};
use storage::Storage;
use tokio::sync::broadcast;

use crate::engine::{OcrEngine, OcrError};
use crate::messages::OcrWorkerMessage;

/// State for the OCR worker actor.
pub struct OcrWorkerState {
    pub worker_id: String,
    pub engine: Arc<dyn OcrEngine>,
    pub storage: Storage,
    pub timeout: Duration,
    pub event_tx: broadcast::Sender<PortalEvent>,
}

/// Worker actor arguments.
#[derive(Clone)]
pub struct OcrWorkerArgs {
    pub worker_id: String,
    pub engine: Arc<dyn OcrEngine>,
    pub storage: Storage,
    pub timeout: Duration,
    pub event_tx: broadcast::Sender<PortalEvent>,
}

/// Worker actor that runs OCR for one batch at a time.
pub struct OcrWorker;

impl Actor for OcrWorker {
    type Msg = OcrWorkerMessage;
    type State = OcrWorkerState;
    type Arguments = OcrWorkerArgs;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!(
            "Starting OCR worker {} ({} engine)",
            args.worker_id,
            args.engine.name()
        );

        Ok(OcrWorkerState {
            worker_id: args.worker_id,
            engine: args.engine,
            storage: args.storage,
            timeout: args.timeout,
            event_tx: args.event_tx,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            OcrWorkerMessage::Process { batch, reply } => {
                let result = process_batch(state, *batch).await;
                let _ = reply.send(result);
            }

            OcrWorkerMessage::Shutdown => {
                tracing::info!("Shutting down OCR worker: {}", state.worker_id);
                myself.stop(None);
            }
        }

        Ok(())
    }
}

async fn process_batch(state: &OcrWorkerState, batch: UploadBatch) -> Result<UploadOutcome, String> {
    batch.validate().map_err(|e| e.to_string())?;

    let account_id = batch.account_id.clone();
    let request = OcrRequest {
        account_id: account_id.to_string(),
        images: batch.images.clone(),
    };

    let response = match tokio::time::timeout(state.timeout, state.engine.recognize(request)).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => return Err(report_failure(state, &batch, e)),
        Err(_) => {
            return Err(report_failure(
                state,
                &batch,
                OcrError::Timeout(state.timeout.as_secs()),
            ));
        }
    };

    let ctx = ExtractionContext {
        account_id: &account_id,
        owner_name: &batch.owner_name,
        today: Utc::now().date_naive(),
    };

    let mut unreadable = 0;
    let mut incoming: Vec<(ExpenseReceipt, Option<&UploadImage>)> = Vec::new();
    for (index, page) in response.results.iter().enumerate() {
        match receipt_from_page(page, &ctx) {
            Some(receipt) => incoming.push((receipt, source_image(&batch, &page.file_name, index))),
            None => {
                tracing::debug!("No amount found on page '{}'", page.file_name);
                unreadable += 1;
            }
        }
    }

    let existing = ReceiptRepository::list_for_account(&account_id)
        .await
        .map_err(|e| e.to_string())?;
    let receipts: Vec<ExpenseReceipt> = incoming.iter().map(|(r, _)| r.clone()).collect();
    let (fresh, duplicates) = split_duplicates(&existing, receipts);

    let mut created = Vec::with_capacity(fresh.len());
    for mut receipt in fresh {
        let image = incoming
            .iter()
            .find(|(r, _)| r.id == receipt.id)
            .and_then(|(_, image)| *image);
        if let Some(image) = image {
            attach_image(state, &mut receipt, image).await;
        }
        match ReceiptRepository::create(&receipt).await {
            Ok(stored) => created.push(stored),
            Err(e) => {
                if let Some(image) = &receipt.image {
                    if let Err(err) = state.storage.delete_image(image).await {
                        tracing::warn!("Failed to remove orphaned image {}: {}", image.key, err);
                    }
                }
                return Err(format!(
                    "Failed to save receipt {} ({} saved before it): {}",
                    receipt.receipt_no,
                    created.len(),
                    e
                ));
            }
        }
    }

    tracing::info!(
        "Worker {} processed upload for {}: {} created, {} duplicate, {} unreadable",
        state.worker_id,
        account_id,
        created.len(),
        duplicates,
        unreadable
    );

    let _ = state.event_tx.send(PortalEvent::ReceiptsExtracted {
        account_id,
        created: created.len(),
        duplicates,
        unreadable,
        timestamp: Utc::now(),
    });

    Ok(UploadOutcome {
        created,
        duplicates,
        unreadable,
    })
}

/// The uploaded image a page came from: matched by file name, else by position.
fn source_image<'a>(batch: &'a UploadBatch, file_name: &str, index: usize) -> Option<&'a UploadImage> {
    batch
        .images
        .iter()
        .find(|image| !file_name.is_empty() && image.file_name == file_name)
        .or_else(|| batch.images.get(index))
}

async fn attach_image(state: &OcrWorkerState, receipt: &mut ExpenseReceipt, image: &UploadImage) {
    let bytes = match image.decode() {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Skipping undecodable image {}: {}", image.file_name, e);
            return;
        }
    };

    match state
        .storage
        .put_image(
            &receipt.account_id,
            receipt.id,
            &image.file_name,
            &image.content_type,
            bytes,
        )
        .await
    {
        Ok(stored) => receipt.image = Some(stored),
        Err(e) => tracing::warn!("Failed to store image for {}: {}", receipt.receipt_no, e),
    }
}

fn report_failure(state: &OcrWorkerState, batch: &UploadBatch, error: OcrError) -> String {
    let message = error.to_string();
    tracing::warn!(
        "OCR failed for {} on worker {}: {}",
        batch.account_id,
        state.worker_id,
        message
    );
    let _ = state.event_tx.send(PortalEvent::OcrFailed {
        account_id: batch.account_id.clone(),
        error: message.clone(),
        timestamp: Utc::now(),
    });
    message
}
