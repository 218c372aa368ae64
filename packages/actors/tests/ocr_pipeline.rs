#![allow(clippy::disallowed_methods)]

use std::error::Error;
use std::sync::LazyLock;
use std::time::Duration;

use actors::{
    Actor, ActorRef, FnEngine, OcrEngine, OcrError, Supervisor, SupervisorArgs, SupervisorMessage,
};
use portal_core::ocr::{OcrFields, OcrPage, OcrRequest, OcrResponse};
use portal_core::{
    AccountId, ExpenseCategory, PortalEvent, ReceiptStatus, UploadBatch, UploadImage,
    UploadOutcome,
};
use std::sync::Arc;
use storage::{Storage, StorageConfig};
use tokio::sync::{Mutex, MutexGuard};

static TEST_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

async fn setup_db() -> Result<MutexGuard<'static, ()>, Box<dyn Error>> {
    let guard = TEST_LOCK.lock().await;
    db::init(db::DbConfig::memory()).await?;
    db::get_db()?
        .query("DELETE receipt; DEFINE FIELD OVERWRITE receipt_no ON receipt TYPE string;")
        .await?;
    Ok(guard)
}

fn page(file_name: &str, receipt_no: &str, total: &str, merchant: &str) -> OcrPage {
    OcrPage {
        file_name: file_name.into(),
        text: format!("{merchant}\nOR No. {receipt_no}\nTotal {total}"),
        fields: OcrFields {
            receipt_no: Some(receipt_no.into()),
            date: Some("2026-02-20".into()),
            total: Some(total.into()),
            merchant: Some(merchant.into()),
        },
    }
}

fn fixed_engine(pages: Vec<OcrPage>) -> Arc<dyn OcrEngine> {
    Arc::new(FnEngine::new("fixed", move |_request: OcrRequest| {
        let response = OcrResponse {
            results: pages.clone(),
        };
        Box::pin(async move { Ok(response) })
    }))
}

async fn spawn(
    engine: Arc<dyn OcrEngine>,
    storage: Storage,
    timeout: Duration,
) -> Result<ActorRef<SupervisorMessage>, Box<dyn Error>> {
    let args = SupervisorArgs {
        engine,
        storage,
        workers: 2,
        timeout,
    };
    let (supervisor, _handle) = Actor::spawn(None, Supervisor, args).await?;
    Ok(supervisor)
}

async fn upload(
    supervisor: &ActorRef<SupervisorMessage>,
    batch: UploadBatch,
) -> Result<Result<UploadOutcome, String>, Box<dyn Error>> {
    let (tx, rx) = actors::concurrency::oneshot();
    supervisor.send_message(SupervisorMessage::ProcessUpload {
        batch: Box::new(batch),
        reply: tx.into(),
    })?;
    Ok(rx.await?)
}

async fn recent(supervisor: &ActorRef<SupervisorMessage>) -> Vec<PortalEvent> {
    // Events reach the feed through a forwarding task
    for _ in 0..50 {
        let (tx, rx) = actors::concurrency::oneshot();
        if supervisor
            .send_message(SupervisorMessage::RecentEvents {
                limit: 10,
                reply: tx.into(),
            })
            .is_ok()
            && let Ok(events) = rx.await
            && !events.is_empty()
        {
            return events;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    Vec::new()
}

async fn worker_count(supervisor: &ActorRef<SupervisorMessage>) -> usize {
    let (tx, rx) = actors::concurrency::oneshot();
    if supervisor
        .send_message(SupervisorMessage::WorkerCount { reply: tx.into() })
        .is_err()
    {
        return 0;
    }
    rx.await.unwrap_or(0)
}

fn batch(account: &str, names: &[&str]) -> UploadBatch {
    UploadBatch {
        account_id: AccountId::parse(account).unwrap(),
        owner_name: "Juan Dela Cruz".into(),
        images: names
            .iter()
            .map(|name| UploadImage::from_bytes(*name, "image/png", name.as_bytes()))
            .collect(),
    }
}

#[tokio::test]
async fn upload_creates_receipts_and_skips_duplicates() -> Result<(), Box<dyn Error>> {
    let _guard = setup_db().await?;
    let storage = Storage::new(StorageConfig::memory()).await?;

    let unreadable = OcrPage {
        file_name: "blurry.png".into(),
        text: "smudged".into(),
        ..Default::default()
    };
    let engine = fixed_engine(vec![
        page("lunch.png", "RCP-9001", "150.50", "Jollibee"),
        unreadable,
        page("copy.png", "RCP-9001", "150.50", "Jollibee"),
    ]);
    let supervisor = spawn(engine, storage.clone(), Duration::from_secs(5)).await?;
    assert_eq!(worker_count(&supervisor).await, 2);

    let outcome = upload(&supervisor, batch("emp-101", &["lunch.png", "blurry.png", "copy.png"]))
        .await?
        .map_err(|e| e.to_string())?;
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.duplicates, 1);
    assert_eq!(outcome.unreadable, 1);

    let receipt = &outcome.created[0];
    assert_eq!(receipt.receipt_no, "RCP-9001");
    assert_eq!(receipt.amount, 150.5);
    assert_eq!(receipt.category, ExpenseCategory::Meals);
    assert_eq!(receipt.status, ReceiptStatus::Parsed);
    assert_eq!(receipt.source_text, "Jollibee");

    let image = receipt.image.clone().unwrap();
    assert_eq!(image.file_name, "lunch.png");
    assert_eq!(storage.get_image(&image).await?.as_ref(), b"lunch.png");

    // Uploading the same receipt again adds nothing
    let again = upload(&supervisor, batch("emp-101", &["lunch.png"]))
        .await?
        .map_err(|e| e.to_string())?;
    assert!(again.created.is_empty());
    assert_eq!(again.duplicates, 1);

    let stored = db::repositories::ReceiptRepository::list_for_account(&receipt.account_id).await?;
    assert_eq!(stored.len(), 1);

    let events = recent(&supervisor).await;
    assert!(events.iter().any(|e| matches!(
        e,
        PortalEvent::ReceiptsExtracted { created: 1, duplicates: 1, unreadable: 1, .. }
    )));

    supervisor.send_message(SupervisorMessage::Shutdown)?;
    Ok(())
}

#[tokio::test]
async fn failed_save_removes_the_stored_image() -> Result<(), Box<dyn Error>> {
    let _guard = setup_db().await?;
    db::get_db()?
        .query(
            "DEFINE FIELD OVERWRITE receipt_no ON receipt TYPE string ASSERT $value != 'RCP-BAD';",
        )
        .await?;
    let dir = tempfile::tempdir()?;
    let storage = Storage::new(StorageConfig::filesystem(dir.path())).await?;

    let engine = fixed_engine(vec![
        page("good.png", "RCP-7001", "80.00", "Shell"),
        page("bad.png", "RCP-BAD", "95.00", "Petron"),
    ]);
    let supervisor = spawn(engine, storage, Duration::from_secs(5)).await?;

    let result = upload(&supervisor, batch("emp-104", &["good.png", "bad.png"])).await?;
    let error = result.unwrap_err();
    assert!(error.contains("RCP-BAD"));
    assert!(error.contains("1 saved"));

    // Only the image of the saved receipt remains
    let account = AccountId::parse("emp-104")?;
    let saved = db::repositories::ReceiptRepository::list_for_account(&account).await?;
    assert_eq!(saved.len(), 1);
    let images: Vec<_> = std::fs::read_dir(dir.path().join("receipts").join("emp-104"))?
        .collect::<Result<_, _>>()?;
    assert_eq!(images.len(), 1);
    assert_eq!(
        images[0].file_name().to_string_lossy(),
        format!("{}.png", saved[0].id)
    );

    supervisor.send_message(SupervisorMessage::Shutdown)?;
    Ok(())
}

#[tokio::test]
async fn engine_errors_and_timeouts_are_reported() -> Result<(), Box<dyn Error>> {
    let _guard = setup_db().await?;
    let storage = Storage::new(StorageConfig::memory()).await?;

    let failing: Arc<dyn OcrEngine> = Arc::new(FnEngine::new("failing", |_request: OcrRequest| {
        Box::pin(async { Err(OcrError::Request("connection refused".into())) })
    }));
    let supervisor = spawn(failing, storage.clone(), Duration::from_secs(5)).await?;

    let result = upload(&supervisor, batch("emp-102", &["a.png"])).await?;
    assert!(result.unwrap_err().contains("connection refused"));

    let events = recent(&supervisor).await;
    assert!(matches!(events.first(), Some(PortalEvent::OcrFailed { .. })));
    supervisor.send_message(SupervisorMessage::Shutdown)?;

    let slow: Arc<dyn OcrEngine> = Arc::new(FnEngine::new("slow", |_request: OcrRequest| {
        Box::pin(async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(OcrResponse::default())
        })
    }));
    let supervisor = spawn(slow, storage, Duration::from_millis(50)).await?;
    let result = upload(&supervisor, batch("emp-102", &["a.png"])).await?;
    assert!(result.unwrap_err().contains("timed out"));

    // Empty batches never reach the engine
    let result = upload(&supervisor, batch("emp-102", &[])).await?;
    assert!(result.is_err());

    supervisor.send_message(SupervisorMessage::Shutdown)?;
    Ok(())
}

#[tokio::test]
async fn crashed_workers_are_replaced() -> Result<(), Box<dyn Error>> {
    let _guard = setup_db().await?;
    let storage = Storage::new(StorageConfig::memory()).await?;

    let crashing: Arc<dyn OcrEngine> = Arc::new(FnEngine::new("crashing", |_request: OcrRequest| {
        Box::pin(async { panic!("engine crashed") })
    }));
    let supervisor = spawn(crashing, storage, Duration::from_secs(5)).await?;
    assert_eq!(worker_count(&supervisor).await, 2);

    // The reply port is dropped with the crashed worker
    assert!(upload(&supervisor, batch("emp-103", &["a.png"])).await.is_err());

    let mut count = 0;
    for _ in 0..50 {
        count = worker_count(&supervisor).await;
        if count == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(count, 2);

    supervisor.send_message(SupervisorMessage::Shutdown)?;
    Ok(())
}
