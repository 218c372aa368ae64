//! Server initialization: database, image storage, OCR supervisor and seed data.

use actors::{SupervisorArgs, SupervisorMessage, engine_for_endpoint, global_registry, start_supervisor};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use db::repositories::{AccountRequestRepository, CredentialRepository, ReceiptRepository};
use portal_core::{AccountId, AccountRequest, ExpenseCategory, ExpenseReceipt, Role};
use storage::Storage;
use tokio::sync::OnceCell;

use crate::config::{ConfigError, PortalConfig};

/// Password given to the seeded demo accounts.
pub const DEMO_PASSWORD: &str = "demo123";

static INIT: OnceCell<PortalConfig> = OnceCell::const_new();
static IMAGES: std::sync::OnceLock<Storage> = std::sync::OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("database: {0}")]
    Db(#[from] db::DbError),
    #[error("storage: {0}")]
    Storage(#[from] storage::StorageError),
    #[error("OCR engine: {0}")]
    Ocr(#[from] actors::OcrError),
    #[error("supervisor: {0}")]
    Spawn(String),
    #[error("invalid seed data: {0}")]
    Seed(String),
}

/// Initialize the portal once; later calls are no-ops.
///
/// A failed attempt is retried on the next call.
pub async fn ensure_initialized() -> Result<(), InitError> {
    INIT.get_or_try_init(|| async {
        let config = PortalConfig::from_env()?;
        init_portal(&config).await?;
        Ok::<_, InitError>(config)
    })
    .await
    .map(|_| ())
}

/// Configuration the portal was started with, once initialized.
pub fn portal_config() -> Option<&'static PortalConfig> {
    INIT.get()
}

/// Receipt image storage, once initialized.
pub(crate) fn image_storage() -> Option<&'static Storage> {
    IMAGES.get()
}

/// Initialize every server-side subsystem.
///
/// Safe to call again after a failure: a supervisor that is already
/// registered is kept.
pub async fn init_portal(config: &PortalConfig) -> Result<(), InitError> {
    tracing::info!("Initializing expense portal...");

    db::init(config.db.clone()).await?;
    let storage = Storage::new(config.storage.clone()).await?;
    let _ = IMAGES.set(storage.clone());

    ensure_admin(config).await?;
    if config.seed_demo {
        seed_demo_data().await?;
    }

    if global_registry().get_supervisor().is_some() {
        tracing::debug!("OCR supervisor already running");
    } else {
        let engine = engine_for_endpoint(config.ocr_endpoint.as_deref(), config.ocr_timeout)?;
        let (supervisor, _handle) = start_supervisor(SupervisorArgs {
            engine,
            storage,
            workers: config.ocr_workers,
            timeout: config.ocr_timeout,
        })
        .await
        .map_err(|e| InitError::Spawn(e.to_string()))?;

        // Register globally
        global_registry().register_supervisor(supervisor.clone());

        supervisor
            .send_message(SupervisorMessage::Subscribe {
                sender: crate::event_broadcaster(),
            })
            .map_err(|e| InitError::Spawn(e.to_string()))?;
        crate::realtime::spawn_event_logger();
    }

    tracing::info!("Expense portal initialized");
    Ok(())
}

async fn ensure_admin(config: &PortalConfig) -> Result<(), InitError> {
    let admin_id = AccountId::parse(&config.admin_id).map_err(|e| InitError::Seed(e.to_string()))?;
    if CredentialRepository::verify(&admin_id, &config.admin_password)
        .await?
        .is_none()
    {
        tracing::info!("Setting credentials for admin account '{}'", admin_id);
        CredentialRepository::set_password(&admin_id, &config.admin_password, Role::Admin).await?;
    }
    Ok(())
}

struct DemoEmployee {
    account_id: &'static str,
    name: &'static str,
    department: &'static str,
    receipt_no: &'static str,
    day: u32,
    amount: f64,
    category: ExpenseCategory,
    description: &'static str,
}

const DEMO_EMPLOYEES: [DemoEmployee; 5] = [
    DemoEmployee {
        account_id: "emp-demo-001",
        name: "Juan Dela Cruz",
        department: "Operations",
        receipt_no: "RCP-1001",
        day: 20,
        amount: 150.5,
        category: ExpenseCategory::Meals,
        description: "Lunch receipt",
    },
    DemoEmployee {
        account_id: "emp-demo-002",
        name: "Maria Santos",
        department: "Finance",
        receipt_no: "RCP-1002",
        day: 21,
        amount: 3500.0,
        category: ExpenseCategory::Travel,
        description: "Flight booking",
    },
    DemoEmployee {
        account_id: "emp-demo-003",
        name: "Carlo Reyes",
        department: "IT",
        receipt_no: "RCP-1003",
        day: 22,
        amount: 980.0,
        category: ExpenseCategory::OfficeSupplies,
        description: "Printer ink and paper",
    },
    DemoEmployee {
        account_id: "emp-demo-004",
        name: "Ana Gomez",
        department: "HR",
        receipt_no: "RCP-1004",
        day: 23,
        amount: 2200.0,
        category: ExpenseCategory::Utilities,
        description: "Internet subscription",
    },
    DemoEmployee {
        account_id: "emp-demo-005",
        name: "Luis Mendoza",
        department: "Procurement",
        receipt_no: "RCP-1005",
        day: 24,
        amount: 1800.0,
        category: ExpenseCategory::Accommodation,
        description: "Hotel stay",
    },
];

fn demo_timestamp(minutes: u32) -> Result<DateTime<Utc>, InitError> {
    Utc.with_ymd_and_hms(2026, 2, 25, 8, minutes, 0)
        .single()
        .ok_or_else(|| InitError::Seed(format!("bad demo time 08:{minutes:02}")))
}

/// Seed the demo requests and receipts into an empty store.
async fn seed_demo_data() -> Result<(), InitError> {
    let have_requests = !AccountRequestRepository::list(None).await?.is_empty();
    let have_receipts = !ReceiptRepository::is_empty().await?;
    if have_requests || have_receipts {
        return Ok(());
    }

    tracing::info!("Seeding demo account requests and receipts...");

    for (index, demo) in DEMO_EMPLOYEES.iter().enumerate() {
        let account_id =
            AccountId::parse(demo.account_id).map_err(|e| InitError::Seed(e.to_string()))?;
        let email = format!("{}@example.com", demo.account_id);

        let request = AccountRequest::new(account_id.clone(), demo.name)
            .with_department(demo.department)
            .with_email(email)
            .with_requested_at(demo_timestamp(index as u32 * 10)?);
        AccountRequestRepository::create(&request).await?;
        CredentialRepository::set_password(&account_id, DEMO_PASSWORD, Role::Employee).await?;

        let date = NaiveDate::from_ymd_opt(2026, 2, demo.day)
            .ok_or_else(|| InitError::Seed(format!("bad demo day {}", demo.day)))?;
        let receipt = ExpenseReceipt::new(
            account_id,
            demo.name,
            demo.receipt_no,
            date,
            demo.amount,
            demo.category,
        )
        .with_source_text(demo.description);
        ReceiptRepository::create(&receipt).await?;
    }

    tracing::info!("Seeded {} demo employees", DEMO_EMPLOYEES.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;
    use storage::StorageConfig;

    #[tokio::test]
    async fn init_can_run_again() {
        let config = PortalConfig::from_lookup(|_: &str| None, StorageConfig::memory()).unwrap();

        init_portal(&config).await.unwrap();
        let first = global_registry().get_supervisor().unwrap();

        // A second attempt keeps the running supervisor and seeds nothing twice
        init_portal(&config).await.unwrap();
        let second = global_registry().get_supervisor().unwrap();
        assert_eq!(first.get_id(), second.get_id());

        let requests = AccountRequestRepository::list(None).await.unwrap();
        assert_eq!(requests.len(), DEMO_EMPLOYEES.len());

        let admin = AccountId::parse(&config.admin_id).unwrap();
        assert_eq!(
            CredentialRepository::verify(&admin, &config.admin_password).await.unwrap(),
            Some(Role::Admin)
        );
    }
}
