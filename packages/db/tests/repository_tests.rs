#![allow(clippy::disallowed_methods)]

mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use portal_core::{
    AccountId, AccountRequest, ExpenseCategory, ExpenseReceipt, Profile, ReceiptImage,
    ReceiptStatus, RequestStatus, Role,
};
use std::error::Error;

use db::DbError;
use db::repositories::{
    AccountRequestRepository, CredentialRepository, ProfileRepository, ReceiptRepository,
    SessionRepository,
};

fn account(id: &str) -> AccountId {
    AccountId::parse(id).unwrap()
}

fn receipt(owner: &AccountId, no: &str, day: u32, amount: f64) -> ExpenseReceipt {
    ExpenseReceipt::new(
        owner.clone(),
        "Juan Dela Cruz",
        no,
        NaiveDate::from_ymd_opt(2026, 2, day).unwrap(),
        amount,
        ExpenseCategory::Meals,
    )
}

#[tokio::test]
async fn test_account_requests() -> Result<(), Box<dyn Error>> {
    let _guard = common::setup_db().await?;

    let first = AccountRequest::new(account("emp-001"), "Juan Dela Cruz")
        .with_department("Operations")
        .with_email("juan@example.com")
        .with_requested_at(Utc.with_ymd_and_hms(2026, 2, 25, 8, 0, 0).unwrap());
    let second = AccountRequest::new(account("emp-002"), "Maria Santos")
        .with_requested_at(Utc.with_ymd_and_hms(2026, 2, 25, 9, 0, 0).unwrap());

    let created = AccountRequestRepository::create(&first).await?;
    assert_eq!(created.full_name, "Juan Dela Cruz");
    assert_eq!(created.status, RequestStatus::Pending);
    AccountRequestRepository::create(&second).await?;

    let duplicate = AccountRequestRepository::create(&first).await;
    assert!(matches!(duplicate, Err(DbError::Conflict(_))));

    let loaded = AccountRequestRepository::get(&first.account_id).await?;
    assert_eq!(loaded.department, "Operations");
    assert_eq!(loaded.requested_at, first.requested_at);

    // Newest first
    let all = AccountRequestRepository::list(None).await?;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].account_id.as_str(), "emp-002");

    let mut approved = loaded.clone();
    approved.approve(Utc::now())?;
    AccountRequestRepository::update(&approved).await?;

    let pending = AccountRequestRepository::list(Some(RequestStatus::Pending)).await?;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].account_id.as_str(), "emp-002");

    AccountRequestRepository::delete(&second.account_id).await?;
    assert!(!AccountRequestRepository::exists(&second.account_id).await?);
    let missing = AccountRequestRepository::get(&second.account_id).await;
    assert!(matches!(missing, Err(DbError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_credentials_and_sessions() -> Result<(), Box<dyn Error>> {
    let _guard = common::setup_db().await?;
    let id = account("emp-001");

    assert_eq!(CredentialRepository::verify(&id, "secret1").await?, None);

    CredentialRepository::set_password(&id, "secret1", Role::Employee).await?;
    assert_eq!(
        CredentialRepository::verify(&id, "secret1").await?,
        Some(Role::Employee)
    );
    assert_eq!(CredentialRepository::verify(&id, "wrong").await?, None);

    // Replacing the password invalidates the old one
    CredentialRepository::set_password(&id, "secret2", Role::Admin).await?;
    assert_eq!(CredentialRepository::verify(&id, "secret1").await?, None);
    assert_eq!(
        CredentialRepository::verify(&id, "secret2").await?,
        Some(Role::Admin)
    );

    let session = SessionRepository::create(&id, Role::Admin, "Juan").await?;
    let loaded = SessionRepository::get(&session.token).await?.unwrap();
    assert_eq!(loaded.account_id, id);
    assert!(loaded.is_admin());
    assert!(SessionRepository::get("").await?.is_none());
    assert!(SessionRepository::get("unknown").await?.is_none());

    SessionRepository::delete(&session.token).await?;
    assert!(SessionRepository::get(&session.token).await?.is_none());

    SessionRepository::create(&id, Role::Admin, "Juan").await?;
    SessionRepository::create(&id, Role::Admin, "Juan").await?;
    assert_eq!(SessionRepository::delete_for_account(&id).await?, 2);

    CredentialRepository::delete(&id).await?;
    assert_eq!(CredentialRepository::verify(&id, "secret2").await?, None);

    Ok(())
}

#[tokio::test]
async fn test_receipts() -> Result<(), Box<dyn Error>> {
    let _guard = common::setup_db().await?;
    let juan = account("emp-001");
    let maria = account("emp-002");

    assert!(ReceiptRepository::is_empty().await?);

    let lunch = receipt(&juan, "RCP-1001", 20, 150.5).with_image(ReceiptImage {
        key: "receipts/x.png".into(),
        file_name: "lunch.png".into(),
        content_type: "image/png".into(),
    });
    let created = ReceiptRepository::create(&lunch).await?;
    assert_eq!(created.id, lunch.id);
    assert_eq!(created.image, lunch.image);

    let batch = vec![
        receipt(&juan, "RCP-1002", 22, 980.0),
        receipt(&maria, "RCP-1003", 21, 3500.0),
    ];
    for r in &batch {
        ReceiptRepository::create(r).await?;
    }
    assert!(!ReceiptRepository::is_empty().await?);

    // Newest date first
    let all = ReceiptRepository::list_all().await?;
    let numbers: Vec<_> = all.iter().map(|r| r.receipt_no.as_str()).collect();
    assert_eq!(numbers, vec!["RCP-1002", "RCP-1003", "RCP-1001"]);

    let mine = ReceiptRepository::list_for_account(&juan).await?;
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|r| r.account_id == juan));

    let mut submitted = ReceiptRepository::get(lunch.id).await?;
    submitted.transition(ReceiptStatus::Submitted, None, Utc::now())?;
    ReceiptRepository::update(&submitted).await?;

    let queue = ReceiptRepository::list_by_status(&[ReceiptStatus::Submitted]).await?;
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, lunch.id);

    let parsed = ReceiptRepository::list_by_status(&[ReceiptStatus::Parsed]).await?;
    assert_eq!(parsed.len(), 2);

    let removed = ReceiptRepository::delete(batch[1].id).await?;
    assert_eq!(removed.receipt_no, "RCP-1003");
    let missing = ReceiptRepository::get(batch[1].id).await;
    assert!(matches!(missing, Err(DbError::NotFound(_))));

    let wiped = ReceiptRepository::delete_for_account(&juan).await?;
    assert_eq!(wiped.len(), 2);
    assert!(ReceiptRepository::is_empty().await?);

    Ok(())
}

#[tokio::test]
async fn test_profiles() -> Result<(), Box<dyn Error>> {
    let _guard = common::setup_db().await?;
    let id = account("emp-001");

    assert!(ProfileRepository::find(&id).await?.is_none());

    let mut profile = Profile {
        user_id: id.clone(),
        name: "Juan Dela Cruz".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 1),
        department: "Operations".into(),
        email: "juan@example.com".into(),
        phone: String::new(),
        address: String::new(),
        updated_at: Utc::now(),
    };
    ProfileRepository::save(&profile).await?;

    profile.department = "Finance".into();
    ProfileRepository::save(&profile).await?;

    let loaded = ProfileRepository::find(&id).await?.unwrap();
    assert_eq!(loaded.department, "Finance");
    assert_eq!(loaded.date_of_birth, profile.date_of_birth);
    assert!(loaded.is_complete());

    ProfileRepository::delete(&id).await?;
    assert!(ProfileRepository::find(&id).await?.is_none());

    Ok(())
}
