//! Database schema definitions using SurrealQL.
//!
//! Timestamps and calendar dates are written by the application as RFC 3339 /
//! ISO strings, so they are declared as `string` rather than `datetime`.

use crate::{DbError, get_db};

/// Initialize the database schema.
///
/// This creates all necessary tables, fields, and indexes.
pub async fn init_schema() -> Result<(), DbError> {
    let db = get_db()?;

    tracing::info!("Initializing database schema...");

    db.query(ACCOUNT_REQUEST_SCHEMA).await?.check()?;
    db.query(CREDENTIAL_SCHEMA).await?.check()?;
    db.query(SESSION_SCHEMA).await?.check()?;
    db.query(RECEIPT_SCHEMA).await?.check()?;
    db.query(PROFILE_SCHEMA).await?.check()?;

    tracing::info!("Database schema initialized");

    Ok(())
}

/// Account requests, keyed by account ID.
const ACCOUNT_REQUEST_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS account_request SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS account_id ON account_request TYPE string;
DEFINE FIELD IF NOT EXISTS full_name ON account_request TYPE string;
DEFINE FIELD IF NOT EXISTS department ON account_request TYPE string DEFAULT "";
DEFINE FIELD IF NOT EXISTS email ON account_request TYPE string DEFAULT "";
DEFINE FIELD IF NOT EXISTS phone ON account_request TYPE string DEFAULT "";
DEFINE FIELD IF NOT EXISTS address ON account_request TYPE string DEFAULT "";
DEFINE FIELD IF NOT EXISTS date_of_birth ON account_request TYPE option<string>;
DEFINE FIELD IF NOT EXISTS status ON account_request TYPE string DEFAULT "pending";
DEFINE FIELD IF NOT EXISTS requested_at ON account_request TYPE string;
DEFINE FIELD IF NOT EXISTS reviewed_at ON account_request TYPE option<string>;
DEFINE FIELD IF NOT EXISTS review_note ON account_request TYPE option<string>;

DEFINE INDEX IF NOT EXISTS account_request_status ON account_request FIELDS status;
"#;

/// Salted password digests, keyed by account ID.
const CREDENTIAL_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS credential SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS salt ON credential TYPE string;
DEFINE FIELD IF NOT EXISTS digest ON credential TYPE string;
DEFINE FIELD IF NOT EXISTS role ON credential TYPE string DEFAULT "employee";
"#;

/// Sign-in sessions, keyed by token.
const SESSION_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS session SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS token ON session TYPE string;
DEFINE FIELD IF NOT EXISTS account_id ON session TYPE string;
DEFINE FIELD IF NOT EXISTS role ON session TYPE string;
DEFINE FIELD IF NOT EXISTS display_name ON session TYPE string;
DEFINE FIELD IF NOT EXISTS created_at ON session TYPE string;

DEFINE INDEX IF NOT EXISTS session_account ON session FIELDS account_id;
"#;

/// Expense receipts, keyed by receipt ULID.
const RECEIPT_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS receipt SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS account_id ON receipt TYPE string;
DEFINE FIELD IF NOT EXISTS owner_name ON receipt TYPE string;
DEFINE FIELD IF NOT EXISTS receipt_no ON receipt TYPE string;
DEFINE FIELD IF NOT EXISTS date ON receipt TYPE string;
DEFINE FIELD IF NOT EXISTS amount ON receipt TYPE float;
DEFINE FIELD IF NOT EXISTS currency ON receipt TYPE string DEFAULT "PHP";
DEFINE FIELD IF NOT EXISTS category ON receipt TYPE string DEFAULT "Other";
DEFINE FIELD IF NOT EXISTS status ON receipt TYPE string DEFAULT "Parsed";
DEFINE FIELD IF NOT EXISTS source_text ON receipt TYPE string DEFAULT "";
DEFINE FIELD IF NOT EXISTS image ON receipt FLEXIBLE TYPE option<object>;
DEFINE FIELD IF NOT EXISTS review_note ON receipt TYPE option<string>;
DEFINE FIELD IF NOT EXISTS created_at ON receipt TYPE string;
DEFINE FIELD IF NOT EXISTS updated_at ON receipt TYPE string;

DEFINE INDEX IF NOT EXISTS receipt_account ON receipt FIELDS account_id;
DEFINE INDEX IF NOT EXISTS receipt_status ON receipt FIELDS status;
DEFINE INDEX IF NOT EXISTS receipt_date ON receipt FIELDS date;
"#;

/// Employee profiles, keyed by account ID.
const PROFILE_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS profile SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS user_id ON profile TYPE string;
DEFINE FIELD IF NOT EXISTS name ON profile TYPE string;
DEFINE FIELD IF NOT EXISTS date_of_birth ON profile TYPE option<string>;
DEFINE FIELD IF NOT EXISTS department ON profile TYPE string DEFAULT "";
DEFINE FIELD IF NOT EXISTS email ON profile TYPE string;
DEFINE FIELD IF NOT EXISTS phone ON profile TYPE string DEFAULT "";
DEFINE FIELD IF NOT EXISTS address ON profile TYPE string DEFAULT "";
DEFINE FIELD IF NOT EXISTS updated_at ON profile TYPE string;
"#;
