//! Table bootstrap for the member store
//!
//! Idempotent: safe to run on every startup. Startup only ever adds the
//! email index; removing it is an explicit `migrate` step.

use sqlx::PgPool;

use crate::config::StoreConfig;

/// Name of the unique index backing `StoreConfig::unique_email`
pub const EMAIL_UNIQUE_INDEX: &str = "members_email_key";

/// Create the members table if missing, plus the email index when enabled.
pub async fn run(pool: &PgPool, config: &StoreConfig) -> Result<(), sqlx::Error> {
    tracing::info!("Running member table migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS members (
            id                   BIGSERIAL PRIMARY KEY,
            name                 TEXT NOT NULL,
            dob                  DATE NOT NULL,
            age                  INTEGER NOT NULL CHECK (age >= 0),
            date_of_joining      DATE NOT NULL,
            height               DOUBLE PRECISION NOT NULL CHECK (height >= 0),
            weight               DOUBLE PRECISION NOT NULL CHECK (weight >= 0),
            occupation           TEXT NOT NULL,
            address              TEXT NOT NULL,
            email                TEXT NOT NULL,
            phone                TEXT NOT NULL,
            alternate_phone      TEXT,
            looking_for          TEXT NOT NULL,
            membership_mode      TEXT NOT NULL,
            end_of_membership    DATE NOT NULL,
            physical_problems    TEXT NOT NULL,
            physical_description TEXT,
            fractures            TEXT NOT NULL,
            fracture_description TEXT,
            agreed_to_terms      BOOLEAN NOT NULL,
            photo                TEXT,
            submitted_at         TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    if let Some(statement) = email_index_statement(config) {
        sqlx::query(&statement).execute(pool).await?;
    }

    tracing::info!(unique_email = config.unique_email, "Member table migrations complete");
    Ok(())
}

/// Remove the unique email index. Only `memberdesk migrate --unique-email false`
/// calls this; startup never drops it.
pub async fn drop_email_unique_index(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(&format!("DROP INDEX IF EXISTS {EMAIL_UNIQUE_INDEX}"))
        .execute(pool)
        .await?;
    tracing::info!("Dropped unique email index");
    Ok(())
}

/// DDL for the unique email index, if the config asks for one.
fn email_index_statement(config: &StoreConfig) -> Option<String> {
    config.unique_email.then(|| {
        format!("CREATE UNIQUE INDEX IF NOT EXISTS {EMAIL_UNIQUE_INDEX} ON members (email)")
    })
}
