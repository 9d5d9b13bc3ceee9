//! Record store trait and error type

use async_trait::async_trait;

use crate::models::{Member, MemberSubmission};

/// SQLSTATE raised when `statement_timeout` cancels a query
const QUERY_CANCELED: &str = "57014";

/// Record store error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness rule rejected the row
    #[error("{0}")]
    Duplicate(String),

    #[error("not found: member {0}")]
    NotFound(i64),

    /// Connection, pool or timeout failure
    #[error("storage unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return Self::Duplicate(db.message().to_owned());
            }
        }

        if is_unavailable(&e) {
            Self::Unavailable(e)
        } else {
            Self::Database(e)
        }
    }
}

/// Infrastructure failures as opposed to statement-level errors.
fn is_unavailable(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => true,
        // 08xxx connection exceptions, 57P0x operator intervention / shutdown
        sqlx::Error::Database(db) => db.code().is_some_and(|code| {
            code == QUERY_CANCELED || code.starts_with("08") || code.starts_with("57P")
        }),
        _ => false,
    }
}

/// Persistence for member submissions
///
/// Implementations assign a unique id on insert and never update or delete.
#[async_trait]
pub trait MemberStore: Send + Sync + 'static {
    /// Persist a validated submission and return its new id.
    async fn insert(&self, member: MemberSubmission) -> Result<i64, StoreError>;

    /// Fetch one member, or `StoreError::NotFound`.
    async fn get(&self, id: i64) -> Result<Member, StoreError>;

    /// Fetch every member, ordered by id.
    async fn list(&self) -> Result<Vec<Member>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_unavailable() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(err.to_string().starts_with("storage unavailable"));
    }

    #[test]
    fn io_error_is_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = StoreError::from(sqlx::Error::Io(io));
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn decode_error_is_database() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[test]
    fn not_found_display() {
        assert_eq!(StoreError::NotFound(9).to_string(), "not found: member 9");
    }
}
