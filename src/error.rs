//! Error taxonomy for the telemetry core
//!
//! Every store operation surfaces one of these variants directly to the
//! caller as a displayable message; there is no retry or backoff layer.

use thiserror::Error;

pub type FarmResult<T> = Result<T, FarmError>;

#[derive(Error, Debug)]
pub enum FarmError {
    /// A required field was missing or malformed.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Update or delete of a nonexistent record.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Optimistic-concurrency miss: the record changed since it was read.
    #[error("{entity} with id {id} was modified concurrently (expected version {expected})")]
    Conflict {
        entity: &'static str,
        id: i64,
        expected: i64,
    },

    /// Protected operation attempted without a valid session.
    #[error("Not authenticated")]
    Unauthenticated,

    /// Authenticated but not permitted. No write path raises this yet;
    /// the variant exists so callers can match on it once role checks
    /// are introduced.
    #[error("Not authorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl FarmError {
    pub fn validation(msg: impl Into<String>) -> Self {
        FarmError::ValidationFailed(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_entity_and_id() {
        let err = FarmError::NotFound {
            entity: "footer link",
            id: 42,
        };
        assert_eq!(err.to_string(), "footer link with id 42 not found");
    }

    #[test]
    fn test_validation_helper() {
        let err = FarmError::validation("severity is required");
        assert!(matches!(err, FarmError::ValidationFailed(_)));
        assert!(err.to_string().contains("severity is required"));
    }
}
