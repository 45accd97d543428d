//! Error types for data-access operations.

use crate::Resource;
use thiserror::Error;

/// Failures reported by a `DataSource`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("Network error: {reason}")]
    Network { reason: String },

    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("{resource} record not found: {id}")]
    NotFound { resource: Resource, id: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response: {reason}")]
    InvalidResponse { reason: String },

    #[error("{operation} is not supported for {resource}")]
    Unsupported {
        operation: &'static str,
        resource: Resource,
    },
}

impl DataError {
    /// True when the remote side answered that the record does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            DataError::NotFound { .. } => true,
            DataError::Http { status, .. } => *status == 404,
            _ => false,
        }
    }
}

/// Result alias for data-access operations.
pub type DataResult<T> = Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_404_counts_as_not_found() {
        let err = DataError::Http {
            status: 404,
            body: "missing".to_string(),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn test_network_error_is_not_not_found() {
        let err = DataError::Network {
            reason: "connection reset".to_string(),
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_message_names_resource() {
        let err = DataError::NotFound {
            resource: Resource::Persons,
            id: "u1".to_string(),
        };
        assert_eq!(err.to_string(), "persons record not found: u1");
    }
}
