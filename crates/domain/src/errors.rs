//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Agency name or id not known to the client
    #[error("Invalid agency: {0}")]
    InvalidAgency(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_agency_error_message() {
        let err = DomainError::InvalidAgency("metra".to_string());
        assert_eq!(err.to_string(), "Invalid agency: metra");
    }
}
