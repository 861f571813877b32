//! Domain error types.
//!
//! These errors represent validation failures of inbound requests.
//! They are distinct from storage errors.

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A required stop name was empty or whitespace
    #[error("{0} must not be blank")]
    BlankStopName(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::BlankStopName("origin");
        assert_eq!(err.to_string(), "origin must not be blank");

        let err = DomainError::BlankStopName("destination");
        assert_eq!(err.to_string(), "destination must not be blank");
    }
}
