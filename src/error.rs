use thiserror::Error;

/// Errors raised by registration and dispatch operations.
///
/// The taxonomy is deliberately small: removing listeners for an unknown
/// event name is a silent no-op, and a panicking listener propagates
/// verbatim rather than being converted into an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventfulError {
    #[error("Event name must be a non-empty string")]
    EmptyEventName,
}

/// Convenience alias — the default error type is `EventfulError`.
pub type Result<T, E = EventfulError> = std::result::Result<T, E>;
