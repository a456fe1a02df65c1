use thiserror::Error;

/// The main error type for control plane console operations.
///
/// This enum represents all possible errors that can occur while talking
/// to the control plane backend or while configuring the client.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Represents errors that occur while reaching the backend
    ///
    /// # Fields
    /// * `0` - A description of what went wrong during the request
    #[error("Connection error: {0}")]
    Connection(String),

    /// Represents a non-success HTTP response
    ///
    /// # Fields
    /// * `status` - The HTTP status code returned by the backend
    /// * `message` - The backend's `Detail` message, or the raw body
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Represents a response body that could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Represents an entity missing from the local collection
    #[error("Not found: {0}")]
    NotFound(String),

    /// Represents validation failures with detailed context
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl ConsoleError {
    /// Returns the HTTP status for `Api` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ConsoleError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Specialized error type for validation failures.
///
/// This enum provides detailed context about why a validation
/// failed, including field-specific errors and format violations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    #[error("Format error: {0}")]
    Format(String),

    /// Represents violations of domain constraints
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Type alias for Results that may fail with a ConsoleError
pub type ConsoleResult<T> = Result<T, ConsoleError>;
