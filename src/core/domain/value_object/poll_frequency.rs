use crate::core::domain::error::ValidationError;
use std::time::Duration;

/// The period between two scheduled collection refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollFrequency(Duration);

impl PollFrequency {
    /// Default refresh period of the console.
    pub const DEFAULT: Duration = Duration::from_millis(3000);

    pub fn new(period: Duration) -> Result<Self, ValidationError> {
        if period.is_zero() {
            return Err(ValidationError::Field {
                field: "poll_frequency".to_string(),
                message: "Poll frequency must be greater than zero".to_string(),
            });
        }
        Ok(Self(period))
    }

    /// Builds a frequency from the whole seconds reported by the server config.
    pub fn from_secs(secs: u64) -> Result<Self, ValidationError> {
        Self::new(Duration::from_secs(secs))
    }

    pub fn period(&self) -> Duration {
        self.0
    }
}

impl Default for PollFrequency {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}
