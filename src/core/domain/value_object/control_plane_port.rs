use crate::core::domain::error::ValidationError;

/// A validated control plane port number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlPlanePort(u16);

impl ControlPlanePort {
    /// Default HTTPS port of the control plane web server.
    pub const DEFAULT: u16 = 443;

    /// Validates and wraps a port.
    pub fn new(port: u16) -> Result<Self, ValidationError> {
        validate_port(port)?;
        Ok(Self(port))
    }

    /// Creates a new port without validation.
    pub(crate) fn new_unchecked(port: u16) -> Self {
        Self(port)
    }

    /// Returns the port number.
    pub fn get(&self) -> u16 {
        self.0
    }
}

/// Validates a port number.
pub(crate) fn validate_port(port: u16) -> Result<(), ValidationError> {
    if port == 0 {
        return Err(ValidationError::Field {
            field: "port".to_string(),
            message: "Port cannot be 0".to_string(),
        });
    }
    Ok(())
}
