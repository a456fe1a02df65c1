use crate::core::domain::{
    error::ValidationError,
    value_object::{ControlPlaneHost, ControlPlanePort},
};
use url::Url;

const ALLOWED_SCHEMES: [&str; 2] = ["https", "http"];

/// The validated base URL every API path is resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPlaneUrl(Url);

impl ControlPlaneUrl {
    /// Builds the base URL from its parts.
    pub fn from_parts(
        host: &ControlPlaneHost,
        port: &ControlPlanePort,
        secure: bool,
    ) -> Result<Self, ValidationError> {
        let scheme = if secure { "https" } else { "http" };
        Self::parse(&format!("{}://{}:{}/", scheme, host.as_str(), port.get()))
    }

    /// Parses and validates a base URL.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        validate_url(raw)?;
        Url::parse(raw)
            .map(Self)
            .map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))
    }

    /// Returns the absolute URL for an API path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.0.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validates a base URL: non-empty, parseable, http or https.
pub(crate) fn validate_url(raw: &str) -> Result<(), ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::Field {
            field: "url".to_string(),
            message: "URL cannot be empty".to_string(),
        });
    }

    let parsed =
        Url::parse(raw).map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;

    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(ValidationError::ConstraintViolation(format!(
            "Invalid scheme. Must be one of: {}",
            ALLOWED_SCHEMES.join(", ")
        )));
    }

    Ok(())
}
