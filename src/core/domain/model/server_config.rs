//! Console settings served by the `/config` endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerConfig {
    /// Seconds between two collection refreshes.
    pub poll_frequency: u64,
}
