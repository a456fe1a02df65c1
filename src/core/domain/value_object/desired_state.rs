use serde::{Deserialize, Serialize};
use std::fmt;

/// The user-declared run intent of a service.
///
/// The backend encodes it as an integer: `1` start, `0` stop, `-1` restart,
/// `2` pause. Integers outside that set are kept as [`DesiredState::Other`]
/// so a single odd service never fails a whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum DesiredState {
    Started,
    #[default]
    Stopped,
    Restarting,
    Paused,
    Other(i64),
}

impl DesiredState {
    /// Returns `true` when instances are expected to be running.
    ///
    /// A restarting service is expected to come back up, so it counts as started.
    #[must_use]
    pub fn expects_running(self) -> bool {
        matches!(self, DesiredState::Started | DesiredState::Restarting)
    }
}

impl From<i64> for DesiredState {
    fn from(value: i64) -> Self {
        match value {
            1 => DesiredState::Started,
            0 => DesiredState::Stopped,
            -1 => DesiredState::Restarting,
            2 => DesiredState::Paused,
            other => DesiredState::Other(other),
        }
    }
}

impl From<DesiredState> for i64 {
    fn from(state: DesiredState) -> Self {
        match state {
            DesiredState::Started => 1,
            DesiredState::Stopped => 0,
            DesiredState::Restarting => -1,
            DesiredState::Paused => 2,
            DesiredState::Other(value) => value,
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DesiredState::Started => "started",
            DesiredState::Stopped => "stopped",
            DesiredState::Restarting => "restarting",
            DesiredState::Paused => "paused",
            DesiredState::Other(_) => "unknown",
        })
    }
}
