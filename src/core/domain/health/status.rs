//! Status categories, rollup counters and status trees.

use crate::core::domain::value_object::DesiredState;
use serde::Serialize;
use std::fmt;

/// A UI-renderable health category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Good,
    Bad,
    Down,
    Unknown,
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HealthState::Good => "good",
            HealthState::Bad => "bad",
            HealthState::Down => "down",
            HealthState::Unknown => "unknown",
        })
    }
}

/// Reason behind a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusDescription {
    FailingHealthChecks,
    StartingService,
    PassingHealthChecks,
    MissingHealthChecks,
    StoppingService,
    ContainerDown,
    /// The check has never run because its instance has not started.
    NotStarted,
    /// The check missed more reports than the failure threshold allows.
    CheckSilent,
    /// The check missed a few reports.
    CheckLate,
    CheckPassed,
    CheckFailed,
    CheckUnknown,
}

impl StatusDescription {
    /// Stable reason code, suitable as a translation key.
    pub fn code(self) -> &'static str {
        match self {
            StatusDescription::FailingHealthChecks => "failing_health_checks",
            StatusDescription::StartingService => "starting_service",
            StatusDescription::PassingHealthChecks => "passing_health_checks",
            StatusDescription::MissingHealthChecks => "missing_health_checks",
            StatusDescription::StoppingService => "stopping_service",
            StatusDescription::ContainerDown => "container_down",
            StatusDescription::NotStarted => "not_started",
            StatusDescription::CheckSilent => "check_silent",
            StatusDescription::CheckLate => "check_late",
            StatusDescription::CheckPassed => "check_passed",
            StatusDescription::CheckFailed => "check_failed",
            StatusDescription::CheckUnknown => "check_unknown",
        }
    }
}

impl fmt::Display for StatusDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code().replace('_', " "))
    }
}

/// Count of child statuses per category.
///
/// `total` always equals the sum of the four buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusRollup {
    good: u32,
    bad: u32,
    down: u32,
    unknown: u32,
    total: u32,
}

impl StatusRollup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&mut self, state: HealthState) {
        self.add(state, 1);
    }

    pub fn add(&mut self, state: HealthState, count: u32) {
        let bucket = match state {
            HealthState::Good => &mut self.good,
            HealthState::Bad => &mut self.bad,
            HealthState::Down => &mut self.down,
            HealthState::Unknown => &mut self.unknown,
        };
        *bucket += count;
        self.total += count;
    }

    pub fn count(&self, state: HealthState) -> u32 {
        match state {
            HealthState::Good => self.good,
            HealthState::Bad => self.bad,
            HealthState::Down => self.down,
            HealthState::Unknown => self.unknown,
        }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn any(&self, state: HealthState) -> bool {
        self.count(state) > 0
    }

    /// `false` for an empty rollup.
    pub fn all(&self, state: HealthState) -> bool {
        self.total > 0 && self.count(state) == self.total
    }
}

impl FromIterator<HealthState> for StatusRollup {
    fn from_iter<I: IntoIterator<Item = HealthState>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |mut rollup, state| {
            rollup.inc(state);
            rollup
        })
    }
}

/// The evaluated health of a service, an instance, or a single check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    pub id: String,
    pub name: String,
    pub desired_state: DesiredState,
    pub status: HealthState,
    pub description: StatusDescription,
    pub rollup: StatusRollup,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Status>,
}
