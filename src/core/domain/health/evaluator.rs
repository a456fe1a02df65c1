//! Pure health evaluation: checks → instances → services.

use crate::core::domain::{
    health::status::{HealthState, Status, StatusDescription, StatusRollup},
    model::{
        health_check::{CheckStatus, HealthCheckResult, HealthPayload, InstanceChecks},
        service::Service,
    },
    value_object::DesiredState,
};
use std::collections::HashMap;

/// Staleness thresholds, in missed report intervals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthConfig {
    /// Above this many missed intervals a check is `unknown`.
    pub unknown_after_missed: f64,
    /// Above this many missed intervals a check is `bad`, whatever it last reported.
    pub failed_after_missed: f64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            unknown_after_missed: 2.0,
            failed_after_missed: 60.0,
        }
    }
}

/// The verdict for a single health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckVerdict {
    pub state: HealthState,
    pub reason: StatusDescription,
}

impl CheckVerdict {
    fn new(state: HealthState, reason: StatusDescription) -> Self {
        Self { state, reason }
    }
}

/// Classifies one check at server time `now`.
///
/// Staleness wins over the reported status: a check that stopped reporting
/// is not trusted even if its last report was `passed`. A non-positive
/// interval disables the staleness test.
pub fn classify_health_check(
    hc: &HealthCheckResult,
    now: f64,
    config: &HealthConfig,
) -> CheckVerdict {
    let Some(started_at) = hc.started_at else {
        return CheckVerdict::new(HealthState::Down, StatusDescription::NotStarted);
    };

    if hc.interval > 0.0 {
        let missed_intervals = (now - hc.timestamp.max(started_at)) / hc.interval;
        if missed_intervals > config.failed_after_missed {
            return CheckVerdict::new(HealthState::Bad, StatusDescription::CheckSilent);
        }
        if missed_intervals > config.unknown_after_missed {
            return CheckVerdict::new(HealthState::Unknown, StatusDescription::CheckLate);
        }
    }

    match hc.status {
        Some(CheckStatus::Passed) => {
            CheckVerdict::new(HealthState::Good, StatusDescription::CheckPassed)
        }
        Some(CheckStatus::Failed) => {
            CheckVerdict::new(HealthState::Bad, StatusDescription::CheckFailed)
        }
        _ => CheckVerdict::new(HealthState::Unknown, StatusDescription::CheckUnknown),
    }
}

/// Evaluates one check with the default thresholds.
pub fn evaluate_health_check(hc: &HealthCheckResult, now: f64) -> HealthState {
    classify_health_check(hc, now, &HealthConfig::default()).state
}

/// Distills the check verdicts of one instance into its status.
///
/// Run intent does not apply at this level. It is applied once, when the
/// instance statuses are rolled up into the service status.
pub fn evaluate_instance_status(rollup: &StatusRollup) -> (HealthState, StatusDescription) {
    if rollup.any(HealthState::Bad) {
        (HealthState::Bad, StatusDescription::FailingHealthChecks)
    } else if rollup.any(HealthState::Down) {
        (HealthState::Down, StatusDescription::NotStarted)
    } else if rollup.all(HealthState::Good) {
        (HealthState::Good, StatusDescription::PassingHealthChecks)
    } else {
        (HealthState::Unknown, StatusDescription::MissingHealthChecks)
    }
}

/// Distills a rollup into one status for the given run intent.
pub fn evaluate_service_status(
    desired_state: DesiredState,
    rollup: &StatusRollup,
) -> (HealthState, StatusDescription) {
    if desired_state.expects_running() {
        if rollup.any(HealthState::Bad) {
            (HealthState::Bad, StatusDescription::FailingHealthChecks)
        } else if rollup.any(HealthState::Down) {
            (HealthState::Unknown, StatusDescription::StartingService)
        } else if rollup.all(HealthState::Good) {
            (HealthState::Good, StatusDescription::PassingHealthChecks)
        } else {
            (HealthState::Unknown, StatusDescription::MissingHealthChecks)
        }
    } else if rollup.any(HealthState::Good) {
        (HealthState::Unknown, StatusDescription::StoppingService)
    } else {
        (HealthState::Down, StatusDescription::ContainerDown)
    }
}

/// What the evaluator needs to know about a service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceHealthTarget {
    pub id: String,
    pub name: String,
    pub desired_state: DesiredState,
    pub num_instances: u32,
}

impl From<&Service> for ServiceHealthTarget {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id().to_string(),
            name: service.name(),
            desired_state: service.desired_state(),
            num_instances: service.num_instances(),
        }
    }
}

/// Evaluates one instance from its checks.
pub fn evaluate_instance(
    target: &ServiceHealthTarget,
    instance_id: &str,
    checks: &InstanceChecks,
    now: f64,
    config: &HealthConfig,
) -> Status {
    let id = format!("{}.{}", target.id, instance_id);
    let children: Vec<Status> = checks
        .iter()
        .map(|(name, hc)| {
            let verdict = classify_health_check(hc, now, config);
            Status {
                id: format!("{}.{}", id, name),
                name: name.clone(),
                desired_state: target.desired_state,
                status: verdict.state,
                description: verdict.reason,
                rollup: StatusRollup::new(),
                children: Vec::new(),
            }
        })
        .collect();

    let rollup: StatusRollup = children.iter().map(|child| child.status).collect();
    let (status, description) = evaluate_instance_status(&rollup);

    Status {
        id,
        name: format!("{} {}", target.name, instance_id),
        desired_state: target.desired_state,
        status,
        description,
        rollup,
        children,
    }
}

/// Evaluates a service from the instance checks reported for it.
///
/// Declared instances with no reported checks count as `unknown`.
pub fn evaluate_service(
    target: &ServiceHealthTarget,
    payload: &HealthPayload,
    config: &HealthConfig,
) -> Status {
    let children: Vec<Status> = payload
        .service(&target.id)
        .into_iter()
        .flatten()
        .map(|(instance_id, checks)| {
            evaluate_instance(target, instance_id, checks, payload.timestamp, config)
        })
        .collect();

    let mut rollup: StatusRollup = children.iter().map(|child| child.status).collect();
    let evaluated = u32::try_from(children.len()).unwrap_or(u32::MAX);
    let missing = target.num_instances.saturating_sub(evaluated);
    if missing > 0 {
        rollup.add(HealthState::Unknown, missing);
    }

    let (status, description) = evaluate_service_status(target.desired_state, &rollup);

    Status {
        id: target.id.clone(),
        name: target.name.clone(),
        desired_state: target.desired_state,
        status,
        description,
        rollup,
        children,
    }
}

/// Statuses from one evaluation pass, indexed by service id and by
/// `serviceId.instanceId`.
#[derive(Debug, Clone, Default)]
pub struct HealthReport {
    timestamp: f64,
    statuses: HashMap<String, Status>,
}

impl HealthReport {
    /// Server time of the payload the report was computed from.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Returns the status for an id, or a `down` placeholder for ids this
    /// pass did not evaluate.
    pub fn get(&self, id: &str) -> Status {
        self.statuses.get(id).cloned().unwrap_or_else(|| {
            let (status, description) =
                evaluate_service_status(DesiredState::Stopped, &StatusRollup::new());
            Status {
                id: id.to_string(),
                name: HealthState::Unknown.to_string(),
                desired_state: DesiredState::Stopped,
                status,
                description,
                rollup: StatusRollup::new(),
                children: Vec::new(),
            }
        })
    }

    /// Returns the status for an id only if this pass evaluated it.
    pub fn find(&self, id: &str) -> Option<&Status> {
        self.statuses.get(id)
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

/// Evaluates every target against one payload. Always recomputed from scratch.
pub fn evaluate_services<I>(targets: I, payload: &HealthPayload, config: &HealthConfig) -> HealthReport
where
    I: IntoIterator<Item = ServiceHealthTarget>,
{
    let mut statuses = HashMap::new();
    for target in targets {
        let service_status = evaluate_service(&target, payload, config);
        for instance in &service_status.children {
            statuses.insert(instance.id.clone(), instance.clone());
        }
        statuses.insert(service_status.id.clone(), service_status);
    }

    HealthReport {
        timestamp: payload.timestamp,
        statuses,
    }
}
