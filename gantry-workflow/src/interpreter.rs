//! Cluster result interpretation
//!
//! Turns a cluster analysis into the concrete list of machines needing
//! service. Pure: no I/O, stable output order.

use gantry_core::domain::analysis::{ClusterAnalysis, MachineProfile, Severity};
use gantry_core::domain::task::{ServiceCandidate, TaskPriority};
use tracing::debug;

/// Interprets a cluster analysis into service candidates
pub trait ResultInterpreter: Send + Sync {
    /// Selects the machines needing service, highest priority first
    fn interpret(&self, analysis: &ClusterAnalysis) -> anyhow::Result<Vec<ServiceCandidate>>;
}

/// Standard implementation of ResultInterpreter
///
/// Every `High`-band machine becomes a high-priority candidate. An
/// `Elevated` machine becomes a medium-priority candidate once it has
/// accumulated `min_elevated_incidents` stoppages. `Normal` machines are
/// left alone.
pub struct StandardResultInterpreter {
    min_elevated_incidents: u32,
}

impl StandardResultInterpreter {
    pub fn new(min_elevated_incidents: u32) -> Self {
        Self {
            min_elevated_incidents,
        }
    }
}

impl Default for StandardResultInterpreter {
    fn default() -> Self {
        Self::new(3)
    }
}

impl ResultInterpreter for StandardResultInterpreter {
    fn interpret(&self, analysis: &ClusterAnalysis) -> anyhow::Result<Vec<ServiceCandidate>> {
        let mut candidates: Vec<ServiceCandidate> = Vec::new();

        for profile in analysis.profiles_in(Severity::High) {
            candidates.push(candidate(
                profile,
                TaskPriority::High,
                format!(
                    "{:.0} minutes of downtime across {} incident(s), well above the fleet average",
                    profile.total_downtime_minutes, profile.incident_count
                ),
            ));
        }

        for profile in analysis.profiles_in(Severity::Elevated) {
            if profile.incident_count >= self.min_elevated_incidents {
                candidates.push(candidate(
                    profile,
                    TaskPriority::Medium,
                    format!(
                        "{} recurring stoppage(s) with above-average downtime",
                        profile.incident_count
                    ),
                ));
            }
        }

        // Within each priority, worst downtime first
        candidates.sort_by(|a, b| {
            priority_rank(a.priority).cmp(&priority_rank(b.priority)).then(
                b.total_downtime_minutes
                    .total_cmp(&a.total_downtime_minutes),
            )
        });

        debug!(
            "Identified {} of {} machine(s) for service",
            candidates.len(),
            analysis.fleet.machine_count
        );

        Ok(candidates)
    }
}

fn candidate(profile: &MachineProfile, priority: TaskPriority, reason: String) -> ServiceCandidate {
    ServiceCandidate {
        machine_id: profile.machine_id.clone(),
        priority,
        reason,
        incident_count: profile.incident_count,
        total_downtime_minutes: profile.total_downtime_minutes,
    }
}

fn priority_rank(priority: TaskPriority) -> u8 {
    match priority {
        TaskPriority::High => 0,
        TaskPriority::Medium => 1,
        TaskPriority::Low => 2,
    }
}
