//! Machine clustering analysis
//!
//! Groups downtime records by machine and bands each machine against the
//! fleet averages. The analyzer is pure: identical input always produces
//! identical output, and machines are emitted in stable id order.

use std::collections::BTreeMap;

use gantry_core::domain::analysis::{ClusterAnalysis, FleetStats, MachineProfile, Severity};
use gantry_core::domain::record::DowntimeRecord;
use tracing::debug;

/// Analyzes downtime records into machine clusters
pub trait ClusterAnalyzer: Send + Sync {
    /// Runs the analysis
    ///
    /// Returns `None` when the records contain nothing attributable to a
    /// machine (no rows, or no row carries a machine id).
    fn analyze(&self, records: &[DowntimeRecord]) -> anyhow::Result<Option<ClusterAnalysis>>;
}

/// Standard implementation of ClusterAnalyzer
///
/// A machine lands in the `High` band when its incident count or total
/// downtime reaches `high_factor` times the fleet mean, in `Elevated` when
/// it reaches the mean, and in `Normal` otherwise.
pub struct StandardClusterAnalyzer {
    high_factor: f64,
}

impl StandardClusterAnalyzer {
    pub fn new(high_factor: f64) -> Self {
        Self { high_factor }
    }
}

impl Default for StandardClusterAnalyzer {
    fn default() -> Self {
        Self::new(2.0)
    }
}

#[derive(Default)]
struct MachineAccumulator {
    incident_count: u32,
    total_downtime_minutes: f64,
    reasons: BTreeMap<String, u32>,
}

impl MachineAccumulator {
    fn absorb(&mut self, record: &DowntimeRecord) {
        self.incident_count += 1;
        self.total_downtime_minutes += record.downtime_minutes();
        if let Some(reason) = record.reason() {
            *self.reasons.entry(reason.to_string()).or_insert(0) += 1;
        }
    }

    /// Most frequent reason; ties resolve to the lexicographically first
    fn dominant_reason(&self) -> Option<String> {
        let mut best: Option<(&str, u32)> = None;
        for (reason, &count) in &self.reasons {
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((reason, count));
            }
        }
        best.map(|(reason, _)| reason.to_string())
    }
}

impl ClusterAnalyzer for StandardClusterAnalyzer {
    fn analyze(&self, records: &[DowntimeRecord]) -> anyhow::Result<Option<ClusterAnalysis>> {
        let mut machines: BTreeMap<String, MachineAccumulator> = BTreeMap::new();

        for record in records {
            let Some(machine_id) = record.machine_id() else {
                continue;
            };
            machines
                .entry(machine_id.to_string())
                .or_default()
                .absorb(record);
        }

        if machines.is_empty() {
            debug!("No records attributable to a machine; nothing to cluster");
            return Ok(None);
        }

        let machine_count = machines.len() as u32;
        let record_count: u32 = machines.values().map(|m| m.incident_count).sum();
        let mean_incidents = f64::from(record_count) / f64::from(machine_count);
        let mean_downtime_minutes = machines
            .values()
            .map(|m| m.total_downtime_minutes)
            .sum::<f64>()
            / f64::from(machine_count);

        let profiles = machines
            .iter()
            .map(|(machine_id, acc)| MachineProfile {
                machine_id: machine_id.clone(),
                incident_count: acc.incident_count,
                total_downtime_minutes: acc.total_downtime_minutes,
                dominant_reason: acc.dominant_reason(),
                severity: self.band(acc, mean_incidents, mean_downtime_minutes),
            })
            .collect();

        debug!(
            "Clustered {} record(s) across {} machine(s)",
            record_count, machine_count
        );

        Ok(Some(ClusterAnalysis {
            profiles,
            fleet: FleetStats {
                machine_count,
                record_count,
                mean_incidents,
                mean_downtime_minutes,
            },
        }))
    }
}

impl StandardClusterAnalyzer {
    fn band(
        &self,
        acc: &MachineAccumulator,
        mean_incidents: f64,
        mean_downtime_minutes: f64,
    ) -> Severity {
        let incidents = f64::from(acc.incident_count);
        let downtime = acc.total_downtime_minutes;

        if incidents >= self.high_factor * mean_incidents
            || downtime >= self.high_factor * mean_downtime_minutes
        {
            Severity::High
        } else if incidents >= mean_incidents || downtime >= mean_downtime_minutes {
            Severity::Elevated
        } else {
            Severity::Normal
        }
    }
}
