//! Cluster analysis result types
//!
//! Structures produced by the clustering analyzer and consumed by the
//! result interpreter.

use serde::{Deserialize, Serialize};

/// Severity band assigned to a machine relative to fleet averages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    High,
    Elevated,
    Normal,
}

/// Aggregated downtime behavior of one machine over the analysis window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineProfile {
    pub machine_id: String,
    pub incident_count: u32,
    pub total_downtime_minutes: f64,
    /// Most frequent stoppage reason, when any record carried one
    pub dominant_reason: Option<String>,
    pub severity: Severity,
}

/// Fleet-level statistics the severity bands are measured against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetStats {
    pub machine_count: u32,
    pub record_count: u32,
    pub mean_incidents: f64,
    pub mean_downtime_minutes: f64,
}

/// Result of one clustering analysis pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterAnalysis {
    pub profiles: Vec<MachineProfile>,
    pub fleet: FleetStats,
}

impl ClusterAnalysis {
    /// Profiles in the given severity band, in profile order
    pub fn profiles_in(&self, severity: Severity) -> impl Iterator<Item = &MachineProfile> {
        self.profiles.iter().filter(move |p| p.severity == severity)
    }
}
