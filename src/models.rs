//! Domain types for honeypot telemetry
//!
//! Severity and status are closed sets: no other values are valid anywhere
//! in the system. Both round-trip through their canonical display strings,
//! which is also how they are stored in SQLite.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Threat severity. Total order is Critical > High > Medium > Low, used for
/// sorting and tallying (variants are declared ascending so `Ord` agrees).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Critical" => Ok(Severity::Critical),
            "High" => Ok(Severity::High),
            "Medium" => Ok(Severity::Medium),
            "Low" => Ok(Severity::Low),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Lifecycle status of a threat detection. Transitions are unconstrained:
/// any value may follow any other (no workflow state machine exists).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreatStatus {
    Active,
    Investigating,
    Mitigated,
}

impl ThreatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatStatus::Active => "Active",
            ThreatStatus::Investigating => "Investigating",
            ThreatStatus::Mitigated => "Mitigated",
        }
    }
}

impl std::fmt::Display for ThreatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThreatStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(ThreatStatus::Active),
            "Investigating" => Ok(ThreatStatus::Investigating),
            "Mitigated" => Ok(ThreatStatus::Mitigated),
            _ => Err(format!("Unknown threat status: {}", s)),
        }
    }
}

/// A new threat detection submitted to the intake path.
///
/// `detection_time` is optional; the store assigns the current time when it
/// is absent. `threat_type` and `source_ip` are required. `source_ip` is a
/// dotted-quad label and is not validated as a routable address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewThreat {
    pub honeypot_id: String,
    pub threat_type: String,
    pub severity: Severity,
    pub source_ip: String,
    pub location: Option<String>,
    pub attack_vector: Option<String>,
    pub detection_time: Option<DateTime<Utc>>,
    pub status: ThreatStatus,
    pub details: Option<String>,
}

/// A single penetration-test finding. Typed sub-record stored as JSON in
/// the pen_tests report column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    pub title: String,
    pub severity: Severity,
    pub description: String,
    pub affected_systems: Vec<String>,
    pub recommendation: String,
}

/// Structured penetration-test report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PenTestReport {
    pub findings: Vec<Finding>,
}

impl PenTestReport {
    /// Count of findings at the given severity.
    pub fn count_at(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }
}
