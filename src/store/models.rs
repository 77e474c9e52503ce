//! Database records
//!
//! Structs for table rows with serialization support

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Severity, ThreatStatus};

/// Threat detection record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatRecord {
    pub id: i64,
    pub honeypot_id: String,
    pub threat_type: String,
    pub severity: Severity,
    pub source_ip: String,
    pub location: Option<String>,
    pub attack_vector: Option<String>,
    pub detection_time: DateTime<Utc>,
    pub status: ThreatStatus,
    pub details: Option<String>,
    pub version: i64,
    pub created_by: i64,
}

/// Footer link record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FooterLinkRecord {
    pub id: i64,
    pub section_name: String,
    pub title: String,
    pub url: String,
    pub icon: Option<String>,
    pub is_external: bool,
    pub display_order: i64,
    pub is_active: bool,
    pub click_count: i64,
    pub created_by: i64,
}

/// Footer click event record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FooterClickRecord {
    pub id: i64,
    pub link_id: i64,
    pub title: String,
    pub url: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

/// Testimonial record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestimonialRecord {
    pub id: i64,
    pub company_name: String,
    pub customer_name: String,
    pub position: Option<String>,
    pub testimonial_text: String,
    pub rating: i64,
    pub company_logo: Option<String>,
    pub is_featured: bool,
    pub case_study_title: Option<String>,
    pub case_study_summary: Option<String>,
    pub created_by: i64,
}

/// Network asset record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkAssetRecord {
    pub id: i64,
    pub asset_name: String,
    pub ip_address: String,
    pub mac_address: Option<String>,
    pub device_type: Option<String>,
    pub os_fingerprint: Option<String>,
    pub open_ports: Option<String>,
    pub services: Option<String>,
    pub status: String,
    pub last_scan: Option<DateTime<Utc>>,
    pub risk_level: Option<String>,
    pub created_by: i64,
}

/// Penetration test record. `report` holds the typed findings as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenTestRecord {
    pub id: i64,
    pub test_name: String,
    pub target_scope: String,
    pub test_type: String,
    pub status: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub vulnerabilities_found: i64,
    pub critical_count: i64,
    pub high_count: i64,
    pub medium_count: i64,
    pub low_count: i64,
    pub report: Option<String>,
    pub created_by: i64,
}

/// Stress scenario record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressScenarioRecord {
    pub id: i64,
    pub scenario_name: String,
    pub description: Option<String>,
    pub scenario_type: String,
    pub target_systems: Option<String>,
    pub parameters: Option<String>,
    pub status: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub max_cpu_usage: f64,
    pub max_memory_usage: f64,
    pub max_network_usage: f64,
    pub response_time_avg: f64,
    pub failure_points: Option<String>,
    pub recommendations: Option<String>,
    pub created_by: i64,
}

/// Summary statistics for the dashboard header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmStats {
    pub total_threats: i64,
    pub active_threats: i64,
    pub critical_threats: i64,
    pub threats_24h: i64,
    pub total_links: i64,
    pub total_clicks: i64,
    pub last_detection_time: Option<DateTime<Utc>>,
}
