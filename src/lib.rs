//! HoneyFarm core engine: honeypot telemetry ingestion and aggregation.
//!
//! This crate provides the service core behind the HoneyFarm dashboard:
//! - Threat detection intake with closed-set severity/status validation
//! - Rollup statistics (per-severity, per-status counts) over record sets
//! - Ordered, filtered, paged queries with stable sorting
//! - Footer link management with lost-update-free click counters
//! - SQLite persistence with default content seeding
//! - Simulated telemetry feed for demo data

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod query;
pub mod session;
pub mod sim;
pub mod store;

mod app;
mod command_handlers;

pub use aggregator::{farm_stats, section_click_totals, top_threat_type, ThreatStats};
pub use app::{execute_command, run};
pub use error::{FarmError, FarmResult};
pub use models::{Finding, NewThreat, PenTestReport, Severity, ThreatStatus};
pub use query::{Filter, Page, PageRequest};
pub use session::{IdentityProvider, StaticIdentity, UserContext, UserInfo};
pub use store::{
    Database, FarmStats, FooterClickRecord, FooterLinkRecord, NetworkAssetRecord, PenTestRecord,
    StressScenarioRecord, TestimonialRecord, ThreatRecord,
};
