//! Simulated telemetry
//!
//! Random threat and report generators standing in for real honeypot
//! sensors. The feed is a trait so a real collector can slot in later.

mod feed;

pub use feed::{pen_test_report, SimulatedFeed, ThreatFeed};
