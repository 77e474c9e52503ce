//! Configuration constants for the HoneyFarm telemetry core

/// Default page size for dashboard queries
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Maximum page size accepted by the query service
pub const MAX_PAGE_SIZE: u32 = 100;

/// Dashboard poll interval in seconds. Polling is a client behavior; the
/// core serves plain request/response and holds no subscriptions.
pub const DASHBOARD_REFRESH_SECS: u64 = 30;

// ====== Simulated Telemetry Feed ======

/// Number of sample threats generated by a default `simulate` run
pub const SAMPLE_THREAT_COUNT: usize = 25;

/// Detection times of simulated threats fall within this many days of now
pub const SAMPLE_WINDOW_DAYS: i64 = 7;

/// Honeypot ids are formatted as HP-000 .. HP-999
pub const HONEYPOT_ID_SPACE: u32 = 1000;

// ====== Seeding ======

/// User id stamped on seeded records when no session is present
pub const SEED_USER_ID: i64 = 1;
