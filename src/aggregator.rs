//! Rollup statistics over record sets
//!
//! Counts are recomputed from scratch on every query with a single O(n)
//! pass; there is no incremental maintenance. The dashboard polls these on
//! a timer, so every call sees the current table contents.

use std::collections::HashMap;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::error::FarmResult;
use crate::models::{Severity, ThreatStatus};
use crate::store::datetime::parse_datetime;
use crate::store::{FarmStats, FooterLinkRecord, ThreatRecord};

/// Severity and status tallies over a threat set.
///
/// `critical + high + medium + low == total` holds for any input because
/// severity is a closed set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatStats {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub active: usize,
}

impl ThreatStats {
    /// Tally a record set in one pass.
    pub fn compute(threats: &[ThreatRecord]) -> Self {
        let mut stats = ThreatStats::default();
        for threat in threats {
            stats.total += 1;
            match threat.severity {
                Severity::Critical => stats.critical += 1,
                Severity::High => stats.high += 1,
                Severity::Medium => stats.medium += 1,
                Severity::Low => stats.low += 1,
            }
            if threat.status == ThreatStatus::Active {
                stats.active += 1;
            }
        }
        stats
    }

    pub fn count_at(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// Most frequent threat type in the set, with its count.
///
/// Ties go to the type that first reaches the maximum count in iteration
/// order; callers that need a specific tie order should sort beforehand.
pub fn top_threat_type(threats: &[ThreatRecord]) -> Option<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for threat in threats {
        *counts.entry(threat.threat_type.as_str()).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for threat in threats {
        let count = counts[threat.threat_type.as_str()];
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((threat.threat_type.as_str(), count)),
        }
    }

    best.map(|(name, count)| (name.to_string(), count))
}

/// Total click count per footer section.
pub fn section_click_totals(links: &[FooterLinkRecord]) -> HashMap<String, i64> {
    let mut totals = HashMap::new();
    for link in links {
        *totals.entry(link.section_name.clone()).or_insert(0) += link.click_count;
    }
    totals
}

/// Dashboard-header rollup computed in SQL.
pub fn farm_stats(conn: &Connection) -> FarmResult<FarmStats> {
    let total_threats: i64 =
        conn.query_row("SELECT COUNT(*) FROM threats", [], |row| row.get(0))?;

    let active_threats: i64 = conn.query_row(
        "SELECT COUNT(*) FROM threats WHERE status = 'Active'",
        [],
        |row| row.get(0),
    )?;

    let critical_threats: i64 = conn.query_row(
        "SELECT COUNT(*) FROM threats WHERE severity = 'Critical'",
        [],
        |row| row.get(0),
    )?;

    let threats_24h: i64 = conn.query_row(
        "SELECT COUNT(*) FROM threats WHERE detection_time >= datetime('now', '-24 hours')",
        [],
        |row| row.get(0),
    )?;

    let total_links: i64 =
        conn.query_row("SELECT COUNT(*) FROM footer_links", [], |row| row.get(0))?;

    let total_clicks: i64 = conn.query_row(
        "SELECT COALESCE(SUM(click_count), 0) FROM footer_links",
        [],
        |row| row.get(0),
    )?;

    let last_detection_raw: Option<String> = conn
        .query_row(
            "SELECT detection_time FROM threats ORDER BY detection_time DESC, id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    let last_detection_time = match last_detection_raw {
        Some(raw) => Some(parse_datetime(raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                e.into(),
            )
        })?),
        None => None,
    };

    Ok(FarmStats {
        total_threats,
        active_threats,
        critical_threats,
        threats_24h,
        total_links,
        total_clicks,
        last_detection_time,
    })
}
