//! Threat detection intake and queries
//!
//! The intake path validates required fields, assigns ids via the table's
//! autoincrement and stamps the caller identity on every row. No
//! deduplication is performed: identical repeated submissions create
//! independent records.

use chrono::Utc;
use rusqlite::{params, Connection};

use super::datetime::{format_datetime, parse_datetime_column};
use super::models::ThreatRecord;
use crate::error::{FarmError, FarmResult};
use crate::models::{NewThreat, Severity, ThreatStatus};
use crate::query::{fetch_page, Page, PageRequest, TableSpec};
use crate::session::UserContext;

const THREAT_COLUMNS: &str = "id, honeypot_id, threat_type, severity, source_ip, location, \
     attack_vector, detection_time, status, details, version, created_by";

pub(crate) const THREATS_TABLE: TableSpec = TableSpec {
    name: "threats",
    select_columns: THREAT_COLUMNS,
    sortable: &[
        "id",
        "detection_time",
        "severity",
        "status",
        "threat_type",
        "honeypot_id",
        "source_ip",
    ],
    filterable: &[
        "honeypot_id",
        "threat_type",
        "severity",
        "status",
        "source_ip",
        "attack_vector",
        "location",
    ],
};

/// Insert a new threat detection. Returns the assigned id.
///
/// `detection_time` defaults to the current time when absent and is rejected
/// when it lies in the future.
pub fn insert_threat(conn: &Connection, threat: &NewThreat, user: &UserContext) -> FarmResult<i64> {
    if threat.threat_type.trim().is_empty() {
        return Err(FarmError::validation("threat_type is required"));
    }
    if threat.source_ip.trim().is_empty() {
        return Err(FarmError::validation("source_ip is required"));
    }

    let now = Utc::now();
    let detection_time = match threat.detection_time {
        Some(dt) if dt > now => {
            return Err(FarmError::validation(format!(
                "detection_time {} is in the future",
                dt
            )));
        }
        Some(dt) => dt,
        None => now,
    };

    conn.execute(
        r#"
        INSERT INTO threats (
            honeypot_id, threat_type, severity, source_ip, location,
            attack_vector, detection_time, status, details, created_by
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
        params![
            threat.honeypot_id,
            threat.threat_type,
            threat.severity.as_str(),
            threat.source_ip,
            threat.location,
            threat.attack_vector,
            format_datetime(&detection_time),
            threat.status.as_str(),
            threat.details,
            user.user_id,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Get a threat by id
pub fn get_threat(conn: &Connection, id: i64) -> FarmResult<Option<ThreatRecord>> {
    let sql = format!("SELECT {} FROM threats WHERE id = ?1", THREAT_COLUMNS);
    let result = conn.query_row(&sql, params![id], map_threat_row);

    match result {
        Ok(threat) => Ok(Some(threat)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Serve a page of threats. The dashboard default is detection_time
/// descending, which [`PageRequest::new`] produces for that field.
pub fn page_threats(conn: &Connection, req: &PageRequest) -> FarmResult<Page<ThreatRecord>> {
    fetch_page(conn, &THREATS_TABLE, req, map_threat_row)
}

/// Load every threat ordered by detection time descending, for rollups.
pub fn all_threats(conn: &Connection) -> FarmResult<Vec<ThreatRecord>> {
    let sql = format!(
        "SELECT {} FROM threats ORDER BY detection_time DESC, id ASC",
        THREAT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let threats = stmt
        .query_map([], map_threat_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(threats)
}

/// Update a threat's status with a compare-and-swap on its version.
///
/// Returns `Conflict` when the stored version no longer matches
/// `expected_version` (a concurrent writer got there first) and `NotFound`
/// for a nonexistent id. Status transitions themselves are unconstrained.
pub fn update_threat_status(
    conn: &Connection,
    id: i64,
    status: ThreatStatus,
    expected_version: i64,
) -> FarmResult<()> {
    let updated = conn.execute(
        "UPDATE threats SET status = ?2, version = version + 1 WHERE id = ?1 AND version = ?3",
        params![id, status.as_str(), expected_version],
    )?;

    if updated == 1 {
        return Ok(());
    }

    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM threats WHERE id = ?1)",
        params![id],
        |row| row.get::<_, i32>(0).map(|v| v == 1),
    )?;

    if exists {
        Err(FarmError::Conflict {
            entity: "threat",
            id,
            expected: expected_version,
        })
    } else {
        Err(FarmError::NotFound {
            entity: "threat",
            id,
        })
    }
}

/// Delete a threat by id
pub fn delete_threat(conn: &Connection, id: i64) -> FarmResult<()> {
    let deleted = conn.execute("DELETE FROM threats WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(FarmError::NotFound {
            entity: "threat",
            id,
        });
    }
    Ok(())
}

fn map_threat_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ThreatRecord> {
    let severity_str: String = row.get(3)?;
    let status_str: String = row.get(8)?;

    Ok(ThreatRecord {
        id: row.get(0)?,
        honeypot_id: row.get(1)?,
        threat_type: row.get(2)?,
        severity: parse_severity_or_default(&severity_str),
        source_ip: row.get(4)?,
        location: row.get(5)?,
        attack_vector: row.get(6)?,
        detection_time: parse_datetime_column(row.get::<_, String>(7)?, 7)?,
        status: parse_status_or_default(&status_str),
        details: row.get(9)?,
        version: row.get(10)?,
        created_by: row.get(11)?,
    })
}

fn parse_severity_or_default(s: &str) -> Severity {
    match s.parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("Unknown severity in database: {}", s);
            Severity::Low
        }
    }
}

fn parse_status_or_default(s: &str) -> ThreatStatus {
    match s.parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("Unknown threat status in database: {}", s);
            ThreatStatus::Active
        }
    }
}
