//! Dashboard record tables: testimonials, network assets, penetration
//! tests and stress scenarios
//!
//! Flat records with a status-like field each. No referential integrity is
//! enforced between these tables and the rest of the system.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::datetime::{format_datetime, parse_optional_datetime_column};
use super::models::{
    NetworkAssetRecord, PenTestRecord, StressScenarioRecord, TestimonialRecord,
};
use crate::error::{FarmError, FarmResult};
use crate::models::PenTestReport;
use crate::query::{fetch_page, Page, PageRequest, TableSpec};
use crate::session::UserContext;

pub(crate) const PEN_TESTS_TABLE: TableSpec = TableSpec {
    name: "pen_tests",
    select_columns: "id, test_name, target_scope, test_type, status, start_time, end_time, \
         vulnerabilities_found, critical_count, high_count, medium_count, low_count, report, \
         created_by",
    sortable: &["id", "test_name", "status", "start_time", "vulnerabilities_found"],
    filterable: &["status", "test_type"],
};

pub(crate) const NETWORK_ASSETS_TABLE: TableSpec = TableSpec {
    name: "network_assets",
    select_columns: "id, asset_name, ip_address, mac_address, device_type, os_fingerprint, \
         open_ports, services, status, last_scan, risk_level, created_by",
    sortable: &["id", "asset_name", "ip_address", "status", "risk_level", "last_scan"],
    filterable: &["status", "device_type", "risk_level"],
};

pub(crate) const STRESS_SCENARIOS_TABLE: TableSpec = TableSpec {
    name: "stress_scenarios",
    select_columns: "id, scenario_name, description, scenario_type, target_systems, parameters, \
         status, start_time, end_time, max_cpu_usage, max_memory_usage, max_network_usage, \
         response_time_avg, failure_points, recommendations, created_by",
    sortable: &["id", "scenario_name", "status", "start_time", "response_time_avg"],
    filterable: &["status", "scenario_type"],
};

// ====== Testimonials ======

/// Fields for a new testimonial.
#[derive(Debug, Clone)]
pub struct TestimonialInput {
    pub company_name: String,
    pub customer_name: String,
    pub position: Option<String>,
    pub testimonial_text: String,
    pub rating: i64,
    pub company_logo: Option<String>,
    pub is_featured: bool,
    pub case_study_title: Option<String>,
    pub case_study_summary: Option<String>,
}

pub fn insert_testimonial(
    conn: &Connection,
    input: &TestimonialInput,
    user: &UserContext,
) -> FarmResult<i64> {
    if input.company_name.trim().is_empty() {
        return Err(FarmError::validation("company_name is required"));
    }
    if input.testimonial_text.trim().is_empty() {
        return Err(FarmError::validation("testimonial_text is required"));
    }
    if !(1..=5).contains(&input.rating) {
        return Err(FarmError::validation("rating must be between 1 and 5"));
    }

    conn.execute(
        r#"
        INSERT INTO testimonials (
            company_name, customer_name, position, testimonial_text, rating,
            company_logo, is_featured, case_study_title, case_study_summary, created_by
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
        params![
            input.company_name,
            input.customer_name,
            input.position,
            input.testimonial_text,
            input.rating,
            input.company_logo,
            input.is_featured as i32,
            input.case_study_title,
            input.case_study_summary,
            user.user_id,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// All testimonials, featured first, then newest first
pub fn list_testimonials(conn: &Connection) -> FarmResult<Vec<TestimonialRecord>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, company_name, customer_name, position, testimonial_text, rating,
               company_logo, is_featured, case_study_title, case_study_summary, created_by
        FROM testimonials
        ORDER BY is_featured DESC, id DESC
        "#,
    )?;

    let testimonials = stmt
        .query_map([], |row| {
            Ok(TestimonialRecord {
                id: row.get(0)?,
                company_name: row.get(1)?,
                customer_name: row.get(2)?,
                position: row.get(3)?,
                testimonial_text: row.get(4)?,
                rating: row.get(5)?,
                company_logo: row.get(6)?,
                is_featured: row.get::<_, i32>(7)? == 1,
                case_study_title: row.get(8)?,
                case_study_summary: row.get(9)?,
                created_by: row.get(10)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(testimonials)
}

// ====== Network assets ======

/// Fields for a new network asset.
#[derive(Debug, Clone)]
pub struct NetworkAssetInput {
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
}

pub fn insert_network_asset(
    conn: &Connection,
    input: &NetworkAssetInput,
    user: &UserContext,
) -> FarmResult<i64> {
    if input.asset_name.trim().is_empty() {
        return Err(FarmError::validation("asset_name is required"));
    }
    if input.ip_address.trim().is_empty() {
        return Err(FarmError::validation("ip_address is required"));
    }

    conn.execute(
        r#"
        INSERT INTO network_assets (
            asset_name, ip_address, mac_address, device_type, os_fingerprint,
            open_ports, services, status, last_scan, risk_level, created_by
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
        params![
            input.asset_name,
            input.ip_address,
            input.mac_address,
            input.device_type,
            input.os_fingerprint,
            input.open_ports,
            input.services,
            input.status,
            input.last_scan.as_ref().map(format_datetime),
            input.risk_level,
            user.user_id,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn page_network_assets(
    conn: &Connection,
    req: &PageRequest,
) -> FarmResult<Page<NetworkAssetRecord>> {
    fetch_page(conn, &NETWORK_ASSETS_TABLE, req, |row| {
        Ok(NetworkAssetRecord {
            id: row.get(0)?,
            asset_name: row.get(1)?,
            ip_address: row.get(2)?,
            mac_address: row.get(3)?,
            device_type: row.get(4)?,
            os_fingerprint: row.get(5)?,
            open_ports: row.get(6)?,
            services: row.get(7)?,
            status: row.get(8)?,
            last_scan: parse_optional_datetime_column(row.get::<_, Option<String>>(9)?, 9)?,
            risk_level: row.get(10)?,
            created_by: row.get(11)?,
        })
    })
}

// ====== Penetration tests ======

/// Fields for a new penetration test.
#[derive(Debug, Clone)]
pub struct PenTestInput {
    pub test_name: String,
    pub target_scope: String,
    pub test_type: String,
    pub status: String,
    pub start_time: Option<DateTime<Utc>>,
}

pub fn insert_pen_test(
    conn: &Connection,
    input: &PenTestInput,
    user: &UserContext,
) -> FarmResult<i64> {
    if input.test_name.trim().is_empty() {
        return Err(FarmError::validation("test_name is required"));
    }
    if input.target_scope.trim().is_empty() {
        return Err(FarmError::validation("target_scope is required"));
    }

    conn.execute(
        r#"
        INSERT INTO pen_tests (test_name, target_scope, test_type, status, start_time, created_by)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            input.test_name,
            input.target_scope,
            input.test_type,
            input.status,
            input.start_time.as_ref().map(format_datetime),
            user.user_id,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Attach a completed report to a test: the typed findings are serialized
/// to JSON and the per-severity counters are derived from them.
pub fn complete_pen_test(
    conn: &Connection,
    id: i64,
    report: &PenTestReport,
    end_time: DateTime<Utc>,
) -> FarmResult<()> {
    use crate::models::Severity;

    let report_json = serde_json::to_string(report)?;
    let updated = conn.execute(
        r#"
        UPDATE pen_tests SET
            status = 'completed', end_time = ?2, report = ?3,
            vulnerabilities_found = ?4, critical_count = ?5, high_count = ?6,
            medium_count = ?7, low_count = ?8
        WHERE id = ?1
        "#,
        params![
            id,
            format_datetime(&end_time),
            report_json,
            report.findings.len() as i64,
            report.count_at(Severity::Critical) as i64,
            report.count_at(Severity::High) as i64,
            report.count_at(Severity::Medium) as i64,
            report.count_at(Severity::Low) as i64,
        ],
    )?;

    if updated == 0 {
        return Err(FarmError::NotFound {
            entity: "penetration test",
            id,
        });
    }
    Ok(())
}

pub fn page_pen_tests(conn: &Connection, req: &PageRequest) -> FarmResult<Page<PenTestRecord>> {
    fetch_page(conn, &PEN_TESTS_TABLE, req, |row| {
        Ok(PenTestRecord {
            id: row.get(0)?,
            test_name: row.get(1)?,
            target_scope: row.get(2)?,
            test_type: row.get(3)?,
            status: row.get(4)?,
            start_time: parse_optional_datetime_column(row.get::<_, Option<String>>(5)?, 5)?,
            end_time: parse_optional_datetime_column(row.get::<_, Option<String>>(6)?, 6)?,
            vulnerabilities_found: row.get(7)?,
            critical_count: row.get(8)?,
            high_count: row.get(9)?,
            medium_count: row.get(10)?,
            low_count: row.get(11)?,
            report: row.get(12)?,
            created_by: row.get(13)?,
        })
    })
}

// ====== Stress scenarios ======

/// Fields for a new stress scenario.
#[derive(Debug, Clone)]
pub struct StressScenarioInput {
    pub scenario_name: String,
    pub description: Option<String>,
    pub scenario_type: String,
    pub target_systems: Option<String>,
    pub parameters: Option<String>,
    pub status: String,
}

pub fn insert_stress_scenario(
    conn: &Connection,
    input: &StressScenarioInput,
    user: &UserContext,
) -> FarmResult<i64> {
    if input.scenario_name.trim().is_empty() {
        return Err(FarmError::validation("scenario_name is required"));
    }

    conn.execute(
        r#"
        INSERT INTO stress_scenarios (
            scenario_name, description, scenario_type, target_systems, parameters, status, created_by
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            input.scenario_name,
            input.description,
            input.scenario_type,
            input.target_systems,
            input.parameters,
            input.status,
            user.user_id,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn page_stress_scenarios(
    conn: &Connection,
    req: &PageRequest,
) -> FarmResult<Page<StressScenarioRecord>> {
    fetch_page(conn, &STRESS_SCENARIOS_TABLE, req, |row| {
        Ok(StressScenarioRecord {
            id: row.get(0)?,
            scenario_name: row.get(1)?,
            description: row.get(2)?,
            scenario_type: row.get(3)?,
            target_systems: row.get(4)?,
            parameters: row.get(5)?,
            status: row.get(6)?,
            start_time: parse_optional_datetime_column(row.get::<_, Option<String>>(7)?, 7)?,
            end_time: parse_optional_datetime_column(row.get::<_, Option<String>>(8)?, 8)?,
            max_cpu_usage: row.get(9)?,
            max_memory_usage: row.get(10)?,
            max_network_usage: row.get(11)?,
            response_time_avg: row.get(12)?,
            failure_points: row.get(13)?,
            recommendations: row.get(14)?,
            created_by: row.get(15)?,
        })
    })
}

fn update_status(
    conn: &Connection,
    table: &TableSpec,
    id: i64,
    entity: &'static str,
    status: &str,
) -> FarmResult<()> {
    if status.trim().is_empty() {
        return Err(FarmError::validation("status is required"));
    }
    let sql = format!("UPDATE {} SET status = ?2 WHERE id = ?1", table.name);
    let updated = conn.execute(&sql, params![id, status])?;
    if updated == 0 {
        return Err(FarmError::NotFound { entity, id });
    }
    Ok(())
}

/// Update a network asset's free-form status; any value may follow any other.
pub fn update_network_asset_status(conn: &Connection, id: i64, status: &str) -> FarmResult<()> {
    update_status(conn, &NETWORK_ASSETS_TABLE, id, "network asset", status)
}

/// Update a penetration test's free-form status.
pub fn update_pen_test_status(conn: &Connection, id: i64, status: &str) -> FarmResult<()> {
    update_status(conn, &PEN_TESTS_TABLE, id, "penetration test", status)
}

/// Update a stress scenario's free-form status.
pub fn update_stress_scenario_status(conn: &Connection, id: i64, status: &str) -> FarmResult<()> {
    update_status(conn, &STRESS_SCENARIOS_TABLE, id, "stress scenario", status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Finding, Severity};
    use crate::store::Database;

    fn test_conn() -> Database {
        Database::in_memory().unwrap()
    }

    #[test]
    fn test_testimonial_rating_bounds() {
        let db = test_conn();
        let conn = db.connection();
        let conn = conn.lock().unwrap();
        let user = UserContext { user_id: 1 };

        let mut input = TestimonialInput {
            company_name: "CyberTech Solutions".to_string(),
            customer_name: "Sarah Johnson".to_string(),
            position: Some("CISO".to_string()),
            testimonial_text: "Revolutionized our threat detection.".to_string(),
            rating: 6,
            company_logo: None,
            is_featured: true,
            case_study_title: None,
            case_study_summary: None,
        };
        assert!(matches!(
            insert_testimonial(&conn, &input, &user),
            Err(FarmError::ValidationFailed(_))
        ));

        input.rating = 5;
        let id = insert_testimonial(&conn, &input, &user).unwrap();
        assert!(id > 0);
    }

    #[test]
    fn test_featured_testimonials_list_first() {
        let db = test_conn();
        let conn = db.connection();
        let conn = conn.lock().unwrap();
        let user = UserContext { user_id: 1 };

        let plain = TestimonialInput {
            company_name: "DataGuard".to_string(),
            customer_name: "Emily Rodriguez".to_string(),
            position: None,
            testimonial_text: "Transformed our incident response.".to_string(),
            rating: 4,
            company_logo: None,
            is_featured: false,
            case_study_title: None,
            case_study_summary: None,
        };
        let mut featured = plain.clone();
        featured.company_name = "SecureBank".to_string();
        featured.is_featured = true;

        insert_testimonial(&conn, &plain, &user).unwrap();
        insert_testimonial(&conn, &featured, &user).unwrap();

        let list = list_testimonials(&conn).unwrap();
        assert_eq!(list[0].company_name, "SecureBank");
    }

    #[test]
    fn test_pen_test_report_drives_counters() {
        let db = test_conn();
        let conn = db.connection();
        let conn = conn.lock().unwrap();
        let user = UserContext { user_id: 1 };

        let id = insert_pen_test(
            &conn,
            &PenTestInput {
                test_name: "Quarterly network test".to_string(),
                target_scope: "10.0.0.0/24".to_string(),
                test_type: "network".to_string(),
                status: "running".to_string(),
                start_time: Some(Utc::now()),
            },
            &user,
        )
        .unwrap();

        let report = PenTestReport {
            findings: vec![
                Finding {
                    title: "Open management port".to_string(),
                    severity: Severity::Critical,
                    description: "Admin panel exposed to the subnet".to_string(),
                    affected_systems: vec!["10.0.0.12".to_string()],
                    recommendation: "Restrict access to the management VLAN".to_string(),
                },
                Finding {
                    title: "Weak TLS configuration".to_string(),
                    severity: Severity::Medium,
                    description: "Legacy cipher suites accepted".to_string(),
                    affected_systems: vec!["10.0.0.5".to_string()],
                    recommendation: "Disable TLS 1.0/1.1".to_string(),
                },
            ],
        };
        complete_pen_test(&conn, id, &report, Utc::now()).unwrap();

        let page = page_pen_tests(&conn, &PageRequest::new("id")).unwrap();
        let stored = &page.items[0];
        assert_eq!(stored.status, "completed");
        assert_eq!(stored.vulnerabilities_found, 2);
        assert_eq!(stored.critical_count, 1);
        assert_eq!(stored.medium_count, 1);
        assert_eq!(stored.high_count, 0);

        let parsed: PenTestReport = serde_json::from_str(stored.report.as_deref().unwrap()).unwrap();
        assert_eq!(parsed.findings.len(), 2);

        assert!(matches!(
            complete_pen_test(&conn, 9999, &report, Utc::now()),
            Err(FarmError::NotFound { .. })
        ));
    }

    #[test]
    fn test_status_update_is_unconstrained() {
        let db = test_conn();
        let conn = db.connection();
        let conn = conn.lock().unwrap();
        let user = UserContext { user_id: 1 };

        let id = insert_stress_scenario(
            &conn,
            &StressScenarioInput {
                scenario_name: "Peak load".to_string(),
                description: None,
                scenario_type: "load_test".to_string(),
                target_systems: Some("web tier".to_string()),
                parameters: None,
                status: "completed".to_string(),
            },
            &user,
        )
        .unwrap();

        // "completed" back to "scheduled" is allowed; no state machine.
        update_stress_scenario_status(&conn, id, "scheduled").unwrap();

        let page = page_stress_scenarios(&conn, &PageRequest::new("id")).unwrap();
        assert_eq!(page.items[0].status, "scheduled");
    }

    #[test]
    fn test_network_asset_page_filters_by_status() {
        let db = test_conn();
        let conn = db.connection();
        let conn = conn.lock().unwrap();
        let user = UserContext { user_id: 1 };

        for (name, status) in [("gw-01", "online"), ("db-01", "offline"), ("web-01", "online")] {
            insert_network_asset(
                &conn,
                &NetworkAssetInput {
                    asset_name: name.to_string(),
                    ip_address: "192.168.1.1".to_string(),
                    mac_address: None,
                    device_type: Some("server".to_string()),
                    os_fingerprint: None,
                    open_ports: None,
                    services: None,
                    status: status.to_string(),
                    last_scan: None,
                    risk_level: Some("low".to_string()),
                },
                &user,
            )
            .unwrap();
        }

        let page = page_network_assets(
            &conn,
            &PageRequest::new("id").ascending(true).with_filter("status", "online"),
        )
        .unwrap();
        assert_eq!(page.total_count, 2);
        let names: Vec<&str> = page.items.iter().map(|a| a.asset_name.as_str()).collect();
        assert_eq!(names, vec!["gw-01", "web-01"]);
    }
}
