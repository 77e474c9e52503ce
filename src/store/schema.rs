//! Database schema definitions
//!
//! Creates and manages the SQLite tables

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all database tables
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Threats table: one row per observed attack event
        CREATE TABLE IF NOT EXISTS threats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            honeypot_id TEXT NOT NULL,
            threat_type TEXT NOT NULL,
            severity TEXT NOT NULL,
            source_ip TEXT NOT NULL,
            location TEXT,
            attack_vector TEXT,
            detection_time TEXT NOT NULL DEFAULT (datetime('now')),
            status TEXT NOT NULL DEFAULT 'Active',
            details TEXT,
            version INTEGER NOT NULL DEFAULT 1,
            created_by INTEGER NOT NULL DEFAULT 0
        );

        -- Footer links: navigational/contact links with click counters
        CREATE TABLE IF NOT EXISTS footer_links (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            section_name TEXT NOT NULL,
            title TEXT NOT NULL,
            url TEXT NOT NULL,
            icon TEXT,
            is_external INTEGER NOT NULL DEFAULT 0,
            display_order INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            click_count INTEGER NOT NULL DEFAULT 0,
            created_by INTEGER NOT NULL DEFAULT 0
        );

        -- Footer clicks: timestamped event per tracked click
        CREATE TABLE IF NOT EXISTS footer_clicks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            link_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            url TEXT,
            clicked_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (link_id) REFERENCES footer_links(id) ON DELETE CASCADE
        );

        -- Testimonials: customer quotes for the marketing site
        CREATE TABLE IF NOT EXISTS testimonials (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            company_name TEXT NOT NULL,
            customer_name TEXT NOT NULL,
            position TEXT,
            testimonial_text TEXT NOT NULL,
            rating INTEGER NOT NULL DEFAULT 5,
            company_logo TEXT,
            is_featured INTEGER NOT NULL DEFAULT 0,
            case_study_title TEXT,
            case_study_summary TEXT,
            created_by INTEGER NOT NULL DEFAULT 0
        );

        -- Network assets: discovered hosts shown by the network mapper
        CREATE TABLE IF NOT EXISTS network_assets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            asset_name TEXT NOT NULL,
            ip_address TEXT NOT NULL,
            mac_address TEXT,
            device_type TEXT,
            os_fingerprint TEXT,
            open_ports TEXT,
            services TEXT,
            status TEXT NOT NULL DEFAULT 'online',
            last_scan TEXT,
            risk_level TEXT,
            created_by INTEGER NOT NULL DEFAULT 0
        );

        -- Penetration tests: runs with a typed findings report (JSON)
        CREATE TABLE IF NOT EXISTS pen_tests (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            test_name TEXT NOT NULL,
            target_scope TEXT NOT NULL,
            test_type TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'scheduled',
            start_time TEXT,
            end_time TEXT,
            vulnerabilities_found INTEGER NOT NULL DEFAULT 0,
            critical_count INTEGER NOT NULL DEFAULT 0,
            high_count INTEGER NOT NULL DEFAULT 0,
            medium_count INTEGER NOT NULL DEFAULT 0,
            low_count INTEGER NOT NULL DEFAULT 0,
            report TEXT,
            created_by INTEGER NOT NULL DEFAULT 0
        );

        -- Stress scenarios: load-test runs with resource ceilings
        CREATE TABLE IF NOT EXISTS stress_scenarios (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            scenario_name TEXT NOT NULL,
            description TEXT,
            scenario_type TEXT NOT NULL,
            target_systems TEXT,
            parameters TEXT,
            status TEXT NOT NULL DEFAULT 'scheduled',
            start_time TEXT,
            end_time TEXT,
            max_cpu_usage REAL NOT NULL DEFAULT 0,
            max_memory_usage REAL NOT NULL DEFAULT 0,
            max_network_usage REAL NOT NULL DEFAULT 0,
            response_time_avg REAL NOT NULL DEFAULT 0,
            failure_points TEXT,
            recommendations TEXT,
            created_by INTEGER NOT NULL DEFAULT 0
        );

        -- Indexes for performance
        CREATE INDEX IF NOT EXISTS idx_threats_detection_time ON threats(detection_time);
        CREATE INDEX IF NOT EXISTS idx_threats_severity ON threats(severity);
        CREATE INDEX IF NOT EXISTS idx_threats_status ON threats(status);
        CREATE INDEX IF NOT EXISTS idx_footer_links_section ON footer_links(section_name, display_order);
        CREATE INDEX IF NOT EXISTS idx_footer_clicks_link ON footer_clicks(link_id);
        CREATE INDEX IF NOT EXISTS idx_pen_tests_status ON pen_tests(status);
        "#,
    )
    .context("Failed to create database tables")?;

    // Backward-compatible migration for databases created before the
    // optimistic-concurrency version column existed.
    let has_version: bool = conn
        .prepare("PRAGMA table_info(threats)")
        .and_then(|mut stmt| {
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let col_name: String = row.get(1)?;
                if col_name == "version" {
                    return Ok(true);
                }
            }
            Ok(false)
        })
        .context("Failed to inspect threats table schema")?;

    if !has_version {
        conn.execute(
            "ALTER TABLE threats ADD COLUMN version INTEGER NOT NULL DEFAULT 1",
            [],
        )
        .context("Failed to migrate threats table with version column")?;
    }

    Ok(())
}

/// Drop all tables (for testing/reset)
#[allow(dead_code)]
pub fn drop_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS footer_clicks;
        DROP TABLE IF EXISTS footer_links;
        DROP TABLE IF EXISTS threats;
        DROP TABLE IF EXISTS testimonials;
        DROP TABLE IF EXISTS network_assets;
        DROP TABLE IF EXISTS pen_tests;
        DROP TABLE IF EXISTS stress_scenarios;
        "#,
    )
    .context("Failed to drop tables")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).expect("Failed to create tables");

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"threats".to_string()));
        assert!(tables.contains(&"footer_links".to_string()));
        assert!(tables.contains(&"footer_clicks".to_string()));
        assert!(tables.contains(&"testimonials".to_string()));
        assert!(tables.contains(&"network_assets".to_string()));
        assert!(tables.contains(&"pen_tests".to_string()));
        assert!(tables.contains(&"stress_scenarios".to_string()));
    }

    #[test]
    fn test_legacy_threats_schema_migrates_version_column() {
        let conn = Connection::open_in_memory().unwrap();

        // Simulate an older threats schema without version.
        conn.execute_batch(
            r#"
            CREATE TABLE threats (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                honeypot_id TEXT NOT NULL,
                threat_type TEXT NOT NULL,
                severity TEXT NOT NULL,
                source_ip TEXT NOT NULL,
                location TEXT,
                attack_vector TEXT,
                detection_time TEXT NOT NULL DEFAULT (datetime('now')),
                status TEXT NOT NULL DEFAULT 'Active',
                details TEXT,
                created_by INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )
        .unwrap();

        create_tables(&conn).expect("Legacy schema migration should succeed");

        let has_version: bool = conn
            .prepare("PRAGMA table_info(threats)")
            .unwrap()
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .filter_map(|r| r.ok())
            .any(|name| name == "version");

        assert!(has_version, "threats.version should be added for legacy DBs");
    }
}
