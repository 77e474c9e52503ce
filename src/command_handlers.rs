//! CLI command implementations

use anyhow::{anyhow, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::aggregator::{farm_stats, section_click_totals, top_threat_type, ThreatStats};
use crate::config::SEED_USER_ID;
use crate::query::PageRequest;
use crate::session::{IdentityProvider, StaticIdentity, UserContext};
use crate::sim::{SimulatedFeed, ThreatFeed};
use crate::store::{footer, seed, threats, Database};
use crate::{log_info, log_warn};

fn open_database() -> Result<Database> {
    Database::new(Database::default_path()).context("Failed to open telemetry database")
}

fn cli_user() -> Result<UserContext> {
    // The CLI runs as the local operator; a hosted deployment substitutes a
    // real identity provider here.
    let provider = StaticIdentity::new(SEED_USER_ID, "operator");
    let user = provider.current_user()?;
    Ok(UserContext::from(&user))
}

pub(crate) fn handle_seed() -> Result<()> {
    let db = open_database()?;
    let conn = db.connection();
    let conn = conn
        .lock()
        .map_err(|_| anyhow!("Database connection lock poisoned"))?;

    // Footer links seed automatically on first open; testimonials are
    // seeded here, gated on an empty table.
    let testimonial_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM testimonials", [], |row| row.get(0))?;
    if testimonial_count == 0 {
        seed::seed_testimonials(&conn)?;
        log_info!("Seeded sample testimonials");
    } else {
        log_warn!("Testimonials already present, skipping seed");
    }

    println!("Database ready at {}", db.path().display());
    Ok(())
}

pub(crate) fn handle_simulate(count: usize) -> Result<()> {
    let db = open_database()?;
    let conn = db.connection();
    let conn = conn
        .lock()
        .map_err(|_| anyhow!("Database connection lock poisoned"))?;
    let user = cli_user()?;

    let mut feed = SimulatedFeed::new(StdRng::from_entropy());
    let mut inserted = 0usize;
    for threat in feed.collect(count) {
        threats::insert_threat(&conn, &threat, &user)?;
        inserted += 1;
    }

    log_info!("Simulated {} threat detections", inserted);
    println!("Inserted {} simulated threats", inserted);
    Ok(())
}

pub(crate) fn handle_threats(
    page: u32,
    page_size: u32,
    severity: Option<String>,
    status: Option<String>,
) -> Result<()> {
    let db = open_database()?;
    let conn = db.connection();
    let conn = conn
        .lock()
        .map_err(|_| anyhow!("Database connection lock poisoned"))?;

    let mut req = PageRequest::new("detection_time").with_page(page, page_size);
    if let Some(severity) = severity {
        req = req.with_filter("severity", severity);
    }
    if let Some(status) = status {
        req = req.with_filter("status", status);
    }

    let result = threats::page_threats(&conn, &req)?;
    println!(
        "Page {} ({} of {} matching threats)",
        page,
        result.items.len(),
        result.total_count
    );
    for threat in &result.items {
        println!(
            "  [{}] {} {} from {} ({}) {} [v{}]",
            threat.id,
            threat.detection_time.format("%Y-%m-%d %H:%M:%S"),
            threat.threat_type,
            threat.source_ip,
            threat.severity,
            threat.status,
            threat.version,
        );
    }
    Ok(())
}

pub(crate) fn handle_stats() -> Result<()> {
    let db = open_database()?;
    let conn = db.connection();
    let conn = conn
        .lock()
        .map_err(|_| anyhow!("Database connection lock poisoned"))?;

    let stats = farm_stats(&conn)?;
    println!("Threats:     {} total, {} active", stats.total_threats, stats.active_threats);
    println!("Critical:    {}", stats.critical_threats);
    println!("Last 24h:    {}", stats.threats_24h);
    println!("Links:       {} ({} clicks)", stats.total_links, stats.total_clicks);
    if let Some(last) = stats.last_detection_time {
        println!("Last event:  {}", last.format("%Y-%m-%d %H:%M:%S"));
    }

    let all = threats::all_threats(&conn)?;
    let tally = ThreatStats::compute(&all);
    println!(
        "By severity: {} critical / {} high / {} medium / {} low",
        tally.critical, tally.high, tally.medium, tally.low
    );
    if let Some((threat_type, count)) = top_threat_type(&all) {
        println!("Top type:    {} ({}x)", threat_type, count);
    }
    Ok(())
}

pub(crate) fn handle_links() -> Result<()> {
    let db = open_database()?;
    let conn = db.connection();
    let conn = conn
        .lock()
        .map_err(|_| anyhow!("Database connection lock poisoned"))?;

    let links = footer::list_links(&conn)?;
    let totals = section_click_totals(&links);

    let mut current_section = String::new();
    for link in &links {
        if link.section_name != current_section {
            current_section = link.section_name.clone();
            let section_total = totals.get(&current_section).copied().unwrap_or(0);
            println!("{} ({} clicks)", current_section, section_total);
        }
        println!(
            "  [{}] {} -> {} ({} clicks{})",
            link.id,
            link.title,
            link.url,
            link.click_count,
            if link.is_active { "" } else { ", inactive" },
        );
    }
    Ok(())
}

pub(crate) fn handle_track_click(id: i64) -> Result<()> {
    let db = open_database()?;
    let conn = db.connection();
    let conn = conn
        .lock()
        .map_err(|_| anyhow!("Database connection lock poisoned"))?;

    let link = footer::list_links(&conn)?
        .into_iter()
        .find(|l| l.id == id)
        .ok_or(crate::FarmError::NotFound {
            entity: "footer link",
            id,
        })?;

    let count = footer::track_click(&conn, id, &link.title, &link.url)?;
    println!("'{}' now has {} clicks", link.title, count);
    Ok(())
}

pub(crate) fn handle_resolve(id: i64, status: String, expected_version: i64) -> Result<()> {
    let db = open_database()?;
    let conn = db.connection();
    let conn = conn
        .lock()
        .map_err(|_| anyhow!("Database connection lock poisoned"))?;

    let status: crate::ThreatStatus = status
        .parse()
        .map_err(|e: String| crate::FarmError::ValidationFailed(e))?;

    threats::update_threat_status(&conn, id, status, expected_version)?;
    println!("Threat {} is now {}", id, status);
    Ok(())
}
