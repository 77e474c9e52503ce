//! Default content seeding
//!
//! Pre-loaded footer links and sample testimonials. Seeding is a plain
//! per-row insert loop: a failure aborts the remaining inserts and leaves
//! the rows already written in place (no rollback). Callers that need
//! idempotency gate on an empty table, as `Database::initialize` does.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::config::SEED_USER_ID;

/// Seed the default footer content: social media, contact, quick links and
/// legal sections.
pub fn seed_footer_links(conn: &Connection) -> Result<()> {
    let links = vec![
        // Social media
        ("social_media", "LinkedIn", "https://linkedin.com/company/honeypotz", "Linkedin", true, 1),
        ("social_media", "Twitter", "https://twitter.com/honeypotz", "Twitter", true, 2),
        ("social_media", "GitHub", "https://github.com/honeypotz", "Github", true, 3),
        ("social_media", "YouTube", "https://youtube.com/@honeypotz", "Youtube", true, 4),
        // Contact methods
        ("contact", "Email Support", "mailto:support@honeypotz.com", "Mail", true, 1),
        ("contact", "Phone Support", "tel:+1-800-HONEYPOT", "Phone", true, 2),
        ("contact", "Live Chat", "#chat", "MessageCircle", false, 3),
        // Quick links
        ("quick_links", "Documentation", "/docs", "BookOpen", false, 5),
        ("quick_links", "API Reference", "/api-docs", "Code", false, 6),
        ("quick_links", "Security Blog", "/blog", "Newspaper", false, 7),
        // Legal
        ("legal", "Privacy Policy", "/privacy", "Shield", false, 1),
        ("legal", "Terms of Service", "/terms", "FileText", false, 2),
        ("legal", "Cookie Policy", "/cookies", "Cookie", false, 3),
    ];

    for (section, title, url, icon, is_external, display_order) in links {
        conn.execute(
            r#"
            INSERT INTO footer_links (
                section_name, title, url, icon, is_external, display_order,
                is_active, click_count, created_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, 0, ?7)
            "#,
            params![section, title, url, icon, is_external as i32, display_order, SEED_USER_ID],
        )
        .with_context(|| format!("Failed to seed footer link '{}'", title))?;
    }

    Ok(())
}

/// Seed sample testimonials for the marketing site.
pub fn seed_testimonials(conn: &Connection) -> Result<()> {
    let testimonials = vec![
        (
            "CyberTech Solutions",
            "Sarah Johnson",
            "Chief Information Security Officer",
            "HoneyPot Farm has revolutionized our threat detection capabilities. We've identified and mitigated over 200 potential breaches in just the first month.",
            5,
            true,
            "Preventing Advanced Persistent Threats",
        ),
        (
            "SecureBank International",
            "Michael Chen",
            "Head of Cybersecurity",
            "The scalable infrastructure and multi-cloud deployment capabilities have streamlined our security operations across 15 data centers.",
            5,
            true,
            "Banking Security at Scale",
        ),
        (
            "DataGuard Corporation",
            "Emily Rodriguez",
            "Senior Security Analyst",
            "The intuitive dashboard and automated reporting features have transformed how we analyze and respond to security incidents.",
            4,
            false,
            "Operational Efficiency Boost",
        ),
        (
            "TechStart Innovations",
            "David Kumar",
            "IT Security Manager",
            "Sophisticated threat detection that's easy to deploy and manage - exactly what a growing startup needs.",
            5,
            false,
            "Startup Security Success",
        ),
    ];

    for (company, customer, position, text, rating, featured, case_study) in testimonials {
        conn.execute(
            r#"
            INSERT INTO testimonials (
                company_name, customer_name, position, testimonial_text, rating,
                is_featured, case_study_title, created_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                company,
                customer,
                position,
                text,
                rating,
                featured as i32,
                case_study,
                SEED_USER_ID
            ],
        )
        .with_context(|| format!("Failed to seed testimonial for '{}'", company))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::create_tables;

    #[test]
    fn test_seed_footer_links() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        seed_footer_links(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM footer_links", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 13);

        let sections: i64 = conn
            .query_row(
                "SELECT COUNT(DISTINCT section_name) FROM footer_links",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(sections, 4);

        // Click counters always start at zero.
        let clicked: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM footer_links WHERE click_count != 0",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(clicked, 0);
    }

    #[test]
    fn test_seed_testimonials() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        seed_testimonials(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM testimonials", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_seed_failure_leaves_partial_rows() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        // Fail the fourth insert; the first three must stay.
        conn.execute_batch(
            r#"
            CREATE TRIGGER fail_fourth_link
            BEFORE INSERT ON footer_links
            WHEN (SELECT COUNT(*) FROM footer_links) >= 3
            BEGIN
                SELECT RAISE(FAIL, 'forced seed failure');
            END;
            "#,
        )
        .unwrap();

        assert!(seed_footer_links(&conn).is_err());

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM footer_links", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 3, "rows inserted before the failure stay committed");
    }
}
