//! Footer link management and click tracking
//!
//! Click counts change only through [`track_click`], which increments the
//! counter relative to its stored value inside SQL; two racing clicks can
//! never overwrite each other with a stale read.

use rusqlite::{params, Connection};

use super::datetime::parse_datetime_column;
use super::models::{FooterClickRecord, FooterLinkRecord};
use crate::error::{FarmError, FarmResult};
use crate::query::{fetch_page, Page, PageRequest, TableSpec};
use crate::session::UserContext;

const LINK_COLUMNS: &str = "id, section_name, title, url, icon, is_external, display_order, \
     is_active, click_count, created_by";

pub(crate) const FOOTER_LINKS_TABLE: TableSpec = TableSpec {
    name: "footer_links",
    select_columns: LINK_COLUMNS,
    sortable: &["id", "section_name", "display_order", "click_count", "title"],
    filterable: &["section_name", "is_active", "is_external"],
};

/// Fields for creating or updating a footer link.
#[derive(Debug, Clone)]
pub struct FooterLinkInput {
    pub section_name: String,
    pub title: String,
    pub url: String,
    pub icon: Option<String>,
    pub is_external: bool,
    pub display_order: i64,
    pub is_active: bool,
}

/// Insert a footer link. Click count always starts at zero.
pub fn insert_link(
    conn: &Connection,
    link: &FooterLinkInput,
    user: &UserContext,
) -> FarmResult<i64> {
    if link.section_name.trim().is_empty() {
        return Err(FarmError::validation("section_name is required"));
    }
    if link.title.trim().is_empty() {
        return Err(FarmError::validation("title is required"));
    }
    if link.url.trim().is_empty() {
        return Err(FarmError::validation("url is required"));
    }

    conn.execute(
        r#"
        INSERT INTO footer_links (
            section_name, title, url, icon, is_external, display_order, is_active, created_by
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            link.section_name,
            link.title,
            link.url,
            link.icon,
            link.is_external as i32,
            link.display_order,
            link.is_active as i32,
            user.user_id,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Update a footer link's editable fields. The click counter is not
/// touched here.
pub fn update_link(conn: &Connection, id: i64, link: &FooterLinkInput) -> FarmResult<()> {
    let updated = conn.execute(
        r#"
        UPDATE footer_links SET
            section_name = ?2, title = ?3, url = ?4, icon = ?5,
            is_external = ?6, display_order = ?7, is_active = ?8
        WHERE id = ?1
        "#,
        params![
            id,
            link.section_name,
            link.title,
            link.url,
            link.icon,
            link.is_external as i32,
            link.display_order,
            link.is_active as i32,
        ],
    )?;

    if updated == 0 {
        return Err(FarmError::NotFound {
            entity: "footer link",
            id,
        });
    }
    Ok(())
}

/// Toggle a link's active flag, returning the new value.
pub fn toggle_link_active(conn: &Connection, id: i64) -> FarmResult<bool> {
    let updated = conn.execute(
        "UPDATE footer_links SET is_active = 1 - is_active WHERE id = ?1",
        params![id],
    )?;
    if updated == 0 {
        return Err(FarmError::NotFound {
            entity: "footer link",
            id,
        });
    }
    let active: i32 = conn.query_row(
        "SELECT is_active FROM footer_links WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(active == 1)
}

/// Delete a footer link
pub fn delete_link(conn: &Connection, id: i64) -> FarmResult<()> {
    let deleted = conn.execute("DELETE FROM footer_links WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(FarmError::NotFound {
            entity: "footer link",
            id,
        });
    }
    Ok(())
}

/// List all links grouped for display: section name, then display order,
/// with ties broken by insertion id.
pub fn list_links(conn: &Connection) -> FarmResult<Vec<FooterLinkRecord>> {
    let sql = format!(
        "SELECT {} FROM footer_links ORDER BY section_name ASC, display_order ASC, id ASC",
        LINK_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let links = stmt
        .query_map([], map_link_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(links)
}

/// Serve a page of footer links
pub fn page_links(conn: &Connection, req: &PageRequest) -> FarmResult<Page<FooterLinkRecord>> {
    fetch_page(conn, &FOOTER_LINKS_TABLE, req, map_link_row)
}

/// Record a click: bump the counter by exactly one and append a timestamped
/// event. Counter and event commit together or not at all.
pub fn track_click(conn: &Connection, link_id: i64, title: &str, url: &str) -> FarmResult<i64> {
    if title.trim().is_empty() {
        return Err(FarmError::validation("title is required"));
    }

    conn.execute_batch("SAVEPOINT track_click")?;

    let result = (|| -> FarmResult<i64> {
        let updated = conn.execute(
            "UPDATE footer_links SET click_count = click_count + 1 WHERE id = ?1",
            params![link_id],
        )?;

        if updated == 0 {
            return Err(FarmError::NotFound {
                entity: "footer link",
                id: link_id,
            });
        }

        conn.execute(
            "INSERT INTO footer_clicks (link_id, title, url) VALUES (?1, ?2, ?3)",
            params![link_id, title, url],
        )?;

        let count: i64 = conn.query_row(
            "SELECT click_count FROM footer_links WHERE id = ?1",
            params![link_id],
            |row| row.get(0),
        )?;
        Ok(count)
    })();

    match result {
        Ok(count) => {
            conn.execute_batch("RELEASE SAVEPOINT track_click")?;
            Ok(count)
        }
        Err(e) => {
            let _ = conn
                .execute_batch("ROLLBACK TO SAVEPOINT track_click; RELEASE SAVEPOINT track_click");
            Err(e)
        }
    }
}

/// Recent click events for a link, newest first
pub fn link_clicks(conn: &Connection, link_id: i64, limit: i64) -> FarmResult<Vec<FooterClickRecord>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, link_id, title, url, clicked_at
        FROM footer_clicks
        WHERE link_id = ?1
        ORDER BY id DESC
        LIMIT ?2
        "#,
    )?;

    let clicks = stmt
        .query_map(params![link_id, limit], |row| {
            Ok(FooterClickRecord {
                id: row.get(0)?,
                link_id: row.get(1)?,
                title: row.get(2)?,
                url: row.get(3)?,
                clicked_at: parse_datetime_column(row.get::<_, String>(4)?, 4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(clicks)
}

fn map_link_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FooterLinkRecord> {
    Ok(FooterLinkRecord {
        id: row.get(0)?,
        section_name: row.get(1)?,
        title: row.get(2)?,
        url: row.get(3)?,
        icon: row.get(4)?,
        is_external: row.get::<_, i32>(5)? == 1,
        display_order: row.get(6)?,
        is_active: row.get::<_, i32>(7)? == 1,
        click_count: row.get(8)?,
        created_by: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Database;

    fn link(section: &str, title: &str, order: i64) -> FooterLinkInput {
        FooterLinkInput {
            section_name: section.to_string(),
            title: title.to_string(),
            url: format!("/{}", title.to_lowercase()),
            icon: None,
            is_external: false,
            display_order: order,
            is_active: true,
        }
    }

    fn test_db() -> Database {
        let db = Database::in_memory().unwrap();
        {
            let conn = db.connection();
            let conn = conn.lock().unwrap();
            // Start from an empty table; the default seed content is not
            // under test here.
            conn.execute("DELETE FROM footer_links", []).unwrap();
        }
        db
    }

    #[test]
    fn test_track_click_increments_and_records_event() {
        let db = test_db();
        let conn = db.connection();
        let conn = conn.lock().unwrap();
        let user = UserContext { user_id: 1 };

        let id = insert_link(&conn, &link("legal", "Privacy", 1), &user).unwrap();
        let count = track_click(&conn, id, "Privacy", "/privacy").unwrap();
        assert_eq!(count, 1);
        let count = track_click(&conn, id, "Privacy", "/privacy").unwrap();
        assert_eq!(count, 2);

        let events = link_clicks(&conn, id, 10).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Privacy");
    }

    #[test]
    fn test_track_click_unknown_link_is_not_found_and_no_event() {
        let db = test_db();
        let conn = db.connection();
        let conn = conn.lock().unwrap();

        assert!(matches!(
            track_click(&conn, 77, "Ghost", "/ghost"),
            Err(FarmError::NotFound { .. })
        ));

        let event_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM footer_clicks", [], |row| row.get(0))
            .unwrap();
        assert_eq!(event_count, 0, "failed click must leave no event row");
    }

    #[test]
    fn test_delete_nonexistent_link_is_not_found() {
        let db = test_db();
        let conn = db.connection();
        let conn = conn.lock().unwrap();

        assert!(matches!(
            delete_link(&conn, 42),
            Err(FarmError::NotFound { .. })
        ));
    }

    #[test]
    fn test_list_orders_by_section_then_display_order_then_id() {
        let db = test_db();
        let conn = db.connection();
        let conn = conn.lock().unwrap();
        let user = UserContext { user_id: 1 };

        insert_link(&conn, &link("social", "Twitter", 2), &user).unwrap();
        insert_link(&conn, &link("legal", "Privacy", 1), &user).unwrap();
        insert_link(&conn, &link("social", "LinkedIn", 1), &user).unwrap();
        // Same section + order as Twitter; inserted later, must sort after.
        insert_link(&conn, &link("social", "GitHub", 2), &user).unwrap();

        let titles: Vec<String> = list_links(&conn)
            .unwrap()
            .into_iter()
            .map(|l| l.title)
            .collect();
        assert_eq!(titles, vec!["Privacy", "LinkedIn", "Twitter", "GitHub"]);
    }

    #[test]
    fn test_update_and_toggle() {
        let db = test_db();
        let conn = db.connection();
        let conn = conn.lock().unwrap();
        let user = UserContext { user_id: 1 };

        let id = insert_link(&conn, &link("contact", "Email", 1), &user).unwrap();

        let mut edited = link("contact", "Email Support", 1);
        edited.is_external = true;
        update_link(&conn, id, &edited).unwrap();

        let active = toggle_link_active(&conn, id).unwrap();
        assert!(!active);

        let stored = list_links(&conn).unwrap().remove(0);
        assert_eq!(stored.title, "Email Support");
        assert!(stored.is_external);
        assert!(!stored.is_active);

        assert!(matches!(
            update_link(&conn, 9999, &edited),
            Err(FarmError::NotFound { .. })
        ));
    }
}
