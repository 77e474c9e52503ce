//! Paged query engine
//!
//! Serves ordered, filtered, paged slices of table records. Field names are
//! checked against per-table allowlists before being interpolated into SQL;
//! values always travel as bound parameters. Ordering is stable: the record
//! id is a secondary ascending sort key in both directions, so records with
//! equal sort-key values keep their insertion order.

use rusqlite::Connection;

use crate::config::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::{FarmError, FarmResult};

/// Equality filter on a single field. Filters combine with AND.
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub value: String,
}

impl Filter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A page request. Page numbers are 1-based; out-of-range pages return an
/// empty slice rather than an error. Page sizes above [`MAX_PAGE_SIZE`] are
/// clamped.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page_no: u32,
    pub page_size: u32,
    pub order_by: String,
    pub ascending: bool,
    pub filters: Vec<Filter>,
}

impl PageRequest {
    pub fn new(order_by: impl Into<String>) -> Self {
        Self {
            page_no: 1,
            page_size: DEFAULT_PAGE_SIZE,
            order_by: order_by.into(),
            ascending: false,
            filters: Vec::new(),
        }
    }

    pub fn with_page(mut self, page_no: u32, page_size: u32) -> Self {
        self.page_no = page_no;
        self.page_size = page_size;
        self
    }

    pub fn ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(Filter::new(field, value));
        self
    }
}

/// A page of records plus the total match count across all pages.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
}

/// Static description of a queryable table: which columns are selected and
/// which fields may appear in ORDER BY / filters.
pub(crate) struct TableSpec {
    pub name: &'static str,
    pub select_columns: &'static str,
    pub sortable: &'static [&'static str],
    pub filterable: &'static [&'static str],
}

impl TableSpec {
    fn check_order_field<'a>(&self, field: &'a str) -> FarmResult<&'a str> {
        if self.sortable.contains(&field) {
            Ok(field)
        } else {
            Err(FarmError::validation(format!(
                "Cannot order {} by field '{}'",
                self.name, field
            )))
        }
    }

    fn check_filter_field<'a>(&self, field: &'a str) -> FarmResult<&'a str> {
        if self.filterable.contains(&field) {
            Ok(field)
        } else {
            Err(FarmError::validation(format!(
                "Cannot filter {} by field '{}'",
                self.name, field
            )))
        }
    }
}

/// Run a page query against a table.
///
/// The row mapper receives columns in the order of `spec.select_columns`.
pub(crate) fn fetch_page<T>(
    conn: &Connection,
    spec: &TableSpec,
    req: &PageRequest,
    map_row: impl Fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
) -> FarmResult<Page<T>> {
    if req.page_no < 1 {
        return Err(FarmError::validation("Page number must be at least 1"));
    }
    if req.page_size < 1 {
        return Err(FarmError::validation("Page size must be at least 1"));
    }

    let order_field = spec.check_order_field(&req.order_by)?;
    let direction = if req.ascending { "ASC" } else { "DESC" };
    let page_size = req.page_size.min(MAX_PAGE_SIZE) as i64;
    let offset = (req.page_no as i64 - 1) * page_size;

    let mut where_sql = String::new();
    for (i, filter) in req.filters.iter().enumerate() {
        let field = spec.check_filter_field(&filter.field)?;
        if i == 0 {
            where_sql.push_str(" WHERE ");
        } else {
            where_sql.push_str(" AND ");
        }
        where_sql.push_str(&format!("{} = ?{}", field, i + 1));
    }

    let count_sql = format!("SELECT COUNT(*) FROM {}{}", spec.name, where_sql);
    let filter_params: Vec<&dyn rusqlite::ToSql> = req
        .filters
        .iter()
        .map(|f| &f.value as &dyn rusqlite::ToSql)
        .collect();

    let total_count: i64 =
        conn.query_row(&count_sql, filter_params.as_slice(), |row| row.get(0))?;

    // Secondary id ASC keeps equal-key records in insertion order for both
    // directions.
    let select_sql = format!(
        "SELECT {} FROM {}{} ORDER BY {} {}, id ASC LIMIT ?{} OFFSET ?{}",
        spec.select_columns,
        spec.name,
        where_sql,
        order_field,
        direction,
        req.filters.len() + 1,
        req.filters.len() + 2,
    );

    let mut params = filter_params;
    params.push(&page_size);
    params.push(&offset);

    let mut stmt = conn.prepare(&select_sql)?;
    let items = stmt
        .query_map(params.as_slice(), map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(Page { items, total_count })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: TableSpec = TableSpec {
        name: "samples",
        select_columns: "id, label",
        sortable: &["id", "label", "rank"],
        filterable: &["label"],
    };

    fn sample_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE samples (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                label TEXT NOT NULL,
                rank INTEGER NOT NULL DEFAULT 0
            );
            INSERT INTO samples (label, rank) VALUES ('a', 2), ('b', 1), ('c', 1), ('d', 3);
            "#,
        )
        .unwrap();
        conn
    }

    fn labels(page: &Page<(i64, String)>) -> Vec<&str> {
        page.items.iter().map(|(_, l)| l.as_str()).collect()
    }

    fn map_sample(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, String)> {
        Ok((row.get(0)?, row.get(1)?))
    }

    #[test]
    fn test_rejects_unknown_order_field() {
        let conn = sample_conn();
        let req = PageRequest::new("label; DROP TABLE samples");
        let err = fetch_page(&conn, &SAMPLES, &req, map_sample).unwrap_err();
        assert!(matches!(err, FarmError::ValidationFailed(_)));
    }

    #[test]
    fn test_rejects_unknown_filter_field() {
        let conn = sample_conn();
        let req = PageRequest::new("id").with_filter("rank", "1");
        let err = fetch_page(&conn, &SAMPLES, &req, map_sample).unwrap_err();
        assert!(matches!(err, FarmError::ValidationFailed(_)));
    }

    #[test]
    fn test_rejects_zero_page() {
        let conn = sample_conn();
        let req = PageRequest::new("id").with_page(0, 10);
        assert!(fetch_page(&conn, &SAMPLES, &req, map_sample).is_err());
        let req = PageRequest::new("id").with_page(1, 0);
        assert!(fetch_page(&conn, &SAMPLES, &req, map_sample).is_err());
    }

    #[test]
    fn test_out_of_range_page_is_empty_not_error() {
        let conn = sample_conn();
        let req = PageRequest::new("id").with_page(99, 10);
        let page = fetch_page(&conn, &SAMPLES, &req, map_sample).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 4);
    }

    #[test]
    fn test_equal_keys_keep_insertion_order_both_directions() {
        let conn = sample_conn();

        // rank: a=2, b=1, c=1, d=3. b and c tie; b was inserted first.
        let asc = fetch_page(
            &conn,
            &SAMPLES,
            &PageRequest::new("rank").ascending(true),
            map_sample,
        )
        .unwrap();
        assert_eq!(labels(&asc), vec!["b", "c", "a", "d"]);

        let desc = fetch_page(
            &conn,
            &SAMPLES,
            &PageRequest::new("rank").ascending(false),
            map_sample,
        )
        .unwrap();
        assert_eq!(labels(&desc), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn test_pages_concatenate_without_gaps_or_duplicates() {
        let conn = sample_conn();
        let mut seen = Vec::new();
        for page_no in 1..=2 {
            let req = PageRequest::new("id").ascending(true).with_page(page_no, 2);
            let page = fetch_page(&conn, &SAMPLES, &req, map_sample).unwrap();
            assert!(page.items.len() <= 2);
            seen.extend(labels(&page).into_iter().map(str::to_string));
        }
        assert_eq!(seen, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_filters_and_combined_with_count() {
        let conn = sample_conn();
        let req = PageRequest::new("id").ascending(true).with_filter("label", "b");
        let page = fetch_page(&conn, &SAMPLES, &req, map_sample).unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(labels(&page), vec!["b"]);
    }
}
