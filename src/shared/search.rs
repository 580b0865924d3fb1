//! Text-filter helpers shared by the list endpoints.
//!
//! A filter matches when the column contains the value, ignoring case.
//! Without any filter the caller gets the most recent page of rows.

use sqlx::{Postgres, QueryBuilder};

/// Row caps for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Cap applied when no filter is present
    pub page_size: i64,
    /// Cap applied when at least one filter is present
    pub max_results: i64,
}

impl SearchLimits {
    pub fn new(page_size: i64, max_results: i64) -> Self {
        Self {
            page_size: page_size.max(1),
            max_results: max_results.max(page_size).max(1),
        }
    }

    pub fn limit_for(&self, filters: &TextFilters) -> i64 {
        if filters.is_empty() {
            self.page_size
        } else {
            self.max_results
        }
    }
}

/// A column/substring pair. Columns always come from code, never from input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFilter {
    pub column: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFilters(Vec<TextFilter>);

impl TextFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter; blank and missing values are skipped.
    pub fn with(mut self, column: &'static str, value: Option<&str>) -> Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.0.push(TextFilter {
                column,
                value: v.to_string(),
            });
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Append `column ILIKE $n` conditions.
    ///
    /// `has_where` tells whether the query already carries a WHERE clause.
    pub fn push_conditions(&self, qb: &mut QueryBuilder<'_, Postgres>, has_where: bool) {
        for (i, filter) in self.0.iter().enumerate() {
            if i == 0 && !has_where {
                qb.push(" WHERE ");
            } else {
                qb.push(" AND ");
            }
            qb.push(filter.column);
            qb.push(" ILIKE ");
            qb.push_bind(contains_pattern(&filter.value));
        }
    }
}

/// Escape LIKE metacharacters and wrap the value for a substring match.
pub fn contains_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Build `SELECT <columns> FROM <table> [WHERE ...] ORDER BY <order_by> LIMIT $n`.
pub fn build_search_query<'a>(
    columns: &str,
    table: &str,
    filters: &TextFilters,
    order_by: &str,
    limits: SearchLimits,
) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", columns, table));
    filters.push_conditions(&mut qb, false);
    qb.push(format!(" ORDER BY {} LIMIT ", order_by));
    qb.push_bind(limits.limit_for(filters));
    qb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_filters_are_skipped() {
        let filters = TextFilters::new()
            .with("part_no", Some("  "))
            .with("serial_no", None)
            .with("description", Some("valve"));
        assert_eq!(filters.len(), 1);
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("valve"), "%valve%");
        assert_eq!(contains_pattern("50%"), "%50\\%%");
        assert_eq!(contains_pattern("P_N"), "%P\\_N%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_limits_depend_on_filters() {
        let limits = SearchLimits::new(50, 500);
        assert_eq!(limits.limit_for(&TextFilters::new()), 50);
        assert_eq!(
            limits.limit_for(&TextFilters::new().with("origin", Some("CGK"))),
            500
        );
    }

    #[test]
    fn test_limits_never_invert() {
        let limits = SearchLimits::new(100, 10);
        assert_eq!(limits.max_results, 100);
    }

    #[test]
    fn test_search_query_without_filters() {
        let qb = build_search_query(
            "*",
            "flight_records",
            &TextFilters::new(),
            "created_at DESC",
            SearchLimits::new(50, 500),
        );
        assert_eq!(
            qb.sql(),
            "SELECT * FROM flight_records ORDER BY created_at DESC LIMIT $1"
        );
    }

    #[test]
    fn test_search_query_with_filters() {
        let filters = TextFilters::new()
            .with("aircraft_registration", Some("pk-"))
            .with("origin", Some("cgk"));
        let qb = build_search_query(
            "*",
            "flight_records",
            &filters,
            "created_at DESC",
            SearchLimits::new(50, 500),
        );
        assert_eq!(
            qb.sql(),
            "SELECT * FROM flight_records WHERE aircraft_registration ILIKE $1 AND origin ILIKE $2 ORDER BY created_at DESC LIMIT $3"
        );
    }
}
