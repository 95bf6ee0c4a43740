//! Row query builder.
//!
//! Builds the query string understood by the hosted row API
//! (`column=op.value` filters, `select`, `order`, `limit`, `offset`).
//! The builder only renders pairs; URL encoding is left to `reqwest`.

use std::fmt::Display;

/// Sort direction for an ordering clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// A single `column=op.value` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    column: String,
    expression: String,
}

impl Filter {
    /// `column = value`.
    pub fn eq(column: impl Into<String>, value: impl Display) -> Self {
        Self::new(column, format!("eq.{value}"))
    }

    /// `column IS NULL`.
    pub fn is_null(column: impl Into<String>) -> Self {
        Self::new(column, "is.null".to_string())
    }

    /// `column = value`, or `column IS NULL` when the value is absent.
    ///
    /// Absence is a value of its own here: it must match rows stored without
    /// the column rather than skip the restriction.
    pub fn eq_or_null<V: Display>(column: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => Self::eq(column, v),
            None => Self::is_null(column),
        }
    }

    /// `column IN (values…)`.
    pub fn in_list<I>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let list = values
            .into_iter()
            .map(|v| quote_list_value(&v.to_string()))
            .collect::<Vec<_>>()
            .join(",");
        Self::new(column, format!("in.({list})"))
    }

    /// `column > value`.
    pub fn gt(column: impl Into<String>, value: impl Display) -> Self {
        Self::new(column, format!("gt.{value}"))
    }

    /// `column < value`.
    pub fn lt(column: impl Into<String>, value: impl Display) -> Self {
        Self::new(column, format!("lt.{value}"))
    }

    /// `column >= value`.
    pub fn gte(column: impl Into<String>, value: impl Display) -> Self {
        Self::new(column, format!("gte.{value}"))
    }

    /// Case-insensitive substring match.
    pub fn contains_ci(column: impl Into<String>, needle: &str) -> Self {
        // `*` is the wildcard in URL filters; strip any the user typed.
        let needle: String = needle.chars().filter(|c| *c != '*' && *c != '%').collect();
        Self::new(column, format!("ilike.*{needle}*"))
    }

    fn new(column: impl Into<String>, expression: String) -> Self {
        Self {
            column: column.into(),
            expression,
        }
    }

    /// The filtered column.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The `op.value` expression.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    fn to_pair(&self) -> (String, String) {
        (self.column.clone(), self.expression.clone())
    }
}

/// Quote a value inside an `in.(…)` list when it contains reserved characters.
fn quote_list_value(value: &str) -> String {
    if value.contains([',', '(', ')', '"', ' ', '\\']) {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

/// A read query against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    table: String,
    columns: String,
    filters: Vec<Filter>,
    order: Vec<String>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl Select {
    /// Select every column from a table.
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Set the column list, including embedded relations
    /// (e.g., `*,profiles(username,avatar_url)`).
    #[must_use]
    pub fn columns(mut self, columns: &str) -> Self {
        // Embedded selects are often written across lines; the API rejects whitespace.
        self.columns = columns.split_whitespace().collect();
        self
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add a filter when present.
    #[must_use]
    pub fn filter_opt(self, filter: Option<Filter>) -> Self {
        match filter {
            Some(f) => self.filter(f),
            None => self,
        }
    }

    /// Append an ordering clause. Earlier clauses take precedence.
    #[must_use]
    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order.push(format!("{column}.{}", direction.as_str()));
        self
    }

    /// Limit the number of rows returned.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip rows before returning.
    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Restrict to one page of `page_size` rows.
    #[must_use]
    pub const fn page(self, page: u32, page_size: u32) -> Self {
        self.offset(page.saturating_mul(page_size)).limit(page_size)
    }

    /// The queried table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The filters applied so far.
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Render the query string pairs.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.columns.clone())];
        pairs.extend(self.filters.iter().map(Filter::to_pair));
        if !self.order.is_empty() {
            pairs.push(("order".to_string(), self.order.join(",")));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

/// Render filters alone, for writes (`PATCH`/`DELETE`).
#[must_use]
pub fn filter_pairs(filters: &[Filter]) -> Vec<(String, String)> {
    filters.iter().map(Filter::to_pair).collect()
}
