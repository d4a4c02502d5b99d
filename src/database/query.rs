//! PostgREST query builder

use std::fmt::Display;

/// Filters and modifiers for a PostgREST request, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns to return, e.g. `"age, family_size"`
    #[must_use]
    pub fn select(self, columns: &str) -> Self {
        let columns: Vec<&str> = columns.split(',').map(str::trim).collect();
        self.param("select", columns.join(","))
    }

    /// `column = value`
    #[must_use]
    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.param(column, format!("eq.{value}"))
    }

    /// `column <> value`
    #[must_use]
    pub fn neq(self, column: &str, value: impl Display) -> Self {
        self.param(column, format!("neq.{value}"))
    }

    /// `column IN (values...)`
    #[must_use]
    pub fn in_list<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        let values: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
        self.param(column, format!("in.({})", values.join(",")))
    }

    /// Sort by `column`, descending when `desc` is set
    #[must_use]
    pub fn order(self, column: &str, desc: bool) -> Self {
        let direction = if desc { "desc" } else { "asc" };
        self.param("order", format!("{column}.{direction}"))
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    fn param(mut self, key: &str, value: String) -> Self {
        self.params.push((key.to_string(), value));
        self
    }
}
