//! Query plans — SQL text paired with its positional parameters.
//!
//! Every statement this crate sends to the store is a [`QueryPlan`]. Plans
//! are assembled with [`PlanBuilder`] (or [`InsertBuilder`] for inserts),
//! which hands out `$N` placeholders from a counter local to one build, so
//! the Nth placeholder in the text always lines up with the Nth parameter.

use std::fmt;
use std::fmt::Write as _;

use serde::Serialize;

// ---------------------------------------------------------------------------
// SqlParam
// ---------------------------------------------------------------------------

/// A single positional parameter bound at execution time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlParam {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for SqlParam {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for SqlParam {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

// ---------------------------------------------------------------------------
// Placeholder
// ---------------------------------------------------------------------------

/// A `$N` marker returned by [`PlanBuilder::bind`]. Displays as `$N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(usize);

impl Placeholder {
    /// 1-based position of the parameter this placeholder refers to.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

// ---------------------------------------------------------------------------
// QueryPlan
// ---------------------------------------------------------------------------

/// SQL text with `$1..$N` placeholders and the `N` parameters they refer to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPlan {
    sql: String,
    params: Vec<SqlParam>,
}

impl QueryPlan {
    /// A plan with no parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// Indices of every `$N` token in the text, in the order they appear.
    pub fn placeholder_indices(&self) -> Vec<usize> {
        let bytes = self.sql.as_bytes();
        let mut indices = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'$' {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                if end > start {
                    if let Ok(n) = self.sql[start..end].parse() {
                        indices.push(n);
                    }
                }
                i = end.max(start);
            } else {
                i += 1;
            }
        }
        indices
    }

    /// `true` when the placeholders read `$1, $2, …, $N` in text order and
    /// `N` equals the number of parameters.
    pub fn is_well_numbered(&self) -> bool {
        self.placeholder_indices()
            .into_iter()
            .eq(1..=self.params.len())
    }
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}

// ---------------------------------------------------------------------------
// PlanBuilder
// ---------------------------------------------------------------------------

/// Incrementally assembles a [`QueryPlan`].
///
/// Fragments are joined with a single space. `filter` opens the WHERE
/// clause on its first call and continues it with `AND` afterwards.
#[derive(Debug, Default)]
pub struct PlanBuilder {
    sql: String,
    params: Vec<SqlParam>,
    has_predicate: bool,
}

impl PlanBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            sql: base.into(),
            ..Self::default()
        }
    }

    pub fn push_sql(&mut self, fragment: &str) -> &mut Self {
        if !self.sql.is_empty() && !fragment.is_empty() {
            self.sql.push(' ');
        }
        self.sql.push_str(fragment);
        self
    }

    /// Append a parameter and return the placeholder that refers to it.
    pub fn bind(&mut self, value: impl Into<SqlParam>) -> Placeholder {
        self.params.push(value.into());
        Placeholder(self.params.len())
    }

    /// Append `WHERE <predicate> $N` (or `AND …` after the first predicate).
    ///
    /// `predicate` is the column and operator, e.g. `"cost_per_night >="`.
    pub fn filter(&mut self, predicate: &str, value: impl Into<SqlParam>) -> &mut Self {
        let keyword = if self.has_predicate { "AND" } else { "WHERE" };
        self.has_predicate = true;
        let placeholder = self.bind(value);
        self.push_sql(&format!("{keyword} {predicate} {placeholder}"))
    }

    /// Turn everything built so far into a subquery:
    /// `SELECT * FROM (<current>) AS <alias>`.
    ///
    /// Parameters are kept, so placeholders bound afterwards continue the
    /// numbering. The next `filter` opens a fresh outer WHERE clause.
    pub fn wrap_as_subquery(&mut self, alias: &str) -> &mut Self {
        self.sql = format!("SELECT * FROM ({}) AS {alias}", self.sql);
        self.has_predicate = false;
        self
    }

    /// Number of parameters bound so far.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn finish(self) -> QueryPlan {
        let plan = QueryPlan {
            sql: self.sql,
            params: self.params,
        };
        debug_assert!(plan.is_well_numbered(), "misnumbered plan: {}", plan.sql);
        plan
    }
}

// ---------------------------------------------------------------------------
// InsertBuilder
// ---------------------------------------------------------------------------

/// Builds `INSERT INTO <table> (<columns>) VALUES (<placeholders>) RETURNING *`.
///
/// Column names are `'static` identifiers chosen by calling code; only
/// values travel as parameters.
#[derive(Debug)]
pub struct InsertBuilder {
    table: &'static str,
    values: Vec<(&'static str, SqlParam)>,
}

impl InsertBuilder {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            values: Vec::new(),
        }
    }

    pub fn value(mut self, column: &'static str, value: impl Into<SqlParam>) -> Self {
        self.values.push((column, value.into()));
        self
    }

    /// Like [`value`](Self::value) but skips the column when `value` is `None`.
    pub fn value_opt<T: Into<SqlParam>>(self, column: &'static str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.value(column, v),
            None => self,
        }
    }

    pub fn build(self) -> QueryPlan {
        if self.values.is_empty() {
            return QueryPlan::new(format!(
                "INSERT INTO {} DEFAULT VALUES RETURNING *",
                self.table
            ));
        }

        let mut plan = PlanBuilder::default();
        let mut columns = String::new();
        let mut placeholders = String::new();

        // Columns and placeholders are emitted together so they cannot drift.
        for (column, value) in self.values {
            if !columns.is_empty() {
                columns.push_str(", ");
                placeholders.push_str(", ");
            }
            columns.push_str(column);
            let placeholder = plan.bind(value);
            let _ = write!(placeholders, "{placeholder}");
        }

        plan.push_sql(&format!(
            "INSERT INTO {} ({columns}) VALUES ({placeholders}) RETURNING *",
            self.table
        ));
        plan.finish()
    }
}
