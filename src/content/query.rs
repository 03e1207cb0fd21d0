use serde_json::Value;
use std::fmt;

use super::record::ContentRecord;

/// Scalar compared for equality by a column filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl FilterValue {
    pub fn to_json(&self) -> Value {
        match self {
            FilterValue::Bool(b) => Value::Bool(*b),
            FilterValue::Int(i) => Value::from(*i),
            FilterValue::Text(s) => Value::String(s.clone()),
        }
    }

    /// Loose equality against a record field, for backends filtered locally.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (FilterValue::Bool(b), Value::Bool(v)) => b == v,
            (FilterValue::Bool(b), Value::Number(n)) => n.as_i64().map(|n| n != 0) == Some(*b),
            (FilterValue::Int(i), Value::Number(n)) => n.as_i64() == Some(*i),
            (FilterValue::Int(i), Value::String(s)) => s.trim().parse::<i64>().ok() == Some(*i),
            (FilterValue::Text(t), Value::String(s)) => t == s,
            (FilterValue::Text(t), Value::Number(n)) => *t == n.to_string(),
            (FilterValue::Text(t), Value::Bool(b)) => *t == b.to_string(),
            _ => false,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Int(i) => write!(f, "{}", i),
            FilterValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Single,
    List,
}

/// What to read from a backend: one collection, equality filters, an
/// optional visibility column (must be true), an optional ascending sort
/// column, and whether one row or all rows are wanted.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDescriptor {
    pub collection: String,
    pub filters: Vec<(String, FilterValue)>,
    pub visibility: Option<String>,
    pub order_by: Option<String>,
    pub mode: FetchMode,
}

impl QueryDescriptor {
    pub fn single(collection: impl Into<String>) -> Self {
        Self::new(collection, FetchMode::Single)
    }

    pub fn list(collection: impl Into<String>) -> Self {
        Self::new(collection, FetchMode::List)
    }

    fn new(collection: impl Into<String>, mode: FetchMode) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
            visibility: None,
            order_by: None,
            mode,
        }
    }

    pub fn filter(mut self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    pub fn visible_when(mut self, column: impl Into<String>) -> Self {
        self.visibility = Some(column.into());
        self
    }

    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    pub fn is_single(&self) -> bool {
        self.mode == FetchMode::Single
    }

    /// Explicit filters plus `visibility = true`.
    pub fn effective_filters(&self) -> Vec<(String, FilterValue)> {
        let mut filters = self.filters.clone();
        if let Some(column) = &self.visibility {
            filters.push((column.clone(), FilterValue::Bool(true)));
        }
        filters
    }

    /// Client-side evaluation of the filter set. A missing visibility field
    /// counts as visible; a missing filtered field does not match.
    pub fn matches(&self, record: &ContentRecord) -> bool {
        let filters_match = self.filters.iter().all(|(column, expected)| {
            record
                .get(column)
                .map(|value| expected.matches(value))
                .unwrap_or(false)
        });

        let visible = match &self.visibility {
            Some(column) => record.get_bool(column).unwrap_or(true),
            None => true,
        };

        filters_match && visible
    }
}
