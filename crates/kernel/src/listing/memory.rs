//! In-memory executor over JSON rows.
//!
//! Mirrors PostgreSQL semantics closely enough for fixtures and tests:
//! NULL or missing values never satisfy a comparison, and sort after every
//! other value when ascending (before them when descending).

use std::cmp::Ordering;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::executor::ListExecutor;
use super::types::{FilterOperator, ListFilter, ListQuery, SortDirection};
use crate::resources::FieldValue;

/// Executor holding its rows in memory, in natural (insertion) order.
#[derive(Debug, Clone, Default)]
pub struct MemoryListExecutor {
    rows: Vec<Value>,
}

impl MemoryListExecutor {
    pub fn new(rows: Vec<Value>) -> Self {
        Self { rows }
    }

    /// Load rows from a JSON array.
    pub fn from_json(json: &str) -> Result<Self> {
        let rows: Vec<Value> =
            serde_json::from_str(json).context("fixture must be a JSON array of objects")?;
        if let Some(pos) = rows.iter().position(|r| !r.is_object()) {
            anyhow::bail!("fixture row {pos} is not a JSON object");
        }
        Ok(Self::new(rows))
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    /// Matching rows in query order.
    fn select(&self, query: &ListQuery) -> Vec<&Value> {
        let mut matched: Vec<&Value> = self
            .rows
            .iter()
            .filter(|row| query.filters.iter().all(|f| matches_filter(row, f)))
            .collect();

        // Stable sort keeps natural order for full ties.
        matched.sort_by(|a, b| {
            query
                .sorts
                .iter()
                .map(|sort| {
                    let ord = compare_nullable(a.get(&sort.field), b.get(&sort.field));
                    match sort.direction {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    }
                })
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
        });

        matched
    }
}

#[async_trait]
impl ListExecutor for MemoryListExecutor {
    async fn count(&self, query: &ListQuery) -> Result<u64> {
        let total = self
            .rows
            .iter()
            .filter(|row| query.filters.iter().all(|f| matches_filter(row, f)))
            .count();
        Ok(total as u64)
    }

    async fn fetch(&self, query: &ListQuery, offset: u64, limit: u64) -> Result<Vec<Value>> {
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(self
            .select(query)
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|row| project(row, &query.columns))
            .collect())
    }
}

fn project(row: &Value, columns: &[String]) -> Value {
    let Some(object) = row.as_object() else {
        return row.clone();
    };
    let projected = columns
        .iter()
        .map(|c| (c.clone(), object.get(c).cloned().unwrap_or(Value::Null)))
        .collect();
    Value::Object(projected)
}

fn matches_filter(row: &Value, filter: &ListFilter) -> bool {
    let Some(ord) = row
        .get(&filter.field)
        .and_then(|cell| compare_cell(cell, &filter.value))
    else {
        return false;
    };

    match filter.operator {
        FilterOperator::Equals => ord.is_eq(),
        FilterOperator::GreaterThan => ord.is_gt(),
        FilterOperator::GreaterOrEqual => ord.is_ge(),
        FilterOperator::LessThan => ord.is_lt(),
        FilterOperator::LessOrEqual => ord.is_le(),
    }
}

/// Compare a stored cell against a filter value (`cell` on the left).
///
/// Returns `None` for NULL or for cells that cannot hold the value's type.
fn compare_cell(cell: &Value, value: &FieldValue) -> Option<Ordering> {
    match value {
        FieldValue::Integer(v) => match cell.as_i64() {
            Some(c) => Some(c.cmp(v)),
            None => cell.as_f64()?.partial_cmp(&(*v as f64)),
        },
        FieldValue::Decimal(v) => cell.as_f64()?.partial_cmp(v),
        FieldValue::Text(v) => Some(cell.as_str()?.cmp(v.as_str())),
        FieldValue::Date(v) => {
            let c = cell.as_str()?;
            let date = NaiveDate::parse_from_str(c, "%Y-%m-%d")
                .ok()
                .or_else(|| parse_cell_datetime(c).map(|dt| dt.date()))?;
            Some(date.cmp(v))
        }
        FieldValue::DateTime(v) => Some(parse_cell_datetime(cell.as_str()?)?.cmp(v)),
        FieldValue::Boolean(v) => Some(cell.as_bool()?.cmp(v)),
    }
}

fn parse_cell_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Total order over cells of one column, NULL/missing last.
fn compare_nullable(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => compare_values(a, b),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .unwrap_or_default()
                .total_cmp(&y.as_f64().unwrap_or_default()),
        },
        // ISO dates and timestamps order correctly as strings.
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
