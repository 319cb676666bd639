//! Query executors.
//!
//! The pipeline hands a [`ListQuery`] to an executor, which owns the actual
//! database session. Executors must not retry; failures propagate to the
//! caller.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::query_builder::ListQueryBuilder;
use super::types::ListQuery;

/// Counts and fetches records for a listing query.
#[async_trait]
pub trait ListExecutor: Send + Sync {
    /// Number of records matching the query's filters.
    async fn count(&self, query: &ListQuery) -> Result<u64>;

    /// Records matching the query, ordered, skipping `offset` and returning
    /// at most `limit`. Each record is a JSON object keyed by column.
    async fn fetch(&self, query: &ListQuery, offset: u64, limit: u64)
    -> Result<Vec<serde_json::Value>>;
}

/// Executor backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgListExecutor {
    pool: PgPool,
}

impl PgListExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListExecutor for PgListExecutor {
    async fn count(&self, query: &ListQuery) -> Result<u64> {
        let sql = ListQueryBuilder::new(query).build_count();
        debug!(table = %query.table, %sql, "count query");

        let total: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .context("failed to execute count query")?;

        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn fetch(
        &self,
        query: &ListQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<serde_json::Value>> {
        let sql = ListQueryBuilder::new(query).build_window(offset, limit);
        debug!(table = %query.table, %sql, "page query");

        let rows: Vec<serde_json::Value> =
            sqlx::query_scalar(&format!("SELECT row_to_json(t) FROM ({sql}) t"))
                .fetch_all(&self.pool)
                .await
                .context("failed to execute page query")?;

        Ok(rows)
    }
}
