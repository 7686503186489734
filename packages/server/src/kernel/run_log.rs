//! Append-only log of page runs.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use super::BaseRunLog;
use crate::domains::landing_pages::models::PageRun;

/// Stores runs in the `page_runs` table.
pub struct PostgresRunLog {
    pool: PgPool,
}

impl PostgresRunLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseRunLog for PostgresRunLog {
    async fn record(&self, run: &PageRun) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO page_runs (
                id, trigger, contact_id, deal_id, site_code, outcome,
                requested, created, failed, error, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(run.id)
        .bind(run.trigger)
        .bind(&run.contact_id)
        .bind(&run.deal_id)
        .bind(&run.site_code)
        .bind(run.outcome)
        .bind(run.requested)
        .bind(run.created)
        .bind(run.failed)
        .bind(&run.error)
        .bind(run.created_at)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to insert page run {}", run.id))?;

        Ok(())
    }
}

/// Used when no database is configured; the run only reaches the tracing output.
pub struct NoopRunLog;

#[async_trait]
impl BaseRunLog for NoopRunLog {
    async fn record(&self, run: &PageRun) -> Result<()> {
        tracing::debug!(run_id = %run.id, "No run log database configured");
        Ok(())
    }
}
