/// Metric writes
///
/// Both operations take an already validated [`MetricPayload`] and run every
/// statement for it inside one transaction: either all submitted metrics are
/// written or none are.

use serde_json::Value as JsonValue;
use sqlx::PgPool;

use super::{KpiError, MetricPayload};
use crate::models::metric::{Metric, MetricEntry};

/// Records a new row for every submitted metric
pub async fn record_metrics(
    pool: &PgPool,
    company_id: i64,
    payload: &MetricPayload,
) -> Result<Vec<MetricEntry>, KpiError> {
    let mut tx = pool.begin().await?;
    let mut created = Vec::with_capacity(payload.len());

    for (metric, value) in payload.entries() {
        let entry = MetricEntry::create(&mut *tx, *metric, company_id, value).await?;
        created.push(entry);
    }

    tx.commit().await?;

    tracing::info!(
        company_id,
        metrics = payload.len(),
        "Recorded metrics"
    );

    Ok(created)
}

/// Overwrites the latest value of every submitted metric
///
/// The target row of each metric is the company's most recently updated one.
/// Fails with [`KpiError::NoDataToUpdate`] before writing anything if the
/// company has no row for one of the metrics.
pub async fn amend_metrics(
    pool: &PgPool,
    company_id: i64,
    payload: &MetricPayload,
) -> Result<Vec<MetricEntry>, KpiError> {
    let mut tx = pool.begin().await?;

    let mut targets: Vec<(Metric, i64, &JsonValue)> = Vec::with_capacity(payload.len());
    for (metric, value) in payload.entries() {
        let Some(latest) = MetricEntry::last_updated(&mut *tx, *metric, company_id).await? else {
            tracing::debug!(company_id, metric = %metric, "No rows to update");
            return Err(KpiError::NoDataToUpdate(*metric));
        };
        targets.push((*metric, latest.id, value));
    }

    let mut updated = Vec::with_capacity(targets.len());
    for (metric, id, value) in targets {
        updated.push(MetricEntry::update_value(&mut *tx, metric, id, value).await?);
    }

    tx.commit().await?;

    tracing::info!(
        company_id,
        metrics = updated.len(),
        "Updated metrics"
    );

    Ok(updated)
}
