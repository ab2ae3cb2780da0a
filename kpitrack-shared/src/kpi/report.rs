/// Per-company KPI history
///
/// [`get_kpi_for_company`] walks the metric registry in order and summarizes
/// each metric's rows for one company:
///
/// ```json
/// {
///   "sales": { "weeks": 2, "last_updated": "2017-06-19T10:02:11Z", "data": [100, 120] },
///   "traffic": { "weeks": 0, "last_updated": "NOT AVAILABLE", "data": [] }
/// }
/// ```

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use super::KpiError;
use crate::models::metric::{Metric, MetricEntry};

/// Shown in place of a timestamp for metrics with no rows
pub const NOT_AVAILABLE: &str = "NOT AVAILABLE";

/// History of one metric for one company
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    /// Number of rows recorded
    pub weeks: usize,

    /// Most recent write, if any
    #[serde(serialize_with = "serialize_last_updated")]
    pub last_updated: Option<DateTime<Utc>>,

    /// Values ordered by week, oldest first
    pub data: Vec<JsonValue>,
}

fn serialize_last_updated<S>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(timestamp) => timestamp.serialize(serializer),
        None => serializer.serialize_str(NOT_AVAILABLE),
    }
}

impl MetricSummary {
    /// Summarizes rows already ordered by week
    pub fn from_entries(entries: &[MetricEntry]) -> Self {
        Self {
            weeks: entries.len(),
            last_updated: entries.iter().map(|entry| entry.updated_at).max(),
            data: entries.iter().map(|entry| entry.value.clone()).collect(),
        }
    }

    /// Latest value by week
    pub fn latest(&self) -> Option<&JsonValue> {
        self.data.last()
    }
}

/// Summaries of every registered metric, in registry order
///
/// Serializes as a JSON object keyed by metric.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiReport(Vec<(Metric, MetricSummary)>);

impl KpiReport {
    pub fn get(&self, metric: Metric) -> Option<&MetricSummary> {
        self.0
            .iter()
            .find(|(candidate, _)| *candidate == metric)
            .map(|(_, summary)| summary)
    }
}

impl FromIterator<(Metric, MetricSummary)> for KpiReport {
    fn from_iter<I: IntoIterator<Item = (Metric, MetricSummary)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for KpiReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (metric, summary) in &self.0 {
            map.serialize_entry(metric.key(), summary)?;
        }
        map.end()
    }
}

/// Builds the full metric history of a company
///
/// Does not check that the company exists; an unknown id yields a report in
/// which every metric is empty.
pub async fn get_kpi_for_company(pool: &PgPool, company_id: i64) -> Result<KpiReport, KpiError> {
    let mut report = Vec::with_capacity(Metric::ALL.len());

    for metric in Metric::ALL {
        let entries = MetricEntry::list_for_company(pool, metric, company_id).await?;
        report.push((metric, MetricSummary::from_entries(&entries)));
    }

    tracing::debug!(company_id, "Built KPI report");

    Ok(KpiReport(report))
}
