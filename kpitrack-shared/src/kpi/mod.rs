/// KPI read and write paths
///
/// - [`payload`]: validation of submitted metric maps
/// - [`report`]: the per-company history of every registered metric
/// - [`write`]: transactional create and amend of metric values
///
/// Authorization is not checked here; callers run the guard in
/// [`crate::auth::authorization`] first.

pub mod payload;
pub mod report;
pub mod write;

pub use payload::{MetricPayload, PayloadError};
pub use report::{get_kpi_for_company, KpiReport, MetricSummary};
pub use write::{amend_metrics, record_metrics};

use crate::models::metric::Metric;

/// Error type for KPI operations
#[derive(Debug, thiserror::Error)]
pub enum KpiError {
    /// Submitted metrics were rejected
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// An update targeted a metric the company has never recorded
    #[error("there is no data to update")]
    NoDataToUpdate(Metric),

    /// Storage failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
