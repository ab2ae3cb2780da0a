/// KPI endpoints
///
/// - `POST /companies/:company_id` - Record this week's metrics
/// - `GET /companies/:company_id/metrics` - Full metric history
/// - `PUT /companies/:company_id/metrics` - Overwrite the latest metric values
///
/// All three require the caller to be staff or a founder of the company.
/// Request bodies are JSON objects of metric key to value:
///
/// ```json
/// { "sales": 100, "traffic": "2k" }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{parse_company_id, CompanyPath},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use kpitrack_shared::{
    auth::{authorization::require_company_access, middleware::AuthContext},
    kpi::{self, KpiReport, MetricPayload},
    models::company::Company,
};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use sqlx::PgPool;

/// Response to a metric submission
#[derive(Debug, Serialize)]
pub struct MetricsAddedResponse {
    pub status: String,
    pub message: String,

    /// The submitted metrics, as stored
    pub metrics_added: Map<String, JsonValue>,
}

/// Response to a metric update
#[derive(Debug, Serialize)]
pub struct MetricsUpdatedResponse {
    pub status: String,
    pub message: String,
}

type MetricsBody = Result<Json<Map<String, JsonValue>>, JsonRejection>;

fn parse_body(body: MetricsBody) -> ApiResult<MetricPayload> {
    let Json(raw) = body.map_err(|e| ApiError::malformed_body("invalid metrics payload", e))?;
    Ok(MetricPayload::parse(raw).map_err(kpi::KpiError::from)?)
}

async fn ensure_company(db: &PgPool, company_id: i64) -> ApiResult<()> {
    if !Company::exists(db, company_id).await? {
        return Err(ApiError::NotFound("company not found".to_string()));
    }
    Ok(())
}

/// Records one new row per submitted metric
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "status": "success", "message": "metrics added", "metrics_added": { "sales": 100 } }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: empty payload, blank value, unknown metric
/// - `401 Unauthorized`: caller may not write to this company
/// - `404 Not Found`: company does not exist
pub async fn post_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: CompanyPath,
    body: MetricsBody,
) -> ApiResult<(StatusCode, Json<MetricsAddedResponse>)> {
    let company_id = parse_company_id(path)?;
    require_company_access(&auth, company_id)?;

    let payload = parse_body(body)?;
    ensure_company(&state.db, company_id).await?;

    kpi::record_metrics(&state.db, company_id, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(MetricsAddedResponse {
            status: "success".to_string(),
            message: "metrics added".to_string(),
            metrics_added: payload.to_json(),
        }),
    ))
}

/// Returns the history of every metric for the company
///
/// The body is the report itself, keyed by metric in registry order.
pub async fn get_metrics(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: CompanyPath,
) -> ApiResult<Json<KpiReport>> {
    let company_id = parse_company_id(path)?;
    require_company_access(&auth, company_id)?;
    ensure_company(&state.db, company_id).await?;

    Ok(Json(kpi::get_kpi_for_company(&state.db, company_id).await?))
}

/// Overwrites the most recently updated value of each submitted metric
///
/// # Errors
///
/// - `400 Bad Request`: invalid payload, or `there is no data to update` when
///   the company has never recorded one of the metrics
/// - `401 Unauthorized`: caller may not write to this company
/// - `404 Not Found`: company does not exist
pub async fn put_metric(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: CompanyPath,
    body: MetricsBody,
) -> ApiResult<Json<MetricsUpdatedResponse>> {
    let company_id = parse_company_id(path)?;
    require_company_access(&auth, company_id)?;
    ensure_company(&state.db, company_id).await?;

    let payload = parse_body(body)?;
    kpi::amend_metrics(&state.db, company_id, &payload).await?;

    Ok(Json(MetricsUpdatedResponse {
        status: "success".to_string(),
        message: "resource updated".to_string(),
    }))
}
