/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login and session status
/// - `companies`: Company listing, creation and profile
/// - `metrics`: KPI create, read and update for one company

pub mod auth;
pub mod companies;
pub mod health;
pub mod metrics;

use crate::error::{ApiError, ApiResult};
use axum::extract::{rejection::PathRejection, Path};

/// `/:company_id` segment, kept fallible so a non-numeric id still gets a
/// JSON failure body
pub(crate) type CompanyPath = Result<Path<i64>, PathRejection>;

pub(crate) fn parse_company_id(path: CompanyPath) -> ApiResult<i64> {
    let Path(company_id) = path.map_err(ApiError::unknown_company)?;
    Ok(company_id)
}
