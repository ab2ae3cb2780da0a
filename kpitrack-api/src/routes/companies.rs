/// Company endpoints
///
/// - `GET /companies` - List companies with their founders (staff only)
/// - `POST /companies` - Create a company and its founders (staff only)
/// - `GET /companies/:company_id` - Company profile (staff or founder)

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
    auth::{
        authorization::{require_company_access, require_staff},
        middleware::AuthContext,
    },
    models::{
        company::{Company, CreateCompany},
        founder::{CreateFounder, Founder},
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

/// Founder entry of a create request
#[derive(Debug, Deserialize, Validate)]
pub struct FounderRequest {
    #[validate(length(min = 1, max = 100, message = "Founder name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 100, message = "Role must be at most 100 characters"))]
    pub role: Option<String>,
}

/// Create company request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 200, message = "Company name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(nested)]
    pub founders: Vec<FounderRequest>,

    pub website: Option<String>,

    pub bio: Option<String>,
}

/// Create company response
#[derive(Debug, Serialize)]
pub struct CreateCompanyResponse {
    pub status: String,
    pub message: String,
    pub id: i64,
}

/// A company with its founders
#[derive(Debug, Serialize)]
pub struct CompanyProfile {
    #[serde(flatten)]
    pub company: Company,
    pub founders: Vec<Founder>,
}

/// Company listing
#[derive(Debug, Serialize)]
pub struct CompanyListResponse {
    pub status: String,
    pub data: Vec<CompanyProfile>,
}

/// Single company
#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub status: String,
    pub data: CompanyProfile,
}

async fn load_profile(db: &PgPool, company: Company) -> Result<CompanyProfile, sqlx::Error> {
    let founders = Founder::list_by_company(db, company.id).await?;
    Ok(CompanyProfile { company, founders })
}

/// Lists every company, oldest first
pub async fn list_companies(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<CompanyListResponse>> {
    require_staff(&auth)?;

    let mut data = Vec::new();
    for company in Company::list(&state.db).await? {
        data.push(load_profile(&state.db, company).await?);
    }

    Ok(Json(CompanyListResponse {
        status: "success".to_string(),
        data,
    }))
}

/// Creates a company and its founders
///
/// Existing accounts whose email matches a founder are linked to the new
/// company. Their current tokens keep the old company until they log in again.
///
/// # Endpoint
///
/// ```text
/// POST /companies
/// Authorization: Bearer <staff token>
///
/// {
///   "name": "Demo",
///   "founders": [{ "name": "John Average", "email": "john@demo.com", "role": "CEO" }],
///   "website": "http://www.demo.com",
///   "bio": "This is a demo company."
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "status": "success", "message": "company created", "id": 1 }
/// ```
pub async fn create_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Result<Json<CreateCompanyRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateCompanyResponse>)> {
    require_staff(&auth)?;

    let Json(req) = body.map_err(|e| ApiError::malformed_body("invalid company request", e))?;
    req.validate()
        .map_err(|e| ApiError::validation("invalid company request", e))?;

    let mut tx = state.db.begin().await?;

    let company = Company::create(
        &mut *tx,
        CreateCompany {
            name: req.name,
            website: req.website,
            bio: req.bio,
        },
    )
    .await?;

    let mut linked = 0;
    for founder in req.founders {
        let email = founder.email.clone();
        let founder = Founder::create(
            &mut *tx,
            company.id,
            CreateFounder {
                name: founder.name,
                email: founder.email,
                role: founder.role,
            },
        )
        .await?;

        linked += User::link_founder(&mut *tx, &email, founder.id).await?;
    }

    tx.commit().await?;

    tracing::info!(
        company_id = company.id,
        created_by = auth.user_id,
        linked_users = linked,
        "Created company"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateCompanyResponse {
            status: "success".to_string(),
            message: "company created".to_string(),
            id: company.id,
        }),
    ))
}

/// Company profile with founders
pub async fn get_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: CompanyPath,
) -> ApiResult<Json<CompanyResponse>> {
    let company_id = parse_company_id(path)?;
    require_company_access(&auth, company_id)?;

    let company = Company::find_by_id(&state.db, company_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("company not found".to_string()))?;

    Ok(Json(CompanyResponse {
        status: "success".to_string(),
        data: load_profile(&state.db, company).await?,
    }))
}
