/// Authentication endpoints
///
/// - `POST /auth/register` - Register a new user
/// - `POST /auth/login` - Exchange credentials for a token
/// - `GET /auth/status` - Describe the caller behind a token
/// - `POST /auth/logout` - End the client's session
///
/// Tokens carry the caller's staff flag and founder company, read from the
/// database when the token is issued.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use kpitrack_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::{
        founder::Founder,
        user::{is_duplicate_email, CreateUser, User},
    },
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub status: String,
    pub message: String,
    pub auth_token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: String,
    pub message: String,
    pub auth_token: String,
    pub registered_on: DateTime<Utc>,

    /// Name of the caller's company, if they are a founder
    pub company: Option<String>,
    pub company_id: Option<i64>,
    pub staff: bool,
}

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub data: SessionData,
}

/// The caller as seen by the server
#[derive(Debug, Serialize)]
pub struct SessionData {
    pub user_id: i64,
    pub email: String,
    pub company: Option<String>,
    pub company_id: Option<i64>,
    pub registered_on: DateTime<Utc>,
    pub staff: bool,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub status: String,
    pub message: String,
}

fn user_exists() -> Response {
    (
        StatusCode::ACCEPTED,
        Json(json!({
            "status": "failure",
            "message": "user exists. log in instead",
        })),
    )
        .into_response()
}

fn issue_token(
    state: &AppState,
    user_id: i64,
    staff: bool,
    company_id: Option<i64>,
) -> ApiResult<String> {
    let claims = jwt::Claims::new(user_id, staff, company_id, state.config.token_lifetime());
    Ok(jwt::create_token(&claims, state.jwt_secret())?)
}

/// Register a new user
///
/// An email listed in `STAFF_EMAILS` registers as staff. An email that matches
/// a founder record links the account to that founder's company.
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// { "email": "john@demo.com", "password": "founder" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "status": "success", "message": "successfully registered", "auth_token": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `invalid register request`
/// - `202 Accepted`: `user exists. log in instead` (nothing is created)
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(req) = body.map_err(|e| ApiError::malformed_body("invalid register request", e))?;
    req.validate()
        .map_err(|e| ApiError::validation("invalid register request", e))?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Ok(user_exists());
    }

    let password_hash = password::hash_password_blocking(req.password).await?;
    let founder = Founder::find_by_email(&state.db, &req.email).await?;
    let staff = state.config.is_staff_email(&req.email);

    let created = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
            staff,
            founder_id: founder.as_ref().map(|f| f.id),
        },
    )
    .await;

    // A concurrent registration may claim the email after the lookup above
    let user = match created {
        Ok(user) => user,
        Err(err) if is_duplicate_email(&err) => return Ok(user_exists()),
        Err(err) => return Err(err.into()),
    };

    tracing::info!(
        user_id = user.id,
        staff,
        founder_id = ?user.founder_id,
        "Registered user"
    );

    let auth_token = issue_token(&state, user.id, staff, founder.map(|f| f.company_id))?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            status: "success".to_string(),
            message: "successfully registered".to_string(),
            auth_token,
        }),
    )
        .into_response())
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// { "email": "john@demo.com", "password": "founder" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "success",
///   "message": "successfully logged in",
///   "auth_token": "eyJ...",
///   "registered_on": "2017-06-14T10:00:00Z",
///   "company": "Demo",
///   "company_id": 1,
///   "staff": false
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `invalid login request`
/// - `404 Not Found`: `wrong password or user does not exist`
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(req) = body.map_err(|e| ApiError::malformed_body("invalid login request", e))?;
    req.validate()
        .map_err(|e| ApiError::validation("invalid login request", e))?;

    let wrong_credentials =
        || ApiError::NotFound("wrong password or user does not exist".to_string());

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(wrong_credentials)?;

    if !password::verify_password_blocking(req.password, user.password_hash.clone()).await? {
        tracing::debug!(user_id = user.id, "Login rejected: wrong password");
        return Err(wrong_credentials());
    }

    let account = User::find_account(&state.db, user.id)
        .await?
        .ok_or_else(wrong_credentials)?;

    User::update_last_login(&state.db, user.id).await?;

    let auth_token = issue_token(&state, user.id, user.staff, account.company_id)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        status: "success".to_string(),
        message: "successfully logged in".to_string(),
        auth_token,
        registered_on: user.registered_on,
        company: account.company_name,
        company_id: account.company_id,
        staff: user.staff,
    }))
}

/// Session status endpoint
///
/// Reads the caller's account fresh from the database, so the company shown
/// here may be newer than the one in the token.
pub async fn status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<StatusResponse>> {
    let account = User::find_account(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("unauthorized".to_string()))?;

    Ok(Json(StatusResponse {
        status: "success".to_string(),
        data: SessionData {
            user_id: account.user.id,
            email: account.user.email,
            company: account.company_name,
            company_id: account.company_id,
            registered_on: account.user.registered_on,
            staff: account.user.staff,
        },
    }))
}

/// Logout endpoint
///
/// Tokens are stateless, so the server keeps no session to end: the client
/// discards its token, which otherwise stays valid until it expires.
///
/// # Response
///
/// ```json
/// { "status": "success", "message": "successfully logged out" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: `unauthorized` without a valid token
pub async fn logout(Extension(auth): Extension<AuthContext>) -> Json<LogoutResponse> {
    tracing::info!(user_id = auth.user_id, "User logged out");

    Json(LogoutResponse {
        status: "success".to_string(),
        message: "successfully logged out".to_string(),
    })
}
