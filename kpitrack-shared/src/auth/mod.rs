/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Bearer token -> caller identity ([`middleware::AuthContext`])
/// - [`authorization`]: Staff / founder-of-company guards
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use kpitrack_shared::auth::authorization::require_company_access;
/// use kpitrack_shared::auth::jwt::{create_token, validate_token, Claims};
/// use kpitrack_shared::auth::middleware::AuthContext;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let token = create_token(&Claims::new(2, false, Some(1), Duration::hours(1)), secret)?;
///
/// let auth = AuthContext::from_claims(&validate_token(&token, secret)?);
/// require_company_access(&auth, 1)?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
