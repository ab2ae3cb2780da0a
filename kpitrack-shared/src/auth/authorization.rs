/// Authorization guards
///
/// Two rules cover every protected operation:
///
/// 1. **Company access**: staff may act on any company; a founder may act only
///    on the company their founder record belongs to.
/// 2. **Staff only**: listing and creating companies is reserved for staff.
///
/// Both are pure checks on the [`AuthContext`] produced by authentication, so
/// handlers call them before touching the database.
///
/// # Example
///
/// ```
/// use kpitrack_shared::auth::authorization::{require_company_access, require_staff};
/// use kpitrack_shared::auth::middleware::AuthContext;
///
/// let founder = AuthContext { user_id: 2, staff: false, company_id: Some(1) };
///
/// assert!(require_company_access(&founder, 1).is_ok());
/// assert!(require_company_access(&founder, 2).is_err());
/// assert!(require_staff(&founder).is_err());
/// ```

use super::middleware::AuthContext;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Caller is neither staff nor a founder of the company
    #[error("user not authorized to this view")]
    NotAuthorized { company_id: i64 },

    /// Operation reserved for staff
    #[error("non-staff members not allowed")]
    StaffOnly,
}

/// Whether the caller may read or write a company's data
pub fn can_access_company(auth: &AuthContext, company_id: i64) -> bool {
    auth.staff || auth.company_id == Some(company_id)
}

/// Requires the caller to be staff or a founder of `company_id`
pub fn require_company_access(auth: &AuthContext, company_id: i64) -> Result<(), AuthzError> {
    if !can_access_company(auth, company_id) {
        tracing::debug!(
            user_id = auth.user_id,
            company_id,
            "Denied access to company"
        );
        return Err(AuthzError::NotAuthorized { company_id });
    }

    Ok(())
}

/// Requires the caller to be staff
pub fn require_staff(auth: &AuthContext) -> Result<(), AuthzError> {
    if !auth.staff {
        return Err(AuthzError::StaffOnly);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff() -> AuthContext {
        AuthContext {
            user_id: 1,
            staff: true,
            company_id: None,
        }
    }

    fn founder_of(company_id: i64) -> AuthContext {
        AuthContext {
            user_id: 2,
            staff: false,
            company_id: Some(company_id),
        }
    }

    fn outsider() -> AuthContext {
        AuthContext {
            user_id: 3,
            staff: false,
            company_id: None,
        }
    }

    #[test]
    fn test_staff_can_access_any_company() {
        for company_id in [1, 2, 999] {
            assert!(require_company_access(&staff(), company_id).is_ok());
        }
    }

    #[test]
    fn test_founder_limited_to_own_company() {
        assert!(require_company_access(&founder_of(4), 4).is_ok());
        assert_eq!(
            require_company_access(&founder_of(4), 5),
            Err(AuthzError::NotAuthorized { company_id: 5 })
        );
    }

    #[test]
    fn test_outsider_denied_everywhere() {
        for company_id in [1, 2, 999] {
            assert!(!can_access_company(&outsider(), company_id));
        }
    }

    #[test]
    fn test_staff_founder_keeps_staff_rights() {
        let auth = AuthContext {
            user_id: 9,
            staff: true,
            company_id: Some(1),
        };
        assert!(require_company_access(&auth, 2).is_ok());
    }

    #[test]
    fn test_require_staff() {
        assert!(require_staff(&staff()).is_ok());
        assert_eq!(require_staff(&founder_of(1)), Err(AuthzError::StaffOnly));
        assert_eq!(require_staff(&outsider()), Err(AuthzError::StaffOnly));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AuthzError::NotAuthorized { company_id: 1 }.to_string(),
            "user not authorized to this view"
        );
        assert_eq!(AuthzError::StaffOnly.to_string(), "non-staff members not allowed");
    }
}
