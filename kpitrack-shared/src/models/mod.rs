/// Database models for KPITrack
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `company`: Companies whose KPIs are tracked
/// - `founder`: Founders listed on a company
/// - `user`: User accounts (staff or founder-linked)
/// - `metric`: Metric registry and per-metric weekly rows

pub mod company;
pub mod founder;
pub mod metric;
pub mod user;

/// Canonical form of an email address for storage and lookup
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
