//! # KPITrack Shared Library
//!
//! This crate contains the domain types, persistence layer, and business logic
//! used by the KPITrack API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models (companies, founders, users, metric rows)
//! - `auth`: Authentication and authorization utilities
//! - `kpi`: KPI read and write paths built on the metric registry
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod kpi;
pub mod models;

/// Current version of the KPITrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
