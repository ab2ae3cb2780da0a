//! # KPITrack API Server Library
//!
//! HTTP surface of KPITrack: authentication, company management and the KPI
//! endpoints, built on the `kpitrack-shared` crate.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
