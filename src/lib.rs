//! Civica Core - Citizen Complaint Service Backend
//!
//! This crate provides the core functionality for the Civica complaint
//! management service: authentication, role-based authorization, complaint
//! and category management, and notification dispatch.

pub mod api;
pub mod config;
pub mod domain;
pub mod email;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod migration;
pub mod policy;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
