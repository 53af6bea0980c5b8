//! Infrastructure layer for cross-cutting concerns.
//!
//! Provides foundational infrastructure including:
//! - Validation policy configuration and loading
//! - Error handling and result types

pub mod config;
pub mod error;
