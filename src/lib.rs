//! SoftSync API Tester
//!
//! This library provides the HTTP request executor and the fixed
//! end-to-end test script for the SoftSync REST API.

pub mod cli;
pub mod client;
pub mod commands;
pub mod common;
pub mod testing;

// Re-export commonly used types for tests
pub use client::{ApiCall, ApiClient, ApiResponse, FailureKind, RequestFailure};
pub use common::{Error, Result};
