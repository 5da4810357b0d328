//! Tests for the dataset services.
//!
//! The remote service is exercised against an in-process HTTP server in
//! `tests/integration_remote_service.rs`.
