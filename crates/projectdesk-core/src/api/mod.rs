//! REST API client module.
//!
//! This module provides the `ApiClient` used by the auth and project
//! services, and the typed `ApiError` every failed call resolves to.
//!
//! The API uses bearer token authentication obtained from `/auth/login`.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::{ApiError, ErrorBody, ErrorKind, FieldError};
