//! Request pipeline run around every API call.
//!
//! Two stages, both stateless apart from the shared services they hold:
//!
//! - `OutgoingStage`: derives a copy of each request with the `Authorization`
//!   header attached when the endpoint is protected and a credential exists
//! - `ErrorStage`: reacts to failed calls (forced logout on 401, notifications
//!   for 403/400/409) and hands the original error back
//!
//! Public auth endpoints are never decorated and never trigger side effects.

pub mod error_stage;
pub mod outgoing;

use reqwest::Url;

use crate::api::{ApiError, ErrorKind};

pub use error_stage::{ErrorStage, FailureOutcome};
pub use outgoing::OutgoingStage;

/// Path fragments that mark an endpoint as public.
pub const PUBLIC_PATHS: &[&str] = &[
    "/auth/login",
    "/auth/register",
    "/auth/refresh",
    "/auth/logout",
    "/health",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointClass {
    /// Login, register, refresh, logout, health.
    Public,
    /// Everything else; requires a credential.
    Protected,
}

/// Classify a request URL by its path.
pub fn classify(url: &Url) -> EndpointClass {
    classify_path(url.path())
}

pub fn classify_path(path: &str) -> EndpointClass {
    if PUBLIC_PATHS.iter().any(|p| contains_segments(path, p)) {
        EndpointClass::Public
    } else {
        EndpointClass::Protected
    }
}

/// Whether `fragment` occurs in `path` ending on a segment boundary.
fn contains_segments(path: &str, fragment: &str) -> bool {
    path.match_indices(fragment).any(|(start, _)| {
        let rest = &path[start + fragment.len()..];
        rest.is_empty() || rest.starts_with('/')
    })
}

/// Whether the error stage already showed a notification for this failure.
///
/// Page code uses this to keep to one notification per failed call.
pub fn reported_by_pipeline(error: &ApiError) -> bool {
    let Some(url) = error.url() else {
        return false;
    };
    classify(url) == EndpointClass::Protected
        && matches!(
            error.kind(),
            ErrorKind::Unauthorized | ErrorKind::Forbidden | ErrorKind::Validation
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_classify_public_endpoints() {
        for path in [
            "/auth/login",
            "/auth/register",
            "/auth/refresh",
            "/auth/logout",
            "/health",
            "/api/v1/auth/login",
            "/auth/login/",
            "/health/ready",
        ] {
            assert_eq!(classify_path(path), EndpointClass::Public, "{path}");
        }
    }

    #[test]
    fn test_classify_protected_endpoints() {
        for path in [
            "/projects",
            "/projects/1",
            "/auth/me",
            "/",
            "/healthcare/records",
            "/healthz",
            "/auth/logout-all",
            "/auth/login2",
        ] {
            assert_eq!(classify_path(path), EndpointClass::Protected, "{path}");
        }
    }

    #[test]
    fn test_classify_ignores_query_string() {
        let url = Url::parse("http://localhost/projects?next=/auth/login").unwrap();
        assert_eq!(classify(&url), EndpointClass::Protected);
    }

    #[test]
    fn test_reported_by_pipeline() {
        let protected = Url::parse("http://localhost/projects").unwrap();
        let public = Url::parse("http://localhost/auth/login").unwrap();

        let err = ApiError::from_status(StatusCode::CONFLICT, protected.clone(), "");
        assert!(reported_by_pipeline(&err));

        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, protected, "");
        assert!(!reported_by_pipeline(&err));

        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, public, "");
        assert!(!reported_by_pipeline(&err));

        assert!(!reported_by_pipeline(&ApiError::MissingRefreshToken));
    }
}
