use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Request;
use tracing::debug;

use super::{classify, EndpointClass};
use crate::api::ApiError;
use crate::auth::SessionStore;

/// Attaches the stored credential to requests for protected endpoints.
#[derive(Clone)]
pub struct OutgoingStage {
    session: Arc<SessionStore>,
}

impl OutgoingStage {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    /// Derive the request to send. `original` is never modified.
    ///
    /// Fails only when the body cannot be cloned (streaming bodies) or the
    /// stored token is not a valid header value.
    pub fn prepare(&self, original: &Request) -> Result<Request, ApiError> {
        let mut request = original.try_clone().ok_or_else(|| {
            ApiError::Client("Request body cannot be replayed".to_string())
        })?;

        if classify(request.url()) == EndpointClass::Public {
            debug!(url = %request.url(), "Public endpoint, sending without credential");
            return Ok(request);
        }

        let Some(value) = self.session.authorization_value() else {
            debug!(url = %request.url(), "No credential stored");
            return Ok(request);
        };

        let mut header = HeaderValue::from_str(&value).map_err(|_| {
            ApiError::Client("Stored token is not a valid header value".to_string())
        })?;
        header.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, header);
        Ok(request)
    }
}
