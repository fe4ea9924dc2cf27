//! Login, registration, refresh and remote logout.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::credential::{normalize_token, Credential};
use super::session::SessionStore;
use crate::api::{ApiClient, ApiError};

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";
const REFRESH_PATH: &str = "/auth/refresh";
const LOGOUT_PATH: &str = "/auth/logout";

#[derive(Debug, Serialize)]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Body of a login or refresh response. Every field is optional because
/// some deployments only return the token in the `Authorization` header.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    #[serde(default, alias = "accessToken", alias = "access_token")]
    token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in_seconds: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    refresh_expires_in_seconds: Option<i64>,
}

/// How the best-effort server-side logout went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteLogout {
    Acknowledged,
    Failed,
}

/// Session-changing calls against the auth endpoints.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(api: ApiClient, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Authenticate and persist the returned credential.
    pub async fn login(&self, email: &str, password: &str) -> Result<Credential, ApiError> {
        let body = CredentialsRequest { email, password };
        let request = self.api.build(Method::POST, LOGIN_PATH, &[], Some(&body))?;
        let credential = self.token_exchange(request).await?;
        info!("Login successful");
        Ok(credential)
    }

    /// Create an account. Does not touch the session.
    pub async fn register(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let body = CredentialsRequest { email, password };
        self.api.send(Method::POST, REGISTER_PATH, Some(&body)).await?;
        info!("Registration accepted");
        Ok(())
    }

    /// Exchange the stored refresh token for a new credential.
    ///
    /// With no refresh token stored this fails without a network call and
    /// clears the session.
    pub async fn refresh(&self) -> Result<Credential, ApiError> {
        let Some(refresh_token) = self.session.refresh_token() else {
            warn!("Refresh requested without a refresh token, clearing session");
            self.session.logout();
            return Err(ApiError::MissingRefreshToken);
        };

        let body = RefreshRequest {
            refresh_token: &refresh_token,
        };
        let request = self.api.build(Method::POST, REFRESH_PATH, &[], Some(&body))?;
        let credential = self.token_exchange(request).await?;
        info!("Session refreshed");
        Ok(credential)
    }

    /// Clear the local session, then ask the server to revoke it.
    ///
    /// The local logout always happens first. Server errors are logged and
    /// reported through the return value only.
    pub async fn logout_remote(&self) -> RemoteLogout {
        let refresh_token = self.session.refresh_token();
        self.session.logout();
        self.revoke(refresh_token).await
    }

    /// Server half of a logout, for callers that already cleared the
    /// session locally and captured the refresh token beforehand.
    pub async fn revoke(&self, refresh_token: Option<String>) -> RemoteLogout {
        let body = refresh_token.as_deref().map(|t| RefreshRequest { refresh_token: t });
        let result = match body {
            Some(ref body) => self.api.send(Method::POST, LOGOUT_PATH, Some(body)).await,
            None => {
                self.api
                    .send(Method::POST, LOGOUT_PATH, Some(&serde_json::json!({})))
                    .await
            }
        };

        match result {
            Ok(()) => {
                debug!("Server acknowledged logout");
                RemoteLogout::Acknowledged
            }
            Err(e) => {
                warn!(error = %e, "Remote logout failed, local session already cleared");
                RemoteLogout::Failed
            }
        }
    }

    /// Local logout only.
    pub fn logout(&self) {
        self.session.logout();
    }

    async fn token_exchange(&self, request: reqwest::Request) -> Result<Credential, ApiError> {
        let response = self.api.execute(request).await?;

        let header_token = response
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(normalize_token)
            .filter(|t| !t.is_empty());

        let text = response.text().await?;
        let body: TokenResponse = if text.trim().is_empty() {
            TokenResponse::default()
        } else {
            serde_json::from_str(&text)
                .map_err(|e| ApiError::InvalidResponse(format!("token response: {}", e)))?
        };

        let access_token = body
            .token
            .as_deref()
            .map(normalize_token)
            .filter(|t| !t.is_empty())
            .or(header_token)
            .ok_or_else(|| ApiError::InvalidResponse("response carried no token".to_string()))?;

        let credential = Credential {
            access_token,
            token_type: body.token_type,
            expires_in_seconds: body.expires_in_seconds,
            refresh_token: body.refresh_token,
            refresh_expires_in_seconds: body.refresh_expires_in_seconds,
        };
        self.session.store(&credential);
        Ok(credential)
    }
}
