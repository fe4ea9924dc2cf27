use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info, warn};

use super::credential::{normalize_token, scheme_for, Credential};
use crate::storage::KeyValueStore;

/// Canonical slot for the raw access token
pub const TOKEN_KEY: &str = "projectdesk_token";

/// Canonical slot for the token type reported by the server
pub const TOKEN_TYPE_KEY: &str = "projectdesk_token_type";

/// Canonical slot for the access token expiry instant (RFC 3339)
pub const TOKEN_EXPIRES_AT_KEY: &str = "projectdesk_token_expires_at";

/// Canonical slot for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "projectdesk_refresh_token";

/// Canonical slot for the refresh token expiry instant (RFC 3339)
pub const REFRESH_EXPIRES_AT_KEY: &str = "projectdesk_refresh_expires_at";

/// Access token slots used by earlier releases, highest priority first.
pub const LEGACY_TOKEN_KEYS: &[&str] = &["bndes_token", "token", "accessToken", "jwt"];

/// Refresh token slots used by earlier releases, highest priority first.
pub const LEGACY_REFRESH_KEYS: &[&str] = &["refreshToken", "refresh_token"];

const CANONICAL_KEYS: &[&str] = &[
    TOKEN_KEY,
    TOKEN_TYPE_KEY,
    TOKEN_EXPIRES_AT_KEY,
    REFRESH_TOKEN_KEY,
    REFRESH_EXPIRES_AT_KEY,
];

/// Whether a usable credential is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    Authenticated,
}

/// Single source of truth for the current credential.
///
/// Hides the storage backend and the historical key names from everything
/// else. All operations are synchronous; backend failures are logged and read
/// as an empty slot.
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// The stored access token without any scheme prefix.
    ///
    /// If the canonical slot is empty, the first legacy slot holding a value
    /// is migrated into it and the legacy slots are cleared.
    pub fn token(&self) -> Option<String> {
        self.read(TOKEN_KEY)
            .map(|t| normalize_token(&t))
            .filter(|t| !t.is_empty())
            .or_else(|| self.migrate(TOKEN_KEY, LEGACY_TOKEN_KEYS))
    }

    /// The stored refresh token, migrating legacy slots the same way.
    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY)
            .or_else(|| self.migrate(REFRESH_TOKEN_KEY, LEGACY_REFRESH_KEYS))
    }

    /// Normalize and persist an access token.
    ///
    /// A token that is empty after normalization clears the session instead.
    pub fn set_credential(&self, raw_token: &str, token_type: Option<&str>) {
        let token = normalize_token(raw_token);
        if token.is_empty() {
            warn!("Refusing to store an empty access token, clearing session");
            self.logout();
            return;
        }

        self.write(TOKEN_KEY, &token);
        match token_type.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => self.write(TOKEN_TYPE_KEY, t),
            None => self.delete(TOKEN_TYPE_KEY),
        }
        // A new token invalidates any expiry hint for the previous one
        self.delete(TOKEN_EXPIRES_AT_KEY);
        debug!("Access token stored");
    }

    /// Persist everything a login or refresh response carried.
    pub fn store(&self, credential: &Credential) {
        self.set_credential(&credential.access_token, credential.token_type.as_deref());
        if !self.is_authenticated() {
            return;
        }

        let now = Utc::now();
        if let Some(secs) = credential.expires_in_seconds {
            match expiry_after(now, secs) {
                Some(at) => self.write(TOKEN_EXPIRES_AT_KEY, &at.to_rfc3339()),
                None => warn!(secs, "Ignoring out-of-range token lifetime"),
            }
        }

        match credential
            .refresh_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            Some(refresh) => {
                self.write(REFRESH_TOKEN_KEY, refresh);
                match credential
                    .refresh_expires_in_seconds
                    .and_then(|secs| expiry_after(now, secs))
                {
                    Some(at) => self.write(REFRESH_EXPIRES_AT_KEY, &at.to_rfc3339()),
                    None => self.delete(REFRESH_EXPIRES_AT_KEY),
                }
            }
            None => {
                // Keep an existing refresh token when the server rotates only
                // the access token
                debug!("Response carried no refresh token");
            }
        }
        info!("Session established");
    }

    /// Remove the credential from the canonical and every legacy slot.
    pub fn logout(&self) {
        let keys = CANONICAL_KEYS
            .iter()
            .chain(LEGACY_TOKEN_KEYS)
            .chain(LEGACY_REFRESH_KEYS);
        for key in keys {
            self.delete(key);
        }
        info!("Session cleared");
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|t| !t.is_empty())
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_authenticated() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }

    /// The header scheme for the stored token type.
    pub fn scheme(&self) -> String {
        scheme_for(self.read(TOKEN_TYPE_KEY).as_deref()).to_string()
    }

    /// Full `Authorization` header value, or `None` when anonymous.
    pub fn authorization_value(&self) -> Option<String> {
        let token = self.token()?;
        Some(format!("{} {}", self.scheme(), token))
    }

    /// Expiry instant reported at login, if any. Display only.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let value = self.read(TOKEN_EXPIRES_AT_KEY)?;
        match DateTime::parse_from_rfc3339(&value) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(e) => {
                warn!(error = %e, "Ignoring unparseable token expiry");
                None
            }
        }
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> Option<i64> {
        self.expires_at()
            .map(|expiry| (expiry - Utc::now()).num_minutes().max(0))
    }

    fn migrate(&self, canonical: &str, legacy_keys: &[&str]) -> Option<String> {
        let (source, value) = legacy_keys.iter().find_map(|key| {
            self.read(key)
                .map(|v| normalize_token(&v))
                .filter(|v| !v.is_empty())
                .map(|v| (*key, v))
        })?;

        self.write(canonical, &value);
        for key in legacy_keys {
            self.delete(key);
        }
        info!(from = source, to = canonical, "Migrated legacy session slot");
        Some(value)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value.filter(|v| !v.trim().is_empty()),
            Err(e) => {
                warn!(key, error = %e, "Failed to read session slot");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.backend.set(key, value) {
            warn!(key, error = %e, "Failed to write session slot");
        }
    }

    fn delete(&self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            warn!(key, error = %e, "Failed to remove session slot");
        }
    }
}

/// `now` plus a server-reported lifetime, or `None` when it does not fit.
fn expiry_after(now: DateTime<Utc>, secs: i64) -> Option<DateTime<Utc>> {
    TimeDelta::try_seconds(secs).and_then(|d| now.checked_add_signed(d))
}
