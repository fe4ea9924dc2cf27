use serde::{Deserialize, Serialize};

/// Authorization scheme prefix, including the separating space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Scheme used when the server did not name one.
pub const DEFAULT_SCHEME: &str = "Bearer";

/// The secret for the current session, as returned by login or refresh.
///
/// `access_token` is always held in normalized form (see [`normalize_token`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in_seconds: Option<i64>,
    pub refresh_token: Option<String>,
    pub refresh_expires_in_seconds: Option<i64>,
}

impl Credential {
    /// A bare access token with no refresh or expiry information.
    pub fn bearer(token: &str) -> Self {
        Self {
            access_token: normalize_token(token),
            token_type: None,
            expires_in_seconds: None,
            refresh_token: None,
            refresh_expires_in_seconds: None,
        }
    }

    /// The scheme to put in front of the token in an `Authorization` header.
    pub fn scheme(&self) -> &str {
        scheme_for(self.token_type.as_deref())
    }
}

/// Strip any leading `Bearer ` prefixes (case-insensitive) and surrounding
/// whitespace. Tokens are stored raw; the prefix is added once at attach time.
pub fn normalize_token(raw: &str) -> String {
    let mut token = raw.trim();
    while let Some(rest) = strip_bearer(token) {
        token = rest.trim_start();
    }
    token.to_string()
}

fn strip_bearer(token: &str) -> Option<&str> {
    let prefix = token.get(..BEARER_PREFIX.len())?;
    if prefix.eq_ignore_ascii_case(BEARER_PREFIX) {
        Some(&token[BEARER_PREFIX.len()..])
    } else {
        None
    }
}

/// Resolve the header scheme for a stored token type.
pub fn scheme_for(token_type: Option<&str>) -> &str {
    match token_type.map(str::trim) {
        Some(t) if !t.is_empty() && !t.eq_ignore_ascii_case(DEFAULT_SCHEME) => t,
        _ => DEFAULT_SCHEME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_token_strips_prefix() {
        assert_eq!(normalize_token("Bearer abc.def"), "abc.def");
        assert_eq!(normalize_token("bearer abc"), "abc");
        assert_eq!(normalize_token("BEARER   abc"), "abc");
        assert_eq!(normalize_token("  abc  "), "abc");
    }

    #[test]
    fn test_normalize_token_never_leaves_double_prefix() {
        assert_eq!(normalize_token("Bearer Bearer abc"), "abc");
        assert_eq!(normalize_token("Bearer bearer Bearer abc"), "abc");
    }

    #[test]
    fn test_normalize_token_edge_cases() {
        assert_eq!(normalize_token(""), "");
        assert_eq!(normalize_token("   "), "");
        assert_eq!(normalize_token("Bearer "), "");
        // No separating space: not a prefix
        assert_eq!(normalize_token("Bearerabc"), "Bearerabc");
        // Multi-byte input shorter than the prefix must not panic
        assert_eq!(normalize_token("äöü"), "äöü");
    }

    #[test]
    fn test_scheme_for() {
        assert_eq!(scheme_for(None), "Bearer");
        assert_eq!(scheme_for(Some("")), "Bearer");
        assert_eq!(scheme_for(Some("bearer")), "Bearer");
        assert_eq!(scheme_for(Some("BEARER")), "Bearer");
        assert_eq!(scheme_for(Some("MAC")), "MAC");
    }

    #[test]
    fn test_credential_bearer_normalizes() {
        let credential = Credential::bearer("Bearer xyz");
        assert_eq!(credential.access_token, "xyz");
        assert_eq!(credential.scheme(), "Bearer");
    }
}
