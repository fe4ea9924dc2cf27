//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `Credential`: the token pair returned by login/refresh, and the one
//!   normalization rule applied to every stored token
//! - `SessionStore`: persistence of the current credential, including
//!   migration from storage keys used by earlier releases
//! - `AuthService`: login, register, refresh and remote logout calls
//!
//! Tokens are stored without a scheme prefix; the prefix is added once when a
//! request is decorated.

pub mod credential;
pub mod service;
pub mod session;

pub use credential::{normalize_token, Credential};
pub use service::{AuthService, RemoteLogout};
pub use session::{SessionStatus, SessionStore};
