//! Core of the projectdesk client: session persistence, the request
//! pipeline, and typed access to the auth and project endpoints.
//!
//! Front-ends construct one [`SessionStore`], hand it to an [`ApiClient`]
//! together with their [`Notifier`] and [`Navigator`] implementations, and
//! build the services on top of that client.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod nav;
pub mod notify;
pub mod pipeline;
pub mod projects;
pub mod storage;
pub mod utils;
pub mod validation;

pub use api::{ApiClient, ApiError, ErrorKind};
pub use auth::{AuthService, SessionStatus, SessionStore};
pub use config::Config;
pub use nav::{Navigator, Route};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use projects::ProjectService;
