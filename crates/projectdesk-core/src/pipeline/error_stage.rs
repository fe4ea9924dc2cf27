use std::sync::Arc;

use reqwest::Url;
use tracing::{debug, info, warn};

use super::{classify, EndpointClass};
use crate::api::{ApiError, ErrorKind};
use crate::auth::SessionStore;
use crate::nav::{Navigator, Route};
use crate::notify::{Notification, Notifier};

/// Shown on a forced logout when the server gave no message.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// Shown on 403 when the server gave no message.
pub const ACCESS_DENIED_MESSAGE: &str = "Access denied.";

/// What the error stage did with a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// No side effects; the caller reports the error itself.
    PassThrough,
    /// A notification was shown; the session is unchanged.
    Notified,
    /// The session was cleared, the user notified and sent to login.
    ForcedLogout,
}

/// Reacts to authentication and authorization failures.
#[derive(Clone)]
pub struct ErrorStage {
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl ErrorStage {
    pub fn new(
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            session,
            notifier,
            navigator,
        }
    }

    /// Apply side effects for a failed call to `url`.
    ///
    /// The error itself is only inspected; the caller still owns it and
    /// returns it unchanged.
    pub fn handle(&self, url: &Url, error: &ApiError) -> FailureOutcome {
        if error.status().is_none() {
            return FailureOutcome::PassThrough;
        }

        if classify(url) == EndpointClass::Public {
            debug!(url = %url, status = ?error.status(), "Auth endpoint failure left to caller");
            return FailureOutcome::PassThrough;
        }

        match error.kind() {
            ErrorKind::Unauthorized => {
                info!(url = %url, "Protected call rejected, forcing logout");
                self.session.logout();
                let message = error
                    .api_message()
                    .unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string());
                self.notifier.notify(Notification::warning(message));

                if self.navigator.current_route() != Route::Login {
                    self.navigator.navigate(Route::Login);
                }
                FailureOutcome::ForcedLogout
            }
            ErrorKind::Forbidden => {
                warn!(url = %url, "Access denied");
                let message = error
                    .api_message()
                    .unwrap_or_else(|| ACCESS_DENIED_MESSAGE.to_string());
                self.notifier.notify(Notification::error(message));
                FailureOutcome::Notified
            }
            ErrorKind::Validation => {
                debug!(url = %url, status = ?error.status(), "Request rejected by validation");
                self.notifier.notify(Notification::warning(error.user_message()));
                FailureOutcome::Notified
            }
            _ => FailureOutcome::PassThrough,
        }
    }
}
