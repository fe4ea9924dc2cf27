//! The terminal's implementation of the navigation and notification sinks.
//!
//! The request pipeline may call into the shell from a background task, so
//! everything here sits behind a `Mutex`. The UI loop polls the shell once
//! per tick: `take_redirect` for navigations it did not initiate, and
//! `active_notification` for the status bar.

use std::sync::Mutex;
use std::time::Instant;

use projectdesk_core::nav::{Navigator, Route};
use projectdesk_core::notify::{Notification, Notifier};
use tracing::debug;

struct Shown {
    notification: Notification,
    at: Instant,
}

pub struct Shell {
    route: Mutex<Route>,
    redirect: Mutex<Option<Route>>,
    notification: Mutex<Option<Shown>>,
}

impl Shell {
    pub fn new(initial: Route) -> Self {
        Self {
            route: Mutex::new(initial),
            redirect: Mutex::new(None),
            notification: Mutex::new(None),
        }
    }

    /// Record a navigation the UI performed itself.
    pub fn set_route(&self, route: Route) {
        if let Ok(mut current) = self.route.lock() {
            *current = route;
        }
    }

    /// A navigation requested through [`Navigator`] since the last call.
    pub fn take_redirect(&self) -> Option<Route> {
        self.redirect.lock().ok().and_then(|mut r| r.take())
    }

    /// The current notification, if it has not expired yet.
    pub fn active_notification(&self) -> Option<Notification> {
        let mut slot = self.notification.lock().ok()?;
        let expired = slot
            .as_ref()
            .is_some_and(|s| s.at.elapsed() >= s.notification.duration);
        if expired {
            *slot = None;
        }
        slot.as_ref().map(|s| s.notification.clone())
    }

    pub fn dismiss_notification(&self) {
        if let Ok(mut slot) = self.notification.lock() {
            *slot = None;
        }
    }
}

impl Navigator for Shell {
    fn current_route(&self) -> Route {
        self.route
            .lock()
            .map(|r| *r)
            .unwrap_or(Route::Login)
    }

    fn navigate(&self, route: Route) {
        debug!(%route, "Navigation requested");
        self.set_route(route);
        if let Ok(mut pending) = self.redirect.lock() {
            *pending = Some(route);
        }
    }
}

impl Notifier for Shell {
    /// Newer notifications replace the one on screen.
    fn notify(&self, notification: Notification) {
        debug!(level = ?notification.level, "Notification");
        if let Ok(mut slot) = self.notification.lock() {
            *slot = Some(Shown {
                notification,
                at: Instant::now(),
            });
        }
    }
}
