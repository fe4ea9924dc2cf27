//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use projectdesk_core::auth::session::TOKEN_KEY;
use projectdesk_core::auth::AuthService;
use projectdesk_core::config::Config;
use projectdesk_core::nav::{Navigator, Route};
use projectdesk_core::notify::{Notification, NotificationLevel, Notifier};
use projectdesk_core::projects::ProjectService;
use projectdesk_core::storage::{KeyValueStore, MemoryStore};
use projectdesk_core::{ApiClient, SessionStore};
use wiremock::MockServer;

/// Notifier that records every notification.
#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<(NotificationLevel, String)> {
        self.notifications()
            .into_iter()
            .map(|n| (n.level, n.message))
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// Navigator with a settable current route that records navigations.
pub struct RecordingNavigator {
    current: Mutex<Route>,
    visited: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn at(route: Route) -> Self {
        Self {
            current: Mutex::new(route),
            visited: Mutex::new(Vec::new()),
        }
    }

    pub fn navigations(&self) -> Vec<Route> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_route(&self) -> Route {
        *self.current.lock().unwrap()
    }

    fn navigate(&self, route: Route) {
        *self.current.lock().unwrap() = route;
        self.visited.lock().unwrap().push(route);
    }
}

/// Everything a test needs, wired against a mock server.
pub struct Harness {
    pub server: MockServer,
    pub backend: Arc<MemoryStore>,
    pub session: Arc<SessionStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub api: ApiClient,
}

impl Harness {
    pub async fn start() -> Self {
        Self::start_at(Route::Projects).await
    }

    pub async fn start_at(route: Route) -> Self {
        Self::with_backend(MemoryStore::new(), route).await
    }

    pub async fn with_backend(backend: MemoryStore, route: Route) -> Self {
        let server = MockServer::start().await;
        let config = Config {
            api_base_url: server.uri(),
            initial_backoff_ms: 10,
            ..Config::default()
        };

        let backend = Arc::new(backend);
        let session = Arc::new(SessionStore::new(backend.clone()));
        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::at(route));
        let api = ApiClient::new(&config, session.clone(), notifier.clone(), navigator.clone())
            .expect("client");

        Self {
            server,
            backend,
            session,
            notifier,
            navigator,
            api,
        }
    }

    pub async fn signed_in(token: &str) -> Self {
        Self::with_backend(MemoryStore::with_slots([(TOKEN_KEY, token)]), Route::Projects).await
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone(), self.session.clone())
    }

    pub fn projects(&self) -> ProjectService {
        ProjectService::new(self.api.clone())
    }

    pub fn slot(&self, key: &str) -> Option<String> {
        self.backend.get(key).unwrap()
    }
}

pub fn project_json(id: i64, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "description": "Test project",
        "value": "1500.50",
        "active": true,
        "startDate": "2024-03-01",
        "endDate": null,
        "createdAt": "2024-03-01T10:00:00",
        "updatedAt": "2024-03-02T11:30:00"
    })
}

pub fn page_json(content: Vec<serde_json::Value>, number: u32, size: u32, total: u64) -> serde_json::Value {
    let total_pages = total.div_ceil(size as u64);
    let count = content.len();
    serde_json::json!({
        "content": content,
        "totalElements": total,
        "totalPages": total_pages,
        "size": size,
        "number": number,
        "first": number == 0,
        "last": (number as u64 + 1) >= total_pages,
        "numberOfElements": count,
        "empty": count == 0
    })
}
