//! API client for the projectdesk REST API.
//!
//! Every call goes through the request pipeline: the outgoing stage derives
//! the request actually sent, and the error stage sees every failure before
//! it is returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Request, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::ApiError;
use crate::auth::SessionStore;
use crate::config::Config;
use crate::nav::Navigator;
use crate::notify::Notifier;
use crate::pipeline::{ErrorStage, OutgoingStage};

/// API client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    outgoing: OutgoingStage,
    errors: ErrorStage,
    max_rate_limit_retries: u32,
    initial_backoff: Duration,
}

impl ApiClient {
    /// Create a client wired to the session and the UI sinks.
    pub fn new(
        config: &Config,
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Url::parse(&config.api_base_url).map_err(|e| {
            ApiError::Client(format!("Invalid API base URL {}: {}", config.api_base_url, e))
        })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            outgoing: OutgoingStage::new(session.clone()),
            errors: ErrorStage::new(session, notifier, navigator),
            max_rate_limit_retries: config.max_rate_limit_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve an API path against the base URL.
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| ApiError::Client(format!("Invalid URL {}: {}", joined, e)))
    }

    /// Build a request without sending it.
    pub fn build<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Request, ApiError> {
        let mut builder = self.client.request(method, self.url(path)?);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Ok(builder.build()?)
    }

    /// Send a request through the pipeline.
    ///
    /// Returns the response for 2xx statuses. Any failure is shown to the
    /// error stage first and then returned unchanged.
    pub async fn execute(&self, request: Request) -> Result<Response, ApiError> {
        let url = request.url().clone();
        let method = request.method().clone();

        match self.dispatch(&request).await {
            Ok(response) => {
                debug!(%method, url = %url, status = %response.status(), "Request succeeded");
                Ok(response)
            }
            Err(err) => {
                let outcome = self.errors.handle(&url, &err);
                debug!(%method, url = %url, error = %err, ?outcome, "Request failed");
                Err(err)
            }
        }
    }

    async fn dispatch(&self, original: &Request) -> Result<Response, ApiError> {
        let mut retries = 0;
        let mut backoff = self.initial_backoff;

        loop {
            let request = self.outgoing.prepare(original)?;
            let response = self.client.execute(request).await?;

            // Only reads are safe to replay
            if response.status() == StatusCode::TOO_MANY_REQUESTS
                && original.method() == Method::GET
                && retries < self.max_rate_limit_retries
            {
                retries += 1;
                warn!(
                    url = %original.url(),
                    retry = retries,
                    backoff_ms = backoff.as_millis() as u64,
                    "Rate limited, backing off"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                continue;
            }

            return Self::check_response(response).await;
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let url = response.url().clone();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, url, &body))
        }
    }

    /// Decode a JSON body, mapping failures to `InvalidResponse`.
    pub async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let url = response.url().clone();
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("{} from {}", e, url)))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let request = self.build::<()>(Method::GET, path, query, None)?;
        Self::json(self.execute(request).await?).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.build(Method::POST, path, &[], Some(body))?;
        Self::json(self.execute(request).await?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.build(Method::PUT, path, &[], Some(body))?;
        Self::json(self.execute(request).await?).await
    }

    /// Send a request whose response body is ignored.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let request = self.build(method, path, &[], body)?;
        self.execute(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::Route;
    use crate::notify::Notification;
    use crate::storage::MemoryStore;

    struct Silent;

    impl Notifier for Silent {
        fn notify(&self, _: Notification) {}
    }

    impl Navigator for Silent {
        fn current_route(&self) -> Route {
            Route::Projects
        }

        fn navigate(&self, _: Route) {}
    }

    fn client(base: &str) -> ApiClient {
        let config = Config {
            api_base_url: base.to_string(),
            ..Config::default()
        };
        let session = Arc::new(SessionStore::new(Arc::new(MemoryStore::new())));
        ApiClient::new(&config, session, Arc::new(Silent), Arc::new(Silent)).expect("client")
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let api = client("http://localhost:8080/");
        assert_eq!(api.url("/projects").unwrap().as_str(), "http://localhost:8080/projects");
        assert_eq!(api.url("projects/3").unwrap().as_str(), "http://localhost:8080/projects/3");
    }

    #[test]
    fn test_url_keeps_base_path() {
        let api = client("https://example.com/api");
        assert_eq!(api.url("/auth/login").unwrap().as_str(), "https://example.com/api/auth/login");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = Config {
            api_base_url: "not a url".to_string(),
            ..Config::default()
        };
        let session = Arc::new(SessionStore::new(Arc::new(MemoryStore::new())));
        assert!(matches!(
            ApiClient::new(&config, session, Arc::new(Silent), Arc::new(Silent)),
            Err(ApiError::Client(_))
        ));
    }

    #[test]
    fn test_build_adds_query() {
        let api = client("http://localhost:8080");
        let request = api
            .build::<()>(Method::GET, "/projects", &[("page", "2".to_string())], None)
            .unwrap();
        assert_eq!(request.url().query(), Some("page=2"));
    }
}
