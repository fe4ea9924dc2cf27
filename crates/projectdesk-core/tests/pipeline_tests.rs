//! Request pipeline behavior against a mock API.

mod support;

use pretty_assertions::assert_eq;
use projectdesk_core::auth::session::{REFRESH_TOKEN_KEY, TOKEN_KEY};
use projectdesk_core::nav::Route;
use projectdesk_core::notify::NotificationLevel;
use projectdesk_core::pipeline::error_stage::{ACCESS_DENIED_MESSAGE, SESSION_EXPIRED_MESSAGE};
use projectdesk_core::pipeline::reported_by_pipeline;
use projectdesk_core::projects::ListProjectsParams;
use projectdesk_core::storage::MemoryStore;
use projectdesk_core::ErrorKind;
use reqwest::StatusCode;
use serde_json::json;
use support::{page_json, project_json, Harness};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_unauthorized_without_token_forces_logout() {
    let h = Harness::with_backend(
        MemoryStore::with_slots([("bndes_token", "   "), (REFRESH_TOKEN_KEY, "r-1")]),
        Route::Projects,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h
        .projects()
        .list(&ListProjectsParams::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert!(reported_by_pipeline(&err));

    let requests = h.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());

    assert!(h.backend.is_empty());
    assert!(!h.session.is_authenticated());
    assert_eq!(
        h.notifier.messages(),
        vec![(NotificationLevel::Warning, SESSION_EXPIRED_MESSAGE.to_string())]
    );
    assert_eq!(h.navigator.navigations(), vec![Route::Login]);
}

#[tokio::test]
async fn test_unauthorized_with_token_uses_server_message() {
    let h = Harness::signed_in("expired-token").await;
    Mock::given(method("GET"))
        .and(path("/projects/7"))
        .and(header("authorization", "Bearer expired-token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Token expired"})),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.projects().get(7).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(h.slot(TOKEN_KEY), None);
    assert_eq!(
        h.notifier.messages(),
        vec![(NotificationLevel::Warning, "Token expired".to_string())]
    );
    assert_eq!(h.navigator.navigations(), vec![Route::Login]);
}

#[tokio::test]
async fn test_unauthorized_while_on_login_does_not_navigate() {
    let h = Harness::start_at(Route::Login).await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;

    let _ = h.projects().list(&ListProjectsParams::default()).await;

    assert_eq!(h.notifier.notifications().len(), 1);
    assert!(h.navigator.navigations().is_empty());
}

#[tokio::test]
async fn test_failed_login_is_left_to_caller() {
    let h = Harness::signed_in("still-valid").await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.auth().login("ana@example.com", "wrong").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.user_message(), "Bad credentials");
    assert!(!reported_by_pipeline(&err));
    assert_eq!(h.slot(TOKEN_KEY).as_deref(), Some("still-valid"));
    assert!(h.notifier.notifications().is_empty());
    assert!(h.navigator.navigations().is_empty());

    let requests = h.server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_public_endpoint_forbidden_has_no_side_effects() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&h.server)
        .await;

    let err = h
        .auth()
        .register("ana@example.com", "Str0ng!pass")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert!(h.notifier.notifications().is_empty());
    assert!(h.navigator.navigations().is_empty());
}

#[tokio::test]
async fn test_forbidden_notifies_and_keeps_session() {
    let h = Harness::signed_in("abc").await;
    Mock::given(method("DELETE"))
        .and(path("/projects/3"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.projects().delete(3).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert!(reported_by_pipeline(&err));
    assert_eq!(h.slot(TOKEN_KEY).as_deref(), Some("abc"));
    assert_eq!(
        h.notifier.messages(),
        vec![(NotificationLevel::Error, ACCESS_DENIED_MESSAGE.to_string())]
    );
    assert!(h.navigator.navigations().is_empty());
}

#[tokio::test]
async fn test_bad_request_notifies_deduplicated_field_messages() {
    let h = Harness::signed_in("abc").await;
    Mock::given(method("POST"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Validation failed",
            "details": {"fieldErrors": [
                {"field": "name", "message": "Name is required"},
                {"field": "title", "message": "Name is required"},
                {"field": "value", "message": "Value must be positive"}
            ]}
        })))
        .mount(&h.server)
        .await;

    let input = projectdesk_core::validation::ProjectForm {
        name: "Bridge".to_string(),
        start_date: "01/03/2024".to_string(),
        ..Default::default()
    }
    .validate()
    .unwrap();
    let err = h.projects().create(&input).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        h.notifier.messages(),
        vec![(
            NotificationLevel::Warning,
            "Name is required Value must be positive".to_string()
        )]
    );
    assert!(h.session.is_authenticated());
    assert!(h.navigator.navigations().is_empty());
}

#[tokio::test]
async fn test_conflict_notifies_top_level_message() {
    let h = Harness::signed_in("abc").await;
    Mock::given(method("PUT"))
        .and(path("/projects/9"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"error": "Conflict", "message": "Name already in use"})),
        )
        .mount(&h.server)
        .await;

    let input = projectdesk_core::validation::ProjectForm {
        name: "Bridge".to_string(),
        start_date: "01/03/2024".to_string(),
        ..Default::default()
    }
    .validate()
    .unwrap();
    let err = h.projects().update(9, &input).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    assert_eq!(
        h.notifier.messages(),
        vec![(NotificationLevel::Warning, "Name already in use".to_string())]
    );
}

#[tokio::test]
async fn test_server_error_passes_through() {
    let h = Harness::signed_in("abc").await;
    Mock::given(method("GET"))
        .and(path("/projects/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&h.server)
        .await;

    let err = h.projects().get(1).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Server);
    assert!(!reported_by_pipeline(&err));
    assert!(h.notifier.notifications().is_empty());
    assert!(h.session.is_authenticated());
}

#[tokio::test]
async fn test_prefixed_legacy_token_is_sent_once() {
    let h = Harness::with_backend(
        MemoryStore::with_slots([("jwt", "Bearer Bearer legacy")]),
        Route::Projects,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(header("authorization", "Bearer legacy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 0, 10, 0)))
        .expect(1)
        .mount(&h.server)
        .await;

    let page = h.projects().list(&ListProjectsParams::default()).await.unwrap();

    assert!(page.content.is_empty());
    assert_eq!(h.slot(TOKEN_KEY).as_deref(), Some("legacy"));
    assert_eq!(h.slot("jwt"), None);
}

#[tokio::test]
async fn test_rate_limited_get_is_retried() {
    let h = Harness::signed_in("abc").await;
    Mock::given(method("GET"))
        .and(path("/projects/5"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/5"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json(5, "Bridge")))
        .expect(1)
        .mount(&h.server)
        .await;

    let project = h.projects().get(5).await.unwrap();

    assert_eq!(project.id, 5);
    assert!(h.notifier.notifications().is_empty());
}

#[tokio::test]
async fn test_rate_limited_write_is_not_retried() {
    let h = Harness::signed_in("abc").await;
    Mock::given(method("DELETE"))
        .and(path("/projects/5"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.projects().delete(5).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));
    assert_eq!(err.kind(), ErrorKind::Server);
    assert!(h.notifier.notifications().is_empty());
}
