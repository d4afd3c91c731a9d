//! Integration tests for the reservation backend.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::client::{ClientError, ReservationApi, ReservationForm, ReservationStore};
use crate::db::{init_database, Repository};
use crate::handlers;
use crate::service::ReservationService;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    state: AppState,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let service = ReservationService::new(Arc::new(Repository::new(pool)));

        let state = AppState { service };

        let app = create_router(state.clone());

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            state,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, payload: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/reservations"))
            .json(payload)
            .send()
            .await
            .unwrap()
    }

    async fn count(&self) -> usize {
        self.state.service.list_all().await.unwrap().len()
    }
}

fn standup() -> Value {
    json!({
        "title": "Standup",
        "date": "2024-01-10",
        "startTime": "09:00",
        "endTime": "09:15",
        "roomNumber": "101"
    })
}

#[tokio::test]
async fn test_health_and_index() {
    let fixture = TestFixture::new().await;

    let resp = fixture.client.get(fixture.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");

    let resp = fixture.client.get(fixture.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_standup_scenario() {
    let fixture = TestFixture::new().await;

    // Create
    let create_resp = fixture.create(&standup()).await;
    assert_eq!(create_resp.status(), 201);
    let created: Value = create_resp.json().await.unwrap();
    for field in ["title", "date", "startTime", "endTime", "roomNumber"] {
        assert_eq!(created[field], standup()[field]);
    }
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["createdAt"], created["updatedAt"]);

    // Get
    let get_resp = fixture
        .client
        .get(fixture.url(&format!("/reservations/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(get_resp.status(), 200);
    let fetched: Value = get_resp.json().await.unwrap();
    assert_eq!(fetched, created);

    // Delete
    let delete_resp = fixture
        .client
        .delete(fixture.url(&format!("/reservations/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(delete_resp.status(), 200);
    let deleted: Value = delete_resp.json().await.unwrap();
    assert_eq!(deleted["id"], id.as_str());
    assert!(deleted["message"].is_string());

    // Gone
    let get_resp = fixture
        .client
        .get(fixture.url(&format!("/reservations/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(get_resp.status(), 404);
    let body: Value = get_resp.json().await.unwrap();
    assert_eq!(body["message"], format!("Reservation {} not found", id));
}

#[tokio::test]
async fn test_round_trip_keeps_optional_and_extra_fields() {
    let fixture = TestFixture::new().await;
    let mut payload = standup();
    payload["attendees"] = json!(["Alice", "Bob"]);
    payload["description"] = json!("Daily sync");
    payload["roomId"] = json!("101");
    payload["projector"] = json!(true);

    let created: Value = fixture.create(&payload).await.json().await.unwrap();

    let fetched: Value = fixture
        .client
        .get(fixture.url(&format!("/reservations/{}", created["id"].as_str().unwrap())))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let mut expected = payload.clone();
    for field in ["id", "createdAt", "updatedAt"] {
        expected[field] = fetched[field].clone();
    }
    assert_eq!(fetched, expected);

    // The older comma-joined shape is stored as sent.
    let mut joined = standup();
    joined["attendees"] = json!("Alice, Bob");
    let created: Value = fixture.create(&joined).await.json().await.unwrap();
    assert_eq!(created["attendees"], "Alice, Bob");
}

#[tokio::test]
async fn test_missing_fields_are_rejected_on_create() {
    let fixture = TestFixture::new().await;

    for field in ["title", "date", "startTime", "endTime", "roomNumber"] {
        let mut payload = standup();
        payload.as_object_mut().unwrap().remove(field);

        let resp = fixture.create(&payload).await;

        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], format!("{} is a required field", field));
    }

    assert_eq!(fixture.count().await, 0);
}

#[tokio::test]
async fn test_values_keep_their_json_type() {
    let fixture = TestFixture::new().await;
    let mut payload = standup();
    payload["roomNumber"] = json!(101);
    payload["attendees"] = json!(["Alice", null]);
    payload["description"] = Value::Null;

    let resp = fixture.create(&payload).await;
    assert_eq!(resp.status(), 201);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["roomNumber"], 101);
    assert_eq!(created["attendees"], json!(["Alice", null]));
    assert_eq!(created.get("description"), Some(&Value::Null));

    let fetched: Value = fixture
        .client
        .get(fixture.url(&format!("/reservations/{}", created["id"].as_str().unwrap())))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_update_merges_and_refreshes_timestamp() {
    let fixture = TestFixture::new().await;
    let mut payload = standup();
    payload["description"] = json!("Daily sync");
    let created: Value = fixture.create(&payload).await.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let mut changes = standup();
    changes["title"] = json!("Extended standup");
    changes["endTime"] = json!("09:45");

    let resp = fixture
        .client
        .put(fixture.url(&format!("/reservations/{}", id)))
        .json(&changes)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["title"], "Extended standup");
    assert_eq!(updated["endTime"], "09:45");
    assert_eq!(updated["description"], "Daily sync");
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert!(updated["updatedAt"].as_str().unwrap() > created["updatedAt"].as_str().unwrap());
}

#[tokio::test]
async fn test_update_missing_field_and_unknown_id() {
    let fixture = TestFixture::new().await;
    let created: Value = fixture.create(&standup()).await.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let mut payload = standup();
    payload.as_object_mut().unwrap().remove("startTime");
    let resp = fixture
        .client
        .put(fixture.url(&format!("/reservations/{}", id)))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "startTime is a required field");

    let resp = fixture
        .client
        .put(fixture.url("/reservations/does-not-exist"))
        .json(&standup())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(fixture.count().await, 1);
}

#[tokio::test]
async fn test_delete_unknown_id_is_not_found() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .delete(fixture.url("/reservations/does-not-exist"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Reservation does-not-exist not found");
}

#[tokio::test]
async fn test_malformed_body_is_internal_error() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/reservations"))
        .header("content-type", "application/json")
        .body("{\"title\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].is_string());
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_every_response_carries_cors_headers() {
    let fixture = TestFixture::new().await;

    let ok = fixture
        .client
        .get(fixture.url("/reservations"))
        .send()
        .await
        .unwrap();
    let missing = fixture
        .client
        .get(fixture.url("/reservations/nope"))
        .send()
        .await
        .unwrap();
    let invalid = fixture.create(&json!({})).await;

    for resp in [ok, missing, invalid] {
        let headers = resp.headers();
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-credentials"], "true");
    }
}

#[tokio::test]
async fn test_server_accepts_end_before_start_but_form_rejects_it() {
    let fixture = TestFixture::new().await;
    let mut payload = standup();
    payload["startTime"] = json!("10:00");
    payload["endTime"] = json!("09:00");

    let resp = fixture.create(&payload).await;
    assert_eq!(resp.status(), 201);

    let mut form = ReservationForm::new().with_date("2024-01-10");
    form.title = "Standup".to_string();
    form.start_time = "10:00".to_string();
    form.end_time = "09:00".to_string();
    form.room_number = "101".to_string();
    form.description = "Daily sync".to_string();
    form.add_attendee("Alice");

    assert!(form.submit().is_none());
    assert_eq!(form.errors().len(), 1);
}

#[tokio::test]
async fn test_unknown_route_and_method() {
    let fixture = TestFixture::new().await;

    let resp = fixture.client.get(fixture.url("/rooms")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Route not found");

    let resp = fixture
        .client
        .patch(fixture.url("/reservations/abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);
}

#[tokio::test]
async fn test_router_and_direct_invocation_agree() {
    let fixture = TestFixture::new().await;
    fixture.create(&standup()).await;

    let cases: [(Method, &str, &str); 9] = [
        (Method::GET, "/reservations", ""),
        (Method::GET, "/reservations/missing", ""),
        (Method::GET, "/reservations/a%20b", ""),
        (Method::DELETE, "/reservations/caf%C3%A9", ""),
        (Method::GET, "/reservations/%FF", ""),
        (Method::PATCH, "/reservations/%FF", ""),
        (Method::POST, "/reservations", r#"{"date":"2024-01-10"}"#),
        (Method::DELETE, "/reservations/missing", ""),
        (Method::GET, "/nowhere", ""),
    ];

    for (method, path, body) in cases {
        let direct =
            handlers::invoke(&fixture.state.service, &method, path, body.to_string()).await;

        let request = Request::builder()
            .method(method.clone())
            .uri(path)
            .body(Body::from(body.to_string()))
            .unwrap();
        let routed = create_router(fixture.state.clone())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(routed.status(), direct.status, "{} {}", method, path);
        let bytes = axum::body::to_bytes(routed.into_body(), usize::MAX)
            .await
            .unwrap();
        let routed_body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(routed_body, direct.body, "{} {}", method, path);
    }

    let escaped =
        handlers::invoke(&fixture.state.service, &Method::GET, "/reservations/a%20b", "").await;
    assert_eq!(escaped.body["message"], "Reservation a b not found");

    assert_eq!(
        handlers::invoke(&fixture.state.service, &Method::GET, "/reservations", "")
            .await
            .status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_client_api() {
    let fixture = TestFixture::new().await;
    let api = ReservationApi::new(format!("{}/", fixture.base_url)).unwrap();

    let mut form = ReservationForm::new().with_date("2024-01-10").with_start_time("09:00");
    form.title = "Planning".to_string();
    form.room_number = "201".to_string();
    form.description = "Quarterly planning".to_string();
    form.add_attendee("Alice");
    let input = form.submit().unwrap();

    let created = api.create(&input).await.unwrap();
    assert_eq!(created.title, "Planning");
    assert_eq!(created.end_time, "10:00");
    assert_eq!(created.room_id.as_deref(), Some("201"));

    let fetched = api.get(&created.id).await.unwrap();
    assert_eq!(fetched, created);

    let mut edit = ReservationForm::from_reservation(&fetched);
    edit.title = "Planning (moved)".to_string();
    edit.room_number = "202".to_string();
    let updated = api.update(&created.id, &edit.submit().unwrap()).await.unwrap();
    assert_eq!(updated.room_number, "202");
    assert_eq!(updated.created_at, created.created_at);

    assert_eq!(api.list().await.unwrap().len(), 1);

    let deleted = api.delete(&created.id).await.unwrap();
    assert_eq!(deleted.id, created.id);

    match api.get(&created.id).await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, format!("Reservation {} not found", created.id));
        }
        other => panic!("expected 404, got {:?}", other),
    }
}

#[tokio::test]
async fn test_store_over_http() {
    let fixture = TestFixture::new().await;
    let api = ReservationApi::new(fixture.base_url.clone()).unwrap();
    let mut store = ReservationStore::new(api);

    assert!(store.fetch_reservations().await);
    assert!(store.reservations().is_empty());

    let mut form = ReservationForm::new().with_date("2024-01-10");
    form.title = "Standup".to_string();
    form.room_number = "101".to_string();
    form.description = "Daily sync".to_string();
    form.add_attendee("Alice");
    let created = store
        .create_reservation(&form.submit().unwrap())
        .await
        .unwrap();

    assert_eq!(store.reservations().len(), 1);
    assert!(!store.loading());
    assert!(store.error().is_none());

    assert!(store.delete_reservation(&created.id).await);
    assert!(store.reservations().is_empty());

    assert!(!store.delete_reservation(&created.id).await);
    assert!(store.error().is_some());
    assert!(!store.loading());
}
