//! Controllers against an in-process server speaking the service's HTTP contract

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use covergen::admin::{AdminController, FeedbackFilter};
use covergen::api::ApiClient;
use covergen::dashboard::{DashboardController, DeleteOutcome};
use covergen::generator::{GenerateForm, GeneratorController, ResultView, Step};
use covergen::Error;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

#[derive(Default)]
struct Mock {
    downloads: Vec<Value>,
    selections: usize,
    promotions: usize,
    admins: Vec<i64>,
    deleted_users: Vec<i64>,
    stats_calls: usize,
    generations: Vec<(String, String)>,
    dashboard_loads: usize,
    /// `/dashboard` answers 500 once it has been served this many times
    dashboard_limit: Option<usize>,
}

type Shared = Arc<Mutex<Mock>>;

// =============================================================================
// SERVER
// =============================================================================

async fn styles() -> Json<Value> {
    Json(json!(["Minimalist", "Tech"]))
}

async fn platforms() -> Json<Value> {
    Json(json!({
        "Hashnode": {"width": 1600, "height": 840},
        "Dev.to": {"width": 1000, "height": 420},
        "Custom": {"width": 0, "height": 0}
    }))
}

async fn generate(Json(body): Json<Value>) -> Response {
    if body["title"] == "fail" {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "quota exceeded"}))).into_response();
    }
    Json(json!({
        "generation_id": "g1",
        "images": ["/static/g1-0.png", "/static/g1-1.png"]
    }))
    .into_response()
}

async fn download(State(mock): State<Shared>, Json(body): Json<Value>) -> Response {
    mock.lock().downloads.push(body);
    ([(header::CONTENT_TYPE, "image/png")], Bytes::from_static(PNG)).into_response()
}

async fn update_selection(State(mock): State<Shared>) -> Json<Value> {
    mock.lock().selections += 1;
    Json(json!({"success": true}))
}

async fn users(State(mock): State<Shared>) -> Json<Value> {
    let mock = mock.lock();
    let rows: Vec<Value> = [
        (1, "ada", "ada@example.com", "2024-01-02T10:00:00", 12),
        (2, "bob", "bob@mail.test", "2024-02-03T10:00:00", 0),
    ]
    .into_iter()
    .filter(|(id, ..)| !mock.deleted_users.contains(id))
    .map(|(id, username, email, created_at, count)| {
        json!({"id": id, "username": username, "email": email,
               "is_admin": mock.admins.contains(&id), "created_at": created_at,
               "generation_count": count})
    })
    .collect();
    Json(Value::Array(rows))
}

async fn stats(State(mock): State<Shared>) -> Json<Value> {
    let mut mock = mock.lock();
    mock.stats_calls += 1;
    let users = 2 - mock.deleted_users.len();
    Json(json!({
        "total_users": users, "total_generations": 12, "total_images": 48,
        "users_today": 0, "users_this_week": 1, "users_this_month": users,
        "generations_today": 3, "generations_this_week": 5, "generations_this_month": 12
    }))
}

async fn promote(State(mock): State<Shared>, Path(id): Path<i64>) -> Json<Value> {
    let mut mock = mock.lock();
    mock.promotions += 1;
    mock.admins.push(id);
    Json(json!({"success": true, "message": "User promoted"}))
}

async fn demote(State(mock): State<Shared>, Path(id): Path<i64>) -> Json<Value> {
    mock.lock().admins.retain(|a| *a != id);
    Json(json!({"success": true, "message": "User demoted"}))
}

async fn delete_user(State(mock): State<Shared>, Path(id): Path<i64>) -> Json<Value> {
    mock.lock().deleted_users.push(id);
    Json(json!({"success": true, "message": "User deleted"}))
}

async fn feedback() -> Json<Value> {
    Json(json!([
        {"id": 1, "type": "bug", "rating": 2, "message": "Says \"oops\"", "status": "new",
         "created_at": "2024-03-09T08:15:00", "user": {"username": "ada", "email": "ada@example.com"}},
        {"id": 2, "type": "feature", "rating": null, "message": "WebP please", "status": "new",
         "created_at": "2024-03-10T08:15:00", "user": {"username": "guest"}}
    ]))
}

async fn dashboard(State(mock): State<Shared>) -> Response {
    let mut mock = mock.lock();
    if mock.dashboard_limit.is_some_and(|limit| mock.dashboard_loads >= limit) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    mock.dashboard_loads += 1;
    let cards: String = mock
        .generations
        .iter()
        .map(|(id, title)| {
            format!(
                r#"<div class="card" data-generation-id="{id}" data-title="{title}"><img src="/static/{id}.png"></div>"#
            )
        })
        .collect();
    Html(format!("<html><body>{}</body></html>", cards)).into_response()
}

async fn delete_generation(State(mock): State<Shared>, Path(id): Path<String>) -> Json<Value> {
    let mut mock = mock.lock();
    let before = mock.generations.len();
    mock.generations.retain(|(g, _)| *g != id);
    if mock.generations.len() < before {
        Json(json!({"success": true}))
    } else {
        Json(json!({"success": false, "error": "Generation not found"}))
    }
}

async fn spawn_server(mock: Shared) -> String {
    let app = Router::new()
        .route("/api/styles", get(styles))
        .route("/api/platforms", get(platforms))
        .route("/api/generate", post(generate))
        .route("/api/download", post(download))
        .route("/api/update-selection", post(update_selection))
        .route("/api/generation/:id", delete(delete_generation))
        .route("/dashboard", get(dashboard))
        .route("/admin/api/stats", get(stats))
        .route("/admin/api/users", get(users))
        .route("/admin/api/users/:id", delete(delete_user))
        .route("/admin/api/users/:id/promote", post(promote))
        .route("/admin/api/users/:id/demote", post(demote))
        .route("/admin/api/feedback", get(feedback))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn setup() -> (Shared, ApiClient) {
    let mock = Shared::default();
    let base = spawn_server(mock.clone()).await;
    (mock, ApiClient::new(&base, Some("session=test")).unwrap())
}

fn titled(title: &str) -> GenerateForm {
    GenerateForm {
        article_title: title.to_string(),
        style: "Tech".to_string(),
        ..Default::default()
    }
}

// =============================================================================
// GENERATOR
// =============================================================================

#[tokio::test]
async fn test_generate_select_download() {
    let (mock, api) = setup().await;
    let mut generator = GeneratorController::new(api);
    generator.load_catalog().await;
    assert_eq!(generator.state().styles(), ["Minimalist", "Tech"]);

    assert_eq!(generator.generate(&titled("Launch week")).await.unwrap(), 2);
    assert_eq!(generator.state().step(), Step::Result);
    assert_eq!(generator.state().result_view(), ResultView::Selection);

    generator.select_image(1).unwrap();
    generator.remember_selection().await.unwrap();
    assert_eq!(generator.state().platform(), "Hashnode");
    generator.state_mut().set_platform("Dev.to").unwrap();

    let image = generator.download().await.unwrap();
    assert_eq!(image.filename, "blog-cover-dev.to.png");
    assert_eq!(image.bytes, PNG);

    let mock = mock.lock();
    assert_eq!(mock.selections, 1);
    let body = &mock.downloads[0];
    assert_eq!(body["generation_id"], "g1");
    assert_eq!(body["selected_image_index"], 1);
    assert_eq!(body["platform"], "Dev.to");
    assert!(body.get("text_overlay").map_or(true, Value::is_null));
    assert!(body.get("custom_dims").map_or(true, Value::is_null));
}

#[tokio::test]
async fn test_overlay_sent_with_download() {
    let (mock, api) = setup().await;
    let mut generator = GeneratorController::new(api);
    generator.load_catalog().await;
    generator.generate(&titled("Launch week")).await.unwrap();
    generator.select_image(0).unwrap();

    generator.state_mut().overlay.text = "  Ship it\nnow ".to_string();
    generator.download().await.unwrap();

    let overlay = mock.lock().downloads[0]["text_overlay"].clone();
    assert_eq!(overlay["text"], "  Ship it\nnow ");
    assert_eq!(overlay["position"], "center");
    assert_eq!(overlay["shadow"], true);
}

#[tokio::test]
async fn test_generate_error_is_prefixed_and_state_kept() {
    let (_, api) = setup().await;
    let mut generator = GeneratorController::new(api);

    let err = generator.generate(&titled("fail")).await.unwrap_err();
    assert_eq!(err.to_string(), "Error generating images: quota exceeded");
    assert_eq!(generator.state().step(), Step::Input);
    assert!(generator.state().session().is_none());

    // busy flag was released
    assert_eq!(generator.generate(&titled("again")).await.unwrap(), 2);
}

#[tokio::test]
async fn test_small_custom_size_never_reaches_server() {
    let (mock, api) = setup().await;
    let mut generator = GeneratorController::new(api);
    generator.load_catalog().await;
    generator.generate(&titled("Launch week")).await.unwrap();
    generator.select_image(0).unwrap();

    let state = generator.state_mut();
    state.set_platform("Custom").unwrap();
    state.set_custom_dimensions(Some("50"), Some("630"));

    let err = generator.download().await.unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(
        err.to_string(),
        "Please specify valid width and height (minimum 100px)."
    );
    assert!(mock.lock().downloads.is_empty());

    generator
        .state_mut()
        .set_custom_dimensions(Some("1600"), Some("900"));
    generator.download().await.unwrap();
    let dims = mock.lock().downloads[0]["custom_dims"].clone();
    assert_eq!(dims, json!({"width": 1600, "height": 900}));
}

// =============================================================================
// ADMIN
// =============================================================================

#[tokio::test]
async fn test_promote_confirms_then_reloads_users() {
    let (mock, api) = setup().await;
    let admin = AdminController::new(api);
    admin.load_all_users().await.unwrap();

    let declined = admin.promote_user(2, "bob", |_| false).await.unwrap();
    assert!(declined.is_none());
    assert_eq!(mock.lock().promotions, 0);

    let message = admin
        .promote_user(2, "bob", |question| {
            assert_eq!(question, "Make bob an admin?");
            true
        })
        .await
        .unwrap();
    assert_eq!(message.as_deref(), Some("User promoted"));
    assert!(admin.cached_user(2).unwrap().is_admin);
}

#[tokio::test]
async fn test_demote_reloads_users() {
    let (mock, api) = setup().await;
    mock.lock().admins = vec![1];
    let admin = AdminController::new(api);
    admin.load_all_users().await.unwrap();
    assert!(admin.cached_user(1).unwrap().is_admin);

    let message = admin
        .demote_user(1, "ada", |question| {
            assert_eq!(question, "Remove admin privileges from ada?");
            true
        })
        .await
        .unwrap();
    assert_eq!(message.as_deref(), Some("User demoted"));
    assert!(!admin.cached_user(1).unwrap().is_admin);
    assert_eq!(mock.lock().stats_calls, 0);
}

#[tokio::test]
async fn test_delete_user_reloads_users_and_stats() {
    let (mock, api) = setup().await;
    let admin = AdminController::new(api);
    admin.load_all_users().await.unwrap();
    assert_eq!(mock.lock().stats_calls, 0);

    let message = admin.delete_user(2, "bob", |_| true).await.unwrap();
    assert_eq!(message.as_deref(), Some("User deleted"));
    assert_eq!(mock.lock().deleted_users, vec![2]);

    assert!(admin.cached_user(2).is_none());
    assert_eq!(admin.snapshot().users.len(), 1);
    assert_eq!(mock.lock().stats_calls, 1);
    assert_eq!(admin.snapshot().stats.unwrap().total_users, 1);
}

#[tokio::test]
async fn test_search_runs_on_cache() {
    let (_, api) = setup().await;
    let admin = AdminController::new(api);
    admin.load_all_users().await.unwrap();

    let found = admin.search_users("  MAIL.TEST ");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].username, "bob");
    assert_eq!(admin.search_users("").len(), 2);
    assert_eq!(admin.snapshot().users.len(), 2);
}

#[tokio::test]
async fn test_export_filtered_feedback() {
    let (_, api) = setup().await;
    let admin = AdminController::new(api);
    admin.load_feedback().await.unwrap();
    admin.filter_feedback(FeedbackFilter::Bug);

    let dir = tempfile::tempdir().unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
    let path = admin.export_feedback_csv(dir.path(), date).unwrap();

    assert_eq!(path.file_name().unwrap(), "feedback_bug_2024-03-11.csv");
    let content = std::fs::read_to_string(path).unwrap();
    assert_eq!(
        content,
        "Type,Username,Email,Rating,Message,Date\nbug,ada,ada@example.com,2,\"Says \"\"oops\"\"\",3/9/2024"
    );
}

// =============================================================================
// DASHBOARD
// =============================================================================

#[tokio::test]
async fn test_delete_last_card_reloads() {
    let (mock, api) = setup().await;
    mock.lock().generations = vec![
        ("g1".to_string(), "First post".to_string()),
        ("g2".to_string(), "Second post".to_string()),
    ];

    let mut dashboard = DashboardController::new(api);
    assert_eq!(dashboard.reload().await.unwrap(), 2);
    assert_eq!(
        dashboard.state().card("g2").unwrap().image_url.as_deref(),
        Some("/static/g2.png")
    );

    dashboard.state_mut().request_delete("g1", "First post");
    match dashboard.confirm_delete().await.unwrap() {
        DeleteOutcome::Removed { generation_id, remaining } => {
            assert_eq!(generation_id, "g1");
            assert_eq!(remaining, 1);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(mock.lock().dashboard_loads, 1);

    dashboard.state_mut().request_delete("g2", "Second post");
    assert!(matches!(
        dashboard.confirm_delete().await.unwrap(),
        DeleteOutcome::Reloaded { cards: 0 }
    ));
    assert_eq!(mock.lock().dashboard_loads, 2);
}

#[tokio::test]
async fn test_failed_delete_keeps_card() {
    let (mock, api) = setup().await;
    mock.lock().generations = vec![("g1".to_string(), "First post".to_string())];

    let mut dashboard = DashboardController::new(api);
    dashboard.reload().await.unwrap();
    mock.lock().generations.clear();

    dashboard.state_mut().request_delete("g1", "First post");
    let err = dashboard.confirm_delete().await.unwrap_err();
    assert_eq!(err.to_string(), "Generation not found");
    assert!(dashboard.state().card("g1").is_some());
}

#[tokio::test]
async fn test_delete_succeeds_when_reload_fails() {
    let (mock, api) = setup().await;
    {
        let mut mock = mock.lock();
        mock.generations = vec![("g1".to_string(), "First post".to_string())];
        mock.dashboard_limit = Some(1);
    }

    let mut dashboard = DashboardController::new(api);
    assert_eq!(dashboard.reload().await.unwrap(), 1);
    assert!(dashboard.reload().await.is_err());

    dashboard.state_mut().request_delete("g1", "First post");
    assert_eq!(
        dashboard.confirm_delete().await.unwrap(),
        DeleteOutcome::Reloaded { cards: 0 }
    );
    assert!(mock.lock().generations.is_empty());
    assert!(dashboard.state().cards().is_empty());
}

#[tokio::test]
async fn test_redownload_uses_default_platform() {
    let (mock, api) = setup().await;
    let dashboard = DashboardController::new(api);

    let image = dashboard.redownload("g9").await.unwrap();
    assert_eq!(image.filename, "blog-cover-hashnode.png");
    assert_eq!(image.bytes, PNG);

    let body = mock.lock().downloads[0].clone();
    assert_eq!(
        body,
        json!({"generation_id": "g9", "platform": "Hashnode", "selected_image_index": 0})
    );
}
