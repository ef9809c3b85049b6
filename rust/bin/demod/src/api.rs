//! Demo API endpoints and static file hosting.

use std::collections::HashMap;
use std::path::Path;

use axum::extract::{Form, FromRequest, Path as UrlPath, Request};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rand::Rng;
use serde::Serialize;
use serde_json::{Value, json};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use netblocker_core::now_rfc3339;

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const ID_LEN: usize = 9;

#[derive(Debug, Clone, Serialize)]
pub struct DemoUser {
    pub id: u32,
    pub name: String,
    pub email: String,
}

/// Build the demo router. Anything not under `/api` falls through to `assets`.
pub fn build_router(assets: &Path) -> Router {
    Router::new()
        .route("/api/hello", get(hello))
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/data/{id}", get(data))
        .fallback_service(ServeDir::new(assets).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
}

async fn hello() -> Json<Value> {
    Json(json!({
        "message": "Hello from Elysia!",
        "timestamp": now_rfc3339(),
    }))
}

fn demo_users() -> Vec<DemoUser> {
    [
        (1, "Alice", "alice@example.com"),
        (2, "Bob", "bob@example.com"),
        (3, "Charlie", "charlie@example.com"),
    ]
    .into_iter()
    .map(|(id, name, email)| DemoUser {
        id,
        name: name.to_string(),
        email: email.to_string(),
    })
    .collect()
}

async fn list_users() -> Json<Vec<DemoUser>> {
    Json(demo_users())
}

/// Echo the submitted user back with a fresh random id. `user` is
/// omitted when the request has no body.
async fn create_user(req: Request) -> Response {
    let user = match read_body(req).await {
        Ok(user) => user,
        Err(rejection) => return rejection,
    };
    let id = random_id();
    info!("Created demo user {}", id);

    let mut body = json!({
        "success": true,
        "id": id,
    });
    if let Some(user) = user {
        body["user"] = user;
    }
    Json(body).into_response()
}

/// Decode a body by its content type: JSON as-is, form fields as an
/// object, anything else as text.
async fn read_body(req: Request) -> Result<Option<Value>, Response> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") {
        let Json(value) = Json::<Value>::from_request(req, &())
            .await
            .map_err(IntoResponse::into_response)?;
        return Ok(Some(value));
    }
    if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(fields) = Form::<HashMap<String, String>>::from_request(req, &())
            .await
            .map_err(IntoResponse::into_response)?;
        return Ok(Some(json!(fields)));
    }
    let text = String::from_request(req, &())
        .await
        .map_err(IntoResponse::into_response)?;
    Ok((!text.is_empty()).then_some(Value::String(text)))
}

async fn data(UrlPath(id): UrlPath<String>) -> Json<Value> {
    Json(json!({
        "id": id,
        "data": format!("Data for item {id}"),
        "fetched": now_rfc3339(),
    }))
}

fn random_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}
