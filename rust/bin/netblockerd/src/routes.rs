//! Route registration: system endpoints, session endpoints and module routes.

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::get;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::session;

/// Build the complete router.
///
/// Module routes are merged at the root since page paths such as
/// `/active` and `/details/{slug}` are not prefixed.
pub fn build_router(module_routes: Vec<(&str, Router)>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .merge(session::routes());

    for (name, router) in module_routes {
        info!("Mounting module {}", name);
        app = app.merge(router);
    }

    app.layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "netblockerd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = get_json(build_router(vec![]), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn version_reports_binary() {
        let (status, body) = get_json(build_router(vec![]), "/version").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "netblockerd");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn module_routes_are_merged_at_root() {
        let module = Router::new().route(
            "/active",
            get(|| async { axum::Json(serde_json::json!({"policies": []})) }),
        );
        let (status, body) = get_json(build_router(vec![("firewall", module)]), "/active").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["policies"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let req = Request::builder().uri("/nope").body(Body::empty()).unwrap();
        let resp = build_router(vec![]).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
