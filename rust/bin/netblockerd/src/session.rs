//! Browser session endpoints.
//!
//! The token itself lives in the `authToken` cookie. These endpoints only
//! report who the cookie belongs to and expire it when it is no longer good.

use axum::Json;
use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::json;
use tracing::{debug, info};

use netblocker_core::cookie::clear_session_cookie;
use netblocker_core::{SessionCookie, decode_hint};

pub fn routes() -> Router {
    Router::new()
        .route("/session", get(current_session))
        .route("/logout", post(logout))
}

/// `GET /session`: `{"user": {name, role}}` or `{"user": null}`.
///
/// A stale cookie is answered with a `Set-Cookie` that expires it.
async fn current_session(session: SessionCookie) -> Response {
    match session {
        SessionCookie::Live(token) => {
            let user = decode_hint(&token).map(|hint| hint.user());
            Json(json!({ "user": user })).into_response()
        }
        SessionCookie::Stale => {
            debug!("expiring stale session cookie");
            ([clear_session_cookie()], Json(json!({ "user": null }))).into_response()
        }
        SessionCookie::Missing => Json(json!({ "user": null })).into_response(),
    }
}

/// `POST /logout`: expire the session cookie.
async fn logout(session: SessionCookie) -> Response {
    if let Some(user) = session.token().and_then(decode_hint).and_then(|h| h.name) {
        info!("Logged out {}", user);
    }
    ([clear_session_cookie()], Json(json!({ "success": true }))).into_response()
}
