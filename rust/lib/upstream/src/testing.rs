//! In-process stand-in for the firewall API.
//!
//! Tests describe the upstream behaviour they need as an axum `Router`;
//! [`spawn_fake`] serves it on an ephemeral localhost port and returns
//! the base URL to point a [`crate::FirewallClient`] at.

use axum::Router;

/// Serve `router` on `127.0.0.1:0` and return its base URL.
pub async fn spawn_fake(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake upstream");
    let addr = listener.local_addr().expect("fake upstream address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{}", addr)
}
