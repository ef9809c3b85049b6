mod actions;
mod pages;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::service::PolicyService;

type ServiceState = Arc<PolicyService>;

/// Build the firewall router.
///
/// Routes:
/// - `GET  /active`: managed policies, enriched
/// - `POST /active/delete`: delete by form field `policyName`
/// - `GET  /details/{slug}`: one policy with schedule and URL filter
/// - `POST /details/{slug}/delete`: delete, then redirect to `/active`
pub fn router(service: Arc<PolicyService>) -> Router {
    Router::new()
        .route("/active", get(pages::active))
        .route("/active/delete", post(actions::delete_from_list))
        .route("/details/{slug}", get(pages::details))
        .route("/details/{slug}/delete", post(actions::delete_from_detail))
        .with_state(service)
}
