use axum::Json;
use axum::extract::{Path, State};

use netblocker_core::SessionCookie;

use super::ServiceState;
use crate::service::{DetailError, PolicyDetail, PolicyList};

// ---------------------------------------------------------------------------
// GET /active
// ---------------------------------------------------------------------------

pub(super) async fn active(
    State(service): State<ServiceState>,
    session: SessionCookie,
) -> Json<PolicyList> {
    Json(service.load_active(session.token()).await)
}

// ---------------------------------------------------------------------------
// GET /details/{slug}
// ---------------------------------------------------------------------------

pub(super) async fn details(
    State(service): State<ServiceState>,
    Path(slug): Path<String>,
    session: SessionCookie,
) -> Result<Json<PolicyDetail>, DetailError> {
    let detail = service.load_detail(session.token(), &slug).await?;
    Ok(Json(detail))
}
