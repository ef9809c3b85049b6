use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Path, State};
use axum::Json;
use serde::Deserialize;

use netblocker_core::{ServiceError, SessionCookie};

use super::ServiceState;
use crate::service::{ActionSuccess, Redirect};

#[derive(Debug, Deserialize)]
pub(super) struct DeleteForm {
    #[serde(rename = "policyName")]
    policy_name: Option<String>,
}

// ---------------------------------------------------------------------------
// POST /active/delete
// ---------------------------------------------------------------------------

/// An unreadable form body is treated as a form without `policyName`.
pub(super) async fn delete_from_list(
    State(service): State<ServiceState>,
    session: SessionCookie,
    form: Result<Form<DeleteForm>, FormRejection>,
) -> Result<Json<ActionSuccess>, ServiceError> {
    let name = form.ok().and_then(|Form(f)| f.policy_name);
    let done = service
        .delete_from_list(session.token(), name.as_deref())
        .await?;
    Ok(Json(done))
}

// ---------------------------------------------------------------------------
// POST /details/{slug}/delete
// ---------------------------------------------------------------------------

pub(super) async fn delete_from_detail(
    State(service): State<ServiceState>,
    Path(slug): Path<String>,
    session: SessionCookie,
) -> Result<Redirect, ServiceError> {
    service.delete_from_detail(session.token(), &slug).await
}
