//! Policy loaders and delete actions.
//!
//! Loaders never fail the list page: upstream trouble degrades to an
//! empty list. The detail page is stricter and reports not-found and
//! server errors separately.

use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{IntoResponse, Response};
use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use netblocker_core::ServiceError;
use netblocker_upstream::{FirewallClient, OnetimeSchedule, Policy, UpstreamError, UrlFilter};

use crate::policy::filter_managed;
use crate::templates::{SIGNATURES, detect_templates};

/// Where the list view lives; detail deletes redirect here.
pub const LIST_PATH: &str = "/active";

/// Where unauthenticated detail requests are sent.
pub const LOGIN_PATH: &str = "/login";

// ── Results ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct PolicyList {
    pub policies: Vec<Policy>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicyDetail {
    pub slug: String,
    pub policy: Policy,
    pub schedule: Option<OnetimeSchedule>,
    pub webfilter: Option<UrlFilter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSuccess {
    pub success: bool,
}

/// A successful action that sends the browser elsewhere.
///
/// Redirects are results, not errors, so no error handler can swallow one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub status: StatusCode,
    pub location: String,
}

impl Redirect {
    /// 302 Found.
    pub fn found(location: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FOUND,
            location: location.into(),
        }
    }

    /// 303 See Other, the answer to a completed form POST.
    pub fn see_other(location: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SEE_OTHER,
            location: location.into(),
        }
    }
}

impl IntoResponse for Redirect {
    fn into_response(self) -> Response {
        (self.status, [(LOCATION, self.location)]).into_response()
    }
}

/// Why the detail page could not be produced.
#[derive(Debug, Error)]
pub enum DetailError {
    /// No usable session token; the browser goes to the login page.
    #[error("login required")]
    LoginRequired,

    #[error("Policy not found")]
    NotFound,

    #[error("Server error while loading details")]
    Server,
}

impl IntoResponse for DetailError {
    fn into_response(self) -> Response {
        match self {
            DetailError::LoginRequired => Redirect::found(LOGIN_PATH).into_response(),
            DetailError::NotFound => ServiceError::NotFound(self.to_string()).into_response(),
            DetailError::Server => ServiceError::Internal(self.to_string()).into_response(),
        }
    }
}

// ── PolicyService ───────────────────────────────────────────────────

/// Reads, enriches and deletes firewall policies on behalf of a session.
pub struct PolicyService {
    client: FirewallClient,
}

impl PolicyService {
    pub fn new(client: FirewallClient) -> Self {
        Self { client }
    }

    /// Managed policies with their schedule window and detected templates.
    ///
    /// Never fails: a missing token or any top-level upstream failure
    /// yields an empty list.
    pub async fn load_active(&self, token: Option<&str>) -> PolicyList {
        let Some(token) = token else {
            warn!("no session token, serving empty policy list");
            return PolicyList::default();
        };

        let policies = match self.client.list_policies(token).await {
            Ok(policies) => policies,
            Err(e) => {
                error!("policy list fetch failed: {}", e);
                return PolicyList::default();
            }
        };

        let managed = filter_managed(policies);
        let policies = join_all(managed.into_iter().map(|p| self.enrich(token, p))).await;
        PolicyList { policies }
    }

    /// Attach schedule start/end and template names. Sub-fetch failures
    /// are logged and leave the corresponding fields unset.
    async fn enrich(&self, token: &str, mut policy: Policy) -> Policy {
        let schedule = async {
            if policy.schedule.is_empty() {
                return None;
            }
            Some(self.client.onetime_schedule(token, &policy.schedule).await)
        };
        let webfilter = async {
            match policy.webfilter() {
                Some(profile) => Some(self.client.urlfilter(token, profile).await),
                None => None,
            }
        };
        let (schedule, webfilter) = tokio::join!(schedule, webfilter);

        match schedule {
            Some(Ok(Some(window))) => {
                policy.start = window.start;
                policy.end = window.end;
            }
            Some(Err(e)) => warn!(policy = %policy.name, "schedule fetch failed: {}", e),
            _ => {}
        }

        match webfilter {
            Some(Ok(Some(UrlFilter {
                entries: Some(entries),
                ..
            }))) => {
                policy.template_names = Some(detect_templates(&entries, SIGNATURES));
            }
            Some(Err(e)) => warn!(policy = %policy.name, "webfilter fetch failed: {}", e),
            _ => {}
        }

        policy
    }

    /// One policy by exact name, with its schedule and URL filter.
    ///
    /// The upstream has no lookup by name, so the whole collection is
    /// fetched and searched.
    pub async fn load_detail(
        &self,
        token: Option<&str>,
        slug: &str,
    ) -> Result<PolicyDetail, DetailError> {
        let token = token.ok_or(DetailError::LoginRequired)?;

        let policies = self.client.list_policies(token).await.map_err(|e| {
            error!(slug, "policy list fetch failed: {}", e);
            DetailError::Server
        })?;

        let policy = policies
            .into_iter()
            .find(|p| p.name == slug)
            .ok_or(DetailError::NotFound)?;

        // Both lookups run even when the policy carries no reference.
        let profile = policy.webfilter_profile.as_deref().unwrap_or_default();
        let (schedule, webfilter) = tokio::join!(
            self.client.onetime_schedule(token, &policy.schedule),
            self.client.urlfilter_by_name(token, profile),
        );

        Ok(PolicyDetail {
            slug: slug.to_string(),
            schedule: detail_part(slug, "schedule", schedule)?,
            webfilter: detail_part(slug, "webfilter", webfilter)?,
            policy,
        })
    }

    /// Delete action of the list view. On success the caller reloads the list.
    pub async fn delete_from_list(
        &self,
        token: Option<&str>,
        policy_name: Option<&str>,
    ) -> Result<ActionSuccess, ServiceError> {
        let name = policy_name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ServiceError::Validation("Policy Name is missing".into()))?;
        let token = token.ok_or_else(|| ServiceError::Unauthorized("Unauthorized".into()))?;

        match self.client.delete_policy(token, name).await {
            Ok(()) => {
                info!(policy = name, "policy deleted");
                Ok(ActionSuccess { success: true })
            }
            Err(UpstreamError::Status { status, .. }) => Err(ServiceError::Upstream {
                status,
                message: "Failed to delete policy at backend".into(),
            }),
            Err(e) => {
                error!(policy = name, "delete failed: {}", e);
                Err(ServiceError::Internal("Server connection failed".into()))
            }
        }
    }

    /// Delete action of the detail view. Success redirects to the list.
    pub async fn delete_from_detail(
        &self,
        token: Option<&str>,
        slug: &str,
    ) -> Result<Redirect, ServiceError> {
        let token = token.ok_or_else(|| ServiceError::Unauthorized("Unauthorized".into()))?;

        match self.client.delete_policy(token, slug).await {
            Ok(()) => {
                info!(policy = slug, "policy deleted");
                Ok(Redirect::see_other(LIST_PATH))
            }
            Err(UpstreamError::Status { status, .. }) => Err(ServiceError::Upstream {
                status,
                message: "Failed to delete policy".into(),
            }),
            Err(e) => {
                error!(policy = slug, "delete failed: {}", e);
                Err(ServiceError::Internal("Connection error".into()))
            }
        }
    }
}

/// A rejected sub-lookup is simply absent; a broken one fails the page.
fn detail_part<T>(
    slug: &str,
    what: &str,
    result: Result<Option<T>, UpstreamError>,
) -> Result<Option<T>, DetailError> {
    match result {
        Ok(found) => Ok(found),
        Err(UpstreamError::Status { status, .. }) => {
            warn!(slug, "{} lookup returned {}", what, status);
            Ok(None)
        }
        Err(e) => {
            error!(slug, "{} lookup failed: {}", what, e);
            Err(DetailError::Server)
        }
    }
}
