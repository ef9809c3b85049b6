//! Policy commands: `netblocker list`, `netblocker show <name>`,
//! `netblocker delete <name>`.

use std::io::Write;

use anyhow::Result;
use firewall::DetailError;
use firewall::service::PolicyService;
use netblocker_core::UserSession;
use netblocker_upstream::Policy;

/// The stored token, or an error telling the operator to log in.
fn require_token(session: &UserSession) -> Result<String> {
    session
        .token()?
        .ok_or_else(|| anyhow::anyhow!("Not logged in. Run `netblocker login --token <jwt>`."))
}

/// Print managed policies as a table.
pub async fn list(service: &PolicyService, session: &UserSession, out: &mut impl Write) -> Result<()> {
    let token = require_token(session)?;
    let list = service.load_active(Some(&token)).await;

    if list.policies.is_empty() {
        writeln!(out, "No managed policies.")?;
        return Ok(());
    }

    writeln!(out, "{:<28} {:<8} {:<36} TEMPLATES", "NAME", "STATUS", "WINDOW")?;
    for policy in &list.policies {
        writeln!(out, "{}", row(policy))?;
    }
    Ok(())
}

fn row(policy: &Policy) -> String {
    let window = match (&policy.start, &policy.end) {
        (Some(start), Some(end)) => format!("{start} - {end}"),
        _ => "-".to_string(),
    };
    let templates = match &policy.template_names {
        Some(names) if !names.is_empty() => names.join(", "),
        _ => "-".to_string(),
    };
    format!(
        "{:<28} {:<8} {:<36} {}",
        policy.name, policy.status, window, templates
    )
}

/// Print one policy with its schedule and URL filter as JSON.
pub async fn show(
    service: &PolicyService,
    session: &UserSession,
    name: &str,
    out: &mut impl Write,
) -> Result<()> {
    let token = session.token()?;
    let detail = match service.load_detail(token.as_deref(), name).await {
        Ok(detail) => detail,
        Err(DetailError::LoginRequired) => {
            anyhow::bail!("Not logged in. Run `netblocker login --token <jwt>`.")
        }
        Err(e) => anyhow::bail!("{}: {}", name, e),
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&detail)?)?;
    Ok(())
}

pub async fn delete(
    service: &PolicyService,
    session: &UserSession,
    name: &str,
    out: &mut impl Write,
) -> Result<()> {
    let token = session.token()?;
    service
        .delete_from_detail(token.as_deref(), name)
        .await
        .map_err(|e| anyhow::anyhow!("Error ({}): {}", e.status_code(), e))?;
    writeln!(out, "policy {} deleted.", name)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::Router;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{self, get};
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use firewall::policy::MANAGED_COMMENT;
    use netblocker_core::MemoryStorage;
    use netblocker_upstream::FirewallClient;
    use netblocker_upstream::testing::spawn_fake;
    use serde_json::json;

    async fn service() -> PolicyService {
        let router = Router::new()
            .route(
                "/firewall/policies",
                get(|| async {
                    axum::Json(json!([
                        {"name": "exam-room", "status": "enable", "schedule": "exam",
                         "comments": MANAGED_COMMENT},
                        {"name": "hand-made", "status": "enable", "comments": ""}
                    ]))
                }),
            )
            .route(
                "/firewall/schedule/onetime/{name}",
                get(|| async {
                    axum::Json(json!({"results": [
                        {"name": "exam", "start": "2026/10/15 08:00", "end": "2026/10/15 12:00"}
                    ]}))
                }),
            )
            .route(
                "/firewall/webfilter/urlfilter/name/{name}",
                get(|| async { StatusCode::NOT_FOUND }),
            )
            .route(
                "/firewall/policies/fullhouse/delete/{name}",
                routing::delete(|Path(name): Path<String>| async move {
                    if name == "exam-room" { StatusCode::OK } else { StatusCode::FORBIDDEN }
                }),
            );
        let base = spawn_fake(router).await;
        PolicyService::new(FirewallClient::new(&base).unwrap())
    }

    fn logged_in() -> UserSession {
        let exp = chrono::Utc::now().timestamp() + 600;
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp},"name":"nok"}}"#));
        let mut session = UserSession::init(Arc::new(MemoryStorage::new())).unwrap();
        session.login(&format!("h.{payload}.s")).unwrap();
        session
    }

    fn anonymous() -> UserSession {
        UserSession::init(Arc::new(MemoryStorage::new())).unwrap()
    }

    #[tokio::test]
    async fn list_prints_managed_policies_only() {
        let service = service().await;
        let mut buf = Vec::new();
        list(&service, &logged_in(), &mut buf).await.unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("NAME"));
        assert!(lines[1].starts_with("exam-room"));
        assert!(lines[1].contains("2026/10/15 08:00 - 2026/10/15 12:00"));
        assert!(!text.contains("hand-made"));
    }

    #[tokio::test]
    async fn list_requires_login() {
        let service = service().await;
        let err = list(&service, &anonymous(), &mut Vec::new()).await.unwrap_err();
        assert!(err.to_string().starts_with("Not logged in"));
    }

    #[tokio::test]
    async fn show_prints_detail_json() {
        let service = service().await;
        let mut buf = Vec::new();
        show(&service, &logged_in(), "exam-room", &mut buf).await.unwrap();
        let detail: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(detail["slug"], "exam-room");
        assert_eq!(detail["schedule"]["start"], "2026/10/15 08:00");
        assert_eq!(detail["webfilter"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn show_unknown_policy_fails() {
        let service = service().await;
        let err = show(&service, &logged_in(), "ghost", &mut Vec::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "ghost: Policy not found");
    }

    #[tokio::test]
    async fn delete_reports_outcome() {
        let service = service().await;
        let mut buf = Vec::new();
        delete(&service, &logged_in(), "exam-room", &mut buf).await.unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "policy exam-room deleted.\n");

        let err = delete(&service, &logged_in(), "other", &mut Vec::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Error (403 Forbidden): Failed to delete policy");
    }

    #[test]
    fn row_without_enrichment_uses_dashes() {
        let policy: Policy = serde_json::from_value(json!({"name": "p", "status": "disable"})).unwrap();
        let line = row(&policy);
        assert!(line.starts_with("p "));
        assert!(line.ends_with(" -"));
        assert!(line.contains("disable"));
    }
}
