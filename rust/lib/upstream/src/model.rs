//! Wire models of the upstream firewall API.
//!
//! Unknown fields are preserved in `extra` so records can be handed back
//! to callers unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A named address object referenced by a policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A firewall policy. Read-only mirror of the upstream record, plus the
/// fields the dashboard derives while enriching it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default, deserialize_with = "null_as_default")]
    pub policyid: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Name of the one-time schedule this policy runs under.
    #[serde(default, deserialize_with = "null_as_default")]
    pub schedule: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub srcaddr: Vec<AddressRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dstaddr: Vec<AddressRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: String,
    #[serde(
        rename = "webfilter-profile",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub webfilter_profile: Option<String>,

    // Derived during enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(
        rename = "templateNames",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub template_names: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Policy {
    /// Web-filter profile name, if the policy references one.
    pub fn webfilter(&self) -> Option<&str> {
        self.webfilter_profile.as_deref().filter(|p| !p.is_empty())
    }
}

/// A named one-time schedule window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnetimeSchedule {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A URL-filter table attached to a web-filter profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlFilter {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub entries: Option<Vec<UrlFilterEntry>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlFilterEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UrlFilterEntry {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            extra: Map::new(),
        }
    }
}
