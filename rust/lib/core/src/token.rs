//! Bearer token display hints.
//!
//! Decodes the payload segment of a JWT-shaped token WITHOUT verifying
//! its signature. A [`TokenHint`] decides what the UI shows and whether
//! cached session state is kept. It is never an access-control decision:
//! the upstream firewall API validates every token it receives.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::Deserialize;

use crate::session::User;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// Standard alphabet, padding optional.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// URL-safe alphabet (what real JWTs use), padding optional.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Unverified claims read from a token payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenHint {
    /// Expiration, seconds since the epoch.
    #[serde(default)]
    pub exp: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl TokenHint {
    /// Expiry timestamp, if one is set. Zero counts as unset.
    pub fn expires_at(&self) -> Option<f64> {
        self.exp.filter(|exp| *exp != 0.0)
    }

    /// A hint without an expiry is always expired.
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        match self.expires_at() {
            Some(exp) => now_secs as f64 >= exp,
            None => true,
        }
    }

    /// The user to display for this token.
    pub fn user(&self) -> User {
        User {
            name: self.name.clone().unwrap_or_default(),
            role: self.role.clone().unwrap_or_default(),
        }
    }
}

/// Decode the payload of `token`. Returns `None` on any malformation.
pub fn decode_hint(token: &str) -> Option<TokenHint> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_LENIENT
        .decode(payload)
        .or_else(|_| STANDARD_LENIENT.decode(payload))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Whether `token` should be treated as expired right now.
///
/// Missing, malformed and expired tokens are indistinguishable here.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, chrono::Utc::now().timestamp())
}

pub fn is_expired_at(token: &str, now_secs: i64) -> bool {
    decode_hint(token).is_none_or(|hint| hint.is_expired_at(now_secs))
}
