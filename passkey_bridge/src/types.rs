use std::fmt;

use serde::{Deserialize, Serialize};

/// Inbound event carrying an authentication challenge.
pub const EVENT_PUBLIC_KEY_GET: &str = "public_key_get";

/// Inbound event carrying a registration challenge.
pub const EVENT_PUBLIC_KEY_GEN: &str = "public_key_gen";

/// Outbound event carrying the encoded credential.
pub const EVENT_CLIENT_RESPONSE: &str = "client_response";

/// Field of the outbound event that wraps the [`ResponsePayload`](crate::ResponsePayload).
pub const RESPONSE_FIELD: &str = "response";

/// The two public-key credential ceremonies the bridge can drive.
///
/// Registration maps to the platform's `create` operation and authentication
/// to `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CeremonyKind {
    Registration,
    Authentication,
}

impl CeremonyKind {
    /// Resolve the ceremony an inbound event name asks for.
    pub fn from_event(event: &str) -> Option<Self> {
        match event {
            EVENT_PUBLIC_KEY_GEN => Some(Self::Registration),
            EVENT_PUBLIC_KEY_GET => Some(Self::Authentication),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::Authentication => "authentication",
        }
    }
}

impl fmt::Display for CeremonyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relying party and (optionally) user a ceremony is bound to.
///
/// At most one ceremony may be in flight per scope. Authentication ceremonies
/// carry no user, so they are exclusive per relying party.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialScope {
    rp_id: String,
    user_id: Option<Vec<u8>>,
}

impl CredentialScope {
    pub fn new(rp_id: impl Into<String>, user_id: Option<Vec<u8>>) -> Self {
        Self {
            rp_id: rp_id.into(),
            user_id,
        }
    }

    pub fn rp_id(&self) -> &str {
        &self.rp_id
    }
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.user_id {
            Some(id) => write!(f, "{}/user[{} bytes]", self.rp_id, id.len()),
            None => f.write_str(&self.rp_id),
        }
    }
}

/// Credential mediation requirement passed through to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mediation {
    Silent,
    Optional,
    Conditional,
    Required,
}
