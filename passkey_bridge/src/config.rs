use std::{env, sync::LazyLock, time::Duration};

use url::Url;

use crate::decoder::WireEncoding;

/// Settings read from the environment on first use.
pub(crate) static BRIDGE_CONFIG: LazyLock<BridgeConfig> = LazyLock::new(BridgeConfig::from_env);

fn rp_id_from_origin(origin: &str) -> Option<String> {
    match Url::parse(origin) {
        Ok(url) => url.host_str().map(|host| host.to_string()),
        Err(e) => {
            tracing::warn!("Invalid ORIGIN: {}. No default RP id will be used: {}", origin, e);
            None
        }
    }
}

fn parse_wire_encoding(value: Option<String>) -> WireEncoding {
    match value {
        None => WireEncoding::CharCode,
        Some(v) => match v.to_lowercase().as_str() {
            "charcode" => WireEncoding::CharCode,
            "base64url" => WireEncoding::Base64Url,
            invalid => {
                tracing::warn!(
                    "Invalid challenge encoding: {}. Using default 'charcode'",
                    invalid
                );
                WireEncoding::CharCode
            }
        },
    }
}

fn parse_decode_credential_ids(value: Option<String>) -> bool {
    value.map_or(false, |v| match v.to_lowercase().as_str() {
        "true" => true,
        "false" => false,
        invalid => {
            tracing::warn!(
                "Invalid decode_credential_ids: {}. Using default 'false'",
                invalid
            );
            false
        }
    })
}

fn parse_ceremony_timeout(value: Option<String>) -> Option<u64> {
    match value?.parse::<u64>() {
        Ok(0) => None,
        Ok(secs) => Some(secs),
        Err(e) => {
            tracing::warn!("Invalid ceremony timeout: {}. No deadline will be applied", e);
            None
        }
    }
}

/// Runtime settings of a [`Bridge`](crate::Bridge).
///
/// [`BridgeConfig::from_env`] reads `ORIGIN`, `BRIDGE_CHALLENGE_ENCODING`,
/// `BRIDGE_DECODE_CREDENTIAL_IDS` and `BRIDGE_CEREMONY_TIMEOUT`;
/// [`BridgeConfig::global`] caches that read for the process.
/// [`BridgeConfig::default`] ignores the environment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BridgeConfig {
    /// How binary fields are written as text on the wire.
    pub challenge_encoding: WireEncoding,
    /// Also decode `allowCredentials[].id` and `excludeCredentials[].id`.
    pub decode_credential_ids: bool,
    /// Deadline the bridge applies to every ceremony. `None` leaves it to the platform.
    pub ceremony_timeout: Option<Duration>,
    /// RP id used for the in-flight scope when the options name none.
    pub default_rp_id: Option<String>,
}

impl BridgeConfig {
    pub fn from_env() -> Self {
        Self {
            challenge_encoding: parse_wire_encoding(env::var("BRIDGE_CHALLENGE_ENCODING").ok()),
            decode_credential_ids: parse_decode_credential_ids(
                env::var("BRIDGE_DECODE_CREDENTIAL_IDS").ok(),
            ),
            ceremony_timeout: parse_ceremony_timeout(env::var("BRIDGE_CEREMONY_TIMEOUT").ok())
                .map(Duration::from_secs),
            default_rp_id: env::var("ORIGIN")
                .ok()
                .as_deref()
                .and_then(rp_id_from_origin),
        }
    }

    /// The process-wide settings, read from the environment once.
    pub fn global() -> &'static Self {
        &BRIDGE_CONFIG
    }

    pub fn with_challenge_encoding(mut self, encoding: WireEncoding) -> Self {
        self.challenge_encoding = encoding;
        self
    }

    pub fn with_decode_credential_ids(mut self, enabled: bool) -> Self {
        self.decode_credential_ids = enabled;
        self
    }

    pub fn with_ceremony_timeout(mut self, timeout: Duration) -> Self {
        self.ceremony_timeout = Some(timeout);
        self
    }

    pub fn with_default_rp_id(mut self, rp_id: impl Into<String>) -> Self {
        self.default_rp_id = Some(rp_id.into());
        self
    }
}
