pub mod charcode;
mod options;

use serde_json::{Map, Value};

use crate::config::BridgeConfig;
use crate::errors::BridgeError;
use crate::types::CeremonyKind;
use crate::utils::{base64url_decode, base64url_encode};

pub use options::{CredentialDescriptor, CredentialOptions};

/// How the server writes binary fields as JSON strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireEncoding {
    /// One character per byte, code points 0..=255.
    #[default]
    CharCode,
    /// Unpadded URL-safe base64.
    Base64Url,
}

impl WireEncoding {
    /// Decode one field; `field` only names it in errors.
    pub fn decode(&self, field: &str, text: &str) -> Result<Vec<u8>, BridgeError> {
        match self {
            Self::CharCode => charcode::decode(text).map_err(|e| BridgeError::EncodingRange {
                field: field.to_string(),
                position: e.position,
                code_point: e.code_point,
            }),
            Self::Base64Url => base64url_decode(text)
                .map_err(|e| BridgeError::Parse(format!("'{field}': {e}"))),
        }
    }

    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Self::CharCode => charcode::encode(bytes),
            Self::Base64Url => base64url_encode(bytes),
        }
    }
}

/// Parse a serialized challenge payload into ceremony-ready options.
///
/// `challenge` and, when present, `user.id` are decoded into bytes with the
/// configured wire encoding. Registration payloads must carry `user.id`.
/// Every other field is passed through as-is, except credential descriptor
/// lists when `decode_credential_ids` is enabled.
pub fn decode_challenge(
    text: &str,
    kind: CeremonyKind,
    config: &BridgeConfig,
) -> Result<CredentialOptions, BridgeError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| BridgeError::Parse(format!("Invalid challenge JSON: {e}")))?;

    let Value::Object(mut fields) = value else {
        return Err(BridgeError::Parse(
            "Challenge payload must be a JSON object".to_string(),
        ));
    };

    let encoding = config.challenge_encoding;

    let challenge = match fields.remove("challenge") {
        Some(Value::String(challenge)) => encoding.decode("challenge", &challenge)?,
        Some(_) => {
            return Err(BridgeError::Parse(
                "'challenge' must be a string".to_string(),
            ));
        }
        None => return Err(BridgeError::Parse("Missing 'challenge'".to_string())),
    };

    let user_id = take_user_id(&mut fields, kind, encoding)?;
    if kind == CeremonyKind::Registration && user_id.is_none() {
        return Err(BridgeError::Parse(
            "Registration challenge is missing 'user.id'".to_string(),
        ));
    }

    let (allow_credentials, exclude_credentials) = if config.decode_credential_ids {
        (
            options::take_descriptors(&mut fields, "allowCredentials", encoding)?,
            options::take_descriptors(&mut fields, "excludeCredentials", encoding)?,
        )
    } else {
        (None, None)
    };

    tracing::debug!(
        kind = %kind,
        challenge_len = challenge.len(),
        user_id_len = user_id.as_ref().map(Vec::len),
        "Decoded challenge payload"
    );

    Ok(CredentialOptions {
        challenge,
        user_id,
        allow_credentials,
        exclude_credentials,
        fields,
    })
}

/// Lift `user.id` out of the `user` object.
///
/// A `null` user or id counts as absent. Authentication payloads keep a `user`
/// that is not an object exactly as sent; registration rejects it.
fn take_user_id(
    fields: &mut Map<String, Value>,
    kind: CeremonyKind,
    encoding: WireEncoding,
) -> Result<Option<Vec<u8>>, BridgeError> {
    let user = match fields.get_mut("user") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(user)) => user,
        Some(_) if kind == CeremonyKind::Authentication => return Ok(None),
        Some(_) => return Err(BridgeError::Parse("'user' must be an object".to_string())),
    };

    let id = match user.get("id") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(id)) => encoding.decode("user.id", id)?,
        Some(_) => return Err(BridgeError::Parse("'user.id' must be a string".to_string())),
    };
    user.remove("id");
    Ok(Some(id))
}
