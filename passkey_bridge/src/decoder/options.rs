use serde_json::{Map, Value};

use super::WireEncoding;
use crate::errors::BridgeError;

/// A `PublicKeyCredentialDescriptor` whose `id` has been decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialDescriptor {
    pub id: Vec<u8>,
    /// `type`, `transports` and anything else the server sent, untouched.
    pub fields: Map<String, Value>,
}

/// Ceremony-ready options.
///
/// `challenge` and `user.id` are bytes. Credential descriptor lists are only
/// lifted out of `fields` when credential id decoding is enabled; otherwise
/// they stay in `fields` exactly as the server sent them.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialOptions {
    pub challenge: Vec<u8>,
    pub user_id: Option<Vec<u8>>,
    pub allow_credentials: Option<Vec<CredentialDescriptor>>,
    pub exclude_credentials: Option<Vec<CredentialDescriptor>>,
    /// Every other field of the payload. A `user` object is kept here without its `id`.
    pub fields: Map<String, Value>,
}

impl CredentialOptions {
    /// Options for an authentication ceremony with nothing but a challenge and RP id.
    pub fn for_authentication(challenge: Vec<u8>, rp_id: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("rpId".to_string(), Value::String(rp_id.to_string()));
        Self {
            challenge,
            user_id: None,
            allow_credentials: None,
            exclude_credentials: None,
            fields,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// `rpId` for authentication options, `rp.id` for registration options.
    pub fn rp_id(&self) -> Option<&str> {
        self.fields
            .get("rpId")
            .and_then(Value::as_str)
            .or_else(|| self.fields.get("rp")?.get("id")?.as_str())
    }

    /// Rebuild the wire form, writing every binary field with `encoding`.
    pub fn to_payload(&self, encoding: WireEncoding) -> Value {
        let mut payload = self.fields.clone();
        payload.insert(
            "challenge".to_string(),
            Value::String(encoding.encode(&self.challenge)),
        );

        if let Some(user_id) = &self.user_id {
            let user = payload
                .entry("user")
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(user) = user {
                user.insert("id".to_string(), Value::String(encoding.encode(user_id)));
            }
        }

        for (name, list) in [
            ("allowCredentials", &self.allow_credentials),
            ("excludeCredentials", &self.exclude_credentials),
        ] {
            if let Some(descriptors) = list {
                let values = descriptors
                    .iter()
                    .map(|d| {
                        let mut fields = d.fields.clone();
                        fields.insert("id".to_string(), Value::String(encoding.encode(&d.id)));
                        Value::Object(fields)
                    })
                    .collect();
                payload.insert(name.to_string(), Value::Array(values));
            }
        }

        Value::Object(payload)
    }
}

/// Lift a descriptor list out of `fields` and decode each `id`.
pub(super) fn take_descriptors(
    fields: &mut Map<String, Value>,
    name: &str,
    encoding: WireEncoding,
) -> Result<Option<Vec<CredentialDescriptor>>, BridgeError> {
    let Some(list) = fields.remove(name) else {
        return Ok(None);
    };

    let Value::Array(items) = list else {
        return Err(BridgeError::Parse(format!("'{name}' must be an array")));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let Value::Object(mut descriptor) = item else {
                return Err(BridgeError::Parse(format!("'{name}[{i}]' must be an object")));
            };
            let id = match descriptor.remove("id") {
                Some(Value::String(id)) => encoding.decode(&format!("{name}[{i}].id"), &id)?,
                _ => {
                    return Err(BridgeError::Parse(format!(
                        "'{name}[{i}].id' must be a string"
                    )));
                }
            };
            Ok(CredentialDescriptor {
                id,
                fields: descriptor,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
