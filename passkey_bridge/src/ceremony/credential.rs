use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::CeremonyKind;
use crate::utils::base64url_encode;

/// Credential a platform ceremony settled with.
///
/// This mirrors `PublicKeyCredential`: the platform adapter copies the
/// `ArrayBuffer` fields into owned bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialResult {
    /// base64url credential id, as `PublicKeyCredential.id`
    pub id: String,
    pub raw_id: Vec<u8>,
    pub authenticator_attachment: Option<String>,
    pub response: AuthenticatorResponse,
    pub client_extension_results: Map<String, Value>,
}

/// The `response` member of a credential, one shape per ceremony.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthenticatorResponse {
    /// `AuthenticatorAttestationResponse`, from `create`
    Attestation {
        client_data_json: Vec<u8>,
        attestation_object: Vec<u8>,
        transports: Vec<String>,
    },
    /// `AuthenticatorAssertionResponse`, from `get`
    Assertion {
        client_data_json: Vec<u8>,
        authenticator_data: Vec<u8>,
        signature: Vec<u8>,
        user_handle: Option<Vec<u8>>,
    },
}

impl AuthenticatorResponse {
    pub fn kind(&self) -> CeremonyKind {
        match self {
            Self::Attestation { .. } => CeremonyKind::Registration,
            Self::Assertion { .. } => CeremonyKind::Authentication,
        }
    }
}

impl CredentialResult {
    /// A credential whose `id` is derived from `raw_id`, as browsers do.
    pub fn new(raw_id: Vec<u8>, response: AuthenticatorResponse) -> Self {
        Self {
            id: base64url_encode(&raw_id),
            raw_id,
            authenticator_attachment: None,
            response,
            client_extension_results: Map::new(),
        }
    }

    pub fn with_authenticator_attachment(mut self, attachment: impl Into<String>) -> Self {
        self.authenticator_attachment = Some(attachment.into());
        self
    }

    /// The `toJSON()` form of the credential, binary fields in base64url.
    pub fn to_json(&self) -> CredentialJson {
        let response = match &self.response {
            AuthenticatorResponse::Attestation {
                client_data_json,
                attestation_object,
                transports,
            } => ResponseJson::Attestation {
                client_data_json: base64url_encode(client_data_json),
                attestation_object: base64url_encode(attestation_object),
                transports: transports.clone(),
            },
            AuthenticatorResponse::Assertion {
                client_data_json,
                authenticator_data,
                signature,
                user_handle,
            } => ResponseJson::Assertion {
                client_data_json: base64url_encode(client_data_json),
                authenticator_data: base64url_encode(authenticator_data),
                signature: base64url_encode(signature),
                user_handle: user_handle.as_deref().map(base64url_encode),
            },
        };

        CredentialJson {
            id: self.id.clone(),
            raw_id: base64url_encode(&self.raw_id),
            type_: "public-key",
            authenticator_attachment: self.authenticator_attachment.clone(),
            response,
            client_extension_results: self.client_extension_results.clone(),
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CredentialJson {
    id: String,
    raw_id: String,
    #[serde(rename = "type")]
    type_: &'static str,
    authenticator_attachment: Option<String>,
    response: ResponseJson,
    client_extension_results: Map<String, Value>,
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
enum ResponseJson {
    #[serde(rename_all = "camelCase")]
    Attestation {
        #[serde(rename = "clientDataJSON")]
        client_data_json: String,
        attestation_object: String,
        transports: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Assertion {
        #[serde(rename = "clientDataJSON")]
        client_data_json: String,
        authenticator_data: String,
        signature: String,
        user_handle: Option<String>,
    },
}
