use serde::Serialize;

use crate::ceremony::{AuthenticatorResponse, CredentialResult};
use crate::errors::BridgeError;
use crate::types::CeremonyKind;

/// What the server receives under `client_response.response`.
///
/// Binary fields serialize as arrays of integers in `0..=255`, one per byte in
/// order. Fields that do not belong to the ceremony are left out entirely.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload {
    /// The whole credential as JSON text, binary fields in base64url.
    pub credential: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attestation_object: Option<Vec<u8>>,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authenticator_data: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<Vec<u8>>,
}

/// Consume a settled credential and produce its transport form.
///
/// Fails with `ResponseMismatch` if the credential answers the other ceremony.
pub fn encode_credential(
    credential: CredentialResult,
    expected: CeremonyKind,
) -> Result<ResponsePayload, BridgeError> {
    let actual = credential.response.kind();
    if actual != expected {
        return Err(BridgeError::ResponseMismatch { expected, actual });
    }

    let serialized = serde_json::to_string(&credential.to_json())?;

    let payload = match credential.response {
        AuthenticatorResponse::Attestation {
            client_data_json,
            attestation_object,
            ..
        } => ResponsePayload {
            credential: serialized,
            id: credential.id,
            attestation_object: Some(attestation_object),
            client_data_json,
            authenticator_data: None,
            signature: None,
            user_handle: None,
        },
        AuthenticatorResponse::Assertion {
            client_data_json,
            authenticator_data,
            signature,
            user_handle,
        } => ResponsePayload {
            credential: serialized,
            id: credential.id,
            attestation_object: None,
            client_data_json,
            authenticator_data: Some(authenticator_data),
            signature: Some(signature),
            user_handle,
        },
    };

    tracing::debug!(
        kind = %expected,
        client_data_len = payload.client_data_json.len(),
        "Encoded credential response"
    );

    Ok(payload)
}
