use serde_json::{Value, json};

use passkey_bridge::{AuthenticatorResponse, CredentialResult};

pub const RP_ID: &str = "example.com";

/// Registration options as the server sends them, binary fields as char-code text.
pub fn registration_options() -> Value {
    json!({
        "challenge": "\u{8f}\u{1}\u{ff}k9Q\u{0}z",
        "rp": {"id": RP_ID, "name": "Example"},
        "user": {"id": "\u{a}\u{b}\u{c}\u{d}", "name": "alice", "displayName": "Alice"},
        "pubKeyCredParams": [
            {"type": "public-key", "alg": -7},
            {"type": "public-key", "alg": -257}
        ],
        "authenticatorSelection": {
            "authenticatorAttachment": "platform",
            "residentKey": "required",
            "requireResidentKey": true,
            "userVerification": "discouraged"
        },
        "timeout": 60000,
        "attestation": "direct"
    })
}

pub fn authentication_options() -> Value {
    json!({
        "challenge": "UZSL85T9AFC",
        "timeout": 60000,
        "rpId": RP_ID,
        "allowCredentials": [],
        "userVerification": "preferred"
    })
}

/// Inbound event body: `{ "challenge": "<options as JSON text>" }`.
pub fn challenge_event(options: &Value) -> Value {
    json!({ "challenge": options.to_string() })
}

pub fn client_data_json(type_: &str) -> Vec<u8> {
    json!({
        "type": type_,
        "challenge": "jwH_azlRAHo",
        "origin": "https://example.com",
        "crossOrigin": false
    })
    .to_string()
    .into_bytes()
}

pub fn attestation_credential() -> CredentialResult {
    CredentialResult::new(
        vec![0x10, 0x20, 0x30, 0x40, 0x50],
        AuthenticatorResponse::Attestation {
            client_data_json: client_data_json("webauthn.create"),
            attestation_object: (0..=200u8).collect(),
            transports: vec!["internal".to_string()],
        },
    )
    .with_authenticator_attachment("platform")
}

pub fn assertion_credential(user_handle: Option<Vec<u8>>) -> CredentialResult {
    CredentialResult::new(
        vec![0x10, 0x20, 0x30, 0x40, 0x50],
        AuthenticatorResponse::Assertion {
            client_data_json: client_data_json("webauthn.get"),
            authenticator_data: vec![0x49; 37],
            signature: vec![0x30, 0x44, 0x02, 0x20, 0x7f, 0x80],
            user_handle,
        },
    )
}

/// Read a JSON integer array back into bytes, failing on anything outside 0..=255.
pub fn byte_array(value: &Value) -> Vec<u8> {
    value
        .as_array()
        .expect("expected an array")
        .iter()
        .map(|v| {
            let n = v.as_u64().expect("expected an integer");
            u8::try_from(n).expect("expected a byte value")
        })
        .collect()
}
