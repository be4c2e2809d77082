use serde_json::json;

use passkey_bridge::{
    AbortController, Bridge, BridgeConfig, BridgeError, CeremonyFailure, CeremonyKind, Cycle,
    CycleState, FailureReason, Mediation, WireEncoding,
};

use crate::common::{
    PlatformOutcome, RP_ID, ScriptedPlatform, SpyChannel, assertion_credential,
    authentication_options, byte_array, challenge_event,
};

fn bridge_with(
    config: BridgeConfig,
    outcomes: Vec<PlatformOutcome>,
) -> Bridge<ScriptedPlatform, SpyChannel> {
    Bridge::with_config(ScriptedPlatform::new(outcomes), SpyChannel::new(), config)
}

fn bridge(outcomes: Vec<PlatformOutcome>) -> Bridge<ScriptedPlatform, SpyChannel> {
    bridge_with(BridgeConfig::default(), outcomes)
}

#[tokio::test]
async fn test_authentication_dispatches_assertion_fields() {
    let credential = assertion_credential(Some(vec![0x0a, 0x0b, 0x0c, 0x0d]));
    let bridge = bridge(vec![PlatformOutcome::Resolve(credential.clone())]);

    bridge
        .on_public_key_get(&challenge_event(&authentication_options()))
        .await
        .expect("authentication cycle should succeed");

    let response = bridge.channel().single_response();
    assert_eq!(response["id"], json!(credential.id));
    assert_eq!(byte_array(&response["authenticatorData"]), vec![0x49; 37]);
    assert_eq!(
        byte_array(&response["signature"]),
        vec![0x30, 0x44, 0x02, 0x20, 0x7f, 0x80]
    );
    assert_eq!(byte_array(&response["userHandle"]), vec![0x0a, 0x0b, 0x0c, 0x0d]);
    assert!(!byte_array(&response["clientDataJSON"]).is_empty());
    assert!(response.get("attestationObject").is_none());
}

#[tokio::test]
async fn test_authentication_without_user_handle_omits_field() {
    let bridge = bridge(vec![PlatformOutcome::Resolve(assertion_credential(None))]);

    let payload = bridge
        .on_public_key_get(&challenge_event(&authentication_options()))
        .await
        .unwrap();

    assert_eq!(payload.user_handle, None);
    let response = bridge.channel().single_response();
    assert!(response.get("userHandle").is_none());
}

/// An authentication payload has no `user`; everything but the challenge
/// reaches the platform exactly as sent.
#[tokio::test]
async fn test_authentication_passes_other_fields_through() {
    let bridge = bridge(vec![PlatformOutcome::Resolve(assertion_credential(None))])
        .with_mediation(Mediation::Optional);
    let options = authentication_options();

    bridge
        .on_public_key_get(&challenge_event(&options))
        .await
        .unwrap();

    let calls = bridge.platform().calls();
    assert_eq!(calls.len(), 1);
    let (kind, request) = &calls[0];
    assert_eq!(*kind, CeremonyKind::Authentication);
    assert_eq!(request.options.challenge, b"UZSL85T9AFC".to_vec());
    assert_eq!(request.options.user_id, None);
    assert_eq!(request.options.rp_id(), Some(RP_ID));
    assert_eq!(request.options.get("allowCredentials"), Some(&json!([])));
    assert_eq!(request.options.get("userVerification"), Some(&json!("preferred")));
    assert_eq!(request.options.get("timeout"), Some(&json!(60000)));
    assert_eq!(request.mediation, Some(Mediation::Optional));
    assert_eq!(request.options.to_payload(WireEncoding::CharCode), options);
}

#[tokio::test]
async fn test_authentication_rejection_sends_nothing() {
    let bridge = bridge(vec![PlatformOutcome::Reject(
        CeremonyFailure::from_dom_exception("SecurityError", "The RP ID is invalid"),
    )]);

    let mut cycle = Cycle::new(CeremonyKind::Authentication);
    let result = bridge
        .run_cycle(&mut cycle, &authentication_options().to_string(), None)
        .await;

    let err = result.unwrap_err();
    let failure = err.ceremony_failure().expect("should be a ceremony failure");
    assert_eq!(failure.reason, FailureReason::Security);
    assert!(failure.detail.contains("SecurityError"));
    assert_eq!(cycle.state(), CycleState::Failed);
    assert!(cycle.finished_at().is_some());
    assert_eq!(bridge.channel().call_count(), 0);
}

#[tokio::test]
async fn test_abort_during_authentication_sends_nothing() {
    let bridge = bridge(vec![PlatformOutcome::ResolveAfterRelease(
        assertion_credential(None),
    )]);
    let controller = AbortController::new();
    let event = challenge_event(&authentication_options());

    let run = bridge.handle_event("public_key_get", &event, Some(controller.signal()));
    let cancel = async {
        while bridge.platform().call_count() == 0 {
            tokio::task::yield_now().await;
        }
        controller.abort();
    };
    let (result, ()) = tokio::join!(run, cancel);

    let err = result.unwrap_err();
    assert_eq!(
        err.ceremony_failure().map(|f| f.reason),
        Some(FailureReason::Aborted)
    );
    assert_eq!(bridge.platform().call_count(), 1);
    assert_eq!(bridge.channel().call_count(), 0);
}

#[tokio::test]
async fn test_base64url_wire_encoding_end_to_end() {
    let bridge = bridge_with(
        BridgeConfig::default().with_challenge_encoding(WireEncoding::Base64Url),
        vec![PlatformOutcome::Resolve(assertion_credential(None))],
    );
    let mut options = authentication_options();
    options["challenge"] = json!("jwH_azlRAHo");

    bridge
        .on_public_key_get(&challenge_event(&options))
        .await
        .unwrap();

    let calls = bridge.platform().calls();
    let (_, request) = &calls[0];
    assert_eq!(
        request.options.challenge,
        vec![0x8f, 0x01, 0xff, b'k', b'9', b'Q', 0x00, b'z']
    );
    assert_eq!(bridge.channel().call_count(), 1);
}

#[tokio::test]
async fn test_base64url_rejects_invalid_challenge() {
    let bridge = bridge_with(
        BridgeConfig::default().with_challenge_encoding(WireEncoding::Base64Url),
        vec![PlatformOutcome::Resolve(assertion_credential(None))],
    );
    let mut options = authentication_options();
    options["challenge"] = json!("not base64url!");

    let result = bridge.on_public_key_get(&challenge_event(&options)).await;

    assert!(matches!(result, Err(BridgeError::Parse(_))));
    assert_eq!(bridge.platform().call_count(), 0);
}

#[tokio::test]
async fn test_allow_credentials_ids_are_decoded_when_enabled() {
    let bridge = bridge_with(
        BridgeConfig::default().with_decode_credential_ids(true),
        vec![PlatformOutcome::Resolve(assertion_credential(None))],
    );
    let mut options = authentication_options();
    options["allowCredentials"] = json!([
        {"type": "public-key", "id": "\u{10} 0@P", "transports": ["internal", "hybrid"]}
    ]);

    bridge
        .on_public_key_get(&challenge_event(&options))
        .await
        .unwrap();

    let calls = bridge.platform().calls();
    let (_, request) = &calls[0];
    let allowed = request
        .options
        .allow_credentials
        .as_ref()
        .expect("descriptors should be decoded");
    assert_eq!(allowed.len(), 1);
    assert_eq!(allowed[0].id, vec![0x10, 0x20, 0x30, 0x40, 0x50]);
    assert_eq!(allowed[0].fields["transports"], json!(["internal", "hybrid"]));
    assert!(request.options.get("allowCredentials").is_none());
}

#[tokio::test]
async fn test_authenticate_direct_uses_local_challenge() {
    let bridge = bridge(vec![PlatformOutcome::Resolve(assertion_credential(None))]);

    let credential = bridge
        .authenticate_direct("UZSL85T9AFC", "localhost", None)
        .await
        .unwrap();

    assert_eq!(credential.raw_id, vec![0x10, 0x20, 0x30, 0x40, 0x50]);
    let calls = bridge.platform().calls();
    let (kind, request) = &calls[0];
    assert_eq!(*kind, CeremonyKind::Authentication);
    assert_eq!(request.options.challenge, b"UZSL85T9AFC".to_vec());
    assert_eq!(request.options.rp_id(), Some("localhost"));
    assert_eq!(bridge.channel().call_count(), 0);
}

/// Servers that serialize an absent user as `null` still authenticate.
#[tokio::test]
async fn test_authentication_with_null_user_dispatches() {
    let bridge = bridge(vec![PlatformOutcome::Resolve(assertion_credential(None))]);
    let mut options = authentication_options();
    options["user"] = serde_json::Value::Null;

    bridge
        .on_public_key_get(&challenge_event(&options))
        .await
        .expect("a null user should not block authentication");

    assert_eq!(bridge.platform().call_count(), 1);
    let calls = bridge.platform().calls();
    let (_, request) = &calls[0];
    assert_eq!(request.options.user_id, None);
    assert_eq!(request.options.get("user"), Some(&serde_json::Value::Null));
    assert_eq!(bridge.channel().call_count(), 1);
}
