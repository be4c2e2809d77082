use serde_json::Value;

use crate::ceremony::{
    AbortSignal, CeremonyInvoker, CeremonyRequest, CredentialPlatform, CredentialResult,
};
use crate::config::BridgeConfig;
use crate::cycle::{Cycle, CycleState};
use crate::decoder::{CredentialOptions, WireEncoding, decode_challenge};
use crate::dispatcher::{EventChannel, dispatch_response};
use crate::encoder::{ResponsePayload, encode_credential};
use crate::errors::BridgeError;
use crate::types::{
    CeremonyKind, CredentialScope, EVENT_PUBLIC_KEY_GEN, EVENT_PUBLIC_KEY_GET, Mediation,
};

/// Scope RP id used when neither the options nor the configuration name one.
const UNSPECIFIED_RP_ID: &str = "*";

/// Connects the host's event channel to the platform credential API.
///
/// The host registers [`Bridge::on_public_key_get`] and
/// [`Bridge::on_public_key_gen`] as handlers for the two inbound events and
/// supplies the send function as the [`EventChannel`].
#[derive(Debug)]
pub struct Bridge<P, C> {
    config: BridgeConfig,
    invoker: CeremonyInvoker<P>,
    channel: C,
    mediation: Option<Mediation>,
}

impl<P: CredentialPlatform, C: EventChannel> Bridge<P, C> {
    /// Bridge configured from the environment.
    pub fn new(platform: P, channel: C) -> Self {
        Self::with_config(platform, channel, BridgeConfig::global().clone())
    }

    pub fn with_config(platform: P, channel: C, config: BridgeConfig) -> Self {
        let invoker = CeremonyInvoker::new(platform).with_timeout(config.ceremony_timeout);
        Self {
            config,
            invoker,
            channel,
            mediation: None,
        }
    }

    /// Mediation requirement sent with every ceremony.
    pub fn with_mediation(mut self, mediation: Mediation) -> Self {
        self.mediation = Some(mediation);
        self
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        self.invoker.platform()
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn is_in_flight(&self, scope: &CredentialScope) -> bool {
        self.invoker.is_in_flight(scope)
    }

    /// Handler for `public_key_get`.
    pub async fn on_public_key_get(&self, payload: &Value) -> Result<ResponsePayload, BridgeError> {
        self.handle_event(EVENT_PUBLIC_KEY_GET, payload, None).await
    }

    /// Handler for `public_key_gen`.
    pub async fn on_public_key_gen(&self, payload: &Value) -> Result<ResponsePayload, BridgeError> {
        self.handle_event(EVENT_PUBLIC_KEY_GEN, payload, None).await
    }

    /// Run a full cycle for an inbound event `{ "challenge": "<payload json>" }`.
    pub async fn handle_event(
        &self,
        event: &str,
        payload: &Value,
        signal: Option<AbortSignal>,
    ) -> Result<ResponsePayload, BridgeError> {
        let kind = CeremonyKind::from_event(event)
            .ok_or_else(|| BridgeError::UnknownEvent(event.to_string()).log())?;

        let mut cycle = Cycle::new(kind);
        cycle.advance(CycleState::AwaitingChallenge)?;
        cycle.advance(CycleState::Decoding)?;

        let challenge = payload
            .get("challenge")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                cycle.fail(BridgeError::Parse(format!(
                    "'{event}' event has no 'challenge' string"
                )))
            })?;

        self.complete(&mut cycle, challenge, signal).await
    }

    /// Run a full cycle from serialized challenge text.
    ///
    /// `cycle` must be fresh; on return it is `Dispatched` or `Failed`.
    pub async fn run_cycle(
        &self,
        cycle: &mut Cycle,
        challenge: &str,
        signal: Option<AbortSignal>,
    ) -> Result<ResponsePayload, BridgeError> {
        cycle.advance(CycleState::AwaitingChallenge)?;
        cycle.advance(CycleState::Decoding)?;
        self.complete(cycle, challenge, signal).await
    }

    #[tracing::instrument(skip_all, fields(cycle_id = %cycle.id(), kind = %cycle.kind()))]
    async fn complete(
        &self,
        cycle: &mut Cycle,
        challenge: &str,
        signal: Option<AbortSignal>,
    ) -> Result<ResponsePayload, BridgeError> {
        let kind = cycle.kind();

        let options =
            decode_challenge(challenge, kind, &self.config).map_err(|e| cycle.fail(e))?;
        let scope = self.scope_for(kind, &options);

        cycle.advance(CycleState::Invoking)?;
        let request = self.request(options, signal);
        let credential = self
            .invoker
            .invoke(kind, scope, &request)
            .await
            .map_err(|e| cycle.fail(e))?;

        cycle.advance(CycleState::Encoding)?;
        let payload = encode_credential(credential, kind).map_err(|e| cycle.fail(e))?;
        dispatch_response(&self.channel, &payload).map_err(|e| cycle.fail(e))?;
        cycle.advance(CycleState::Dispatched)?;
        tracing::debug!(
            elapsed_ms = cycle.elapsed().num_milliseconds(),
            "Bridging cycle complete"
        );

        Ok(payload)
    }

    /// Authenticate against a locally known char-code challenge.
    ///
    /// The credential is returned to the caller; nothing is sent on the channel.
    pub async fn authenticate_direct(
        &self,
        challenge: &str,
        rp_id: &str,
        signal: Option<AbortSignal>,
    ) -> Result<CredentialResult, BridgeError> {
        let challenge = WireEncoding::CharCode.decode("challenge", challenge)?;
        let options = CredentialOptions::for_authentication(challenge, rp_id);
        let scope = self.scope_for(CeremonyKind::Authentication, &options);
        let request = self.request(options, signal);

        let credential = self
            .invoker
            .invoke(CeremonyKind::Authentication, scope, &request)
            .await?;
        tracing::debug!(credential_id = %credential.id, "Direct authentication settled");
        Ok(credential)
    }

    fn request(&self, options: CredentialOptions, signal: Option<AbortSignal>) -> CeremonyRequest {
        let mut request = CeremonyRequest::new(options);
        if let Some(mediation) = self.mediation {
            request = request.with_mediation(mediation);
        }
        if let Some(signal) = signal {
            request = request.with_signal(signal);
        }
        request
    }

    fn scope_for(&self, kind: CeremonyKind, options: &CredentialOptions) -> CredentialScope {
        let rp_id = options
            .rp_id()
            .map(str::to_string)
            .or_else(|| self.config.default_rp_id.clone())
            .unwrap_or_else(|| UNSPECIFIED_RP_ID.to_string());
        let user_id = match kind {
            CeremonyKind::Registration => options.user_id.clone(),
            CeremonyKind::Authentication => None,
        };
        CredentialScope::new(rp_id, user_id)
    }
}
