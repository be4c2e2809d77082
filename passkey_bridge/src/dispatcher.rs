use serde_json::{Value, json};

use crate::encoder::ResponsePayload;
use crate::errors::BridgeError;
use crate::types::{EVENT_CLIENT_RESPONSE, RESPONSE_FIELD};

/// Outbound half of the host's event channel.
///
/// `push_event` hands the message to the transport and returns; delivery and
/// acknowledgement are the transport's business. Return `Err(BridgeError::Dispatch)`
/// only when the message could not be handed over at all.
pub trait EventChannel: Send + Sync {
    fn push_event(&self, event: &str, payload: Value) -> Result<(), BridgeError>;
}

impl<F> EventChannel for F
where
    F: Fn(&str, Value) -> Result<(), BridgeError> + Send + Sync,
{
    fn push_event(&self, event: &str, payload: Value) -> Result<(), BridgeError> {
        self(event, payload)
    }
}

/// Send `payload` as `client_response` with body `{ "response": payload }`.
pub fn dispatch_response<C: EventChannel + ?Sized>(
    channel: &C,
    payload: &ResponsePayload,
) -> Result<(), BridgeError> {
    let message = json!({ RESPONSE_FIELD: payload });
    channel.push_event(EVENT_CLIENT_RESPONSE, message)?;
    tracing::info!(credential_id = %payload.id, "Dispatched {}", EVENT_CLIENT_RESPONSE);
    Ok(())
}
