use thiserror::Error;

use crate::ceremony::CeremonyFailure;
use crate::cycle::CycleState;
use crate::types::CeremonyKind;

/// Errors that can end a bridging cycle.
///
/// `Parse`, `EncodingRange`, `UnknownEvent` and `CeremonyBusy` are raised before
/// the platform is called. Every variant suppresses the outbound
/// `client_response` event except `Dispatch`, which reports a send the channel
/// refused.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The inbound payload is not the JSON structure the bridge expects
    #[error("Parse error: {0}")]
    Parse(String),

    /// A char-code encoded field holds a character that does not fit in a byte
    #[error(
        "Encoding range error: '{field}' has code point U+{code_point:04X} at position {position}, which exceeds 255"
    )]
    EncodingRange {
        field: String,
        position: usize,
        code_point: u32,
    },

    /// The host delivered an event the bridge does not handle
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// Another ceremony for the same credential scope has not settled yet
    #[error("Ceremony already in flight for {0}")]
    CeremonyBusy(String),

    /// The platform rejected the ceremony, or it was aborted
    #[error("Ceremony failure: {0}")]
    Ceremony(CeremonyFailure),

    /// The platform returned a response for the other ceremony kind
    #[error("Response mismatch: expected {expected} response, got {actual}")]
    ResponseMismatch {
        expected: CeremonyKind,
        actual: CeremonyKind,
    },

    /// The event channel refused the outbound message
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: CycleState, to: CycleState },

    /// Error from JSON serialization/deserialization
    #[error("Serde error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl BridgeError {
    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::Parse(msg) => tracing::error!("Parse error: {}", msg),
            Self::EncodingRange {
                field,
                position,
                code_point,
            } => tracing::error!(
                field = %field,
                position,
                code_point,
                "Encoding range error"
            ),
            Self::UnknownEvent(name) => tracing::error!("Unknown event: {}", name),
            Self::CeremonyBusy(scope) => tracing::error!("Ceremony already in flight: {}", scope),
            Self::Ceremony(failure) => tracing::error!(
                reason = %failure.reason,
                "Ceremony failure: {}",
                failure.detail
            ),
            Self::ResponseMismatch { expected, actual } => {
                tracing::error!("Response mismatch: expected {}, got {}", expected, actual)
            }
            Self::Dispatch(msg) => tracing::error!("Dispatch error: {}", msg),
            Self::InvalidTransition { from, to } => {
                tracing::error!("Invalid state transition: {} -> {}", from, to)
            }
            Self::SerdeJson(err) => tracing::error!("Serde error: {}", err),
        }
        self
    }

    /// The ceremony failure behind this error, if the platform was involved.
    pub fn ceremony_failure(&self) -> Option<&CeremonyFailure> {
        match self {
            Self::Ceremony(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<CeremonyFailure> for BridgeError {
    fn from(failure: CeremonyFailure) -> Self {
        let error = Self::Ceremony(failure);
        tracing::debug!("{}", error);
        error
    }
}
