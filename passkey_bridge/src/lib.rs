//! passkey-bridge - Relay server-issued WebAuthn challenges to the platform credential API
//!
//! A challenge arrives on the host's event channel as JSON text with its binary
//! fields written one character per byte. The bridge decodes it, runs the
//! matching ceremony (`create` for `public_key_gen`, `get` for `public_key_get`),
//! encodes the credential with every binary field as an array of byte values, and
//! sends it back as `client_response`.
//!
//! The platform and the channel are injected: implement [`CredentialPlatform`]
//! over `navigator.credentials` (or any authenticator front-end) and
//! [`EventChannel`] over the host's send function.

mod bridge;
mod ceremony;
mod config;
mod cycle;
mod decoder;
mod dispatcher;
mod encoder;
mod errors;
mod types;
mod utils;

pub use bridge::Bridge;

pub use ceremony::{
    AbortController, AbortSignal, AuthenticatorResponse, CeremonyFailure, CeremonyInvoker,
    CeremonyRequest, CredentialJson, CredentialPlatform, CredentialResult, FailureReason,
};

pub use config::BridgeConfig;
pub use cycle::{Cycle, CycleState};

pub use decoder::{
    CredentialDescriptor, CredentialOptions, WireEncoding, charcode, decode_challenge,
};

pub use dispatcher::{EventChannel, dispatch_response};
pub use encoder::{ResponsePayload, encode_credential};
pub use errors::BridgeError;

pub use types::{
    CeremonyKind, CredentialScope, EVENT_CLIENT_RESPONSE, EVENT_PUBLIC_KEY_GEN,
    EVENT_PUBLIC_KEY_GET, Mediation, RESPONSE_FIELD,
};
