mod abort;
mod credential;
mod failure;
mod guard;
mod invoker;
mod platform;

pub use abort::{AbortController, AbortSignal};
pub use credential::{AuthenticatorResponse, CredentialJson, CredentialResult};
pub use failure::{CeremonyFailure, FailureReason};
pub use invoker::CeremonyInvoker;
pub use platform::{CeremonyRequest, CredentialPlatform};
