use async_trait::async_trait;

use super::abort::AbortSignal;
use super::credential::CredentialResult;
use super::failure::CeremonyFailure;
use crate::decoder::CredentialOptions;
use crate::types::Mediation;

/// Everything a platform needs for one `create` or `get` call.
#[derive(Debug, Clone)]
pub struct CeremonyRequest {
    pub options: CredentialOptions,
    pub mediation: Option<Mediation>,
    /// Forwarded so the platform can cancel its own prompt.
    pub signal: Option<AbortSignal>,
}

impl CeremonyRequest {
    pub fn new(options: CredentialOptions) -> Self {
        Self {
            options,
            mediation: None,
            signal: None,
        }
    }

    pub fn with_mediation(mut self, mediation: Mediation) -> Self {
        self.mediation = Some(mediation);
        self
    }

    pub fn with_signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }
}

/// The platform credential API, `navigator.credentials` in a browser.
///
/// Each call is one human-in-the-loop ceremony. Implementations report a
/// rejection as a [`CeremonyFailure`] and must not retry on their own.
#[async_trait]
pub trait CredentialPlatform: Send + Sync {
    /// Registration: `navigator.credentials.create({ publicKey })`
    async fn create(&self, request: &CeremonyRequest) -> Result<CredentialResult, CeremonyFailure>;

    /// Authentication: `navigator.credentials.get({ publicKey })`
    async fn get(&self, request: &CeremonyRequest) -> Result<CredentialResult, CeremonyFailure>;
}
