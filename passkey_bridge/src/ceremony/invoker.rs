use std::time::Duration;

use super::credential::CredentialResult;
use super::failure::CeremonyFailure;
use super::guard::InFlightCeremonies;
use super::platform::{CeremonyRequest, CredentialPlatform};
use crate::errors::BridgeError;
use crate::types::{CeremonyKind, CredentialScope};

/// Calls the platform at most once per ceremony and keeps ceremonies for the
/// same scope from overlapping.
#[derive(Debug)]
pub struct CeremonyInvoker<P> {
    platform: P,
    in_flight: InFlightCeremonies,
    timeout: Option<Duration>,
}

impl<P: CredentialPlatform> CeremonyInvoker<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            in_flight: InFlightCeremonies::new(),
            timeout: None,
        }
    }

    /// Abort any ceremony that has not settled within `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn is_in_flight(&self, scope: &CredentialScope) -> bool {
        self.in_flight.is_in_flight(scope)
    }

    /// Run one ceremony.
    ///
    /// Rejected with `CeremonyBusy` without calling the platform while another
    /// ceremony for `scope` is pending. An already-aborted signal settles as
    /// `aborted` without calling the platform either.
    pub async fn invoke(
        &self,
        kind: CeremonyKind,
        scope: CredentialScope,
        request: &CeremonyRequest,
    ) -> Result<CredentialResult, BridgeError> {
        let _permit = self.in_flight.try_acquire(scope)?;

        if request.signal.as_ref().is_some_and(|s| s.is_aborted()) {
            return Err(CeremonyFailure::aborted().into());
        }

        tracing::debug!(kind = %kind, "Invoking platform ceremony");

        let call = async {
            match kind {
                CeremonyKind::Registration => self.platform.create(request).await,
                CeremonyKind::Authentication => self.platform.get(request).await,
            }
        };

        let aborted = async {
            match &request.signal {
                Some(signal) => signal.aborted().await,
                None => std::future::pending().await,
            }
        };

        let deadline = async {
            match self.timeout {
                Some(timeout) => {
                    tokio::time::sleep(timeout).await;
                    timeout
                }
                None => std::future::pending().await,
            }
        };

        let outcome = tokio::select! {
            biased;
            _ = aborted => Err(CeremonyFailure::aborted()),
            elapsed = deadline => Err(CeremonyFailure::timed_out(elapsed)),
            result = call => result,
        };

        Ok(outcome?)
    }
}
