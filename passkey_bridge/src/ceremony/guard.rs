use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::errors::BridgeError;
use crate::types::CredentialScope;

/// Scopes with a ceremony that has not settled yet.
#[derive(Debug, Clone, Default)]
pub(crate) struct InFlightCeremonies {
    scopes: Arc<Mutex<HashSet<CredentialScope>>>,
}

impl InFlightCeremonies {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Claim `scope`, or fail with `CeremonyBusy` if it is already claimed.
    pub(crate) fn try_acquire(&self, scope: CredentialScope) -> Result<CeremonyPermit, BridgeError> {
        let mut scopes = self.scopes.lock().unwrap_or_else(PoisonError::into_inner);
        if !scopes.insert(scope.clone()) {
            return Err(BridgeError::CeremonyBusy(scope.to_string()));
        }
        tracing::trace!("Acquired ceremony scope {}", scope);
        Ok(CeremonyPermit {
            scopes: Arc::clone(&self.scopes),
            scope,
        })
    }

    pub(crate) fn is_in_flight(&self, scope: &CredentialScope) -> bool {
        self.scopes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(scope)
    }
}

/// Releases its scope when dropped, however the ceremony settled.
#[derive(Debug)]
pub(crate) struct CeremonyPermit {
    scopes: Arc<Mutex<HashSet<CredentialScope>>>,
    scope: CredentialScope,
}

impl Drop for CeremonyPermit {
    fn drop(&mut self) {
        self.scopes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.scope);
        tracing::trace!("Released ceremony scope {}", self.scope);
    }
}
