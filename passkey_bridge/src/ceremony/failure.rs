use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Why a ceremony settled without a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The user cancelled, or the platform refused without saying why.
    NotAllowed,
    /// The ceremony ran past its deadline.
    Timeout,
    /// The caller aborted the ceremony.
    Aborted,
    /// e.g. the authenticator already holds a credential from `excludeCredentials`.
    InvalidState,
    /// No supported algorithm or authenticator.
    NotSupported,
    /// Insecure context or an RP id that does not match the origin.
    Security,
    Unknown,
}

impl FailureReason {
    /// Classify a DOMException name as reported by `navigator.credentials`.
    pub fn from_dom_exception(name: &str) -> Self {
        match name {
            "NotAllowedError" => Self::NotAllowed,
            "TimeoutError" => Self::Timeout,
            "AbortError" => Self::Aborted,
            "InvalidStateError" => Self::InvalidState,
            "NotSupportedError" => Self::NotSupported,
            "SecurityError" => Self::Security,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotAllowed => "not_allowed",
            Self::Timeout => "timeout",
            Self::Aborted => "aborted",
            Self::InvalidState => "invalid_state",
            Self::NotSupported => "not_supported",
            Self::Security => "security",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected ceremony: the classified reason plus the platform's own detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CeremonyFailure {
    pub reason: FailureReason,
    pub detail: String,
}

impl CeremonyFailure {
    pub fn new(reason: FailureReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }

    /// Build a failure from a DOMException name and message.
    pub fn from_dom_exception(name: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(
            FailureReason::from_dom_exception(name),
            format!("{name}: {message}"),
        )
    }

    pub(crate) fn aborted() -> Self {
        Self::new(FailureReason::Aborted, "The ceremony was aborted by the caller")
    }

    pub(crate) fn timed_out(deadline: Duration) -> Self {
        Self::new(
            FailureReason::Timeout,
            format!("The ceremony did not settle within {deadline:?}"),
        )
    }
}

impl fmt::Display for CeremonyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reason, self.detail)
    }
}

impl std::error::Error for CeremonyFailure {}
