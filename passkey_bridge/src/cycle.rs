use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::errors::BridgeError;
use crate::types::CeremonyKind;

/// Where a bridging cycle is.
///
/// ```text
/// Idle -> AwaitingChallenge -> Decoding -> Invoking -> Encoding -> Dispatched
///                                  |           |           |
///                                  +-----------+-----------+--> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    AwaitingChallenge,
    Decoding,
    Invoking,
    Encoding,
    Dispatched,
    Failed,
}

impl CycleState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Dispatched | Self::Failed)
    }

    fn can_transition_to(&self, next: CycleState) -> bool {
        use CycleState::*;
        matches!(
            (self, next),
            (Idle, AwaitingChallenge)
                | (AwaitingChallenge, Decoding)
                | (Decoding, Invoking)
                | (Invoking, Encoding)
                | (Encoding, Dispatched)
                | (Decoding | Invoking | Encoding, Failed)
        )
    }
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::AwaitingChallenge => "awaiting_challenge",
            Self::Decoding => "decoding",
            Self::Invoking => "invoking",
            Self::Encoding => "encoding",
            Self::Dispatched => "dispatched",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// One inbound challenge on its way to a dispatched response or a failure.
#[derive(Debug, Clone)]
pub struct Cycle {
    id: Uuid,
    kind: CeremonyKind,
    state: CycleState,
    history: Vec<CycleState>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl Cycle {
    pub fn new(kind: CeremonyKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            state: CycleState::Idle,
            history: vec![CycleState::Idle],
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> CeremonyKind {
        self.kind
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Every state the cycle has been in, oldest first.
    pub fn history(&self) -> &[CycleState] {
        &self.history
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Time from creation to the terminal state, or to now while still running.
    pub fn elapsed(&self) -> TimeDelta {
        self.finished_at.unwrap_or_else(Utc::now) - self.started_at
    }

    pub fn advance(&mut self, next: CycleState) -> Result<(), BridgeError> {
        if !self.state.can_transition_to(next) {
            return Err(BridgeError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!(cycle_id = %self.id, "Cycle {} -> {}", self.state, next);
        self.state = next;
        self.history.push(next);
        if next.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Move to `Failed` and hand the error back to the caller.
    ///
    /// A cycle that is not in a failable state keeps its state; the
    /// error is still returned.
    pub fn fail(&mut self, error: BridgeError) -> BridgeError {
        if let Err(transition) = self.advance(CycleState::Failed) {
            tracing::warn!(cycle_id = %self.id, "{}", transition);
        }
        tracing::warn!(
            cycle_id = %self.id,
            kind = %self.kind,
            elapsed_ms = self.elapsed().num_milliseconds(),
            "Bridging cycle failed: {}",
            error
        );
        error
    }
}
