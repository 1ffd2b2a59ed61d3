//! The approve/reject decision workflow.
//!
//! `Pending → Approved` and `Pending → Rejected` are the only transitions
//! and both are terminal. The guard lives here, client-side: a resolved
//! transfer is never offered a decision, and a second submission cannot
//! start while one is in flight.

use api_types::transfer::LegStatus;

use crate::{EngineError, ResultEngine, Transfer, TransferStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Approve,
    Reject,
}

impl Verdict {
    #[must_use]
    pub fn status(self) -> LegStatus {
        match self {
            Self::Approve => LegStatus::Approved,
            Self::Reject => LegStatus::Rejected,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

/// The single status-mutation call a decision produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecisionRequest {
    /// Canonical leg id: the out leg, or the in leg as degraded fallback.
    pub transaction_id: i64,
    pub status: LegStatus,
    pub note: Option<String>,
}

/// State of the decision panel for one transfer.
///
/// The typed note survives a failed submission so the user never re-enters
/// it; it is cleared only on success.
#[derive(Clone, Debug, Default)]
pub struct DecisionForm {
    pub note: String,
    in_flight: bool,
}

impl DecisionForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether decision controls may be offered for this transfer at all.
    #[must_use]
    pub fn can_decide(&self, transfer: &Transfer) -> bool {
        transfer.status == TransferStatus::Pending && !self.in_flight
    }

    /// Starts a decision, marking the form in flight.
    ///
    /// Exactly one request comes out of a successful call; the caller owns
    /// sending it and reporting back via [`fail`](Self::fail) or
    /// [`succeed`](Self::succeed).
    pub fn begin(&mut self, transfer: &Transfer, verdict: Verdict) -> ResultEngine<DecisionRequest> {
        if transfer.status != TransferStatus::Pending {
            return Err(EngineError::NotPending);
        }
        if self.in_flight {
            return Err(EngineError::DecisionInFlight);
        }
        let transaction_id = transfer.canonical_id().ok_or(EngineError::MissingLeg)?;

        self.in_flight = true;
        let note = self.note.trim();
        Ok(DecisionRequest {
            transaction_id,
            status: verdict.status(),
            note: (!note.is_empty()).then(|| note.to_string()),
        })
    }

    /// The call failed: re-enable the controls, keep the note.
    pub fn fail(&mut self) {
        self.in_flight = false;
    }

    /// The call succeeded: the form is spent.
    pub fn succeed(&mut self) {
        self.in_flight = false;
        self.note.clear();
    }
}
