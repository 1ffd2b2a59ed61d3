use thiserror::Error;

/// Errors the reconciliation core can raise.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Transfer is not pending")]
    NotPending,
    #[error("A decision for this transfer is already in flight")]
    DecisionInFlight,
    #[error("Transfer has no leg to address")]
    MissingLeg,
}
