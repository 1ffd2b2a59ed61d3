//! Client-side core of the safe-transfer dashboard.
//!
//! The backend records a safe-to-safe transfer as two independent
//! transaction rows (an outbound and an inbound leg, correlated by a
//! backend-assigned reference). This crate reconciles those rows into one
//! [`Transfer`] per logical movement, filters and paginates the reconciled
//! set, and guards the approve/reject workflow. It performs no I/O: the
//! TUI crate owns the HTTP gateway and feeds raw rows in.

pub use cache::{LookupCache, LookupEntry, LookupKind};
pub use error::EngineError;
pub use filter::{SearchQuery, TransferFilter, TransferSort, sort_transfers};
pub use latest::{QueryToken, TokenGate};
pub use money::Money;
pub use page::PageMeta;
pub use transfer::{SafeRef, Transfer, TransferStatus, known_safes, reconcile};
pub use workflow::{DecisionForm, DecisionRequest, Verdict};

mod cache;
mod error;
mod filter;
mod latest;
mod money;
mod page;
mod transfer;
mod workflow;

type ResultEngine<T> = Result<T, EngineError>;
