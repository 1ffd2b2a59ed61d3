//! Transfer reconciliation.
//!
//! The backend records one row per leg; [`reconcile`] folds the rows of a
//! page into one [`Transfer`] per logical movement. Pairing happens on the
//! backend-assigned `reference`; a row without a reference (or without its
//! counterpart yet) becomes a single-leg transfer, which is an accepted
//! degraded state, never an error.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use api_types::safe::SafeKind;
use api_types::transfer::{LegKind, LegRow, LegStatus};

use crate::Money;

/// Unified status shown for a transfer, derived from both legs.
///
/// Rejection and pending both take precedence over approved: a transfer is
/// never shown approved while any leg is unresolved or rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferStatus {
    Pending,
    Approved,
    Rejected,
}

impl TransferStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    fn unify(out: Option<LegStatus>, inbound: Option<LegStatus>) -> Self {
        let either = |status| out == Some(status) || inbound == Some(status);
        if either(LegStatus::Rejected) {
            Self::Rejected
        } else if either(LegStatus::Pending) || (out.is_none() && inbound.is_none()) {
            Self::Pending
        } else {
            Self::Approved
        }
    }
}

/// One end of a transfer. Any field may be missing on a degraded row; the
/// display layer falls back to a placeholder instead of failing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SafeRef {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub kind: Option<SafeKind>,
}

impl SafeRef {
    fn own(leg: &LegRow) -> Self {
        Self {
            id: leg.safe_id,
            name: leg.safe_name.clone(),
            kind: leg.safe_type,
        }
    }

    fn counterpart(leg: &LegRow) -> Self {
        Self {
            id: leg.counterpart_safe_id,
            name: leg.counterpart_safe_name.clone(),
            kind: leg.counterpart_safe_type,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("—")
    }
}

/// A reconciled safe-to-safe transfer.
#[derive(Clone, Debug)]
pub struct Transfer {
    pub out_id: Option<i64>,
    pub in_id: Option<i64>,
    pub amount: Money,
    pub source: SafeRef,
    pub destination: SafeRef,
    pub status: TransferStatus,
    pub date: Option<NaiveDate>,
    pub created_at: Option<NaiveDateTime>,
    pub user_id: Option<i64>,
    pub user_name: Option<String>,
    pub approved_by_name: Option<String>,
    pub approved_date: Option<NaiveDateTime>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub admin_notes: Option<String>,
}

impl Transfer {
    /// The id status-mutation calls are addressed to: the out leg, falling
    /// back to the in leg when the backend has not created the out row.
    #[must_use]
    pub fn canonical_id(&self) -> Option<i64> {
        self.out_id.or(self.in_id)
    }

    /// True while one of the two legs is missing. The in-leg fallback
    /// identity in particular is a degraded state the UI flags.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.out_id.is_none() || self.in_id.is_none()
    }

    #[must_use]
    pub fn matches_id(&self, id: i64) -> bool {
        self.out_id == Some(id) || self.in_id == Some(id)
    }

    fn from_legs(out: Option<LegRow>, inbound: Option<LegRow>) -> Self {
        let status = TransferStatus::unify(
            out.as_ref().map(|l| l.status),
            inbound.as_ref().map(|l| l.status),
        );

        // Direction: the out leg is recorded against the source safe with
        // the destination as counterpart; an in-only transfer swaps roles.
        let (source, destination) = match (&out, &inbound) {
            (Some(leg), _) => (SafeRef::own(leg), SafeRef::counterpart(leg)),
            (None, Some(leg)) => (SafeRef::counterpart(leg), SafeRef::own(leg)),
            (None, None) => (SafeRef::default(), SafeRef::default()),
        };

        let amount = out
            .as_ref()
            .or(inbound.as_ref())
            .map(|leg| Money::from_decimal(leg.amount))
            .unwrap_or(Money::ZERO);

        let date = pick(&out, &inbound, |leg| leg.date);
        let created_at = pick(&out, &inbound, |leg| leg.created_at);
        let reference = pick(&out, &inbound, |leg| leg.reference.clone());
        let notes = pick(&out, &inbound, |leg| leg.notes.clone());
        let admin_notes = pick(&out, &inbound, |leg| leg.admin_notes.clone());

        // Attribution goes to whichever leg carries identity info.
        let (user_id, user_name) = [&out, &inbound]
            .into_iter()
            .flatten()
            .find(|leg| leg.user_id.is_some() || leg.user_name.is_some())
            .map(|leg| (leg.user_id, leg.user_name.clone()))
            .unwrap_or((None, None));

        // Approval metadata from whichever leg resolved first.
        let (approved_by_name, approved_date) = [&out, &inbound]
            .into_iter()
            .flatten()
            .filter(|leg| leg.approved_by_name.is_some() || leg.approved_date.is_some())
            .min_by_key(|leg| leg.approved_date.unwrap_or(NaiveDateTime::MAX))
            .map(|leg| (leg.approved_by_name.clone(), leg.approved_date))
            .unwrap_or((None, None));

        Self {
            out_id: out.map(|l| l.id),
            in_id: inbound.map(|l| l.id),
            amount,
            source,
            destination,
            status,
            date,
            created_at,
            user_id,
            user_name,
            approved_by_name,
            approved_date,
            reference,
            notes,
            admin_notes,
        }
    }
}

fn pick<T>(
    out: &Option<LegRow>,
    inbound: &Option<LegRow>,
    get: impl Fn(&LegRow) -> Option<T>,
) -> Option<T> {
    out.as_ref().and_then(&get).or_else(|| inbound.as_ref().and_then(&get))
}

#[derive(Default)]
struct Group {
    out: Option<LegRow>,
    inbound: Option<LegRow>,
}

impl Group {
    fn seed(row: LegRow) -> Self {
        let mut group = Self::default();
        group.place(row);
        group
    }

    fn place(&mut self, row: LegRow) -> Option<LegRow> {
        let slot = match row.kind {
            LegKind::TransferOut => &mut self.out,
            LegKind::TransferIn => &mut self.inbound,
        };
        if slot.is_none() {
            *slot = Some(row);
            None
        } else {
            Some(row)
        }
    }
}

/// Folds raw leg rows into reconciled transfers.
///
/// Rows sharing a reference merge into one transfer (out + in). Rows with
/// no reference, and any extra row whose slot is already taken (a backend
/// anomaly), each become their own single-leg transfer: the output always
/// accounts for every input row, in first-seen order.
#[must_use]
pub fn reconcile(rows: Vec<LegRow>) -> Vec<Transfer> {
    let mut groups: Vec<Group> = Vec::with_capacity(rows.len());
    let mut by_reference: HashMap<String, usize> = HashMap::new();

    for row in rows {
        match row.reference.clone() {
            Some(reference) => match by_reference.get(&reference) {
                Some(&index) => {
                    if let Some(extra) = groups[index].place(row) {
                        groups.push(Group::seed(extra));
                    }
                }
                None => {
                    by_reference.insert(reference, groups.len());
                    groups.push(Group::seed(row));
                }
            },
            None => groups.push(Group::seed(row)),
        }
    }

    groups
        .into_iter()
        .map(|group| Transfer::from_legs(group.out, group.inbound))
        .collect()
}

/// Distinct safes observed across a set of transfers, first-seen order.
///
/// The backend exposes no safes listing to this client, so the new-transfer
/// form offers whatever the loaded data has shown.
#[must_use]
pub fn known_safes(transfers: &[Transfer]) -> Vec<SafeRef> {
    let mut seen: Vec<SafeRef> = Vec::new();
    for transfer in transfers {
        for safe in [&transfer.source, &transfer.destination] {
            if safe.id.is_some() && !seen.iter().any(|s| s.id == safe.id) {
                seen.push(safe.clone());
            }
        }
    }
    seen
}
