//! Client-side filtering and sorting of reconciled transfers.
//!
//! The backend may or may not have applied some of these filters already;
//! applying them again client-side is idempotent, so the list view always
//! filters the page it holds.

use chrono::NaiveDate;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine, Transfer, TransferStatus};

/// Case- and diacritic-insensitive form used for free-text matching.
///
/// NFKD, combining marks stripped, lowercased: "Josè" and "jose" compare
/// equal, as do the fullwidth digits some exports produce.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

/// What the search box means.
///
/// `#42`, `id:42` and `id=42` are explicit-id queries: they match leg ids
/// only and suppress free-text matching entirely. Everything else is free
/// text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SearchQuery {
    #[default]
    Empty,
    Text(String),
    Id(i64),
}

impl SearchQuery {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }

        if let Some(digits) = trimmed.strip_prefix('#')
            && let Some(id) = parse_digits(digits)
        {
            return Self::Id(id);
        }

        let lower = trimmed.to_ascii_lowercase();
        if let Some(rest) = lower.strip_prefix("id")
            && let Some(digits) = rest.strip_prefix([':', '='])
            && let Some(id) = parse_digits(digits)
        {
            return Self::Id(id);
        }

        Self::Text(normalize_text(trimmed))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::Empty
    }
}

fn parse_digits(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// User-selected filters, all optional and combined with AND.
#[derive(Clone, Debug, Default)]
pub struct TransferFilter {
    pub search: SearchQuery,
    pub transfer_id: Option<i64>,
    /// Inclusive on both ends.
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub source_safe_id: Option<i64>,
    pub dest_safe_id: Option<i64>,
    pub user_id: Option<i64>,
    pub status: Option<TransferStatus>,
}

impl TransferFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.transfer_id.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.source_safe_id.is_none()
            && self.dest_safe_id.is_none()
            && self.user_id.is_none()
            && self.status.is_none()
    }

    pub fn validate(&self) -> ResultEngine<()> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to)
            && from > to
        {
            return Err(EngineError::InvalidRange(
                "date_from must not be after date_to".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn matches(&self, transfer: &Transfer) -> bool {
        if let Some(id) = self.transfer_id
            && !transfer.matches_id(id)
        {
            return false;
        }

        match &self.search {
            SearchQuery::Empty => {}
            SearchQuery::Id(id) => {
                if !transfer.matches_id(*id) {
                    return false;
                }
            }
            SearchQuery::Text(needle) => {
                if !text_matches(transfer, needle) {
                    return false;
                }
            }
        }

        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(date) = transfer.date else {
                return false;
            };
            if self.date_from.is_some_and(|from| date < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| date > to) {
                return false;
            }
        }

        if let Some(id) = self.source_safe_id
            && transfer.source.id != Some(id)
        {
            return false;
        }
        if let Some(id) = self.dest_safe_id
            && transfer.destination.id != Some(id)
        {
            return false;
        }
        if let Some(id) = self.user_id
            && transfer.user_id != Some(id)
        {
            return false;
        }
        if let Some(status) = self.status
            && transfer.status != status
        {
            return false;
        }

        true
    }

    #[must_use]
    pub fn apply(&self, transfers: &[Transfer]) -> Vec<Transfer> {
        transfers
            .iter()
            .filter(|t| self.matches(t))
            .cloned()
            .collect()
    }
}

fn text_matches(transfer: &Transfer, needle: &str) -> bool {
    let fields = [
        transfer.user_name.as_deref(),
        transfer.source.name.as_deref(),
        transfer.destination.name.as_deref(),
        transfer.reference.as_deref(),
    ];
    if fields
        .into_iter()
        .flatten()
        .any(|field| normalize_text(field).contains(needle))
    {
        return true;
    }
    transfer.amount.to_string().contains(needle)
}

/// Sort orders the list view offers. Ties break on the canonical id,
/// newest first, so paging stays stable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransferSort {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

impl TransferSort {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::DateDesc => "date ↓",
            Self::DateAsc => "date ↑",
            Self::AmountDesc => "amount ↓",
            Self::AmountAsc => "amount ↑",
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::DateDesc => Self::DateAsc,
            Self::DateAsc => Self::AmountDesc,
            Self::AmountDesc => Self::AmountAsc,
            Self::AmountAsc => Self::DateDesc,
        }
    }
}

pub fn sort_transfers(transfers: &mut [Transfer], sort: TransferSort) {
    match sort {
        TransferSort::DateDesc => transfers.sort_by(|a, b| {
            (b.date, b.canonical_id()).cmp(&(a.date, a.canonical_id()))
        }),
        TransferSort::DateAsc => transfers.sort_by(|a, b| {
            (a.date, a.canonical_id()).cmp(&(b.date, b.canonical_id()))
        }),
        TransferSort::AmountDesc => transfers.sort_by(|a, b| {
            (b.amount, b.canonical_id()).cmp(&(a.amount, a.canonical_id()))
        }),
        TransferSort::AmountAsc => transfers.sort_by(|a, b| {
            (a.amount, a.canonical_id()).cmp(&(b.amount, b.canonical_id()))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_case_and_marks() {
        assert_eq!(normalize_text("Josè"), "jose");
        assert_eq!(normalize_text("CASSA Nord"), "cassa nord");
    }

    #[test]
    fn parse_recognizes_explicit_id_forms() {
        assert_eq!(SearchQuery::parse("#42"), SearchQuery::Id(42));
        assert_eq!(SearchQuery::parse("id:42"), SearchQuery::Id(42));
        assert_eq!(SearchQuery::parse("ID=7"), SearchQuery::Id(7));
        assert_eq!(SearchQuery::parse("  #13 "), SearchQuery::Id(13));
    }

    #[test]
    fn parse_falls_back_to_text() {
        assert_eq!(SearchQuery::parse(""), SearchQuery::Empty);
        assert_eq!(
            SearchQuery::parse("#42x"),
            SearchQuery::Text("#42x".to_string())
        );
        assert_eq!(
            SearchQuery::parse("identity"),
            SearchQuery::Text("identity".to_string())
        );
        assert_eq!(
            SearchQuery::parse("id: "),
            SearchQuery::Text("id:".to_string())
        );
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let filter = TransferFilter {
            date_from: NaiveDate::from_ymd_opt(2026, 8, 2),
            date_to: NaiveDate::from_ymd_opt(2026, 8, 1),
            ..Default::default()
        };
        assert!(filter.validate().is_err());
    }
}
