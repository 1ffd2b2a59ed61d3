//! Wire types for the management backend.
//!
//! The backend is a multi-tenant PHP REST API; every response is wrapped in a
//! `{status, data, pagination?, message?}` envelope and the payloads are
//! loosely typed: numeric ids arrive both as numbers and as strings, empty
//! strings stand in for nulls, and list payloads sit either directly under
//! `data` or nested one level deeper. All of that tolerance lives here, at
//! the deserialization boundary, so the rest of the workspace only ever sees
//! well-typed rows.

use serde::{Deserialize, Serialize};

pub mod wire {
    //! Tolerant deserializers for the backend's loosely-typed JSON.

    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Int(i64),
        Float(f64),
        Text(String),
    }

    impl Loose {
        fn as_i64(&self) -> Option<i64> {
            match self {
                Loose::Int(n) => Some(*n),
                Loose::Float(f) => Some(*f as i64),
                Loose::Text(s) => s.trim().parse().ok(),
            }
        }

        fn as_f64(&self) -> Option<f64> {
            match self {
                Loose::Int(n) => Some(*n as f64),
                Loose::Float(f) => Some(*f),
                Loose::Text(s) => s.trim().parse().ok(),
            }
        }
    }

    /// Required integer id, accepting `42`, `42.0` and `"42"`.
    pub fn id<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Loose::deserialize(deserializer)?;
        value
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom("invalid id"))
    }

    /// Optional integer id; `null`, `""` and garbage all collapse to `None`.
    pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Loose>::deserialize(deserializer)?;
        Ok(value.and_then(|v| v.as_i64()))
    }

    /// Decimal amount, accepting `12.5`, `12` and `"12.50"`.
    pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Loose>::deserialize(deserializer)?;
        Ok(value.and_then(|v| v.as_f64()).unwrap_or(0.0))
    }

    /// Optional count (pagination fields).
    pub fn opt_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Loose>::deserialize(deserializer)?;
        Ok(value
            .and_then(|v| v.as_i64())
            .and_then(|n| u64::try_from(n).ok()))
    }

    /// Optional text; the backend sends `""` where it means null.
    pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
    }

    /// Optional date; accepts `YYYY-MM-DD` and `YYYY-MM-DD HH:MM:SS`.
    pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().and_then(parse_date))
    }

    /// Optional datetime; accepts `YYYY-MM-DD HH:MM:SS` and a bare date.
    pub fn opt_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().and_then(parse_datetime))
    }

    pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .or_else(|| parse_datetime(trimmed).map(|dt| dt.date()))
    }

    pub(crate) fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }
}

pub mod envelope {
    use super::*;

    /// The `{status, data, pagination?, message?}` wrapper every endpoint
    /// responds with. `data` is kept raw here; each endpoint module knows how
    /// to dig its payload out of it.
    #[derive(Debug, Deserialize)]
    pub struct Envelope {
        #[serde(default)]
        pub status: String,
        #[serde(default)]
        pub data: Option<serde_json::Value>,
        #[serde(default, deserialize_with = "crate::wire::opt_text")]
        pub message: Option<String>,
        #[serde(default)]
        pub pagination: Option<Pagination>,
    }

    impl Envelope {
        pub fn is_success(&self) -> bool {
            self.status == "success"
        }
    }

    /// Server-side pagination metadata. Every field is optional because the
    /// backend omits the block (or single fields) on some endpoints.
    #[derive(Clone, Copy, Debug, Default, Deserialize)]
    pub struct Pagination {
        #[serde(default, deserialize_with = "crate::wire::opt_count")]
        pub total: Option<u64>,
        #[serde(default, deserialize_with = "crate::wire::opt_count")]
        pub per_page: Option<u64>,
        #[serde(default, deserialize_with = "crate::wire::opt_count")]
        pub page: Option<u64>,
        #[serde(default, deserialize_with = "crate::wire::opt_count")]
        pub total_pages: Option<u64>,
    }
}

pub mod safe {
    use super::*;

    /// A safe is a named cash-holding ledger, either company-level or owned
    /// by a sales representative.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SafeKind {
        Company,
        Rep,
    }

    impl SafeKind {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Company => "company",
                Self::Rep => "rep",
            }
        }
    }

    impl<'de> Deserialize<'de> for SafeKind {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let raw = Option::<String>::deserialize(deserializer)?;
            Ok(match raw.as_deref().map(str::trim) {
                Some("rep") => Self::Rep,
                _ => Self::Company,
            })
        }
    }
}

pub mod transfer {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use uuid::Uuid;

    use crate::safe::SafeKind;

    /// Which side of a transfer a transaction row records.
    ///
    /// Decoded exactly once, here; rows with a missing or unknown `type` are
    /// treated as the outbound leg and nothing downstream re-infers the role.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum LegKind {
        #[default]
        TransferOut,
        TransferIn,
    }

    impl LegKind {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::TransferOut => "transfer_out",
                Self::TransferIn => "transfer_in",
            }
        }
    }

    impl<'de> Deserialize<'de> for LegKind {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let raw = Option::<String>::deserialize(deserializer)?;
            Ok(match raw.as_deref().map(str::trim) {
                Some("transfer_in") => Self::TransferIn,
                _ => Self::TransferOut,
            })
        }
    }

    /// Per-leg approval status.
    ///
    /// Unknown strings map to `Pending` so a row is never shown as resolved
    /// on garbage input.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum LegStatus {
        #[default]
        Pending,
        Approved,
        Rejected,
    }

    impl LegStatus {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Pending => "pending",
                Self::Approved => "approved",
                Self::Rejected => "rejected",
            }
        }
    }

    impl<'de> Deserialize<'de> for LegStatus {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let raw = Option::<String>::deserialize(deserializer)?;
            Ok(match raw.as_deref().map(str::trim) {
                Some("approved") => Self::Approved,
                Some("rejected") => Self::Rejected,
                _ => Self::Pending,
            })
        }
    }

    /// One safe-transaction row: a single leg (outbound or inbound) of a
    /// safe-to-safe transfer, as `safe_transfers/get_all.php` returns it.
    #[derive(Clone, Debug, Deserialize)]
    pub struct LegRow {
        #[serde(deserialize_with = "crate::wire::id")]
        pub id: i64,
        #[serde(rename = "type", default)]
        pub kind: LegKind,
        #[serde(default, deserialize_with = "crate::wire::amount")]
        pub amount: f64,
        #[serde(default)]
        pub status: LegStatus,
        #[serde(default, deserialize_with = "crate::wire::opt_id")]
        pub safe_id: Option<i64>,
        #[serde(default, deserialize_with = "crate::wire::opt_text")]
        pub safe_name: Option<String>,
        #[serde(default)]
        pub safe_type: Option<SafeKind>,
        #[serde(default, deserialize_with = "crate::wire::opt_id")]
        pub counterpart_safe_id: Option<i64>,
        #[serde(default, deserialize_with = "crate::wire::opt_text")]
        pub counterpart_safe_name: Option<String>,
        #[serde(default)]
        pub counterpart_safe_type: Option<SafeKind>,
        #[serde(default, deserialize_with = "crate::wire::opt_date")]
        pub date: Option<NaiveDate>,
        #[serde(default, deserialize_with = "crate::wire::opt_datetime")]
        pub created_at: Option<NaiveDateTime>,
        #[serde(default, deserialize_with = "crate::wire::opt_id")]
        pub user_id: Option<i64>,
        #[serde(default, deserialize_with = "crate::wire::opt_text")]
        pub user_name: Option<String>,
        #[serde(default, deserialize_with = "crate::wire::opt_text")]
        pub approved_by_name: Option<String>,
        #[serde(default, deserialize_with = "crate::wire::opt_datetime")]
        pub approved_date: Option<NaiveDateTime>,
        #[serde(default, deserialize_with = "crate::wire::opt_text")]
        pub reference: Option<String>,
        #[serde(default, deserialize_with = "crate::wire::opt_text")]
        pub notes: Option<String>,
        #[serde(default, deserialize_with = "crate::wire::opt_text")]
        pub admin_notes: Option<String>,
    }

    /// Digs the row array out of an envelope `data` value.
    ///
    /// Fallback order, in this order and nowhere else: `data` itself as an
    /// array, then `data.items`, then `data.data`. Anything else yields no
    /// rows.
    pub fn rows_value(data: Option<&serde_json::Value>) -> &[serde_json::Value] {
        let Some(data) = data else {
            return &[];
        };
        if let Some(rows) = data.as_array() {
            return rows;
        }
        for key in ["items", "data"] {
            if let Some(rows) = data.get(key).and_then(|v| v.as_array()) {
                return rows;
            }
        }
        // A detail endpoint returns a single row object.
        &[]
    }

    /// Parses leg rows out of an envelope `data` value.
    ///
    /// Returns the parsed rows and the number of rows that failed to parse,
    /// so the caller can log the loss instead of dropping it silently.
    pub fn leg_rows(data: Option<&serde_json::Value>) -> (Vec<LegRow>, usize) {
        let raw = rows_value(data);
        // get_detail.php answers with one object instead of an array.
        if raw.is_empty()
            && let Some(row) = data
                .filter(|v| v.is_object())
                .and_then(|v| serde_json::from_value::<LegRow>(v.clone()).ok())
        {
            return (vec![row], 0);
        }

        let mut rows = Vec::with_capacity(raw.len());
        let mut skipped = 0;
        for value in raw {
            match serde_json::from_value::<LegRow>(value.clone()) {
                Ok(row) => rows.push(row),
                Err(_) => skipped += 1,
            }
        }
        (rows, skipped)
    }

    /// Query parameters for `safe_transfers/get_all.php`.
    #[derive(Clone, Debug, Default, Serialize)]
    pub struct TransferListQuery {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub safe_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub user_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub page: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub limit: Option<u64>,
        /// `YYYY-MM-DD,YYYY-MM-DD`, both ends inclusive.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub date_range: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub out_dest_safe_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub in_dest_safe_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<LegStatus>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub transfer_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub search: Option<String>,
    }

    /// JSON body for `safe_transfers/add.php`.
    #[derive(Clone, Debug, Serialize)]
    pub struct TransferNew {
        pub source_safe_id: i64,
        pub destination_safe_id: i64,
        pub transfer_amount: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub transfer_notes: Option<String>,
        pub users_uuid: Uuid,
    }

    /// Form fields for `safe_transactions/update_status.php`.
    #[derive(Clone, Debug, Serialize)]
    pub struct StatusUpdate {
        pub transaction_id: i64,
        pub status: LegStatus,
        pub users_uuid: Uuid,
        /// Optional reviewer note; the backend stores it on the leg when
        /// present and ignores it otherwise.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub admin_notes: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::envelope::Envelope;
    use super::transfer::{LegKind, LegRow, LegStatus, leg_rows, rows_value};

    #[test]
    fn leg_row_accepts_string_ids_and_amounts() {
        let row: LegRow = serde_json::from_value(json!({
            "id": "42",
            "type": "transfer_in",
            "amount": "150.75",
            "status": "approved",
            "safe_id": 3,
            "safe_name": "Main safe",
            "counterpart_safe_id": "7",
        }))
        .unwrap();

        assert_eq!(row.id, 42);
        assert_eq!(row.kind, LegKind::TransferIn);
        assert_eq!(row.amount, 150.75);
        assert_eq!(row.status, LegStatus::Approved);
        assert_eq!(row.counterpart_safe_id, Some(7));
    }

    #[test]
    fn unknown_kind_and_status_fall_back() {
        let row: LegRow = serde_json::from_value(json!({
            "id": 1,
            "type": "mystery",
            "status": "??",
        }))
        .unwrap();
        assert_eq!(row.kind, LegKind::TransferOut);
        assert_eq!(row.status, LegStatus::Pending);

        let row: LegRow = serde_json::from_value(json!({"id": 2})).unwrap();
        assert_eq!(row.kind, LegKind::TransferOut);
        assert_eq!(row.status, LegStatus::Pending);
    }

    #[test]
    fn empty_strings_collapse_to_none() {
        let row: LegRow = serde_json::from_value(json!({
            "id": 1,
            "safe_name": "",
            "reference": "  ",
            "notes": "keep",
        }))
        .unwrap();
        assert_eq!(row.safe_name, None);
        assert_eq!(row.reference, None);
        assert_eq!(row.notes.as_deref(), Some("keep"));
    }

    #[test]
    fn dates_accept_both_backend_shapes() {
        let row: LegRow = serde_json::from_value(json!({
            "id": 1,
            "date": "2026-08-01 10:22:00",
            "created_at": "2026-08-01",
        }))
        .unwrap();
        assert_eq!(row.date.unwrap().to_string(), "2026-08-01");
        assert_eq!(row.created_at.unwrap().to_string(), "2026-08-01 00:00:00");
    }

    #[test]
    fn rows_value_fallback_order() {
        let direct = json!([{"id": 1}]);
        assert_eq!(rows_value(Some(&direct)).len(), 1);

        let items = json!({"items": [{"id": 1}, {"id": 2}]});
        assert_eq!(rows_value(Some(&items)).len(), 2);

        let nested = json!({"data": [{"id": 1}]});
        assert_eq!(rows_value(Some(&nested)).len(), 1);

        // `items` wins over `data` when both are present.
        let both = json!({"items": [{"id": 1}], "data": [{"id": 2}, {"id": 3}]});
        let rows = rows_value(Some(&both));
        assert_eq!(rows.len(), 1);

        assert!(rows_value(None).is_empty());
        assert!(rows_value(Some(&json!({"overview": {}}))).is_empty());
    }

    #[test]
    fn leg_rows_reports_skipped_rows() {
        let data = json!([{"id": 1}, {"no_id": true}, {"id": "3"}]);
        let (rows, skipped) = leg_rows(Some(&data));
        assert_eq!(rows.len(), 2);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn leg_rows_accepts_detail_object() {
        let data = json!({"id": 9, "type": "transfer_out"});
        let (rows, skipped) = leg_rows(Some(&data));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 9);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn envelope_reads_failure_message() {
        let env: Envelope = serde_json::from_value(json!({
            "status": "error",
            "message": "missing permission",
        }))
        .unwrap();
        assert!(!env.is_success());
        assert_eq!(env.message.as_deref(), Some("missing permission"));
        assert!(env.pagination.is_none());
    }

    #[test]
    fn envelope_reads_pagination_with_string_counts() {
        let env: Envelope = serde_json::from_value(json!({
            "status": "success",
            "data": [],
            "pagination": {"total": "37", "per_page": 10, "page": "2", "total_pages": 4},
        }))
        .unwrap();
        let page = env.pagination.unwrap();
        assert_eq!(page.total, Some(37));
        assert_eq!(page.per_page, Some(10));
        assert_eq!(page.page, Some(2));
        assert_eq!(page.total_pages, Some(4));
    }
}
