//! The API gateway: tenant-scoped URLs, auth context, envelope unwrapping.
//!
//! Every call goes to `{base_url}/{company}/<endpoint>.php`, carries the
//! configured `users_uuid`, and comes back wrapped in the backend's
//! `{status, data, pagination?, message?}` envelope. This layer does not
//! retry and does not cache; callers own both concerns.

use reqwest::Url;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use api_types::envelope::{Envelope, Pagination};
use api_types::transfer::{LegRow, StatusUpdate, TransferListQuery, TransferNew, leg_rows};
use engine::{DecisionRequest, Money};

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Missing or unusable tenant/base URL/auth context. Fatal to the
    /// current view; must block it with a clear message.
    #[error("configurazione incompleta: {0}")]
    Configuration(String),
    /// The backend answered with a non-success envelope.
    #[error("{0}")]
    Api(String),
    /// Transport failure.
    #[error("server non raggiungibile: {0}")]
    Transport(#[from] reqwest::Error),
}

/// One page of raw transfer legs, as the list endpoint returned it.
#[derive(Debug)]
pub struct ListPage {
    pub rows: Vec<LegRow>,
    /// Rows that failed to parse; reported, never silently dropped.
    pub skipped: usize,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone)]
pub struct Gateway {
    base_url: Url,
    tenant: String,
    users_uuid: Uuid,
    http: reqwest::Client,
}

impl Gateway {
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        let tenant = config.company.trim();
        if tenant.is_empty() {
            return Err(ClientError::Configuration(
                "nome azienda (company) mancante".to_string(),
            ));
        }

        let base = config.base_url.trim();
        if base.is_empty() {
            return Err(ClientError::Configuration("base_url mancante".to_string()));
        }
        // A trailing slash keeps Url::join from eating the last segment.
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|err| ClientError::Configuration(format!("base_url non valido: {err}")))?;

        let users_uuid = Uuid::parse_str(config.user_uuid.trim()).map_err(|_| {
            ClientError::Configuration("user_uuid mancante o non valido".to_string())
        })?;

        Ok(Self {
            base_url,
            tenant: tenant.to_string(),
            users_uuid,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(&format!("{}/{}", self.tenant, endpoint))
            .map_err(|err| ClientError::Configuration(format!("endpoint non valido: {err}")))
    }

    fn unwrap_envelope(envelope: Envelope) -> Result<Envelope, ClientError> {
        if envelope.is_success() {
            Ok(envelope)
        } else {
            Err(ClientError::Api(
                envelope
                    .message
                    .unwrap_or_else(|| "errore sconosciuto dal server".to_string()),
            ))
        }
    }

    async fn get<Q: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        query: &Q,
    ) -> Result<Envelope, ClientError> {
        let url = self.endpoint_url(endpoint)?;
        tracing::debug!(endpoint, "GET");
        let res = self
            .http
            .get(url)
            .query(&[("users_uuid", self.users_uuid.to_string())])
            .query(query)
            .send()
            .await?;
        let envelope = res.json::<Envelope>().await?;
        Self::unwrap_envelope(envelope)
    }

    /// `GET {tenant}/safe_transfers/get_all.php`
    pub async fn list_transfers(&self, query: &TransferListQuery) -> Result<ListPage, ClientError> {
        let envelope = self.get("safe_transfers/get_all.php", query).await?;
        let (rows, skipped) = leg_rows(envelope.data.as_ref());
        if skipped > 0 {
            tracing::warn!(skipped, "scartate righe non interpretabili dal server");
        }
        Ok(ListPage {
            rows,
            skipped,
            pagination: envelope.pagination,
        })
    }

    /// `GET {tenant}/safe_transfers/get_detail.php` — both legs of one
    /// transfer.
    pub async fn transfer_detail(&self, id: i64) -> Result<Vec<LegRow>, ClientError> {
        let envelope = self
            .get("safe_transfers/get_detail.php", &[("id", id)])
            .await?;
        let (rows, _) = leg_rows(envelope.data.as_ref());
        if rows.is_empty() {
            return Err(ClientError::Api("trasferimento non trovato".to_string()));
        }
        Ok(rows)
    }

    /// `POST {tenant}/safe_transfers/add.php`
    pub async fn create_transfer(
        &self,
        source_safe_id: i64,
        destination_safe_id: i64,
        amount: Money,
        notes: Option<String>,
    ) -> Result<(), ClientError> {
        let payload = TransferNew {
            source_safe_id,
            destination_safe_id,
            transfer_amount: amount.minor() as f64 / 100.0,
            transfer_notes: notes,
            users_uuid: self.users_uuid,
        };

        let url = self.endpoint_url("safe_transfers/add.php")?;
        tracing::debug!(source_safe_id, destination_safe_id, "POST add");
        let res = self.http.post(url).json(&payload).send().await?;
        let envelope = res.json::<Envelope>().await?;
        Self::unwrap_envelope(envelope).map(|_| ())
    }

    /// `POST {tenant}/safe_transactions/update_status.php` — the single
    /// status-mutation call a decision produces, addressed to the canonical
    /// leg id.
    pub async fn update_status(&self, request: &DecisionRequest) -> Result<(), ClientError> {
        let form = StatusUpdate {
            transaction_id: request.transaction_id,
            status: request.status,
            users_uuid: self.users_uuid,
            admin_notes: request.note.clone(),
        };

        let url = self.endpoint_url("safe_transactions/update_status.php")?;
        tracing::debug!(
            transaction_id = request.transaction_id,
            status = request.status.as_str(),
            "POST update_status"
        );
        let res = self.http.post(url).form(&form).send().await?;
        let envelope = res.json::<Envelope>().await?;
        Self::unwrap_envelope(envelope).map(|_| ())
    }
}
