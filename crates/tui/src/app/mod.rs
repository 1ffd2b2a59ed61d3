use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use crossterm::event::{self, Event, KeyEvent};
use tokio::sync::mpsc;

use api_types::envelope::Pagination;
use api_types::transfer::LegRow;
use engine::{
    DecisionForm, LookupCache, LookupEntry, LookupKind, PageMeta, QueryToken, SearchQuery,
    TokenGate, Transfer, TransferFilter, TransferSort, TransferStatus, Verdict, known_safes,
    reconcile, sort_transfers,
};

use crate::{
    client::{ClientError, Gateway, ListPage},
    config::AppConfig,
    error::{AppError, Result},
    export, ui,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    Detail,
    Decide,
    New,
    Filter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Search,
    DateFrom,
    DateTo,
    SourceSafe,
    DestSafe,
    User,
    Status,
}

impl FilterField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Search => "Cerca",
            Self::DateFrom => "Dal",
            Self::DateTo => "Al",
            Self::SourceSafe => "Cassa origine",
            Self::DestSafe => "Cassa destinazione",
            Self::User => "Utente",
            Self::Status => "Stato",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Search => Self::DateFrom,
            Self::DateFrom => Self::DateTo,
            Self::DateTo => Self::SourceSafe,
            Self::SourceSafe => Self::DestSafe,
            Self::DestSafe => Self::User,
            Self::User => Self::Status,
            Self::Status => Self::Search,
        }
    }
}

/// Raw filter input as typed; parsed on apply, never while typing.
#[derive(Debug, Default)]
pub struct FilterDraft {
    pub focus: Option<FilterField>,
    pub search: String,
    pub date_from: String,
    pub date_to: String,
    pub source_safe: String,
    pub dest_safe: String,
    pub user: String,
    pub status: String,
    pub error: Option<String>,
}

impl FilterDraft {
    pub fn field_mut(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::Search => &mut self.search,
            FilterField::DateFrom => &mut self.date_from,
            FilterField::DateTo => &mut self.date_to,
            FilterField::SourceSafe => &mut self.source_safe,
            FilterField::DestSafe => &mut self.dest_safe,
            FilterField::User => &mut self.user,
            FilterField::Status => &mut self.status,
        }
    }

    pub fn field(&self, field: FilterField) -> &str {
        match field {
            FilterField::Search => &self.search,
            FilterField::DateFrom => &self.date_from,
            FilterField::DateTo => &self.date_to,
            FilterField::SourceSafe => &self.source_safe,
            FilterField::DestSafe => &self.dest_safe,
            FilterField::User => &self.user,
            FilterField::Status => &self.status,
        }
    }

    fn parse_date(raw: &str, label: &str) -> std::result::Result<Option<NaiveDate>, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("{label}: data non valida (AAAA-MM-GG)"))
    }

    fn parse_id(raw: &str, label: &str) -> std::result::Result<Option<i64>, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .parse()
            .map(Some)
            .map_err(|_| format!("{label}: id non valido"))
    }

    fn parse_status(raw: &str) -> std::result::Result<Option<TransferStatus>, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "pending" | "p" => Ok(Some(TransferStatus::Pending)),
            "approved" | "a" => Ok(Some(TransferStatus::Approved)),
            "rejected" | "r" => Ok(Some(TransferStatus::Rejected)),
            other => Err(format!("stato sconosciuto: {other}")),
        }
    }

    pub fn to_filter(&self) -> std::result::Result<TransferFilter, String> {
        let filter = TransferFilter {
            search: SearchQuery::parse(&self.search),
            transfer_id: None,
            date_from: Self::parse_date(&self.date_from, "Dal")?,
            date_to: Self::parse_date(&self.date_to, "Al")?,
            source_safe_id: Self::parse_id(&self.source_safe, "Cassa origine")?,
            dest_safe_id: Self::parse_id(&self.dest_safe, "Cassa destinazione")?,
            user_id: Self::parse_id(&self.user, "Utente")?,
            status: Self::parse_status(&self.status)?,
        };
        filter.validate().map_err(|err| err.to_string())?;
        Ok(filter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewField {
    Source,
    Destination,
    Amount,
    Note,
}

impl NewField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Source => "Cassa origine (id)",
            Self::Destination => "Cassa destinazione (id)",
            Self::Amount => "Importo",
            Self::Note => "Nota",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Source => Self::Destination,
            Self::Destination => Self::Amount,
            Self::Amount => Self::Note,
            Self::Note => Self::Source,
        }
    }
}

#[derive(Debug)]
pub struct NewTransferDraft {
    pub focus: NewField,
    pub source: String,
    pub destination: String,
    pub amount: String,
    pub note: String,
    pub error: Option<String>,
    pub in_flight: bool,
}

impl Default for NewTransferDraft {
    fn default() -> Self {
        Self {
            focus: NewField::Source,
            source: String::new(),
            destination: String::new(),
            amount: String::new(),
            note: String::new(),
            error: None,
            in_flight: false,
        }
    }
}

impl NewTransferDraft {
    pub fn field_mut(&mut self, field: NewField) -> &mut String {
        match field {
            NewField::Source => &mut self.source,
            NewField::Destination => &mut self.destination,
            NewField::Amount => &mut self.amount,
            NewField::Note => &mut self.note,
        }
    }

    pub fn field(&self, field: NewField) -> &str {
        match field {
            NewField::Source => &self.source,
            NewField::Destination => &self.destination,
            NewField::Amount => &self.amount,
            NewField::Note => &self.note,
        }
    }

    fn parse(&self) -> std::result::Result<(i64, i64, engine::Money, Option<String>), String> {
        let source: i64 = self
            .source
            .trim()
            .parse()
            .map_err(|_| "cassa origine: id non valido".to_string())?;
        let destination: i64 = self
            .destination
            .trim()
            .parse()
            .map_err(|_| "cassa destinazione: id non valido".to_string())?;
        if source == destination {
            return Err("origine e destinazione coincidono".to_string());
        }

        let amount: engine::Money = self.amount.parse().map_err(|_| {
            "importo non valido (max due decimali)".to_string()
        })?;
        if amount.is_zero() {
            return Err("l'importo deve essere maggiore di zero".to_string());
        }

        let note = self.note.trim();
        let note = (!note.is_empty()).then(|| note.to_string());
        Ok((source, destination, amount, note))
    }
}

#[derive(Debug, Default)]
pub struct TransfersState {
    /// Reconciled transfers of the current load, unfiltered.
    pub all: Vec<Transfer>,
    /// Filtered, sorted, windowed view the list renders.
    pub visible: Vec<Transfer>,
    pub meta: PageMeta,
    pub server_page: Option<Pagination>,
    pub filter: TransferFilter,
    pub sort: TransferSort,
    pub page: u64,
    pub selected: usize,
    pub detail: Option<Transfer>,
    pub detail_loading: bool,
    pub decision: DecisionForm,
    pub verdict: Option<Verdict>,
    pub error: Option<String>,
    pub skipped_rows: usize,
}

impl TransfersState {
    fn select_next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.visible.len() - 1);
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_transfer(&self) -> Option<&Transfer> {
        self.visible.get(self.selected)
    }
}

pub struct AppState {
    pub company: String,
    pub username: String,
    pub mode: Mode,
    pub transfers: TransfersState,
    pub filter_draft: FilterDraft,
    pub new_draft: NewTransferDraft,
    /// Safes observed in loaded data, offered as hints in the new-transfer
    /// form (the backend exposes no safes listing to this client).
    pub safes_hint: Vec<LookupEntry>,
    pub toast: Option<ToastState>,
    pub loading: bool,
    pub connection_ok: bool,
    pub last_refresh: Option<DateTime<Tz>>,
}

enum AppEvent {
    List {
        token: QueryToken,
        result: std::result::Result<ListPage, ClientError>,
    },
    Detail {
        token: QueryToken,
        result: std::result::Result<Vec<LegRow>, ClientError>,
    },
    DecisionDone(std::result::Result<(), ClientError>),
    CreateDone(std::result::Result<(), ClientError>),
}

pub struct App {
    config: AppConfig,
    gateway: Gateway,
    pub state: AppState,
    timezone: Tz,
    list_gate: TokenGate,
    detail_gate: TokenGate,
    cache: LookupCache,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let gateway = Gateway::new(&config)?;
        let timezone: Tz = config.timezone.parse().unwrap_or(chrono_tz::Europe::Rome);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let state = AppState {
            company: config.company.clone(),
            username: config.username.clone(),
            mode: Mode::List,
            transfers: TransfersState {
                page: 1,
                meta: PageMeta {
                    total: 0,
                    per_page: config.page_size.max(1),
                    page: 1,
                    total_pages: 1,
                },
                ..Default::default()
            },
            filter_draft: FilterDraft::default(),
            new_draft: NewTransferDraft::default(),
            safes_hint: Vec::new(),
            toast: None,
            loading: false,
            connection_ok: true,
            last_refresh: None,
        };

        Ok(Self {
            config,
            gateway,
            state,
            timezone,
            list_gate: TokenGate::new(),
            detail_gate: TokenGate::new(),
            cache: LookupCache::new(),
            events_tx,
            events_rx,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);
        self.reload();

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            self.drain_events();

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    // ---- network ------------------------------------------------------

    /// Issues a fresh token and spawns the list fetch. Any in-flight load
    /// is superseded, not cancelled: its response will fail admission.
    fn reload(&mut self) {
        let token = self.list_gate.issue();
        self.state.loading = true;
        self.state.transfers.error = None;

        let query = self.list_query();
        let gateway = self.gateway.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = gateway.list_transfers(&query).await;
            let _ = tx.send(AppEvent::List { token, result });
        });
    }

    fn list_query(&self) -> api_types::transfer::TransferListQuery {
        let filter = &self.state.transfers.filter;
        let (search, transfer_id) = match &filter.search {
            SearchQuery::Id(id) => (None, filter.transfer_id.or(Some(*id))),
            SearchQuery::Text(text) => (Some(text.clone()), filter.transfer_id),
            SearchQuery::Empty => (None, filter.transfer_id),
        };
        let date_range = match (filter.date_from, filter.date_to) {
            (Some(from), Some(to)) => Some(format!("{from},{to}")),
            _ => None,
        };

        api_types::transfer::TransferListQuery {
            // The source filter scopes legs recorded against that safe;
            // the destination filter maps onto both per-leg params.
            safe_id: filter.source_safe_id,
            user_id: filter.user_id,
            page: Some(self.state.transfers.page),
            limit: Some(self.config.page_size.max(1)),
            date_range,
            out_dest_safe_id: filter.dest_safe_id,
            in_dest_safe_id: filter.dest_safe_id,
            status: filter.status.map(|s| match s {
                TransferStatus::Pending => api_types::transfer::LegStatus::Pending,
                TransferStatus::Approved => api_types::transfer::LegStatus::Approved,
                TransferStatus::Rejected => api_types::transfer::LegStatus::Rejected,
            }),
            transfer_id,
            search,
        }
    }

    fn load_detail(&mut self, transfer: &Transfer) {
        let Some(id) = transfer.canonical_id() else {
            return;
        };
        let token = self.detail_gate.issue();
        self.state.transfers.detail_loading = true;

        let gateway = self.gateway.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = gateway.transfer_detail(id).await;
            let _ = tx.send(AppEvent::Detail { token, result });
        });
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AppEvent::List { token, result } => self.on_list(token, result),
                AppEvent::Detail { token, result } => self.on_detail(token, result),
                AppEvent::DecisionDone(result) => self.on_decision(result),
                AppEvent::CreateDone(result) => self.on_create(result),
            }
        }
    }

    fn on_list(&mut self, token: QueryToken, result: std::result::Result<ListPage, ClientError>) {
        if !self.list_gate.admit(token) {
            tracing::debug!("risposta superata da una richiesta più recente, scartata");
            return;
        }
        self.state.loading = self.list_gate.is_loading();

        match result {
            Ok(page) => {
                let transfers = reconcile(page.rows);

                // The safes lookup is rebuilt from what the data shows.
                self.cache.invalidate(LookupKind::Safes);
                let entries: Vec<LookupEntry> = known_safes(&transfers)
                    .into_iter()
                    .filter_map(|safe| {
                        Some(LookupEntry {
                            id: safe.id?,
                            name: safe.name.unwrap_or_else(|| "—".to_string()),
                        })
                    })
                    .collect();
                self.cache.put(LookupKind::Safes, entries);

                self.state.transfers.all = transfers;
                self.state.transfers.server_page = page.pagination;
                self.state.transfers.skipped_rows = page.skipped;
                self.state.connection_ok = true;
                self.state.last_refresh = Some(Utc::now().with_timezone(&self.timezone));
                self.refresh_visible();
            }
            Err(err) => {
                if matches!(err, ClientError::Transport(_)) {
                    self.state.connection_ok = false;
                }
                self.state.transfers.error = Some(err.to_string());
            }
        }
    }

    fn on_detail(
        &mut self,
        token: QueryToken,
        result: std::result::Result<Vec<LegRow>, ClientError>,
    ) {
        if !self.detail_gate.admit(token) {
            return;
        }
        self.state.transfers.detail_loading = self.detail_gate.is_loading();

        match result {
            Ok(rows) => {
                if let Some(transfer) = reconcile(rows).into_iter().next() {
                    self.state.transfers.detail = Some(transfer);
                }
            }
            Err(err) => self.toast(ToastLevel::Error, err.to_string()),
        }
    }

    fn on_decision(&mut self, result: std::result::Result<(), ClientError>) {
        match result {
            Ok(()) => {
                self.state.transfers.decision.succeed();
                self.state.transfers.verdict = None;
                self.state.transfers.detail = None;
                self.state.mode = Mode::List;
                self.toast(ToastLevel::Success, "Stato aggiornato.".to_string());
                // Resolving one leg may or may not resolve its pair; only
                // the backend knows. Reload instead of patching locally.
                self.reload();
            }
            Err(err) => {
                self.state.transfers.decision.fail();
                self.toast(ToastLevel::Error, err.to_string());
            }
        }
    }

    fn on_create(&mut self, result: std::result::Result<(), ClientError>) {
        self.state.new_draft.in_flight = false;
        match result {
            Ok(()) => {
                self.state.new_draft = NewTransferDraft::default();
                self.state.mode = Mode::List;
                self.toast(ToastLevel::Success, "Trasferimento registrato.".to_string());
                self.reload();
            }
            Err(err) => {
                // Typed input stays; only the error changes.
                self.state.new_draft.error = Some(err.to_string());
            }
        }
    }

    // ---- view ---------------------------------------------------------

    fn refresh_visible(&mut self) {
        let transfers = &mut self.state.transfers;
        let mut filtered = transfers.filter.apply(&transfers.all);
        sort_transfers(&mut filtered, transfers.sort);

        transfers.meta = PageMeta::resolve(
            transfers.server_page.as_ref(),
            filtered.len(),
            transfers.page,
            self.config.page_size.max(1),
        );
        transfers.visible = transfers.meta.slice(&filtered).to_vec();
        if transfers.selected >= transfers.visible.len() {
            transfers.selected = transfers.visible.len().saturating_sub(1);
        }
    }

    fn toast(&mut self, level: ToastLevel, message: String) {
        self.state.toast = Some(ToastState { message, level });
    }

    // ---- input --------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) {
        use crate::ui::keymap::AppAction;

        let action = crate::ui::keymap::map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }
        self.state.toast = None;

        match self.state.mode {
            Mode::List => self.handle_list_key(action),
            Mode::Detail => self.handle_detail_key(action),
            Mode::Decide => self.handle_decide_key(action),
            Mode::New => self.handle_new_key(action),
            Mode::Filter => self.handle_filter_key(action),
        }
    }

    fn handle_list_key(&mut self, action: crate::ui::keymap::AppAction) {
        use crate::ui::keymap::AppAction;

        match action {
            AppAction::Up => self.state.transfers.select_prev(),
            AppAction::Down => self.state.transfers.select_next(),
            AppAction::PrevPage => self.page_prev(),
            AppAction::NextPage => self.page_next(),
            AppAction::Submit => self.open_detail(),
            AppAction::Input(ch) => match ch {
                'q' => self.should_quit = true,
                'j' => self.state.transfers.select_next(),
                'k' => self.state.transfers.select_prev(),
                'n' => self.page_next(),
                'p' => self.page_prev(),
                'r' => self.reload(),
                's' => {
                    self.state.transfers.sort = self.state.transfers.sort.next();
                    self.refresh_visible();
                }
                'c' => {
                    self.state.transfers.filter = TransferFilter::default();
                    self.state.filter_draft = FilterDraft::default();
                    self.state.transfers.page = 1;
                    self.reload();
                }
                '/' => {
                    self.state.filter_draft.focus = Some(FilterField::Search);
                    self.state.filter_draft.error = None;
                    self.state.mode = Mode::Filter;
                }
                'a' => {
                    self.state.new_draft.error = None;
                    if self.cache.fresh(LookupKind::Safes, false) {
                        self.state.safes_hint = self
                            .cache
                            .get(LookupKind::Safes)
                            .map(<[LookupEntry]>::to_vec)
                            .unwrap_or_default();
                    }
                    self.state.mode = Mode::New;
                }
                'x' => self.export_visible(),
                _ => {}
            },
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, action: crate::ui::keymap::AppAction) {
        use crate::ui::keymap::AppAction;

        match action {
            AppAction::Cancel => {
                self.state.transfers.detail = None;
                self.state.mode = Mode::List;
            }
            AppAction::Input(ch) => match ch {
                'q' | 'b' => {
                    self.state.transfers.detail = None;
                    self.state.mode = Mode::List;
                }
                'r' => {
                    if let Some(detail) = self.state.transfers.detail.clone() {
                        self.load_detail(&detail);
                    }
                }
                'y' => self.open_decide(Verdict::Approve),
                'n' => self.open_decide(Verdict::Reject),
                _ => {}
            },
            _ => {}
        }
    }

    fn open_detail(&mut self) {
        let Some(transfer) = self.state.transfers.selected_transfer().cloned() else {
            return;
        };
        self.state.transfers.detail = Some(transfer.clone());
        self.state.mode = Mode::Detail;
        self.load_detail(&transfer);
    }

    /// Offers the decision panel only while the transfer is still pending;
    /// a resolved transfer never gets the controls.
    fn open_decide(&mut self, verdict: Verdict) {
        let Some(detail) = &self.state.transfers.detail else {
            return;
        };
        if !self.state.transfers.decision.can_decide(detail) {
            return;
        }
        self.state.transfers.verdict = Some(verdict);
        self.state.mode = Mode::Decide;
    }

    fn handle_decide_key(&mut self, action: crate::ui::keymap::AppAction) {
        use crate::ui::keymap::AppAction;

        if self.state.transfers.decision.in_flight() {
            // Controls are disabled for the duration of the call.
            return;
        }

        match action {
            AppAction::Cancel => {
                self.state.transfers.verdict = None;
                self.state.mode = Mode::Detail;
            }
            AppAction::Backspace => {
                self.state.transfers.decision.note.pop();
            }
            AppAction::Input(ch) => self.state.transfers.decision.note.push(ch),
            AppAction::Submit => self.submit_decision(),
            _ => {}
        }
    }

    fn submit_decision(&mut self) {
        let Some(detail) = self.state.transfers.detail.clone() else {
            return;
        };
        let Some(verdict) = self.state.transfers.verdict else {
            return;
        };

        match self.state.transfers.decision.begin(&detail, verdict) {
            Ok(request) => {
                let gateway = self.gateway.clone();
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = gateway.update_status(&request).await;
                    let _ = tx.send(AppEvent::DecisionDone(result));
                });
            }
            Err(err) => self.toast(ToastLevel::Error, err.to_string()),
        }
    }

    fn handle_new_key(&mut self, action: crate::ui::keymap::AppAction) {
        use crate::ui::keymap::AppAction;

        if self.state.new_draft.in_flight {
            return;
        }

        match action {
            AppAction::Cancel => {
                self.state.mode = Mode::List;
            }
            AppAction::NextField => {
                self.state.new_draft.focus = self.state.new_draft.focus.next();
            }
            AppAction::Backspace => {
                let focus = self.state.new_draft.focus;
                self.state.new_draft.field_mut(focus).pop();
            }
            AppAction::Input(ch) => {
                let focus = self.state.new_draft.focus;
                self.state.new_draft.field_mut(focus).push(ch);
            }
            AppAction::Submit => self.submit_new(),
            _ => {}
        }
    }

    fn submit_new(&mut self) {
        match self.state.new_draft.parse() {
            Ok((source, destination, amount, note)) => {
                self.state.new_draft.error = None;
                self.state.new_draft.in_flight = true;

                let gateway = self.gateway.clone();
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = gateway
                        .create_transfer(source, destination, amount, note)
                        .await;
                    let _ = tx.send(AppEvent::CreateDone(result));
                });
            }
            Err(message) => self.state.new_draft.error = Some(message),
        }
    }

    fn handle_filter_key(&mut self, action: crate::ui::keymap::AppAction) {
        use crate::ui::keymap::AppAction;

        match action {
            AppAction::Cancel => {
                self.state.mode = Mode::List;
            }
            AppAction::NextField => {
                let focus = self
                    .state
                    .filter_draft
                    .focus
                    .unwrap_or(FilterField::Search);
                self.state.filter_draft.focus = Some(focus.next());
            }
            AppAction::Backspace => {
                let focus = self
                    .state
                    .filter_draft
                    .focus
                    .unwrap_or(FilterField::Search);
                self.state.filter_draft.field_mut(focus).pop();
            }
            AppAction::Input(ch) => {
                let focus = self
                    .state
                    .filter_draft
                    .focus
                    .unwrap_or(FilterField::Search);
                self.state.filter_draft.field_mut(focus).push(ch);
            }
            AppAction::Submit => match self.state.filter_draft.to_filter() {
                Ok(filter) => {
                    self.state.filter_draft.error = None;
                    self.state.transfers.filter = filter;
                    self.state.transfers.page = 1;
                    self.state.mode = Mode::List;
                    self.reload();
                }
                Err(message) => self.state.filter_draft.error = Some(message),
            },
            _ => {}
        }
    }

    fn page_next(&mut self) {
        if self.state.transfers.meta.has_next() {
            self.state.transfers.page = self.state.transfers.meta.page + 1;
            self.reload();
        }
    }

    fn page_prev(&mut self) {
        if self.state.transfers.meta.has_prev() {
            self.state.transfers.page = self.state.transfers.meta.page - 1;
            self.reload();
        }
    }

    fn export_visible(&mut self) {
        if self.state.transfers.visible.is_empty() {
            self.toast(ToastLevel::Info, "Niente da esportare.".to_string());
            return;
        }
        match export::export_transfers(&self.state.transfers.visible, self.timezone) {
            Ok(path) => self.toast(
                ToastLevel::Success,
                format!("Esportato in {}", path.display()),
            ),
            Err(err) => self.toast(ToastLevel::Error, err.to_string()),
        }
    }

}
