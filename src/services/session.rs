//! Viewing session
//!
//! Owns one data source, the cached fetch outcome, the filter/selection
//! state, the sort state and the exporter. The dataset is fetched exactly
//! once per session: repeated `load` calls return the cached outcome,
//! success or failure, without touching the network again. All state
//! transitions go through `&mut self`, so events apply strictly in call
//! order.

use crate::models::AgendaItem;
use crate::services::export::{ExportError, ExportState, Exporter};
use crate::services::source::{AgendaSource, FetchError};
use crate::services::table::{build_rows, SortColumn, SortState, TableRow};
use crate::services::view::ViewState;

/// One user session over the agenda dataset
pub struct AgendaSession {
    source: Box<dyn AgendaSource>,
    fetched: Option<Result<Vec<AgendaItem>, FetchError>>,
    view: ViewState,
    sort: SortState,
    exporter: Exporter,
    meeting_date: String,
}

impl AgendaSession {
    /// Create a session. The meeting-date label is a required input from
    /// the surrounding application; it is never derived here.
    pub fn new(source: Box<dyn AgendaSource>, meeting_date: impl Into<String>) -> Self {
        Self {
            source,
            fetched: None,
            view: ViewState::new(),
            sort: SortState::new(),
            exporter: Exporter::new(),
            meeting_date: meeting_date.into(),
        }
    }

    /// Fetch the dataset on first call; afterwards return the cached
    /// outcome. A failed fetch stays failed for the rest of the session
    /// (the user reloads to retry), and no partial data is retained.
    pub async fn load(&mut self) -> Result<(), FetchError> {
        if self.fetched.is_none() {
            self.fetched = Some(self.source.fetch_agenda_items().await);
        }
        match self.fetched.as_ref().expect("outcome cached above") {
            Ok(_) => Ok(()),
            Err(err) => Err(err.clone()),
        }
    }

    /// The full dataset, if loaded successfully
    pub fn items(&self) -> Option<&[AgendaItem]> {
        match &self.fetched {
            Some(Ok(items)) => Some(items),
            _ => None,
        }
    }

    /// The fetch failure, if the load failed
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match &self.fetched {
            Some(Err(err)) => Some(err),
            _ => None,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.view.set_filter_text(text);
    }

    pub fn set_differing_votes_only(&mut self, enabled: bool) {
        self.view.set_differing_votes_only(enabled);
    }

    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort.toggle(column);
    }

    pub fn toggle_item(&mut self, id: &str) {
        self.view.toggle_item(id);
    }

    /// Header checkbox action over the currently visible items
    pub fn toggle_all(&mut self) {
        let ids: Vec<String> = self.visible().iter().map(|item| item.id.clone()).collect();
        self.view.toggle_all(ids.iter().map(String::as_str));
    }

    /// Header checkbox display state
    pub fn is_all_selected(&self) -> bool {
        let visible = self.visible();
        self.view
            .is_all_selected(visible.iter().map(|item| item.id.as_str()))
    }

    /// The currently visible items, in dataset order. Empty when the
    /// dataset is not loaded: a failed fetch renders no rows.
    pub fn visible(&self) -> Vec<&AgendaItem> {
        match self.items() {
            Some(items) => self.view.visible_items(items),
            None => Vec::new(),
        }
    }

    /// Rendered table rows for the current view and sort state
    pub fn rows(&self) -> Vec<TableRow> {
        build_rows(&self.visible(), |id| self.view.is_selected(id), self.sort)
    }

    /// The export input set: selection ∩ currently visible
    pub fn export_items(&self) -> Vec<AgendaItem> {
        match self.items() {
            Some(items) => self.view.export_items(items),
            None => Vec::new(),
        }
    }

    /// Whether the export affordance should be offered at all
    pub fn can_export(&self) -> bool {
        !self.export_items().is_empty() && !self.exporter.is_generating()
    }

    /// Generate the export document for the current selection
    pub async fn export(&mut self) -> Result<(), ExportError> {
        let items = self.export_items();
        let meeting_date = self.meeting_date.clone();
        self.exporter.generate(items, meeting_date).await
    }

    pub fn export_state(&self) -> &ExportState {
        self.exporter.state()
    }

    /// The finished document, if the last export succeeded
    pub fn export_document(&self) -> Option<&[u8]> {
        self.exporter.document()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vote;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubSource {
        items: Vec<AgendaItem>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AgendaSource for StubSource {
        async fn fetch_agenda_items(&self) -> Result<Vec<AgendaItem>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.items.clone())
        }
    }

    struct FailingSource {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AgendaSource for FailingSource {
        async fn fetch_agenda_items(&self) -> Result<Vec<AgendaItem>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(FetchError::DataUnavailable("connection refused".to_string()))
        }
    }

    fn vote(person: &str, value: &str) -> Vote {
        Vote {
            person_name: person.to_string(),
            vote_value: value.to_string(),
        }
    }

    fn item(id: &str, title: &str, votes: Vec<Vote>) -> AgendaItem {
        AgendaItem {
            id: id.to_string(),
            agenda_number: Some(id.to_string()),
            title: title.to_string(),
            agenda_sequence: None,
            matter_id: None,
            attachments: vec![],
            votes,
            history: vec![],
        }
    }

    /// Three items: two with identical unanimous vote sets, one split
    fn sample_items() -> Vec<AgendaItem> {
        vec![
            item("1", "Road contract", vec![vote("Smith", "Aye"), vote("Jones", "Aye")]),
            item("2", "Library funding", vec![vote("Smith", "Aye"), vote("Jones", "Aye")]),
            item("3", "Park renaming", vec![vote("Smith", "Aye"), vote("Jones", "No")]),
        ]
    }

    fn session_with(items: Vec<AgendaItem>) -> (AgendaSession, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = StubSource {
            items,
            calls: calls.clone(),
        };
        (
            AgendaSession::new(Box::new(source), "January 23, 2025"),
            calls,
        )
    }

    // ========================================================================
    // Fetch lifecycle
    // ========================================================================

    #[tokio::test]
    async fn test_load_fetches_exactly_once() {
        let (mut session, calls) = session_with(sample_items());

        session.load().await.unwrap();
        session.load().await.unwrap();
        session.load().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.items().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_load_shows_error_and_no_rows() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = AgendaSession::new(
            Box::new(FailingSource {
                calls: calls.clone(),
            }),
            "January 23, 2025",
        );

        assert!(session.load().await.is_err());
        assert!(session.fetch_error().is_some());
        assert!(session.items().is_none());
        assert!(session.rows().is_empty());

        // The failure is cached; no automatic retry
        assert!(session.load().await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    // ========================================================================
    // Filtering and selection through the session
    // ========================================================================

    #[tokio::test]
    async fn test_differing_votes_scenario() {
        let (mut session, _) = session_with(sample_items());
        session.load().await.unwrap();

        session.set_differing_votes_only(true);
        let rows = session.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "3");
    }

    #[tokio::test]
    async fn test_header_checkbox_tracks_visible_set() {
        let (mut session, _) = session_with(sample_items());
        session.load().await.unwrap();

        assert!(!session.is_all_selected());
        session.toggle_all();
        assert!(session.is_all_selected());
        assert!(session.rows().iter().all(|row| row.selected));

        // Narrowing the view does not disturb the wider selection
        session.set_differing_votes_only(true);
        assert!(session.is_all_selected());
        session.set_differing_votes_only(false);
        assert!(session.is_all_selected());
    }

    #[tokio::test]
    async fn test_export_uses_selection_intersect_visible() {
        let (mut session, _) = session_with(sample_items());
        session.load().await.unwrap();

        session.toggle_item("1");
        session.toggle_item("2");

        // "2" is selected but filtered out, so only "1" exports
        session.set_filter_text("road");
        let export_ids: Vec<String> = session
            .export_items()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(export_ids, vec!["1"]);
    }

    #[tokio::test]
    async fn test_export_generates_document() {
        let (mut session, _) = session_with(sample_items());
        session.load().await.unwrap();

        session.toggle_all();
        assert!(session.can_export());
        session.export().await.unwrap();

        let document = session.export_document().expect("document ready");
        assert!(document.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_export_without_selection_is_rejected() {
        let (mut session, _) = session_with(sample_items());
        session.load().await.unwrap();

        assert!(!session.can_export());
        let result = session.export().await;
        assert!(matches!(result, Err(ExportError::EmptySelection)));
        assert!(matches!(session.export_state(), ExportState::Idle));
    }

    #[tokio::test]
    async fn test_sort_does_not_disturb_selection_or_filter() {
        let (mut session, _) = session_with(sample_items());
        session.load().await.unwrap();

        session.toggle_item("2");
        session.toggle_sort(SortColumn::Title);
        session.toggle_sort(SortColumn::Title);

        assert!(session.view().is_selected("2"));
        assert_eq!(session.rows().len(), 3);
    }

    // ========================================================================
    // Full pipeline over a real listener
    // ========================================================================

    #[tokio::test]
    async fn test_end_to_end_fetch_filter_export() {
        use crate::api::{build_router, AppState};
        use crate::services::source::HttpAgendaSource;
        use std::io::Write;

        // Serve a real dataset file through the real router
        let mut data_file = tempfile::NamedTempFile::new().unwrap();
        let payload = serde_json::to_string(&sample_items()).unwrap();
        write!(data_file, "{payload}").unwrap();

        let state = AppState {
            data_path: Arc::new(data_file.path().to_path_buf()),
        };
        let app = build_router(state, "http://localhost:5173");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let source = HttpAgendaSource::new(format!("http://{addr}"));
        let mut session = AgendaSession::new(Box::new(source), "January 23, 2025");
        session.load().await.unwrap();
        assert_eq!(session.items().unwrap().len(), 3);

        session.set_differing_votes_only(true);
        session.toggle_all();
        session.export().await.unwrap();

        assert_eq!(session.export_items().len(), 1);
        assert!(session.export_document().unwrap().starts_with(b"%PDF"));
    }
}
