use crate::view_model::{self, AppViewModel};
use crate::{StagedFile, Transcript, ViewerCursor};

/// Name of a PDF stored on the backend.
pub type DocumentName = String;

/// Correlates a pending request with its results and timer ticks.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
    #[default]
    Idle,
    Pending(RequestId),
    Settled,
}

impl RequestPhase {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestPhase::Pending(_))
    }
}

/// The transient "bot is thinking" overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thinking {
    pub request_id: RequestId,
    pub seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub(crate) question_input: String,
    pub(crate) question: RequestPhase,
    pub(crate) upload: RequestPhase,
    pub(crate) listing: RequestPhase,
    pub(crate) listings_in_flight: u32,
    pub(crate) thinking: Option<Thinking>,
    pub(crate) next_request_id: RequestId,
    pub(crate) transcript: Transcript,
    pub(crate) documents: Vec<crate::DocumentName>,
    pub(crate) cursor: ViewerCursor,
    pub(crate) staged: Vec<StagedFile>,
    pub(crate) references: Vec<serde_json::Value>,
    pub(crate) used_tokens: Option<u64>,
    pub(crate) upload_panel_open: bool,
    pub(crate) notice_visible: bool,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            question_input: String::new(),
            question: RequestPhase::Idle,
            upload: RequestPhase::Idle,
            listing: RequestPhase::Idle,
            listings_in_flight: 0,
            thinking: None,
            next_request_id: 1,
            transcript: Transcript::with_welcome(),
            documents: Vec::new(),
            cursor: ViewerCursor::default(),
            staged: Vec::new(),
            references: Vec::new(),
            used_tokens: None,
            upload_panel_open: false,
            notice_visible: true,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        view_model::build(self)
    }

    /// The shared loading flag: true while a question or an upload is pending.
    pub fn is_loading(&self) -> bool {
        self.question.is_pending() || self.upload.is_pending()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn cursor(&self) -> &ViewerCursor {
        &self.cursor
    }

    pub fn documents(&self) -> &[crate::DocumentName] {
        &self.documents
    }

    pub fn staged_files(&self) -> &[StagedFile] {
        &self.staged
    }

    pub fn references(&self) -> &[serde_json::Value] {
        &self.references
    }

    pub fn question_input(&self) -> &str {
        &self.question_input
    }

    pub fn thinking(&self) -> Option<Thinking> {
        self.thinking
    }

    pub fn question_phase(&self) -> RequestPhase {
        self.question
    }

    pub fn upload_phase(&self) -> RequestPhase {
        self.upload
    }

    pub fn listing_phase(&self) -> RequestPhase {
        self.listing
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn begin_listing(&mut self) {
        let request_id = self.allocate_request_id();
        self.listing = RequestPhase::Pending(request_id);
        self.listings_in_flight += 1;
    }

    /// List results carry no id; the phase settles once every request is back.
    pub(crate) fn finish_listing(&mut self) {
        self.listings_in_flight = self.listings_in_flight.saturating_sub(1);
        if self.listings_in_flight == 0 {
            self.listing = RequestPhase::Settled;
        }
    }

    pub(crate) fn allocate_request_id(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub(crate) fn start_thinking(&mut self, request_id: RequestId) {
        self.thinking = Some(Thinking {
            request_id,
            seconds: 0,
        });
    }

    pub(crate) fn stop_thinking(&mut self, request_id: RequestId) {
        if self.thinking.is_some_and(|t| t.request_id == request_id) {
            self.thinking = None;
        }
    }
}
