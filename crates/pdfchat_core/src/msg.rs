use std::time::Duration;

use crate::{DocumentName, PagePreview, RequestId, StagedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// App finished starting; fetch the initial document list.
    Started,
    /// User edited the question input.
    QuestionChanged(String),
    /// User pressed Send.
    QuestionSubmitted,
    /// Backend answered a question.
    QuestionAnswered {
        request_id: RequestId,
        answer: String,
        references: Vec<serde_json::Value>,
        used_tokens: Option<u64>,
        elapsed: Duration,
    },
    /// The question request failed (network or malformed response).
    QuestionFailed { request_id: RequestId },
    /// User picked files through the file prompt.
    FilesPicked(Vec<StagedFile>),
    /// User dropped files onto the upload area.
    FilesDropped(Vec<StagedFile>),
    /// User clicked "Clear selection".
    StagedFilesCleared,
    /// User clicked Upload.
    UploadClicked,
    /// Backend accepted the upload; `message` is the text to show.
    UploadSucceeded { request_id: RequestId, message: String },
    UploadFailed { request_id: RequestId },
    /// User asked for a fresh document list.
    RefreshRequested,
    /// Document list arrived. Failures arrive here as an empty list.
    DocumentsListed(Vec<DocumentName>),
    /// User selected a document tab.
    DocumentSelected(DocumentName),
    /// Viewer reported the page count for a freshly loaded document.
    DocumentLoaded {
        document: DocumentName,
        total_pages: u32,
    },
    DocumentLoadFailed { document: DocumentName },
    /// Viewer finished rendering a page.
    PageRendered {
        document: DocumentName,
        preview: PagePreview,
    },
    PrevPage,
    NextPage,
    /// User opened or closed the upload drawer.
    UploadPanelToggled,
    /// One-second heartbeat of a pending request.
    ThinkingTick { request_id: RequestId },
    /// Startup notice was dismissed by timeout or key press.
    NoticeDismissed,
}
