use crate::{DocumentName, RequestId, StagedFile};

/// Work the app must perform on behalf of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ListDocuments,
    UploadDocuments {
        request_id: RequestId,
        files: Vec<StagedFile>,
    },
    SubmitQuestion {
        request_id: RequestId,
        question: String,
        document: Option<DocumentName>,
        page: u32,
    },
    /// Open the document in the viewer; the page count comes back once.
    LoadDocument { document: DocumentName },
    RenderPage { document: DocumentName, page: u32 },
    /// Drop the viewer's document so a later selection loads it afresh.
    CloseDocument,
}
