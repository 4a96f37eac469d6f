//! PDF chat engine: backend gateway, document viewer and effect execution.
mod engine;
mod gateway;
mod renderer;
mod types;
mod viewer;

pub use engine::{EngineError, EngineHandle};
pub use gateway::{
    list_documents_or_empty, Gateway, GatewayError, GatewaySettings, ReqwestGateway,
    DEFAULT_BACKEND_URL, NO_ANSWER_TEXT, UPLOAD_FALLBACK_MESSAGE,
};
pub use renderer::{LoadedDocument, PageRenderer, SummaryRenderer, ViewerError, DISPLAY_WIDTH};
pub use types::{
    DocumentName, EngineEvent, FailureKind, FileStatus, QuestionAnswer, QuestionRequest,
    RenderedPage, RequestId, UploadFile, UploadReceipt,
};
pub use viewer::{DocumentViewer, LOAD_FAILED_TEXT};
