//! PDF chat core: pure state machine and view-model helpers.
//!
//! Nothing in this crate performs IO. The app feeds [`Msg`]s into [`update`]
//! and executes the returned [`Effect`]s against the engine.
mod cursor;
mod effect;
mod msg;
mod staging;
mod state;
mod transcript;
mod update;
mod view_model;

pub use cursor::{LoadStatus, PagePreview, ViewerCursor};
pub use effect::Effect;
pub use msg::Msg;
pub use staging::{filter_pdfs, media_type_for_path, StagedFile, PDF_MEDIA_TYPE};
pub use state::{AppState, DocumentName, RequestId, RequestPhase, Thinking};
pub use transcript::{
    Message, ResponseTime, Sender, Transcript, QUERY_ERROR_TEXT, UPLOAD_ERROR_TEXT,
    WELCOME_TEXT,
};
pub use update::update;
pub use view_model::{
    thinking_phrase, AppViewModel, DocumentTab, ThinkingView, UploadPanelView, ViewerView,
    THINKING_PHRASES,
};
