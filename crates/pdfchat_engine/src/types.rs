use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Name of a PDF stored on the backend.
pub type DocumentName = String;
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Result of a list refresh. Failures arrive as an empty list.
    DocumentsListed(Vec<DocumentName>),
    QuestionFinished {
        request_id: RequestId,
        elapsed: Duration,
        result: Result<QuestionAnswer, FailureKind>,
    },
    UploadFinished {
        request_id: RequestId,
        result: Result<UploadReceipt, FailureKind>,
    },
    /// Fired once per document load by the viewer.
    PageCount {
        document: DocumentName,
        total_pages: u32,
    },
    DocumentFailed {
        document: DocumentName,
        kind: FailureKind,
    },
    PageRendered {
        document: DocumentName,
        page: RenderedPage,
    },
    /// One-second heartbeat while a question or upload is in flight.
    ThinkingTick { request_id: RequestId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRequest {
    pub question: String,
    pub document: Option<DocumentName>,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionAnswer {
    pub answer: String,
    pub references: Vec<serde_json::Value>,
    pub used_tokens: Option<u64>,
}

/// A local file to send in an upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub path: PathBuf,
    pub media_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub message: String,
    pub files: Vec<FileStatus>,
}

/// Per-file outcome reported by the backend after an upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileStatus {
    pub filename: String,
    pub status: String,
    #[serde(default)]
    pub chunks: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub page: u32,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    MalformedResponse,
    HttpStatus(u16),
    InvalidUrl,
    Io,
    InvalidDocument,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network error"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::InvalidDocument => write!(f, "invalid document"),
        }
    }
}
