use std::io;
use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use engine_logging::{engine_debug, engine_warn};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::{
    DocumentName, FailureKind, FileStatus, QuestionAnswer, QuestionRequest, UploadFile,
    UploadReceipt,
};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const UPLOAD_FALLBACK_MESSAGE: &str = "Files uploaded successfully.";
pub const NO_ANSWER_TEXT: &str = "No answer found.";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GatewayError {
    pub fn kind(&self) -> FailureKind {
        match self {
            GatewayError::InvalidUrl(_) => FailureKind::InvalidUrl,
            GatewayError::Network(_) => FailureKind::Network,
            GatewayError::MalformedResponse(_) => FailureKind::MalformedResponse,
            GatewayError::HttpStatus(code) => FailureKind::HttpStatus(*code),
            GatewayError::Io { .. } => FailureKind::Io,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl GatewaySettings {
    pub fn with_base_url(base_url: &str) -> Result<Self, GatewayError> {
        let base_url =
            Url::parse(base_url).map_err(|err| GatewayError::InvalidUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url,
            ..Self::default()
        })
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend url is valid"),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("pdfchat/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// The backend HTTP service: document storage, listing and question answering.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    async fn list_documents(&self) -> Result<Vec<DocumentName>, GatewayError>;

    async fn upload_documents(&self, files: &[UploadFile]) -> Result<UploadReceipt, GatewayError>;

    async fn submit_question(
        &self,
        request: &QuestionRequest,
    ) -> Result<QuestionAnswer, GatewayError>;

    /// Where the viewer can fetch the document's bytes.
    fn document_locator(&self, document: &str) -> Result<Url, GatewayError>;

    async fn fetch_bytes(&self, locator: &Url) -> Result<Bytes, GatewayError>;
}

/// Lists documents, substituting an empty list for any failure.
pub async fn list_documents_or_empty(gateway: &dyn Gateway) -> Vec<DocumentName> {
    match gateway.list_documents().await {
        Ok(documents) => documents,
        Err(err) => {
            engine_warn!("Failed to fetch PDF list: {}", err);
            Vec::new()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    pdfs: Option<Vec<DocumentName>>,
}

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    question: &'a str,
    pdf_name: Option<&'a str>,
    page_number: u32,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    pdf_references: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    used_tokens: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    files_status: Option<Vec<FileStatus>>,
}

#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    settings: GatewaySettings,
    client: reqwest::Client,
}

impl ReqwestGateway {
    pub fn new(settings: GatewaySettings) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self { settings, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.settings.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::InvalidUrl(self.settings.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Reads the whole body and decodes it as JSON. The status code is not
    /// inspected: error bodies decode into the same optional fields.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        let body = response.bytes().await?;
        engine_debug!("backend replied {} with {} bytes", status, body.len());
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait::async_trait]
impl Gateway for ReqwestGateway {
    async fn list_documents(&self) -> Result<Vec<DocumentName>, GatewayError> {
        let url = self.endpoint(&["list_pdfs"])?;
        let response = self.client.get(url).send().await?;
        let body: ListResponse = Self::decode(response).await?;
        Ok(body.pdfs.unwrap_or_default())
    }

    async fn upload_documents(&self, files: &[UploadFile]) -> Result<UploadReceipt, GatewayError> {
        let url = self.endpoint(&["upload"])?;
        let mut form = Form::new();
        for file in files {
            let content = tokio::fs::read(&file.path)
                .await
                .map_err(|source| GatewayError::Io {
                    path: file.path.clone(),
                    source,
                })?;
            let part = Part::bytes(content)
                .file_name(file.name.clone())
                .mime_str(&file.media_type)?;
            form = form.part("files", part);
        }

        let response = self.client.post(url).multipart(form).send().await?;
        let body: UploadResponse = Self::decode(response).await?;
        Ok(UploadReceipt {
            message: body
                .message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| UPLOAD_FALLBACK_MESSAGE.to_string()),
            files: body.files_status.unwrap_or_default(),
        })
    }

    async fn submit_question(
        &self,
        request: &QuestionRequest,
    ) -> Result<QuestionAnswer, GatewayError> {
        let url = self.endpoint(&["query"])?;
        let body = QueryBody {
            question: &request.question,
            pdf_name: request.document.as_deref(),
            page_number: request.page,
        };
        let response = self.client.post(url).json(&body).send().await?;
        let body: QueryResponse = Self::decode(response).await?;
        if let Some(error) = &body.error {
            engine_warn!("backend reported a query error: {}", error);
        }
        Ok(QuestionAnswer {
            answer: body
                .answer
                .filter(|answer| !answer.is_empty())
                .unwrap_or_else(|| NO_ANSWER_TEXT.to_string()),
            references: body.pdf_references.unwrap_or_default(),
            used_tokens: body.used_tokens,
        })
    }

    fn document_locator(&self, document: &str) -> Result<Url, GatewayError> {
        self.endpoint(&["pdf", document])
    }

    async fn fetch_bytes(&self, locator: &Url) -> Result<Bytes, GatewayError> {
        let response = self.client.get(locator.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::HttpStatus(status.as_u16()));
        }
        Ok(response.bytes().await?)
    }
}
