use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use engine_logging::{engine_debug, engine_info, engine_warn};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::gateway::{
    list_documents_or_empty, Gateway, GatewayError, GatewaySettings, ReqwestGateway,
};
use crate::renderer::{PageRenderer, SummaryRenderer, ViewerError};
use crate::viewer::DocumentViewer;
use crate::{DocumentName, EngineEvent, FailureKind, QuestionRequest, RequestId, UploadFile};

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

enum EngineCommand {
    ListDocuments,
    Upload {
        request_id: RequestId,
        files: Vec<UploadFile>,
    },
    Ask {
        request_id: RequestId,
        request: QuestionRequest,
    },
    LoadDocument {
        document: DocumentName,
    },
    RenderPage {
        document: DocumentName,
        page: u32,
    },
    CloseDocument,
}

/// Runs backend requests and the document viewer on a dedicated thread.
///
/// Results come back on the event channel given at construction. Dropping the
/// handle cancels in-flight thinking tickers and stops the worker thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    shutdown: CancellationToken,
}

struct Worker {
    gateway: Arc<dyn Gateway>,
    viewer: Mutex<DocumentViewer>,
    events: mpsc::Sender<EngineEvent>,
    shutdown: CancellationToken,
}

impl EngineHandle {
    pub fn spawn(
        settings: GatewaySettings,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Result<Self, EngineError> {
        engine_info!("backend at {}", settings.base_url);
        let gateway = Arc::new(ReqwestGateway::new(settings)?);
        Self::with_parts(gateway, Arc::new(SummaryRenderer), event_tx)
    }

    pub fn with_parts(
        gateway: Arc<dyn Gateway>,
        renderer: Arc<dyn PageRenderer>,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let shutdown = CancellationToken::new();
        let worker = Arc::new(Worker {
            gateway,
            viewer: Mutex::new(DocumentViewer::new(renderer)),
            events: event_tx,
            shutdown: shutdown.clone(),
        });

        thread::Builder::new()
            .name("pdfchat-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    worker.dispatch(&runtime, command);
                }
                engine_debug!("engine command channel closed");
            })?;

        Ok(Self { cmd_tx, shutdown })
    }

    pub fn list_documents(&self) {
        self.send(EngineCommand::ListDocuments);
    }

    pub fn upload(&self, request_id: RequestId, files: Vec<UploadFile>) {
        self.send(EngineCommand::Upload { request_id, files });
    }

    pub fn ask(&self, request_id: RequestId, request: QuestionRequest) {
        self.send(EngineCommand::Ask {
            request_id,
            request,
        });
    }

    pub fn load_document(&self, document: DocumentName) {
        self.send(EngineCommand::LoadDocument { document });
    }

    pub fn render_page(&self, document: DocumentName, page: u32) {
        self.send(EngineCommand::RenderPage { document, page });
    }

    pub fn close_document(&self) {
        self.send(EngineCommand::CloseDocument);
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_warn!("engine thread is gone; command dropped");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl Worker {
    /// Viewer commands run inline so they apply in the order they were sent.
    /// Network work is spawned onto the runtime.
    fn dispatch(self: &Arc<Self>, runtime: &tokio::runtime::Runtime, command: EngineCommand) {
        match command {
            EngineCommand::ListDocuments => {
                let worker = self.clone();
                runtime.spawn(async move { worker.list_documents().await });
            }
            EngineCommand::Upload { request_id, files } => {
                let worker = self.clone();
                runtime.spawn(async move { worker.upload(request_id, files).await });
            }
            EngineCommand::Ask {
                request_id,
                request,
            } => {
                let worker = self.clone();
                runtime.spawn(async move { worker.ask(request_id, request).await });
            }
            EngineCommand::LoadDocument { document } => {
                if let Some(locator) = self.open_document(&document) {
                    let worker = self.clone();
                    runtime.spawn(async move { worker.fetch_document(document, locator).await });
                }
            }
            EngineCommand::RenderPage { document, page } => self.render_page(document, page),
            EngineCommand::CloseDocument => {
                engine_debug!("closing viewer document");
                self.viewer().close();
            }
        }
    }

    fn viewer(&self) -> MutexGuard<'_, DocumentViewer> {
        self.viewer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: EngineEvent) {
        let _ = self.events.send(event);
    }

    async fn list_documents(&self) {
        let documents = list_documents_or_empty(self.gateway.as_ref()).await;
        engine_info!("listed {} document(s)", documents.len());
        self.emit(EngineEvent::DocumentsListed(documents));
    }

    async fn upload(&self, request_id: RequestId, files: Vec<UploadFile>) {
        engine_info!("upload #{} of {} file(s)", request_id, files.len());
        let ticker = self.start_ticker(request_id);
        let result = self.gateway.upload_documents(&files).await;
        ticker.stop().await;

        let result = match result {
            Ok(receipt) => {
                for status in &receipt.files {
                    engine_info!(
                        "uploaded {}: {} ({} chunks)",
                        status.filename,
                        status.status,
                        status
                            .chunks
                            .map_or_else(|| "?".to_string(), |chunks| chunks.to_string())
                    );
                }
                Ok(receipt)
            }
            Err(err) => {
                engine_warn!("upload #{} failed: {}", request_id, err);
                Err(err.kind())
            }
        };
        self.emit(EngineEvent::UploadFinished { request_id, result });
    }

    async fn ask(&self, request_id: RequestId, request: QuestionRequest) {
        let ticker = self.start_ticker(request_id);
        let started = Instant::now();
        let result = self.gateway.submit_question(&request).await;
        let elapsed = started.elapsed();
        ticker.stop().await;

        let result = result.map_err(|err| {
            engine_warn!("question #{} failed: {}", request_id, err);
            err.kind()
        });
        if let Ok(answer) = &result {
            engine_info!(
                "question #{} answered in {:?}, {} reference(s), tokens={:?}",
                request_id,
                elapsed,
                answer.references.len(),
                answer.used_tokens
            );
        }
        self.emit(EngineEvent::QuestionFinished {
            request_id,
            elapsed,
            result,
        });
    }

    /// Points the viewer at the document. Returns the locator to fetch when
    /// the viewer needs the bytes.
    fn open_document(&self, document: &DocumentName) -> Option<url::Url> {
        let locator = match self.gateway.document_locator(document) {
            Ok(locator) => locator,
            Err(err) => {
                engine_warn!("no locator for {:?}: {}", document, err);
                self.emit(EngineEvent::DocumentFailed {
                    document: document.clone(),
                    kind: err.kind(),
                });
                return None;
            }
        };

        let events = self.events.clone();
        let name = document.clone();
        let on_page_count = move |total_pages: u32| {
            let _ = events.send(EngineEvent::PageCount {
                document: name,
                total_pages,
            });
        };
        self.viewer()
            .open(document.clone(), locator.clone(), on_page_count)
            .then_some(locator)
    }

    async fn fetch_document(&self, document: DocumentName, locator: url::Url) {
        engine_debug!("fetching {}", locator);
        let bytes = match self.gateway.fetch_bytes(&locator).await {
            Ok(bytes) => bytes,
            Err(err) => {
                engine_warn!("failed to fetch {:?}: {}", document, err);
                self.viewer().fail_load(&locator);
                self.emit(EngineEvent::DocumentFailed {
                    document,
                    kind: err.kind(),
                });
                return;
            }
        };

        let loaded = self.viewer().finish_load(&locator, &bytes);
        match loaded {
            Ok(total_pages) => {
                engine_info!("loaded {:?}: {} page(s)", document, total_pages);
            }
            Err(ViewerError::NotLoaded) => {}
            Err(err) => {
                engine_warn!("cannot display {:?}: {}", document, err);
                self.emit(EngineEvent::DocumentFailed {
                    document,
                    kind: FailureKind::InvalidDocument,
                });
            }
        }
    }

    fn render_page(&self, document: DocumentName, page: u32) {
        let showing = match self.gateway.document_locator(&document) {
            Ok(locator) => self.viewer().locator() == Some(&locator),
            Err(_) => false,
        };
        if !showing {
            engine_debug!("render of {:?} ignored; not in the viewer", document);
            return;
        }
        let rendered = self.viewer().render(page);
        match rendered {
            Ok(page) => self.emit(EngineEvent::PageRendered { document, page }),
            Err(err) => engine_warn!("cannot render page {} of {:?}: {}", page, document, err),
        }
    }

    fn start_ticker(&self, request_id: RequestId) -> Ticker {
        let token = self.shutdown.child_token();
        let events = self.events.clone();
        let cancel = token.clone();
        let task = tokio::spawn(async move {
            let mut interval =
                tokio::time::interval_at(tokio::time::Instant::now() + TICK_PERIOD, TICK_PERIOD);
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        if events.send(EngineEvent::ThinkingTick { request_id }).is_err() {
                            break;
                        }
                    }
                }
            }
        });
        Ticker { token, task }
    }
}

/// One-second heartbeat for a pending request.
struct Ticker {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl Ticker {
    /// Stops the heartbeat. No tick is emitted after this returns.
    async fn stop(self) {
        self.token.cancel();
        let _ = self.task.await;
    }
}
