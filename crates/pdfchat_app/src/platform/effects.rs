use std::sync::mpsc;
use std::thread;

use engine_logging::{engine_debug, engine_info, engine_warn};
use pdfchat_core::{Effect, Msg, PagePreview, StagedFile};
use pdfchat_engine::{
    EngineError, EngineEvent, EngineHandle, GatewaySettings, QuestionRequest, UploadFile,
};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: GatewaySettings, msg_tx: mpsc::Sender<Msg>) -> Result<Self, EngineError> {
        let (event_tx, event_rx) = mpsc::channel();
        let engine = EngineHandle::spawn(settings, event_tx)?;
        spawn_event_loop(event_rx, msg_tx);
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ListDocuments => {
                    engine_debug!("ListDocuments");
                    self.engine.list_documents();
                }
                Effect::UploadDocuments { request_id, files } => {
                    engine_info!("UploadDocuments request_id={} files={}", request_id, files.len());
                    self.engine
                        .upload(request_id, files.into_iter().map(upload_file).collect());
                }
                Effect::SubmitQuestion {
                    request_id,
                    question,
                    document,
                    page,
                } => {
                    engine_info!(
                        "SubmitQuestion request_id={} question_len={} document={:?} page={}",
                        request_id,
                        question.len(),
                        document,
                        page
                    );
                    self.engine.ask(
                        request_id,
                        QuestionRequest {
                            question,
                            document,
                            page,
                        },
                    );
                }
                Effect::LoadDocument { document } => {
                    engine_debug!("LoadDocument {:?}", document);
                    self.engine.load_document(document);
                }
                Effect::RenderPage { document, page } => {
                    self.engine.render_page(document, page);
                }
                Effect::CloseDocument => {
                    self.engine.close_document();
                }
            }
        }
    }
}

fn spawn_event_loop(event_rx: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        for event in event_rx {
            if msg_tx.send(map_event(event)).is_err() {
                break;
            }
        }
    });
}

fn upload_file(file: StagedFile) -> UploadFile {
    UploadFile {
        name: file.name,
        path: file.path,
        media_type: file.media_type,
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::DocumentsListed(documents) => Msg::DocumentsListed(documents),
        EngineEvent::QuestionFinished {
            request_id,
            elapsed,
            result,
        } => match result {
            Ok(answer) => Msg::QuestionAnswered {
                request_id,
                answer: answer.answer,
                references: answer.references,
                used_tokens: answer.used_tokens,
                elapsed,
            },
            Err(kind) => {
                engine_warn!("Question {} failed: {}", request_id, kind);
                Msg::QuestionFailed { request_id }
            }
        },
        EngineEvent::UploadFinished { request_id, result } => match result {
            Ok(receipt) => Msg::UploadSucceeded {
                request_id,
                message: receipt.message,
            },
            Err(kind) => {
                engine_warn!("Upload {} failed: {}", request_id, kind);
                Msg::UploadFailed { request_id }
            }
        },
        EngineEvent::PageCount {
            document,
            total_pages,
        } => Msg::DocumentLoaded {
            document,
            total_pages,
        },
        EngineEvent::DocumentFailed { document, kind } => {
            engine_warn!("Document {:?} failed to load: {}", document, kind);
            Msg::DocumentLoadFailed { document }
        }
        EngineEvent::PageRendered { document, page } => Msg::PageRendered {
            document,
            preview: PagePreview {
                page: page.page,
                lines: page.lines,
            },
        },
        EngineEvent::ThinkingTick { request_id } => Msg::ThinkingTick { request_id },
    }
}
