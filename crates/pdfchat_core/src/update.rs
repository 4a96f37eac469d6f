use engine_logging::{engine_debug, engine_info};

use crate::{
    filter_pdfs, AppState, Effect, LoadStatus, Message, Msg, RequestId, RequestPhase,
    ResponseTime, QUERY_ERROR_TEXT, UPLOAD_ERROR_TEXT,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started | Msg::RefreshRequested => {
            // Refreshes are not deduplicated; each request runs on its own.
            state.begin_listing();
            state.mark_dirty();
            vec![Effect::ListDocuments]
        }
        Msg::QuestionChanged(text) => {
            // The input is disabled while a request is pending.
            if state.is_loading() || state.question_input == text {
                return (state, Vec::new());
            }
            state.question_input = text;
            state.mark_dirty();
            Vec::new()
        }
        Msg::QuestionSubmitted => {
            if state.is_loading() || state.question_input.trim().is_empty() {
                return (state, Vec::new());
            }
            let question = std::mem::take(&mut state.question_input);
            let request_id = state.allocate_request_id();
            state.transcript.append(Message::user(question.clone()));
            state.references.clear();
            state.used_tokens = None;
            state.question = RequestPhase::Pending(request_id);
            state.start_thinking(request_id);
            state.mark_dirty();
            engine_debug!(
                "question #{} submitted, document={:?} page={}",
                request_id,
                state.cursor.selected(),
                state.cursor.page()
            );
            vec![Effect::SubmitQuestion {
                request_id,
                question,
                document: state.cursor.selected().cloned(),
                page: state.cursor.page(),
            }]
        }
        Msg::QuestionAnswered {
            request_id,
            answer,
            references,
            used_tokens,
            elapsed,
        } => {
            let response_time = ResponseTime::from_elapsed(elapsed);
            engine_info!("question #{} answered in {}", request_id, response_time);
            state
                .transcript
                .append(Message::bot(answer).with_response_time(response_time));
            state.references = references;
            state.used_tokens = used_tokens;
            settle(&mut state.question, request_id);
            state.stop_thinking(request_id);
            state.mark_dirty();
            Vec::new()
        }
        Msg::QuestionFailed { request_id } => {
            state.transcript.append(Message::bot(QUERY_ERROR_TEXT));
            state.references.clear();
            state.used_tokens = None;
            settle(&mut state.question, request_id);
            state.stop_thinking(request_id);
            state.mark_dirty();
            Vec::new()
        }
        Msg::FilesPicked(files) | Msg::FilesDropped(files) => {
            let offered = files.len();
            state.staged = filter_pdfs(files);
            if state.staged.len() != offered {
                engine_debug!(
                    "ignored {} non-PDF file(s)",
                    offered - state.staged.len()
                );
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::StagedFilesCleared => {
            if state.staged.is_empty() {
                return (state, Vec::new());
            }
            state.staged.clear();
            state.mark_dirty();
            Vec::new()
        }
        Msg::UploadClicked => {
            if state.is_loading() || state.staged.is_empty() {
                return (state, Vec::new());
            }
            let request_id = state.allocate_request_id();
            state.upload = RequestPhase::Pending(request_id);
            state.start_thinking(request_id);
            state.mark_dirty();
            vec![Effect::UploadDocuments {
                request_id,
                files: state.staged.clone(),
            }]
        }
        Msg::UploadSucceeded {
            request_id,
            message,
        } => {
            state.transcript.append(Message::bot(message));
            state.staged.clear();
            settle(&mut state.upload, request_id);
            state.stop_thinking(request_id);
            state.begin_listing();
            state.mark_dirty();
            vec![Effect::ListDocuments]
        }
        Msg::UploadFailed { request_id } => {
            state.transcript.append(Message::bot(UPLOAD_ERROR_TEXT));
            settle(&mut state.upload, request_id);
            state.stop_thinking(request_id);
            state.mark_dirty();
            Vec::new()
        }
        Msg::DocumentsListed(documents) => {
            state.finish_listing();
            let selection_gone = state
                .cursor
                .selected()
                .is_some_and(|selected| !documents.contains(selected));
            state.documents = documents;
            state.mark_dirty();
            if selection_gone {
                engine_info!(
                    "selected document {:?} is no longer listed",
                    state.cursor.selected()
                );
                state.cursor.clear();
                vec![Effect::CloseDocument]
            } else {
                Vec::new()
            }
        }
        Msg::DocumentSelected(document) => {
            if !state.documents.contains(&document) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            if state.cursor.is_selected(&document) {
                // Same locator: the viewer keeps its document, only the page rewinds.
                state.cursor.rewind();
                render_current_page(&state)
            } else {
                state.cursor.select(document.clone());
                vec![Effect::LoadDocument { document }]
            }
        }
        Msg::DocumentLoaded {
            document,
            total_pages,
        } => {
            if !state.cursor.is_selected(&document) {
                return (state, Vec::new());
            }
            state.cursor.set_total_pages(total_pages);
            state.mark_dirty();
            render_current_page(&state)
        }
        Msg::DocumentLoadFailed { document } => {
            if !state.cursor.is_selected(&document) {
                return (state, Vec::new());
            }
            state.cursor.mark_failed();
            state.mark_dirty();
            Vec::new()
        }
        Msg::PageRendered { document, preview } => {
            if !state.cursor.is_selected(&document) || preview.page != state.cursor.page() {
                return (state, Vec::new());
            }
            state.cursor.set_preview(preview);
            state.mark_dirty();
            Vec::new()
        }
        Msg::PrevPage => {
            if !state.cursor.prev() {
                return (state, Vec::new());
            }
            state.mark_dirty();
            render_current_page(&state)
        }
        Msg::NextPage => {
            if !state.cursor.next() {
                return (state, Vec::new());
            }
            state.mark_dirty();
            render_current_page(&state)
        }
        Msg::UploadPanelToggled => {
            state.upload_panel_open = !state.upload_panel_open;
            state.mark_dirty();
            Vec::new()
        }
        Msg::ThinkingTick { request_id } => {
            if let Some(thinking) = state.thinking.as_mut() {
                if thinking.request_id == request_id {
                    thinking.seconds += 1;
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::NoticeDismissed => {
            if state.notice_visible {
                state.notice_visible = false;
                state.mark_dirty();
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn settle(phase: &mut RequestPhase, request_id: RequestId) {
    if *phase == RequestPhase::Pending(request_id) {
        *phase = RequestPhase::Settled;
    }
}

fn render_current_page(state: &AppState) -> Vec<Effect> {
    match state.cursor.selected() {
        Some(document) if state.cursor.status() == LoadStatus::Loaded => {
            vec![Effect::RenderPage {
                document: document.clone(),
                page: state.cursor.page(),
            }]
        }
        _ => Vec::new(),
    }
}
