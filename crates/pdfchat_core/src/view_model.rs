use crate::{AppState, DocumentName, LoadStatus, Message, PagePreview};

/// Phrases cycled by the thinking indicator, one every
/// `PHRASE_PERIOD_SECS` seconds.
pub const THINKING_PHRASES: &[&str] = &[
    "Thinking",
    "Cooking up an answer...",
    "Consulting the PDF oracles...",
    "Summoning knowledge...",
    "Crunching numbers (and maybe snacks)...",
    "Reading at the speed of light...",
    "Making sense of academic hieroglyphs...",
    "Decoding PDF runes...",
    "Trying not to hallucinate...",
    "Loading wisdom...",
    "Pretending to be a human...",
    "Googling (just kidding, I can't)",
    "Sharpening my digital pencil...",
    "Bribing the LLM for a good answer...",
    "Staring at the PDF until it blinks...",
];

const PHRASE_PERIOD_SECS: u64 = 7;

pub fn thinking_phrase(seconds: u64) -> &'static str {
    let index = (seconds / PHRASE_PERIOD_SECS) as usize % THINKING_PHRASES.len();
    THINKING_PHRASES[index]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThinkingView {
    pub seconds: u64,
    pub phrase: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTab {
    pub name: DocumentName,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerView {
    pub document: DocumentName,
    pub page: u32,
    pub total_pages: Option<u32>,
    pub status: LoadStatus,
    pub preview: Option<PagePreview>,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl ViewerView {
    /// "Page 2 of 10", or "Page 1 of ?" while the count is unknown.
    pub fn page_label(&self) -> String {
        match self.total_pages {
            Some(total) => format!("Page {} of {}", self.page, total),
            None => format!("Page {} of ?", self.page),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPanelView {
    pub staged: Vec<String>,
    pub upload_enabled: bool,
    pub uploading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub messages: Vec<Message>,
    pub thinking: Option<ThinkingView>,
    pub question_input: String,
    pub input_enabled: bool,
    pub send_enabled: bool,
    pub documents: Vec<DocumentTab>,
    pub refreshing: bool,
    pub viewer: Option<ViewerView>,
    pub references: Vec<String>,
    pub used_tokens: Option<u64>,
    pub upload_panel: Option<UploadPanelView>,
    pub notice_visible: bool,
}

pub(crate) fn build(state: &AppState) -> AppViewModel {
    let loading = state.is_loading();
    let cursor = &state.cursor;

    let documents = state
        .documents
        .iter()
        .map(|name| DocumentTab {
            name: name.clone(),
            selected: cursor.is_selected(name),
        })
        .collect();

    let viewer = cursor.selected().map(|document| ViewerView {
        document: document.clone(),
        page: cursor.page(),
        total_pages: cursor.total_pages(),
        status: cursor.status(),
        preview: cursor.preview().cloned(),
        prev_enabled: cursor.can_prev(),
        next_enabled: cursor.can_next(),
    });

    let upload_panel = state.upload_panel_open.then(|| UploadPanelView {
        staged: state.staged.iter().map(|f| f.name.clone()).collect(),
        upload_enabled: !loading && !state.staged.is_empty(),
        uploading: state.upload.is_pending(),
    });

    AppViewModel {
        messages: state.transcript.messages().to_vec(),
        thinking: state.thinking.map(|t| ThinkingView {
            seconds: t.seconds,
            phrase: thinking_phrase(t.seconds),
        }),
        question_input: state.question_input.clone(),
        input_enabled: !loading,
        send_enabled: !loading && !state.question_input.trim().is_empty(),
        documents,
        refreshing: state.listing.is_pending(),
        viewer,
        references: state.references.iter().map(format_reference).collect(),
        used_tokens: state.used_tokens,
        upload_panel,
        notice_visible: state.notice_visible,
    }
}

/// Compact single-line rendering of an opaque citation object.
fn format_reference(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Object(fields) => {
            let name = fields
                .get("pdf_name")
                .or_else(|| fields.get("pdf_id"))
                .and_then(|v| v.as_str());
            let page = fields.get("page").or_else(|| fields.get("page_number"));
            match (name, page) {
                (Some(name), Some(page)) => format!("{name} (p. {page})"),
                (Some(name), None) => name.to_string(),
                _ => value.to_string(),
            }
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_changes_every_seven_seconds() {
        assert_eq!(thinking_phrase(0), "Thinking");
        assert_eq!(thinking_phrase(6), "Thinking");
        assert_eq!(thinking_phrase(7), THINKING_PHRASES[1]);
        let wrap = PHRASE_PERIOD_SECS * THINKING_PHRASES.len() as u64;
        assert_eq!(thinking_phrase(wrap), "Thinking");
    }

    #[test]
    fn references_render_compactly() {
        let object = serde_json::json!({"pdf_name": "a.pdf", "page": 3});
        assert_eq!(format_reference(&object), "a.pdf (p. 3)");
        let plain = serde_json::json!("chapter 2");
        assert_eq!(format_reference(&plain), "chapter 2");
        let other = serde_json::json!({"score": 1});
        assert_eq!(format_reference(&other), r#"{"score":1}"#);
    }
}
