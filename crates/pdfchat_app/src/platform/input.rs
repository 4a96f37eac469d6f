//! Keyboard and paste handling.
//!
//! Maps terminal input onto core messages. Focus, the path prompt and the
//! transcript scroll offset are presentation state and live here, not in core.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pdfchat_core::{AppViewModel, Msg, StagedFile};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Documents,
    Viewer,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Input => Focus::Documents,
            Focus::Documents => Focus::Viewer,
            Focus::Viewer => Focus::Input,
        }
    }
}

#[derive(Debug, Default)]
pub struct UiState {
    pub focus: Focus,
    /// Text typed into the "add path" prompt while it is open.
    pub path_prompt: Option<String>,
    /// Transcript lines scrolled up from the bottom.
    pub scroll_back: u16,
}

#[derive(Debug, PartialEq)]
pub enum Action {
    Send(Msg),
    Redraw,
    Quit,
    Ignore,
}

pub fn handle_key(ui: &mut UiState, view: &AppViewModel, key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if view.notice_visible {
        return Action::Send(Msg::NoticeDismissed);
    }
    if ui.path_prompt.is_some() {
        return handle_prompt_key(ui, key);
    }

    match key.code {
        KeyCode::Esc => return Action::Quit,
        KeyCode::Char('u') if ctrl => return Action::Send(Msg::UploadPanelToggled),
        KeyCode::Char('r') if ctrl => return Action::Send(Msg::RefreshRequested),
        KeyCode::Tab => {
            ui.focus = ui.focus.next();
            return Action::Redraw;
        }
        KeyCode::PageUp => {
            ui.scroll_back = ui.scroll_back.saturating_add(5);
            return Action::Redraw;
        }
        KeyCode::PageDown => {
            ui.scroll_back = ui.scroll_back.saturating_sub(5);
            return Action::Redraw;
        }
        _ => {}
    }

    if view.upload_panel.is_some() {
        return match key.code {
            KeyCode::Char('a') => {
                ui.path_prompt = Some(String::new());
                Action::Redraw
            }
            KeyCode::Char('c') => Action::Send(Msg::StagedFilesCleared),
            KeyCode::Char('u') => Action::Send(Msg::UploadClicked),
            _ => Action::Ignore,
        };
    }

    match ui.focus {
        Focus::Input => handle_input_key(ui, view, key),
        Focus::Documents => match key.code {
            KeyCode::Up => select_neighbour(view, -1),
            KeyCode::Down => select_neighbour(view, 1),
            _ => Action::Ignore,
        },
        Focus::Viewer => match key.code {
            KeyCode::Left => Action::Send(Msg::PrevPage),
            KeyCode::Right => Action::Send(Msg::NextPage),
            _ => Action::Ignore,
        },
    }
}

/// A paste into the open upload drawer is a drop of file paths; anywhere
/// else it is typed into the question.
pub fn handle_paste(ui: &mut UiState, view: &AppViewModel, text: &str) -> Action {
    if view.notice_visible {
        return Action::Send(Msg::NoticeDismissed);
    }
    if let Some(prompt) = ui.path_prompt.as_mut() {
        prompt.push_str(text.trim_end_matches(['\r', '\n']));
        return Action::Redraw;
    }
    if view.upload_panel.is_some() {
        let files = parse_paths(text)
            .into_iter()
            .map(StagedFile::from_path)
            .collect();
        return Action::Send(Msg::FilesDropped(files));
    }
    if ui.focus == Focus::Input && view.input_enabled {
        let mut question = view.question_input.clone();
        question.push_str(&text.replace(['\r', '\n'], " "));
        return Action::Send(Msg::QuestionChanged(question));
    }
    Action::Ignore
}

fn handle_prompt_key(ui: &mut UiState, key: KeyEvent) -> Action {
    let Some(prompt) = ui.path_prompt.as_mut() else {
        return Action::Ignore;
    };
    match key.code {
        KeyCode::Esc => {
            ui.path_prompt = None;
            Action::Redraw
        }
        KeyCode::Enter => {
            let text = std::mem::take(prompt);
            ui.path_prompt = None;
            let files = parse_paths(&text)
                .into_iter()
                .map(StagedFile::from_path)
                .collect();
            Action::Send(Msg::FilesPicked(files))
        }
        KeyCode::Backspace => {
            prompt.pop();
            Action::Redraw
        }
        KeyCode::Char(ch) => {
            prompt.push(ch);
            Action::Redraw
        }
        _ => Action::Ignore,
    }
}

fn handle_input_key(ui: &mut UiState, view: &AppViewModel, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => {
            ui.scroll_back = 0;
            Action::Send(Msg::QuestionSubmitted)
        }
        KeyCode::Backspace if view.input_enabled => {
            let mut question = view.question_input.clone();
            if question.pop().is_none() {
                return Action::Ignore;
            }
            Action::Send(Msg::QuestionChanged(question))
        }
        KeyCode::Char(ch)
            if view.input_enabled
                && !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            let mut question = view.question_input.clone();
            question.push(ch);
            Action::Send(Msg::QuestionChanged(question))
        }
        _ => Action::Ignore,
    }
}

fn select_neighbour(view: &AppViewModel, step: isize) -> Action {
    if view.documents.is_empty() {
        return Action::Ignore;
    }
    let last = view.documents.len() - 1;
    let target = match view.documents.iter().position(|tab| tab.selected) {
        Some(index) => index.saturating_add_signed(step).min(last),
        None if step < 0 => last,
        None => 0,
    };
    Action::Send(Msg::DocumentSelected(view.documents[target].name.clone()))
}

/// Splits pasted or typed text into file paths.
///
/// Accepts one path per line or several whitespace-separated paths. Quotes,
/// backslash-escaped spaces and `file://` prefixes are understood, which
/// covers what common terminals insert when a file is dropped on them.
pub fn parse_paths(text: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => quote = Some(ch),
            (None, '\\') => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            (None, c) if c.is_whitespace() => push_path(&mut paths, &mut current),
            (None, c) => current.push(c),
        }
    }
    push_path(&mut paths, &mut current);
    paths
}

fn push_path(paths: &mut Vec<PathBuf>, current: &mut String) {
    if current.is_empty() {
        return;
    }
    let raw = std::mem::take(current);
    paths.push(file_uri_path(&raw).unwrap_or_else(|| PathBuf::from(raw)));
}

fn file_uri_path(raw: &str) -> Option<PathBuf> {
    if !raw.starts_with("file://") {
        return None;
    }
    Url::parse(raw).ok()?.to_file_path().ok()
}
