use std::path::PathBuf;

use pdfchat_core::{update, AppState, Effect, Message, Msg, StagedFile, UPLOAD_ERROR_TEXT};
use pretty_assertions::assert_eq;

fn staged(name: &str, media_type: &str) -> StagedFile {
    StagedFile {
        name: name.to_string(),
        path: PathBuf::from(format!("/tmp/{name}")),
        media_type: media_type.to_string(),
    }
}

fn upload_request_id(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::UploadDocuments { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("upload effect")
}

#[test]
fn drop_stages_only_pdfs() {
    let (state, effects) = update(
        AppState::new(),
        Msg::FilesDropped(vec![
            staged("a.pdf", "application/pdf"),
            staged("b.txt", "text/plain"),
        ]),
    );
    assert!(effects.is_empty());
    assert_eq!(state.staged_files(), &[staged("a.pdf", "application/pdf")]);
}

#[test]
fn new_drop_replaces_staged_set() {
    let (state, _) = update(
        AppState::new(),
        Msg::FilesPicked(vec![staged("a.pdf", "application/pdf")]),
    );
    let (state, _) = update(
        state,
        Msg::FilesDropped(vec![staged("c.pdf", "application/pdf")]),
    );
    let names: Vec<_> = state.staged_files().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["c.pdf"]);
}

#[test]
fn successful_upload_reports_clears_and_refreshes() {
    let files = vec![
        staged("a.pdf", "application/pdf"),
        staged("b.pdf", "application/pdf"),
        staged("c.pdf", "application/pdf"),
    ];
    let (state, _) = update(AppState::new(), Msg::FilesPicked(files.clone()));
    let (state, effects) = update(state, Msg::UploadClicked);
    let request_id = upload_request_id(&effects);
    assert_eq!(effects, vec![Effect::UploadDocuments { request_id, files }]);
    assert!(state.is_loading());
    assert!(state.thinking().is_some());

    let (state, effects) = update(
        state,
        Msg::UploadSucceeded {
            request_id,
            message: "3 files uploaded".to_string(),
        },
    );
    assert_eq!(effects, vec![Effect::ListDocuments]);
    assert_eq!(
        state.transcript().last(),
        Some(&Message::bot("3 files uploaded"))
    );
    assert!(state.staged_files().is_empty());
    assert!(!state.is_loading());
    assert!(state.listing_phase().is_pending());
}

#[test]
fn failed_upload_keeps_staged_files() {
    let (state, _) = update(
        AppState::new(),
        Msg::FilesPicked(vec![staged("a.pdf", "application/pdf")]),
    );
    let (state, effects) = update(state, Msg::UploadClicked);
    let request_id = upload_request_id(&effects);

    let (state, effects) = update(state, Msg::UploadFailed { request_id });
    assert!(effects.is_empty());
    assert_eq!(
        state.transcript().last(),
        Some(&Message::bot(UPLOAD_ERROR_TEXT))
    );
    assert_eq!(state.staged_files().len(), 1);
    assert!(!state.is_loading());
}

#[test]
fn upload_without_staged_files_is_ignored() {
    let (state, effects) = update(AppState::new(), Msg::UploadClicked);
    assert!(effects.is_empty());
    assert!(!state.is_loading());
}

#[test]
fn loading_flag_is_shared_between_question_and_upload() {
    let (state, _) = update(
        AppState::new(),
        Msg::FilesPicked(vec![staged("a.pdf", "application/pdf")]),
    );
    let (state, _) = update(state, Msg::UploadClicked);

    let (state, _) = update(state, Msg::QuestionChanged("hello?".to_string()));
    let (state, effects) = update(state, Msg::QuestionSubmitted);
    assert!(effects.is_empty());

    let (state, _) = update(state, Msg::UploadPanelToggled);
    let panel = state.view().upload_panel.expect("panel open");
    assert!(!panel.upload_enabled);
    assert!(panel.uploading);
    let (_state, effects) = update(state, Msg::UploadClicked);
    assert!(effects.is_empty());
}

#[test]
fn clearing_selection_empties_staged_set() {
    let (state, _) = update(
        AppState::new(),
        Msg::FilesPicked(vec![staged("a.pdf", "application/pdf")]),
    );
    let (state, _) = update(state, Msg::UploadPanelToggled);
    let (state, _) = update(state, Msg::StagedFilesCleared);
    assert!(state.staged_files().is_empty());
    let panel = state.view().upload_panel.expect("panel open");
    assert!(panel.staged.is_empty());
    assert!(!panel.upload_enabled);
}
