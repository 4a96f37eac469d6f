use pdfchat_core::{update, AppState, Effect, LoadStatus, Msg, PagePreview, RequestPhase};
use pretty_assertions::assert_eq;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn listed(state: AppState, list: &[&str]) -> AppState {
    update(state, Msg::DocumentsListed(names(list))).0
}

fn open(state: AppState, document: &str, total_pages: u32) -> AppState {
    let (state, _) = update(state, Msg::DocumentSelected(document.to_string()));
    let (state, _) = update(
        state,
        Msg::DocumentLoaded {
            document: document.to_string(),
            total_pages,
        },
    );
    state
}

#[test]
fn startup_requests_document_list() {
    let (state, effects) = update(AppState::new(), Msg::Started);
    assert_eq!(effects, vec![Effect::ListDocuments]);
    assert!(state.listing_phase().is_pending());
    assert!(state.view().refreshing);

    let state = listed(state, &["a.pdf", "b.pdf"]);
    assert_eq!(state.listing_phase(), RequestPhase::Settled);
    assert_eq!(state.documents(), names(&["a.pdf", "b.pdf"]).as_slice());
}

#[test]
fn refreshes_are_not_deduplicated() {
    let (state, first) = update(AppState::new(), Msg::RefreshRequested);
    let (state, second) = update(state, Msg::RefreshRequested);
    assert_eq!(first, vec![Effect::ListDocuments]);
    assert_eq!(second, vec![Effect::ListDocuments]);

    // The first result back leaves the second refresh pending.
    let state = listed(state, &["a.pdf"]);
    assert!(state.listing_phase().is_pending());
    assert!(state.view().refreshing);

    let state = listed(state, &["a.pdf", "b.pdf"]);
    assert_eq!(state.listing_phase(), RequestPhase::Settled);
    assert!(!state.view().refreshing);
}

#[test]
fn selecting_unknown_document_is_ignored() {
    let state = listed(AppState::new(), &["a.pdf"]);
    let (mut state, effects) = update(state, Msg::DocumentSelected("ghost.pdf".to_string()));
    assert!(effects.is_empty());
    assert!(state.cursor().selected().is_none());
    assert!(state.consume_dirty());
    let (mut state, _) = update(state, Msg::DocumentSelected("ghost.pdf".to_string()));
    assert!(!state.consume_dirty());
}

#[test]
fn selecting_document_loads_it_and_renders_first_page() {
    let state = listed(AppState::new(), &["a.pdf"]);
    let (state, effects) = update(state, Msg::DocumentSelected("a.pdf".to_string()));
    assert_eq!(
        effects,
        vec![Effect::LoadDocument {
            document: "a.pdf".to_string()
        }]
    );
    let view = state.view().viewer.expect("viewer");
    assert_eq!(view.status, LoadStatus::Loading);
    assert_eq!(view.page_label(), "Page 1 of ?");
    assert!(!view.next_enabled);
    assert!(!view.prev_enabled);

    let (state, effects) = update(
        state,
        Msg::DocumentLoaded {
            document: "a.pdf".to_string(),
            total_pages: 4,
        },
    );
    assert_eq!(
        effects,
        vec![Effect::RenderPage {
            document: "a.pdf".to_string(),
            page: 1
        }]
    );
    let view = state.view().viewer.expect("viewer");
    assert_eq!(view.page_label(), "Page 1 of 4");
    assert!(view.next_enabled);
}

#[test]
fn page_navigation_clamps_and_requests_renders() {
    let state = open(listed(AppState::new(), &["a.pdf"]), "a.pdf", 2);

    let (state, effects) = update(state, Msg::PrevPage);
    assert!(effects.is_empty());
    assert_eq!(state.cursor().page(), 1);

    let (state, effects) = update(state, Msg::NextPage);
    assert_eq!(
        effects,
        vec![Effect::RenderPage {
            document: "a.pdf".to_string(),
            page: 2
        }]
    );
    let (state, effects) = update(state, Msg::NextPage);
    assert!(effects.is_empty());
    assert_eq!(state.cursor().page(), 2);

    let (state, _) = update(state, Msg::PrevPage);
    assert_eq!(state.cursor().page(), 1);
}

#[test]
fn next_is_noop_while_total_unknown() {
    let state = listed(AppState::new(), &["a.pdf"]);
    let (state, _) = update(state, Msg::DocumentSelected("a.pdf".to_string()));
    let (state, effects) = update(state, Msg::NextPage);
    assert!(effects.is_empty());
    assert_eq!(state.cursor().page(), 1);
}

#[test]
fn load_failure_keeps_total_unset_and_blocks_next() {
    let state = listed(AppState::new(), &["broken.pdf"]);
    let (state, _) = update(state, Msg::DocumentSelected("broken.pdf".to_string()));
    let (state, effects) = update(
        state,
        Msg::DocumentLoadFailed {
            document: "broken.pdf".to_string(),
        },
    );
    assert!(effects.is_empty());
    let view = state.view().viewer.expect("viewer");
    assert_eq!(view.status, LoadStatus::Failed);
    assert_eq!(view.total_pages, None);
    assert!(!view.next_enabled);
}

#[test]
fn refresh_without_selected_document_resets_cursor() {
    let state = open(listed(AppState::new(), &["a.pdf", "b.pdf"]), "a.pdf", 3);
    let (state, _) = update(state, Msg::NextPage);
    assert_eq!(state.cursor().page(), 2);

    let (state, effects) = update(state, Msg::DocumentsListed(names(&["b.pdf"])));
    assert_eq!(effects, vec![Effect::CloseDocument]);
    assert_eq!(state.cursor().selected(), None);
    assert_eq!(state.cursor().page(), 1);
    assert_eq!(state.cursor().total_pages(), None);
    assert!(state.view().viewer.is_none());
}

#[test]
fn refresh_keeping_selected_document_keeps_cursor() {
    let state = open(listed(AppState::new(), &["a.pdf"]), "a.pdf", 3);
    let (state, _) = update(state, Msg::NextPage);
    let (state, effects) = update(state, Msg::DocumentsListed(names(&["a.pdf", "c.pdf"])));
    assert!(effects.is_empty());
    assert_eq!(state.cursor().selected().map(String::as_str), Some("a.pdf"));
    assert_eq!(state.cursor().page(), 2);
    assert_eq!(state.cursor().total_pages(), Some(3));
}

#[test]
fn stale_viewer_results_are_ignored() {
    let state = listed(AppState::new(), &["a.pdf", "b.pdf"]);
    let (state, _) = update(state, Msg::DocumentSelected("a.pdf".to_string()));
    let (state, _) = update(state, Msg::DocumentSelected("b.pdf".to_string()));

    let (state, effects) = update(
        state,
        Msg::DocumentLoaded {
            document: "a.pdf".to_string(),
            total_pages: 9,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.cursor().total_pages(), None);

    let (state, _) = update(
        state,
        Msg::DocumentLoaded {
            document: "b.pdf".to_string(),
            total_pages: 2,
        },
    );
    let (state, _) = update(
        state,
        Msg::PageRendered {
            document: "b.pdf".to_string(),
            preview: PagePreview {
                page: 2,
                lines: vec!["wrong page".to_string()],
            },
        },
    );
    assert!(state.cursor().preview().is_none());

    let preview = PagePreview {
        page: 1,
        lines: vec!["b.pdf".to_string()],
    };
    let (state, _) = update(
        state,
        Msg::PageRendered {
            document: "b.pdf".to_string(),
            preview: preview.clone(),
        },
    );
    assert_eq!(state.cursor().preview(), Some(&preview));
}

#[test]
fn reselecting_same_document_rewinds_without_reloading() {
    let state = open(listed(AppState::new(), &["a.pdf"]), "a.pdf", 5);
    let (state, _) = update(state, Msg::NextPage);
    let (state, effects) = update(state, Msg::DocumentSelected("a.pdf".to_string()));
    assert_eq!(
        effects,
        vec![Effect::RenderPage {
            document: "a.pdf".to_string(),
            page: 1
        }]
    );
    assert_eq!(state.cursor().total_pages(), Some(5));
}
