use std::sync::Arc;

use engine_logging::{engine_debug, engine_warn};
use url::Url;

use crate::renderer::{LoadedDocument, PageRenderer, ViewerError, DISPLAY_WIDTH};
use crate::{DocumentName, RenderedPage};

/// Text shown in place of a page when the document could not be loaded.
pub const LOAD_FAILED_TEXT: &str = "Failed to load PDF";

type PageCountCallback = Box<dyn FnOnce(u32) + Send>;

enum Slot {
    Empty,
    Loading { callback: Option<PageCountCallback> },
    Loaded(LoadedDocument),
    Failed,
}

/// Shows one document at a time through a [`PageRenderer`].
///
/// The page-count callback given to [`DocumentViewer::open`] runs at most once,
/// when that locator's load succeeds. Opening a different locator re-arms it;
/// re-opening the current locator does not.
pub struct DocumentViewer {
    renderer: Arc<dyn PageRenderer>,
    width: usize,
    locator: Option<Url>,
    name: DocumentName,
    slot: Slot,
}

impl DocumentViewer {
    pub fn new(renderer: Arc<dyn PageRenderer>) -> Self {
        Self {
            renderer,
            width: DISPLAY_WIDTH,
            locator: None,
            name: DocumentName::new(),
            slot: Slot::Empty,
        }
    }

    pub fn locator(&self) -> Option<&Url> {
        self.locator.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.slot, Slot::Loaded(_))
    }

    pub fn page_count(&self) -> Option<u32> {
        match &self.slot {
            Slot::Loaded(document) => Some(document.page_count),
            _ => None,
        }
    }

    /// Points the viewer at `document`, served from `locator`. Returns `true`
    /// when the caller must fetch the bytes and call
    /// [`DocumentViewer::finish_load`].
    pub fn open<F>(&mut self, document: DocumentName, locator: Url, on_page_count: F) -> bool
    where
        F: FnOnce(u32) + Send + 'static,
    {
        if self.locator.as_ref() == Some(&locator) {
            engine_debug!("viewer already showing {}", locator);
            return false;
        }
        self.locator = Some(locator);
        self.name = document;
        self.slot = Slot::Loading {
            callback: Some(Box::new(on_page_count)),
        };
        true
    }

    /// Hands the fetched bytes to the renderer. Results for a locator that
    /// has since been replaced are discarded.
    pub fn finish_load(&mut self, locator: &Url, bytes: &[u8]) -> Result<u32, ViewerError> {
        if self.locator.as_ref() != Some(locator) {
            engine_debug!("discarding superseded load of {}", locator);
            return Err(ViewerError::NotLoaded);
        }
        let callback = match &mut self.slot {
            Slot::Loading { callback } => callback.take(),
            _ => None,
        };
        match self.renderer.load(&self.name, bytes) {
            Ok(document) => {
                let count = document.page_count;
                self.slot = Slot::Loaded(document);
                if let Some(callback) = callback {
                    callback(count);
                }
                Ok(count)
            }
            Err(err) => {
                engine_warn!("viewer failed to load {}: {}", locator, err);
                self.slot = Slot::Failed;
                Err(err)
            }
        }
    }

    /// Marks the current load as failed, e.g. when fetching the bytes failed.
    pub fn fail_load(&mut self, locator: &Url) {
        if self.locator.as_ref() == Some(locator) {
            self.slot = Slot::Failed;
        }
    }

    pub fn close(&mut self) {
        self.locator = None;
        self.name.clear();
        self.slot = Slot::Empty;
    }

    /// Renders `page` of the current document. A failed load renders the
    /// inline error indicator instead.
    pub fn render(&self, page: u32) -> Result<RenderedPage, ViewerError> {
        match &self.slot {
            Slot::Loaded(document) => self.renderer.render_page(document, page, self.width),
            Slot::Failed => Ok(RenderedPage {
                page,
                lines: vec![LOAD_FAILED_TEXT.to_string()],
            }),
            Slot::Empty | Slot::Loading { .. } => Err(ViewerError::NotLoaded),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::renderer::fixtures::pdf_with_pages;
    use crate::renderer::SummaryRenderer;

    fn viewer() -> DocumentViewer {
        DocumentViewer::new(Arc::new(SummaryRenderer))
    }

    fn url(name: &str) -> Url {
        let mut url = Url::parse("http://localhost:8000/pdf/").unwrap();
        url.path_segments_mut().unwrap().pop_if_empty().push(name);
        url
    }

    fn counting(calls: &Arc<AtomicU32>) -> impl FnOnce(u32) + Send + 'static {
        let calls = calls.clone();
        move |count| {
            calls.fetch_add(1, Ordering::SeqCst);
            assert!(count > 0);
        }
    }

    fn open(viewer: &mut DocumentViewer, name: &str, calls: &Arc<AtomicU32>) -> bool {
        viewer.open(name.to_string(), url(name), counting(calls))
    }

    #[test]
    fn page_count_reported_once_per_locator() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut viewer = viewer();

        assert!(open(&mut viewer, "a.pdf", &calls));
        assert_eq!(viewer.finish_load(&url("a.pdf"), &pdf_with_pages(1)), Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Same locator: no reload and no second report.
        assert!(!open(&mut viewer, "a.pdf", &calls));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // New locator re-arms the callback.
        assert!(open(&mut viewer, "b.pdf", &calls));
        assert_eq!(viewer.finish_load(&url("b.pdf"), &pdf_with_pages(3)), Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(viewer.page_count(), Some(3));
    }

    #[test]
    fn failed_load_never_reports_and_renders_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut viewer = viewer();

        assert!(open(&mut viewer, "bad.pdf", &calls));
        assert_eq!(
            viewer.finish_load(&url("bad.pdf"), b"<html>nope</html>"),
            Err(ViewerError::NotPdf)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(viewer.page_count(), None);
        let page = viewer.render(1).unwrap();
        assert_eq!(page.lines, vec![LOAD_FAILED_TEXT.to_string()]);
    }

    #[test]
    fn superseded_load_is_discarded() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut viewer = viewer();
        open(&mut viewer, "a.pdf", &calls);
        open(&mut viewer, "b.pdf", &calls);

        assert!(viewer.finish_load(&url("a.pdf"), &pdf_with_pages(1)).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!viewer.is_loaded());
    }

    #[test]
    fn closing_allows_reopening_same_locator() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut viewer = viewer();
        open(&mut viewer, "a.pdf", &calls);
        viewer.finish_load(&url("a.pdf"), &pdf_with_pages(1)).unwrap();
        viewer.close();

        assert!(open(&mut viewer, "a.pdf", &calls));
        viewer.finish_load(&url("a.pdf"), &pdf_with_pages(1)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn page_card_shows_document_name_verbatim() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut viewer = viewer();
        let name = "C++ notes & Q+A.pdf";
        open(&mut viewer, name, &calls);
        viewer.finish_load(&url(name), &pdf_with_pages(1)).unwrap();

        let page = viewer.render(1).unwrap();
        assert!(page.lines.iter().any(|line| line.contains(name)));
    }
}
