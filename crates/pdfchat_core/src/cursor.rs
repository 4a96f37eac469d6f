use crate::DocumentName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// A rendered page as handed back by the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePreview {
    pub page: u32,
    pub lines: Vec<String>,
}

/// Selected document and page position.
///
/// `page` stays within `1..=total_pages` once the total is known, and resets
/// to 1 whenever the selection changes or the total becomes known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerCursor {
    selected: Option<DocumentName>,
    page: u32,
    total_pages: Option<u32>,
    status: LoadStatus,
    preview: Option<PagePreview>,
}

impl Default for ViewerCursor {
    fn default() -> Self {
        Self {
            selected: None,
            page: 1,
            total_pages: None,
            status: LoadStatus::Idle,
            preview: None,
        }
    }
}

impl ViewerCursor {
    pub fn selected(&self) -> Option<&DocumentName> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, document: &str) -> bool {
        self.selected.as_deref() == Some(document)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn preview(&self) -> Option<&PagePreview> {
        self.preview.as_ref()
    }

    pub(crate) fn select(&mut self, document: DocumentName) {
        *self = Self {
            selected: Some(document),
            status: LoadStatus::Loading,
            ..Self::default()
        };
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn rewind(&mut self) {
        self.page = 1;
    }

    /// Records the page count reported by the viewer. A zero count is not a
    /// valid document and is treated as a load failure.
    pub(crate) fn set_total_pages(&mut self, total: u32) {
        if total == 0 {
            self.mark_failed();
            return;
        }
        self.total_pages = Some(total);
        self.page = 1;
        self.status = LoadStatus::Loaded;
    }

    pub(crate) fn mark_failed(&mut self) {
        self.total_pages = None;
        self.page = 1;
        self.status = LoadStatus::Failed;
        self.preview = None;
    }

    pub(crate) fn set_preview(&mut self, preview: PagePreview) {
        self.preview = Some(preview);
    }

    pub fn can_prev(&self) -> bool {
        self.selected.is_some() && self.page > 1
    }

    /// Forward navigation needs a known total; it is disabled while unknown.
    pub fn can_next(&self) -> bool {
        match self.total_pages {
            Some(total) => self.selected.is_some() && self.page < total,
            None => false,
        }
    }

    pub(crate) fn prev(&mut self) -> bool {
        if !self.can_prev() {
            return false;
        }
        self.page -= 1;
        true
    }

    pub(crate) fn next(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.page += 1;
        true
    }
}
