use ratatui::layout::{Constraint, Layout, Rect};

use pdfchat_engine::DISPLAY_WIDTH;

/// Screen regions of the main view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub transcript: Rect,
    pub input: Rect,
    pub documents: Rect,
    pub viewer: Rect,
    pub references: Rect,
    pub status: Rect,
}

impl AppLayout {
    /// Chat on the left, documents and viewer on the right, key hints at
    /// the bottom. The viewer column is sized for a rendered page plus borders.
    pub fn compute(area: Rect) -> Self {
        let [main, status] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
        let viewer_width = DISPLAY_WIDTH as u16 + 2;
        let [chat, side] =
            Layout::horizontal([Constraint::Min(30), Constraint::Length(viewer_width)])
                .areas(main);
        let [transcript, input] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(chat);
        let [documents, viewer, references] = Layout::vertical([
            Constraint::Length(7),
            Constraint::Min(5),
            Constraint::Length(6),
        ])
        .areas(side);

        Self {
            transcript,
            input,
            documents,
            viewer,
            references,
            status,
        }
    }
}

/// A `width` x `height` rectangle centred in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
