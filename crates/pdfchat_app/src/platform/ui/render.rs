use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use pdfchat_core::{AppViewModel, LoadStatus, Message, Sender, ViewerView};
use pdfchat_engine::LOAD_FAILED_TEXT;

use super::constants::*;
use super::layout::{centered, AppLayout};
use super::markdown::markdown_to_lines;
use crate::platform::input::{Focus, UiState};

pub fn draw(frame: &mut Frame, view: &AppViewModel, ui: &UiState) {
    let layout = AppLayout::compute(frame.area());

    draw_transcript(frame, layout.transcript, view, ui);
    draw_input(frame, layout.input, view, ui);
    draw_documents(frame, layout.documents, view, ui);
    draw_viewer(frame, layout.viewer, view.viewer.as_ref(), ui);
    draw_references(frame, layout.references, view);
    draw_status(frame, layout.status, view, ui);

    if view.upload_panel.is_some() {
        draw_upload_panel(frame, view, ui);
    }
    if view.notice_visible {
        draw_notice(frame);
    }
}

fn panel(title: impl Into<String>, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(MUTED)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", title.into()))
}

fn draw_transcript(frame: &mut Frame, area: Rect, view: &AppViewModel, ui: &UiState) {
    let mut lines: Vec<Line<'static>> = Vec::new();
    for message in &view.messages {
        lines.extend(message_lines(message));
        lines.push(Line::raw(""));
    }
    if let Some(thinking) = &view.thinking {
        lines.push(Line::from(vec![
            Span::styled("● ", Style::default().fg(WARN)),
            Span::styled(
                format!("{} ({}s)", thinking.phrase, thinking.seconds),
                Style::default().fg(WARN).add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    let block = panel("Chat", false);
    let inner = block.inner(area);
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let total = wrapped_height(&paragraph, inner.width);
    let bottom = total.saturating_sub(inner.height);
    let offset = bottom.saturating_sub(ui.scroll_back);

    frame.render_widget(paragraph.block(block).scroll((offset, 0)), area);
}

fn message_lines(message: &Message) -> Vec<Line<'static>> {
    let (label, color) = match message.sender {
        Sender::User => ("You", USER),
        Sender::Bot => ("Bot", BOT),
    };
    let mut header = vec![Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if let Some(time) = message.response_time {
        header.push(Span::styled(
            format!("  · {time}"),
            Style::default().fg(MUTED),
        ));
    }

    let mut lines = vec![Line::from(header)];
    match message.sender {
        Sender::User => lines.extend(message.text.lines().map(|l| Line::raw(l.to_string()))),
        Sender::Bot => lines.extend(markdown_to_lines(&message.text)),
    }
    lines
}

/// Rows a block-less paragraph occupies once wrapped to `width` columns.
fn wrapped_height(paragraph: &Paragraph<'_>, width: u16) -> u16 {
    u16::try_from(paragraph.line_count(width.max(1))).unwrap_or(u16::MAX)
}

fn draw_input(frame: &mut Frame, area: Rect, view: &AppViewModel, ui: &UiState) {
    let focused = ui.focus == Focus::Input;
    let title = if view.send_enabled {
        "Question · Enter to send"
    } else {
        "Question"
    };
    let block = panel(title, focused);
    let inner = block.inner(area);

    let content = if view.input_enabled {
        Line::raw(view.question_input.clone())
    } else {
        Line::styled(
            "Waiting for the backend…",
            Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
        )
    };
    // Keep the end of long questions visible.
    let typed = view.question_input.chars().count() as u16;
    let overflow = typed.saturating_sub(inner.width.saturating_sub(1));
    frame.render_widget(
        Paragraph::new(content).block(block).scroll((0, overflow)),
        area,
    );

    let overlay_open =
        ui.path_prompt.is_some() || view.upload_panel.is_some() || view.notice_visible;
    if focused && view.input_enabled && !overlay_open {
        let column = typed.saturating_sub(overflow);
        frame.set_cursor_position((inner.x + column, inner.y));
    }
}

fn draw_documents(frame: &mut Frame, area: Rect, view: &AppViewModel, ui: &UiState) {
    let title = if view.refreshing {
        "Documents · refreshing…"
    } else {
        "Documents"
    };
    let block = panel(title, ui.focus == Focus::Documents);

    if view.documents.is_empty() {
        let hint = Paragraph::new(Line::styled(
            "No documents yet. Ctrl-U to upload.",
            Style::default().fg(MUTED),
        ))
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = view
        .documents
        .iter()
        .map(|tab| {
            if tab.selected {
                ListItem::new(Line::styled(
                    format!("▶ {}", tab.name),
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                ))
            } else {
                ListItem::new(format!("  {}", tab.name))
            }
        })
        .collect();
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_viewer(frame: &mut Frame, area: Rect, viewer: Option<&ViewerView>, ui: &UiState) {
    let focused = ui.focus == Focus::Viewer;
    let Some(viewer) = viewer else {
        let hint = Paragraph::new(Line::styled(
            "Select a document to view it here.",
            Style::default().fg(MUTED),
        ))
        .block(panel("Viewer", focused));
        frame.render_widget(hint, area);
        return;
    };

    let nav_style = |enabled: bool| {
        if enabled {
            Style::default().fg(ACCENT)
        } else {
            Style::default().fg(MUTED)
        }
    };
    let navigation = Line::from(vec![
        Span::styled(" ◀ prev ", nav_style(viewer.prev_enabled)),
        Span::raw(viewer.page_label()),
        Span::styled(" next ▶ ", nav_style(viewer.next_enabled)),
    ]);
    let block = panel(viewer.document.clone(), focused).title_bottom(navigation.centered());

    let body: Vec<Line> = match (viewer.status, &viewer.preview) {
        (LoadStatus::Failed, _) => {
            vec![Line::styled(LOAD_FAILED_TEXT, Style::default().fg(ERROR))]
        }
        (LoadStatus::Loaded, Some(preview)) => {
            preview.lines.iter().map(|l| Line::raw(l.clone())).collect()
        }
        (LoadStatus::Loaded, None) => {
            vec![Line::styled("Rendering…", Style::default().fg(MUTED))]
        }
        (LoadStatus::Idle | LoadStatus::Loading, _) => {
            vec![Line::styled("Loading…", Style::default().fg(MUTED))]
        }
    };
    frame.render_widget(Paragraph::new(body).block(block), area);
}

fn draw_references(frame: &mut Frame, area: Rect, view: &AppViewModel) {
    let title = match view.used_tokens {
        Some(tokens) => format!("References · {tokens} tokens"),
        None => "References".to_string(),
    };
    let lines: Vec<Line> = if view.references.is_empty() {
        vec![Line::styled("None", Style::default().fg(MUTED))]
    } else {
        view.references
            .iter()
            .map(|reference| Line::raw(format!("• {reference}")))
            .collect()
    };
    let paragraph = Paragraph::new(lines)
        .block(panel(title, false))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_status(frame: &mut Frame, area: Rect, view: &AppViewModel, ui: &UiState) {
    let hints: &[(&str, &str)] = if ui.path_prompt.is_some() {
        &[("Enter", "add"), ("Esc", "cancel")]
    } else if view.upload_panel.is_some() {
        &[
            ("a", "add path"),
            ("paste", "drop files"),
            ("c", "clear"),
            ("u", "upload"),
            ("Ctrl-U", "close"),
        ]
    } else {
        match ui.focus {
            Focus::Input => &[
                ("Enter", "send"),
                ("Tab", "focus"),
                ("PgUp/PgDn", "scroll"),
                ("Ctrl-U", "upload"),
                ("Ctrl-R", "refresh"),
                ("Esc", "quit"),
            ],
            Focus::Documents => &[
                ("↑/↓", "choose document"),
                ("Tab", "focus"),
                ("Ctrl-R", "refresh"),
                ("Esc", "quit"),
            ],
            Focus::Viewer => &[
                ("←/→", "page"),
                ("Tab", "focus"),
                ("Esc", "quit"),
            ],
        }
    };

    let mut spans = Vec::new();
    for (key, action) in hints {
        spans.push(Span::styled(
            format!(" {key} "),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!("{action}  "), Style::default().fg(MUTED)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_upload_panel(frame: &mut Frame, view: &AppViewModel, ui: &UiState) {
    let Some(panel_view) = &view.upload_panel else {
        return;
    };
    let area = centered(frame.area(), 64, 14);
    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = Vec::new();
    if panel_view.staged.is_empty() {
        lines.push(Line::styled(
            "Paste PDF paths here (or drop files on the terminal),",
            Style::default().fg(MUTED),
        ));
        lines.push(Line::styled(
            "or press a to type a path. Only PDF files are kept.",
            Style::default().fg(MUTED),
        ));
    } else {
        lines.push(Line::styled(
            format!("{} file(s) ready:", panel_view.staged.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        lines.extend(
            panel_view
                .staged
                .iter()
                .map(|name| Line::raw(format!("  📄 {name}"))),
        );
    }
    lines.push(Line::raw(""));

    if let Some(prompt) = &ui.path_prompt {
        lines.push(Line::from(vec![
            Span::styled("Path: ", Style::default().fg(ACCENT)),
            Span::raw(prompt.clone()),
        ]));
    } else if panel_view.uploading {
        lines.push(Line::styled(
            "Uploading…",
            Style::default().fg(WARN).add_modifier(Modifier::ITALIC),
        ));
    } else {
        let upload_style = if panel_view.upload_enabled {
            Style::default().fg(USER).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(MUTED)
        };
        lines.push(Line::styled("[u] Upload", upload_style));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(" Upload PDFs ")
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );

    if let Some(prompt) = &ui.path_prompt {
        let row = inner.y + inner.height.saturating_sub(1);
        let column = ("Path: ".len() + prompt.chars().count()) as u16;
        frame.set_cursor_position((inner.x + column.min(inner.width.saturating_sub(1)), row));
    }
}

fn draw_notice(frame: &mut Frame) {
    let height = NOTICE_BODY.len() as u16 + 2;
    let area = centered(frame.area(), 62, height);
    frame.render_widget(Clear, area);

    let lines: Vec<Line> = NOTICE_BODY.iter().map(|line| Line::raw(*line)).collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ERROR))
        .title(Span::styled(
            NOTICE_TITLE,
            Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
