//! Markdown to ratatui lines for bot answers.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::constants::{ACCENT, CODE_BG, MUTED};

pub fn markdown_to_lines(md: &str) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut styles: Vec<Style> = vec![Style::default()];
    // Next number for each open list; `None` for bullet lists.
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut in_code_block = false;
    let mut quote_depth = 0usize;

    for event in Parser::new(md) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                flush(&mut spans, &mut lines);
                let style = match level {
                    HeadingLevel::H1 | HeadingLevel::H2 => Style::default()
                        .fg(ACCENT)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                    _ => Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                };
                styles.push(style);
            }
            Event::End(TagEnd::Heading(_)) => {
                styles.pop();
                flush(&mut spans, &mut lines);
            }

            Event::Start(Tag::Strong) => push_modifier(&mut styles, Modifier::BOLD),
            Event::Start(Tag::Emphasis) => push_modifier(&mut styles, Modifier::ITALIC),
            Event::Start(Tag::Strikethrough) => push_modifier(&mut styles, Modifier::CROSSED_OUT),
            Event::Start(Tag::Link { .. }) => push_modifier(&mut styles, Modifier::UNDERLINED),
            Event::End(TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough | TagEnd::Link) => {
                styles.pop();
            }

            Event::Code(code) => {
                spans.push(Span::styled(
                    format!(" {code} "),
                    Style::default().bg(CODE_BG),
                ));
            }
            Event::Start(Tag::CodeBlock(_)) => {
                flush(&mut spans, &mut lines);
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                lines.push(Line::raw(""));
            }

            Event::Start(Tag::List(start)) => lists.push(start),
            Event::End(TagEnd::List(_)) => {
                lists.pop();
                if lists.is_empty() {
                    lines.push(Line::raw(""));
                }
            }
            Event::Start(Tag::Item) => {
                flush(&mut spans, &mut lines);
                let indent = "  ".repeat(lists.len().saturating_sub(1));
                let marker = match lists.last_mut() {
                    Some(Some(number)) => {
                        let marker = format!("{indent}{number}. ");
                        *number += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                spans.push(Span::styled(marker, Style::default().fg(ACCENT)));
            }
            Event::End(TagEnd::Item) => flush(&mut spans, &mut lines),

            Event::Start(Tag::BlockQuote) => {
                flush(&mut spans, &mut lines);
                quote_depth += 1;
                push_modifier(&mut styles, Modifier::ITALIC);
            }
            Event::End(TagEnd::BlockQuote) => {
                flush(&mut spans, &mut lines);
                quote_depth = quote_depth.saturating_sub(1);
                styles.pop();
            }

            Event::End(TagEnd::Paragraph) => {
                flush(&mut spans, &mut lines);
                if lists.is_empty() {
                    lines.push(Line::raw(""));
                }
            }

            Event::Text(text) if in_code_block => {
                for code_line in text.lines() {
                    lines.push(Line::from(Span::styled(
                        format!("  {code_line}"),
                        Style::default().bg(CODE_BG),
                    )));
                }
            }
            Event::Text(text) => {
                if spans.is_empty() && quote_depth > 0 {
                    spans.push(Span::styled(
                        "│ ".repeat(quote_depth),
                        Style::default().fg(MUTED),
                    ));
                }
                spans.push(Span::styled(text.into_string(), current(&styles)));
            }
            Event::SoftBreak => spans.push(Span::raw(" ")),
            Event::HardBreak => flush(&mut spans, &mut lines),
            Event::Rule => {
                flush(&mut spans, &mut lines);
                lines.push(Line::styled("─".repeat(40), Style::default().fg(MUTED)));
            }
            _ => {}
        }
    }

    flush(&mut spans, &mut lines);
    while lines.last().is_some_and(|line| line.width() == 0) {
        lines.pop();
    }
    lines
}

fn current(styles: &[Style]) -> Style {
    styles.last().copied().unwrap_or_default()
}

fn push_modifier(styles: &mut Vec<Style>, modifier: Modifier) {
    let style = current(styles).add_modifier(modifier);
    styles.push(style);
}

fn flush(spans: &mut Vec<Span<'static>>, lines: &mut Vec<Line<'static>>) {
    if !spans.is_empty() {
        lines.push(Line::from(std::mem::take(spans)));
    }
}
