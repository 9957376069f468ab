use std::borrow::Cow;

use super::state::AppState;
use crate::github::types::UserResult;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use unicode_width::UnicodeWidthChar;

pub const TITLE: &str = "Github User Search";
pub const PLACEHOLDER: &str = "Search users by name";
pub const NO_DATA: &str = "No Data Available";

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const AVATAR_PERCENT: u16 = 60;

pub fn draw(f: &mut Frame, state: &AppState, spinner_frame: u8) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_title(f, chunks[0]);
    draw_input(f, state, chunks[1]);
    draw_results(f, state, chunks[2]);
    draw_status(f, state, chunks[3], spinner_frame);
    draw_footer(f, state, chunks[4]);
}

fn draw_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        TITLE,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(title, area);
}

fn draw_input(f: &mut Frame, state: &AppState, area: Rect) {
    let inner_width = area.width.saturating_sub(2) as usize;

    // One column stays free for the cursor.
    let (tail, typed) = visible_tail(&state.query, inner_width.saturating_sub(1));

    let line = if state.query.is_empty() {
        Line::from(Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(tail)
    };

    let block = Block::default().title(" Search ").borders(Borders::ALL);
    f.render_widget(Paragraph::new(line).block(block), area);

    f.set_cursor_position((area.x + 1 + typed as u16, area.y + 1));
}

/// Longest suffix of `text` that fits in `max_width` terminal columns, with its width.
fn visible_tail(text: &str, max_width: usize) -> (&str, usize) {
    let mut width = 0;
    let mut start = text.len();
    for (i, ch) in text.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        start = i;
    }
    (&text[start..], width)
}

/// Cell text for each result row: avatar URL (fitted to `avatar_width`) and login.
pub fn result_cells(results: &[UserResult], avatar_width: usize) -> Vec<[String; 2]> {
    results
        .iter()
        .map(|u| {
            [
                truncate_with_ellipsis(&u.avatar_url, avatar_width).into_owned(),
                u.login.clone(),
            ]
        })
        .collect()
}

fn draw_results(f: &mut Frame, state: &AppState, area: Rect) {
    let block = Block::default().title(" Users ").borders(Borders::ALL);

    if state.results.is_empty() {
        let para = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(NO_DATA, Style::default().fg(Color::Yellow))),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(para, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let avatar_width = inner_width * AVATAR_PERCENT as usize / 100;

    let header = Row::new(vec![Cell::from("Avatar"), Cell::from("Username")])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = result_cells(&state.results, avatar_width.saturating_sub(1))
        .into_iter()
        .map(|[avatar, login]| {
            Row::new(vec![
                Cell::from(avatar).style(Style::default().fg(Color::DarkGray)),
                Cell::from(login),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(AVATAR_PERCENT),
            Constraint::Percentage(100 - AVATAR_PERCENT),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut table_state = TableState::default();
    table_state.select(Some(state.selected));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn draw_status(f: &mut Frame, state: &AppState, area: Rect, spinner_frame: u8) {
    let mut spans: Vec<Span> = Vec::new();

    if state.searching {
        let ch = SPINNER_FRAMES[(spinner_frame as usize) % SPINNER_FRAMES.len()];
        spans.push(Span::styled(
            format!(" {} searching", ch),
            Style::default().fg(Color::Cyan),
        ));
    } else if let Some(updated) = &state.last_updated {
        spans.push(Span::styled(
            format!(
                " {} of {} users \u{00b7} updated {}",
                state.results.len(),
                state.total_count,
                updated
            ),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if let Some(url) = state.selected_user().and_then(|u| u.html_url.as_deref()) {
        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let room = (area.width as usize).saturating_sub(used + 3);
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(truncate_with_ellipsis(url, room).into_owned()));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_footer(f: &mut Frame, state: &AppState, area: Rect) {
    let line = Line::from(vec![
        Span::styled("  [Esc]", Style::default().fg(Color::Yellow)),
        Span::raw(" quit  "),
        Span::styled("[\u{2191}/\u{2193}]", Style::default().fg(Color::Yellow)),
        Span::raw(" select  "),
        Span::styled("[Ctrl+U]", Style::default().fg(Color::Yellow)),
        Span::raw(" clear  "),
        Span::styled(format!("up {}", state.uptime()), Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn truncate_with_ellipsis(s: &str, max_width: usize) -> Cow<'_, str> {
    let char_count = s.chars().count();
    if char_count <= max_width {
        Cow::Borrowed(s)
    } else if max_width <= 3 {
        Cow::Owned(".".repeat(max_width))
    } else {
        let end = s
            .char_indices()
            .nth(max_width - 3)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        Cow::Owned(format!("{}...", &s[..end]))
    }
}
