//! Drawing functions for the TUI.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::app::{App, AppMode};
use crate::deck::Decision;
use crate::session::StackCard;

use super::{DeckCard, Theme};

/// Widest a card face gets, in cells.
const CARD_MAX_WIDTH: u16 = 46;
/// Tallest a card face gets, in cells.
const CARD_MAX_HEIGHT: u16 = 16;

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    let theme = app.config().resolve_theme();
    match app.mode() {
        AppMode::Reviewing => draw_review(f, app, &theme),
        AppMode::Results => draw_results(f, app, &theme),
    }
}

fn draw_review(f: &mut Frame, app: &App, theme: &Theme) {
    let area = f.area();
    let bg_block = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(bg_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title, counter, progress
            Constraint::Min(5),    // Card stack
            Constraint::Length(2), // Hints + status
        ])
        .split(area);

    draw_header(f, app, chunks[0], theme);
    draw_card_stack(f, app, chunks[1], theme);
    draw_footer(f, app, chunks[2], theme);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let session = app.session();
    let total = session.deck_len();
    let shown = (session.position() + 1).min(total);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        " swipedeck ",
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(title, rows[0]);

    let counter = Paragraph::new(format!(
        "{shown} of {total} · {} kept",
        session.retained_len()
    ))
    .style(Style::default().fg(theme.dimmed))
    .alignment(Alignment::Center);
    f.render_widget(counter, rows[1]);

    let progress = session.progress();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.accent).bg(theme.card_border))
        .ratio(progress as f64)
        .label(format!("{:.0}%", progress * 100.0));
    f.render_widget(gauge, rows[2].inner(Margin::new(2, 0)));
}

fn draw_card_stack(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let session = app.session();
    let cards = session.visible_cards();
    if cards.is_empty() {
        return;
    }

    let base_width = area.width.saturating_sub(4).min(CARD_MAX_WIDTH).max(4);
    let base_height = area.height.saturating_sub(4).min(CARD_MAX_HEIGHT).max(3);
    let base_x = area.x + (area.width.saturating_sub(base_width)) / 2;
    let base_y = area.y + 1;

    // Deepest card first so the current card paints on top.
    for card in cards.iter().rev() {
        let rect = stack_rect(card, base_x, base_y, base_width, base_height);
        let rect = apply_motion_offset(app, card.depth, rect).intersection(area);

        let feedback = if card.depth == 0 {
            session.feedback()
        } else {
            None
        };
        let stamp_label = match feedback.map(|fb| fb.direction) {
            Some(Decision::Accept) => app.config().appearance.accept_label.as_str(),
            Some(Decision::Reject) => app.config().appearance.reject_label.as_str(),
            None => "",
        };

        let widget = DeckCard::new(card.item, theme)
            .depth(card.depth)
            .expanded(card.depth == 0 && session.expanded())
            .show_section(app.config().appearance.show_section)
            .feedback(feedback, stamp_label);
        f.render_widget(widget, rect);
    }
}

/// Stack geometry: deeper cards sit lower and slightly narrower, mirroring
/// the session's translate/scale parameters (10 units = 1 row).
fn stack_rect(card: &StackCard, base_x: u16, base_y: u16, width: u16, height: u16) -> Rect {
    let shrink = (width as f32 * (1.0 - card.scale)).round() as u16;
    let w = width.saturating_sub(shrink);
    Rect {
        x: base_x + shrink / 2,
        y: base_y + (card.translate_y / 10.0).round() as u16,
        width: w,
        height,
    }
}

/// Shift the current card by its motion transform, converting distance units
/// back to cells (vertical cells are about twice as tall as wide).
fn apply_motion_offset(app: &App, depth: usize, rect: Rect) -> Rect {
    if depth != 0 {
        return rect;
    }
    let Some(visual) = app.session().current_visual() else {
        return rect;
    };
    let upc = app.session().units_per_cell().max(0.1);
    let dx = (visual.transform.x / upc).round() as i32;
    let dy = (visual.transform.y / (upc * 2.0)).round() as i32;

    let x = (rect.x as i32 + dx).max(0) as u16;
    let y = (rect.y as i32 + dy).max(0) as u16;
    Rect { x, y, ..rect }
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let undo_hint = if app.session().history_len() > 0 {
        "u undo   "
    } else {
        ""
    };
    let hints = Paragraph::new(format!(
        "←/h skip   →/l keep   {undo_hint}enter details   r restart   q quit"
    ))
    .style(Style::default().fg(theme.dimmed))
    .alignment(Alignment::Center);
    f.render_widget(hints, rows[0]);

    draw_status_line(f, app, rows[1], theme);
}

fn draw_results(f: &mut Frame, app: &App, theme: &Theme) {
    let area = f.area();
    let bg_block = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(bg_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Result panel
            Constraint::Length(2), // Hints + status
        ])
        .split(area);

    let panel_width = chunks[0].width.saturating_sub(4).clamp(10, 60);
    let panel = Rect {
        x: chunks[0].x + (chunks[0].width.saturating_sub(panel_width)) / 2,
        y: chunks[0].y,
        width: panel_width,
        height: chunks[0].height,
    };

    let kept = app.session().retained_items();

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            format!(
                "You kept {} of {} items",
                kept.len(),
                app.session().deck_len()
            ),
            Style::default().fg(theme.foreground),
        )),
        Line::from(""),
    ];
    if kept.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing kept.",
            Style::default().fg(theme.dimmed),
        )));
    } else {
        for item in &kept {
            lines.push(Line::from(vec![
                Span::styled("● ", Style::default().fg(theme.accept)),
                Span::styled(item.id.clone(), Style::default().fg(theme.accent)),
                Span::raw("  "),
                Span::styled(item.label.clone(), Style::default().fg(theme.foreground)),
            ]));
        }
    }

    let list = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(" Final selection ")
            .style(Style::default().bg(theme.background)),
    );
    f.render_widget(list, panel);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(chunks[1]);

    let hints = Paragraph::new("e export   r restart   q quit")
        .style(Style::default().fg(theme.dimmed))
        .alignment(Alignment::Center);
    f.render_widget(hints, rows[0]);

    draw_status_line(f, app, rows[1], theme);
}

fn draw_status_line(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let Some(status) = app.status() else {
        return;
    };
    let color = if status.is_error {
        theme.reject
    } else {
        theme.accept
    };
    let line = Paragraph::new(status.text.clone())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center);
    f.render_widget(line, area);
}
