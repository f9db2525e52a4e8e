//! Card widget.
//!
//! Renders one deck card into the buffer:
//! - section eyebrow (dimmed, optional)
//! - label (bold, wrapped)
//! - body text when expanded
//! - item id bottom-right
//! - feedback stamp while the card is being dragged or flying out
//!
//! Depth styling (deeper cards dimmer, no content details) is handled here;
//! positioning and scaling of stacked cards is the caller's job.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::catalog::Item;
use crate::deck::Decision;
use crate::session::Feedback;

use super::theme::Theme;

/// Feedback stamp becomes visible past this confidence.
const STAMP_MIN_CONFIDENCE: f32 = 0.05;

pub struct DeckCard<'a> {
    item: &'a Item,
    theme: &'a Theme,
    depth: usize,
    expanded: bool,
    show_section: bool,
    feedback: Option<Feedback>,
    stamp_label: &'a str,
}

impl<'a> DeckCard<'a> {
    pub fn new(item: &'a Item, theme: &'a Theme) -> Self {
        Self {
            item,
            theme,
            depth: 0,
            expanded: false,
            show_section: true,
            feedback: None,
            stamp_label: "",
        }
    }

    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn show_section(mut self, show_section: bool) -> Self {
        self.show_section = show_section;
        self
    }

    pub fn feedback(mut self, feedback: Option<Feedback>, label: &'a str) -> Self {
        self.feedback = feedback;
        self.stamp_label = label;
        self
    }

    fn border_color(&self) -> ratatui::style::Color {
        match self.feedback {
            Some(f) if f.confidence > STAMP_MIN_CONFIDENCE => match f.direction {
                Decision::Accept => self.theme.accept,
                Decision::Reject => self.theme.reject,
            },
            _ => self.theme.card_border,
        }
    }
}

impl<'a> Widget for DeckCard<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 3 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color()))
            .style(Style::default().bg(self.theme.card_bg));
        let inner = block.inner(area);
        block.render(area, buf);

        // Cards behind the current one show no content, just the face.
        if self.depth > 0 {
            return;
        }

        let width = inner.width as usize;
        if width == 0 {
            return;
        }
        let max_y = inner.y + inner.height;
        let mut y = inner.y;

        // Section eyebrow
        if self.show_section && y < max_y {
            if let Some(ref section) = self.item.section {
                let style = Style::default().fg(self.theme.dimmed).bg(self.theme.card_bg);
                buf.set_string(inner.x, y, truncate(&section.to_uppercase(), width), style);
            }
            y += 1;
        }
        if y < max_y {
            y += 1; // gap
        }

        // Label, wrapped; collapsed cards cap it at two lines
        let label_style = Style::default()
            .fg(self.theme.foreground)
            .bg(self.theme.card_bg)
            .add_modifier(Modifier::BOLD);
        let label_lines = wrap_text(&self.item.label, width);
        let label_cap = if self.expanded { label_lines.len() } else { 2 };
        for line in label_lines.iter().take(label_cap) {
            if y >= max_y {
                break;
            }
            buf.set_string(inner.x, y, line, label_style);
            y += 1;
        }

        // Body, only when expanded, leaving the last row for the id
        if self.expanded && !self.item.body.is_empty() {
            if y < max_y {
                y += 1; // gap
            }
            let body_style = Style::default().fg(self.theme.dimmed).bg(self.theme.card_bg);
            for line in wrap_text(&self.item.body, width) {
                if y + 1 >= max_y {
                    break;
                }
                buf.set_string(inner.x, y, line, body_style);
                y += 1;
            }
        }

        // Id, bottom-right
        let id = truncate(&self.item.id, width);
        let id_x = inner.x + (width.saturating_sub(id.width())) as u16;
        buf.set_string(
            id_x,
            max_y - 1,
            &id,
            Style::default().fg(self.theme.dimmed).bg(self.theme.card_bg),
        );

        // Feedback stamp: top-left for reject, top-right for accept
        if let Some(feedback) = self.feedback {
            if feedback.confidence > STAMP_MIN_CONFIDENCE && !self.stamp_label.is_empty() {
                let color = match feedback.direction {
                    Decision::Accept => self.theme.accept,
                    Decision::Reject => self.theme.reject,
                };
                let mut style = Style::default()
                    .fg(color)
                    .bg(self.theme.card_bg)
                    .add_modifier(Modifier::BOLD);
                if feedback.confidence >= 1.0 {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                let stamp = format!(" {} ", self.stamp_label);
                let x = match feedback.direction {
                    Decision::Reject => inner.x,
                    Decision::Accept => {
                        inner.x + (width.saturating_sub(stamp.width())) as u16
                    }
                };
                buf.set_string(x, inner.y, truncate(&stamp, width), style);
            }
        }
    }
}

/// Truncate string to fit within max_width, adding ellipsis if needed
pub fn truncate(s: &str, max_width: usize) -> String {
    let width = s.width();
    if width <= max_width {
        s.to_string()
    } else if max_width <= 1 {
        "…".to_string()
    } else {
        let mut result = String::new();
        let mut current_width = 0;

        for c in s.chars() {
            let char_width = c.width().unwrap_or(0);
            if current_width + char_width + 1 > max_width {
                result.push('…');
                break;
            }
            result.push(c);
            current_width += char_width;
        }

        result
    }
}

/// Greedy word wrap by display width. Words longer than the width are broken.
pub fn wrap_text(s: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in s.split_whitespace() {
        let word_width = word.width();
        if current_width > 0 && current_width + 1 + word_width > max_width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width > max_width {
            // Break an oversized word across lines.
            for c in word.chars() {
                let cw = c.width().unwrap_or(0);
                if current_width + cw > max_width {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(c);
                current_width += cw;
            }
        } else {
            if current_width > 0 {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello w…");
        assert_eq!(truncate("hi", 2), "hi");
        assert_eq!(truncate("hello", 1), "…");
    }

    #[test]
    fn test_wrap_simple() {
        assert_eq!(wrap_text("one two three", 20), vec!["one two three"]);
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert!(wrap_text("", 10).is_empty());
        assert!(wrap_text("anything", 0).is_empty());
    }
}
