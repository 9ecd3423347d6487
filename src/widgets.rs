//! Reusable clickable UI components.
//!
//! - [`ClickableList`]: vertical list whose rows can carry click actions.
//! - [`TextField`]: single-line text entry with a block cursor.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

// ── ClickableList ──────────────────────────────────────────────

/// Lines paired with the click actions bound to them.
///
/// A clickable line keeps its action when lines are inserted before it,
/// so render code never computes row offsets by hand.
///
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("header"));
/// cl.push_clickable(Line::from("[1] 住まい"), EDIT_CATEGORY_BASE);
/// cl.register_targets(area, &mut cs, 1, 1);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
/// ```
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)`
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len() as u16, action_id));
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register a row target for every clickable line that is visible.
    ///
    /// `top_offset` / `bottom_offset` are the rows taken by borders. Lines are
    /// assumed not to wrap.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);
        for &(line_idx, action_id) in &self.actions {
            let row = content_y + line_idx;
            if row < content_end {
                cs.add_row_target(area, row, action_id);
            }
        }
    }
}

// ── TextField ──────────────────────────────────────────────────

/// A one-line entry box. Tapping it fires `submit_action`.
pub struct TextField<'a> {
    value: &'a str,
    placeholder: &'a str,
    block: Option<Block<'a>>,
    submit_action: Option<u16>,
}

impl<'a> TextField<'a> {
    pub fn new(value: &'a str) -> Self {
        Self {
            value,
            placeholder: "",
            block: None,
            submit_action: None,
        }
    }

    pub fn placeholder(mut self, text: &'a str) -> Self {
        self.placeholder = text;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn on_submit(mut self, action_id: u16) -> Self {
        self.submit_action = Some(action_id);
        self
    }

    fn line(&self) -> Line<'a> {
        let cursor = Span::styled(
            " ",
            Style::default().bg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        );
        if self.value.is_empty() {
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Yellow)),
                cursor,
                Span::styled(self.placeholder, Style::default().fg(Color::DarkGray)),
            ])
        } else {
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Yellow)),
                Span::styled(self.value, Style::default().fg(Color::White)),
                cursor,
            ])
        }
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let line = self.line();
        let paragraph = match self.block {
            Some(block) => Paragraph::new(line).block(block),
            None => Paragraph::new(line),
        };
        f.render_widget(paragraph, area);
        if let Some(action_id) = self.submit_action {
            cs.add_click_target(area, action_id);
        }
    }
}
