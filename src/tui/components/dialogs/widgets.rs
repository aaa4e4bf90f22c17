//! Drawing helpers shared by the built-in dialogs

use crate::tui::{styles::Theme, Frame};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

/// Widest a built-in dialog grows
pub(super) const MAX_WIDTH: u16 = 60;

/// A push button in the dialog footer
pub(super) struct Button<'a> {
    pub label: &'a str,
    pub focused: bool,
    pub color: Option<Color>,
}

/// Rows of a built-in dialog body
pub(super) struct BodyAreas {
    pub message: Rect,
    pub extra: Rect,
    pub error: Rect,
    pub buttons: Rect,
}

/// Draw the dialog border and title, then split the inside into rows.
/// `extra_height` reserves space for a control between message and footer.
pub(super) fn render_chrome(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    title: &str,
    extra_height: u16,
) -> BodyAreas {
    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(Style::default().fg(theme.text_bright).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(theme.focused_border_style())
        .style(theme.base_style())
        .padding(Padding::horizontal(1));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),               // Message
            Constraint::Length(extra_height), // Control
            Constraint::Length(1),            // Error
            Constraint::Length(1),            // Buttons
        ])
        .split(inner);

    BodyAreas {
        message: rows[0],
        extra: rows[1],
        error: rows[2],
        buttons: rows[3],
    }
}

pub(super) fn render_message(frame: &mut Frame, area: Rect, theme: &Theme, message: &str) {
    let paragraph = Paragraph::new(message.to_string())
        .style(theme.text_style())
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

pub(super) fn render_error(frame: &mut Frame, area: Rect, theme: &Theme, error: Option<&str>) {
    if let Some(error) = error {
        let paragraph = Paragraph::new(error.to_string()).style(Style::default().fg(theme.error));
        frame.render_widget(paragraph, area);
    }
}

/// Right-aligned footer buttons. While `busy`, the focused button shows an ellipsis.
pub(super) fn render_buttons(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    buttons: &[Button<'_>],
    busy: bool,
) {
    let mut spans = Vec::with_capacity(buttons.len() * 2);
    for (index, button) in buttons.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        let label = if busy && button.focused {
            format!(" {}… ", button.label)
        } else {
            format!(" {} ", button.label)
        };
        let mut style = theme.button_style(button.focused, button.color);
        if busy {
            style = style.add_modifier(Modifier::DIM);
        }
        spans.push(Span::styled(label, style));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
        area,
    );
}

/// Size that fits `message` plus the fixed rows of a built-in dialog.
/// Saturates on messages too large for a terminal; the layout clamps later.
pub(super) fn body_size(title: &str, message: &str, extra_height: u16) -> (u16, u16) {
    let longest = message
        .lines()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
        .max(title.chars().count().saturating_add(2));

    let width = u16::try_from(longest)
        .unwrap_or(u16::MAX)
        .saturating_add(4)
        .clamp(30, MAX_WIDTH);
    let inner = usize::from(width - 4).max(1);
    let lines = message
        .lines()
        .map(|line| line.chars().count().div_ceil(inner).max(1))
        .fold(0usize, usize::saturating_add)
        .max(1);

    // Borders, message, spacer, control, error row, buttons
    let height = u16::try_from(lines)
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .saturating_add(1)
        .saturating_add(extra_height)
        .saturating_add(2);
    (width, height)
}
