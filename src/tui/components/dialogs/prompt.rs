//! Prompt dialog: single-line text input, resolving to the entered text or
//! `None` when cancelled

use super::{
    types::{DialogAction, DialogComponent, DialogProps, OpenOptions},
    widgets::{body_size, render_buttons, render_chrome, render_error, render_message, Button},
};
use crate::tui::{styles::Theme, Frame};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use futures::Future;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Inline validation shown when an empty answer is submitted
pub const REQUIRED_MESSAGE: &str = "Please fill out this field.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    pub message: String,
    pub title: String,
    pub ok_text: String,
    pub cancel_text: String,
    /// Draw the input as bullets, e.g. for passwords
    pub masked: bool,
}

/// Options for `Dialogs::prompt`
#[derive(Debug, Default, Clone)]
pub struct PromptOptions {
    title: Option<String>,
    ok_text: Option<String>,
    cancel_text: Option<String>,
    masked: bool,
    open: OpenOptions<Option<String>>,
}

impl PromptOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn ok_text(mut self, text: impl Into<String>) -> Self {
        self.ok_text = Some(text.into());
        self
    }

    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = Some(text.into());
        self
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn on_close<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Option<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.open = self.open.on_close(hook);
        self
    }

    pub(super) fn into_parts(
        self,
        message: String,
    ) -> (PromptPayload, OpenOptions<Option<String>>) {
        let payload = PromptPayload {
            message,
            title: self.title.unwrap_or_else(|| "Prompt".to_string()),
            ok_text: self.ok_text.unwrap_or_else(|| "Ok".to_string()),
            cancel_text: self.cancel_text.unwrap_or_else(|| "Cancel".to_string()),
            masked: self.masked,
        };
        (payload, self.open)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum PromptFocus {
    #[default]
    Input,
    Ok,
    Cancel,
}

impl PromptFocus {
    fn next(self) -> Self {
        match self {
            Self::Input => Self::Ok,
            Self::Ok => Self::Cancel,
            Self::Cancel => Self::Input,
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::Input => Self::Cancel,
            Self::Ok => Self::Input,
            Self::Cancel => Self::Ok,
        }
    }
}

#[derive(Debug, Default)]
pub struct PromptDialog {
    input: String,
    /// Cursor position in characters
    cursor: usize,
    focus: PromptFocus,
    required_shown: bool,
}

impl PromptDialog {
    pub fn value(&self) -> &str {
        &self.input
    }

    fn shown_input(&self, masked: bool) -> String {
        if masked {
            "•".repeat(self.input.chars().count())
        } else {
            self.input.clone()
        }
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map(|(index, _)| index)
            .unwrap_or(self.input.len())
    }

    fn insert(&mut self, c: char) {
        let index = self.byte_index();
        self.input.insert(index, c);
        self.cursor += 1;
        self.required_shown = false;
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let index = self.byte_index();
        self.input.remove(index);
    }

    fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let index = self.byte_index();
            self.input.remove(index);
        }
    }

    fn submit(&mut self) -> DialogAction<Option<String>> {
        if self.input.is_empty() {
            self.required_shown = true;
            self.focus = PromptFocus::Input;
            return DialogAction::None;
        }
        DialogAction::Close(Some(self.input.clone()))
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert(c)
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.input.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.chars().count(),
            _ => {}
        }
    }
}

impl DialogComponent for PromptDialog {
    type Payload = PromptPayload;
    type Output = Option<String>;

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        props: &DialogProps<'_, PromptPayload>,
    ) {
        let payload = props.payload;
        let rows = render_chrome(frame, area, theme, &payload.title, 1);

        render_message(frame, rows.message, theme, &payload.message);

        let input_focused = self.focus == PromptFocus::Input;
        let prompt_style = if input_focused {
            Style::default().fg(theme.primary)
        } else {
            theme.dim_style()
        };
        let line = Line::from(vec![
            Span::styled("> ", prompt_style),
            Span::styled(self.shown_input(payload.masked), theme.text_style()),
        ]);
        frame.render_widget(Paragraph::new(line), rows.extra);

        if input_focused && props.interactive() && rows.extra.height > 0 {
            let x = rows.extra.x + 2 + self.input.chars().take(self.cursor).count() as u16;
            frame.set_cursor(x.min(rows.extra.right().saturating_sub(1)), rows.extra.y);
        }

        let error = if self.required_shown {
            Some(REQUIRED_MESSAGE)
        } else {
            props.error
        };
        render_error(frame, rows.error, theme, error);

        let buttons = [
            Button {
                label: &payload.cancel_text,
                focused: self.focus == PromptFocus::Cancel,
                color: Some(theme.text_dim),
            },
            Button {
                label: &payload.ok_text,
                focused: self.focus == PromptFocus::Ok,
                color: None,
            },
        ];
        render_buttons(frame, rows.buttons, theme, &buttons, props.busy);
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
        props: &DialogProps<'_, PromptPayload>,
    ) -> DialogAction<Option<String>> {
        if !props.interactive() {
            return DialogAction::None;
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                DialogAction::None
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
                DialogAction::None
            }
            KeyCode::Enter => match self.focus {
                PromptFocus::Cancel => DialogAction::Close(None),
                PromptFocus::Input | PromptFocus::Ok => self.submit(),
            },
            _ if self.focus == PromptFocus::Input => {
                self.handle_input_key(key);
                DialogAction::None
            }
            KeyCode::Left | KeyCode::Right => {
                self.focus = match self.focus {
                    PromptFocus::Ok => PromptFocus::Cancel,
                    _ => PromptFocus::Ok,
                };
                DialogAction::None
            }
            _ => DialogAction::None,
        }
    }

    fn dismissed(&self, _payload: &PromptPayload) -> Option<String> {
        None
    }

    fn preferred_size(&self, payload: &PromptPayload) -> (u16, u16) {
        let (width, height) = body_size(&payload.title, &payload.message, 1);
        (width.max(40), height)
    }
}
