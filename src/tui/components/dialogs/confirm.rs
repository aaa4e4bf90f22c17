//! Confirm dialog: cancel/ok, resolving to a boolean

use super::{
    types::{DialogAction, DialogComponent, DialogProps, OpenOptions},
    widgets::{body_size, render_buttons, render_chrome, render_error, render_message, Button},
};
use crate::tui::{
    styles::{Severity, Theme},
    Frame,
};
use crossterm::event::{KeyCode, KeyEvent};
use futures::Future;
use ratatui::layout::Rect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPayload {
    pub message: String,
    pub title: String,
    pub ok_text: String,
    pub cancel_text: String,
    /// Color of the affirmative button
    pub severity: Option<Severity>,
}

/// Options for `Dialogs::confirm`
#[derive(Debug, Default, Clone)]
pub struct ConfirmOptions {
    title: Option<String>,
    ok_text: Option<String>,
    cancel_text: Option<String>,
    severity: Option<Severity>,
    open: OpenOptions<bool>,
}

impl ConfirmOptions {
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

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Run `hook` with the answer before the dialog closes
    pub fn on_close<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(bool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.open = self.open.on_close(hook);
        self
    }

    pub(super) fn into_parts(self, message: String) -> (ConfirmPayload, OpenOptions<bool>) {
        let payload = ConfirmPayload {
            message,
            title: self.title.unwrap_or_else(|| "Confirm".to_string()),
            ok_text: self.ok_text.unwrap_or_else(|| "Ok".to_string()),
            cancel_text: self.cancel_text.unwrap_or_else(|| "Cancel".to_string()),
            severity: self.severity,
        };
        (payload, self.open)
    }
}

/// Focus starts on Cancel
#[derive(Debug, Default)]
pub struct ConfirmDialog {
    ok_focused: bool,
}

impl DialogComponent for ConfirmDialog {
    type Payload = ConfirmPayload;
    type Output = bool;

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        props: &DialogProps<'_, ConfirmPayload>,
    ) {
        let payload = props.payload;
        let rows = render_chrome(frame, area, theme, &payload.title, 0);

        render_message(frame, rows.message, theme, &payload.message);
        render_error(frame, rows.error, theme, props.error);

        let buttons = [
            Button {
                label: &payload.cancel_text,
                focused: !self.ok_focused,
                color: Some(theme.text_dim),
            },
            Button {
                label: &payload.ok_text,
                focused: self.ok_focused,
                color: payload.severity.map(|severity| theme.severity_color(severity)),
            },
        ];
        render_buttons(frame, rows.buttons, theme, &buttons, props.busy);
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
        props: &DialogProps<'_, ConfirmPayload>,
    ) -> DialogAction<bool> {
        if !props.interactive() {
            return DialogAction::None;
        }

        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.ok_focused = !self.ok_focused;
                DialogAction::None
            }
            KeyCode::Enter | KeyCode::Char(' ') => DialogAction::Close(self.ok_focused),
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.ok_focused = true;
                DialogAction::Close(true)
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.ok_focused = false;
                DialogAction::Close(false)
            }
            _ => DialogAction::None,
        }
    }

    fn dismissed(&self, _payload: &ConfirmPayload) -> bool {
        false
    }

    fn preferred_size(&self, payload: &ConfirmPayload) -> (u16, u16) {
        body_size(&payload.title, &payload.message, 0)
    }
}
