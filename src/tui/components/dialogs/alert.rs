//! Alert dialog: a message with a single acknowledgement button

use super::{
    types::{DialogAction, DialogComponent, DialogProps, OpenOptions},
    widgets::{body_size, render_buttons, render_chrome, render_error, render_message, Button},
};
use crate::tui::{styles::Theme, Frame};
use crossterm::event::{KeyCode, KeyEvent};
use futures::Future;
use ratatui::layout::Rect;

/// What an alert shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertPayload {
    pub message: String,
    pub title: String,
    pub ok_text: String,
}

/// Options for `Dialogs::alert`
#[derive(Debug, Default, Clone)]
pub struct AlertOptions {
    title: Option<String>,
    ok_text: Option<String>,
    open: OpenOptions<()>,
}

impl AlertOptions {
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

    pub fn on_close<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(()) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.open = self.open.on_close(hook);
        self
    }

    pub(super) fn into_parts(self, message: String) -> (AlertPayload, OpenOptions<()>) {
        let payload = AlertPayload {
            message,
            title: self.title.unwrap_or_else(|| "Alert".to_string()),
            ok_text: self.ok_text.unwrap_or_else(|| "Ok".to_string()),
        };
        (payload, self.open)
    }
}

#[derive(Debug, Default)]
pub struct AlertDialog;

impl DialogComponent for AlertDialog {
    type Payload = AlertPayload;
    type Output = ();

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        props: &DialogProps<'_, AlertPayload>,
    ) {
        let payload = props.payload;
        let rows = render_chrome(frame, area, theme, &payload.title, 0);

        render_message(frame, rows.message, theme, &payload.message);
        render_error(frame, rows.error, theme, props.error);

        let buttons = [Button {
            label: &payload.ok_text,
            focused: true,
            color: None,
        }];
        render_buttons(frame, rows.buttons, theme, &buttons, props.busy);
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
        props: &DialogProps<'_, AlertPayload>,
    ) -> DialogAction<()> {
        if !props.interactive() {
            return DialogAction::None;
        }

        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => DialogAction::Close(()),
            _ => DialogAction::None,
        }
    }

    fn dismissed(&self, _payload: &AlertPayload) {}

    fn preferred_size(&self, payload: &AlertPayload) -> (u16, u16) {
        body_size(&payload.title, &payload.message, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::dialogs::{
        test_support::{buffer_text, key},
        DialogHost, HostConfig,
    };
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    #[test]
    fn test_default_labels() {
        let (payload, open) = AlertOptions::new().into_parts("Saved.".to_string());
        assert_eq!(payload.title, "Alert");
        assert_eq!(payload.ok_text, "Ok");
        assert!(!open.has_on_close());
    }

    #[test]
    fn test_ignores_keys_while_busy() {
        let payload = AlertOptions::new().into_parts("Saved.".to_string()).0;
        let props = DialogProps {
            payload: &payload,
            open: true,
            busy: true,
            error: None,
        };
        assert_eq!(AlertDialog.handle_key(key(KeyCode::Enter), &props), DialogAction::None);
    }

    #[tokio::test]
    async fn test_saved_alert_renders_and_resolves() {
        let host = DialogHost::with_config(
            HostConfig {
                exit_transition: Duration::ZERO,
                dim_background: true,
            },
            None,
        );
        let handle = host.dialogs().alert("Saved.", AlertOptions::new()).unwrap();
        assert_eq!(host.len(), 1);

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|frame| host.render(frame, frame.size(), &Theme::default()))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains(" Alert "));
        assert!(text.contains("Saved."));
        assert!(text.contains(" Ok "));

        assert!(host.handle_key(key(KeyCode::Enter)));
        handle.await.unwrap();
        assert!(host.is_empty());
    }
}
