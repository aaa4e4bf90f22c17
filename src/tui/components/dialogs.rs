//! Promise-style modal dialogs
//!
//! A single [`DialogHost`] owns the stack of open dialogs and renders it over
//! the page. Code anywhere in the app opens dialogs through a cloneable
//! [`Dialogs`] handle and awaits the returned [`DialogHandle`] for the result,
//! without tracking mount state itself.
//!
//! Resolution and removal are separate steps: a dialog resolves as soon as
//! it closes, and leaves the stack once its exit transition has run.

pub mod alert;
pub mod api;
pub mod confirm;
pub mod layout;
pub mod manager;
pub mod prompt;
pub mod types;
mod widgets;

pub use alert::{AlertDialog, AlertOptions, AlertPayload};
pub use api::{DialogHandle, Dialogs};
pub use confirm::{ConfirmDialog, ConfirmOptions, ConfirmPayload};
pub use manager::{DialogHost, HostConfig};
pub use prompt::{PromptDialog, PromptOptions, PromptPayload};
pub use types::*;

#[cfg(test)]
pub(crate) mod test_support {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::buffer::Buffer;

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Buffer contents, one line per row
    pub fn buffer_text(buffer: &Buffer) -> String {
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width.max(1))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
