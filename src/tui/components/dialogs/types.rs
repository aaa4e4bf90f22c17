//! Core dialog types and traits
//!
//! This module defines the contract between the dialog host and the dialog
//! bodies it renders: identifiers, the props handed to a body, the actions a
//! body returns, open options and the error type.

use crate::tui::{styles::Theme, Frame};
use crossterm::event::KeyEvent;
use futures::future::{BoxFuture, FutureExt};
use ratatui::layout::Rect;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Unique identifier for dialog instances, allocated by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DialogId(pub u64);

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dialog-{}", self.0)
    }
}

/// Lifecycle phase of a dialog instance while it is on the stack
///
/// `Open -> Closing` happens when a close is requested and an `on_close` hook
/// is configured; `Closing -> Open` when that hook fails. `Resolved` instances
/// are only kept around until the render layer finishes their exit transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPhase {
    Open,
    Closing,
    Resolved,
}

impl DialogPhase {
    /// Whether the dialog is still logically open (not yet resolved)
    pub fn is_open(self) -> bool {
        !matches!(self, Self::Resolved)
    }
}

/// Props handed to a dialog body on every render and key event
#[derive(Debug)]
pub struct DialogProps<'a, P> {
    /// The payload passed to `open`
    pub payload: &'a P,
    /// False once the result has been resolved and the exit transition runs
    pub open: bool,
    /// True while the `on_close` hook of this instance is running
    pub busy: bool,
    /// Message of the last failed `on_close` hook, if any
    pub error: Option<&'a str>,
}

impl<P> DialogProps<'_, P> {
    /// Whether the controls of the dialog accept input
    pub fn interactive(&self) -> bool {
        self.open && !self.busy
    }
}

/// What a dialog body wants to happen after handling an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogAction<R> {
    /// Keep the dialog as it is
    None,
    /// Close the dialog with this result
    Close(R),
}

/// A renderable dialog body
///
/// Bodies never close themselves directly: they return
/// [`DialogAction::Close`] and the host resolves the instance. Returning it
/// more than once is harmless, only the first request is honoured.
pub trait DialogComponent: Send + 'static {
    /// Input handed to the dialog when it is opened
    type Payload: Send + 'static;
    /// Value the dialog resolves with
    type Output: Clone + Send + 'static;

    /// Render the dialog, including its own border and title
    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        props: &DialogProps<'_, Self::Payload>,
    );

    /// Handle a key routed to this dialog
    fn handle_key(
        &mut self,
        key: KeyEvent,
        props: &DialogProps<'_, Self::Payload>,
    ) -> DialogAction<Self::Output>;

    /// Result reported when the dialog is dismissed through Escape or the backdrop
    fn dismissed(&self, payload: &Self::Payload) -> Self::Output;

    /// Preferred (width, height) including borders
    fn preferred_size(&self, payload: &Self::Payload) -> (u16, u16) {
        let _ = payload;
        (50, 8)
    }
}

/// Async hook run with the result before the dialog closes
pub type CloseHook<R> = Arc<dyn Fn(R) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Options accepted by `open`
pub struct OpenOptions<R> {
    pub(crate) on_close: Option<CloseHook<R>>,
}

impl<R> OpenOptions<R> {
    pub fn new() -> Self {
        Self { on_close: None }
    }

    /// Run `hook` with the result before the dialog closes. The dialog stays
    /// open, showing a busy state, until the returned future completes. If it
    /// fails the dialog stays open and shows the error so the user can retry.
    pub fn on_close<F, Fut>(mut self, hook: F) -> Self
    where
        R: 'static,
        F: Fn(R) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_close = Some(Arc::new(move |result: R| hook(result).boxed()));
        self
    }

    pub fn has_on_close(&self) -> bool {
        self.on_close.is_some()
    }
}

impl<R> Default for OpenOptions<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for OpenOptions<R> {
    fn clone(&self) -> Self {
        Self {
            on_close: self.on_close.clone(),
        }
    }
}

impl<R> fmt::Debug for OpenOptions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenOptions")
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

/// Typed reference to an open dialog, used to close or dismiss it from outside
pub struct DialogRef<R> {
    id: DialogId,
    _result: PhantomData<fn() -> R>,
}

impl<R> DialogRef<R> {
    pub(crate) fn new(id: DialogId) -> Self {
        Self {
            id,
            _result: PhantomData,
        }
    }

    pub fn id(&self) -> DialogId {
        self.id
    }
}

impl<R> Clone for DialogRef<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for DialogRef<R> {}

impl<R> fmt::Debug for DialogRef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DialogRef").field(&self.id).finish()
    }
}

/// Dialog events emitted by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    /// Dialog was pushed on the stack
    Opened(DialogId),
    /// Dialog result was delivered
    Resolved(DialogId),
    /// Dialog left the stack after its exit transition
    Removed(DialogId),
    /// The `on_close` hook failed; the dialog stays open
    HookFailed(DialogId, String),
}

/// Result type for dialog operations
pub type DialogResult<T> = std::result::Result<T, DialogError>;

/// Dialog-specific error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    #[error("Dialogs context was used without a provider")]
    NoProvider,

    #[error("Dialog '{0}' not found")]
    NotFound(DialogId),

    #[error("Dialog '{0}' was closed with a result of the wrong type")]
    ResultTypeMismatch(DialogId),

    #[error("Closing dialog '{id}' failed: {message}")]
    HookFailed { id: DialogId, message: String },

    #[error("Dialog host was dropped before dialog '{0}' resolved")]
    HostDropped(DialogId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_on_close_hook_receives_result() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let options = OpenOptions::new().on_close(move |result: bool| {
            let tx = tx.clone();
            async move {
                tx.send(result)?;
                Ok::<_, anyhow::Error>(())
            }
        });
        assert!(options.has_on_close());

        let hook = options.on_close.clone().unwrap();
        hook(true).await.unwrap();
        assert_eq!(rx.recv().await, Some(true));
    }

    #[test]
    fn test_phase_is_open() {
        assert!(DialogPhase::Open.is_open());
        assert!(DialogPhase::Closing.is_open());
        assert!(!DialogPhase::Resolved.is_open());
    }

    #[test]
    fn test_props_interactive() {
        let payload = ();
        let props = DialogProps {
            payload: &payload,
            open: true,
            busy: true,
            error: None,
        };
        assert!(!props.interactive());
        let props = DialogProps {
            payload: &payload,
            open: true,
            busy: false,
            error: None,
        };
        assert!(props.interactive());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DialogError::NoProvider.to_string(),
            "Dialogs context was used without a provider"
        );
        assert_eq!(
            DialogError::NotFound(DialogId(3)).to_string(),
            "Dialog 'dialog-3' not found"
        );
    }
}
