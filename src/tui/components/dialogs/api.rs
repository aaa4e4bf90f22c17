//! Imperative open/close API
//!
//! [`Dialogs`] is a cheap, cloneable handle that page code and spawned tasks
//! use to open dialogs and await their results:
//!
//! ```ignore
//! let confirmed = dialogs.confirm("Delete this record?", ConfirmOptions::new())?.await?;
//! ```

use super::{
    alert::{AlertDialog, AlertOptions},
    confirm::{ConfirmDialog, ConfirmOptions},
    manager::HostShared,
    prompt::{PromptDialog, PromptOptions},
    types::*,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Pending result of an opened dialog
///
/// The dialog is already on the stack when the handle is returned; awaiting
/// it only waits for the result. Dropping the handle leaves the dialog open
/// until the user acts on it or it is dismissed through its [`DialogRef`].
#[must_use = "the dialog stays open; await the handle to get its result"]
#[derive(Debug)]
pub struct DialogHandle<R> {
    id: DialogId,
    receiver: oneshot::Receiver<R>,
}

impl<R> DialogHandle<R> {
    pub fn id(&self) -> DialogId {
        self.id
    }

    /// Reference for closing or dismissing the dialog from elsewhere
    pub fn reference(&self) -> DialogRef<R> {
        DialogRef::new(self.id)
    }
}

impl<R> Future for DialogHandle<R> {
    type Output = DialogResult<R>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let id = self.id;
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.map_err(|_| DialogError::HostDropped(id)))
    }
}

/// Handle to a mounted [`DialogHost`](super::DialogHost)
#[derive(Clone)]
pub struct Dialogs {
    shared: Weak<HostShared>,
}

impl Dialogs {
    pub(super) fn attached(shared: Weak<HostShared>) -> Self {
        Self { shared }
    }

    /// A handle with no host behind it; every call fails with `NoProvider`
    pub fn detached() -> Self {
        Self { shared: Weak::new() }
    }

    /// Whether the host behind this handle is still mounted
    pub fn is_mounted(&self) -> bool {
        self.shared.strong_count() > 0
    }

    fn host(&self) -> DialogResult<Arc<HostShared>> {
        self.shared.upgrade().ok_or(DialogError::NoProvider)
    }

    /// Push `component` with `payload` on the stack
    pub fn open<D: DialogComponent>(
        &self,
        component: D,
        payload: D::Payload,
        options: OpenOptions<D::Output>,
    ) -> DialogResult<DialogHandle<D::Output>> {
        let host = self.host()?;
        let (id, receiver) = host.register(component, payload, options);
        Ok(DialogHandle { id, receiver })
    }

    /// Open a dialog whose payload can be left out
    pub fn open_default<D>(&self, component: D) -> DialogResult<DialogHandle<D::Output>>
    where
        D: DialogComponent,
        D::Payload: Default,
    {
        self.open(component, D::Payload::default(), OpenOptions::new())
    }

    /// Resolve a dialog from outside with `result`, running its `on_close`
    /// hook first. Returns the result it was given; if the dialog had already
    /// resolved, its earlier result stands.
    pub async fn close<R>(&self, dialog: DialogRef<R>, result: R) -> DialogResult<R>
    where
        R: Clone + Send + 'static,
    {
        let host = self.host()?;
        host.request_close(dialog.id(), result.clone()).await?;
        Ok(result)
    }

    /// Resolve a dialog with the result its body uses for dismissal
    pub async fn dismiss<R>(&self, dialog: DialogRef<R>) -> DialogResult<()> {
        let host = self.host()?;
        host.dismiss(dialog.id()).await.map(|_| ())
    }

    pub fn alert(
        &self,
        message: impl Into<String>,
        options: AlertOptions,
    ) -> DialogResult<DialogHandle<()>> {
        let (payload, open) = options.into_parts(message.into());
        self.open(AlertDialog, payload, open)
    }

    pub fn confirm(
        &self,
        message: impl Into<String>,
        options: ConfirmOptions,
    ) -> DialogResult<DialogHandle<bool>> {
        let (payload, open) = options.into_parts(message.into());
        self.open(ConfirmDialog::default(), payload, open)
    }

    pub fn prompt(
        &self,
        message: impl Into<String>,
        options: PromptOptions,
    ) -> DialogResult<DialogHandle<Option<String>>> {
        let (payload, open) = options.into_parts(message.into());
        self.open(PromptDialog::default(), payload, open)
    }
}

impl std::fmt::Debug for Dialogs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dialogs")
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::dialogs::DialogHost;
    use crate::tui::{styles::Theme, Frame};
    use crossterm::event::KeyEvent;
    use ratatui::layout::Rect;

    /// Dialog with a payload that may be omitted
    #[derive(Default)]
    struct Counter;

    impl DialogComponent for Counter {
        type Payload = Option<u8>;
        type Output = u8;

        fn render(
            &mut self,
            _frame: &mut Frame,
            _area: Rect,
            _theme: &Theme,
            _props: &DialogProps<'_, Option<u8>>,
        ) {
        }

        fn handle_key(
            &mut self,
            _key: KeyEvent,
            _props: &DialogProps<'_, Option<u8>>,
        ) -> DialogAction<u8> {
            DialogAction::None
        }

        fn dismissed(&self, payload: &Option<u8>) -> u8 {
            payload.unwrap_or_default()
        }
    }

    #[tokio::test]
    async fn test_detached_handle_has_no_provider() {
        let dialogs = Dialogs::detached();
        assert!(!dialogs.is_mounted());
        assert_eq!(
            dialogs.alert("Saved.", AlertOptions::new()).unwrap_err(),
            DialogError::NoProvider
        );
        assert_eq!(
            dialogs.close(DialogRef::<bool>::new(DialogId(1)), true).await.unwrap_err(),
            DialogError::NoProvider
        );
    }

    #[tokio::test]
    async fn test_open_default_uses_default_payload() {
        let host = DialogHost::new();
        let dialogs = host.dialogs();

        let handle = dialogs.open_default(Counter).unwrap();
        dialogs.dismiss(handle.reference()).await.unwrap();
        assert_eq!(handle.await.unwrap(), 0);

        let handle = dialogs.open(Counter, Some(4), OpenOptions::new()).unwrap();
        dialogs.dismiss(handle.reference()).await.unwrap();
        assert_eq!(handle.await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_unknown_dialog_is_not_found() {
        let host = DialogHost::new();
        let dialogs = host.dialogs();
        let stranger = DialogRef::<u8>::new(DialogId(500));

        assert_eq!(
            dialogs.close(stranger, 1).await.unwrap_err(),
            DialogError::NotFound(DialogId(500))
        );
    }

    #[tokio::test]
    async fn test_wrong_result_type_is_rejected() {
        let host = DialogHost::new();
        let dialogs = host.dialogs();
        let handle = dialogs.confirm("Sure?", ConfirmOptions::new()).unwrap();
        let wrong = DialogRef::<String>::new(handle.id());

        assert_eq!(
            dialogs.close(wrong, "yes".to_string()).await.unwrap_err(),
            DialogError::ResultTypeMismatch(handle.id())
        );
        assert_eq!(host.len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_handle_leaves_dialog_open() {
        let host = DialogHost::new();
        let dialogs = host.dialogs();

        let handle = dialogs.confirm("Orphan?", ConfirmOptions::new()).unwrap();
        let dialog = handle.reference();
        drop(handle);

        assert!(host.has_open_dialogs());
        assert!(dialogs.close(dialog, true).await.unwrap());
        assert!(!host.has_open_dialogs());
    }
}
