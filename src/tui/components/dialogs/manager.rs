//! Dialog host: the registry behind every `open` call
//!
//! The host is responsible for:
//! - Keeping the stack of dialog instances (insertion order = z-order)
//! - Resolving each instance's pending result exactly once
//! - Running the optional `on_close` hook before resolution
//! - Removing resolved instances once their exit transition has finished
//! - Routing keys and backdrop clicks to the topmost dialog and rendering the stack

use super::{
    api::Dialogs,
    layout::{contains_point, DialogLayout},
    types::*,
};
use crate::tui::{styles::Theme, Frame};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Clear},
};
use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Dialog host configuration
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// How long a resolved dialog stays on the stack for its exit transition.
    /// Zero removes instances as soon as they resolve.
    pub exit_transition: Duration,
    /// Dim whatever is behind open dialogs
    pub dim_background: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            exit_transition: Duration::from_millis(150),
            dim_background: true,
        }
    }
}

type ErasedResult = Box<dyn Any + Send>;
type ErasedCloser =
    fn(Arc<HostShared>, DialogId, ErasedResult) -> BoxFuture<'static, DialogResult<bool>>;

#[derive(Clone, Copy)]
struct InstanceView<'a> {
    open: bool,
    busy: bool,
    error: Option<&'a str>,
}

/// Object-safe view of a mounted `DialogComponent`
trait ErasedDialog: Send {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, view: InstanceView<'_>);
    fn handle_key(&mut self, key: KeyEvent, view: InstanceView<'_>) -> Option<ErasedResult>;
    fn dismissed(&self) -> ErasedResult;
    fn preferred_size(&self) -> (u16, u16);
}

struct Mounted<D: DialogComponent> {
    component: D,
    payload: D::Payload,
}

impl<D: DialogComponent> ErasedDialog for Mounted<D> {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, view: InstanceView<'_>) {
        let props = DialogProps {
            payload: &self.payload,
            open: view.open,
            busy: view.busy,
            error: view.error,
        };
        self.component.render(frame, area, theme, &props);
    }

    fn handle_key(&mut self, key: KeyEvent, view: InstanceView<'_>) -> Option<ErasedResult> {
        let props = DialogProps {
            payload: &self.payload,
            open: view.open,
            busy: view.busy,
            error: view.error,
        };
        match self.component.handle_key(key, &props) {
            DialogAction::Close(result) => Some(Box::new(result)),
            DialogAction::None => None,
        }
    }

    fn dismissed(&self) -> ErasedResult {
        Box::new(self.component.dismissed(&self.payload))
    }

    fn preferred_size(&self) -> (u16, u16) {
        self.component.preferred_size(&self.payload)
    }
}

/// Pending result of one instance
struct Resolver<R> {
    sender: Option<oneshot::Sender<R>>,
    on_close: Option<CloseHook<R>>,
}

fn close_erased<R: Clone + Send + 'static>(
    shared: Arc<HostShared>,
    id: DialogId,
    result: ErasedResult,
) -> BoxFuture<'static, DialogResult<bool>> {
    Box::pin(async move {
        let result = result
            .downcast::<R>()
            .map_err(|_| DialogError::ResultTypeMismatch(id))?;
        shared.request_close(id, *result).await
    })
}

struct DialogInstance {
    id: DialogId,
    body: Box<dyn ErasedDialog>,
    resolver: Box<dyn Any + Send>,
    closer: ErasedCloser,
    phase: DialogPhase,
    error: Option<String>,
    resolved_at: Option<Instant>,
    /// Area of the last render, used for backdrop hit-testing
    area: Option<Rect>,
}

impl DialogInstance {
    fn view(&self) -> InstanceView<'_> {
        InstanceView {
            open: self.phase.is_open(),
            busy: self.phase == DialogPhase::Closing,
            error: self.error.as_deref(),
        }
    }
}

#[derive(Default)]
struct HostState {
    stack: Vec<DialogInstance>,
}

impl HostState {
    fn find(&self, id: DialogId) -> Option<&DialogInstance> {
        self.stack.iter().find(|instance| instance.id == id)
    }

    fn find_mut(&mut self, id: DialogId) -> Option<&mut DialogInstance> {
        self.stack.iter_mut().find(|instance| instance.id == id)
    }

    /// Topmost instance that has not resolved yet
    fn top_open_index(&self) -> Option<usize> {
        self.stack.iter().rposition(|instance| instance.phase.is_open())
    }

    fn remove(&mut self, id: DialogId) -> bool {
        let before = self.stack.len();
        self.stack.retain(|instance| instance.id != id);
        self.stack.len() != before
    }
}

/// State shared between the host and the `Dialogs` handles
pub(super) struct HostShared {
    state: Mutex<HostState>,
    next_id: AtomicU64,
    config: HostConfig,
    events: Option<mpsc::UnboundedSender<DialogEvent>>,
}

impl HostShared {
    /// Push a new open instance and return its id and pending result
    pub(super) fn register<D: DialogComponent>(
        &self,
        component: D,
        payload: D::Payload,
        options: OpenOptions<D::Output>,
    ) -> (DialogId, oneshot::Receiver<D::Output>) {
        let id = DialogId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = oneshot::channel();

        let instance = DialogInstance {
            id,
            body: Box::new(Mounted { component, payload }),
            resolver: Box::new(Resolver {
                sender: Some(sender),
                on_close: options.on_close,
            }),
            closer: close_erased::<D::Output>,
            phase: DialogPhase::Open,
            error: None,
            resolved_at: None,
            area: None,
        };

        let depth = {
            let mut state = self.state.lock();
            state.stack.push(instance);
            state.stack.len()
        };

        debug!(%id, depth, "Dialog opened");
        self.emit(DialogEvent::Opened(id));
        (id, receiver)
    }

    /// Ask for an instance to close with `result`.
    ///
    /// Returns `Ok(true)` when this call resolved the dialog and `Ok(false)`
    /// when it was ignored because the dialog already resolved, was removed,
    /// or is still running the hook of an earlier request.
    pub(super) async fn request_close<R: Clone + Send + 'static>(
        &self,
        id: DialogId,
        result: R,
    ) -> DialogResult<bool> {
        let hook = {
            let mut state = self.state.lock();
            let Some(instance) = state.find_mut(id) else {
                return self.missing(id);
            };

            if instance.phase != DialogPhase::Open {
                debug!(%id, phase = ?instance.phase, "Ignoring close request");
                return Ok(false);
            }

            let resolver = instance
                .resolver
                .downcast_mut::<Resolver<R>>()
                .ok_or(DialogError::ResultTypeMismatch(id))?;

            let hook = resolver.on_close.clone();
            if hook.is_some() {
                instance.phase = DialogPhase::Closing;
                instance.error = None;
            }
            hook
        };

        if let Some(hook) = hook {
            if let Err(err) = hook(result.clone()).await {
                let message = err.to_string();
                {
                    let mut state = self.state.lock();
                    if let Some(instance) = state.find_mut(id) {
                        instance.phase = DialogPhase::Open;
                        instance.error = Some(message.clone());
                    }
                }

                warn!(%id, error = %message, "Dialog close hook failed, keeping it open");
                self.emit(DialogEvent::HookFailed(id, message.clone()));
                return Err(DialogError::HookFailed { id, message });
            }
        }

        self.resolve(id, result)
    }

    fn resolve<R: Send + 'static>(&self, id: DialogId, result: R) -> DialogResult<bool> {
        let (sender, removed) = {
            let mut state = self.state.lock();
            let Some(instance) = state.find_mut(id) else {
                return self.missing(id);
            };

            if instance.phase == DialogPhase::Resolved {
                return Ok(false);
            }

            let resolver = instance
                .resolver
                .downcast_mut::<Resolver<R>>()
                .ok_or(DialogError::ResultTypeMismatch(id))?;

            let sender = resolver.sender.take();
            instance.phase = DialogPhase::Resolved;
            instance.resolved_at = Some(Instant::now());

            let removed = self.config.exit_transition.is_zero() && state.remove(id);
            (sender, removed)
        };

        if let Some(sender) = sender {
            if sender.send(result).is_err() {
                debug!(%id, "Nobody is awaiting the dialog result");
            }
        }

        debug!(%id, "Dialog resolved");
        self.emit(DialogEvent::Resolved(id));
        if removed {
            self.emit(DialogEvent::Removed(id));
        }
        Ok(true)
    }

    /// Resolve an instance with the result its body reports for dismissal
    pub(super) async fn dismiss(self: &Arc<Self>, id: DialogId) -> DialogResult<bool> {
        let (closer, result) = {
            let state = self.state.lock();
            let Some(instance) = state.find(id) else {
                return self.missing(id);
            };
            if instance.phase != DialogPhase::Open {
                return Ok(false);
            }
            (instance.closer, instance.body.dismissed())
        };

        closer(Arc::clone(self), id, result).await
    }

    /// Phase 2 teardown: drop a resolved instance from the stack
    fn finalize_removal(&self, id: DialogId) -> bool {
        let removed = {
            let mut state = self.state.lock();
            match state.find(id) {
                Some(instance) if instance.phase == DialogPhase::Resolved => state.remove(id),
                Some(_) => {
                    debug!(%id, "Refusing to remove a dialog that has not resolved");
                    false
                }
                None => false,
            }
        };

        if removed {
            debug!(%id, "Dialog removed");
            self.emit(DialogEvent::Removed(id));
        }
        removed
    }

    /// Ids below `next_id` were issued by this host and have since been removed
    fn missing(&self, id: DialogId) -> DialogResult<bool> {
        if id.0 < self.next_id.load(Ordering::SeqCst) {
            debug!(%id, "Ignoring close request for a removed dialog");
            Ok(false)
        } else {
            Err(DialogError::NotFound(id))
        }
    }

    fn emit(&self, event: DialogEvent) {
        if let Some(sender) = &self.events {
            let _ = sender.send(event);
        }
    }
}

/// Owner of the dialog stack. Mount exactly one per application and hand out
/// [`Dialogs`] handles; once the host is dropped every handle reports
/// [`DialogError::NoProvider`] and pending dialogs resolve to
/// [`DialogError::HostDropped`].
pub struct DialogHost {
    shared: Arc<HostShared>,
}

impl DialogHost {
    /// Create a host with the default configuration
    pub fn new() -> Self {
        Self::with_config(HostConfig::default(), None)
    }

    /// Create a host, optionally reporting lifecycle events on `events`
    pub fn with_config(
        config: HostConfig,
        events: Option<mpsc::UnboundedSender<DialogEvent>>,
    ) -> Self {
        Self {
            shared: Arc::new(HostShared {
                state: Mutex::new(HostState::default()),
                next_id: AtomicU64::new(1),
                config,
                events,
            }),
        }
    }

    /// Handle for opening and closing dialogs on this host
    pub fn dialogs(&self) -> Dialogs {
        Dialogs::attached(Arc::downgrade(&self.shared))
    }

    /// Number of instances on the stack, including ones in their exit transition
    pub fn len(&self) -> usize {
        self.shared.state.lock().stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids on the stack, bottom first
    pub fn ids(&self) -> Vec<DialogId> {
        self.shared.state.lock().stack.iter().map(|instance| instance.id).collect()
    }

    pub fn phase(&self, id: DialogId) -> Option<DialogPhase> {
        self.shared.state.lock().find(id).map(|instance| instance.phase)
    }

    /// Message of the last failed `on_close` hook of an instance
    pub fn error(&self, id: DialogId) -> Option<String> {
        self.shared
            .state
            .lock()
            .find(id)
            .and_then(|instance| instance.error.clone())
    }

    /// Whether any dialog still waits for the user
    pub fn has_open_dialogs(&self) -> bool {
        self.shared
            .state
            .lock()
            .stack
            .iter()
            .any(|instance| instance.phase.is_open())
    }

    /// Remove a resolved instance. Called by the render layer once its exit
    /// transition has finished; open instances are never removed.
    pub fn finalize_removal(&self, id: DialogId) -> bool {
        self.shared.finalize_removal(id)
    }

    /// Remove every resolved instance whose exit transition has elapsed
    pub fn tick(&self) -> Vec<DialogId> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&self, now: Instant) -> Vec<DialogId> {
        let transition = self.shared.config.exit_transition;
        let expired: Vec<DialogId> = {
            let state = self.shared.state.lock();
            state
                .stack
                .iter()
                .filter(|instance| {
                    instance
                        .resolved_at
                        .is_some_and(|at| now.saturating_duration_since(at) >= transition)
                })
                .map(|instance| instance.id)
                .collect()
        };

        expired
            .into_iter()
            .filter(|id| self.shared.finalize_removal(*id))
            .collect()
    }

    /// Route a key to the topmost open dialog. Escape dismisses it.
    /// Returns true when a dialog consumed the key.
    pub fn handle_key(&self, key: KeyEvent) -> bool {
        let request = {
            let mut state = self.shared.state.lock();
            let Some(index) = state.top_open_index() else {
                return false;
            };
            let instance = &mut state.stack[index];

            if key.code == KeyCode::Esc && key.modifiers.is_empty() {
                (instance.phase == DialogPhase::Open)
                    .then(|| (instance.id, instance.closer, instance.body.dismissed()))
            } else {
                let view = InstanceView {
                    open: true,
                    busy: instance.phase == DialogPhase::Closing,
                    error: instance.error.as_deref(),
                };
                instance
                    .body
                    .handle_key(key, view)
                    .map(|result| (instance.id, instance.closer, result))
            }
        };

        if let Some((id, closer, result)) = request {
            self.spawn_close(id, closer, result);
        }
        true
    }

    /// A left click outside the topmost dialog is a backdrop dismissal.
    /// Returns true while dialogs are open, since they are modal.
    pub fn handle_mouse(&self, event: MouseEvent) -> bool {
        let request = {
            let state = self.shared.state.lock();
            let Some(index) = state.top_open_index() else {
                return false;
            };
            let instance = &state.stack[index];

            let outside = instance
                .area
                .is_some_and(|area| !contains_point(area, event.column, event.row));
            let clicked = matches!(event.kind, MouseEventKind::Down(MouseButton::Left));

            (clicked && outside && instance.phase == DialogPhase::Open)
                .then(|| (instance.id, instance.closer, instance.body.dismissed()))
        };

        if let Some((id, closer, result)) = request {
            debug!(%id, "Backdrop click dismisses dialog");
            self.spawn_close(id, closer, result);
        }
        true
    }

    fn spawn_close(&self, id: DialogId, closer: ErasedCloser, result: ErasedResult) {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            if let Err(err) = closer(shared, id, result).await {
                debug!(%id, error = %err, "Close request did not resolve the dialog");
            }
        });
    }

    /// Render the stack in z-order over a dimmed backdrop
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut state = self.shared.state.lock();
        if state.stack.is_empty() {
            return;
        }

        let dim = Style::default().add_modifier(Modifier::DIM);
        if self.shared.config.dim_background && state.stack.iter().any(|i| i.phase.is_open()) {
            frame.render_widget(Block::default().style(dim), area);
        }

        for (depth, instance) in state.stack.iter_mut().enumerate() {
            let layout = DialogLayout::centered(area, instance.body.preferred_size(), depth as u16);
            instance.area = Some(layout.dialog_area);

            frame.render_widget(Clear, layout.dialog_area);
            let open = instance.phase.is_open();
            let view = InstanceView {
                open,
                busy: instance.phase == DialogPhase::Closing,
                error: instance.error.as_deref(),
            };
            instance.body.render(frame, layout.dialog_area, theme, view);

            // Exit transition
            if !open {
                frame.buffer_mut().set_style(layout.dialog_area, dim);
            }
        }
    }
}

impl Default for DialogHost {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::dialogs::test_support::{buffer_text, key};
    use ratatui::{backend::TestBackend, widgets::{Borders, Paragraph}, Terminal};
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// Minimal body: Enter closes with the payload, Escape dismisses with 0
    struct EchoDialog;

    impl DialogComponent for EchoDialog {
        type Payload = u32;
        type Output = u32;

        fn render(
            &mut self,
            frame: &mut Frame,
            area: Rect,
            _theme: &Theme,
            props: &DialogProps<'_, u32>,
        ) {
            let text = match props.error {
                Some(error) => format!("echo {} ({error})", props.payload),
                None => format!("echo {}", props.payload),
            };
            frame.render_widget(
                Paragraph::new(text).block(Block::default().borders(Borders::ALL)),
                area,
            );
        }

        fn handle_key(&mut self, key: KeyEvent, props: &DialogProps<'_, u32>) -> DialogAction<u32> {
            match key.code {
                KeyCode::Enter if props.interactive() => DialogAction::Close(*props.payload),
                _ => DialogAction::None,
            }
        }

        fn dismissed(&self, _payload: &u32) -> u32 {
            0
        }

        fn preferred_size(&self, _payload: &u32) -> (u16, u16) {
            (20, 3)
        }
    }

    fn instant_host() -> DialogHost {
        DialogHost::with_config(
            HostConfig {
                exit_transition: Duration::ZERO,
                dim_background: false,
            },
            None,
        )
    }

    #[tokio::test]
    async fn test_stack_grows_with_each_open() {
        let host = DialogHost::new();
        let dialogs = host.dialogs();

        let handles: Vec<_> = (0..5)
            .map(|n| dialogs.open(EchoDialog, n, OpenOptions::new()).unwrap())
            .collect();

        assert_eq!(host.len(), 5);
        let ids = host.ids();
        assert_eq!(ids, handles.iter().map(|h| h.id()).collect::<Vec<_>>());
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[tokio::test]
    async fn test_close_resolves_exactly_once() {
        let host = DialogHost::new();
        let dialogs = host.dialogs();

        let handle = dialogs.open(EchoDialog, 7, OpenOptions::new()).unwrap();
        let dialog = handle.reference();

        assert_eq!(dialogs.close(dialog, 11).await.unwrap(), 11);
        // Second close is ignored, the first value wins
        assert_eq!(dialogs.close(dialog, 99).await.unwrap(), 99);

        assert_eq!(handle.await.unwrap(), 11);
        assert_eq!(host.phase(dialog.id()), Some(DialogPhase::Resolved));
    }

    #[tokio::test]
    async fn test_resolved_dialog_waits_for_transition() {
        let host = DialogHost::new();
        let dialogs = host.dialogs();

        let handle = dialogs.open(EchoDialog, 1, OpenOptions::new()).unwrap();
        let id = handle.id();
        dialogs.close(handle.reference(), 1).await.unwrap();

        // Resolution does not remove the instance
        assert_eq!(host.len(), 1);
        assert!(host.tick_at(Instant::now()).is_empty());

        let later = Instant::now() + Duration::from_secs(1);
        assert_eq!(host.tick_at(later), vec![id]);
        assert!(host.is_empty());
        assert_eq!(handle.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_zero_transition_removes_on_resolve() {
        let host = instant_host();
        let dialogs = host.dialogs();

        let handle = dialogs.open(EchoDialog, 4, OpenOptions::new()).unwrap();
        dialogs.close(handle.reference(), 4).await.unwrap();
        assert!(host.is_empty());

        // Closing a removed dialog is a no-op
        assert_eq!(dialogs.close(handle.reference(), 5).await.unwrap(), 5);
        assert_eq!(handle.await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_finalize_removal_requires_resolution() {
        let host = DialogHost::new();
        let dialogs = host.dialogs();

        let handle = dialogs.open(EchoDialog, 2, OpenOptions::new()).unwrap();
        assert!(!host.finalize_removal(handle.id()));
        assert_eq!(host.len(), 1);

        dialogs.close(handle.reference(), 2).await.unwrap();
        assert!(host.finalize_removal(handle.id()));
        assert!(host.is_empty());
    }

    #[tokio::test]
    async fn test_hook_blocks_close_until_done() {
        let host = DialogHost::new();
        let dialogs = host.dialogs();
        let gate = Arc::new(Notify::new());

        let hook_gate = Arc::clone(&gate);
        let options = OpenOptions::new().on_close(move |_result: u32| {
            let gate = Arc::clone(&hook_gate);
            async move {
                gate.notified().await;
                Ok::<_, anyhow::Error>(())
            }
        });
        let handle = dialogs.open(EchoDialog, 3, options).unwrap();
        let dialog = handle.reference();

        let closer = {
            let dialogs = dialogs.clone();
            tokio::spawn(async move { dialogs.close(dialog, 3).await })
        };
        tokio::task::yield_now().await;
        assert_eq!(host.phase(dialog.id()), Some(DialogPhase::Closing));

        // A concurrent request while the hook runs is ignored
        assert_eq!(dialogs.close(dialog, 42).await.unwrap(), 42);

        gate.notify_one();
        closer.await.unwrap().unwrap();
        assert_eq!(host.phase(dialog.id()), Some(DialogPhase::Resolved));
        assert_eq!(handle.await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_failed_hook_keeps_dialog_open_for_retry() {
        let host = DialogHost::new();
        let dialogs = host.dialogs();
        let attempts = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&attempts);
        let options = OpenOptions::new().on_close(move |_result: u32| {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    anyhow::bail!("Kayıt başarısız");
                }
                Ok::<_, anyhow::Error>(())
            }
        });
        let handle = dialogs.open(EchoDialog, 8, options).unwrap();
        let dialog = handle.reference();

        let err = dialogs.close(dialog, 8).await.unwrap_err();
        assert_eq!(
            err,
            DialogError::HookFailed {
                id: dialog.id(),
                message: "Kayıt başarısız".to_string()
            }
        );
        assert_eq!(host.phase(dialog.id()), Some(DialogPhase::Open));
        assert_eq!(host.error(dialog.id()).as_deref(), Some("Kayıt başarısız"));

        dialogs.close(dialog, 8).await.unwrap();
        assert_eq!(host.error(dialog.id()), None);
        assert_eq!(handle.await.unwrap(), 8);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_keys_go_to_topmost_dialog() {
        let host = instant_host();
        let dialogs = host.dialogs();

        let first = dialogs.open(EchoDialog, 1, OpenOptions::new()).unwrap();
        let second = dialogs.open(EchoDialog, 2, OpenOptions::new()).unwrap();

        assert!(host.handle_key(key(KeyCode::Enter)));
        assert_eq!(second.await.unwrap(), 2);

        // The first dialog is unaffected until it gets its own key
        assert_eq!(host.phase(first.id()), Some(DialogPhase::Open));
        assert!(host.handle_key(key(KeyCode::Esc)));
        assert_eq!(first.await.unwrap(), 0);
        assert!(!host.handle_key(key(KeyCode::Enter)));
    }

    #[tokio::test]
    async fn test_backdrop_click_dismisses() {
        let host = instant_host();
        let dialogs = host.dialogs();
        let handle = dialogs.open(EchoDialog, 5, OpenOptions::new()).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal
            .draw(|frame| host.render(frame, frame.size(), &Theme::default()))
            .unwrap();

        let inside = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 20,
            row: 4,
            modifiers: crossterm::event::KeyModifiers::NONE,
        };
        assert!(host.handle_mouse(inside));
        assert_eq!(host.phase(handle.id()), Some(DialogPhase::Open));

        let outside = MouseEvent {
            column: 0,
            row: 0,
            ..inside
        };
        assert!(host.handle_mouse(outside));
        assert_eq!(handle.await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_events_are_reported() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let host = DialogHost::with_config(HostConfig::default(), Some(tx));
        let dialogs = host.dialogs();

        let handle = dialogs.open(EchoDialog, 1, OpenOptions::new()).unwrap();
        let id = handle.id();
        dialogs.close(handle.reference(), 1).await.unwrap();
        host.finalize_removal(id);

        assert_eq!(rx.recv().await, Some(DialogEvent::Opened(id)));
        assert_eq!(rx.recv().await, Some(DialogEvent::Resolved(id)));
        assert_eq!(rx.recv().await, Some(DialogEvent::Removed(id)));
    }

    #[tokio::test]
    async fn test_dropping_host_fails_pending_and_new_dialogs() {
        let host = DialogHost::new();
        let dialogs = host.dialogs();
        let handle = dialogs.open(EchoDialog, 1, OpenOptions::new()).unwrap();
        let id = handle.id();

        drop(host);

        assert_eq!(handle.await.unwrap_err(), DialogError::HostDropped(id));
        assert_eq!(
            dialogs.open(EchoDialog, 2, OpenOptions::new()).unwrap_err(),
            DialogError::NoProvider
        );
    }

    #[tokio::test]
    async fn test_render_draws_stack_with_hook_error() {
        let host = DialogHost::new();
        let dialogs = host.dialogs();
        let options = OpenOptions::new()
            .on_close(|_result: u32| async { Err::<(), _>(anyhow::anyhow!("boom")) });
        let handle = dialogs.open(EchoDialog, 9, options).unwrap();
        let _ = dialogs.close(handle.reference(), 9).await;

        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal
            .draw(|frame| host.render(frame, frame.size(), &Theme::default()))
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("echo 9 (boom)"));
    }
}
