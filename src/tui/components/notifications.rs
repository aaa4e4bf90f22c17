//! Snackbar notifications
//!
//! Works like the dialog host: one [`NotificationHost`] owns the queue and
//! renders it, cloneable [`Notifications`] handles push to it. Only the front
//! of the queue is visible; its auto-hide countdown starts when it becomes
//! visible.

use crate::tui::{styles::{Severity, Theme}, Frame};
use parking_lot::Mutex;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tracing::debug;

/// Identifies a queued notification
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationKey(String);

impl NotificationKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    fn generate() -> Self {
        Self(format!("notification-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum AutoHide {
    #[default]
    HostDefault,
    After(Duration),
    Never,
}

/// Options for `Notifications::show`
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    key: Option<NotificationKey>,
    severity: Option<Severity>,
    auto_hide: AutoHide,
}

impl ShowOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed key; showing a key that is already queued does nothing
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(NotificationKey::new(key));
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn auto_hide(mut self, duration: Duration) -> Self {
        self.auto_hide = AutoHide::After(duration);
        self
    }

    /// Keep the notification until it is closed
    pub fn persistent(mut self) -> Self {
        self.auto_hide = AutoHide::Never;
        self
    }
}

/// Notification errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    #[error("Notifications context was used without a provider")]
    NoProvider,
}

#[derive(Debug, Clone)]
struct Notification {
    key: NotificationKey,
    message: String,
    severity: Option<Severity>,
    auto_hide: Option<Duration>,
    shown_at: Option<Instant>,
}

/// The visible notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleNotification {
    pub key: NotificationKey,
    pub message: String,
    pub severity: Option<Severity>,
}

struct NotificationShared {
    queue: Mutex<VecDeque<Notification>>,
    default_auto_hide: Option<Duration>,
}

impl NotificationShared {
    fn show(&self, message: String, options: ShowOptions) -> NotificationKey {
        let key = options.key.unwrap_or_else(NotificationKey::generate);
        let mut queue = self.queue.lock();

        if queue.iter().any(|notification| notification.key == key) {
            debug!(%key, "Notification already queued");
            return key;
        }

        let auto_hide = match options.auto_hide {
            AutoHide::HostDefault => self.default_auto_hide,
            AutoHide::After(duration) => Some(duration),
            AutoHide::Never => None,
        };
        queue.push_back(Notification {
            key: key.clone(),
            message,
            severity: options.severity,
            auto_hide,
            shown_at: None,
        });
        activate_front(&mut queue, Instant::now());

        debug!(%key, queued = queue.len(), "Notification shown");
        key
    }

    fn close(&self, key: &NotificationKey) -> bool {
        let mut queue = self.queue.lock();
        let before = queue.len();
        queue.retain(|notification| &notification.key != key);
        let removed = queue.len() != before;
        if removed {
            activate_front(&mut queue, Instant::now());
        }
        removed
    }
}

/// Start the countdown of the front notification if it has not started
fn activate_front(queue: &mut VecDeque<Notification>, now: Instant) {
    if let Some(front) = queue.front_mut() {
        front.shown_at.get_or_insert(now);
    }
}

/// Owner of the notification queue
pub struct NotificationHost {
    shared: Arc<NotificationShared>,
}

impl NotificationHost {
    /// `default_auto_hide` applies to notifications shown without an explicit duration
    pub fn new(default_auto_hide: Option<Duration>) -> Self {
        Self {
            shared: Arc::new(NotificationShared {
                queue: Mutex::new(VecDeque::new()),
                default_auto_hide,
            }),
        }
    }

    pub fn notifications(&self) -> Notifications {
        Notifications {
            shared: Arc::downgrade(&self.shared),
        }
    }

    pub fn len(&self) -> usize {
        self.shared.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn current(&self) -> Option<VisibleNotification> {
        self.shared.queue.lock().front().map(|notification| VisibleNotification {
            key: notification.key.clone(),
            message: notification.message.clone(),
            severity: notification.severity,
        })
    }

    /// Close the visible notification
    pub fn close_current(&self) -> bool {
        match self.current() {
            Some(visible) => self.shared.close(&visible.key),
            None => false,
        }
    }

    /// Expire the visible notification once its auto-hide duration has passed
    pub fn tick(&self) -> Option<NotificationKey> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&self, now: Instant) -> Option<NotificationKey> {
        let mut queue = self.shared.queue.lock();
        activate_front(&mut queue, now);

        let front = queue.front()?;
        let expired = match (front.auto_hide, front.shown_at) {
            (Some(duration), Some(shown_at)) => now.saturating_duration_since(shown_at) >= duration,
            _ => false,
        };
        if !expired {
            return None;
        }

        let key = queue.pop_front().map(|notification| notification.key);
        activate_front(&mut queue, now);
        if let Some(key) = &key {
            debug!(%key, "Notification hidden");
        }
        key
    }

    /// Draw the visible notification as a snackbar at the bottom of `area`
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(visible) = self.current() else {
            return;
        };

        let width = (visible.message.chars().count() as u16)
            .saturating_add(4)
            .max(20)
            .min(area.width);
        let height = 3u16.min(area.height);
        let snackbar = Rect {
            x: area.x + area.width.saturating_sub(width) / 2,
            y: area.y + area.height.saturating_sub(height + 1),
            width,
            height,
        };

        let color = visible
            .severity
            .map(|severity| theme.severity_color(severity))
            .unwrap_or(theme.border_focused);

        frame.render_widget(Clear, snackbar);
        frame.render_widget(
            Paragraph::new(visible.message)
                .style(theme.status_bar_style())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                ),
            snackbar,
        );
    }
}

/// Handle to a mounted [`NotificationHost`]
#[derive(Clone, Debug)]
pub struct Notifications {
    shared: Weak<NotificationShared>,
}

impl Notifications {
    pub fn detached() -> Self {
        Self { shared: Weak::new() }
    }

    fn host(&self) -> Result<Arc<NotificationShared>, NotificationError> {
        self.shared.upgrade().ok_or(NotificationError::NoProvider)
    }

    /// Queue a notification and return its key
    pub fn show(
        &self,
        message: impl Into<String>,
        options: ShowOptions,
    ) -> Result<NotificationKey, NotificationError> {
        Ok(self.host()?.show(message.into(), options))
    }

    /// Remove a notification wherever it is in the queue
    pub fn close(&self, key: &NotificationKey) -> Result<bool, NotificationError> {
        Ok(self.host()?.close(key))
    }

    /// Shorthand for an error notification
    pub fn error(&self, message: impl Into<String>) -> Result<NotificationKey, NotificationError> {
        self.show(message, ShowOptions::new().severity(Severity::Error))
    }

    /// Shorthand for a success notification
    pub fn success(
        &self,
        message: impl Into<String>,
    ) -> Result<NotificationKey, NotificationError> {
        self.show(message, ShowOptions::new().severity(Severity::Success))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::dialogs::test_support::buffer_text;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_only_front_is_visible() {
        let host = NotificationHost::new(None);
        let notifications = host.notifications();

        notifications.show("Birinci", ShowOptions::new()).unwrap();
        notifications.show("İkinci", ShowOptions::new()).unwrap();

        assert_eq!(host.len(), 2);
        assert_eq!(host.current().unwrap().message, "Birinci");
        assert!(host.close_current());
        assert_eq!(host.current().unwrap().message, "İkinci");
    }

    #[test]
    fn test_fixed_key_is_not_duplicated() {
        let host = NotificationHost::new(None);
        let notifications = host.notifications();

        let first = notifications.show("Kaydedildi", ShowOptions::new().key("saved")).unwrap();
        let second = notifications.show("Kaydedildi", ShowOptions::new().key("saved")).unwrap();

        assert_eq!(first, second);
        assert_eq!(host.len(), 1);
    }

    #[test]
    fn test_generated_keys_are_unique() {
        let host = NotificationHost::new(None);
        let notifications = host.notifications();

        let a = notifications.show("a", ShowOptions::new()).unwrap();
        let b = notifications.show("a", ShowOptions::new()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_close_removes_queued_notification() {
        let host = NotificationHost::new(None);
        let notifications = host.notifications();

        notifications.show("front", ShowOptions::new()).unwrap();
        let queued = notifications.show("queued", ShowOptions::new()).unwrap();

        assert!(notifications.close(&queued).unwrap());
        assert!(!notifications.close(&queued).unwrap());
        assert_eq!(host.len(), 1);
    }

    #[test]
    fn test_countdown_starts_when_visible() {
        let host = NotificationHost::new(Some(Duration::from_secs(5)));
        let notifications = host.notifications();

        let first = notifications.show("first", ShowOptions::new()).unwrap();
        let second = notifications.show("second", ShowOptions::new()).unwrap();
        let start = Instant::now();

        assert_eq!(host.tick_at(start + Duration::from_secs(6)), Some(first));

        // The second one only now became visible
        assert_eq!(host.tick_at(start + Duration::from_secs(8)), None);
        assert_eq!(host.tick_at(start + Duration::from_secs(11)), Some(second));
        assert!(host.is_empty());
    }

    #[test]
    fn test_persistent_notification_stays() {
        let host = NotificationHost::new(Some(Duration::from_millis(10)));
        host.notifications()
            .show("Bağlantı yok", ShowOptions::new().persistent())
            .unwrap();

        assert_eq!(host.tick_at(Instant::now() + Duration::from_secs(60)), None);
        assert_eq!(host.len(), 1);
    }

    #[test]
    fn test_detached_handle_has_no_provider() {
        let host = NotificationHost::new(None);
        let notifications = host.notifications();
        drop(host);

        assert_eq!(
            notifications.error("boom").unwrap_err(),
            NotificationError::NoProvider
        );
        assert_eq!(
            Notifications::detached().success("ok").unwrap_err(),
            NotificationError::NoProvider
        );
    }

    #[test]
    fn test_render_snackbar() {
        let host = NotificationHost::new(None);
        host.notifications().success("Gönüllü güncellendi").unwrap();

        let mut terminal = Terminal::new(TestBackend::new(50, 10)).unwrap();
        terminal
            .draw(|frame| host.render(frame, frame.size(), &Theme::default()))
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Gönüllü güncellendi"));
    }
}
