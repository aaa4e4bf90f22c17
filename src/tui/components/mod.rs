//! Reusable TUI components shared by the pages

pub mod dialogs;
pub mod notifications;
pub mod table;

pub use dialogs::{DialogHost, Dialogs};
pub use notifications::{NotificationHost, Notifications};
