mod auth;
mod input;
mod logs;
mod root;
mod shipments;
mod volunteers;

pub use auth::{LoginCommand, LogoutCommand, PasswordCommand, WhoamiCommand};
pub use logs::LogsCommand;
pub use root::{Cli, Commands};
pub use shipments::ShipmentsCommand;
pub use volunteers::VolunteersCommand;
