use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

use super::{
    LoginCommand, LogoutCommand, LogsCommand, PasswordCommand, ShipmentsCommand,
    VolunteersCommand, WhoamiCommand,
};
use crate::config::Config;
use crate::{logging, tui};

/// ayika - terminal console for the volunteer and cargo relief backend
#[derive(Debug, Parser)]
#[command(
    name = "ayika",
    version,
    about = "Terminal console for the volunteer and cargo relief backend",
    long_about = r#"ayika manages volunteers and cargo shipments of a disaster relief backend.
Without a subcommand it starts the interactive console.

Most commands need an admin session; `ayika login` saves one for later runs.

Examples:
  ayika login --email admin@example.org   # Sign in, asking for the password
  ayika                                   # Start the interactive console
  ayika volunteers list --city hatay      # One page of volunteers in Hatay
  ayika shipments track KRG000042         # Look up a shipment
  ayika logs --tail 50 --level error      # Recent errors of the console"#
)]
pub struct Cli {
    /// Current working directory
    #[arg(short = 'c', long = "cwd", global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and save the session
    Login(LoginCommand),
    /// Log out and forget the saved session
    Logout(LogoutCommand),
    /// Show the logged in account
    Whoami(WhoamiCommand),
    /// Change the password of the logged in account
    Password(PasswordCommand),
    /// Query and update volunteers
    Volunteers(VolunteersCommand),
    /// Query and update cargo shipments
    Shipments(ShipmentsCommand),
    /// View the interactive console's logs
    Logs(LogsCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if let Some(cwd) = &self.cwd {
            std::env::set_current_dir(cwd).map_err(|e| {
                anyhow::anyhow!("Failed to change directory to {}: {}", cwd.display(), e)
            })?;
        }

        let config = Config::init().await?;

        // The terminal belongs to the console, so it logs to a file
        let log_file = self.command.is_none().then(|| config.log_file());
        logging::init(self.debug, log_file.as_deref())?;
        debug!(?config, "Configuration initialized");
        if let Some(cwd) = &self.cwd {
            info!("Changed working directory to: {}", cwd.display());
        }

        // Reading logs needs no backend
        if !matches!(self.command, Some(Commands::Logs(_))) {
            config.validate()?;
        }

        match &self.command {
            Some(Commands::Logs(command)) => command.execute(&config).await,
            Some(Commands::Login(command)) => command.execute(&config).await,
            Some(Commands::Logout(command)) => command.execute(&config).await,
            Some(Commands::Whoami(command)) => command.execute(&config).await,
            Some(Commands::Password(command)) => command.execute(&config).await,
            Some(Commands::Volunteers(command)) => command.execute(&config).await,
            Some(Commands::Shipments(command)) => command.execute(&config).await,
            None => {
                info!("Starting interactive mode");
                tui::run(&config).await?;
                info!("Application finished");
                Ok(())
            }
        }
    }
}
