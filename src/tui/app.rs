use crate::api::{auth::NOT_ADMIN_MESSAGE, ApiClient, AuthStatus, AuthUser, SessionStore};
use crate::config::Config;
use crate::forms::{email_issue, validate_login};
use crate::tui::{
    components::{
        dialogs::{
            AlertOptions, ConfirmOptions, DialogHandle, DialogHost, HostConfig, PromptOptions,
        },
        notifications::NotificationHost,
    },
    events::{forward_dialog_events, Event, PageMessage},
    keys::KeyMap,
    pages::{
        shipments::ShipmentsPage, volunteers::VolunteersPage, PageContext, PageId, PageManager,
    },
    styles::Theme,
    Frame,
};
use anyhow::{bail, Result};
use crossterm::event::{KeyCode, KeyEvent};
use parking_lot::Mutex;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Paragraph, Tabs};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Main application state and controller
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Key mappings for the application
    pub key_map: KeyMap,

    /// Page manager for handling different screens
    pub page_manager: PageManager,

    /// Current theme for styling
    pub theme: Theme,

    dialogs: DialogHost,
    notifications: NotificationHost,
    ctx: PageContext,
    session: SessionStore,
}

impl App {
    /// Create the application; dialog lifecycle events are forwarded to `events`
    pub fn new(api: ApiClient, config: &Config, events: mpsc::UnboundedSender<Event>) -> Self {
        let (dialog_sender, dialog_receiver) = mpsc::unbounded_channel();
        forward_dialog_events(dialog_receiver, events.clone());

        let dialogs = DialogHost::with_config(
            HostConfig {
                exit_transition: config.exit_transition(),
                dim_background: true,
            },
            Some(dialog_sender),
        );
        let notifications = NotificationHost::new(config.notification_auto_hide());

        let ctx = PageContext {
            api,
            dialogs: dialogs.dialogs(),
            notifications: notifications.notifications(),
            events,
            page_size: config.page_size,
        };

        let mut page_manager = PageManager::new(vec![
            Box::new(VolunteersPage::new(config.page_size)),
            Box::new(ShipmentsPage::new(config.page_size)),
        ]);
        page_manager.enter_current(&ctx);

        Self {
            should_quit: false,
            key_map: KeyMap::default(),
            page_manager,
            theme: Theme::default(),
            dialogs,
            notifications,
            ctx,
            session: SessionStore::new(config.session_file()),
        }
    }

    /// Ask the server whether the restored session is live; sign in if not
    pub fn check_session(&self) {
        let ctx = self.ctx.clone();
        let session = self.session.clone();
        tokio::spawn(async move {
            match ctx.api.auth().status().await {
                Ok(AuthStatus {
                    authenticated: true,
                    user: Some(user),
                }) => {
                    info!(user = %user.email, admin = user.is_admin, "Session is live");
                    if !user.is_admin {
                        ctx.notify_error(NOT_ADMIN_MESSAGE);
                    }
                }
                Ok(_) => {
                    if let Err(err) = start_sign_in(&ctx, &session) {
                        warn!(error = %err, "Could not open sign-in");
                    }
                }
                Err(err) => ctx.notify_error(err.to_string()),
            }
        });
    }

    /// Handle incoming events. Returns true once the application should exit.
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key) => self.handle_key(key)?,
            Event::Mouse(mouse) => {
                self.dialogs.handle_mouse(mouse);
            }
            Event::Resize(width, height) => debug!(width, height, "Terminal resized"),
            Event::Tick => {
                self.dialogs.tick();
                self.notifications.tick();
            }
            Event::Dialog(event) => debug!(?event, "Dialog event"),
            Event::Page(message) => self.route_message(message),
            Event::Quit => {
                info!("Quit requested");
                self.should_quit = true;
            }
        }
        Ok(self.should_quit)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.key_map.force_quit.matches(&key) {
            self.should_quit = true;
            return Ok(());
        }

        // Open dialogs are modal
        if self.dialogs.handle_key(key) {
            return Ok(());
        }

        if self.key_map.sign_in.matches(&key) {
            start_sign_in(&self.ctx, &self.session)?;
        } else if self.key_map.quit.matches(&key) {
            self.confirm_quit()?;
        } else if self.key_map.help.matches(&key) {
            self.show_help()?;
        } else if self.key_map.next_page.matches(&key) {
            self.page_manager.cycle(1, &self.ctx);
        } else if self.key_map.previous_page.matches(&key) {
            self.page_manager.cycle(-1, &self.ctx);
        } else if key.code == KeyCode::Esc {
            self.notifications.close_current();
        } else if let Some(page) = self.page_manager.current_page_mut() {
            page.handle_key(key, &self.ctx)?;
        }
        Ok(())
    }

    fn confirm_quit(&self) -> Result<()> {
        let handle = self.ctx.dialogs.confirm(
            "Uygulamadan çıkmak istiyor musunuz?",
            ConfirmOptions::new()
                .title("Çıkış")
                .ok_text("Çık")
                .cancel_text("Vazgeç"),
        )?;
        let events = self.ctx.events.clone();
        tokio::spawn(async move {
            if let Ok(true) = handle.await {
                let _ = events.send(Event::Quit);
            }
        });
        Ok(())
    }

    fn show_help(&self) -> Result<()> {
        let page_keys = self
            .page_manager
            .current_page()
            .map(|page| page.help_text())
            .unwrap_or_default();
        let _ = self.ctx.dialogs.alert(
            self.key_map.help_text(&page_keys),
            AlertOptions::new().title("Yardım").ok_text("Kapat"),
        )?;
        Ok(())
    }

    fn route_message(&mut self, message: PageMessage) {
        let target = match &message {
            PageMessage::VolunteersLoaded(_)
            | PageMessage::SearchVolunteers(_)
            | PageMessage::RefreshVolunteers => PageId::Volunteers,
            PageMessage::ShipmentsLoaded(_) | PageMessage::RefreshShipments => PageId::Shipments,
        };
        match self.page_manager.page_mut(target) {
            Some(page) => page.handle_message(message, &self.ctx),
            None => debug!(?target, "No page for message"),
        }
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Tabs
                Constraint::Min(1),    // Page
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        self.render_tabs(frame, chunks[0]);
        if let Some(page) = self.page_manager.current_page_mut() {
            page.render(frame, chunks[1], &self.theme);
        }
        self.render_status_bar(frame, chunks[2]);

        self.notifications.render(frame, area, &self.theme);
        self.dialogs.render(frame, area, &self.theme);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let tabs = Tabs::new(self.page_manager.titles())
            .select(self.page_manager.current_index())
            .style(self.theme.dim_style())
            .highlight_style(
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            )
            .divider("│");
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status = Paragraph::new(format!(" ayika | {}", self.key_map.status_hint()))
            .style(self.theme.status_bar_style());
        frame.render_widget(status, area);
    }
}

/// Open the e-mail prompt of the sign-in; the password prompt follows from
/// a task once an address is accepted
fn start_sign_in(ctx: &PageContext, session: &SessionStore) -> Result<()> {
    let email_prompt = ctx.dialogs.prompt(
        "E-posta adresiniz",
        PromptOptions::new()
            .title("Oturum aç")
            .ok_text("Devam")
            .cancel_text("Vazgeç")
            .on_close(|email: Option<String>| async move {
                if let Some(message) = email.as_deref().and_then(email_issue) {
                    bail!("{}", message);
                }
                Ok(())
            }),
    )?;

    let ctx = ctx.clone();
    let session = session.clone();
    tokio::spawn(async move {
        if let Err(err) = finish_sign_in(email_prompt, &ctx, &session).await {
            warn!(error = %err, "Sign-in aborted");
        }
    });
    Ok(())
}

async fn finish_sign_in(
    email_prompt: DialogHandle<Option<String>>,
    ctx: &PageContext,
    session: &SessionStore,
) -> Result<()> {
    let Some(email) = email_prompt.await? else {
        return Ok(());
    };
    let email = email.trim().to_string();

    // The prompt stays open until the server accepts the password
    let signed_in: Arc<Mutex<Option<AuthUser>>> = Arc::default();
    let hook = {
        let api = ctx.api.clone();
        let session = session.clone();
        let signed_in = signed_in.clone();
        let email = email.clone();
        move |password: Option<String>| {
            let api = api.clone();
            let session = session.clone();
            let signed_in = signed_in.clone();
            let email = email.clone();
            async move {
                let Some(password) = password else {
                    return Ok(());
                };
                if let Some(message) = validate_login(&email, &password).message_for("password") {
                    bail!("{}", message);
                }
                let user = api.auth().login(&email, &password).await?;
                session.save(&api)?;
                *signed_in.lock() = Some(user);
                Ok(())
            }
        }
    };
    let password_prompt = ctx.dialogs.prompt(
        format!("{} için şifre", email),
        PromptOptions::new()
            .title("Oturum aç")
            .ok_text("Giriş")
            .cancel_text("Vazgeç")
            .masked()
            .on_close(hook),
    )?;
    password_prompt.await?;

    let Some(user) = signed_in.lock().take() else {
        return Ok(());
    };
    ctx.notify_success(format!("Hoş geldiniz, {}.", user.display_name()));
    if !user.is_admin {
        ctx.notify_error(NOT_ADMIN_MESSAGE);
    }
    ctx.send(PageMessage::RefreshVolunteers);
    ctx.send(PageMessage::RefreshShipments);
    Ok(())
}
