use crate::api::{Shipment, VolunteerPage};
use crate::tui::components::dialogs::DialogEvent;
use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, warn};

/// Application events
#[derive(Debug)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Mouse input event
    Mouse(MouseEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// Periodic tick event
    Tick,

    /// Dialog stack changed
    Dialog(DialogEvent),

    /// Result of background work started by a page
    Page(PageMessage),

    /// Leave the application
    Quit,
}

/// Background results delivered back to the pages
#[derive(Debug)]
pub enum PageMessage {
    VolunteersLoaded(Result<VolunteerPage, String>),
    ShipmentsLoaded(Result<Vec<Shipment>, String>),
    /// Search text entered in the volunteers prompt
    SearchVolunteers(String),
    /// Reload the volunteers page after a change
    RefreshVolunteers,
    /// Reload the shipments page after a change
    RefreshShipments,
}

/// Merges terminal input, internal events and ticks into one stream
pub struct EventHandler {
    receiver: mpsc::UnboundedReceiver<Event>,
    sender: mpsc::UnboundedSender<Event>,
    ticker: Interval,
}

impl EventHandler {
    /// Must be called inside the tokio runtime
    pub fn new(tick_interval: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut ticker = tokio::time::interval_at(Instant::now() + tick_interval, tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            receiver,
            sender,
            ticker,
        }
    }

    /// Start reading terminal input on a dedicated thread
    pub fn start_input(&self) {
        let sender = self.sender.clone();
        std::thread::spawn(move || loop {
            let event = match crossterm::event::read() {
                Ok(event) => event,
                Err(err) => {
                    warn!(error = %err, "Failed to read terminal event");
                    break;
                }
            };
            if let Some(event) = convert_crossterm_event(event) {
                if sender.send(event).is_err() {
                    debug!("Event receiver dropped, stopping input thread");
                    break;
                }
            }
        });
    }

    /// Next event. Ticks fire on a fixed schedule and win over pending
    /// input, so a steady stream of mouse moves cannot starve them.
    pub async fn next(&mut self) -> Event {
        tokio::select! {
            biased;
            _ = self.ticker.tick() => Event::Tick,
            event = self.receiver.recv() => event.unwrap_or(Event::Tick),
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

/// Convert crossterm events, dropping key releases and repeats
fn convert_crossterm_event(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
        CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
        _ => None,
    }
}

/// Forward dialog events into the application event stream
pub fn forward_dialog_events(
    mut dialog_events: mpsc::UnboundedReceiver<DialogEvent>,
    sender: mpsc::UnboundedSender<Event>,
) {
    tokio::spawn(async move {
        while let Some(event) = dialog_events.recv().await {
            if sender.send(Event::Dialog(event)).is_err() {
                break;
            }
        }
    });
}
