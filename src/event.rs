use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

/// Terminal input delivered to the dialog
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Text pasted while bracketed paste is on
    Paste(String),
    /// Status message timer elapsed
    Tick,
    /// Terminal was resized
    Resize,
}

/// Pumps crossterm events and ticks into a channel
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    _tx: mpsc::UnboundedSender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::spawn(async move {
            let mut tick_interval = tokio::time::interval(tick_rate);
            // The first tick fires immediately
            tick_interval.tick().await;

            loop {
                let event = tokio::select! {
                    _ = tick_interval.tick() => AppEvent::Tick,
                    _ = tokio::time::sleep(Duration::from_millis(50)) => {
                        match poll_terminal() {
                            Some(event) => event,
                            None => continue,
                        }
                    }
                };

                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, _tx: tx }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

fn poll_terminal() -> Option<AppEvent> {
    if !event::poll(Duration::from_millis(0)).unwrap_or(false) {
        return None;
    }
    match event::read().ok()? {
        // Windows also reports releases
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Paste(text) => Some(AppEvent::Paste(text)),
        Event::Resize(_, _) => Some(AppEvent::Resize),
        _ => None,
    }
}
