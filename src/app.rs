use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};
use tracing::warn;

use crate::config::Config;
use crate::dialog::{SessionDialog, SessionEvent};
use crate::settings::{SessionProfile, SessionStore};

/// Application state: the dialog plus the store its events are applied to
pub struct App {
    pub dialog: SessionDialog,
    pub should_quit: bool,
    pub show_help: bool,
    pub show_confirm_delete: bool,
    pub status_message: Option<String>,
    status_set_at: Option<Instant>,
    status_timeout: Duration,
    store: SessionStore,
    confirm_delete: bool,
}

impl App {
    pub fn new(store: SessionStore, config: &Config) -> Self {
        let dialog = SessionDialog::new(&store);

        Self {
            dialog,
            should_quit: false,
            show_help: false,
            show_confirm_delete: false,
            status_message: None,
            status_set_at: None,
            status_timeout: Duration::from_secs(config.dialog.status_timeout),
            store,
            confirm_delete: config.dialog.confirm_delete,
        }
    }

    /// Stored profile of the highlighted entry; none for an unsaved clone
    pub fn highlighted_profile(&self) -> Option<SessionProfile> {
        self.store.profile(self.dialog.highlighted_name())
    }

    /// Dispatch a key press, then persist whatever the dialog emitted
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.show_confirm_delete {
            if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                self.dialog.remove_session();
            }
            self.show_confirm_delete = false;
        } else if self.show_help {
            self.show_help = false;
        } else if self.dialog.is_editing() {
            self.handle_edit_key(key);
        } else {
            self.handle_list_key(key);
        }

        self.sync();
    }

    pub fn handle_paste(&mut self, text: &str) {
        if let Some(editor) = self.dialog.editor_mut() {
            editor.insert_str(text);
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.dialog.select_next();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.dialog.select_previous();
            }
            KeyCode::Enter | KeyCode::Char('s') => {
                if self.dialog.buttons().switch {
                    self.dialog.switch_session();
                } else {
                    self.set_status("Already the current session");
                }
            }
            KeyCode::Char('r') => {
                if self.dialog.buttons().rename {
                    self.dialog.rename_session();
                } else {
                    self.set_status("The Default session can't be renamed");
                }
            }
            KeyCode::Char('c') => {
                self.dialog.clone_session();
            }
            KeyCode::Char('d') => {
                if !self.dialog.buttons().delete {
                    self.set_status("The Default session can't be deleted");
                } else if self.confirm_delete {
                    self.show_confirm_delete = true;
                } else {
                    self.dialog.remove_session();
                }
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.dialog.submit_edit();
                return;
            }
            KeyCode::Esc => {
                self.dialog.cancel_edit();
                return;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.dialog.cancel_edit();
                return;
            }
            _ => {}
        }

        let Some(editor) = self.dialog.editor_mut() else {
            return;
        };
        match key.code {
            KeyCode::Backspace => editor.backspace(),
            KeyCode::Delete => editor.delete(),
            KeyCode::Left => editor.move_left(),
            KeyCode::Right => editor.move_right(),
            KeyCode::Home => editor.home(),
            KeyCode::End => editor.end(),
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                editor.select_all()
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                editor.insert(c)
            }
            _ => {}
        }
    }

    /// Settle editor corrections and make emitted events permanent
    pub fn sync(&mut self) {
        self.dialog.pump_editor();

        let events = self.dialog.drain_events();
        if events.is_empty() {
            return;
        }

        let mut failed = false;
        for event in &events {
            match self.store.apply(event) {
                Ok(()) => self.set_status(describe(event)),
                Err(e) => {
                    warn!(?event, error = %e, "failed to apply session event");
                    self.set_status(format!("Error: {}", e));
                    failed = true;
                }
            }
        }

        if failed {
            self.reload_dialog();
        }

        if let Err(e) = self.store.save() {
            warn!(error = %e, "failed to save sessions");
            self.set_status(format!("Error: {}", e));
        }
    }

    /// Rebuild the list from the store so the two can't disagree
    fn reload_dialog(&mut self) {
        let highlighted = self.dialog.highlighted_name().to_string();
        self.dialog = SessionDialog::new(&self.store);
        if let Some(index) = self
            .dialog
            .entries()
            .iter()
            .position(|entry| entry.name == highlighted)
        {
            self.dialog.select(index);
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_set_at = Some(Instant::now());
    }

    /// Drop the status message once it has been shown for `status_timeout`
    pub fn clear_expired_status(&mut self, now: Instant) {
        let expired = self
            .status_set_at
            .is_some_and(|set_at| now.duration_since(set_at) >= self.status_timeout);
        if expired {
            self.status_message = None;
            self.status_set_at = None;
        }
    }
}

fn describe(event: &SessionEvent) -> String {
    match event {
        SessionEvent::Switched { name } => format!("Switched to session: {}", name),
        SessionEvent::Renamed { old, new } => format!("Renamed {} to {}", old, new),
        SessionEvent::Cloned { source, new } => format!("Cloned {} as {}", source, new),
        SessionEvent::Removed { name } => format!("Removed session: {}", name),
    }
}
