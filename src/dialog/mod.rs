//! Session dialog — pick, switch, rename, clone and delete named sessions
//!
//! The dialog owns the visible list and the button states. It never
//! touches persisted settings itself: every change is queued as a
//! [`SessionEvent`] that the owner drains and applies.

pub mod editor;
pub mod naming;

use std::iter;

use tracing::{debug, error};

use crate::settings::SettingsProvider;
pub use editor::LineEditor;
use naming::{disambiguate, is_default, DEFAULT_SESSION};

/// Notification emitted towards the owning application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Switched { name: String },
    Renamed { old: String, new: String },
    Cloned { source: String, new: String },
    Removed { name: String },
}

/// One row of the session list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub name: String,
    pub editable: bool,
}

impl SessionEntry {
    fn new(name: String) -> Self {
        Self {
            name,
            editable: false,
        }
    }
}

/// Edit in progress on the highlighted entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Idle,
    Renaming,
    Cloning,
}

/// Enabled state of the dialog's action buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buttons {
    pub switch: bool,
    pub rename: bool,
    pub delete: bool,
    pub clone: bool,
}

/// Session list state machine.
///
/// `current` is the entry the application runs with (drawn bold),
/// `highlighted` is merely the list selection. Both index `entries`.
pub struct SessionDialog {
    entries: Vec<SessionEntry>,
    highlighted: usize,
    current: usize,
    mode: EditMode,
    previous_text: String,
    editor: Option<LineEditor>,
    suppress_next_commit: bool,
    buttons: Buttons,
    events: Vec<SessionEvent>,
}

impl SessionDialog {
    /// Build the list from the settings: "Default" first, the rest sorted
    pub fn new(settings: &impl SettingsProvider) -> Self {
        let mut names: Vec<String> = settings
            .session_names()
            .into_iter()
            .filter(|name| !name.trim().is_empty() && !is_default(name))
            .collect();
        names.sort();
        names.dedup();

        let entries = iter::once(DEFAULT_SESSION.to_string())
            .chain(names)
            .map(SessionEntry::new)
            .collect();

        let mut dialog = Self {
            entries,
            highlighted: 0,
            current: 0,
            mode: EditMode::Idle,
            previous_text: String::new(),
            editor: None,
            suppress_next_commit: false,
            buttons: Buttons {
                switch: false,
                rename: false,
                delete: false,
                clone: true,
            },
            events: Vec::new(),
        };

        let current_name = settings.current_session_name();
        let current = match dialog.position(&current_name) {
            Some(index) => index,
            None => {
                debug!(session = %current_name, "current session not listed, marking Default");
                0
            }
        };
        dialog.selection_changed(current);
        dialog.current = current;
        dialog.buttons.switch = false;

        dialog
    }

    pub fn entries(&self) -> &[SessionEntry] {
        &self.entries
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn highlighted_name(&self) -> &str {
        &self.entries[self.highlighted].name
    }

    pub fn current_name(&self) -> &str {
        &self.entries[self.current].name
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode != EditMode::Idle
    }

    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    pub fn editor(&self) -> Option<&LineEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut LineEditor> {
        self.editor.as_mut()
    }

    /// Take all notifications emitted since the last call
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Move the selection. Ignored while an edit is open.
    pub fn select(&mut self, index: usize) {
        if self.is_editing() || index >= self.entries.len() || index == self.highlighted {
            return;
        }
        self.selection_changed(index);
    }

    pub fn select_next(&mut self) {
        self.select((self.highlighted + 1) % self.entries.len());
    }

    pub fn select_previous(&mut self) {
        let index = self
            .highlighted
            .checked_sub(1)
            .unwrap_or(self.entries.len() - 1);
        self.select(index);
    }

    fn selection_changed(&mut self, index: usize) {
        self.buttons.switch = index != self.current;

        let pinned = is_default(&self.entries[index].name);
        self.buttons.delete = !pinned;
        self.buttons.rename = !pinned;

        self.highlighted = index;
    }

    /// Finalize an inline edit with the editor's text.
    ///
    /// Duplicates are not rejected: the editor text is rewritten to the
    /// next free-looking suffix and the edit stays open.
    pub fn commit_edit(&mut self, raw_text: &str) {
        if self.suppress_next_commit {
            self.suppress_next_commit = false;
            debug!(text = raw_text, "ignoring commit from text correction");
            return;
        }

        let text = raw_text.trim();
        if text.is_empty() {
            debug!("empty session name, keeping editor open");
            return;
        }

        // A clone committed unchanged collides with its source. An
        // unchanged rename closes the editor: a terminal editor has no
        // focus-out, so leaving it open would trap the user in rename mode.
        if text == self.previous_text && self.mode != EditMode::Cloning {
            if self.mode == EditMode::Renaming {
                debug!(session = text, "rename left name unchanged");
                self.close_editor();
            }
            self.refresh_buttons();
            return;
        }

        let duplicate = self
            .entries
            .iter()
            .enumerate()
            .any(|(i, entry)| i != self.highlighted && entry.name == text);
        if duplicate {
            let Some(editor) = self.editor.as_mut() else {
                debug!(session = text, "duplicate name committed without an editor");
                return;
            };
            let replacement = disambiguate(text);
            debug!(from = text, to = %replacement, "session name taken, suggesting replacement");
            editor.replace_text(&replacement);
            editor.select_all();
            self.suppress_next_commit = true;
            return;
        }

        match self.mode {
            EditMode::Renaming => {
                self.entries[self.highlighted].name = text.to_string();
                self.close_editor();
                self.events.push(SessionEvent::Renamed {
                    old: self.previous_text.clone(),
                    new: text.to_string(),
                });
            }
            EditMode::Cloning => {
                self.entries[self.highlighted].name = text.to_string();
                self.close_editor();
                self.buttons.clone = true;
                self.events.push(SessionEvent::Cloned {
                    source: self.previous_text.clone(),
                    new: text.to_string(),
                });
            }
            EditMode::Idle => {
                error!(text, "edit committed with no rename or clone in progress");
            }
        }

        self.refresh_buttons();
    }

    /// Commit whatever the open editor currently holds
    pub fn submit_edit(&mut self) {
        if let Some(text) = self.editor.as_ref().map(|e| e.text().to_string()) {
            self.commit_edit(&text);
        }
    }

    /// Feed programmatic editor changes back through `commit_edit`
    pub fn pump_editor(&mut self) {
        while let Some(text) = self.editor.as_mut().and_then(LineEditor::take_echo) {
            self.commit_edit(&text);
        }
    }

    /// Abandon the open edit. A provisional clone entry is dropped.
    pub fn cancel_edit(&mut self) {
        match self.mode {
            EditMode::Idle => {}
            EditMode::Renaming => {
                debug!(session = %self.previous_text, "rename cancelled");
                self.close_editor();
                self.refresh_buttons();
            }
            EditMode::Cloning => {
                debug!(session = %self.previous_text, "clone cancelled");
                let provisional = self.highlighted;
                self.close_editor();
                self.entries.remove(provisional);
                self.buttons.clone = true;

                if self.current > provisional {
                    self.current -= 1;
                }
                let source = self.position(&self.previous_text).unwrap_or(self.current);
                self.selection_changed(source);
            }
        }
    }

    /// Make the highlighted entry the current session
    pub fn switch_session(&mut self) {
        if !self.allowed(self.buttons.switch, "switch") || self.highlighted == self.current {
            return;
        }

        self.buttons.switch = false;
        let name = self.highlighted_name().to_string();
        debug!(session = %name, "switching session");
        self.events.push(SessionEvent::Switched { name });
        self.current = self.highlighted;
    }

    /// Delete the highlighted entry, falling back to "Default" if it was current
    pub fn remove_session(&mut self) {
        if !self.allowed(self.buttons.delete, "delete") {
            return;
        }

        let removed = self.highlighted;
        let name = self.entries[removed].name.clone();
        debug!(session = %name, "removing session");
        self.events.push(SessionEvent::Removed { name });

        if removed == self.current {
            self.select(0);
            self.switch_session();
        } else {
            self.select(self.current);
            self.buttons.switch = false;
        }

        self.entries.remove(removed);
        if self.current > removed {
            self.current -= 1;
        }
        if self.highlighted > removed {
            self.highlighted -= 1;
        }
    }

    /// Append a copy of the highlighted entry and open its name for editing
    pub fn clone_session(&mut self) {
        if !self.allowed(self.buttons.clone, "clone") {
            return;
        }

        self.previous_text = self.highlighted_name().to_string();
        self.entries.push(SessionEntry {
            name: self.previous_text.clone(),
            editable: true,
        });
        self.select(self.entries.len() - 1);

        self.mode = EditMode::Cloning;
        self.buttons.clone = false;
        self.editor = Some(LineEditor::open(&self.previous_text));
        debug!(source = %self.previous_text, "cloning session");
    }

    /// Open the highlighted entry's name for editing
    pub fn rename_session(&mut self) {
        if !self.allowed(self.buttons.rename, "rename") {
            return;
        }

        self.previous_text = self.highlighted_name().to_string();
        self.entries[self.highlighted].editable = true;
        self.mode = EditMode::Renaming;
        self.buttons.rename = false;
        self.editor = Some(LineEditor::open(&self.previous_text));
        debug!(session = %self.previous_text, "renaming session");
    }

    fn allowed(&self, enabled: bool, action: &str) -> bool {
        if self.is_editing() {
            debug!(action, "action ignored while editing");
            return false;
        }
        if !enabled {
            debug!(action, "action disabled for current selection");
            return false;
        }
        true
    }

    fn close_editor(&mut self) {
        self.editor = None;
        self.suppress_next_commit = false;
        self.mode = EditMode::Idle;
        if let Some(entry) = self.entries.get_mut(self.highlighted) {
            entry.editable = false;
        }
    }

    fn refresh_buttons(&mut self) {
        if self.is_editing() {
            return;
        }
        self.selection_changed(self.highlighted);
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FakeSettings {
        names: Vec<String>,
        current: String,
    }

    impl SettingsProvider for FakeSettings {
        fn session_names(&self) -> Vec<String> {
            self.names.clone()
        }

        fn current_session_name(&self) -> String {
            self.current.clone()
        }
    }

    fn dialog(names: &[&str], current: &str) -> SessionDialog {
        SessionDialog::new(&FakeSettings {
            names: names.iter().map(|n| n.to_string()).collect(),
            current: current.to_string(),
        })
    }

    fn names(dialog: &SessionDialog) -> Vec<&str> {
        dialog.entries().iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_default_pinned_first_rest_sorted() {
        let d = dialog(&["zeta", "Default", "alpha", "Mid"], "Default");
        assert_eq!(names(&d), vec!["Default", "Mid", "alpha", "zeta"]);
    }

    #[test]
    fn test_default_present_when_settings_empty() {
        let d = dialog(&[], "Default");
        assert_eq!(names(&d), vec!["Default"]);
        assert_eq!(d.current(), 0);
    }

    #[test]
    fn test_duplicate_and_empty_names_dropped() {
        let d = dialog(&["b", "a", "b", "", "Default", "Default"], "a");
        assert_eq!(names(&d), vec!["Default", "a", "b"]);
    }

    #[test]
    fn test_current_session_marked() {
        let d = dialog(&["a", "b", "c"], "b");
        assert_eq!(d.current(), 2);
        assert_eq!(d.current_name(), "b");
        assert_eq!(d.highlighted(), 2);
        assert!(!d.buttons().switch);
        assert!(d.buttons().rename);
        assert!(d.buttons().delete);
        assert!(d.buttons().clone);
    }

    #[test]
    fn test_unknown_current_falls_back_to_default() {
        let d = dialog(&["a"], "gone");
        assert_eq!(d.current_name(), "Default");
        assert!(!d.buttons().rename);
        assert!(!d.buttons().delete);
    }

    #[test]
    fn test_selection_updates_buttons() {
        let mut d = dialog(&["a", "b"], "a");

        d.select(2);
        assert_eq!(d.highlighted_name(), "b");
        assert!(d.buttons().switch);
        assert!(d.buttons().rename);
        assert!(d.buttons().delete);

        d.select(0);
        assert!(d.buttons().switch);
        assert!(!d.buttons().rename);
        assert!(!d.buttons().delete);

        d.select(1);
        assert!(!d.buttons().switch);
    }

    #[test]
    fn test_select_wraps_around() {
        let mut d = dialog(&["a", "b"], "Default");
        d.select_previous();
        assert_eq!(d.highlighted_name(), "b");
        d.select_next();
        assert_eq!(d.highlighted_name(), "Default");
        d.select(10);
        assert_eq!(d.highlighted(), 0);
    }

    #[test]
    fn test_default_cannot_be_renamed_or_deleted() {
        let mut d = dialog(&["a"], "a");
        d.select(0);

        d.rename_session();
        assert_eq!(d.mode(), EditMode::Idle);
        assert!(d.editor().is_none());

        d.remove_session();
        assert_eq!(names(&d), vec!["Default", "a"]);
        assert!(d.drain_events().is_empty());
    }

    #[test]
    fn test_rename_emits_event() {
        let mut d = dialog(&["a", "b"], "b");
        d.select(1);
        d.rename_session();
        assert_eq!(d.mode(), EditMode::Renaming);
        assert!(d.entries()[1].editable);
        assert!(!d.buttons().rename);
        assert_eq!(d.editor().unwrap().text(), "a");

        d.commit_edit("bench");
        assert_eq!(
            d.drain_events(),
            vec![SessionEvent::Renamed {
                old: "a".to_string(),
                new: "bench".to_string()
            }]
        );
        assert_eq!(d.mode(), EditMode::Idle);
        assert!(d.editor().is_none());
        assert!(!d.entries()[1].editable);
        assert_eq!(names(&d), vec!["Default", "bench", "b"]);
        assert!(d.buttons().rename);
    }

    #[test]
    fn test_rename_of_current_keeps_it_current() {
        let mut d = dialog(&["a"], "a");
        d.rename_session();
        d.commit_edit("lab");
        assert_eq!(d.current_name(), "lab");
    }

    #[test]
    fn test_unchanged_rename_is_noop() {
        let mut d = dialog(&["a"], "a");
        d.rename_session();
        d.commit_edit("a");
        assert!(d.drain_events().is_empty());
        assert_eq!(d.mode(), EditMode::Idle);
        assert!(d.editor().is_none());
        assert!(d.buttons().rename);
    }

    #[test]
    fn test_duplicate_rename_is_suffixed() {
        let mut d = dialog(&["A", "A-1", "B"], "B");
        d.rename_session();

        d.commit_edit("A");
        assert_eq!(d.editor().unwrap().text(), "A-1");
        assert!(d.editor().unwrap().is_all_selected());
        assert_eq!(d.mode(), EditMode::Renaming);
        d.pump_editor();

        d.submit_edit();
        assert_eq!(d.editor().unwrap().text(), "A-2");
        d.pump_editor();
        assert!(d.drain_events().is_empty());

        d.submit_edit();
        assert_eq!(
            d.drain_events(),
            vec![SessionEvent::Renamed {
                old: "B".to_string(),
                new: "A-2".to_string()
            }]
        );
        assert_eq!(names(&d), vec!["Default", "A", "A-1", "A-2"]);
    }

    #[test]
    fn test_commit_after_correction_is_suppressed_once() {
        let mut d = dialog(&["A", "B"], "B");
        d.rename_session();
        d.commit_edit("A");

        d.commit_edit("A-1");
        assert!(d.drain_events().is_empty());
        assert_eq!(d.mode(), EditMode::Renaming);

        d.commit_edit("A-1");
        assert_eq!(d.drain_events().len(), 1);
        assert_eq!(d.mode(), EditMode::Idle);
    }

    #[test]
    fn test_rename_to_default_is_suffixed() {
        let mut d = dialog(&["a"], "a");
        d.rename_session();
        d.commit_edit("Default");
        assert_eq!(d.editor().unwrap().text(), "Default-1");
    }

    #[test]
    fn test_empty_commit_keeps_editor_open() {
        let mut d = dialog(&["a"], "a");
        d.rename_session();
        d.commit_edit("   ");
        assert_eq!(d.mode(), EditMode::Renaming);
        assert!(d.editor().is_some());
        assert!(d.drain_events().is_empty());
    }

    #[test]
    fn test_commit_without_edit_is_ignored() {
        let mut d = dialog(&["a"], "a");
        d.commit_edit("other");
        assert!(d.drain_events().is_empty());
        assert_eq!(names(&d), vec!["Default", "a"]);
    }

    #[test]
    fn test_switch_to_current_is_noop() {
        let mut d = dialog(&["a"], "a");
        assert!(!d.buttons().switch);
        d.switch_session();
        assert!(d.drain_events().is_empty());
        assert!(!d.buttons().switch);
    }

    #[test]
    fn test_switch_moves_current() {
        let mut d = dialog(&["a", "b"], "a");
        d.select(2);
        d.switch_session();
        assert_eq!(
            d.drain_events(),
            vec![SessionEvent::Switched {
                name: "b".to_string()
            }]
        );
        assert_eq!(d.current_name(), "b");
        assert!(!d.buttons().switch);
    }

    #[test]
    fn test_remove_current_switches_to_default() {
        let mut d = dialog(&["a", "b"], "b");
        d.remove_session();
        assert_eq!(
            d.drain_events(),
            vec![
                SessionEvent::Removed {
                    name: "b".to_string()
                },
                SessionEvent::Switched {
                    name: "Default".to_string()
                },
            ]
        );
        assert_eq!(names(&d), vec!["Default", "a"]);
        assert_eq!(d.current(), 0);
        assert_eq!(d.highlighted(), 0);
        assert!(!d.buttons().switch);
        assert!(!d.buttons().delete);
    }

    #[test]
    fn test_remove_other_reselects_current() {
        let mut d = dialog(&["a", "b", "c"], "c");
        d.select(1);
        d.remove_session();
        assert_eq!(
            d.drain_events(),
            vec![SessionEvent::Removed {
                name: "a".to_string()
            }]
        );
        assert_eq!(names(&d), vec!["Default", "b", "c"]);
        assert_eq!(d.current_name(), "c");
        assert_eq!(d.highlighted_name(), "c");
        assert!(!d.buttons().switch);
    }

    #[test]
    fn test_clone_emits_once() {
        let mut d = dialog(&["A"], "A");
        d.clone_session();
        assert_eq!(d.mode(), EditMode::Cloning);
        assert!(!d.buttons().clone);
        assert_eq!(names(&d), vec!["Default", "A", "A"]);
        assert_eq!(d.highlighted(), 2);
        assert!(d.entries()[2].editable);

        d.commit_edit("A-copy");
        assert_eq!(
            d.drain_events(),
            vec![SessionEvent::Cloned {
                source: "A".to_string(),
                new: "A-copy".to_string()
            }]
        );
        assert_eq!(d.mode(), EditMode::Idle);
        assert!(d.buttons().clone);
        assert!(d.buttons().switch);
        assert_eq!(names(&d), vec!["Default", "A", "A-copy"]);

        d.commit_edit("A-copy-2");
        assert!(d.drain_events().is_empty());
    }

    #[test]
    fn test_clone_unchanged_name_is_suffixed() {
        let mut d = dialog(&["A"], "A");
        d.clone_session();
        d.submit_edit();
        assert_eq!(d.editor().unwrap().text(), "A-1");
        d.pump_editor();
        d.submit_edit();
        assert_eq!(
            d.drain_events(),
            vec![SessionEvent::Cloned {
                source: "A".to_string(),
                new: "A-1".to_string()
            }]
        );
    }

    #[test]
    fn test_clone_of_default_becomes_renamable() {
        let mut d = dialog(&[], "Default");
        d.clone_session();
        d.commit_edit("bench");
        assert!(d.buttons().rename);
        assert!(d.buttons().delete);
    }

    #[test]
    fn test_cancel_clone_drops_provisional_entry() {
        let mut d = dialog(&["A", "B"], "B");
        d.select(1);
        d.clone_session();
        d.cancel_edit();
        assert_eq!(names(&d), vec!["Default", "A", "B"]);
        assert_eq!(d.highlighted_name(), "A");
        assert_eq!(d.current_name(), "B");
        assert_eq!(d.mode(), EditMode::Idle);
        assert!(d.buttons().clone);
        assert!(d.drain_events().is_empty());
    }

    #[test]
    fn test_cancel_rename_restores_entry() {
        let mut d = dialog(&["A"], "A");
        d.rename_session();
        d.editor_mut().unwrap().insert('x');
        d.cancel_edit();
        assert_eq!(names(&d), vec!["Default", "A"]);
        assert!(d.editor().is_none());
        assert!(d.buttons().rename);
    }

    #[test]
    fn test_actions_blocked_while_editing() {
        let mut d = dialog(&["A", "B"], "A");
        d.rename_session();
        d.select(2);
        d.remove_session();
        d.clone_session();
        assert_eq!(d.highlighted_name(), "A");
        assert_eq!(names(&d), vec!["Default", "A", "B"]);
        assert!(d.drain_events().is_empty());
    }
}
