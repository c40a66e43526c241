use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::dialog::{EditMode, LineEditor, SessionDialog};

/// Render the whole session dialog
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status bar
            Constraint::Min(5),    // Session list
            Constraint::Length(3), // Buttons
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_status_bar(frame, app, chunks[0]);
    render_session_list(frame, &app.dialog, chunks[1]);
    render_buttons(frame, &app.dialog, chunks[2]);
    render_help_bar(frame, &app.dialog, chunks[3]);

    if app.show_help {
        render_help_popup(frame);
    }

    if app.show_confirm_delete {
        render_confirm_delete(frame, &app.dialog);
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled("Sessions ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("| Current: "),
        Span::styled(
            app.dialog.current_name().to_string(),
            Style::default().fg(Color::Green),
        ),
        Span::raw(format!(" | {} total", app.dialog.entries().len())),
    ];
    if let Some(profile) = app.highlighted_profile() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("{} @ {} baud", profile.device, profile.baud_rate),
            Style::default().fg(Color::White),
        ));
    }
    let status_line = Line::from(spans);

    let content = if let Some(ref msg) = app.status_message {
        vec![
            status_line,
            Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Cyan))),
        ]
    } else {
        vec![status_line]
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_session_list(frame: &mut Frame, dialog: &SessionDialog, area: Rect) {
    let items: Vec<ListItem> = dialog
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let is_current = i == dialog.current();
            let marker = if is_current { "● " } else { "  " };
            let name_style = if is_current {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let mut spans = vec![Span::styled(marker, Style::default().fg(Color::Green))];
            match dialog.editor() {
                Some(editor) if entry.editable => spans.extend(editor_spans(editor)),
                _ => spans.push(Span::styled(entry.name.clone(), name_style)),
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let (border_color, title) = match dialog.mode() {
        EditMode::Renaming => (Color::Cyan, " Sessions [RENAMING - Enter to save, Esc to cancel] "),
        EditMode::Cloning => (Color::Cyan, " Sessions [CLONING - Enter to save, Esc to cancel] "),
        EditMode::Idle => (Color::Magenta, " Sessions "),
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(dialog.highlighted()));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Editor text with a block cursor, or fully reversed when all is selected
fn editor_spans(editor: &LineEditor) -> Vec<Span<'static>> {
    let reversed = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::REVERSED);

    if editor.is_all_selected() && !editor.text().is_empty() {
        return vec![Span::styled(editor.text().to_string(), reversed)];
    }

    let cursor = editor.cursor();
    let before: String = editor.text().chars().take(cursor).collect();
    let at = editor
        .text()
        .chars()
        .nth(cursor)
        .map(String::from)
        .unwrap_or_else(|| " ".to_string());
    let after: String = editor.text().chars().skip(cursor + 1).collect();

    vec![
        Span::styled(before, Style::default().fg(Color::Cyan)),
        Span::styled(at, reversed),
        Span::styled(after, Style::default().fg(Color::Cyan)),
    ]
}

fn render_buttons(frame: &mut Frame, dialog: &SessionDialog, area: Rect) {
    let buttons = dialog.buttons();
    let editing = dialog.is_editing();

    let button = |key: &'static str, label: &'static str, enabled: bool| {
        let style = if enabled && !editing {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        vec![
            Span::styled(format!("[{}] {}", key, label), style),
            Span::raw("  "),
        ]
    };

    let spans: Vec<Span> = [
        button("s", "Switch", buttons.switch),
        button("r", "Rename", buttons.rename),
        button("c", "Clone", buttons.clone),
        button("d", "Delete", buttons.delete),
    ]
    .into_iter()
    .flatten()
    .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .block(block)
            .alignment(Alignment::Center),
        area,
    );
}

fn render_help_bar(frame: &mut Frame, dialog: &SessionDialog, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = if dialog.is_editing() {
        vec![
            Span::styled(
                "Enter",
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::Cyan),
            ),
            Span::raw(":Save "),
            Span::styled("Esc", bold),
            Span::raw(":Cancel "),
            Span::styled("Ctrl-a", bold),
            Span::raw(":Select all"),
        ]
    } else {
        vec![
            Span::styled("q", bold),
            Span::raw(":Quit "),
            Span::styled("j/k", bold),
            Span::raw(":Nav "),
            Span::styled("Enter", bold),
            Span::raw(":Switch "),
            Span::styled("?", bold),
            Span::raw(":Help"),
        ]
    };

    let paragraph =
        Paragraph::new(Line::from(help_text)).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(paragraph, area);
}

fn render_help_popup(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());

    let help_content = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  q, Esc      Quit"),
        Line::from("  j, Down     Move selection down"),
        Line::from("  k, Up       Move selection up"),
        Line::from("  Enter, s    Switch to selected session"),
        Line::from("  r           Rename selected session"),
        Line::from("  c           Clone selected session"),
        Line::from("  d           Delete selected session"),
        Line::from("  ?           Toggle this help"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(help_content).block(block), area);
}

fn render_confirm_delete(frame: &mut Frame, dialog: &SessionDialog) {
    let area = centered_rect(40, 50, frame.area());

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Delete this session?",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            dialog.highlighted_name().to_string(),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Green)),
            Span::raw(": Yes  "),
            Span::styled("n", Style::default().fg(Color::Red)),
            Span::raw(": No"),
        ]),
    ];

    let block = Block::default()
        .title(" Confirm ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
