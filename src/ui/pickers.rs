use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::app::App;
use crate::model::{ListEntry, PickerMode};
use crate::ui::constants::{
    EXPORT_HELP, IMPORT_HELP, PICKER_FOOTER_HEIGHT, PICKER_HEIGHT_PERCENT, PICKER_WIDTH_PERCENT,
    PROMPT_HELP,
};
use crate::ui::helpers::{centered_rect, draw_popup_frame, entry_item, list_state, truncate_text};

const FILENAME_LABEL: &str = "Filename: ";

pub(crate) fn draw_file_picker(frame: &mut Frame<'_>, app: &App) {
    let Some(picker) = app.file_picker.as_ref() else {
        return;
    };
    let area = centered_rect(PICKER_WIDTH_PERCENT, PICKER_HEIGHT_PERCENT, frame.area());
    let title = format!("Select file to {}", picker.mode.label());
    let border_style = match picker.mode {
        PickerMode::Import => Style::default().fg(Color::White),
        PickerMode::Export => Style::default().fg(Color::Green),
    };
    let inner = draw_popup_frame(frame, area, &title, border_style);

    let prompt_height = if picker.filename_prompt.is_some() { 1 } else { 0 };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(prompt_height),
                Constraint::Length(PICKER_FOOTER_HEIGHT),
            ]
            .as_ref(),
        )
        .split(inner);

    let width = inner.width as usize;
    let hidden = if picker.show_hidden { " (hidden shown)" } else { "" };
    let header = Paragraph::new(truncate_text(
        &format!("Dir: {}{hidden}", picker.cwd.display()),
        width,
    ))
    .style(Style::default().fg(Color::Gray));
    frame.render_widget(header, layout[0]);

    let entry_width = width.saturating_sub(2);
    let items: Vec<ListItem> = if picker.entries.is_empty() {
        vec![ListItem::new("Empty")]
    } else {
        picker
            .entries
            .iter()
            .map(|entry| entry_item(ListEntry::Filesystem(entry), entry_width))
            .collect()
    };
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol(Span::styled("> ", Style::default().fg(Color::White)));
    frame.render_stateful_widget(
        list,
        layout[1],
        &mut list_state(picker.selected, picker.entries.len()),
    );

    let footer_text = match (&picker.filename_prompt, picker.mode) {
        (Some(_), _) => PROMPT_HELP,
        (None, PickerMode::Import) => IMPORT_HELP,
        (None, PickerMode::Export) => EXPORT_HELP,
    };

    if let Some(name) = &picker.filename_prompt {
        let available = width.saturating_sub(FILENAME_LABEL.len() + 1);
        let shown = truncate_text(name, available);
        let prompt = Paragraph::new(Line::from(vec![
            Span::styled(FILENAME_LABEL, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(shown.clone()),
        ]));
        frame.render_widget(prompt, layout[2]);
        let cursor_x = layout[2].x + (FILENAME_LABEL.len() + shown.chars().count()) as u16;
        if cursor_x < layout[2].x + layout[2].width {
            frame.set_cursor_position((cursor_x, layout[2].y));
        }
    }

    let footer = Paragraph::new(truncate_text(footer_text, width))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, layout[3]);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::model::{DirEntry, FilePickerState, View};
    use crate::ui::helpers::buffer_text;

    fn picker(mode: PickerMode) -> FilePickerState {
        FilePickerState {
            mode,
            cwd: "/home/ops".into(),
            entries: vec![
                DirEntry::parent(),
                DirEntry::directory("backups"),
                DirEntry::file("servers.json"),
            ],
            selected: 2,
            show_hidden: false,
            filename_prompt: None,
        }
    }

    #[test]
    fn import_picker_lists_entries() {
        let mut app = App::for_test();
        app.view = View::FilePicker;
        app.file_picker = Some(picker(PickerMode::Import));
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|frame| draw_file_picker(frame, &app)).unwrap();
        let content = buffer_text(terminal.backend());
        assert!(content.contains("Select file to import"));
        assert!(content.contains("Dir: /home/ops"));
        assert!(content.contains("../"));
        assert!(content.contains("backups/"));
        assert!(content.contains("servers.json"));
        assert!(content.contains(IMPORT_HELP));
    }

    #[test]
    fn export_prompt_shows_typed_name() {
        let mut app = App::for_test();
        app.view = View::FilePicker;
        let mut state = picker(PickerMode::Export);
        state.filename_prompt = Some("team.json".to_string());
        app.file_picker = Some(state);
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|frame| draw_file_picker(frame, &app)).unwrap();
        let content = buffer_text(terminal.backend());
        assert!(content.contains("Select file to export"));
        assert!(content.contains("Filename: team.json"));
        assert!(content.contains(PROMPT_HELP));
    }
}
