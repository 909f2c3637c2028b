use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph, Wrap};

use crate::app::App;
use crate::app::constants::MENU_OPTIONS;
use crate::model::{FormField, View};
use crate::ui::constants::{
    KEY_EDITOR_HEIGHT_PERCENT, KEY_EDITOR_WIDTH_PERCENT, LABEL_WIDTH, MENU_WIDTH,
    MODAL_MIN_WIDTH, MODAL_WIDTH_PERCENT,
};
use crate::ui::helpers::{
    action_line, centered_rect, centered_rect_abs, draw_popup_frame, field_line, list_state,
    modal_height,
};

/// What the key field shows inline; multi-line keys are summarized.
fn key_field_display(value: &str) -> String {
    if value.contains('\n') {
        let lines = value.trim_end_matches('\n').lines().count();
        format!("<{lines} lines> Ctrl+E to edit")
    } else {
        value.to_string()
    }
}

pub(crate) fn draw_profile_form(frame: &mut Frame<'_>, app: &App) {
    let form = &app.form;
    let footer = vec![Line::from(vec![
        Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" or "),
        Span::styled("Up/Down", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" to move, "),
        Span::styled("Ctrl+E", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" on Key for the editor, "),
        Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" to cancel"),
    ])];

    let area_width = (frame.area().width.saturating_mul(MODAL_WIDTH_PERCENT) / 100)
        .min(frame.area().width.saturating_sub(2))
        .max(MODAL_MIN_WIDTH);
    let content_width = area_width.saturating_sub(4);
    let value_width = content_width.saturating_sub(2 + LABEL_WIDTH as u16 + 2) as usize;

    let mut lines = Vec::new();
    let mut cursor = None;
    for (row, field) in FormField::ALL.iter().copied().enumerate() {
        let active = form.active_field == field;
        if field == FormField::Submit {
            lines.push(Line::from(""));
            lines.push(action_line(field.label(), active));
            continue;
        }
        let value = match field {
            FormField::PrivateKey => key_field_display(form.value(field)),
            _ => form.value(field).to_string(),
        };
        if active && !(field == FormField::PrivateKey && form.pem_key.contains('\n')) {
            cursor = Some((row, value.chars().count().min(value_width)));
        }
        lines.push(field_line(
            field.label(),
            &value,
            active,
            field == FormField::Password,
            LABEL_WIDTH,
            value_width,
        ));
    }

    let title = if app.view == View::EditProfile {
        "Edit server"
    } else {
        "Add server"
    };
    let height = modal_height(lines.len(), footer.len());
    let area = centered_rect_abs(area_width, height, frame.area());
    let inner = draw_popup_frame(frame, area, title, Style::default().fg(Color::White));
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(footer.len() as u16)].as_ref())
        .split(inner);
    frame.render_widget(Paragraph::new(lines), layout[0]);
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().fg(Color::Gray)),
        layout[1],
    );

    if let Some((row, col)) = cursor {
        render_form_cursor(frame, layout[0], row, col);
    }
}

fn render_form_cursor(frame: &mut Frame<'_>, area: Rect, row: usize, col: usize) {
    if row >= area.height as usize {
        return;
    }
    let indicator_len = 2u16;
    let label_len = LABEL_WIDTH as u16 + 2;
    let cursor_x = area.x + indicator_len + label_len + col as u16;
    let cursor_y = area.y + row as u16;
    if cursor_x < area.x + area.width {
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

pub(crate) fn draw_key_editor(frame: &mut Frame<'_>, app: &App) {
    let Some(editor) = app.key_editor.as_ref() else {
        return;
    };
    let area = centered_rect(KEY_EDITOR_WIDTH_PERCENT, KEY_EDITOR_HEIGHT_PERCENT, frame.area());
    let inner = draw_popup_frame(
        frame,
        area,
        "Private key editor",
        Style::default().fg(Color::White),
    );
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)].as_ref())
        .split(inner);

    let lines: Vec<&str> = editor.buffer.split('\n').collect();
    let visible = layout[0].height as usize;
    let skip = lines.len().saturating_sub(visible);
    let text: Vec<Line> = lines
        .iter()
        .skip(skip)
        .map(|line| Line::from(line.to_string()))
        .collect();
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: false }),
        layout[0],
    );

    let stats = format!(
        "Lines: {} | Characters: {} | Ctrl+S save | Esc cancel",
        editor.line_count(),
        editor.buffer.chars().count()
    );
    frame.render_widget(
        Paragraph::new(stats).style(Style::default().fg(Color::Gray)),
        layout[1],
    );

    let last = lines.last().copied().unwrap_or_default();
    let row = (lines.len() - skip).saturating_sub(1) as u16;
    let col = last.chars().count() as u16;
    if col < layout[0].width && row < layout[0].height {
        frame.set_cursor_position((layout[0].x + col, layout[0].y + row));
    }
}

pub(crate) fn draw_menu(frame: &mut Frame<'_>, app: &App) {
    let height = modal_height(MENU_OPTIONS.len(), 0);
    let area = centered_rect_abs(MENU_WIDTH, height, frame.area());
    let inner = draw_popup_frame(frame, area, "Import / Export", Style::default().fg(Color::White));
    let items: Vec<ListItem> = MENU_OPTIONS
        .iter()
        .map(|option| ListItem::new(option.to_string()))
        .collect();
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(Span::styled("> ", Style::default().fg(Color::White)));
    let mut state = list_state(app.menu_cursor, MENU_OPTIONS.len());
    frame.render_stateful_widget(list, inner, &mut state);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::model::{KeyEditorState, ProfileForm};
    use crate::ui::helpers::buffer_text;

    #[test]
    fn form_renders_all_fields_and_masks_password() {
        let mut app = App::for_test();
        app.view = View::AddProfile;
        app.form = ProfileForm {
            name: "web".to_string(),
            password: "secret".to_string(),
            ..ProfileForm::default()
        };
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| draw_profile_form(frame, &app)).unwrap();
        let content = buffer_text(terminal.backend());
        assert!(content.contains("Add server"));
        for field in FormField::ALL {
            assert!(content.contains(field.label()), "missing {}", field.label());
        }
        assert!(content.contains("******"));
        assert!(!content.contains("secret"));
    }

    #[test]
    fn multiline_key_is_summarized_in_form() {
        assert_eq!(key_field_display("a\nb\nc\n"), "<3 lines> Ctrl+E to edit");
        assert_eq!(key_field_display("single"), "single");
    }

    #[test]
    fn key_editor_shows_counts() {
        let mut app = App::for_test();
        app.view = View::KeyEditor;
        app.key_editor = Some(KeyEditorState {
            buffer: "-----BEGIN KEY-----\nAAAA".to_string(),
            return_to: View::AddProfile,
        });
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| draw_key_editor(frame, &app)).unwrap();
        let content = buffer_text(terminal.backend());
        assert!(content.contains("Lines: 2"));
        assert!(content.contains("Characters: 24"));
        assert!(content.contains("AAAA"));
    }

    #[test]
    fn menu_lists_options() {
        let app = App::for_test();
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|frame| draw_menu(frame, &app)).unwrap();
        let content = buffer_text(terminal.backend());
        for option in MENU_OPTIONS {
            assert!(content.contains(option));
        }
    }
}
