use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use crate::app::App;
use crate::browser::{BrowsePath, PaneState};
use crate::model::{ListEntry, Pane};
use crate::ui::constants::LOG_PANE_PERCENT;
use crate::ui::helpers::{entry_item, list_state, status_style, truncate_text};

pub(crate) fn draw_header(frame: &mut Frame<'_>, title: &str, help: &str, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(Span::styled(
                help.to_string(),
                Style::default().fg(Color::Gray),
            ))),
    )
    .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

pub(crate) fn draw_status_line(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let width = area.width as usize;
    let status = Paragraph::new(truncate_text(&app.status, width)).style(status_style(&app.status));
    frame.render_widget(status, area);
}

pub(crate) fn draw_profile_list(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let (list_area, log_area) = if app.show_log {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                [
                    Constraint::Percentage(100 - LOG_PANE_PERCENT),
                    Constraint::Percentage(LOG_PANE_PERCENT),
                ]
                .as_ref(),
            )
            .split(area);
        (columns[0], Some(columns[1]))
    } else {
        (area, None)
    };

    let header_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let block = Block::default()
        .title(Line::from(Span::styled(
            format!("Servers ({})", app.store.list().len()),
            header_style,
        )))
        .borders(Borders::ALL);
    let inner = block.inner(list_area);
    frame.render_widget(block, list_area);

    let profiles = app.store.list();
    if profiles.is_empty() {
        let empty = Paragraph::new("No servers yet. Press (a) to add one or (m) to import.")
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true });
        frame.render_widget(empty, inner);
    } else {
        let width = inner.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = profiles
            .iter()
            .map(|profile| entry_item(ListEntry::Profile(profile), width))
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol(Span::styled(
                "> ",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ));
        let mut state = list_state(app.selected_profile, profiles.len());
        frame.render_stateful_widget(list, inner, &mut state);
    }

    if let Some(log_area) = log_area {
        draw_log_pane(frame, app, log_area);
    }
}

pub(crate) fn draw_log_pane(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default().title("Activity").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let visible = inner.height as usize;
    let lines: Vec<Line> = if app.log_lines.is_empty() {
        vec![Line::from(app.last_log.clone())]
    } else {
        app.log_lines
            .iter()
            .skip(app.log_lines.len().saturating_sub(visible))
            .map(|line| Line::from(truncate_text(line, inner.width as usize)))
            .collect()
    };
    let logs = Paragraph::new(lines).style(Style::default().fg(Color::Gray));
    frame.render_widget(logs, inner);
}

pub(crate) fn draw_workbench(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(workbench) = app.workbench.as_ref() else {
        return;
    };
    let panes = &workbench.panes;
    let rows = if panes.transferring {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3)].as_ref())
            .split(area)
    };
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(rows[0]);

    draw_pane(frame, "Local", &panes.local, panes.focus == Pane::Local, columns[0]);
    draw_pane(frame, "Remote", &panes.remote, panes.focus == Pane::Remote, columns[1]);

    if panes.transferring {
        let progress = Paragraph::new(panes.transfer_message.clone())
            .style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center);
        frame.render_widget(progress, rows[1]);
    }
}

fn draw_pane<P: BrowsePath>(
    frame: &mut Frame<'_>,
    label: &str,
    pane: &PaneState<P>,
    focused: bool,
    area: Rect,
) {
    let marker = if focused { "* " } else { "" };
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let width = area.width.saturating_sub(4) as usize;
    let title = truncate_text(&format!("{marker}{label}: {}", pane.path.label()), width);
    let block = Block::default()
        .title(Line::from(Span::styled(
            title,
            border_style.add_modifier(Modifier::BOLD),
        )))
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut items: Vec<ListItem> = pane
        .entries
        .iter()
        .map(|entry| entry_item(ListEntry::Filesystem(entry), width))
        .collect();
    if let Some(error) = &pane.error {
        items.push(ListItem::new(Line::from(Span::styled(
            truncate_text(error, width),
            Style::default().fg(Color::Red),
        ))));
    }
    let highlight = if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let list = List::new(items).highlight_style(highlight);
    let mut state = list_state(pane.selected, pane.entries.len());
    frame.render_stateful_widget(list, inner, &mut state);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::model::{DirEntry, Profile};
    use crate::ssh::mock::MockConnector;
    use crate::ui::helpers::buffer_text;

    fn profile() -> Profile {
        Profile {
            id: 0,
            name: "staging".to_string(),
            host: "stage.local".to_string(),
            port: 2200,
            username: "ci".to_string(),
            password: String::new(),
            pem_key: String::new(),
            sftp_port: 0,
        }
    }

    #[test]
    fn profile_list_shows_name_and_summary() {
        let mut app = App::for_test();
        app.store.add(profile()).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(70, 8)).unwrap();
        terminal
            .draw(|frame| draw_profile_list(frame, &app, frame.area()))
            .unwrap();
        let content = buffer_text(terminal.backend());
        assert!(content.contains("staging"));
        assert!(content.contains("ci@stage.local:2200"));
        assert!(content.contains("Servers (1)"));
    }

    #[test]
    fn log_pane_renders_recent_lines() {
        let mut app = App::for_test();
        app.set_status("Imported 3 profiles");
        app.show_log = true;
        let mut terminal = Terminal::new(TestBackend::new(100, 8)).unwrap();
        terminal
            .draw(|frame| draw_profile_list(frame, &app, frame.area()))
            .unwrap();
        let content = buffer_text(terminal.backend());
        assert!(content.contains("Activity"));
        assert!(content.contains("Imported 3 profiles"));
        assert!(content.contains("No servers yet"));
    }

    #[test]
    fn workbench_marks_focus_and_transfer() {
        let connector = MockConnector::default();
        connector
            .state
            .lock()
            .unwrap()
            .listings
            .insert("/".to_string(), vec![DirEntry::file("remote.bin")]);
        let mut app = App::with_connector(connector);
        app.store.add(profile()).unwrap();
        app.open_workbench();
        if let Some(workbench) = app.workbench.as_mut() {
            workbench.panes.transferring = true;
            workbench.panes.transfer_message = "Copying remote.bin...".to_string();
        }
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        terminal
            .draw(|frame| draw_workbench(frame, &app, frame.area()))
            .unwrap();
        let content = buffer_text(terminal.backend());
        assert!(content.contains("* Local:"));
        assert!(content.contains("Remote: /"));
        assert!(content.contains("remote.bin"));
        assert!(content.contains("Copying remote.bin..."));
    }
}
