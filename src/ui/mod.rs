use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;
use crate::model::View;
use crate::ui::constants::{
    APP_TITLE, EXPORT_HELP, FORM_HELP, HEADER_HEIGHT, IMPORT_HELP, KEY_EDITOR_HELP, LIST_HELP,
    MENU_HELP, PROMPT_HELP, STATUS_HEIGHT, WORKBENCH_HELP,
};
use crate::ui::modals::{draw_key_editor, draw_menu, draw_profile_form};
use crate::ui::panels::{draw_header, draw_profile_list, draw_status_line, draw_workbench};
use crate::ui::pickers::draw_file_picker;

pub(crate) mod constants;
mod helpers;
mod modals;
mod panels;
mod pickers;

pub(crate) fn draw_ui(frame: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(1),
                Constraint::Length(STATUS_HEIGHT),
            ]
            .as_ref(),
        )
        .split(frame.area());

    let title = match app.workbench.as_ref() {
        Some(workbench) if app.view == View::Workbench => format!(
            "SFTP: {}@{}",
            workbench.profile.username, workbench.profile.host
        ),
        _ => APP_TITLE.to_string(),
    };
    draw_header(frame, &title, help_text(app), layout[0]);

    if app.view == View::Workbench {
        draw_workbench(frame, app, layout[1]);
    } else {
        draw_profile_list(frame, app, layout[1]);
    }
    draw_status_line(frame, app, layout[2]);

    match app.view {
        View::AddProfile | View::EditProfile => draw_profile_form(frame, app),
        View::KeyEditor => {
            draw_profile_form(frame, app);
            draw_key_editor(frame, app);
        }
        View::ImportExportMenu => draw_menu(frame, app),
        View::FilePicker => draw_file_picker(frame, app),
        View::ProfileList | View::Workbench => {}
    }
}

fn help_text(app: &App) -> &'static str {
    match app.view {
        View::ProfileList => LIST_HELP,
        View::AddProfile | View::EditProfile => FORM_HELP,
        View::KeyEditor => KEY_EDITOR_HELP,
        View::ImportExportMenu => MENU_HELP,
        View::FilePicker => match app.file_picker.as_ref() {
            Some(picker) if picker.filename_prompt.is_some() => PROMPT_HELP,
            Some(picker) if picker.mode == crate::model::PickerMode::Export => EXPORT_HELP,
            _ => IMPORT_HELP,
        },
        View::Workbench => WORKBENCH_HELP,
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::model::{KeyEditorState, Profile};
    use crate::ui::helpers::buffer_text;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| draw_ui(frame, app)).unwrap();
        buffer_text(terminal.backend())
    }

    fn app_with_profile() -> App {
        let mut app = App::for_test();
        app.store
            .add(Profile {
                id: 0,
                name: "edge".to_string(),
                host: "edge.example".to_string(),
                port: 22,
                username: "root".to_string(),
                password: String::new(),
                pem_key: String::new(),
                sftp_port: 0,
            })
            .unwrap();
        app
    }

    #[test]
    fn list_view_has_title_help_and_status() {
        let app = app_with_profile();
        let content = render(&app);
        assert!(content.contains(APP_TITLE));
        assert!(content.contains("(a)dd"));
        assert!(content.contains("edge"));
        assert!(content.contains("Ready"));
    }

    #[test]
    fn key_editor_overlays_the_form() {
        let mut app = app_with_profile();
        app.view = View::KeyEditor;
        app.key_editor = Some(KeyEditorState {
            buffer: String::new(),
            return_to: View::AddProfile,
        });
        let content = render(&app);
        assert!(content.contains("Private key editor"));
        assert!(content.contains(KEY_EDITOR_HELP));
    }

    #[test]
    fn menu_view_draws_menu() {
        let mut app = app_with_profile();
        app.view = View::ImportExportMenu;
        let content = render(&app);
        assert!(content.contains("Import / Export"));
        assert!(content.contains(MENU_HELP));
    }

    #[test]
    fn workbench_header_names_the_connection() {
        let mut app = app_with_profile();
        app.open_workbench();
        let content = render(&app);
        assert!(content.contains("SFTP: root@edge.example"));
        assert!(content.contains("Remote: /"));
    }
}
