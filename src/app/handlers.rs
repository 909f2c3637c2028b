use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::App;
use crate::app::helpers::{is_ctrl, step_index, typed_char};
use crate::model::{FormField, View};

impl App {
    /// Routes one key to the active view. Returns `true` when the app should quit.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        match self.view {
            View::ProfileList => self.handle_list_key(key),
            View::AddProfile | View::EditProfile => self.handle_form_key(key),
            View::KeyEditor => self.handle_key_editor_key(key),
            View::ImportExportMenu => self.handle_menu_key(key),
            View::FilePicker => self.handle_picker_key(key),
            View::Workbench => self.handle_workbench_key(key),
        }
    }

    /// Bracketed paste lands in whatever text input is active.
    pub(crate) fn handle_paste(&mut self, text: &str) {
        match self.view {
            View::AddProfile | View::EditProfile => {
                let field = self.form.active_field;
                if let Some(value) = self.form.value_mut(field) {
                    if field == FormField::PrivateKey {
                        value.push_str(text);
                    } else {
                        value.extend(text.chars().filter(|ch| !matches!(ch, '\n' | '\r')));
                    }
                }
            }
            View::KeyEditor => {
                if let Some(editor) = self.key_editor.as_mut() {
                    editor.buffer.push_str(&text.replace("\r\n", "\n"));
                }
            }
            View::FilePicker => {
                if let Some(prompt) = self
                    .file_picker
                    .as_mut()
                    .and_then(|picker| picker.filename_prompt.as_mut())
                {
                    prompt.extend(text.chars().filter(|ch| !ch.is_control()));
                }
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Result<bool> {
        let len = self.store.list().len();
        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('a') => self.open_add_form(),
            KeyCode::Char('e') => self.open_edit_form(),
            KeyCode::Char('d') => self.delete_selected_profile(),
            KeyCode::Char('s') => self.open_workbench(),
            KeyCode::Char('m') => self.open_menu(),
            KeyCode::Char('v') => self.show_log = !self.show_log,
            KeyCode::Enter => self.request_shell(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_profile = step_index(self.selected_profile, len, -1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_profile = step_index(self.selected_profile, len, 1);
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<bool> {
        if is_ctrl(&key, 'e') {
            if self.form.active_field == FormField::PrivateKey {
                self.open_key_editor();
            }
            return Ok(false);
        }
        match key.code {
            KeyCode::Esc => self.cancel_form(),
            KeyCode::Tab | KeyCode::Down => self.form.advance(true),
            KeyCode::BackTab | KeyCode::Up => self.form.advance(false),
            KeyCode::Enter => {
                if self.form.active_field == FormField::Submit {
                    self.submit_form();
                } else {
                    self.form.advance(true);
                }
            }
            KeyCode::Backspace => {
                let field = self.form.active_field;
                if let Some(value) = self.form.value_mut(field) {
                    value.pop();
                }
            }
            _ => {
                if let Some(ch) = typed_char(&key) {
                    let field = self.form.active_field;
                    if let Some(value) = self.form.value_mut(field) {
                        value.push(ch);
                    }
                }
            }
        }
        Ok(false)
    }

    fn handle_key_editor_key(&mut self, key: KeyEvent) -> Result<bool> {
        if is_ctrl(&key, 's') {
            self.save_key_editor();
            return Ok(false);
        }
        if key.code == KeyCode::Esc {
            self.cancel_key_editor();
            return Ok(false);
        }
        let Some(editor) = self.key_editor.as_mut() else {
            self.view = View::ProfileList;
            return Ok(false);
        };
        match key.code {
            KeyCode::Enter => editor.push_newline(),
            KeyCode::Backspace => editor.pop_char(),
            _ => {
                if let Some(ch) = typed_char(&key) {
                    editor.push_char(ch);
                }
            }
        }
        Ok(false)
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> Result<bool> {
        let len = Self::menu_len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.close_menu(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_cursor = step_index(self.menu_cursor, len, -1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.menu_cursor = step_index(self.menu_cursor, len, 1);
            }
            KeyCode::Enter => self.menu_select(),
            _ => {}
        }
        Ok(false)
    }

    fn handle_picker_key(&mut self, key: KeyEvent) -> Result<bool> {
        let Some(picker) = self.file_picker.as_mut() else {
            self.view = View::ProfileList;
            return Ok(false);
        };
        if let Some(prompt) = picker.filename_prompt.as_mut() {
            match key.code {
                KeyCode::Esc => picker.filename_prompt = None,
                KeyCode::Enter => self.submit_filename_prompt(),
                KeyCode::Backspace => {
                    prompt.pop();
                }
                _ => {
                    if let Some(ch) = typed_char(&key) {
                        prompt.push(ch);
                    }
                }
            }
            return Ok(false);
        }
        let len = picker.entries.len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.close_picker(),
            KeyCode::Up | KeyCode::Char('k') => picker.selected = step_index(picker.selected, len, -1),
            KeyCode::Down | KeyCode::Char('j') => picker.selected = step_index(picker.selected, len, 1),
            KeyCode::Enter => self.picker_activate(),
            KeyCode::Char('.') => self.toggle_hidden(),
            KeyCode::Char('x') => self.export_default(),
            KeyCode::Char('n') => self.open_filename_prompt(),
            _ => {}
        }
        Ok(false)
    }

    fn handle_workbench_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.leave_workbench(),
            KeyCode::Tab => self.workbench_toggle_focus(),
            KeyCode::Up | KeyCode::Char('k') => self.workbench_move(-1),
            KeyCode::Down | KeyCode::Char('j') => self.workbench_move(1),
            KeyCode::Enter => self.workbench_activate(),
            KeyCode::Backspace => self.workbench_up(),
            KeyCode::Char('c') => self.workbench_start_copy(),
            KeyCode::Char('d') => self.workbench_delete(),
            _ => {}
        }
        Ok(false)
    }
}
