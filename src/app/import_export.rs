use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::app::App;
use crate::app::constants::{DEFAULT_EXPORT_FILE, FILENAME_EMPTY_MESSAGE, MENU_OPTIONS};
use crate::app::helpers::picker_entries;
use crate::browser::build_listing;
use crate::model::{EntryKind, FilePickerState, PickerMode, View};

impl App {
    pub(super) fn open_menu(&mut self) {
        self.menu_cursor = 0;
        self.view = View::ImportExportMenu;
        self.set_status("Import or export profiles");
    }

    pub(super) fn menu_select(&mut self) {
        match self.menu_cursor {
            0 => self.open_picker(PickerMode::Import),
            1 => self.open_picker(PickerMode::Export),
            _ => self.close_menu(),
        }
    }

    pub(super) fn menu_len() -> usize {
        MENU_OPTIONS.len()
    }

    pub(super) fn close_menu(&mut self) {
        self.view = View::ProfileList;
        self.set_status("Back to server list");
    }

    pub(super) fn open_picker(&mut self, mode: PickerMode) {
        self.file_picker = Some(FilePickerState {
            mode,
            cwd: self.home_dir.clone(),
            entries: vec![],
            selected: 0,
            show_hidden: false,
            filename_prompt: None,
        });
        self.view = View::FilePicker;
        if !self.refresh_picker() {
            return;
        }
        let hint = match mode {
            PickerMode::Import => "Select a JSON file to import",
            PickerMode::Export => "Select a file to overwrite, x for default name, n for new file",
        };
        self.set_status(hint);
    }

    pub(super) fn close_picker(&mut self) {
        self.file_picker = None;
        self.view = View::ProfileList;
        self.set_status("Back to server list");
    }

    /// Re-lists the picker directory; `false` if that failed.
    pub(super) fn refresh_picker(&mut self) -> bool {
        let Some(picker) = self.file_picker.as_mut() else {
            return false;
        };
        let error = match picker_entries(&picker.cwd, picker.show_hidden) {
            Ok(entries) => {
                picker.entries = entries;
                None
            }
            Err(err) => {
                picker.entries = build_listing(vec![], picker.cwd.parent().is_none(), false);
                Some(format!("Error reading directory: {err:#}"))
            }
        };
        if picker.selected >= picker.entries.len() {
            picker.selected = picker.entries.len().saturating_sub(1);
        }
        match error {
            Some(message) => {
                self.set_status(message);
                false
            }
            None => true,
        }
    }

    pub(super) fn toggle_hidden(&mut self) {
        if let Some(picker) = self.file_picker.as_mut() {
            picker.show_hidden = !picker.show_hidden;
            picker.selected = 0;
        }
        self.refresh_picker();
    }

    /// Descends, ascends, or acts on the selected file depending on the mode.
    pub(super) fn picker_activate(&mut self) {
        let Some(picker) = self.file_picker.as_mut() else {
            return;
        };
        let Some(entry) = picker.entries.get(picker.selected).cloned() else {
            return;
        };
        match entry.kind {
            EntryKind::Parent => {
                if let Some(parent) = picker.cwd.parent() {
                    picker.cwd = parent.to_path_buf();
                    picker.selected = 0;
                }
                self.refresh_picker();
            }
            EntryKind::Directory => {
                picker.cwd = picker.cwd.join(&entry.name);
                picker.selected = 0;
                self.refresh_picker();
            }
            EntryKind::File => {
                let path = picker.cwd.join(&entry.name);
                let mode = picker.mode;
                match mode {
                    PickerMode::Import => self.import_from(&path),
                    PickerMode::Export => self.export_to(&path),
                }
            }
        }
    }

    pub(super) fn export_default(&mut self) {
        let Some(picker) = self.file_picker.as_ref() else {
            return;
        };
        if picker.mode != PickerMode::Export {
            return;
        }
        let path = picker.cwd.join(DEFAULT_EXPORT_FILE);
        self.export_to(&path);
    }

    pub(super) fn open_filename_prompt(&mut self) {
        if let Some(picker) = self.file_picker.as_mut() {
            if picker.mode == PickerMode::Export {
                picker.filename_prompt = Some(String::new());
            }
        }
    }

    pub(super) fn submit_filename_prompt(&mut self) {
        let Some(picker) = self.file_picker.as_mut() else {
            return;
        };
        let name = picker
            .filename_prompt
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if name.is_empty() {
            self.set_status(FILENAME_EMPTY_MESSAGE);
            return;
        }
        let path = picker.cwd.join(name);
        picker.filename_prompt = None;
        self.export_to(&path);
    }

    fn import_from(&mut self, path: &Path) {
        let result = fs::read_to_string(path)
            .context("read import file")
            .and_then(|content| self.store.import_records(&content));
        match result {
            Ok(count) => {
                tracing::info!(path = %path.display(), count, "imported profiles");
                self.finish_picker(format!(
                    "Imported {count} profiles from {}",
                    path.display()
                ));
            }
            Err(err) => self.set_status(format!("Error importing: {err:#}")),
        }
    }

    fn export_to(&mut self, path: &Path) {
        match self.store.export_to(path) {
            Ok(count) => {
                tracing::info!(path = %path.display(), count, "exported profiles");
                self.finish_picker(format!("Exported {count} profiles to {}", path.display()));
            }
            Err(err) => self.set_status(format!("Error exporting: {err:#}")),
        }
    }

    fn finish_picker(&mut self, message: String) {
        self.file_picker = None;
        self.view = View::ProfileList;
        self.clamp_selection();
        self.set_status(message);
    }
}
