use crate::app::constants::{NO_PROFILE_SELECTED, REMOTE_START_DIR};
use crate::app::{App, Workbench};
use crate::browser::DualPane;
use crate::model::{AppAction, View};

impl App {
    /// Connects to the selected profile and enters the workbench. On failure
    /// the list stays active with the error in the status line.
    pub(crate) fn open_workbench(&mut self) {
        let Some(profile) = self.selected().cloned() else {
            self.set_status(NO_PROFILE_SELECTED);
            return;
        };
        self.close_workbench();
        let mut session = match self.connector.connect(&profile) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(server = %profile.name, "connect failed: {err}");
                self.set_status(format!("Error connecting to SFTP: {err}"));
                return;
            }
        };
        let mut panes = DualPane::new(self.home_dir.clone(), REMOTE_START_DIR.to_string());
        let error = panes.refresh_all(session.as_mut());
        self.set_status(
            error.unwrap_or_else(|| format!("Connected to {}@{}", profile.username, profile.host)),
        );
        self.workbench = Some(Workbench {
            profile,
            session,
            panes,
        });
        self.view = View::Workbench;
    }

    /// Tears down the session if one is open. Safe to call repeatedly.
    pub(crate) fn close_workbench(&mut self) {
        if let Some(mut workbench) = self.workbench.take() {
            workbench.session.close();
            tracing::info!(server = %workbench.profile.name, "workbench closed");
        }
    }

    pub(super) fn leave_workbench(&mut self) {
        self.close_workbench();
        self.view = View::ProfileList;
        self.set_status("Disconnected");
    }

    pub(crate) fn shutdown(&mut self) {
        self.close_workbench();
    }

    pub(super) fn workbench_toggle_focus(&mut self) {
        if let Some(workbench) = self.workbench.as_mut() {
            workbench.panes.toggle_focus();
        }
    }

    pub(super) fn workbench_move(&mut self, delta: isize) {
        if let Some(workbench) = self.workbench.as_mut() {
            workbench.panes.move_selection(delta);
        }
    }

    pub(super) fn workbench_activate(&mut self) {
        let Some(workbench) = self.workbench.as_mut() else {
            return;
        };
        if let Some(message) = workbench.panes.activate(workbench.session.as_mut()) {
            self.set_status(message);
        }
    }

    pub(super) fn workbench_up(&mut self) {
        let Some(workbench) = self.workbench.as_mut() else {
            return;
        };
        if let Some(message) = workbench.panes.go_up(workbench.session.as_mut()) {
            self.set_status(message);
        }
    }

    /// Validates the selection now; the copy itself runs after the next draw.
    pub(super) fn workbench_start_copy(&mut self) {
        let Some(workbench) = self.workbench.as_mut() else {
            return;
        };
        match workbench.panes.begin_copy() {
            Ok(name) => self.pending_action = Some(AppAction::CopyFile(name)),
            Err(err) => self.set_status(err.to_string()),
        }
    }

    pub(crate) fn run_copy(&mut self, name: &str) {
        let Some(workbench) = self.workbench.as_mut() else {
            return;
        };
        let message = match workbench
            .panes
            .finish_copy(workbench.session.as_mut(), name)
        {
            Ok(message) => message,
            Err(err) => err.to_string(),
        };
        self.set_status(message);
    }

    pub(super) fn workbench_delete(&mut self) {
        let Some(workbench) = self.workbench.as_mut() else {
            return;
        };
        let message = match workbench.panes.delete_selected(workbench.session.as_mut()) {
            Ok(message) => message,
            Err(err) => err.to_string(),
        };
        self.set_status(message);
    }
}
