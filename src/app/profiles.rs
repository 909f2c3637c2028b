use crate::app::App;
use crate::app::constants::{KEY_SAVED_MESSAGE, NO_PROFILE_SELECTED, STATUS_CANCELLED};
use crate::error::ValidationError;
use crate::keys::{looks_like_private_key, normalize_private_key};
use crate::model::{
    AppAction, DEFAULT_SSH_PORT, FormField, KeyEditorState, Profile, ProfileForm, View,
};
use crate::shell::build_shell_command;

/// Checks the form in a fixed order; the first failing rule wins.
pub(crate) fn validate_form(form: &ProfileForm) -> Result<Profile, ValidationError> {
    let name = form.name.trim();
    let host = form.host.trim();
    let username = form.username.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if host.is_empty() {
        return Err(ValidationError::HostRequired);
    }
    if username.is_empty() {
        return Err(ValidationError::UsernameRequired);
    }
    let pem_key = if form.pem_key.trim().is_empty() {
        ""
    } else {
        form.pem_key.as_str()
    };
    if !form.password.is_empty() && !pem_key.is_empty() {
        return Err(ValidationError::PasswordAndKey);
    }
    let port =
        parse_port(&form.port, DEFAULT_SSH_PORT).ok_or(ValidationError::InvalidPort)?;
    let sftp_port =
        parse_port(&form.sftp_port, port).ok_or(ValidationError::InvalidTransferPort)?;
    if !pem_key.is_empty() && !looks_like_private_key(&normalize_private_key(pem_key)) {
        return Err(ValidationError::InvalidKey);
    }
    Ok(Profile {
        id: 0,
        name: name.to_string(),
        host: host.to_string(),
        port,
        username: username.to_string(),
        password: form.password.clone(),
        pem_key: pem_key.to_string(),
        sftp_port,
    })
}

fn parse_port(raw: &str, default: u16) -> Option<u16> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(default);
    }
    raw.parse::<u16>().ok().filter(|port| *port != 0)
}

impl App {
    pub(super) fn open_add_form(&mut self) {
        self.form = ProfileForm::default();
        self.view = View::AddProfile;
        self.set_status("Fill fields and press Enter on Submit");
    }

    pub(super) fn open_edit_form(&mut self) {
        let Some(profile) = self.selected().cloned() else {
            self.set_status(NO_PROFILE_SELECTED);
            return;
        };
        self.form = ProfileForm::for_edit(&profile);
        self.view = View::EditProfile;
        self.set_status(format!("Editing server: {}", profile.name));
    }

    pub(super) fn cancel_form(&mut self) {
        self.form = ProfileForm::default();
        self.view = View::ProfileList;
        self.set_status(STATUS_CANCELLED);
    }

    /// Returns to the list on success, including when only the save failed.
    pub(super) fn submit_form(&mut self) {
        let profile = match validate_form(&self.form) {
            Ok(profile) => profile,
            Err(err) => {
                self.set_status(err.to_string());
                return;
            }
        };
        let name = profile.name.clone();
        let message = match self.form.editing_id {
            Some(id) => match self.store.update(id, profile) {
                Ok(true) => format!("Updated server: {name}"),
                Ok(false) => format!("Server no longer exists: {name}"),
                Err(err) => format!("Error saving: {err:#}"),
            },
            None => {
                let result = self.store.add(profile);
                self.selected_profile = self.store.list().len().saturating_sub(1);
                match result {
                    Ok(_) => format!("Added server: {name}"),
                    Err(err) => format!("Error saving: {err:#}"),
                }
            }
        };
        tracing::info!(server = %name, "{message}");
        self.form = ProfileForm::default();
        self.view = View::ProfileList;
        self.set_status(message);
    }

    pub(super) fn delete_selected_profile(&mut self) {
        let Some(profile) = self.selected().cloned() else {
            self.set_status(NO_PROFILE_SELECTED);
            return;
        };
        let message = match self.store.remove(profile.id) {
            Ok(()) => format!("Deleted server: {}", profile.name),
            Err(err) => format!("Error saving: {err:#}"),
        };
        self.clamp_selection();
        self.set_status(message);
    }

    pub(super) fn open_key_editor(&mut self) {
        self.key_editor = Some(KeyEditorState {
            buffer: self.form.pem_key.clone(),
            return_to: self.view,
        });
        self.view = View::KeyEditor;
        self.set_status("Paste or type the private key; Ctrl+S saves, Esc cancels");
    }

    pub(super) fn save_key_editor(&mut self) {
        let Some(editor) = self.key_editor.take() else {
            self.view = View::ProfileList;
            return;
        };
        self.form.pem_key = editor.buffer;
        self.form.active_field = FormField::PrivateKey;
        self.view = editor.return_to;
        self.set_status(KEY_SAVED_MESSAGE);
    }

    pub(super) fn cancel_key_editor(&mut self) {
        let return_to = self
            .key_editor
            .take()
            .map(|editor| editor.return_to)
            .unwrap_or(View::ProfileList);
        self.view = return_to;
        self.set_status(STATUS_CANCELLED);
    }

    pub(super) fn request_shell(&mut self) {
        match self.selected().cloned() {
            Some(profile) => self.pending_action = Some(AppAction::OpenShell(profile)),
            None => self.set_status(NO_PROFILE_SELECTED),
        }
    }

    /// Runs the hand-off command; the caller owns the terminal around this.
    pub(crate) fn run_shell(&mut self, profile: &Profile) {
        let command = build_shell_command(profile, &self.key_dir);
        tracing::info!(server = %profile.name, program = %command.program, "shell hand-off");
        match command.run() {
            Ok(status) => {
                self.set_status(format!("SSH session to {} ended ({status})", profile.name));
            }
            Err(err) => self.set_status(format!("Error starting ssh: {err:#}")),
        }
    }
}
