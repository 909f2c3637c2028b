use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_SSH_PORT: u16 = 22;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct Profile {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) host: String,
    #[serde(default = "default_port")]
    pub(crate) port: u16,
    pub(crate) username: String,
    #[serde(default)]
    pub(crate) password: String,
    #[serde(default)]
    pub(crate) pem_key: String,
    #[serde(default)]
    pub(crate) sftp_port: u16,
}

impl Profile {
    pub(crate) fn auth_password(&self) -> Option<&str> {
        Some(self.password.as_str()).filter(|value| !value.is_empty())
    }

    pub(crate) fn private_key(&self) -> Option<&str> {
        Some(self.pem_key.as_str()).filter(|value| !value.is_empty())
    }

    /// Port used for the shell hand-off.
    pub(crate) fn shell_port(&self) -> u16 {
        if self.port == 0 {
            DEFAULT_SSH_PORT
        } else {
            self.port
        }
    }

    /// Port dialed for file transfer: transfer port, then connection port, then 22.
    pub(crate) fn resolved_transfer_port(&self) -> u16 {
        if self.sftp_port != 0 {
            self.sftp_port
        } else {
            self.shell_port()
        }
    }

    pub(crate) fn summary(&self) -> String {
        format!("{}@{}:{}", self.username, self.host, self.port)
    }
}

fn default_port() -> u16 {
    DEFAULT_SSH_PORT
}

fn default_next_id() -> u64 {
    1
}

/// On-disk layout of the profile store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct StoreFile {
    #[serde(default)]
    pub(crate) servers: Vec<Profile>,
    #[serde(default = "default_next_id")]
    pub(crate) next_id: u64,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            servers: vec![],
            next_id: default_next_id(),
        }
    }
}

/// One element of an import/export document.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ExportRecord<'a> {
    pub(crate) name: &'a str,
    pub(crate) host: &'a str,
    pub(crate) port: u16,
    pub(crate) username: &'a str,
    pub(crate) password: &'a str,
    pub(crate) pem_key: &'a str,
    pub(crate) sftp_port: u16,
}

impl<'a> From<&'a Profile> for ExportRecord<'a> {
    fn from(profile: &'a Profile) -> Self {
        Self {
            name: &profile.name,
            host: &profile.host,
            port: profile.port,
            username: &profile.username,
            password: &profile.password,
            pem_key: &profile.pem_key,
            sftp_port: profile.sftp_port,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    ProfileList,
    AddProfile,
    EditProfile,
    KeyEditor,
    ImportExportMenu,
    FilePicker,
    Workbench,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Name,
    Host,
    Port,
    Username,
    Password,
    PrivateKey,
    TransferPort,
    Submit,
}

impl FormField {
    pub(crate) const ALL: [FormField; 8] = [
        FormField::Name,
        FormField::Host,
        FormField::Port,
        FormField::Username,
        FormField::Password,
        FormField::PrivateKey,
        FormField::TransferPort,
        FormField::Submit,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Host => "Host",
            FormField::Port => "Port",
            FormField::Username => "User",
            FormField::Password => "Password",
            FormField::PrivateKey => "Key",
            FormField::TransferPort => "SFTP port",
            FormField::Submit => "Submit",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ProfileForm {
    pub(crate) name: String,
    pub(crate) host: String,
    pub(crate) port: String,
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) pem_key: String,
    pub(crate) sftp_port: String,
    pub(crate) active_field: FormField,
    pub(crate) editing_id: Option<u64>,
}

impl Default for ProfileForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            host: String::new(),
            port: String::new(),
            username: String::new(),
            password: String::new(),
            pem_key: String::new(),
            sftp_port: String::new(),
            active_field: FormField::Name,
            editing_id: None,
        }
    }
}

impl ProfileForm {
    pub(crate) fn for_edit(profile: &Profile) -> Self {
        let sftp_port = if profile.sftp_port == 0 {
            profile.port
        } else {
            profile.sftp_port
        };
        Self {
            name: profile.name.clone(),
            host: profile.host.clone(),
            port: profile.port.to_string(),
            username: profile.username.clone(),
            password: profile.password.clone(),
            pem_key: profile.pem_key.clone(),
            sftp_port: sftp_port.to_string(),
            active_field: FormField::Name,
            editing_id: Some(profile.id),
        }
    }

    pub(crate) fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Host => &self.host,
            FormField::Port => &self.port,
            FormField::Username => &self.username,
            FormField::Password => &self.password,
            FormField::PrivateKey => &self.pem_key,
            FormField::TransferPort => &self.sftp_port,
            FormField::Submit => "",
        }
    }

    pub(crate) fn value_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Name => Some(&mut self.name),
            FormField::Host => Some(&mut self.host),
            FormField::Port => Some(&mut self.port),
            FormField::Username => Some(&mut self.username),
            FormField::Password => Some(&mut self.password),
            FormField::PrivateKey => Some(&mut self.pem_key),
            FormField::TransferPort => Some(&mut self.sftp_port),
            FormField::Submit => None,
        }
    }

    pub(crate) fn advance(&mut self, forward: bool) {
        let fields = FormField::ALL;
        let pos = fields
            .iter()
            .position(|field| *field == self.active_field)
            .unwrap_or(0);
        let next = if forward {
            (pos + 1) % fields.len()
        } else if pos == 0 {
            fields.len() - 1
        } else {
            pos - 1
        };
        self.active_field = fields[next];
    }
}

/// Multiline buffer for the private key; only appends and pops from the end.
#[derive(Debug, Clone)]
pub(crate) struct KeyEditorState {
    pub(crate) buffer: String,
    pub(crate) return_to: View,
}

impl KeyEditorState {
    pub(crate) fn push_char(&mut self, ch: char) {
        self.buffer.push(ch);
    }

    pub(crate) fn push_newline(&mut self) {
        self.buffer.push('\n');
    }

    pub(crate) fn pop_char(&mut self) {
        self.buffer.pop();
    }

    pub(crate) fn line_count(&self) -> usize {
        self.buffer.split('\n').count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    Parent,
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DirEntry {
    pub(crate) name: String,
    pub(crate) kind: EntryKind,
}

impl DirEntry {
    pub(crate) fn parent() -> Self {
        Self {
            name: "..".to_string(),
            kind: EntryKind::Parent,
        }
    }

    pub(crate) fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }

    pub(crate) fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub(crate) fn is_dir(&self) -> bool {
        !matches!(self.kind, EntryKind::File)
    }
}

/// Everything the list widgets know how to draw.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ListEntry<'a> {
    Profile(&'a Profile),
    Filesystem(&'a DirEntry),
}

impl ListEntry<'_> {
    pub(crate) fn title(&self) -> String {
        match self {
            ListEntry::Profile(profile) => profile.name.clone(),
            ListEntry::Filesystem(entry) => match entry.kind {
                EntryKind::Parent => "../".to_string(),
                EntryKind::Directory => format!("{}/", entry.name),
                EntryKind::File => entry.name.clone(),
            },
        }
    }

    pub(crate) fn description(&self) -> String {
        match self {
            ListEntry::Profile(profile) => profile.summary(),
            ListEntry::Filesystem(entry) => match entry.kind {
                EntryKind::Parent => "parent directory".to_string(),
                EntryKind::Directory => "directory".to_string(),
                EntryKind::File => "file".to_string(),
            },
        }
    }

    /// Parent first, then directories, then files; profiles keep insertion order.
    pub(crate) fn sort_key(&self) -> (u8, String) {
        match self {
            ListEntry::Profile(profile) => (0, format!("{:020}", profile.id)),
            ListEntry::Filesystem(entry) => match entry.kind {
                EntryKind::Parent => (0, String::new()),
                EntryKind::Directory => (1, entry.name.to_lowercase()),
                EntryKind::File => (2, entry.name.to_lowercase()),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PickerMode {
    Import,
    Export,
}

impl PickerMode {
    pub(crate) fn label(self) -> &'static str {
        match self {
            PickerMode::Import => "import",
            PickerMode::Export => "export",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FilePickerState {
    pub(crate) mode: PickerMode,
    pub(crate) cwd: PathBuf,
    pub(crate) entries: Vec<DirEntry>,
    pub(crate) selected: usize,
    pub(crate) show_hidden: bool,
    pub(crate) filename_prompt: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pane {
    Local,
    Remote,
}

impl Pane {
    pub(crate) fn other(self) -> Self {
        match self {
            Pane::Local => Pane::Remote,
            Pane::Remote => Pane::Local,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum AppAction {
    OpenShell(Profile),
    /// Drawn once with the in-progress flag before the blocking copy runs.
    CopyFile(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            id: 3,
            name: "web".to_string(),
            host: "example.com".to_string(),
            port: 2222,
            username: "deploy".to_string(),
            password: String::new(),
            pem_key: String::new(),
            sftp_port: 0,
        }
    }

    #[test]
    fn transfer_port_falls_back_to_connection_port_then_default() {
        let mut profile = profile();
        assert_eq!(profile.resolved_transfer_port(), 2222);
        profile.sftp_port = 2022;
        assert_eq!(profile.resolved_transfer_port(), 2022);
        profile.sftp_port = 0;
        profile.port = 0;
        assert_eq!(profile.resolved_transfer_port(), DEFAULT_SSH_PORT);
    }

    #[test]
    fn empty_credentials_read_as_absent() {
        let mut profile = profile();
        assert!(profile.auth_password().is_none());
        assert!(profile.private_key().is_none());
        profile.password = "pw".to_string();
        assert_eq!(profile.auth_password(), Some("pw"));
    }

    #[test]
    fn store_file_defaults_missing_fields() {
        let store: StoreFile = serde_json::from_str("{}").unwrap();
        assert!(store.servers.is_empty());
        assert_eq!(store.next_id, 1);
        let json = r#"{"servers":[{"id":1,"name":"a","host":"h","username":"u"}],"next_id":2}"#;
        let store: StoreFile = serde_json::from_str(json).unwrap();
        assert_eq!(store.servers[0].port, DEFAULT_SSH_PORT);
        assert_eq!(store.servers[0].password, "");
    }

    #[test]
    fn form_for_edit_shows_port_when_transfer_port_unset() {
        let form = ProfileForm::for_edit(&profile());
        assert_eq!(form.sftp_port, "2222");
        assert_eq!(form.editing_id, Some(3));
    }

    #[test]
    fn form_focus_wraps_through_submit() {
        let mut form = ProfileForm::default();
        form.advance(false);
        assert_eq!(form.active_field, FormField::Submit);
        form.advance(true);
        assert_eq!(form.active_field, FormField::Name);
        assert!(form.value_mut(FormField::Submit).is_none());
    }

    #[test]
    fn key_editor_only_edits_the_tail() {
        let mut editor = KeyEditorState {
            buffer: "ab".to_string(),
            return_to: View::AddProfile,
        };
        editor.push_newline();
        editor.push_char('c');
        assert_eq!(editor.buffer, "ab\nc");
        assert_eq!(editor.line_count(), 2);
        editor.pop_char();
        editor.pop_char();
        editor.pop_char();
        editor.pop_char();
        editor.pop_char();
        assert_eq!(editor.buffer, "");
    }

    #[test]
    fn list_entries_describe_profiles_and_files() {
        let profile = profile();
        let entry = ListEntry::Profile(&profile);
        assert_eq!(entry.title(), "web");
        assert_eq!(entry.description(), "deploy@example.com:2222");

        let dir = DirEntry::directory("src");
        let file = DirEntry::file("Cargo.toml");
        let parent = DirEntry::parent();
        assert_eq!(ListEntry::Filesystem(&dir).title(), "src/");
        assert_eq!(ListEntry::Filesystem(&parent).title(), "../");
        assert!(
            ListEntry::Filesystem(&parent).sort_key() < ListEntry::Filesystem(&dir).sort_key()
        );
        assert!(ListEntry::Filesystem(&dir).sort_key() < ListEntry::Filesystem(&file).sort_key());
    }
}
