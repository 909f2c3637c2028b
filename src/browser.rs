//! Directory listings for the local filesystem and the remote session.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::TransferError;
use crate::model::{DirEntry, EntryKind, ListEntry, Pane};
use crate::ssh::RemoteFs;

/// Path arithmetic shared by both sides of the workbench.
pub(crate) trait BrowsePath: Clone {
    fn at_root(&self) -> bool;
    /// Stays put at the root.
    fn parent_dir(&self) -> Self;
    fn child(&self, name: &str) -> Self;
    fn label(&self) -> String;
}

impl BrowsePath for PathBuf {
    fn at_root(&self) -> bool {
        self.parent().is_none()
    }

    fn parent_dir(&self) -> Self {
        self.parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.clone())
    }

    fn child(&self, name: &str) -> Self {
        Path::join(self, name)
    }

    fn label(&self) -> String {
        self.display().to_string()
    }
}

impl BrowsePath for String {
    fn at_root(&self) -> bool {
        self.is_empty() || self == "/"
    }

    fn parent_dir(&self) -> Self {
        if self.at_root() {
            return "/".to_string();
        }
        self.trim_end_matches('/')
            .rsplit_once('/')
            .map(|(base, _)| if base.is_empty() { "/".to_string() } else { base.to_string() })
            .unwrap_or_else(|| "/".to_string())
    }

    fn child(&self, name: &str) -> Self {
        if self.at_root() {
            format!("/{name}")
        } else {
            format!("{}/{name}", self.trim_end_matches('/'))
        }
    }

    fn label(&self) -> String {
        if self.is_empty() {
            "/".to_string()
        } else {
            self.clone()
        }
    }
}

pub(crate) fn list_local(dir: &Path) -> Result<Vec<DirEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).context("read local dir")? {
        let entry = entry.context("read local entry")?;
        let name = entry.file_name().to_string_lossy().into_owned();
        entries.push(if entry.path().is_dir() {
            DirEntry::directory(name)
        } else {
            DirEntry::file(name)
        });
    }
    Ok(entries)
}

/// Sorts raw entries and prepends the synthetic parent unless at the root.
pub(crate) fn build_listing(raw: Vec<DirEntry>, at_root: bool, show_hidden: bool) -> Vec<DirEntry> {
    let mut entries: Vec<DirEntry> = raw
        .into_iter()
        .filter(|entry| entry.kind != EntryKind::Parent)
        .filter(|entry| show_hidden || !entry.name.starts_with('.'))
        .collect();
    entries.sort_by_cached_key(|entry| ListEntry::Filesystem(entry).sort_key());
    if !at_root {
        entries.insert(0, DirEntry::parent());
    }
    entries
}

#[derive(Debug, Clone)]
pub(crate) struct PaneState<P> {
    pub(crate) path: P,
    pub(crate) entries: Vec<DirEntry>,
    pub(crate) selected: usize,
    pub(crate) error: Option<String>,
}

impl<P: BrowsePath> PaneState<P> {
    pub(crate) fn new(path: P) -> Self {
        Self {
            path,
            entries: vec![],
            selected: 0,
            error: None,
        }
    }

    pub(crate) fn selected_entry(&self) -> Option<&DirEntry> {
        self.entries.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, delta: isize) {
        if self.entries.is_empty() {
            self.selected = 0;
            return;
        }
        let last = self.entries.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    /// Replaces the listing wholesale. On failure only the parent entry remains.
    fn apply(&mut self, result: Result<Vec<DirEntry>>, error_prefix: &str) -> Option<String> {
        let at_root = self.path.at_root();
        let message = match result {
            Ok(raw) => {
                self.entries = build_listing(raw, at_root, true);
                None
            }
            Err(err) => {
                self.entries = build_listing(vec![], at_root, true);
                Some(format!("{error_prefix}: {err:#}"))
            }
        };
        self.error = message.clone();
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
        message
    }

    /// Returns the new path when the selection leads somewhere else.
    fn target_of_selection(&self) -> Option<P> {
        let entry = self.selected_entry()?;
        match entry.kind {
            EntryKind::Parent if self.path.at_root() => None,
            EntryKind::Parent => Some(self.path.parent_dir()),
            EntryKind::Directory => Some(self.path.child(&entry.name)),
            EntryKind::File => None,
        }
    }

    fn enter(&mut self, path: P) {
        self.path = path;
        self.selected = 0;
    }
}

/// Local and remote panes driven against one open session.
#[derive(Debug, Clone)]
pub(crate) struct DualPane {
    pub(crate) local: PaneState<PathBuf>,
    pub(crate) remote: PaneState<String>,
    pub(crate) focus: Pane,
    pub(crate) transferring: bool,
    pub(crate) transfer_message: String,
}

impl DualPane {
    pub(crate) fn new(local_root: PathBuf, remote_root: String) -> Self {
        Self {
            local: PaneState::new(local_root),
            remote: PaneState::new(remote_root),
            focus: Pane::Local,
            transferring: false,
            transfer_message: String::new(),
        }
    }

    pub(crate) fn toggle_focus(&mut self) {
        self.focus = self.focus.other();
    }

    pub(crate) fn move_selection(&mut self, delta: isize) {
        match self.focus {
            Pane::Local => self.local.move_selection(delta),
            Pane::Remote => self.remote.move_selection(delta),
        }
    }

    pub(crate) fn refresh_local(&mut self) -> Option<String> {
        let result = list_local(&self.local.path);
        self.local.apply(result, "Error reading local directory")
    }

    pub(crate) fn refresh_remote(&mut self, remote: &mut dyn RemoteFs) -> Option<String> {
        let result = remote.list(&self.remote.path);
        self.remote.apply(result, "Error listing remote files")
    }

    pub(crate) fn refresh_all(&mut self, remote: &mut dyn RemoteFs) -> Option<String> {
        let local = self.refresh_local();
        let remote = self.refresh_remote(remote);
        remote.or(local)
    }

    /// Enters the focused directory or follows the parent entry.
    pub(crate) fn activate(&mut self, remote: &mut dyn RemoteFs) -> Option<String> {
        match self.focus {
            Pane::Local => {
                let target = self.local.target_of_selection()?;
                self.local.enter(target);
                self.refresh_local()
            }
            Pane::Remote => {
                let target = self.remote.target_of_selection()?;
                self.remote.enter(target);
                self.refresh_remote(remote)
            }
        }
    }

    /// Moves the focused pane one level up; no-op at the root.
    pub(crate) fn go_up(&mut self, remote: &mut dyn RemoteFs) -> Option<String> {
        match self.focus {
            Pane::Local => {
                if self.local.path.at_root() {
                    return None;
                }
                let parent = self.local.path.parent_dir();
                self.local.enter(parent);
                self.refresh_local()
            }
            Pane::Remote => {
                if self.remote.path.at_root() {
                    return None;
                }
                let parent = self.remote.path.parent_dir();
                self.remote.enter(parent);
                self.refresh_remote(remote)
            }
        }
    }

    fn focused_entry(&self) -> Option<&DirEntry> {
        match self.focus {
            Pane::Local => self.local.selected_entry(),
            Pane::Remote => self.remote.selected_entry(),
        }
    }

    /// Validates the selection and raises the in-progress flag.
    pub(crate) fn begin_copy(&mut self) -> Result<String, TransferError> {
        let entry = self.focused_entry().ok_or(TransferError::NoSelection)?;
        if entry.is_dir() {
            return Err(TransferError::CopyDirectory);
        }
        let name = entry.name.clone();
        self.transferring = true;
        self.transfer_message = format!("Copying {name}...");
        Ok(name)
    }

    /// Performs a copy started by [`DualPane::begin_copy`] and re-lists both sides.
    pub(crate) fn finish_copy(
        &mut self,
        remote: &mut dyn RemoteFs,
        name: &str,
    ) -> Result<String, TransferError> {
        let local_path = self.local.path.join(name);
        let remote_path = self.remote.path.child(name);
        let result = match self.focus {
            Pane::Local => remote
                .upload(&local_path, &remote_path)
                .map(|_| format!("Uploaded {name}"))
                .map_err(TransferError::Upload),
            Pane::Remote => remote
                .download(&remote_path, &local_path)
                .map(|_| format!("Downloaded {name}"))
                .map_err(TransferError::Download),
        };
        self.transferring = false;
        self.transfer_message.clear();
        self.refresh_all(remote);
        result
    }

    #[cfg(test)]
    pub(crate) fn copy_selected(&mut self, remote: &mut dyn RemoteFs) -> Result<String, TransferError> {
        let name = self.begin_copy()?;
        self.finish_copy(remote, &name)
    }

    pub(crate) fn delete_selected(&mut self, remote: &mut dyn RemoteFs) -> Result<String, TransferError> {
        let entry = self.focused_entry().ok_or(TransferError::NoSelection)?;
        if entry.is_dir() {
            return Err(TransferError::DeleteDirectory);
        }
        let name = entry.name.clone();
        let result = match self.focus {
            Pane::Local => fs::remove_file(self.local.path.join(&name))
                .context("delete local file")
                .map_err(TransferError::Delete),
            Pane::Remote => remote
                .delete(&self.remote.path.child(&name))
                .map_err(TransferError::Delete),
        };
        self.refresh_all(remote);
        result.map(|_| format!("Deleted {name}"))
    }
}
