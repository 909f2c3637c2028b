use std::collections::VecDeque;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::app::constants::{LOG_FILE_NAME, LOG_NO_LOGS_MESSAGE, STATUS_READY};
use crate::app::logging::prune_log_file;
use crate::browser::DualPane;
use crate::model::{
    AppAction, FilePickerState, KeyEditorState, Profile, ProfileForm, View,
};
use crate::shell::key_material_dir;
use crate::ssh::{Connector, RemoteFs};
use crate::storage::ProfileStore;

pub(crate) mod constants;
mod handlers;
mod helpers;
mod import_export;
mod logging;
mod profiles;
mod workbench;

/// Where the store and the activity log live for this run.
#[derive(Debug, Clone)]
pub(crate) struct AppOptions {
    pub(crate) store_path: PathBuf,
    pub(crate) log_dir: PathBuf,
}

/// The open transfer session and the panes browsing it.
pub(crate) struct Workbench {
    pub(crate) profile: Profile,
    pub(crate) session: Box<dyn RemoteFs>,
    pub(crate) panes: DualPane,
}

pub(crate) struct App {
    pub(crate) store: ProfileStore,
    pub(crate) log_path: PathBuf,
    pub(crate) last_log: String,
    pub(crate) log_lines: VecDeque<String>,
    pub(crate) view: View,
    pub(crate) status: String,
    pub(crate) selected_profile: usize,
    pub(crate) show_log: bool,
    pub(crate) form: ProfileForm,
    pub(crate) key_editor: Option<KeyEditorState>,
    pub(crate) menu_cursor: usize,
    pub(crate) file_picker: Option<FilePickerState>,
    pub(crate) workbench: Option<Workbench>,
    pub(crate) pending_action: Option<AppAction>,
    pub(crate) connector: Box<dyn Connector>,
    pub(crate) home_dir: PathBuf,
    pub(crate) key_dir: PathBuf,
}

impl App {
    pub(crate) fn load(options: AppOptions, connector: Box<dyn Connector>) -> Result<Self> {
        let log_path = options.log_dir.join(LOG_FILE_NAME);
        prune_log_file(&log_path);
        let store = ProfileStore::load(&options.store_path);
        tracing::info!(
            store = %options.store_path.display(),
            profiles = store.list().len(),
            "store loaded"
        );
        let home_dir = match dirs::home_dir() {
            Some(home) => home,
            None => std::env::current_dir().context("current dir")?,
        };
        let mut app = Self::from_parts(store, log_path, connector, home_dir, key_material_dir());
        app.set_status(STATUS_READY);
        Ok(app)
    }

    fn from_parts(
        store: ProfileStore,
        log_path: PathBuf,
        connector: Box<dyn Connector>,
        home_dir: PathBuf,
        key_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            log_path,
            last_log: String::from(LOG_NO_LOGS_MESSAGE),
            log_lines: VecDeque::new(),
            view: View::ProfileList,
            status: STATUS_READY.to_string(),
            selected_profile: 0,
            show_log: false,
            form: ProfileForm::default(),
            key_editor: None,
            menu_cursor: 0,
            file_picker: None,
            workbench: None,
            pending_action: None,
            connector,
            home_dir,
            key_dir,
        }
    }

    pub(crate) fn selected(&self) -> Option<&Profile> {
        self.store.list().get(self.selected_profile)
    }

    pub(crate) fn clamp_selection(&mut self) {
        let len = self.store.list().len();
        if self.selected_profile >= len {
            self.selected_profile = len.saturating_sub(1);
        }
    }
}

#[cfg(test)]
impl App {
    pub(crate) fn for_test() -> Self {
        Self::with_connector(crate::ssh::mock::MockConnector::default())
    }

    /// Scratch store, log, home and key directories under the system temp dir.
    pub(crate) fn with_connector(connector: crate::ssh::mock::MockConnector) -> Self {
        static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let seq = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let base = std::env::temp_dir().join(format!("sftp-deck-test-{nanos}-{seq}"));
        let home = base.join("home");
        std::fs::create_dir_all(&home).unwrap();
        let store = ProfileStore::load(&base.join("config").join("config.json"));
        Self::from_parts(
            store,
            base.join("logs").join(LOG_FILE_NAME),
            Box::new(connector),
            home,
            base.join("keys"),
        )
    }
}
