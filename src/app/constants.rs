pub(crate) const STATUS_READY: &str = "Ready";
pub(crate) const STATUS_CANCELLED: &str = "Cancelled";

pub(crate) const LOG_TIMESTAMP_FORMAT: &str = "%m-%d %H:%M:%S";
pub(crate) const LOG_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub(crate) const LOG_SEPARATOR: &str = " | ";
pub(crate) const LOG_NO_LOGS_MESSAGE: &str = "No logs yet";
pub(crate) const LOG_FILE_NAME: &str = "activity.log";

pub(crate) const LOG_RETENTION_DAYS: i64 = 7;
pub(crate) const LOG_MAX_ENTRIES: usize = 10_000;
pub(crate) const LOG_MAX_IN_MEMORY: usize = 100;

pub(crate) const REMOTE_START_DIR: &str = "/";
pub(crate) const DEFAULT_EXPORT_FILE: &str = "ssh-servers-export.json";

pub(crate) const MENU_OPTIONS: [&str; 3] = ["Import profiles", "Export profiles", "Back to list"];

pub(crate) const NO_PROFILE_SELECTED: &str = "No server selected";
pub(crate) const FILENAME_EMPTY_MESSAGE: &str = "Filename cannot be empty";
pub(crate) const KEY_SAVED_MESSAGE: &str = "Private key saved";
