pub(crate) const APP_TITLE: &str = "SFTP DECK";

pub(crate) const LIST_HELP: &str =
    "(a)dd | (e)dit | (d)elete | Enter ssh | (s)ftp | (m)enu | (v)iew log | (q)uit";
pub(crate) const FORM_HELP: &str = "Tab/Up/Down move | Enter on Submit saves | Ctrl+E edit key | Esc cancel";
pub(crate) const KEY_EDITOR_HELP: &str = "Type or paste the key | Ctrl+S save | Esc cancel";
pub(crate) const MENU_HELP: &str = "Up/Down move | Enter select | Esc back";
pub(crate) const IMPORT_HELP: &str = "Enter open/import | . hidden | Esc back";
pub(crate) const EXPORT_HELP: &str = "Enter open/overwrite | x default file | n new file | . hidden | Esc back";
pub(crate) const PROMPT_HELP: &str = "Enter write | Esc close prompt";
pub(crate) const WORKBENCH_HELP: &str =
    "Tab switch | Enter open | Backspace up | (c)opy | (d)elete | (q)uit";

pub(crate) const LABEL_WIDTH: usize = 10;

pub(crate) const HEADER_HEIGHT: u16 = 3;
pub(crate) const STATUS_HEIGHT: u16 = 1;
pub(crate) const LOG_PANE_PERCENT: u16 = 45;

pub(crate) const MODAL_WIDTH_PERCENT: u16 = 70;
pub(crate) const MODAL_MIN_WIDTH: u16 = 30;
pub(crate) const KEY_EDITOR_WIDTH_PERCENT: u16 = 80;
pub(crate) const KEY_EDITOR_HEIGHT_PERCENT: u16 = 80;
pub(crate) const PICKER_WIDTH_PERCENT: u16 = 70;
pub(crate) const PICKER_HEIGHT_PERCENT: u16 = 80;
pub(crate) const PICKER_FOOTER_HEIGHT: u16 = 2;
pub(crate) const MENU_WIDTH: u16 = 36;

pub(crate) const POPUP_MIN_WIDTH: u16 = 10;
pub(crate) const POPUP_MIN_HEIGHT: u16 = 5;
