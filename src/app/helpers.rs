use std::path::Path;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::browser::{build_listing, list_local};
use crate::model::DirEntry;

pub(crate) fn is_ctrl(key: &KeyEvent, ch: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(ch)
}

/// Moves `current` by `delta`, clamped to `0..len`.
pub(crate) fn step_index(current: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}

pub(crate) fn picker_entries(dir: &Path, show_hidden: bool) -> Result<Vec<DirEntry>> {
    let raw = list_local(dir)?;
    Ok(build_listing(raw, dir.parent().is_none(), show_hidden))
}

/// Printable characters that should reach a text field.
pub(crate) fn typed_char(key: &KeyEvent) -> Option<char> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(ch) => Some(ch),
        _ => None,
    }
}
