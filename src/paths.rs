//! XDG-compliant location of the catalogue database.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "pcat";

/// Data directory for the catalogue: `$XDG_DATA_HOME/pcat`, else
/// `~/.local/share/pcat`.
///
/// Returns `None` when neither `XDG_DATA_HOME` nor `HOME` is set.
pub fn data_dir() -> Option<PathBuf> {
    let data_home = match env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(env::var_os("HOME")?).join(".local/share"),
    };
    Some(data_home.join(APP_DIR))
}

/// Default database file: `<data_dir>/prompts.db`.
pub fn db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("prompts.db"))
}
