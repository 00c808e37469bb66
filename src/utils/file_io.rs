use std::fs::create_dir_all;
use std::fs::File;
use std::fs::OpenOptions;
use std::path::Path;
use std::path::PathBuf;

use tracing::error;

use crate::Result;

pub fn create_parent_dir_if_not_exist(path: &Path) -> Result<()> {
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.exists() {
            if let Err(e) = create_dir_all(parent_dir) {
                error!("Failed to create log directory: {:?}", e);
                return Err(e.into());
            }
        }
    }
    Ok(())
}

/// Open (creating if needed) a file for appending, with its parent
/// directories created on demand. Used for the per-node log file.
pub fn open_file_for_append(path: PathBuf) -> Result<File> {
    create_parent_dir_if_not_exist(&path)?;
    let log_file = OpenOptions::new().append(true).create(true).open(&path)?;
    Ok(log_file)
}
