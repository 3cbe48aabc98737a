use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TaskError;
use crate::utils::config::PackagePaths;

/// Sibling path an overwrite of `path` is staged in, e.g. `photo.png` -> `photo.png.imgbatch.tmp`.
/// The suffix is not an image extension, so the walker never picks staged files up.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.parent()
        .unwrap_or(Path::new("."))
        .join(format!("{name}{}", PackagePaths::get().temp_suffix()))
}

/// Write `path` through a staged temp file: `write` fills the temp, then it is renamed over `path`.
/// On any failure the temp is removed and `path` is left as it was.
pub fn replace_via_temp<F>(path: &Path, write: F) -> Result<(), TaskError>
where
    F: FnOnce(&Path) -> Result<(), TaskError>,
{
    let temp_path = temp_path_for(path);
    if let Err(e) = write(&temp_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(TaskError::io(path, e));
    }
    Ok(())
}
