//! Path and filter utilities

use anyhow::{Context, Result};
use image::ImageFormat;
use std::path::{Path, PathBuf};

use crate::utils::config::IMAGE_EXTENSIONS;

/// Lowercased file name of `path`, if it has one.
fn lower_file_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
}

/// True if the file name ends with a supported image extension (case-insensitive).
pub fn is_image_file(path: &Path) -> bool {
    match lower_file_name(path) {
        Some(name) => IMAGE_EXTENSIONS
            .iter()
            .any(|ext| name.ends_with(&format!(".{ext}"))),
        None => false,
    }
}

/// Encoder format implied by the file's extension. Anything unrecognised falls back to JPEG.
pub fn format_for_path(path: &Path) -> ImageFormat {
    let name = lower_file_name(path).unwrap_or_default();
    if name.ends_with(".jpg") || name.ends_with(".jpeg") {
        ImageFormat::Jpeg
    } else if name.ends_with(".png") {
        ImageFormat::Png
    } else if name.ends_with(".bmp") {
        ImageFormat::Bmp
    } else if name.ends_with(".gif") {
        ImageFormat::Gif
    } else {
        ImageFormat::Jpeg
    }
}

/// Where Copy puts `path`: `<dest>/<file name>`. None if `path` has no file name.
pub fn copy_target(path: &Path, dest: &Path) -> Option<PathBuf> {
    path.file_name().map(|name| dest.join(name))
}

/// Returns true if the walk should visit `path` (file or directory): not the excluded directory
/// (the copy destination when it lies inside the tree) and not matched by an exclude pattern.
/// Patterns are tried against the name and the path relative to `root`.
pub fn should_include_in_walk(
    path: &Path,
    root: &Path,
    excluded_dir: &Option<PathBuf>,
    exclude_patterns: &[String],
) -> bool {
    if let Some(dir) = excluded_dir
        && path == dir.as_path()
    {
        return false;
    }
    if exclude_patterns.is_empty() {
        return true;
    }
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return true,
    };
    let rel = path_relative_to(path, root).unwrap_or_else(|| path.to_path_buf());
    let rel_str = rel.to_string_lossy().replace('\\', "/");
    !exclude_patterns
        .iter()
        .any(|pattern| glob_match(pattern, name) || glob_match(pattern, &rel_str))
}

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Simple glob pattern matching (supports * and ?)
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.strip_prefix('!').unwrap_or(pattern).chars().collect();
    let text: Vec<char> = text.chars().collect();
    glob_match_chars(&pattern, &text)
}

fn glob_match_chars(pattern: &[char], text: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some(('*', rest)) => {
            if rest.is_empty() {
                return true; // trailing * matches everything
            }
            (0..=text.len()).any(|i| glob_match_chars(rest, &text[i..]))
        }
        Some(('?', rest)) => !text.is_empty() && glob_match_chars(rest, &text[1..]),
        Some((c, rest)) => text.first() == Some(c) && glob_match_chars(rest, &text[1..]),
    }
}

/// Canonicalize the source root and make sure it can be listed. An unreadable root is fatal.
pub fn check_root_and_canonicalize(path: &Path) -> Result<PathBuf> {
    let root = path
        .canonicalize()
        .with_context(|| format!("cannot access source directory {}", path.display()))?;
    if !root.is_dir() {
        anyhow::bail!("source is not a directory: {}", root.display());
    }
    std::fs::read_dir(&root)
        .with_context(|| format!("cannot read source directory {}", root.display()))?;
    Ok(root)
}

/// Best-effort absolute form of a directory that may not exist yet: canonical if it exists,
/// else its canonical parent joined with its name, else lexically absolute.
pub fn resolve_dir(dir: &Path) -> PathBuf {
    if let Ok(canonical) = dir.canonicalize() {
        return canonical;
    }
    if let (Some(parent), Some(name)) = (dir.parent(), dir.file_name())
        && let Ok(parent) = resolve_parent(parent)
    {
        return parent.join(name);
    }
    std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf())
}

fn resolve_parent(parent: &Path) -> std::io::Result<PathBuf> {
    if parent.as_os_str().is_empty() {
        Path::new(".").canonicalize()
    } else {
        parent.canonicalize()
    }
}
