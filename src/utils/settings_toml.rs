//! Load `.imgbatch.toml` from the source directory (CLI only). Lib callers build [`Opts`] themselves.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct SettingsToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    recursive: Option<bool>,
    follow_links: Option<bool>,
    exclude: Option<Vec<String>>,
    verbose: Option<bool>,
    shutdown_timeout_secs: Option<u64>,
}

/// Parse settings from TOML text.
pub fn parse_settings_toml(s: &str) -> Result<SettingsToml, toml::de::Error> {
    toml::from_str(s)
}

/// Load the settings file from `dir`. `Ok(None)` when there is no file; an error when it exists
/// but cannot be read or parsed.
pub fn load_settings_toml(dir: &Path) -> Result<Option<SettingsToml>> {
    let path = dir.join(PackagePaths::get().settings_filename());
    if !path.is_file() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("read settings file {}", path.display()))?;
    let file = parse_settings_toml(&s)
        .with_context(|| format!("parse settings file {}", path.display()))?;
    Ok(Some(file))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file settings to opts (only fields present in the file). Call before applying CLI.
/// The operation is never taken from the file.
pub fn apply_settings_to_opts(file: &SettingsToml, opts: &mut Opts) {
    let sec = &file.settings;
    apply_file_opt!(sec, opts, recursive => recursive);
    apply_file_opt!(sec, opts, follow_links => follow_links);
    apply_file_opt!(sec, opts, verbose => verbose);
    if let Some(ref v) = sec.exclude {
        opts.exclude = v.clone();
    }
    if let Some(secs) = sec.shutdown_timeout_secs {
        opts.shutdown_timeout = Duration::from_secs(secs);
    }
}
