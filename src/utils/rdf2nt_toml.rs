//! Load `.rdf2nt.toml` from a directory (CLI only). Lib callers build [`Opts`] directly.

use serde::Deserialize;
use std::path::Path;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct Rdf2ntToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    recursive: Option<bool>,
    strict: Option<bool>,
    format: Option<String>,
    batch_size: Option<usize>,
    channel_capacity: Option<usize>,
    poll_timeout_ms: Option<u64>,
    max_polls: Option<usize>,
}

/// Load the config file from `dir` if present. Returns None if missing; warns and returns None if malformed.
pub fn load_rdf2nt_toml(dir: &Path) -> Option<Rdf2ntToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_rdf2nt_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

pub fn parse_rdf2nt_toml(s: &str) -> Result<Rdf2ntToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $opts:expr, $file_field:ident => $opts_field:ident) => {
        if let Some(v) = $section.$file_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
pub fn apply_file_to_opts(file: &Rdf2ntToml, opts: &mut Opts) {
    let s = &file.settings;
    apply_file_opt!(s, opts, recursive => recursive);
    apply_file_opt!(s, opts, strict => strict);
    if let Some(ref ext) = s.format {
        opts.format = Some(ext.clone());
    }
    apply_file_opt!(s, opts, batch_size => batch_size);
    apply_file_opt!(s, opts, channel_capacity => channel_cap);
    apply_file_opt!(s, opts, poll_timeout_ms => poll_timeout_ms);
    apply_file_opt!(s, opts, max_polls => max_polls);
}
