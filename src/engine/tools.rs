//! Path and naming utilities

use std::path::Path;

use crate::utils::config::HIDDEN_PREFIX;

/// True when the final path component starts with the hidden-file marker.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(HIDDEN_PREFIX))
}

/// Diagnostic name for an archive member: `archive.tar.gz:dir/member.ttl`.
pub fn member_display_name(archive: &str, member: &str) -> String {
    format!("{archive}:{member}")
}

/// Lowercased final extension of `name` (no dot), if any.
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}
