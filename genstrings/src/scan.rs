//! Source file discovery

use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Walk the tree under `root` and return every file whose name ends with
/// `suffix`, in file-name order at each level.
///
/// Entries that cannot be read while walking (permissions, broken links) are
/// logged and skipped.
pub fn find_sources(root: &Path, suffix: &str) -> Vec<PathBuf> {
    let mut matches = Vec::new();

    for entry_result in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };

        if !entry.path().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if file_name.ends_with(suffix) {
            matches.push(entry.into_path());
        }
    }

    matches
}
