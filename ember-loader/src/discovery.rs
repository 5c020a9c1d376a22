use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

/// Collect every file under `root` with the given extension, recursively.
///
/// Entries are visited in file-name order at every level, so the result is
/// stable across calls. A missing root yields an empty list.
pub fn discover(root: &Path, extension: &str) -> Vec<PathBuf> {
    if !root.is_dir() {
        warn!(root = %root.display(), "descriptor directory does not exist");
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                warn!(?source, root = %root.display(), "skipping unreadable directory entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches {
            files.push(entry.into_path());
        }
    }

    files
}
