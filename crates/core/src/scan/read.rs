use std::fs;
use std::io::{self, Read};
use std::path::Path;

use tracing::warn;

use crate::types::LoadStats;

pub(crate) fn make_rel_path(root: &Path, abs_path: &Path) -> String {
    match abs_path.strip_prefix(root) {
        Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
        Err(_) => abs_path.to_string_lossy().replace('\\', "/"),
    }
}

fn record_io_skip(stats: &mut LoadStats, path: &Path, err: &io::Error) {
    match err.kind() {
        io::ErrorKind::NotFound => {
            stats.skipped_not_found = stats.skipped_not_found.saturating_add(1);
        }
        io::ErrorKind::PermissionDenied => {
            warn!(path = %path.display(), "permission denied; skipping");
            stats.skipped_permission_denied = stats.skipped_permission_denied.saturating_add(1);
        }
        _ => {
            warn!(path = %path.display(), error = %err, "read failed; skipping");
            stats.skipped_walk_errors = stats.skipped_walk_errors.saturating_add(1);
        }
    }
}

/// Reads one file as lossily-decoded text.
///
/// Returns `Ok(None)` for files that are skipped: missing, unreadable, larger
/// than `max_file_size`, or containing a NUL byte.
pub(crate) fn read_source_file(
    path: &Path,
    max_file_size: Option<u64>,
    stats: &mut LoadStats,
) -> io::Result<Option<String>> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(err) => {
            record_io_skip(stats, path, &err);
            return Ok(None);
        }
    };
    if metadata.file_type().is_symlink() {
        stats.skipped_walk_errors = stats.skipped_walk_errors.saturating_add(1);
        return Ok(None);
    }
    if let Some(max_file_size) = max_file_size
        && metadata.len() > max_file_size
    {
        warn!(path = %path.display(), size = metadata.len(), "file too large; skipping");
        stats.skipped_too_large = stats.skipped_too_large.saturating_add(1);
        return Ok(None);
    }

    let mut file = match fs::File::open(path) {
        Ok(f) => f,
        Err(err) => {
            record_io_skip(stats, path, &err);
            return Ok(None);
        }
    };

    let mut bytes: Vec<u8> = Vec::with_capacity(metadata.len().min(1024 * 1024) as usize);
    let mut total_read: u64 = 0;
    let mut buf = [0u8; 16 * 1024];
    loop {
        let n = match file.read(&mut buf) {
            Ok(n) => n,
            Err(err) => {
                record_io_skip(stats, path, &err);
                return Ok(None);
            }
        };
        if n == 0 {
            break;
        }
        if buf[..n].contains(&0) {
            warn!(path = %path.display(), "binary file; skipping");
            stats.skipped_binary = stats.skipped_binary.saturating_add(1);
            return Ok(None);
        }
        total_read = total_read.saturating_add(n as u64);
        // The file may have grown since the metadata check.
        if let Some(max_file_size) = max_file_size
            && total_read > max_file_size
        {
            warn!(path = %path.display(), "file too large; skipping");
            stats.skipped_too_large = stats.skipped_too_large.saturating_add(1);
            return Ok(None);
        }
        bytes.extend_from_slice(&buf[..n]);
    }

    stats.loaded_files = stats.loaded_files.saturating_add(1);
    stats.loaded_bytes = stats.loaded_bytes.saturating_add(total_read);
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}
