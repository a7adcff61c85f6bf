use std::io;
use std::path::PathBuf;

use ignore::WalkBuilder;
use tracing::warn;

use crate::types::{LoadOptions, LoadStats};

use super::{Root, ignore_dirs_contains};

/// Calls `on_file_cb` for every regular file under `root`, skipping ignored
/// directories and symlinks. Walk errors are counted, not returned.
pub(crate) fn visit_root_files<F>(
    root: &Root,
    options: &LoadOptions,
    stats: &mut LoadStats,
    mut on_file_cb: F,
) -> io::Result<()>
where
    F: FnMut(&mut LoadStats, PathBuf) -> io::Result<()>,
{
    let ignore_dirs = options.ignore_dirs.clone();
    let respect_gitignore = options.respect_gitignore;
    let is_git_repo = root.path.join(".git").exists();

    let mut builder = WalkBuilder::new(&root.path);
    builder
        .hidden(false)
        .follow_links(false)
        .ignore(false)
        .git_ignore(respect_gitignore)
        .git_global(respect_gitignore && is_git_repo)
        .git_exclude(respect_gitignore && is_git_repo)
        .parents(false)
        .require_git(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    let walker = builder
        .filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            if entry.path_is_symlink() {
                return false;
            }
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            if !is_dir {
                return true;
            }
            !entry
                .file_name()
                .to_str()
                .is_some_and(|name| ignore_dirs_contains(&ignore_dirs, name))
        })
        .build();

    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                if let Some(io_err) = err.io_error() {
                    match io_err.kind() {
                        io::ErrorKind::NotFound => {
                            stats.skipped_not_found = stats.skipped_not_found.saturating_add(1);
                            continue;
                        }
                        io::ErrorKind::PermissionDenied => {
                            warn!(error = %err, "permission denied while walking");
                            stats.skipped_permission_denied =
                                stats.skipped_permission_denied.saturating_add(1);
                            continue;
                        }
                        _ => {}
                    }
                }
                warn!(error = %err, "walk error");
                stats.skipped_walk_errors = stats.skipped_walk_errors.saturating_add(1);
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }
        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        stats.candidate_files = stats.candidate_files.saturating_add(1);
        on_file_cb(stats, entry.into_path())?;
    }

    Ok(())
}
