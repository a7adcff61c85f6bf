use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::store::{Document, MemoryStore};
use crate::types::{LoadOptions, LoadOutcome, LoadStats};

mod read;
mod walker;


use read::{make_rel_path, read_source_file};
use walker::visit_root_files;

pub(crate) fn validate_roots(roots: &[PathBuf]) -> io::Result<()> {
    for root in roots {
        let meta = fs::metadata(root)
            .map_err(|err| io::Error::new(err.kind(), format!("root {}: {err}", root.display())))?;
        if !meta.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("root {} is not a directory", root.display()),
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub(crate) struct Root {
    pub(crate) path: PathBuf,
    /// Id prefix; `None` when a single root is loaded.
    pub(crate) label: Option<String>,
}

pub(crate) fn root_label(root: &Path, id: usize) -> String {
    root.file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("root{id}"))
}

fn labelled_roots(roots: &[PathBuf]) -> Vec<Root> {
    if roots.len() == 1 {
        return vec![Root {
            path: roots[0].clone(),
            label: None,
        }];
    }
    let mut used = HashSet::new();
    roots
        .iter()
        .enumerate()
        .map(|(id, path)| {
            let mut label = root_label(path, id);
            if !used.insert(label.clone()) {
                label = format!("{label}-{id}");
                used.insert(label.clone());
            }
            Root {
                path: path.clone(),
                label: Some(label),
            }
        })
        .collect()
}

fn ignore_dirs_contains(ignore_dirs: &HashSet<String>, name: &str) -> bool {
    if ignore_dirs.contains(name) {
        return true;
    }
    #[cfg(windows)]
    {
        ignore_dirs.iter().any(|d| d.eq_ignore_ascii_case(name))
    }
    #[cfg(not(windows))]
    {
        false
    }
}

fn has_allowed_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    if extensions.is_empty() {
        return true;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext.to_ascii_lowercase()))
}

/// Walks `roots` and loads every accepted source file into a fresh store.
///
/// Ids are paths relative to their root, using `/` separators, prefixed with
/// the root's directory name when more than one root is given. Documents are
/// inserted in sorted id order. Unreadable files are counted in the returned
/// stats rather than failing the load.
pub fn load_documents(roots: &[PathBuf], options: &LoadOptions) -> io::Result<LoadOutcome> {
    validate_roots(roots)?;

    let mut stats = LoadStats::default();
    let mut docs: Vec<Document> = Vec::new();
    for root in labelled_roots(roots) {
        visit_root_files(&root, options, &mut stats, |stats, abs_path| {
            if !has_allowed_extension(&abs_path, &options.extensions) {
                stats.skipped_extension = stats.skipped_extension.saturating_add(1);
                return Ok(());
            }
            let Some(content) = read_source_file(&abs_path, options.max_file_size, stats)? else {
                return Ok(());
            };
            let rel = make_rel_path(&root.path, &abs_path);
            let id = match root.label.as_deref() {
                Some(label) => format!("{label}/{rel}"),
                None => rel,
            };
            docs.push(Document::new(id, content));
            Ok(())
        })?;
    }

    docs.sort_by(|a, b| a.id.cmp(&b.id));
    let store: MemoryStore = docs.into_iter().collect();

    info!(
        roots = roots.len(),
        documents = store.len(),
        bytes = stats.loaded_bytes,
        skipped_binary = stats.skipped_binary,
        skipped_too_large = stats.skipped_too_large,
        "loaded documents"
    );
    Ok(LoadOutcome { store, stats })
}
