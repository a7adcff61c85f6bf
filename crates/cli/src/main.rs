use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use copy_code_check_core::{
    CorpusError, DocumentStore, Engine, LanguageProfile, MemoryStore, load_documents,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod args;
mod json;
mod text;

use args::{Command, Mode, ParsedArgs, parse_args, print_help};
use json::{
    JsonLoadStats, JsonNormalizedLine, map_comparisons, map_diff_rows, map_maxima, write_json,
};
use text::{format_diff, format_load_stats, format_normalized, format_ranked, format_summary};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let parsed = match parse_args(&args) {
        Ok(Command::Run(parsed)) => parsed,
        Ok(Command::Help) => {
            print_help();
            return;
        }
        Ok(Command::Version) => {
            println!("copy-code-check {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Err(message) => {
            eprintln!("Error: {message}\n");
            print_help();
            std::process::exit(2);
        }
    };

    let roots = match resolve_roots(&parsed.roots) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    match run(&parsed, &roots) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

/// Absolute roots, so single-root labels come from real directory names.
fn resolve_roots(roots: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    roots
        .iter()
        .map(|root| {
            fs::canonicalize(root).map_err(|err| {
                io::Error::new(err.kind(), format!("root {}: {err}", root.display()))
            })
        })
        .collect()
}

fn build_engine(parsed: &ParsedArgs) -> io::Result<Engine> {
    let profile = match &parsed.profile {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|err| {
                io::Error::new(err.kind(), format!("profile {}: {err}", path.display()))
            })?;
            serde_json::from_str::<LanguageProfile>(&raw).map_err(|err| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("profile {}: {err}", path.display()),
                )
            })?
        }
        None => LanguageProfile::default(),
    };
    let profile = if parsed.strip_comments {
        profile.with_comment_stripping()
    } else {
        profile
    };
    profile.compile().map_err(|err| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("invalid profile: {err}"))
    })
}

fn corpus_error(err: CorpusError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
}

fn document<'s>(store: &'s MemoryStore, id: &str) -> io::Result<&'s str> {
    store
        .get(id)
        .ok_or_else(|| corpus_error(CorpusError::UnknownDocument(id.to_string())))
}

fn run(parsed: &ParsedArgs, roots: &[PathBuf]) -> io::Result<i32> {
    let engine = build_engine(parsed)?;
    let outcome = load_documents(roots, &parsed.load)?;
    let store = &outcome.store;
    let stats = JsonLoadStats::from(outcome.stats.clone());
    let ids = store.list();
    debug!(documents = ids.len(), mode = ?parsed.mode, "running");

    match &parsed.mode {
        Mode::Rank => {
            let results = engine
                .compare_all(store, &ids, &parsed.compare)
                .map_err(corpus_error)?;
            let pairs = map_comparisons(results);
            if parsed.json {
                if parsed.stats {
                    write_json(&serde_json::json!({
                        "pairs": pairs,
                        "loadStats": stats,
                    }))?;
                } else {
                    write_json(&pairs)?;
                }
            } else {
                print!("{}", format_ranked(&pairs, parsed.compare.threshold));
            }
        }
        Mode::Summary => {
            let maxima = engine
                .max_similarity_map(store, &ids, parsed.compare.parallel)
                .map_err(corpus_error)?;
            let maxima = map_maxima(maxima);
            if parsed.json {
                if parsed.stats {
                    write_json(&serde_json::json!({
                        "documents": maxima,
                        "loadStats": stats,
                    }))?;
                } else {
                    write_json(&maxima)?;
                }
            } else {
                print!("{}", format_summary(&maxima));
            }
        }
        Mode::Diff { a, b } => {
            let content_a = document(store, a)?;
            let content_b = document(store, b)?;
            let score = engine.score(content_a, content_b);
            let rows = map_diff_rows(engine.render_diff(content_a, content_b));
            if parsed.json {
                write_json(&serde_json::json!({
                    "a": a,
                    "b": b,
                    "score": score,
                    "rows": rows,
                }))?;
            } else {
                print!("{}", format_diff(a, b, score, &rows));
            }
        }
        Mode::Normalize { id } => {
            document(store, id)?;
            let lines: Vec<JsonNormalizedLine> = store
                .documents()
                .iter()
                .filter(|doc| doc.id == *id)
                .flat_map(|doc| doc.numbered_lines())
                .map(|(line, raw)| {
                    let normalized = engine.normalize(raw);
                    JsonNormalizedLine {
                        line,
                        raw: raw.to_string(),
                        canonical: normalized.text,
                        significant: normalized.significant,
                        boilerplate: engine.is_boilerplate(raw),
                    }
                })
                .collect();
            if parsed.json {
                write_json(&serde_json::json!({
                    "id": id,
                    "lines": lines,
                }))?;
            } else {
                print!("{}", format_normalized(id, &lines));
            }
        }
    }

    if parsed.stats && !parsed.json {
        eprint!("{}", format_load_stats(&stats));
    }

    Ok(0)
}
