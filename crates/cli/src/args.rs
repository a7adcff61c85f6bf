use std::env;
use std::path::PathBuf;

use copy_code_check_core::{CompareOptions, LoadOptions};

const HELP_TEXT: &str = concat!(
    "copy-code-check (similarity ranking for source-code submissions)\n",
    "\n",
    "Usage:\n",
    "  copy-code-check [options] [root ...]\n",
    "\n",
    "Modes:\n",
    "  (default)               Rank every pair of documents by similarity\n",
    "  --summary               Print each document's highest similarity\n",
    "  --diff <idA> <idB>      Side-by-side diff of two documents\n",
    "  --normalize <id>        Print the canonical form of every line\n",
    "\n",
    "Options:\n",
    "  --json                  Output JSON\n",
    "  --stats                 Include load stats (JSON) or print to stderr\n",
    "  --threshold <f>         Minimum score, percent 0..100 (default: 50)\n",
    "  --max-results <n>       Keep at most n ranked pairs\n",
    "  --profile <file>        Language profile JSON (default: built-in C family)\n",
    "  --strip-comments        Remove // and /* */ comments before comparing\n",
    "  --ext <ext>             Accept files with this extension (repeatable)\n",
    "  --ignore-dir <name>     Add an ignored directory name (repeatable)\n",
    "  --no-gitignore          Do not respect .gitignore rules\n",
    "  --max-file-size <n>     Skip files larger than n bytes (default: 10485760)\n",
    "  --sequential            Compare pairs on a single thread\n",
    "  -V, --version           Show version\n",
    "  -h, --help              Show help\n",
    "\n",
    "Logging goes to stderr and is controlled by RUST_LOG (default: warn).\n",
    "\n",
    "Examples:\n",
    "  copy-code-check submissions/\n",
    "  copy-code-check --threshold 80 --max-results 20 class-a/ class-b/\n",
    "  copy-code-check --diff alice/hw1.cpp bob/hw1.cpp class-a/ class-b/\n",
    "  copy-code-check --summary --json --ext py .\n",
    "\n"
);

pub(crate) fn print_help() {
    print!("{HELP_TEXT}");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Mode {
    Rank,
    Summary,
    Diff { a: String, b: String },
    Normalize { id: String },
}

impl Mode {
    fn flag(&self) -> &'static str {
        match self {
            Self::Rank => "",
            Self::Summary => "--summary",
            Self::Diff { .. } => "--diff",
            Self::Normalize { .. } => "--normalize",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ParsedArgs {
    pub(crate) json: bool,
    pub(crate) stats: bool,
    pub(crate) strip_comments: bool,
    pub(crate) mode: Mode,
    pub(crate) profile: Option<PathBuf>,
    pub(crate) roots: Vec<PathBuf>,
    pub(crate) compare: CompareOptions,
    pub(crate) load: LoadOptions,
}

#[derive(Debug, Clone)]
pub(crate) enum Command {
    Help,
    Version,
    Run(Box<ParsedArgs>),
}

fn value<'a>(argv: &'a [String], i: usize, name: &str) -> Result<&'a str, String> {
    argv.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{name} requires a value"))
}

fn parse_u64(name: &str, raw: &str) -> Result<u64, String> {
    raw.parse::<u64>()
        .map_err(|_| format!("{name} must be an integer"))
}

fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value = raw
        .parse::<f64>()
        .map_err(|_| "--threshold must be a number".to_string())?;
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err("--threshold must be 0..100".to_string());
    }
    Ok(value)
}

fn set_mode(current: &mut Mode, next: Mode) -> Result<(), String> {
    if *current != Mode::Rank {
        return Err(format!("{} conflicts with {}", next.flag(), current.flag()));
    }
    *current = next;
    Ok(())
}

pub(crate) fn parse_args(argv: &[String]) -> Result<Command, String> {
    let mut roots: Vec<PathBuf> = Vec::new();
    let mut ignore_dirs: Vec<String> = Vec::new();
    let mut extensions: Vec<String> = Vec::new();
    let mut mode = Mode::Rank;
    let mut json = false;
    let mut stats = false;
    let mut strip_comments = false;
    let mut respect_gitignore = true;
    let mut parallel = true;
    let mut profile: Option<PathBuf> = None;
    let mut threshold: Option<f64> = None;
    let mut max_results: Option<usize> = None;
    let mut max_file_size: Option<u64> = None;

    let mut i = 0;
    while i < argv.len() {
        let arg = argv[i].as_str();
        match arg {
            "--" => {
                roots.extend(argv[(i + 1)..].iter().map(PathBuf::from));
                break;
            }
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "--json" => json = true,
            "--stats" => stats = true,
            "--strip-comments" => strip_comments = true,
            "--no-gitignore" => respect_gitignore = false,
            "--gitignore" => respect_gitignore = true,
            "--sequential" => parallel = false,
            "--summary" => set_mode(&mut mode, Mode::Summary)?,
            "--diff" => {
                let a = value(argv, i, "--diff")?.to_string();
                let b = argv
                    .get(i + 2)
                    .ok_or("--diff requires two document ids")?
                    .to_string();
                set_mode(&mut mode, Mode::Diff { a, b })?;
                i += 3;
                continue;
            }
            "--normalize" => {
                let id = value(argv, i, "--normalize")?.to_string();
                set_mode(&mut mode, Mode::Normalize { id })?;
                i += 2;
                continue;
            }
            "--threshold" => {
                threshold = Some(parse_threshold(value(argv, i, arg)?)?);
                i += 2;
                continue;
            }
            "--max-results" => {
                let raw = parse_u64(arg, value(argv, i, arg)?)?;
                let n = usize::try_from(raw)
                    .map_err(|_| format!("--max-results must be <= {}", usize::MAX))?;
                max_results = Some(n);
                i += 2;
                continue;
            }
            "--max-file-size" => {
                max_file_size = Some(parse_u64(arg, value(argv, i, arg)?)?);
                i += 2;
                continue;
            }
            "--profile" => {
                profile = Some(PathBuf::from(value(argv, i, arg)?));
                i += 2;
                continue;
            }
            "--ext" => {
                let ext = value(argv, i, arg)?.trim_start_matches('.');
                if ext.is_empty() {
                    return Err("--ext must not be empty".to_string());
                }
                extensions.push(ext.to_ascii_lowercase());
                i += 2;
                continue;
            }
            "--ignore-dir" => {
                ignore_dirs.push(value(argv, i, arg)?.to_string());
                i += 2;
                continue;
            }
            _ if arg.starts_with('-') => return Err(format!("Unknown option: {arg}")),
            _ => roots.push(PathBuf::from(arg)),
        }
        i += 1;
    }

    let mut compare = CompareOptions::default()
        .with_parallel(parallel)
        .with_max_results(max_results);
    if let Some(threshold) = threshold {
        compare = compare.with_threshold(threshold);
    }

    let mut load = LoadOptions {
        respect_gitignore,
        ..LoadOptions::default()
    };
    if let Some(max_file_size) = max_file_size {
        load.max_file_size = Some(max_file_size);
    }
    if !extensions.is_empty() {
        load.extensions = extensions.into_iter().collect();
    }
    load.ignore_dirs.extend(ignore_dirs);

    let roots = if roots.is_empty() {
        vec![env::current_dir().map_err(|e| format!("failed to get cwd: {e}"))?]
    } else {
        roots
    };

    Ok(Command::Run(Box::new(ParsedArgs {
        json,
        stats,
        strip_comments,
        mode,
        profile,
        roots,
        compare,
        load,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn parsed(args: &[&str]) -> ParsedArgs {
        match parse_args(&argv(args)).unwrap() {
            Command::Run(parsed) => *parsed,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn defaults_rank_with_inclusive_fifty_percent() {
        let p = parsed(&["subs"]);
        assert_eq!(p.mode, Mode::Rank);
        assert_eq!(p.compare.threshold, 50.0);
        assert!(p.compare.parallel);
        assert_eq!(p.compare.max_results, None);
        assert_eq!(p.roots, vec![PathBuf::from("subs")]);
        assert!(p.load.extensions.contains("cpp"));
        assert!(p.load.respect_gitignore);
    }

    #[test]
    fn parses_comparison_and_load_options() {
        let p = parsed(&[
            "--threshold",
            "72.5",
            "--max-results",
            "3",
            "--sequential",
            "--ext",
            ".PY",
            "--ext",
            "java",
            "--ignore-dir",
            "vendor",
            "--no-gitignore",
            "--max-file-size",
            "2048",
            "--strip-comments",
            "a",
            "b",
        ]);
        assert_eq!(p.compare.threshold, 72.5);
        assert_eq!(p.compare.max_results, Some(3));
        assert!(!p.compare.parallel);
        assert_eq!(p.load.extensions.len(), 2);
        assert!(p.load.extensions.contains("py"));
        assert!(p.load.ignore_dirs.contains("vendor"));
        assert!(p.load.ignore_dirs.contains(".git"));
        assert!(!p.load.respect_gitignore);
        assert_eq!(p.load.max_file_size, Some(2048));
        assert!(p.strip_comments);
        assert_eq!(p.roots.len(), 2);
    }

    #[test]
    fn diff_takes_two_ids_before_roots() {
        let p = parsed(&["--diff", "x.c", "y.c", "root"]);
        assert_eq!(
            p.mode,
            Mode::Diff {
                a: "x.c".to_string(),
                b: "y.c".to_string()
            }
        );
        assert_eq!(p.roots, vec![PathBuf::from("root")]);

        let err = parse_args(&argv(&["--diff", "x.c"])).unwrap_err();
        assert!(err.contains("two document ids"));
    }

    #[test]
    fn modes_are_mutually_exclusive() {
        let err = parse_args(&argv(&["--summary", "--normalize", "a.c"])).unwrap_err();
        assert!(err.contains("conflicts"));
        let err = parse_args(&argv(&["--diff", "a", "b", "--summary"])).unwrap_err();
        assert!(err.contains("conflicts"));
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        for raw in ["-1", "100.5", "NaN", "abc"] {
            assert!(parse_args(&argv(&["--threshold", raw])).is_err(), "{raw}");
        }
        assert_eq!(parsed(&["--threshold", "100", "."]).compare.threshold, 100.0);
    }

    #[test]
    fn help_version_and_unknown_options() {
        assert!(matches!(parse_args(&argv(&["-h"])), Ok(Command::Help)));
        assert!(matches!(
            parse_args(&argv(&["--json", "--version"])),
            Ok(Command::Version)
        ));
        let err = parse_args(&argv(&["--bogus"])).unwrap_err();
        assert_eq!(err, "Unknown option: --bogus");
        let err = parse_args(&argv(&["--max-results"])).unwrap_err();
        assert_eq!(err, "--max-results requires a value");
    }

    #[test]
    fn double_dash_ends_options() {
        let p = parsed(&["--json", "--", "--weird-dir"]);
        assert!(p.json);
        assert_eq!(p.roots, vec![PathBuf::from("--weird-dir")]);
    }
}
