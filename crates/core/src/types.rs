use std::collections::HashSet;
use std::ops::Range;

use crate::error::CorpusError;
use crate::store::MemoryStore;

pub const DEFAULT_THRESHOLD: f64 = 50.0;

/// How a single token of a line was classified during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Keyword,
    DataType,
    StringLiteral,
    CharLiteral,
    NumericLiteral,
    /// Identifier declared on the same line; carries the upper-cased type tag.
    TypedIdentifier(String),
    Identifier,
    Punctuation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub class: TokenClass,
}

/// Canonical form of one raw source line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedLine {
    pub text: String,
    pub significant: bool,
    pub tokens: Vec<Token>,
}

impl NormalizedLine {
    pub(crate) fn insignificant() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// A contiguous segment relating `a[a_range]` to `b[b_range]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentOp {
    pub tag: OpTag,
    pub a_range: Range<usize>,
    pub b_range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub a: String,
    pub b: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowClass {
    None,
    Match,
    Change,
    Insert,
    Delete,
}

impl RowClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Match => "match",
            Self::Change => "change",
            Self::Insert => "insert",
            Self::Delete => "delete",
        }
    }
}

/// One rendered line of a side-by-side diff. Line numbers are 1-based;
/// `None` marks padding on the shorter side of an op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRow {
    pub class: RowClass,
    pub left_line: Option<usize>,
    pub left_text: String,
    pub right_line: Option<usize>,
    pub right_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompareOptions {
    /// Minimum score in percent; inclusive.
    pub threshold: f64,
    pub parallel: bool,
    pub max_results: Option<usize>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            parallel: true,
            max_results: None,
        }
    }
}

impl CompareOptions {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_max_results(mut self, max_results: Option<usize>) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn validate(&self) -> Result<(), CorpusError> {
        if !self.threshold.is_finite() || !(0.0..=100.0).contains(&self.threshold) {
            return Err(CorpusError::InvalidOptions(format!(
                "threshold must be 0..100, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

pub fn default_ignore_dirs() -> HashSet<String> {
    [
        ".git",
        ".hg",
        ".svn",
        "node_modules",
        "target",
        "dist",
        "build",
        "out",
        ".cache",
        "__pycache__",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

pub fn default_extensions() -> HashSet<String> {
    ["c", "cc", "cpp", "cxx", "h", "hpp", "java", "py"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Filters for filling a store from directories on disk.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub ignore_dirs: HashSet<String>,
    /// Lower-case extensions without the dot. Empty accepts every file.
    pub extensions: HashSet<String>,
    pub max_file_size: Option<u64>,
    pub respect_gitignore: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            ignore_dirs: default_ignore_dirs(),
            extensions: default_extensions(),
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE_BYTES),
            respect_gitignore: true,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadStats {
    pub candidate_files: u64,
    pub loaded_files: u64,
    pub loaded_bytes: u64,
    pub skipped_extension: u64,
    pub skipped_not_found: u64,
    pub skipped_permission_denied: u64,
    pub skipped_too_large: u64,
    pub skipped_binary: u64,
    pub skipped_walk_errors: u64,
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub store: MemoryStore,
    pub stats: LoadStats,
}
