mod align;
mod boilerplate;
mod corpus;
mod diff;
mod error;
mod normalize;
mod profile;
mod scan;
mod similarity;
mod store;
mod types;

pub use align::{Match, SequenceMatcher};

pub use error::{CorpusError, ProfileError};

pub use normalize::{CHAR_PLACEHOLDER, IDENT_PLACEHOLDER, NUM_PLACEHOLDER, STR_PLACEHOLDER};

pub use profile::{Engine, LanguageProfile, RewriteRule};

pub use scan::load_documents;

pub use similarity::score_sequences;

pub use store::{Document, DocumentStore, MemoryStore, SourceLines, source_lines};

pub use types::{
    AlignmentOp, CompareOptions, ComparisonResult, DEFAULT_MAX_FILE_SIZE_BYTES, DEFAULT_THRESHOLD,
    DiffRow, LoadOptions, LoadOutcome, LoadStats, NormalizedLine, OpTag, RowClass, Token,
    TokenClass, default_extensions, default_ignore_dirs,
};
