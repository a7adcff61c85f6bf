use thiserror::Error;

/// Raised once, when a [`LanguageProfile`](crate::LanguageProfile) is compiled.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("{field}[{index}]: invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        field: &'static str,
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("{field}: `{value}` is not a valid identifier")]
    InvalidWord { field: &'static str, value: String },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("operators: `{0}` is a word or whitespace character")]
    InvalidOperator(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorpusError {
    #[error("unknown document: {0}")]
    UnknownDocument(String),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}
