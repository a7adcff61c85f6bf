use std::collections::HashMap;

use crate::profile::Engine;
use crate::store::source_lines;
use crate::types::{NormalizedLine, Token, TokenClass};

pub const STR_PLACEHOLDER: &str = "STR";
pub const CHAR_PLACEHOLDER: &str = "CHAR";
pub const NUM_PLACEHOLDER: &str = "NUM";
pub const IDENT_PLACEHOLDER: &str = "VAR";
const TYPED_PREFIX: &str = "VAR_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken<'a> {
    Word(&'a str),
    Punct(char),
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn tokenize<'a>(text: &'a str, engine: &Engine) -> Vec<RawToken<'a>> {
    let mut out = Vec::new();
    let mut word_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if is_word_char(ch) {
            if word_start.is_none() {
                word_start = Some(idx);
            }
            continue;
        }
        if let Some(start) = word_start.take() {
            out.push(RawToken::Word(&text[start..idx]));
        }
        if engine.is_operator(ch) {
            out.push(RawToken::Punct(ch));
        }
    }
    if let Some(start) = word_start {
        out.push(RawToken::Word(&text[start..]));
    }
    out
}

impl Engine {
    /// Canonical token string of one raw line.
    ///
    /// Rules run in a fixed order: comment rules (if any), I/O / include /
    /// trivial-return stripping, the structural short-circuit, literal
    /// placeholders, declaration scanning, then token classification.
    pub fn normalize(&self, line: &str) -> NormalizedLine {
        let mut text = line.to_string();
        for rule in self.comment_rules.iter().chain(&self.strip_rules) {
            text = rule.apply(&text);
        }
        if self.is_trivial(&text) {
            return NormalizedLine::insignificant();
        }

        for rule in &self.literal_rules {
            text = rule.apply(&text);
        }

        let declared = self.declared_identifiers(&text);
        let tokens: Vec<Token> = tokenize(&text, self)
            .into_iter()
            .map(|raw| self.classify(raw, &declared))
            .collect();

        let canonical = tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        // A canonical form that is itself trivial (`else:` -> `else`) would be
        // dropped on re-normalization; drop it now so canonical forms are fixed points.
        if self.is_trivial(&canonical) {
            return NormalizedLine::insignificant();
        }

        NormalizedLine {
            text: canonical,
            significant: true,
            tokens,
        }
    }

    pub fn normalize_document(&self, content: &str) -> Vec<NormalizedLine> {
        source_lines(content).map(|line| self.normalize(line)).collect()
    }

    fn is_trivial(&self, text: &str) -> bool {
        let trimmed = text.trim();
        trimmed.is_empty()
            || trimmed == ";"
            || trimmed.chars().count() < 2
            || self.structural_tokens.contains(trimmed)
    }

    fn declared_identifiers(&self, text: &str) -> HashMap<String, String> {
        let mut declared = HashMap::new();
        for caps in self.declaration.captures_iter(text) {
            let (Some(ty), Some(name)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            if self.keywords.contains(name.as_str()) {
                continue;
            }
            declared.insert(name.as_str().to_string(), ty.as_str().to_uppercase());
        }
        declared
    }

    fn typed_placeholder_tag<'a>(&self, word: &'a str) -> Option<&'a str> {
        let tag = word.strip_prefix(TYPED_PREFIX)?;
        self.data_types
            .iter()
            .any(|ty| ty.to_uppercase() == tag)
            .then_some(tag)
    }

    fn classify(&self, raw: RawToken<'_>, declared: &HashMap<String, String>) -> Token {
        let word = match raw {
            RawToken::Punct(ch) => {
                return Token {
                    text: ch.to_string(),
                    class: TokenClass::Punctuation,
                };
            }
            RawToken::Word(word) => word,
        };

        let (text, class) = if self.keywords.contains(word) {
            (word.to_string(), TokenClass::Keyword)
        } else if self.data_types.contains(word) {
            (word.to_string(), TokenClass::DataType)
        } else if word == STR_PLACEHOLDER {
            (word.to_string(), TokenClass::StringLiteral)
        } else if word == CHAR_PLACEHOLDER {
            (word.to_string(), TokenClass::CharLiteral)
        } else if word == NUM_PLACEHOLDER {
            (word.to_string(), TokenClass::NumericLiteral)
        } else if let Some(tag) = declared.get(word) {
            (
                format!("{TYPED_PREFIX}{tag}"),
                TokenClass::TypedIdentifier(tag.clone()),
            )
        } else if let Some(tag) = self.typed_placeholder_tag(word) {
            (word.to_string(), TokenClass::TypedIdentifier(tag.to_string()))
        } else {
            (IDENT_PLACEHOLDER.to_string(), TokenClass::Identifier)
        };
        Token { text, class }
    }
}
