//! Language profiles.
//!
//! A [`LanguageProfile`] is plain data: keyword and data-type sets, the ordered
//! rewrite rules of the normalization pipeline, and the raw-line boilerplate
//! patterns. [`LanguageProfile::compile`] validates it once and produces an
//! immutable [`Engine`]; nothing is re-validated at comparison time.

use std::collections::HashSet;

use regex::{Regex, RegexSet};
use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// One `(pattern, replacement)` step. `$n` in the replacement refers to
/// capture groups of the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

impl RewriteRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    pub fn strip(pattern: impl Into<String>) -> Self {
        Self::new(pattern, "")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct LanguageProfile {
    pub keywords: Vec<String>,
    pub data_types: Vec<String>,
    /// Applied before `strip_rules`; empty unless comment stripping is enabled.
    pub comment_rules: Vec<RewriteRule>,
    /// I/O calls, include/using lines and trivial returns, in this order.
    pub strip_rules: Vec<RewriteRule>,
    /// String, char and numeric literals to their placeholders.
    pub literal_rules: Vec<RewriteRule>,
    pub structural_tokens: Vec<String>,
    pub operators: String,
    pub boilerplate_patterns: Vec<String>,
    pub control_flow_keywords: Vec<String>,
}

impl Default for LanguageProfile {
    fn default() -> Self {
        Self::c_family()
    }
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl LanguageProfile {
    /// C, C++, Java and Python submissions.
    pub fn c_family() -> Self {
        Self {
            keywords: words(&[
                "if", "else", "for", "while", "do", "switch", "case", "break", "continue",
                "import", "def", "class", "public", "private", "return",
            ]),
            data_types: words(&[
                "int", "string", "float", "double", "char", "bool", "void",
            ]),
            comment_rules: Vec::new(),
            strip_rules: vec![
                RewriteRule::strip(r"(std::)?(cout|cin|cerr)\s*(<<|>>).*?;"),
                RewriteRule::strip(r"(printf|scanf|puts|gets|getchar)\s*\(.*?\);"),
                RewriteRule::strip(r"\bprint\s*\(.*?\)"),
                RewriteRule::strip(r"\binput\s*\(.*?\)"),
                RewriteRule::strip(r"System\.out\.print(ln|f)?\s*\(.*?\);"),
                RewriteRule::strip(r"^\s*#include.*"),
                RewriteRule::strip(r"^\s*using\s+namespace.*"),
                RewriteRule::strip(r"return\s+0\s*;"),
                RewriteRule::strip(r"return\s*;"),
            ],
            literal_rules: vec![
                RewriteRule::new(r#""[^"]*""#, " STR "),
                RewriteRule::new(r"'[^']*'", " CHAR "),
                RewriteRule::new(r"\b\d+\b", " NUM "),
            ],
            structural_tokens: words(&["{", "}", "};", "];", "):", "else"]),
            operators: "+-*/=<>!{};(),".to_string(),
            boilerplate_patterns: words(&[
                r"^\s*$",
                r"^\s*[{}()\[\];:,]+\s*$",
                r"^\s*\}?\s*else\s*\{?\s*$",
                r"^\s*#\s*include\b",
                r"^\s*using\s+namespace\b",
                r"^\s*import\s",
                r"^\s*from\s+\S+\s+import\s",
                r"^\s*(int|void)\s+main\s*\(",
                r"^\s*def\s+main\s*\(",
                r"\bstatic\s+void\s+main\s*\(",
                r"^\s*if\s+__name__\s*==",
                r"^\s*return\s*(0\s*)?;?\s*$",
                r"^\s*(std::)?(cout|cin|cerr)\b",
                r"^\s*(printf|scanf|puts|gets|getchar)\s*\(",
                r"^\s*(print|input)\s*\(",
                r"^\s*System\.(out|err)\.print",
            ]),
            control_flow_keywords: words(&["if", "for", "while", "switch", "catch", "else"]),
        }
    }

    /// Also drop `//` and single-line `/* ... */` comments before any other rule.
    pub fn with_comment_stripping(mut self) -> Self {
        self.comment_rules = vec![
            RewriteRule::new(r"/\*.*?\*/", " "),
            RewriteRule::strip(r"//.*$"),
        ];
        self
    }

    pub fn compile(self) -> Result<Engine, ProfileError> {
        check_words("keywords", &self.keywords, false)?;
        check_words("dataTypes", &self.data_types, true)?;
        check_words("controlFlowKeywords", &self.control_flow_keywords, false)?;

        let mut operators = Vec::new();
        for ch in self.operators.chars() {
            if ch.is_alphanumeric() || ch == '_' || ch.is_whitespace() {
                return Err(ProfileError::InvalidOperator(ch));
            }
            if !operators.contains(&ch) {
                operators.push(ch);
            }
        }

        let comment_rules = compile_rules("commentRules", &self.comment_rules)?;
        let strip_rules = compile_rules("stripRules", &self.strip_rules)?;
        let literal_rules = compile_rules("literalRules", &self.literal_rules)?;

        for (index, pattern) in self.boilerplate_patterns.iter().enumerate() {
            compile_pattern("boilerplatePatterns", index, pattern)?;
        }
        let boilerplate = RegexSet::new(&self.boilerplate_patterns).map_err(|source| {
            ProfileError::InvalidPattern {
                field: "boilerplatePatterns",
                index: 0,
                pattern: self.boilerplate_patterns.join(" | "),
                source,
            }
        })?;

        let alternatives: Vec<String> = self.data_types.iter().map(|t| regex::escape(t)).collect();
        let declaration_pattern = format!(r"\b({})\s+([a-zA-Z_]\w*)", alternatives.join("|"));
        let declaration = compile_pattern("dataTypes", 0, &declaration_pattern)?;

        Ok(Engine {
            keywords: self.keywords.iter().cloned().collect(),
            data_types: self.data_types.iter().cloned().collect(),
            structural_tokens: self.structural_tokens.iter().cloned().collect(),
            control_flow: self.control_flow_keywords.iter().cloned().collect(),
            operators,
            comment_rules,
            strip_rules,
            literal_rules,
            declaration,
            boilerplate,
            profile: self,
        })
    }
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn check_words(field: &'static str, values: &[String], required: bool) -> Result<(), ProfileError> {
    if required && values.is_empty() {
        return Err(ProfileError::Empty { field });
    }
    if let Some(bad) = values.iter().find(|v| !is_identifier(v)) {
        return Err(ProfileError::InvalidWord {
            field,
            value: bad.clone(),
        });
    }
    Ok(())
}

fn compile_pattern(field: &'static str, index: usize, pattern: &str) -> Result<Regex, ProfileError> {
    Regex::new(pattern).map_err(|source| ProfileError::InvalidPattern {
        field,
        index,
        pattern: pattern.to_string(),
        source,
    })
}

fn compile_rules(field: &'static str, rules: &[RewriteRule]) -> Result<Vec<CompiledRule>, ProfileError> {
    rules
        .iter()
        .enumerate()
        .map(|(index, rule)| {
            Ok(CompiledRule {
                regex: compile_pattern(field, index, &rule.pattern)?,
                replacement: rule.replacement.clone(),
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub(crate) regex: Regex,
    pub(crate) replacement: String,
}

impl CompiledRule {
    pub(crate) fn apply(&self, line: &str) -> String {
        self.regex
            .replace_all(line, self.replacement.as_str())
            .into_owned()
    }
}

/// A validated, immutable profile. Every comparison operation is a method on
/// this type; it is `Send + Sync` and meant to be shared by reference.
#[derive(Debug, Clone)]
pub struct Engine {
    pub(crate) keywords: HashSet<String>,
    pub(crate) data_types: HashSet<String>,
    pub(crate) structural_tokens: HashSet<String>,
    pub(crate) control_flow: HashSet<String>,
    pub(crate) operators: Vec<char>,
    pub(crate) comment_rules: Vec<CompiledRule>,
    pub(crate) strip_rules: Vec<CompiledRule>,
    pub(crate) literal_rules: Vec<CompiledRule>,
    pub(crate) declaration: Regex,
    pub(crate) boilerplate: RegexSet,
    profile: LanguageProfile,
}

impl Engine {
    pub fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    pub(crate) fn is_operator(&self, ch: char) -> bool {
        self.operators.contains(&ch)
    }
}
