use std::io;

use copy_code_check_core::{ComparisonResult, DiffRow, LoadStats};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonLoadStats {
    pub(crate) candidate_files: u64,
    pub(crate) loaded_files: u64,
    pub(crate) loaded_bytes: u64,
    pub(crate) skipped_extension: u64,
    pub(crate) skipped_not_found: u64,
    pub(crate) skipped_permission_denied: u64,
    pub(crate) skipped_too_large: u64,
    pub(crate) skipped_binary: u64,
    pub(crate) skipped_walk_errors: u64,
}

impl From<LoadStats> for JsonLoadStats {
    fn from(stats: LoadStats) -> Self {
        Self {
            candidate_files: stats.candidate_files,
            loaded_files: stats.loaded_files,
            loaded_bytes: stats.loaded_bytes,
            skipped_extension: stats.skipped_extension,
            skipped_not_found: stats.skipped_not_found,
            skipped_permission_denied: stats.skipped_permission_denied,
            skipped_too_large: stats.skipped_too_large,
            skipped_binary: stats.skipped_binary,
            skipped_walk_errors: stats.skipped_walk_errors,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonComparison {
    pub(crate) a: String,
    pub(crate) b: String,
    pub(crate) score: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonDocumentMax {
    pub(crate) id: String,
    pub(crate) max_similarity: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonDiffRow {
    pub(crate) class: &'static str,
    pub(crate) left_line: Option<usize>,
    pub(crate) left_text: String,
    pub(crate) right_line: Option<usize>,
    pub(crate) right_text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonNormalizedLine {
    pub(crate) line: usize,
    pub(crate) raw: String,
    pub(crate) canonical: String,
    pub(crate) significant: bool,
    pub(crate) boilerplate: bool,
}

pub(crate) fn map_comparisons(results: Vec<ComparisonResult>) -> Vec<JsonComparison> {
    results
        .into_iter()
        .map(|r| JsonComparison {
            a: r.a,
            b: r.b,
            score: r.score,
        })
        .collect()
}

pub(crate) fn map_maxima(maxima: Vec<(String, f64)>) -> Vec<JsonDocumentMax> {
    maxima
        .into_iter()
        .map(|(id, max_similarity)| JsonDocumentMax { id, max_similarity })
        .collect()
}

pub(crate) fn map_diff_rows(rows: Vec<DiffRow>) -> Vec<JsonDiffRow> {
    rows.into_iter()
        .map(|row| JsonDiffRow {
            class: row.class.as_str(),
            left_line: row.left_line,
            left_text: row.left_text,
            right_line: row.right_line,
            right_text: row.right_text,
        })
        .collect()
}

pub(crate) fn write_json<T: Serialize>(value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::other(format!("json encode: {e}")))?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use copy_code_check_core::RowClass;

    #[test]
    fn fields_are_camel_case() {
        let row = map_diff_rows(vec![DiffRow {
            class: RowClass::None,
            left_line: Some(3),
            left_text: "{".to_string(),
            right_line: None,
            right_text: String::new(),
        }]);
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value[0]["class"], "none");
        assert_eq!(value[0]["leftLine"], 3);
        assert!(value[0]["rightLine"].is_null());

        let maxima = serde_json::to_value(map_maxima(vec![("a.c".to_string(), 12.5)])).unwrap();
        assert_eq!(maxima[0]["maxSimilarity"], 12.5);

        let stats = serde_json::to_value(JsonLoadStats::from(LoadStats::default())).unwrap();
        assert_eq!(stats["skippedTooLarge"], 0);
    }
}
