use crate::align::SequenceMatcher;
use crate::profile::Engine;
use crate::store::source_lines;
use crate::types::{DiffRow, NormalizedLine, OpTag, RowClass};

impl Engine {
    /// Side-by-side rows for two raw documents.
    ///
    /// Alignment runs over every normalized line, significant or not, so rows
    /// track raw lines one-to-one. Identical boilerplate and function headers
    /// whose bodies diverge are left unhighlighted.
    pub fn render_diff(&self, content_a: &str, content_b: &str) -> Vec<DiffRow> {
        let raw_a: Vec<&str> = source_lines(content_a).collect();
        let raw_b: Vec<&str> = source_lines(content_b).collect();
        let norm_a: Vec<NormalizedLine> = raw_a.iter().map(|l| self.normalize(l)).collect();
        let norm_b: Vec<NormalizedLine> = raw_b.iter().map(|l| self.normalize(l)).collect();
        let text_a: Vec<&str> = norm_a.iter().map(|n| n.text.as_str()).collect();
        let text_b: Vec<&str> = norm_b.iter().map(|n| n.text.as_str()).collect();

        let mut rows = Vec::with_capacity(raw_a.len().max(raw_b.len()));
        for op in SequenceMatcher::new(&text_a, &text_b).opcodes() {
            let len_a = op.a_range.len();
            let len_b = op.b_range.len();
            let base = match op.tag {
                OpTag::Equal => RowClass::Match,
                OpTag::Replace => RowClass::Change,
                OpTag::Delete => RowClass::Delete,
                OpTag::Insert => RowClass::Insert,
            };
            for k in 0..len_a.max(len_b) {
                let left = (k < len_a).then(|| op.a_range.start + k);
                let right = (k < len_b).then(|| op.b_range.start + k);

                let mut class = base;
                if op.tag == OpTag::Equal
                    && let (Some(i), Some(j)) = (left, right)
                    && (self.is_boilerplate(raw_a[i])
                        || self.is_boilerplate(raw_b[j])
                        || !norm_a[i].significant
                        || !norm_b[j].significant)
                {
                    class = RowClass::None;
                }

                rows.push(DiffRow {
                    class,
                    left_line: left.map(|i| i + 1),
                    left_text: left.map(|i| raw_a[i].to_string()).unwrap_or_default(),
                    right_line: right.map(|j| j + 1),
                    right_text: right.map(|j| raw_b[j].to_string()).unwrap_or_default(),
                });
            }
        }

        self.suppress_unmatched_headers(&mut rows);
        rows
    }

    /// A header is a matched row whose left text has both parentheses and
    /// does not open with a control-flow keyword. It keeps its highlight only
    /// if the next row with non-blank left text is also a match.
    ///
    /// Call statements such as `swap(a, b);` satisfy the same test and are
    /// handled like headers.
    fn suppress_unmatched_headers(&self, rows: &mut [DiffRow]) {
        for i in 0..rows.len() {
            if rows[i].class != RowClass::Match || !self.looks_like_header(&rows[i].left_text) {
                continue;
            }
            let body_matches = rows[i + 1..]
                .iter()
                .find(|row| !row.left_text.trim().is_empty())
                .is_some_and(|row| row.class == RowClass::Match);
            if !body_matches {
                rows[i].class = RowClass::None;
            }
        }
    }

    fn looks_like_header(&self, text: &str) -> bool {
        let text = text.trim();
        if !(text.contains('(') && text.contains(')')) {
            return false;
        }
        let before_paren = text.split('(').next().unwrap_or_default();
        let start_word = before_paren.split_whitespace().last().unwrap_or_default();
        !self.control_flow.contains(start_word)
    }
}
