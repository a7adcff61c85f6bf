use crate::align::SequenceMatcher;
use crate::profile::Engine;
use crate::store::source_lines;

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Percentage similarity of two canonical line sequences.
///
/// The matcher always runs with the lexicographically smaller sequence
/// first, so tie-breaking and therefore the score do not depend on
/// argument order.
pub fn score_sequences(clean_a: &[String], clean_b: &[String]) -> f64 {
    if clean_a.is_empty() || clean_b.is_empty() {
        return 0.0;
    }
    let (first, second) = if clean_a <= clean_b {
        (clean_a, clean_b)
    } else {
        (clean_b, clean_a)
    };
    round2(SequenceMatcher::new(first, second).ratio() * 100.0)
}

impl Engine {
    /// Canonical strings of the significant lines of `content`, in order.
    pub fn canonical_lines(&self, content: &str) -> Vec<String> {
        source_lines(content)
            .map(|line| self.normalize(line))
            .filter(|n| n.significant)
            .map(|n| n.text)
            .collect()
    }

    /// Similarity of two documents in `0..=100`, rounded to two decimals.
    pub fn score(&self, content_a: &str, content_b: &str) -> f64 {
        score_sequences(
            &self.canonical_lines(content_a),
            &self.canonical_lines(content_b),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LanguageProfile;

    fn engine() -> Engine {
        LanguageProfile::default().compile().unwrap()
    }

    #[test]
    fn boilerplate_only_files_score_zero() {
        let a = "print(\"hi\")\n";
        let b = "print(\"hi\")\n";
        assert_eq!(engine().score(a, b), 0.0);
    }

    #[test]
    fn renamed_declaration_scores_full() {
        let engine = engine();
        assert_eq!(engine.canonical_lines("int x = 5;"), engine.canonical_lines("int y = 5;"));
        assert_eq!(engine.score("int x = 5;", "int y = 5;"), 100.0);
    }

    #[test]
    fn self_identity_is_full_score() {
        let src = "int compute(int n) {\n  int r = 0;\n  for (int i = 0; i < n; i++) r += i;\n  return r;\n}\n";
        assert_eq!(engine().score(src, src), 100.0);
    }

    #[test]
    fn empty_side_scores_zero() {
        let engine = engine();
        assert_eq!(engine.score("", "int x = 1;"), 0.0);
        assert_eq!(engine.score("int x = 1;", "#include <x>\n{\n}\n"), 0.0);
    }

    #[test]
    fn renamed_function_body_is_near_identical() {
        let a = "\
#include <iostream>
using namespace std;
int sumTo(int n) {
    int total = 0;
    for (int i = 1; i <= n; i++) {
        total = total + i;
    }
    if (total > 100) {
        total = total - 100;
    }
    cout << total << endl;
    return total;
}
";
        let b = "\
#include <iostream>
using namespace std;
int accumulate(int limit) {
    int acc = 0;
    for (int k = 1; k <= limit; k++) {
        acc = acc + k;
    }
    if (acc > 250) {
        acc = acc - 250;
    }
    cout << \"result: \" << acc << endl;
    return acc;
}
";
        assert_eq!(engine().score(a, b), 100.0);
    }

    #[test]
    fn score_is_symmetric() {
        let engine = engine();
        let docs = [
            "int a = 1;\nint b = 2;\nx = a + b;\n",
            "x = a + b;\nint a = 1;\n",
            "while (x) {\n x = x - 1;\n}\nint a = 1;\nx = a + b;\nint a = 1;\n",
            "string s = \"q\";\nx = a + b;\nx = a + b;\n",
            "",
        ];
        for a in docs {
            for b in docs {
                assert_eq!(engine.score(a, b), engine.score(b, a), "{a:?} / {b:?}");
            }
        }
    }

    #[test]
    fn score_sequences_is_symmetric_under_tie_breaks() {
        let s = |v: &[&str]| v.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        let a = s(&["A", "B", "A", "C"]);
        let b = s(&["C", "A", "B", "B", "A"]);
        assert_eq!(score_sequences(&a, &b), score_sequences(&b, &a));
    }

    #[test]
    fn partial_overlap_is_rounded_to_two_decimals() {
        let s = |v: &[&str]| v.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        let a = s(&["A", "B", "C"]);
        let b = s(&["A", "B", "D"]);
        // 2 * 2 / 6
        assert_eq!(score_sequences(&a, &b), 66.67);
    }

    #[test]
    fn exact_half_hundredths_round_to_even() {
        let seq = |shared: usize, side: &str| {
            (0..32)
                .map(|i| {
                    if i < shared {
                        format!("shared{i}")
                    } else {
                        format!("{side}{i}")
                    }
                })
                .collect::<Vec<_>>()
        };
        // 2 * 1 / 64 = 3.125
        assert_eq!(score_sequences(&seq(1, "a"), &seq(1, "b")), 3.12);
        // 2 * 17 / 64 = 53.125
        assert_eq!(score_sequences(&seq(17, "a"), &seq(17, "b")), 53.12);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn carriage_return_only_endings_split_lines() {
        let engine = engine();
        assert_eq!(engine.canonical_lines("int x = 1;\rint y = 2;\r").len(), 2);
        assert_eq!(
            engine.score("int x = 1;\rx = x + 1;\r", "int y = 1;\ny = y + 1;\n"),
            100.0
        );
    }
}
