use std::collections::HashSet;

use rayon::prelude::*;
use tracing::debug;

use crate::error::CorpusError;
use crate::profile::Engine;
use crate::similarity::score_sequences;
use crate::store::DocumentStore;
use crate::types::{CompareOptions, ComparisonResult};

/// First occurrence of every id, in list order.
fn dedup_ids(ids: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(String::as_str)
        .filter(|id| seen.insert(*id))
        .collect()
}

fn resolve<'s, S: DocumentStore + ?Sized>(
    store: &'s S,
    ids: &[&str],
) -> Result<Vec<&'s str>, CorpusError> {
    ids.iter()
        .map(|id| {
            store
                .get(id)
                .ok_or_else(|| CorpusError::UnknownDocument(id.to_string()))
        })
        .collect()
}

/// Every unordered pair `(i, j)` with `i < j`, in generation order.
fn pair_indices(n: usize) -> Vec<(usize, usize)> {
    (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect()
}

/// Stable sort by descending score, then threshold and cap. Pairs with equal
/// scores keep generation order.
pub(crate) fn rank_results(
    mut results: Vec<ComparisonResult>,
    options: &CompareOptions,
) -> Vec<ComparisonResult> {
    results.retain(|r| r.score >= options.threshold);
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    if let Some(max_results) = options.max_results {
        results.truncate(max_results);
    }
    results
}

impl Engine {
    fn canonicalize_all(&self, contents: &[&str], parallel: bool) -> Vec<Vec<String>> {
        if parallel {
            contents
                .par_iter()
                .map(|content| self.canonical_lines(content))
                .collect()
        } else {
            contents
                .iter()
                .map(|content| self.canonical_lines(content))
                .collect()
        }
    }

    fn score_pairs(&self, clean: &[Vec<String>], parallel: bool) -> Vec<(usize, usize, f64)> {
        let pairs = pair_indices(clean.len());
        let score = |&(i, j): &(usize, usize)| (i, j, score_sequences(&clean[i], &clean[j]));
        if parallel {
            pairs.par_iter().map(score).collect()
        } else {
            pairs.iter().map(score).collect()
        }
    }

    /// Scores every unordered pair of `ids` once and returns the pairs at or
    /// above `options.threshold`, best first.
    pub fn compare_all<S: DocumentStore + ?Sized>(
        &self,
        store: &S,
        ids: &[String],
        options: &CompareOptions,
    ) -> Result<Vec<ComparisonResult>, CorpusError> {
        options.validate()?;
        let ids = dedup_ids(ids);
        let contents = resolve(store, &ids)?;
        let clean = self.canonicalize_all(&contents, options.parallel);

        let scored = self.score_pairs(&clean, options.parallel);
        let evaluated = scored.len();
        let results: Vec<ComparisonResult> = scored
            .into_iter()
            .map(|(i, j, score)| ComparisonResult {
                a: ids[i].to_string(),
                b: ids[j].to_string(),
                score,
            })
            .collect();
        let ranked = rank_results(results, options);

        debug!(
            documents = ids.len(),
            pairs = evaluated,
            retained = ranked.len(),
            threshold = options.threshold,
            "corpus comparison finished"
        );
        Ok(ranked)
    }

    /// Highest score between `target` and any other member of `ids`; 0 when
    /// the set has fewer than two members or does not contain `target`.
    pub fn max_similarity<S: DocumentStore + ?Sized>(
        &self,
        store: &S,
        target: &str,
        ids: &[String],
    ) -> Result<f64, CorpusError> {
        let ids = dedup_ids(ids);
        if ids.len() < 2 || !ids.contains(&target) {
            return Ok(0.0);
        }
        let Some(target_content) = store.get(target) else {
            return Ok(0.0);
        };
        let target_clean = self.canonical_lines(target_content);

        let mut best = 0.0f64;
        for id in ids.into_iter().filter(|id| *id != target) {
            let content = store
                .get(id)
                .ok_or_else(|| CorpusError::UnknownDocument(id.to_string()))?;
            let score = score_sequences(&target_clean, &self.canonical_lines(content));
            if score > best {
                best = score;
            }
        }
        Ok(best)
    }

    /// `max_similarity` for every member of `ids`, in list order. Each pair is
    /// scored once.
    pub fn max_similarity_map<S: DocumentStore + ?Sized>(
        &self,
        store: &S,
        ids: &[String],
        parallel: bool,
    ) -> Result<Vec<(String, f64)>, CorpusError> {
        let ids = dedup_ids(ids);
        let contents = resolve(store, &ids)?;
        let mut best = vec![0.0f64; ids.len()];
        if ids.len() >= 2 {
            let clean = self.canonicalize_all(&contents, parallel);
            for (i, j, score) in self.score_pairs(&clean, parallel) {
                best[i] = best[i].max(score);
                best[j] = best[j].max(score);
            }
        }
        Ok(ids
            .into_iter()
            .map(str::to_string)
            .zip(best)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Document, MemoryStore};
    use crate::LanguageProfile;

    const X: &str = "int a = 1;\nx = y + z;\nwhile (x)\nif (x > y)\nreturn x;\n";
    const Y: &str = "int b = 7;\nq = r + s;\nwhile (q)\nif (q > r)\nreturn q;\n";
    const Z: &str = "int c = 3;\nfor (;;)\nx = x * 2;\ndouble d = 1;\nswitch (k)\n";

    fn engine() -> Engine {
        LanguageProfile::default().compile().unwrap()
    }

    fn corpus() -> MemoryStore {
        [("X", X), ("Y", Y), ("Z", Z)]
            .into_iter()
            .map(|(id, content)| Document::new(id, content))
            .collect()
    }

    fn result(a: &str, b: &str, score: f64) -> ComparisonResult {
        ComparisonResult {
            a: a.to_string(),
            b: b.to_string(),
            score,
        }
    }

    #[test]
    fn ranks_by_score_and_keeps_generation_order_on_ties() {
        let generated = vec![
            result("X", "Y", 95.0),
            result("X", "Z", 60.0),
            result("Y", "Z", 60.0),
        ];
        let options = CompareOptions::default().with_threshold(50.0);
        let ranked = rank_results(generated, &options);
        assert_eq!(
            ranked,
            vec![
                result("X", "Y", 95.0),
                result("X", "Z", 60.0),
                result("Y", "Z", 60.0),
            ]
        );

        let generated = vec![
            result("A", "B", 10.0),
            result("A", "C", 80.0),
            result("B", "C", 80.0),
        ];
        let ranked = rank_results(generated, &CompareOptions::default());
        assert_eq!(ranked, vec![result("A", "C", 80.0), result("B", "C", 80.0)]);
    }

    #[test]
    fn compare_all_enumerates_each_pair_once() {
        let store = corpus();
        let options = CompareOptions::default().with_threshold(0.0);
        let results = engine()
            .compare_all(&store, &store.list(), &options)
            .unwrap();
        assert_eq!(
            results,
            vec![
                result("X", "Y", 100.0),
                result("X", "Z", 20.0),
                result("Y", "Z", 20.0),
            ]
        );
    }

    #[test]
    fn threshold_is_inclusive_and_monotonic() {
        let store = corpus();
        let ids = store.list();
        let engine = engine();
        let mut last = usize::MAX;
        for threshold in [0.0, 20.0, 20.01, 99.99, 100.0] {
            let options = CompareOptions::default().with_threshold(threshold);
            let results = engine.compare_all(&store, &ids, &options).unwrap();
            assert!(results.iter().all(|r| r.score >= threshold));
            assert!(results.len() <= last);
            last = results.len();
        }
        let at_twenty = engine
            .compare_all(&store, &ids, &CompareOptions::default().with_threshold(20.0))
            .unwrap();
        assert_eq!(at_twenty.len(), 3);
        assert_eq!(last, 1);
    }

    #[test]
    fn parallel_and_sequential_runs_agree() {
        let mut store = corpus();
        for i in 0..12 {
            store.insert(Document::new(
                format!("extra{i}"),
                format!("int v = {i};\nx = y + z;\nfor (;;)\nreturn v;\n{}", "x = x * 2;\n".repeat(i % 3)),
            ));
        }
        let ids = store.list();
        let engine = engine();
        let base = CompareOptions::default().with_threshold(0.0);
        let parallel = engine
            .compare_all(&store, &ids, &base.clone().with_parallel(true))
            .unwrap();
        let sequential = engine
            .compare_all(&store, &ids, &base.with_parallel(false))
            .unwrap();
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.len(), ids.len() * (ids.len() - 1) / 2);
    }

    #[test]
    fn max_results_caps_the_ranking() {
        let store = corpus();
        let options = CompareOptions::default()
            .with_threshold(0.0)
            .with_max_results(Some(1));
        let results = engine()
            .compare_all(&store, &store.list(), &options)
            .unwrap();
        assert_eq!(results, vec![result("X", "Y", 100.0)]);
    }

    #[test]
    fn unknown_ids_and_bad_thresholds_are_errors() {
        let store = corpus();
        let engine = engine();
        let ids = vec!["X".to_string(), "missing".to_string()];
        assert_eq!(
            engine.compare_all(&store, &ids, &CompareOptions::default()),
            Err(CorpusError::UnknownDocument("missing".to_string()))
        );
        let bad = CompareOptions::default().with_threshold(120.0);
        assert!(matches!(
            engine.compare_all(&store, &store.list(), &bad),
            Err(CorpusError::InvalidOptions(_))
        ));
    }

    #[test]
    fn duplicate_ids_are_compared_once() {
        let store = corpus();
        let ids: Vec<String> = ["X", "Y", "X"].iter().map(|s| s.to_string()).collect();
        let results = engine()
            .compare_all(&store, &ids, &CompareOptions::default())
            .unwrap();
        assert_eq!(results, vec![result("X", "Y", 100.0)]);
    }

    #[test]
    fn max_similarity_picks_best_partner() {
        let store = corpus();
        let ids = store.list();
        let engine = engine();
        assert_eq!(engine.max_similarity(&store, "X", &ids).unwrap(), 100.0);
        assert_eq!(engine.max_similarity(&store, "Z", &ids).unwrap(), 20.0);
        assert_eq!(engine.max_similarity(&store, "nope", &ids).unwrap(), 0.0);
        let single = vec!["X".to_string()];
        assert_eq!(engine.max_similarity(&store, "X", &single).unwrap(), 0.0);
    }

    #[test]
    fn max_similarity_map_covers_every_document() {
        let store = corpus();
        let engine = engine();
        let map = engine
            .max_similarity_map(&store, &store.list(), true)
            .unwrap();
        assert_eq!(
            map,
            vec![
                ("X".to_string(), 100.0),
                ("Y".to_string(), 100.0),
                ("Z".to_string(), 20.0),
            ]
        );
        let single = engine
            .max_similarity_map(&store, &["Z".to_string()], false)
            .unwrap();
        assert_eq!(single, vec![("Z".to_string(), 0.0)]);
    }
}
