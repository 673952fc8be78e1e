//! Text renderings of an evaluation run for stderr.

use docrank_core::evaluation::{bootstrap_ci, EvaluationResult};
use std::fmt::Write;

/// One line per query: id, stratum, reciprocal rank and status.
pub fn format_per_query(result: &EvaluationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<24} {:<7} {:>8}  status", "query", "stratum", "rr");
    for score in result.scores.values() {
        let stratum = if score.answerable { "HasAns" } else { "NoAns" };
        let _ = writeln!(
            out,
            "{:<24} {:<7} {:>8.4}  {}",
            score.query_id, stratum, score.reciprocal_rank, score.status
        );
    }
    out
}

/// Bootstrap 95% intervals for the overall and per-stratum MRR.
///
/// Empty strata are skipped, matching the JSON report.
pub fn format_bootstrap(result: &EvaluationResult, n_bootstrap: usize, seed: u64) -> String {
    let strata = [
        ("mrr", result.ranks(None)),
        ("HasAns_mrr", result.ranks(Some(true))),
        ("NoAns_mrr", result.ranks(Some(false))),
    ];

    let mut out = String::new();
    for (name, ranks) in strata {
        if let Some(ci) = bootstrap_ci(&ranks, n_bootstrap, seed) {
            let _ = writeln!(out, "{:<11} {} (n={})", name, ci.format(4), ranks.len());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use docrank_core::evaluation::{Evaluator, QueryDataset};
    use docrank_core::prediction::{Prediction, PredictionSet, RankedDocument};

    fn result() -> EvaluationResult {
        let dataset = QueryDataset::from_reader(
            r#"[
                {"QUESTION_ID": "q1", "ANSWERABLE": "Y", "DOCUMENT": "D1"},
                {"QUESTION_ID": "q2", "ANSWERABLE": "Y", "DOCUMENT": "D2"}
            ]"#
            .as_bytes(),
        )
        .unwrap();
        let predictions: PredictionSet =
            std::iter::once(Prediction::new("q1", vec![RankedDocument::new("D1", 0.9)])).collect();
        Evaluator::new(10).unwrap().evaluate(&dataset, &predictions)
    }

    #[test]
    fn test_per_query_lists_every_query() {
        let text = format_per_query(&result());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("q1"));
        assert!(lines[1].ends_with("ranked"));
        assert!(lines[2].ends_with("missing"));
    }

    #[test]
    fn test_bootstrap_skips_empty_stratum() {
        let text = format_bootstrap(&result(), 200, 1);
        assert!(text.contains("HasAns_mrr"));
        assert!(!text.contains("NoAns_mrr"));
        assert!(text.contains("(n=2)"));
    }
}
