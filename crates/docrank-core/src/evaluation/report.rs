//! Aggregate MRR report.
//!
//! On disk the report is one flat JSON object:
//!
//! ```text
//! { "mrr": 0.42, "total": 610,
//!   "HasAns_mrr": 0.57, "HasAns_total": 450,
//!   "NoAns_mrr": 0.0, "NoAns_total": 160 }
//! ```
//!
//! The `HasAns_*` and `NoAns_*` pairs are omitted when their stratum is empty.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean reciprocal rank over one group of queries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StratumMetrics {
    /// Mean reciprocal rank
    pub mrr: f64,
    /// Number of queries in the group
    pub total: usize,
}

impl StratumMetrics {
    /// Averages reciprocal ranks; an empty slice gives `mrr = 0, total = 0`.
    pub fn from_ranks(ranks: &[f64]) -> Self {
        Self {
            mrr: super::metrics::mean(ranks),
            total: ranks.len(),
        }
    }
}

/// Overall and per-stratum MRR.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(into = "FlatReport", from = "FlatReport")]
pub struct EvalReport {
    /// All queries
    pub overall: StratumMetrics,
    /// Answerable queries, if any
    pub has_ans: Option<StratumMetrics>,
    /// Unanswerable queries, if any
    pub no_ans: Option<StratumMetrics>,
}

impl EvalReport {
    /// Serializes as indented JSON (stdout form).
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes as compact JSON (file form).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MRR {:.4} (n={})", self.overall.mrr, self.overall.total)?;
        if let Some(has_ans) = &self.has_ans {
            write!(f, ", HasAns {:.4} (n={})", has_ans.mrr, has_ans.total)?;
        }
        if let Some(no_ans) = &self.no_ans {
            write!(f, ", NoAns {:.4} (n={})", no_ans.mrr, no_ans.total)?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct FlatReport {
    mrr: f64,
    total: usize,
    #[serde(rename = "HasAns_mrr", default, skip_serializing_if = "Option::is_none")]
    has_ans_mrr: Option<f64>,
    #[serde(rename = "HasAns_total", default, skip_serializing_if = "Option::is_none")]
    has_ans_total: Option<usize>,
    #[serde(rename = "NoAns_mrr", default, skip_serializing_if = "Option::is_none")]
    no_ans_mrr: Option<f64>,
    #[serde(rename = "NoAns_total", default, skip_serializing_if = "Option::is_none")]
    no_ans_total: Option<usize>,
}

impl From<EvalReport> for FlatReport {
    fn from(report: EvalReport) -> Self {
        Self {
            mrr: report.overall.mrr,
            total: report.overall.total,
            has_ans_mrr: report.has_ans.map(|s| s.mrr),
            has_ans_total: report.has_ans.map(|s| s.total),
            no_ans_mrr: report.no_ans.map(|s| s.mrr),
            no_ans_total: report.no_ans.map(|s| s.total),
        }
    }
}

impl From<FlatReport> for EvalReport {
    fn from(flat: FlatReport) -> Self {
        let stratum = |mrr: Option<f64>, total: Option<usize>| match (mrr, total) {
            (Some(mrr), Some(total)) => Some(StratumMetrics { mrr, total }),
            _ => None,
        };
        Self {
            overall: StratumMetrics {
                mrr: flat.mrr,
                total: flat.total,
            },
            has_ans: stratum(flat.has_ans_mrr, flat.has_ans_total),
            no_ans: stratum(flat.no_ans_mrr, flat.no_ans_total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_keys_in_order() {
        let report = EvalReport {
            overall: StratumMetrics { mrr: 0.5, total: 2 },
            has_ans: Some(StratumMetrics { mrr: 1.0, total: 1 }),
            no_ans: Some(StratumMetrics { mrr: 0.0, total: 1 }),
        };
        assert_eq!(
            report.to_json().unwrap(),
            r#"{"mrr":0.5,"total":2,"HasAns_mrr":1.0,"HasAns_total":1,"NoAns_mrr":0.0,"NoAns_total":1}"#
        );
    }

    #[test]
    fn test_empty_strata_omitted() {
        let report = EvalReport {
            overall: StratumMetrics { mrr: 1.0, total: 1 },
            has_ans: Some(StratumMetrics { mrr: 1.0, total: 1 }),
            no_ans: None,
        };
        let json = report.to_json().unwrap();
        assert!(!json.contains("NoAns"));

        let parsed: EvalReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_pretty_output_indented() {
        let pretty = EvalReport::default().to_json_pretty().unwrap();
        assert!(pretty.contains("\n  \"mrr\": 0.0"));
    }

    #[test]
    fn test_from_ranks() {
        let m = StratumMetrics::from_ranks(&[1.0, 0.5, 0.0]);
        assert_eq!(m.total, 3);
        assert!((m.mrr - 0.5).abs() < 1e-12);
        assert_eq!(StratumMetrics::from_ranks(&[]), StratumMetrics::default());
    }
}
