//! Ranking test cases.
//!
//! A case file is TOML. Each case names a sort option, a set of candidate
//! results, and the order in which some of those candidates are expected
//! to appear. Candidates not listed in `expected` may appear anywhere.
//!
//! ```toml
//! reference_date = "2024-06-01T00:00:00Z"
//! min_kendall_tau = 1.0
//!
//! [[case]]
//! name = "bookmarks outweigh a small distance gap"
//! sort = "EmbedTopDesc"
//! expected = ["popular", "close"]
//!
//! [[case.candidates]]
//! id = "close"
//! distance = 0.40
//! bookmarks = 0
//!
//! [[case.candidates]]
//! id = "popular"
//! distance = 0.42
//! bookmarks = 5000
//! ```
//!
//! Timestamps are RFC 3339 strings and default to the reference date.
//! A missing `updated_at` defaults to `created_at`.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metrics::{kendall_tau, ndcg, reciprocal_rank};
use crate::rank::{rank_candidates, ranked_ids};
use crate::scoring::Candidate;
use crate::sort::SortOption;

fn default_min_kendall_tau() -> f64 {
    1.0
}

/// A candidate as written in a case file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSpec {
    /// Candidate identifier.
    pub id: String,

    /// Embedding distance to the query.
    pub distance: f64,

    /// Number of bookmarks.
    #[serde(default)]
    pub bookmarks: u64,

    /// Creation timestamp; defaults to the reference date.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Update timestamp; defaults to `created_at`.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CandidateSpec {
    /// Fill in missing timestamps relative to `reference`.
    pub fn resolve(&self, reference: DateTime<Utc>) -> Candidate {
        let created_at = self.created_at.unwrap_or(reference);
        Candidate {
            id: self.id.clone(),
            distance: self.distance,
            bookmarks: self.bookmarks,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        }
    }
}

/// A standalone list of candidates, as ranked by `rankscape rank`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateSet {
    /// Reference date for date sorts; defaults to now.
    #[serde(default)]
    pub reference_date: Option<DateTime<Utc>>,

    /// Candidates to rank.
    #[serde(default)]
    pub candidates: Vec<CandidateSpec>,
}

impl CandidateSet {
    /// Load a candidate set from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        toml::from_str(&content)
            .map_err(|e| Error::parse(format!("Invalid candidate file {}: {e}", path.display())))
    }

    /// Resolve every candidate against the effective reference date.
    pub fn resolve(&self, now: DateTime<Utc>) -> (DateTime<Utc>, Vec<Candidate>) {
        let reference = self.reference_date.unwrap_or(now);
        let candidates = self.candidates.iter().map(|c| c.resolve(reference)).collect();
        (reference, candidates)
    }
}

/// One ranking test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    /// Human-readable case name.
    pub name: String,

    /// Sort option under test.
    pub sort: SortOption,

    /// Ids in the order they are expected to appear relative to each other.
    pub expected: Vec<String>,

    /// Per-case override of the file-level Kendall tau threshold.
    #[serde(default)]
    pub min_kendall_tau: Option<f64>,

    /// Candidate results to rank.
    #[serde(default)]
    pub candidates: Vec<CandidateSpec>,
}

impl TestCase {
    /// Check that the case is well-formed.
    pub fn validate(&self) -> Result<()> {
        if self.candidates.is_empty() {
            return Err(Error::validation_field(
                "candidates",
                format!("case '{}' has no candidates", self.name),
            ));
        }
        let ids: HashSet<&str> = self.candidates.iter().map(|c| c.id.as_str()).collect();
        if let Some(missing) = self.expected.iter().find(|id| !ids.contains(id.as_str())) {
            return Err(Error::validation_field(
                "expected",
                format!(
                    "case '{}' expects '{missing}' which is not a candidate",
                    self.name
                ),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.expected.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(Error::validation_field(
                "expected",
                format!("case '{}' lists '{dup}' more than once", self.name),
            ));
        }
        if let Some(t) = self.min_kendall_tau {
            check_tau_threshold(t)?;
        }
        Ok(())
    }
}

fn check_tau_threshold(t: f64) -> Result<()> {
    if !(-1.0..=1.0).contains(&t) {
        return Err(Error::validation_field(
            "min_kendall_tau",
            format!("must be within [-1, 1] (got {t})"),
        ));
    }
    Ok(())
}

/// A parsed case file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFile {
    /// Reference date for date sorts; defaults to now.
    #[serde(default)]
    pub reference_date: Option<DateTime<Utc>>,

    /// Minimum Kendall tau for a case whose order is not exact.
    #[serde(default = "default_min_kendall_tau")]
    pub min_kendall_tau: f64,

    /// Cases, in file order.
    #[serde(default, rename = "case")]
    pub cases: Vec<TestCase>,
}

/// Outcome of one case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    /// Case name.
    pub name: String,
    /// Sort option under test.
    pub sort: SortOption,
    /// Expected relative order.
    pub expected: Vec<String>,
    /// Full ranking produced by the sort.
    pub actual: Vec<String>,
    /// Kendall tau between expected and actual, if computable.
    pub kendall_tau: Option<f64>,
    /// nDCG over the full ranking.
    pub ndcg: f64,
    /// Reciprocal rank of the first expected id.
    pub reciprocal_rank: f64,
    /// Whether the expected ids appear in exactly the expected order.
    pub exact: bool,
    /// Whether the case passed.
    pub passed: bool,
}

/// Outcome of a whole case file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Reference date the suite ran against.
    pub reference_date: DateTime<Utc>,
    /// Per-case reports, in file order.
    pub cases: Vec<CaseReport>,
    /// Number of passing cases.
    pub passed: usize,
    /// Number of failing cases.
    pub failed: usize,
}

impl SuiteReport {
    /// Returns `true` when no case failed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl CaseFile {
    /// Parse a case file from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: Self =
            toml::from_str(content).map_err(|e| Error::parse(format!("Invalid case file: {e}")))?;
        file.validate()?;
        Ok(file)
    }

    /// Load a case file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        log::debug!("Loading case file {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Check every case.
    pub fn validate(&self) -> Result<()> {
        check_tau_threshold(self.min_kendall_tau)?;
        self.cases.iter().try_for_each(TestCase::validate)
    }

    /// Run every case. `now` is used when the file has no reference date.
    pub fn evaluate(&self, now: DateTime<Utc>) -> Result<SuiteReport> {
        let reference = self.reference_date.unwrap_or(now);
        let mut reports = Vec::with_capacity(self.cases.len());

        for case in &self.cases {
            let report = self.evaluate_case(case, reference)?;
            if report.passed {
                log::debug!("Case '{}' passed", report.name);
            } else {
                log::warn!(
                    "Case '{}' failed: expected {:?}, got {:?}",
                    report.name,
                    report.expected,
                    report.actual
                );
            }
            reports.push(report);
        }

        let passed = reports.iter().filter(|r| r.passed).count();
        let failed = reports.len() - passed;
        log::info!("Evaluated {} cases: {passed} passed, {failed} failed", reports.len());

        Ok(SuiteReport {
            reference_date: reference,
            cases: reports,
            passed,
            failed,
        })
    }

    fn evaluate_case(&self, case: &TestCase, reference: DateTime<Utc>) -> Result<CaseReport> {
        let candidates: Vec<Candidate> =
            case.candidates.iter().map(|c| c.resolve(reference)).collect();
        let ranking = rank_candidates(case.sort, &candidates, reference)?;
        let actual = ranked_ids(&ranking);

        let expected_ids: HashSet<&str> = case.expected.iter().map(String::as_str).collect();
        let observed: Vec<&str> = actual
            .iter()
            .map(String::as_str)
            .filter(|id| expected_ids.contains(id))
            .collect();
        let exact = observed == case.expected.iter().map(String::as_str).collect::<Vec<_>>();

        let tau = kendall_tau(&case.expected, &actual);
        let threshold = case.min_kendall_tau.unwrap_or(self.min_kendall_tau);
        let passed = exact || tau.is_some_and(|t| t >= threshold);

        Ok(CaseReport {
            name: case.name.clone(),
            sort: case.sort,
            expected: case.expected.clone(),
            ndcg: ndcg(&case.expected, &actual, actual.len()),
            reciprocal_rank: case
                .expected
                .first()
                .map(|top| reciprocal_rank(top, &actual))
                .unwrap_or(1.0),
            actual,
            kendall_tau: tau,
            exact,
            passed,
        })
    }
}
