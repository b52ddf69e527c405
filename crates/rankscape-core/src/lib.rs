//! Rankscape Core: sort options, scoring formulas, ranking, and errors.
//!
//! This crate provides the foundational types used across all Rankscape
//! crates. It has no internal Rankscape dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`sort`]: Embedding sort options and their direction/family
//! - [`scoring`]: Score formulas for bookmark- and date-weighted sorts
//! - [`rank`]: Ranking candidate search results by score
//! - [`metrics`]: Ranking quality metrics (Kendall tau, nDCG, MRR)
//! - [`cases`]: Ranking test case files and suite evaluation
//! - [`sql`]: SQL renderings of the score formulas
//! - [`util`]: Identifier utilities
//!
//! # Example
//!
//! ```
//! use rankscape_core::{SortDirection, scoring::top_score};
//!
//! let close = top_score(0.05, 10.0, SortDirection::Desc);
//! let far = top_score(0.80, 10.0, SortDirection::Desc);
//! assert!(close > far);
//! ```

pub mod cases;
pub mod error;
pub mod metrics;
mod proptests;
pub mod rank;
pub mod scoring;
pub mod sort;
pub mod sql;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use rank::{RankedCandidate, rank_candidates};
pub use scoring::{Candidate, score_candidate};
pub use sort::{DateField, ScoreFamily, SortDirection, SortOption};
pub use util::slugify;
