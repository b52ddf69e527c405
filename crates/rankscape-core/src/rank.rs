//! Ranking candidate search results.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scoring::{Candidate, score_candidate};
use crate::sort::SortOption;

/// A candidate's position in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// 1-based position.
    pub rank: usize,
    /// Candidate identifier.
    pub id: String,
    /// Score under the ranking's sort option.
    pub score: f64,
}

/// Rank candidates under `sort`, highest score first.
///
/// Ties are broken by id so rankings are deterministic. Candidate ids must
/// be unique.
pub fn rank_candidates(
    sort: SortOption,
    candidates: &[Candidate],
    reference: DateTime<Utc>,
) -> Result<Vec<RankedCandidate>> {
    let mut seen = HashSet::with_capacity(candidates.len());
    for candidate in candidates {
        if !seen.insert(candidate.id.as_str()) {
            return Err(Error::validation_field(
                "id",
                format!("duplicate candidate id '{}'", candidate.id),
            ));
        }
    }

    let mut scored = candidates
        .iter()
        .map(|c| Ok((c.id.clone(), score_candidate(sort, c, reference)?)))
        .collect::<Result<Vec<(String, f64)>>>()?;

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    log::debug!("Ranked {} candidates under {}", scored.len(), sort);

    Ok(scored
        .into_iter()
        .enumerate()
        .map(|(i, (id, score))| RankedCandidate {
            rank: i + 1,
            id,
            score,
        })
        .collect())
}

/// Ids of a ranking, in order.
pub fn ranked_ids(ranking: &[RankedCandidate]) -> Vec<String> {
    ranking.iter().map(|r| r.id.clone()).collect()
}
