//! Score formulas for embedding sorts.
//!
//! Every score is a distance term plus a secondary term. Higher scores rank
//! first. Distance is the euclidean distance between the query embedding and
//! the item embedding; `0.0` means identical.
//!
//! | Sort | Distance term | Secondary term |
//! |------|---------------|----------------|
//! | Top Desc | `1 / (d + ε)²` | `ln(1 + bookmarks) · 2` |
//! | Top Asc | `1 / (d + ε)²` | `exp(-bookmarks / 5) · 20` |
//! | Date Desc | `1 / (d + ε)` | `exp(-h^0.25) · 100` |
//! | Date Asc | `1 / (d + ε)` | `ln(1 + h^0.25) · 1` |
//!
//! where `h` is the absolute distance in hours between the item's timestamp
//! and the reference date.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sort::{DateField, ScoreFamily, SortDirection, SortOption};

/// Keeps the distance term finite at distance zero.
pub const EPSILON: f64 = 0.01;

/// Weight of `ln(1 + bookmarks)` for descending bookmark sorts.
pub const TOP_DESC_WEIGHT: f64 = 2.0;

/// Weight of the bookmark decay for ascending bookmark sorts.
pub const TOP_ASC_WEIGHT: f64 = 20.0;

/// Bookmark count over which the ascending bonus decays by a factor of e.
pub const TOP_ASC_DECAY: f64 = 5.0;

/// Weight of the recency bonus for descending date sorts.
pub const DATE_DESC_WEIGHT: f64 = 100.0;

/// Weight of the age bonus for ascending date sorts.
pub const DATE_ASC_WEIGHT: f64 = 1.0;

/// Exponent applied to the hour difference before weighting.
pub const DATE_EXPONENT: f64 = 0.25;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Score for bookmark ("Top") sorts.
///
/// Descending sorts reward bookmarks logarithmically; ascending sorts give
/// a bonus that decays exponentially as bookmarks grow.
pub fn top_score(distance: f64, bookmarks: f64, direction: SortDirection) -> f64 {
    let distance_factor = 1.0 / (distance + EPSILON).powi(2);
    let bonus = match direction {
        SortDirection::Desc => bookmarks.ln_1p() * TOP_DESC_WEIGHT,
        SortDirection::Asc => (-bookmarks / TOP_ASC_DECAY).exp() * TOP_ASC_WEIGHT,
    };
    distance_factor + bonus
}

/// Score for date sorts.
///
/// Descending sorts reward items close to `reference`; ascending sorts
/// reward items far from it. Both ignore whether the item is before or
/// after the reference.
pub fn date_score(
    distance: f64,
    item_date: DateTime<Utc>,
    reference: DateTime<Utc>,
    direction: SortDirection,
) -> f64 {
    let base = 1.0 / (distance + EPSILON);
    date_base_bonus(base, hours_between(item_date, reference), direction)
}

/// Date score for an offset in seconds from the reference date.
///
/// Equivalent to [`date_score`] with `item_date = reference + offset`, without
/// the round trip through `DateTime` (grids sample sub-second offsets).
pub fn date_score_at_offset(distance: f64, offset_seconds: f64, direction: SortDirection) -> f64 {
    let base = 1.0 / (distance + EPSILON);
    date_base_bonus(base, offset_seconds.abs() / SECONDS_PER_HOUR, direction)
}

fn date_base_bonus(base: f64, hours: f64, direction: SortDirection) -> f64 {
    let scaled = hours.abs().powf(DATE_EXPONENT);
    let bonus = match direction {
        SortDirection::Desc => (-scaled).exp() * DATE_DESC_WEIGHT,
        SortDirection::Asc => scaled.ln_1p() * DATE_ASC_WEIGHT,
    };
    base + bonus
}

/// Absolute difference between two instants in fractional hours.
pub fn hours_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    let delta = a.signed_duration_since(b);
    let seconds = delta.num_seconds() as f64
        + f64::from(delta.subsec_nanos()) / 1_000_000_000.0;
    seconds.abs() / SECONDS_PER_HOUR
}

/// Reject distances the formulas cannot handle.
pub fn validate_distance(distance: f64) -> Result<()> {
    if !distance.is_finite() {
        return Err(Error::validation_field("distance", "must be finite"));
    }
    if distance < 0.0 {
        return Err(Error::validation_field(
            "distance",
            format!("must not be negative (got {distance})"),
        ));
    }
    Ok(())
}

/// A search result as seen by the scoring function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Stable identifier of the result.
    pub id: String,

    /// Embedding distance to the query.
    pub distance: f64,

    /// Number of bookmarks.
    #[serde(default)]
    pub bookmarks: u64,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    /// Create a candidate whose timestamps are both `at`.
    pub fn new(id: impl Into<String>, distance: f64, bookmarks: u64, at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            distance,
            bookmarks,
            created_at: at,
            updated_at: at,
        }
    }

    /// Set the update timestamp.
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// The timestamp a date sort reads.
    pub fn date(&self, field: DateField) -> DateTime<Utc> {
        match field {
            DateField::Created => self.created_at,
            DateField::Updated => self.updated_at,
        }
    }
}

/// Score one candidate under `sort`.
///
/// `reference` is only read by date sorts.
pub fn score_candidate(
    sort: SortOption,
    candidate: &Candidate,
    reference: DateTime<Utc>,
) -> Result<f64> {
    validate_distance(candidate.distance)?;
    let score = match (sort.family(), sort.date_field()) {
        (ScoreFamily::Date, Some(field)) => date_score(
            candidate.distance,
            candidate.date(field),
            reference,
            sort.direction(),
        ),
        _ => top_score(candidate.distance, candidate.bookmarks as f64, sort.direction()),
    };
    Ok(score)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    // ------------------------------------------------------------------------
    // top_score
    // ------------------------------------------------------------------------

    #[test]
    fn test_top_score_zero_distance_zero_bookmarks() {
        // 1 / 0.01^2 = 10_000
        assert!(approx(top_score(0.0, 0.0, SortDirection::Desc), 10_000.0));
        assert!(approx(top_score(0.0, 0.0, SortDirection::Asc), 10_020.0));
    }

    #[test]
    fn test_top_score_desc_rewards_bookmarks() {
        let expected = 1.0 / (0.5f64 + 0.01).powi(2) + (101.0f64).ln() * 2.0;
        assert!(approx(top_score(0.5, 100.0, SortDirection::Desc), expected));
        let desc = SortDirection::Desc;
        assert!(top_score(0.5, 100.0, desc) > top_score(0.5, 10.0, desc));
    }

    #[test]
    fn test_top_score_asc_penalizes_bookmarks() {
        let expected = 1.0 / (0.5f64 + 0.01).powi(2) + (-1.0f64).exp() * 20.0;
        assert!(approx(top_score(0.5, 5.0, SortDirection::Asc), expected));
        let asc = SortDirection::Asc;
        assert!(top_score(0.5, 0.0, asc) > top_score(0.5, 50.0, asc));
    }

    #[test]
    fn test_top_score_huge_bookmarks_finite() {
        assert!(top_score(1.0, u64::MAX as f64, SortDirection::Desc).is_finite());
        assert!(top_score(1.0, u64::MAX as f64, SortDirection::Asc).is_finite());
    }

    // ------------------------------------------------------------------------
    // date_score
    // ------------------------------------------------------------------------

    #[test]
    fn test_date_score_same_instant() {
        let r = reference();
        // h = 0: desc bonus exp(0)·100, asc bonus ln(1)·1 = 0
        assert!(approx(date_score(0.0, r, r, SortDirection::Desc), 200.0));
        assert!(approx(date_score(0.0, r, r, SortDirection::Asc), 100.0));
    }

    #[test]
    fn test_date_score_sixteen_hours() {
        let r = reference();
        let item = r + Duration::hours(16);
        // 16^0.25 = 2
        let desc = 1.0 / 0.51 + (-2.0f64).exp() * 100.0;
        let asc = 1.0 / 0.51 + (3.0f64).ln();
        assert!(approx(date_score(0.5, item, r, SortDirection::Desc), desc));
        assert!(approx(date_score(0.5, item, r, SortDirection::Asc), asc));
    }

    #[test]
    fn test_date_score_symmetric_around_reference() {
        let r = reference();
        let before = r - Duration::days(3);
        let after = r + Duration::days(3);
        for dir in [SortDirection::Asc, SortDirection::Desc] {
            assert!(approx(
                date_score(0.2, before, r, dir),
                date_score(0.2, after, r, dir)
            ));
        }
    }

    #[test]
    fn test_date_score_at_offset_matches_date_score() {
        let r = reference();
        let item = r - Duration::minutes(90);
        for dir in [SortDirection::Asc, SortDirection::Desc] {
            assert!(approx(
                date_score(0.3, item, r, dir),
                date_score_at_offset(0.3, -5400.0, dir)
            ));
        }
    }

    #[test]
    fn test_hours_between_fractional() {
        let r = reference();
        assert!(approx(hours_between(r + Duration::minutes(30), r), 0.5));
        assert!(approx(hours_between(r, r + Duration::milliseconds(1800)), 0.0005));
    }

    // ------------------------------------------------------------------------
    // validation and dispatch
    // ------------------------------------------------------------------------

    #[test]
    fn test_validate_distance() {
        assert!(validate_distance(0.0).is_ok());
        assert!(validate_distance(1.7).is_ok());
        assert!(validate_distance(-0.1).is_err());
        assert!(validate_distance(f64::NAN).is_err());
        assert!(validate_distance(f64::INFINITY).is_err());
    }

    #[test]
    fn test_score_candidate_dispatches_on_sort() {
        let r = reference();
        let c = Candidate::new("a", 0.25, 40, r - Duration::hours(1))
            .with_updated_at(r - Duration::hours(81));

        let top = score_candidate(SortOption::EmbedTopDesc, &c, r).unwrap();
        assert!(approx(top, top_score(0.25, 40.0, SortDirection::Desc)));

        let created = score_candidate(SortOption::EmbedDateCreatedAsc, &c, r).unwrap();
        assert!(approx(created, date_score(0.25, c.created_at, r, SortDirection::Asc)));

        let updated = score_candidate(SortOption::EmbedDateUpdatedAsc, &c, r).unwrap();
        assert!(approx(updated, date_score(0.25, c.updated_at, r, SortDirection::Asc)));
        assert!(updated > created);
    }

    #[test]
    fn test_score_candidate_rejects_negative_distance() {
        let c = Candidate::new("bad", -0.5, 0, reference());
        let err = score_candidate(SortOption::EmbedTopAsc, &c, reference()).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
}
