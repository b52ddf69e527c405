//! Embedding sort options.
//!
//! Every embedding sort combines the vector distance between query and item
//! with one secondary signal: the item's bookmark count ("Top" sorts) or
//! one of its timestamps ("Date" sorts). The direction flips how that
//! secondary signal is weighted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::util::slugify;

/// Direction of the secondary signal in a sort option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// Returns `true` for [`SortDirection::Desc`].
    pub fn is_descending(self) -> bool {
        self == SortDirection::Desc
    }
}

/// The secondary signal a sort option combines with distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFamily {
    /// Bookmark count.
    Bookmarks,
    /// Distance in time from a reference date.
    Date,
}

/// Which timestamp a date sort reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    /// Creation timestamp.
    Created,
    /// Last update timestamp.
    Updated,
}

/// Embedding sort options supported by the search scoring function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOption {
    /// High-bookmarked items weighted lower.
    EmbedTopAsc,
    /// High-bookmarked items weighted higher.
    EmbedTopDesc,
    /// Items created farther from the reference date weighted higher.
    EmbedDateCreatedAsc,
    /// Items created closer to the reference date weighted higher.
    EmbedDateCreatedDesc,
    /// Items updated farther from the reference date weighted higher.
    EmbedDateUpdatedAsc,
    /// Items updated closer to the reference date weighted higher.
    EmbedDateUpdatedDesc,
}

const ALL: [SortOption; 6] = [
    SortOption::EmbedTopAsc,
    SortOption::EmbedTopDesc,
    SortOption::EmbedDateCreatedAsc,
    SortOption::EmbedDateCreatedDesc,
    SortOption::EmbedDateUpdatedAsc,
    SortOption::EmbedDateUpdatedDesc,
];

impl SortOption {
    /// All sort options, in declaration order.
    pub fn all() -> &'static [SortOption] {
        &ALL
    }

    /// The scenarios plotted when none are configured.
    ///
    /// The updated-date sorts share their formula with the created-date
    /// sorts, so only the latter are plotted.
    pub fn default_scenarios() -> Vec<SortOption> {
        vec![
            SortOption::EmbedTopAsc,
            SortOption::EmbedTopDesc,
            SortOption::EmbedDateCreatedAsc,
            SortOption::EmbedDateCreatedDesc,
        ]
    }

    /// PascalCase name, as used by the search API.
    pub fn name(self) -> &'static str {
        match self {
            SortOption::EmbedTopAsc => "EmbedTopAsc",
            SortOption::EmbedTopDesc => "EmbedTopDesc",
            SortOption::EmbedDateCreatedAsc => "EmbedDateCreatedAsc",
            SortOption::EmbedDateCreatedDesc => "EmbedDateCreatedDesc",
            SortOption::EmbedDateUpdatedAsc => "EmbedDateUpdatedAsc",
            SortOption::EmbedDateUpdatedDesc => "EmbedDateUpdatedDesc",
        }
    }

    /// Direction of the secondary signal.
    pub fn direction(self) -> SortDirection {
        if self.name().ends_with("Desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    /// Secondary signal family.
    pub fn family(self) -> ScoreFamily {
        match self {
            SortOption::EmbedTopAsc | SortOption::EmbedTopDesc => ScoreFamily::Bookmarks,
            _ => ScoreFamily::Date,
        }
    }

    /// Timestamp read by date sorts; `None` for bookmark sorts.
    pub fn date_field(self) -> Option<DateField> {
        match self {
            SortOption::EmbedDateCreatedAsc | SortOption::EmbedDateCreatedDesc => {
                Some(DateField::Created)
            }
            SortOption::EmbedDateUpdatedAsc | SortOption::EmbedDateUpdatedDesc => {
                Some(DateField::Updated)
            }
            SortOption::EmbedTopAsc | SortOption::EmbedTopDesc => None,
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortOption {
    type Err = Error;

    /// Accepts the PascalCase name or any case/separator variant of it
    /// (`embed-top-asc`, `EMBED_TOP_ASC`, `embedtopasc`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = squash(s);
        ALL.iter()
            .copied()
            .find(|opt| squash(opt.name()) == wanted)
            .ok_or_else(|| Error::UnknownSortOption {
                name: s.to_string(),
            })
    }
}

fn squash(s: &str) -> String {
    slugify(s).replace('-', "")
}
