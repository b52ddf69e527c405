//! SQL renderings of the score formulas.
//!
//! The search backend evaluates the same formulas as [`crate::scoring`]
//! inside PostgreSQL, where `distance` is typically a pgvector operator
//! expression such as `embedding <-> $1`.

use serde::{Deserialize, Serialize};

use crate::scoring::{
    DATE_ASC_WEIGHT, DATE_DESC_WEIGHT, DATE_EXPONENT, EPSILON, TOP_ASC_DECAY, TOP_ASC_WEIGHT,
    TOP_DESC_WEIGHT,
};
use crate::sort::{DateField, SortDirection, SortOption};

/// Column names the expressions refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlColumns {
    /// Bookmark count column.
    pub bookmarks: String,
    /// Creation timestamp column.
    pub created_at: String,
    /// Update timestamp column.
    pub updated_at: String,
}

impl Default for SqlColumns {
    fn default() -> Self {
        Self {
            bookmarks: "bookmarks".to_string(),
            created_at: "created_at".to_string(),
            updated_at: "updated_at".to_string(),
        }
    }
}

impl SqlColumns {
    fn date(&self, field: DateField) -> &str {
        match field {
            DateField::Created => &self.created_at,
            DateField::Updated => &self.updated_at,
        }
    }
}

/// Render the score expression for `sort`.
///
/// `distance` is wrapped in parentheses so operator expressions such as
/// `embedding <-> $1` bind before the epsilon is added. `reference` is the SQL expression for
/// the reference timestamp (e.g. `NOW()` or a bind parameter) and is only
/// used by date sorts.
pub fn sql_score_expression(
    sort: SortOption,
    columns: &SqlColumns,
    distance: &str,
    reference: &str,
) -> String {
    let direction = sort.direction();
    match sort.date_field() {
        None => {
            let base = format!("(1 / POWER(({distance}) + {EPSILON}, 2))");
            let bonus = match direction {
                SortDirection::Desc => {
                    format!("(LN({} + 1) * {TOP_DESC_WEIGHT})", columns.bookmarks)
                }
                SortDirection::Asc => format!(
                    "(EXP(-{} / {TOP_ASC_DECAY:.1}) * {TOP_ASC_WEIGHT})",
                    columns.bookmarks
                ),
            };
            format!("{base} + {bonus}")
        }
        Some(field) => {
            let base = format!("(1 / (({distance}) + {EPSILON}))");
            let hours = format!(
                "POWER(ABS(EXTRACT(EPOCH FROM {} - {reference}) / 3600), {DATE_EXPONENT})",
                columns.date(field)
            );
            let bonus = match direction {
                SortDirection::Desc => format!("(EXP(-{hours}) * {DATE_DESC_WEIGHT})"),
                SortDirection::Asc => format!("(LN(1 + {hours}) * {DATE_ASC_WEIGHT})"),
            };
            format!("{base} + {bonus}")
        }
    }
}

/// Render an `ORDER BY` clause ranking highest scores first.
pub fn order_by_clause(
    sort: SortOption,
    columns: &SqlColumns,
    distance: &str,
    reference: &str,
) -> String {
    format!(
        "ORDER BY {} DESC",
        sql_score_expression(sort, columns, distance, reference)
    )
}
