//! Sort engine: single-column ordering with null-last semantics.

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::column::Schema;

/// Sort direction for ordering rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

/// The active sort column and direction.
///
/// The grid holds this as an `Option<Sort>`; `None` means no active sort,
/// so column and direction are always set or cleared together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sort {
    /// Id of the column being sorted.
    pub column_id: String,
    /// Direction of the sort.
    pub direction: Direction,
}

impl Sort {
    /// Creates an ascending sort on a column.
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: Direction::Asc,
        }
    }

    /// Creates a descending sort on a column.
    pub fn desc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: Direction::Desc,
        }
    }
}

/// Orders the given record indices under the active sort.
///
/// With no active sort — or a sort naming an unknown or accessor-less
/// column — the indices pass through unchanged, preserving the original
/// relative order. Null values sort after every defined value in BOTH
/// directions; among defined equal values the order is unspecified
/// (`sort_unstable_by`).
pub fn apply_sort<T>(
    records: &[T],
    schema: &Schema<T>,
    mut indices: Vec<usize>,
    sort: Option<&Sort>,
) -> Vec<usize> {
    let Some(sort) = sort else {
        return indices;
    };
    let Some(column) = schema.column(&sort.column_id) else {
        return indices;
    };
    let Some(accessor) = column.accessor else {
        return indices;
    };

    indices.sort_unstable_by(|&a, &b| {
        let left = accessor(&records[a]);
        let right = accessor(&records[b]);
        match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            // A missing value is always "worst", regardless of direction.
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ordering = left.compare(&right);
                match sort.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            }
        }
    });
    indices
}
