//! Filter engine: a global free-text query plus per-column filters.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::column::FilterKind;
use crate::column::Schema;
use crate::value::CellValue;
use crate::value::parse_calendar_date;

/// Sentinel filter value meaning "no restriction".
///
/// Select-style filter panels use it as their default option, so the engine
/// treats it (case-insensitively) the same as an absent filter.
pub const FILTER_ALL: &str = "all";

/// Returns `true` if a per-column filter value actually restricts rows.
pub fn is_active_value(value: &str) -> bool {
    !value.is_empty() && !value.eq_ignore_ascii_case(FILTER_ALL)
}

/// The filter portion of the grid's view state.
///
/// Holds the global query and the per-column filter values. A column absent
/// from the mapping, mapped to an empty string, or mapped to [`FILTER_ALL`]
/// is not applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    global_query: String,
    column_filters: HashMap<String, String>,
}

impl FilterState {
    /// Creates an empty filter state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the global free-text query.
    pub fn global_query(&self) -> &str {
        &self.global_query
    }

    /// Sets the global free-text query.
    pub fn set_global_query(&mut self, query: impl Into<String>) {
        self.global_query = query.into();
    }

    /// Returns the filter value for a column, if one is set.
    pub fn column_filter(&self, column_id: &str) -> Option<&str> {
        self.column_filters.get(column_id).map(String::as_str)
    }

    /// Sets a filter value for a column. An empty value removes the entry.
    pub fn set_column_filter(&mut self, column_id: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.column_filters.remove(&column_id.into());
        } else {
            self.column_filters.insert(column_id.into(), value);
        }
    }

    /// Removes the global query and every per-column filter.
    pub fn clear(&mut self) {
        self.global_query.clear();
        self.column_filters.clear();
    }

    /// Returns the per-column filter mapping.
    pub fn column_filters(&self) -> &HashMap<String, String> {
        &self.column_filters
    }

    /// Counts the per-column filters that actually restrict rows.
    pub fn active_filter_count(&self) -> usize {
        self.column_filters
            .values()
            .filter(|value| is_active_value(value))
            .count()
    }

    /// Returns `true` if the global query or any per-column filter is active.
    pub fn has_active_filters(&self) -> bool {
        !self.global_query.is_empty() || self.active_filter_count() > 0
    }
}

/// Applies the global query and every active per-column filter.
///
/// Pure and order-preserving: returns the indices of surviving records in
/// their original order. Filters combine with logical AND. The AND
/// composition makes the result independent of the mapping's iteration
/// order.
pub fn apply_filters<T>(records: &[T], schema: &Schema<T>, filters: &FilterState) -> Vec<usize> {
    let mut survivors: Vec<usize> = (0..records.len()).collect();

    // Global query: any accessor-bearing column may match. Columns without
    // an accessor are never searched.
    let query = filters.global_query();
    if !query.is_empty() {
        let needle = query.to_lowercase();
        survivors.retain(|&index| {
            schema.columns().iter().any(|column| match column.accessor {
                Some(accessor) => cell_contains(&accessor(&records[index]), &needle),
                None => false,
            })
        });
    }

    for (column_id, value) in filters.column_filters() {
        if !is_active_value(value) {
            continue;
        }
        // Filters on unknown or accessor-less columns are inert.
        let Some(column) = schema.column(column_id) else {
            continue;
        };
        let Some(accessor) = column.accessor else {
            continue;
        };
        survivors
            .retain(|&index| cell_matches(&accessor(&records[index]), column.filter_kind, value));
    }

    survivors
}

fn cell_contains(value: &CellValue, needle_lower: &str) -> bool {
    if value.is_null() {
        return false;
    }
    value.to_string().to_lowercase().contains(needle_lower)
}

/// Kind-aware match of one cell against a filter value. Null never matches.
fn cell_matches(value: &CellValue, kind: FilterKind, filter: &str) -> bool {
    if value.is_null() {
        return false;
    }
    match kind {
        FilterKind::Select => value.to_string().to_lowercase() == filter.to_lowercase(),
        FilterKind::Date => match (value.as_calendar_date(), parse_calendar_date(filter)) {
            (Some(field), Some(wanted)) => field == wanted,
            // Unparsable on either side degrades to a substring match.
            _ => cell_contains(value, &filter.to_lowercase()),
        },
        FilterKind::Text => cell_contains(value, &filter.to_lowercase()),
    }
}
