//! Column schema: the declarative description of a grid's columns.

use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::value::CellValue;

/// Typed extractor from a record to the cell value the engine filters and
/// sorts on.
///
/// A plain function pointer keeps columns copyable and forces the extractor
/// to be pure; caller-side closures that need to capture belong in the
/// grid's activation/actions callbacks instead.
pub type Accessor<T> = fn(&T) -> CellValue;

/// Pure display renderer for columns whose accessor is insufficient.
///
/// The output is opaque to the engine; it is never searched, filtered or
/// sorted.
pub type Renderer<T> = fn(&T) -> String;

/// Comparison semantics for a column's filter input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Case-insensitive substring match.
    #[default]
    Text,
    /// Exact case-insensitive equality against one of the column's options.
    Select,
    /// Equality on the calendar date, time-of-day dropped.
    Date,
}

/// A grid column definition.
///
/// # Example
///
/// ```
/// use datagrid::column::{Column, FilterKind};
/// use datagrid::value::CellValue;
///
/// struct Ticket {
///     status: String,
/// }
///
/// let column = Column::new("status", "Status")
///     .with_accessor(|t: &Ticket| CellValue::from(t.status.as_str()))
///     .with_sort()
///     .with_filter(FilterKind::Select)
///     .with_filter_options(["open", "closed"]);
///
/// assert!(column.sortable);
/// ```
pub struct Column<T> {
    /// Unique identifier, stable across renders.
    pub id: String,
    /// Header text displayed at the top; opaque to the engine.
    pub header: String,
    /// Value extractor; `None` for purely computed columns.
    pub accessor: Option<Accessor<T>>,
    /// Display renderer used when the accessor is insufficient.
    pub renderer: Option<Renderer<T>>,
    /// Whether sort requests on this column are honored.
    pub sortable: bool,
    /// Whether this column is offered in the per-column filter panel.
    pub filterable: bool,
    /// Comparison semantics for this column's filter input.
    pub filter_kind: FilterKind,
    /// Allowed values, required when `filter_kind` is `Select`.
    pub filter_options: Vec<String>,
}

impl<T> Column<T> {
    /// Create a new column with the given id and header.
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            accessor: None,
            renderer: None,
            sortable: false,
            filterable: false,
            filter_kind: FilterKind::default(),
            filter_options: Vec::new(),
        }
    }

    /// Sets the value extractor.
    pub fn with_accessor(mut self, accessor: Accessor<T>) -> Self {
        self.accessor = Some(accessor);
        self
    }

    /// Sets the display renderer.
    pub fn with_renderer(mut self, renderer: Renderer<T>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Marks the column as sortable.
    pub fn with_sort(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Marks the column as filterable with the given comparison semantics.
    pub fn with_filter(mut self, kind: FilterKind) -> Self {
        self.filterable = true;
        self.filter_kind = kind;
        self
    }

    /// Sets the allowed values for a select filter.
    pub fn with_filter_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_options = options.into_iter().map(Into::into).collect();
        self
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: self.accessor,
            renderer: self.renderer,
            sortable: self.sortable,
            filterable: self.filterable,
            filter_kind: self.filter_kind,
            filter_options: self.filter_options.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("accessor", &self.accessor.is_some())
            .field("renderer", &self.renderer.is_some())
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("filter_kind", &self.filter_kind)
            .field("filter_options", &self.filter_options)
            .finish()
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Error raised when a column schema violates its invariants.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    /// Two columns share the same id.
    #[error("Duplicate column id '{id}' in schema")]
    DuplicateColumn { id: String },

    /// A select column was declared without any filter options.
    #[error("Select column '{id}' has no filter options")]
    MissingFilterOptions { id: String },
}

impl SchemaError {
    /// Creates a new duplicate column error.
    pub fn duplicate_column(id: impl Into<String>) -> Self {
        Self::DuplicateColumn { id: id.into() }
    }

    /// Creates a new missing filter options error.
    pub fn missing_filter_options(id: impl Into<String>) -> Self {
        Self::MissingFilterOptions { id: id.into() }
    }
}

/// An ordered, validated sequence of column definitions.
///
/// Construction enforces the schema invariants: column ids are unique, and
/// every select column carries at least one filter option. Everything else
/// in the engine can then rely on lookups by id being unambiguous.
pub struct Schema<T> {
    columns: Vec<Column<T>>,
}

impl<T> Schema<T> {
    /// Validates and wraps an ordered list of columns.
    pub fn new(columns: Vec<Column<T>>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.id.as_str()) {
                return Err(SchemaError::duplicate_column(&column.id));
            }
            if column.filterable
                && column.filter_kind == FilterKind::Select
                && column.filter_options.is_empty()
            {
                return Err(SchemaError::missing_filter_options(&column.id));
            }
        }
        Ok(Self { columns })
    }

    /// Returns the columns in declaration order.
    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// Finds a column by id.
    pub fn column(&self, id: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|column| column.id == id)
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<T> Clone for Schema<T> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("columns", &self.columns)
            .finish()
    }
}
