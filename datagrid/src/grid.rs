//! Grid view-state controller.
//!
//! [`Grid`] owns the records, the column schema and all view state, and
//! re-runs the Filter -> Sort -> Paginate pipeline synchronously after every
//! mutation. Reading any output is therefore always consistent with the last
//! state change; there is no reactive layer and no partial update.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::column::{Column, Schema};
use crate::filter::{self, FilterState};
use crate::keys::{EventResult, FocusGuard, Key, KeyCombo};
use crate::page::{self, PageState};
use crate::sort::{self, Direction, Sort};

/// How many page links a pagination strip shows at most.
const MAX_PAGE_LINKS: usize = 5;

/// Unique identifier for a grid instance.
///
/// Two grids on the same page never share state; the id also tags log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridId(usize);

impl GridId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__grid_{}", self.0)
    }
}

type ActivateHandler<T> = Box<dyn Fn(&T)>;
type ActionsRenderer<T> = Box<dyn Fn(&T) -> String>;

/// A filtered, sorted, paginated, column-visibility-controlled view over an
/// in-memory collection of records.
///
/// The engine is headless: it decides which rows and columns are visible and
/// exposes the state needed to render controls, but never renders anything
/// itself. All operations are synchronous, and none of them panics or
/// returns an error — malformed input degrades to documented fallbacks.
///
/// # Example
///
/// ```
/// use datagrid::prelude::*;
///
/// struct Ticket {
///     subject: String,
///     status: String,
/// }
///
/// # fn main() -> Result<(), SchemaError> {
/// let schema = Schema::new(vec![
///     Column::new("subject", "Subject")
///         .with_accessor(|t: &Ticket| CellValue::from(t.subject.as_str()))
///         .with_sort()
///         .with_filter(FilterKind::Text),
///     Column::new("status", "Status")
///         .with_accessor(|t: &Ticket| CellValue::from(t.status.as_str()))
///         .with_filter(FilterKind::Select)
///         .with_filter_options(["open", "closed"]),
/// ])?;
///
/// let tickets = vec![
///     Ticket { subject: "Cannot log in".into(), status: "open".into() },
///     Ticket { subject: "Invoice export stuck".into(), status: "closed".into() },
/// ];
///
/// let mut grid = Grid::new(schema, tickets);
/// grid.set_column_filter("status", "open");
/// assert_eq!(grid.total_filtered(), 1);
/// assert_eq!(grid.page_rows()[0].subject, "Cannot log in");
/// # Ok(())
/// # }
/// ```
pub struct Grid<T> {
    /// Unique identifier.
    id: GridId,
    /// Column schema.
    schema: Schema<T>,
    /// The raw records supplied by the caller.
    records: Vec<T>,
    /// Global query and per-column filters.
    filters: FilterState,
    /// Active sort, if any.
    sort: Option<Sort>,
    /// Current page index and size.
    page: PageState,
    /// Per-column rendering visibility.
    visibility: HashMap<String, bool>,
    /// Filtered and sorted record indices, rebuilt on every mutation.
    view: Vec<usize>,
    /// Page count for the current view, rebuilt on every mutation.
    total_pages: usize,
    /// Caller's row activation callback.
    on_activate: Option<ActivateHandler<T>>,
    /// Caller's per-row actions renderer; opaque to the engine.
    actions: Option<ActionsRenderer<T>>,
}

impl<T> Grid<T> {
    /// Creates a grid over the given schema and records.
    ///
    /// Every column starts visible, no filter or sort is active, and the
    /// page size is [`DEFAULT_PAGE_SIZE`](crate::page::DEFAULT_PAGE_SIZE).
    pub fn new(schema: Schema<T>, records: Vec<T>) -> Self {
        let visibility = schema
            .columns()
            .iter()
            .map(|column| (column.id.clone(), true))
            .collect();
        let mut grid = Self {
            id: GridId::new(),
            schema,
            records,
            filters: FilterState::new(),
            sort: None,
            page: PageState::default(),
            visibility,
            view: Vec::new(),
            total_pages: 0,
            on_activate: None,
            actions: None,
        };
        grid.recompute();
        grid
    }

    /// Sets the initial page size. Values outside
    /// [`PAGE_SIZES`](crate::page::PAGE_SIZES) keep the default.
    pub fn with_page_size(mut self, size: usize) -> Self {
        if page::is_allowed_size(size) {
            self.page.size = size;
            self.recompute();
        } else {
            log::debug!("grid {}: rejecting initial page size {}", self.id, size);
        }
        self
    }

    /// Sets the row activation callback invoked by [`Grid::activate_row`].
    pub fn with_on_activate(mut self, handler: impl Fn(&T) + 'static) -> Self {
        self.on_activate = Some(Box::new(handler));
        self
    }

    /// Sets the per-row actions renderer surfaced by [`Grid::actions_for`].
    pub fn with_actions(mut self, renderer: impl Fn(&T) -> String + 'static) -> Self {
        self.actions = Some(Box::new(renderer));
        self
    }

    /// Get the unique ID.
    pub fn id(&self) -> GridId {
        self.id
    }

    /// Returns the column schema.
    pub fn schema(&self) -> &Schema<T> {
        &self.schema
    }

    /// Returns all records, unfiltered, in their original order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    // -------------------------------------------------------------------------
    // Records
    // -------------------------------------------------------------------------

    /// Replaces the record set, e.g. after the caller re-fetched its data.
    ///
    /// Filters, sort and page size are kept; the page index clamps if the
    /// new set is smaller.
    pub fn set_records(&mut self, records: Vec<T>) {
        self.records = records;
        self.recompute();
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Sets the global free-text query and resets to the first page.
    pub fn set_global_query(&mut self, query: impl Into<String>) {
        self.filters.set_global_query(query);
        self.page.index = 1;
        self.recompute();
    }

    /// Sets a per-column filter value and resets to the first page.
    ///
    /// An empty value removes the filter; `"all"` deactivates it without
    /// removing the entry.
    pub fn set_column_filter(&mut self, column_id: &str, value: impl Into<String>) {
        self.filters.set_column_filter(column_id, value);
        self.page.index = 1;
        self.recompute();
    }

    /// Clears the global query and every per-column filter.
    pub fn clear_all_filters(&mut self) {
        self.filters.clear();
        self.page.index = 1;
        self.recompute();
    }

    /// Returns the global free-text query.
    pub fn global_query(&self) -> &str {
        self.filters.global_query()
    }

    /// Returns the filter value for a column, if one is set.
    pub fn column_filter(&self, column_id: &str) -> Option<&str> {
        self.filters.column_filter(column_id)
    }

    /// Counts the per-column filters that actually restrict rows.
    pub fn active_filter_count(&self) -> usize {
        self.filters.active_filter_count()
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Cycles the sort state for a column: none -> asc -> desc -> none.
    ///
    /// Activating a different column starts at ascending. Requests for
    /// non-sortable or unknown columns are ignored.
    pub fn toggle_sort(&mut self, column_id: &str) {
        let sortable = self
            .schema
            .column(column_id)
            .is_some_and(|column| column.sortable);
        if !sortable {
            log::debug!(
                "grid {}: ignoring sort toggle on non-sortable column '{}'",
                self.id,
                column_id
            );
            return;
        }

        self.sort = match self.sort.take() {
            Some(sort) if sort.column_id == column_id => match sort.direction {
                Direction::Asc => Some(Sort::desc(column_id)),
                Direction::Desc => None,
            },
            _ => Some(Sort::asc(column_id)),
        };
        self.recompute();
    }

    /// Clears the active sort.
    pub fn clear_sort(&mut self) {
        if self.sort.take().is_some() {
            self.recompute();
        }
    }

    /// Returns the active sort, if any.
    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// Returns the sort direction for a column, for header indicators.
    pub fn sort_direction_for(&self, column_id: &str) -> Option<Direction> {
        self.sort
            .as_ref()
            .filter(|sort| sort.column_id == column_id)
            .map(|sort| sort.direction)
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Moves to the given 1-based page, clamped to the valid range.
    pub fn set_page_index(&mut self, index: usize) {
        self.change_page(index);
    }

    /// Changes the page size and resets to the first page.
    ///
    /// Values outside [`PAGE_SIZES`](crate::page::PAGE_SIZES) are ignored.
    pub fn set_page_size(&mut self, size: usize) {
        if !page::is_allowed_size(size) {
            log::debug!("grid {}: rejecting page size {}", self.id, size);
            return;
        }
        self.page.size = size;
        self.page.index = 1;
        self.recompute();
    }

    /// Moves to the previous page. Returns `true` if the page changed.
    pub fn prev_page(&mut self) -> bool {
        self.change_page(self.page.index.saturating_sub(1).max(1))
    }

    /// Moves to the next page. Returns `true` if the page changed.
    pub fn next_page(&mut self) -> bool {
        self.change_page(self.page.index + 1)
    }

    /// Jumps to the first page. Returns `true` if the page changed.
    pub fn first_page(&mut self) -> bool {
        self.change_page(1)
    }

    /// Jumps to the last page. Returns `true` if the page changed.
    pub fn last_page(&mut self) -> bool {
        self.change_page(self.total_pages.max(1))
    }

    fn change_page(&mut self, index: usize) -> bool {
        let clamped = page::clamp_index(index, self.total_pages);
        if clamped == self.page.index {
            return false;
        }
        self.page.index = clamped;
        self.recompute();
        true
    }

    /// Returns the current 1-based page index.
    pub fn page_index(&self) -> usize {
        self.page.index
    }

    /// Returns the current page size.
    pub fn page_size(&self) -> usize {
        self.page.size
    }

    /// Returns the number of pages in the filtered view; 0 when empty.
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Returns `true` if a previous page exists.
    pub fn has_prev_page(&self) -> bool {
        self.page.index > 1
    }

    /// Returns `true` if a next page exists.
    pub fn has_next_page(&self) -> bool {
        self.page.index < self.total_pages
    }

    /// The page numbers a pagination strip should offer, at most 5.
    pub fn page_numbers(&self) -> Vec<usize> {
        page::page_numbers(self.total_pages, MAX_PAGE_LINKS)
    }

    // -------------------------------------------------------------------------
    // Column visibility
    // -------------------------------------------------------------------------

    /// Flips the rendering visibility of a column.
    ///
    /// Visibility is independent of filtering and sorting: an active filter
    /// on a hidden column keeps restricting rows.
    pub fn toggle_column_visibility(&mut self, column_id: &str) {
        if let Some(visible) = self.visibility.get_mut(column_id) {
            *visible = !*visible;
            self.recompute();
        }
    }

    /// Returns `true` if the column is currently rendered.
    pub fn is_column_visible(&self, column_id: &str) -> bool {
        self.visibility.get(column_id).copied().unwrap_or(true)
    }

    /// Returns the visible columns in declaration order.
    pub fn visible_columns(&self) -> Vec<&Column<T>> {
        self.schema
            .columns()
            .iter()
            .filter(|column| self.is_column_visible(&column.id))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    /// Returns the records on the current page, in view order.
    pub fn page_rows(&self) -> Vec<&T> {
        let bounds = page::page_bounds(self.view.len(), self.page);
        self.view[bounds]
            .iter()
            .map(|&index| &self.records[index])
            .collect()
    }

    /// Number of records surviving the filters.
    pub fn total_filtered(&self) -> usize {
        self.view.len()
    }

    /// Number of records on the current page.
    pub fn visible_count(&self) -> usize {
        page::page_bounds(self.view.len(), self.page).len()
    }

    /// Returns `true` if no record survives the filters.
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    // -------------------------------------------------------------------------
    // Activation and row actions
    // -------------------------------------------------------------------------

    /// Invokes the activation callback for a row of the current page.
    ///
    /// `offset` is the row's position within the page. Out-of-range offsets
    /// and grids without a callback are ignored.
    pub fn activate_row(&self, offset: usize) {
        let Some(handler) = &self.on_activate else {
            return;
        };
        let bounds = page::page_bounds(self.view.len(), self.page);
        if let Some(&index) = self.view[bounds].get(offset) {
            handler(&self.records[index]);
        }
    }

    /// Returns the caller's rendered actions for a record, if configured.
    pub fn actions_for(&self, record: &T) -> Option<String> {
        self.actions.as_ref().map(|renderer| renderer(record))
    }

    // -------------------------------------------------------------------------
    // Keyboard navigation
    // -------------------------------------------------------------------------

    /// Interprets a page-navigation chord.
    ///
    /// Ctrl+Left/Right move to the previous/next page and Ctrl+Home/End jump
    /// to the first/last page, all through the same clamping as
    /// [`Grid::set_page_index`]. Chords are ignored while the focus guard
    /// reports a text-editing control as focused, and when the page cannot
    /// move any further.
    pub fn handle_key(&mut self, combo: &KeyCombo, focus: &dyn FocusGuard) -> EventResult {
        if focus.is_editing() {
            return EventResult::Ignored;
        }
        if !combo.modifiers.ctrl || combo.modifiers.alt || combo.modifiers.shift {
            return EventResult::Ignored;
        }

        let moved = match combo.key {
            Key::Left => self.prev_page(),
            Key::Right => self.next_page(),
            Key::Home => self.first_page(),
            Key::End => self.last_page(),
            _ => return EventResult::Ignored,
        };

        if moved {
            EventResult::Consumed
        } else {
            EventResult::Ignored
        }
    }

    // -------------------------------------------------------------------------
    // Pipeline
    // -------------------------------------------------------------------------

    /// Re-runs Filter -> Sort -> Paginate over the current state.
    ///
    /// Called at the end of every mutating operation, before control returns
    /// to the caller. Also clamps the page index when the view shrank.
    fn recompute(&mut self) {
        let filtered = filter::apply_filters(&self.records, &self.schema, &self.filters);
        self.view = sort::apply_sort(&self.records, &self.schema, filtered, self.sort.as_ref());
        self.total_pages = page::total_pages(self.view.len(), self.page.size);

        let clamped = page::clamp_index(self.page.index, self.total_pages);
        if clamped != self.page.index {
            log::debug!(
                "grid {}: page index clamped {} -> {}",
                self.id,
                self.page.index,
                clamped
            );
            self.page.index = clamped;
        }

        log::trace!(
            "grid {}: {} of {} rows pass filters, page {}/{}",
            self.id,
            self.view.len(),
            self.records.len(),
            self.page.index,
            self.total_pages
        );
    }
}

impl<T> fmt::Debug for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("id", &self.id)
            .field("records", &self.records.len())
            .field("filtered", &self.view.len())
            .field("page", &self.page)
            .field("sort", &self.sort)
            .finish()
    }
}
