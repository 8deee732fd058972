use datagrid::prelude::*;

#[derive(Clone)]
struct Reading {
    label: &'static str,
    value: Option<i64>,
}

fn schema() -> Schema<Reading> {
    Schema::new(vec![
        Column::new("label", "Label")
            .with_accessor(|r: &Reading| CellValue::from(r.label))
            .with_sort(),
        Column::new("value", "Value")
            .with_accessor(|r: &Reading| CellValue::from(r.value))
            .with_sort(),
        Column::new("notes", "Notes"),
    ])
    .unwrap()
}

fn grid(records: Vec<Reading>) -> Grid<Reading> {
    Grid::new(schema(), records)
}

fn values(grid: &Grid<Reading>) -> Vec<Option<i64>> {
    grid.page_rows().iter().map(|r| r.value).collect()
}

fn labels(grid: &Grid<Reading>) -> Vec<&'static str> {
    grid.page_rows().iter().map(|r| r.label).collect()
}

fn reading(label: &'static str, value: Option<i64>) -> Reading {
    Reading { label, value }
}

#[test]
fn test_null_sorts_last_in_both_directions() {
    let mut grid = grid(vec![
        reading("a", None),
        reading("b", Some(2)),
        reading("c", Some(1)),
    ]);

    grid.toggle_sort("value");
    assert_eq!(values(&grid), vec![Some(1), Some(2), None]);

    grid.toggle_sort("value");
    assert_eq!(values(&grid), vec![Some(2), Some(1), None]);
}

#[test]
fn test_toggle_cycle_returns_to_unsorted() {
    let mut grid = grid(vec![
        reading("c", Some(3)),
        reading("a", Some(1)),
        reading("b", Some(2)),
    ]);

    assert!(grid.sort().is_none());

    grid.toggle_sort("value");
    assert_eq!(grid.sort_direction_for("value"), Some(Direction::Asc));

    grid.toggle_sort("value");
    assert_eq!(grid.sort_direction_for("value"), Some(Direction::Desc));

    grid.toggle_sort("value");
    assert!(grid.sort().is_none());
    // Back to the original relative order.
    assert_eq!(labels(&grid), vec!["c", "a", "b"]);
}

#[test]
fn test_switching_column_resets_to_ascending() {
    let mut grid = grid(vec![reading("b", Some(1)), reading("a", Some(2))]);

    grid.toggle_sort("value");
    grid.toggle_sort("value");
    assert_eq!(grid.sort_direction_for("value"), Some(Direction::Desc));

    grid.toggle_sort("label");
    assert_eq!(grid.sort_direction_for("label"), Some(Direction::Asc));
    assert_eq!(grid.sort_direction_for("value"), None);
    assert_eq!(labels(&grid), vec!["a", "b"]);
}

#[test]
fn test_non_sortable_column_is_a_noop() {
    let mut grid = grid(vec![reading("b", Some(1)), reading("a", Some(2))]);

    grid.toggle_sort("notes");
    assert!(grid.sort().is_none());
    assert_eq!(labels(&grid), vec!["b", "a"]);

    grid.toggle_sort("no-such-column");
    assert!(grid.sort().is_none());
}

#[test]
fn test_unsorted_grid_preserves_input_order() {
    let grid = grid(vec![
        reading("z", Some(9)),
        reading("m", Some(5)),
        reading("a", Some(1)),
    ]);
    assert_eq!(labels(&grid), vec!["z", "m", "a"]);
}

#[test]
fn test_text_sort_is_case_insensitive() {
    let mut grid = grid(vec![
        reading("banana", None),
        reading("Apple", None),
        reading("cherry", None),
    ]);

    grid.toggle_sort("label");
    assert_eq!(labels(&grid), vec!["Apple", "banana", "cherry"]);
}

#[test]
fn test_sort_survives_refiltering() {
    let mut grid = grid(vec![
        reading("a", Some(3)),
        reading("bb", Some(1)),
        reading("ab", Some(2)),
    ]);

    grid.toggle_sort("value");
    grid.set_global_query("a");
    // "bb" drops out; the survivors stay in sorted order.
    assert_eq!(values(&grid), vec![Some(2), Some(3)]);
}
