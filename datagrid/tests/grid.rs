use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use datagrid::prelude::*;
use rust_decimal::Decimal;

#[derive(Clone)]
struct Employee {
    name: String,
    department: String,
    salary: Option<Decimal>,
    hired: NaiveDate,
}

fn employee(name: &str, department: &str, salary: Option<i64>, hired: (i32, u32, u32)) -> Employee {
    Employee {
        name: name.to_string(),
        department: department.to_string(),
        salary: salary.map(Decimal::from),
        hired: NaiveDate::from_ymd_opt(hired.0, hired.1, hired.2).unwrap(),
    }
}

fn schema() -> Schema<Employee> {
    Schema::new(vec![
        Column::new("name", "Name")
            .with_accessor(|e: &Employee| CellValue::from(e.name.as_str()))
            .with_sort()
            .with_filter(FilterKind::Text),
        Column::new("department", "Department")
            .with_accessor(|e: &Employee| CellValue::from(e.department.as_str()))
            .with_filter(FilterKind::Select)
            .with_filter_options(["Engineering", "Sales", "Finance"]),
        Column::new("salary", "Salary")
            .with_accessor(|e: &Employee| CellValue::from(e.salary))
            .with_sort(),
        Column::new("hired", "Hired")
            .with_accessor(|e: &Employee| CellValue::from(e.hired))
            .with_sort()
            .with_filter(FilterKind::Date),
    ])
    .unwrap()
}

fn staff() -> Vec<Employee> {
    vec![
        employee("Ada", "Engineering", Some(95_000), (2021, 4, 12)),
        employee("Grace", "Engineering", Some(105_000), (2019, 9, 1)),
        employee("Tukey", "Finance", None, (2022, 1, 30)),
        employee("Florence", "Sales", Some(78_000), (2023, 6, 15)),
        employee("Blaise", "Sales", Some(82_000), (2021, 4, 12)),
    ]
}

fn big_staff(count: usize) -> Vec<Employee> {
    (0..count)
        .map(|i| {
            employee(
                &format!("Employee {i:02}"),
                if i % 2 == 0 { "Engineering" } else { "Sales" },
                Some(50_000 + i as i64),
                (2020, 1, 1),
            )
        })
        .collect()
}

#[test]
fn test_visibility_does_not_change_counts() {
    let mut grid = Grid::new(schema(), staff());
    grid.set_column_filter("department", "Sales");

    let filtered = grid.total_filtered();
    let pages = grid.total_pages();

    grid.toggle_column_visibility("department");
    assert!(!grid.is_column_visible("department"));
    assert_eq!(grid.total_filtered(), filtered);
    assert_eq!(grid.total_pages(), pages);

    grid.toggle_column_visibility("department");
    assert!(grid.is_column_visible("department"));
}

#[test]
fn test_hidden_column_filter_still_restricts() {
    let mut grid = Grid::new(schema(), staff());

    grid.toggle_column_visibility("department");
    grid.set_column_filter("department", "Engineering");

    assert_eq!(grid.total_filtered(), 2);
    assert_eq!(grid.visible_columns().len(), 3);
}

#[test]
fn test_visible_columns_in_declaration_order() {
    let mut grid = Grid::new(schema(), staff());
    grid.toggle_column_visibility("salary");

    let ids: Vec<&str> = grid
        .visible_columns()
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(ids, ["name", "department", "hired"]);

    // Unknown ids are ignored and default to visible.
    grid.toggle_column_visibility("bogus");
    assert!(grid.is_column_visible("bogus"));
}

#[test]
fn test_keyboard_page_navigation() {
    let mut grid = Grid::new(schema(), big_staff(25));
    let no_focus = false;

    let next = KeyCombo::key(Key::Right).ctrl();
    assert_eq!(grid.handle_key(&next, &no_focus), EventResult::Consumed);
    assert_eq!(grid.page_index(), 2);

    assert_eq!(grid.handle_key(&next, &no_focus), EventResult::Consumed);
    assert_eq!(grid.page_index(), 3);

    // Already on the last page; the chord no longer moves anything.
    assert_eq!(grid.handle_key(&next, &no_focus), EventResult::Ignored);
    assert_eq!(grid.page_index(), 3);

    let home = KeyCombo::key(Key::Home).ctrl();
    assert_eq!(grid.handle_key(&home, &no_focus), EventResult::Consumed);
    assert_eq!(grid.page_index(), 1);

    let end = KeyCombo::key(Key::End).ctrl();
    assert_eq!(grid.handle_key(&end, &no_focus), EventResult::Consumed);
    assert_eq!(grid.page_index(), 3);

    let prev = KeyCombo::key(Key::Left).ctrl();
    assert_eq!(grid.handle_key(&prev, &no_focus), EventResult::Consumed);
    assert_eq!(grid.page_index(), 2);
}

#[test]
fn test_focus_guard_blocks_chords() {
    let mut grid = Grid::new(schema(), big_staff(25));
    let editing = true;

    let next = KeyCombo::key(Key::Right).ctrl();
    assert_eq!(grid.handle_key(&next, &editing), EventResult::Ignored);
    assert_eq!(grid.page_index(), 1);
}

#[test]
fn test_chord_requires_plain_ctrl() {
    let mut grid = Grid::new(schema(), big_staff(25));
    let no_focus = false;

    let bare = KeyCombo::key(Key::Right);
    assert_eq!(grid.handle_key(&bare, &no_focus), EventResult::Ignored);

    let with_alt = KeyCombo::key(Key::Right).ctrl().alt();
    assert_eq!(grid.handle_key(&with_alt, &no_focus), EventResult::Ignored);

    let other_key = KeyCombo::key(Key::Char('n')).ctrl();
    assert_eq!(grid.handle_key(&other_key, &no_focus), EventResult::Ignored);

    assert_eq!(grid.page_index(), 1);
}

#[test]
fn test_activate_row_invokes_callback() {
    let activated = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&activated);

    let grid = Grid::new(schema(), staff())
        .with_on_activate(move |e: &Employee| sink.borrow_mut().push(e.name.clone()));

    grid.activate_row(1);
    grid.activate_row(99); // out of range: ignored
    assert_eq!(*activated.borrow(), vec!["Grace".to_string()]);
}

#[test]
fn test_actions_are_opaque_passthrough() {
    let grid = Grid::new(schema(), staff())
        .with_actions(|e: &Employee| format!("edit:{}", e.name));

    let rows = grid.page_rows();
    assert_eq!(grid.actions_for(rows[0]), Some("edit:Ada".to_string()));

    let plain = Grid::new(schema(), staff());
    assert_eq!(plain.actions_for(rows[0]), None);
}

#[test]
fn test_null_salary_sorts_last() {
    let mut grid = Grid::new(schema(), staff());

    grid.toggle_sort("salary");
    let names: Vec<&str> = grid.page_rows().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Florence", "Blaise", "Ada", "Grace", "Tukey"]);

    grid.toggle_sort("salary");
    let names: Vec<&str> = grid.page_rows().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Grace", "Ada", "Blaise", "Florence", "Tukey"]);
}

#[test]
fn test_date_filter_on_hire_date() {
    let mut grid = Grid::new(schema(), staff());
    grid.set_column_filter("hired", "2021-04-12");

    let names: Vec<&str> = grid.page_rows().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Ada", "Blaise"]);
}

#[test]
fn test_grids_do_not_interfere() {
    let mut left = Grid::new(schema(), staff());
    let right = Grid::new(schema(), staff());

    assert_ne!(left.id(), right.id());

    left.set_column_filter("department", "Sales");
    left.toggle_sort("name");
    left.toggle_column_visibility("salary");

    assert_eq!(right.total_filtered(), 5);
    assert!(right.sort().is_none());
    assert!(right.is_column_visible("salary"));
}

#[test]
fn test_derived_counts_stay_consistent() {
    let mut grid = Grid::new(schema(), big_staff(25));

    grid.set_column_filter("department", "Engineering");
    assert_eq!(grid.total_filtered(), 13);
    assert_eq!(grid.total_pages(), 2);
    assert_eq!(grid.visible_count(), 10);

    grid.set_page_index(2);
    assert_eq!(grid.visible_count(), 3);

    grid.clear_all_filters();
    assert_eq!(grid.total_filtered(), 25);
    assert_eq!(grid.active_filter_count(), 0);
}
