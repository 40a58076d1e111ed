//! Tests for columns, tables and change coalescing.

use std::sync::Arc;

use parking_lot::Mutex;

use infovis::{
    AnyColumn, ChangeDetail, ColumnRef, DoubleColumn, Error, IntColumn, NumericColumnFilter,
    StringColumn, Table, TableConfig,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn record(column: &dyn AnyColumn) -> Arc<Mutex<Vec<ChangeDetail>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    column.notifier().connect(move |detail: &ChangeDetail| {
        events_clone.lock().push(detail.clone());
    });
    events
}

#[test]
fn test_min_max_skip_undefined() {
    init_logging();
    let column = DoubleColumn::new("x");
    for (row, text) in ["", "3.0", "1.0", "", "5.0"].into_iter().enumerate() {
        if text.is_empty() {
            column.ensure_size(row + 1);
        } else {
            column.set_value_at(row, text).unwrap();
        }
    }

    assert_eq!(column.size(), 5);
    assert_eq!(column.undefined_count(), 2);
    assert_eq!(column.min_index(), Some(2));
    assert_eq!(column.max_index(), Some(4));

    column.set_value_undefined(4, true).unwrap();
    assert_eq!(column.max_index(), Some(1));
    column.set(0, -2.0).unwrap();
    assert_eq!(column.min(), Some(-2.0));
}

#[test]
fn test_batched_events_cover_every_change() {
    init_logging();
    let column = IntColumn::from_values("n", [1, 2, 3, 4]);
    let events = record(&column);

    {
        let _batch = column.batch();
        column.set(1, 20).unwrap();
        column.set(3, 40).unwrap();
        column.set_value_undefined(0, true).unwrap();
    }
    {
        let _batch = column.batch();
        column.set(2, 30).unwrap();
        column.push(5);
    }

    let events = events.lock();
    assert_eq!(events.len(), 2);
    for row in [0, 1, 3] {
        assert!(events[0].covers(row), "first batch misses row {row}");
    }
    assert!(!events[0].covers(2));
    assert_eq!(events[1], ChangeDetail::All);
}

#[test]
fn test_nested_batches_fire_once() {
    let column = IntColumn::from_values("n", [0; 3]);
    let events = record(&column);

    column.disable_notify();
    column.disable_notify();
    column.set(0, 1).unwrap();
    assert!(!column.enable_notify());
    column.set(1, 1).unwrap();
    assert!(column.enable_notify());

    assert_eq!(events.lock().as_slice(), &[ChangeDetail::rows([0, 1])]);
}

#[test]
fn test_unparsable_text_marks_undefined() {
    init_logging();
    let column = IntColumn::from_values("n", [7]);
    assert!(!column.set_value_or_null_at(0, "seven"));
    assert!(column.is_value_undefined(0));
    assert_eq!(column.value_at(0), None);
    assert!(matches!(column.set_value_at(0, "seven"), Err(error) if error.is_parse()));
    assert!(column.set_value_or_null_at(0, "8"));
    assert_eq!(column.value(0), Some(8));
}

#[test]
fn test_table_reuses_freed_rows() {
    init_logging();
    let table = Table::new();
    let name: Arc<StringColumn> = table.find_or_create_column("name").unwrap();
    let rows: Vec<usize> = (0..3).map(|_| table.add_row()).collect();
    for &row in &rows {
        name.set(row, format!("row {row}")).unwrap();
    }

    table.remove_row(2).unwrap();
    table.remove_row(0).unwrap();
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.remove_row(0), Err(Error::InvalidRow(0)));

    assert_eq!(table.add_row(), 0);
    assert!(name.is_value_undefined(0));
    assert_eq!(table.add_row(), 2);
    assert_eq!(table.add_row(), 3);
    assert_eq!(name.size(), 4);
    assert_eq!(name.value(1), Some("row 1".to_string()));
}

#[test]
fn test_table_without_reuse_appends() {
    let table = Table::with_config(TableConfig::new().with_reuse_free_rows(false));
    table.add_row();
    table.add_row();
    table.remove_row(0).unwrap();
    assert_eq!(table.add_row(), 2);
    assert_eq!(table.row_count(), 2);
}

#[test]
fn test_copy_between_column_types() {
    let ints = IntColumn::from_values("i", [4, 9]);
    let doubles = DoubleColumn::new("d");
    doubles.copy_value_from(0, &ints, 1).unwrap();
    assert_eq!(doubles.value(0), Some(9.0));

    ints.set_value_undefined(0, true).unwrap();
    doubles.copy_value_from(1, &ints, 0).unwrap();
    assert_eq!(doubles.size(), 2);
    assert!(doubles.is_value_undefined(1));
}

#[test]
fn test_table_columns_grow_with_rows() {
    let table = Table::new();
    table.add_row();
    table.add_row();
    let weight: ColumnRef = Arc::new(DoubleColumn::new("weight"));
    table.add_column(weight.clone()).unwrap();
    table.add_column(Arc::new(StringColumn::new("label"))).unwrap();
    assert_eq!(weight.size(), 2);
    assert!(weight.is_value_undefined(1));

    let numeric = table.filtered_columns(&NumericColumnFilter);
    assert_eq!(numeric.len(), 1);
    assert_eq!(numeric[0].name(), "weight");
    assert!(matches!(
        table.add_column(Arc::new(IntColumn::new("weight"))),
        Err(Error::DuplicateColumn(_))
    ));
}
