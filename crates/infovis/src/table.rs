//! Tables of named columns sharing one row index space.
//!
//! A [`Table`] owns an ordered list of columns with unique names and a
//! [`RowSet`] deciding which row indices are live. Removing a row frees its
//! index without compacting; [`Table::add_row`] hands freed indices out
//! again, lowest first.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use infovis::{IntColumn, StringColumn, Table};
//!
//! let table = Table::new();
//! let names = Arc::new(StringColumn::new("name"));
//! let ages = Arc::new(IntColumn::new("age"));
//! table.add_column(names.clone()).unwrap();
//! table.add_column(ages.clone()).unwrap();
//!
//! let row = table.add_row();
//! names.set(row, "Ada".to_string()).unwrap();
//! ages.set(row, 36).unwrap();
//!
//! table.remove_row(row).unwrap();
//! assert!(!table.is_row_valid(row));
//! assert_eq!(table.add_row(), row);
//! ```

use std::fmt;
use std::sync::Arc;

use infovis_core::logging::targets;
use infovis_core::Signal;
use parking_lot::RwLock;

use crate::column::{Column, ColumnRef};
use crate::config::TableConfig;
use crate::error::{Error, Result};
use crate::filter::ColumnFilter;
use crate::metadata::{Metadata, VisualRole};
use crate::row_set::RowSet;
use crate::value::ValueType;

/// Signals emitted by a [`Table`].
///
/// Column signals carry the column name, row signals the row index.
#[derive(Default)]
pub struct TableSignals {
    /// A column was registered.
    pub column_added: Signal<String>,
    /// A column was unregistered.
    pub column_removed: Signal<String>,
    /// A row became live.
    pub row_added: Signal<usize>,
    /// A row was freed.
    pub row_removed: Signal<usize>,
}

/// Handle pairing a row with its owner.
///
/// Returned by [`Table::add_item`] and consumed by [`Table::remove_item`].
/// The row index is meaningless once the item is removed.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Item {
    row: usize,
}

impl Item {
    /// The row this item stands for.
    pub fn row(&self) -> usize {
        self.row
    }
}

/// A dynamic table.
pub struct Table {
    name: String,
    columns: RwLock<Vec<ColumnRef>>,
    rows: RwLock<RowSet>,
    metadata: Metadata,
    signals: TableSignals,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// Create an empty table with the default configuration.
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Create an empty table.
    pub fn with_config(config: TableConfig) -> Self {
        Self {
            name: config.name,
            columns: RwLock::new(Vec::new()),
            rows: RwLock::new(RowSet::with_capacity(config.row_capacity, config.reuse_free_rows)),
            metadata: Metadata::new(),
            signals: TableSignals::default(),
        }
    }

    /// Create a table whose first columns are `columns`, names unique.
    pub(crate) fn with_columns(config: TableConfig, columns: Vec<ColumnRef>) -> Self {
        let table = Self::with_config(config);
        *table.columns.write() = columns;
        table
    }

    /// The table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table-level metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Signals emitted by this table.
    pub fn signals(&self) -> &TableSignals {
        &self.signals
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    /// Register a column.
    ///
    /// The column is grown to the table's row span. Fails with
    /// [`Error::DuplicateColumn`] if the name is taken.
    pub fn add_column(&self, column: ColumnRef) -> Result<()> {
        let name = column.name().to_string();
        {
            let mut columns = self.columns.write();
            if columns.iter().any(|existing| existing.name() == name) {
                return Err(Error::DuplicateColumn(name));
            }
            columns.push(column.clone());
        }
        if !column.is_managed() {
            column.ensure_size(self.row_span());
        }
        tracing::debug!(target: targets::TABLE, table = %self.name, column = %name, "column added");
        self.signals.column_added.emit(name);
        Ok(())
    }

    /// Unregister a column by name.
    pub fn remove_column(&self, name: &str) -> Result<ColumnRef> {
        let removed = {
            let mut columns = self.columns.write();
            let index = columns
                .iter()
                .position(|column| column.name() == name)
                .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;
            columns.remove(index)
        };
        tracing::debug!(
            target: targets::TABLE,
            table = %self.name,
            column = %name,
            "column removed"
        );
        self.signals.column_removed.emit(name.to_string());
        Ok(removed)
    }

    /// Look a column up by name. Never creates one.
    pub fn column(&self, name: &str) -> Option<ColumnRef> {
        self.columns
            .read()
            .iter()
            .find(|column| column.name() == name)
            .cloned()
    }

    /// The column at `index` in registration order.
    pub fn column_at(&self, index: usize) -> Option<ColumnRef> {
        self.columns.read().get(index).cloned()
    }

    /// Number of registered columns, internal ones included.
    pub fn column_count(&self) -> usize {
        self.columns.read().len()
    }

    /// Position of a column in registration order.
    pub fn index_of_column(&self, name: &str) -> Option<usize> {
        self.columns
            .read()
            .iter()
            .position(|column| column.name() == name)
    }

    /// Non-internal columns in registration order.
    pub fn columns(&self) -> Vec<ColumnRef> {
        self.columns
            .read()
            .iter()
            .filter(|column| !column.is_internal())
            .cloned()
            .collect()
    }

    /// Every column, internal ones included.
    pub fn all_columns(&self) -> Vec<ColumnRef> {
        self.columns.read().clone()
    }

    /// Columns the filter keeps, in registration order.
    pub fn filtered_columns(&self, filter: &dyn ColumnFilter) -> Vec<ColumnRef> {
        self.columns
            .read()
            .iter()
            .filter(|&column| !filter.filter(&**column))
            .cloned()
            .collect()
    }

    /// First non-internal column flagged with `role`.
    pub fn find_column_with_role(&self, role: VisualRole) -> Option<ColumnRef> {
        self.columns
            .read()
            .iter()
            .find(|column| !column.is_internal() && column.metadata().has_visual_role(role))
            .cloned()
    }

    /// Typed lookup.
    ///
    /// Fails with [`Error::ColumnNotFound`] or [`Error::TypeMismatch`].
    pub fn column_as<T: ValueType>(&self, name: &str) -> Result<Arc<Column<T>>> {
        let column = self
            .column(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;
        crate::column::expect_column(&column)
    }

    /// Typed get-or-create.
    ///
    /// Returns the existing column if it holds `T`, creates and registers a
    /// new one if the name is free, and fails with [`Error::TypeMismatch`]
    /// otherwise.
    pub fn find_or_create_column<T: ValueType>(&self, name: &str) -> Result<Arc<Column<T>>> {
        if let Some(column) = self.column(name) {
            return crate::column::expect_column(&column);
        }
        let column = Arc::new(Column::<T>::new(name));
        self.add_column(column.clone())?;
        Ok(column)
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Make a row live and return its index.
    ///
    /// A freed index is reused when available, lowest first; its cells start
    /// undefined. Otherwise the row is appended and every column grows.
    pub fn add_row(&self) -> usize {
        let (row, reused) = self.rows.write().allocate();
        for column in self.stored_columns() {
            if reused && row < column.size() {
                if let Err(err) = column.set_value_undefined(row, true) {
                    tracing::warn!(
                        target: targets::TABLE,
                        column = %column.name(),
                        row,
                        error = %err,
                        "stale cell kept"
                    );
                }
            } else {
                column.ensure_size(row + 1);
            }
        }
        tracing::debug!(target: targets::TABLE, table = %self.name, row, reused, "row added");
        self.signals.row_added.emit(row);
        row
    }

    /// Free a live row.
    ///
    /// Every cell of the row becomes undefined. Fails with
    /// [`Error::InvalidRow`] if the row is not live.
    pub fn remove_row(&self, row: usize) -> Result<()> {
        if !self.rows.write().free(row) {
            return Err(Error::InvalidRow(row));
        }
        for column in self.stored_columns() {
            if row < column.size() {
                column.set_value_undefined(row, true)?;
            }
        }
        tracing::debug!(target: targets::TABLE, table = %self.name, row, "row removed");
        self.signals.row_removed.emit(row);
        Ok(())
    }

    /// Whether `row` is live.
    pub fn is_row_valid(&self, row: usize) -> bool {
        self.rows.read().is_valid(row)
    }

    /// Number of live rows.
    pub fn row_count(&self) -> usize {
        self.rows.read().len()
    }

    /// One past the highest row index ever handed out.
    pub fn row_span(&self) -> usize {
        self.rows.read().high_water()
    }

    /// Live rows in ascending order.
    pub fn rows(&self) -> Vec<usize> {
        self.rows.read().iter().collect()
    }

    /// [`add_row`](Self::add_row) wrapped in an [`Item`].
    pub fn add_item(&self) -> Item {
        Item { row: self.add_row() }
    }

    /// [`remove_row`](Self::remove_row) for an [`Item`].
    pub fn remove_item(&self, item: Item) -> Result<()> {
        self.remove_row(item.row)
    }

    /// Forget every row and empty every stored column. Columns stay
    /// registered.
    pub fn clear(&self) {
        self.rows.write().clear();
        for column in self.stored_columns() {
            column.clear();
        }
        tracing::debug!(target: targets::TABLE, table = %self.name, "table cleared");
    }

    /// Columns taking part in row bookkeeping, snapshotted so listeners may
    /// call back into the table.
    fn stored_columns(&self) -> Vec<ColumnRef> {
        self.columns
            .read()
            .iter()
            .filter(|column| !column.is_managed())
            .cloned()
            .collect()
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<String> = self
            .columns
            .read()
            .iter()
            .map(|column| column.name().to_string())
            .collect();
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("columns", &columns)
            .field("rows", &self.row_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{DoubleColumn, IntColumn, StringColumn};
    use crate::filter::InternalColumnFilter;
    use parking_lot::Mutex;

    fn setup() -> (Table, Arc<IntColumn>, Arc<StringColumn>) {
        let table = Table::new();
        let ids = Arc::new(IntColumn::new("id"));
        let labels = Arc::new(StringColumn::new("label"));
        table.add_column(ids.clone()).unwrap();
        table.add_column(labels.clone()).unwrap();
        (table, ids, labels)
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let (table, _, _) = setup();
        let err = table.add_column(Arc::new(DoubleColumn::new("id"))).unwrap_err();
        assert_eq!(err, Error::DuplicateColumn("id".to_string()));
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_column_lookup() {
        let (table, _, _) = setup();
        assert_eq!(table.index_of_column("label"), Some(1));
        assert_eq!(table.column_at(0).map(|c| c.name().to_string()), Some("id".to_string()));
        assert!(table.column("missing").is_none());
        assert!(table.column_as::<i32>("id").is_ok());
        assert_eq!(
            table.column_as::<f64>("id").unwrap_err(),
            Error::type_mismatch("id", "f64", "i32")
        );
        assert_eq!(
            table.column_as::<f64>("nope").unwrap_err(),
            Error::ColumnNotFound("nope".to_string())
        );
    }

    #[test]
    fn test_find_or_create_column() {
        let (table, _, _) = setup();
        table.add_row();
        let weights = table.find_or_create_column::<f64>("weight").unwrap();
        assert_eq!(weights.size(), 1);
        assert!(weights.is_value_undefined(0));

        let again = table.find_or_create_column::<f64>("weight").unwrap();
        assert!(Arc::ptr_eq(&weights, &again));
        assert!(table.find_or_create_column::<bool>("weight").is_err());
    }

    #[test]
    fn test_add_row_grows_columns() {
        let (table, ids, labels) = setup();
        let row = table.add_row();
        assert_eq!(row, 0);
        assert_eq!(ids.size(), 1);
        assert_eq!(labels.size(), 1);
        assert!(ids.is_value_undefined(0));
    }

    #[test]
    fn test_remove_row_frees_and_reuses() {
        let (table, ids, _) = setup();
        for i in 0..4 {
            let row = table.add_row();
            ids.set(row, i).unwrap();
        }
        table.remove_row(2).unwrap();
        assert!(!table.is_row_valid(2));
        assert!(ids.is_value_undefined(2));
        assert_eq!(table.remove_row(2), Err(Error::InvalidRow(2)));
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows(), vec![0, 1, 3]);

        assert_eq!(table.add_row(), 2);
        assert!(ids.is_value_undefined(2));
        assert_eq!(ids.size(), 4);
        assert_eq!(table.add_row(), 4);
    }

    #[test]
    fn test_append_only_config() {
        let table = Table::with_config(TableConfig::new().with_reuse_free_rows(false));
        table.add_row();
        table.remove_row(0).unwrap();
        assert_eq!(table.add_row(), 1);
    }

    #[test]
    fn test_items() {
        let (table, _, _) = setup();
        let item = table.add_item();
        let row = item.row();
        assert!(table.is_row_valid(row));
        table.remove_item(item).unwrap();
        assert!(!table.is_row_valid(row));
    }

    #[test]
    fn test_signals() {
        let (table, _, _) = setup();
        let log = Arc::new(Mutex::new(Vec::new()));

        let log_clone = log.clone();
        table
            .signals()
            .row_added
            .connect(move |row| log_clone.lock().push(format!("+{row}")));
        let log_clone = log.clone();
        table
            .signals()
            .row_removed
            .connect(move |row| log_clone.lock().push(format!("-{row}")));
        let log_clone = log.clone();
        table
            .signals()
            .column_removed
            .connect(move |name| log_clone.lock().push(format!("~{name}")));

        table.add_row();
        table.remove_row(0).unwrap();
        table.remove_column("label").unwrap();
        assert_eq!(*log.lock(), vec!["+0", "-0", "~label"]);
        assert!(table.remove_column("label").is_err());
    }

    #[test]
    fn test_columns_and_roles() {
        let (table, _, labels) = setup();
        table.add_column(Arc::new(IntColumn::new("#hidden"))).unwrap();
        labels.metadata().set_visual_role(VisualRole::Label, true);

        let names: Vec<String> = table.columns().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["id", "label"]);
        assert_eq!(table.all_columns().len(), 3);
        assert_eq!(table.filtered_columns(&InternalColumnFilter).len(), 2);
        assert_eq!(
            table.find_column_with_role(VisualRole::Label).map(|c| c.name().to_string()),
            Some("label".to_string())
        );
        assert!(table.find_column_with_role(VisualRole::Color).is_none());
    }

    #[test]
    fn test_clear() {
        let (table, ids, _) = setup();
        table.add_row();
        table.add_row();
        table.clear();
        assert_eq!(table.row_count(), 0);
        assert_eq!(ids.size(), 0);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.add_row(), 0);
    }
}
