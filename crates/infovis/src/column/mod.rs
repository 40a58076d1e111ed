//! Typed, indexable columns.
//!
//! A [`Column<T>`] stores one value per row together with an undefined flag
//! per row. The flag is independent of the stored value: an undefined cell
//! still occupies storage, and its payload is meaningless.
//!
//! Every mutation reports a [`ChangeDetail`] through the column's
//! [`ChangeNotifier`]. Wrap bulk updates in
//! [`disable_notify`](Column::disable_notify) /
//! [`enable_notify`](Column::enable_notify) (or [`batch`](Column::batch)) to
//! deliver a single coalesced event.
//!
//! # Example
//!
//! ```
//! use infovis::DoubleColumn;
//!
//! let column = DoubleColumn::new("weight");
//! column.set_value_at(1, "3.0").unwrap();
//! column.set_value_at(2, "1.0").unwrap();
//! assert!(!column.set_value_or_null_at(3, "n/a"));
//!
//! assert_eq!(column.size(), 4);
//! assert!(column.is_value_undefined(0));
//! assert_eq!(column.min_index(), Some(2));
//! assert_eq!(column.max_index(), Some(1));
//! ```

mod any;
mod mask;

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use infovis_core::logging::targets;
use infovis_core::{Cached, ChangeDetail, ChangeNotifier, ConnectionId, NotifyBatch};
use parking_lot::RwLock;

use crate::error::{Error, ParseError, Result};
use crate::format::ValueFormat;
use crate::metadata::{Metadata, MetadataValue};
use crate::value::ValueType;

pub use any::{
    downcast_column, expect_column, is_internal_name, AnyColumn, ColumnRef, INTERNAL_PREFIX,
};
use mask::UndefinedMask;

/// Column of `i32` values, also used for categorical data.
pub type IntColumn = Column<i32>;
/// Column of `i64` values.
pub type LongColumn = Column<i64>;
/// Column of `f32` values.
pub type FloatColumn = Column<f32>;
/// Column of `f64` values.
pub type DoubleColumn = Column<f64>;
/// Column of `bool` values.
pub type BooleanColumn = Column<bool>;
/// Column of `String` values.
pub type StringColumn = Column<String>;

#[derive(Default)]
struct Storage<T> {
    values: Vec<T>,
    undefined: UndefinedMask,
}

impl<T: ValueType> Storage<T> {
    /// Grow to `size` rows, new rows undefined. Returns `true` if it grew.
    fn grow_to(&mut self, size: usize) -> bool {
        let old = self.values.len();
        if size <= old {
            return false;
        }
        self.values.resize(size, T::default());
        self.undefined.set_range(old, size);
        true
    }

    fn is_defined(&self, row: usize) -> bool {
        row < self.values.len() && !self.undefined.get(row)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Extent {
    min: Option<usize>,
    max: Option<usize>,
}

/// A homogeneous column addressable by row index `0..size`.
pub struct Column<T: ValueType> {
    name: String,
    storage: RwLock<Storage<T>>,
    format: RwLock<Arc<dyn ValueFormat<T>>>,
    extent: Cached<Extent>,
    metadata: Metadata,
    notifier: ChangeNotifier,
}

impl<T: ValueType> Column<T> {
    /// Create an empty column with the type's default format.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage: RwLock::new(Storage::default()),
            format: RwLock::new(T::default_format()),
            extent: Cached::new(),
            metadata: Metadata::new(),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Create a column holding `values`, all defined.
    pub fn from_values<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let column = Self::new(name);
        column.storage.write().values = values.into_iter().collect();
        column
    }

    /// Use `format` to convert values to and from text.
    pub fn with_format(self, format: Arc<dyn ValueFormat<T>>) -> Self {
        *self.format.write() = format;
        self
    }

    /// Attach a metadata entry.
    pub fn with_metadata(self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key, value);
        self
    }

    /// Pre-size the column; every row starts undefined.
    pub fn with_size(self, size: usize) -> Self {
        self.storage.write().grow_to(size);
        self
    }

    /// The column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of addressable rows.
    pub fn size(&self) -> usize {
        self.storage.read().values.len()
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Raw stored value, defined or not.
    pub fn get(&self, index: usize) -> Result<T> {
        let storage = self.storage.read();
        storage
            .values
            .get(index)
            .cloned()
            .ok_or_else(|| Error::out_of_range(&self.name, index, storage.values.len()))
    }

    /// The value at `index`, or `None` if out of range or undefined.
    pub fn value(&self, index: usize) -> Option<T> {
        let storage = self.storage.read();
        storage
            .is_defined(index)
            .then(|| storage.values[index].clone())
    }

    /// Store `value` at an existing row, clearing its undefined flag.
    pub fn set(&self, index: usize, value: T) -> Result<()> {
        {
            let mut storage = self.storage.write();
            let size = storage.values.len();
            if index >= size {
                return Err(Error::out_of_range(&self.name, index, size));
            }
            storage.values[index] = value;
            storage.undefined.set(index, false);
        }
        tracing::trace!(target: targets::COLUMN, column = %self.name, index, "value set");
        self.changed(ChangeDetail::row(index));
        Ok(())
    }

    /// Store `value` at `index`, growing the column first if needed.
    ///
    /// Rows created by the growth are undefined. Fails with
    /// [`Error::IndexOutOfRange`] only for `usize::MAX`, which no column can
    /// grow to hold.
    pub fn set_extend(&self, index: usize, value: T) -> Result<()> {
        let end = self.end_of(index)?;
        let grew = {
            let mut storage = self.storage.write();
            let grew = storage.grow_to(end);
            storage.values[index] = value;
            storage.undefined.set(index, false);
            grew
        };
        tracing::trace!(target: targets::COLUMN, column = %self.name, index, grew, "value set");
        self.changed(if grew {
            ChangeDetail::SizeChanged
        } else {
            ChangeDetail::row(index)
        });
        Ok(())
    }

    /// Append a value, returning its row.
    pub fn push(&self, value: T) -> usize {
        let index = {
            let mut storage = self.storage.write();
            storage.values.push(value);
            let index = storage.values.len() - 1;
            storage.undefined.set(index, false);
            index
        };
        tracing::trace!(target: targets::COLUMN, column = %self.name, index, "value pushed");
        self.changed(ChangeDetail::SizeChanged);
        index
    }

    /// Parse `text` and append it, returning its row.
    pub fn add_value(&self, text: &str) -> Result<usize> {
        let value = self.parse(text)?;
        Ok(self.push(value))
    }

    /// Set every row to `value`, all defined.
    pub fn fill(&self, value: T) {
        {
            let mut storage = self.storage.write();
            storage.values.fill(value);
            storage.undefined.clear();
        }
        self.changed(ChangeDetail::All);
    }

    /// Grow to at least `size` rows. New rows are undefined.
    pub fn ensure_size(&self, size: usize) {
        let grew = self.storage.write().grow_to(size);
        if grew {
            tracing::debug!(target: targets::COLUMN, column = %self.name, size, "column grown");
            self.changed(ChangeDetail::SizeChanged);
        }
    }

    /// Remove every row.
    ///
    /// The attached format is left untouched, so categorical formats keep
    /// their category tables.
    pub fn clear(&self) {
        let had_rows = {
            let mut storage = self.storage.write();
            let had_rows = !storage.values.is_empty();
            storage.values.clear();
            storage.undefined.clear();
            had_rows
        };
        if had_rows {
            tracing::debug!(target: targets::COLUMN, column = %self.name, "column cleared");
            self.changed(ChangeDetail::SizeChanged);
        }
    }

    /// Whether the cell holds no value. Out-of-range cells are undefined.
    pub fn is_value_undefined(&self, index: usize) -> bool {
        !self.storage.read().is_defined(index)
    }

    /// Flag or unflag an existing cell as undefined.
    ///
    /// The stored payload is kept; the size never changes.
    pub fn set_value_undefined(&self, index: usize, undefined: bool) -> Result<()> {
        let flipped = {
            let mut storage = self.storage.write();
            let size = storage.values.len();
            if index >= size {
                return Err(Error::out_of_range(&self.name, index, size));
            }
            storage.undefined.set(index, undefined)
        };
        if flipped {
            self.changed(ChangeDetail::row(index));
        }
        Ok(())
    }

    /// Number of undefined rows.
    pub fn undefined_count(&self) -> usize {
        self.storage.read().undefined.count()
    }

    /// The attached format.
    pub fn value_format(&self) -> Arc<dyn ValueFormat<T>> {
        self.format.read().clone()
    }

    /// Replace the attached format. Every textual value may change.
    pub fn set_value_format(&self, format: Arc<dyn ValueFormat<T>>) {
        *self.format.write() = format;
        self.notifier.fire(ChangeDetail::All);
    }

    /// Parse text through the attached format.
    pub fn parse(&self, text: &str) -> std::result::Result<T, ParseError> {
        let format = self.value_format();
        format.parse(text)
    }

    /// Render a value through the attached format.
    pub fn format(&self, value: &T) -> String {
        self.value_format().format(value)
    }

    /// The cell rendered as text, or `None` if undefined.
    pub fn value_at(&self, index: usize) -> Option<String> {
        self.value(index).map(|value| self.format(&value))
    }

    /// Parse `text` and store it at `index`, growing the column if needed.
    ///
    /// On a parse failure the column is left unchanged.
    pub fn set_value_at(&self, index: usize, text: &str) -> Result<()> {
        let value = self.parse(text)?;
        self.set_extend(index, value)
    }

    /// Lenient [`set_value_at`](Self::set_value_at).
    ///
    /// A parse failure marks the cell undefined (growing the column if
    /// needed) and returns `false` instead of an error.
    pub fn set_value_or_null_at(&self, index: usize, text: &str) -> bool {
        match self.parse(text) {
            Ok(value) => self.set_extend(index, value).is_ok(),
            Err(err) => {
                tracing::warn!(
                    target: targets::COLUMN,
                    column = %self.name,
                    index,
                    error = %err,
                    "unparsable value stored as undefined"
                );
                if let Err(err) = self.mark_undefined(index) {
                    tracing::warn!(
                        target: targets::COLUMN,
                        column = %self.name,
                        error = %err,
                        "cell left unchanged"
                    );
                }
                false
            }
        }
    }

    /// Row of the smallest defined value; ties resolve to the lowest row.
    pub fn min_index(&self) -> Option<usize> {
        self.extent().min
    }

    /// Row of the largest defined value; ties resolve to the lowest row.
    pub fn max_index(&self) -> Option<usize> {
        self.extent().max
    }

    /// The smallest defined value.
    pub fn min(&self) -> Option<T> {
        self.min_index().and_then(|row| self.value(row))
    }

    /// The largest defined value.
    pub fn max(&self) -> Option<T> {
        self.max_index().and_then(|row| self.value(row))
    }

    /// Copy one cell from another column into `to_index`, growing if needed.
    ///
    /// See [`AnyColumn::copy_value_from`].
    pub fn copy_value_from(
        &self,
        to_index: usize,
        other: &dyn AnyColumn,
        from_index: usize,
    ) -> Result<()> {
        if other.is_value_undefined(from_index) {
            return self.mark_undefined(to_index);
        }
        if let Some(typed) = other.as_any().downcast_ref::<Column<T>>() {
            return match typed.value(from_index) {
                Some(value) => self.set_extend(to_index, value),
                None => self.mark_undefined(to_index),
            };
        }
        match other.value_at(from_index) {
            Some(text) => self.set_value_at(to_index, &text),
            None => self.mark_undefined(to_index),
        }
    }

    /// Lazy iterator over the rows holding a defined value.
    ///
    /// The iterator reads the column as it advances; call `rows()` again to
    /// restart.
    pub fn rows(&self) -> Rows<'_, T> {
        Rows {
            column: self,
            next: 0,
        }
    }

    /// Snapshot of every defined `(row, value)` pair.
    pub fn values(&self) -> std::vec::IntoIter<(usize, T)> {
        let storage = self.storage.read();
        let pairs: Vec<(usize, T)> = storage
            .values
            .iter()
            .enumerate()
            .filter(|(row, _)| !storage.undefined.get(*row))
            .map(|(row, value)| (row, value.clone()))
            .collect();
        pairs.into_iter()
    }

    /// Attached metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The column's change notifier.
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Register a change listener.
    pub fn add_change_listener<F>(&self, listener: F) -> ConnectionId
    where
        F: Fn(&ChangeDetail) + Send + Sync + 'static,
    {
        self.notifier.connect(listener)
    }

    /// Unregister a change listener.
    pub fn remove_change_listener(&self, id: ConnectionId) -> bool {
        self.notifier.disconnect(id)
    }

    /// Open (or nest) a notification batch.
    pub fn disable_notify(&self) {
        self.notifier.disable_notify();
    }

    /// Close one batch level; returns `true` if an event was delivered.
    pub fn enable_notify(&self) -> bool {
        self.notifier.enable_notify()
    }

    /// Open a batch closed when the guard drops.
    pub fn batch(&self) -> NotifyBatch<'_> {
        self.notifier.batch()
    }

    /// Row count needed to address `index`.
    fn end_of(&self, index: usize) -> Result<usize> {
        index
            .checked_add(1)
            .ok_or_else(|| Error::out_of_range(self.name.as_str(), index, self.size()))
    }

    fn mark_undefined(&self, index: usize) -> Result<()> {
        let end = self.end_of(index)?;
        let detail = {
            let mut storage = self.storage.write();
            if storage.grow_to(end) {
                ChangeDetail::SizeChanged
            } else if storage.undefined.set(index, true) {
                ChangeDetail::row(index)
            } else {
                ChangeDetail::None
            }
        };
        self.changed(detail);
        Ok(())
    }

    fn changed(&self, detail: ChangeDetail) {
        if detail.is_none() {
            return;
        }
        self.extent.invalidate();
        self.notifier.fire(detail);
    }

    fn extent(&self) -> Extent {
        self.extent.get_or_update(|| {
            let storage = self.storage.read();
            let values = &storage.values;
            let mut extent = Extent::default();
            for (row, value) in values.iter().enumerate() {
                if storage.undefined.get(row) {
                    continue;
                }
                match extent.min {
                    Some(min) if value.compare(&values[min]) != Ordering::Less => {}
                    _ => extent.min = Some(row),
                }
                match extent.max {
                    Some(max) if value.compare(&values[max]) != Ordering::Greater => {}
                    _ => extent.max = Some(row),
                }
            }
            extent
        })
    }
}

impl<T: ValueType> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("type", &T::TYPE_NAME)
            .field("size", &self.size())
            .field("undefined", &self.undefined_count())
            .finish()
    }
}

impl<T: ValueType> AnyColumn for Column<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn size(&self) -> usize {
        Column::size(self)
    }

    fn is_numeric(&self) -> bool {
        T::default().to_f64().is_some()
    }

    fn is_value_undefined(&self, index: usize) -> bool {
        Column::is_value_undefined(self, index)
    }

    fn set_value_undefined(&self, index: usize, undefined: bool) -> Result<()> {
        Column::set_value_undefined(self, index, undefined)
    }

    fn value_at(&self, index: usize) -> Option<String> {
        Column::value_at(self, index)
    }

    fn set_value_at(&self, index: usize, text: &str) -> Result<()> {
        Column::set_value_at(self, index, text)
    }

    fn set_value_or_null_at(&self, index: usize, text: &str) -> bool {
        Column::set_value_or_null_at(self, index, text)
    }

    fn f64_at(&self, index: usize) -> Option<f64> {
        self.value(index).and_then(|value| value.to_f64())
    }

    fn min_index(&self) -> Option<usize> {
        Column::min_index(self)
    }

    fn max_index(&self) -> Option<usize> {
        Column::max_index(self)
    }

    fn ensure_size(&self, size: usize) {
        Column::ensure_size(self, size);
    }

    fn clear(&self) {
        Column::clear(self);
    }

    fn copy_value_from(
        &self,
        to_index: usize,
        other: &dyn AnyColumn,
        from_index: usize,
    ) -> Result<()> {
        Column::copy_value_from(self, to_index, other, from_index)
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Iterator returned by [`Column::rows`].
pub struct Rows<'a, T: ValueType> {
    column: &'a Column<T>,
    next: usize,
}

impl<T: ValueType> Iterator for Rows<'_, T> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let storage = self.column.storage.read();
        while self.next < storage.values.len() {
            let row = self.next;
            self.next += 1;
            if !storage.undefined.get(row) {
                return Some(row);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::CategoricalFormat;
    use parking_lot::Mutex;

    fn recording<T: ValueType>(column: &Column<T>) -> Arc<Mutex<Vec<ChangeDetail>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        column.add_change_listener(move |detail| events_clone.lock().push(detail.clone()));
        events
    }

    #[test]
    fn test_set_out_of_range_fails() {
        let column = IntColumn::new("n").with_size(2);
        assert_eq!(column.set(5, 1), Err(Error::out_of_range("n", 5, 2)));
        assert!(column.set(1, 7).is_ok());
        assert_eq!(column.value(1), Some(7));
        assert_eq!(column.get(9), Err(Error::out_of_range("n", 9, 2)));
    }

    #[test]
    fn test_set_extend_fills_undefined() {
        let column = LongColumn::new("n");
        column.set_extend(3, 10).unwrap();
        assert_eq!(column.size(), 4);
        assert_eq!(column.undefined_count(), 3);
        assert!(column.is_value_undefined(2));
        assert_eq!(column.value(3), Some(10));
    }

    #[test]
    fn test_last_index_cannot_be_addressed() {
        let column = IntColumn::from_values("n", [1, 2]);
        let beyond = Err(Error::out_of_range("n", usize::MAX, 2));
        assert_eq!(column.set_extend(usize::MAX, 3), beyond);
        assert_eq!(column.set_value_at(usize::MAX, "3"), beyond);
        assert!(!column.set_value_or_null_at(usize::MAX, "three"));

        let ints = IntColumn::from_values("i", [4]);
        assert_eq!(column.copy_value_from(usize::MAX, &ints, 0), beyond);
        ints.set_value_undefined(0, true).unwrap();
        assert_eq!(column.copy_value_from(usize::MAX, &ints, 0), beyond);

        assert_eq!(column.size(), 2);
        assert_eq!(column.value(1), Some(2));
        assert_eq!(column.undefined_count(), 0);
    }

    #[test]
    fn test_undefined_is_independent_of_value() {
        let column = DoubleColumn::from_values("x", [1.0, 2.0]);
        column.set_value_undefined(1, true).unwrap();
        assert_eq!(column.size(), 2);
        assert!(column.is_value_undefined(1));
        assert_eq!(column.value(1), None);
        assert_eq!(column.get(1), Ok(2.0));

        column.set(1, 4.0).unwrap();
        assert!(!column.is_value_undefined(1));
        assert!(column.set_value_undefined(2, true).is_err());
    }

    #[test]
    fn test_strict_and_lenient_text_entry() {
        let column = IntColumn::new("n");
        let err = column.set_value_at(0, "seven").unwrap_err();
        assert!(err.is_parse());
        assert_eq!(column.size(), 0);

        assert!(column.set_value_or_null_at(0, "7"));
        assert!(!column.set_value_or_null_at(2, "eight"));
        assert_eq!(column.size(), 3);
        assert!(column.is_value_undefined(2));
        assert_eq!(column.value_at(0).as_deref(), Some("7"));
        assert_eq!(column.value_at(2), None);
    }

    #[test]
    fn test_min_max_skips_undefined() {
        let column = DoubleColumn::new("x");
        column.set_value_at(1, "3.0").unwrap();
        column.set_value_at(2, "1.0").unwrap();
        column.ensure_size(4);
        column.set_value_at(4, "5.0").unwrap();
        assert_eq!(column.min_index(), Some(2));
        assert_eq!(column.max_index(), Some(4));

        column.set_value_undefined(4, true).unwrap();
        assert_eq!(column.max_index(), Some(1));
        assert_eq!(column.max(), Some(3.0));
    }

    #[test]
    fn test_min_max_empty_and_ties() {
        let column = IntColumn::new("n").with_size(3);
        assert_eq!(column.min_index(), None);
        assert_eq!(column.max_index(), None);

        let column = IntColumn::from_values("n", [2, 1, 2, 1]);
        assert_eq!(column.min_index(), Some(1));
        assert_eq!(column.max_index(), Some(0));
    }

    #[test]
    fn test_notifications() {
        let column = IntColumn::new("n").with_size(2);
        let events = recording(&column);

        column.set(0, 1).unwrap();
        column.set_extend(4, 2).unwrap();
        column.set_value_undefined(0, true).unwrap();
        column.set_value_undefined(0, true).unwrap();

        let events = events.lock();
        assert_eq!(
            *events,
            vec![
                ChangeDetail::row(0),
                ChangeDetail::SizeChanged,
                ChangeDetail::row(0),
            ]
        );
    }

    #[test]
    fn test_batch_coalesces() {
        let column = IntColumn::new("n").with_size(10);
        let events = recording(&column);

        column.disable_notify();
        column.disable_notify();
        column.set(1, 1).unwrap();
        column.set(5, 5).unwrap();
        assert!(!column.enable_notify());
        column.set(7, 7).unwrap();
        assert!(column.enable_notify());

        assert_eq!(*events.lock(), vec![ChangeDetail::rows([1, 5, 7])]);
    }

    #[test]
    fn test_copy_value_from() {
        let source = IntColumn::from_values("a", [4, 8]);
        source.set_value_undefined(1, true).unwrap();

        let same = IntColumn::new("b");
        same.copy_value_from(0, &source, 0).unwrap();
        same.copy_value_from(1, &source, 1).unwrap();
        assert_eq!(same.value(0), Some(4));
        assert!(same.is_value_undefined(1));

        let text = StringColumn::new("c");
        text.copy_value_from(0, &source, 0).unwrap();
        assert_eq!(text.value(0).as_deref(), Some("4"));

        let words = StringColumn::from_values("w", ["four".to_string()]);
        let err = same.copy_value_from(0, &words, 0).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_rows_iterator_is_live() {
        let column = IntColumn::new("n");
        column.set_extend(0, 1).unwrap();
        column.set_extend(2, 3).unwrap();
        assert_eq!(column.rows().collect::<Vec<_>>(), vec![0, 2]);

        column.set(1, 2).unwrap();
        assert_eq!(column.rows().count(), 3);
        assert_eq!(column.values().collect::<Vec<_>>(), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_clear_keeps_categories() {
        let format = Arc::new(CategoricalFormat::new());
        let column = IntColumn::new("kind").with_format(format.clone());
        column.add_value("fruit").unwrap();
        column.add_value("vegetable").unwrap();
        assert_eq!(column.value(1), Some(1));
        assert_eq!(column.value_at(1).as_deref(), Some("vegetable"));

        column.clear();
        assert!(column.is_empty());
        assert_eq!(format.category_count(), 2);
        column.add_value("vegetable").unwrap();
        assert_eq!(column.value(0), Some(1));
    }

    #[test]
    fn test_fill_and_builders() {
        let column = BooleanColumn::new("flag")
            .with_size(3)
            .with_metadata("unit", "none");
        column.fill(true);
        assert_eq!(column.undefined_count(), 0);
        assert_eq!(column.value(2), Some(true));
        assert!(column.metadata().contains("unit"));
    }
}
