//! Type-erased column surface.

use std::any::Any;
use std::sync::Arc;

use infovis_core::ChangeNotifier;

use crate::error::{Error, Result};
use crate::metadata::Metadata;
use crate::value::ValueType;

use super::Column;

/// Names starting with this marker denote internal columns.
pub const INTERNAL_PREFIX: char = '#';

/// Whether `name` is the name of an internal column.
pub fn is_internal_name(name: &str) -> bool {
    name.starts_with(INTERNAL_PREFIX)
}

/// The object-safe view of a column shared by tables, trees and filters.
///
/// Everything here works without knowing the element type: values go in and
/// out as text through the column's format, and numeric columns expose an
/// `f64` view. Use [`downcast_column`] or [`AnyColumn::as_any`] to get back
/// to the typed [`Column<T>`].
pub trait AnyColumn: Send + Sync {
    /// The column name.
    fn name(&self) -> &str;

    /// Name of the element type.
    fn type_name(&self) -> &'static str;

    /// Number of addressable rows.
    fn size(&self) -> usize;

    /// Whether the column is internal (name starts with `#`).
    ///
    /// Internal columns are skipped by generic iteration and visual-role
    /// search.
    fn is_internal(&self) -> bool {
        is_internal_name(self.name())
    }

    /// Whether values have a numeric view.
    fn is_numeric(&self) -> bool;

    /// Whether the column derives its values from other structure.
    ///
    /// Tables leave computed columns out of row bookkeeping; they rebuild
    /// themselves instead.
    fn is_computed(&self) -> bool {
        false
    }

    /// Whether the owner of the column keeps its rows in step with the
    /// table. Tables skip managed columns when adding, removing and
    /// clearing rows. Computed columns are always managed.
    fn is_managed(&self) -> bool {
        self.is_computed()
    }

    /// Whether the cell holds no value. Out-of-range cells are undefined.
    fn is_value_undefined(&self, index: usize) -> bool;

    /// Flag or unflag a cell as undefined.
    fn set_value_undefined(&self, index: usize, undefined: bool) -> Result<()>;

    /// The cell rendered through the column's format, or `None` if undefined.
    fn value_at(&self, index: usize) -> Option<String>;

    /// Parse `text` and store it at `index`, growing the column if needed.
    fn set_value_at(&self, index: usize, text: &str) -> Result<()>;

    /// Like [`set_value_at`](AnyColumn::set_value_at) but marks the cell
    /// undefined instead of failing. Returns `false` if `text` was rejected.
    fn set_value_or_null_at(&self, index: usize, text: &str) -> bool;

    /// Numeric view of a defined cell.
    fn f64_at(&self, index: usize) -> Option<f64>;

    /// Row holding the smallest defined value.
    fn min_index(&self) -> Option<usize>;

    /// Row holding the largest defined value.
    fn max_index(&self) -> Option<usize>;

    /// Grow the column to at least `size` rows, new rows undefined.
    fn ensure_size(&self, size: usize);

    /// Remove every row.
    fn clear(&self);

    /// Copy one cell from another column.
    ///
    /// Columns of the same element type copy the raw value; otherwise the
    /// value goes through text and may fail with a parse error. Undefined
    /// source cells make the target cell undefined.
    fn copy_value_from(
        &self,
        to_index: usize,
        other: &dyn AnyColumn,
        from_index: usize,
    ) -> Result<()>;

    /// Attached metadata.
    fn metadata(&self) -> &Metadata;

    /// Change notifier of the column.
    fn notifier(&self) -> &ChangeNotifier;

    /// Upcast for downcasting by reference.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for downcasting a shared handle.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A shared, type-erased column handle.
pub type ColumnRef = Arc<dyn AnyColumn>;

/// Recover the typed column behind a handle.
pub fn downcast_column<T: ValueType>(column: &ColumnRef) -> Option<Arc<Column<T>>> {
    column.clone().into_any().downcast::<Column<T>>().ok()
}

/// Like [`downcast_column`] but reports the mismatch as an error.
pub fn expect_column<T: ValueType>(column: &ColumnRef) -> Result<Arc<Column<T>>> {
    downcast_column(column)
        .ok_or_else(|| Error::type_mismatch(column.name(), T::TYPE_NAME, column.type_name()))
}
