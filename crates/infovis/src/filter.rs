//! Column visibility predicates.
//!
//! A [`ColumnFilter`] decides which columns a consumer should skip: `true`
//! means "hide this column". Filters are pure predicates, safe to call
//! repeatedly and in any order. The only combinator is the
//! collection-based [`AnyFilter`].

use std::collections::HashSet;

use crate::column::AnyColumn;

/// Predicate selecting columns to hide.
pub trait ColumnFilter: Send + Sync {
    /// Returns `true` if `column` should be hidden.
    fn filter(&self, column: &dyn AnyColumn) -> bool;
}

impl<F> ColumnFilter for F
where
    F: Fn(&dyn AnyColumn) -> bool + Send + Sync,
{
    fn filter(&self, column: &dyn AnyColumn) -> bool {
        self(column)
    }
}

/// Hides every column.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterAll;

impl ColumnFilter for FilterAll {
    fn filter(&self, _column: &dyn AnyColumn) -> bool {
        true
    }
}

/// Hides nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterNone;

impl ColumnFilter for FilterNone {
    fn filter(&self, _column: &dyn AnyColumn) -> bool {
        false
    }
}

/// Hides internal columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalColumnFilter;

impl ColumnFilter for InternalColumnFilter {
    fn filter(&self, column: &dyn AnyColumn) -> bool {
        column.is_internal()
    }
}

/// Hides columns readers and writers must not persist: internal columns and
/// those flagged transient in their metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransientColumnFilter;

impl ColumnFilter for TransientColumnFilter {
    fn filter(&self, column: &dyn AnyColumn) -> bool {
        column.is_internal() || column.metadata().is_transient()
    }
}

/// Hides columns without a numeric view.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericColumnFilter;

impl ColumnFilter for NumericColumnFilter {
    fn filter(&self, column: &dyn AnyColumn) -> bool {
        !column.is_numeric()
    }
}

/// Hides columns whose name is listed.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    names: HashSet<String>,
}

impl NameFilter {
    /// Hide the given names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl ColumnFilter for NameFilter {
    fn filter(&self, column: &dyn AnyColumn) -> bool {
        self.names.contains(column.name())
    }
}

/// Hides a column when any member filter hides it.
///
/// An empty collection hides nothing.
#[derive(Default)]
pub struct AnyFilter {
    filters: Vec<Box<dyn ColumnFilter>>,
}

impl AnyFilter {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member filter.
    pub fn with(mut self, filter: impl ColumnFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Add a member filter in place.
    pub fn push(&mut self, filter: Box<dyn ColumnFilter>) {
        self.filters.push(filter);
    }

    /// Number of member filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether there are no member filters.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl ColumnFilter for AnyFilter {
    fn filter(&self, column: &dyn AnyColumn) -> bool {
        self.filters.iter().any(|filter| filter.filter(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{DoubleColumn, IntColumn, StringColumn};

    #[test]
    fn test_constant_filters() {
        let column = IntColumn::new("n");
        assert!(FilterAll.filter(&column));
        assert!(!FilterNone.filter(&column));
    }

    #[test]
    fn test_internal_and_transient() {
        let internal = IntColumn::new("#parent");
        let transient = DoubleColumn::new("scratch");
        transient.metadata().set_transient(true);
        let plain = StringColumn::new("label");

        assert!(InternalColumnFilter.filter(&internal));
        assert!(!InternalColumnFilter.filter(&transient));
        assert!(TransientColumnFilter.filter(&internal));
        assert!(TransientColumnFilter.filter(&transient));
        assert!(!TransientColumnFilter.filter(&plain));
    }

    #[test]
    fn test_numeric_and_names() {
        assert!(NumericColumnFilter.filter(&StringColumn::new("s")));
        assert!(!NumericColumnFilter.filter(&IntColumn::new("i")));

        let names = NameFilter::new(["a", "b"]);
        assert!(names.filter(&IntColumn::new("a")));
        assert!(!names.filter(&IntColumn::new("c")));
    }

    #[test]
    fn test_any_filter() {
        let filter = AnyFilter::new()
            .with(InternalColumnFilter)
            .with(|column: &dyn AnyColumn| column.name().starts_with("tmp"));
        assert_eq!(filter.len(), 2);
        assert!(filter.filter(&IntColumn::new("#depth")));
        assert!(filter.filter(&IntColumn::new("tmp1")));
        assert!(!filter.filter(&IntColumn::new("size")));
        assert!(!AnyFilter::new().filter(&IntColumn::new("x")));
    }
}
