//! Columns derived from a tree's structure.
//!
//! A [`TreeProperty<T>`] is a column whose values are a function of a
//! [`Tree`] (and possibly some of its columns). It listens to the tree's
//! structure notifier and to its source columns; any change marks it
//! invalid. The next read recomputes every value from scratch before
//! answering. Recomputation never runs eagerly.
//!
//! Properties are registered in the tree under a reserved internal name, so
//! the `find` accessors of [`DepthColumn`], [`DegreeColumn`] and
//! [`AggregationColumn`] return the same instance on every call.
//!
//! The property holds only a weak reference to its tree. Once the tree is
//! dropped, reads fail with [`Error::SourceDropped`]; after
//! [`TreeProperty::dispose`] they fail with [`Error::Disposed`].

mod aggregation;
mod degree;
mod depth;

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use infovis_core::logging::{span_names, targets};
use infovis_core::{ChangeDetail, ChangeNotifier, ConnectionId, PerfSpan};
use parking_lot::Mutex;

use crate::column::{AnyColumn, Column, ColumnRef};
use crate::error::{Error, Result};
use crate::metadata::Metadata;
use crate::tree::Tree;
use crate::value::ValueType;

pub use aggregation::{Aggregation, AggregationColumn};
pub use degree::DegreeColumn;
pub use depth::DepthColumn;

/// Strategy filling a [`TreeProperty`].
pub trait TreeComputation<T: ValueType>: Send + Sync + 'static {
    /// Write the value of every live node into `column`.
    ///
    /// `column` is empty on entry and notification is suspended.
    fn compute(&self, tree: &Tree, column: &Column<T>) -> Result<()>;

    /// Columns whose value changes invalidate the property.
    fn sources(&self) -> Vec<ColumnRef> {
        Vec::new()
    }
}

struct Links {
    structure: Option<ConnectionId>,
    sources: Vec<(ColumnRef, ConnectionId)>,
}

/// A lazily recomputed column derived from a tree.
pub struct TreeProperty<T: ValueType> {
    column: Column<T>,
    tree: Weak<Tree>,
    computation: Box<dyn TreeComputation<T>>,
    valid: AtomicBool,
    disposed: AtomicBool,
    links: Mutex<Links>,
    /// Revisions of the structure and source notifiers at the last
    /// recompute.
    seen: Mutex<Vec<u64>>,
}

impl<T: ValueType> TreeProperty<T> {
    /// Return the property registered under `name`, or create, register and
    /// return a new one computed by `make()`.
    ///
    /// Fails with [`Error::TypeMismatch`] if `name` holds another kind of
    /// column.
    pub fn find_or_attach<C, F>(tree: &Arc<Tree>, name: &str, make: F) -> Result<Arc<Self>>
    where
        C: TreeComputation<T>,
        F: FnOnce() -> C,
    {
        if let Some(existing) = tree.column(name) {
            let found = existing.type_name();
            return existing
                .into_any()
                .downcast::<Self>()
                .map_err(|_| Error::type_mismatch(name, T::TYPE_NAME, found));
        }
        Self::attach(tree, name, Box::new(make()))
    }

    /// Create a property and register it in `tree` under `name`.
    pub fn attach(
        tree: &Arc<Tree>,
        name: &str,
        computation: Box<dyn TreeComputation<T>>,
    ) -> Result<Arc<Self>> {
        let sources = computation.sources();
        let property = Arc::new(Self {
            column: Column::new(name),
            tree: Arc::downgrade(tree),
            computation,
            valid: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
            links: Mutex::new(Links {
                structure: None,
                sources: Vec::new(),
            }),
            seen: Mutex::new(Vec::new()),
        });
        tree.add_column(property.clone())?;

        let weak = Arc::downgrade(&property);
        let structure = tree.add_structure_listener(move |_| {
            if let Some(property) = weak.upgrade() {
                property.invalidate();
            }
        });
        let sources = sources
            .into_iter()
            .map(|source| {
                let weak = Arc::downgrade(&property);
                let id = source.notifier().connect(move |_| {
                    if let Some(property) = weak.upgrade() {
                        property.invalidate();
                    }
                });
                (source, id)
            })
            .collect();
        *property.links.lock() = Links {
            structure: Some(structure),
            sources,
        };

        tracing::debug!(target: targets::COMPUTED, column = %name, "computed column attached");
        Ok(property)
    }

    /// The column name.
    pub fn name(&self) -> &str {
        self.column.name()
    }

    /// Whether the stored values are up to date.
    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Whether [`dispose`](Self::dispose) was called.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Mark the values stale. Listeners of the column are told everything
    /// may have changed.
    pub fn invalidate(&self) {
        if self.valid.swap(false, Ordering::AcqRel) {
            tracing::trace!(target: targets::COMPUTED, column = %self.name(), "invalidated");
            self.column.notifier().fire(ChangeDetail::All);
        }
    }

    /// Value at a live node, recomputing first if needed.
    ///
    /// Fails with [`Error::InvalidRow`] if `node` is not live and with
    /// [`Error::UndefinedValue`] if the computation left its cell empty.
    pub fn get(&self, node: usize) -> Result<T> {
        let tree = self.fresh()?;
        if !tree.contains(node) {
            return Err(Error::InvalidRow(node));
        }
        self.column.value(node).ok_or_else(|| Error::UndefinedValue {
            column: self.name().to_string(),
            row: node,
        })
    }

    /// Every `(node, value)` pair, recomputing first if needed.
    pub fn values(&self) -> Result<Vec<(usize, T)>> {
        self.ensure_valid()?;
        Ok(self.column.values().collect())
    }

    /// Node holding the smallest value.
    pub fn min_index(&self) -> Result<Option<usize>> {
        self.ensure_valid()?;
        Ok(self.column.min_index())
    }

    /// Node holding the largest value.
    pub fn max_index(&self) -> Result<Option<usize>> {
        self.ensure_valid()?;
        Ok(self.column.max_index())
    }

    /// Recompute now if invalidated, or if the tree or a source changed
    /// inside a batch that has not closed yet.
    pub fn ensure_valid(&self) -> Result<()> {
        self.fresh().map(drop)
    }

    fn fresh(&self) -> Result<Arc<Tree>> {
        if self.is_disposed() {
            return Err(Error::Disposed(self.name().to_string()));
        }
        let tree = self
            .tree
            .upgrade()
            .ok_or_else(|| Error::SourceDropped(self.name().to_string()))?;
        let revisions = self.revisions(&tree);
        if !self.is_valid() || *self.seen.lock() != revisions {
            self.recompute(&tree, revisions)?;
        }
        Ok(tree)
    }

    /// Detach from the tree and its sources and release the storage.
    ///
    /// The property is unregistered from the tree, so a later `find` creates
    /// a fresh instance. Every further read fails with [`Error::Disposed`].
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let links = std::mem::replace(
            &mut *self.links.lock(),
            Links {
                structure: None,
                sources: Vec::new(),
            },
        );
        for (source, id) in links.sources {
            source.notifier().disconnect(id);
        }
        if let Some(tree) = self.tree.upgrade() {
            if let Some(id) = links.structure {
                tree.remove_structure_listener(id);
            }
            if let Err(err) = tree.table().remove_column(self.name()) {
                tracing::debug!(
                    target: targets::COMPUTED,
                    column = %self.name(),
                    error = %err,
                    "already unregistered"
                );
            }
        }
        self.valid.store(false, Ordering::Release);
        self.column.clear();
        tracing::debug!(
            target: targets::COMPUTED,
            column = %self.name(),
            "computed column disposed"
        );
    }

    /// Revisions of everything the values depend on. Changes held back by an
    /// open batch show up here before any listener hears of them.
    fn revisions(&self, tree: &Tree) -> Vec<u64> {
        let links = self.links.lock();
        std::iter::once(tree.structure_notifier().revision())
            .chain(links.sources.iter().map(|(source, _)| source.notifier().revision()))
            .collect()
    }

    #[tracing::instrument(
        skip_all,
        target = "infovis::computed",
        level = "debug",
        fields(column = %self.name())
    )]
    fn recompute(&self, tree: &Tree, revisions: Vec<u64>) -> Result<()> {
        let _span = PerfSpan::new(span_names::RECOMPUTE);
        let _quiet = Quiet::new(self.column.notifier());
        self.column.clear();
        self.computation.compute(tree, &self.column)?;
        *self.seen.lock() = revisions;
        self.valid.store(true, Ordering::Release);
        tracing::debug!(
            target: targets::COMPUTED,
            column = %self.name(),
            nodes = tree.node_count(),
            "recomputed"
        );
        Ok(())
    }
}

/// Suspends and silences a notifier while a property rewrites itself.
struct Quiet<'a> {
    notifier: &'a ChangeNotifier,
}

impl<'a> Quiet<'a> {
    fn new(notifier: &'a ChangeNotifier) -> Self {
        notifier.signal().set_blocked(true);
        notifier.disable_notify();
        Self { notifier }
    }
}

impl Drop for Quiet<'_> {
    fn drop(&mut self) {
        self.notifier.enable_notify();
        self.notifier.signal().set_blocked(false);
    }
}

impl<T: ValueType> fmt::Debug for TreeProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeProperty")
            .field("name", &self.name())
            .field("type", &T::TYPE_NAME)
            .field("valid", &self.is_valid())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl<T: ValueType> AnyColumn for TreeProperty<T> {
    fn name(&self) -> &str {
        self.column.name()
    }

    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn size(&self) -> usize {
        match self.ensure_valid() {
            Ok(()) => self.column.size(),
            Err(_) => 0,
        }
    }

    fn is_numeric(&self) -> bool {
        AnyColumn::is_numeric(&self.column)
    }

    fn is_computed(&self) -> bool {
        true
    }

    fn is_value_undefined(&self, index: usize) -> bool {
        self.ensure_valid().is_err() || self.column.is_value_undefined(index)
    }

    fn set_value_undefined(&self, _index: usize, _undefined: bool) -> Result<()> {
        Err(Error::ReadOnly(self.name().to_string()))
    }

    fn value_at(&self, index: usize) -> Option<String> {
        self.ensure_valid().ok()?;
        self.column.value_at(index)
    }

    fn set_value_at(&self, _index: usize, _text: &str) -> Result<()> {
        Err(Error::ReadOnly(self.name().to_string()))
    }

    fn set_value_or_null_at(&self, _index: usize, _text: &str) -> bool {
        false
    }

    fn f64_at(&self, index: usize) -> Option<f64> {
        self.ensure_valid().ok()?;
        AnyColumn::f64_at(&self.column, index)
    }

    fn min_index(&self) -> Option<usize> {
        TreeProperty::min_index(self).ok().flatten()
    }

    fn max_index(&self) -> Option<usize> {
        TreeProperty::max_index(self).ok().flatten()
    }

    fn ensure_size(&self, _size: usize) {}

    fn clear(&self) {
        self.invalidate();
    }

    fn copy_value_from(
        &self,
        _to_index: usize,
        _other: &dyn AnyColumn,
        _from_index: usize,
    ) -> Result<()> {
        Err(Error::ReadOnly(self.name().to_string()))
    }

    fn metadata(&self) -> &Metadata {
        self.column.metadata()
    }

    fn notifier(&self) -> &ChangeNotifier {
        self.column.notifier()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
