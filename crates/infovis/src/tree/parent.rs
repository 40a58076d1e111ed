//! The `#parent` column.
//!
//! Parent links are stored as an [`IntColumn`] holding [`NIL`] for the root,
//! which always occupies row 0.
//! The tree writes them through the crate-private methods below; the table
//! only sees the read-only [`AnyColumn`] face, so links can never change
//! behind the tree's child lists.

use std::any::Any;
use std::sync::Arc;

use infovis_core::logging::targets;
use infovis_core::{ChangeNotifier, NotifyBatch};

use crate::column::{AnyColumn, IntColumn};
use crate::error::{Error, Result};
use crate::metadata::Metadata;

use super::{NIL, PARENT_COLUMN};

pub(crate) struct ParentColumn {
    links: IntColumn,
}

impl ParentColumn {
    pub(crate) fn new() -> Self {
        Self {
            links: IntColumn::from_values(PARENT_COLUMN, [NIL]),
        }
    }

    /// Parent stored for `node`; `None` for the root and unset rows.
    pub(crate) fn link(&self, node: usize) -> Option<usize> {
        self.links
            .value(node)
            .and_then(|parent| usize::try_from(parent).ok())
    }

    pub(crate) fn set_link(&self, node: usize, parent: Option<usize>) -> Result<()> {
        let encoded = parent.map_or(NIL, |parent| i32::try_from(parent).unwrap_or(NIL));
        self.links.set_extend(node, encoded)
    }

    /// Forget the link of a freed node.
    pub(crate) fn unlink(&self, node: usize) {
        if node < self.links.size() {
            if let Err(err) = self.links.set_value_undefined(node, true) {
                tracing::warn!(target: targets::TREE, node, error = %err, "stale parent link kept");
            }
        }
    }

    pub(crate) fn batch(&self) -> NotifyBatch<'_> {
        self.links.batch()
    }

    /// Drop every link but the root's.
    pub(crate) fn reset(&self) {
        let _batch = self.links.batch();
        self.links.clear();
        self.links.push(NIL);
    }

    fn read_only(&self) -> Error {
        Error::ReadOnly(PARENT_COLUMN.to_string())
    }
}

impl AnyColumn for ParentColumn {
    fn name(&self) -> &str {
        self.links.name()
    }

    fn type_name(&self) -> &'static str {
        AnyColumn::type_name(&self.links)
    }

    fn size(&self) -> usize {
        self.links.size()
    }

    fn is_numeric(&self) -> bool {
        true
    }

    fn is_managed(&self) -> bool {
        true
    }

    fn is_value_undefined(&self, index: usize) -> bool {
        self.links.is_value_undefined(index)
    }

    fn set_value_undefined(&self, _index: usize, _undefined: bool) -> Result<()> {
        Err(self.read_only())
    }

    fn value_at(&self, index: usize) -> Option<String> {
        self.links.value_at(index)
    }

    fn set_value_at(&self, _index: usize, _text: &str) -> Result<()> {
        Err(self.read_only())
    }

    fn set_value_or_null_at(&self, _index: usize, _text: &str) -> bool {
        false
    }

    fn f64_at(&self, index: usize) -> Option<f64> {
        AnyColumn::f64_at(&self.links, index)
    }

    fn min_index(&self) -> Option<usize> {
        self.links.min_index()
    }

    fn max_index(&self) -> Option<usize> {
        self.links.max_index()
    }

    fn ensure_size(&self, _size: usize) {}

    fn clear(&self) {}

    fn copy_value_from(
        &self,
        _to_index: usize,
        _other: &dyn AnyColumn,
        _from_index: usize,
    ) -> Result<()> {
        Err(self.read_only())
    }

    fn metadata(&self) -> &Metadata {
        self.links.metadata()
    }

    fn notifier(&self) -> &ChangeNotifier {
        self.links.notifier()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
