//! Trees over a table's row index space.
//!
//! A [`Tree`] is a [`Table`] whose rows are nodes. The parent of each node is
//! stored in the internal `#parent` column; child lists are kept alongside
//! in insertion order. Row [`ROOT`] exists from construction and can never
//! be removed or moved.
//!
//! Structural mutations (adding, removing and reparenting nodes) report a
//! [`ChangeDetail`] listing the affected nodes through the tree's structure
//! notifier. Computed columns listen there to invalidate themselves.
//!
//! # Example
//!
//! ```
//! use infovis::{Tree, ROOT};
//!
//! let tree = Tree::new();
//! let a = tree.add_node(ROOT).unwrap();
//! let b = tree.add_node(a).unwrap();
//!
//! assert!(tree.is_ancestor(a, b));
//! assert_eq!(tree.depth(b).unwrap(), 2);
//! assert!(tree.reparent(a, b).is_err());
//!
//! tree.reparent(b, ROOT).unwrap();
//! assert_eq!(tree.children(ROOT), vec![a, b]);
//! ```

mod debug;
mod parent;
pub mod traversal;

use std::fmt;
use std::sync::Arc;

use infovis_core::logging::targets;
use infovis_core::{ChangeDetail, ChangeNotifier, ConnectionId, NotifyBatch, Signal};
use parking_lot::RwLock;

use crate::column::{Column, ColumnRef};
use crate::config::TableConfig;
use crate::error::{Error, Result};
use crate::filter::ColumnFilter;
use crate::metadata::{Metadata, VisualRole};
use crate::table::Table;
use crate::value::ValueType;

pub use debug::{TreeDebug, TreeFormatOptions, TreeStyle};
use parent::ParentColumn;
use traversal::{depth_first, FnVisitor};

/// The root node, present in every tree.
pub const ROOT: usize = 0;

/// Parent column value meaning "no node".
pub const NIL: i32 = -1;

/// Name of the internal column storing parent links.
pub const PARENT_COLUMN: &str = "#parent";

/// Signals emitted by a [`Tree`] after its structure notifier fired.
#[derive(Default)]
pub struct TreeSignals {
    /// A node was attached; carries the node.
    pub node_added: Signal<usize>,
    /// A node was freed; carries the node.
    pub node_removed: Signal<usize>,
    /// A node moved; carries `(node, old_parent, new_parent)`.
    pub node_reparented: Signal<(usize, usize, usize)>,
}

/// A rooted tree whose nodes are table rows.
pub struct Tree {
    table: Table,
    parent: Arc<ParentColumn>,
    children: RwLock<Vec<Vec<usize>>>,
    structure: ChangeNotifier,
    signals: TreeSignals,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree holding only [`ROOT`].
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Create a tree holding only [`ROOT`].
    pub fn with_config(config: TableConfig) -> Self {
        let parent = Arc::new(ParentColumn::new());
        let table = Table::with_columns(config, vec![parent.clone() as ColumnRef]);
        table.add_row();
        Self {
            table,
            parent,
            children: RwLock::new(vec![Vec::new()]),
            structure: ChangeNotifier::new(),
            signals: TreeSignals::default(),
        }
    }

    /// The tree name.
    pub fn name(&self) -> &str {
        self.table.name()
    }

    /// Tree-level metadata.
    pub fn metadata(&self) -> &Metadata {
        self.table.metadata()
    }

    /// Signals emitted by this tree.
    pub fn signals(&self) -> &TreeSignals {
        &self.signals
    }

    pub(crate) fn table(&self) -> &Table {
        &self.table
    }

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    /// Attach a new node as the last child of `parent`.
    pub fn add_node(&self, parent: usize) -> Result<usize> {
        if !self.contains(parent) {
            return Err(Error::InvalidRow(parent));
        }
        let node = self.table.add_row();
        self.parent.set_link(node, Some(parent))?;
        {
            let mut children = self.children.write();
            if children.len() <= node {
                children.resize_with(node + 1, Vec::new);
            }
            children[node].clear();
            children[parent].push(node);
        }
        tracing::debug!(target: targets::TREE, node, parent, "node added");
        self.structure.fire(ChangeDetail::rows([node, parent]));
        self.signals.node_added.emit(node);
        Ok(node)
    }

    /// Move `node` (with its subtree) under `new_parent`, as its last child.
    ///
    /// Fails with [`Error::RootNode`] for [`ROOT`] and with [`Error::Cycle`]
    /// if `new_parent` is `node` or one of its descendants. Moving a node
    /// under its current parent is a no-op.
    pub fn reparent(&self, node: usize, new_parent: usize) -> Result<()> {
        if node == ROOT {
            return Err(Error::RootNode);
        }
        let old_parent = self.parent(node).ok_or(Error::InvalidRow(node))?;
        if !self.contains(new_parent) {
            return Err(Error::InvalidRow(new_parent));
        }
        if node == new_parent || self.is_ancestor(node, new_parent) {
            return Err(Error::Cycle {
                node,
                parent: new_parent,
            });
        }
        if old_parent == new_parent {
            return Ok(());
        }

        self.parent.set_link(node, Some(new_parent))?;
        {
            let mut children = self.children.write();
            children[old_parent].retain(|&child| child != node);
            children[new_parent].push(node);
        }
        tracing::debug!(target: targets::TREE, node, old_parent, new_parent, "node reparented");
        self.structure
            .fire(ChangeDetail::rows([node, old_parent, new_parent]));
        self.signals
            .node_reparented
            .emit((node, old_parent, new_parent));
        Ok(())
    }

    /// Free `node`, handing its children to its parent.
    ///
    /// The children take the removed node's place among its siblings, in
    /// order. Listeners see a single structural event. Fails with
    /// [`Error::RootNode`] for [`ROOT`].
    pub fn remove_row(&self, node: usize) -> Result<()> {
        if node == ROOT {
            return Err(Error::RootNode);
        }
        let parent = self.parent(node).ok_or(Error::InvalidRow(node))?;
        let orphans = {
            let mut children = self.children.write();
            let orphans = std::mem::take(&mut children[node]);
            let siblings = &mut children[parent];
            if let Some(position) = siblings.iter().position(|&child| child == node) {
                siblings.splice(position..=position, orphans.iter().copied());
            }
            orphans
        };
        {
            let _batch = self.parent.batch();
            for &orphan in &orphans {
                self.parent.set_link(orphan, Some(parent))?;
            }
            self.parent.unlink(node);
        }
        self.table.remove_row(node)?;

        tracing::debug!(
            target: targets::TREE,
            node,
            parent,
            adopted = orphans.len(),
            "node removed"
        );
        let affected = [node, parent].into_iter().chain(orphans.iter().copied());
        self.structure.fire(ChangeDetail::rows(affected));
        self.signals.node_removed.emit(node);
        Ok(())
    }

    /// Free `node` and every descendant. Returns the freed nodes, deepest
    /// first.
    pub fn remove_subtree(&self, node: usize) -> Result<Vec<usize>> {
        if node == ROOT {
            return Err(Error::RootNode);
        }
        let parent = self.parent(node).ok_or(Error::InvalidRow(node))?;
        let removed = traversal::postorder_from(self, node);
        {
            let mut children = self.children.write();
            children[parent].retain(|&child| child != node);
            for &freed in &removed {
                children[freed].clear();
            }
        }
        for &freed in &removed {
            self.table.remove_row(freed)?;
            self.parent.unlink(freed);
        }

        tracing::debug!(
            target: targets::TREE,
            node,
            parent,
            count = removed.len(),
            "subtree removed"
        );
        let affected = removed.iter().copied().chain([parent]);
        self.structure.fire(ChangeDetail::rows(affected));
        for &freed in &removed {
            self.signals.node_removed.emit(freed);
        }
        Ok(removed)
    }

    /// Remove every node except a fresh [`ROOT`]. Stored columns are
    /// emptied but stay registered.
    pub fn clear(&self) {
        self.table.clear();
        self.parent.reset();
        self.table.add_row();
        *self.children.write() = vec![Vec::new()];
        tracing::debug!(target: targets::TREE, "tree cleared");
        self.structure.fire(ChangeDetail::All);
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Whether `node` is live.
    pub fn contains(&self, node: usize) -> bool {
        self.table.is_row_valid(node)
    }

    /// Parent of a live non-root node.
    pub fn parent(&self, node: usize) -> Option<usize> {
        if !self.contains(node) {
            return None;
        }
        self.parent.link(node)
    }

    /// Whether `a` is a strict ancestor of `b`.
    ///
    /// Walks the parent chain of `b` upward; a node is not its own ancestor.
    pub fn is_ancestor(&self, a: usize, b: usize) -> bool {
        let mut current = self.parent(b);
        while let Some(node) = current {
            if node == a {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Number of parent hops from `node` to [`ROOT`].
    pub fn depth(&self, node: usize) -> Result<usize> {
        if !self.contains(node) {
            return Err(Error::InvalidRow(node));
        }
        let mut depth = 0;
        let mut current = self.parent(node);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        Ok(depth)
    }

    /// Children of `node` in insertion order. Empty for freed nodes.
    pub fn children(&self, node: usize) -> Vec<usize> {
        if !self.contains(node) {
            return Vec::new();
        }
        self.children
            .read()
            .get(node)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of children of `node`.
    pub fn child_count(&self, node: usize) -> usize {
        if !self.contains(node) {
            return 0;
        }
        self.children.read().get(node).map_or(0, Vec::len)
    }

    /// The `index`-th child of `node`.
    pub fn child_at(&self, node: usize, index: usize) -> Option<usize> {
        if !self.contains(node) {
            return None;
        }
        self.children
            .read()
            .get(node)
            .and_then(|children| children.get(index).copied())
    }

    /// Whether `node` is live and has no children.
    pub fn is_leaf(&self, node: usize) -> bool {
        self.contains(node) && self.child_count(node) == 0
    }

    /// Leaves in depth-first order.
    pub fn leaves(&self) -> Vec<usize> {
        let mut leaves = Vec::new();
        let mut visitor = FnVisitor::from_pre_order(|node| {
            if self.is_leaf(node) {
                leaves.push(node);
            }
            true
        });
        depth_first::visit(self, &mut visitor);
        leaves
    }

    /// Live nodes in ascending order.
    pub fn nodes(&self) -> Vec<usize> {
        self.table.rows()
    }

    /// Number of live nodes, [`ROOT`] included.
    pub fn node_count(&self) -> usize {
        self.table.row_count()
    }

    /// One past the highest node index ever handed out.
    pub fn node_span(&self) -> usize {
        self.table.row_span()
    }

    /// Number of nodes in the subtree rooted at `node`, itself included.
    pub fn subtree_size(&self, node: usize) -> usize {
        let mut count = 0;
        let mut visitor = FnVisitor::from_pre_order(|_| {
            count += 1;
            true
        });
        depth_first::visit_subtree(self, node, &mut visitor);
        count
    }

    /// A printable view of the tree.
    pub fn debug(&self) -> TreeDebug<'_> {
        TreeDebug::new(self)
    }

    // -------------------------------------------------------------------------
    // Notification
    // -------------------------------------------------------------------------

    /// The notifier reporting structural changes.
    pub fn structure_notifier(&self) -> &ChangeNotifier {
        &self.structure
    }

    /// Register a structural change listener.
    pub fn add_structure_listener<F>(&self, listener: F) -> ConnectionId
    where
        F: Fn(&ChangeDetail) + Send + Sync + 'static,
    {
        self.structure.connect(listener)
    }

    /// Unregister a structural change listener.
    pub fn remove_structure_listener(&self, id: ConnectionId) -> bool {
        self.structure.disconnect(id)
    }

    /// Open (or nest) a structural batch.
    pub fn disable_notify(&self) {
        self.structure.disable_notify();
    }

    /// Close one structural batch level; returns `true` if an event was
    /// delivered.
    pub fn enable_notify(&self) -> bool {
        self.structure.enable_notify()
    }

    /// Open a structural batch closed when the guard drops.
    pub fn batch(&self) -> NotifyBatch<'_> {
        self.structure.batch()
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    /// Register a column. See [`Table::add_column`].
    pub fn add_column(&self, column: ColumnRef) -> Result<()> {
        self.table.add_column(column)
    }

    /// Unregister a column. The parent column cannot be removed, and it
    /// rejects every write made through [`Tree::column`].
    pub fn remove_column(&self, name: &str) -> Result<ColumnRef> {
        if name == PARENT_COLUMN {
            return Err(Error::ReadOnly(name.to_string()));
        }
        self.table.remove_column(name)
    }

    /// Look a column up by name.
    pub fn column(&self, name: &str) -> Option<ColumnRef> {
        self.table.column(name)
    }

    /// The column at `index` in registration order.
    pub fn column_at(&self, index: usize) -> Option<ColumnRef> {
        self.table.column_at(index)
    }

    /// Number of registered columns, internal ones included.
    pub fn column_count(&self) -> usize {
        self.table.column_count()
    }

    /// Non-internal columns in registration order.
    pub fn columns(&self) -> Vec<ColumnRef> {
        self.table.columns()
    }

    /// Columns the filter keeps.
    pub fn filtered_columns(&self, filter: &dyn ColumnFilter) -> Vec<ColumnRef> {
        self.table.filtered_columns(filter)
    }

    /// First non-internal column flagged with `role`.
    pub fn find_column_with_role(&self, role: VisualRole) -> Option<ColumnRef> {
        self.table.find_column_with_role(role)
    }

    /// Typed lookup. See [`Table::column_as`].
    pub fn column_as<T: ValueType>(&self, name: &str) -> Result<Arc<Column<T>>> {
        self.table.column_as(name)
    }

    /// Typed get-or-create. See [`Table::find_or_create_column`].
    pub fn find_or_create_column<T: ValueType>(&self, name: &str) -> Result<Arc<Column<T>>> {
        self.table.find_or_create_column(name)
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("name", &self.name())
            .field("nodes", &self.node_count())
            .field("columns", &self.column_count())
            .finish()
    }
}
