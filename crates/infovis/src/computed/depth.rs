//! Node depth.

use std::sync::Arc;

use crate::column::Column;
use crate::error::Result;
use crate::tree::traversal::{depth_first, FnVisitor};
use crate::tree::Tree;

use super::{TreeComputation, TreeProperty};

pub(crate) struct DepthComputation;

impl TreeComputation<i32> for DepthComputation {
    fn compute(&self, tree: &Tree, column: &Column<i32>) -> Result<()> {
        column.ensure_size(tree.node_span());
        let mut stored = Ok(());
        // Pre-order visits a parent before its children.
        let mut visitor = FnVisitor::from_pre_order(|node| {
            let depth = tree
                .parent(node)
                .and_then(|parent| column.value(parent))
                .map_or(0, |depth| depth + 1);
            if let Err(err) = column.set_extend(node, depth) {
                stored = Err(err);
                return false;
            }
            true
        });
        depth_first::visit(tree, &mut visitor);
        stored
    }
}

/// The number of parent hops from each node to the root.
///
/// ```
/// use std::sync::Arc;
/// use infovis::{DepthColumn, Tree, ROOT};
///
/// let tree = Arc::new(Tree::new());
/// let a = tree.add_node(ROOT).unwrap();
/// let b = tree.add_node(a).unwrap();
///
/// let depth = DepthColumn::find(&tree).unwrap();
/// assert_eq!(depth.get(b), Ok(2));
///
/// tree.reparent(b, ROOT).unwrap();
/// assert_eq!(depth.get(b), Ok(1));
/// ```
pub struct DepthColumn;

impl DepthColumn {
    /// Reserved column name.
    pub const NAME: &'static str = "#depth";

    /// The depth column of `tree`, created on first request.
    pub fn find(tree: &Arc<Tree>) -> Result<Arc<TreeProperty<i32>>> {
        TreeProperty::find_or_attach(tree, Self::NAME, || DepthComputation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ROOT;

    #[test]
    fn test_depths() {
        let tree = Arc::new(Tree::new());
        let a = tree.add_node(ROOT).unwrap();
        let b = tree.add_node(a).unwrap();
        let c = tree.add_node(b).unwrap();
        let depth = DepthColumn::find(&tree).unwrap();

        assert_eq!(depth.get(ROOT), Ok(0));
        assert_eq!(depth.get(c), Ok(3));

        tree.remove_row(b).unwrap();
        assert_eq!(depth.get(c), Ok(2));
        assert!(depth.get(b).is_err());
    }
}
