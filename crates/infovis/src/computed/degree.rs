//! Node out-degree.

use std::sync::Arc;

use crate::column::Column;
use crate::error::Result;
use crate::tree::Tree;

use super::{TreeComputation, TreeProperty};

struct DegreeComputation;

impl TreeComputation<i32> for DegreeComputation {
    fn compute(&self, tree: &Tree, column: &Column<i32>) -> Result<()> {
        column.ensure_size(tree.node_span());
        for node in tree.nodes() {
            let degree = i32::try_from(tree.child_count(node)).unwrap_or(i32::MAX);
            column.set_extend(node, degree)?;
        }
        Ok(())
    }
}

/// The number of children of each node.
pub struct DegreeColumn;

impl DegreeColumn {
    /// Reserved column name.
    pub const NAME: &'static str = "#degree";

    /// The degree column of `tree`, created on first request.
    pub fn find(tree: &Arc<Tree>) -> Result<Arc<TreeProperty<i32>>> {
        TreeProperty::find_or_attach(tree, Self::NAME, || DegreeComputation)
    }
}
