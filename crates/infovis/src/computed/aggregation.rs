//! Rolling a numeric column up the tree.
//!
//! Each node of an [`AggregationColumn`] holds an [`Aggregation`] of the
//! source values found at the leaves of its subtree. A leaf aggregates its
//! own value; interior nodes ignore their own source value. Undefined source
//! cells contribute nothing.

use std::fmt;
use std::sync::Arc;

use infovis_core::logging::targets;

use crate::column::{Column, ColumnRef};
use crate::error::{Error, Result};
use crate::tree::traversal::{depth_first, FnVisitor};
use crate::tree::Tree;

use super::{TreeComputation, TreeProperty};

/// How leaf values combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Aggregation {
    /// Sum of the values; 0 for an empty subtree.
    #[default]
    Sum,
    /// Smallest value.
    Min,
    /// Largest value.
    Max,
    /// Arithmetic mean.
    Mean,
    /// Number of defined values.
    Count,
}

impl Aggregation {
    /// Every aggregation, in declaration order.
    pub const ALL: [Aggregation; 5] = [Self::Sum, Self::Min, Self::Max, Self::Mean, Self::Count];

    /// The registry name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Mean => "mean",
            Self::Count => "count",
        }
    }

    /// Look an aggregation up by name, ignoring case. `average` and `avg`
    /// name [`Aggregation::Mean`].
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "average" | "avg" => Some(Self::Mean),
            _ => Self::ALL.into_iter().find(|aggregation| aggregation.name() == name),
        }
    }

    fn finish(self, acc: &Accumulator) -> Option<f64> {
        let defined = acc.count > 0;
        match self {
            Self::Sum => Some(acc.sum),
            Self::Count => Some(acc.count as f64),
            Self::Min => defined.then_some(acc.min),
            Self::Max => defined.then_some(acc.max),
            Self::Mean => defined.then(|| acc.sum / acc.count as f64),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl Accumulator {
    fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn merge(&mut self, other: &Accumulator) {
        self.count += other.count;
        self.sum += other.sum;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }
}

struct AggregationComputation {
    source: ColumnRef,
    aggregation: Aggregation,
}

impl TreeComputation<f64> for AggregationComputation {
    fn compute(&self, tree: &Tree, column: &Column<f64>) -> Result<()> {
        let span = tree.node_span();
        column.ensure_size(span);
        let mut totals = vec![Accumulator::default(); span];
        let mut visitor = FnVisitor::from_post_order(|node| {
            let mut total = Accumulator::default();
            let children = tree.children(node);
            if children.is_empty() {
                if let Some(value) = self.source.f64_at(node) {
                    total.add(value);
                }
            } else {
                for child in children {
                    total.merge(&totals[child]);
                }
            }
            totals[node] = total;
        });
        depth_first::visit(tree, &mut visitor);
        for node in tree.nodes() {
            if let Some(value) = self.aggregation.finish(&totals[node]) {
                column.set_extend(node, value)?;
            }
        }
        Ok(())
    }

    fn sources(&self) -> Vec<ColumnRef> {
        vec![self.source.clone()]
    }
}

/// Aggregation of a numeric column over subtree leaves.
///
/// ```
/// use std::sync::Arc;
/// use infovis::{Aggregation, AggregationColumn, Tree, ROOT};
///
/// let tree = Arc::new(Tree::new());
/// let size = tree.find_or_create_column::<f64>("size").unwrap();
/// let dir = tree.add_node(ROOT).unwrap();
/// for bytes in [10.0, 32.0] {
///     let file = tree.add_node(dir).unwrap();
///     size.set(file, bytes).unwrap();
/// }
///
/// let total = AggregationColumn::find(&tree, "size", Aggregation::Sum).unwrap();
/// assert_eq!(total.get(ROOT), Ok(42.0));
///
/// size.set(2, 0.0).unwrap();
/// assert_eq!(total.get(dir), Ok(32.0));
/// ```
pub struct AggregationColumn;

impl AggregationColumn {
    /// Reserved column name for an aggregation of `source`.
    pub fn name_for(source: &str, aggregation: Aggregation) -> String {
        format!("#{aggregation}({source})")
    }

    /// The aggregation of `source`, created on first request.
    ///
    /// Fails with [`Error::ColumnNotFound`] if `source` does not exist and
    /// with [`Error::TypeMismatch`] if it is not numeric.
    pub fn find(
        tree: &Arc<Tree>,
        source: &str,
        aggregation: Aggregation,
    ) -> Result<Arc<TreeProperty<f64>>> {
        let column = tree
            .column(source)
            .ok_or_else(|| Error::ColumnNotFound(source.to_string()))?;
        if !column.is_numeric() {
            return Err(Error::type_mismatch(source, "numeric", column.type_name()));
        }
        let name = Self::name_for(source, aggregation);
        TreeProperty::find_or_attach(tree, &name, move || AggregationComputation {
            source: column,
            aggregation,
        })
    }

    /// The aggregation configured by the source column's `AggregationType`
    /// metadata, [`Aggregation::Sum`] when unset or unknown.
    pub fn find_default(tree: &Arc<Tree>, source: &str) -> Result<Arc<TreeProperty<f64>>> {
        let configured = tree
            .column(source)
            .ok_or_else(|| Error::ColumnNotFound(source.to_string()))?
            .metadata()
            .aggregation_type();
        let aggregation = match configured {
            Some(name) => Aggregation::from_name(&name).unwrap_or_else(|| {
                tracing::warn!(
                    target: targets::COMPUTED,
                    column = %source,
                    aggregation = %name,
                    "unknown aggregation, using sum"
                );
                Aggregation::Sum
            }),
            None => Aggregation::Sum,
        };
        Self::find(tree, source, aggregation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::DoubleColumn;
    use crate::tree::ROOT;

    /// ROOT -> a -> (b = 2, c = 6), ROOT -> d = 4, values on leaves.
    fn sample() -> (Arc<Tree>, Arc<DoubleColumn>, [usize; 4]) {
        let tree = Arc::new(Tree::new());
        let weight = tree.find_or_create_column::<f64>("weight").unwrap();
        let a = tree.add_node(ROOT).unwrap();
        let b = tree.add_node(a).unwrap();
        let c = tree.add_node(a).unwrap();
        let d = tree.add_node(ROOT).unwrap();
        weight.set(b, 2.0).unwrap();
        weight.set(c, 6.0).unwrap();
        weight.set(d, 4.0).unwrap();
        (tree, weight, [a, b, c, d])
    }

    #[test]
    fn test_registry() {
        assert_eq!(Aggregation::from_name("SUM"), Some(Aggregation::Sum));
        assert_eq!(Aggregation::from_name("average"), Some(Aggregation::Mean));
        assert_eq!(Aggregation::from_name("median"), None);
        for aggregation in Aggregation::ALL {
            assert_eq!(Aggregation::from_name(aggregation.name()), Some(aggregation));
        }
        assert_eq!(AggregationColumn::name_for("w", Aggregation::Max), "#max(w)");
    }

    #[test]
    fn test_aggregations() {
        let (tree, _, [a, b, _, _]) = sample();
        let sum = AggregationColumn::find(&tree, "weight", Aggregation::Sum).unwrap();
        let min = AggregationColumn::find(&tree, "weight", Aggregation::Min).unwrap();
        let mean = AggregationColumn::find(&tree, "weight", Aggregation::Mean).unwrap();
        let count = AggregationColumn::find(&tree, "weight", Aggregation::Count).unwrap();

        assert_eq!(sum.get(ROOT), Ok(12.0));
        assert_eq!(sum.get(a), Ok(8.0));
        assert_eq!(sum.get(b), Ok(2.0));
        assert_eq!(min.get(ROOT), Ok(2.0));
        assert_eq!(mean.get(a), Ok(4.0));
        assert_eq!(count.get(ROOT), Ok(3.0));
    }

    #[test]
    fn test_undefined_leaves() {
        let (tree, weight, [a, b, c, _]) = sample();
        weight.set_value_undefined(b, true).unwrap();
        weight.set_value_undefined(c, true).unwrap();

        let max = AggregationColumn::find(&tree, "weight", Aggregation::Max).unwrap();
        let sum = AggregationColumn::find(&tree, "weight", Aggregation::Sum).unwrap();
        assert_eq!(
            max.get(a),
            Err(Error::UndefinedValue {
                column: "#max(weight)".to_string(),
                row: a,
            })
        );
        assert_eq!(max.get(99), Err(Error::InvalidRow(99)));
        assert_eq!(sum.get(a), Ok(0.0));
        assert_eq!(max.get(ROOT), Ok(4.0));
    }

    #[test]
    fn test_source_change_invalidates() {
        let (tree, weight, [a, b, _, _]) = sample();
        let sum = AggregationColumn::find(&tree, "weight", Aggregation::Sum).unwrap();
        assert_eq!(sum.get(ROOT), Ok(12.0));

        weight.set(b, 10.0).unwrap();
        assert!(!sum.is_valid());
        assert_eq!(sum.get(a), Ok(16.0));

        let e = tree.add_node(a).unwrap();
        weight.set(e, 1.0).unwrap();
        assert_eq!(sum.get(ROOT), Ok(21.0));
    }

    #[test]
    fn test_default_from_metadata() {
        let (tree, weight, _) = sample();
        weight.metadata().set_aggregation_type(Some("max"));
        let max = AggregationColumn::find_default(&tree, "weight").unwrap();
        assert_eq!(max.name(), "#max(weight)");
        assert_eq!(max.get(ROOT), Ok(6.0));

        weight.metadata().set_aggregation_type(Some("bogus"));
        let sum = AggregationColumn::find_default(&tree, "weight").unwrap();
        assert_eq!(sum.name(), "#sum(weight)");
    }

    #[test]
    fn test_source_errors() {
        let (tree, _, _) = sample();
        tree.find_or_create_column::<String>("label").unwrap();
        assert_eq!(
            AggregationColumn::find(&tree, "label", Aggregation::Sum).unwrap_err(),
            Error::type_mismatch("label", "numeric", "string")
        );
        assert_eq!(
            AggregationColumn::find(&tree, "nope", Aggregation::Sum).unwrap_err(),
            Error::ColumnNotFound("nope".to_string())
        );
    }

    #[test]
    fn test_dispose_disconnects_source() {
        let (tree, weight, _) = sample();
        let listeners = weight.notifier().listener_count();
        let sum = AggregationColumn::find(&tree, "weight", Aggregation::Sum).unwrap();
        assert_eq!(weight.notifier().listener_count(), listeners + 1);
        sum.dispose();
        assert_eq!(weight.notifier().listener_count(), listeners);
    }
}
