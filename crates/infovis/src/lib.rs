//! Columnar tables and trees for information visualization.
//!
//! The data model is built from typed [`Column`]s grouped into [`Table`]s.
//! A [`Tree`] is a table whose rows are nodes linked by parent pointers.
//! Computed columns such as [`DepthColumn`], [`DegreeColumn`] and
//! [`AggregationColumn`] derive their values from a tree and recompute
//! lazily after the tree changes.
//!
//! Every structure reports changes synchronously through an
//! [`infovis_core::ChangeNotifier`]; bulk updates can be batched so
//! listeners see one coalesced [`ChangeDetail`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use infovis::{DegreeColumn, Tree, ROOT};
//!
//! let tree = Arc::new(Tree::new());
//! let a = tree.add_node(ROOT).unwrap();
//! let b = tree.add_node(a).unwrap();
//!
//! let degree = DegreeColumn::find(&tree).unwrap();
//! assert_eq!(degree.get(a), Ok(1));
//!
//! tree.add_node(a).unwrap();
//! assert_eq!(degree.get(a), Ok(2));
//!
//! tree.reparent(b, ROOT).unwrap();
//! assert_eq!(degree.get(a), Ok(1));
//! assert_eq!(degree.get(ROOT), Ok(2));
//! ```
//!
//! # Logging
//!
//! Events are emitted with `tracing` under the targets listed in
//! [`infovis_core::logging::targets`]; install a subscriber to see them.

pub mod column;
pub mod computed;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod metadata;
pub mod row_set;
pub mod table;
pub mod tree;
pub mod value;

pub use column::{
    downcast_column, AnyColumn, BooleanColumn, Column, ColumnRef, DoubleColumn, FloatColumn,
    IntColumn, LongColumn, StringColumn,
};
pub use computed::{
    Aggregation, AggregationColumn, DegreeColumn, DepthColumn, TreeComputation, TreeProperty,
};
pub use config::TableConfig;
pub use error::{Error, ParseError, Result};
pub use filter::{
    AnyFilter, ColumnFilter, FilterAll, FilterNone, InternalColumnFilter, NameFilter,
    NumericColumnFilter, TransientColumnFilter,
};
pub use format::{CategoricalFormat, StdFormat, ValueFormat};
pub use metadata::{Metadata, MetadataValue, VisualRole};
pub use row_set::RowSet;
pub use table::{Item, Table, TableSignals};
pub use tree::traversal;
pub use tree::{
    Tree, TreeDebug, TreeFormatOptions, TreeSignals, TreeStyle, NIL, PARENT_COLUMN, ROOT,
};
pub use value::ValueType;

pub use infovis_core::{ChangeDetail, ChangeNotifier, ConnectionId, NotifyBatch};

static_assertions::assert_impl_all!(Column<f64>: Send, Sync);
static_assertions::assert_impl_all!(Column<String>: Send, Sync);
static_assertions::assert_impl_all!(Table: Send, Sync);
static_assertions::assert_impl_all!(Tree: Send, Sync);
static_assertions::assert_impl_all!(TreeProperty<i32>: Send, Sync);
