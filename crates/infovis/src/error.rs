//! Error types for the data model.
//!
//! Two families of failure exist. [`ParseError`] is local and recoverable:
//! strict entry points such as [`crate::Column::set_value_at`] return it,
//! lenient ones such as [`crate::Column::set_value_or_null_at`] swallow it
//! and mark the cell undefined. Every other variant of [`Error`] is a
//! contract violation by the caller and is meant to propagate.

/// Result type alias for data model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A string could not be converted to a column's value type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse {input:?} as {type_name}: {message}")]
pub struct ParseError {
    /// The rejected text.
    pub input: String,
    /// Name of the target value type.
    pub type_name: &'static str,
    /// Why the text was rejected.
    pub message: String,
}

impl ParseError {
    /// Create a parse error.
    pub fn new(
        input: impl Into<String>,
        type_name: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            type_name,
            message: message.into(),
        }
    }
}

/// Errors that can occur when operating on columns, tables and trees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Text could not be parsed into a column value.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Index outside `0..size` on a non-extending access.
    #[error("index {index} out of range for column '{column}' of size {size}")]
    IndexOutOfRange {
        column: String,
        index: usize,
        size: usize,
    },

    /// A column with the same name is already registered.
    #[error("a column named '{0}' already exists")]
    DuplicateColumn(String),

    /// No column with that name is registered.
    #[error("no column named '{0}'")]
    ColumnNotFound(String),

    /// A column exists but holds another value type.
    #[error("column '{column}' holds {found}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The row is free or was never allocated.
    #[error("row {0} is not a valid row")]
    InvalidRow(usize),

    /// A live row holds no value in the column.
    #[error("row {row} of column '{column}' is undefined")]
    UndefinedValue { column: String, row: usize },

    /// The operation is not allowed on the root node.
    #[error("operation not permitted on the root node")]
    RootNode,

    /// Reparenting would make a node its own ancestor.
    #[error("moving node {node} under {parent} would create a cycle")]
    Cycle { node: usize, parent: usize },

    /// The column is maintained by its owner and rejects direct changes.
    #[error("column '{0}' is managed by its owner and cannot be modified directly")]
    ReadOnly(String),

    /// The computed column was disposed.
    #[error("computed column '{0}' has been disposed")]
    Disposed(String),

    /// The structure a computed column derives from no longer exists.
    #[error("source of computed column '{0}' has been dropped")]
    SourceDropped(String),
}

impl Error {
    /// Create an out-of-range error.
    pub fn out_of_range(column: impl Into<String>, index: usize, size: usize) -> Self {
        Self::IndexOutOfRange {
            column: column.into(),
            index,
            size,
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(
        column: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            expected,
            found,
        }
    }

    /// Returns `true` for recoverable parse failures.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}
