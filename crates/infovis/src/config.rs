//! Construction options for tables and trees.

/// Configuration for a [`Table`](crate::Table) or [`Tree`](crate::Tree).
///
/// # Example
///
/// ```
/// use infovis::{Table, TableConfig};
///
/// let table = Table::with_config(
///     TableConfig::new()
///         .with_name("measurements")
///         .with_row_capacity(1024),
/// );
/// assert_eq!(table.name(), "measurements");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Table name, informational only.
    pub name: String,
    /// Rows reserved up front in the row set.
    pub row_capacity: usize,
    /// Whether `add_row` reuses indices freed by `remove_row`.
    ///
    /// When `false` every new row is appended, so indices grow
    /// monotonically.
    pub reuse_free_rows: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            row_capacity: 0,
            reuse_free_rows: true,
        }
    }
}

impl TableConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Reserve room for `capacity` rows.
    pub fn with_row_capacity(mut self, capacity: usize) -> Self {
        self.row_capacity = capacity;
        self
    }

    /// Enable or disable reuse of freed row indices.
    pub fn with_reuse_free_rows(mut self, reuse: bool) -> Self {
        self.reuse_free_rows = reuse;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TableConfig::default();
        assert!(config.name.is_empty());
        assert!(config.reuse_free_rows);
        assert_eq!(config.row_capacity, 0);
    }

    #[test]
    fn test_builder() {
        let config = TableConfig::new()
            .with_name("t")
            .with_row_capacity(8)
            .with_reuse_free_rows(false);
        assert_eq!(config.name, "t");
        assert_eq!(config.row_capacity, 8);
        assert!(!config.reuse_free_rows);
    }
}
