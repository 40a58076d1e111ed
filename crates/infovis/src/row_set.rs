//! Tracking of live and free row indices.
//!
//! A [`RowSet`] hands out row indices for a dynamic table. Removing a row
//! frees its index without compacting the table; freed indices are handed out
//! again lowest-first so indices stay dense under churn.

use std::collections::BTreeSet;

/// The set of live rows of a dynamic table.
#[derive(Debug, Clone)]
pub struct RowSet {
    valid: Vec<bool>,
    free: BTreeSet<usize>,
    reuse_free: bool,
}

impl Default for RowSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RowSet {
    /// An empty row set that reuses freed indices.
    pub fn new() -> Self {
        Self {
            valid: Vec::new(),
            free: BTreeSet::new(),
            reuse_free: true,
        }
    }

    /// An empty row set with room for `capacity` rows.
    pub fn with_capacity(capacity: usize, reuse_free: bool) -> Self {
        Self {
            valid: Vec::with_capacity(capacity),
            free: BTreeSet::new(),
            reuse_free,
        }
    }

    /// Allocate a row. Returns the index and whether it was reused.
    pub fn allocate(&mut self) -> (usize, bool) {
        if self.reuse_free {
            if let Some(row) = self.free.pop_first() {
                self.valid[row] = true;
                return (row, true);
            }
        }
        let row = self.valid.len();
        self.valid.push(true);
        (row, false)
    }

    /// Free a live row. Returns `false` if the row was not live.
    pub fn free(&mut self, row: usize) -> bool {
        match self.valid.get_mut(row) {
            Some(valid) if *valid => {
                *valid = false;
                if self.reuse_free {
                    self.free.insert(row);
                }
                true
            }
            _ => false,
        }
    }

    /// Whether `row` is live.
    pub fn is_valid(&self, row: usize) -> bool {
        self.valid.get(row).copied().unwrap_or(false)
    }

    /// Number of live rows.
    pub fn len(&self) -> usize {
        self.valid.len() - self.free_count()
    }

    /// Whether no row is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One past the highest index ever allocated.
    pub fn high_water(&self) -> usize {
        self.valid.len()
    }

    /// Number of freed, not yet reused indices.
    pub fn free_count(&self) -> usize {
        if self.reuse_free {
            self.free.len()
        } else {
            self.valid.iter().filter(|valid| !**valid).count()
        }
    }

    /// Live rows in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.valid
            .iter()
            .enumerate()
            .filter_map(|(row, valid)| valid.then_some(row))
    }

    /// Forget every row.
    pub fn clear(&mut self) {
        self.valid.clear();
        self.free.clear();
    }
}
