//! Textual formats attached to columns.
//!
//! Every column converts between its values and strings through an attached
//! [`ValueFormat`]. Readers and writers go through this surface only, so a
//! column can change its textual representation without touching storage.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::ParseError;
use crate::value::ValueType;

/// Converts values of type `T` to and from text.
pub trait ValueFormat<T>: Send + Sync {
    /// Parse text into a value.
    fn parse(&self, text: &str) -> Result<T, ParseError>;

    /// Render a value as text.
    fn format(&self, value: &T) -> String;
}

/// The canonical format of each [`ValueType`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFormat;

impl<T: ValueType> ValueFormat<T> for StdFormat {
    fn parse(&self, text: &str) -> Result<T, ParseError> {
        T::parse_text(text).map_err(|message| ParseError::new(text, T::TYPE_NAME, message))
    }

    fn format(&self, value: &T) -> String {
        value.format_text()
    }
}

#[derive(Debug, Default)]
struct Categories {
    codes: HashMap<String, i32>,
    labels: Vec<String>,
}

/// Maps category labels to dense integer codes.
///
/// Used with integer columns holding categorical data. Parsing an unseen
/// label assigns it the next code unless the format is frozen, in which case
/// unknown labels are rejected.
///
/// The category table lives in the format, not in the column: clearing a
/// column keeps its categories. Call [`CategoricalFormat::clear_categories`]
/// explicitly to reset them.
#[derive(Debug, Default)]
pub struct CategoricalFormat {
    categories: RwLock<Categories>,
    frozen: bool,
}

impl CategoricalFormat {
    /// Create an empty, growable category table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a frozen table with a fixed set of labels.
    pub fn frozen<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let format = Self::new();
        for label in labels {
            format.intern(label.into());
        }
        Self {
            frozen: true,
            ..format
        }
    }

    /// Whether unknown labels are rejected.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Number of known categories.
    pub fn category_count(&self) -> usize {
        self.categories.read().labels.len()
    }

    /// Known labels in code order.
    pub fn labels(&self) -> Vec<String> {
        self.categories.read().labels.clone()
    }

    /// Code of a label, if known.
    pub fn code_of(&self, label: &str) -> Option<i32> {
        self.categories.read().codes.get(label).copied()
    }

    /// Label of a code, if known.
    pub fn label_of(&self, code: i32) -> Option<String> {
        let index = usize::try_from(code).ok()?;
        self.categories.read().labels.get(index).cloned()
    }

    /// Forget every category.
    pub fn clear_categories(&self) {
        let mut categories = self.categories.write();
        categories.codes.clear();
        categories.labels.clear();
    }

    fn intern(&self, label: String) -> i32 {
        let mut categories = self.categories.write();
        if let Some(&code) = categories.codes.get(&label) {
            return code;
        }
        let code = categories.labels.len() as i32;
        categories.labels.push(label.clone());
        categories.codes.insert(label, code);
        code
    }
}

impl ValueFormat<i32> for CategoricalFormat {
    fn parse(&self, text: &str) -> Result<i32, ParseError> {
        let label = text.trim();
        if let Some(code) = self.code_of(label) {
            return Ok(code);
        }
        if self.frozen {
            return Err(ParseError::new(text, "category", "unknown category"));
        }
        Ok(self.intern(label.to_string()))
    }

    fn format(&self, value: &i32) -> String {
        self.label_of(*value).unwrap_or_else(|| value.to_string())
    }
}
