//! Key/value attributes attached to columns and tables.
//!
//! Metadata carries hints consumed by layers outside the data model: which
//! column plays which visual role, how a column aggregates up a tree, and
//! whether a column should be skipped when saving. Keys are plain strings;
//! the [`keys`] module lists the well-known ones and the accessor methods on
//! [`Metadata`] wrap them.

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;

/// Well-known metadata keys.
pub mod keys {
    /// Prefix of the per-role flags, e.g. `VisualRole:label`.
    pub const VISUAL_ROLE_PREFIX: &str = "VisualRole:";
    /// Name of the aggregation used when rolling a column up a tree.
    pub const AGGREGATION_TYPE: &str = "AggregationType";
    /// Marks a column that readers/writers must not persist.
    pub const IO_TRANSIENT: &str = "IOTransient";
}

/// A metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    /// Free-form text.
    Text(String),
    /// A flag.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
}

impl MetadataValue {
    /// Returns the text if this is a `Text` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the flag if this is a `Bool` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the number if this is an `Int` value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number if this is a `Float` or `Int` value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Visual roles a rendering layer may assign to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualRole {
    /// Text shown for each item.
    Label,
    /// Item size (area in a treemap, radius in a scatter plot).
    Size,
    /// Item color.
    Color,
    /// Horizontal position.
    X,
    /// Vertical position.
    Y,
    /// Sort key.
    Sort,
    /// Grouping key.
    Group,
}

impl VisualRole {
    /// Every role, in declaration order.
    pub const ALL: [VisualRole; 7] = [
        Self::Label,
        Self::Size,
        Self::Color,
        Self::X,
        Self::Y,
        Self::Sort,
        Self::Group,
    ];

    /// The role's name as used in metadata keys.
    pub fn name(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Size => "size",
            Self::Color => "color",
            Self::X => "x",
            Self::Y => "y",
            Self::Sort => "sort",
            Self::Group => "group",
        }
    }

    /// The metadata key flagging this role.
    pub fn key(self) -> String {
        format!("{}{}", keys::VISUAL_ROLE_PREFIX, self.name())
    }

    /// Look a role up by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.name() == name)
    }
}

/// A string-keyed attribute store.
///
/// Setting a key to `None` removes it; no key ever maps to an absent value.
#[derive(Default)]
pub struct Metadata {
    entries: RwLock<HashMap<String, MetadataValue>>,
}

impl Metadata {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look a key up.
    pub fn get(&self, key: &str) -> Option<MetadataValue> {
        self.entries.read().get(key).cloned()
    }

    /// Store a value, or remove the key when `value` is `None`.
    ///
    /// Returns the previous value.
    pub fn set(
        &self,
        key: impl Into<String>,
        value: Option<MetadataValue>,
    ) -> Option<MetadataValue> {
        let key = key.into();
        let mut entries = self.entries.write();
        match value {
            Some(value) => entries.insert(key, value),
            None => entries.remove(&key),
        }
    }

    /// Store a value.
    pub fn insert(
        &self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> Option<MetadataValue> {
        self.set(key, Some(value.into()))
    }

    /// Remove a key, returning its value.
    pub fn remove(&self, key: &str) -> Option<MetadataValue> {
        self.entries.write().remove(key)
    }

    /// Whether the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Flag or unflag a visual role.
    pub fn set_visual_role(&self, role: VisualRole, enabled: bool) {
        let value = enabled.then_some(MetadataValue::Bool(true));
        self.set(role.key(), value);
    }

    /// Whether a visual role is flagged.
    pub fn has_visual_role(&self, role: VisualRole) -> bool {
        self.get(&role.key())
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    /// Every flagged visual role.
    pub fn visual_roles(&self) -> Vec<VisualRole> {
        VisualRole::ALL
            .into_iter()
            .filter(|role| self.has_visual_role(*role))
            .collect()
    }

    /// Mark the owner as transient for I/O.
    pub fn set_transient(&self, transient: bool) {
        let value = transient.then_some(MetadataValue::Bool(true));
        self.set(keys::IO_TRANSIENT, value);
    }

    /// Whether the owner is transient for I/O.
    pub fn is_transient(&self) -> bool {
        self.get(keys::IO_TRANSIENT)
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    /// The configured aggregation name, if any.
    pub fn aggregation_type(&self) -> Option<String> {
        self.get(keys::AGGREGATION_TYPE)
            .and_then(|value| value.as_str().map(str::to_string))
    }

    /// Configure or clear the aggregation name.
    pub fn set_aggregation_type(&self, name: Option<&str>) {
        self.set(keys::AGGREGATION_TYPE, name.map(MetadataValue::from));
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.read().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_none_removes() {
        let metadata = Metadata::new();
        metadata.insert("unit", "cm");
        assert_eq!(metadata.get("unit"), Some(MetadataValue::Text("cm".into())));

        let previous = metadata.set("unit", None);
        assert_eq!(previous, Some(MetadataValue::from("cm")));
        assert!(!metadata.contains("unit"));
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_visual_roles() {
        let metadata = Metadata::new();
        metadata.set_visual_role(VisualRole::Label, true);
        metadata.set_visual_role(VisualRole::Color, true);
        assert!(metadata.has_visual_role(VisualRole::Label));
        assert!(metadata.contains("VisualRole:label"));
        assert_eq!(metadata.visual_roles(), vec![VisualRole::Label, VisualRole::Color]);

        metadata.set_visual_role(VisualRole::Label, false);
        assert!(!metadata.contains("VisualRole:label"));
        assert_eq!(VisualRole::from_name("y"), Some(VisualRole::Y));
    }

    #[test]
    fn test_transient_and_aggregation() {
        let metadata = Metadata::new();
        assert!(!metadata.is_transient());
        metadata.set_transient(true);
        assert!(metadata.is_transient());
        metadata.set_transient(false);
        assert!(metadata.is_empty());

        metadata.set_aggregation_type(Some("sum"));
        assert_eq!(metadata.aggregation_type().as_deref(), Some("sum"));
        metadata.set_aggregation_type(None);
        assert_eq!(metadata.aggregation_type(), None);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(MetadataValue::Int(3).as_float(), Some(3.0));
        assert_eq!(MetadataValue::Bool(true).as_str(), None);
        assert_eq!(MetadataValue::from(2.5).to_string(), "2.5");
        let metadata = Metadata::new();
        metadata.insert("b", 1i64);
        metadata.insert("a", true);
        assert_eq!(metadata.keys(), vec!["a".to_string(), "b".to_string()]);
    }
}
