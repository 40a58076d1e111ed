//! Value types storable in a [`Column`](crate::Column).
//!
//! A [`ValueType`] supplies everything the generic column core needs to know
//! about its element type: a total ordering for min/max tracking, the
//! default textual representation, and an optional numeric view used by
//! aggregations and numeric filters.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::format::{StdFormat, ValueFormat};

/// An element type of a column.
pub trait ValueType: Clone + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Human readable type name used in errors and debug output.
    const TYPE_NAME: &'static str;

    /// Total order used for min/max tracking.
    fn compare(&self, other: &Self) -> Ordering;

    /// Parse the canonical textual form.
    fn parse_text(text: &str) -> Result<Self, String>;

    /// Produce the canonical textual form.
    fn format_text(&self) -> String;

    /// Numeric view of the value, if the type is numeric.
    fn to_f64(&self) -> Option<f64> {
        None
    }

    /// The format attached to new columns of this type.
    fn default_format() -> Arc<dyn ValueFormat<Self>> {
        Arc::new(StdFormat)
    }
}

macro_rules! integer_value_type {
    ($($ty:ty),*) => {$(
        impl ValueType for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn compare(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }

            fn parse_text(text: &str) -> Result<Self, String> {
                text.trim().parse::<$ty>().map_err(|e| e.to_string())
            }

            fn format_text(&self) -> String {
                self.to_string()
            }

            fn to_f64(&self) -> Option<f64> {
                Some(*self as f64)
            }
        }
    )*};
}

macro_rules! float_value_type {
    ($($ty:ty),*) => {$(
        impl ValueType for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn compare(&self, other: &Self) -> Ordering {
                self.total_cmp(other)
            }

            fn parse_text(text: &str) -> Result<Self, String> {
                text.trim().parse::<$ty>().map_err(|e| e.to_string())
            }

            fn format_text(&self) -> String {
                self.to_string()
            }

            fn to_f64(&self) -> Option<f64> {
                Some(*self as f64)
            }
        }
    )*};
}

integer_value_type!(i32, i64);
float_value_type!(f32, f64);

impl ValueType for bool {
    const TYPE_NAME: &'static str = "bool";

    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn parse_text(text: &str) -> Result<Self, String> {
        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "1" => Ok(true),
            "false" | "f" | "no" | "0" => Ok(false),
            other => Err(format!("'{other}' is not a boolean")),
        }
    }

    fn format_text(&self) -> String {
        self.to_string()
    }
}

impl ValueType for String {
    const TYPE_NAME: &'static str = "string";

    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn parse_text(text: &str) -> Result<Self, String> {
        Ok(text.to_string())
    }

    fn format_text(&self) -> String {
        self.clone()
    }
}
