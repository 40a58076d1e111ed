//! Logging facilities for infovis.
//!
//! The data model is instrumented with the `tracing` crate. Nothing is
//! printed unless the application installs a subscriber:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("infovis::tree=debug,infovis::computed=debug")
//!         .init();
//! }
//! ```
//!
//! Every event carries one of the [`targets`] below so subsystems can be
//! filtered independently.

/// Span names used throughout infovis for tracing.
pub mod span_names {
    /// Batched notification flush span.
    pub const NOTIFY: &str = "infovis::notify";
    /// Computed column recomputation span.
    pub const RECOMPUTE: &str = "infovis::recompute";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core plumbing target.
    pub const CORE: &str = "infovis_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "infovis_core::signal";
    /// Change notification batching target.
    pub const NOTIFY: &str = "infovis_core::notify";
    /// Column storage and formatting target.
    pub const COLUMN: &str = "infovis::column";
    /// Table and row-set target.
    pub const TABLE: &str = "infovis::table";
    /// Tree structure target.
    pub const TREE: &str = "infovis::tree";
    /// Computed (dependent) column target.
    pub const COMPUTED: &str = "infovis::computed";
}

/// A guard that keeps a tracing span entered until it is dropped.
///
/// Used to time bulk operations such as full recomputation of a derived
/// column.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span for the named operation.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "infovis::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
