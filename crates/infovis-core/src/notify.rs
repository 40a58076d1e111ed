//! Change notification with nestable batching.
//!
//! Every mutable data structure owns a [`ChangeNotifier`]. Mutations report a
//! [`ChangeDetail`] through [`ChangeNotifier::fire`]. Outside a batch the
//! detail is delivered to listeners immediately; inside a batch opened with
//! [`ChangeNotifier::disable_notify`] details are merged and delivered once,
//! when the matching [`ChangeNotifier::enable_notify`] brings the nesting
//! depth back to zero.
//!
//! # Example
//!
//! ```
//! use infovis_core::{ChangeDetail, ChangeNotifier};
//!
//! let notifier = ChangeNotifier::new();
//! notifier.connect(|detail| println!("changed: {detail:?}"));
//!
//! {
//!     let _batch = notifier.batch();
//!     notifier.fire(ChangeDetail::row(1));
//!     notifier.fire(ChangeDetail::row(4));
//! } // one event: Rows({1, 4})
//! ```

use std::collections::BTreeSet;

use parking_lot::Mutex;

use crate::logging::{span_names, targets, PerfSpan};
use crate::signal::{ConnectionId, Signal};

/// Describes which part of a structure changed.
///
/// Details form a coverage lattice used when coalescing batched changes:
/// `None` covers nothing, `Rows` covers the listed rows, `SizeChanged`
/// covers rows appended or truncated, and `All` covers everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChangeDetail {
    /// Nothing changed.
    #[default]
    None,
    /// The number of rows changed.
    SizeChanged,
    /// Anything may have changed.
    All,
    /// Values at the listed rows changed.
    Rows(BTreeSet<usize>),
}

impl ChangeDetail {
    /// A change limited to a single row.
    pub fn row(row: usize) -> Self {
        Self::Rows(BTreeSet::from([row]))
    }

    /// A change limited to the given rows.
    pub fn rows<I: IntoIterator<Item = usize>>(rows: I) -> Self {
        let rows: BTreeSet<usize> = rows.into_iter().collect();
        if rows.is_empty() {
            Self::None
        } else {
            Self::Rows(rows)
        }
    }

    /// Returns `true` if nothing changed.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns `true` if the change may touch `row`.
    ///
    /// `SizeChanged` is reported as covering every row since the detail does
    /// not carry the old and new sizes.
    pub fn covers(&self, row: usize) -> bool {
        match self {
            Self::None => false,
            Self::SizeChanged | Self::All => true,
            Self::Rows(rows) => rows.contains(&row),
        }
    }

    /// Merge two details into one covering both.
    pub fn merge(self, other: ChangeDetail) -> ChangeDetail {
        match (self, other) {
            (Self::None, other) | (other, Self::None) => other,
            (Self::All, _) | (_, Self::All) => Self::All,
            (Self::SizeChanged, Self::SizeChanged) => Self::SizeChanged,
            (Self::SizeChanged, Self::Rows(_)) | (Self::Rows(_), Self::SizeChanged) => Self::All,
            (Self::Rows(mut a), Self::Rows(b)) => {
                a.extend(b);
                Self::Rows(a)
            }
        }
    }
}

#[derive(Debug, Default)]
struct BatchState {
    depth: usize,
    pending: ChangeDetail,
    revision: u64,
}

/// Fan-out of [`ChangeDetail`] events with disable/enable batching.
///
/// The disable counter nests: `disable_notify` twice requires
/// `enable_notify` twice before the coalesced event is delivered. The
/// counter is a reentrancy device, not a lock.
pub struct ChangeNotifier {
    state: Mutex<BatchState>,
    changed: Signal<ChangeDetail>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    /// Create a notifier with no listeners and notification enabled.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BatchState::default()),
            changed: Signal::new(),
        }
    }

    /// The underlying signal delivering coalesced details.
    pub fn signal(&self) -> &Signal<ChangeDetail> {
        &self.changed
    }

    /// Register a change listener.
    pub fn connect<F>(&self, listener: F) -> ConnectionId
    where
        F: Fn(&ChangeDetail) + Send + Sync + 'static,
    {
        self.changed.connect(listener)
    }

    /// Unregister a change listener.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.changed.disconnect(id)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.changed.connection_count()
    }

    /// Open (or nest) a batch. Changes accumulate until the batch closes.
    pub fn disable_notify(&self) {
        let mut state = self.state.lock();
        state.depth += 1;
        tracing::trace!(target: targets::NOTIFY, depth = state.depth, "notification disabled");
    }

    /// Close one level of batching.
    ///
    /// When the depth returns to zero and anything changed, exactly one
    /// event carrying the merged detail is delivered. Returns `true` if an
    /// event was delivered.
    pub fn enable_notify(&self) -> bool {
        let pending = {
            let mut state = self.state.lock();
            if state.depth == 0 {
                tracing::warn!(
                    target: targets::NOTIFY,
                    "enable_notify without matching disable_notify"
                );
                return false;
            }
            state.depth -= 1;
            if state.depth > 0 {
                return false;
            }
            std::mem::take(&mut state.pending)
        };

        if pending.is_none() {
            return false;
        }
        let _span = PerfSpan::new(span_names::NOTIFY);
        tracing::trace!(target: targets::NOTIFY, detail = ?pending, "flushing batched change");
        self.changed.emit(pending);
        true
    }

    /// Returns `true` when no batch is open.
    pub fn is_notify_enabled(&self) -> bool {
        self.state.lock().depth == 0
    }

    /// Current batch nesting depth.
    pub fn depth(&self) -> usize {
        self.state.lock().depth
    }

    /// The detail accumulated by the open batch so far.
    pub fn pending(&self) -> ChangeDetail {
        self.state.lock().pending.clone()
    }

    /// Number of changes reported so far, batched or not.
    ///
    /// Readers caching derived state compare revisions to notice changes
    /// still held back by an open batch.
    pub fn revision(&self) -> u64 {
        self.state.lock().revision
    }

    /// Report a change.
    ///
    /// Delivered synchronously when no batch is open, merged into the
    /// pending detail otherwise. `ChangeDetail::None` is never delivered.
    pub fn fire(&self, detail: ChangeDetail) {
        if detail.is_none() {
            return;
        }
        {
            let mut state = self.state.lock();
            state.revision += 1;
            if state.depth > 0 {
                let pending = std::mem::take(&mut state.pending);
                state.pending = pending.merge(detail);
                return;
            }
        }
        self.changed.emit(detail);
    }

    /// Open a batch closed automatically when the guard is dropped.
    pub fn batch(&self) -> NotifyBatch<'_> {
        self.disable_notify();
        NotifyBatch { notifier: self }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ChangeNotifier")
            .field("depth", &state.depth)
            .field("pending", &state.pending)
            .field("listeners", &self.changed.connection_count())
            .finish()
    }
}

/// RAII guard returned by [`ChangeNotifier::batch`].
#[must_use = "the batch closes as soon as the guard is dropped"]
pub struct NotifyBatch<'a> {
    notifier: &'a ChangeNotifier,
}

impl Drop for NotifyBatch<'_> {
    fn drop(&mut self) {
        self.notifier.enable_notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recording(notifier: &ChangeNotifier) -> Arc<Mutex<Vec<ChangeDetail>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        notifier.connect(move |detail| events_clone.lock().push(detail.clone()));
        events
    }

    #[test]
    fn test_fire_outside_batch_is_immediate() {
        let notifier = ChangeNotifier::new();
        let events = recording(&notifier);

        notifier.fire(ChangeDetail::row(3));
        assert_eq!(*events.lock(), vec![ChangeDetail::row(3)]);

        notifier.fire(ChangeDetail::SizeChanged);
        assert_eq!(events.lock().len(), 2);
    }

    #[test]
    fn test_none_is_never_delivered() {
        let notifier = ChangeNotifier::new();
        let events = recording(&notifier);

        notifier.fire(ChangeDetail::None);
        notifier.disable_notify();
        assert!(!notifier.enable_notify());
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_nested_batch_fires_once() {
        let notifier = ChangeNotifier::new();
        let events = recording(&notifier);

        notifier.disable_notify();
        notifier.fire(ChangeDetail::row(1));
        notifier.disable_notify();
        notifier.fire(ChangeDetail::row(5));
        assert!(!notifier.enable_notify());
        assert!(events.lock().is_empty());
        assert_eq!(notifier.depth(), 1);
        notifier.fire(ChangeDetail::row(2));
        assert!(notifier.enable_notify());

        assert_eq!(*events.lock(), vec![ChangeDetail::rows([1, 2, 5])]);
        assert!(notifier.is_notify_enabled());
    }

    #[test]
    fn test_batch_guard() {
        let notifier = ChangeNotifier::new();
        let events = recording(&notifier);

        {
            let _batch = notifier.batch();
            notifier.fire(ChangeDetail::row(0));
            notifier.fire(ChangeDetail::SizeChanged);
            assert_eq!(notifier.pending(), ChangeDetail::All);
        }

        assert_eq!(*events.lock(), vec![ChangeDetail::All]);
    }

    #[test]
    fn test_revision_counts_batched_changes() {
        let notifier = ChangeNotifier::new();
        notifier.fire(ChangeDetail::None);
        assert_eq!(notifier.revision(), 0);

        let _batch = notifier.batch();
        notifier.fire(ChangeDetail::row(1));
        notifier.fire(ChangeDetail::row(1));
        assert_eq!(notifier.revision(), 2);
    }

    #[test]
    fn test_unbalanced_enable_is_ignored() {
        let notifier = ChangeNotifier::new();
        assert!(!notifier.enable_notify());
        assert_eq!(notifier.depth(), 0);
    }

    #[test]
    fn test_merge_rules() {
        use ChangeDetail::*;
        assert_eq!(None.merge(SizeChanged), SizeChanged);
        assert_eq!(ChangeDetail::row(1).merge(None), ChangeDetail::row(1));
        assert_eq!(All.merge(ChangeDetail::row(1)), All);
        assert_eq!(SizeChanged.merge(SizeChanged), SizeChanged);
        assert_eq!(SizeChanged.merge(ChangeDetail::row(2)), All);
        assert_eq!(
            ChangeDetail::rows([1, 3]).merge(ChangeDetail::rows([2, 3])),
            ChangeDetail::rows([1, 2, 3])
        );
    }

    #[test]
    fn test_covers() {
        assert!(!ChangeDetail::None.covers(0));
        assert!(ChangeDetail::All.covers(99));
        assert!(ChangeDetail::rows([4, 8]).covers(8));
        assert!(!ChangeDetail::rows([4, 8]).covers(5));
        assert_eq!(ChangeDetail::rows(Vec::new()), ChangeDetail::None);
    }

    #[test]
    fn test_listener_may_fire_reentrantly() {
        let notifier = Arc::new(ChangeNotifier::new());
        let events = recording(&notifier);

        let weak = Arc::downgrade(&notifier);
        notifier.connect(move |detail| {
            if *detail == ChangeDetail::row(1) {
                if let Some(notifier) = weak.upgrade() {
                    notifier.fire(ChangeDetail::row(2));
                }
            }
        });

        notifier.fire(ChangeDetail::row(1));
        assert_eq!(
            *events.lock(),
            vec![ChangeDetail::row(1), ChangeDetail::row(2)]
        );
    }
}
