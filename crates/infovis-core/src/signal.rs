//! Synchronous signal/slot dispatch.
//!
//! A [`Signal<Args>`] fans one event out to every connected closure, in the
//! order they were connected, on the thread that calls [`Signal::emit`].
//! Nothing is queued: a mutation, its notification and every listener's
//! reaction finish before the mutating call returns.
//!
//! The slot table is copied before delivery and unlocked while slots run,
//! so a slot may connect or disconnect slots on the signal currently
//! invoking it. Such edits apply from the next emission on.
//!
//! ```
//! use infovis_core::Signal;
//!
//! let row_added = Signal::<usize>::new();
//! let id = row_added.connect(|row| println!("row {row} is live"));
//!
//! row_added.emit(3);
//! assert!(row_added.disconnect(id));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// Handle to one connected slot, returned by [`Signal::connect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Observer list for events carrying `Args`.
///
/// Columns, tables and trees embed signals and expose them so listeners can
/// subscribe. `Args` is usually a row index, a column name or a
/// [`ChangeDetail`](crate::ChangeDetail).
pub struct Signal<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// An unblocked signal without slots.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Add `slot` after the existing slots.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.slots.lock().insert(Arc::new(slot))
    }

    /// Remove a slot. Returns `false` if `id` was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    /// Number of live slots.
    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Whether `id` still names a live slot.
    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.slots.lock().contains_key(id)
    }

    /// Drop emissions while `blocked` is set.
    ///
    /// Dropped emissions are not replayed; use a
    /// [`ChangeNotifier`](crate::ChangeNotifier) batch to defer and coalesce
    /// them instead.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Whether emissions are currently dropped.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Deliver `args` to every slot connected at the time of the call.
    #[tracing::instrument(skip_all, target = "infovis_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "blocked, emission dropped");
            return;
        }

        let snapshot: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, slots = snapshot.len(), "emitting");
        for slot in snapshot {
            slot(&args);
        }
    }
}
