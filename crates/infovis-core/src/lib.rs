//! Core plumbing for infovis.
//!
//! This crate provides the notification machinery shared by every data
//! structure in the `infovis` data model:
//!
//! - **Signal/Slot System**: Type-safe, synchronous observer dispatch
//! - **Change Notification**: Nestable disable/enable batching that
//!   coalesces many mutations into one [`ChangeDetail`]
//! - **Lazy Caches**: Values recomputed on demand after invalidation
//! - **Logging**: `tracing` targets for filtering subsystems
//!
//! Everything runs on the caller's thread. A mutation, the notification it
//! fires and every listener's reaction complete before the mutating call
//! returns.
//!
//! # Signal/Slot Example
//!
//! ```
//! use infovis_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Batching Example
//!
//! ```
//! use infovis_core::{ChangeDetail, ChangeNotifier};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let notifier = ChangeNotifier::new();
//! let events = Arc::new(AtomicUsize::new(0));
//! let events_clone = events.clone();
//! notifier.connect(move |_| {
//!     events_clone.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! notifier.disable_notify();
//! for row in 0..100 {
//!     notifier.fire(ChangeDetail::row(row));
//! }
//! notifier.enable_notify();
//!
//! assert_eq!(events.load(Ordering::SeqCst), 1);
//! ```

mod cache;
pub mod logging;
pub mod notify;
pub mod signal;

pub use cache::Cached;
pub use logging::PerfSpan;
pub use notify::{ChangeDetail, ChangeNotifier, NotifyBatch};
pub use signal::{ConnectionId, Signal};

static_assertions::assert_impl_all!(ChangeNotifier: Send, Sync);
static_assertions::assert_impl_all!(Signal<ChangeDetail>: Send, Sync);
