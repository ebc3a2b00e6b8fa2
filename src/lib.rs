//! # gc-gate
//! a reentrant, thread-safe gate for suspending a generational garbage
//! collector without starving it.
//!
//! [`GcGate`] wraps the enable/disable switch of a host runtime's collector
//! (abstracted as the [`Reclaimer`] capability) behind a process-wide
//! reference count: the collector stays off for the union of all outstanding
//! suspensions across all threads, and is turned back on exactly when the
//! last one is released. Suspensions may nest, overlap across threads, and be
//! acquired from finalizer code the collector runs synchronously, without
//! deadlocking.
//!
//! Suspending collection indefinitely would let the youngest allocation tier
//! grow without bound and, indirectly, starve the older tiers. Each entry
//! therefore applies a bounded anti-starvation heuristic against the
//! thresholds captured at construction: collect the youngest tier once it has
//! outgrown its threshold, and pay for one full collection pass in the rare
//! case the next tier has outgrown its own threshold too.
//!
//! A process constructs one gate per reclaimer, before first use, and shares
//! it (for instance through an `Arc` or a `static`); the gate is never torn
//! down.
//!
//! # Examples
//!
//! ```
//! use gc_gate::{GcGate, Reclaimer, GENERATIONS};
//!
//! use std::sync::atomic::{AtomicBool, Ordering::Relaxed};
//!
//! /// Switch of a runtime whose collection is driven from elsewhere.
//! struct Switch {
//!     enabled: AtomicBool,
//! }
//!
//! impl Reclaimer for Switch {
//!     fn disable(&self) {
//!         self.enabled.store(false, Relaxed);
//!     }
//!     fn enable(&self) {
//!         self.enabled.store(true, Relaxed);
//!     }
//!     fn is_enabled(&self) -> bool {
//!         self.enabled.load(Relaxed)
//!     }
//!     fn counts(&self) -> [usize; GENERATIONS] {
//!         [0; GENERATIONS]
//!     }
//!     fn collect(&self, _generation: usize) {}
//!     fn thresholds(&self) -> [usize; GENERATIONS] {
//!         [700, 10, 10]
//!     }
//! }
//!
//! let gate = GcGate::new(Switch {
//!     enabled: AtomicBool::new(true),
//! });
//!
//! {
//!     let _suspension = gate.suspend();
//!     assert!(!gate.runtime().is_enabled());
//!
//!     // Nested acquisition keeps the runtime suspended.
//!     gate.with_suspended(|| assert!(!gate.runtime().is_enabled()));
//!     assert!(!gate.runtime().is_enabled());
//! }
//!
//! assert!(gate.runtime().is_enabled());
//! ```

mod exit_guard;

mod gate;
pub use gate::GcGate;
pub use gate::Suspension;

mod reclaimer;
pub use reclaimer::Reclaimer;
pub use reclaimer::GENERATIONS;

mod remutex;
