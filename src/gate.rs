use crate::reclaimer::{Reclaimer, GENERATIONS};
use crate::remutex::ReentrantLock;

use core::fmt::{self, Debug, Formatter};
use portable_atomic::{AtomicUsize, Ordering::Relaxed};

/// [`GcGate`] is a reentrant, thread-safe gate over a [`Reclaimer`]'s
/// enable/disable switch.
///
/// The gate keeps the reclaimer disabled for the union of all outstanding
/// suspensions across all threads, re-enabling it exactly when the last one is
/// released. Suspensions may nest on one thread, overlap across threads, and
/// be acquired from finalizer code the reclaimer runs synchronously.
///
/// Long-lived suspensions are kept from ballooning the heap by a bounded
/// anti-starvation heuristic: when the youngest tier has outgrown its
/// threshold at entry, the gate collects it, and once the next tier has
/// outgrown its own threshold as well, the gate pays for one full collection
/// pass instead.
///
/// A process has one gate per reclaimer, constructed before first use and
/// never torn down. Exiting the process with suspensions outstanding leaves
/// the reclaimer disabled, which is acceptable.
pub struct GcGate<R: Reclaimer> {
    runtime: R,
    lock: ReentrantLock,
    counter: AtomicUsize,
    gen0_threshold: usize,
    gen1_threshold: usize,
}

impl<R: Reclaimer> GcGate<R> {
    /// Creates a new [`GcGate`] governing `runtime`.
    ///
    /// The runtime's collection thresholds are captured here, once, and never
    /// re-read.
    pub fn new(runtime: R) -> Self {
        let [gen0_threshold, gen1_threshold, _] = runtime.thresholds();
        Self {
            runtime,
            lock: ReentrantLock::new(),
            counter: AtomicUsize::new(0),
            gen0_threshold,
            gen1_threshold,
        }
    }

    /// Suspends the reclaimer until the matching [`exit`](Self::exit).
    ///
    /// The reclaimer is disabled unconditionally, even if a previous entry
    /// already disabled it, correcting for any external re-enable in the
    /// meantime. Prefer [`suspend`](Self::suspend) or
    /// [`with_suspended`](Self::with_suspended), which pair the calls on
    /// every exit path.
    pub fn enter(&self) {
        // The counter is bumped and the lock held before anything that can
        // run finalizer code, so a re-entrant call observes consistent state.
        self.lock.with(|| {
            let outstanding = self.counter.fetch_add(1, Relaxed) + 1;

            // Unconditionally: external code may have re-enabled the runtime
            // since a previous entry disabled it.
            self.runtime.disable();

            let [gen0, gen1, _] = self.runtime.counts();
            if gen0 > self.gen0_threshold {
                if gen1 > self.gen1_threshold {
                    // Suspending the youngest tier for long stretches also
                    // starves the older tiers; pay for one full pass.
                    log::debug!("full anti-starvation collection (gen0={gen0}, gen1={gen1})");
                    self.runtime.enable();
                    self.runtime.collect(GENERATIONS - 1);
                    self.runtime.disable();
                } else {
                    log::debug!("collecting the youngest tier (gen0={gen0})");
                    self.runtime.collect(0);
                }
            }
            log::trace!("reclaimer suspended (outstanding={outstanding})");
        });
    }

    /// Releases one suspension, re-enabling the reclaimer if it was the last
    /// outstanding one across all threads.
    ///
    /// # Panics
    ///
    /// Panics if called without a matching [`enter`](Self::enter); silently
    /// absorbing the imbalance could leave the reclaimer permanently
    /// misconfigured.
    pub fn exit(&self) {
        self.lock.with(|| {
            let outstanding = self.counter.load(Relaxed);
            assert!(
                outstanding > 0,
                "reclaimer suspension released more times than acquired"
            );
            self.counter.store(outstanding - 1, Relaxed);
            if outstanding == 1 {
                self.runtime.enable();
            }
            log::trace!("reclaimer suspension released (outstanding={})", outstanding - 1);
        });
    }

    /// Suspends the reclaimer for the lifetime of the returned guard.
    pub fn suspend(&self) -> Suspension<'_, R> {
        self.enter();
        Suspension { gate: self }
    }

    /// Runs `work` with the reclaimer suspended.
    ///
    /// The suspension is released on every exit path; a panic raised by
    /// `work` propagates after the release.
    pub fn with_suspended<T, F: FnOnce() -> T>(&self, work: F) -> T {
        let _suspension = self.suspend();
        work()
    }

    /// Returns the number of currently outstanding suspensions.
    ///
    /// Other threads may enter or exit concurrently; the value is a snapshot.
    pub fn suspensions(&self) -> usize {
        self.counter.load(Relaxed)
    }

    /// Returns the governed runtime.
    pub fn runtime(&self) -> &R {
        &self.runtime
    }
}

impl<R: Reclaimer> Debug for GcGate<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcGate")
            .field("suspensions", &self.counter.load(Relaxed))
            .field("gen0_threshold", &self.gen0_threshold)
            .field("gen1_threshold", &self.gen1_threshold)
            .finish()
    }
}

/// [`Suspension`] keeps the reclaimer suspended for its lifetime.
///
/// Dropping it releases the suspension, on normal scope exit as well as on
/// unwinding.
#[must_use = "the reclaimer may be re-enabled as soon as the suspension is dropped"]
pub struct Suspension<'g, R: Reclaimer> {
    gate: &'g GcGate<R>,
}

impl<R: Reclaimer> Drop for Suspension<'_, R> {
    #[inline]
    fn drop(&mut self) {
        self.gate.exit();
    }
}
