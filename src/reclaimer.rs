use std::sync::Arc;

/// The number of allocation tiers a [`Reclaimer`] tracks.
pub const GENERATIONS: usize = 3;

/// [`Reclaimer`] is the capability interface of the host runtime's
/// generational collector.
///
/// The underlying enable/disable switch and the per-tier allocation counters
/// are one process-global resource, hence all methods take `&self` and
/// implementations rely on interior mutability. The switch is observable and
/// mutable by arbitrary code outside the crate at any time; the gate corrects
/// for external interference but cannot prevent it.
pub trait Reclaimer {
    /// Turns automatic collection off; a no-op if already off.
    fn disable(&self);

    /// Turns automatic collection back on; a no-op if already on.
    fn enable(&self);

    /// Returns `true` if automatic collection is currently on.
    fn is_enabled(&self) -> bool;

    /// Returns the per-tier counts of tracked allocations since each tier was
    /// last collected.
    fn counts(&self) -> [usize; GENERATIONS];

    /// Synchronously collects the given tier and all younger tiers.
    ///
    /// Collection may run arbitrary finalizer code, which may re-enter the
    /// gate on the same thread.
    fn collect(&self, generation: usize);

    /// Returns the per-tier allocation counts at which each tier would
    /// normally be collected automatically.
    ///
    /// Queried once, when the gate is constructed.
    fn thresholds(&self) -> [usize; GENERATIONS];
}

impl<R: Reclaimer + ?Sized> Reclaimer for &R {
    fn disable(&self) {
        (**self).disable();
    }

    fn enable(&self) {
        (**self).enable();
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    fn counts(&self) -> [usize; GENERATIONS] {
        (**self).counts()
    }

    fn collect(&self, generation: usize) {
        (**self).collect(generation);
    }

    fn thresholds(&self) -> [usize; GENERATIONS] {
        (**self).thresholds()
    }
}

impl<R: Reclaimer + ?Sized> Reclaimer for Arc<R> {
    fn disable(&self) {
        (**self).disable();
    }

    fn enable(&self) {
        (**self).enable();
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    fn counts(&self) -> [usize; GENERATIONS] {
        (**self).counts()
    }

    fn collect(&self, generation: usize) {
        (**self).collect(generation);
    }

    fn thresholds(&self) -> [usize; GENERATIONS] {
        (**self).thresholds()
    }
}
