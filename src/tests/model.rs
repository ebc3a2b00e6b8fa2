use crate::reclaimer::{Reclaimer, GENERATIONS};

use std::sync::atomic::{AtomicBool, Ordering::Relaxed};
use std::sync::Mutex;

/// An observable state transition of a [`FakeReclaimer`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Event {
    Enabled,
    Disabled,
    Collected(usize),
}

/// [`FakeReclaimer`] models the host runtime's generational collector: a
/// global switch, per-tier allocation counters, and finalizers that run
/// synchronously inside [`Reclaimer::collect`].
///
/// Collecting a tier zeroes it and the tiers below it, and bumps the next
/// tier by one, the way the host runtime counts collections of the tier
/// below. Enable/disable record an [`Event`] only on an actual state change.
pub(crate) struct FakeReclaimer {
    enabled: AtomicBool,
    thresholds: [usize; GENERATIONS],
    counts: Mutex<[usize; GENERATIONS]>,
    events: Mutex<Vec<Event>>,
    finalizers: Mutex<Vec<Box<dyn FnOnce() + Send>>>,
}

impl FakeReclaimer {
    pub(crate) fn new(thresholds: [usize; GENERATIONS]) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            thresholds,
            counts: Mutex::new([0; GENERATIONS]),
            events: Mutex::new(Vec::new()),
            finalizers: Mutex::new(Vec::new()),
        }
    }

    /// Tracks `n` fresh allocations in the youngest tier.
    pub(crate) fn alloc(&self, n: usize) {
        self.counts.lock().unwrap()[0] += n;
    }

    /// Overrides the per-tier counters.
    pub(crate) fn set_counts(&self, counts: [usize; GENERATIONS]) {
        *self.counts.lock().unwrap() = counts;
    }

    /// Registers a one-shot finalizer to run during the next collection.
    pub(crate) fn add_finalizer(&self, finalizer: impl FnOnce() + Send + 'static) {
        self.finalizers.lock().unwrap().push(Box::new(finalizer));
    }

    /// Returns every state transition observed so far.
    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Returns the tier of every collection observed so far.
    pub(crate) fn collections(&self) -> Vec<usize> {
        self.events()
            .iter()
            .filter_map(|event| {
                if let Event::Collected(generation) = event {
                    Some(*generation)
                } else {
                    None
                }
            })
            .collect()
    }
}

impl Reclaimer for FakeReclaimer {
    fn disable(&self) {
        if self.enabled.swap(false, Relaxed) {
            self.events.lock().unwrap().push(Event::Disabled);
        }
    }

    fn enable(&self) {
        if !self.enabled.swap(true, Relaxed) {
            self.events.lock().unwrap().push(Event::Enabled);
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Relaxed)
    }

    fn counts(&self) -> [usize; GENERATIONS] {
        *self.counts.lock().unwrap()
    }

    fn collect(&self, generation: usize) {
        {
            let mut counts = self.counts.lock().unwrap();
            for tier in 0..=generation {
                counts[tier] = 0;
            }
            if generation + 1 < GENERATIONS {
                counts[generation + 1] += 1;
            }
        }
        self.events.lock().unwrap().push(Event::Collected(generation));

        // Finalizers run with no internal lock held: they may call back into
        // the gate, which reads the counters.
        let finalizers = std::mem::take(&mut *self.finalizers.lock().unwrap());
        for finalizer in finalizers {
            finalizer();
        }
    }

    fn thresholds(&self) -> [usize; GENERATIONS] {
        self.thresholds
    }
}
