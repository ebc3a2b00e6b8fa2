use crate::exit_guard::ExitGuard;

use mcslock::raw::spins;
use portable_atomic::{AtomicUsize, Ordering::Relaxed};

/// [`ReentrantLock`] is a mutual-exclusion primitive that the thread already
/// holding it may re-acquire without deadlocking itself.
///
/// Re-entry is tracked through an owner token and a depth counter; the inner
/// MCS mutex is only acquired on the thread's 0 -> 1 depth transition, so a
/// callback running while the lock is held may lock it again on the same
/// thread.
pub(crate) struct ReentrantLock {
    /// Token of the thread currently inside [`Self::with`]; `0` when free.
    owner: AtomicUsize,
    /// Re-entry depth of the owning thread.
    depth: AtomicUsize,
    /// Serializes first entries across threads.
    mutex: spins::Mutex<()>,
}

impl ReentrantLock {
    /// Creates a new, unlocked [`ReentrantLock`].
    pub(crate) const fn new() -> Self {
        Self {
            owner: AtomicUsize::new(0),
            depth: AtomicUsize::new(0),
            mutex: spins::Mutex::new(()),
        }
    }

    /// Runs `f` with the lock held, re-acquiring it if the current thread
    /// already holds it.
    ///
    /// The lock is released when `f` returns, or when it unwinds.
    #[inline]
    pub(crate) fn with<R, F: FnOnce() -> R>(&self, f: F) -> R {
        // `owner` is only ever compared against the caller's own token, and a
        // thread can only observe its own token between installing and
        // clearing it, so relaxed loads suffice.
        let token = thread_token();
        if self.owner.load(Relaxed) == token {
            debug_assert!(self.depth.load(Relaxed) > 0);
            self.depth.fetch_add(1, Relaxed);
            let _balance = ExitGuard::new(self, |lock| {
                lock.depth.fetch_sub(1, Relaxed);
            });
            return f();
        }

        let mut node = spins::MutexNode::new();
        let _serialized = self.mutex.lock(&mut node);
        self.owner.store(token, Relaxed);
        self.depth.store(1, Relaxed);

        // Declared after `_serialized`: ownership must be relinquished while
        // the mutex is still held.
        let _balance = ExitGuard::new(self, |lock| {
            lock.depth.store(0, Relaxed);
            lock.owner.store(0, Relaxed);
        });
        f()
    }
}

/// Returns a non-zero token identifying the current thread.
///
/// The address of a thread-local is unique among live threads; a token may be
/// reused after its thread exits, which is harmless as the lock cannot outlive
/// a [`ReentrantLock::with`] scope.
fn thread_token() -> usize {
    thread_local! {
        static TOKEN: u8 = const { 0 };
    }
    TOKEN.with(|token| token as *const u8 as usize)
}
