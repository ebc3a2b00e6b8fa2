//! A minimal scope-exit callback, in the spirit of
//! [`scopeguard`](https://crates.io/crates/scopeguard).

/// [`ExitGuard`] captures a value and hands it to the supplied closure at the
/// end of the scope, whether the scope is left normally or by unwinding.
pub(crate) struct ExitGuard<T, F: FnOnce(T)> {
    state: Option<(T, F)>,
}

impl<T, F: FnOnce(T)> ExitGuard<T, F> {
    /// Creates a new [`ExitGuard`] around the captured value.
    #[inline]
    pub(crate) fn new(captured: T, exit_callback: F) -> Self {
        Self {
            state: Some((captured, exit_callback)),
        }
    }
}

impl<T, F: FnOnce(T)> Drop for ExitGuard<T, F> {
    #[inline]
    fn drop(&mut self) {
        if let Some((captured, exit_callback)) = self.state.take() {
            exit_callback(captured);
        }
    }
}
