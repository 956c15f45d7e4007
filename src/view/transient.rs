use tokio::task::AbortHandle;

/// A value shown for a bounded time.
///
/// Every `set` starts a new generation. A scheduled clear carries the
/// generation it was scheduled for and only clears if nothing was set since,
/// so an old timer can never blank a newer value.
#[derive(Debug)]
pub struct TransientSlot<T> {
    value: Option<T>,
    generation: u64,
    pending: Option<AbortHandle>,
}

impl<T> Default for TransientSlot<T> {
    fn default() -> Self {
        Self {
            value: None,
            generation: 0,
            pending: None,
        }
    }
}

impl<T> TransientSlot<T> {
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Store `value` and return the generation a clear must present
    pub fn set(&mut self, value: T) -> u64 {
        self.generation += 1;
        self.value = Some(value);
        self.generation
    }

    /// Compare-and-clear
    pub fn clear_if_current(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.value.is_none() {
            return false;
        }
        self.value = None;
        self.pending = None;
        true
    }

    /// Track the clear task for the current generation, cancelling the one it supersedes
    pub fn arm(&mut self, timer: AbortHandle) {
        if let Some(previous) = self.pending.replace(timer) {
            previous.abort();
        }
    }
}

impl<T> Drop for TransientSlot<T> {
    fn drop(&mut self) {
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }
    }
}
