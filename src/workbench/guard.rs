//! Re-entrancy and staleness guards for workbench flows
//!
//! Each action class (build, submit, fetch, simulate) carries a [`BusyFlag`]:
//! a second request issued while one is outstanding is refused instead of
//! interleaved. A [`Generation`] counter lets a flow discard responses that
//! arrive after its target has changed, since in-flight external calls
//! cannot be cancelled.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

/// Atomic per-action busy flag
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    busy: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the flag, or refuse when an operation is already in flight
    ///
    /// The returned guard releases the flag on drop, so every exit path of
    /// an operation clears it.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Some(BusyGuard {
                busy: self.busy.clone(),
            })
        } else {
            None
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Relaxed)
    }
}

/// RAII guard holding a busy flag
#[derive(Debug)]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Monotonic counter identifying the current target of a flow
///
/// An operation captures the counter before suspending on an external call
/// and applies its result only if the counter is unchanged afterwards.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    current: Arc<AtomicU64>,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate all in-flight observations
    pub fn bump(&self) {
        self.current.fetch_add(1, Ordering::Relaxed);
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::Relaxed)
    }

    /// Whether an observation captured earlier is still current
    pub fn is_current(&self, observed: u64) -> bool {
        self.current() == observed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_flag_refuses_second_acquire() {
        let flag = BusyFlag::new();
        let guard = flag.try_acquire().unwrap();
        assert!(flag.is_busy());
        assert!(flag.try_acquire().is_none());

        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_acquire().is_some());
    }

    #[test]
    fn generation_detects_staleness() {
        let generation = Generation::new();
        let observed = generation.current();
        assert!(generation.is_current(observed));

        generation.bump();
        assert!(!generation.is_current(observed));
        assert!(generation.is_current(generation.current()));
    }
}
