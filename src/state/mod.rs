
use std::hint::spin_loop;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

const ENABLED_BIT: u32 = 1 << 31;
const LOCKED_BIT: u32 = 1 << 30;
const CLIENT_MASK: u32 = LOCKED_BIT - 1;

/// Polite spin for the admission and lock retry loops: an exponential run
/// of CPU pauses doubling up to [`Self::LOOPS_BEFORE_YIELD`], then an OS
/// yield per pause.
pub(crate) struct AtomicBackoff {
    count: u32,
}

impl AtomicBackoff {
    const LOOPS_BEFORE_YIELD: u32 = 16;

    pub fn new() -> Self {
        Self { count: 1 }
    }

    pub fn pause(&mut self) {
        if self.count < Self::LOOPS_BEFORE_YIELD {
            for _ in 0..self.count {
                spin_loop();
            }
            self.count *= 2;
        } else {
            thread::yield_now();
        }
    }
}

// [XYZZ..Z] - { X - enabled/disabled bit, Y - locked/unlocked bit, ZZ..Z - client count bits }
pub(crate) struct TracingState(AtomicU32);

impl TracingState {
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Hot-path fast-exit check: set iff the handle table is non-empty.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Acquire) & ENABLED_BIT != 0
    }

    /// Admits one client by incrementing the client count, provided tracing
    /// is enabled and no management operation holds the lock.
    ///
    /// Returns false if tracing was turned off between the initial load and
    /// the exchange. A locked state is waited out: the count must be zero
    /// while the lock is held, so the retry candidate only clears the bit.
    pub fn add_client(&self) -> bool {
        let mut state = self.0.load(Ordering::Acquire);
        state = (state | ENABLED_BIT) & !LOCKED_BIT;
        let mut backoff = AtomicBackoff::new();
        loop {
            match self
                .0
                .compare_exchange_weak(state, state + 1, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return true,
                Err(observed) => {
                    if observed & ENABLED_BIT == 0 {
                        return false;
                    }
                    if observed & LOCKED_BIT != 0 {
                        debug_assert_eq!(observed & CLIENT_MASK, 0);
                        state = observed & !LOCKED_BIT;
                    } else {
                        state = observed;
                    }
                    backoff.pause();
                }
            }
        }
    }

    /// Releases one admitted client.
    ///
    /// No exchange loop is needed: the lock cannot be taken while the count
    /// is non-zero and the enabled bit cannot change without the lock, so a
    /// plain decrement is the only transition that can happen here.
    pub fn remove_client(&self) {
        debug_assert!(self.0.load(Ordering::Acquire) & ENABLED_BIT != 0);
        debug_assert!(self.0.load(Ordering::Acquire) & LOCKED_BIT == 0);
        debug_assert!(self.0.load(Ordering::Acquire) & CLIENT_MASK != 0);
        self.0.fetch_sub(1, Ordering::AcqRel);
    }

    /// Takes the management lock, waiting out every admitted client.
    ///
    /// The exchange only succeeds against an unlocked state with a zero
    /// client count; once it does, no new admission can succeed and no
    /// prior admission is still live, so the handle table is safe to
    /// mutate until [`Self::unlock`].
    pub fn lock(&self) {
        let mut state = self.0.load(Ordering::Acquire) & ENABLED_BIT;
        let mut backoff = AtomicBackoff::new();
        while let Err(observed) =
            self.0
                .compare_exchange_weak(state, state | LOCKED_BIT, Ordering::AcqRel, Ordering::Acquire)
        {
            state = observed & ENABLED_BIT;
            backoff.pause();
        }
        debug_assert!(self.0.load(Ordering::Acquire) & LOCKED_BIT != 0);
        debug_assert!(self.0.load(Ordering::Acquire) & CLIENT_MASK == 0);
    }

    pub fn unlock(&self) {
        debug_assert!(self.0.load(Ordering::Acquire) & LOCKED_BIT != 0);
        debug_assert!(self.0.load(Ordering::Acquire) & CLIENT_MASK == 0);
        self.0.fetch_and(!LOCKED_BIT, Ordering::AcqRel);
    }

    /// Flips the enabled bit. Callers must hold the lock.
    pub fn set_enabled(&self) {
        debug_assert!(self.0.load(Ordering::Acquire) & LOCKED_BIT != 0);
        self.0.fetch_or(ENABLED_BIT, Ordering::AcqRel);
    }

    /// Clears the enabled bit. Callers must hold the lock.
    pub fn clear_enabled(&self) {
        debug_assert!(self.0.load(Ordering::Acquire) & LOCKED_BIT != 0);
        self.0.fetch_and(!ENABLED_BIT, Ordering::AcqRel);
    }

    #[cfg(test)]
    pub fn raw(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }
}
