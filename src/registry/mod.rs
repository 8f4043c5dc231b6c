
use std::cell::UnsafeCell;
use std::ffi::c_void;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::handle::TracingHandle;
use crate::state::TracingState;
use crate::types::{TracingCallback, MAX_HANDLES};

/// Errors surfaced by the management API.
///
/// The hot-path gate never fails: a call that loses admission simply runs
/// untraced, which is indistinguishable from tracing being off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TracingError {
    /// Unknown function id, duplicate enable, or disable of a handle that
    /// is not enabled.
    #[error("invalid argument")]
    InvalidArgument,
    /// Enable attempted with all handle slots occupied.
    #[error("out of resources")]
    OutOfResources,
    /// Allocation failure during handle creation.
    #[error("out of host memory")]
    OutOfMemory,
}

struct HandleTable(UnsafeCell<ArrayVec<Arc<TracingHandle>, MAX_HANDLES>>);

// Read by the hot path only while a client is admitted, written only at the
// quiescence point (locked, zero clients); the state word serializes every
// access. See `Tracing::handles`.
unsafe impl Sync for HandleTable {}

/// The tracing registry: the state word, the table of enabled handles and
/// the correlation counter.
///
/// Driver entry-point shims go through the process-wide [`HOST_TRACING`]
/// instance; tests construct private instances.
pub struct Tracing {
    state: TracingState,
    handles: HandleTable,
    correlation_id: AtomicU32,
}

/// Process-wide registry for driver entry-point shims.
pub static HOST_TRACING: Tracing = Tracing::new();

impl Tracing {
    pub const fn new() -> Self {
        Self {
            state: TracingState::new(),
            handles: HandleTable(UnsafeCell::new(ArrayVec::new_const())),
            correlation_id: AtomicU32::new(0),
        }
    }

    /// Inserts `handle` into the table of notified handles.
    ///
    /// The first insertion flips the enabled bit, so admission starts
    /// succeeding only once the table is populated. Fails with
    /// [`TracingError::InvalidArgument`] if the handle is already enabled
    /// and [`TracingError::OutOfResources`] if all slots are occupied.
    pub fn enable(&self, handle: &Arc<TracingHandle>) -> Result<(), TracingError> {
        self.state.lock();
        // Locked with zero clients, the table is ours to mutate.
        let table = unsafe { &mut *self.handles.0.get() };

        if table.iter().any(|h| Arc::ptr_eq(h, handle)) {
            self.state.unlock();
            return Err(TracingError::InvalidArgument);
        }
        if table.is_full() {
            self.state.unlock();
            return Err(TracingError::OutOfResources);
        }

        table.push(Arc::clone(handle));
        if table.len() == 1 {
            self.state.set_enabled();
        }
        let active = table.len();

        self.state.unlock();
        log::trace!("tracing handle enabled, {active} active");
        Ok(())
    }

    /// Removes `handle` from the table of notified handles.
    ///
    /// The last occupied slot is swapped into the vacated position to keep
    /// the table dense; slot indices are therefore not stable across
    /// disables. Removing the last handle clears the enabled bit. Fails
    /// with [`TracingError::InvalidArgument`] if the handle is not enabled.
    pub fn disable(&self, handle: &Arc<TracingHandle>) -> Result<(), TracingError> {
        self.state.lock();
        // Locked with zero clients, the table is ours to mutate.
        let table = unsafe { &mut *self.handles.0.get() };

        let Some(slot) = table.iter().position(|h| Arc::ptr_eq(h, handle)) else {
            self.state.unlock();
            return Err(TracingError::InvalidArgument);
        };

        table.swap_remove(slot);
        if table.is_empty() {
            self.state.clear_enabled();
        }
        let active = table.len();

        self.state.unlock();
        log::trace!("tracing handle disabled, {active} active");
        Ok(())
    }

    /// True iff the most recent completed management transition on `handle`
    /// was an enable.
    ///
    /// Takes the lock for the scan: an unsynchronized read could observe a
    /// mid-swap table state during a concurrent disable.
    pub fn is_enabled(&self, handle: &Arc<TracingHandle>) -> bool {
        self.state.lock();
        // Locked with zero clients, the table cannot change mid-scan.
        let table = unsafe { &*self.handles.0.get() };
        let enabled = table.iter().any(|h| Arc::ptr_eq(h, handle));
        self.state.unlock();
        enabled
    }

    pub(crate) fn state(&self) -> &TracingState {
        &self.state
    }

    /// Allocates the next per-call correlation id. Wraps modulo 2³².
    pub(crate) fn next_correlation_id(&self) -> u32 {
        self.correlation_id.fetch_add(1, Ordering::Relaxed)
    }

    /// The dense prefix of enabled handles, in slot order.
    ///
    /// # Safety
    ///
    /// The caller must either have a client admitted on the state word or
    /// hold its lock; both keep every table mutator out until the borrow
    /// ends.
    pub(crate) unsafe fn handles(&self) -> &[Arc<TracingHandle>] {
        &*self.handles.0.get()
    }

    #[cfg(test)]
    pub(crate) fn state_raw(&self) -> u32 {
        self.state.raw()
    }

    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> Vec<*const TracingHandle> {
        self.state.lock();
        // Locked with zero clients, the table cannot change mid-scan.
        let table = unsafe { &*self.handles.0.get() };
        let slots = table.iter().map(|h| Arc::as_ptr(h)).collect();
        self.state.unlock();
        slots
    }
}

impl Default for Tracing {
    fn default() -> Self {
        Self::new()
    }
}

/// Constructs a tracing handle around `callback` and `user_data`.
///
/// The handle starts with an empty mask and is not enabled. Dropping every
/// clone of the returned `Arc` destroys it; a handle must be disabled
/// before its last clone is dropped, or the registry's clone keeps it
/// alive (and firing) until [`Tracing::disable`].
pub fn create_tracing_handle(callback: TracingCallback, user_data: *mut c_void) -> Arc<TracingHandle> {
    let handle = Arc::new(TracingHandle::new(callback, user_data));
    log::trace!("tracing handle created");
    handle
}
