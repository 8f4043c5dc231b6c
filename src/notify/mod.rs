
use std::cell::Cell;
use std::ffi::c_void;
use std::ptr;

use crate::registry::Tracing;
use crate::types::{CallbackData, FunctionId, Site, MAX_HANDLES};

thread_local! {
    // Set while the current thread is inside a traced call; suppresses
    // nested tracing when a callback re-enters a traced entry point.
    static TRACING_IN_PROGRESS: Cell<bool> = const { Cell::new(false) };
}

/// Brackets one traced call with its enter and exit notifications.
///
/// Every traced driver entry point constructs a tracer, calls
/// [`enter`](Self::enter) before the traced work and [`exit`](Self::exit)
/// after it. The tracer owns admission to the gate: if the thread is
/// already inside a traced call, tracing is disabled, or admission is lost
/// to a racing disable, both notifications are silently skipped and the
/// call runs untraced.
///
/// Between a successful enter and the matching exit the call holds a
/// client on the state word, which blocks every management operation.
/// Observers must therefore never call [`Tracing::enable`] and friends
/// from inside a callback; nested calls into *traced* entry points are
/// fine and run untraced on the same thread.
pub struct CallTracer<'a> {
    tracing: &'a Tracing,
    fid: FunctionId,
    data: Option<CallbackData>,
    scratch: [u64; MAX_HANDLES],
}

impl<'a> CallTracer<'a> {
    pub fn new(tracing: &'a Tracing, fid: FunctionId) -> Self {
        Self {
            tracing,
            fid,
            data: None,
            scratch: [0; MAX_HANDLES],
        }
    }

    /// Delivers the enter notification to every enabled handle whose mask
    /// selects this function id.
    ///
    /// `params` points at the shim's per-function parameter record; it must
    /// stay valid until [`exit`](Self::exit) returns.
    pub fn enter(&mut self, params: *const c_void) {
        debug_assert!(self.data.is_none());
        if TRACING_IN_PROGRESS.get() {
            return;
        }
        if !self.tracing.state().is_enabled() {
            return;
        }

        TRACING_IN_PROGRESS.set(true);
        if !self.tracing.state().add_client() {
            // Lost to a concurrent disable of the last handle.
            TRACING_IN_PROGRESS.set(false);
            return;
        }

        // Stored before the dispatch: if a callback panics mid-iteration,
        // Drop still sees the admitted call and releases it.
        let data = self.data.insert(CallbackData {
            site: Site::Enter,
            correlation_id: self.tracing.next_correlation_id(),
            correlation_data: ptr::null_mut(),
            function_name: self.fid.name(),
            function_params: params,
            function_return_value: ptr::null_mut(),
        });
        dispatch(self.tracing, self.fid, data, &mut self.scratch);
    }

    /// Delivers the exit notification and releases the call's client.
    ///
    /// A no-op unless [`enter`](Self::enter) was admitted. The notification
    /// reaches the same handles in the same slot order as the enter one,
    /// with the same correlation id and scratch words: the client held
    /// since enter keeps the table unchanged in between.
    pub fn exit(&mut self, return_value: *mut c_void) {
        let Some(data) = self.data.as_mut() else {
            return;
        };

        data.site = Site::Exit;
        data.function_return_value = return_value;
        dispatch(self.tracing, self.fid, data, &mut self.scratch);

        self.data = None;
        self.tracing.state().remove_client();
        TRACING_IN_PROGRESS.set(false);
    }
}

impl Drop for CallTracer<'_> {
    fn drop(&mut self) {
        // An admitted call that never reached `exit` (a callback panicked
        // through the shim) still has to release its client and clear the
        // guard, or the gate stays wedged for the rest of the process.
        if self.data.take().is_some() {
            self.tracing.state().remove_client();
            TRACING_IN_PROGRESS.set(false);
        }
    }
}

fn dispatch(tracing: &Tracing, fid: FunctionId, data: &mut CallbackData, scratch: &mut [u64; MAX_HANDLES]) {
    // SAFETY: the caller holds a client on the state word, which parks
    // every table mutator until the borrow ends.
    let handles = unsafe { tracing.handles() };
    for (slot, handle) in handles.iter().enumerate() {
        if handle.tracing_point(fid) {
            data.correlation_data = &mut scratch[slot];
            handle.call(fid, data);
        }
    }
}
