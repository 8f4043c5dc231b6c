
use std::array;
use std::ffi::c_void;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::registry::TracingError;
use crate::types::{CallbackData, FunctionId, TracingCallback, FUNCTION_COUNT};

const MASK_WORDS: usize = FUNCTION_COUNT.div_ceil(32);

/// Observer registration: a callback entry point, an opaque user pointer
/// and a bitmask of the function ids the observer has opted into.
///
/// The callback and user pointer are fixed at creation; only the mask is
/// mutable. A handle may be enabled into the registry any number of times
/// across its life, but only once concurrently.
pub struct TracingHandle {
    callback: TracingCallback,
    user_data: *mut c_void,
    mask: [AtomicU32; MASK_WORDS],
}

// The callback contract requires `user_data` to stay valid on whichever
// thread delivers a notification; the registering client upholds this.
unsafe impl Send for TracingHandle {}
unsafe impl Sync for TracingHandle {}

impl TracingHandle {
    /// Creates a handle with an empty mask. The handle is not yet enabled.
    pub fn new(callback: TracingCallback, user_data: *mut c_void) -> Self {
        Self {
            callback,
            user_data,
            mask: array::from_fn(|_| AtomicU32::new(0)),
        }
    }

    #[inline]
    pub(crate) fn call(&self, fid: FunctionId, data: &CallbackData) {
        (self.callback)(fid, data, self.user_data);
    }

    /// Opts the handle in (or out) of notifications for `fid`.
    ///
    /// Takes effect on the next call that reads the mask. The edit is
    /// deliberately lock-free: racing against an in-flight call, it may or
    /// may not be observed by that call's exit notification.
    pub fn set_tracing_point(&self, fid: FunctionId, on: bool) {
        let (word, bit) = Self::locate(fid);
        if on {
            self.mask[word].fetch_or(bit, Ordering::Relaxed);
        } else {
            self.mask[word].fetch_and(!bit, Ordering::Relaxed);
        }
    }

    /// Raw-id variant of [`set_tracing_point`](Self::set_tracing_point)
    /// for callers mapping ids from an external surface.
    ///
    /// Fails with [`TracingError::InvalidArgument`] unless
    /// `id < FUNCTION_COUNT`.
    pub fn set_tracing_point_by_id(&self, id: u32, on: bool) -> Result<(), TracingError> {
        let fid = FunctionId::from_u32(id).ok_or(TracingError::InvalidArgument)?;
        self.set_tracing_point(fid, on);
        Ok(())
    }

    /// True iff the handle has opted into notifications for `fid`.
    #[inline]
    pub fn tracing_point(&self, fid: FunctionId) -> bool {
        let (word, bit) = Self::locate(fid);
        self.mask[word].load(Ordering::Relaxed) & bit != 0
    }

    #[inline]
    fn locate(fid: FunctionId) -> (usize, u32) {
        let id = fid as u32;
        ((id / 32) as usize, 1 << (id % 32))
    }
}
