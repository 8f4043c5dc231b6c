//! Host-side API tracing for an OpenCL-like compute runtime driver.
//!
//! Observers register a callback through a [`registry::Tracing`] instance,
//! opt the resulting handle into specific entry points, and receive a
//! structured [`types::CallbackData`] record immediately before and after
//! every selected call. Admission to the hot path is lock-free: a single
//! atomic state word multiplexes an enabled bit, a management lock bit and
//! a count of in-flight calls, so an idle gate costs one atomic load per
//! traced call and an untraced process pays nothing else.
//!
//! ## Example
//!
//! Trace `clCreateContext` from a callback that itself re-enters the traced
//! API. The nested call is suppressed by the per-thread reentrancy guard,
//! so exactly one enter/exit pair is observed.
//!
//! ```rust
//! use std::ffi::c_void;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! use host_tracing::notify::CallTracer;
//! use host_tracing::registry::{create_tracing_handle, Tracing};
//! use host_tracing::types::{CallbackData, FunctionId};
//!
//! // A stand-in for a generated driver entry point: the shim brackets the
//! // traced work with one CallTracer.
//! fn create_context(tracing: &Tracing) -> i32 {
//!     let mut tracer = CallTracer::new(tracing, FunctionId::CreateContext);
//!     let params = (); // per-function parameter record, owned by the shim
//!     tracer.enter(&params as *const _ as *const c_void);
//!     let mut ret = 0i32; // the traced work would go here
//!     tracer.exit(&mut ret as *mut _ as *mut c_void);
//!     ret
//! }
//!
//! struct Observer {
//!     tracing: *const Tracing,
//!     notified: AtomicU32,
//! }
//!
//! fn callback(_fid: FunctionId, data: &CallbackData, user_data: *mut c_void) {
//!     let observer = unsafe { &*(user_data as *const Observer) };
//!     observer.notified.fetch_add(1, Ordering::Relaxed);
//!     println!("{} ({:?})", data.function_name, data.site);
//!     // Re-entering the traced API from a callback is legal: the nested
//!     // call runs untraced instead of recursing into the gate.
//!     create_context(unsafe { &*observer.tracing });
//! }
//!
//! let tracing = Tracing::new();
//! let observer = Observer {
//!     tracing: &tracing,
//!     notified: AtomicU32::new(0),
//! };
//!
//! let handle = create_tracing_handle(callback, &observer as *const _ as *mut c_void);
//! handle.set_tracing_point(FunctionId::CreateContext, true);
//!
//! tracing.enable(&handle).unwrap();
//! create_context(&tracing);
//! tracing.disable(&handle).unwrap();
//!
//! // One enter and one exit; the nested calls produced no notifications.
//! assert_eq!(observer.notified.load(Ordering::Relaxed), 2);
//! ```

pub mod handle;
pub mod notify;
pub mod registry;
mod state;
pub mod types;
