//! Fault boundary for public entry points
//!
//! The bridge is driven by an external host (and queried by an external
//! stack) that must never see the process die underneath it. Every public
//! entry point runs inside [`guard`], which turns a panic into
//! `Error::FaultRecovered`.
//!
//! This relies on unwinding; a build with `panic = "abort"` loses the
//! boundary.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::error;

use crate::error::{Error, Result};

/// Run `f`, converting a panic into `Error::FaultRecovered`
///
/// `operation` names the entry point in the log line and error message.
pub fn guard<T>(operation: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    // Shared state behind the closures is only replaced by whole-value
    // assignment, so observing it after an unwind is sound.
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("PANIC in {}: {}", operation, message);
            Err(Error::fault(format!("panic in {}: {}", operation, message)))
        }
    }
}

/// Best-effort text of a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
