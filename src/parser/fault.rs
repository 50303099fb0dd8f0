// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fault barrier around untrusted parser calls
//!
//! `guard` turns a panic inside the closure into a `Fault` value. The
//! surrounding code only ever sees a plain `Result`.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

thread_local! {
    static IN_BARRIER: Cell<bool> = const { Cell::new(false) };
}

/// A panic caught by [`guard`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{detail}")]
pub struct Fault {
    pub detail: String,
}

/// Run `f`, converting a panic into a `Fault`.
pub fn guard<T>(f: impl FnOnce() -> T) -> Result<T, Fault> {
    let outer = IN_BARRIER.with(|flag| flag.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    IN_BARRIER.with(|flag| flag.set(outer));

    result.map_err(|payload| Fault {
        detail: panic_detail(payload.as_ref()),
    })
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Install a panic hook that logs barrier-caught panics at debug level.
///
/// Panics outside a barrier still reach the previously installed hook.
pub fn install_quiet_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if IN_BARRIER.with(Cell::get) {
            tracing::debug!(
                location = ?info.location(),
                "parser panicked inside fault barrier"
            );
        } else {
            previous(info);
        }
    }));
}
