//! Queue-signal hooks.
//!
//! The queue layer reports two edges to whoever schedules the system: a
//! queue turning non-empty (the owning AO has work) and a queue draining
//! (it no longer does). The cooperative kernel binds both hooks at startup
//! to maintain its ready set; until something binds them they are no-ops,
//! which keeps this crate testable on its own.
//!
//! Hooks run under the caller's critical section and must not panic.

use core::cell::RefCell;

use critical_section::{CriticalSection, Mutex};
use quark_core::QPriority;

/// Hook invoked with the critical-section token of the queue operation that
/// triggered it.
pub type QueueHook = fn(CriticalSection<'_>, QPriority);

struct Binding {
    signal: Option<QueueHook>,
    on_empty: Option<QueueHook>,
}

static BINDING: Mutex<RefCell<Binding>> = Mutex::new(RefCell::new(Binding {
    signal: None,
    on_empty: None,
}));

/// Bind both hooks. Called once by the kernel's `init`; rebinding replaces
/// the previous hooks.
pub fn bind(signal: QueueHook, on_empty: QueueHook) {
    critical_section::with(|cs| {
        *BINDING.borrow_ref_mut(cs) = Binding {
            signal: Some(signal),
            on_empty: Some(on_empty),
        };
    });
}

/// Raised exactly once per empty→non-empty transition of an AO's queue.
pub(crate) fn queue_signal(cs: CriticalSection<'_>, prio: QPriority) {
    // copy the hook out so the binding is not borrowed while it runs
    let hook = BINDING.borrow_ref(cs).signal;
    if let Some(hook) = hook {
        hook(cs, prio);
    }
}

/// Raised when a `take` drains an AO's queue.
pub(crate) fn queue_on_empty(cs: CriticalSection<'_>, prio: QPriority) {
    let hook = BINDING.borrow_ref(cs).on_empty;
    if let Some(hook) = hook {
        hook(cs, prio);
    }
}
