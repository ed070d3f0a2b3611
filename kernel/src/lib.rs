#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]

//! # quark-kernel
//!
//! The cooperative run-to-completion scheduler. A single thread executes
//! the loop; producers may be interrupt handlers or the state machines
//! themselves.
//!
//! The scheduler owns the ready set: one bit per priority level, set by the
//! queue-signal hook on every empty→non-empty transition and cleared when a
//! `take` drains the queue. Each [`run_one`] picks the highest ready
//! priority, extracts exactly one event, dispatches it to completion, and
//! garbage-collects it. Events posted during a dispatch, even to the
//! running object, become visible on the next iteration.

use core::cell::RefCell;

use critical_section::{CriticalSection, Mutex};
use quark_ao::{port, registry, trace, TraceRecord};
use quark_core::{QPriority, ReadySet};

struct SchedState {
    ready: ReadySet,
    /// Priority dispatched by the previous iteration; 0 when idle.
    prev: u8,
}

static STATE: Mutex<RefCell<SchedState>> = Mutex::new(RefCell::new(SchedState {
    ready: ReadySet::new(),
    prev: 0,
}));

static IDLE: Mutex<RefCell<Option<fn()>>> = Mutex::new(RefCell::new(None));

/// Bind the scheduler to the queue-signal hooks. Call once before starting
/// active objects.
pub fn init() {
    port::bind(on_queue_ready, on_queue_empty);
}

fn on_queue_ready(cs: CriticalSection<'_>, prio: QPriority) {
    STATE.borrow_ref_mut(cs).ready.insert(prio);
}

fn on_queue_empty(cs: CriticalSection<'_>, prio: QPriority) {
    STATE.borrow_ref_mut(cs).ready.remove(prio);
}

/// Dispatch one event to the highest-priority ready active object.
/// Returns `false` when nothing is ready.
pub fn run_one() -> bool {
    let next = critical_section::with(|cs| {
        let mut st = STATE.borrow_ref_mut(cs);
        match st.ready.find_max() {
            Some(prio) => {
                if prio.raw() != st.prev {
                    trace::emit(
                        cs,
                        &TraceRecord::SchedNext {
                            prio,
                            prev: st.prev,
                        },
                    );
                    st.prev = prio.raw();
                }
                Some(prio)
            }
            None => {
                if st.prev != 0 {
                    trace::emit(cs, &TraceRecord::SchedIdle { prev: st.prev });
                    st.prev = 0;
                }
                None
            }
        }
    });

    let Some(prio) = next else {
        return false;
    };

    // a ready bit for an unstarted priority means the system is corrupted
    let Some(ao) = registry::lookup(prio) else {
        quark_core::assert::fail("krn", 200)
    };

    let e = ao.take(); // clears the ready bit if this drains the queue
    ao.dispatch(e); // run to completion, critical section released
    quark_pool::gc(e);
    true
}

/// Run until no active object has pending events.
pub fn run_until_idle() {
    while run_one() {}
}

/// Hook invoked by [`run`] whenever the ready set is empty. Bare-metal
/// ports park the CPU here; the hosted port yields the thread.
pub fn set_idle_hook(hook: fn()) {
    critical_section::with(|cs| {
        *IDLE.borrow_ref_mut(cs) = Some(hook);
    });
}

/// The scheduler loop of an always-on system. Never returns.
pub fn run() -> ! {
    loop {
        if !run_one() {
            let hook = critical_section::with(|cs| *IDLE.borrow_ref(cs));
            if let Some(hook) = hook {
                hook();
            }
        }
    }
}
