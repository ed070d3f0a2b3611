//! Global table of started active objects, keyed by priority.
//!
//! The table is a framework singleton: one slot per priority level, filled
//! exactly once per active object at `start`. Slot 0 stays empty (priority
//! 0 means "none").

use core::cell::RefCell;

use critical_section::Mutex;
use quark_core::{q_require, Evt, QPriority, MAX_ACTIVE};

use crate::active::ActiveObject;

const SLOTS: usize = MAX_ACTIVE as usize + 1;

struct Table {
    slots: [Option<&'static dyn ActiveObject>; SLOTS],
}

static ACTIVE: Mutex<RefCell<Table>> = Mutex::new(RefCell::new(Table {
    slots: [None; SLOTS],
}));

/// Insert an active object at its priority slot. The priority must be in
/// `1..=MAX_ACTIVE` and not already taken; either violation is fatal.
pub fn register(ao: &'static dyn ActiveObject) {
    let prio = ao.prio().raw();
    q_require!("reg", 100, prio >= 1 && prio <= MAX_ACTIVE);

    let inserted = critical_section::with(|cs| {
        let mut table = ACTIVE.borrow_ref_mut(cs);
        let slot = &mut table.slots[prio as usize];
        if slot.is_none() {
            *slot = Some(ao);
            true
        } else {
            false
        }
    });
    q_require!("reg", 110, inserted);
}

/// The active object started at `prio`, if any.
pub fn lookup(prio: QPriority) -> Option<&'static dyn ActiveObject> {
    critical_section::with(|cs| {
        ACTIVE
            .borrow_ref(cs)
            .slots
            .get(prio.raw() as usize)
            .copied()
            .flatten()
    })
}

/// Minimum number of free queue slots ever observed for the active object
/// started at `prio`. Querying an unused priority level is fatal.
pub fn queue_min(prio: QPriority) -> u16 {
    match lookup(prio) {
        Some(ao) => ao.queue_min(),
        None => quark_core::assert::fail("reg", 400),
    }
}

/// Multicast an event to every started active object, with guaranteed
/// delivery (margin 0). The event is retained across the multicast and the
/// publisher's reference collected afterwards, so a dynamic event with zero
/// recipients does not leak.
pub fn publish(e: Evt) {
    critical_section::with(|cs| quark_pool::retain(cs, e));

    let snapshot = critical_section::with(|cs| ACTIVE.borrow_ref(cs).slots);
    for ao in snapshot.into_iter().flatten() {
        ao.post(e, 0);
    }

    quark_pool::gc(e);
}
