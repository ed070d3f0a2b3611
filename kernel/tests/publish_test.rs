//! Multicast delivery through the registry.

use std::sync::Mutex;

use quark_ao::{registry, Active, StateMachine};
use quark_core::{Evt, QPriority, Signal};
use quark_pool::EvtPool;

static LOG: Mutex<Vec<(u8, u16)>> = Mutex::new(Vec::new());

struct Recorder(u8);

impl StateMachine for Recorder {
    fn dispatch(&mut self, e: Evt) {
        LOG.lock().unwrap().push((self.0, e.sig().raw()));
    }
}

const fn prio(raw: u8) -> QPriority {
    QPriority::new_unchecked(raw)
}

static A: Active<Recorder, 4> = Active::new(prio(1), Recorder(1));
static B: Active<Recorder, 4> = Active::new(prio(2), Recorder(2));
static POOL: EvtPool<(), 1> = EvtPool::new();

#[test]
fn publish_reaches_every_started_object_without_leaking() {
    quark_kernel::init();
    A.start();
    B.start();
    POOL.register().unwrap();

    registry::publish(Evt::of(Signal::new(5)));
    quark_kernel::run_until_idle();
    assert_eq!(
        std::mem::take(&mut *LOG.lock().unwrap()),
        [(2, 5), (1, 5)]
    );

    // a dynamic event is retained across the multicast and collected after
    // every recipient has dispatched it
    let e = POOL.alloc(Signal::new(6), ()).unwrap();
    registry::publish(e);
    assert!(POOL.alloc(Signal::new(7), ()).is_err());

    quark_kernel::run_until_idle();
    assert_eq!(
        std::mem::take(&mut *LOG.lock().unwrap()),
        [(2, 6), (1, 6)]
    );
    assert!(POOL.alloc(Signal::new(7), ()).is_ok());
}
