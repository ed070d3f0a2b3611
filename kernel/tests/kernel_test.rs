//! Scheduler tests for quark-kernel.
//!
//! The scheduler state is a framework singleton, so every test takes the
//! serial guard and drains the system before releasing it.

use std::sync::Mutex;

use quark_ao::{Active, ActiveObject, StateMachine};
use quark_core::{Evt, QPriority, Signal};
use quark_pool::EvtPool;

static SERIAL: Mutex<()> = Mutex::new(());
static LOG: Mutex<Vec<(u8, u16)>> = Mutex::new(Vec::new());

fn serial() -> std::sync::MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

fn log_take() -> Vec<(u8, u16)> {
    std::mem::take(&mut *LOG.lock().unwrap())
}

const fn prio(raw: u8) -> QPriority {
    QPriority::new_unchecked(raw)
}

fn evt(sig: u16) -> Evt {
    Evt::of(Signal::new(sig))
}

/// Records every dispatched event as (own priority, signal).
struct Recorder(u8);

impl StateMachine for Recorder {
    fn dispatch(&mut self, e: Evt) {
        LOG.lock().unwrap().push((self.0, e.sig().raw()));
    }
}

#[test]
fn higher_priority_ready_object_runs_first() {
    let _g = serial();
    quark_kernel::init();
    log_take();

    static LOW: Active<Recorder, 4> = Active::new(prio(2), Recorder(2));
    static HIGH: Active<Recorder, 4> = Active::new(prio(5), Recorder(5));
    LOW.start();
    HIGH.start();

    // posted low first; the scheduler must still serve priority 5 first
    assert!(LOW.post(evt(0xA), 0));
    assert!(HIGH.post(evt(0xB), 0));

    assert!(quark_kernel::run_one());
    assert_eq!(log_take(), [(5, 0xB)]);

    assert!(quark_kernel::run_one());
    assert_eq!(log_take(), [(2, 0xA)]);

    assert!(!quark_kernel::run_one());
}

/// State machine that fans out further events while it runs, proving that
/// nothing posted during a dispatch is processed inside that dispatch.
struct Chainer;

static CHAIN_LOW: Active<Chainer, 4> = Active::new(prio(10), Chainer);
static CHAIN_HIGH: Active<Recorder, 4> = Active::new(prio(11), Recorder(11));

impl StateMachine for Chainer {
    fn dispatch(&mut self, e: Evt) {
        LOG.lock().unwrap().push((10, e.sig().raw()));
        if e.sig().raw() == 1 {
            CHAIN_HIGH.post(evt(2), 0);
            CHAIN_LOW.post(evt(3), 0); // self-post, FIFO
        }
    }
}

#[test]
fn events_posted_during_dispatch_wait_for_the_next_iteration() {
    let _g = serial();
    quark_kernel::init();
    log_take();

    CHAIN_LOW.start();
    CHAIN_HIGH.start();

    assert!(CHAIN_LOW.post(evt(1), 0));

    // run to completion: the first iteration dispatches only event 1
    assert!(quark_kernel::run_one());
    assert_eq!(log_take(), [(10, 1)]);

    // then strict priority: 11 outranks the self-posted event at 10
    quark_kernel::run_until_idle();
    assert_eq!(log_take(), [(11, 2), (10, 3)]);
}

#[test]
fn dynamic_events_return_to_their_pool_after_dispatch() {
    let _g = serial();
    quark_kernel::init();
    log_take();

    static AO: Active<Recorder, 2> = Active::new(prio(12), Recorder(12));
    static POOL: EvtPool<u32, 1> = EvtPool::new();
    AO.start();
    POOL.register().unwrap();

    let e = POOL.alloc(Signal::new(7), 99).unwrap();
    assert!(AO.post(e, 0));
    assert!(POOL.alloc(Signal::new(8), 0).is_err());

    quark_kernel::run_until_idle();
    assert_eq!(log_take(), [(12, 7)]);

    // enqueue count equals gc count; the block is free again
    assert!(POOL.alloc(Signal::new(8), 0).is_ok());
}

#[test]
fn run_until_idle_drains_every_queue() {
    let _g = serial();
    quark_kernel::init();
    log_take();

    static A: Active<Recorder, 4> = Active::new(prio(14), Recorder(14));
    static B: Active<Recorder, 4> = Active::new(prio(15), Recorder(15));
    A.start();
    B.start();

    for sig in 1..=3u16 {
        assert!(A.post(evt(sig), 0));
        assert!(B.post(evt(sig + 10), 0));
    }

    quark_kernel::run_until_idle();

    // all of B (higher priority) strictly before all of A, FIFO within each
    assert_eq!(
        log_take(),
        [(15, 11), (15, 12), (15, 13), (14, 1), (14, 2), (14, 3)]
    );
    assert!(!quark_kernel::run_one());
}
