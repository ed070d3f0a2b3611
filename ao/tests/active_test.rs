//! Active-object tests for quark-ao: posting, extraction, signaling, and
//! the fatal contract paths.

use std::sync::atomic::{AtomicUsize, Ordering};

use critical_section::CriticalSection;
use quark_ao::{port, registry, Active, ActiveObject, StateMachine};
use quark_core::{Evt, QPriority, Signal};
use quark_pool::EvtPool;

struct Probe;

impl StateMachine for Probe {
    fn dispatch(&mut self, _e: Evt) {}
}

fn evt(sig: u16) -> Evt {
    Evt::of(Signal::new(sig))
}

const fn prio(raw: u8) -> QPriority {
    QPriority::new_unchecked(raw)
}

// hook observations for the AO at priority 3 only, so the other tests in
// this binary cannot pollute the counts
static SIGNALS: AtomicUsize = AtomicUsize::new(0);
static EMPTIES: AtomicUsize = AtomicUsize::new(0);

fn count_signal(_cs: CriticalSection<'_>, p: QPriority) {
    if p.raw() == 3 {
        SIGNALS.fetch_add(1, Ordering::SeqCst);
    }
}

fn count_empty(_cs: CriticalSection<'_>, p: QPriority) {
    if p.raw() == 3 {
        EMPTIES.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn queue_signal_fires_exactly_once_per_transition() {
    static AO: Active<Probe, 4> = Active::new(prio(3), Probe);
    AO.start();
    port::bind(count_signal, count_empty);

    assert!(AO.post(evt(1), 0));
    assert_eq!(SIGNALS.load(Ordering::SeqCst), 1);

    // second post: queue already non-empty, no further signal
    assert!(AO.post(evt(2), 0));
    assert_eq!(SIGNALS.load(Ordering::SeqCst), 1);

    assert_eq!(AO.take().sig().raw(), 1);
    assert_eq!(EMPTIES.load(Ordering::SeqCst), 0);
    assert_eq!(AO.take().sig().raw(), 2);
    assert_eq!(EMPTIES.load(Ordering::SeqCst), 1);

    // high-water mark: n_free dipped to 3 (5 - 2 events)
    assert_eq!(registry::queue_min(prio(3)), 3);
}

#[test]
#[should_panic(expected = "assertion failed: act:110")]
fn zero_margin_post_into_full_queue_is_fatal() {
    static AO: Active<Probe, 4> = Active::new(prio(4), Probe);
    AO.start();

    for sig in 1..=5u16 {
        assert!(AO.post(evt(sig), 0));
    }
    AO.post(evt(6), 0);
}

#[test]
fn refused_post_garbage_collects_the_event() {
    static AO: Active<Probe, 1> = Active::new(prio(5), Probe);
    static POOL: EvtPool<(), 1> = EvtPool::new();
    AO.start();
    POOL.register().unwrap();

    // fill both slots (front + 1 ring) with static events
    assert!(AO.post(evt(1), 0));
    assert!(AO.post(evt(2), 0));

    let e = POOL.alloc(Signal::new(3), ()).unwrap();
    assert!(!AO.post(e, 1));

    // the refused event went back to its pool
    assert!(POOL.alloc(Signal::new(4), ()).is_ok());

    // and the queue did not change
    assert_eq!(AO.take().sig().raw(), 1);
    assert_eq!(AO.take().sig().raw(), 2);
}

#[test]
fn lifo_post_is_consumed_first() {
    static AO: Active<Probe, 4> = Active::new(prio(6), Probe);
    AO.start();

    assert!(AO.post(evt(1), 0));
    assert!(AO.post(evt(2), 0));
    AO.post_lifo(evt(3));

    assert_eq!(AO.take().sig().raw(), 3);
    assert_eq!(AO.take().sig().raw(), 1);
    assert_eq!(AO.take().sig().raw(), 2);
}

#[test]
#[should_panic(expected = "assertion failed: act:210")]
fn lifo_overflow_is_fatal() {
    static AO: Active<Probe, 1> = Active::new(prio(7), Probe);
    AO.start();

    assert!(AO.post(evt(1), 0));
    assert!(AO.post(evt(2), 0));
    AO.post_lifo(evt(3));
}

#[test]
#[should_panic(expected = "assertion failed: act:300")]
fn take_from_empty_queue_is_fatal() {
    static AO: Active<Probe, 2> = Active::new(prio(8), Probe);
    AO.start();
    AO.take();
}

#[test]
#[should_panic(expected = "assertion failed: reg:110")]
fn duplicate_priority_is_fatal() {
    static FIRST: Active<Probe, 2> = Active::new(prio(9), Probe);
    static SECOND: Active<Probe, 2> = Active::new(prio(9), Probe);
    FIRST.start();
    SECOND.start();
}

#[test]
#[should_panic(expected = "assertion failed: reg:400")]
fn queue_min_of_unused_priority_is_fatal() {
    registry::queue_min(prio(20));
}

#[test]
#[should_panic(expected = "assertion failed: reg:100")]
fn out_of_range_priority_is_fatal() {
    static AO: Active<Probe, 2> = Active::new(prio(0), Probe);
    AO.start();
}
