//! Active objects.
//!
//! An [`Active`] couples a priority, a native event queue, and an
//! application state machine. Producers interact with it through the
//! object-safe [`ActiveObject`] trait; the kernel drives it through `take`
//! and `dispatch`.
//!
//! Every queue mutation happens under the framework critical section.
//! Dispatch does not: the state machine runs to completion with the
//! critical section released, so producers (including interrupt handlers on
//! bare-metal ports) keep posting while it runs.

use core::cell::RefCell;

use critical_section::Mutex;
use quark_core::{q_require, Evt, QPriority};

use crate::queue::{EvtQueue, PostOutcome};
use crate::trace::{self, TraceRecord};
use crate::{port, registry, sync};

/// Dispatch capability of an application state machine.
///
/// The framework guarantees run-to-completion: `dispatch` returns before
/// any other event is taken from any queue on this scheduler. It must not
/// block.
pub trait StateMachine: Send {
    fn dispatch(&mut self, e: Evt);
}

/// Object-safe interface of a started active object.
pub trait ActiveObject: Sync {
    fn prio(&self) -> QPriority;

    /// FIFO post with an explicit sender for tracing. Returns `false` when
    /// fewer than `margin` slots would remain after the insert; the refused
    /// event is garbage-collected. A `margin` of zero is a delivery
    /// guarantee, and failure to honor it is fatal.
    fn post_from(&self, e: Evt, margin: u16, sender: Option<QPriority>) -> bool;

    /// FIFO post without sender attribution.
    fn post(&self, e: Evt, margin: u16) -> bool {
        self.post_from(e, margin, None)
    }

    /// LIFO self-post: the event jumps ahead of everything queued. Overflow
    /// is fatal; there is deliberately no margin variant. Only an AO
    /// posting to itself should use this; it perturbs delivery order.
    fn post_lifo(&self, e: Evt);

    /// Remove the next event. Cooperative-kernel contract: the caller has
    /// proven the queue non-empty (the scheduler only calls this for a
    /// priority in its ready set); an empty queue is fatal.
    fn take(&self) -> Evt;

    /// Run the state machine to completion for one event.
    fn dispatch(&self, e: Evt);

    /// Minimum number of free queue slots ever observed.
    fn queue_min(&self) -> u16;
}

/// An active object with a queue of ring capacity `N` and state machine `S`.
pub struct Active<S: StateMachine, const N: usize> {
    prio: QPriority,
    queue: Mutex<RefCell<EvtQueue<N>>>,
    sm: sync::Mutex<S>,
}

impl<S: StateMachine, const N: usize> Active<S, N> {
    pub const fn new(prio: QPriority, sm: S) -> Self {
        Self {
            prio,
            queue: Mutex::new(RefCell::new(EvtQueue::new())),
            sm: sync::Mutex::new(sm),
        }
    }

    /// Register this object in the global table at its priority slot. The
    /// priority must be in range and unused; violations are fatal.
    pub fn start(&'static self) {
        registry::register(self);
    }

    /// Borrow the state machine. For startup wiring and test probes; the
    /// kernel is the only caller during normal operation.
    pub fn with_sm<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.sm.lock())
    }
}

impl<S: StateMachine, const N: usize> ActiveObject for Active<S, N> {
    fn prio(&self) -> QPriority {
        self.prio
    }

    fn post_from(&self, e: Evt, margin: u16, sender: Option<QPriority>) -> bool {
        let outcome = critical_section::with(|cs| {
            let mut q = self.queue.borrow_ref_mut(cs);
            let outcome = q.post_fifo(e, margin);
            match outcome {
                PostOutcome::Stored { was_empty } => {
                    quark_pool::retain(cs, e);
                    trace::emit(
                        cs,
                        &TraceRecord::PostFifo {
                            sig: e.sig(),
                            prio: self.prio,
                            sender,
                            n_free: q.n_free(),
                            n_min: q.min_free(),
                        },
                    );
                    if was_empty {
                        port::queue_signal(cs, self.prio);
                    }
                }
                PostOutcome::NoRoom { n_free } => {
                    trace::emit(
                        cs,
                        &TraceRecord::PostAttempt {
                            sig: e.sig(),
                            prio: self.prio,
                            sender,
                            n_free,
                            margin,
                        },
                    );
                }
            }
            outcome
        });

        match outcome {
            PostOutcome::Stored { .. } => true,
            PostOutcome::NoRoom { .. } => {
                // margin 0 promised delivery; the queue just broke that promise
                q_require!("act", 110, margin != 0);
                quark_pool::gc(e);
                false
            }
        }
    }

    fn post_lifo(&self, e: Evt) {
        let stored = critical_section::with(|cs| {
            let mut q = self.queue.borrow_ref_mut(cs);
            match q.post_lifo(e) {
                Some(was_empty) => {
                    quark_pool::retain(cs, e);
                    trace::emit(
                        cs,
                        &TraceRecord::PostLifo {
                            sig: e.sig(),
                            prio: self.prio,
                            n_free: q.n_free(),
                            n_min: q.min_free(),
                        },
                    );
                    if was_empty {
                        port::queue_signal(cs, self.prio);
                    }
                    true
                }
                None => false,
            }
        });
        q_require!("act", 210, stored);
    }

    fn take(&self) -> Evt {
        let taken = critical_section::with(|cs| {
            let mut q = self.queue.borrow_ref_mut(cs);
            let taken = q.take();
            if let Some((e, now_empty)) = taken {
                if now_empty {
                    trace::emit(
                        cs,
                        &TraceRecord::GetLast {
                            sig: e.sig(),
                            prio: self.prio,
                        },
                    );
                    port::queue_on_empty(cs, self.prio);
                } else {
                    trace::emit(
                        cs,
                        &TraceRecord::Get {
                            sig: e.sig(),
                            prio: self.prio,
                            n_free: q.n_free(),
                        },
                    );
                }
            }
            taken
        });

        match taken {
            Some((e, _)) => e,
            None => quark_core::assert::fail("act", 300),
        }
    }

    fn dispatch(&self, e: Evt) {
        self.sm.lock().dispatch(e);
    }

    fn queue_min(&self) -> u16 {
        critical_section::with(|cs| self.queue.borrow_ref(cs).min_free())
    }
}
