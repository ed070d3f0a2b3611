//! Native event queue of an active object.
//!
//! The next event to consume sits in a separate front slot; everything else
//! waits in a ring buffer. The front slot makes the single-event case (by
//! far the most common in a well-sized system) a single load/store, and it
//! also participates in the accounting: `n_free` counts the front slot, so
//! `n_free == N + 1` on a completely empty queue.
//!
//! Both indices use the wrap-then-decrement discipline of the original
//! design: `head` always names the next FIFO write slot and `tail` the slot
//! holding the next ring event, each wrapping through 0 before the
//! decrement. The accounting invariants lean on this exact arithmetic; do
//! not "simplify" it.
//!
//! The operations here are plain `&mut self` state transitions with no
//! locking and no fatal paths of their own: they report what happened and
//! the active-object layer (which holds the critical section) turns contract
//! violations into assertions. That split keeps the queue algebra testable
//! in isolation.

use quark_core::{q_assert, Evt};

/// Outcome of a FIFO post attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcome {
    /// Event stored; `was_empty` reports the empty→non-empty transition the
    /// caller must signal.
    Stored { was_empty: bool },
    /// Not enough room for the requested margin; nothing changed.
    NoRoom { n_free: u16 },
}

/// Bounded event queue with a front slot and an `N`-slot ring.
pub struct EvtQueue<const N: usize> {
    front: Option<Evt>,
    ring: [Option<Evt>; N],
    head: u16,
    tail: u16,
    n_free: u16,
    n_min: u16,
}

impl<const N: usize> EvtQueue<N> {
    /// Ring capacity; also the wrap point for both indices.
    const END: u16 = {
        assert!(N >= 1 && N <= 0xFFFE, "queue capacity must be 1..=65534");
        N as u16
    };

    pub const fn new() -> Self {
        Self {
            front: None,
            ring: [None; N],
            head: 0,
            tail: 0,
            n_free: Self::END + 1,
            n_min: Self::END + 1,
        }
    }

    /// Insert an event in FIFO order, provided at least `margin` free slots
    /// remain after the insert.
    pub fn post_fifo(&mut self, e: Evt, margin: u16) -> PostOutcome {
        let n_free = self.n_free;
        if n_free <= margin {
            return PostOutcome::NoRoom { n_free };
        }
        self.use_one_slot(n_free);

        if self.front.is_none() {
            // empty queue: deliver straight to the front slot
            self.front = Some(e);
            PostOutcome::Stored { was_empty: true }
        } else {
            self.ring[self.head as usize] = Some(e);
            if self.head == 0 {
                self.head = Self::END;
            }
            self.head -= 1;
            PostOutcome::Stored { was_empty: false }
        }
    }

    /// Insert an event ahead of everything already queued. The displaced
    /// front event moves to the tail side of the ring so it is consumed
    /// right after the new one. `None` when the queue cannot accept the
    /// event; the caller treats that as fatal.
    pub fn post_lifo(&mut self, e: Evt) -> Option<bool> {
        let n_free = self.n_free;
        if n_free == 0 {
            return None;
        }
        self.use_one_slot(n_free);

        match self.front.replace(e) {
            None => Some(true),
            Some(prev) => {
                self.tail += 1;
                if self.tail == Self::END {
                    self.tail = 0;
                }
                self.ring[self.tail as usize] = Some(prev);
                Some(false)
            }
        }
    }

    /// Remove the next event. `None` on an empty queue; in the cooperative
    /// kernel the scheduler proves non-emptiness first, so the caller treats
    /// that as fatal. On `Some`, the `bool` reports whether the queue just
    /// became empty (the caller clears the ready bit).
    pub fn take(&mut self) -> Option<(Evt, bool)> {
        let e = self.front.take()?;

        let n_free = self.n_free + 1;
        self.n_free = n_free;

        if n_free <= Self::END {
            // events remain in the ring: promote the tail event to the front
            let next = self.ring[self.tail as usize].take();
            q_assert!("eqq", 305, next.is_some());
            self.front = next;
            if self.tail == 0 {
                self.tail = Self::END;
            }
            self.tail -= 1;
            Some((e, false))
        } else {
            // queue drained: every slot including the front one must be free
            q_assert!("eqq", 310, n_free == Self::END + 1);
            Some((e, true))
        }
    }

    fn use_one_slot(&mut self, n_free: u16) {
        let n_free = n_free - 1;
        self.n_free = n_free;
        if self.n_min > n_free {
            self.n_min = n_free;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_none()
    }

    pub fn n_free(&self) -> u16 {
        self.n_free
    }

    /// Minimum `n_free` ever observed; high-water-mark diagnostic.
    pub fn min_free(&self) -> u16 {
        self.n_min
    }

    pub const fn capacity(&self) -> u16 {
        Self::END
    }
}

impl<const N: usize> Default for EvtQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
