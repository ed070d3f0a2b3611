//! Best-effort structured trace records.
//!
//! Queue and scheduler operations emit a [`TraceRecord`] to an optional
//! sink. Tracing never fails and never touches framework state; with no
//! sink installed the emit is a single branch. The sink runs under the
//! critical section of the operation being traced and must not panic or
//! block.

use core::cell::RefCell;

use critical_section::{CriticalSection, Mutex};
use quark_core::{QPriority, Signal};

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TraceRecord {
    /// Successful FIFO post into an AO's queue.
    PostFifo {
        sig: Signal,
        prio: QPriority,
        sender: Option<QPriority>,
        n_free: u16,
        n_min: u16,
    },
    /// FIFO post refused for lack of margin.
    PostAttempt {
        sig: Signal,
        prio: QPriority,
        sender: Option<QPriority>,
        n_free: u16,
        margin: u16,
    },
    /// LIFO self-post.
    PostLifo {
        sig: Signal,
        prio: QPriority,
        n_free: u16,
        n_min: u16,
    },
    /// Event extracted, more remain queued.
    Get {
        sig: Signal,
        prio: QPriority,
        n_free: u16,
    },
    /// Event extracted, queue now empty.
    GetLast { sig: Signal, prio: QPriority },
    /// Scheduler is about to dispatch a different priority than last time.
    SchedNext { prio: QPriority, prev: u8 },
    /// Scheduler went idle.
    SchedIdle { prev: u8 },
}

/// Trace sink. Must not panic.
pub type TraceSink = fn(&TraceRecord);

static SINK: Mutex<RefCell<Option<TraceSink>>> = Mutex::new(RefCell::new(None));

/// Install (or replace) the trace sink.
pub fn set_sink(sink: TraceSink) {
    critical_section::with(|cs| {
        *SINK.borrow_ref_mut(cs) = Some(sink);
    });
}

/// Emit a record to the sink, if any. Public so the kernel crate can emit
/// scheduler records through the same channel.
pub fn emit(cs: CriticalSection<'_>, record: &TraceRecord) {
    let sink = *SINK.borrow_ref(cs);
    if let Some(sink) = sink {
        sink(record);
    }
}
