//! # quark-posix
//!
//! Hosted port of the quark framework for development and testing. The
//! framework critical section maps onto a process-global mutex (the `std`
//! implementation of the `critical-section` crate, pulled in by this
//! crate); the idle hook sleeps briefly instead of parking a CPU.
//!
//! ```no_run
//! fn main() {
//!     quark_posix::init();
//!     quark_posix::install_console_trace();
//!
//!     // start active objects, register pools, post initial events...
//!
//!     quark_posix::run();
//! }
//! ```

use std::thread;
use std::time::Duration;

use quark_ao::{trace, TraceRecord};

/// Bind the cooperative kernel and the hosted idle hook. Call once at
/// startup, before starting active objects.
pub fn init() {
    quark_kernel::init();
    quark_kernel::set_idle_hook(idle);
}

/// Enter the scheduler loop. Never returns.
pub fn run() -> ! {
    quark_kernel::run()
}

/// Route trace records to stderr.
pub fn install_console_trace() {
    trace::set_sink(console_sink);
}

fn idle() {
    // nothing ready; don't spin the host CPU
    thread::sleep(Duration::from_millis(1));
}

fn console_sink(record: &TraceRecord) {
    match record {
        TraceRecord::PostFifo {
            sig,
            prio,
            sender,
            n_free,
            n_min,
        } => {
            let sender = sender.map_or(0, |p| p.raw());
            eprintln!("qs: post    {sig} -> {prio} from {sender} free={n_free} min={n_min}");
        }
        TraceRecord::PostAttempt {
            sig,
            prio,
            sender,
            n_free,
            margin,
        } => {
            let sender = sender.map_or(0, |p| p.raw());
            eprintln!("qs: refused {sig} -> {prio} from {sender} free={n_free} margin={margin}");
        }
        TraceRecord::PostLifo {
            sig,
            prio,
            n_free,
            n_min,
        } => {
            eprintln!("qs: lifo    {sig} -> {prio} free={n_free} min={n_min}");
        }
        TraceRecord::Get { sig, prio, n_free } => {
            eprintln!("qs: get     {sig} <- {prio} free={n_free}");
        }
        TraceRecord::GetLast { sig, prio } => {
            eprintln!("qs: get     {sig} <- {prio} (queue empty)");
        }
        TraceRecord::SchedNext { prio, prev } => {
            eprintln!("qs: sched   next {prio} (prev {prev})");
        }
        TraceRecord::SchedIdle { prev } => {
            eprintln!("qs: sched   idle (prev {prev})");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quark_core::{QPriority, Signal};

    // the sink runs under the critical section; it must never panic
    #[test]
    fn console_sink_handles_every_record() {
        let prio = QPriority::new(3).unwrap();
        let records = [
            TraceRecord::PostFifo {
                sig: Signal::new(1),
                prio,
                sender: None,
                n_free: 4,
                n_min: 3,
            },
            TraceRecord::PostAttempt {
                sig: Signal::new(2),
                prio,
                sender: Some(prio),
                n_free: 1,
                margin: 2,
            },
            TraceRecord::PostLifo {
                sig: Signal::new(3),
                prio,
                n_free: 2,
                n_min: 1,
            },
            TraceRecord::Get {
                sig: Signal::new(4),
                prio,
                n_free: 3,
            },
            TraceRecord::GetLast {
                sig: Signal::new(5),
                prio,
            },
            TraceRecord::SchedNext { prio, prev: 0 },
            TraceRecord::SchedIdle { prev: 3 },
        ];
        for record in &records {
            console_sink(record);
        }
    }
}
