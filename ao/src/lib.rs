#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]

//! # quark-ao
//!
//! Active objects and their native event queues.
//!
//! An active object owns a priority, a bounded event queue, and a state
//! machine, and processes one event at a time to completion. Producers post
//! event handles asynchronously; the cooperative kernel (`quark-kernel`)
//! extracts and dispatches them in strict priority order.
//!
//! Module overview:
//! - [`queue`]    – bounded FIFO with a front-slot fast path and a ring buffer
//! - [`active`]   – the [`Active`] container and the object-safe [`ActiveObject`] trait
//! - [`registry`] – global table of started active objects, keyed by priority
//! - [`port`]     – queue-signal hooks the kernel binds at startup
//! - [`trace`]    – best-effort structured trace records

pub mod active;
pub mod port;
pub mod queue;
pub mod registry;
pub mod trace;

mod sync;

pub use active::{Active, ActiveObject, StateMachine};
pub use queue::{EvtQueue, PostOutcome};
pub use trace::TraceRecord;
