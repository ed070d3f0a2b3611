#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]

//! # quark-core
//!
//! Core types for the quark active-object framework: event signals and
//! handles, active-object priorities, and the priority sets the scheduler
//! runs on. The crate is dependency-free and `no_std`; the framework layers
//! (`quark-pool`, `quark-ao`, `quark-kernel`) build on it.

use core::fmt;

pub mod assert;
pub mod events;
pub mod priorities;

pub use events::{Evt, Signal, SignalRepr};
pub use priorities::{PrioSet32, PrioSet64, QPriority, ReadySet, MAX_ACTIVE};

/// Result type used throughout the framework.
pub type QResult<T> = Result<T, QError>;

/// Recoverable error conditions.
///
/// Contract violations do not appear here; those are fatal through the
/// [`q_require!`]/[`q_assert!`] macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QError {
    /// Priority outside `1..=MAX_ACTIVE`.
    InvalidPriority,
    /// Event pool (or pool table) exhausted.
    OutOfMemory,
}

impl fmt::Display for QError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QError::InvalidPriority => write!(f, "invalid priority level"),
            QError::OutOfMemory => write!(f, "event pool exhausted"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for QError {}
