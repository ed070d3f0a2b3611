//! Event signals and event handles.
//!
//! An event is a signal plus an optional payload. The framework passes
//! events around as small copyable handles; for dynamic events the payload
//! and the reference counter live in the owning pool block (`quark-pool`),
//! keyed by the handle's pool id and block index. A handle with pool id 0 is
//! a static event: never reference-counted, never freed.

use core::fmt;

#[cfg(all(feature = "sig-8", feature = "sig-32"))]
compile_error!("features `sig-8` and `sig-32` are mutually exclusive");

/// Raw integer behind [`Signal`]; width selected at build time.
#[cfg(feature = "sig-8")]
pub type SignalRepr = u8;
#[cfg(feature = "sig-32")]
pub type SignalRepr = u32;
#[cfg(not(any(feature = "sig-8", feature = "sig-32")))]
pub type SignalRepr = u16;

/// Identifier for an event's kind.
///
/// Signals are globally unique numeric identifiers assigned by the
/// application. The default 16-bit width suits portable deployments; the
/// `sig-8`/`sig-32` features narrow or widen it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Signal(pub SignalRepr);

impl Signal {
    pub const fn new(raw: SignalRepr) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> SignalRepr {
        self.0
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SIG({:#06x})", self.0)
    }
}

/// Handle to an event.
///
/// `Copy` and 4 bytes wide in the default configuration; producers hand the
/// same handle to any number of queues. The event content behind a handle is
/// read-only once posted. The only post-construction mutation anywhere in
/// the framework is the pool-side reference counter, and only under the
/// critical section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Evt {
    sig: Signal,
    pool_id: u8,
    block: u8,
}

impl Evt {
    /// A static event carrying only a signal. Lives forever; garbage
    /// collection ignores it.
    pub const fn of(sig: Signal) -> Self {
        Self {
            sig,
            pool_id: 0,
            block: 0,
        }
    }

    /// Handle to a pool-allocated event. Framework use: only event pools
    /// mint these, with `pool_id` the 1-based id assigned at registration.
    pub const fn from_pool(sig: Signal, pool_id: u8, block: u8) -> Self {
        Self {
            sig,
            pool_id,
            block,
        }
    }

    pub const fn sig(self) -> Signal {
        self.sig
    }

    /// Owning pool id; 0 for static events.
    pub const fn pool_id(self) -> u8 {
        self.pool_id
    }

    /// Block index within the owning pool. Meaningless for static events.
    pub const fn block(self) -> u8 {
        self.block
    }

    pub const fn is_dynamic(self) -> bool {
        self.pool_id != 0
    }
}
