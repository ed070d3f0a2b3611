#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]

//! # quark-pool
//!
//! Event pools for the quark active-object framework. A pool owns a fixed
//! number of event blocks; allocating mints an [`Evt`] handle tagged with
//! the pool's id and the block index. The block holds the payload and the
//! reference counter. Queues retain an event on every enqueue and the
//! framework garbage-collects it after dispatch; when the counter drops to
//! zero the block returns to its pool.
//!
//! Events flow one way: producer → queue → consumer → pool. The reference
//! counter is the only post-construction mutation, always under the
//! framework critical section.

pub mod pools;

pub use pools::EvtPool;

use core::cell::RefCell;

use critical_section::{CriticalSection, Mutex};
use quark_core::{Evt, QError, QResult};

/// Maximum number of registered event pools.
pub const MAX_POOL: usize = 3;

/// Capabilities the framework needs from a registered pool.
///
/// All methods take the critical-section token of the caller; a pool never
/// opens its own critical section once registered.
pub trait PoolOps: Sync {
    /// Increment the reference counter of `block`.
    fn retain_block(&self, cs: CriticalSection<'_>, block: u8);
    /// Decrement the reference counter of `block`; recycle it at zero.
    fn release_block(&self, cs: CriticalSection<'_>, block: u8);
    /// Minimum number of free blocks ever observed.
    fn free_min(&self, cs: CriticalSection<'_>) -> u16;
}

struct PoolTable {
    entries: [Option<&'static dyn PoolOps>; MAX_POOL],
    count: u8,
}

static POOLS: Mutex<RefCell<PoolTable>> = Mutex::new(RefCell::new(PoolTable {
    entries: [None; MAX_POOL],
    count: 0,
}));

/// Register a pool and hand back its 1-based pool id. Ids are assigned in
/// registration order.
pub fn add_pool(pool: &'static dyn PoolOps) -> QResult<u8> {
    critical_section::with(|cs| {
        let mut table = POOLS.borrow_ref_mut(cs);
        let idx = table.count as usize;
        if idx >= MAX_POOL {
            return Err(QError::OutOfMemory);
        }
        table.entries[idx] = Some(pool);
        table.count += 1;
        Ok(idx as u8 + 1)
    })
}

fn lookup(cs: CriticalSection<'_>, pool_id: u8) -> &'static dyn PoolOps {
    let table = POOLS.borrow_ref(cs);
    let entry = (pool_id as usize)
        .checked_sub(1)
        .and_then(|i| table.entries.get(i))
        .copied()
        .flatten();
    match entry {
        Some(pool) => pool,
        None => quark_core::assert::fail("mpl", 200),
    }
}

/// Increment the reference counter of a dynamic event. No-op for static
/// events. Runs under the caller's critical section; queues call this on
/// every enqueue.
pub fn retain(cs: CriticalSection<'_>, e: Evt) {
    if e.is_dynamic() {
        lookup(cs, e.pool_id()).retain_block(cs, e.block());
    }
}

/// Garbage-collect an event: decrement its reference counter and return the
/// block to its pool when no references remain. No-op for static events.
pub fn gc(e: Evt) {
    if e.is_dynamic() {
        critical_section::with(|cs| {
            lookup(cs, e.pool_id()).release_block(cs, e.block());
        });
    }
}

/// Minimum number of free blocks ever observed in the given pool since it
/// was registered. Diagnostic only.
pub fn pool_min(pool_id: u8) -> u16 {
    critical_section::with(|cs| lookup(cs, pool_id).free_min(cs))
}
