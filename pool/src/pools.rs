//! Fixed-size event pools.

use core::cell::RefCell;

use critical_section::{CriticalSection, Mutex};
use heapless::Vec;
use quark_core::{q_assert, q_require, Evt, QError, QResult, Signal};

use crate::PoolOps;

struct Block<T> {
    sig: Signal,
    ref_ctr: u8,
    payload: Option<T>,
}

impl<T: Copy> Block<T> {
    const FREE: Block<T> = Block {
        sig: Signal::new(0),
        ref_ctr: 0,
        payload: None,
    };
}

struct PoolState<T, const N: usize> {
    blocks: [Block<T>; N],
    free: Vec<u8, N>,
    n_min: u16,
    id: u8,
}

/// A pool of `N` event blocks, each carrying one payload of type `T`.
///
/// Declared as a `static`, registered once at startup, then shared by
/// producers and the framework:
///
/// ```ignore
/// static SMALL: EvtPool<u32, 8> = EvtPool::new();
///
/// SMALL.register()?;
/// let e = SMALL.alloc(Signal::new(4), 42)?;
/// ```
///
/// Allocation hands out blocks with a zero reference counter; the first
/// enqueue retains the event and garbage collection after the final dispatch
/// recycles the block.
pub struct EvtPool<T: Copy + Send, const N: usize> {
    state: Mutex<RefCell<PoolState<T, N>>>,
}

impl<T: Copy + Send, const N: usize> EvtPool<T, N> {
    const SIZE_OK: () = assert!(N >= 1 && N <= 255, "pool capacity must be 1..=255");

    pub const fn new() -> Self {
        let () = Self::SIZE_OK;
        Self {
            state: Mutex::new(RefCell::new(PoolState {
                blocks: [Block::FREE; N],
                free: Vec::new(),
                n_min: N as u16,
                id: 0,
            })),
        }
    }

    /// Register the pool with the framework and stock its free list. Must be
    /// called exactly once, before the first `alloc`.
    pub fn register(&'static self) -> QResult<()> {
        let registered = critical_section::with(|cs| self.state.borrow_ref(cs).id != 0);
        q_require!("mpl", 100, !registered);

        let id = crate::add_pool(self)?;
        critical_section::with(|cs| {
            let mut st = self.state.borrow_ref_mut(cs);
            st.id = id;
            for block in 0..N as u8 {
                // cannot overflow: the free list holds exactly N indices
                let _ = st.free.push(block);
            }
        });
        Ok(())
    }

    /// Allocate an event carrying `payload`. Fails when the pool is
    /// exhausted (or not yet registered); the caller decides whether that is
    /// survivable.
    pub fn alloc(&'static self, sig: Signal, payload: T) -> QResult<Evt> {
        critical_section::with(|cs| {
            let mut st = self.state.borrow_ref_mut(cs);
            let Some(block) = st.free.pop() else {
                return Err(QError::OutOfMemory);
            };
            let n_free = st.free.len() as u16;
            if st.n_min > n_free {
                st.n_min = n_free;
            }
            st.blocks[block as usize] = Block {
                sig,
                ref_ctr: 0,
                payload: Some(payload),
            };
            Ok(Evt::from_pool(sig, st.id, block))
        })
    }

    /// Copy out the payload of an event allocated from this pool. `None`
    /// when the handle belongs to another pool or the block was already
    /// recycled. Consumers only ever see a copy; the stored payload is
    /// read-only once posted.
    pub fn payload(&'static self, e: Evt) -> Option<T> {
        critical_section::with(|cs| {
            let st = self.state.borrow_ref(cs);
            if e.pool_id() != st.id {
                return None;
            }
            st.blocks[e.block() as usize].payload
        })
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<T: Copy + Send, const N: usize> PoolOps for EvtPool<T, N> {
    fn retain_block(&self, cs: CriticalSection<'_>, block: u8) {
        let mut st = self.state.borrow_ref_mut(cs);
        st.blocks[block as usize].ref_ctr += 1;
    }

    fn release_block(&self, cs: CriticalSection<'_>, block: u8) {
        let mut st = self.state.borrow_ref_mut(cs);
        let i = block as usize;
        // a live block always carries its payload; a bare one was already recycled
        q_assert!("mpl", 300, st.blocks[i].payload.is_some());
        if st.blocks[i].ref_ctr > 1 {
            st.blocks[i].ref_ctr -= 1;
        } else {
            st.blocks[i].ref_ctr = 0;
            st.blocks[i].payload = None;
            // cannot overflow: each block index is on the free list at most once
            let _ = st.free.push(block);
        }
    }

    fn free_min(&self, cs: CriticalSection<'_>) -> u16 {
        self.state.borrow_ref(cs).n_min
    }
}
