//! Reusable working memory for hashing.
//!
//! A hash needs a 2 MiB scratchpad and a 200-byte state. [`Arena`] owns both
//! so they can be kept between hashes instead of allocated for each one.
//! An arena can only hash one thing at a time, which `&mut self` enforces.
//!
//! To share arenas between threads use either:
//! - [`ArenaPool`], which hands out idle arenas and takes them back after the hash
//! - [`ThreadArenas`], which keeps one arena per thread

use std::{
    cell::RefCell,
    fmt::{self, Debug},
    num::NonZero,
    ops::{Deref, DerefMut},
    sync::{Mutex, PoisonError},
    thread::available_parallelism,
};

use thread_local::ThreadLocal;

use crate::{
    cnaes::AES_BLOCK_SIZE, error::DataCanNotBeHashed, slow_hash::cn_slow_hash, state::HashState,
    util::subarray_mut, variant::Variant,
};

/// The size of the scratchpad in bytes.
pub(crate) const MEMORY: usize = 1 << 21; // 2MB scratchpad
/// The number of 16-byte blocks in the scratchpad.
pub(crate) const MEMORY_BLOCKS: usize = MEMORY / AES_BLOCK_SIZE;

/// The 2 MiB scratchpad, stored as little-endian 128-bit blocks.
pub(crate) struct Scratchpad(Box<[u128]>);

impl Scratchpad {
    /// Allocates a zeroed scratchpad on the heap.
    pub(crate) fn new() -> Self {
        Self(vec![0; MEMORY_BLOCKS].into_boxed_slice())
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut [u128; MEMORY_BLOCKS] {
        subarray_mut(&mut self.0, 0)
    }
}

/// The working memory for one hash at a time.
///
/// Hashing with a reused arena gives the same result as hashing with a new
/// one, because everything in it is overwritten before it is read.
///
/// ```rust,no_run
/// use cuprate_cryptonight::{Arena, Variant};
///
/// let mut arena = Arena::new();
/// let a = arena.hash(b"first", Variant::V0).unwrap();
/// let b = arena.hash(b"second", Variant::V0).unwrap();
/// assert_ne!(a, b);
/// ```
pub struct Arena {
    state: HashState,
    scratchpad: Scratchpad,
}

impl Arena {
    /// Allocates a new arena.
    pub fn new() -> Self {
        Self {
            state: HashState::default(),
            scratchpad: Scratchpad::new(),
        }
    }

    /// Hashes `buf` with the given [`Variant`].
    ///
    /// # Errors
    /// Returns [`DataCanNotBeHashed`] if `variant` is [`Variant::V1`] and `buf`
    /// is shorter than 43 bytes.
    pub fn hash(&mut self, buf: &[u8], variant: Variant) -> Result<[u8; 32], DataCanNotBeHashed> {
        cn_slow_hash(&mut self.state, &mut self.scratchpad, buf, variant)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena").finish_non_exhaustive()
    }
}

/// A pool of [`Arena`]s that can be shared between threads.
///
/// The lock is only held to take an arena out or put one back, never while hashing.
/// A new arena is allocated when none are idle, and arenas returned while
/// `max_idle` are already idle are freed.
#[derive(Debug)]
pub struct ArenaPool {
    idle: Mutex<Vec<Arena>>,
    max_idle: usize,
}

impl ArenaPool {
    /// Creates an empty pool that keeps at most `max_idle` arenas around.
    pub const fn new(max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            max_idle,
        }
    }

    /// Takes an idle arena, or allocates a new one if there are none.
    ///
    /// The arena goes back into the pool when the returned [`PooledArena`] is dropped.
    pub fn checkout(&self) -> PooledArena<'_> {
        let arena = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_else(|| {
                tracing::debug!("no idle arenas, allocating a new one");
                Arena::new()
            });

        PooledArena {
            pool: self,
            arena: Some(arena),
        }
    }

    /// Hashes `buf` with an arena from the pool.
    ///
    /// # Errors
    /// See [`Arena::hash`].
    #[tracing::instrument(level = "trace", skip_all, fields(len = buf.len(), variant = %variant))]
    pub fn hash(&self, buf: &[u8], variant: Variant) -> Result<[u8; 32], DataCanNotBeHashed> {
        self.checkout().hash(buf, variant)
    }

    /// The number of idle arenas in the pool.
    pub fn idle(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// The maximum number of idle arenas the pool keeps.
    pub const fn max_idle(&self) -> usize {
        self.max_idle
    }

    fn checkin(&self, arena: Arena) {
        let surplus = {
            let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
            if idle.len() < self.max_idle {
                idle.push(arena);
                None
            } else {
                Some(arena)
            }
        };

        if let Some(arena) = surplus {
            tracing::debug!(max_idle = self.max_idle, "pool is full, freeing arena");
            drop(arena);
        }
    }
}

impl Default for ArenaPool {
    /// Keeps one idle arena per available CPU.
    fn default() -> Self {
        Self::new(available_parallelism().map_or(1, NonZero::get))
    }
}

/// An [`Arena`] checked out from an [`ArenaPool`].
///
/// Dereferences to the arena and returns it to the pool on drop.
#[derive(Debug)]
pub struct PooledArena<'a> {
    pool: &'a ArenaPool,
    /// Always `Some` until [`Drop`] hands the arena back.
    arena: Option<Arena>,
}

impl Deref for PooledArena<'_> {
    type Target = Arena;

    fn deref(&self) -> &Self::Target {
        match &self.arena {
            Some(arena) => arena,
            None => unreachable!("the arena is only taken on drop"),
        }
    }
}

impl DerefMut for PooledArena<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match &mut self.arena {
            Some(arena) => arena,
            None => unreachable!("the arena is only taken on drop"),
        }
    }
}

impl Drop for PooledArena<'_> {
    fn drop(&mut self) {
        if let Some(arena) = self.arena.take() {
            self.pool.checkin(arena);
        }
    }
}

/// One [`Arena`] per thread, allocated the first time a thread hashes.
///
/// Arenas live until the [`ThreadArenas`] is dropped, so this suits a fixed
/// set of worker threads.
#[derive(Debug, Default)]
pub struct ThreadArenas {
    arenas: ThreadLocal<RefCell<Arena>>,
}

impl ThreadArenas {
    /// Creates an empty set of arenas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set of arenas with room for `threads` threads before
    /// the internal table grows.
    pub fn with_capacity(threads: usize) -> Self {
        Self {
            arenas: ThreadLocal::with_capacity(threads),
        }
    }

    /// Hashes `buf` with the current thread's arena.
    ///
    /// # Errors
    /// See [`Arena::hash`].
    #[tracing::instrument(level = "trace", skip_all, fields(len = buf.len(), variant = %variant))]
    pub fn hash(&self, buf: &[u8], variant: Variant) -> Result<[u8; 32], DataCanNotBeHashed> {
        let arena = self.arenas.get_or(|| {
            tracing::debug!("allocating arena for new thread");
            RefCell::new(Arena::new())
        });

        arena.borrow_mut().hash(buf, variant)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_scratchpad_size() {
        let mut scratchpad = Scratchpad::new();
        assert_eq!(scratchpad.blocks_mut().len() * AES_BLOCK_SIZE, MEMORY);
    }

    #[test]
    fn test_pool_reuses_arenas() {
        let pool = ArenaPool::new(2);
        assert_eq!(pool.idle(), 0);

        {
            let _first = pool.checkout();
            let _second = pool.checkout();
            assert_eq!(pool.idle(), 0);
        }
        assert_eq!(pool.idle(), 2);

        let arena = pool.checkout();
        assert_eq!(pool.idle(), 1);
        drop(arena);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn test_pool_frees_surplus_arenas() {
        let pool = ArenaPool::new(1);

        let arenas = [pool.checkout(), pool.checkout(), pool.checkout()];
        drop(arenas);

        assert_eq!(pool.idle(), 1);
        assert_eq!(pool.max_idle(), 1);
    }

    #[test]
    fn test_pooled_arena_is_usable_and_returned() {
        let pool = ArenaPool::new(1);

        let mut arena = pool.checkout();
        assert_eq!(
            arena.hash(&[0; 10], Variant::V1),
            Err(DataCanNotBeHashed { len: 10 })
        );
        assert_eq!(pool.idle(), 0);
        drop(arena);
        assert_eq!(pool.idle(), 1);

        // the returned arena hashes like a new one
        let data = [7; 43];
        let expected = Arena::new().hash(&data, Variant::V0).unwrap();
        assert_eq!(pool.checkout().hash(&data, Variant::V0), Ok(expected));
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_pool_with_no_idle_arenas() {
        let pool = ArenaPool::new(0);
        drop(pool.checkout());
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_thread_arenas_hash_matches_arena() {
        let data = [0x42; 64];
        let arenas = ThreadArenas::with_capacity(1);
        let expected = Arena::new().hash(&data, Variant::V1).unwrap();

        assert_eq!(arenas.hash(&data, Variant::V1).unwrap(), expected);
        assert_eq!(
            arenas.hash(&data[..42], Variant::V1),
            Err(DataCanNotBeHashed { len: 42 })
        );
        assert_eq!(arenas.hash(&data, Variant::V1).unwrap(), expected);
    }
}
