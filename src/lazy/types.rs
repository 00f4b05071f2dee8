//! Parameters, tunables and the match state shared by all search methods.
//!
//! Corresponds to the `zstd_lazy.c` constants block (lines 14-20), plus
//! `ZSTD_matchState_t`, `ZSTD_compressionParameters`, `ZSTD_dictMode_e` and
//! `searchMethod_e` from `zstd_compress_internal.h` / `zstd_lazy.c:1536`.

use core::fmt;

use crate::window::{Window, WindowBytes};

// ─────────────────────────────────────────────────────────────────────────────
// Tunables
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum emittable match length (`MINMATCH`). Search hashes use
/// `mls >= 4` bytes, but stored match lengths are counted from this floor.
pub const MINMATCH: usize = 3;

/// Number of readable bytes the position hashes require (`HASH_READ_SIZE`).
pub const HASH_READ_SIZE: usize = 8;

/// Shift applied to `ip - anchor` to skip faster over incompressible data
/// (`kSearchStrength`).
pub const K_SEARCH_STRENGTH: u32 = 8;

/// Sentinel marking a freshly chained, not-yet-sorted binary-tree node
/// (`ZSTD_DUBT_UNSORTED_MARK`). A real index can collide with it; walks
/// additionally bound their iteration count, which makes the collision
/// harmless.
pub const UNSORTED_MARK: u32 = 1;

/// Oversizing factor (log2) of a dedicated-dictionary-search hash table
/// (`ZSTD_LAZY_DDSS_BUCKET_LOG`).
pub const DDS_BUCKET_LOG: u32 = 4;

/// Entries in the row-hash prefetch ring (`kPrefetchNb`).
pub const PREFETCH_NB: usize = 8;
pub const PREFETCH_MASK: usize = PREFETCH_NB - 1;

/// Low bits of a row hash that form the stored tag (`kShortBits`).
pub const SHORT_BITS: u32 = 8;
pub const SHORT_MASK: u32 = (1u32 << SHORT_BITS) - 1;

/// Byte offset of the first tag within a tag row; slot 0 is the head cursor
/// (`kHashOffset`).
pub const HASH_OFFSET: usize = 1;

pub const ROW_LOG_16: u32 = 4;
pub const ROW_LOG_32: u32 = 5;
pub const ROW_ENTRIES_16: u32 = 1 << ROW_LOG_16;
pub const ROW_ENTRIES_32: u32 = 1 << ROW_LOG_32;

// ─────────────────────────────────────────────────────────────────────────────
// Compression parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Table and search geometry. The caller picks these; the core never resizes.
#[derive(Clone, Copy, Debug)]
pub struct CParams {
    /// log2 of the hash-table entry count.
    pub hash_log: u32,
    /// log2 of the chain/tree table entry count.
    pub chain_log: u32,
    /// log2 of the maximum candidates examined per search. Also selects the
    /// row width in row-hash mode (`< 5` → 16 entries, else 32).
    pub search_log: u32,
    /// log2 of the maximum back-reference distance.
    pub window_log: u32,
    /// Bytes digested by the position hash, `3..=7` (clamped to `4..=6`).
    pub min_match: u32,
}

impl CParams {
    /// Hash input width actually used: `min_match` clamped to `4..=6`.
    #[inline]
    pub fn mls(&self) -> u32 {
        self.min_match.clamp(4, 6)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Search configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Which index answers `find_best_match`.
///
/// Mirrors `searchMethod_e` (zstd_lazy.c:1536).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMethod {
    HashChain,
    BinaryTree,
    RowHash,
}

/// How previously seen bytes are addressed during this block.
///
/// Mirrors `ZSTD_dictMode_e` (`zstd_compress_internal.h`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DictMode {
    /// Only the current contiguous prefix.
    NoDict,
    /// An attached, fully indexed dictionary match state.
    DictMatchState,
    /// An attached dictionary with the pre-baked bucketed layout.
    DedicatedDictSearch,
    /// A scrolled-off segment of the stream, reachable through
    /// [`WindowBytes::ext`](crate::window::WindowBytes).
    ExtDict,
}

/// Validated `(method, depth, dict mode)` combination.
#[derive(Clone, Copy, Debug)]
pub struct SearchParams {
    pub method: SearchMethod,
    /// Lazy look-ahead depth: 0 = greedy, 1 = lazy, 2 = lazy2.
    pub depth: u32,
    pub dict_mode: DictMode,
}

/// Rejected `(method, depth, dict mode)` combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchParamsError {
    /// The dedicated-dictionary layout has no binary-tree variant.
    BinaryTreeWithDedicatedDict,
    /// Depth must be 0, 1 or 2.
    DepthOutOfRange(u32),
}

impl fmt::Display for SearchParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchParamsError::BinaryTreeWithDedicatedDict => {
                write!(f, "binary-tree search cannot use a dedicated-dict layout")
            }
            SearchParamsError::DepthOutOfRange(d) => {
                write!(f, "lazy depth {d} out of range (expected 0..=2)")
            }
        }
    }
}

impl std::error::Error for SearchParamsError {}

impl SearchParams {
    pub fn new(
        method: SearchMethod,
        depth: u32,
        dict_mode: DictMode,
    ) -> Result<Self, SearchParamsError> {
        if depth > 2 {
            return Err(SearchParamsError::DepthOutOfRange(depth));
        }
        if method == SearchMethod::BinaryTree && dict_mode == DictMode::DedicatedDictSearch {
            return Err(SearchParamsError::BinaryTreeWithDedicatedDict);
        }
        Ok(SearchParams {
            method,
            depth,
            dict_mode,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Match state
// ─────────────────────────────────────────────────────────────────────────────

/// Per-session search state: the window bookkeeping, the index tables and the
/// incremental-update cursor. Tables are sized once from [`CParams`] and
/// persist across blocks; `0` entries double as "empty".
///
/// Mirrors the lazy-relevant fields of `ZSTD_matchState_t`
/// (`zstd_compress_internal.h`): `window`, `nextToUpdate`, `hashTable`,
/// `chainTable`, `tagTable`, `hashCache`.
pub struct MatchState {
    pub c_params: CParams,
    pub window: Window,
    /// First index not yet inserted into the tables. Monotone within a block.
    pub next_to_update: u32,
    /// `hash -> most recent index` (hash-chain, binary-tree) or row storage
    /// (row-hash).
    pub hash_table: Vec<u32>,
    /// Chain links (hash-chain), tree child slots (binary-tree), or the
    /// compacted dictionary chains (dedicated-dict layout).
    pub chain_table: Vec<u32>,
    /// Row-hash tag rows: `entries + 1` bytes per row, head byte first.
    pub tag_table: Vec<u8>,
    /// Ring of precomputed row hashes.
    pub hash_cache: [u32; PREFETCH_NB],
}

impl MatchState {
    /// Allocate empty tables sized for `c_params` and `method`.
    pub fn new(c_params: CParams, method: SearchMethod) -> Self {
        debug_assert!(c_params.hash_log >= 6 && c_params.hash_log <= 30);
        let hash_size = 1usize << c_params.hash_log;
        let (chain_size, tag_size) = match method {
            SearchMethod::HashChain | SearchMethod::BinaryTree => {
                (1usize << c_params.chain_log, 0)
            }
            SearchMethod::RowHash => {
                let row_log = row_log_for(c_params.search_log);
                debug_assert!(c_params.hash_log > row_log);
                let rows = 1usize << (c_params.hash_log - row_log);
                (0, rows * ((1usize << row_log) + 1))
            }
        };
        let window = Window::contiguous(0);
        MatchState {
            c_params,
            next_to_update: window.dict_limit,
            window,
            hash_table: vec![0u32; hash_size],
            chain_table: vec![0u32; chain_size],
            tag_table: vec![0u8; tag_size],
            hash_cache: [0u32; PREFETCH_NB],
        }
    }

    /// Point the state at a new window. The update cursor restarts at the
    /// prefix base; table contents are left untouched.
    pub fn reset(&mut self, window: Window) {
        self.window = window;
        self.next_to_update = window.dict_limit;
    }

    /// Row width (log2) selected by `search_log`.
    #[inline]
    pub fn row_log(&self) -> u32 {
        row_log_for(self.c_params.search_log)
    }

    /// Hash width (log2) of the row selector; tags use 8 more bits.
    #[inline]
    pub fn row_hash_log(&self) -> u32 {
        self.c_params.hash_log - self.row_log()
    }

    /// Mark the whole block as indexed. Called at block boundaries so the
    /// tables hand over coherently to the next block.
    pub fn finish_block(&mut self) {
        if self.next_to_update < self.window.next_src {
            self.next_to_update = self.window.next_src;
        }
    }
}

/// Row width from the search budget: narrow rows for small budgets.
#[inline]
pub fn row_log_for(search_log: u32) -> u32 {
    if search_log < 5 {
        ROW_LOG_16
    } else {
        ROW_LOG_32
    }
}

/// An attached dictionary: another fully initialised match state plus the
/// byte storage its window describes. Read-only for the session.
#[derive(Clone, Copy)]
pub struct DictView<'a> {
    pub state: &'a MatchState,
    pub bytes: WindowBytes<'a>,
}

impl<'a> DictView<'a> {
    /// Rebase summand mapping dictionary indices into the current window's
    /// index space: `ms_index = dict_index + delta` (wrapping).
    #[inline]
    pub fn index_delta(&self, ms_dict_limit: u32) -> u32 {
        ms_dict_limit.wrapping_sub(self.state.window.next_src)
    }

    /// Total indexed dictionary length in the dictionary's own index space.
    #[inline]
    pub fn end_index(&self) -> u32 {
        self.state.window.next_src
    }
}
