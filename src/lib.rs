//! `zstdr`: the lazy match-finding core of an LZ77-family block compressor.
//!
//! Given an input block, the core emits a stream of
//! `(litLen, offsetCode, matchLen)` sequences that losslessly reconstruct
//! the block. Entropy coding, block framing and checksumming are external
//! collaborators that consume the sequence stream; this crate owns the
//! match-search indexes, the lazy parser and the window addressing that
//! lets the same tables reach the current prefix, an attached dictionary,
//! or a scrolled-off segment.
//!
//! # Crate layout
//!
//! | Module   | Contents |
//! |----------|----------|
//! | `lazy`   | Match-search indexes (hash chain, binary tree, row hash), the dedicated dictionary layout, and the lazy parser. |
//! | `window` | Logical index space and borrowed byte views. |
//! | `seq`    | Sequence records and the append-only sequence store. |
//! | `mem`    | Unaligned reads and match-length counters. |
//! | `corpus` | Deterministic text generator (test and benchmark input). |
//!
//! # Example
//!
//! ```
//! use zstdr::{CParams, MatchState, SearchMethod, SeqStore, Window, WindowBytes};
//!
//! let src = b"abcabcabcabc";
//! let mut ms = MatchState::new(
//!     CParams { hash_log: 14, chain_log: 14, search_log: 4, window_log: 20, min_match: 4 },
//!     SearchMethod::HashChain,
//! );
//! ms.reset(Window::contiguous(src.len()));
//!
//! let mut seqs = SeqStore::new();
//! let mut rep = [1u32, 4];
//! let trailing = zstdr::lazy::compress_block_lazy(
//!     &mut ms, &mut seqs, &mut rep, WindowBytes::contiguous(src), src.len(),
//! );
//! assert!(seqs.sequences.len() + trailing > 0);
//! ```

pub mod corpus;
pub mod lazy;
pub mod mem;
pub mod seq;
pub mod window;

pub use lazy::{
    compress_block, compress_block_btlazy2, compress_block_greedy, compress_block_greedy_row,
    compress_block_lazy, compress_block_lazy2, compress_block_lazy2_row, compress_block_lazy_row,
    load_dictionary, CParams, DictMode, DictView, MatchState, SearchMethod, SearchParams,
    SearchParamsError,
};
pub use seq::{SeqStore, Sequence, REPCODE_1, REP_MOVE};
pub use window::{Window, WindowBytes, WINDOW_START_INDEX};
