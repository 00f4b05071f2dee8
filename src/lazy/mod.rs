//! Lazy match-finding core.
//!
//! | Module   | Contents |
//! |----------|----------|
//! | `types`  | Parameters, tunables, `MatchState`, search configuration. |
//! | `hash`   | Position hashing (4/5/6-byte multiplicative). |
//! | `chain`  | Hash-chain index. |
//! | `tree`   | Binary-tree index with deferred sorting. |
//! | `tags`   | Tag bitmaps (SSE2 + scalar) for the row finder. |
//! | `row`    | Row-hash index with tag acceleration. |
//! | `dds`    | Dedicated dictionary search structure. |
//! | `parser` | The lazy parser and block-compression entry points. |

pub mod chain;
pub mod dds;
pub mod hash;
pub mod parser;
pub mod row;
pub mod tags;
pub mod tree;
pub mod types;

pub use parser::{
    compress_block, compress_block_btlazy2, compress_block_greedy, compress_block_greedy_row,
    compress_block_lazy, compress_block_lazy2, compress_block_lazy2_row, compress_block_lazy_row,
};
pub use types::{
    CParams, DictMode, DictView, MatchState, SearchMethod, SearchParams, SearchParamsError,
};

use crate::lazy::types::HASH_READ_SIZE;
use crate::window::WindowBytes;

/// Index the whole prefix of `ms` (typically a dictionary being prepared for
/// attachment) with the tables of the given search method. Positions within
/// [`HASH_READ_SIZE`] of the end are left unindexed; the hashes cannot read
/// past the buffer.
///
/// Note the attachment contract: the chain *and* row finders continue a
/// dictionary search through a chain-indexed state (`HashChain` here), while
/// the tree finder descends a tree-indexed one (`BinaryTree` here).
///
/// Equivalent to the per-strategy arms of `ZSTD_loadDictionaryContent`
/// (`zstd_compress.c`), which feed `ZSTD_insertAndFindFirstIndex`,
/// `ZSTD_updateTree` and `ZSTD_row_update`.
pub fn load_dictionary(ms: &mut MatchState, bytes: &WindowBytes<'_>, method: SearchMethod) {
    let len = bytes.prefix.len();
    if len < HASH_READ_SIZE {
        ms.finish_block();
        return;
    }
    let target = len - HASH_READ_SIZE;
    match method {
        SearchMethod::HashChain => {
            let _ = chain::insert_and_find_first_index(ms, bytes, target);
        }
        SearchMethod::RowHash => row::row_update(ms, bytes, target),
        SearchMethod::BinaryTree => {
            // The tree must end up sorted, not merely chained: run a
            // throwaway search at each position, which sorts incrementally
            // exactly as block compression would.
            let mls = ms.c_params.mls();
            let base = ms.window.dict_limit;
            let mut pos = (ms.next_to_update - base) as usize;
            while pos < target {
                let mut discard = 999_999_999u32;
                let _ = tree::find_best_match(
                    ms,
                    bytes,
                    None,
                    pos,
                    len,
                    &mut discard,
                    mls,
                    DictMode::NoDict,
                );
                let caught_up = (ms.next_to_update - base) as usize;
                pos = caught_up.max(pos + 1);
            }
        }
    }
}
