//! Dedicated dictionary search structure.
//!
//! A read-only, lookup-optimised layout for a pre-baked dictionary. The hash
//! table is oversized by a bucket factor of `2^DDS_BUCKET_LOG`; each bucket
//! caches its most recent `bucketSize - 1` positions up front, and the last
//! slot packs a `(chainStart << 8) | chainLen` pointer into a compacted
//! chain region built inside the regular chain table. Construction walks the
//! conventional hash chains once and spills at most 255 further positions
//! per bucket, with a quota that keeps the compacted region no larger than
//! the space freed by collapsing the buckets.
//!
//! Corresponds to `zstd_lazy.c`:
//!   - [`load_dictionary`]    ← `ZSTD_dedicatedDictSearch_lazy_loadDictionary`
//!   - `find_best_match_tail` ← the `ZSTD_dedicatedDictSearch` tails of the
//!     chain and row finders

use crate::lazy::hash::hash_ptr;
use crate::lazy::types::{DictView, MatchState, DDS_BUCKET_LOG};
use crate::mem;
use crate::seq::REP_MOVE;
use crate::window::WindowBytes;

/// Build the dedicated layout in-place from the dictionary bytes, indexing
/// every position in `[next_to_update, pos)`.
///
/// Equivalent to `ZSTD_dedicatedDictSearch_lazy_loadDictionary`
/// (zstd_lazy.c:489-602).
///
/// The state's `hash_log` must already include the bucket factor
/// (`hash_log >= chain_log`, effective bucket-selector width is
/// `hash_log - DDS_BUCKET_LOG`), and the window must reserve index 0
/// ([`Window::for_dictionary`](crate::window::Window::for_dictionary)).
pub fn load_dictionary(ms: &mut MatchState, bytes: &WindowBytes<'_>, pos: usize) {
    let base = ms.window.dict_limit;
    let target = base + pos as u32;
    let chain_size = 1u32 << ms.c_params.chain_log;
    let mut idx = ms.next_to_update;
    let min_chain = if chain_size < target {
        target - chain_size
    } else {
        idx
    };
    let bucket_size = 1u32 << DDS_BUCKET_LOG;
    let cache_size = bucket_size - 1;
    let chain_attempts = (1u32 << ms.c_params.search_log).saturating_sub(cache_size);
    let chain_limit = chain_attempts.min(255);
    let hash_log = ms.c_params.hash_log - DDS_BUCKET_LOG;
    let mls = ms.c_params.mls();

    // The hash table is oversized by the bucket factor. Pretend the buckets
    // are single entries for now and use the freed space as a temporary
    // chain table.
    let tmp_chain_base = 1usize << hash_log;
    let tmp_chain_size = (bucket_size - 1) << hash_log;
    let tmp_min_chain = if tmp_chain_size < target {
        target - tmp_chain_size
    } else {
        idx
    };

    debug_assert!(ms.c_params.chain_log <= 24);
    debug_assert!(ms.c_params.hash_log >= ms.c_params.chain_log);
    debug_assert!(idx != 0);
    debug_assert!(tmp_min_chain <= min_chain);

    // Fill the conventional single-entry hash table and the temporary chain.
    while idx < target {
        let h = hash_ptr(bytes.prefix, (idx - base) as usize, hash_log, mls) as usize;
        if idx >= tmp_min_chain {
            ms.hash_table[tmp_chain_base + (idx - tmp_min_chain) as usize] = ms.hash_table[h];
        }
        ms.hash_table[h] = idx;
        idx += 1;
    }

    // Compact each bucket's chain tail into the regular chain table.
    let mut chain_pos = 0u32;
    for hash_idx in 0..(1u32 << hash_log) {
        let mut count;
        let mut count_beyond_min_chain = 0u32;
        let mut i = ms.hash_table[hash_idx as usize];

        // Skip through the chain to the first position that won't sit in
        // the bucket cache.
        count = 0;
        while i >= tmp_min_chain && count < cache_size {
            if i < min_chain {
                count_beyond_min_chain += 1;
            }
            i = ms.hash_table[tmp_chain_base + (i - tmp_min_chain) as usize];
            count += 1;
        }

        if count == cache_size {
            count = 0;
            while count < chain_limit {
                if i < min_chain {
                    // Only `cacheSize` positions may be pulled from beyond
                    // `minChain`; that bound is what guarantees the
                    // compacted region fits in the collapsed bucket space.
                    let beyond = count_beyond_min_chain;
                    count_beyond_min_chain += 1;
                    if i == 0 || beyond > cache_size {
                        break;
                    }
                }
                ms.chain_table[chain_pos as usize] = i;
                chain_pos += 1;
                count += 1;
                if i < tmp_min_chain {
                    break;
                }
                i = ms.hash_table[tmp_chain_base + (i - tmp_min_chain) as usize];
            }
        } else {
            count = 0;
        }

        ms.hash_table[hash_idx as usize] = if count != 0 {
            ((chain_pos - count) << 8) + count
        } else {
            0
        };
    }
    debug_assert!(chain_pos <= chain_size);

    // Expand each single entry into its bucket: zero the cache slots and
    // park the packed chain pointer in the bucket's last slot.
    for hash_idx in (0..(1u32 << hash_log)).rev() {
        let bucket_idx = (hash_idx << DDS_BUCKET_LOG) as usize;
        let packed = ms.hash_table[hash_idx as usize];
        for i in 0..cache_size as usize {
            ms.hash_table[bucket_idx + i] = 0;
        }
        ms.hash_table[bucket_idx + bucket_size as usize - 1] = packed;
    }

    // Refill the bucket caches with the most recent positions, newest first.
    let mut idx = ms.next_to_update;
    while idx < target {
        let h = ((hash_ptr(bytes.prefix, (idx - base) as usize, hash_log, mls)) << DDS_BUCKET_LOG)
            as usize;
        for i in (1..cache_size as usize).rev() {
            ms.hash_table[h + i] = ms.hash_table[h + i - 1];
        }
        ms.hash_table[h] = idx;
        idx += 1;
    }

    ms.next_to_update = target;
}

/// Bounded lookup over the dedicated layout: the bucket cache first, then
/// the packed chain, under the caller's remaining attempt budget. Shared by
/// the hash-chain and row-hash finders.
///
/// Equivalent to the `ZSTD_dedicatedDictSearch` tails of
/// `ZSTD_HcFindBestMatch_generic` (zstd_lazy.c:674-758) and
/// `ZSTD_RowFindBestMatch_generic` (zstd_lazy.c:1301-1391), which are
/// identical in the original and deduplicated here.
#[allow(clippy::too_many_arguments)]
pub(crate) fn find_best_match_tail(
    dms: &DictView<'_>,
    bytes: &WindowBytes<'_>,
    pos: usize,
    limit_pos: usize,
    offset_out: &mut u32,
    curr: u32,
    ms_dict_limit: u32,
    nb_attempts: u32,
    mut ml: usize,
    mls: u32,
) -> usize {
    let dstate = dms.state;
    let dprefix = dms.bytes.prefix;
    if dprefix.len() < 4 {
        return ml;
    }
    let dds_hash_log = dstate.c_params.hash_log - DDS_BUCKET_LOG;
    let dds_idx =
        ((hash_ptr(bytes.prefix, pos, dds_hash_log, mls)) << DDS_BUCKET_LOG) as usize;
    let dds_lowest = dstate.window.dict_limit;
    let dds_size = dstate.window.next_src;
    let dds_index_delta = ms_dict_limit.wrapping_sub(dds_size);
    let bucket_size = 1u32 << DDS_BUCKET_LOG;
    let bucket_limit = nb_attempts.min(bucket_size - 1);

    let mut dds_attempt = 0u32;
    while dds_attempt < bucket_limit {
        let match_index = dstate.hash_table[dds_idx + dds_attempt as usize];
        if match_index == 0 {
            return ml;
        }
        // Guaranteed by table construction.
        debug_assert!(match_index >= dds_lowest);
        let mpos = (match_index - dds_lowest) as usize;
        debug_assert!(mpos + 4 <= dprefix.len());

        let mut current_ml = 0usize;
        if mem::read32(dprefix, mpos) == mem::read32(bytes.prefix, pos) {
            current_ml = 4 + mem::count_2segments(
                bytes.prefix,
                pos + 4,
                limit_pos,
                dprefix,
                mpos + 4,
                dprefix.len(),
                bytes.prefix,
                0,
            );
        }
        if current_ml > ml {
            ml = current_ml;
            *offset_out = curr
                .wrapping_sub(match_index.wrapping_add(dds_index_delta))
                .wrapping_add(REP_MOVE);
            if pos + current_ml == limit_pos {
                return ml;
            }
        }
        dds_attempt += 1;
    }

    let packed = dstate.hash_table[dds_idx + bucket_size as usize - 1];
    let mut chain_index = packed >> 8;
    let chain_length = packed & 0xFF;
    let chain_attempts = nb_attempts - dds_attempt;
    let chain_limit = chain_attempts.min(chain_length);

    for _ in 0..chain_limit {
        let match_index = dstate.chain_table[chain_index as usize];
        chain_index += 1;
        debug_assert!(match_index >= dds_lowest);
        let mpos = (match_index - dds_lowest) as usize;
        debug_assert!(mpos + 4 <= dprefix.len());

        let mut current_ml = 0usize;
        if mem::read32(dprefix, mpos) == mem::read32(bytes.prefix, pos) {
            current_ml = 4 + mem::count_2segments(
                bytes.prefix,
                pos + 4,
                limit_pos,
                dprefix,
                mpos + 4,
                dprefix.len(),
                bytes.prefix,
                0,
            );
        }
        if current_ml > ml {
            ml = current_ml;
            *offset_out = curr
                .wrapping_sub(match_index.wrapping_add(dds_index_delta))
                .wrapping_add(REP_MOVE);
            if pos + current_ml == limit_pos {
                break;
            }
        }
    }

    ml
}
