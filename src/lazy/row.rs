//! Row-hash index with tag acceleration.
//!
//! The hash table is partitioned into rows of 16 or 32 position slots. Each
//! row is a circular buffer whose write cursor (the "head" byte) lives in a
//! parallel tag table together with one tag byte per slot; the head moves
//! backwards on every insert so bit *k* of the rotated match bitmap refers
//! to the *k*-th most recent entry. A search broadcasts the probe tag,
//! byte-compares it against the row's tags ([`crate::lazy::tags`]), and only
//! fully verifies the slots whose tag agreed. An 8-entry ring of
//! precomputed hashes keeps the per-position hashing off the critical path.
//!
//! Corresponds to `zstd_lazy.c` (lines 1024-1427):
//!   - `row_next_index`      ← `ZSTD_row_nextIndex`
//!   - [`fill_hash_cache`]   ← `ZSTD_row_fillHashCache`
//!   - `next_cached_hash`    ← `ZSTD_row_nextCachedHash`
//!   - `row_update_internal` ← `ZSTD_row_update_internal`
//!   - [`row_update`]        ← `ZSTD_row_update`
//!   - [`find_best_match`]   ← `ZSTD_RowFindBestMatch_generic`

use crate::lazy::chain::dict_match_state_tail;
use crate::lazy::dds;
use crate::lazy::hash::hash_ptr;
use crate::lazy::tags;
use crate::lazy::types::{
    DictMode, DictView, MatchState, HASH_OFFSET, HASH_READ_SIZE, PREFETCH_MASK, PREFETCH_NB,
    ROW_ENTRIES_32, SHORT_BITS, SHORT_MASK,
};
use crate::mem;
use crate::seq::REP_MOVE;
use crate::window::WindowBytes;

/// Move a row's head cursor one slot backwards and return the slot index to
/// write at.
///
/// Equivalent to `ZSTD_row_nextIndex` (zstd_lazy.c:1028-1032).
#[inline(always)]
fn row_next_index(head: &mut u8, row_mask: u32) -> u32 {
    let next = (*head as u32).wrapping_sub(1) & row_mask;
    *head = next as u8;
    next
}

/// Prime the hash cache for the first [`PREFETCH_NB`] positions at
/// `next_to_update`, bounded by `limit_pos`. Must run before the first
/// search of a block; the cache then slides forward one position per
/// insert.
///
/// Equivalent to `ZSTD_row_fillHashCache` (zstd_lazy.c:1057-1080).
pub fn fill_hash_cache(
    ms: &mut MatchState,
    bytes: &WindowBytes<'_>,
    mls: u32,
    limit_pos: usize,
) {
    let row_hash_log = ms.row_hash_log();
    let base = ms.window.dict_limit;
    let limit_idx = base + limit_pos as u32;
    let mut idx = ms.next_to_update;
    let lim = (idx + PREFETCH_NB as u32).min(limit_idx);
    while idx < lim {
        let h = hash_ptr(
            bytes.prefix,
            (idx - base) as usize,
            row_hash_log + SHORT_BITS,
            mls,
        );
        ms.hash_cache[(idx as usize) & PREFETCH_MASK] = h;
        idx += 1;
    }
}

/// Consume the cached hash for `idx` and prime the slot `idx + PREFETCH_NB`
/// will need. Positions whose hash window would cross the end of the prefix
/// are never consumed (searches stop [`HASH_READ_SIZE`] bytes early), so
/// their slots are simply left unprimed.
///
/// Equivalent to `ZSTD_row_nextCachedHash` (zstd_lazy.c:1086-1101).
#[inline(always)]
fn next_cached_hash(
    cache: &mut [u32; PREFETCH_NB],
    prefix: &[u8],
    base: u32,
    idx: u32,
    row_hash_log: u32,
    mls: u32,
) -> u32 {
    let target = idx + PREFETCH_NB as u32;
    let tpos = (target - base) as usize;
    let hash = cache[(idx as usize) & PREFETCH_MASK];
    if tpos + HASH_READ_SIZE <= prefix.len() {
        cache[(target as usize) & PREFETCH_MASK] =
            hash_ptr(prefix, tpos, row_hash_log + SHORT_BITS, mls);
    }
    hash
}

/// Insert every position in `[next_to_update, target_pos)` into its row.
///
/// Equivalent to `ZSTD_row_update_internal` (zstd_lazy.c:1107-1133).
fn row_update_internal(
    ms: &mut MatchState,
    bytes: &WindowBytes<'_>,
    target_pos: usize,
    mls: u32,
    row_log: u32,
    row_mask: u32,
    use_cache: bool,
) {
    let row_hash_log = ms.row_hash_log();
    let base = ms.window.dict_limit;
    let target = base + target_pos as u32;
    let entries = (row_mask + 1) as usize;
    let mut idx = ms.next_to_update;

    while idx < target {
        let hash = if use_cache {
            next_cached_hash(
                &mut ms.hash_cache,
                bytes.prefix,
                base,
                idx,
                row_hash_log,
                mls,
            )
        } else {
            hash_ptr(
                bytes.prefix,
                (idx - base) as usize,
                row_hash_log + SHORT_BITS,
                mls,
            )
        };
        let row = (hash >> SHORT_BITS) as usize;
        let ht_off = row << row_log;
        let tag_off = row * (entries + 1);
        let slot = row_next_index(&mut ms.tag_table[tag_off], row_mask);
        ms.tag_table[tag_off + HASH_OFFSET + slot as usize] = (hash & SHORT_MASK) as u8;
        ms.hash_table[ht_off + slot as usize] = idx;
        idx += 1;
    }
    ms.next_to_update = target;
}

/// Catch the rows up to `pos` without the cache. Exposed for dictionary
/// loading, where no search follows.
///
/// Equivalent to `ZSTD_row_update` (zstd_lazy.c:1139-1146).
pub fn row_update(ms: &mut MatchState, bytes: &WindowBytes<'_>, pos: usize) {
    let row_log = ms.row_log();
    let row_mask = (1u32 << row_log) - 1;
    let mls = ms.c_params.mls();
    row_update_internal(ms, bytes, pos, mls, row_log, row_mask, false);
}

/// Tag-filtered search: update rows up to `pos`, collect the candidates
/// whose tag matches (newest first), self-insert the current position, then
/// fully verify the collected candidates.
///
/// Equivalent to `ZSTD_RowFindBestMatch_generic` (zstd_lazy.c:1161-1427);
/// the dictionary tails are shared with the hash-chain finder.
#[allow(clippy::too_many_arguments)]
pub fn find_best_match(
    ms: &mut MatchState,
    bytes: &WindowBytes<'_>,
    dict: Option<&DictView<'_>>,
    pos: usize,
    limit_pos: usize,
    offset_out: &mut u32,
    mls: u32,
    dict_mode: DictMode,
    row_log: u32,
    entries: u32,
    row_mask: u32,
) -> usize {
    let cp = ms.c_params;
    let w = ms.window;
    let dict_limit = w.dict_limit;
    let curr = dict_limit + pos as u32;
    let max_distance = 1u32 << cp.window_log;
    let lowest_valid = w.low_limit;
    let within_max_distance = if curr.wrapping_sub(lowest_valid) > max_distance {
        curr - max_distance
    } else {
        lowest_valid
    };
    let is_dictionary = w.loaded_dict_end != 0;
    let low_limit = if is_dictionary {
        lowest_valid
    } else {
        within_max_distance
    };
    let mut nb_attempts = 1u32 << cp.search_log;
    let mut ml: usize = 3;
    let row_hash_log = ms.row_hash_log();
    let entries_per_row = entries as usize;

    // Bring the rows up to date, then take the current position's hash.
    row_update_internal(ms, bytes, pos, mls, row_log, row_mask, true);
    let hash = next_cached_hash(
        &mut ms.hash_cache,
        bytes.prefix,
        dict_limit,
        curr,
        row_hash_log,
        mls,
    );
    let row = (hash >> SHORT_BITS) as usize;
    let tag = (hash & SHORT_MASK) as u8;
    let ht_off = row << row_log;
    let tag_off = row * (entries_per_row + 1);
    let head = (ms.tag_table[tag_off] as u32) & row_mask;

    // Tag bitmap, rotated so bit k names the k-th most recent entry.
    let mut matches = {
        let tag_row = &ms.tag_table[tag_off + HASH_OFFSET..tag_off + HASH_OFFSET + entries_per_row];
        let raw = if entries == 16 {
            tags::bitmap16(tag_row, tag)
        } else {
            tags::bitmap32(tag_row, tag)
        };
        tags::rotate_right(raw, head, entries)
    };

    let mut match_buffer = [0u32; ROW_ENTRIES_32 as usize];
    let mut num_matches = 0usize;

    while matches > 0 && nb_attempts > 0 {
        let k = tags::next_set_bit(matches);
        let match_pos = (head + k) & row_mask;
        let match_index = ms.hash_table[ht_off + match_pos as usize];
        if match_index < low_limit {
            break;
        }
        match_buffer[num_matches] = match_index;
        num_matches += 1;
        nb_attempts -= 1;
        matches &= matches - 1;
    }

    // Self-insert the current position so the next update skips it.
    {
        debug_assert!(ms.next_to_update == curr);
        let slot = row_next_index(&mut ms.tag_table[tag_off], row_mask);
        ms.tag_table[tag_off + HASH_OFFSET + slot as usize] = tag;
        ms.hash_table[ht_off + slot as usize] = ms.next_to_update;
        ms.next_to_update += 1;
    }

    // Full verification, newest candidate first.
    for &match_index in &match_buffer[..num_matches] {
        let mut current_ml = 0usize;
        debug_assert!(match_index < curr);
        debug_assert!(match_index >= low_limit);

        if dict_mode != DictMode::ExtDict || match_index >= dict_limit {
            debug_assert!(match_index >= dict_limit);
            let mpos = (match_index - dict_limit) as usize;
            if bytes.prefix[mpos + ml] == bytes.prefix[pos + ml] {
                current_ml = mem::count(bytes.prefix, pos, limit_pos, bytes.prefix, mpos);
            }
        } else {
            let mpos = (match_index - w.low_limit) as usize;
            debug_assert!(mpos + 4 <= bytes.ext.len());
            if mem::read32(bytes.ext, mpos) == mem::read32(bytes.prefix, pos) {
                current_ml = 4 + mem::count_2segments(
                    bytes.prefix,
                    pos + 4,
                    limit_pos,
                    bytes.ext,
                    mpos + 4,
                    bytes.ext.len(),
                    bytes.prefix,
                    0,
                );
            }
        }

        if current_ml > ml {
            ml = current_ml;
            *offset_out = curr - match_index + REP_MOVE;
            if pos + current_ml == limit_pos {
                break;
            }
        }
    }

    match dict_mode {
        DictMode::DedicatedDictSearch => {
            debug_assert!(dict.is_some());
            if let Some(dms) = dict {
                ml = dds::find_best_match_tail(
                    dms, bytes, pos, limit_pos, offset_out, curr, dict_limit, nb_attempts, ml,
                    mls,
                );
            }
        }
        DictMode::DictMatchState => {
            debug_assert!(dict.is_some());
            if let Some(dms) = dict {
                ml = dict_match_state_tail(
                    dms, bytes, pos, limit_pos, offset_out, curr, dict_limit, nb_attempts, ml,
                    mls,
                );
            }
        }
        _ => {}
    }

    ml
}
