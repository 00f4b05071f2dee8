//! Hash-chain index.
//!
//! A hash table maps each bucket to the most recent position; the chain
//! table threads every indexed position to the previous one in its bucket.
//! Insertion is folded into the search: every call first catches the tables
//! up to the probe position, then walks the chain newest-first.
//!
//! Corresponds to `zstd_lazy.c` (lines 453-861):
//!   - [`insert_and_find_first_index_internal`] ← `ZSTD_insertAndFindFirstIndex_internal`
//!   - [`insert_and_find_first_index`]          ← `ZSTD_insertAndFindFirstIndex`
//!   - [`find_best_match`]                      ← `ZSTD_HcFindBestMatch_generic`
//!   - `dict_match_state_tail`                  ← its `ZSTD_dictMatchState` tail

use crate::lazy::hash::hash_ptr;
use crate::lazy::types::{DictMode, DictView, MatchState};
use crate::mem;
use crate::seq::REP_MOVE;
use crate::window::WindowBytes;

/// Insert every position in `[next_to_update, pos)` into the hash and chain
/// tables, then return the bucket head for the hash at `pos`.
///
/// `pos` is a prefix position; insertion never touches the ext segment.
///
/// Equivalent to `ZSTD_insertAndFindFirstIndex_internal` (zstd_lazy.c:460-482).
#[inline]
pub fn insert_and_find_first_index_internal(
    ms: &mut MatchState,
    bytes: &WindowBytes<'_>,
    pos: usize,
    mls: u32,
) -> u32 {
    let hash_log = ms.c_params.hash_log;
    let chain_mask = (1u32 << ms.c_params.chain_log) - 1;
    let base = ms.window.dict_limit;
    let target = base + pos as u32;
    let mut idx = ms.next_to_update;

    debug_assert!(idx >= base);
    while idx < target {
        let h = hash_ptr(bytes.prefix, (idx - base) as usize, hash_log, mls) as usize;
        ms.chain_table[(idx & chain_mask) as usize] = ms.hash_table[h];
        ms.hash_table[h] = idx;
        idx += 1;
    }
    ms.next_to_update = target;

    ms.hash_table[hash_ptr(bytes.prefix, pos, hash_log, mls) as usize]
}

/// Catch the tables up to `pos` using the state's own `min_match`. Exposed
/// for dictionary loading.
///
/// Equivalent to `ZSTD_insertAndFindFirstIndex` (zstd_lazy.c:484-487).
pub fn insert_and_find_first_index(ms: &mut MatchState, bytes: &WindowBytes<'_>, pos: usize) -> u32 {
    let mls = ms.c_params.mls();
    insert_and_find_first_index_internal(ms, bytes, pos, mls)
}

/// Walk the hash chain for the longest match at `pos`, bounded by the window
/// and `2^search_log` attempts. Returns the best length found (`3` when
/// nothing usable was seen) and writes `raw_offset + REP_MOVE` through
/// `offset_out` whenever it improves the best.
///
/// Equivalent to `ZSTD_HcFindBestMatch_generic` (zstd_lazy.c:606-793); the
/// dictionary tails live in `dict_match_state_tail` and
/// `dds::find_best_match_tail`.
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
) -> usize {
    let cp = ms.c_params;
    let chain_size = 1u32 << cp.chain_log;
    let chain_mask = chain_size - 1;
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
    let min_chain = if curr > chain_size { curr - chain_size } else { 0 };
    let mut nb_attempts = 1u32 << cp.search_log;
    let mut ml: usize = 3;

    let mut match_index = insert_and_find_first_index_internal(ms, bytes, pos, mls);

    while match_index >= low_limit && nb_attempts > 0 {
        let mut current_ml = 0usize;
        if dict_mode != DictMode::ExtDict || match_index >= dict_limit {
            debug_assert!(match_index >= dict_limit);
            let mpos = (match_index - dict_limit) as usize;
            // Cheap filter: a candidate can only improve if it agrees at the
            // byte just past the current best length.
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
                break; // best possible; a longer read would run off the block
            }
        }

        if match_index <= min_chain {
            break;
        }
        match_index = ms.chain_table[(match_index & chain_mask) as usize];
        nb_attempts -= 1;
    }

    match dict_mode {
        DictMode::DedicatedDictSearch => {
            debug_assert!(dict.is_some());
            if let Some(dms) = dict {
                ml = crate::lazy::dds::find_best_match_tail(
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

/// Continue a search in an attached dictionary match state, walking its hash
/// chain with the remaining attempt budget. Shared by the hash-chain and
/// row-hash finders.
///
/// Equivalent to the `ZSTD_dictMatchState` tails of
/// `ZSTD_HcFindBestMatch_generic` (zstd_lazy.c:759-790) and
/// `ZSTD_RowFindBestMatch_generic` (zstd_lazy.c:1392-1424), which are
/// identical in the original and deduplicated here.
#[allow(clippy::too_many_arguments)]
pub(crate) fn dict_match_state_tail(
    dms: &DictView<'_>,
    bytes: &WindowBytes<'_>,
    pos: usize,
    limit_pos: usize,
    offset_out: &mut u32,
    curr: u32,
    ms_dict_limit: u32,
    mut nb_attempts: u32,
    mut ml: usize,
    mls: u32,
) -> usize {
    let dstate = dms.state;
    let dprefix = dms.bytes.prefix;
    if dprefix.len() < 4 {
        return ml;
    }
    let dchain_size = 1u32 << dstate.c_params.chain_log;
    let dchain_mask = dchain_size - 1;
    let dms_lowest = dstate.window.dict_limit;
    let dms_size = dstate.window.next_src;
    let dms_index_delta = ms_dict_limit.wrapping_sub(dms_size);
    let dms_min_chain = if dms_size > dchain_size {
        dms_size - dchain_size
    } else {
        0
    };

    let h = hash_ptr(bytes.prefix, pos, dstate.c_params.hash_log, mls);
    let mut match_index = dstate.hash_table[h as usize];

    while match_index >= dms_lowest && nb_attempts > 0 {
        let mut current_ml = 0usize;
        let mpos = (match_index - dms_lowest) as usize;
        debug_assert!(mpos + 4 <= dprefix.len());
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
                .wrapping_sub(match_index.wrapping_add(dms_index_delta))
                .wrapping_add(REP_MOVE);
            if pos + current_ml == limit_pos {
                break;
            }
        }

        if match_index <= dms_min_chain {
            break;
        }
        match_index = dstate.chain_table[(match_index & dchain_mask) as usize];
        nb_attempts -= 1;
    }

    ml
}
