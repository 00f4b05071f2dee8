//! Binary-tree index with deferred sorting (the "double unsorted" layout).
//!
//! Each indexed position owns two adjacent `u32` slots in the chain table,
//! forming a binary search tree per hash bucket keyed by the lexicographic
//! order of the suffix at that position. Insertion is deferred: new
//! positions are chained into their bucket with the larger slot holding
//! [`UNSORTED_MARK`]; the next search reverses the unsorted run onto a stack
//! and sorts it into the tree before descending.
//!
//! Corresponds to `zstd_lazy.c` (lines 22-449):
//!   - [`update_dubt`]          ← `ZSTD_updateDUBT`
//!   - `insert_dubt1`           ← `ZSTD_insertDUBT1`
//!   - `find_better_dict_match` ← `ZSTD_DUBT_findBetterDictMatch`
//!   - `dubt_find_best_match`   ← `ZSTD_DUBT_findBestMatch`
//!   - [`find_best_match`]      ← `ZSTD_BtFindBestMatch`

use crate::lazy::hash::hash_ptr;
use crate::lazy::types::{DictMode, DictView, MatchState, HASH_READ_SIZE, UNSORTED_MARK};
use crate::mem::{self, highbit32};
use crate::seq::REP_MOVE;
use crate::window::{Window, WindowBytes};

/// Slot index standing in for "stop writing here" once the descent walked
/// past the tree's reach.
const PARKED: usize = usize::MAX;

#[inline(always)]
fn set_slot(bt: &mut [u32], slot: usize, value: u32) {
    if slot != PARKED {
        bt[slot] = value;
    }
}

/// Count match bytes between `cur[cur_pos..cur_limit]` and the bytes at
/// logical index `mat_idx`, switching to the two-segment comparator when the
/// candidate continuation starts in the ext segment. Folds the `mBase`
/// selection of `ZSTD_insertDUBT1` / `ZSTD_DUBT_findBestMatch`
/// (zstd_lazy.c:111-126, 324-332) into one index branch.
#[inline]
fn count_from(
    bytes: &WindowBytes<'_>,
    w: &Window,
    cur: &[u8],
    cur_pos: usize,
    cur_limit: usize,
    mat_idx: u32,
) -> usize {
    if mat_idx >= w.dict_limit {
        mem::count(
            cur,
            cur_pos,
            cur_limit,
            bytes.prefix,
            (mat_idx - w.dict_limit) as usize,
        )
    } else {
        mem::count_2segments(
            cur,
            cur_pos,
            cur_limit,
            bytes.ext,
            (mat_idx - w.low_limit) as usize,
            bytes.ext.len(),
            bytes.prefix,
            0,
        )
    }
}

/// Chain every position in `[next_to_update, pos)` into its hash bucket,
/// marking each as unsorted. Sorting is deferred to the next search.
///
/// Equivalent to `ZSTD_updateDUBT` (zstd_lazy.c:26-63).
pub fn update_dubt(ms: &mut MatchState, bytes: &WindowBytes<'_>, pos: usize, mls: u32) {
    let hash_log = ms.c_params.hash_log;
    let bt_mask = (1u32 << (ms.c_params.chain_log - 1)) - 1;
    let base = ms.window.dict_limit;
    let target = base + pos as u32;
    let mut idx = ms.next_to_update;

    debug_assert!(idx >= base);
    debug_assert!(pos + HASH_READ_SIZE <= bytes.prefix.len());

    while idx < target {
        let h = hash_ptr(bytes.prefix, (idx - base) as usize, hash_log, mls) as usize;
        let match_index = ms.hash_table[h];
        let slot = (2 * (idx & bt_mask)) as usize;

        ms.hash_table[h] = idx;
        // Until sorted, the smaller slot carries the bucket chain and the
        // larger slot carries the unsorted marker.
        ms.chain_table[slot] = match_index;
        ms.chain_table[slot + 1] = UNSORTED_MARK;
        idx += 1;
    }
    ms.next_to_update = target;
}

/// Sort one chained-but-unsorted position into its bucket's tree by a
/// standard BST descent. `common_smaller`/`common_larger` carry the number
/// of bytes known equal on each side so re-comparison restarts past them.
///
/// Equivalent to `ZSTD_insertDUBT1` (zstd_lazy.c:70-156).
fn insert_dubt1(
    ms: &mut MatchState,
    bytes: &WindowBytes<'_>,
    curr: u32,
    iend_pos: usize,
    mut nb_compares: u32,
    bt_low: u32,
) {
    let cp = ms.c_params;
    let bt_mask = (1u32 << (cp.chain_log - 1)) - 1;
    let w = ms.window;
    let dict_limit = w.dict_limit;
    let (ibuf, ipos) = bytes.segment(&w, curr);
    let ilimit = if curr >= dict_limit {
        iend_pos
    } else {
        bytes.ext.len()
    };
    let window_low = w.lowest_match_index(curr, cp.window_log);

    let mut common_smaller = 0usize;
    let mut common_larger = 0usize;
    let mut smaller_slot = (2 * (curr & bt_mask)) as usize;
    let mut larger_slot = smaller_slot + 1;
    // The position is unsorted: the smaller slot still holds the bucket
    // chain, the larger slot the (consumed) back-pointer.
    let mut match_index = ms.chain_table[smaller_slot];

    debug_assert!(curr >= bt_low);
    debug_assert!(ipos < ilimit);

    while nb_compares > 0 && match_index > window_low {
        nb_compares -= 1;
        let next_slot = (2 * (match_index & bt_mask)) as usize;
        let mut match_length = common_smaller.min(common_larger);
        debug_assert!(match_index < curr);

        match_length += count_from(
            bytes,
            &w,
            ibuf,
            ipos + match_length,
            ilimit,
            match_index + match_length as u32,
        );

        if ipos + match_length == ilimit {
            // Equal up to the end of input: ordering is unknowable. Abandon
            // the insertion; anything else could corrupt the tree.
            break;
        }

        let match_byte = bytes.byte(&w, match_index + match_length as u32);
        if match_byte < ibuf[ipos + match_length] {
            set_slot(&mut ms.chain_table, smaller_slot, match_index);
            common_smaller = match_length;
            if match_index <= bt_low {
                smaller_slot = PARKED;
                break;
            }
            smaller_slot = next_slot + 1;
            match_index = ms.chain_table[next_slot + 1];
        } else {
            set_slot(&mut ms.chain_table, larger_slot, match_index);
            common_larger = match_length;
            if match_index <= bt_low {
                larger_slot = PARKED;
                break;
            }
            larger_slot = next_slot;
            match_index = ms.chain_table[next_slot];
        }
    }

    set_slot(&mut ms.chain_table, smaller_slot, 0);
    set_slot(&mut ms.chain_table, larger_slot, 0);
}

/// Descend the attached dictionary's pre-built tree after the main search,
/// keeping `best_length`/`offset_out` under the same improvement heuristic.
/// Dictionary indices are rebased by `ms.low_limit - dms.next_src`.
///
/// Equivalent to `ZSTD_DUBT_findBetterDictMatch` (zstd_lazy.c:159-234).
#[allow(clippy::too_many_arguments)]
fn find_better_dict_match(
    dms: &DictView<'_>,
    bytes: &WindowBytes<'_>,
    w: &Window,
    pos: usize,
    iend_pos: usize,
    offset_out: &mut u32,
    mut best_length: usize,
    mut nb_compares: u32,
    mls: u32,
    curr: u32,
) -> usize {
    let dstate = dms.state;
    let dprefix = dms.bytes.prefix;
    let h = hash_ptr(bytes.prefix, pos, dstate.c_params.hash_log, mls) as usize;
    let mut dict_match_index = dstate.hash_table[h];

    let dict_high_limit = dstate.window.next_src;
    let dict_low_limit = dstate.window.low_limit;
    let dict_index_delta = w.low_limit.wrapping_sub(dict_high_limit);
    let dbase = dstate.window.dict_limit;

    let bt_mask = (1u32 << (dstate.c_params.chain_log - 1)) - 1;
    let bt_low = if bt_mask >= dict_high_limit - dict_low_limit {
        dict_low_limit
    } else {
        dict_high_limit - bt_mask
    };

    let mut common_smaller = 0usize;
    let mut common_larger = 0usize;

    while nb_compares > 0 && dict_match_index > dict_low_limit {
        nb_compares -= 1;
        let next_slot = (2 * (dict_match_index & bt_mask)) as usize;
        debug_assert!(dict_match_index >= dbase);
        let mpos = (dict_match_index - dbase) as usize;
        // The guaranteed-common length may already extend past this
        // candidate's dictionary-resident bytes (a previous candidate's
        // count continued into the prefix); restart the comparison at the
        // segment end, the counter re-verifies the remainder.
        let mut match_length = common_smaller
            .min(common_larger)
            .min(dprefix.len() - mpos);

        match_length += mem::count_2segments(
            bytes.prefix,
            pos + match_length,
            iend_pos,
            dprefix,
            mpos + match_length,
            dprefix.len(),
            bytes.prefix,
            0,
        );

        if match_length > best_length {
            let match_index = dict_match_index.wrapping_add(dict_index_delta);
            let gain = 4 * (match_length - best_length) as i32;
            let cost = highbit32(curr.wrapping_sub(match_index) + 1) as i32
                - highbit32(*offset_out + 1) as i32;
            if gain > cost {
                best_length = match_length;
                *offset_out = curr.wrapping_sub(match_index).wrapping_add(REP_MOVE);
            }
            if pos + match_length == iend_pos {
                break; // equal ends: direction unknowable
            }
        }
        if pos + match_length >= iend_pos {
            break;
        }

        let match_byte = if mpos + match_length < dprefix.len() {
            dprefix[mpos + match_length]
        } else {
            // The count continued into the current prefix; read the next
            // byte there via the rebased index.
            bytes.byte(
                w,
                dict_match_index.wrapping_add(dict_index_delta) + match_length as u32,
            )
        };
        if dict_match_index <= bt_low {
            break; // beyond tree reach
        }
        if match_byte < bytes.prefix[pos + match_length] {
            common_smaller = match_length;
            dict_match_index = dstate.chain_table[next_slot + 1];
        } else {
            common_larger = match_length;
            dict_match_index = dstate.chain_table[next_slot];
        }
    }

    best_length
}

/// Sort the bucket's unsorted run, insert `curr`, and return the longest
/// match discovered during the descent.
///
/// Equivalent to `ZSTD_DUBT_findBestMatch` (zstd_lazy.c:237-383).
#[allow(clippy::too_many_arguments)]
fn dubt_find_best_match(
    ms: &mut MatchState,
    bytes: &WindowBytes<'_>,
    dict: Option<&DictView<'_>>,
    pos: usize,
    iend_pos: usize,
    offset_out: &mut u32,
    mls: u32,
    dict_mode: DictMode,
) -> usize {
    let cp = ms.c_params;
    let h = hash_ptr(bytes.prefix, pos, cp.hash_log, mls) as usize;
    let w = ms.window;
    let curr = w.dict_limit + pos as u32;
    let window_low = w.lowest_match_index(curr, cp.window_log);
    let bt_mask = (1u32 << (cp.chain_log - 1)) - 1;
    let bt_low = if bt_mask >= curr { 0 } else { curr - bt_mask };
    let unsort_limit = bt_low.max(window_low);

    let mut match_index = ms.hash_table[h];
    let mut nb_compares = 1u32 << cp.search_log;
    let mut nb_candidates = nb_compares;
    let mut previous_candidate = 0u32;

    debug_assert!(pos + HASH_READ_SIZE <= bytes.prefix.len());
    debug_assert!(dict_mode != DictMode::DedicatedDictSearch);

    // Reach the end of the unsorted candidate run, reversing it onto a
    // stack threaded through the (consumed) unsorted-mark slots.
    loop {
        let slot = (2 * (match_index & bt_mask)) as usize;
        if !(match_index > unsort_limit
            && ms.chain_table[slot + 1] == UNSORTED_MARK
            && nb_candidates > 1)
        {
            break;
        }
        ms.chain_table[slot + 1] = previous_candidate;
        previous_candidate = match_index;
        match_index = ms.chain_table[slot];
        nb_candidates -= 1;
    }

    // Nullify a trailing still-unsorted candidate rather than risk a
    // mis-sort; costs a little ratio, keeps the walk bounded.
    {
        let slot = (2 * (match_index & bt_mask)) as usize;
        if match_index > unsort_limit && ms.chain_table[slot + 1] == UNSORTED_MARK {
            ms.chain_table[slot] = 0;
            ms.chain_table[slot + 1] = 0;
        }
    }

    // Batch-sort the stacked candidates, oldest last.
    match_index = previous_candidate;
    while match_index != 0 {
        let slot = (2 * (match_index & bt_mask)) as usize;
        let next_candidate = ms.chain_table[slot + 1];
        insert_dubt1(ms, bytes, match_index, iend_pos, nb_candidates, unsort_limit);
        match_index = next_candidate;
        nb_candidates += 1;
    }

    // Find the longest match while inserting `curr` itself.
    let mut common_smaller = 0usize;
    let mut common_larger = 0usize;
    let mut smaller_slot = (2 * (curr & bt_mask)) as usize;
    let mut larger_slot = smaller_slot + 1;
    let mut match_end_idx = curr + 8 + 1;
    let mut best_length = 0usize;

    let mut match_index = ms.hash_table[h];
    ms.hash_table[h] = curr;

    while nb_compares > 0 && match_index > window_low {
        nb_compares -= 1;
        let next_slot = (2 * (match_index & bt_mask)) as usize;
        let mut match_length = common_smaller.min(common_larger);

        match_length += count_from(
            bytes,
            &w,
            bytes.prefix,
            pos + match_length,
            iend_pos,
            match_index + match_length as u32,
        );

        if match_length > best_length {
            if match_length > (match_end_idx - match_index) as usize {
                match_end_idx = match_index + match_length as u32;
            }
            let gain = 4 * (match_length - best_length) as i32;
            let cost =
                highbit32(curr - match_index + 1) as i32 - highbit32(*offset_out + 1) as i32;
            if gain > cost {
                best_length = match_length;
                *offset_out = curr - match_index + REP_MOVE;
            }
            if pos + match_length == iend_pos {
                if dict_mode == DictMode::DictMatchState {
                    // Also skip the dictionary descent below.
                    nb_compares = 0;
                }
                break; // equal ends: ordering unknowable
            }
        }

        let match_byte = bytes.byte(&w, match_index + match_length as u32);
        if match_byte < bytes.prefix[pos + match_length] {
            set_slot(&mut ms.chain_table, smaller_slot, match_index);
            common_smaller = match_length;
            if match_index <= bt_low {
                smaller_slot = PARKED;
                break;
            }
            smaller_slot = next_slot + 1;
            match_index = ms.chain_table[next_slot + 1];
        } else {
            set_slot(&mut ms.chain_table, larger_slot, match_index);
            common_larger = match_length;
            if match_index <= bt_low {
                larger_slot = PARKED;
                break;
            }
            larger_slot = next_slot;
            match_index = ms.chain_table[next_slot];
        }
    }

    set_slot(&mut ms.chain_table, smaller_slot, 0);
    set_slot(&mut ms.chain_table, larger_slot, 0);

    if dict_mode == DictMode::DictMatchState && nb_compares > 0 {
        debug_assert!(dict.is_some());
        if let Some(dms) = dict {
            best_length = find_better_dict_match(
                dms,
                bytes,
                &w,
                pos,
                iend_pos,
                offset_out,
                best_length,
                nb_compares,
                mls,
                curr,
            );
        }
    }

    debug_assert!(match_end_idx > curr + 8);
    // Skip indexing the repetitive interior of a long match.
    ms.next_to_update = match_end_idx - 8;
    best_length
}

/// Tree updater providing the best match: bulk catch-up, then sort-and-search.
///
/// Equivalent to `ZSTD_BtFindBestMatch` (zstd_lazy.c:386-398).
#[allow(clippy::too_many_arguments)]
pub fn find_best_match(
    ms: &mut MatchState,
    bytes: &WindowBytes<'_>,
    dict: Option<&DictView<'_>>,
    pos: usize,
    iend_pos: usize,
    offset_out: &mut u32,
    mls: u32,
    dict_mode: DictMode,
) -> usize {
    let curr = ms.window.dict_limit + pos as u32;
    if curr < ms.next_to_update {
        return 0; // inside an area skipped by a previous long match
    }
    update_dubt(ms, bytes, pos, mls);
    dubt_find_best_match(ms, bytes, dict, pos, iend_pos, offset_out, mls, dict_mode)
}
