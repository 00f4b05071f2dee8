//! Lazy parser: the block-compression main loop.
//!
//! Walks `ip` over the block, probes the repeat offsets, asks the selected
//! index for the best match, and at depth 1 or 2 speculatively searches one
//! position ahead before committing, taking the later candidate only when
//! its length/offset gain clears a margin. Emitted sequences land in a
//! [`SeqStore`]; the repeat pair is maintained across the block and handed
//! back through `rep`.
//!
//! Two loop bodies exist, mirroring the two addressing regimes: the main
//! loop for `noDict` and the attached-dictionary modes, and a separate loop
//! for `extDict`, where every probe may resolve through the scrolled-off
//! segment.
//!
//! Corresponds to `zstd_lazy.c` (lines 1533-2203):
//!   - `search_max`             ← the `searchFuncs` dispatch table
//!   - `lazy_generic`           ← `ZSTD_compressBlock_lazy_generic`
//!   - `lazy_ext_dict_generic`  ← `ZSTD_compressBlock_lazy_extDict_generic`
//!   - [`compress_block_greedy`] and friends ← the
//!     `ZSTD_compressBlock_{greedy,lazy,lazy2,btlazy2}[_row]` wrappers

use crate::lazy::types::{
    DictMode, DictView, MatchState, SearchMethod, SearchParams, HASH_READ_SIZE, K_SEARCH_STRENGTH,
    MINMATCH,
};
use crate::lazy::{chain, row, tree};
use crate::mem::{self, highbit32};
use crate::seq::{SeqStore, REPCODE_1, REP_MOVE};
use crate::window::WindowBytes;

/// Offset placeholder fed to the search so the first improvement heuristic
/// sees a maximally expensive incumbent.
const OFFSET_SENTINEL: u32 = 999_999_999;

/// Resolve a repeat index to `(segment, position, segment end)` in the
/// extDict regime. The caller has already validated the index against the
/// boundary and window tests. Equivalent to the `repBase`/`repMatchEnd`
/// selection of `ZSTD_compressBlock_lazy_extDict_generic`
/// (zstd_lazy.c:2019-2024).
#[inline(always)]
fn ext_rep_segment<'a>(
    prefix: &'a [u8],
    ext: &'a [u8],
    w: &crate::window::Window,
    iend: usize,
    rep_index: u32,
) -> (&'a [u8], usize, usize) {
    if rep_index < w.dict_limit {
        (ext, (rep_index - w.low_limit) as usize, ext.len())
    } else {
        (prefix, (rep_index - w.dict_limit) as usize, iend)
    }
}

/// Dispatch one search to the selected index.
///
/// Equivalent to the `searchFuncs` / `searchMax` function table of
/// `ZSTD_compressBlock_lazy_generic` (zstd_lazy.c:1557-1590), with the
/// `selectMLS` / `selectEntries` wrapper layers folded into the callees.
#[inline(always)]
fn search_max(
    ms: &mut MatchState,
    bytes: &WindowBytes<'_>,
    dict: Option<&DictView<'_>>,
    pos: usize,
    iend_pos: usize,
    offset_out: &mut u32,
    method: SearchMethod,
    dict_mode: DictMode,
) -> usize {
    let mls = ms.c_params.mls();
    match method {
        SearchMethod::HashChain => {
            chain::find_best_match(ms, bytes, dict, pos, iend_pos, offset_out, mls, dict_mode)
        }
        SearchMethod::BinaryTree => {
            tree::find_best_match(ms, bytes, dict, pos, iend_pos, offset_out, mls, dict_mode)
        }
        SearchMethod::RowHash => {
            let row_log = ms.row_log();
            let entries = 1u32 << row_log;
            row::find_best_match(
                ms,
                bytes,
                dict,
                pos,
                iend_pos,
                offset_out,
                mls,
                dict_mode,
                row_log,
                entries,
                entries - 1,
            )
        }
    }
}

/// Compress one block, appending sequences to `seqs` and returning the
/// number of trailing literal bytes after the last match.
///
/// The block is the final `src_size` bytes of `bytes.prefix`; the state's
/// window must already cover it. `rep` is the in/out repeat pair (`0`
/// disables an entry in `noDict` mode; the dictionary modes require both
/// non-zero). `dict` must be `Some` exactly for the attached-dictionary
/// modes.
///
/// Covers the `ZSTD_compressBlock_*` entry surface of `zstd_lazy.c`
/// (lines 1817-1958 and 2152-2203) through one parameterised function.
pub fn compress_block(
    ms: &mut MatchState,
    seqs: &mut SeqStore,
    rep: &mut [u32; 2],
    bytes: WindowBytes<'_>,
    dict: Option<&DictView<'_>>,
    src_size: usize,
    params: SearchParams,
) -> usize {
    debug_assert!(src_size <= bytes.prefix.len());
    debug_assert!(
        ms.window.next_src - ms.window.dict_limit == bytes.prefix.len() as u32,
        "window does not describe the supplied prefix"
    );
    match params.dict_mode {
        DictMode::ExtDict => {
            debug_assert!(dict.is_none());
            lazy_ext_dict_generic(ms, seqs, rep, &bytes, src_size, params.method, params.depth)
        }
        mode => lazy_generic(
            ms,
            seqs,
            rep,
            &bytes,
            dict,
            src_size,
            params.method,
            params.depth,
            mode,
        ),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main loop: noDict / dictMatchState / dedicatedDictSearch
// ─────────────────────────────────────────────────────────────────────────────

/// Equivalent to `ZSTD_compressBlock_lazy_generic` (zstd_lazy.c:1538-1814).
#[allow(clippy::too_many_arguments)]
fn lazy_generic(
    ms: &mut MatchState,
    seqs: &mut SeqStore,
    rep: &mut [u32; 2],
    bytes: &WindowBytes<'_>,
    dict: Option<&DictView<'_>>,
    src_size: usize,
    method: SearchMethod,
    depth: u32,
    dict_mode: DictMode,
) -> usize {
    let prefix = bytes.prefix;
    let iend = prefix.len();
    let istart = iend - src_size;
    let ilimit = iend.saturating_sub(HASH_READ_SIZE);
    let base = ms.window.dict_limit;
    let prefix_lowest_index = ms.window.dict_limit;
    let window_log = ms.c_params.window_log;

    let mut offset_1 = rep[0];
    let mut offset_2 = rep[1];
    let mut saved_offset = 0u32;

    let is_dxs = matches!(
        dict_mode,
        DictMode::DictMatchState | DictMode::DedicatedDictSearch
    );
    debug_assert!(is_dxs == dict.is_some());
    let dict_prefix: &[u8] = match dict {
        Some(d) => d.bytes.prefix,
        None => &[],
    };
    let (dict_lowest_index, dict_index_delta, dict_len) = match dict {
        Some(d) if is_dxs => {
            let lowest = d.state.window.dict_limit;
            (
                lowest,
                d.index_delta(prefix_lowest_index),
                (d.end_index() - lowest) as usize,
            )
        }
        _ => (0, 0, 0),
    };
    let dict_and_prefix_length = istart + dict_len;

    let mut ip = istart;
    let mut anchor = istart;
    if dict_and_prefix_length == 0 {
        // No history at all: the first position can never match.
        ip += 1;
    }

    if dict_mode == DictMode::NoDict {
        let curr = base + ip as u32;
        let window_low = ms.window.lowest_prefix_index(curr, window_log);
        let max_rep = curr - window_low;
        // A repeat offset wider than the current window cannot be probed;
        // zero it now and restore the saved value at block end.
        if offset_2 > max_rep {
            saved_offset = offset_2;
            offset_2 = 0;
        }
        if offset_1 > max_rep {
            saved_offset = offset_1;
            offset_1 = 0;
        }
    }
    if is_dxs {
        // The dictionary-mode repeat probes do not handle disabled entries.
        debug_assert!(offset_1 > 0 && offset_2 > 0);
        debug_assert!(offset_1 as usize <= dict_and_prefix_length);
        debug_assert!(offset_2 as usize <= dict_and_prefix_length);
    }

    if method == SearchMethod::RowHash {
        row::fill_hash_cache(ms, bytes, ms.c_params.mls(), ilimit);
    }

    while ip < ilimit {
        let mut match_length = 0usize;
        let mut offset = 0u32;
        let mut start = ip + 1;

        // Repeat-code probe at ip+1.
        if is_dxs {
            let rep_index = (base + ip as u32 + 1).wrapping_sub(offset_1);
            if prefix_lowest_index
                .wrapping_sub(1)
                .wrapping_sub(rep_index)
                >= 3
            {
                let (rbuf, rpos, rend) = if rep_index < prefix_lowest_index {
                    (
                        dict_prefix,
                        (rep_index.wrapping_sub(dict_index_delta) - dict_lowest_index) as usize,
                        dict_prefix.len(),
                    )
                } else {
                    (prefix, (rep_index - base) as usize, iend)
                };
                if mem::read32(rbuf, rpos) == mem::read32(prefix, ip + 1) {
                    match_length = 4
                        + mem::count_2segments(
                            prefix,
                            ip + 1 + 4,
                            iend,
                            rbuf,
                            rpos + 4,
                            rend,
                            prefix,
                            0,
                        );
                }
            }
        }
        if dict_mode == DictMode::NoDict
            && offset_1 > 0
            && mem::read32(prefix, ip + 1) == mem::read32(prefix, ip + 1 - offset_1 as usize)
        {
            match_length = 4
                + mem::count(
                    prefix,
                    ip + 1 + 4,
                    iend,
                    prefix,
                    ip + 1 + 4 - offset_1 as usize,
                );
        }
        let take_rep = depth == 0 && match_length > 0;

        if !take_rep {
            // Primary search.
            {
                let mut offset_found = OFFSET_SENTINEL;
                let ml2 = search_max(
                    ms,
                    bytes,
                    dict,
                    ip,
                    iend,
                    &mut offset_found,
                    method,
                    dict_mode,
                );
                if ml2 > match_length {
                    match_length = ml2;
                    start = ip;
                    offset = offset_found;
                }
            }

            if match_length < 4 {
                // Jump faster over incompressible sections.
                ip += ((ip - anchor) >> K_SEARCH_STRENGTH) + 1;
                continue;
            }

            if depth >= 1 {
                'deeper: while ip < ilimit {
                    ip += 1;

                    // Depth-1 repeat probe.
                    if dict_mode == DictMode::NoDict
                        && offset != 0
                        && offset_1 > 0
                        && mem::read32(prefix, ip)
                            == mem::read32(prefix, ip - offset_1 as usize)
                    {
                        let ml_rep =
                            4 + mem::count(prefix, ip + 4, iend, prefix, ip + 4 - offset_1 as usize);
                        let gain2 = ml_rep as i32 * 3;
                        let gain1 = match_length as i32 * 3 - highbit32(offset + 1) as i32 + 1;
                        if ml_rep >= 4 && gain2 > gain1 {
                            match_length = ml_rep;
                            offset = 0;
                            start = ip;
                        }
                    }
                    if is_dxs {
                        let rep_index = (base + ip as u32).wrapping_sub(offset_1);
                        if prefix_lowest_index
                            .wrapping_sub(1)
                            .wrapping_sub(rep_index)
                            >= 3
                        {
                            let (rbuf, rpos, rend) = if rep_index < prefix_lowest_index {
                                (
                                    dict_prefix,
                                    (rep_index.wrapping_sub(dict_index_delta)
                                        - dict_lowest_index) as usize,
                                    dict_prefix.len(),
                                )
                            } else {
                                (prefix, (rep_index - base) as usize, iend)
                            };
                            if mem::read32(rbuf, rpos) == mem::read32(prefix, ip) {
                                let ml_rep = 4
                                    + mem::count_2segments(
                                        prefix,
                                        ip + 4,
                                        iend,
                                        rbuf,
                                        rpos + 4,
                                        rend,
                                        prefix,
                                        0,
                                    );
                                let gain2 = ml_rep as i32 * 3;
                                let gain1 =
                                    match_length as i32 * 3 - highbit32(offset + 1) as i32 + 1;
                                if ml_rep >= 4 && gain2 > gain1 {
                                    match_length = ml_rep;
                                    offset = 0;
                                    start = ip;
                                }
                            }
                        }
                    }

                    // Depth-1 full search.
                    {
                        let mut offset2 = OFFSET_SENTINEL;
                        let ml2 =
                            search_max(ms, bytes, dict, ip, iend, &mut offset2, method, dict_mode);
                        let gain2 = ml2 as i32 * 4 - highbit32(offset2 + 1) as i32;
                        let gain1 = match_length as i32 * 4 - highbit32(offset + 1) as i32 + 4;
                        if ml2 >= 4 && gain2 > gain1 {
                            match_length = ml2;
                            offset = offset2;
                            start = ip;
                            continue 'deeper;
                        }
                    }

                    if depth == 2 && ip < ilimit {
                        ip += 1;

                        if dict_mode == DictMode::NoDict
                            && offset != 0
                            && offset_1 > 0
                            && mem::read32(prefix, ip)
                                == mem::read32(prefix, ip - offset_1 as usize)
                        {
                            let ml_rep = 4
                                + mem::count(
                                    prefix,
                                    ip + 4,
                                    iend,
                                    prefix,
                                    ip + 4 - offset_1 as usize,
                                );
                            let gain2 = ml_rep as i32 * 4;
                            let gain1 = match_length as i32 * 4 - highbit32(offset + 1) as i32 + 1;
                            if ml_rep >= 4 && gain2 > gain1 {
                                match_length = ml_rep;
                                offset = 0;
                                start = ip;
                            }
                        }
                        if is_dxs {
                            let rep_index = (base + ip as u32).wrapping_sub(offset_1);
                            if prefix_lowest_index
                                .wrapping_sub(1)
                                .wrapping_sub(rep_index)
                                >= 3
                            {
                                let (rbuf, rpos, rend) = if rep_index < prefix_lowest_index {
                                    (
                                        dict_prefix,
                                        (rep_index.wrapping_sub(dict_index_delta)
                                            - dict_lowest_index)
                                            as usize,
                                        dict_prefix.len(),
                                    )
                                } else {
                                    (prefix, (rep_index - base) as usize, iend)
                                };
                                if mem::read32(rbuf, rpos) == mem::read32(prefix, ip) {
                                    let ml_rep = 4
                                        + mem::count_2segments(
                                            prefix,
                                            ip + 4,
                                            iend,
                                            rbuf,
                                            rpos + 4,
                                            rend,
                                            prefix,
                                            0,
                                        );
                                    let gain2 = ml_rep as i32 * 4;
                                    let gain1 =
                                        match_length as i32 * 4 - highbit32(offset + 1) as i32 + 1;
                                    if ml_rep >= 4 && gain2 > gain1 {
                                        match_length = ml_rep;
                                        offset = 0;
                                        start = ip;
                                    }
                                }
                            }
                        }

                        {
                            let mut offset2 = OFFSET_SENTINEL;
                            let ml2 = search_max(
                                ms, bytes, dict, ip, iend, &mut offset2, method, dict_mode,
                            );
                            let gain2 = ml2 as i32 * 4 - highbit32(offset2 + 1) as i32;
                            let gain1 = match_length as i32 * 4 - highbit32(offset + 1) as i32 + 7;
                            if ml2 >= 4 && gain2 > gain1 {
                                match_length = ml2;
                                offset = offset2;
                                start = ip;
                                continue 'deeper;
                            }
                        }
                    }
                    break; // nothing better: emit the incumbent
                }
            }

            // Catch-up: extend the match start backwards while the
            // preceding bytes agree.
            if offset != 0 {
                let raw = (offset - REP_MOVE) as usize;
                if dict_mode == DictMode::NoDict {
                    while start > anchor
                        && start > raw
                        && prefix[start - 1] == prefix[start - 1 - raw]
                    {
                        start -= 1;
                        match_length += 1;
                    }
                }
                if is_dxs {
                    let match_index = (base + start as u32).wrapping_sub(raw as u32);
                    let (mbuf, mut mpos) = if match_index < prefix_lowest_index {
                        (
                            dict_prefix,
                            (match_index.wrapping_sub(dict_index_delta) - dict_lowest_index)
                                as usize,
                        )
                    } else {
                        (prefix, (match_index - base) as usize)
                    };
                    while start > anchor && mpos > 0 && prefix[start - 1] == mbuf[mpos - 1] {
                        start -= 1;
                        mpos -= 1;
                        match_length += 1;
                    }
                }
                offset_2 = offset_1;
                offset_1 = offset - REP_MOVE;
            }
        }

        // Emit.
        seqs.store_seq(
            &prefix[anchor..start],
            if offset != 0 { offset } else { REPCODE_1 },
            (match_length - MINMATCH) as u32,
        );
        ip = start + match_length;
        anchor = ip;

        // Immediate repeat chain.
        if is_dxs {
            while ip <= ilimit {
                let rep_index = (base + ip as u32).wrapping_sub(offset_2);
                if prefix_lowest_index
                    .wrapping_sub(1)
                    .wrapping_sub(rep_index)
                    >= 3
                {
                    let (rbuf, rpos, rend) = if rep_index < prefix_lowest_index {
                        (
                            dict_prefix,
                            (rep_index.wrapping_sub(dict_index_delta) - dict_lowest_index)
                                as usize,
                            dict_prefix.len(),
                        )
                    } else {
                        (prefix, (rep_index - base) as usize, iend)
                    };
                    if mem::read32(rbuf, rpos) == mem::read32(prefix, ip) {
                        let ml = 4
                            + mem::count_2segments(
                                prefix,
                                ip + 4,
                                iend,
                                rbuf,
                                rpos + 4,
                                rend,
                                prefix,
                                0,
                            );
                        core::mem::swap(&mut offset_1, &mut offset_2);
                        seqs.store_seq(&[], REPCODE_1, (ml - MINMATCH) as u32);
                        ip += ml;
                        anchor = ip;
                        continue;
                    }
                }
                break;
            }
        }
        if dict_mode == DictMode::NoDict {
            while ip <= ilimit
                && offset_2 > 0
                && mem::read32(prefix, ip) == mem::read32(prefix, ip - offset_2 as usize)
            {
                let ml = 4 + mem::count(prefix, ip + 4, iend, prefix, ip + 4 - offset_2 as usize);
                core::mem::swap(&mut offset_1, &mut offset_2);
                seqs.store_seq(&[], REPCODE_1, (ml - MINMATCH) as u32);
                ip += ml;
                anchor = ip;
            }
        }
    }

    // Save the repeat pair for the next block, restoring a zeroed slot from
    // the value saved at entry.
    rep[0] = if offset_1 != 0 { offset_1 } else { saved_offset };
    rep[1] = if offset_2 != 0 { offset_2 } else { saved_offset };

    iend - anchor
}

// ─────────────────────────────────────────────────────────────────────────────
// extDict loop
// ─────────────────────────────────────────────────────────────────────────────

/// Equivalent to `ZSTD_compressBlock_lazy_extDict_generic`
/// (zstd_lazy.c:1961-2149).
fn lazy_ext_dict_generic(
    ms: &mut MatchState,
    seqs: &mut SeqStore,
    rep: &mut [u32; 2],
    bytes: &WindowBytes<'_>,
    src_size: usize,
    method: SearchMethod,
    depth: u32,
) -> usize {
    let prefix = bytes.prefix;
    let ext = bytes.ext;
    let iend = prefix.len();
    let istart = iend - src_size;
    let ilimit = iend.saturating_sub(HASH_READ_SIZE);
    let w = ms.window;
    let base = w.dict_limit;
    let dict_limit = w.dict_limit;
    let window_log = ms.c_params.window_log;

    let mut offset_1 = rep[0];
    let mut offset_2 = rep[1];
    debug_assert!(offset_1 > 0 && offset_2 > 0);

    let mut ip = istart;
    let mut anchor = istart;
    if ip == 0 {
        // The prefix opens the block: position 0 has nothing before it in
        // the prefix; searches start one byte in.
        ip += 1;
    }

    if method == SearchMethod::RowHash {
        row::fill_hash_cache(ms, bytes, ms.c_params.mls(), ilimit);
    }

    while ip < ilimit {
        let mut match_length = 0usize;
        let mut offset = 0u32;
        let mut start = ip + 1;
        let curr = base + ip as u32;

        // Repeat probe at ip+1, resolved through either segment.
        {
            let window_low = w.lowest_match_index(curr + 1, window_log);
            let rep_index = (curr + 1).wrapping_sub(offset_1);
            if dict_limit.wrapping_sub(1).wrapping_sub(rep_index) >= 3 && rep_index > window_low {
                let (rbuf, rpos, rend) = ext_rep_segment(prefix, ext, &w, iend, rep_index);
                if mem::read32(prefix, ip + 1) == mem::read32(rbuf, rpos) {
                    match_length = 4
                        + mem::count_2segments(
                            prefix,
                            ip + 1 + 4,
                            iend,
                            rbuf,
                            rpos + 4,
                            rend,
                            prefix,
                            0,
                        );
                }
            }
        }
        let take_rep = depth == 0 && match_length > 0;

        if !take_rep {
            {
                let mut offset_found = OFFSET_SENTINEL;
                let ml2 = search_max(
                    ms,
                    bytes,
                    None,
                    ip,
                    iend,
                    &mut offset_found,
                    method,
                    DictMode::ExtDict,
                );
                if ml2 > match_length {
                    match_length = ml2;
                    start = ip;
                    offset = offset_found;
                }
            }

            if match_length < 4 {
                ip += ((ip - anchor) >> K_SEARCH_STRENGTH) + 1;
                continue;
            }

            if depth >= 1 {
                'deeper: while ip < ilimit {
                    ip += 1;
                    let curr2 = base + ip as u32;

                    if offset != 0 {
                        let window_low = w.lowest_match_index(curr2, window_log);
                        let rep_index = curr2.wrapping_sub(offset_1);
                        if dict_limit.wrapping_sub(1).wrapping_sub(rep_index) >= 3
                            && rep_index > window_low
                        {
                            let (rbuf, rpos, rend) = ext_rep_segment(prefix, ext, &w, iend, rep_index);
                            if mem::read32(prefix, ip) == mem::read32(rbuf, rpos) {
                                let rep_length = 4
                                    + mem::count_2segments(
                                        prefix, ip + 4, iend, rbuf, rpos + 4, rend, prefix, 0,
                                    );
                                let gain2 = rep_length as i32 * 3;
                                let gain1 =
                                    match_length as i32 * 3 - highbit32(offset + 1) as i32 + 1;
                                if rep_length >= 4 && gain2 > gain1 {
                                    match_length = rep_length;
                                    offset = 0;
                                    start = ip;
                                }
                            }
                        }
                    }

                    {
                        let mut offset2 = OFFSET_SENTINEL;
                        let ml2 = search_max(
                            ms,
                            bytes,
                            None,
                            ip,
                            iend,
                            &mut offset2,
                            method,
                            DictMode::ExtDict,
                        );
                        let gain2 = ml2 as i32 * 4 - highbit32(offset2 + 1) as i32;
                        let gain1 = match_length as i32 * 4 - highbit32(offset + 1) as i32 + 4;
                        if ml2 >= 4 && gain2 > gain1 {
                            match_length = ml2;
                            offset = offset2;
                            start = ip;
                            continue 'deeper;
                        }
                    }

                    if depth == 2 && ip < ilimit {
                        ip += 1;
                        let curr3 = base + ip as u32;

                        if offset != 0 {
                            let window_low = w.lowest_match_index(curr3, window_log);
                            let rep_index = curr3.wrapping_sub(offset_1);
                            if dict_limit.wrapping_sub(1).wrapping_sub(rep_index) >= 3
                                && rep_index > window_low
                            {
                                let (rbuf, rpos, rend) = ext_rep_segment(prefix, ext, &w, iend, rep_index);
                                if mem::read32(prefix, ip) == mem::read32(rbuf, rpos) {
                                    let rep_length = 4
                                        + mem::count_2segments(
                                            prefix, ip + 4, iend, rbuf, rpos + 4, rend, prefix, 0,
                                        );
                                    let gain2 = rep_length as i32 * 4;
                                    let gain1 =
                                        match_length as i32 * 4 - highbit32(offset + 1) as i32 + 1;
                                    if rep_length >= 4 && gain2 > gain1 {
                                        match_length = rep_length;
                                        offset = 0;
                                        start = ip;
                                    }
                                }
                            }
                        }

                        {
                            let mut offset2 = OFFSET_SENTINEL;
                            let ml2 = search_max(
                                ms,
                                bytes,
                                None,
                                ip,
                                iend,
                                &mut offset2,
                                method,
                                DictMode::ExtDict,
                            );
                            let gain2 = ml2 as i32 * 4 - highbit32(offset2 + 1) as i32;
                            let gain1 = match_length as i32 * 4 - highbit32(offset + 1) as i32 + 7;
                            if ml2 >= 4 && gain2 > gain1 {
                                match_length = ml2;
                                offset = offset2;
                                start = ip;
                                continue 'deeper;
                            }
                        }
                    }
                    break;
                }
            }

            // Catch-up across the segment boundary.
            if offset != 0 {
                let match_index = (base + start as u32).wrapping_sub(offset - REP_MOVE);
                let (mbuf, mut mpos) = if match_index < dict_limit {
                    (ext, (match_index - w.low_limit) as usize)
                } else {
                    (prefix, (match_index - base) as usize)
                };
                while start > anchor && mpos > 0 && prefix[start - 1] == mbuf[mpos - 1] {
                    start -= 1;
                    mpos -= 1;
                    match_length += 1;
                }
                offset_2 = offset_1;
                offset_1 = offset - REP_MOVE;
            }
        }

        seqs.store_seq(
            &prefix[anchor..start],
            if offset != 0 { offset } else { REPCODE_1 },
            (match_length - MINMATCH) as u32,
        );
        ip = start + match_length;
        anchor = ip;

        // Immediate repeat chain through either segment.
        while ip <= ilimit {
            let rep_current = base + ip as u32;
            let window_low = w.lowest_match_index(rep_current, window_log);
            let rep_index = rep_current.wrapping_sub(offset_2);
            if dict_limit.wrapping_sub(1).wrapping_sub(rep_index) >= 3 && rep_index > window_low {
                let (rbuf, rpos, rend) = ext_rep_segment(prefix, ext, &w, iend, rep_index);
                if mem::read32(prefix, ip) == mem::read32(rbuf, rpos) {
                    let ml = 4
                        + mem::count_2segments(
                            prefix, ip + 4, iend, rbuf, rpos + 4, rend, prefix, 0,
                        );
                    core::mem::swap(&mut offset_1, &mut offset_2);
                    seqs.store_seq(&[], REPCODE_1, (ml - MINMATCH) as u32);
                    ip += ml;
                    anchor = ip;
                    continue;
                }
            }
            break;
        }
    }

    rep[0] = offset_1;
    rep[1] = offset_2;

    iend - anchor
}

// ─────────────────────────────────────────────────────────────────────────────
// Named wrappers (noDict family)
//
// Equivalent to ZSTD_compressBlock_greedy / _lazy / _lazy2 / _btlazy2 and
// their _row variants (zstd_lazy.c:1817-1958).
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! no_dict_wrapper {
    ($(#[$doc:meta])* $name:ident, $method:expr, $depth:expr) => {
        $(#[$doc])*
        pub fn $name(
            ms: &mut MatchState,
            seqs: &mut SeqStore,
            rep: &mut [u32; 2],
            bytes: WindowBytes<'_>,
            src_size: usize,
        ) -> usize {
            let params = SearchParams {
                method: $method,
                depth: $depth,
                dict_mode: DictMode::NoDict,
            };
            compress_block(ms, seqs, rep, bytes, None, src_size, params)
        }
    };
}

no_dict_wrapper!(
    /// Greedy parse over the hash-chain index.
    compress_block_greedy, SearchMethod::HashChain, 0);
no_dict_wrapper!(
    /// Depth-1 lazy parse over the hash-chain index.
    compress_block_lazy, SearchMethod::HashChain, 1);
no_dict_wrapper!(
    /// Depth-2 lazy parse over the hash-chain index.
    compress_block_lazy2, SearchMethod::HashChain, 2);
no_dict_wrapper!(
    /// Depth-2 lazy parse over the binary-tree index.
    compress_block_btlazy2, SearchMethod::BinaryTree, 2);
no_dict_wrapper!(
    /// Greedy parse over the row-hash index.
    compress_block_greedy_row, SearchMethod::RowHash, 0);
no_dict_wrapper!(
    /// Depth-1 lazy parse over the row-hash index.
    compress_block_lazy_row, SearchMethod::RowHash, 1);
no_dict_wrapper!(
    /// Depth-2 lazy parse over the row-hash index.
    compress_block_lazy2_row, SearchMethod::RowHash, 2);
