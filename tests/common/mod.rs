//! Shared test helpers: a reference sequence decoder and one-shot
//! compression sessions over the public API.

#![allow(dead_code)]

use zstdr::{
    compress_block, CParams, DictMode, DictView, MatchState, SearchMethod, SearchParams, SeqStore,
    Window, WindowBytes, REP_MOVE,
};

// ─────────────────────────────────────────────────────────────────────────────
// Parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Mid-range geometry usable by every search method (16-entry rows).
pub fn default_cparams() -> CParams {
    CParams {
        hash_log: 15,
        chain_log: 15,
        search_log: 4,
        window_log: 24,
        min_match: 4,
    }
}

/// Wider search budget (32-entry rows, 64 chain attempts).
pub fn wide_cparams() -> CParams {
    CParams {
        hash_log: 16,
        chain_log: 16,
        search_log: 6,
        window_log: 24,
        min_match: 4,
    }
}

/// Geometry for a dedicated-dict state: the hash table carries the bucket
/// factor on top of the bucket-selector width.
pub fn dds_cparams() -> CParams {
    CParams {
        hash_log: 16,
        chain_log: 12,
        search_log: 6,
        window_log: 24,
        min_match: 4,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reference decoder
// ─────────────────────────────────────────────────────────────────────────────

/// Decode a sequence stream against `history` (dictionary or ext segment
/// bytes preceding the block). Returns the reconstructed block and the
/// final repeat pair, so tests can check encoder/decoder convergence.
pub fn decode_with_rep(
    seqs: &SeqStore,
    trailing: &[u8],
    rep_init: [u32; 2],
    history: &[u8],
) -> (Vec<u8>, [u32; 2]) {
    let mut out = history.to_vec();
    let start = out.len();
    let mut lit_pos = 0usize;
    let mut rep = rep_init;

    for s in &seqs.sequences {
        let lits = &seqs.literals[lit_pos..lit_pos + s.lit_len as usize];
        lit_pos += s.lit_len as usize;
        out.extend_from_slice(lits);

        let offset = match s.offset_code {
            c if c > REP_MOVE => {
                let raw = c - REP_MOVE;
                rep = [raw, rep[0]];
                raw
            }
            1 => {
                if s.lit_len != 0 {
                    rep[0]
                } else {
                    rep.swap(0, 1);
                    rep[0]
                }
            }
            2 if s.lit_len != 0 => {
                rep.swap(0, 1);
                rep[0]
            }
            c => panic!("offset code {c} not produced by the lazy parser"),
        };
        assert!(
            offset > 0 && offset as usize <= out.len(),
            "offset {} exceeds available history {}",
            offset,
            out.len()
        );

        // Byte-by-byte copy: correct for overlapping matches (offset < len).
        for _ in 0..s.match_length() {
            let b = out[out.len() - offset as usize];
            out.push(b);
        }
    }
    debug_assert_eq!(lit_pos, seqs.literals.len());
    out.extend_from_slice(trailing);
    (out.split_off(start), rep)
}

/// Decode and discard the repeat pair.
pub fn decode(seqs: &SeqStore, trailing: &[u8], rep_init: [u32; 2], history: &[u8]) -> Vec<u8> {
    decode_with_rep(seqs, trailing, rep_init, history).0
}

// ─────────────────────────────────────────────────────────────────────────────
// One-shot sessions
// ─────────────────────────────────────────────────────────────────────────────

/// Compress `src` as a fresh single block with no dictionary.
pub fn compress_oneshot(
    src: &[u8],
    method: SearchMethod,
    depth: u32,
    cp: CParams,
    rep_init: [u32; 2],
) -> (SeqStore, usize, [u32; 2], MatchState) {
    let mut ms = MatchState::new(cp, method);
    ms.reset(Window::contiguous(src.len()));
    let mut seqs = SeqStore::new();
    let mut rep = rep_init;
    let params = SearchParams::new(method, depth, DictMode::NoDict).expect("valid search params");
    let trailing = compress_block(
        &mut ms,
        &mut seqs,
        &mut rep,
        WindowBytes::contiguous(src),
        None,
        src.len(),
        params,
    );
    ms.finish_block();
    (seqs, trailing, rep, ms)
}

/// Compress, decode, assert byte-exact reconstruction and repeat-pair
/// convergence. Returns the stream for further inspection.
pub fn roundtrip(src: &[u8], method: SearchMethod, depth: u32, cp: CParams) -> (SeqStore, usize) {
    let rep_init = [1u32, 4];
    let (seqs, trailing, rep_out, _ms) = compress_oneshot(src, method, depth, cp, rep_init);
    let (decoded, rep_decoded) = decode_with_rep(&seqs, &src[src.len() - trailing..], rep_init, &[]);
    assert_eq!(
        decoded, src,
        "round-trip mismatch ({method:?}, depth {depth})"
    );
    assert_eq!(
        rep_out, rep_decoded,
        "repeat pair diverged ({method:?}, depth {depth})"
    );
    (seqs, trailing)
}

/// Estimated encoded size: literal bytes plus a flat per-sequence cost.
/// Good enough to compare strategies on the same input.
pub fn encoded_cost(seqs: &SeqStore, trailing: usize) -> usize {
    seqs.literals.len() + trailing + 3 * seqs.sequences.len()
}

// ─────────────────────────────────────────────────────────────────────────────
// Dictionary sessions
// ─────────────────────────────────────────────────────────────────────────────

/// Build a fully indexed dictionary state for attachment.
pub fn make_dict_state(dict: &[u8], method: SearchMethod, cp: CParams) -> MatchState {
    let mut dms = MatchState::new(cp, method);
    dms.reset(Window::for_dictionary(dict.len()));
    zstdr::load_dictionary(&mut dms, &WindowBytes::contiguous(dict), method);
    dms
}

/// Build a dedicated-dict-search state (bucketed layout).
pub fn make_dds_state(dict: &[u8], cp: CParams) -> MatchState {
    let mut dms = MatchState::new(cp, SearchMethod::HashChain);
    dms.reset(Window::for_dictionary(dict.len()));
    if dict.len() >= 8 {
        zstdr::lazy::dds::load_dictionary(
            &mut dms,
            &WindowBytes::contiguous(dict),
            dict.len() - 8,
        );
    }
    dms
}

/// Compress `src` against an attached dictionary state.
#[allow(clippy::too_many_arguments)]
pub fn compress_with_dict(
    src: &[u8],
    dict_bytes: &[u8],
    dms: &MatchState,
    mode: DictMode,
    method: SearchMethod,
    depth: u32,
    cp: CParams,
) -> (SeqStore, usize) {
    let mut ms = MatchState::new(cp, method);
    ms.reset(Window::continuing(dms.window.next_src, src.len()));
    let view = DictView {
        state: dms,
        bytes: WindowBytes::contiguous(dict_bytes),
    };
    let mut seqs = SeqStore::new();
    let mut rep = [1u32, 4];
    let params = SearchParams::new(method, depth, mode).expect("valid search params");
    let trailing = compress_block(
        &mut ms,
        &mut seqs,
        &mut rep,
        WindowBytes::contiguous(src),
        Some(&view),
        src.len(),
        params,
    );
    (seqs, trailing)
}

/// Two-segment session: index `first`, rotate it into the ext-dict slot,
/// then compress `second` in extDict mode.
pub fn compress_ext_dict(
    first: &[u8],
    second: &[u8],
    method: SearchMethod,
    depth: u32,
    cp: CParams,
) -> (SeqStore, usize) {
    let mut ms = MatchState::new(cp, method);
    ms.reset(Window::contiguous(first.len()));
    zstdr::load_dictionary(&mut ms, &WindowBytes::contiguous(first), method);

    let mut w = ms.window;
    w.rotate_into_ext(second.len());
    ms.reset(w);

    let bytes = WindowBytes {
        prefix: second,
        ext: first,
    };
    let mut seqs = SeqStore::new();
    let mut rep = [1u32, 4];
    let params = SearchParams::new(method, depth, DictMode::ExtDict).expect("valid search params");
    let trailing = compress_block(&mut ms, &mut seqs, &mut rep, bytes, None, second.len(), params);
    (seqs, trailing)
}
