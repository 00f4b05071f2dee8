// Unit tests for the hash-chain index: incremental insertion, the bounded
// chain walk, and the end-of-block early exit.

use zstdr::lazy::chain::{find_best_match, insert_and_find_first_index};
use zstdr::{CParams, DictMode, MatchState, SearchMethod, Window, WindowBytes, REP_MOVE};

fn make_state(len: usize) -> MatchState {
    let mut ms = MatchState::new(
        CParams {
            hash_log: 12,
            chain_log: 12,
            search_log: 5,
            window_log: 20,
            min_match: 4,
        },
        SearchMethod::HashChain,
    );
    ms.reset(Window::contiguous(len));
    ms
}

// ─────────────────────────────────────────────────────────────────────────────
// Insertion
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn insert_advances_cursor_to_target() {
    let buf: Vec<u8> = (0u8..=255).collect();
    let mut ms = make_state(buf.len());
    let bytes = WindowBytes::contiguous(&buf);
    let base = ms.window.dict_limit;

    insert_and_find_first_index(&mut ms, &bytes, 16);
    assert_eq!(ms.next_to_update, base + 16);

    insert_and_find_first_index(&mut ms, &bytes, 40);
    assert_eq!(ms.next_to_update, base + 40);
}

#[test]
fn insert_populates_the_hash_table() {
    let buf: Vec<u8> = (0u8..=255).collect();
    let mut ms = make_state(buf.len());
    let bytes = WindowBytes::contiguous(&buf);

    insert_and_find_first_index(&mut ms, &bytes, 64);
    assert!(
        ms.hash_table.iter().any(|&v| v != 0),
        "hash table must hold positions after insertion"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn unique_data_yields_no_usable_match() {
    let buf: Vec<u8> = (0u8..64).collect();
    let mut ms = make_state(buf.len());
    let bytes = WindowBytes::contiguous(&buf);
    let mut offset = 999_999_999u32;

    let ml = find_best_match(
        &mut ms,
        &bytes,
        None,
        8,
        buf.len(),
        &mut offset,
        4,
        DictMode::NoDict,
    );
    assert!(ml < 4, "distinct bytes cannot match; got {ml}");
}

#[test]
fn periodic_data_matches_at_the_period() {
    let buf = b"abcdefgh".repeat(4); // period 8, 32 bytes
    let mut ms = make_state(buf.len());
    let bytes = WindowBytes::contiguous(&buf);
    let mut offset = 999_999_999u32;

    let ml = find_best_match(
        &mut ms,
        &bytes,
        None,
        8,
        buf.len(),
        &mut offset,
        4,
        DictMode::NoDict,
    );
    // The run extends to the end of the buffer: 32 - 8 bytes.
    assert_eq!(ml, 24);
    assert_eq!(offset - REP_MOVE, 8, "distance must equal the period");
}

#[test]
fn search_is_bounded_by_the_window_limit() {
    // window_log 4 → max distance 16; the only repeat sits 32 back.
    let mut buf = vec![0u8; 64];
    buf[..8].copy_from_slice(b"ABCDWXYZ");
    buf[32..40].copy_from_slice(b"ABCDWXYZ");
    let mut ms = make_state(buf.len());
    ms.c_params.window_log = 4;
    let bytes = WindowBytes::contiguous(&buf);
    let mut offset = 999_999_999u32;

    let ml = find_best_match(
        &mut ms,
        &bytes,
        None,
        32,
        buf.len(),
        &mut offset,
        4,
        DictMode::NoDict,
    );
    assert!(ml < 4, "candidate beyond the window must be ignored; got {ml}");
}

#[test]
fn cursor_is_monotone_across_searches() {
    let buf = b"the quick brown fox jumps over the lazy dog ".repeat(4);
    let mut ms = make_state(buf.len());
    let bytes = WindowBytes::contiguous(&buf);
    let mut last = ms.next_to_update;

    for pos in [4usize, 9, 17, 40, 80] {
        let mut offset = 999_999_999u32;
        let _ = find_best_match(
            &mut ms,
            &bytes,
            None,
            pos,
            buf.len(),
            &mut offset,
            4,
            DictMode::NoDict,
        );
        assert!(ms.next_to_update >= last, "cursor regressed at {pos}");
        last = ms.next_to_update;
    }
}
