// Unit tests for the row-hash index: row insertion, the circular head, the
// cache-driven search, and the current-position self-insert.

use zstdr::lazy::row::{fill_hash_cache, find_best_match, row_update};
use zstdr::{CParams, DictMode, MatchState, SearchMethod, Window, WindowBytes, REP_MOVE};

fn make_state(len: usize, search_log: u32) -> MatchState {
    let mut ms = MatchState::new(
        CParams {
            hash_log: 13,
            chain_log: 13,
            search_log,
            window_log: 20,
            min_match: 4,
        },
        SearchMethod::RowHash,
    );
    ms.reset(Window::contiguous(len));
    ms
}

fn find(ms: &mut MatchState, bytes: &WindowBytes<'_>, pos: usize, len: usize) -> (usize, u32) {
    let row_log = ms.row_log();
    let entries = 1u32 << row_log;
    let mut offset = 999_999_999u32;
    let ml = find_best_match(
        ms,
        bytes,
        None,
        pos,
        len,
        &mut offset,
        4,
        DictMode::NoDict,
        row_log,
        entries,
        entries - 1,
    );
    (ml, offset)
}

// ─────────────────────────────────────────────────────────────────────────────
// Insertion
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn row_update_advances_cursor_and_fills_rows() {
    let buf: Vec<u8> = (0u8..=255).collect();
    let mut ms = make_state(buf.len(), 4);
    let bytes = WindowBytes::contiguous(&buf);

    row_update(&mut ms, &bytes, 64);
    assert_eq!(ms.next_to_update, ms.window.dict_limit + 64);
    assert!(
        ms.hash_table.iter().any(|&v| v != 0),
        "rows must hold positions after update"
    );
    assert!(
        ms.tag_table.iter().any(|&v| v != 0),
        "tag rows must hold tags and moved heads after update"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn periodic_data_matches_at_the_period() {
    let buf = b"abcdefgh".repeat(8);
    let mut ms = make_state(buf.len(), 4);
    let bytes = WindowBytes::contiguous(&buf);
    fill_hash_cache(&mut ms, &bytes, 4, buf.len() - 8);

    let (ml, offset) = find(&mut ms, &bytes, 8, buf.len());
    assert_eq!(ml, 56, "run must extend to the end of the buffer");
    assert_eq!(offset - REP_MOVE, 8);
}

#[test]
fn unique_data_yields_no_usable_match() {
    let buf: Vec<u8> = (0u8..128).collect();
    let mut ms = make_state(buf.len(), 4);
    let bytes = WindowBytes::contiguous(&buf);
    fill_hash_cache(&mut ms, &bytes, 4, buf.len() - 8);

    let (ml, _) = find(&mut ms, &bytes, 16, buf.len());
    assert!(ml < 4, "distinct bytes cannot match; got {ml}");
}

#[test]
fn search_self_inserts_the_current_position() {
    let buf = b"the quick brown fox jumps over the lazy dog ".repeat(2);
    let mut ms = make_state(buf.len(), 4);
    let bytes = WindowBytes::contiguous(&buf);
    fill_hash_cache(&mut ms, &bytes, 4, buf.len() - 8);

    let _ = find(&mut ms, &bytes, 4, buf.len());
    // The speed opt inserts `curr` itself and advances the cursor past it.
    assert_eq!(ms.next_to_update, ms.window.dict_limit + 4 + 1);
}

#[test]
fn sequential_searches_find_repeated_text() {
    let buf = b"the quick brown fox jumps over the lazy dog ".repeat(4);
    let mut ms = make_state(buf.len(), 4);
    let bytes = WindowBytes::contiguous(&buf);
    fill_hash_cache(&mut ms, &bytes, 4, buf.len() - 8);

    // Walk every position of the second copy; the 45-byte period must be
    // discovered somewhere along the way.
    let mut best = 0usize;
    let mut best_offset = 0u32;
    for pos in 45..90 {
        let (ml, offset) = find(&mut ms, &bytes, pos, buf.len());
        if ml >= 4 && ml > best {
            best = ml;
            best_offset = offset - REP_MOVE;
        }
    }
    assert!(best >= 4, "repeated text must produce matches");
    assert_eq!(best_offset % 45, 0, "best match must align with the period");
}

#[test]
fn many_inserts_cycle_the_row_without_losing_recent_entries() {
    // 40 copies of the same 8-byte gram all land in one row (16 slots);
    // older entries are overwritten, recent ones must still be found.
    let buf = b"ABCD1234".repeat(40);
    let mut ms = make_state(buf.len(), 4);
    let bytes = WindowBytes::contiguous(&buf);
    fill_hash_cache(&mut ms, &bytes, 4, buf.len() - 8);

    let pos = 8 * 30;
    let (ml, offset) = find(&mut ms, &bytes, pos, buf.len());
    assert!(ml >= 8, "recent entries must survive the circular row");
    assert_eq!((offset - REP_MOVE) % 8, 0);
}
