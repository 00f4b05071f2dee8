// Unit tests for the logical index space: segment resolution, window
// clamps, and the ext-dict rotation.

use zstdr::{Window, WindowBytes, WINDOW_START_INDEX};

// ─────────────────────────────────────────────────────────────────────────────
// Construction
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn contiguous_reserves_index_zero() {
    let w = Window::contiguous(100);
    assert_eq!(w.low_limit, WINDOW_START_INDEX);
    assert_eq!(w.dict_limit, WINDOW_START_INDEX);
    assert_eq!(w.next_src, WINDOW_START_INDEX + 100);
    assert!(!w.has_ext_dict());
    assert_eq!(w.loaded_dict_end, 0);
}

#[test]
fn continuing_starts_after_the_dictionary() {
    let w = Window::continuing(50, 20);
    assert_eq!(w.low_limit, 50);
    assert_eq!(w.dict_limit, 50);
    assert_eq!(w.next_src, 70);
    assert_eq!(w.loaded_dict_end, 50);
}

#[test]
fn with_ext_dict_places_segments() {
    let w = Window::with_ext_dict(10, 5);
    assert_eq!(w.low_limit, WINDOW_START_INDEX);
    assert_eq!(w.dict_limit, WINDOW_START_INDEX + 10);
    assert_eq!(w.next_src, WINDOW_START_INDEX + 15);
    assert!(w.has_ext_dict());
}

// ─────────────────────────────────────────────────────────────────────────────
// Byte resolution
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn byte_resolves_through_prefix_and_ext() {
    let ext = b"OLDER";
    let prefix = b"newer";
    let w = Window::with_ext_dict(ext.len(), prefix.len());
    let bytes = WindowBytes { prefix, ext };

    assert_eq!(bytes.byte(&w, w.low_limit), b'O');
    assert_eq!(bytes.byte(&w, w.dict_limit - 1), b'R');
    assert_eq!(bytes.byte(&w, w.dict_limit), b'n');
    assert_eq!(bytes.byte(&w, w.next_src - 1), b'r');
}

#[test]
fn segment_returns_slice_and_position() {
    let ext = b"OLDER";
    let prefix = b"newer";
    let w = Window::with_ext_dict(ext.len(), prefix.len());
    let bytes = WindowBytes { prefix, ext };

    let (seg, pos) = bytes.segment(&w, w.low_limit + 2);
    assert_eq!(seg[pos], b'D');
    let (seg, pos) = bytes.segment(&w, w.dict_limit + 2);
    assert_eq!(seg[pos], b'w');
}

// ─────────────────────────────────────────────────────────────────────────────
// Window clamps
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn lowest_match_index_clamps_to_max_distance() {
    let w = Window::contiguous(1 << 20);
    // window_log 10 → max distance 1024
    assert_eq!(w.lowest_match_index(5000, 10), 5000 - 1024);
    // Close to the start the low limit wins.
    assert_eq!(w.lowest_match_index(100, 10), w.low_limit);
}

#[test]
fn lowest_prefix_index_uses_dict_limit() {
    let w = Window::with_ext_dict(100, 1000);
    assert_eq!(w.lowest_prefix_index(200, 20), w.dict_limit);
}

// ─────────────────────────────────────────────────────────────────────────────
// Rotation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn rotate_into_ext_slides_the_prefix() {
    let mut w = Window::contiguous(40);
    let old_next = w.next_src;
    w.rotate_into_ext(25);
    assert_eq!(w.low_limit, WINDOW_START_INDEX);
    assert_eq!(w.dict_limit, old_next);
    assert_eq!(w.next_src, old_next + 25);
    assert!(w.has_ext_dict());
}

#[test]
fn extend_grows_the_prefix() {
    let mut w = Window::contiguous(10);
    w.extend(5);
    assert_eq!(w.next_src, WINDOW_START_INDEX + 15);
}
