// Unit tests for position hashing: width bounds, determinism, and the
// dependence on exactly `mls` bytes.

use zstdr::lazy::hash::hash_ptr;

#[test]
fn hash_fits_requested_width() {
    let buf = b"the quick brown fox jumps over";
    for mls in 4..=6 {
        for bits in [8u32, 12, 17, 24] {
            let h = hash_ptr(buf, 3, bits, mls);
            assert!(h < (1 << bits), "mls {mls} bits {bits}: {h:#x}");
        }
    }
}

#[test]
fn hash_is_deterministic() {
    let buf = b"abcdefghijklmnop";
    for mls in 4..=6 {
        assert_eq!(hash_ptr(buf, 2, 16, mls), hash_ptr(buf, 2, 16, mls));
    }
}

#[test]
fn equal_windows_hash_equal() {
    // Same mls-byte window at two positions must collide by construction.
    let buf = b"abcdefgh________abcdefgh";
    for mls in 4..=6 {
        assert_eq!(
            hash_ptr(buf, 0, 17, mls),
            hash_ptr(buf, 16, 17, mls),
            "mls {mls}"
        );
    }
}

#[test]
fn hash4_ignores_bytes_past_the_window() {
    // mls = 4 digests exactly 4 bytes; the tail must not matter.
    let a = b"wxyzAAAA";
    let b = b"wxyzBBBB";
    assert_eq!(hash_ptr(a, 0, 15, 4), hash_ptr(b, 0, 15, 4));
}

#[test]
fn hash5_depends_on_fifth_byte() {
    let a = b"wxyzAxxxx";
    let b = b"wxyzBxxxx";
    assert_ne!(hash_ptr(a, 0, 20, 5), hash_ptr(b, 0, 20, 5));
}
