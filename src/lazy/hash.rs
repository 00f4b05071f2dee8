//! Position hashing.
//!
//! Multiplicative hashes over the next `mls` bytes at a position, truncated
//! to a caller-chosen bit width. The same function feeds insertion and
//! lookup, which is the only property the tables rely on. The 5- and 6-byte
//! variants read a little-endian `u64` and shift the surplus high bytes away
//! before mixing, so they need 8 readable bytes.
//!
//! Equivalent to the `ZSTD_hashPtr` family (`ZSTD_hash4` / `ZSTD_hash5` /
//! `ZSTD_hash6` in `zstd_compress_internal.h`), same prime multipliers.

use crate::mem;

const PRIME_4: u32 = 2_654_435_761;
const PRIME_5: u64 = 889_523_592_379;
const PRIME_6: u64 = 227_718_039_650_203;

#[inline(always)]
fn hash4(v: u32, bits: u32) -> u32 {
    v.wrapping_mul(PRIME_4) >> (32 - bits)
}

#[inline(always)]
fn hash5(v: u64, bits: u32) -> u32 {
    ((v << (64 - 40)).wrapping_mul(PRIME_5) >> (64 - bits)) as u32
}

#[inline(always)]
fn hash6(v: u64, bits: u32) -> u32 {
    ((v << (64 - 48)).wrapping_mul(PRIME_6) >> (64 - bits)) as u32
}

/// Hash of the `mls` bytes at `buf[pos..]`, `bits` wide.
///
/// Equivalent to `ZSTD_hashPtr` (`zstd_compress_internal.h`).
///
/// `mls` must be in `4..=6` (see [`CParams::mls`]); for `mls >= 5` the read
/// spans 8 bytes, so `pos + 8 <= buf.len()` is required.
///
/// [`CParams::mls`]: crate::lazy::types::CParams::mls
#[inline(always)]
pub fn hash_ptr(buf: &[u8], pos: usize, bits: u32, mls: u32) -> u32 {
    debug_assert!(bits <= 32);
    match mls {
        5 => hash5(mem::read64_le(buf, pos), bits),
        6 => hash6(mem::read64_le(buf, pos), bits),
        _ => hash4(mem::read32(buf, pos), bits),
    }
}
