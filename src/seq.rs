//! Sequence records and the append-only sequence store.
//!
//! The parser describes a block as literals interleaved with back-references.
//! Each [`Sequence`] carries the literal run preceding the match, the stored
//! offset code, and the match length minus [`MINMATCH`]. Literal bytes are
//! copied into the store so the source buffer may be reused immediately
//! after the call.
//!
//! Equivalent to `seqStore_t` / `ZSTD_storeSeq`
//! (`zstd_compress_internal.h`); the stored codes match that layer's
//! `offCode + 1` form, with `1..=3` as repeat codes.

use crate::lazy::types::MINMATCH;

/// Added to a raw offset to form its stored code (`ZSTD_REP_MOVE` in the
/// stored `+1` form). Codes `1..=REP_MOVE` are repeat codes; codes above it
/// are `raw_offset + REP_MOVE`.
pub const REP_MOVE: u32 = 3;

/// Stored code for a match that reuses the front repeat offset.
pub const REPCODE_1: u32 = 1;

/// One `(litLen, offsetCode, matchLen)` record.
///
/// `match_len` is the raw match length minus [`MINMATCH`]; `offset_code`
/// is either `raw_offset + REP_MOVE` or a repeat code in `1..=3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sequence {
    pub lit_len: u32,
    pub offset_code: u32,
    pub match_len: u32,
}

impl Sequence {
    /// Raw offset of a non-repeat sequence; `None` for repeat codes.
    #[inline]
    pub fn raw_offset(&self) -> Option<u32> {
        if self.offset_code > REP_MOVE {
            Some(self.offset_code - REP_MOVE)
        } else {
            None
        }
    }

    /// Raw match length (the stored value plus [`MINMATCH`]).
    #[inline]
    pub fn match_length(&self) -> u32 {
        self.match_len + MINMATCH as u32
    }
}

/// Append-only sink for the sequences and literal bytes of one block.
#[derive(Default)]
pub struct SeqStore {
    pub literals: Vec<u8>,
    pub sequences: Vec<Sequence>,
}

impl SeqStore {
    pub fn new() -> Self {
        SeqStore::default()
    }

    /// Drop all stored sequences and literals, keeping capacity.
    pub fn clear(&mut self) {
        self.literals.clear();
        self.sequences.clear();
    }

    /// Append one sequence. `literals` is the run preceding the match
    /// (copied); `ml_minus_minmatch` is the raw match length minus
    /// [`MINMATCH`].
    ///
    /// Equivalent to `ZSTD_storeSeq` (`zstd_compress_internal.h`).
    #[inline]
    pub fn store_seq(&mut self, literals: &[u8], offset_code: u32, ml_minus_minmatch: u32) {
        debug_assert!(offset_code >= 1);
        self.literals.extend_from_slice(literals);
        self.sequences.push(Sequence {
            lit_len: literals.len() as u32,
            offset_code,
            match_len: ml_minus_minmatch,
        });
    }

    /// Total bytes the stored sequences reconstruct, excluding trailing
    /// literals that follow the last match.
    pub fn decoded_len(&self) -> usize {
        self.sequences
            .iter()
            .map(|s| (s.lit_len + s.match_length()) as usize)
            .sum()
    }
}
