//! Logical address space for indexed bytes.
//!
//! All match-finder tables store 32-bit *logical indices* into a virtual
//! stream, never raw pointers. [`Window`] records which index ranges are
//! valid; [`WindowBytes`] carries the borrowed byte storage for one call.
//! Resolving an index is a single branch:
//!
//! - `idx >= dict_limit`: the byte lives in the current prefix,
//!   `prefix[idx - dict_limit]`;
//! - `low_limit <= idx < dict_limit`: it lives in the external-dictionary
//!   segment, `ext[idx - low_limit]`.
//!
//! The caller owns all byte buffers and must keep them alive for the duration
//! of each compression call; the core only ever borrows them.
//!
//! Equivalent to `ZSTD_window_t` and its `base` / `dictBase` pointer pair
//! (`zstd_compress_internal.h`), with the pointers replaced by per-call
//! slices.

/// Index bookkeeping for one match state. Persists across blocks.
#[derive(Clone, Copy, Debug, Default)]
pub struct Window {
    /// Lowest index still valid for matching.
    pub low_limit: u32,
    /// Indices below this live in the external-dictionary segment.
    pub dict_limit: u32,
    /// One past the last indexed byte of the prefix.
    pub next_src: u32,
    /// Non-zero when a dictionary is attached; disables the max-distance
    /// clamp so dictionary content stays reachable.
    pub loaded_dict_end: u32,
}

/// First usable logical index. Index 0 is reserved: the tables use `0` as
/// their "empty / end of chain" value, so no real position may alias it.
pub const WINDOW_START_INDEX: u32 = 1;

impl Window {
    /// Fresh contiguous window covering `len` bytes, no dictionary segment.
    pub fn contiguous(len: usize) -> Self {
        Window {
            low_limit: WINDOW_START_INDEX,
            dict_limit: WINDOW_START_INDEX,
            next_src: WINDOW_START_INDEX + len as u32,
            loaded_dict_end: 0,
        }
    }

    /// Window for a standalone dictionary state. Identical to
    /// [`Self::contiguous`]; named separately because dictionary loaders
    /// rely on the reserved index 0.
    pub fn for_dictionary(len: usize) -> Self {
        Self::contiguous(len)
    }

    /// Working window for compressing with an attached dictionary: the
    /// prefix starts where the dictionary's index space ends
    /// (`dict_end_index = dict state's next_src`), so rebased dictionary
    /// indices land below `dict_limit` without wrapping.
    pub fn continuing(dict_end_index: u32, len: usize) -> Self {
        Window {
            low_limit: dict_end_index,
            dict_limit: dict_end_index,
            next_src: dict_end_index + len as u32,
            loaded_dict_end: dict_end_index,
        }
    }

    /// Window with an external-dictionary segment of `ext_len` bytes below a
    /// prefix of `prefix_len` bytes.
    pub fn with_ext_dict(ext_len: usize, prefix_len: usize) -> Self {
        Window {
            low_limit: WINDOW_START_INDEX,
            dict_limit: WINDOW_START_INDEX + ext_len as u32,
            next_src: WINDOW_START_INDEX + (ext_len + prefix_len) as u32,
            loaded_dict_end: 0,
        }
    }

    /// Extend the prefix by `len` freshly appended bytes.
    pub fn extend(&mut self, len: usize) {
        self.next_src += len as u32;
    }

    /// Rotate the current prefix into the external-dictionary slot and start
    /// a new prefix of `new_len` bytes. Any previous ext segment is dropped.
    pub fn rotate_into_ext(&mut self, new_len: usize) {
        self.low_limit = self.dict_limit;
        self.dict_limit = self.next_src;
        self.next_src += new_len as u32;
    }

    /// `true` when an external-dictionary segment is present.
    #[inline]
    pub fn has_ext_dict(&self) -> bool {
        self.dict_limit > self.low_limit
    }

    /// Lowest index a match at `curr` may reference:
    /// `max(low_limit, curr - (1 << window_log))`.
    ///
    /// Equivalent to `ZSTD_getLowestMatchIndex`.
    #[inline]
    pub fn lowest_match_index(&self, curr: u32, window_log: u32) -> u32 {
        let max_distance = 1u32 << window_log;
        if curr.wrapping_sub(self.low_limit) > max_distance {
            curr - max_distance
        } else {
            self.low_limit
        }
    }

    /// Like [`Self::lowest_match_index`] but clamped to the prefix.
    ///
    /// Equivalent to `ZSTD_getLowestPrefixIndex`.
    #[inline]
    pub fn lowest_prefix_index(&self, curr: u32, window_log: u32) -> u32 {
        let max_distance = 1u32 << window_log;
        if curr.wrapping_sub(self.dict_limit) > max_distance {
            curr - max_distance
        } else {
            self.dict_limit
        }
    }
}

/// Borrowed byte storage matching a [`Window`] for the duration of one call.
///
/// `prefix[i]` is logical index `dict_limit + i`; `ext[i]` is logical index
/// `low_limit + i`.
#[derive(Clone, Copy)]
pub struct WindowBytes<'a> {
    pub prefix: &'a [u8],
    pub ext: &'a [u8],
}

impl<'a> WindowBytes<'a> {
    /// View over a single contiguous buffer with no dictionary segment.
    pub fn contiguous(prefix: &'a [u8]) -> Self {
        WindowBytes { prefix, ext: &[] }
    }

    /// The byte at logical index `idx`.
    #[inline(always)]
    pub fn byte(&self, w: &Window, idx: u32) -> u8 {
        if idx >= w.dict_limit {
            self.prefix[(idx - w.dict_limit) as usize]
        } else {
            self.ext[(idx - w.low_limit) as usize]
        }
    }

    /// Resolve `idx` to `(segment, position)`; the position indexes into the
    /// returned slice.
    #[inline(always)]
    pub fn segment(&self, w: &Window, idx: u32) -> (&'a [u8], usize) {
        if idx >= w.dict_limit {
            (self.prefix, (idx - w.dict_limit) as usize)
        } else {
            (self.ext, (idx - w.low_limit) as usize)
        }
    }
}
