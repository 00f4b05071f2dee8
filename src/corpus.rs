//! Deterministic text generator for tests and benchmarks.
//!
//! Produces word-based text with a heavily skewed word-frequency
//! distribution, which gives compression behaviour close to natural
//! language without shipping fixture files. Same seed, same bytes.

static WORDS: &[&str] = &[
    "the", "of", "and", "to", "a", "in", "that", "is", "was", "he", "for", "it", "with", "as",
    "his", "on", "be", "at", "by", "had", "not", "are", "but", "from", "or", "have", "an", "they",
    "which", "one", "you", "were", "her", "all", "she", "there", "would", "their", "we", "him",
    "been", "has", "when", "who", "will", "more", "no", "if", "out", "so", "said", "what", "up",
    "its", "about", "into", "than", "them", "can", "only", "other", "new", "some", "could",
    "time", "these", "two", "may", "then", "do", "first", "any", "my", "now", "such", "like",
    "our", "over", "man", "me", "even", "most", "made", "after", "also", "did", "many", "before",
    "must", "through", "years", "where", "much", "your", "way", "well", "down",
];

/// Minimal xorshift state; quality only needs to beat "constant".
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        // Avoid the all-zero fixed point.
        Rng(seed | 1)
    }

    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Word index with a power-law skew: squaring a uniform variate piles
    /// the mass onto the low (frequent) indices.
    fn word_index(&mut self) -> usize {
        let u = (self.next() % 1_000_000) as f64 / 1_000_000.0;
        ((u * u) * WORDS.len() as f64) as usize % WORDS.len()
    }

    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next() % (hi - lo + 1)
    }
}

/// Generate exactly `size` bytes of skewed-frequency text.
pub fn text(size: usize, seed: u64) -> Vec<u8> {
    let mut rng = Rng::new(seed);
    let mut out = Vec::with_capacity(size + 16);
    while out.len() < size {
        let sentence_words = rng.range(4, 12);
        for n in 0..sentence_words {
            let word = WORDS[rng.word_index()].as_bytes();
            if n == 0 {
                out.push(word[0].to_ascii_uppercase());
                out.extend_from_slice(&word[1..]);
            } else {
                out.push(b' ');
                out.extend_from_slice(word);
            }
        }
        out.extend_from_slice(if rng.next() % 8 == 0 { b".\n" } else { b". " });
    }
    out.truncate(size);
    out
}

/// Generate `size` bytes of pseudo-random (essentially incompressible) data.
pub fn noise(size: usize, seed: u64) -> Vec<u8> {
    let mut rng = Rng::new(seed);
    let mut out = Vec::with_capacity(size + 8);
    while out.len() < size {
        out.extend_from_slice(&rng.next().to_le_bytes());
    }
    out.truncate(size);
    out
}
