// Unit tests for sequence records and the sequence store.

use zstdr::{SeqStore, REPCODE_1, REP_MOVE};

#[test]
fn store_seq_copies_literals_and_records_lengths() {
    let mut seqs = SeqStore::new();
    seqs.store_seq(b"abc", 5 + REP_MOVE, 7);
    seqs.store_seq(b"", REPCODE_1, 1);

    assert_eq!(seqs.literals, b"abc");
    assert_eq!(seqs.sequences.len(), 2);

    let s0 = seqs.sequences[0];
    assert_eq!(s0.lit_len, 3);
    assert_eq!(s0.offset_code, 5 + REP_MOVE);
    assert_eq!(s0.match_len, 7);
    assert_eq!(s0.raw_offset(), Some(5));
    assert_eq!(s0.match_length(), 10);

    let s1 = seqs.sequences[1];
    assert_eq!(s1.lit_len, 0);
    assert_eq!(s1.raw_offset(), None, "repeat codes carry no raw offset");
}

#[test]
fn decoded_len_sums_literals_and_matches() {
    let mut seqs = SeqStore::new();
    seqs.store_seq(b"ab", 4, 1); // 2 literals + 4-byte match
    seqs.store_seq(b"c", 4, 0); // 1 literal + 3-byte match
    assert_eq!(seqs.decoded_len(), 2 + 4 + 1 + 3);
}

#[test]
fn clear_keeps_nothing() {
    let mut seqs = SeqStore::new();
    seqs.store_seq(b"xyz", 7, 2);
    seqs.clear();
    assert!(seqs.literals.is_empty());
    assert!(seqs.sequences.is_empty());
}

#[test]
fn offset_code_constants() {
    // Codes 1..=REP_MOVE are repeat codes; above that, raw + REP_MOVE.
    assert_eq!(REP_MOVE, 3);
    assert_eq!(REPCODE_1, 1);
}
