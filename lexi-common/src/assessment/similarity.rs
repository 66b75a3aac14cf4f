//! Phoneme string similarity
//!
//! Matching-blocks ratio: repeatedly take the longest common contiguous run,
//! recurse on the unmatched text to its left and right, and report
//! `2 * matched / (len(a) + len(b))`. Strings are compared per `char`, so
//! multi-byte IPA symbols count as one unit each.

/// Similarity of two phoneme strings in `[0.0, 1.0]`.
///
/// Returns `0.0` when either side is empty.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let matched = matched_len(&a, &b);
    let ratio = 2.0 * matched as f64 / (a.len() + b.len()) as f64;
    ratio.clamp(0.0, 1.0)
}

/// Total length of the non-overlapping matching blocks, longest first
fn matched_len(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        total += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    total
}

/// Longest common run within `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Ties resolve to the earliest start in `a`, then the earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

    // run[j - blo + 1] = length of the common run ending at a[i-1], b[j]
    let width = bhi - blo;
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let k = j - blo + 1;
            if a[i] == b[j] {
                curr[k] = prev[k - 1] + 1;
                if curr[k] > best_size {
                    best_size = curr[k];
                    best_i = i + 1 - curr[k];
                    best_j = j + 1 - curr[k];
                }
            } else {
                curr[k] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(similarity("", ""), 0.0);
        assert_eq!(similarity("b æ t", ""), 0.0);
        assert_eq!(similarity("", "b æ t"), 0.0);
    }

    #[test]
    fn test_identical_strings_score_one() {
        assert_eq!(similarity("b æ t", "b æ t"), 1.0);
        assert_eq!(similarity("ʃ", "ʃ"), 1.0);
    }

    #[test]
    fn test_partial_overlap() {
        // "bcd" matches: 2 * 3 / 8
        assert!((similarity("abcd", "bcde") - 0.75).abs() < 1e-9);
        // Nothing in common
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_blocks_on_both_sides_of_longest_match() {
        // Longest block "cd", then "a" on the left and "f" on the right: 2 * 4 / 12
        let s = similarity("abcdef", "axcdyf");
        assert!((s - 8.0 / 12.0).abs() < 1e-9, "got {}", s);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        // Two-char strings differing in the second symbol: 2 * 1 / 4
        let s = similarity("dʒ", "dz");
        assert!((s - 0.5).abs() < 1e-9, "got {}", s);
    }

    #[test]
    fn test_always_in_unit_interval() {
        let samples = ["", "a", "ab", "ba", "b æ t", "d ɑ ɡ", "k æ t", "aaaa"];
        for a in samples {
            for b in samples {
                let s = similarity(a, b);
                assert!((0.0..=1.0).contains(&s), "{:?} vs {:?} -> {}", a, b, s);
            }
        }
    }
}
