use std::ops::Range;

/// Item ranges covered by each chunk window.
///
/// Windows start at `0, stride, 2 * stride, ...` with
/// `stride = chunk_size - overlap` and continue while the start is a valid
/// item index, so a short tail window is emitted even when it only repeats
/// items of the previous window. Callers guarantee
/// `0 <= overlap < chunk_size`.
pub fn windows(n: usize, chunk_size: usize, overlap: usize) -> Vec<Range<usize>> {
    debug_assert!(chunk_size >= 1 && overlap < chunk_size);
    let stride = chunk_size.saturating_sub(overlap).max(1);

    (0..n)
        .step_by(stride)
        .map(|start| start..start.saturating_add(chunk_size).min(n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(n: usize, chunk_size: usize, overlap: usize) -> Vec<usize> {
        let mut counts = vec![0; n];
        for w in windows(n, chunk_size, overlap) {
            for i in w {
                counts[i] += 1;
            }
        }
        counts
    }

    #[test]
    fn test_no_items_no_windows() {
        assert!(windows(0, 5, 0).is_empty());
        assert!(windows(0, 3, 2).is_empty());
    }

    #[test]
    fn test_disjoint_windows() {
        assert_eq!(windows(5, 5, 0), vec![0..5]);
        assert_eq!(windows(5, 2, 0), vec![0..2, 2..4, 4..5]);
        assert_eq!(windows(3, 10, 0), vec![0..3]);
    }

    #[test]
    fn test_overlapping_windows_keep_short_tail() {
        assert_eq!(windows(5, 3, 1), vec![0..3, 2..5, 4..5]);
        assert_eq!(windows(4, 2, 1), vec![0..2, 1..3, 2..4, 3..4]);
    }

    #[test]
    fn test_huge_chunk_size_does_not_overflow() {
        assert_eq!(windows(3, usize::MAX, usize::MAX - 1), vec![0..3, 1..3, 2..3]);
        assert_eq!(windows(2, usize::MAX, 0), vec![0..2]);
    }

    #[test]
    fn test_every_item_covered() {
        for n in 0..25 {
            for chunk_size in 1..8 {
                for overlap in 0..chunk_size {
                    let counts = coverage(n, chunk_size, overlap);
                    let bound = chunk_size.div_ceil(chunk_size - overlap);
                    for (i, c) in counts.iter().enumerate() {
                        assert!(*c >= 1, "item {i} uncovered (n={n}, c={chunk_size}, o={overlap})");
                        assert!(*c <= bound, "item {i} covered {c} times, bound {bound}");
                        if overlap == 0 {
                            assert_eq!(*c, 1);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_windows_are_pure() {
        assert_eq!(windows(17, 4, 1), windows(17, 4, 1));
    }
}
