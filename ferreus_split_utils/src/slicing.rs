/////////////////////////////////////////////////////////////////////////////////////////////
//
// Supplies helpers for cutting ordered index lists into contiguous slices and merging them.
//
// Created on: 02 Mar 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use std::ops::Range;

/// Splits `0..len` into `parts` contiguous, near-equal ranges.
///
/// Range sizes differ by at most one; the first `len % parts` ranges carry
/// the extra element. When `parts > len` the trailing ranges are empty.
///
/// # Panics
/// If `parts == 0`.
///
/// # Examples
///
/// ```
/// use ferreus_split_utils::split_contiguous;
///
/// assert_eq!(split_contiguous(3, 2), vec![0..2, 2..3]);
/// assert_eq!(split_contiguous(10, 4), vec![0..3, 3..6, 6..8, 8..10]);
/// ```
#[inline(always)]
pub fn split_contiguous(len: usize, parts: usize) -> Vec<Range<usize>> {
    assert!(parts > 0, "cannot split into zero parts");

    let base = len / parts;
    let extra = len % parts;

    let mut start = 0;
    (0..parts)
        .map(|part| {
            let size = base + usize::from(part < extra);
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}

/// Returns the sorted, duplicate-free union of several sorted slices.
///
/// # Examples
///
/// ```
/// use ferreus_split_utils::merge_sorted_unique;
///
/// let a = [0usize, 1, 2];
/// let b = [2usize, 3, 4];
///
/// assert_eq!(merge_sorted_unique(&[a.as_slice(), b.as_slice()]), vec![0, 1, 2, 3, 4]);
/// ```
pub fn merge_sorted_unique<T>(slices: &[&[T]]) -> Vec<T>
where
    T: Ord + Copy,
{
    let total: usize = slices.iter().map(|s| s.len()).sum();
    let mut merged: Vec<T> = Vec::with_capacity(total);

    for slice in slices {
        merged.extend_from_slice(slice);
    }

    merged.sort_unstable();
    merged.dedup();
    merged
}

/// Returns `true` if every element is strictly greater than its predecessor.
///
/// # Examples
///
/// ```
/// use ferreus_split_utils::is_strictly_increasing;
///
/// assert!(is_strictly_increasing(&[1, 4, 9]));
/// assert!(!is_strictly_increasing(&[1, 4, 4]));
/// ```
#[inline(always)]
pub fn is_strictly_increasing<T: PartialOrd>(data: &[T]) -> bool {
    data.windows(2).all(|pair| pair[0] < pair[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_cover_test(len: usize, parts: usize) {
        let ranges = split_contiguous(len, parts);

        assert_eq!(ranges.len(), parts);
        assert_eq!(ranges.first().map(|r| r.start), Some(0));
        assert_eq!(ranges.last().map(|r| r.end), Some(len));

        for pair in ranges.windows(2) {
            assert_eq!(
                pair[0].end, pair[1].start,
                "len={len} parts={parts}: ranges must be gap free"
            );
        }

        let sizes: Vec<usize> = ranges.iter().map(|r| r.len()).collect();
        let max = sizes.iter().max().copied().unwrap_or(0);
        let min = sizes.iter().min().copied().unwrap_or(0);
        assert!(
            max - min <= 1,
            "len={len} parts={parts}: sizes {sizes:?} differ by more than one"
        );
    }

    #[test]
    fn cover_exact() {
        run_cover_test(12, 4);
        run_cover_test(1, 1);
    }

    #[test]
    fn cover_uneven() {
        run_cover_test(3, 2);
        run_cover_test(101, 7);
    }

    #[test]
    fn cover_more_parts_than_elements() {
        run_cover_test(2, 5);
        run_cover_test(0, 3);
    }

    #[test]
    fn larger_slices_come_first() {
        let sizes: Vec<usize> = split_contiguous(11, 4).iter().map(|r| r.len()).collect();
        assert_eq!(sizes, vec![3, 3, 3, 2]);
    }

    #[test]
    fn merge_handles_empty_inputs() {
        let empty: &[usize] = &[];
        let tail: &[usize] = &[3, 5];
        assert!(merge_sorted_unique::<usize>(&[]).is_empty());
        assert_eq!(merge_sorted_unique(&[empty, tail]), vec![3, 5]);
    }

    #[test]
    fn merge_removes_every_duplicate() {
        let a: &[usize] = &[1, 2, 3];
        let b: &[usize] = &[0, 3, 7];
        let merged = merge_sorted_unique(&[a, a, b]);
        assert_eq!(merged, vec![0, 1, 2, 3, 7]);
        assert!(is_strictly_increasing(&merged));
    }

    #[test]
    fn empty_and_single_are_increasing() {
        assert!(is_strictly_increasing::<usize>(&[]));
        assert!(is_strictly_increasing(&[42]));
    }
}
