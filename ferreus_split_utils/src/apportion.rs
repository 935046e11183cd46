/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements largest-remainder apportionment of integer work units with minimums and caps.
//
// Created on: 02 Mar 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use std::cmp::Ordering;

/// Distributes `total` units over buckets proportionally to `weights`.
///
/// Every bucket receives at least one unit and at most `caps[i]` units
/// (a cap of zero is treated as one). The allocation is computed as:
///
/// 1. `floor(total * w_i / sum(w))`, clamped to `[1, cap_i]`.
/// 2. While the sum exceeds `total`, one unit is removed from the bucket with
///    the largest allocation above one (ties: smaller fractional remainder,
///    then higher index).
/// 3. While the sum is below `total`, units are handed out one at a time in
///    order of largest fractional remainder, then largest weight, then lower
///    index, skipping capped buckets and cycling until none are left.
///
/// If every bucket reaches its cap before `total` is exhausted, the returned
/// allocation sums to less than `total`. When all weights are zero each
/// bucket receives exactly one unit.
///
/// # Panics
/// If `weights` and `caps` differ in length or `total < weights.len()`.
///
/// # Examples
///
/// ```
/// use ferreus_split_utils::apportion;
///
/// // Proportional split with a guaranteed minimum of one.
/// assert_eq!(apportion(&[90, 10], 10, &[90, 10]), vec![9, 1]);
///
/// // An empty bucket still receives one unit, taken from the largest.
/// assert_eq!(apportion(&[100, 0], 3, &[100, 1]), vec![2, 1]);
///
/// // Caps bound the allocation; the excess is left unassigned.
/// assert_eq!(apportion(&[1, 2], 6, &[1, 2]), vec![1, 2]);
/// ```
pub fn apportion(weights: &[usize], total: usize, caps: &[usize]) -> Vec<usize> {
    assert_eq!(
        weights.len(),
        caps.len(),
        "weights and caps must have the same length"
    );
    assert!(
        total >= weights.len(),
        "cannot give {} buckets at least one of {} units",
        weights.len(),
        total
    );

    let num_buckets = weights.len();
    let weight_sum: u128 = weights.iter().map(|&w| w as u128).sum();
    let caps: Vec<usize> = caps.iter().map(|&cap| cap.max(1)).collect();

    // Remainders share the denominator `weight_sum`, so the numerators
    // compare directly.
    let (mut alloc, remainders): (Vec<usize>, Vec<u128>) = weights
        .iter()
        .zip(caps.iter())
        .map(|(&weight, &cap)| {
            if weight_sum == 0 {
                return (1, 0);
            }
            let scaled = total as u128 * weight as u128;
            let floor = (scaled / weight_sum) as usize;
            (floor.clamp(1, cap), scaled % weight_sum)
        })
        .unzip();

    let mut assigned: usize = alloc.iter().sum();

    while assigned > total {
        let donor = (0..num_buckets).filter(|&i| alloc[i] > 1).max_by(|&a, &b| {
            alloc[a]
                .cmp(&alloc[b])
                .then(remainders[b].cmp(&remainders[a]))
                .then(a.cmp(&b))
        });

        match donor {
            Some(idx) => {
                alloc[idx] -= 1;
                assigned -= 1;
            }
            None => break,
        }
    }

    let mut order: Vec<usize> = (0..num_buckets).collect();
    order.sort_by(|&a, &b| match remainders[b].cmp(&remainders[a]) {
        Ordering::Equal => weights[b].cmp(&weights[a]).then(a.cmp(&b)),
        other => other,
    });

    while assigned < total {
        let mut progressed = false;

        for &idx in &order {
            if assigned == total {
                break;
            }
            if alloc[idx] < caps[idx] {
                alloc[idx] += 1;
                assigned += 1;
                progressed = true;
            }
        }

        if !progressed {
            break;
        }
    }

    alloc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_sum_and_bounds_test(weights: &[usize], total: usize) {
        let caps: Vec<usize> = weights.iter().map(|&w| w.max(1)).collect();
        let alloc = apportion(weights, total, &caps);

        assert_eq!(alloc.len(), weights.len());

        for (idx, (&a, &cap)) in alloc.iter().zip(caps.iter()).enumerate() {
            assert!(a >= 1, "bucket {idx} received no units: {alloc:?}");
            assert!(a <= cap, "bucket {idx} exceeds cap {cap}: {alloc:?}");
        }

        let capacity: usize = caps.iter().sum();
        assert_eq!(
            alloc.iter().sum::<usize>(),
            total.min(capacity),
            "weights={weights:?} total={total}: allocation {alloc:?} has the wrong sum"
        );
    }

    #[test]
    fn sum_and_bounds_even() {
        run_sum_and_bounds_test(&[3, 3], 4);
        run_sum_and_bounds_test(&[10, 10, 10, 10], 7);
    }

    #[test]
    fn sum_and_bounds_skewed() {
        run_sum_and_bounds_test(&[1000, 1, 1], 12);
        run_sum_and_bounds_test(&[5, 0, 17, 2], 9);
    }

    #[test]
    fn sum_and_bounds_over_capacity() {
        run_sum_and_bounds_test(&[1, 1, 2], 20);
        run_sum_and_bounds_test(&[0, 0], 5);
    }

    #[test]
    fn equal_weights_split_evenly() {
        assert_eq!(apportion(&[3, 3], 4, &[3, 3]), vec![2, 2]);
    }

    #[test]
    fn remainder_goes_to_largest_fraction_first() {
        // Quotas are 7 * [5, 3, 2] / 10 = [3.5, 2.1, 1.4].
        assert_eq!(apportion(&[5, 3, 2], 7, &[5, 3, 2]), vec![4, 2, 1]);
    }

    #[test]
    fn equal_remainders_prefer_heavier_then_lower_index() {
        // Quotas are 5 * [2, 2, 4] / 8 = [1.25, 1.25, 2.5].
        assert_eq!(apportion(&[2, 2, 4], 5, &[2, 2, 4]), vec![1, 1, 3]);
        // Quotas are 4 * [1, 1, 1] / 3 = [1.33, 1.33, 1.33].
        assert_eq!(apportion(&[1, 1, 1], 4, &[5, 5, 5]), vec![2, 1, 1]);
    }

    #[test]
    fn all_zero_weights_get_one_each() {
        assert_eq!(apportion(&[0, 0, 0], 5, &[0, 0, 0]), vec![1, 1, 1]);
    }

    #[test]
    fn deterministic() {
        let weights = [13, 7, 29, 1, 0, 8];
        let caps = [13, 7, 29, 1, 1, 8];
        assert_eq!(apportion(&weights, 17, &caps), apportion(&weights, 17, &caps));
    }

    #[test]
    #[should_panic]
    fn too_few_units_panics() {
        apportion(&[1, 1, 1], 2, &[1, 1, 1]);
    }
}
