/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines shared helpers for generating random strip partitions used by tests and examples.
//
// Created on: 02 Mar 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::partition::{Membership, PartitionDescription};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Generate a random strip partition of `num_nodes` nodes into `num_regions` regions.
///
/// Nodes are cut into `num_regions` contiguous strips at random positions
/// (strips may be empty). The first node of every non-empty strip that
/// follows a non-empty strip is also added to that preceding strip, so
/// neighbouring strips share one interface node. Records are returned in
/// shuffled order.
///
/// # Parameters
/// - `num_nodes`: Number of mesh nodes.
/// - `num_regions`: Number of regions.
/// - `seed`: Optional random seed.
///   - If `Some(seed)` is provided, the same partition is generated
///     deterministically across runs and platforms.
///   - If `None`, the generator is seeded from the operating system's randomness source.
///
/// # Example
/// ```
/// use ferreus_split::generate_random_partition;
///
/// let description = generate_random_partition(100, 4, Some(42));
/// assert_eq!(description.num_nodes(), 100);
/// assert!(description.records().len() >= 100);
/// ```
pub fn generate_random_partition(
    num_nodes: usize,
    num_regions: usize,
    seed: Option<u64>,
) -> PartitionDescription {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    if num_regions == 0 {
        return PartitionDescription::from_validated_parts(num_nodes, 0, Vec::new());
    }

    let mut cuts: Vec<usize> = (0..num_regions - 1)
        .map(|_| rng.random_range(0..=num_nodes))
        .collect();
    cuts.sort_unstable();
    cuts.insert(0, 0);
    cuts.push(num_nodes);

    let mut records = Vec::with_capacity(num_nodes + num_regions);
    let mut previous_nonempty: Option<usize> = None;

    for region in 0..num_regions {
        let (start, end) = (cuts[region], cuts[region + 1]);
        if start == end {
            continue;
        }

        records.extend((start..end).map(|node| Membership::new(node, region)));

        if let Some(previous) = previous_nonempty {
            records.push(Membership::new(start, previous));
        }
        previous_nonempty = Some(region);
    }

    records.shuffle(&mut rng);

    // Ids are in range and unique by construction.
    PartitionDescription::from_validated_parts(num_nodes, num_regions, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SplitParams, region_index::RegionIndex};

    fn run_generator_test(num_nodes: usize, num_regions: usize, seed: u64) {
        let description = generate_random_partition(num_nodes, num_regions, Some(seed));

        // Survives full validation and indexing.
        let revalidated = PartitionDescription::from_parts(
            num_nodes,
            num_regions,
            description.records().to_vec(),
            &SplitParams::default(),
        )
        .unwrap();
        let index = RegionIndex::build(&revalidated).unwrap();

        let total: usize = index.region_sizes().iter().sum();
        assert_eq!(total, num_nodes + index.interface_nodes().len());

        for interface in index.interface_nodes() {
            assert_eq!(
                interface.regions.len(),
                2,
                "node {} should sit between exactly two strips",
                interface.node
            );
        }
    }

    #[test]
    fn generator_few_regions() {
        run_generator_test(50, 3, 1);
    }

    #[test]
    fn generator_more_regions_than_nodes() {
        run_generator_test(4, 9, 2);
    }

    #[test]
    fn generator_is_seeded() {
        assert_eq!(
            generate_random_partition(80, 5, Some(7)),
            generate_random_partition(80, 5, Some(7))
        );
    }
}
