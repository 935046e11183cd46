/////////////////////////////////////////////////////////////////////////////////////////////
//
// Maps worker process ranks onto regions, whole or split into contiguous slices.
//
// Created on: 02 Mar 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # assignment
//!
//! Reconciles the number of worker processes with the number of regions.
//!
//! - **Whole regions** (`num_processes <= num_regions`): regions are dealt
//!   round-robin in ascending id, so rank `r` owns regions
//!   `r, r + num_processes, r + 2 * num_processes, ...`.
//! - **Split regions** (`num_processes > num_regions`): every region receives
//!   a number of processes proportional to its node count (at least one, at
//!   most one per node), see [`ferreus_split_utils::apportion`]. Ranks are
//!   handed to regions contiguously in ascending region id, and each region's
//!   member list is cut into that many contiguous slices whose sizes differ by
//!   at most one, larger slices first. Ranks left over once every region is
//!   saturated are inactive.
//!
//! The plan is a pure function of the region sizes and `num_processes`, so
//! every rank computes the same plan independently and keeps only its own
//! slices.

use crate::{
    config::SplitParams,
    error::{SplitError, SplitResult},
    region_index::RegionIndex,
};
use ferreus_split_utils::{apportion, split_contiguous};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{debug, warn};

/// Which side of the process/region mismatch a plan was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentCase {
    /// Each process owns one or more whole regions.
    WholeRegions,

    /// Regions are split across several processes.
    SplitRegions,
}

/// A contiguous block of a region's member list owned by one rank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessSlice {
    /// Owning rank.
    pub rank: usize,

    /// Region the slice is cut from.
    pub region: usize,

    /// Positions within the region's full member list.
    pub range: Range<usize>,
}

impl ProcessSlice {
    /// Global ids covered by the slice.
    pub fn nodes<'a>(&self, index: &'a RegionIndex) -> &'a [usize] {
        &index.members(self.region)[self.range.clone()]
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// The full mapping of ranks to region slices for a fixed process count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessAssignment {
    num_processes: usize,
    case: AssignmentCase,

    // Ordered by (rank, region).
    slices: Vec<ProcessSlice>,

    regions_per_proc: Vec<Vec<usize>>,
    procs_per_region: Vec<Vec<usize>>,
    inactive_ranks: Vec<usize>,
}

impl ProcessAssignment {
    /// Computes the assignment of `num_processes` ranks onto the regions of
    /// `index`.
    ///
    /// # Errors
    /// [`SplitError::UnsatisfiableAssignment`] if there are no regions or no
    /// processes, if a region would end up without a process, or if
    /// `params.require_all_ranks_active` is set and some rank owns no nodes.
    pub fn plan(
        index: &RegionIndex,
        num_processes: usize,
        params: &SplitParams,
    ) -> SplitResult<Self> {
        let num_regions = index.num_regions();

        if num_regions == 0 {
            return Err(SplitError::unsatisfiable("there are no regions to assign", None));
        }
        if num_processes == 0 {
            return Err(SplitError::unsatisfiable("there are no processes to assign", None));
        }

        let sizes = index.region_sizes();

        let (case, slices) = if num_processes <= num_regions {
            (
                AssignmentCase::WholeRegions,
                whole_region_slices(&sizes, num_processes),
            )
        } else {
            (
                AssignmentCase::SplitRegions,
                split_region_slices(&sizes, num_processes)?,
            )
        };

        let mut regions_per_proc = vec![Vec::new(); num_processes];
        let mut procs_per_region = vec![Vec::new(); num_regions];
        let mut owned_nodes = vec![0usize; num_processes];

        for slice in &slices {
            regions_per_proc[slice.rank].push(slice.region);
            procs_per_region[slice.region].push(slice.rank);
            owned_nodes[slice.rank] += slice.len();
        }

        if let Some(region) = procs_per_region.iter().position(Vec::is_empty) {
            return Err(SplitError::unsatisfiable(
                format!("region {region} has no owning process"),
                Some(region),
            ));
        }

        let inactive_ranks: Vec<usize> = owned_nodes
            .iter()
            .enumerate()
            .filter_map(|(rank, &count)| (count == 0).then_some(rank))
            .collect();

        if !inactive_ranks.is_empty() {
            if params.require_all_ranks_active {
                return Err(SplitError::unsatisfiable(
                    format!(
                        "{} of {num_processes} ranks would own no nodes",
                        inactive_ranks.len()
                    ),
                    None,
                ));
            }
            warn!(
                num_inactive = inactive_ranks.len(),
                num_processes, "some ranks own no nodes"
            );
        }

        debug!(?case, num_processes, num_regions, "resolved process assignment");

        Ok(Self {
            num_processes,
            case,
            slices,
            regions_per_proc,
            procs_per_region,
            inactive_ranks,
        })
    }

    /// Computes the assignment and returns the slices owned by `my_rank`.
    ///
    /// # Errors
    /// As for [`ProcessAssignment::plan`], and
    /// [`SplitError::UnsatisfiableAssignment`] if `my_rank >= num_processes`.
    pub fn resolve(
        index: &RegionIndex,
        num_processes: usize,
        my_rank: usize,
        params: &SplitParams,
    ) -> SplitResult<Vec<ProcessSlice>> {
        if my_rank >= num_processes {
            return Err(SplitError::unsatisfiable(
                format!("rank {my_rank} outside a group of {num_processes}"),
                None,
            ));
        }

        let plan = Self::plan(index, num_processes, params)?;
        Ok(plan.slices_of_rank(my_rank).to_vec())
    }

    pub fn num_processes(&self) -> usize {
        self.num_processes
    }

    pub fn case(&self) -> AssignmentCase {
        self.case
    }

    /// All slices, ordered by rank and then region.
    pub fn slices(&self) -> &[ProcessSlice] {
        &self.slices
    }

    /// Slices owned by `rank`, in ascending region order.
    pub fn slices_of_rank(&self, rank: usize) -> &[ProcessSlice] {
        let start = self.slices.partition_point(|s| s.rank < rank);
        let end = self.slices.partition_point(|s| s.rank <= rank);
        &self.slices[start..end]
    }

    /// Regions `rank` holds a slice of.
    pub fn regions_of_rank(&self, rank: usize) -> &[usize] {
        self.regions_per_proc
            .get(rank)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Ranks holding a slice of `region`, in ascending order.
    pub fn ranks_of_region(&self, region: usize) -> &[usize] {
        self.procs_per_region
            .get(region)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Ranks that own no nodes.
    pub fn inactive_ranks(&self) -> &[usize] {
        &self.inactive_ranks
    }
}

fn whole_region_slices(sizes: &[usize], num_processes: usize) -> Vec<ProcessSlice> {
    let mut slices: Vec<ProcessSlice> = sizes
        .iter()
        .enumerate()
        .map(|(region, &size)| ProcessSlice {
            rank: region % num_processes,
            region,
            range: 0..size,
        })
        .collect();

    slices.sort_by_key(|s| (s.rank, s.region));
    slices
}

fn split_region_slices(sizes: &[usize], num_processes: usize) -> SplitResult<Vec<ProcessSlice>> {
    let caps: Vec<usize> = sizes.iter().map(|&size| size.max(1)).collect();
    let procs = apportion(sizes, num_processes, &caps);

    let mut slices = Vec::with_capacity(num_processes);
    let mut next_rank = 0;

    for (region, (&size, &count)) in sizes.iter().zip(procs.iter()).enumerate() {
        if count == 0 {
            return Err(SplitError::unsatisfiable(
                format!("region {region} received no processes"),
                Some(region),
            ));
        }

        for range in split_contiguous(size, count) {
            slices.push(ProcessSlice {
                rank: next_rank,
                region,
                range,
            });
            next_rank += 1;
        }
    }

    Ok(slices)
}
