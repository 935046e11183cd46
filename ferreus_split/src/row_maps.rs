/////////////////////////////////////////////////////////////////////////////////////////////
//
// Builds the global, regional, and region-to-all row maps owned by one worker process.
//
// Created on: 02 Mar 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # row_maps
//!
//! Driver that takes a [`PartitionDescription`] through indexing and process
//! assignment and then emits the row maps of the calling rank:
//!
//! - the **global row map**: every global id this rank owns through any of
//!   its slices, ascending and duplicate free,
//! - one **regional row map** per region, holding the global ids of the
//!   slice(s) of that region this rank owns,
//! - one **region-to-all** table per region, translating positions in the
//!   region's *full* member list into global ids.
//!
//! Index building and assignment happen in [`RowMapBuilder::new`], so input
//! and assignment errors surface before any map exists.
//! [`RowMapBuilder::create_row_maps`] must run before the map queries.

use crate::{
    assignment::{ProcessAssignment, ProcessSlice},
    config::SplitParams,
    error::{SplitError, SplitResult},
    partition::PartitionDescription,
    process_group::ProcessGroup,
    progress::{ProgressMsg, ProgressSink, report},
    region_index::{InterfaceNode, RegionIndex},
};
use ferreus_split_utils::{is_strictly_increasing, merge_sorted_unique};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path, sync::Arc};
use tracing::debug;

/// Row maps of one rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowMaps {
    /// `(local ordinal, global id)` for each region's full member list.
    pub region_to_all: Vec<Vec<(usize, usize)>>,

    /// Global ids owned by this rank.
    pub global_map: Vec<usize>,

    /// Global ids of nodes this rank owns through the lowest region
    /// containing them. Disjoint across ranks.
    pub unique_global_map: Vec<usize>,

    /// Global ids owned by this rank, per region.
    pub regional_maps: Vec<Vec<usize>>,
}

/// Splitting driver for one worker process.
#[derive(Debug)]
pub struct RowMapBuilder {
    rank: usize,
    index: RegionIndex,
    assignment: ProcessAssignment,
    owned_slices: Vec<ProcessSlice>,
    owned_regions: Vec<bool>,
    num_regional_nodes: Vec<usize>,
    maps: Option<RowMaps>,
    progress_callback: Option<Arc<dyn ProgressSink>>,
}

impl RowMapBuilder {
    /// Indexes `description` and resolves the slices owned by the calling
    /// rank of `group`.
    ///
    /// # Errors
    /// [`SplitError::OrphanNode`] from indexing and
    /// [`SplitError::UnsatisfiableAssignment`] from process assignment.
    pub fn new<G>(
        description: &PartitionDescription,
        group: &G,
        params: SplitParams,
        progress_callback: Option<Arc<dyn ProgressSink>>,
    ) -> SplitResult<Self>
    where
        G: ProcessGroup + ?Sized,
    {
        let rank = group.rank();
        let num_processes = group.size();

        if rank >= num_processes {
            return Err(SplitError::unsatisfiable(
                format!("rank {rank} outside a group of {num_processes}"),
                None,
            ));
        }

        report(
            &progress_callback,
            ProgressMsg::PartitionParsed {
                num_nodes: description.num_nodes(),
                num_regions: description.num_regions(),
                num_records: description.records().len(),
            },
        );

        let index = RegionIndex::build(description)?;

        report(
            &progress_callback,
            ProgressMsg::RegionIndexBuilt {
                num_interface_nodes: index.interface_nodes().len(),
            },
        );

        let assignment = ProcessAssignment::plan(&index, num_processes, &params)?;

        report(
            &progress_callback,
            ProgressMsg::AssignmentResolved {
                case: assignment.case(),
                num_processes,
                num_inactive: assignment.inactive_ranks().len(),
            },
        );

        let owned_slices = assignment.slices_of_rank(rank).to_vec();

        let mut owned_regions = vec![false; index.num_regions()];
        for slice in &owned_slices {
            owned_regions[slice.region] = true;
        }

        let num_regional_nodes = index.region_sizes();

        Ok(Self {
            rank,
            index,
            assignment,
            owned_slices,
            owned_regions,
            num_regional_nodes,
            maps: None,
            progress_callback,
        })
    }

    /// Reads the description at `path` and builds the driver for the calling
    /// rank of `group`.
    ///
    /// # Errors
    /// [`SplitError::Io`] or [`SplitError::MalformedInput`] while reading,
    /// otherwise as for [`RowMapBuilder::new`].
    pub fn from_path<P, G>(
        path: P,
        group: &G,
        params: SplitParams,
        progress_callback: Option<Arc<dyn ProgressSink>>,
    ) -> SplitResult<Self>
    where
        P: AsRef<Path>,
        G: ProcessGroup + ?Sized,
    {
        let description = PartitionDescription::from_path(path, &params)?;
        Self::new(&description, group, params, progress_callback)
    }

    /// Creates the row maps of this rank. Calling it again has no effect.
    pub fn create_row_maps(&mut self) -> SplitResult<()> {
        if self.maps.is_some() {
            debug!(rank = self.rank, "row maps already created");
            return Ok(());
        }

        let num_regions = self.index.num_regions();

        let region_to_all: Vec<Vec<(usize, usize)>> = (0..num_regions)
            .into_par_iter()
            .map(|region| {
                self.index
                    .members(region)
                    .iter()
                    .copied()
                    .enumerate()
                    .collect()
            })
            .collect();

        let regional_maps: Vec<Vec<usize>> = (0..num_regions)
            .map(|region| {
                let owned: Vec<&[usize]> = self
                    .owned_slices
                    .iter()
                    .filter(|slice| slice.region == region)
                    .map(|slice| slice.nodes(&self.index))
                    .collect();
                merge_sorted_unique(&owned)
            })
            .collect();

        let owned_maps: Vec<&[usize]> = regional_maps.iter().map(Vec::as_slice).collect();
        let global_map = merge_sorted_unique(&owned_maps);

        // A node is uniquely owned by whoever holds it in its lowest region.
        let unique_global_map: Vec<usize> = global_map
            .iter()
            .copied()
            .filter(|&node| {
                let home = self.index.regions_of(node)[0];
                regional_maps[home].binary_search(&node).is_ok()
            })
            .collect();

        debug_assert!(is_strictly_increasing(&global_map));
        debug_assert!(regional_maps.iter().all(|map| is_strictly_increasing(map)));

        debug!(
            rank = self.rank,
            num_global_rows = global_map.len(),
            num_unique_rows = unique_global_map.len(),
            "created row maps"
        );

        report(
            &self.progress_callback,
            ProgressMsg::RowMapsCreated {
                rank: self.rank,
                num_global_rows: global_map.len(),
                num_owned_regions: self.owned_regions.iter().filter(|&&owned| owned).count(),
            },
        );

        self.maps = Some(RowMaps {
            region_to_all,
            global_map,
            unique_global_map,
            regional_maps,
        });

        Ok(())
    }

    /// Total number of nodes in the mesh.
    pub fn num_global_elements(&self) -> usize {
        self.index.num_nodes()
    }

    /// Total number of regions.
    pub fn num_total_regions(&self) -> usize {
        self.index.num_regions()
    }

    /// Number of nodes in each region, indexed by region id.
    pub fn num_regional_nodes(&self) -> &[usize] {
        &self.num_regional_nodes
    }

    /// Rank this driver was built for.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of processes in the group.
    pub fn num_processes(&self) -> usize {
        self.assignment.num_processes()
    }

    /// Returns `true` if this rank owns at least one node.
    pub fn is_active(&self) -> bool {
        !self.assignment.inactive_ranks().contains(&self.rank)
    }

    /// Returns `true` if this rank holds a slice of `region`, even an empty one.
    pub fn owns_region(&self, region: usize) -> bool {
        self.owned_regions.get(region).copied().unwrap_or(false)
    }

    /// Slices owned by this rank.
    pub fn owned_slices(&self) -> &[ProcessSlice] {
        &self.owned_slices
    }

    pub fn region_index(&self) -> &RegionIndex {
        &self.index
    }

    pub fn assignment(&self) -> &ProcessAssignment {
        &self.assignment
    }

    /// Every node with the regions it belongs to.
    pub fn nodes_to_region(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.index.nodes_to_region()
    }

    /// Ascending global ids owned by this rank.
    pub fn global_row_map(&self) -> SplitResult<&[usize]> {
        Ok(&self.row_maps()?.global_map)
    }

    /// Subset of [`RowMapBuilder::global_row_map`] this rank owns exclusively.
    pub fn unique_global_row_map(&self) -> SplitResult<&[usize]> {
        Ok(&self.row_maps()?.unique_global_map)
    }

    /// Ascending global ids of the part of `region` owned by this rank.
    ///
    /// # Errors
    /// [`SplitError::UnknownRegion`] if `region` is out of range or this
    /// rank holds no slice of it.
    pub fn regional_row_map(&self, region: usize) -> SplitResult<&[usize]> {
        let maps = self.row_maps()?;

        if !self.owns_region(region) {
            return Err(SplitError::UnknownRegion {
                region,
                rank: self.rank,
            });
        }

        Ok(&maps.regional_maps[region])
    }

    /// Regional row maps of every region, empty for regions this rank
    /// holds no slice of.
    pub fn regional_row_maps(&self) -> SplitResult<&[Vec<usize>]> {
        Ok(&self.row_maps()?.regional_maps)
    }

    /// `(local ordinal, global id)` over the full member list of `region`.
    ///
    /// # Errors
    /// [`SplitError::UnknownRegion`] if `region` is out of range.
    pub fn region_to_all(&self, region: usize) -> SplitResult<&[(usize, usize)]> {
        self.row_maps()?
            .region_to_all
            .get(region)
            .map(Vec::as_slice)
            .ok_or(SplitError::UnknownRegion {
                region,
                rank: self.rank,
            })
    }

    /// Nodes shared by two or more regions.
    pub fn interface_nodes(&self) -> SplitResult<&[InterfaceNode]> {
        self.row_maps()?;
        Ok(self.index.interface_nodes())
    }

    /// All row maps of this rank.
    pub fn row_maps(&self) -> SplitResult<&RowMaps> {
        self.maps.as_ref().ok_or(SplitError::NotInitialized)
    }
}

impl fmt::Display for RowMapBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "rank {} of {} ({:?})",
            self.rank,
            self.assignment.num_processes(),
            self.assignment.case()
        )?;
        if !self.assignment.inactive_ranks().is_empty() {
            writeln!(f, "inactive ranks: {:?}", self.assignment.inactive_ranks())?;
        }
        for slice in &self.owned_slices {
            writeln!(
                f,
                "region {} positions {:?}: {:?}",
                slice.region,
                slice.range,
                slice.nodes(&self.index)
            )?;
        }
        match &self.maps {
            Some(maps) => writeln!(f, "global row map: {:?}", maps.global_map),
            None => writeln!(f, "row maps not created"),
        }
    }
}
