/////////////////////////////////////////////////////////////////////////////////////////////
//
// Groups membership records by region and by node and classifies interface nodes.
//
// Created on: 02 Mar 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # region_index
//!
//! Derives, from a [`PartitionDescription`], the member list of every region
//! and the region list of every node. A node listed in two or more regions
//! is an *interface* node; all others are interior.
//!
//! Both orderings are computed with stable sorts over the records, so the
//! result does not depend on the order in which records were supplied.

use crate::{
    error::{SplitError, SplitResult},
    partition::{Membership, PartitionDescription, compare_nodes, compare_regions},
};
use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A node shared by two or more regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceNode {
    /// Global id of the node.
    pub node: usize,

    /// Regions containing the node, in ascending order.
    pub regions: Vec<usize>,
}

/// Region membership grouped by region and by node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionIndex {
    num_nodes: usize,
    num_regions: usize,

    // Records sorted by (region, node) and by node (stable, so regions stay ascending).
    by_region: Vec<Membership>,
    by_node: Vec<Membership>,

    region_members: Vec<Vec<usize>>,
    node_regions: Vec<Vec<usize>>,
    interface_nodes: Vec<InterfaceNode>,
}

impl RegionIndex {
    /// Builds the index.
    ///
    /// # Errors
    /// [`SplitError::OrphanNode`] for the lowest node id in
    /// `[0, num_nodes)` that has no membership record.
    pub fn build(description: &PartitionDescription) -> SplitResult<Self> {
        let num_nodes = description.num_nodes();
        let num_regions = description.num_regions();

        let mut by_region = description.records().to_vec();
        by_region.par_sort_by(compare_regions);
        by_region.dedup();

        let mut by_node = by_region.clone();
        by_node.par_sort_by(compare_nodes);

        let region_members: Vec<Vec<usize>> = (0..num_regions)
            .into_par_iter()
            .map(|region| {
                let start = by_region.partition_point(|m| m.region < region);
                let end = by_region.partition_point(|m| m.region <= region);
                by_region[start..end].iter().map(|m| m.node).collect()
            })
            .collect();

        let mut node_regions: Vec<Vec<usize>> = Vec::with_capacity(num_nodes);
        let grouped = by_node.iter().chunk_by(|m| m.node);

        for (node, group) in &grouped {
            // Records are sorted by node, so a gap means every skipped id is unlisted.
            if node != node_regions.len() {
                return Err(SplitError::OrphanNode {
                    node: node_regions.len(),
                });
            }
            node_regions.push(group.map(|m| m.region).collect());
        }

        if node_regions.len() < num_nodes {
            return Err(SplitError::OrphanNode {
                node: node_regions.len(),
            });
        }

        let interface_nodes: Vec<InterfaceNode> = node_regions
            .iter()
            .enumerate()
            .filter(|(_, regions)| regions.len() >= 2)
            .map(|(node, regions)| InterfaceNode {
                node,
                regions: regions.clone(),
            })
            .collect();

        debug!(
            num_nodes,
            num_regions,
            num_interface_nodes = interface_nodes.len(),
            "built region index"
        );

        Ok(Self {
            num_nodes,
            num_regions,
            by_region,
            by_node,
            region_members,
            node_regions,
            interface_nodes,
        })
    }

    /// Total number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Total number of regions.
    pub fn num_regions(&self) -> usize {
        self.num_regions
    }

    /// Records sorted by region, then node.
    pub fn records_by_region(&self) -> &[Membership] {
        &self.by_region
    }

    /// Records sorted by node; records of one node keep ascending region order.
    pub fn records_by_node(&self) -> &[Membership] {
        &self.by_node
    }

    /// Ascending global ids of the nodes in `region`.
    ///
    /// # Panics
    /// If `region >= num_regions`.
    pub fn members(&self, region: usize) -> &[usize] {
        &self.region_members[region]
    }

    /// Number of nodes in each region, indexed by region id.
    pub fn region_sizes(&self) -> Vec<usize> {
        self.region_members.iter().map(Vec::len).collect()
    }

    /// Ascending ids of the regions containing `node`.
    ///
    /// # Panics
    /// If `node >= num_nodes`.
    pub fn regions_of(&self, node: usize) -> &[usize] {
        &self.node_regions[node]
    }

    /// Returns `true` if `node` belongs to more than one region.
    pub fn is_interface(&self, node: usize) -> bool {
        self.node_regions
            .get(node)
            .is_some_and(|regions| regions.len() >= 2)
    }

    /// Interface nodes in ascending node order.
    pub fn interface_nodes(&self) -> &[InterfaceNode] {
        &self.interface_nodes
    }

    /// Every node with the regions it belongs to, in ascending node order.
    pub fn nodes_to_region(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.node_regions
            .iter()
            .enumerate()
            .map(|(node, regions)| (node, regions.as_slice()))
    }
}

impl fmt::Display for RegionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} nodes in {} regions, {} interface nodes",
            self.num_nodes,
            self.num_regions,
            self.interface_nodes.len()
        )?;
        for (region, members) in self.region_members.iter().enumerate() {
            writeln!(f, "region {region}: {members:?}")?;
        }
        for interface in &self.interface_nodes {
            writeln!(f, "interface node {}: {:?}", interface.node, interface.regions)?;
        }
        Ok(())
    }
}
