/////////////////////////////////////////////////////////////////////////////////////////////
//
// Exposes the public API and high-level documentation for region splitting and row-map setup.
//
// Created on: 02 Mar 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Region splitting for regional domain decomposition solvers.
//!
//! A regional Schwarz-type solver works on a mesh whose nodes are grouped
//! into (possibly overlapping) regions. Nodes shared by several regions sit
//! on region *interfaces*. Before any distributed vector or matrix can be
//! built, every worker process needs to know which rows it owns globally and
//! per region, and how region-local row numbers translate back to global ones.
//!
//! This crate derives those index maps from a node-to-region membership
//! description, for any number of worker processes:
//!
//! - [`PartitionDescription`] parses and validates the membership records.
//! - [`RegionIndex`] groups records by region and by node and finds the
//!   interface nodes.
//! - [`ProcessAssignment`] maps process ranks onto whole regions (fewer
//!   processes than regions) or onto contiguous slices of regions (more
//!   processes than regions).
//! - [`RowMapBuilder`] emits the global row map, the regional row maps and
//!   the region-to-all tables of the calling rank.
//!
//! Every rank computes the same index and assignment independently, so no
//! region contents need to be communicated.
//!
//! # Examples
//!
//! ```
//! use ferreus_split::{
//!     PartitionDescription, RowMapBuilder, config::SplitParams, process_group::SerialGroup,
//! };
//!
//! // Two regions sharing node 2.
//! let description = PartitionDescription::parse("2\n5\n0 0\n1 0\n2 0\n2 1\n3 1\n4 1\n")?;
//!
//! let mut driver = RowMapBuilder::new(&description, &SerialGroup, SplitParams::default(), None)?;
//! driver.create_row_maps()?;
//!
//! assert_eq!(driver.global_row_map()?, &[0, 1, 2, 3, 4]);
//! assert_eq!(driver.regional_row_map(1)?, &[2, 3, 4]);
//! assert_eq!(driver.region_to_all(1)?, &[(0, 2), (1, 3), (2, 4)]);
//! assert_eq!(driver.interface_nodes()?[0].regions, vec![0, 1]);
//! # Ok::<(), ferreus_split::SplitError>(())
//! ```
pub mod config;

mod common;

mod error;

pub mod partition;

pub mod region_index;

pub mod assignment;

pub mod process_group;

pub mod progress;

mod row_maps;

pub mod transfer;

pub use {
    assignment::{AssignmentCase, ProcessAssignment, ProcessSlice},
    common::generate_random_partition,
    error::{SplitError, SplitResult},
    partition::{Membership, PartitionDescription},
    region_index::{InterfaceNode, RegionIndex},
    row_maps::{RowMapBuilder, RowMaps},
};
