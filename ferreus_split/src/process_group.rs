/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the process-group abstraction the splitting driver reads its rank and size from.
//
// Created on: 02 Mar 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Process-group abstraction.
//!
//! The splitting itself only needs the calling rank and the group size. The
//! broadcast hook lets a communication layer share a single parsed
//! [`PartitionDescription`] instead of every rank reading the source.

use crate::{
    config::SplitParams,
    error::{SplitError, SplitResult},
    partition::PartitionDescription,
};

/// A group of cooperating worker processes.
pub trait ProcessGroup {
    /// Rank of the calling process, in `[0, size)`.
    fn rank(&self) -> usize;

    /// Number of processes in the group.
    fn size(&self) -> usize;

    /// Blocks until every process of the group has reached the barrier.
    fn barrier(&self) {}

    /// Replaces `buffer` on every rank with its contents on `root`.
    fn broadcast_bytes(&self, root: usize, buffer: &mut Vec<u8>);
}

/// A group holding only the calling process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialGroup;

impl ProcessGroup for SerialGroup {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn broadcast_bytes(&self, _root: usize, _buffer: &mut Vec<u8>) {}
}

/// One rank of a group without a communication layer.
///
/// Each rank computes its own share from data it already holds, so a run
/// over several processes can be reproduced inside one process by building
/// one driver per `LocalGroup`. Broadcasts leave the buffer untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalGroup {
    rank: usize,
    size: usize,
}

impl LocalGroup {
    /// # Panics
    /// If `rank >= size`.
    pub fn new(rank: usize, size: usize) -> Self {
        assert!(rank < size, "rank {rank} outside a group of {size}");
        Self { rank, size }
    }

    /// Every rank of a group of `size` processes.
    pub fn all(size: usize) -> Vec<Self> {
        (0..size).map(|rank| Self { rank, size }).collect()
    }
}

impl ProcessGroup for LocalGroup {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn broadcast_bytes(&self, _root: usize, _buffer: &mut Vec<u8>) {}
}

/// Shares the description held by `root` with every rank of `group`.
///
/// `description` is only read on `root`; other ranks may pass `None`.
///
/// # Errors
/// [`SplitError::MalformedInput`] if `root` holds no description or the
/// received bytes do not decode.
pub fn broadcast_description<G>(
    group: &G,
    root: usize,
    description: Option<&PartitionDescription>,
    params: &SplitParams,
) -> SplitResult<PartitionDescription>
where
    G: ProcessGroup + ?Sized,
{
    let mut buffer = if group.rank() == root {
        description
            .ok_or_else(|| SplitError::malformed(0, "root rank holds no partition description"))?
            .to_bytes()
    } else {
        Vec::new()
    };

    group.broadcast_bytes(root, &mut buffer);

    PartitionDescription::from_bytes(&buffer, params)
}
