/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the error type shared by partition parsing, indexing, assignment, and row-map queries.
//
// Created on: 02 Mar 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Error type shared by every stage of the splitting pipeline.
//!
//! Construction-time failures (parsing, indexing, assignment) are raised
//! eagerly by the component that detects them. Query misuse is raised when
//! the query is made. None of them are recoverable within a run.
use std::{io, path::PathBuf};
use thiserror::Error;

/// Result alias used throughout the crate.
pub type SplitResult<T> = std::result::Result<T, SplitError>;

/// Errors raised while building or querying a region splitting.
#[derive(Debug, Error)]
pub enum SplitError {
    /// The partition description is inconsistent with its header, or
    /// a record could not be read. `line` is 1-based; `0` refers to the
    /// description as a whole.
    #[error("malformed partition description (line {line}): {reason}")]
    MalformedInput { line: usize, reason: String },

    /// A declared node has no membership record.
    #[error("node {node} does not belong to any region")]
    OrphanNode { node: usize },

    /// Processes cannot be mapped onto the regions.
    #[error("unsatisfiable process assignment: {reason}")]
    UnsatisfiableAssignment {
        reason: String,
        region: Option<usize>,
    },

    /// The region id is out of range or not owned by the calling rank.
    #[error("region {region} is not available on rank {rank}")]
    UnknownRegion { region: usize, rank: usize },

    /// A row-map query was made before the maps were created.
    #[error("row maps have not been created yet")]
    NotInitialized,

    /// A data block does not match the row count of the map it is
    /// transferred through.
    #[error("expected {expected} rows, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Failed to read a partition description from disk.
    #[error("reading {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl SplitError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        SplitError::MalformedInput {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn unsatisfiable(reason: impl Into<String>, region: Option<usize>) -> Self {
        SplitError::UnsatisfiableAssignment {
            reason: reason.into(),
            region,
        }
    }
}
