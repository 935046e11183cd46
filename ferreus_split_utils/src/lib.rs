/////////////////////////////////////////////////////////////////////////////////////////////
//
// Re-exports the index apportioning and slicing helpers used across the ferreus_split crates.
//
// Created on: 02 Mar 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Utilities for the [`ferreus_split`] crate
//!
//! Small, allocation-light helpers for distributing integer work units
//! over buckets and for cutting ordered index lists into contiguous pieces.
mod apportion;
mod slicing;

pub use {
    apportion::apportion,
    slicing::{is_strictly_increasing, merge_sorted_unique, split_contiguous},
};
