/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares configuration types controlling record validation and process assignment.
//
// Created on: 02 Mar 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Declares configuration types controlling record validation and process assignment.
use serde::{Deserialize, Serialize};

/// How repeated `(node, region)` membership records are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicateRecordPolicy {
    /// A repeated record is reported as malformed input.
    Reject,

    /// Repeated records are collapsed into one.
    Merge,
}

impl Default for DuplicateRecordPolicy {
    fn default() -> Self {
        DuplicateRecordPolicy::Reject
    }
}

/// Parameters controlling how a partition description is validated and
/// how worker processes are mapped onto its regions.
///
/// ### Default Values
/// - `duplicate_records`: [`DuplicateRecordPolicy::Reject`]
/// - `require_all_ranks_active`: `false`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitParams {
    /// Treatment of repeated membership records.
    pub duplicate_records: DuplicateRecordPolicy,

    /// When `true`, an assignment that leaves any rank without nodes is
    /// rejected instead of leaving the rank inactive.
    pub require_all_ranks_active: bool,
}

impl SplitParams {
    /// Returns a new [`SplitParamsBuilder`] populated with defaults.
    pub fn builder() -> SplitParamsBuilder {
        SplitParamsBuilder::new()
    }
}

/// A convenience builder for constructing a [`SplitParams`] instance.
///
/// The builder should be called via the [`SplitParams::builder`] method.
///
/// See [`SplitParams`] for details on each field.
#[derive(Debug, Clone, Copy)]
pub struct SplitParamsBuilder {
    pub duplicate_records: DuplicateRecordPolicy,
    pub require_all_ranks_active: bool,
}

impl SplitParamsBuilder {
    fn new() -> Self {
        let defaults = SplitParams::default();
        Self {
            duplicate_records: defaults.duplicate_records,
            require_all_ranks_active: defaults.require_all_ranks_active,
        }
    }

    /// Sets the duplicate record policy.
    pub fn duplicate_records(mut self, duplicate_records: DuplicateRecordPolicy) -> Self {
        self.duplicate_records = duplicate_records;
        self
    }

    /// Enables or disables rejection of assignments with inactive ranks.
    pub fn require_all_ranks_active(mut self, require_all_ranks_active: bool) -> Self {
        self.require_all_ranks_active = require_all_ranks_active;
        self
    }

    /// Builds and returns a [`SplitParams`] instance.
    pub fn build(self) -> SplitParams {
        SplitParams {
            duplicate_records: self.duplicate_records,
            require_all_ranks_active: self.require_all_ranks_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_matches_default() {
        assert_eq!(SplitParams::builder().build(), SplitParams::default());
    }

    #[test]
    fn builder_overrides() {
        let params = SplitParams::builder()
            .duplicate_records(DuplicateRecordPolicy::Merge)
            .require_all_ranks_active(true)
            .build();

        assert_eq!(params.duplicate_records, DuplicateRecordPolicy::Merge);
        assert!(params.require_all_ranks_active);
    }

    #[test]
    fn params_deserialize_from_json() {
        let json = r#"{ "duplicate_records": "Merge", "require_all_ranks_active": false }"#;
        let params: SplitParams = serde_json::from_str(json).expect("valid params json");
        assert_eq!(params.duplicate_records, DuplicateRecordPolicy::Merge);
        assert!(!params.require_all_ranks_active);
    }
}
