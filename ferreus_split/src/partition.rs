/////////////////////////////////////////////////////////////////////////////////////////////
//
// Parses node-to-region membership descriptions and validates them against their header.
//
// Created on: 02 Mar 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # partition
//!
//! Immutable record of which mesh nodes belong to which regions.
//!
//! The text format is
//!
//! ```text
//! <num_regions>
//! <num_nodes>
//! <node> <region>
//! <node> <region>
//! ...
//! ```
//!
//! with one membership record per line after the two header lines. A node
//! belonging to `k` regions appears on `k` lines. Blank lines are ignored.

use crate::{
    config::{DuplicateRecordPolicy, SplitParams},
    error::{SplitError, SplitResult},
};
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    collections::HashMap,
    fmt, fs,
    path::Path,
};
use tracing::{debug, warn};

/// A single `(node, region)` membership record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Membership {
    /// Global id of the node.
    pub node: usize,

    /// Id of the region the node belongs to.
    pub region: usize,
}

impl Membership {
    pub fn new(node: usize, region: usize) -> Self {
        Self { node, region }
    }
}

/// Orders records by region, then by node.
#[inline]
pub fn compare_regions(lhs: &Membership, rhs: &Membership) -> Ordering {
    lhs.region.cmp(&rhs.region).then(lhs.node.cmp(&rhs.node))
}

/// Orders records by node only.
#[inline]
pub fn compare_nodes(lhs: &Membership, rhs: &Membership) -> Ordering {
    lhs.node.cmp(&rhs.node)
}

/// Parsed node-to-region membership of a mesh.
///
/// Every record has `node < num_nodes` and `region < num_regions`, and no
/// record appears twice. Record order is the input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionDescription {
    num_nodes: usize,
    num_regions: usize,
    records: Vec<Membership>,
}

impl PartitionDescription {
    /// Parses the text format with default [`SplitParams`].
    ///
    /// # Errors
    /// [`SplitError::MalformedInput`] if a header value is missing or not an
    /// integer, a record does not hold exactly two integers, an id is out of
    /// range, or a record is repeated.
    pub fn parse(source: &str) -> SplitResult<Self> {
        Self::parse_with_params(source, &SplitParams::default())
    }

    /// Parses the text format, treating repeated records according to
    /// `params.duplicate_records`.
    pub fn parse_with_params(source: &str, params: &SplitParams) -> SplitResult<Self> {
        let mut lines = source
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let num_regions = parse_header(lines.next(), "region count")?;
        let num_nodes = parse_header(lines.next(), "node count")?;

        let mut records = Vec::new();
        let mut record_lines = Vec::new();

        for (line_no, line) in lines {
            let mut tokens = line.split_whitespace();

            let node = parse_id(tokens.next(), line_no, "node id")?;
            let region = parse_id(tokens.next(), line_no, "region id")?;

            if let Some(extra) = tokens.next() {
                return Err(SplitError::malformed(
                    line_no,
                    format!("unexpected trailing token {extra:?}"),
                ));
            }

            records.push(Membership::new(node, region));
            record_lines.push(line_no);
        }

        let description =
            Self::validated(num_nodes, num_regions, records, &record_lines, params)?;

        debug!(
            num_nodes,
            num_regions,
            num_records = description.records.len(),
            "parsed partition description"
        );

        Ok(description)
    }

    /// Builds a description from already split parts, applying the same
    /// validation as [`PartitionDescription::parse_with_params`]. Errors refer
    /// to records by their 1-based position.
    pub fn from_parts(
        num_nodes: usize,
        num_regions: usize,
        records: Vec<Membership>,
        params: &SplitParams,
    ) -> SplitResult<Self> {
        let positions: Vec<usize> = (1..=records.len()).collect();
        Self::validated(num_nodes, num_regions, records, &positions, params)
    }

    /// Reads and parses a description file.
    ///
    /// # Errors
    /// [`SplitError::Io`] if the file cannot be read, otherwise as for
    /// [`PartitionDescription::parse_with_params`].
    pub fn from_path<P: AsRef<Path>>(path: P, params: &SplitParams) -> SplitResult<Self> {
        let path_ref = path.as_ref();
        let source = fs::read_to_string(path_ref).map_err(|e| SplitError::Io {
            path: path_ref.to_path_buf(),
            source: e,
        })?;

        Self::parse_with_params(&source, params)
    }

    /// Encodes the description in the text format, suitable for
    /// broadcasting to other processes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Decodes a description produced by [`PartitionDescription::to_bytes`].
    pub fn from_bytes(bytes: &[u8], params: &SplitParams) -> SplitResult<Self> {
        let source = std::str::from_utf8(bytes)
            .map_err(|e| SplitError::malformed(0, format!("not valid UTF-8: {e}")))?;
        Self::parse_with_params(source, params)
    }

    /// Wraps parts already known to satisfy the validation rules.
    pub(crate) fn from_validated_parts(
        num_nodes: usize,
        num_regions: usize,
        records: Vec<Membership>,
    ) -> Self {
        Self {
            num_nodes,
            num_regions,
            records,
        }
    }

    /// Total number of nodes declared by the header.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Total number of regions declared by the header.
    pub fn num_regions(&self) -> usize {
        self.num_regions
    }

    /// Membership records in input order.
    pub fn records(&self) -> &[Membership] {
        &self.records
    }

    fn validated(
        num_nodes: usize,
        num_regions: usize,
        records: Vec<Membership>,
        positions: &[usize],
        params: &SplitParams,
    ) -> SplitResult<Self> {
        let mut first_seen: HashMap<Membership, usize> = HashMap::with_capacity(records.len());
        let mut kept = Vec::with_capacity(records.len());
        let mut num_merged = 0usize;

        for (record, &position) in records.into_iter().zip(positions.iter()) {
            if record.node >= num_nodes {
                return Err(SplitError::malformed(
                    position,
                    format!("node id {} outside [0, {num_nodes})", record.node),
                ));
            }
            if record.region >= num_regions {
                return Err(SplitError::malformed(
                    position,
                    format!("region id {} outside [0, {num_regions})", record.region),
                ));
            }

            if let Some(&first) = first_seen.get(&record) {
                match params.duplicate_records {
                    DuplicateRecordPolicy::Reject => {
                        return Err(SplitError::malformed(
                            position,
                            format!(
                                "node {} listed in region {} again (first at {first})",
                                record.node, record.region
                            ),
                        ));
                    }
                    DuplicateRecordPolicy::Merge => {
                        num_merged += 1;
                        continue;
                    }
                }
            }

            first_seen.insert(record, position);
            kept.push(record);
        }

        if num_merged > 0 {
            warn!(num_merged, "merged repeated membership records");
        }

        Ok(Self {
            num_nodes,
            num_regions,
            records: kept,
        })
    }
}

impl fmt::Display for PartitionDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.num_regions)?;
        writeln!(f, "{}", self.num_nodes)?;
        for record in &self.records {
            writeln!(f, "{} {}", record.node, record.region)?;
        }
        Ok(())
    }
}

fn parse_header(line: Option<(usize, &str)>, what: &str) -> SplitResult<usize> {
    let (line_no, text) = line.ok_or_else(|| SplitError::malformed(0, format!("missing {what}")))?;

    let mut tokens = text.split_whitespace();
    let value = parse_id(tokens.next(), line_no, what)?;

    if tokens.next().is_some() {
        return Err(SplitError::malformed(
            line_no,
            format!("{what} line must hold a single integer"),
        ));
    }

    Ok(value)
}

fn parse_id(token: Option<&str>, line_no: usize, what: &str) -> SplitResult<usize> {
    let token = token.ok_or_else(|| SplitError::malformed(line_no, format!("missing {what}")))?;

    token
        .parse::<usize>()
        .map_err(|_| SplitError::malformed(line_no, format!("{what} {token:?} is not a non-negative integer")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_REGIONS: &str = "2\n5\n0 0\n1 0\n2 0\n2 1\n3 1\n4 1\n";

    fn malformed_line(result: SplitResult<PartitionDescription>) -> usize {
        match result {
            Err(SplitError::MalformedInput { line, .. }) => line,
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn parses_header_and_records() {
        let description = PartitionDescription::parse(TWO_REGIONS).unwrap();

        assert_eq!(description.num_regions(), 2);
        assert_eq!(description.num_nodes(), 5);
        assert_eq!(description.records().len(), 6);
        assert_eq!(description.records()[3], Membership::new(2, 1));
    }

    #[test]
    fn blank_lines_and_surrounding_whitespace_are_ignored() {
        let source = "\n 2 \n5\n\n0 0\n1\t0\n  2 0\n2 1\n3 1\n4 1\n\n";
        let description = PartitionDescription::parse(source).unwrap();
        assert_eq!(description, PartitionDescription::parse(TWO_REGIONS).unwrap());
    }

    #[test]
    fn header_may_be_followed_by_no_records() {
        let description = PartitionDescription::parse("3\n0\n").unwrap();
        assert_eq!(description.num_regions(), 3);
        assert!(description.records().is_empty());
    }

    #[test]
    fn missing_header_is_malformed() {
        assert_eq!(malformed_line(PartitionDescription::parse("")), 0);
        assert_eq!(malformed_line(PartitionDescription::parse("2\n")), 0);
    }

    #[test]
    fn non_integer_header_is_malformed() {
        assert_eq!(malformed_line(PartitionDescription::parse("two\n5\n")), 1);
        assert_eq!(malformed_line(PartitionDescription::parse("2\n-5\n")), 2);
        assert_eq!(malformed_line(PartitionDescription::parse("2\n5 6\n")), 2);
    }

    #[test]
    fn incomplete_record_is_malformed() {
        assert_eq!(malformed_line(PartitionDescription::parse("2\n5\n0 0\n1\n")), 4);
    }

    #[test]
    fn trailing_token_is_malformed() {
        assert_eq!(malformed_line(PartitionDescription::parse("2\n5\n0 0 0\n")), 3);
    }

    #[test]
    fn out_of_range_ids_are_malformed() {
        assert_eq!(malformed_line(PartitionDescription::parse("2\n5\n5 0\n")), 3);
        assert_eq!(malformed_line(PartitionDescription::parse("2\n5\n0 0\n4 2\n")), 4);
    }

    #[test]
    fn duplicate_records_rejected_by_default() {
        let source = "1\n2\n0 0\n1 0\n0 0\n";
        assert_eq!(malformed_line(PartitionDescription::parse(source)), 5);
    }

    #[test]
    fn duplicate_records_merged_when_requested() {
        let params = SplitParams::builder()
            .duplicate_records(DuplicateRecordPolicy::Merge)
            .build();
        let description =
            PartitionDescription::parse_with_params("1\n2\n0 0\n1 0\n0 0\n", &params).unwrap();

        assert_eq!(
            description.records(),
            &[Membership::new(0, 0), Membership::new(1, 0)]
        );
    }

    #[test]
    fn from_parts_reports_record_position() {
        let records = vec![Membership::new(0, 0), Membership::new(0, 3)];
        let result = PartitionDescription::from_parts(1, 2, records, &SplitParams::default());
        assert_eq!(malformed_line(result), 2);
    }

    #[test]
    fn bytes_reproduce_the_description() {
        let description = PartitionDescription::parse(TWO_REGIONS).unwrap();
        let decoded =
            PartitionDescription::from_bytes(&description.to_bytes(), &SplitParams::default())
                .unwrap();
        assert_eq!(decoded, description);
        assert_eq!(description.to_string(), TWO_REGIONS);
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let result = PartitionDescription::from_bytes(&[0xff, 0xfe], &SplitParams::default());
        assert_eq!(malformed_line(result), 0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = PartitionDescription::from_path(
            "definitely/not/a/partition.txt",
            &SplitParams::default(),
        );
        assert!(matches!(result, Err(SplitError::Io { .. })));
    }

    #[test]
    fn comparators_order_records() {
        let a = Membership::new(4, 0);
        let b = Membership::new(1, 1);
        let c = Membership::new(1, 0);

        assert_eq!(compare_regions(&a, &b), Ordering::Less);
        assert_eq!(compare_regions(&c, &a), Ordering::Less);
        assert_eq!(compare_nodes(&b, &c), Ordering::Equal);
        assert_eq!(compare_nodes(&a, &b), Ordering::Greater);
    }
}
