/////////////////////////////////////////////////////////////////////////////////////////////
//
// Moves column data between global and region-local numbering through region-to-all tables.
//
// Created on: 02 Mar 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Restriction and prolongation of column blocks through a region's
//! region-to-all table.
//!
//! Rows of the global block are indexed by global id; rows of a regional
//! block by the local ordinal within the region's full member list.

use crate::{
    error::{SplitError, SplitResult},
    row_maps::RowMapBuilder,
};
use faer::{Mat, MatRef};

/// Gathers the rows of `global` belonging to `region` into a regional block.
///
/// # Errors
/// [`SplitError::DimensionMismatch`] if `global` does not have one row per
/// node, plus any error of [`RowMapBuilder::region_to_all`].
pub fn restrict_to_region(
    driver: &RowMapBuilder,
    region: usize,
    global: MatRef<'_, f64>,
) -> SplitResult<Mat<f64>> {
    check_rows(driver.num_global_elements(), global.nrows())?;

    let table = driver.region_to_all(region)?;

    Ok(Mat::from_fn(table.len(), global.ncols(), |i, j| {
        *global.get(table[i].1, j)
    }))
}

/// Adds a regional block back into `global`.
///
/// Interface rows receive the sum of the contributions of every region
/// prolonged into them.
///
/// # Errors
/// [`SplitError::DimensionMismatch`] if `global` does not have one row per
/// node, or `local` does not have one row per region member or the same
/// number of columns as `global`.
pub fn prolong_from_region(
    driver: &RowMapBuilder,
    region: usize,
    local: MatRef<'_, f64>,
    global: &mut Mat<f64>,
) -> SplitResult<()> {
    check_rows(driver.num_global_elements(), global.nrows())?;

    let table = driver.region_to_all(region)?;

    check_rows(table.len(), local.nrows())?;
    if local.ncols() != global.ncols() {
        return Err(SplitError::DimensionMismatch {
            expected: global.ncols(),
            found: local.ncols(),
        });
    }

    for &(ordinal, node) in table {
        for j in 0..local.ncols() {
            global[(node, j)] += *local.get(ordinal, j);
        }
    }

    Ok(())
}

fn check_rows(expected: usize, found: usize) -> SplitResult<()> {
    if expected != found {
        return Err(SplitError::DimensionMismatch { expected, found });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SplitParams, partition::PartitionDescription, process_group::SerialGroup,
    };

    fn driver() -> RowMapBuilder {
        let description =
            PartitionDescription::parse("2\n5\n0 0\n1 0\n2 0\n2 1\n3 1\n4 1\n").unwrap();
        let mut driver =
            RowMapBuilder::new(&description, &SerialGroup, SplitParams::default(), None).unwrap();
        driver.create_row_maps().unwrap();
        driver
    }

    #[test]
    fn restrict_picks_region_rows() {
        let driver = driver();
        let global = Mat::from_fn(5, 2, |i, j| (10 * i + j) as f64);

        let local = restrict_to_region(&driver, 1, global.as_ref()).unwrap();

        assert_eq!(local.nrows(), 3);
        assert_eq!(local.ncols(), 2);
        for (ordinal, node) in [(0usize, 2usize), (1, 3), (2, 4)] {
            assert_eq!(local[(ordinal, 0)], (10 * node) as f64);
            assert_eq!(local[(ordinal, 1)], (10 * node + 1) as f64);
        }
    }

    #[test]
    fn prolong_accumulates_on_interface() {
        let driver = driver();
        let mut global = Mat::<f64>::zeros(5, 1);

        for region in 0..2 {
            let ones = Mat::from_fn(3, 1, |_, _| 1.0);
            prolong_from_region(&driver, region, ones.as_ref(), &mut global).unwrap();
        }

        let values: Vec<f64> = (0..5).map(|i| global[(i, 0)]).collect();
        assert_eq!(values, vec![1.0, 1.0, 2.0, 1.0, 1.0]);
    }

    #[test]
    fn restrict_then_prolong_scales_by_multiplicity() {
        let driver = driver();
        let global = Mat::from_fn(5, 1, |i, _| i as f64 + 1.0);
        let mut accumulated = Mat::<f64>::zeros(5, 1);

        for region in 0..2 {
            let local = restrict_to_region(&driver, region, global.as_ref()).unwrap();
            prolong_from_region(&driver, region, local.as_ref(), &mut accumulated).unwrap();
        }

        for node in 0..5 {
            let multiplicity = driver.region_index().regions_of(node).len() as f64;
            assert_eq!(accumulated[(node, 0)], multiplicity * global[(node, 0)]);
        }
    }

    #[test]
    fn dimension_mismatches_are_reported() {
        let driver = driver();

        let short = Mat::<f64>::zeros(4, 1);
        assert!(matches!(
            restrict_to_region(&driver, 0, short.as_ref()),
            Err(SplitError::DimensionMismatch { expected: 5, found: 4 })
        ));

        let mut global = Mat::<f64>::zeros(5, 1);
        let wrong_rows = Mat::<f64>::zeros(2, 1);
        assert!(matches!(
            prolong_from_region(&driver, 0, wrong_rows.as_ref(), &mut global),
            Err(SplitError::DimensionMismatch { expected: 3, found: 2 })
        ));

        let wrong_cols = Mat::<f64>::zeros(3, 2);
        assert!(matches!(
            prolong_from_region(&driver, 0, wrong_cols.as_ref(), &mut global),
            Err(SplitError::DimensionMismatch { expected: 1, found: 2 })
        ));
    }
}
