use ferreus_split::{
    PartitionDescription, RowMapBuilder, config::SplitParams, process_group::SerialGroup,
    transfer::{prolong_from_region, restrict_to_region},
};
use faer::Mat;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Two regions of a five node mesh, sharing node 2
    let description = PartitionDescription::parse("2\n5\n0 0\n1 0\n2 0\n2 1\n3 1\n4 1\n")?;

    let mut driver = RowMapBuilder::new(&description, &SerialGroup, SplitParams::default(), None)?;
    driver.create_row_maps()?;

    print!("{}", driver.region_index());
    print!("{driver}");

    // Restrict a global vector to each region and add the pieces back
    let global = Mat::from_fn(5, 1, |i, _| i as f64);
    let mut summed = Mat::<f64>::zeros(5, 1);

    for region in 0..driver.num_total_regions() {
        let local = restrict_to_region(&driver, region, global.as_ref())?;
        prolong_from_region(&driver, region, local.as_ref(), &mut summed)?;
    }

    let values: Vec<f64> = (0..5).map(|i| summed[(i, 0)]).collect();
    println!("restrict + prolong: {values:?}");

    Ok(())
}
