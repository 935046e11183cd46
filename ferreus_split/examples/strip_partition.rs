use ferreus_split::{
    RowMapBuilder, generate_random_partition,
    config::SplitParams,
    process_group::LocalGroup,
    progress::{ProgressMsg, closure_sink},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Cut 1000 nodes into 6 strip regions sharing one node with each neighbour
    let description = generate_random_partition(1000, 6, Some(42));

    // Print assignment events as they happen
    let (sink, listener) = closure_sink(64, |msg| {
        if let ProgressMsg::AssignmentResolved { case, num_processes, num_inactive } = msg {
            println!("{num_processes} processes, {case:?}, {num_inactive} inactive");
        }
    });

    // Reproduce each rank of a 16 process run in turn
    for group in LocalGroup::all(16) {
        let mut driver =
            RowMapBuilder::new(&description, &group, SplitParams::default(), Some(sink.clone()))?;
        driver.create_row_maps()?;

        println!(
            "rank {:>2}: {:>4} global rows, {:>4} uniquely owned, regions {:?}",
            driver.rank(),
            driver.global_row_map()?.len(),
            driver.unique_global_row_map()?.len(),
            driver.assignment().regions_of_rank(driver.rank()),
        );
    }

    drop(sink);
    let _ = listener.join();

    Ok(())
}
