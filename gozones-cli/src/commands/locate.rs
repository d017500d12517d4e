//! Locate and plot commands - put a marker on the map.

use super::output::print_point;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the locate command: geocode a free-text address.
pub fn run_locate(runner: &CliRunner, address: &[String]) -> Result<(), CliError> {
    runner.log_startup("locate");
    let app = runner.start_app()?;
    let runtime = runner.runtime()?;

    let query = address.join(" ");
    println!("Searching for \"{}\"...", query);
    let point = runtime.block_on(app.resolver().resolve_address(&query))?;

    let view = app.surface().lock().view();
    print_point(&point, view);
    Ok(())
}

/// Run the plot command: mark typed coordinates without any network access.
pub fn run_plot(runner: &CliRunner, coordinates: &str) -> Result<(), CliError> {
    runner.log_startup("plot");
    let app = runner.start_app()?;

    let point = app.resolver().resolve_coordinates(coordinates)?;

    let view = app.surface().lock().view();
    print_point(&point, view);
    Ok(())
}
