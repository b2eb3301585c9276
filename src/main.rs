use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

mod bounds;
mod cli;
mod context;
mod dataset;
mod diagnostics;
mod energy;
mod engine;
mod error;
mod geo;
mod irradiance;
mod output;
mod sampler;
mod time;

use bounds::resolve_sun_bounds;
use cli::Args;
use context::LocationContext;
use dataset::write_dataset;
use energy::{ChargingWindows, setup_time_table, write_setup_energy};
use engine::SpaEngine;
use error::RunError;
use sampler::sample_daylight;

// ===================== MAIN =====================

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => {
            println!("DONE!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Run aborted: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), RunError> {
    let ctx = LocationContext::from_args(args);
    let engine = SpaEngine;

    let bounds = resolve_sun_bounds(&engine, &ctx)?;
    output::print_sun_bounds(&ctx, bounds);

    if !args.needs_samples() {
        info!("Dataset output disabled, skipping daylight sampling");
        return Ok(());
    }

    // Whole day is sampled before anything is written
    let records = sample_daylight(&engine, &ctx, bounds)?;

    if args.write_dataset() {
        write_dataset(&args.output, &records)?;
        output::print_dataset_summary(&args.output, &records);
    }

    if let Some(path) = &args.setup_energy {
        let windows = ChargingWindows {
            morning_cutoff_hr: args.morning_cutoff,
            evening_cutoff_hr: args.evening_cutoff,
        };
        let table = setup_time_table(&records, windows, args.max_setup_minutes);
        write_setup_energy(path, &table)?;
        output::print_setup_energy(path, windows, &table);
    }

    Ok(())
}
