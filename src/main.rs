//! lid-inject entry point: CLI wiring, logging setup, and the injection run.

use std::process;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lid_inject::cli::CliOptions;
use lid_inject::run::perform_injection;

fn init_logging(verbose: bool) {
    let default = if verbose {
        "lid_inject=debug"
    } else {
        "lid_inject=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = CliOptions::parse();
    init_logging(cli.verbose);

    let config = match cli.run_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let report = match perform_injection(&config) {
        Ok(report) => report,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    for lid in &report.lids {
        println!(
            "{}\t{}\t{}\t{}",
            lid.lid_id,
            lid.category.code(),
            lid.subcatchment,
            lid.drain_to.as_field()
        );
    }
    info!(lids = report.lids.len(), "done");
}
