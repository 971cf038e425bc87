use clap::Parser as ClapParser;
use ctype_lower::driver::{Cli, CompilerDriver};
use log::LevelFilter;
use std::process::exit;

/// The main entry point for the application.
///
/// Parses command-line arguments and runs the driver.
fn main() {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let mut driver = CompilerDriver::new(cli);
    if let Err(e) = driver.run() {
        eprintln!("error: {}", e);
        exit(1);
    }
}
