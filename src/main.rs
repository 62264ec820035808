//! rdf2nt CLI: convert RDF files, archives and directories to N-Triples on stdout.

use anyhow::Result;
use clap::Parser;
use rdf2nt::engine::arg_parser::Cli;
use rdf2nt::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    // RUST_LOG and friends may come from a .env file.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
