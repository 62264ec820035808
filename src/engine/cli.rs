//! CLI command handler: convert the given path; print usage when no path is given.

use anyhow::Result;
use clap::CommandFactory;
use log::debug;

use crate::Opts;
use crate::convert_path;
use crate::engine::arg_parser::Cli;
use crate::pipeline::log_summary;
use crate::utils::{apply_file_to_opts, load_rdf2nt_toml, setup_logging};

/// Defaults, then `.rdf2nt.toml` in the working directory, then CLI flags.
fn setup_opts(cli: &Cli) -> Opts {
    setup_logging(cli.verbose);
    let mut opts = Opts::default();
    if let Ok(cwd) = std::env::current_dir()
        && let Some(file) = load_rdf2nt_toml(&cwd)
    {
        debug!("Loaded config from {}", cwd.display());
        apply_file_to_opts(&file, &mut opts);
    }
    opts.recursive |= cli.recursive;
    opts.strict |= cli.strict;
    if cli.format.is_some() {
        opts.format = cli.format.clone();
    }
    opts.verbose = cli.verbose;
    opts
}

/// Convert `cli.path` to stdout. Per-file failures are diagnostics, not errors.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let Some(path) = cli.path.as_deref() else {
        println!("Please specify the file or directory to be converted.\n");
        Cli::command().print_help()?;
        return Ok(());
    };
    let opts = setup_opts(cli);
    let summary = convert_path(path, &opts)?;
    if opts.verbose {
        log_summary(&summary);
    }
    Ok(())
}
