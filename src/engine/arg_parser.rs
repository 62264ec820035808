use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Convert RDF files, compressed files, tar archives and directories to N-Triples on stdout.
#[derive(Clone, Debug, Parser)]
#[command(name = "rdf2nt")]
#[command(about = "Convert RDF files, archives and directories to N-Triples on stdout.")]
pub struct Cli {
    /// File, directory, or `-` for standard input. Without it, usage is printed.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Descend into subdirectories.
    #[arg(short = 'r', long, action = ArgAction::SetTrue)]
    pub recursive: bool,

    /// Strict structural checking while parsing.
    #[arg(short = 'c', long = "check", action = ArgAction::SetTrue)]
    pub strict: bool,

    /// Parse every input as this notation, given by extension (e.g. `ttl`, `nt`, `rdf`).
    #[arg(short = 'f', long, value_name = "EXT")]
    pub format: Option<String>,

    /// Verbose output.
    #[arg(short = 'v', long, action = ArgAction::SetTrue)]
    pub verbose: bool,
}
