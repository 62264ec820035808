pub mod config;
pub mod logger;
pub mod rdf2nt_toml;

pub use config::*;
pub use logger::setup_logging;
pub use rdf2nt_toml::{apply_file_to_opts, load_rdf2nt_toml, parse_rdf2nt_toml};
