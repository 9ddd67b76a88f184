//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use env_logger::{Builder, Env};
use wayfarer_cli::CliError;

fn main() {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    match wayfarer_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("wayfarer: {err}");
            std::process::exit(1);
        }
    }
}
