//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use breedbook_cli::CliError;
use env_logger::Env;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    match breedbook_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("breedbook: {err}");
            std::process::exit(1);
        }
    }
}
