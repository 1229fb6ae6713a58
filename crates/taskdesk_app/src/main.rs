use std::process::ExitCode;

use clap::Parser;

mod cli;
mod logging;
mod prefs;
mod render;
mod session;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    logging::initialize(cli.log.into());

    match session::run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
