//! Binary entrypoint for the `board-pilot` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env file is fine; flags and the real environment suffice.
    let _ = dotenvy::dotenv();
    board_pilot::logging::init();

    match board_pilot::run(std::env::args_os()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
