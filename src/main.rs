use std::process::ExitCode;

use jeveassets_companion::cli;

fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(cli::commands::EXIT_SCAN_FAILED)
        }
    }
}
