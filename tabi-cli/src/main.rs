//! Entry point for the `tabi` command-line interface.
#![forbid(unsafe_code)]

use std::process::ExitCode;

use tabi_cli::CliError;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn main() -> ExitCode {
    match tabi_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("tabi: {err}");
            ExitCode::FAILURE
        }
    }
}
