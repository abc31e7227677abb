//! licgen-check: verify a license file against a public key.
//!
//! Usage:
//!   licgen-check --lic license.json --cert cert.pem

use clap::Parser;
use licgen_cli::{init_logging, run_check, CheckArgs};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match CheckArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_logging(args.verbose);

    match run_check(&args) {
        Ok(_) => {
            println!("License OK");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("License check failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}
