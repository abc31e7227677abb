//! licgen: issue signed licenses and generate signing keys.
//!
//! Usage:
//!   licgen --type certificate --rsa-bits 2048
//!   licgen --type license --name "Acme Corp" --expiry 2030-1-01 --platforms linux,darwin
//!   licgen --type test

use clap::Parser;
use licgen_cli::{init_logging, run_generate, GenArgs};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match GenArgs::try_parse() {
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

    match run_generate(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("licgen: {err:#}");
            ExitCode::FAILURE
        }
    }
}
