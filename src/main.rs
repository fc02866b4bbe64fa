//! bugbear CLI entry point.

use clap::Parser;
use bugbear::cli::{self, Cli, Commands, EXIT_ERROR};

fn main() {
    bugbear::init_tracing();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Check(args) => cli::run_check(args),
        Commands::Rules => cli::run_rules(),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
