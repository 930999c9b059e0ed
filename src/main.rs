//! SoftSync API Tester - end-to-end checks for the SoftSync backend
//!
//! Runs a fixed script of REST calls (auth, onboarding, events, cycle
//! tracking, notifications) against a deployment and reports pass/fail.

use clap::Parser;
use softsync_tester::commands::Commands;
use softsync_tester::{cli, common, Error};

#[derive(Parser)]
#[command(name = "softsync-tester", about = "End-to-end SoftSync API tester")]
#[command(version, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    common::logging::init_cli(cli.verbose);

    let code = match cli::dispatch(cli.command).await {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(Error::Interrupted) => {
            println!("\n⚠️ Tests interrupted by user");
            1
        }
        Err(e) => {
            eprintln!("\n💥 Test runner error: {e}");
            1
        }
    };

    std::process::exit(code);
}
