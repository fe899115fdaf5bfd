mod args;
mod lottery;

use clap::Parser;
use log::{debug, warn};
use snafu::ErrorCompat;

use crate::args::Args;
use crate::lottery::LotteryCliError;

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    debug!("args: {:?}", args);

    match lottery::run_lottery_file(&args) {
        Ok(_) => {}
        // The violations have already been listed.
        Err(LotteryCliError::ValidationFailed { .. }) => std::process::exit(1),
        Err(e) => {
            warn!("Error occured {:?}", e);
            eprintln!("An error occured: {}", e);
            if let Some(bt) = ErrorCompat::backtrace(&e) {
                eprintln!("trace: {}", bt);
            }
            std::process::exit(2);
        }
    }
}
