use clap::Parser;
use log::{info, warn};

use std::io;

mod args;
mod tracker;

use crate::args::Args;
use crate::tracker::*;

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }
    info!("args: {:?}", args);

    let res = match resolve_data_path(&args) {
        Ok(data_path) if args.summary => print_summary(&data_path),
        Ok(data_path) => {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout());
            run_session(&data_path, &mut prompter)
        }
        Err(e) => Err(e),
    };

    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        std::process::exit(1);
    }
}
