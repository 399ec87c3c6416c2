use acdl_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    if let Err(err) = logging::init_logging() {
        eprintln!("acdl: {:#}", err);
    }

    if let Err(err) = Cli::run_from_args().await {
        eprintln!("acdl error: {:#}", err);
        std::process::exit(1);
    }
}
