pub mod actions;
pub mod api;
pub mod banner;
pub mod cli;
mod commands;
pub mod console;
pub mod error;
pub mod schedule;
pub mod session;
pub mod state;
pub mod sync;
pub mod token_store;
pub mod types;
pub mod util;
pub mod validate;
pub mod wizard;

use clap::Parser;

use cli::Cli;

pub fn run() {
    // The terminal is the UI; only warnings and errors reach stderr by default.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(err) = runtime.block_on(commands::run(cli)) {
        log::debug!("Command failed: {:?}", err);
        eprintln!("{}", err.report());
        std::process::exit(1);
    }
}
