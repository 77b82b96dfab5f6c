use clap::Parser;
use expense_tracker::args::{Args, BudgetAction, Command};
use expense_tracker::{api, commands, App, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let mut config = Config::load(args.common().config().path()).await?;
    debug!(
        "Loaded {} config version {} from {}",
        config.app_name(),
        config.config_version(),
        config.config_path().display()
    );
    if let Some(base_url) = args.common().base_url() {
        config = config.with_base_url(base_url.clone());
    }

    // This allows for running the program without a backend. When EXPENSE_TRACKER_TEST_MODE is
    // set and non-zero in length, then the mode will be Mode::Test, otherwise it will be
    // Mode::Http.
    let mode = Mode::from_env();
    let app = App::new(api::remote(&config, mode)?);

    let _: () = match args.command() {
        Command::List(list_args) => commands::list(&app, list_args).await?.print(),
        Command::Add(add_args) => commands::add(&app, add_args).await?.print(),
        Command::Edit(edit_args) => commands::edit(&app, edit_args).await?.print(),
        Command::Delete(delete_args) => commands::delete(&app, delete_args).await?.print(),
        Command::Stats => commands::stats(&app).await?.print(),
        Command::Budget(budget_args) => match budget_args.action() {
            BudgetAction::Set { amount } => commands::budget_set(&app, amount).await?.print(),
            BudgetAction::Status => commands::budget_status(&app).await?.print(),
        },
        Command::Alerts => commands::alerts(&app).await?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only. The library
            // and the binary share the crate name.
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
