use bvr_slips::args::{Args, Command};
use bvr_slips::{commands, Config, Result};
use clap::Parser;
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
    let home = args.common().bvr_home().path();

    let _: () = match args.command() {
        Command::Init(init_args) => {
            commands::init(home, init_args.bvr_account(), init_args.locale())
                .await?
                .print()
        }

        Command::ScanLine(scan_args) => {
            let config = Config::load(home).await?;
            commands::scan_line(&config, scan_args.reference(), scan_args.account())?.print()
        }

        Command::FormatRef(ref_args) => commands::format_ref(ref_args.reference())?.print(),

        Command::Months(months_args) => {
            let config = Config::load(home).await?;
            commands::months(&config, months_args.group(), months_args.span())
                .await?
                .print()
        }

        Command::Print(print_args) => {
            let config = Config::load(home).await?;
            commands::print(
                &config,
                print_args.groups(),
                print_args.span(),
                print_args.save(),
            )
            .await?
            .print()
        }
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
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                "bvr_slips",
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
