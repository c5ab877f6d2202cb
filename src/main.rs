mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::AppContext;

#[derive(Parser)]
#[command(name = "nextapp", version, about = "Next-app prediction from local launch history")]
struct Cli {
    /// Directory holding the database and config/settings.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one launch
    Record(commands::activity::RecordArgs),
    /// Import launches from a JSON lines file
    Import { path: PathBuf },
    /// Predict the next app
    Predict(commands::predict::PredictArgs),
    /// Show or change the selected model
    Model {
        #[command(subcommand)]
        action: commands::settings::ModelAction,
    },
    /// Print the effective settings
    Settings,
    /// Launch log statistics
    Stats,
    /// Delete events older than the retention window
    Cleanup {
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
        retention_days: Option<i64>,
    },
    /// Retrain periodically and print predictions until Ctrl-C
    Watch(commands::predict::PredictArgs),
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut ctx = AppContext::load(cli.data_dir)?;

    match cli.command {
        Commands::Record(args) => commands::activity::record(&ctx, args),
        Commands::Import { path } => commands::activity::import(&ctx, path),
        Commands::Predict(args) => commands::predict::run(&ctx, args),
        Commands::Model { action } => commands::settings::run(&mut ctx, action),
        Commands::Settings => commands::settings::show_settings(&ctx),
        Commands::Stats => commands::storage::stats(&ctx),
        Commands::Cleanup { retention_days } => {
            let deleted = commands::storage::cleanup_old_data(&ctx, retention_days)?;
            println!("Deleted {} events", deleted);
            Ok(())
        }
        Commands::Watch(args) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(commands::watch::run(ctx, args))
        }
    }
}

fn main() {
    nextapp::utils::config::load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
