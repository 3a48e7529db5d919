use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "fairhour-cli", version, about = "Fairhour CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 24-hour equity heatmap for a candidate date
    Heatmap(commands::heatmap::HeatmapArgs),
    /// Ranked best meeting hours for a candidate date
    Suggest(commands::suggest::SuggestArgs),
    /// Holiday lookups and cache warming
    Holidays {
        #[command(subcommand)]
        action: commands::holidays::HolidaysAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Heatmap(args) => commands::heatmap::run(args).await,
        Commands::Suggest(args) => commands::suggest::run(args).await,
        Commands::Holidays { action } => commands::holidays::run(action).await,
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "fairhour-cli",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
