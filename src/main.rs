use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use geodex::log::init_logging;
use geodex::query::{CountryQuery, SortKey};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch both external feeds and rebuild the catalog
    Refresh,
    /// List catalog entries
    List {
        /// Only countries in this region
        #[arg(long)]
        region: Option<String>,
        /// Only countries using this currency code
        #[arg(long)]
        currency: Option<String>,
        /// One of gdp_desc|gdp_asc|population_desc|population_asc|name_asc
        #[arg(long, default_value = "name_asc")]
        sort: String,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
    },
    /// Show a single country by name (case-insensitive)
    Show { name: String },
    /// Delete a country by name (case-insensitive)
    Delete { name: String },
    /// Print catalog counters
    Status,
}

fn to_app_command(command: Commands) -> Result<geodex::AppCommand> {
    Ok(match command {
        Commands::Refresh => geodex::AppCommand::Refresh,
        Commands::List {
            region,
            currency,
            sort,
            limit,
            offset,
        } => geodex::AppCommand::List(CountryQuery {
            region,
            currency,
            sort: SortKey::parse(&sort)?,
            limit,
            offset,
        }),
        Commands::Show { name } => geodex::AppCommand::Show { name },
        Commands::Delete { name } => geodex::AppCommand::Delete { name },
        Commands::Status => geodex::AppCommand::Status,
        Commands::Setup => unreachable!("Setup command should be handled separately"),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(command) => geodex::run_command(to_app_command(command)?, cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> Result<()> {
    use anyhow::Context;

    let path = geodex::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
sources:
  countries:
    base_url: "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies"
  rates:
    base_url: "https://open.er-api.com/v6/latest/USD"

# Uncomment to draw text on the summary image:
# font_path: "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
