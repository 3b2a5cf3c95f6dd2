mod catalog_cmds;
mod config;
mod export_cmd;
mod input;
mod plan_cmd;
mod render;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use catalog_cmds::CatalogCommands;
use config::MarketerConfig;
use export_cmd::ExportFormat;
use input::PlanArgs;
use plan_cmd::PlanFormat;

#[derive(Parser)]
#[command(
    name = "marketer",
    about = "Deterministic marketing plans: campaign plays, budget split, weekly calendar"
)]
struct Cli {
    /// Catalog TOML file (overrides MARKETER_CATALOG env var and config file)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a marketer config file with the built-in defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Build a plan and print it
    Plan {
        #[command(flatten)]
        args: PlanArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = PlanFormat::Text)]
        format: PlanFormat,
    },
    /// Write a plan brief to a file
    Export {
        #[command(flatten)]
        args: PlanArgs,
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<String>,
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Markdown)]
        format: ExportFormat,
    },
    /// Print a share code and a short brief for the team
    Share {
        #[command(flatten)]
        args: PlanArgs,
    },
    /// Inspect or validate catalogs
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Serve the planner over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

/// Execute the `marketer init` command: write config file.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let path = config::config_path();
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }
    let cfg = config::ConfigFile {
        defaults: config::DefaultsSection::builtin(),
        catalog: config::CatalogSection::default(),
    };
    config::save_config_to(&cfg, &path)?;
    println!("Config written to {}", path.display());
    println!("Edit [defaults] to change the planner's starting values.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cli_catalog = cli.catalog.as_deref();

    match cli.command {
        Commands::Init { force } => cmd_init(force)?,
        Commands::Plan { args, format } => {
            let resolved = MarketerConfig::resolve(cli_catalog)?;
            let snapshot = args.to_snapshot(&resolved.defaults)?;
            plan_cmd::run_plan(&resolved.catalog, &snapshot, format)?;
        }
        Commands::Export {
            args,
            output,
            format,
        } => {
            let resolved = MarketerConfig::resolve(cli_catalog)?;
            let snapshot = args.to_snapshot(&resolved.defaults)?;
            export_cmd::run_export(&resolved.catalog, &snapshot, format, output.as_deref())?;
        }
        Commands::Share { args } => {
            let resolved = MarketerConfig::resolve(cli_catalog)?;
            let snapshot = args.to_snapshot(&resolved.defaults)?;
            plan_cmd::run_share(&resolved.catalog, &snapshot)?;
        }
        Commands::Catalog { command } => {
            catalog_cmds::run_catalog_command(command, cli_catalog)?;
        }
        Commands::Serve { bind, port } => {
            let resolved = MarketerConfig::resolve(cli_catalog)?;
            let state = serve_cmd::AppState {
                catalog: resolved.catalog,
                defaults: resolved.defaults,
            };
            serve_cmd::run_serve(state, &bind, port).await?;
        }
    }

    Ok(())
}
