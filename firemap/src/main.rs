//! Point d'entrée CLI pour firemap

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::{Commands, RenderArgs};

/// Carte thématique des incendies de Rhodes (juillet 2023)
#[derive(Parser)]
#[command(name = "firemap")]
#[command(author, version)]
#[command(about = "Render the Rhodes wildfire map (default) or export the hazard extent")]
#[command(long_about = "Render a thematic map of the July 2023 Rhodes wildfires: boundary, built-up areas, water, roads, VIIRS fire detections and the buffered hazard extent.\n\nBy default, renders the map. Use 'hazard' to export the hazard extent as GeoJSON.")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Sous-commande (défaut: rendu de la carte)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Arguments du rendu (commande par défaut)
    #[command(flatten)]
    render: RenderArgs,
}

fn main() -> Result<()> {
    load_env();

    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Some(Commands::Hazard {
            data_dir,
            output,
            config,
            radius,
            quad_segs,
        }) => {
            info!(output = %output.display(), radius = ?radius, "Export hazard extent");
            cli::cmd_hazard(data_dir.as_deref(), &output, &config, radius, quad_segs)?;
        }
        None => {
            info!(output = %cli.render.output.display(), config = %cli.render.config, "Render map");
            cli::cmd_render(&cli.render, cli.quiet)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
