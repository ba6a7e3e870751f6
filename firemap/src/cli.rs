//! Définition et implémentation des commandes CLI
//!
//! - commande par défaut : rendu de la carte (PNG ou SVG)
//! - `hazard` : emprise de danger → GeoJSON

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::{info, warn};

use firemap::config::MapConfig;
use firemap::export::export_layer;
use firemap::hazard::{hazard_extent, hazard_layer};
use firemap::layers::{reproject_layer, LayerSet};
use firemap::render::{render_map, write_output, OutputFormat, RenderOptions};
use maplayers::Crs;

/// Variable d'environnement du répertoire de données
pub const DATA_DIR_ENV: &str = "FIREMAP_DATA_DIR";

/// Répertoire de données utilisé en dernier recours
pub const DEFAULT_DATA_DIR: &str = "AssessmentData";

const DEFAULT_RADIUS: f64 = 1000.0;
const DEFAULT_QUAD_SEGS: u32 = 16;

/// Arguments du rendu de la carte
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Directory holding the GeoJSON layers (défaut : env FIREMAP_DATA_DIR / AssessmentData)
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Output image file
    #[arg(short, long, default_value = "rhodes_wildfires.png")]
    pub output: PathBuf,

    /// Config preset name (full/light) or path to a JSON config
    #[arg(long, default_value = "full")]
    pub config: String,

    /// Output format (défaut : déduit de l'extension)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Do not draw the scale bar
    #[arg(long)]
    pub no_scale_bar: bool,

    /// Save the render report as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export the buffered fire hazard extent as GeoJSON
    Hazard {
        /// Directory holding the GeoJSON layers (défaut : env FIREMAP_DATA_DIR / AssessmentData)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Output GeoJSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Config preset name (full/light) or path to a JSON config
        #[arg(long, default_value = "full")]
        config: String,

        /// Buffer radius in map units (défaut : config, sinon 1000 m)
        #[arg(long)]
        radius: Option<f64>,

        /// Segments per quarter circle (défaut : config, sinon 16)
        #[arg(long)]
        quad_segs: Option<u32>,
    },
}

/// Répertoire de données : argument, puis variable d'environnement, puis défaut
pub fn resolve_data_dir(arg: Option<&Path>) -> PathBuf {
    if let Some(dir) = arg {
        return dir.to_path_buf();
    }
    match std::env::var(DATA_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_DATA_DIR),
    }
}

/// Exécute le rendu de la carte
pub fn cmd_render(args: &RenderArgs, quiet: bool) -> Result<()> {
    let start = Instant::now();
    let config = MapConfig::from_spec(&args.config)
        .context(format!("Failed to load config '{}'", args.config))?;
    let data_dir = resolve_data_dir(args.data_dir.as_deref());

    info!(data_dir = %data_dir.display(), title = %config.title, "Loading layers");
    let layers = LayerSet::load(&data_dir, &config.files)?.reproject(Crs::new(config.crs))?;

    if args.no_scale_bar && config.scale_bar.is_none() {
        warn!("--no-scale-bar has no effect: the config defines no scale bar");
    }
    let options = RenderOptions {
        scale_bar: !args.no_scale_bar,
    };
    let mut map = render_map(&config, &layers, &options)?;

    let format = args
        .format
        .unwrap_or_else(|| OutputFormat::from_path(&args.output));
    write_output(&map, &args.output, format)?;

    map.report.set_duration(start.elapsed());
    if !quiet {
        map.report.display();
    }
    if let Some(path) = &args.report {
        map.report.save_to_file(path)?;
        info!(report = %path.display(), "Report saved");
    }

    info!("{}", map.report.summary());
    Ok(())
}

/// Exporte l'emprise de danger en GeoJSON
pub fn cmd_hazard(
    data_dir: Option<&Path>,
    output: &Path,
    config_spec: &str,
    radius: Option<f64>,
    quad_segs: Option<u32>,
) -> Result<()> {
    let config = MapConfig::from_spec(config_spec)
        .context(format!("Failed to load config '{}'", config_spec))?;
    let data_dir = resolve_data_dir(data_dir);

    let radius = radius
        .or(config.hazard.as_ref().map(|h| h.radius))
        .unwrap_or(DEFAULT_RADIUS);
    let quad_segs = quad_segs
        .or(config.hazard.as_ref().map(|h| h.quad_segs))
        .unwrap_or(DEFAULT_QUAD_SEGS);
    if radius <= 0.0 || quad_segs == 0 {
        anyhow::bail!("Radius and quad_segs must be positive (got {}, {})", radius, quad_segs);
    }

    let crs = Crs::new(config.crs);
    let path = data_dir.join(&config.files.fires);
    let fires = maplayers::load_named("fires", &path)
        .context(format!("Failed to load fires layer from {}", path.display()))?;
    let fires = reproject_layer(fires, crs)?;

    let extent = hazard_extent(&fires.features, radius, quad_segs)
        .context("Failed to derive hazard extent")?;
    info!(
        points = fires.len(),
        parts = extent.0.len(),
        radius,
        quad_segs,
        "Hazard extent computed"
    );

    export_layer(&hazard_layer(extent, crs), output)
}
