//! Sortie de la carte : rastérisation PNG (resvg) ou document SVG

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use tracing::{debug, info};

use super::RenderedMap;

/// Format du fichier produit
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    /// Déduit le format de l'extension (PNG par défaut)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Self::Svg,
            _ => Self::Png,
        }
    }
}

/// Rastérise le document SVG à sa taille nominale
pub fn rasterize(svg: &str, width: u32, height: u32) -> Result<tiny_skia::Pixmap> {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    debug!(faces = fontdb.len(), "Fonts loaded");

    let opt = usvg::Options {
        fontdb: Arc::new(fontdb),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &opt).context("Failed to parse map SVG")?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow!("Invalid pixmap size {}x{}", width, height))?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    Ok(pixmap)
}

/// Écrit la carte au format demandé
pub fn write_output(map: &RenderedMap, path: &Path, format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create directory: {}", parent.display()))?;
    }

    match format {
        OutputFormat::Svg => {
            std::fs::write(path, &map.svg)
                .context(format!("Failed to write SVG: {}", path.display()))?;
        }
        OutputFormat::Png => {
            let pixmap = rasterize(&map.svg, map.width, map.height)?;
            let png = pixmap.encode_png().context("Failed to encode PNG")?;
            std::fs::write(path, png).context(format!("Failed to write PNG: {}", path.display()))?;
        }
    }

    info!(output = %path.display(), format = ?format, "Map written");
    Ok(())
}
