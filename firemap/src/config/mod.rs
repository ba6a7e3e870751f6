//! Configuration de la carte : fichiers sources, tables de styles, cadrage
//!
//! Les tables de styles sont des données : elles sont embarquées sous forme
//! de presets JSON (`full`, `light`) ou lues depuis un fichier de même forme.

use serde::{Deserialize, Serialize};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::color::Color;
use crate::style::{AreaStyle, LabelledStyle, LineStyle, PointStyle, StyleTable};

/// Configuration principale
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MapConfig {
    /// Titre affiché au-dessus de la carte
    pub title: String,

    /// EPSG du CRS projeté de la carte (UTM 35N pour Rhodes)
    pub crs: u32,

    pub page: PageConfig,

    /// Noms des fichiers de couches, relatifs au répertoire de données
    pub files: LayerFiles,

    pub background: BackgroundConfig,
    pub boundary: BoundaryStyle,

    pub settlements: StyleTable<PointStyle>,
    pub roads: StyleTable<LineStyle>,
    pub fires: StyleTable<PointStyle>,
    pub rivers: LabelledStyle<LineStyle>,
    pub lakes: LabelledStyle<AreaStyle>,

    /// Emprise de danger (désactivée si absente)
    #[serde(default)]
    pub hazard: Option<HazardConfig>,

    pub extent: ExtentConfig,

    /// Échelle graphique (désactivée si absente)
    #[serde(default)]
    pub scale_bar: Option<ScaleBarConfig>,

    pub legend: LegendConfig,

    #[serde(default = "default_title_font_size")]
    pub title_font_size: f64,
}

fn default_title_font_size() -> f64 {
    16.0
}

/// Page de sortie
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageConfig {
    /// Largeur en pouces
    pub width: f64,
    /// Hauteur en pouces
    pub height: f64,
    pub dpi: f64,
    /// Cadre de la carte en fractions de page : gauche, bas, largeur, hauteur
    pub axes: [f64; 4],
}

impl PageConfig {
    /// Taille de la page en pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width * self.dpi).round() as u32,
            (self.height * self.dpi).round() as u32,
        )
    }
}

/// Fichiers des six couches
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LayerFiles {
    pub boundary: String,
    pub settlements: String,
    pub lakes: String,
    pub rivers: String,
    pub roads: String,
    pub fires: String,
}

/// Fond (mer) autour de l'emprise
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackgroundConfig {
    pub color: Color,
    /// Débord du fond autour de l'emprise de la limite, en unités carte
    pub pad: f64,
}

/// Limite administrative : remplissage (terre) et contour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoundaryStyle {
    pub fill: Color,
    pub edge: Color,
    pub width: f64,
}

/// Paramètres de l'emprise de danger
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HazardConfig {
    pub label: String,

    /// Rayon du tampon en unités carte (mètres en UTM)
    pub radius: f64,

    /// Segments par quart de cercle
    #[serde(default = "default_quad_segs")]
    pub quad_segs: u32,

    #[serde(flatten)]
    pub style: AreaStyle,
}

fn default_quad_segs() -> u32 {
    16
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtentConfig {
    /// Marge ajoutée de chaque côté de l'emprise de la limite
    pub margin: f64,
}

/// Échelle graphique dessinée à la main
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScaleBarConfig {
    pub segments: u32,
    /// Longueur d'un segment en unités carte
    pub segment_length: f64,
    /// Ancre (extrémité droite) en fractions de l'emprise visible
    pub location: [f64; 2],
    /// Décalage vertical des libellés sous la barre, en unités carte
    pub label_offset: f64,
    pub unit: String,
    /// Diviseur unités carte → unité affichée (1000 pour m → km)
    pub unit_divisor: f64,
    /// Couleurs alternées des segments
    pub colors: [Color; 2],
    pub outline_width: f64,
    pub width: f64,
    pub font_size: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LegendConfig {
    pub title: String,
    pub font_size: f64,
}

impl MapConfig {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_json::from_str(&content).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "full" => Self::load_embedded(include_str!("presets/full.json")),
            "light" => Self::load_embedded(include_str!("presets/light.json")),
            _ => bail!("Unknown preset: {}. Use: full, light", preset),
        }
    }

    /// Nom de preset ou chemin vers un fichier JSON
    pub fn from_spec(spec: &str) -> Result<Self> {
        match spec {
            "full" | "light" => Self::from_preset(spec),
            path => Self::load(Path::new(path)),
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse embedded config")?;
        config.validate()?;
        Ok(config)
    }

    /// Vérifie la cohérence des valeurs numériques et des tables
    pub fn validate(&self) -> Result<()> {
        let page = &self.page;
        if page.width <= 0.0 || page.height <= 0.0 || page.dpi <= 0.0 {
            bail!("Page size and dpi must be positive");
        }
        let [left, bottom, width, height] = page.axes;
        if left < 0.0 || bottom < 0.0 || width <= 0.0 || height <= 0.0
            || left + width > 1.0 || bottom + height > 1.0
        {
            bail!("Axes rectangle {:?} must lie within the page", page.axes);
        }

        if self.extent.margin < 0.0 {
            bail!("Extent margin must not be negative");
        }

        check_unique(&self.settlements, "settlements")?;
        check_unique(&self.roads, "roads")?;
        check_unique(&self.fires, "fires")?;

        for (name, alpha) in self
            .settlements
            .categories
            .iter()
            .chain(&self.fires.categories)
            .map(|c| (c.value.as_str(), c.style.alpha))
        {
            check_alpha(name, alpha)?;
        }

        if let Some(hazard) = &self.hazard {
            if hazard.radius <= 0.0 {
                bail!("Hazard radius must be positive, got {}", hazard.radius);
            }
            if hazard.quad_segs == 0 {
                bail!("Hazard quad_segs must be at least 1");
            }
            check_alpha(&hazard.label, hazard.style.alpha)?;
        }

        if let Some(bar) = &self.scale_bar {
            if bar.segments == 0 || bar.segment_length <= 0.0 || bar.unit_divisor <= 0.0 {
                bail!("Scale bar needs at least one segment of positive length");
            }
        }

        Ok(())
    }
}

fn check_unique<S>(table: &StyleTable<S>, layer: &str) -> Result<()> {
    for (i, entry) in table.categories.iter().enumerate() {
        if table.categories[..i].iter().any(|e| e.value == entry.value) {
            bail!("Duplicate category '{}' in {} style table", entry.value, layer);
        }
    }
    Ok(())
}

fn check_alpha(name: &str, alpha: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&alpha) {
        bail!("Alpha for '{}' must be within [0, 1], got {}", name, alpha);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Marker;

    #[test]
    fn test_full_preset() {
        let config = MapConfig::from_preset("full").unwrap();

        assert_eq!(config.crs, 32635);
        assert_eq!(config.page.pixel_size(), (1000, 1000));
        assert_eq!(config.extent.margin, 0.1);

        let settlements: Vec<&str> = config
            .settlements
            .categories
            .iter()
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(
            settlements,
            vec!["city", "town", "suburb", "village", "hamlet", "locality"]
        );
        assert_eq!(config.settlements.categories[0].style.marker, Marker::Star);
        assert_eq!(config.settlements.categories[4].style.size, 2.5);

        assert_eq!(config.fires.field, "ACQDATENEW");
        assert_eq!(config.fires.categories.len(), 4);
        assert!(config.fires.categories.iter().all(|c| c.style.alpha == 0.4));

        let hazard = config.hazard.as_ref().unwrap();
        assert_eq!(hazard.radius, 1000.0);
        assert_eq!(hazard.quad_segs, 16);

        let bar = config.scale_bar.as_ref().unwrap();
        assert_eq!(bar.segments, 5);
        assert_eq!(bar.segment_length, 5000.0);
        assert_eq!(bar.colors, [Color::BLACK, Color::WHITE]);
    }

    #[test]
    fn test_light_preset() {
        let config = MapConfig::from_preset("light").unwrap();
        assert!(config.hazard.is_none());
        assert!(config.scale_bar.is_none());
        assert_eq!(config.roads.categories.len(), 3);
    }

    #[test]
    fn test_unknown_preset() {
        assert!(MapConfig::from_preset("heavy").is_err());
    }

    #[test]
    fn test_from_spec_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        let mut config = MapConfig::from_preset("full").unwrap();
        config.title = "Custom".to_string();
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = MapConfig::from_spec(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.title, "Custom");
        assert_eq!(loaded.settlements, config.settlements);
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let mut config = MapConfig::from_preset("full").unwrap();
        let dup = config.roads.categories[0].clone();
        config.roads.categories.push(dup);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = MapConfig::from_preset("full").unwrap();
        config.hazard.as_mut().unwrap().radius = 0.0;
        assert!(config.validate().is_err());

        let mut config = MapConfig::from_preset("full").unwrap();
        config.fires.categories[0].style.alpha = 1.5;
        assert!(config.validate().is_err());

        let mut config = MapConfig::from_preset("full").unwrap();
        config.page.axes = [0.5, 0.1, 0.8, 0.8];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_color_rejected() {
        let json = include_str!("presets/full.json").replace("\"khaki\"", "\"sand\"");
        assert!(MapConfig::load_embedded(&json).is_err());

        let json = include_str!("presets/full.json").replace("\"khaki\"", "\"#aé123\"");
        assert!(MapConfig::load_embedded(&json).is_err());
    }
}
