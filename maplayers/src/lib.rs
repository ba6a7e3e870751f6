//! # maplayers
//!
//! Chargement de couches vectorielles catégorisées (GeoJSON) pour la
//! cartographie thématique.
//!
//! ## Features
//!
//! - Lecture des FeatureCollection GeoJSON avec détection du membre `crs`
//! - Types `geo` pour l'interopérabilité avec l'écosystème Rust géospatial
//! - Accès typé aux attributs catégoriels (absent/null et non scalaire sont des erreurs)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use maplayers::load;
//! use std::path::Path;
//!
//! let layer = load(Path::new("data/BUA.geojson"))?;
//! println!("{}: {} features ({})", layer.name, layer.len(), layer.crs);
//!
//! for feature in &layer.features {
//!     println!("{}", layer.category(feature, "fclass")?);
//! }
//! ```

pub mod crs;
pub mod error;
pub mod geojson;
pub mod types;

pub use crs::Crs;
pub use error::LayerError;
pub use types::{Feature, Layer};

use std::path::Path;

use tracing::debug;

/// Charge une couche GeoJSON, nommée d'après le fichier (sans extension).
///
/// # Errors
///
/// `MissingFile` si le fichier n'existe pas, `Io` s'il est illisible,
/// `ParseError` / `UnknownCrs` si le contenu est invalide.
pub fn load(path: &Path) -> Result<Layer, LayerError> {
    let name = layer_name(path);
    load_named(&name, path)
}

/// Charge une couche GeoJSON sous un nom donné
pub fn load_named(name: &str, path: &Path) -> Result<Layer, LayerError> {
    if !path.is_file() {
        return Err(LayerError::MissingFile(path.display().to_string()));
    }

    debug!(layer = name, path = %path.display(), "Loading layer");
    let content = std::fs::read_to_string(path)?;
    geojson::parse_str(name, &content)
}

/// Nom de couche déduit du chemin : `data/BUA.geojson` → `BUA`
pub fn layer_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "layer".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_name() {
        assert_eq!(layer_name(Path::new("data/BUA.geojson")), "BUA");
        assert_eq!(layer_name(Path::new("RoadsRefine.json")), "RoadsRefine");
        assert_eq!(layer_name(Path::new("")), "layer");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/nonexistent/RhodesBnd.geojson")).unwrap_err();
        assert!(matches!(err, LayerError::MissingFile(_)));
    }
}
