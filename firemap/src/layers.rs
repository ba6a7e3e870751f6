//! Jeu de couches de la carte et ordre de superposition

use std::path::Path;

use anyhow::{Context, Result};
use maplayers::{Crs, Feature, Layer};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::LayerFiles;
use crate::reproject_lite::CrsTransform;

/// Étapes de dessin de la carte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Mer et terre (remplissage de la limite)
    Background,
    Lakes,
    Rivers,
    Roads,
    Settlements,
    Fires,
    Hazard,
    /// Contour de la limite
    Boundary,
    /// Titre, légende, échelle, cadre
    Annotations,
}

impl LayerKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Lakes => "lakes",
            Self::Rivers => "rivers",
            Self::Roads => "roads",
            Self::Settlements => "settlements",
            Self::Fires => "fires",
            Self::Hazard => "hazard",
            Self::Boundary => "boundary",
            Self::Annotations => "annotations",
        }
    }
}

/// Ordre de superposition : fond → eau → routes → lieux habités → feux →
/// emprise de danger → limite → annotations
pub const DRAW_ORDER: [LayerKind; 9] = [
    LayerKind::Background,
    LayerKind::Lakes,
    LayerKind::Rivers,
    LayerKind::Roads,
    LayerKind::Settlements,
    LayerKind::Fires,
    LayerKind::Hazard,
    LayerKind::Boundary,
    LayerKind::Annotations,
];

/// Ordre des sections de la légende
pub const LEGEND_ORDER: [LayerKind; 6] = [
    LayerKind::Fires,
    LayerKind::Settlements,
    LayerKind::Roads,
    LayerKind::Rivers,
    LayerKind::Lakes,
    LayerKind::Hazard,
];

/// Les six couches sources, chargées avant tout dessin
#[derive(Debug, Clone)]
pub struct LayerSet {
    pub boundary: Layer,
    pub settlements: Layer,
    pub lakes: Layer,
    pub rivers: Layer,
    pub roads: Layer,
    pub fires: Layer,
}

impl LayerSet {
    /// Charge les six couches depuis un répertoire.
    ///
    /// Un fichier manquant est fatal : aucune carte n'est produite.
    pub fn load(dir: &Path, files: &LayerFiles) -> Result<Self> {
        let load = |name: &str, file: &str| -> Result<Layer> {
            let path = dir.join(file);
            let layer = maplayers::load_named(name, &path)
                .context(format!("Failed to load {} layer from {}", name, path.display()))?;
            debug!(layer = name, features = layer.len(), crs = %layer.crs, "Layer loaded");
            Ok(layer)
        };

        let set = Self {
            boundary: load("boundary", &files.boundary)?,
            settlements: load("settlements", &files.settlements)?,
            lakes: load("lakes", &files.lakes)?,
            rivers: load("rivers", &files.rivers)?,
            roads: load("roads", &files.roads)?,
            fires: load("fires", &files.fires)?,
        };

        info!(
            dir = %dir.display(),
            features = set.iter().map(Layer::len).sum::<usize>(),
            "Layers loaded"
        );

        Ok(set)
    }

    /// Parcourt les couches (limite, lieux habités, lacs, rivières, routes, feux)
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        [
            &self.boundary,
            &self.settlements,
            &self.lakes,
            &self.rivers,
            &self.roads,
            &self.fires,
        ]
        .into_iter()
    }

    /// Reprojette toutes les couches dans le CRS de la carte
    pub fn reproject(self, target: Crs) -> Result<Self> {
        Ok(Self {
            boundary: reproject_layer(self.boundary, target)?,
            settlements: reproject_layer(self.settlements, target)?,
            lakes: reproject_layer(self.lakes, target)?,
            rivers: reproject_layer(self.rivers, target)?,
            roads: reproject_layer(self.roads, target)?,
            fires: reproject_layer(self.fires, target)?,
        })
    }
}

/// Reprojette une couche (renvoyée telle quelle si elle est déjà dans le CRS cible)
pub fn reproject_layer(layer: Layer, target: Crs) -> Result<Layer> {
    if layer.crs == target {
        return Ok(layer);
    }

    let transform = CrsTransform::between(layer.crs, target)?;
    info!(
        layer = %layer.name,
        from = %layer.crs,
        to = %target,
        backend = transform.backend(),
        "Reprojecting layer"
    );

    let features = layer
        .features
        .into_iter()
        .map(|feature| {
            let geometry = transform
                .apply(&feature.geometry)
                .context(format!("Failed to reproject feature {}", feature.id))?;
            Ok(Feature {
                geometry,
                ..feature
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Layer::new(layer.name, target, features))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Geometry, Point};

    #[test]
    fn test_draw_order_precedence() {
        let position = |kind| DRAW_ORDER.iter().position(|k| *k == kind).unwrap();

        assert_eq!(position(LayerKind::Background), 0);
        assert!(position(LayerKind::Lakes) < position(LayerKind::Roads));
        assert!(position(LayerKind::Rivers) < position(LayerKind::Roads));
        assert!(position(LayerKind::Roads) < position(LayerKind::Settlements));
        assert!(position(LayerKind::Settlements) < position(LayerKind::Fires));
        assert!(position(LayerKind::Fires) < position(LayerKind::Hazard));
        assert!(position(LayerKind::Hazard) < position(LayerKind::Boundary));
        assert_eq!(position(LayerKind::Annotations), DRAW_ORDER.len() - 1);
    }

    #[test]
    fn test_reproject_layer() {
        let layer = Layer::new(
            "fires",
            Crs::WGS84,
            vec![Feature::new("1", Point::new(28.2225, 36.4341)).with_property("ACQDATENEW", "24/07/2023")],
        );

        let projected = reproject_layer(layer, Crs::utm_north(35)).unwrap();
        assert_eq!(projected.crs, Crs::utm_north(35));
        assert_eq!(projected.features[0].id, "1");
        assert!(projected.features[0].attribute("ACQDATENEW").is_some());

        let Geometry::Point(p) = &projected.features[0].geometry else {
            panic!("Expected Point geometry");
        };
        assert!((p.x() - 609576.5).abs() < 1.0);
    }

    #[test]
    fn test_reproject_same_crs_is_noop() {
        let layer = Layer::new("lakes", Crs::utm_north(35), vec![Feature::new("1", Point::new(1.0, 2.0))]);
        let projected = reproject_layer(layer, Crs::utm_north(35)).unwrap();
        assert_eq!(projected.features[0].geometry, Geometry::Point(Point::new(1.0, 2.0)));
    }
}
