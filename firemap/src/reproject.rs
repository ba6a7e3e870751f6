//! Reprojection de géométries avec PROJ
//!
//! Ce module est disponible uniquement avec le feature `reproject`. Il couvre
//! les CRS que `reproject_lite` ne sait pas traiter (ex. GGRS87 / EPSG:2100,
//! système national grec).

use anyhow::{Context, Result};
use geo::{Coord, Geometry, MapCoords};
use proj::Proj;

/// Reprojection de géométries entre deux systèmes de coordonnées
pub struct Reprojector {
    proj: Proj,
    source_epsg: u32,
    target_epsg: u32,
}

impl Reprojector {
    /// Crée un nouveau reprojector entre deux EPSG
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self> {
        let source = format!("EPSG:{}", source_epsg);
        let target = format!("EPSG:{}", target_epsg);

        let proj = Proj::new_known_crs(&source, &target, None).context(format!(
            "Failed to create projection from {} to {}",
            source, target
        ))?;

        Ok(Self {
            proj,
            source_epsg,
            target_epsg,
        })
    }

    /// Retourne le SRID source
    pub fn source_epsg(&self) -> u32 {
        self.source_epsg
    }

    /// Retourne le SRID cible
    pub fn target_epsg(&self) -> u32 {
        self.target_epsg
    }

    /// Transforme une géométrie
    pub fn transform_geometry(&self, geom: &Geometry) -> Result<Geometry> {
        if self.source_epsg == self.target_epsg {
            return Ok(geom.clone());
        }

        geom.try_map_coords(|c| {
            let (x, y) = self
                .proj
                .convert((c.x, c.y))
                .context("Coordinate transformation failed")?;
            Ok(Coord { x, y })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    #[test]
    fn test_wgs84_to_utm35() {
        let reprojector = Reprojector::new(4326, 32635).unwrap();

        let rhodes = Geometry::Point(Point::new(28.2225, 36.4341));
        let Geometry::Point(p) = reprojector.transform_geometry(&rhodes).unwrap() else {
            panic!("Expected Point geometry");
        };

        assert!((p.x() - 609576.5).abs() < 1.0, "x={}", p.x());
        assert!((p.y() - 4032792.6).abs() < 1.0, "y={}", p.y());
    }

    #[test]
    fn test_invalid_epsg() {
        assert!(Reprojector::new(99999, 4326).is_err());
    }
}
