//! Reprojection légère en Rust pur (sans dépendances externes)
//!
//! Supporte :
//! - WGS84 géographique (EPSG:4326)
//! - UTM WGS84 nord et sud (EPSG:32601-32660, 32701-32760)
//!
//! dans toutes les combinaisons (UTM → UTM passe par le géographique).

mod ellipsoid;
mod transform;
mod utm;

pub use ellipsoid::WGS84;
pub use transform::CrsTransform;

use anyhow::{bail, Result};
use geo::{Coord, Geometry, MapCoords};
use maplayers::Crs;

/// Point en coordonnées géographiques (radians)
#[derive(Debug, Clone, Copy)]
pub struct Geographic {
    /// Longitude en radians
    pub lon: f64,
    /// Latitude en radians
    pub lat: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Convertit en degrés
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }

    /// Crée depuis des degrés
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon: lon_deg.to_radians(),
            lat: lat_deg.to_radians(),
        }
    }
}

/// Reprojection légère WGS84 / UTM
pub struct ReprojectorLite {
    source: Crs,
    target: Crs,
}

impl ReprojectorLite {
    /// Crée un nouveau reprojector
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self> {
        for epsg in [source_epsg, target_epsg] {
            if !Self::is_supported_crs(epsg) {
                bail!(
                    "EPSG:{} non supporté. Supportés: 4326, 32601-32660, 32701-32760",
                    epsg
                );
            }
        }

        Ok(Self {
            source: Crs::new(source_epsg),
            target: Crs::new(target_epsg),
        })
    }

    /// Vérifie si un EPSG est géré
    pub fn is_supported_crs(epsg: u32) -> bool {
        epsg == Crs::WGS84.epsg || Crs::new(epsg).utm_zone().is_some()
    }

    /// Vérifie si la reprojection est supportée
    pub fn is_supported(source: u32, target: u32) -> bool {
        Self::is_supported_crs(source) && Self::is_supported_crs(target)
    }

    /// Transforme un point (x, y) de la source vers la cible
    pub fn transform_point(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        // Étape 1: Source → Géographique (WGS84)
        let geo = match self.source.utm_zone() {
            Some((zone, south)) => utm::utm_to_geographic(x, y, zone, south)?,
            None => Geographic::from_degrees(x, y),
        };

        // Étape 2: Géographique → Cible
        match self.target.utm_zone() {
            Some((zone, south)) => utm::geographic_to_utm(geo, zone, south),
            None => Ok(geo.to_degrees()),
        }
    }

    /// Transforme une géométrie
    pub fn transform_geometry(&self, geom: &Geometry) -> Result<Geometry> {
        geom.try_map_coords(|c| {
            let (x, y) = self.transform_point(c.x, c.y)?;
            Ok(Coord { x, y })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Point};

    #[test]
    fn test_wgs84_to_utm35() {
        let reproj = ReprojectorLite::new(4326, 32635).unwrap();
        let (x, y) = reproj.transform_point(28.2225, 36.4341).unwrap();

        assert!((x - 609576.5).abs() < 1.0, "x={}", x);
        assert!((y - 4032792.6).abs() < 1.0, "y={}", y);
    }

    #[test]
    fn test_utm35_to_wgs84() {
        let reproj = ReprojectorLite::new(32635, 4326).unwrap();
        let (lon, lat) = reproj.transform_point(609576.5, 4032792.6).unwrap();

        assert!((lon - 28.2225).abs() < 1e-5, "lon={}", lon);
        assert!((lat - 36.4341).abs() < 1e-5, "lat={}", lat);
    }

    #[test]
    fn test_transform_linestring() {
        let reproj = ReprojectorLite::new(4326, 32635).unwrap();
        let line = Geometry::LineString(LineString::from(vec![(27.0, 0.0), (28.2225, 36.4341)]));

        let Geometry::LineString(result) = reproj.transform_geometry(&line).unwrap() else {
            panic!("Expected LineString geometry");
        };
        assert_eq!(result.0.len(), 2);
        assert!((result.0[0].x - 500000.0).abs() < 1e-6);
        assert!((result.0[1].y - 4032792.6).abs() < 1.0);

        let point = Geometry::Point(Point::new(27.0, 0.0));
        assert!(matches!(
            reproj.transform_geometry(&point).unwrap(),
            Geometry::Point(_)
        ));
    }

    #[test]
    fn test_unsupported_epsg() {
        assert!(ReprojectorLite::new(2154, 4326).is_err());
        assert!(ReprojectorLite::new(4326, 3857).is_err());
        assert!(ReprojectorLite::is_supported(4326, 32735));
    }
}
