//! Choix de la transformation entre le CRS d'une couche et celui de la carte
//!
//! Les données de Rhodes arrivent en WGS84 ou déjà en UTM 35N : le calcul
//! UTM intégré suffit. Les autres CRS (GGRS87 / EPSG:2100...) passent par
//! PROJ quand la feature `reproject` est active.

use anyhow::Result;
use geo::Geometry;
use maplayers::Crs;

use super::ReprojectorLite;

/// Transformation de coordonnées d'une couche vers la carte
pub enum CrsTransform {
    /// Même CRS : géométries copiées telles quelles
    Identity,
    /// Géographique WGS84 et UTM
    Utm(ReprojectorLite),
    #[cfg(feature = "reproject")]
    Proj(crate::reproject::Reprojector),
}

impl CrsTransform {
    pub fn between(source: Crs, target: Crs) -> Result<Self> {
        if source == target {
            return Ok(Self::Identity);
        }

        if ReprojectorLite::is_supported(source.epsg, target.epsg) {
            return Ok(Self::Utm(ReprojectorLite::new(source.epsg, target.epsg)?));
        }

        #[cfg(feature = "reproject")]
        {
            let proj = crate::reproject::Reprojector::new(source.epsg, target.epsg)?;
            Ok(Self::Proj(proj))
        }

        #[cfg(not(feature = "reproject"))]
        anyhow::bail!(
            "Cannot transform layer coordinates from {} to {}: only WGS84 and UTM zones are built in \
             (enable the `reproject` feature for other CRS)",
            source,
            target
        )
    }

    pub fn apply(&self, geom: &Geometry) -> Result<Geometry> {
        match self {
            Self::Identity => Ok(geom.clone()),
            Self::Utm(utm) => utm.transform_geometry(geom),
            #[cfg(feature = "reproject")]
            Self::Proj(proj) => proj.transform_geometry(geom),
        }
    }

    /// Nom court pour les logs
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Utm(_) => "utm",
            #[cfg(feature = "reproject")]
            Self::Proj(_) => "proj",
        }
    }
}
