//! Identification du système de coordonnées d'une couche
//!
//! GeoJSON (RFC 7946) suppose WGS84. Les fichiers exportés depuis un SIG en
//! coordonnées projetées portent souvent le membre `crs` hérité de la version
//! 2008 du format :
//!
//! ```json
//! "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::32635"}}
//! ```

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::LayerError;

/// Système de coordonnées identifié par son code EPSG
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crs {
    /// Code EPSG
    pub epsg: u32,
}

impl Crs {
    /// WGS84 géographique (défaut GeoJSON)
    pub const WGS84: Crs = Crs { epsg: 4326 };

    pub const fn new(epsg: u32) -> Self {
        Self { epsg }
    }

    /// UTM hémisphère nord, WGS84 (EPSG:326zz)
    pub const fn utm_north(zone: u32) -> Self {
        Self {
            epsg: 32600 + zone,
        }
    }

    /// Zone UTM si le CRS est un UTM WGS84 (nord ou sud)
    pub fn utm_zone(&self) -> Option<(u32, bool)> {
        match self.epsg {
            32601..=32660 => Some((self.epsg - 32600, false)),
            32701..=32760 => Some((self.epsg - 32700, true)),
            _ => None,
        }
    }

    /// URN OGC utilisé dans le membre `crs` GeoJSON
    pub fn urn(&self) -> String {
        format!("urn:ogc:def:crs:EPSG::{}", self.epsg)
    }

    /// Identifie un CRS depuis un nom (`EPSG:32635`, URN OGC, URL opengis, CRS84)
    pub fn from_name(name: &str) -> Result<Self, LayerError> {
        static EPSG_RE: OnceLock<Regex> = OnceLock::new();
        let re = EPSG_RE.get_or_init(|| {
            Regex::new(r"(?i)EPSG[:/](?:[\d.]*[:/])?(\d+)\s*$").expect("valid EPSG regex")
        });

        let trimmed = name.trim();
        if trimmed.to_ascii_uppercase().ends_with("CRS84") {
            return Ok(Self::WGS84);
        }

        re.captures(trimmed)
            .and_then(|c| c[1].parse::<u32>().ok())
            .map(Self::new)
            .ok_or_else(|| LayerError::UnknownCrs(name.to_string()))
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::WGS84
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.utm_zone() {
            Some((zone, false)) => write!(f, "EPSG:{} (UTM {}N)", self.epsg, zone),
            Some((zone, true)) => write!(f, "EPSG:{} (UTM {}S)", self.epsg, zone),
            None => write!(f, "EPSG:{}", self.epsg),
        }
    }
}
