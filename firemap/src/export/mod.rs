//! Export GeoJSON des couches dérivées

pub mod geojson;

pub use self::geojson::export_layer;
