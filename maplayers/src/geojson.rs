//! Lecture des couches GeoJSON

use geo::Geometry;
use geojson::feature::Id;
use geojson::{FeatureCollection, GeoJson};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::crs::Crs;
use crate::types::{Feature, Layer};
use crate::LayerError;

/// Parse le contenu d'un fichier GeoJSON en couche.
///
/// Un document `Feature` ou `Geometry` isolé donne une couche d'une feature.
/// Les features sans géométrie sont ignorées.
pub fn parse_str(name: &str, content: &str) -> Result<Layer, LayerError> {
    let geojson: GeoJson = content
        .parse()
        .map_err(|e: geojson::Error| LayerError::parse_error(name, e.to_string()))?;

    let (crs, raw_features) = match geojson {
        GeoJson::FeatureCollection(collection) => (read_crs(&collection)?, collection.features),
        GeoJson::Feature(feature) => (Crs::default(), vec![feature]),
        GeoJson::Geometry(geometry) => (
            Crs::default(),
            vec![geojson::Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: None,
                foreign_members: None,
            }],
        ),
    };

    let mut features = Vec::with_capacity(raw_features.len());
    for (index, raw) in raw_features.into_iter().enumerate() {
        let id = match raw.id {
            Some(Id::String(s)) => s,
            Some(Id::Number(n)) => n.to_string(),
            None => index.to_string(),
        };

        let Some(geometry) = raw.geometry else {
            warn!(layer = name, feature = %id, "Feature without geometry, skipped");
            continue;
        };

        let geometry = Geometry::<f64>::try_from(geometry)
            .map_err(|e| LayerError::parse_error(name, format!("feature {}: {}", id, e)))?;

        let properties = raw
            .properties
            .map(|props| props.into_iter().collect())
            .unwrap_or_default();

        features.push(Feature {
            id,
            geometry,
            properties,
        });
    }

    debug!(layer = name, crs = %crs, features = features.len(), "GeoJSON parsed");

    Ok(Layer::new(name, crs, features))
}

/// Lit le membre `crs` d'une FeatureCollection (WGS84 s'il est absent)
pub fn read_crs(collection: &FeatureCollection) -> Result<Crs, LayerError> {
    let Some(crs) = collection
        .foreign_members
        .as_ref()
        .and_then(|members| members.get("crs"))
    else {
        return Ok(Crs::default());
    };

    let name = crs
        .get("properties")
        .and_then(|p| p.get("name"))
        .and_then(JsonValue::as_str)
        .ok_or_else(|| LayerError::UnknownCrs(crs.to_string()))?;

    Crs::from_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    const BUA: &str = r#"{
        "type": "FeatureCollection",
        "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::32635"}},
        "features": [
            {"type": "Feature", "id": "rhodes", "geometry": {"type": "Point", "coordinates": [600000.0, 4030000.0]}, "properties": {"fclass": "city", "name": "Rhodes"}},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [590000.0, 4010000.0]}, "properties": {"fclass": "village", "population": 1200}},
            {"type": "Feature", "geometry": null, "properties": {"fclass": "hamlet"}}
        ]
    }"#;

    #[test]
    fn test_parse_collection() {
        let layer = parse_str("BUA", BUA).unwrap();

        assert_eq!(layer.name, "BUA");
        assert_eq!(layer.crs, Crs::utm_north(35));
        assert_eq!(layer.len(), 2);

        let first = &layer.features[0];
        assert_eq!(first.id, "rhodes");
        assert_eq!(first.geometry, Geometry::Point(Point::new(600000.0, 4030000.0)));
        assert_eq!(layer.category(first, "fclass").unwrap(), "city");

        // Sans id : position dans le fichier
        assert_eq!(layer.features[1].id, "1");
        assert_eq!(layer.category(&layer.features[1], "population").unwrap(), "1200");
    }

    #[test]
    fn test_default_crs_is_wgs84() {
        let content = r#"{"type": "FeatureCollection", "features": []}"#;
        let layer = parse_str("empty", content).unwrap();
        assert_eq!(layer.crs, Crs::WGS84);
        assert!(layer.is_empty());
    }

    #[test]
    fn test_invalid_crs_member() {
        let content = r#"{"type": "FeatureCollection", "crs": {"type": "link"}, "features": []}"#;
        assert!(matches!(
            parse_str("bad", content),
            Err(LayerError::UnknownCrs(_))
        ));
    }

    #[test]
    fn test_single_geometry() {
        let content = r#"{"type": "LineString", "coordinates": [[0, 0], [1, 1]]}"#;
        let layer = parse_str("river", content).unwrap();
        assert_eq!(layer.len(), 1);
        assert!(matches!(layer.features[0].geometry, Geometry::LineString(_)));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_str("broken", "{not json").unwrap_err();
        assert!(matches!(err, LayerError::ParseError { ref file, .. } if file == "broken"));
    }
}
