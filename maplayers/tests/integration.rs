//! Tests d'intégration : chargement de fichiers GeoJSON sur disque

use std::io::Write;

use geo::Geometry;
use maplayers::{Crs, LayerError};

const FIRES: &str = r#"{
    "type": "FeatureCollection",
    "crs": {"type": "name", "properties": {"name": "EPSG:32635"}},
    "features": [
        {"type": "Feature", "geometry": {"type": "Point", "coordinates": [586000.0, 3995000.0]}, "properties": {"ACQDATENEW": "24/07/2023"}},
        {"type": "Feature", "geometry": {"type": "Point", "coordinates": [586300.0, 3995200.0]}, "properties": {"ACQDATENEW": "25/07/2023"}},
        {"type": "Feature", "geometry": {"type": "Point", "coordinates": [587100.0, 3996400.0]}, "properties": {"ACQDATENEW": "25/07/2023"}}
    ]
}"#;

#[test]
fn test_load_fire_points() {
    let mut file = tempfile::Builder::new()
        .prefix("VIIRS_points")
        .suffix(".geojson")
        .tempfile()
        .unwrap();
    file.write_all(FIRES.as_bytes()).unwrap();

    let layer = maplayers::load(file.path()).unwrap();

    assert!(layer.name.starts_with("VIIRS_points"));
    assert_eq!(layer.crs, Crs::utm_north(35));
    assert_eq!(layer.len(), 3);
    assert!(layer
        .features
        .iter()
        .all(|f| matches!(f.geometry, Geometry::Point(_))));

    let dates: Vec<String> = layer
        .features
        .iter()
        .map(|f| layer.category(f, "ACQDATENEW").unwrap().into_owned())
        .collect();
    assert_eq!(dates, vec!["24/07/2023", "25/07/2023", "25/07/2023"]);

    // Le champ attendu manque : erreur fatale au premier accès
    assert!(matches!(
        layer.category(&layer.features[0], "ACQ_DATE"),
        Err(LayerError::MissingAttribute { .. })
    ));
}

#[test]
fn test_load_named() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Lake.geojson");
    std::fs::write(
        &path,
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}, "properties": {}}
        ]}"#,
    )
    .unwrap();

    let layer = maplayers::load_named("lakes", &path).unwrap();
    assert_eq!(layer.name, "lakes");
    assert_eq!(layer.crs, Crs::WGS84);
    assert_eq!(layer.len(), 1);
}

#[test]
fn test_missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let result = maplayers::load(&dir.path().join("River.geojson"));
    assert!(matches!(result, Err(LayerError::MissingFile(_))));
}
