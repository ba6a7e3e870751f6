//! Export d'une couche en GeoJSON avec geozero (écriture en flux)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geozero::geojson::GeoJsonWriter;
use geozero::GeozeroGeometry;
use tracing::info;

use maplayers::{Feature, Layer};

/// Exporte les features d'une couche en FeatureCollection, avec le membre
/// `crs` nommant le CRS de la couche
pub fn export_layer(layer: &Layer, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    write_layer(&mut writer, layer)?;
    writer.flush()?;

    info!(
        layer = %layer.name,
        features = layer.len(),
        output = %output_path.display(),
        "GeoJSON written"
    );
    Ok(())
}

/// Écrit la FeatureCollection dans un flux quelconque
pub fn write_layer<W: Write>(writer: &mut W, layer: &Layer) -> Result<()> {
    write!(
        writer,
        r#"{{"type":"FeatureCollection","name":{},"crs":{{"type":"name","properties":{{"name":"{}"}}}},"features":["#,
        serde_json::to_string(&layer.name)?,
        layer.crs.urn()
    )?;

    for (i, feature) in layer.features.iter().enumerate() {
        if i > 0 {
            write!(writer, ",")?;
        }
        write_feature(writer, feature)?;
    }

    write!(writer, "]}}")?;
    Ok(())
}

fn write_feature<W: Write>(writer: &mut W, feature: &Feature) -> Result<()> {
    write!(
        writer,
        r#"{{"type":"Feature","id":{},"geometry":"#,
        serde_json::to_string(&feature.id)?
    )?;

    let mut geom_buf = Vec::new();
    let mut geom_writer = GeoJsonWriter::new(&mut geom_buf);
    feature
        .geometry
        .process_geom(&mut geom_writer)
        .context(format!("Failed to encode geometry of feature {}", feature.id))?;
    writer.write_all(&geom_buf)?;

    // Clés triées pour une sortie stable
    let properties: std::collections::BTreeMap<_, _> = feature.properties.iter().collect();
    write!(writer, r#","properties":{}}}"#, serde_json::to_string(&properties)?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hazard::{hazard_extent, hazard_layer};
    use geo::Point;
    use maplayers::Crs;

    #[test]
    fn test_write_feature() {
        let feature = Feature::new("fire \"1\"", Point::new(1.0, 2.0)).with_property("ACQDATENEW", "24/07/2023");

        let mut buffer = Vec::new();
        write_feature(&mut buffer, &feature).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(json["id"], "fire \"1\"");
        assert_eq!(json["geometry"]["type"], "Point");
        assert_eq!(json["properties"]["ACQDATENEW"], "24/07/2023");
    }

    #[test]
    fn test_export_hazard_layer() {
        let fires = vec![
            Feature::new("a", Point::new(600_000.0, 4_000_000.0)),
            Feature::new("b", Point::new(600_500.0, 4_000_000.0)),
        ];
        let extent = hazard_extent(&fires, 1000.0, 16).unwrap();
        let layer = hazard_layer(extent, Crs::utm_north(35));

        let dir = tempfile::tempdir().unwrap();
        let output_path = dir.path().join("hazard.geojson");
        export_layer(&layer, &output_path).unwrap();

        let content = std::fs::read_to_string(&output_path).unwrap();
        assert!(content.contains("EPSG::32635"));

        let parsed = maplayers::load(&output_path).unwrap();
        assert_eq!(parsed.crs, Crs::utm_north(35));
        assert_eq!(parsed.len(), 1);
        assert!(matches!(parsed.features[0].geometry, geo::Geometry::MultiPolygon(_)));
        assert!(parsed.features[0].properties.is_empty());
    }
}
