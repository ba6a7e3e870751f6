//! Emprise de danger : tampon autour de chaque détection puis union
//!
//! Chaque point est tamponné par un polygone régulier de `4 * quad_segs`
//! sommets inscrit dans le cercle de rayon donné, puis tous les tampons sont
//! fusionnés en un seul `MultiPolygon`.

use std::f64::consts::TAU;

use geo::{Area, BooleanOps, Coord, Geometry, LineString, MultiPolygon, Point, Polygon};
use maplayers::{Crs, Feature, Layer, LayerError};
use tracing::debug;

/// Tampon circulaire approché autour d'un point
pub fn buffer_point(center: Point, radius: f64, quad_segs: u32) -> Polygon {
    let n = 4 * quad_segs.max(1) as usize;

    let ring: Vec<Coord> = (0..=n)
        .map(|i| {
            // Le dernier sommet referme l'anneau sur le premier
            let angle = TAU * (i % n) as f64 / n as f64;
            Coord {
                x: center.x() + radius * angle.cos(),
                y: center.y() + radius * angle.sin(),
            }
        })
        .collect();

    Polygon::new(LineString::new(ring), vec![])
}

/// Union de polygones par réduction deux à deux.
///
/// Une liste vide donne un `MultiPolygon` vide.
pub fn union_all(polygons: Vec<Polygon>) -> MultiPolygon {
    let mut parts: Vec<MultiPolygon> = polygons
        .into_iter()
        .map(|p| MultiPolygon::new(vec![p]))
        .collect();

    while parts.len() > 1 {
        let mut next = Vec::with_capacity(parts.len().div_ceil(2));
        let mut iter = parts.into_iter();
        while let Some(a) = iter.next() {
            match iter.next() {
                Some(b) => next.push(a.union(&b)),
                None => next.push(a),
            }
        }
        parts = next;
    }

    parts.pop().unwrap_or_else(|| MultiPolygon::new(vec![]))
}

/// Tamponne toutes les géométries ponctuelles et les fusionne.
///
/// # Errors
///
/// `UnsupportedGeometry` si une feature n'est ni un `Point` ni un `MultiPoint`.
pub fn hazard_extent(
    features: &[Feature],
    radius: f64,
    quad_segs: u32,
) -> Result<MultiPolygon, LayerError> {
    let mut buffers = Vec::with_capacity(features.len());

    for feature in features {
        match &feature.geometry {
            Geometry::Point(p) => buffers.push(buffer_point(*p, radius, quad_segs)),
            Geometry::MultiPoint(mp) => {
                buffers.extend(mp.iter().map(|p| buffer_point(*p, radius, quad_segs)))
            }
            other => {
                return Err(LayerError::unsupported_geometry(
                    feature.id.clone(),
                    format!("expected a point, got {}", geometry_name(other)),
                ))
            }
        }
    }

    let count = buffers.len();
    let extent = union_all(buffers);

    debug!(
        points = count,
        parts = extent.0.len(),
        area = extent.unsigned_area(),
        "Hazard extent computed"
    );

    Ok(extent)
}

/// Couche d'une seule feature, sans attribut, portant l'emprise
pub fn hazard_layer(extent: MultiPolygon, crs: Crs) -> Layer {
    Layer::new("hazard", crs, vec![Feature::new("hazard", extent)])
}

fn geometry_name(geometry: &Geometry) -> &'static str {
    match geometry {
        Geometry::LineString(_) | Geometry::Line(_) => "LineString",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => "Polygon",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        _ => "Point",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, MultiPoint};

    fn fire(id: &str, x: f64, y: f64) -> Feature {
        Feature::new(id, Point::new(x, y)).with_property("ACQDATENEW", "25/07/2023")
    }

    /// Aire exacte du polygone régulier inscrit
    fn ngon_area(radius: f64, quad_segs: u32) -> f64 {
        let n = (4 * quad_segs) as f64;
        0.5 * n * radius * radius * (TAU / n).sin()
    }

    #[test]
    fn test_buffer_point() {
        let poly = buffer_point(Point::new(100.0, 200.0), 10.0, 16);

        // 64 sommets + fermeture
        assert_eq!(poly.exterior().0.len(), 65);
        assert_eq!(poly.exterior().0.first(), poly.exterior().0.last());
        assert!((poly.unsigned_area() - ngon_area(10.0, 16)).abs() < 1e-6);
        assert!(poly.unsigned_area() < std::f64::consts::PI * 100.0);
    }

    #[test]
    fn test_empty_input_gives_empty_geometry() {
        let extent = hazard_extent(&[], 1000.0, 16).unwrap();
        assert!(extent.0.is_empty());
        assert_eq!(extent.unsigned_area(), 0.0);
    }

    #[test]
    fn test_overlapping_buffers_merge() {
        let fires = vec![fire("a", 0.0, 0.0), fire("b", 500.0, 0.0), fire("c", 250.0, 300.0)];
        let extent = hazard_extent(&fires, 1000.0, 16).unwrap();

        assert_eq!(extent.0.len(), 1);
        let sum = 3.0 * ngon_area(1000.0, 16);
        assert!(extent.unsigned_area() < sum);
        assert!(extent.unsigned_area() > ngon_area(1000.0, 16));
    }

    #[test]
    fn test_disjoint_buffers_stay_separate() {
        let fires = vec![fire("a", 0.0, 0.0), fire("b", 10000.0, 0.0)];
        let extent = hazard_extent(&fires, 1000.0, 8).unwrap();

        assert_eq!(extent.0.len(), 2);
        let sum = 2.0 * ngon_area(1000.0, 8);
        assert!(extent.unsigned_area() <= sum + 1e-6);
        assert!((extent.unsigned_area() - sum).abs() / sum < 1e-6);
    }

    #[test]
    fn test_multipoint_is_buffered() {
        let feature = Feature::new(
            "mp",
            MultiPoint::new(vec![Point::new(0.0, 0.0), Point::new(50000.0, 0.0)]),
        );
        let extent = hazard_extent(&[feature], 100.0, 4).unwrap();
        assert_eq!(extent.0.len(), 2);
    }

    #[test]
    fn test_non_point_geometry_rejected() {
        let feature = Feature::new("road", LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]));
        let err = hazard_extent(&[feature], 100.0, 4).unwrap_err();
        assert!(matches!(err, LayerError::UnsupportedGeometry { ref feature, .. } if feature == "road"));
    }

    #[test]
    fn test_union_all_many() {
        let polygons: Vec<Polygon> = (0..9)
            .map(|i| buffer_point(Point::new(i as f64 * 150.0, 0.0), 100.0, 8))
            .collect();
        let merged = union_all(polygons);
        assert_eq!(merged.0.len(), 1);
        assert!(merged.unsigned_area() < 9.0 * ngon_area(100.0, 8));
    }

    #[test]
    fn test_hazard_layer_has_one_attributeless_feature() {
        let layer = hazard_layer(MultiPolygon::new(vec![]), Crs::utm_north(35));
        assert_eq!(layer.len(), 1);
        assert!(layer.features[0].properties.is_empty());
    }
}
