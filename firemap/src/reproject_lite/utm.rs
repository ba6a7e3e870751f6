//! Projection UTM (Universal Transverse Mercator) sur WGS84
//!
//! Séries de Snyder (USGS Professional Paper 1395), précision sub-métrique
//! dans la zone et ses abords immédiats (Rhodes est en zone 35N, à ~1.2° du
//! méridien central).

use super::ellipsoid::{UTM_FALSE_EASTING, UTM_FALSE_NORTHING_SOUTH, UTM_K0, WGS84};
use super::Geographic;
use anyhow::{bail, Result};

/// Longitude du méridien central d'une zone, en radians
fn central_meridian(zone: u32) -> f64 {
    ((zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians()
}

fn check_zone(zone: u32) -> Result<()> {
    if !(1..=60).contains(&zone) {
        bail!("Zone UTM invalide: {}", zone);
    }
    Ok(())
}

/// Convertit des coordonnées géographiques WGS84 vers UTM
pub fn geographic_to_utm(geo: Geographic, zone: u32, south: bool) -> Result<(f64, f64)> {
    check_zone(zone)?;

    let a = WGS84::A;
    let e2 = WGS84::E2;
    let ep2 = WGS84::EP2;
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    let phi = geo.lat;
    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = phi.tan();

    let n = a / (1.0 - e2 * sin_phi.powi(2)).sqrt();
    let t = tan_phi.powi(2);
    let c = ep2 * cos_phi.powi(2);
    let big_a = cos_phi * (geo.lon - central_meridian(zone));

    // Longueur de l'arc de méridien
    let m = a
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin());

    let x = UTM_K0
        * n
        * (big_a
            + (1.0 - t + c) * big_a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t.powi(2) + 72.0 * c - 58.0 * ep2) * big_a.powi(5) / 120.0)
        + UTM_FALSE_EASTING;

    let y = UTM_K0
        * (m + n
            * tan_phi
            * (big_a.powi(2) / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c.powi(2)) * big_a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t.powi(2) + 600.0 * c - 330.0 * ep2) * big_a.powi(6)
                    / 720.0));

    let y = if south { y + UTM_FALSE_NORTHING_SOUTH } else { y };

    Ok((x, y))
}

/// Convertit UTM vers coordonnées géographiques WGS84
pub fn utm_to_geographic(x: f64, y: f64, zone: u32, south: bool) -> Result<Geographic> {
    check_zone(zone)?;

    let a = WGS84::A;
    let e2 = WGS84::E2;
    let ep2 = WGS84::EP2;

    let x = x - UTM_FALSE_EASTING;
    let y = if south { y - UTM_FALSE_NORTHING_SOUTH } else { y };

    // Latitude du pied de la perpendiculaire
    let m = y / UTM_K0;
    let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));
    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let (sin_phi1, cos_phi1) = phi1.sin_cos();
    let tan_phi1 = phi1.tan();

    let n1 = a / (1.0 - e2 * sin_phi1.powi(2)).sqrt();
    let t1 = tan_phi1.powi(2);
    let c1 = ep2 * cos_phi1.powi(2);
    let r1 = a * (1.0 - e2) / (1.0 - e2 * sin_phi1.powi(2)).powf(1.5);
    let d = x / (n1 * UTM_K0);

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d.powi(2) / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2)
                    - 252.0 * ep2
                    - 3.0 * c1.powi(2))
                    * d.powi(6)
                    / 720.0);

    let lon = central_meridian(zone)
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
                * d.powi(5)
                / 120.0)
            / cos_phi1;

    Ok(Geographic::new(lon, lat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rhodes_town() {
        // Ville de Rhodes : 28.2225°E, 36.4341°N
        let (x, y) = geographic_to_utm(Geographic::from_degrees(28.2225, 36.4341), 35, false).unwrap();

        assert!((x - 609576.5).abs() < 1.0, "x={}", x);
        assert!((y - 4032792.6).abs() < 1.0, "y={}", y);
    }

    #[test]
    fn test_central_meridian_on_equator() {
        let (x, y) = geographic_to_utm(Geographic::from_degrees(27.0, 0.0), 35, false).unwrap();
        assert!((x - 500000.0).abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_inverse_lindos() {
        // Lindos approximativement
        let geo = utm_to_geographic(597731.0, 3994665.0, 35, false).unwrap();
        let (lon, lat) = geo.to_degrees();

        assert!((lon - 28.0856).abs() < 1e-4, "lon={}", lon);
        assert!((lat - 36.0917).abs() < 1e-4, "lat={}", lat);
    }

    #[test]
    fn test_south_hemisphere() {
        // Saint-Denis (Réunion), UTM 40S
        let geo = utm_to_geographic(338000.0, 7691000.0, 40, true).unwrap();
        let (lon, lat) = geo.to_degrees();
        assert!((lon - 55.45).abs() < 0.2, "lon={}", lon);
        assert!((lat - (-20.88)).abs() < 0.2, "lat={}", lat);

        let (x, y) = geographic_to_utm(geo, 40, true).unwrap();
        assert!((x - 338000.0).abs() < 0.5, "x={}", x);
        assert!((y - 7691000.0).abs() < 0.5, "y={}", y);
    }

    #[test]
    fn test_invalid_zone() {
        assert!(geographic_to_utm(Geographic::from_degrees(0.0, 0.0), 0, false).is_err());
        assert!(utm_to_geographic(500000.0, 0.0, 61, false).is_err());
    }
}
