//! Ellipsoïde de référence

/// Ellipsoïde WGS84
pub struct WGS84;

impl WGS84 {
    /// Demi-grand axe (rayon équatorial) en mètres
    pub const A: f64 = 6378137.0;

    /// Aplatissement
    pub const F: f64 = 1.0 / 298.257223563;

    /// Première excentricité au carré
    pub const E2: f64 = 2.0 * Self::F - Self::F * Self::F;

    /// Deuxième excentricité au carré
    pub const EP2: f64 = Self::E2 / (1.0 - Self::E2);
}

/// Facteur d'échelle sur le méridien central UTM
pub const UTM_K0: f64 = 0.9996;

/// False easting UTM
pub const UTM_FALSE_EASTING: f64 = 500000.0;

/// False northing UTM hémisphère sud
pub const UTM_FALSE_NORTHING_SOUTH: f64 = 10000000.0;
