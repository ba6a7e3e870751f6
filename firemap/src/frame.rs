//! Cadrage de la carte : emprise visible et échelle graphique

use anyhow::{bail, Result};
use geo::{Coord, Rect};
use maplayers::Layer;
use serde::Serialize;

use crate::color::Color;
use crate::config::ScaleBarConfig;

/// Fenêtre visible en coordonnées carte
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Extent {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }

    /// Agrandit l'emprise de `margin` de chaque côté
    pub fn expand(&self, margin: f64) -> Self {
        Self::new(
            self.xmin - margin,
            self.ymin - margin,
            self.xmax + margin,
            self.ymax + margin,
        )
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Point situé aux fractions `(fx, fy)` de l'emprise
    pub fn at_fraction(&self, fx: f64, fy: f64) -> Coord {
        Coord {
            x: self.xmin + self.width() * fx,
            y: self.ymin + self.height() * fy,
        }
    }
}

/// Emprise de la couche limite agrandie de la marge.
///
/// # Errors
///
/// Une limite vide ne permet pas de cadrer la carte.
pub fn map_extent(boundary: &Layer, margin: f64) -> Result<Extent> {
    let Some(rect) = boundary.bounding_rect() else {
        bail!("Boundary layer '{}' has no geometry, cannot frame the map", boundary.name);
    };
    Ok(Extent::from_rect(rect).expand(margin))
}

/// Segment coloré de l'échelle
#[derive(Debug, Clone, PartialEq)]
pub struct BarSegment {
    pub start: Coord,
    pub end: Coord,
    pub color: Color,
}

/// Graduation et son libellé
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Position de la graduation sur la barre
    pub at: Coord,
    /// Position du libellé (sous la barre)
    pub label_at: Coord,
    pub label: String,
}

/// Géométrie de l'échelle graphique pour une emprise donnée
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBarLayout {
    /// Extrémité droite (graduation 0)
    pub anchor: Coord,
    /// Barre de fond sur toute la longueur
    pub outline: (Coord, Coord),
    /// Segments alternés, de l'ancre vers la gauche
    pub segments: Vec<BarSegment>,
    /// Graduations de la plus éloignée à l'ancre
    pub ticks: Vec<Tick>,
}

/// Calcule l'échelle pour l'emprise courante.
///
/// L'ancre est recalculée depuis l'emprise à chaque appel ; l'espacement des
/// graduations ne dépend que de la longueur des segments.
pub fn scale_bar_layout(config: &ScaleBarConfig, extent: &Extent) -> ScaleBarLayout {
    let anchor = extent.at_fraction(config.location[0], config.location[1]);
    let step = config.segment_length;
    let n = config.segments;
    let at = |k: u32| Coord {
        x: anchor.x - k as f64 * step,
        y: anchor.y,
    };

    let segments = (0..n)
        .map(|k| BarSegment {
            start: at(k),
            end: at(k + 1),
            color: config.colors[(k % 2) as usize],
        })
        .collect();

    let ticks = (0..=n)
        .rev()
        .map(|k| {
            let position = at(k);
            Tick {
                at: position,
                label_at: Coord {
                    x: position.x,
                    y: position.y - config.label_offset,
                },
                label: format!(
                    "{} {}",
                    format_distance(k as f64 * step / config.unit_divisor),
                    config.unit
                ),
            }
        })
        .collect();

    ScaleBarLayout {
        anchor,
        outline: (at(n), anchor),
        segments,
        ticks,
    }
}

/// `5` plutôt que `5.0`, `2.5` tel quel
fn format_distance(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{}", (value * 100.0).round() / 100.0)
    }
}
