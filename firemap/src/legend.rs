//! Construction de la légende
//!
//! Chaque catégorie effectivement dessinée produit exactement une entrée,
//! quel que soit le nombre de features qui partagent son style. Une
//! catégorie sans feature ne produit rien.

use std::collections::HashMap;

use geo::Geometry;
use serde::Serialize;

use crate::color::Color;
use crate::layers::LayerKind;
use crate::style::{AreaStyle, CategoryGroup, LineStyle, Marker, PointStyle};

/// Nature géométrique d'une couche, qui fixe la forme du symbole de légende
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Point,
    Line,
    Area,
}

impl GeometryKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Line => "line",
            Self::Area => "area",
        }
    }

    /// Nature d'une géométrie ; `None` pour une collection
    pub fn of(geometry: &Geometry) -> Option<Self> {
        match geometry {
            Geometry::Point(_) | Geometry::MultiPoint(_) => Some(Self::Point),
            Geometry::Line(_) | Geometry::LineString(_) | Geometry::MultiLineString(_) => {
                Some(Self::Line)
            }
            Geometry::Polygon(_)
            | Geometry::MultiPolygon(_)
            | Geometry::Rect(_)
            | Geometry::Triangle(_) => Some(Self::Area),
            Geometry::GeometryCollection(_) => None,
        }
    }

    /// Vrai si un style de cette nature dessine la géométrie
    pub fn accepts(&self, geometry: &Geometry) -> bool {
        GeometryKind::of(geometry) == Some(*self)
    }
}

/// Symbole d'une entrée de légende
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Symbol {
    Marker {
        marker: Marker,
        color: Color,
        size: f64,
        alpha: f64,
    },
    Line {
        color: Color,
        width: f64,
        alpha: f64,
    },
    Patch {
        fill: Color,
        edge: Option<Color>,
        alpha: f64,
    },
}

impl Symbol {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Marker { .. } => GeometryKind::Point,
            Self::Line { .. } => GeometryKind::Line,
            Self::Patch { .. } => GeometryKind::Area,
        }
    }
}

/// Entrée de légende : symbole et libellé
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendHandle {
    pub label: String,
    pub symbol: Symbol,
}

/// Styles capables de produire un symbole de légende
pub trait Symbolize {
    const KIND: GeometryKind;

    fn symbol(&self) -> Symbol;
}

impl Symbolize for PointStyle {
    const KIND: GeometryKind = GeometryKind::Point;

    fn symbol(&self) -> Symbol {
        Symbol::Marker {
            marker: self.marker,
            color: self.color,
            size: self.size,
            alpha: self.alpha,
        }
    }
}

impl Symbolize for LineStyle {
    const KIND: GeometryKind = GeometryKind::Line;

    fn symbol(&self) -> Symbol {
        Symbol::Line {
            color: self.color,
            width: self.width,
            alpha: self.alpha,
        }
    }
}

impl Symbolize for AreaStyle {
    const KIND: GeometryKind = GeometryKind::Area;

    fn symbol(&self) -> Symbol {
        Symbol::Patch {
            fill: self.fill,
            edge: self.edge,
            alpha: self.alpha,
        }
    }
}

/// Une entrée par groupe non vide, dans l'ordre des groupes
pub fn handles_for<S: Symbolize>(groups: &[CategoryGroup<'_, S>]) -> Vec<LegendHandle> {
    groups
        .iter()
        .filter(|g| !g.is_empty())
        .map(|g| LegendHandle {
            label: title_case(g.value),
            symbol: g.style.symbol(),
        })
        .collect()
}

/// Mise en forme "titre" : première lettre de chaque mot en majuscule, le
/// reste en minuscules. Tout caractère non alphabétique sépare les mots
/// (`primary_link` → `Primary_Link`).
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;

    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// Concatène les entrées par couche dans l'ordre donné.
///
/// Les couches absentes de `sections` ne contribuent rien.
pub fn assemble(
    sections: &HashMap<LayerKind, Vec<LegendHandle>>,
    order: &[LayerKind],
) -> Vec<LegendHandle> {
    order
        .iter()
        .filter_map(|kind| sections.get(kind))
        .flatten()
        .cloned()
        .collect()
}
