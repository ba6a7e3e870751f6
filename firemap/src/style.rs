//! Styles catégoriels et résolution des catégories d'une couche
//!
//! Une table de styles est une liste ordonnée `{valeur, style}` : l'ordre de
//! déclaration est l'ordre de dessin à l'intérieur de la couche, puis l'ordre
//! des entrées de légende.

use serde::{Deserialize, Serialize};

use maplayers::{Feature, Layer, LayerError};

use crate::color::Color;
use crate::legend::{GeometryKind, Symbolize};

/// Symboles ponctuels (les alias sont les codes matplotlib)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    #[default]
    #[serde(alias = "o")]
    Circle,
    #[serde(alias = "s")]
    Square,
    #[serde(alias = "*")]
    Star,
    #[serde(alias = "^")]
    Triangle,
    #[serde(alias = "D")]
    Diamond,
}

fn default_alpha() -> f64 {
    1.0
}

/// Style d'un semis de points
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PointStyle {
    pub color: Color,

    #[serde(default)]
    pub marker: Marker,

    /// Taille du symbole en points typographiques
    pub size: f64,

    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

/// Style d'une ligne
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LineStyle {
    pub color: Color,

    /// Épaisseur en points typographiques
    pub width: f64,

    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

/// Style d'une surface
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AreaStyle {
    pub fill: Color,

    #[serde(default)]
    pub edge: Option<Color>,

    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

/// Une entrée de table : valeur d'attribut → style
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CategoryStyle<S> {
    pub value: String,

    #[serde(flatten)]
    pub style: S,
}

/// Table de styles catégoriels d'une couche
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StyleTable<S> {
    /// Champ catégoriel lu sur chaque feature
    pub field: String,

    /// Entrées dans l'ordre de dessin
    pub categories: Vec<CategoryStyle<S>>,
}

/// Style unique appliqué à toute une couche, avec son libellé de légende
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LabelledStyle<S> {
    pub label: String,

    #[serde(flatten)]
    pub style: S,
}

/// Features d'une catégorie, prêtes à être dessinées
#[derive(Debug)]
pub struct CategoryGroup<'a, S> {
    /// Valeur de la catégorie (ou libellé pour un style unique)
    pub value: &'a str,
    pub style: &'a S,
    pub features: Vec<&'a Feature>,
}

impl<S> CategoryGroup<'_, S> {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Résultat de la résolution d'une couche contre sa table
#[derive(Debug)]
pub struct Resolution<'a, S> {
    /// Un groupe par entrée de table, dans l'ordre de la table (éventuellement vide)
    pub groups: Vec<CategoryGroup<'a, S>>,

    /// Features dont la catégorie n'a pas d'entrée (jamais dessinées)
    pub uncategorized: usize,
}

impl<S> Resolution<'_, S> {
    /// Nombre de features qui seront dessinées
    pub fn drawn(&self) -> usize {
        self.groups.iter().map(|g| g.features.len()).sum()
    }
}

/// Répartit les features d'une couche selon la table de styles.
///
/// # Errors
///
/// Échoue dès qu'une feature n'a pas le champ catégoriel (ou une valeur non
/// scalaire) : la couche ne correspond pas à la table. Une géométrie que le
/// style ne sait pas dessiner (polygone avec un style ponctuel...) est aussi
/// fatale.
pub fn resolve<'a, S: Symbolize>(
    layer: &'a Layer,
    table: &'a StyleTable<S>,
) -> Result<Resolution<'a, S>, LayerError> {
    check_geometries::<S>(layer)?;

    let categories = layer
        .features
        .iter()
        .map(|f| layer.category(f, &table.field))
        .collect::<Result<Vec<_>, _>>()?;

    let groups: Vec<CategoryGroup<'a, S>> = table
        .categories
        .iter()
        .map(|entry| CategoryGroup {
            value: entry.value.as_str(),
            style: &entry.style,
            features: layer
                .features
                .iter()
                .zip(&categories)
                .filter(|(_, category)| **category == *entry.value)
                .map(|(feature, _)| feature)
                .collect(),
        })
        .collect();

    let uncategorized = categories
        .iter()
        .filter(|c| !table.categories.iter().any(|e| **c == *e.value))
        .count();

    Ok(Resolution {
        groups,
        uncategorized,
    })
}

/// Groupe unique pour une couche à style unique (rivières, lacs)
pub fn resolve_single<'a, S: Symbolize>(
    layer: &'a Layer,
    style: &'a LabelledStyle<S>,
) -> Result<Resolution<'a, S>, LayerError> {
    check_geometries::<S>(layer)?;

    Ok(Resolution {
        groups: vec![CategoryGroup {
            value: style.label.as_str(),
            style: &style.style,
            features: layer.features.iter().collect(),
        }],
        uncategorized: 0,
    })
}

fn check_geometries<S: Symbolize>(layer: &Layer) -> Result<(), LayerError> {
    match layer.features.iter().find(|f| !S::KIND.accepts(&f.geometry)) {
        Some(feature) => Err(LayerError::unsupported_geometry(
            feature.id.clone(),
            format!(
                "layer {} is drawn as {}, got {}",
                layer.name,
                S::KIND.name(),
                GeometryKind::of(&feature.geometry).map_or("a geometry collection", |k| k.name())
            ),
        )),
        None => Ok(()),
    }
}
