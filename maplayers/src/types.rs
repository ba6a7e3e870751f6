//! Types de données pour le crate maplayers

use std::borrow::Cow;
use std::collections::HashMap;

use geo::{BoundingRect, Coord, Geometry, Rect};
use serde_json::Value as JsonValue;

use crate::crs::Crs;
use crate::LayerError;

/// Une feature vectorielle avec sa géométrie et ses attributs
#[derive(Debug, Clone)]
pub struct Feature {
    /// Identifiant de la feature (id GeoJSON ou position dans le fichier)
    pub id: String,

    /// Géométrie (Point, LineString, Polygon ou variantes Multi*)
    pub geometry: Geometry,

    /// Attributs de la feature (clé -> valeur JSON)
    pub properties: HashMap<String, JsonValue>,
}

impl Feature {
    /// Crée une feature sans attributs
    pub fn new(id: impl Into<String>, geometry: impl Into<Geometry>) -> Self {
        Self {
            id: id.into(),
            geometry: geometry.into(),
            properties: HashMap::new(),
        }
    }

    /// Ajoute un attribut (builder)
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Valeur brute d'un attribut
    pub fn attribute(&self, field: &str) -> Option<&JsonValue> {
        self.properties.get(field)
    }
}

/// Une couche chargée depuis un fichier : nom, CRS source et features
#[derive(Debug, Clone)]
pub struct Layer {
    /// Nom de la couche (nom du fichier sans extension par défaut)
    pub name: String,

    /// Système de coordonnées des géométries
    pub crs: Crs,

    /// Features dans l'ordre du fichier
    pub features: Vec<Feature>,
}

impl Layer {
    pub fn new(name: impl Into<String>, crs: Crs, features: Vec<Feature>) -> Self {
        Self {
            name: name.into(),
            crs,
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Valeur catégorielle d'une feature pour le champ donné.
    ///
    /// Les chaînes sont renvoyées telles quelles, les nombres et booléens sous
    /// leur forme textuelle.
    ///
    /// # Errors
    ///
    /// `MissingAttribute` si le champ est absent ou null, `MismatchedAttribute`
    /// si la valeur est un objet ou un tableau.
    pub fn category<'a>(&self, feature: &'a Feature, field: &str) -> Result<Cow<'a, str>, LayerError> {
        match feature.attribute(field) {
            None | Some(JsonValue::Null) => Err(LayerError::MissingAttribute {
                layer: self.name.clone(),
                feature: feature.id.clone(),
                field: field.to_string(),
            }),
            Some(JsonValue::String(s)) => Ok(Cow::Borrowed(s.as_str())),
            Some(JsonValue::Number(n)) => Ok(Cow::Owned(n.to_string())),
            Some(JsonValue::Bool(b)) => Ok(Cow::Owned(b.to_string())),
            Some(JsonValue::Array(_)) | Some(JsonValue::Object(_)) => {
                Err(LayerError::MismatchedAttribute {
                    layer: self.name.clone(),
                    feature: feature.id.clone(),
                    field: field.to_string(),
                })
            }
        }
    }

    /// Emprise totale des géométries (`None` pour une couche vide)
    pub fn bounding_rect(&self) -> Option<Rect> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.bounding_rect())
            .reduce(|acc, r| {
                Rect::new(
                    Coord {
                        x: acc.min().x.min(r.min().x),
                        y: acc.min().y.min(r.min().y),
                    },
                    Coord {
                        x: acc.max().x.max(r.max().x),
                        y: acc.max().y.max(r.max().y),
                    },
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Point};
    use serde_json::json;

    fn layer_with(features: Vec<Feature>) -> Layer {
        Layer::new("test", Crs::WGS84, features)
    }

    #[test]
    fn test_category_string() {
        let f = Feature::new("1", Point::new(0.0, 0.0)).with_property("fclass", "city");
        let layer = layer_with(vec![f.clone()]);
        assert_eq!(layer.category(&f, "fclass").unwrap(), "city");
    }

    #[test]
    fn test_category_number_as_text() {
        let f = Feature::new("1", Point::new(0.0, 0.0)).with_property("code", json!(1201));
        let layer = layer_with(vec![f.clone()]);
        assert_eq!(layer.category(&f, "code").unwrap(), "1201");
    }

    #[test]
    fn test_category_missing_and_null() {
        let f = Feature::new("7", Point::new(0.0, 0.0)).with_property("fclass", JsonValue::Null);
        let layer = layer_with(vec![f.clone()]);

        let err = layer.category(&f, "fclass").unwrap_err();
        assert!(matches!(err, LayerError::MissingAttribute { ref feature, .. } if feature == "7"));

        let err = layer.category(&f, "other").unwrap_err();
        assert!(matches!(err, LayerError::MissingAttribute { .. }));
    }

    #[test]
    fn test_category_mismatched() {
        let f = Feature::new("1", Point::new(0.0, 0.0)).with_property("fclass", json!(["a"]));
        let layer = layer_with(vec![f.clone()]);
        assert!(matches!(
            layer.category(&f, "fclass"),
            Err(LayerError::MismatchedAttribute { .. })
        ));
    }

    #[test]
    fn test_bounding_rect() {
        let layer = layer_with(vec![
            Feature::new("a", Point::new(10.0, 20.0)),
            Feature::new(
                "b",
                LineString::from(vec![(-5.0, 0.0), (3.0, 40.0)]),
            ),
        ]);
        let rect = layer.bounding_rect().unwrap();
        assert_eq!(rect.min(), Coord { x: -5.0, y: 0.0 });
        assert_eq!(rect.max(), Coord { x: 10.0, y: 40.0 });

        assert!(layer_with(vec![]).bounding_rect().is_none());
    }
}
