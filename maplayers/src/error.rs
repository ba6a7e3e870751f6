//! Types d'erreurs pour le crate maplayers

use thiserror::Error;

/// Erreurs pouvant survenir lors du chargement d'une couche
#[derive(Debug, Error)]
pub enum LayerError {
    /// Erreur d'I/O lors de la lecture du fichier
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fichier de couche absent
    #[error("Missing required file: {0}")]
    MissingFile(String),

    /// Erreur de parsing d'un fichier
    #[error("Parse error in {file}: {reason}")]
    ParseError { file: String, reason: String },

    /// Attribut absent (ou null) sur une feature
    #[error("Missing attribute '{field}' on feature {feature} of layer {layer}")]
    MissingAttribute {
        layer: String,
        feature: String,
        field: String,
    },

    /// Attribut présent mais non scalaire (objet ou tableau)
    #[error("Attribute '{field}' on feature {feature} of layer {layer} is not a scalar value")]
    MismatchedAttribute {
        layer: String,
        feature: String,
        field: String,
    },

    /// Géométrie non supportée pour l'opération demandée
    #[error("Unsupported geometry for {feature}: {reason}")]
    UnsupportedGeometry { feature: String, reason: String },

    /// Système de coordonnées non reconnu
    #[error("Unknown CRS: {0}")]
    UnknownCrs(String),
}

impl LayerError {
    /// Crée une erreur de parsing avec contexte
    pub fn parse_error(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ParseError {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur de géométrie non supportée
    pub fn unsupported_geometry(feature: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedGeometry {
            feature: feature.into(),
            reason: reason.into(),
        }
    }
}
