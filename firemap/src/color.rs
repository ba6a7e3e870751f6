//! Couleurs nommées (CSS / matplotlib) et hexadécimales

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Couleur RGB opaque ; la transparence est portée par les styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown color: {0}")]
pub struct UnknownColor(pub String);

/// Noms reconnus. Les lettres seules sont les abréviations matplotlib.
const NAMED: &[(&str, (u8, u8, u8))] = &[
    ("k", (0, 0, 0)),
    ("w", (255, 255, 255)),
    ("r", (255, 0, 0)),
    ("g", (0, 128, 0)),
    ("b", (0, 0, 255)),
    ("c", (0, 191, 191)),
    ("m", (191, 0, 191)),
    ("y", (191, 191, 0)),
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("darkred", (139, 0, 0)),
    ("firebrick", (178, 34, 34)),
    ("orange", (255, 165, 0)),
    ("darkorange", (255, 140, 0)),
    ("yellow", (255, 255, 0)),
    ("gold", (255, 215, 0)),
    ("deeppink", (255, 20, 147)),
    ("magenta", (255, 0, 255)),
    ("purple", (128, 0, 128)),
    ("brown", (165, 42, 42)),
    ("khaki", (240, 230, 140)),
    ("green", (0, 128, 0)),
    ("darkgreen", (0, 100, 0)),
    ("blue", (0, 0, 255)),
    ("darkblue", (0, 0, 139)),
    ("navy", (0, 0, 128)),
    ("lightblue", (173, 216, 230)),
    ("cyan", (0, 255, 255)),
    ("grey", (128, 128, 128)),
    ("gray", (128, 128, 128)),
    ("dimgrey", (105, 105, 105)),
    ("dimgray", (105, 105, 105)),
    ("lightgrey", (211, 211, 211)),
    ("lightgray", (211, 211, 211)),
];

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Forme `#rrggbb` utilisée dans le SVG
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();

        if let Some(hex) = name.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| UnknownColor(s.to_string()));
        }

        let lower = name.to_ascii_lowercase();
        // Les abréviations matplotlib sont sensibles à la casse
        let key = if lower.len() == 1 { name } else { lower.as_str() };

        NAMED
            .iter()
            .find(|(n, _)| *n == key)
            .map(|&(_, (r, g, b))| Color::rgb(r, g, b))
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }

    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };

    let r = u8::from_str_radix(&expanded[0..2], 16).ok()?;
    let g = u8::from_str_radix(&expanded[2..4], 16).ok()?;
    let b = u8::from_str_radix(&expanded[4..6], 16).ok()?;

    Some(Color::rgb(r, g, b))
}

impl TryFrom<String> for Color {
    type Error = UnknownColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!("k".parse::<Color>().unwrap(), Color::BLACK);
        assert_eq!("w".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("DimGrey".parse::<Color>().unwrap(), Color::rgb(105, 105, 105));
        assert_eq!("darkorange".parse::<Color>().unwrap().hex(), "#ff8c00");
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!("#ff0000".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
        assert_eq!("#0f0".parse::<Color>().unwrap(), Color::rgb(0, 255, 0));
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn test_non_ascii_hex_rejected() {
        // 6 octets mais 5 caractères
        assert_eq!(
            "#aé123".parse::<Color>(),
            Err(UnknownColor("#aé123".to_string()))
        );
        assert!(serde_json::from_str::<Color>(r##""#aé123""##).is_err());
    }

    #[test]
    fn test_unknown_color() {
        assert_eq!(
            "burntsienna".parse::<Color>(),
            Err(UnknownColor("burntsienna".to_string()))
        );
        // "K" n'est pas une abréviation matplotlib
        assert!("K".parse::<Color>().is_err());
    }

    #[test]
    fn test_serde_roundtrip_as_hex() {
        let color: Color = serde_json::from_str(r#""khaki""#).unwrap();
        assert_eq!(serde_json::to_string(&color).unwrap(), r##""#f0e68c""##);
        assert!(serde_json::from_str::<Color>(r#""nope""#).is_err());
    }
}
