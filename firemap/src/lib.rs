//! # firemap
//!
//! Carte thématique des incendies de Rhodes (24-27 juillet 2023) : couches
//! vectorielles stylées par catégorie, emprise de danger autour des
//! détections satellite, légende, échelle graphique, export PNG ou SVG.
//!
//! ## Features
//!
//! - Tables de styles catégoriels embarquées (presets `full`, `light`) ou JSON
//! - Reprojection WGS84 → UTM en pur Rust, PROJ en option (feature `reproject`)
//! - Emprise de danger (tampon + union) exportable en GeoJSON
//! - Rapport de rendu (features dessinées / omises)
//!
//! ## Usage CLI
//!
//! ```bash
//! # Carte PNG avec le preset complet
//! firemap --data-dir ./AssessmentData --output rhodes.png
//!
//! # Carte SVG sans échelle, rapport JSON
//! firemap --data-dir ./AssessmentData --output rhodes.svg --no-scale-bar --report report.json
//!
//! # Emprise de danger seule, en GeoJSON
//! firemap hazard --data-dir ./AssessmentData --output hazard.geojson
//! ```

pub mod color;
pub mod config;
pub mod export;
pub mod frame;
pub mod hazard;
pub mod layers;
pub mod legend;
pub mod render;
pub mod report;
#[cfg(feature = "reproject")]
pub mod reproject;
pub mod reproject_lite;
pub mod style;

pub use config::MapConfig;
pub use layers::{LayerKind, LayerSet};
pub use render::{render_map, OutputFormat, RenderOptions, RenderedMap};
pub use report::{RenderReport, RenderStatus};
