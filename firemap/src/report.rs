//! Rapport de rendu
//!
//! Collecte, couche par couche, ce qui a été dessiné et ce qui a été omis
//! (catégories absentes de la table, groupes vides), puis l'affiche ou le
//! sauvegarde en JSON.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::layers::LayerKind;

/// Statut global du rendu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenderStatus {
    /// Toutes les features ont été dessinées
    Success,
    /// Carte produite, mais des features ou catégories ont été omises
    Partial,
}

/// Avertissement non bloquant
#[derive(Debug, Clone, Serialize)]
pub struct RenderWarning {
    pub layer: LayerKind,
    pub message: String,
}

/// Effectif d'une catégorie
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub features: usize,
}

/// Statistiques d'une couche
#[derive(Debug, Clone, Default, Serialize)]
pub struct LayerStats {
    /// Features chargées
    pub features: usize,
    /// Features dessinées
    pub drawn: usize,
    /// Features dont la catégorie n'est pas dans la table
    pub uncategorized: usize,
    /// Effectifs dans l'ordre de la table
    pub categories: Vec<CategoryCount>,
}

/// Emprise de danger
#[derive(Debug, Clone, Default, Serialize)]
pub struct HazardStats {
    /// Points tamponnés
    pub points: usize,
    /// Polygones disjoints après union
    pub parts: usize,
    /// Surface en km²
    pub area_km2: f64,
}

/// Rapport complet
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub title: String,
    pub duration_secs: f64,
    pub status: RenderStatus,

    /// Éléments graphiques émis
    pub draw_calls: usize,

    pub layers: HashMap<LayerKind, LayerStats>,
    pub legend: Vec<String>,
    pub hazard: Option<HazardStats>,
    pub warnings: Vec<RenderWarning>,
}

impl Default for RenderReport {
    fn default() -> Self {
        Self {
            title: String::new(),
            duration_secs: 0.0,
            status: RenderStatus::Success,
            draw_calls: 0,
            layers: HashMap::new(),
            legend: Vec::new(),
            hazard: None,
            warnings: Vec::new(),
        }
    }
}

impl RenderReport {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    /// Enregistre les statistiques d'une couche.
    ///
    /// Les features non catégorisées et les catégories vides produisent un
    /// avertissement.
    pub fn record_layer(&mut self, kind: LayerKind, stats: LayerStats) {
        if stats.uncategorized > 0 {
            self.warn(
                kind,
                format!(
                    "{} feature(s) with a category missing from the style table were not drawn",
                    stats.uncategorized
                ),
            );
        }
        let empty: Vec<&str> = stats
            .categories
            .iter()
            .filter(|c| c.features == 0)
            .map(|c| c.value.as_str())
            .collect();
        if !empty.is_empty() && stats.categories.len() > 1 {
            self.warn(kind, format!("no feature for categories: {}", empty.join(", ")));
        }
        self.layers.insert(kind, stats);
    }

    pub fn record_hazard(&mut self, stats: HazardStats) {
        if stats.points == 0 {
            self.warn(LayerKind::Hazard, "no fire point, hazard extent is empty".to_string());
        }
        self.hazard = Some(stats);
    }

    pub fn warn(&mut self, layer: LayerKind, message: String) {
        self.warnings.push(RenderWarning { layer, message });
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final
    pub fn finalize(&mut self) {
        let omitted = self.layers.values().any(|s| s.uncategorized > 0);
        self.status = if omitted {
            RenderStatus::Partial
        } else {
            RenderStatus::Success
        };
    }

    /// Nombre total de features dessinées
    pub fn total_drawn(&self) -> usize {
        self.layers.values().map(|s| s.drawn).sum()
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("RENDER REPORT - {}", self.title);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);
        println!("Draw calls: {}", self.draw_calls);

        if !self.layers.is_empty() {
            println!("\n--- BY LAYER ---");
            let mut layers: Vec<_> = self.layers.iter().collect();
            layers.sort_by_key(|(kind, _)| **kind);
            for (kind, stats) in layers {
                println!(
                    "  {}: {} features, {} drawn, {} uncategorized",
                    kind.name(),
                    stats.features,
                    stats.drawn,
                    stats.uncategorized
                );
                for c in stats.categories.iter().filter(|c| c.features > 0) {
                    println!("    {}: {}", c.value, c.features);
                }
            }
        }

        if let Some(hazard) = &self.hazard {
            println!("\n--- HAZARD ---");
            println!(
                "  {} points, {} parts, {:.2} km²",
                hazard.points, hazard.parts, hazard.area_km2
            );
        }

        println!("\n--- LEGEND ({}) ---", self.legend.len());
        for label in &self.legend {
            println!("  {}", label);
        }

        if !self.warnings.is_empty() {
            println!("\n--- WARNINGS ({}) ---", self.warnings.len());
            for w in self.warnings.iter().take(10) {
                println!("  [{}] {}", w.layer.name(), w.message);
            }
            if self.warnings.len() > 10 {
                println!("  ... and {} more", self.warnings.len() - 10);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .context(format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {} features drawn, {} legend entries, {} warnings",
            self.title,
            self.total_drawn(),
            self.legend.len(),
            self.warnings.len()
        )
    }
}
