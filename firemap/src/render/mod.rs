//! Composition de la carte
//!
//! Les couches sont dessinées dans l'ordre `DRAW_ORDER`, chaque couche dans
//! l'ordre de sa table de styles. La légende est assemblée dans l'ordre
//! `LEGEND_ORDER` à partir des entrées collectées pendant le dessin.

pub mod canvas;
pub mod raster;

use std::collections::HashMap;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use geo::{Area, MultiPolygon};
use maplayers::{Crs, Layer};
use tracing::{debug, info};

use crate::color::Color;
use crate::config::{MapConfig, ScaleBarConfig};
use crate::frame::{map_extent, scale_bar_layout, Extent};
use crate::hazard::{hazard_extent, hazard_layer};
use crate::layers::{LayerKind, LayerSet, DRAW_ORDER, LEGEND_ORDER};
use crate::legend::{assemble, handles_for, LegendHandle, Symbol};
use crate::report::{CategoryCount, HazardStats, LayerStats, RenderReport};
use crate::style::{
    resolve, resolve_single, AreaStyle, CategoryGroup, LabelledStyle, LineStyle, PointStyle,
    Resolution,
};

pub use canvas::{Canvas, Paint, PixelRect, TextAnchor, Viewport};
pub use raster::{rasterize, write_output, OutputFormat};

/// Options de rendu venant de la ligne de commande
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Dessiner l'échelle graphique si la configuration en définit une
    pub scale_bar: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { scale_bar: true }
    }
}

/// Carte composée, prête à être écrite
#[derive(Debug)]
pub struct RenderedMap {
    pub svg: String,
    pub width: u32,
    pub height: u32,
    pub extent: Extent,
    pub legend: Vec<LegendHandle>,
    pub hazard: MultiPolygon,
    pub report: RenderReport,
}

/// Compose la carte complète.
///
/// Les couches doivent déjà être dans le CRS de la carte. Rien n'est écrit
/// sur disque : en cas d'erreur aucune image n'est produite.
pub fn render_map(
    config: &MapConfig,
    layers: &LayerSet,
    options: &RenderOptions,
) -> Result<RenderedMap> {
    let start = Instant::now();
    let crs = Crs::new(config.crs);
    for layer in layers.iter() {
        if layer.crs != crs {
            bail!(
                "Layer '{}' is in {}, expected {} (reproject first)",
                layer.name,
                layer.crs,
                crs
            );
        }
    }

    let extent = map_extent(&layers.boundary, config.extent.margin)?;
    let (width, height) = config.page.pixel_size();
    let viewport = Viewport::fit(extent, axes_rect(config, width, height));
    debug!(?extent, scale = viewport.scale(), "Map framed");

    // Résolution des catégories (erreur fatale avant tout dessin)
    let settlements = resolve(&layers.settlements, &config.settlements)
        .context("Failed to resolve settlement categories")?;
    let roads = resolve(&layers.roads, &config.roads).context("Failed to resolve road categories")?;
    let fires = resolve(&layers.fires, &config.fires).context("Failed to resolve fire categories")?;
    let rivers =
        resolve_single(&layers.rivers, &config.rivers).context("Failed to resolve river layer")?;
    let lakes = resolve_single(&layers.lakes, &config.lakes).context("Failed to resolve lake layer")?;

    let mut report = RenderReport::new(&config.title);
    report.record_layer(LayerKind::Settlements, layer_stats(&layers.settlements, &settlements));
    report.record_layer(LayerKind::Roads, layer_stats(&layers.roads, &roads));
    report.record_layer(LayerKind::Fires, layer_stats(&layers.fires, &fires));
    report.record_layer(LayerKind::Rivers, layer_stats(&layers.rivers, &rivers));
    report.record_layer(LayerKind::Lakes, layer_stats(&layers.lakes, &lakes));

    // Emprise de danger
    let (hazard_polygon, hazard_style) = match &config.hazard {
        Some(h) => {
            let polygon = hazard_extent(&layers.fires.features, h.radius, h.quad_segs)
                .context("Failed to derive hazard extent")?;
            report.record_hazard(HazardStats {
                points: fire_point_count(&layers.fires),
                parts: polygon.0.len(),
                area_km2: polygon.unsigned_area() / 1e6,
            });
            let style = LabelledStyle {
                label: h.label.clone(),
                style: h.style.clone(),
            };
            (polygon, Some(style))
        }
        None => (MultiPolygon::new(vec![]), None),
    };
    let hazard_features = hazard_layer(hazard_polygon.clone(), crs);
    let hazard = match &hazard_style {
        Some(style) => {
            let mut resolution = resolve_single(&hazard_features, style)?;
            if hazard_polygon.0.is_empty() {
                resolution.groups.iter_mut().for_each(|g| g.features.clear());
            }
            Some(resolution)
        }
        None => None,
    };

    let mut canvas = Canvas::new(width, height, config.page.dpi);
    let mut sections: HashMap<LayerKind, Vec<LegendHandle>> = HashMap::new();
    let mut legend = Vec::new();
    let frame = viewport.frame();

    for kind in DRAW_ORDER {
        let id = format!("layer-{}", kind.name());
        match kind {
            LayerKind::Annotations => canvas.begin_group(&id, None),
            _ => canvas.begin_group(&id, Some(frame)),
        }

        match kind {
            LayerKind::Background => draw_background(&mut canvas, &viewport, config, &layers.boundary)?,
            LayerKind::Lakes => {
                draw_areas(&mut canvas, &viewport, &lakes.groups);
                sections.insert(kind, handles_for(&lakes.groups));
            }
            LayerKind::Rivers => {
                draw_lines(&mut canvas, &viewport, &rivers.groups);
                sections.insert(kind, handles_for(&rivers.groups));
            }
            LayerKind::Roads => {
                draw_lines(&mut canvas, &viewport, &roads.groups);
                sections.insert(kind, handles_for(&roads.groups));
            }
            LayerKind::Settlements => {
                draw_points(&mut canvas, &viewport, &settlements.groups);
                sections.insert(kind, handles_for(&settlements.groups));
            }
            LayerKind::Fires => {
                draw_points(&mut canvas, &viewport, &fires.groups);
                sections.insert(kind, handles_for(&fires.groups));
            }
            LayerKind::Hazard => {
                if let Some(hazard) = &hazard {
                    draw_areas(&mut canvas, &viewport, &hazard.groups);
                    sections.insert(kind, handles_for(&hazard.groups));
                }
            }
            LayerKind::Boundary => {
                let paint = Paint::stroke(config.boundary.edge, canvas.pt(config.boundary.width));
                for feature in &layers.boundary.features {
                    canvas.geometry(&viewport, &feature.geometry, paint);
                }
            }
            LayerKind::Annotations => {
                legend = assemble(&sections, &LEGEND_ORDER);
                draw_title(&mut canvas, config, frame);
                draw_legend(&mut canvas, config, frame, &legend);
                if options.scale_bar {
                    if let Some(bar) = &config.scale_bar {
                        draw_scale_bar(&mut canvas, &viewport, bar);
                    }
                }
                canvas.rect(frame, Paint::stroke(Color::BLACK, canvas.pt(0.8)));
            }
        }

        canvas.end_group();
    }

    report.legend = legend.iter().map(|h| h.label.clone()).collect();
    report.draw_calls = canvas.draw_calls();
    report.set_duration(start.elapsed());
    report.finalize();

    info!(
        width,
        height,
        draw_calls = report.draw_calls,
        legend = legend.len(),
        "Map composed"
    );

    Ok(RenderedMap {
        svg: canvas.finish(),
        width,
        height,
        extent,
        legend,
        hazard: hazard_polygon,
        report,
    })
}

/// Cadre de la carte en pixels, à partir des fractions de page
fn axes_rect(config: &MapConfig, width: u32, height: u32) -> PixelRect {
    let [left, bottom, w, h] = config.page.axes;
    let (width, height) = (width as f64, height as f64);
    PixelRect {
        x: left * width,
        y: (1.0 - bottom - h) * height,
        width: w * width,
        height: h * height,
    }
}

fn layer_stats<S>(layer: &Layer, resolution: &Resolution<'_, S>) -> LayerStats {
    LayerStats {
        features: layer.len(),
        drawn: resolution.drawn(),
        uncategorized: resolution.uncategorized,
        categories: resolution
            .groups
            .iter()
            .map(|g| CategoryCount {
                value: g.value.to_string(),
                features: g.features.len(),
            })
            .collect(),
    }
}

fn fire_point_count(fires: &Layer) -> usize {
    fires
        .features
        .iter()
        .map(|f| canvas::point_coords(&f.geometry).len())
        .sum()
}

/// Mer autour de l'emprise puis terre (remplissage de la limite)
fn draw_background(
    canvas: &mut Canvas,
    viewport: &Viewport,
    config: &MapConfig,
    boundary: &Layer,
) -> Result<()> {
    let Some(rect) = boundary.bounding_rect() else {
        bail!("Boundary layer '{}' has no geometry", boundary.name);
    };
    let sea = Extent::from_rect(rect).expand(config.background.pad);
    let (x0, y0) = viewport.to_page(geo::Coord {
        x: sea.xmin,
        y: sea.ymax,
    });
    let (x1, y1) = viewport.to_page(geo::Coord {
        x: sea.xmax,
        y: sea.ymin,
    });
    canvas.rect(
        PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        },
        Paint::fill(config.background.color),
    );

    let land = Paint::fill(config.boundary.fill);
    for feature in &boundary.features {
        canvas.geometry(viewport, &feature.geometry, land);
    }
    Ok(())
}

fn draw_areas(canvas: &mut Canvas, viewport: &Viewport, groups: &[CategoryGroup<'_, AreaStyle>]) {
    for group in groups.iter().filter(|g| !g.is_empty()) {
        let style = group.style;
        let mut paint = Paint::fill(style.fill).with_opacity(style.alpha);
        if let Some(edge) = style.edge {
            paint = paint.with_stroke(edge, canvas.pt(0.8));
        }
        for feature in &group.features {
            canvas.geometry(viewport, &feature.geometry, paint);
        }
        debug!(category = group.value, features = group.features.len(), "Areas drawn");
    }
}

fn draw_lines(canvas: &mut Canvas, viewport: &Viewport, groups: &[CategoryGroup<'_, LineStyle>]) {
    for group in groups.iter().filter(|g| !g.is_empty()) {
        let style = group.style;
        let paint = Paint::stroke(style.color, canvas.pt(style.width)).with_opacity(style.alpha);
        for feature in &group.features {
            canvas.geometry(viewport, &feature.geometry, paint);
        }
        debug!(category = group.value, features = group.features.len(), "Lines drawn");
    }
}

fn draw_points(canvas: &mut Canvas, viewport: &Viewport, groups: &[CategoryGroup<'_, PointStyle>]) {
    for group in groups.iter().filter(|g| !g.is_empty()) {
        let style = group.style;
        let size = canvas.pt(style.size);
        for feature in &group.features {
            for coord in canvas::point_coords(&feature.geometry) {
                let (x, y) = viewport.to_page(coord);
                canvas.marker(x, y, style.marker, size, style.color, style.alpha);
            }
        }
        debug!(category = group.value, features = group.features.len(), "Points drawn");
    }
}

fn draw_title(canvas: &mut Canvas, config: &MapConfig, frame: PixelRect) {
    let size = canvas.pt(config.title_font_size);
    canvas.text(
        frame.x + frame.width / 2.0,
        frame.y - size * 0.6,
        &config.title,
        size,
        TextAnchor::Middle,
        true,
    );
}

/// Légende dans le coin supérieur gauche du cadre
fn draw_legend(canvas: &mut Canvas, config: &MapConfig, frame: PixelRect, handles: &[LegendHandle]) {
    if handles.is_empty() {
        return;
    }

    let font = canvas.pt(config.legend.font_size);
    let row = font * 1.6;
    let pad = font * 0.6;
    let symbol_width = font * 2.0;
    let longest = handles
        .iter()
        .map(|h| h.label.chars().count())
        .chain(std::iter::once(config.legend.title.chars().count()))
        .max()
        .unwrap_or(0);

    let box_rect = PixelRect {
        x: frame.x + pad,
        y: frame.y + pad,
        width: pad * 3.0 + symbol_width + longest as f64 * font * 0.6,
        height: pad * 2.0 + row * (handles.len() + 1) as f64,
    };
    canvas.rect(
        box_rect,
        Paint::fill(Color::WHITE)
            .with_stroke(Color::rgb(204, 204, 204), canvas.pt(0.8))
            .with_opacity(0.8),
    );

    let x = box_rect.x + pad;
    let mut y = box_rect.y + pad + row / 2.0;
    canvas.text(x, y + font * 0.35, &config.legend.title, font, TextAnchor::Start, true);

    for handle in handles {
        y += row;
        let cx = x + symbol_width / 2.0;
        match &handle.symbol {
            Symbol::Marker {
                marker,
                color,
                size,
                alpha,
            } => {
                let size = canvas.pt(*size).min(row);
                canvas.marker(cx, y, *marker, size, *color, *alpha);
            }
            Symbol::Line {
                color,
                width,
                alpha,
            } => {
                let paint = Paint::stroke(*color, canvas.pt(*width)).with_opacity(*alpha);
                canvas.polyline(&[(x, y), (x + symbol_width, y)], paint);
            }
            Symbol::Patch { fill, edge, alpha } => {
                let mut paint = Paint::fill(*fill).with_opacity(*alpha);
                if let Some(edge) = edge {
                    paint = paint.with_stroke(*edge, canvas.pt(0.8));
                }
                canvas.rect(
                    PixelRect {
                        x,
                        y: y - font * 0.4,
                        width: symbol_width,
                        height: font * 0.8,
                    },
                    paint,
                );
            }
        }
        canvas.text(x + symbol_width + pad, y + font * 0.35, &handle.label, font, TextAnchor::Start, false);
    }
}

fn draw_scale_bar(canvas: &mut Canvas, viewport: &Viewport, config: &ScaleBarConfig) {
    let layout = scale_bar_layout(config, viewport.extent());
    let (start, end) = layout.outline;

    canvas.polyline(
        &[viewport.to_page(start), viewport.to_page(end)],
        Paint::stroke(Color::BLACK, canvas.pt(config.outline_width)),
    );
    for segment in &layout.segments {
        canvas.polyline(
            &[viewport.to_page(segment.start), viewport.to_page(segment.end)],
            Paint::stroke(segment.color, canvas.pt(config.width)),
        );
    }

    let font = canvas.pt(config.font_size);
    for tick in &layout.ticks {
        let (x, y) = viewport.to_page(tick.label_at);
        canvas.text(x, y, &tick.label, font, TextAnchor::Start, false);
    }
}
