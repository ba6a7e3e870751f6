//! Surface de dessin SVG
//!
//! Le document est construit en mémoire puis rastérisé (voir `raster`) ou
//! écrit tel quel. Les tailles de style (symboles, épaisseurs, polices) sont
//! en points typographiques et converties en pixels selon le dpi.

use std::fmt::Write as _;

use geo::{Coord, Geometry, LineString, Polygon};

use crate::color::Color;
use crate::frame::Extent;
use crate::style::Marker;

/// Rectangle en pixels (origine en haut à gauche)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Transformation coordonnées carte → pixels, à échelle isotrope
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    extent: Extent,
    scale: f64,
    frame: PixelRect,
}

impl Viewport {
    /// Ajuste l'emprise dans la zone disponible en conservant le rapport
    /// d'aspect ; le cadre obtenu est centré.
    pub fn fit(extent: Extent, area: PixelRect) -> Self {
        let scale = (area.width / extent.width()).min(area.height / extent.height());
        let width = extent.width() * scale;
        let height = extent.height() * scale;

        Self {
            extent,
            scale,
            frame: PixelRect {
                x: area.x + (area.width - width) / 2.0,
                y: area.y + (area.height - height) / 2.0,
                width,
                height,
            },
        }
    }

    /// Pixels par unité carte
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Cadre de la carte en pixels
    pub fn frame(&self) -> PixelRect {
        self.frame
    }

    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    pub fn to_page(&self, c: Coord) -> (f64, f64) {
        (
            self.frame.x + (c.x - self.extent.xmin) * self.scale,
            self.frame.y + (self.extent.ymax - c.y) * self.scale,
        )
    }
}

/// Remplissage et contour d'un élément
#[derive(Debug, Clone, Copy, Default)]
pub struct Paint {
    pub fill: Option<Color>,
    /// Couleur et épaisseur en pixels
    pub stroke: Option<(Color, f64)>,
    pub opacity: f64,
}

impl Paint {
    pub fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            opacity: 1.0,
        }
    }

    pub fn stroke(color: Color, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some((color, width)),
            opacity: 1.0,
        }
    }

    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke = Some((color, width));
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    fn attributes(&self) -> String {
        let mut attrs = String::new();
        match self.fill {
            Some(color) => {
                let _ = write!(attrs, r#" fill="{}""#, color);
            }
            None => attrs.push_str(r#" fill="none""#),
        }
        if let Some((color, width)) = self.stroke {
            let _ = write!(
                attrs,
                r#" stroke="{}" stroke-width="{:.2}" stroke-linejoin="round" stroke-linecap="round""#,
                color, width
            );
        }
        if self.opacity < 1.0 {
            let _ = write!(attrs, r#" opacity="{:.3}""#, self.opacity);
        }
        attrs
    }
}

/// Ancrage horizontal d'un texte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

const FONT_FAMILY: &str = "DejaVu Sans, Liberation Sans, Arial, sans-serif";

/// Document SVG en cours de construction
pub struct Canvas {
    width: u32,
    height: u32,
    dpi: f64,
    body: String,
    defs: String,
    open_groups: usize,
    draw_calls: usize,
}

impl Canvas {
    pub fn new(width: u32, height: u32, dpi: f64) -> Self {
        Self {
            width,
            height,
            dpi,
            body: String::new(),
            defs: String::new(),
            open_groups: 0,
            draw_calls: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Points typographiques → pixels
    pub fn pt(&self, points: f64) -> f64 {
        points * self.dpi / 72.0
    }

    /// Nombre d'éléments graphiques émis
    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }

    /// Ouvre un groupe nommé, éventuellement découpé au rectangle donné
    pub fn begin_group(&mut self, id: &str, clip: Option<PixelRect>) {
        match clip {
            Some(rect) => {
                let clip_id = format!("clip-{}", id);
                let _ = write!(
                    self.defs,
                    r#"<clipPath id="{}"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"/></clipPath>"#,
                    clip_id, rect.x, rect.y, rect.width, rect.height
                );
                let _ = write!(self.body, r#"<g id="{}" clip-path="url(#{})">"#, id, clip_id);
            }
            None => {
                let _ = write!(self.body, r#"<g id="{}">"#, id);
            }
        }
        self.open_groups += 1;
    }

    pub fn end_group(&mut self) {
        if self.open_groups > 0 {
            self.body.push_str("</g>");
            self.open_groups -= 1;
        }
    }

    pub fn rect(&mut self, rect: PixelRect, paint: Paint) {
        let _ = write!(
            self.body,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"{}/>"#,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            paint.attributes()
        );
        self.draw_calls += 1;
    }

    /// Polyligne en pixels
    pub fn polyline(&mut self, points: &[(f64, f64)], paint: Paint) {
        if points.len() < 2 {
            return;
        }
        let mut data = String::new();
        push_path(&mut data, points.iter().copied(), false);
        self.path(&data, paint);
    }

    /// Géométrie surfacique ou linéaire en coordonnées carte.
    ///
    /// Les points sont ignorés (ils se dessinent avec `marker`).
    pub fn geometry(&mut self, viewport: &Viewport, geometry: &Geometry, paint: Paint) {
        let mut data = String::new();
        geometry_path(&mut data, viewport, geometry);
        if !data.is_empty() {
            self.path(&data, paint);
        }
    }

    fn path(&mut self, data: &str, paint: Paint) {
        let _ = write!(
            self.body,
            r#"<path d="{}" fill-rule="evenodd"{}/>"#,
            data,
            paint.attributes()
        );
        self.draw_calls += 1;
    }

    /// Symbole ponctuel centré en (x, y) ; `size` est le diamètre en pixels
    pub fn marker(&mut self, x: f64, y: f64, marker: Marker, size: f64, color: Color, alpha: f64) {
        let paint = Paint::fill(color).with_opacity(alpha);
        let r = size / 2.0;

        match marker {
            Marker::Circle => {
                let _ = write!(
                    self.body,
                    r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}"{}/>"#,
                    x,
                    y,
                    r,
                    paint.attributes()
                );
                self.draw_calls += 1;
            }
            Marker::Square => self.rect(
                PixelRect {
                    x: x - r,
                    y: y - r,
                    width: size,
                    height: size,
                },
                paint,
            ),
            Marker::Star => {
                let points: Vec<(f64, f64)> = (0..10)
                    .map(|i| {
                        let radius = if i % 2 == 0 { r } else { r * 0.382 };
                        let angle = std::f64::consts::PI * (i as f64) / 5.0;
                        (x + radius * angle.sin(), y - radius * angle.cos())
                    })
                    .collect();
                self.closed_shape(&points, paint);
            }
            Marker::Triangle => {
                let points = [(x, y - r), (x + r, y + r), (x - r, y + r)];
                self.closed_shape(&points, paint);
            }
            Marker::Diamond => {
                let points = [(x, y - r), (x + r, y), (x, y + r), (x - r, y)];
                self.closed_shape(&points, paint);
            }
        }
    }

    fn closed_shape(&mut self, points: &[(f64, f64)], paint: Paint) {
        let mut data = String::new();
        push_path(&mut data, points.iter().copied(), true);
        self.path(&data, paint);
    }

    pub fn text(
        &mut self,
        x: f64,
        y: f64,
        content: &str,
        size: f64,
        anchor: TextAnchor,
        bold: bool,
    ) {
        let _ = write!(
            self.body,
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" text-anchor="{}"{}>{}</text>"#,
            x,
            y,
            FONT_FAMILY,
            size,
            anchor.as_str(),
            if bold { r#" font-weight="bold""# } else { "" },
            escape_xml(content)
        );
        self.draw_calls += 1;
    }

    /// Termine le document (ferme les groupes restés ouverts)
    pub fn finish(mut self) -> String {
        while self.open_groups > 0 {
            self.end_group();
        }

        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><defs>{defs}</defs><rect width="{w}" height="{h}" fill="white"/>{body}</svg>"#,
            w = self.width,
            h = self.height,
            defs = self.defs,
            body = self.body
        )
    }
}

fn push_path(data: &mut String, points: impl Iterator<Item = (f64, f64)>, close: bool) {
    for (i, (x, y)) in points.enumerate() {
        let command = if i == 0 { 'M' } else { 'L' };
        let _ = write!(data, "{}{:.2} {:.2}", command, x, y);
    }
    if close {
        data.push('Z');
    }
}

fn push_ring(data: &mut String, viewport: &Viewport, ring: &LineString, close: bool) {
    if ring.0.len() < 2 {
        return;
    }
    push_path(data, ring.coords().map(|c| viewport.to_page(*c)), close);
}

fn push_polygon(data: &mut String, viewport: &Viewport, polygon: &Polygon) {
    push_ring(data, viewport, polygon.exterior(), true);
    for interior in polygon.interiors() {
        push_ring(data, viewport, interior, true);
    }
}

fn geometry_path(data: &mut String, viewport: &Viewport, geometry: &Geometry) {
    match geometry {
        Geometry::LineString(ls) => push_ring(data, viewport, ls, false),
        Geometry::MultiLineString(mls) => {
            for ls in mls {
                push_ring(data, viewport, ls, false);
            }
        }
        Geometry::Line(line) => push_path(
            data,
            [viewport.to_page(line.start), viewport.to_page(line.end)].into_iter(),
            false,
        ),
        Geometry::Polygon(polygon) => push_polygon(data, viewport, polygon),
        Geometry::MultiPolygon(mp) => {
            for polygon in mp {
                push_polygon(data, viewport, polygon);
            }
        }
        Geometry::Rect(rect) => push_polygon(data, viewport, &rect.to_polygon()),
        Geometry::Triangle(triangle) => push_polygon(data, viewport, &triangle.to_polygon()),
        Geometry::GeometryCollection(collection) => {
            for member in collection {
                geometry_path(data, viewport, member);
            }
        }
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
    }
}

/// Coordonnées carte des points d'une géométrie ponctuelle
pub fn point_coords(geometry: &Geometry) -> Vec<Coord> {
    match geometry {
        Geometry::Point(p) => vec![p.0],
        Geometry::MultiPoint(mp) => mp.iter().map(|p| p.0).collect(),
        Geometry::GeometryCollection(collection) => {
            collection.iter().flat_map(point_coords).collect()
        }
        _ => Vec::new(),
    }
}

fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            c => result.push(c),
        }
    }
    result
}
