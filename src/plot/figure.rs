// src/plot/figure.rs

use crate::math::{error::*, types::*};
use std::path::Path;
use svg::{
    Document, Node,
    node::element::{
        ClipPath, Definitions, Group, Polygon as SvgPolygon, Polyline, Rectangle, Text,
    },
};
use tracing::info;

// Achsenrechteck als Anteil der Figur (links, unten, rechts, oben)
const AXES_LEFT: f64 = 0.125;
const AXES_BOTTOM: f64 = 0.11;
const AXES_RIGHT: f64 = 0.9;
const AXES_TOP: f64 = 0.88;

const MAP_CLIP_ID: &str = "map-frame";

/// Linienstil in Pixeln
#[derive(Debug, Clone)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
    pub dasharray: Option<String>,
}

impl Stroke {
    pub fn solid(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
            dasharray: None,
        }
    }

    pub fn dashed(color: impl Into<String>, width: f64, dasharray: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            width,
            dasharray: Some(dasharray.into()),
        }
    }
}

/// Textanker für Beschriftungen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(&self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Abbildung von Projektionskoordinaten auf Pixel.
///
/// Die Karte wird mit gleichem Maßstab in x und y in das Achsenrechteck
/// eingepasst und darin zentriert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapFrame {
    extent: Bounds2D,
    scale: f64,
    left: f64,
    bottom: f64,
}

impl MapFrame {
    pub fn fit(extent: Bounds2D, width_px: f64, height_px: f64) -> FaultPlotResult<Self> {
        if extent.width() <= 0.0 || extent.height() <= 0.0 {
            return Err(FaultPlotError::GeometricFailure {
                operation: format!("map extent has no area: {extent}"),
            });
        }
        let axes_w = width_px * (AXES_RIGHT - AXES_LEFT);
        let axes_h = height_px * (AXES_TOP - AXES_BOTTOM);
        let scale = (axes_w / extent.width()).min(axes_h / extent.height());

        let map_w = extent.width() * scale;
        let map_h = extent.height() * scale;
        let left = width_px * AXES_LEFT + (axes_w - map_w) / 2.0;
        // SVG-y wächst nach unten
        let bottom = height_px * (1.0 - AXES_BOTTOM) - (axes_h - map_h) / 2.0;

        Ok(Self {
            extent,
            scale,
            left,
            bottom,
        })
    }

    pub fn to_pixel(&self, p: Point2D) -> Point2D {
        Point2D::new(
            self.left + (p.x - self.extent.min.x) * self.scale,
            self.bottom - (p.y - self.extent.min.y) * self.scale,
        )
    }

    /// Kartenrahmen in Pixeln (oben links, Breite, Höhe)
    pub fn pixel_rect(&self) -> (f64, f64, f64, f64) {
        let w = self.extent.width() * self.scale;
        let h = self.extent.height() * self.scale;
        (self.left, self.bottom - h, w, h)
    }
}

/// Eine fertige Figur: SVG-Dokument plus Metadaten
#[derive(Debug, Clone)]
pub struct Figure {
    magnitude: f64,
    title: String,
    document: Document,
}

impl Figure {
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn to_svg_string(&self) -> String {
        self.document.to_string()
    }

    /// Speichert die Figur als SVG-Datei
    pub fn save(&self, path: impl AsRef<Path>) -> FaultPlotResult<()> {
        let path = path.as_ref();
        svg::save(path, &self.document)?;
        info!(path = %path.display(), title = %self.title, "figure written");
        Ok(())
    }
}

/// Zeichenfläche einer Figur: hält das SVG-Dokument und den Kartenrahmen.
pub struct FigureCanvas {
    document: Document,
    map_layer: Group,
    frame: MapFrame,
    px_per_pt: f64,
}

impl FigureCanvas {
    /// Neue Figur mit `width_in` × `height_in` Zoll bei `dpi`
    pub fn new(
        width_in: f64,
        height_in: f64,
        dpi: f64,
        map_extent: Bounds2D,
    ) -> FaultPlotResult<Self> {
        let width = width_in * dpi;
        let height = height_in * dpi;
        let frame = MapFrame::fit(map_extent, width, height)?;
        let (x, y, w, h) = frame.pixel_rect();

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", format!("0 0 {width} {height}"));

        document.append(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", width)
                .set("height", height)
                .set("fill", "white"),
        );
        document.append(
            Definitions::new().add(
                ClipPath::new().set("id", MAP_CLIP_ID).add(
                    Rectangle::new()
                        .set("x", x)
                        .set("y", y)
                        .set("width", w)
                        .set("height", h),
                ),
            ),
        );

        let map_layer = Group::new().set("clip-path", format!("url(#{MAP_CLIP_ID})"));

        Ok(Self {
            document,
            map_layer,
            frame,
            px_per_pt: dpi / 72.0,
        })
    }

    pub fn frame(&self) -> &MapFrame {
        &self.frame
    }

    pub fn px_per_pt(&self) -> f64 {
        self.px_per_pt
    }

    /// Linienzug in Kartenkoordinaten, auf den Kartenrahmen beschnitten
    pub fn draw_map_polyline(&mut self, points: &[Point2D], stroke: &Stroke) {
        if points.len() < 2 {
            return;
        }
        let mut polyline = Polyline::new()
            .set("points", self.pixel_points(points))
            .set("fill", "none")
            .set("stroke", stroke.color.as_str())
            .set("stroke-width", stroke.width)
            .set("stroke-linejoin", "round");
        if let Some(dash) = &stroke.dasharray {
            polyline = polyline.set("stroke-dasharray", dash.as_str());
        }
        self.map_layer.append(polyline);
    }

    /// Gefülltes Polygon in Kartenkoordinaten, auf den Kartenrahmen beschnitten
    pub fn draw_map_polygon(&mut self, points: &[Point2D], fill: &str) {
        if points.is_empty() {
            return;
        }
        self.map_layer.append(
            SvgPolygon::new()
                .set("points", self.pixel_points(points))
                .set("fill", fill)
                .set("stroke", "none"),
        );
    }

    /// Text an einer Pixelposition
    pub fn draw_text(
        &mut self,
        pos: Point2D,
        text: &str,
        font_size_pt: f64,
        anchor: Anchor,
        baseline: &str,
    ) {
        self.document.append(
            Text::new(text)
                .set("x", pos.x)
                .set("y", pos.y)
                .set("font-family", "DejaVu Sans, sans-serif")
                .set("font-size", font_size_pt * self.px_per_pt)
                .set("text-anchor", anchor.as_str())
                .set("dominant-baseline", baseline),
        );
    }

    /// Titel über dem Kartenrahmen, zentriert
    pub fn set_title(&mut self, title: &str, font_size_pt: f64) {
        let (x, y, w, _) = self.frame.pixel_rect();
        let pad = 6.0 * self.px_per_pt;
        self.draw_text(
            Point2D::new(x + w / 2.0, y - pad),
            title,
            font_size_pt,
            Anchor::Middle,
            "alphabetic",
        );
    }

    /// Schließt die Figur ab
    pub fn finish(mut self, magnitude: f64, title: String) -> Figure {
        let (x, y, w, h) = self.frame.pixel_rect();
        self.document.append(self.map_layer);
        self.document.append(
            Rectangle::new()
                .set("x", x)
                .set("y", y)
                .set("width", w)
                .set("height", h)
                .set("fill", "none")
                .set("stroke", "black")
                .set("stroke-width", self.px_per_pt),
        );
        Figure {
            magnitude,
            title,
            document: self.document.set("data-magnitude", format!("{magnitude:?}")),
        }
    }

    fn pixel_points(&self, points: &[Point2D]) -> String {
        points
            .iter()
            .map(|p| {
                let px = self.frame.to_pixel(*p);
                format!("{:.2},{:.2}", px.x, px.y)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
