// src/plot/basemap.rs

use super::figure::{Anchor, FigureCanvas, Stroke};
use crate::math::{geometry::sphere::*, types::*, utils::format};
use serde::{Deserialize, Serialize};

/// Hintergrundebenen einer Karte (Polylinien in Länge/Breite)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseMapLayers {
    pub coastlines: Vec<Line>,
    pub countries: Vec<Line>,
}

/// Welche Rahmenseiten beschriftet werden: links, rechts, oben, unten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSides {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl LabelSides {
    pub const LEFT_BOTTOM: Self = Self {
        left: true,
        right: false,
        top: false,
        bottom: true,
    };
}

const GRID_LINE_WIDTH_PT: f64 = 1.0;
const COASTLINE_WIDTH_PT: f64 = 1.0;
const COUNTRY_WIDTH_PT: f64 = 0.5;
const LABEL_FONT_PT: f64 = 10.0;
const LABEL_PAD_PT: f64 = 4.0;

/// Karte in Mercator-Projektion mit Zeichenfunktionen für Gradnetz,
/// Küstenlinien, Ländergrenzen und Linien.
pub struct BaseMap<'a> {
    projection: &'a MercatorProjection,
    layers: &'a BaseMapLayers,
}

impl<'a> BaseMap<'a> {
    pub fn new(projection: &'a MercatorProjection, layers: &'a BaseMapLayers) -> Self {
        Self { projection, layers }
    }

    /// Projiziert Länge/Breite in Kartenkoordinaten
    pub fn project(&self, lons: &[f64], lats: &[f64]) -> Vec<Point2D> {
        let (xx, yy) = self.projection.project_many(lons, lats);
        xx.into_iter().zip(yy).map(Point2D::from).collect()
    }

    pub fn draw_parallels(&self, canvas: &mut FigureCanvas, lats: &[f64], labels: LabelSides) {
        let bounds = self.projection.bounds();
        let stroke = grid_stroke(canvas);
        for &lat in lats {
            let line = self.project(&[bounds.min_lon, bounds.max_lon], &[lat, lat]);
            canvas.draw_map_polyline(&line, &stroke);

            let text = lat_label(lat);
            let pad = LABEL_PAD_PT * canvas.px_per_pt();
            if labels.left {
                let p = canvas.frame().to_pixel(line[0]);
                let pos = Point2D::new(p.x - pad, p.y);
                canvas.draw_text(pos, &text, LABEL_FONT_PT, Anchor::End, "middle");
            }
            if labels.right {
                let p = canvas.frame().to_pixel(line[1]);
                let pos = Point2D::new(p.x + pad, p.y);
                canvas.draw_text(pos, &text, LABEL_FONT_PT, Anchor::Start, "middle");
            }
        }
    }

    pub fn draw_meridians(&self, canvas: &mut FigureCanvas, lons: &[f64], labels: LabelSides) {
        let bounds = self.projection.bounds();
        let stroke = grid_stroke(canvas);
        for &lon in lons {
            let line = self.project(&[lon, lon], &[bounds.min_lat, bounds.max_lat]);
            canvas.draw_map_polyline(&line, &stroke);

            let text = lon_label(lon);
            let pad = LABEL_PAD_PT * canvas.px_per_pt();
            if labels.bottom {
                let p = canvas.frame().to_pixel(line[0]);
                let pos = Point2D::new(p.x, p.y + pad);
                canvas.draw_text(pos, &text, LABEL_FONT_PT, Anchor::Middle, "hanging");
            }
            if labels.top {
                let p = canvas.frame().to_pixel(line[1]);
                let pos = Point2D::new(p.x, p.y - pad);
                canvas.draw_text(pos, &text, LABEL_FONT_PT, Anchor::Middle, "alphabetic");
            }
        }
    }

    pub fn draw_coastlines(&self, canvas: &mut FigureCanvas) {
        let stroke = Stroke::solid("black", COASTLINE_WIDTH_PT * canvas.px_per_pt());
        self.draw_layer(canvas, &self.layers.coastlines, &stroke);
    }

    pub fn draw_countries(&self, canvas: &mut FigureCanvas) {
        let stroke = Stroke::solid("black", COUNTRY_WIDTH_PT * canvas.px_per_pt());
        self.draw_layer(canvas, &self.layers.countries, &stroke);
    }

    /// Linie in Länge/Breite zeichnen (Farbe, Breite in Punkt)
    pub fn plot(&self, canvas: &mut FigureCanvas, line: &Line, color: &str, width_pt: f64) {
        let points = self.project(&line.lons(), &line.lats());
        let stroke = Stroke::solid(color, width_pt * canvas.px_per_pt());
        canvas.draw_map_polyline(&points, &stroke);
    }

    fn draw_layer(&self, canvas: &mut FigureCanvas, lines: &[Line], stroke: &Stroke) {
        for line in lines {
            let points = self.project(&line.lons(), &line.lats());
            canvas.draw_map_polyline(&points, stroke);
        }
    }
}

fn grid_stroke(canvas: &FigureCanvas) -> Stroke {
    let unit = canvas.px_per_pt();
    Stroke::dashed("black", GRID_LINE_WIDTH_PT * unit, format!("{unit:.2},{unit:.2}"))
}

/// Werte `start, start + step, ...` strikt unterhalb von `stop`
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !(stop > start) {
        return Vec::new();
    }
    let count = ((stop - start) / step).ceil() as usize;
    (0..count).map(|i| start + i as f64 * step).collect()
}

fn lat_label(lat: f64) -> String {
    let hemisphere = if lat > 0.0 {
        "N"
    } else if lat < 0.0 {
        "S"
    } else {
        ""
    };
    format!("{}\u{b0}{}", format::general(lat.abs()), hemisphere)
}

fn lon_label(lon: f64) -> String {
    let hemisphere = if lon > 0.0 {
        "E"
    } else if lon < 0.0 {
        "W"
    } else {
        ""
    };
    format!("{}\u{b0}{}", format::general(lon.abs()), hemisphere)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_arange_excludes_stop() {
        let values = arange(10.0, 10.6, 0.2);
        assert_eq!(values.len(), 3);
        assert_relative_eq!(values[2], 10.4, epsilon = 1e-12);
        assert!(arange(1.0, 1.0, 0.2).is_empty());
        assert_eq!(arange(10.0, 10.61, 0.2).len(), 4);
    }

    #[test]
    fn test_labels() {
        assert_eq!(lat_label(45.2), "45.2\u{b0}N");
        assert_eq!(lat_label(-12.5), "12.5\u{b0}S");
        assert_eq!(lon_label(-3.4), "3.4\u{b0}W");
        assert_eq!(lon_label(0.0), "0\u{b0}");
    }

    #[test]
    fn test_draw_graticule_and_layers() {
        let bounds = GeoBounds::new(10.0, 10.5, 45.0, 45.5).unwrap();
        let projection = MercatorProjection::new(bounds).unwrap();
        let layers = BaseMapLayers {
            coastlines: vec![Line::new(vec![
                GeoPoint::new(9.9, 45.1),
                GeoPoint::new(10.6, 45.3),
            ])],
            countries: vec![],
        };
        let basemap = BaseMap::new(&projection, &layers);
        let mut canvas = FigureCanvas::new(4.0, 4.0, 100.0, projection.map_extent()).unwrap();

        basemap.draw_parallels(&mut canvas, &arange(45.0, 45.5, 0.2), LabelSides::LEFT_BOTTOM);
        basemap.draw_meridians(&mut canvas, &arange(10.0, 10.5, 0.2), LabelSides::LEFT_BOTTOM);
        basemap.draw_coastlines(&mut canvas);
        basemap.draw_countries(&mut canvas);

        let svg = canvas.finish(0.0, String::new()).to_svg_string();
        // 3 Breitenkreise + 3 Meridiane + 1 Küstenlinie
        assert_eq!(svg.matches("<polyline").count(), 7);
        assert!(svg.contains("45.2\u{b0}N"));
        assert!(svg.contains("10.4\u{b0}E"));
    }
}
