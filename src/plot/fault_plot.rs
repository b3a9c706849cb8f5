// src/plot/fault_plot.rs

use super::{
    basemap::{BaseMap, BaseMapLayers, LabelSides, arange},
    figure::{Figure, FigureCanvas},
    grouping::group_by_magnitude,
};
use crate::config::PlotConfig;
use crate::math::{
    error::*,
    geometry::{Dilate, get_mesh_boundary, polygon_lons_lats, sphere::*},
    types::*,
};
use crate::source::FaultSource;
use tracing::{debug, info};

/// Kartenausschnitt einer Quelle: Bounding Box und Mercator-Projektion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProjection {
    pub bounds: GeoBounds,
    pub projection: MercatorProjection,
}

/// Projektion aus dem um `PlotConfig::default().buffer_km` (10 km) vergrößerten Quellpolygon
pub fn get_map_projection<S: FaultSource>(src: &S) -> FaultPlotResult<MapProjection> {
    get_map_projection_with(src, PlotConfig::default().buffer_km)
}

pub fn get_map_projection_with<S: FaultSource>(
    src: &S,
    buffer_km: f64,
) -> FaultPlotResult<MapProjection> {
    let rup_poly = src.polygon()?.dilate(buffer_km)?;
    let (lons, lats) = polygon_lons_lats(&rup_poly);
    let bounds = GeoBounds::from_lons_lats(&lons, &lats)?;
    let projection = MercatorProjection::new(bounds)?;
    debug!(source_id = src.source_id(), %bounds, buffer_km, "map projection built");
    Ok(MapProjection { bounds, projection })
}

/// Projizierte Randpolygone und Magnituden aller Brüche, indexgleich
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuptureFootprints {
    pub boundaries: Vec<Vec<Point2D>>,
    pub mags: Vec<f64>,
}

impl RuptureFootprints {
    pub fn len(&self) -> usize {
        self.mags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mags.is_empty()
    }
}

pub fn collect_footprints<S: FaultSource>(
    src: &S,
    projection: &MercatorProjection,
) -> RuptureFootprints {
    let mut footprints = RuptureFootprints::default();
    for rup in src.iter_ruptures() {
        let (boundary_lons, boundary_lats) = get_mesh_boundary(&rup.surface.mesh);
        let (xx, yy) = projection.project_many(&boundary_lons, &boundary_lats);
        footprints
            .boundaries
            .push(xx.into_iter().zip(yy).map(Point2D::from).collect());
        footprints.mags.push(rup.mag);
    }
    footprints
}

/// Eine Figur je Magnitude mit Standard-Darstellung und ohne Kartenebenen.
///
/// Küstenlinien und Ländergrenzen kommen nur aus `[basemap]` bzw. den an
/// `get_fault_plot_with` übergebenen `BaseMapLayers`; hier bleiben sie leer.
pub fn get_fault_plot<S: FaultSource>(src: &S) -> FaultPlotResult<Vec<Figure>> {
    get_fault_plot_with(src, &PlotConfig::default(), &BaseMapLayers::default())
}

/// Eine Figur je Magnitude, aufsteigend: Gradnetz, Küsten, Grenzen, alle
/// Randpunkte der Gruppe als eine gefüllte Fläche und die Störungsspur.
pub fn get_fault_plot_with<S: FaultSource>(
    src: &S,
    config: &PlotConfig,
    layers: &BaseMapLayers,
) -> FaultPlotResult<Vec<Figure>> {
    config.validate()?;
    let MapProjection { bounds, projection } = get_map_projection_with(src, config.buffer_km)?;

    let footprints = collect_footprints(src, &projection);
    let groups = group_by_magnitude(&footprints.mags)?;
    info!(
        source_id = src.source_id(),
        ruptures = footprints.len(),
        magnitudes = groups.len(),
        "rendering fault plots"
    );

    let basemap = BaseMap::new(&projection, layers);
    let parallels = arange(bounds.min_lat, bounds.max_lat, config.grid_step_deg);
    let meridians = arange(bounds.min_lon, bounds.max_lon, config.grid_step_deg);
    let trace = src.fault_trace();

    let mut figures = Vec::with_capacity(groups.len());
    for group in groups {
        let mut canvas = FigureCanvas::new(
            config.fig_width_in,
            config.fig_height_in,
            config.dpi,
            projection.map_extent(),
        )?;

        basemap.draw_coastlines(&mut canvas);
        basemap.draw_countries(&mut canvas);

        let nl: Vec<Point2D> = group
            .indices
            .iter()
            .flat_map(|&i| footprints.boundaries[i].iter().copied())
            .collect();
        canvas.draw_map_polygon(&nl, &config.fill_color);

        basemap.draw_parallels(&mut canvas, &parallels, LabelSides::LEFT_BOTTOM);
        basemap.draw_meridians(&mut canvas, &meridians, LabelSides::LEFT_BOTTOM);
        basemap.plot(&mut canvas, trace, &config.trace_color, config.trace_width);

        let title = config.title_for(group.magnitude);
        canvas.set_title(&title, config.title_font_size);
        debug!(%title, ruptures = group.indices.len(), points = nl.len(), "figure created");
        figures.push(canvas.finish(group.magnitude, title));
    }

    Ok(figures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::geometry::Mesh;
    use crate::source::{Rupture, Surface};
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    /// Quelle mit fest vorgegebenen Brüchen
    struct FixedSource {
        polygon: Polygon<f64>,
        trace: Line,
        ruptures: Vec<Rupture>,
    }

    impl FaultSource for FixedSource {
        fn polygon(&self) -> FaultPlotResult<Polygon<f64>> {
            Ok(self.polygon.clone())
        }

        fn iter_ruptures(&self) -> impl Iterator<Item = Rupture> + '_ {
            self.ruptures.iter().cloned()
        }

        fn fault_trace(&self) -> &Line {
            &self.trace
        }
    }

    fn rupture(mag: f64, lon0: f64) -> Rupture {
        let lons = DMatrix::from_fn(2, 3, |_, j| lon0 + 0.05 * j as f64);
        let lats = DMatrix::from_fn(2, 3, |i, _| 45.1 - 0.05 * i as f64);
        Rupture {
            mag,
            rake: 0.0,
            occurrence_rate: 0.01,
            surface: Surface::new(Mesh::new(lons, lats, None).unwrap()),
        }
    }

    fn source(mags: &[f64]) -> FixedSource {
        FixedSource {
            polygon: Polygon::new(
                LineString::from(vec![(10.0, 45.0), (10.5, 45.0), (10.5, 45.2), (10.0, 45.2)]),
                vec![],
            ),
            trace: Line::new(vec![GeoPoint::new(10.0, 45.1), GeoPoint::new(10.5, 45.1)]),
            ruptures: mags
                .iter()
                .enumerate()
                .map(|(i, &m)| rupture(m, 10.0 + 0.1 * i as f64))
                .collect(),
        }
    }

    #[test]
    fn test_zero_buffer_bounds_match_polygon() {
        let map = get_map_projection_with(&source(&[5.0]), 0.0).unwrap();
        assert_eq!(map.bounds.as_tuple(), (10.0, 10.5, 45.0, 45.2));
        let origin = map.projection.project(10.0, 45.0);
        assert_relative_eq!(origin.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(origin.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_default_buffer_extends_bounds() {
        let map = get_map_projection(&source(&[5.0])).unwrap();
        assert!(map.bounds.min_lon < 10.0 && map.bounds.max_lon > 10.5);
        assert!(map.bounds.min_lat < 45.0 && map.bounds.max_lat > 45.2);
    }

    #[test]
    fn test_footprints_index_aligned() {
        let src = source(&[5.0, 6.0, 5.0]);
        let map = get_map_projection(&src).unwrap();
        let footprints = collect_footprints(&src, &map.projection);
        assert_eq!(footprints.len(), 3);
        assert_eq!(footprints.mags, vec![5.0, 6.0, 5.0]);
        // 2x3 Mesh -> 2*2 + 2*3 - 4 Randpunkte
        assert!(footprints.boundaries.iter().all(|b| b.len() == 6));
        // dritter Bruch liegt östlich des ersten
        assert!(footprints.boundaries[2][0].x > footprints.boundaries[0][0].x);
    }

    #[test]
    fn test_one_figure_per_magnitude() {
        let figures = get_fault_plot(&source(&[5.0, 6.0, 5.0])).unwrap();
        assert_eq!(figures.len(), 2);
        assert_eq!(figures[0].title(), "Simple Fault Source Ruptures, M=5.0");
        assert_eq!(figures[1].title(), "Simple Fault Source Ruptures, M=6.0");

        for figure in &figures {
            let svg = figure.to_svg_string();
            assert_eq!(svg.matches("<polygon").count(), 1);
            assert!(svg.contains("palegreen"));
            assert!(svg.contains(figure.title()));
        }
    }

    #[test]
    fn test_group_polygon_flattens_all_boundaries() {
        let figures = get_fault_plot(&source(&[5.0, 6.0, 5.0])).unwrap();
        let svg = figures[0].to_svg_string();
        let points_attr = svg
            .split("<polygon")
            .nth(1)
            .and_then(|s| s.split("points=\"").nth(1))
            .and_then(|s| s.split('"').next())
            .unwrap();
        // zwei Brüche à 6 Randpunkte
        assert_eq!(points_attr.split_whitespace().count(), 12);
    }

    #[test]
    fn test_figures_sorted_ascending() {
        let figures = get_fault_plot(&source(&[6.5, 5.0, 5.5])).unwrap();
        let mags: Vec<f64> = figures.iter().map(Figure::magnitude).collect();
        assert_eq!(mags, vec![5.0, 5.5, 6.5]);
    }

    #[test]
    fn test_no_ruptures_no_figures() {
        let figures = get_fault_plot(&source(&[])).unwrap();
        assert!(figures.is_empty());
    }

    #[test]
    fn test_layers_and_trace_drawn() {
        let layers = BaseMapLayers {
            coastlines: vec![Line::new(vec![
                GeoPoint::new(9.9, 45.05),
                GeoPoint::new(10.6, 45.15),
            ])],
            countries: vec![Line::new(vec![
                GeoPoint::new(10.2, 44.8),
                GeoPoint::new(10.3, 45.4),
            ])],
        };
        let config = PlotConfig::default().with_grid_step(0.1);
        let src = source(&[5.0]);
        let figures = get_fault_plot_with(&src, &config, &layers).unwrap();
        assert_eq!(figures.len(), 1);

        let map = get_map_projection(&src).unwrap();
        let parallels = arange(map.bounds.min_lat, map.bounds.max_lat, 0.1).len();
        let meridians = arange(map.bounds.min_lon, map.bounds.max_lon, 0.1).len();
        let svg = figures[0].to_svg_string();
        // Küste + Grenze + Gradnetz + Störungsspur
        assert_eq!(svg.matches("<polyline").count(), 2 + parallels + meridians + 1);
    }

    /// Wert eines Attributs innerhalb eines SVG-Tags
    fn attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
        let key = format!(" {name}=\"");
        let start = tag.find(&key)? + key.len();
        tag[start..].split('"').next()
    }

    #[test]
    fn test_trace_drawn_last_above_polygon() {
        let config = PlotConfig::default();
        let figures = get_fault_plot(&source(&[5.0])).unwrap();
        let svg = figures[0].to_svg_string();

        let polygon_at = svg.find("<polygon").unwrap();
        let trace_at = svg.rfind("<polyline").unwrap();
        assert!(trace_at > polygon_at);

        let tag = svg[trace_at..].split('>').next().unwrap();
        assert_eq!(attr(tag, "stroke"), Some("black"));
        assert_eq!(attr(tag, "stroke-dasharray"), None);
        let width: f64 = attr(tag, "stroke-width").unwrap().parse().unwrap();
        assert_relative_eq!(width, 2.0 * config.dpi / 72.0, epsilon = 1e-9);
    }

    #[test]
    fn test_nan_magnitude_rejected() {
        assert!(get_fault_plot(&source(&[5.0, f64::NAN])).is_err());
    }
}
