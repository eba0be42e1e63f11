//! Chart grid rendering with plotters
//!
//! The same drawing routine runs against any plotters backend: an RGB
//! buffer that is then PNG encoded, or an SVG document.

use super::layout::GridLayout;
use super::units::MetricUnits;
use crate::error::ReportError;
use crate::projection::{Metric, ProjectionTable};
#[cfg(feature = "ttf")]
use image::codecs::png::PngEncoder;
#[cfg(feature = "ttf")]
use image::{ColorType, ImageEncoder};
#[cfg(feature = "ttf")]
use log::debug;
use log::info;
use plotters::coord::ranged1d::BoldPoints;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// matplotlib's tab10 palette
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Marker cycle: circle, square, diamond, triangle, cross
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Circle,
    Square,
    Diamond,
    Triangle,
    Cross,
}

const MARKERS: [Marker; 5] = [
    Marker::Circle,
    Marker::Square,
    Marker::Diamond,
    Marker::Triangle,
    Marker::Cross,
];

const FONT: &str = "sans-serif";
const X_GRID_LINES: usize = 10;
const Y_GRID_LINES: usize = 6;

/// Where a rendered report goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportTarget {
    /// Return the PNG bytes to the caller
    Stream,
    /// Write to a file; `.png` or `.svg`
    File(PathBuf),
}

/// Renders the input summary and metric charts as a two-column grid
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    units: MetricUnits,
    panel_width: u32,
    panel_height: u32,
}

impl ReportRenderer {
    pub fn new(units: MetricUnits) -> Self {
        Self {
            units,
            panel_width: 700,
            panel_height: 300,
        }
    }

    /// Override the pixel size of each grid cell
    pub fn with_panel_size(mut self, width: u32, height: u32) -> Self {
        self.panel_width = width.max(1);
        self.panel_height = height.max(1);
        self
    }

    pub fn units(&self) -> &MetricUnits {
        &self.units
    }

    /// Grid for a table; an empty table gets the summary panel only
    pub fn layout(&self, table: &ProjectionTable) -> GridLayout {
        GridLayout::for_metrics(self.charted_metrics(table).len())
    }

    /// Canvas size in pixels for a layout
    pub fn canvas_size(&self, layout: &GridLayout) -> (u32, u32) {
        (
            self.panel_width * layout.cols as u32,
            self.panel_height * layout.rows as u32,
        )
    }

    fn charted_metrics<'a>(&self, table: &'a ProjectionTable) -> &'a [Metric] {
        if table.is_empty() {
            &[]
        } else {
            table.columns()
        }
    }

    /// Render to the requested target
    ///
    /// Returns the PNG bytes for [`ReportTarget::Stream`] and `None` once a
    /// file has been written.
    pub fn render(
        &self,
        summary: &str,
        table: &ProjectionTable,
        target: ReportTarget,
    ) -> Result<Option<Vec<u8>>, ReportError> {
        match target {
            ReportTarget::Stream => self.render_png(summary, table).map(Some),
            ReportTarget::File(path) => {
                self.write_to_file(summary, table, &path)?;
                Ok(None)
            }
        }
    }

    /// Write the report, choosing PNG or SVG from the file extension
    pub fn write_to_file(
        &self,
        summary: &str,
        table: &ProjectionTable,
        path: &Path,
    ) -> Result<(), ReportError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "png" => fs::write(path, self.render_png(summary, table)?)?,
            "svg" => fs::write(path, self.render_svg(summary, table)?)?,
            _ => return Err(ReportError::UnsupportedFormat(path.display().to_string())),
        }

        info!("wrote report to {}", path.display());
        Ok(())
    }

    /// Render to an in-memory PNG
    ///
    /// Bitmap text needs the `ttf` feature (on by default); without it this
    /// returns [`ReportError::NoTextBackend`].
    #[cfg(not(feature = "ttf"))]
    pub fn render_png(&self, _summary: &str, _table: &ProjectionTable) -> Result<Vec<u8>, ReportError> {
        Err(ReportError::NoTextBackend)
    }

    /// Render to an in-memory PNG
    #[cfg(feature = "ttf")]
    pub fn render_png(&self, summary: &str, table: &ProjectionTable) -> Result<Vec<u8>, ReportError> {
        let layout = self.layout(table);
        let (width, height) = self.canvas_size(&layout);
        let mut pixels = vec![0u8; width as usize * height as usize * 3];

        {
            let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
            self.draw_grid(&root, &layout, summary, table)?;
            root.present().map_err(ReportError::drawing)?;
        }

        let mut png = Vec::new();
        PngEncoder::new(&mut png).write_image(&pixels, width, height, ColorType::Rgb8)?;
        debug!("encoded {}x{} report, {} bytes", width, height, png.len());
        Ok(png)
    }

    /// Render to an SVG document
    pub fn render_svg(&self, summary: &str, table: &ProjectionTable) -> Result<String, ReportError> {
        let layout = self.layout(table);
        let mut svg = String::new();

        {
            let root = SVGBackend::with_string(&mut svg, self.canvas_size(&layout)).into_drawing_area();
            self.draw_grid(&root, &layout, summary, table)?;
            root.present().map_err(ReportError::drawing)?;
        }

        Ok(svg)
    }

    fn draw_grid<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        layout: &GridLayout,
        summary: &str,
        table: &ProjectionTable,
    ) -> Result<(), ReportError> {
        root.fill(&WHITE).map_err(ReportError::drawing)?;

        let panels = root.split_evenly((layout.rows, layout.cols));
        let metrics = self.charted_metrics(table);

        if let Some(panel) = panels.first() {
            draw_summary(panel, summary)?;
        }

        // Cells past the last metric stay blank
        for (index, (panel, metric)) in panels.iter().skip(1).zip(metrics).enumerate() {
            let slot = index + 1;
            let style = (PALETTE[slot % PALETTE.len()], MARKERS[slot % MARKERS.len()]);
            self.draw_metric(panel, table, *metric, style)?;
        }

        Ok(())
    }

    fn draw_metric<DB: DrawingBackend>(
        &self,
        panel: &DrawingArea<DB, Shift>,
        table: &ProjectionTable,
        metric: Metric,
        (color, marker): (RGBColor, Marker),
    ) -> Result<(), ReportError> {
        let unit = self.units.unit_of(metric);
        let points: Vec<(u32, f64)> = table
            .series(metric)
            .into_iter()
            .filter_map(|(year, value)| value.filter(|v| v.is_finite()).map(|v| (year, v)))
            .collect();

        let first_year = table.rows().first().map_or(1, |r| r.year);
        let last_year = table.rows().last().map_or(1, |r| r.year).max(first_year + 1);
        let (y_min, y_max) = value_range(points.iter().map(|(_, v)| *v));

        let mut chart = ChartBuilder::on(panel)
            .caption(metric.label(), (FONT, 18))
            .margin(8)
            .x_label_area_size(35)
            .y_label_area_size(80)
            .build_cartesian_2d(first_year..last_year, y_min..y_max)
            .map_err(ReportError::drawing)?;

        // Axes and tick labels only; the grid is drawn dashed below
        let format_tick = |v: &f64| unit.format_tick(*v);
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(X_GRID_LINES)
            .y_labels(Y_GRID_LINES)
            .x_desc("Year")
            .y_desc(unit.axis_label())
            .y_label_formatter(&format_tick)
            .draw()
            .map_err(ReportError::drawing)?;

        let (x_ticks, y_ticks) = {
            let coord = chart.as_coord_spec();
            (
                coord.x_spec().key_points(BoldPoints(X_GRID_LINES)),
                coord.y_spec().key_points(BoldPoints(Y_GRID_LINES)),
            )
        };
        let grid = BLACK.mix(0.25).stroke_width(1);
        for x in x_ticks {
            chart
                .draw_series(DashedLineSeries::new(vec![(x, y_min), (x, y_max)], 4, 3, grid))
                .map_err(ReportError::drawing)?;
        }
        for y in y_ticks {
            chart
                .draw_series(DashedLineSeries::new(vec![(first_year, y), (last_year, y)], 4, 3, grid))
                .map_err(ReportError::drawing)?;
        }

        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(ReportError::drawing)?
            .label(metric.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        let fill = color.filled();
        match marker {
            Marker::Circle => chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, fill))),
            Marker::Square => chart.draw_series(
                points
                    .iter()
                    .map(|&p| EmptyElement::at(p) + Rectangle::new([(-3, -3), (3, 3)], fill)),
            ),
            Marker::Diamond => chart.draw_series(points.iter().map(|&p| {
                EmptyElement::at(p) + Polygon::new(vec![(0, -4), (4, 0), (0, 4), (-4, 0)], fill)
            })),
            Marker::Triangle => {
                chart.draw_series(points.iter().map(|&p| TriangleMarker::new(p, 4, fill)))
            }
            Marker::Cross => chart.draw_series(
                points
                    .iter()
                    .map(|&p| Cross::new(p, 3, color.stroke_width(2))),
            ),
        }
        .map_err(ReportError::drawing)?;

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK.mix(0.3))
            .draw()
            .map_err(ReportError::drawing)?;

        Ok(())
    }
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new(MetricUnits::default())
    }
}

fn draw_summary<DB: DrawingBackend>(
    panel: &DrawingArea<DB, Shift>,
    summary: &str,
) -> Result<(), ReportError> {
    let body = panel
        .titled("Input Summary", (FONT, 20).into_font().style(FontStyle::Bold))
        .map_err(ReportError::drawing)?;

    let (width, height) = body.dim_in_pixel();
    let lines: Vec<&str> = summary.lines().collect();
    let line_height = 20;
    let top = (height as i32 - line_height * lines.len() as i32).max(0) / 2;
    let left = width as i32 / 4;

    for (i, line) in lines.iter().enumerate() {
        body.draw(&Text::new(
            line.to_string(),
            (left, top + i as i32 * line_height),
            (FONT, 15),
        ))
        .map_err(ReportError::drawing)?;
    }

    Ok(())
}

/// Padded y-axis range; flat or empty series still get a visible span
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }

    let span = max - min;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        (max.abs() * 0.05).max(1.0)
    };
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::InvestmentParameters;
    use crate::projection::{Project, PurchaseForRent};

    fn sample() -> (String, ProjectionTable) {
        let project = PurchaseForRent::new(InvestmentParameters::default());
        (project.input_summary(), project.evaluate(30))
    }

    #[test]
    fn test_layout_follows_columns() {
        let renderer = ReportRenderer::default();
        let (_, table) = sample();

        let layout = renderer.layout(&table);
        assert_eq!(layout.rows, 6);
        assert_eq!(layout.active, 11);
        assert_eq!(renderer.canvas_size(&layout), (1400, 1800));
    }

    #[cfg(feature = "ttf")]
    #[test]
    fn test_png_stream() {
        let renderer = ReportRenderer::default().with_panel_size(300, 150);
        let (summary, table) = sample();

        let bytes = renderer
            .render(&summary, &table, ReportTarget::Stream)
            .unwrap()
            .unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 600);
        assert_eq!(decoded.height(), 900);
    }

    #[test]
    fn test_svg_contains_labels() {
        let (summary, table) = sample();
        let svg = ReportRenderer::default().render_svg(&summary, &table).unwrap();

        assert!(svg.contains("Input Summary"));
        assert!(svg.contains("Cap Rate"));
        assert!(svg.contains("Purchase Price: $575,000"));
    }

    #[cfg(feature = "ttf")]
    #[test]
    fn test_empty_table_renders_summary_only() {
        let project = PurchaseForRent::new(InvestmentParameters::default());
        let table = project.evaluate(0);
        let renderer = ReportRenderer::default();

        assert_eq!(renderer.layout(&table), GridLayout::for_metrics(0));
        let bytes = renderer.render_png(&project.input_summary(), &table).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.height(), 300);
    }

    #[test]
    fn test_no_columns_renders_summary_only() {
        let (summary, table) = sample();
        let table = table.with_columns(Vec::new());
        let renderer = ReportRenderer::default();

        assert_eq!(renderer.layout(&table).active, 1);
        assert!(renderer.render_svg(&summary, &table).is_ok());
    }

    #[cfg(feature = "ttf")]
    #[test]
    fn test_summary_text_is_rasterized() {
        let project = PurchaseForRent::new(InvestmentParameters::default());
        let bytes = ReportRenderer::default()
            .render_png(&project.input_summary(), &project.evaluate(0))
            .unwrap();

        // Only the summary panel is drawn, so any ink is its text
        let pixels = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert!(pixels.pixels().any(|p| p.0 != [255, 255, 255]));
    }

    #[cfg(not(feature = "ttf"))]
    #[test]
    fn test_png_without_text_backend_is_an_error() {
        let (summary, table) = sample();
        let renderer = ReportRenderer::default();

        assert!(matches!(
            renderer.render_png(&summary, &table),
            Err(ReportError::NoTextBackend)
        ));
        assert!(matches!(
            renderer.render(&summary, &table, ReportTarget::Stream),
            Err(ReportError::NoTextBackend)
        ));
    }

    #[test]
    fn test_markers_cycle_across_panels() {
        let slots: Vec<Marker> = (1..=10).map(|slot| MARKERS[slot % MARKERS.len()]).collect();
        assert!(slots.windows(2).all(|w| w[0] != w[1]));
        for marker in MARKERS {
            assert!(slots.contains(&marker));
        }

        let (summary, table) = sample();
        let svg = ReportRenderer::default().render_svg(&summary, &table).unwrap();
        assert!(svg.contains("<circle"));
        assert!(svg.contains("<polygon"));
    }

    #[cfg(feature = "ttf")]
    #[test]
    fn test_single_year_table() {
        let project = PurchaseForRent::new(InvestmentParameters::default());
        let table = project.evaluate(1);
        assert!(ReportRenderer::default()
            .render_png(&project.input_summary(), &table)
            .is_ok());
    }

    #[test]
    fn test_file_target() {
        let (summary, table) = sample();
        let renderer = ReportRenderer::default().with_panel_size(300, 150);
        let path = std::env::temp_dir().join(format!("realty_roi_report_{}.svg", std::process::id()));

        let result = renderer
            .render(&summary, &table, ReportTarget::File(path.clone()))
            .unwrap();
        assert!(result.is_none());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<svg"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unsupported_extension() {
        let (summary, table) = sample();
        let err = ReportRenderer::default()
            .write_to_file(&summary, &table, Path::new("report.gif"))
            .unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_value_range_padding() {
        assert_eq!(value_range(std::iter::empty()), (0.0, 1.0));

        let (lo, hi) = value_range([5.0, 5.0].into_iter());
        assert!(lo < 5.0 && hi > 5.0);

        let (lo, hi) = value_range([0.0, 100.0].into_iter());
        assert_eq!((lo, hi), (-5.0, 105.0));
    }
}
