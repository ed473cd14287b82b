use std::ops::Range;
use std::path::Path;

use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

use crate::config::FigureConfig;
use crate::trajectory::{Point, Trajectory};

const TITLE: &str = "Comet orbit around the Sun";
const SUN_LABEL: &str = "Sun";
const TITLE_PT: f64 = 16.0;
const LABEL_PT: f64 = 12.0;
/// Pixel offsets are given at this dpi and scaled with the output dpi.
const REFERENCE_DPI: f64 = 100.0;
/// Relative padding added around the data before fixing axis limits.
const AUTOSCALE_MARGIN: f64 = 0.05;

const SUN_FILL: RGBColor = RGBColor(0xff, 0xff, 0x00);
const SUN_EDGE: RGBColor = RGBColor(0xff, 0xcc, 0x00);
/// Marker area of the animated comet, in points squared.
const COMET_MARKER_AREA: f64 = 10.0;

/// Framing of one of the two orbit plots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewStyle {
    /// Sun marker area in points squared.
    pub sun_marker_area: f64,
    /// The scale bar spans `floor(r0 / scale_divisor)` metres.
    pub scale_divisor: f64,
    /// Horizontal offset of the "Sun" label from the origin, px.
    pub sun_label_offset: f64,
    pub equal_aspect: bool,
    /// When set, the x axis is limited to `±floor(r0 / divisor)`.
    pub x_limit_divisor: Option<f64>,
}

impl ViewStyle {
    pub const FULL_ORBIT: ViewStyle = ViewStyle {
        sun_marker_area: 5.0,
        scale_divisor: 10.0,
        sun_label_offset: 26.0,
        equal_aspect: true,
        x_limit_divisor: None,
    };

    pub const ZOOMED: ViewStyle = ViewStyle {
        sun_marker_area: 100.0,
        scale_divisor: 100.0,
        sun_label_offset: 32.0,
        equal_aspect: false,
        x_limit_divisor: Some(10.0),
    };
}

/// Everything the renderer needs from one solved orbit.
#[derive(Debug, Clone)]
pub struct OrbitScene {
    pub r0: f64,
    pub segments: Vec<Vec<(f64, f64)>>,
    pub mirror_axis: f64,
}

impl OrbitScene {
    pub fn new(r0: f64, trajectory: &Trajectory) -> Self {
        Self {
            r0,
            segments: trajectory.drawable_segments(),
            mirror_axis: trajectory.mirror_axis(),
        }
    }

    /// Reflects `x` about the mirror axis; only the animated marker is drawn
    /// in this frame.
    pub fn mirrored(&self, point: &Point) -> (f64, f64) {
        (self.mirror_axis - point.x, point.y)
    }

    fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.segments.iter().flatten().copied()
    }

    fn x_limit(&self, view: &ViewStyle) -> Option<f64> {
        view.x_limit_divisor.map(|divisor| {
            let limit = scale_length(self.r0, divisor);
            if limit > 0.0 { limit } else { self.r0 / divisor }
        })
    }
}

pub fn render_still_png(
    scene: &OrbitScene,
    view: &ViewStyle,
    figure: &FigureConfig,
    path: &Path,
) -> Result<()> {
    let backend = BitMapBackend::new(path, figure.canvas_size(figure.dpi));
    let root = backend.into_drawing_area();
    draw_scene(&root, scene, view, figure.dpi, None)?;
    root.present()
        .map_err(|e| anyhow!("failed to write {}: {e}", path.display()))?;
    debug!(path = %path.display(), "wrote still image");
    Ok(())
}

/// Draws one complete frame: title, orbit, Sun, scale bar and, when given,
/// the comet marker at `marker` (already mirrored).
pub fn draw_scene<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &OrbitScene,
    view: &ViewStyle,
    dpi: u32,
    marker: Option<(f64, f64)>,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let title_px = points_to_px(TITLE_PT, dpi);
    let (title_area, chart_area) = root.split_vertically(title_px * 2);
    let title_style = ("sans-serif", title_px)
        .into_text_style(&title_area)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let title_dims = title_area.dim_in_pixel();
    title_area.draw_text(
        TITLE,
        &title_style,
        (title_dims.0 as i32 / 2, title_dims.1 as i32 / 2),
    )?;

    let (width, height) = chart_area.dim_in_pixel();
    let margin = (width / 12).max(1);
    let plot_size = (
        width.saturating_sub(2 * margin).max(1),
        height.saturating_sub(2 * margin).max(1),
    );
    let (x_range, y_range) = axis_ranges(scene, view, plot_size);

    let mut chart = ChartBuilder::on(&chart_area)
        .margin(margin)
        .build_cartesian_2d(x_range.clone(), y_range.clone())?;

    match scene.x_limit(view) {
        Some(limit) => {
            for segment in &scene.segments {
                for piece in clip_to_x_window(segment, -limit, limit) {
                    chart.draw_series(LineSeries::new(piece, &BLACK))?;
                }
            }
        }
        None => {
            for segment in &scene.segments {
                chart.draw_series(LineSeries::new(segment.iter().copied(), &BLACK))?;
            }
        }
    }

    let sun_radius = marker_radius_px(view.sun_marker_area, dpi);
    chart.draw_series(std::iter::once(Circle::new(
        (0.0, 0.0),
        sun_radius,
        SUN_FILL.filled(),
    )))?;
    chart.draw_series(std::iter::once(Circle::new(
        (0.0, 0.0),
        sun_radius,
        SUN_EDGE.stroke_width(1),
    )))?;

    let label_px = points_to_px(LABEL_PT, dpi);
    let label_offset = (view.sun_label_offset * dpi as f64 / REFERENCE_DPI).round() as i32;
    let sun_label_style = TextStyle::from(("sans-serif", label_px as f64).into_font())
        .pos(Pos::new(HPos::Left, VPos::Bottom));
    chart.draw_series(std::iter::once(
        EmptyElement::at((0.0, 0.0)) + Text::new(SUN_LABEL, (-label_offset, 0), sun_label_style),
    ))?;

    let bar_length = scale_length(scene.r0, view.scale_divisor);
    let x_span = x_range.end - x_range.start;
    let y_span = y_range.end - y_range.start;
    let bar_x = x_range.start + 0.04 * x_span;
    let bar_y = y_range.start + 0.1 * y_span;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(bar_x, bar_y), (bar_x + bar_length, bar_y)],
        BLACK.stroke_width(2),
    )))?;
    let scale_label_style = TextStyle::from(("sans-serif", label_px as f64).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    chart.draw_series(std::iter::once(
        EmptyElement::at((bar_x + bar_length / 2.0, bar_y))
            + Text::new(format_scale_label(bar_length), (0, 4), scale_label_style),
    ))?;

    if let Some(position) = marker {
        chart.draw_series(std::iter::once(Circle::new(
            position,
            marker_radius_px(COMET_MARKER_AREA, dpi),
            BLACK.filled(),
        )))?;
    }

    Ok(())
}

fn axis_ranges(
    scene: &OrbitScene,
    view: &ViewStyle,
    plot_size: (u32, u32),
) -> (Range<f64>, Range<f64>) {
    let fallback = scene.r0 / 2.0;
    // The Sun at the origin is part of the autoscaled data.
    let (x_min, x_max) = min_max(scene.points().map(|p| p.0).chain(std::iter::once(0.0)));
    let (y_min, y_max) = min_max(scene.points().map(|p| p.1).chain(std::iter::once(0.0)));
    let y_range = padded_range(y_min, y_max, fallback);

    if let Some(limit) = scene.x_limit(view) {
        return (-limit..limit, y_range);
    }

    let x_range = padded_range(x_min, x_max, fallback);
    if view.equal_aspect {
        equal_aspect(x_range, y_range, plot_size)
    } else {
        (x_range, y_range)
    }
}

fn min_max<I>(values: I) -> (f64, f64)
where
    I: Iterator<Item = f64>,
{
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        (min.min(v), max.max(v))
    })
}

/// Pads `[min, max]` by the autoscale margin; a degenerate span falls back to
/// `±fallback` around its centre.
pub fn padded_range(min: f64, max: f64, fallback: f64) -> Range<f64> {
    let span = max - min;
    if !span.is_finite() || span <= f64::EPSILON * min.abs().max(max.abs()).max(1.0) {
        let centre = if min.is_finite() { (min + max) / 2.0 } else { 0.0 };
        return (centre - fallback)..(centre + fallback);
    }
    let pad = span * AUTOSCALE_MARGIN;
    (min - pad)..(max + pad)
}

/// Widens one of the ranges so that a metre has the same length in pixels on
/// both axes.
pub fn equal_aspect(
    x: Range<f64>,
    y: Range<f64>,
    plot_size: (u32, u32),
) -> (Range<f64>, Range<f64>) {
    let (width, height) = (plot_size.0.max(1) as f64, plot_size.1.max(1) as f64);
    let x_span = x.end - x.start;
    let y_span = y.end - y.start;
    let per_px = (x_span / width).max(y_span / height);
    let x_half = per_px * width / 2.0;
    let y_half = per_px * height / 2.0;
    let x_mid = (x.start + x.end) / 2.0;
    let y_mid = (y.start + y.end) / 2.0;
    ((x_mid - x_half)..(x_mid + x_half), (y_mid - y_half)..(y_mid + y_half))
}

/// Splits a polyline into the pieces that fall inside `lo <= x <= hi`,
/// cutting crossing edges at the window border.
pub fn clip_to_x_window(segment: &[(f64, f64)], lo: f64, hi: f64) -> Vec<Vec<(f64, f64)>> {
    let mut pieces = Vec::new();
    if let [only] = segment {
        if only.0 >= lo && only.0 <= hi {
            pieces.push(vec![*only]);
        }
        return pieces;
    }

    let mut current: Vec<(f64, f64)> = Vec::new();
    for pair in segment.windows(2) {
        match clip_edge(pair[0], pair[1], lo, hi) {
            Some((start, end)) => {
                if current.last() != Some(&start) {
                    if !current.is_empty() {
                        pieces.push(std::mem::take(&mut current));
                    }
                    current.push(start);
                }
                current.push(end);
            }
            None => {
                if !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

fn clip_edge(
    a: (f64, f64),
    b: (f64, f64),
    lo: f64,
    hi: f64,
) -> Option<((f64, f64), (f64, f64))> {
    let dx = b.0 - a.0;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    if dx == 0.0 {
        if a.0 < lo || a.0 > hi {
            return None;
        }
    } else {
        let ta = (lo - a.0) / dx;
        let tb = (hi - a.0) / dx;
        t0 = t0.max(ta.min(tb));
        t1 = t1.min(ta.max(tb));
        if t0 > t1 {
            return None;
        }
    }
    let lerp = |t: f64| {
        if t == 0.0 {
            a
        } else if t == 1.0 {
            b
        } else {
            (a.0 + dx * t, a.1 + (b.1 - a.1) * t)
        }
    };
    Some((lerp(t0), lerp(t1)))
}

/// `floor(r0 / divisor)`, the length of the scale bar in metres.
pub fn scale_length(r0: f64, divisor: f64) -> f64 {
    (r0 / divisor).floor()
}

/// One significant digit in engineering-style notation, e.g. `1E+11 m`.
pub fn format_scale_label(length: f64) -> String {
    if length == 0.0 || !length.is_finite() {
        return "0E+0 m".to_string();
    }
    let formatted = format!("{length:.0e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}E{sign}{} m", exponent.abs())
        }
        None => format!("{formatted} m"),
    }
}

/// Radius in pixels of a marker given by its area in points squared.
pub fn marker_radius_px(area_pt2: f64, dpi: u32) -> u32 {
    let radius_pt = area_pt2.sqrt() / 2.0;
    ((radius_pt * dpi as f64 / 72.0).round() as u32).max(1)
}

pub fn points_to_px(points: f64, dpi: u32) -> u32 {
    ((points * dpi as f64 / 72.0).round() as u32).max(1)
}
