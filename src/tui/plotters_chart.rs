//! Plotters-powered CO2 chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// All series are clipped to the axis window before rendering; see
/// `clip_polyline`.
pub struct Co2PlottersChart<'a> {
    /// Observations inside the window.
    pub points: &'a [(f64, f64)],
    pub points_rgb: (u8, u8, u8),
    /// Trend lines, each as one or more clipped runs, with their colors.
    pub lines: Vec<(&'a [Vec<(f64, f64)>], (u8, u8, u8))>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl<'a> Widget for Co2PlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(6)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.0}"))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for (runs, (r, g, b)) in &self.lines {
                let color = RGBColor(*r, *g, *b);
                for run in runs.iter() {
                    chart.draw_series(LineSeries::new(run.iter().copied(), &color))?;
                }
            }

            // Colored `Pixel`s rather than `Circle`s: the ratatui backend maps
            // circle radii into canvas units and produces huge markers.
            let (r, g, b) = self.points_rgb;
            let points_color = RGBColor(r, g, b);
            chart.draw_series(self.points.iter().map(|&(x, y)| Pixel::new((x, y), points_color)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Points inside the window or on its edge.
pub fn clip_points(points: impl Iterator<Item = (f64, f64)>, xb: [f64; 2], yb: [f64; 2]) -> Vec<(f64, f64)> {
    points
        .filter(|&(x, y)| x >= xb[0] && x <= xb[1] && y >= yb[0] && y <= yb[1])
        .collect()
}

/// Clip a polyline to the window, returning the visible runs.
pub fn clip_polyline(points: &[(f64, f64)], xb: [f64; 2], yb: [f64; 2]) -> Vec<Vec<(f64, f64)>> {
    let mut runs: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    for pair in points.windows(2) {
        match clip_segment(pair[0], pair[1], xb, yb) {
            Some((a, b)) => {
                if current.last() != Some(&a) {
                    if current.len() >= 2 {
                        runs.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(a);
                }
                current.push(b);
            }
            None => {
                if current.len() >= 2 {
                    runs.push(std::mem::take(&mut current));
                }
                current.clear();
            }
        }
    }
    if current.len() >= 2 {
        runs.push(current);
    }
    runs
}

/// Liang–Barsky segment clipping against an axis-aligned box.
pub fn clip_segment(
    p0: (f64, f64),
    p1: (f64, f64),
    xb: [f64; 2],
    yb: [f64; 2],
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-dx, p0.0 - xb[0]),
        (dx, xb[1] - p0.0),
        (-dy, p0.1 - yb[0]),
        (dy, yb[1] - p0.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    let at = |t: f64| {
        if t == 0.0 {
            p0
        } else if t == 1.0 {
            p1
        } else {
            (p0.0 + t * dx, p0.1 + t * dy)
        }
    };
    Some((at(t0), at(t1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const XB: [f64; 2] = [0.0, 10.0];
    const YB: [f64; 2] = [0.0, 10.0];

    #[test]
    fn segment_inside_is_unchanged() {
        let seg = clip_segment((1.0, 1.0), (2.0, 3.0), XB, YB).unwrap();
        assert_eq!(seg, ((1.0, 1.0), (2.0, 3.0)));
    }

    #[test]
    fn segment_crossing_edge_is_cut() {
        let (a, b) = clip_segment((-5.0, 5.0), (5.0, 5.0), XB, YB).unwrap();
        assert_eq!(a, (0.0, 5.0));
        assert_eq!(b, (5.0, 5.0));
        assert!(clip_segment((-5.0, 20.0), (5.0, 20.0), XB, YB).is_none());
    }

    #[test]
    fn polyline_keeps_visible_runs_only() {
        let line = [(-2.0, 1.0), (2.0, 1.0), (4.0, 1.0), (12.0, 1.0), (14.0, 1.0)];
        let runs = clip_polyline(&line, XB, YB);
        assert_eq!(runs, vec![vec![(0.0, 1.0), (2.0, 1.0), (4.0, 1.0), (10.0, 1.0)]]);

        let pts = clip_points(line.iter().copied(), XB, YB);
        assert_eq!(pts, vec![(2.0, 1.0), (4.0, 1.0)]);
    }
}
