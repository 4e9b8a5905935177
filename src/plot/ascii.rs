//! ASCII plotting of a figure for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks without entering the TUI
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observations: `o`
//! - first-segment trend line: `-`
//! - last-segment trend line: `=`
//!
//! The figure's axis window is applied as-is; anything outside it is clipped.

use crate::view::{Figure, Trace};

const GLYPHS: [char; 3] = ['o', '-', '='];

/// Render the figure into a `width × height` character grid plus header/legend.
pub fn render_ascii_plot(figure: &Figure, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_bounds, y_bounds) = match figure.axes {
        Some(axes) => (axes.x, axes.y),
        None => data_bounds(figure).unwrap_or(([0.0, 1.0], [0.0, 1.0])),
    };

    let mut grid = vec![vec![' '; width]; height];
    let project = |x: f64, y: f64| project(x, y, x_bounds, y_bounds, width, height);

    // Lines first so observations overlay them.
    for (trace, &glyph) in figure.traces.iter().zip(GLYPHS.iter()).skip(1) {
        let mut prev: Option<(isize, isize)> = None;
        for (x, y) in trace.points() {
            let cur = project(x, y);
            if let Some(p) = prev {
                draw_line(&mut grid, p, cur, glyph);
            }
            prev = Some(cur);
        }
    }

    if let Some(observed) = figure.traces.first() {
        for (x, y) in observed.points() {
            let (col, row) = project(x, y);
            if let Some(cell) = cell_mut(&mut grid, col, row) {
                *cell = GLYPHS[0];
            }
        }
    }

    let mut out = String::new();
    for line in &figure.title {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&format!(
        "x=[{:.2}, {:.2}] {} | y=[{:.2}, {:.2}] {}\n",
        x_bounds[0], x_bounds[1], figure.x_title, y_bounds[0], y_bounds[1], figure.y_title
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out.push_str(&legend(&figure.traces));
    out.push('\n');
    out
}

fn legend(traces: &[Trace]) -> String {
    traces
        .iter()
        .zip(GLYPHS.iter())
        .map(|(t, g)| format!("{g} {}", t.name))
        .collect::<Vec<_>>()
        .join("  ")
}

fn data_bounds(figure: &Figure) -> Option<([f64; 2], [f64; 2])> {
    let (mut x0, mut x1, mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
    for (x, y) in figure.traces.iter().flat_map(Trace::points) {
        x0 = x0.min(x);
        x1 = x1.max(x);
        y0 = y0.min(y);
        y1 = y1.max(y);
    }
    if x0.is_finite() && x1 > x0 && y0.is_finite() && y1 > y0 {
        Some(([x0, x1], [y0, y1]))
    } else {
        None
    }
}

/// Map data coordinates to (column, row); may land outside the grid.
fn project(x: f64, y: f64, xb: [f64; 2], yb: [f64; 2], width: usize, height: usize) -> (isize, isize) {
    let u = (x - xb[0]) / (xb[1] - xb[0]);
    let v = (y - yb[0]) / (yb[1] - yb[0]);
    // Keep far-off points finite but bounded so line drawing stays cheap.
    let col = (u * (width as f64 - 1.0)).round().clamp(-1e5, 1e5) as isize;
    // y=top is max -> row 0
    let row = ((1.0 - v) * (height as f64 - 1.0)).round().clamp(-1e5, 1e5) as isize;
    (col, row)
}

fn cell_mut(grid: &mut [Vec<char>], col: isize, row: isize) -> Option<&mut char> {
    let row = usize::try_from(row).ok()?;
    let col = usize::try_from(col).ok()?;
    grid.get_mut(row)?.get_mut(col)
}

/// Integer line drawing (Bresenham-ish), clipped to the grid.
fn draw_line(grid: &mut [Vec<char>], from: (isize, isize), to: (isize, isize), ch: char) {
    let (mut x0, mut y0) = from;
    let (x1, y1) = to;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if let Some(cell) = cell_mut(grid, x0, y0) {
            if *cell == ' ' {
                *cell = ch;
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
