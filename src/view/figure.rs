//! In-memory plot surface.
//!
//! The controller mutates a `PlotSurface`; renderers (TUI chart, ASCII plot,
//! JSON summary) only read the resulting `Figure`.

use serde::Serialize;

use crate::domain::AxisRanges;
use crate::view::policy::Visibility;

/// How a trace is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Markers,
    Lines,
}

/// Named trace colors (rendered per backend).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TraceColor {
    MediumTurquoise,
    SandyBrown,
    MediumVioletRed,
}

impl TraceColor {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            TraceColor::MediumTurquoise => (72, 209, 204),
            TraceColor::SandyBrown => (244, 164, 96),
            TraceColor::MediumVioletRed => (199, 21, 133),
        }
    }
}

/// One data series on the figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub mode: TraceMode,
    pub color: TraceColor,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Trace {
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Operations the controller performs on a plotting widget.
pub trait PlotSurface {
    /// Append a trace; returns its index.
    fn add_trace(&mut self, trace: Trace) -> usize;
    /// Replace the data of an existing trace (out-of-range indices are ignored).
    fn set_trace_data(&mut self, index: usize, x: Vec<f64>, y: Vec<f64>);
    /// Title lines, top to bottom.
    fn set_title(&mut self, lines: Vec<String>);
    fn set_axis_titles(&mut self, x: &str, y: &str);
    fn set_axis_ranges(&mut self, ranges: AxisRanges);
    fn set_visibility(&mut self, visibility: Visibility);
}

/// Figure state: traces plus layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub traces: Vec<Trace>,
    pub title: Vec<String>,
    pub x_title: String,
    pub y_title: String,
    pub axes: Option<AxisRanges>,
    pub visibility: Option<Visibility>,
    /// Number of mutations applied so far (renderers may use it to skip redraws).
    pub revision: u64,
}

impl Figure {
    pub fn new() -> Self {
        Self {
            traces: Vec::new(),
            title: Vec::new(),
            x_title: String::new(),
            y_title: String::new(),
            axes: None,
            visibility: None,
            revision: 0,
        }
    }

    pub fn trace(&self, index: usize) -> Option<&Trace> {
        self.traces.get(index)
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

impl Default for Figure {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotSurface for Figure {
    fn add_trace(&mut self, trace: Trace) -> usize {
        self.traces.push(trace);
        self.touch();
        self.traces.len() - 1
    }

    fn set_trace_data(&mut self, index: usize, x: Vec<f64>, y: Vec<f64>) {
        if let Some(trace) = self.traces.get_mut(index) {
            trace.x = x;
            trace.y = y;
            self.touch();
        }
    }

    fn set_title(&mut self, lines: Vec<String>) {
        self.title = lines;
        self.touch();
    }

    fn set_axis_titles(&mut self, x: &str, y: &str) {
        self.x_title = x.to_string();
        self.y_title = y.to_string();
        self.touch();
    }

    fn set_axis_ranges(&mut self, ranges: AxisRanges) {
        self.axes = Some(ranges);
        self.touch();
    }

    fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = Some(visibility);
        self.touch();
    }
}
