//! Reactive view-state controller.
//!
//! Owns the application state (dataset, controls, plot surface). Every control
//! change triggers a full recompute from the current six-value snapshot; there
//! is no incremental update.

use tracing::debug;

use crate::controls::{Change, ControlEvent, Controls};
use crate::domain::{
    AxisRanges, PREDICTION_REFERENCE_YEAR, PREDICTION_TARGET_YEAR, Segment, SignalType, ViewSnapshot,
};
use crate::fit::segment_fit;
use crate::io::IngestedData;
use crate::math::LineFit;
use crate::models::{predict, trend_series};
use crate::view::figure::{PlotSurface, Trace, TraceColor, TraceMode};
use crate::view::policy::{self, Visibility};

/// Index of the observation scatter trace.
pub const OBSERVATION_TRACE: usize = 0;

/// Everything the recompute routine pushes to the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView {
    pub observed: Vec<f64>,
    pub first: Vec<f64>,
    pub last: Vec<f64>,
    pub title: Vec<String>,
    pub visibility: Visibility,
    pub axes: AxisRanges,
}

impl DerivedView {
    pub fn trend(&self, segment: Segment) -> &[f64] {
        match segment {
            Segment::First => &self.first,
            Segment::Last => &self.last,
        }
    }
}

pub struct ViewController<S: PlotSurface> {
    data: IngestedData,
    dates: Vec<f64>,
    controls: Controls,
    surface: S,
}

impl<S: PlotSurface> ViewController<S> {
    /// Build the controller and initialise the surface from the controls' current values.
    pub fn new(data: IngestedData, controls: Controls, mut surface: S) -> Self {
        let dates = data.dates();
        let snapshot = controls.snapshot();

        let view = derive_view(&data, &dates, &snapshot);
        surface.add_trace(Trace {
            name: "CO2".to_string(),
            mode: TraceMode::Markers,
            color: TraceColor::MediumTurquoise,
            x: dates.clone(),
            y: view.observed.clone(),
        });
        for (segment, color) in [
            (Segment::First, TraceColor::SandyBrown),
            (Segment::Last, TraceColor::MediumVioletRed),
        ] {
            surface.add_trace(Trace {
                name: format!("linear fit (for {} 5 years)", segment.label()),
                mode: TraceMode::Lines,
                color,
                x: dates.clone(),
                y: view.trend(segment).to_vec(),
            });
        }
        surface.set_axis_titles("Year", "ppm");
        surface.set_visibility(view.visibility);
        surface.set_axis_ranges(view.axes);
        surface.set_title(view.title);

        Self {
            data,
            dates,
            controls,
            surface,
        }
    }

    pub fn data(&self) -> &IngestedData {
        &self.data
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.controls.snapshot()
    }

    /// Pure recompute for an arbitrary snapshot (does not touch the surface).
    pub fn derive(&self, snapshot: &ViewSnapshot) -> DerivedView {
        derive_view(&self.data, &self.dates, snapshot)
    }

    /// Route an event to its control; recompute if the control reports a change.
    pub fn dispatch(&mut self, event: ControlEvent) -> Option<Change> {
        let change = self.controls.apply(event)?;
        self.on_change(change);
        Some(change)
    }

    /// Least-squares reference line for a segment on the selected signal.
    pub fn reference_fit(&self, segment: Segment) -> Option<LineFit> {
        segment_fit(&self.data.observations, segment, self.controls.signal().value())
    }

    /// Move a segment's sliders to its reference fit (clamped by the sliders).
    pub fn snap_to_fit(&mut self, segment: Segment) -> Vec<Change> {
        let Some(fit) = self.reference_fit(segment) else {
            return Vec::new();
        };
        [
            ControlEvent::SetSlope(segment, fit.slope),
            ControlEvent::SetIntercept(segment, fit.intercept),
        ]
        .into_iter()
        .filter_map(|event| self.dispatch(event))
        .collect()
    }

    fn on_change(&mut self, change: Change) {
        // Take the changed value from the notification, the other five from the controls.
        let mut snapshot = self.controls.snapshot();
        match change {
            Change::Slope(Segment::First, v) => snapshot.first.slope = v,
            Change::Slope(Segment::Last, v) => snapshot.last.slope = v,
            Change::Intercept(Segment::First, v) => snapshot.first.intercept = v,
            Change::Intercept(Segment::Last, v) => snapshot.last.intercept = v,
            Change::Signal(v) => snapshot.signal = v,
            Change::Range(v) => snapshot.range = v,
        }
        self.update(&snapshot);
    }

    fn update(&mut self, snapshot: &ViewSnapshot) {
        debug!(?snapshot, "recomputing view");
        let view = derive_view(&self.data, &self.dates, snapshot);

        self.surface
            .set_trace_data(OBSERVATION_TRACE, self.dates.clone(), view.observed);
        self.surface
            .set_trace_data(Segment::First.trace_index(), self.dates.clone(), view.first);
        self.surface
            .set_trace_data(Segment::Last.trace_index(), self.dates.clone(), view.last);
        self.surface.set_visibility(view.visibility);
        self.surface.set_axis_ranges(view.axes);
        self.surface.set_title(view.title);
    }
}

fn derive_view(data: &IngestedData, dates: &[f64], snapshot: &ViewSnapshot) -> DerivedView {
    DerivedView {
        observed: observed_series(data, snapshot.signal),
        first: trend_series(snapshot.first.slope, snapshot.first.intercept, dates),
        last: trend_series(snapshot.last.slope, snapshot.last.intercept, dates),
        title: title_lines(snapshot),
        visibility: policy::visibility(snapshot.range),
        axes: policy::axis_ranges(snapshot.range),
    }
}

fn observed_series(data: &IngestedData, signal: SignalType) -> Vec<f64> {
    data.observations.iter().map(|o| o.value(signal)).collect()
}

/// Two-line title with each segment's extrapolated prediction.
pub fn title_lines(snapshot: &ViewSnapshot) -> Vec<String> {
    Segment::ALL
        .into_iter()
        .map(|segment| {
            let p = snapshot.params(segment);
            let predicted = predict(p.slope, p.intercept, PREDICTION_REFERENCE_YEAR, PREDICTION_TARGET_YEAR);
            format!(
                "Predicted CO2 for {PREDICTION_TARGET_YEAR:.0} (based on linear fit for {} 5 years): \
                 {predicted:.2} ppm.",
                segment.label()
            )
        })
        .collect()
}
