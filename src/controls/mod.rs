//! The six interactive controls and the events that address them.

pub mod slider;

pub use slider::*;

use crate::domain::{
    INTERCEPT_BOUNDS, INTERCEPT_STEP, SLOPE_BOUNDS, SLOPE_STEP, Segment, SignalType, TimeRange, TrendParams,
    ViewSnapshot,
};

/// Identifies one of the six interactive controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    Slope(Segment),
    Intercept(Segment),
    Signal,
    Range,
}

impl ControlId {
    /// Focus order in the settings panel.
    pub const ALL: [ControlId; 6] = [
        ControlId::Slope(Segment::First),
        ControlId::Intercept(Segment::First),
        ControlId::Slope(Segment::Last),
        ControlId::Intercept(Segment::Last),
        ControlId::Signal,
        ControlId::Range,
    ];

    /// Segment the control belongs to (`None` for the two selectors).
    pub fn segment(self) -> Option<Segment> {
        match self {
            ControlId::Slope(s) | ControlId::Intercept(s) => Some(s),
            ControlId::Signal | ControlId::Range => None,
        }
    }

    pub fn label(self) -> String {
        match self {
            ControlId::Slope(s) => format!("Slope (for {} 5 years):", s.label()),
            ControlId::Intercept(s) => format!("Intercept (for {} 5 years):", s.label()),
            ControlId::Signal => "Signal type:".to_string(),
            ControlId::Range => "Years:".to_string(),
        }
    }
}

/// A user interaction addressed to one control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    SetSlope(Segment, f64),
    SetIntercept(Segment, f64),
    SetSignal(SignalType),
    SetRange(TimeRange),
    /// Move a slider by whole steps, or a selector by whole options.
    Nudge(ControlId, i32),
}

/// "Value changed" notification emitted by a control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Change {
    Slope(Segment, f64),
    Intercept(Segment, f64),
    Signal(SignalType),
    Range(TimeRange),
}

/// Current state of every control.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    slope_first: Slider,
    slope_last: Slider,
    intercept_first: Slider,
    intercept_last: Slider,
    signal: RadioGroup<SignalType>,
    range: RadioGroup<TimeRange>,
}

impl Controls {
    pub fn new(initial: ViewSnapshot) -> Self {
        Self {
            slope_first: Slider::new(SLOPE_BOUNDS, SLOPE_STEP, initial.first.slope),
            slope_last: Slider::new(SLOPE_BOUNDS, SLOPE_STEP, initial.last.slope),
            intercept_first: Slider::new(INTERCEPT_BOUNDS, INTERCEPT_STEP, initial.first.intercept),
            intercept_last: Slider::new(INTERCEPT_BOUNDS, INTERCEPT_STEP, initial.last.intercept),
            signal: RadioGroup::new(&SignalType::ALL, initial.signal),
            range: RadioGroup::new(&TimeRange::ALL, initial.range),
        }
    }

    pub fn slope(&self, segment: Segment) -> &Slider {
        match segment {
            Segment::First => &self.slope_first,
            Segment::Last => &self.slope_last,
        }
    }

    pub fn intercept(&self, segment: Segment) -> &Slider {
        match segment {
            Segment::First => &self.intercept_first,
            Segment::Last => &self.intercept_last,
        }
    }

    pub fn signal(&self) -> &RadioGroup<SignalType> {
        &self.signal
    }

    pub fn range(&self) -> &RadioGroup<TimeRange> {
        &self.range
    }

    fn slope_mut(&mut self, segment: Segment) -> &mut Slider {
        match segment {
            Segment::First => &mut self.slope_first,
            Segment::Last => &mut self.slope_last,
        }
    }

    fn intercept_mut(&mut self, segment: Segment) -> &mut Slider {
        match segment {
            Segment::First => &mut self.intercept_first,
            Segment::Last => &mut self.intercept_last,
        }
    }

    /// Read all six current values.
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            first: TrendParams {
                slope: self.slope_first.value(),
                intercept: self.intercept_first.value(),
            },
            last: TrendParams {
                slope: self.slope_last.value(),
                intercept: self.intercept_last.value(),
            },
            signal: self.signal.value(),
            range: self.range.value(),
        }
    }

    /// Apply an event to the addressed control.
    ///
    /// Returns the control's change notification, or `None` when the value
    /// did not move (already at a bound, same option, off-grid jitter).
    pub fn apply(&mut self, event: ControlEvent) -> Option<Change> {
        match event {
            ControlEvent::SetSlope(s, v) => self.slope_mut(s).set(v).map(|v| Change::Slope(s, v)),
            ControlEvent::SetIntercept(s, v) => self.intercept_mut(s).set(v).map(|v| Change::Intercept(s, v)),
            ControlEvent::SetSignal(v) => self.signal.select(v).map(Change::Signal),
            ControlEvent::SetRange(v) => self.range.select(v).map(Change::Range),
            ControlEvent::Nudge(id, steps) => match id {
                ControlId::Slope(s) => self.slope_mut(s).nudge(steps).map(|v| Change::Slope(s, v)),
                ControlId::Intercept(s) => self.intercept_mut(s).nudge(steps).map(|v| Change::Intercept(s, v)),
                ControlId::Signal => self.signal.cycle(steps).map(Change::Signal),
                ControlId::Range => self.range.cycle(steps).map(Change::Range),
            },
        }
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(ViewSnapshot::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_values_are_clamped() {
        let mut snap = ViewSnapshot::default();
        snap.first.slope = 9.0;
        snap.last.intercept = 100.0;
        let c = Controls::new(snap);
        let got = c.snapshot();
        assert_eq!(got.first.slope, 3.0);
        assert_eq!(got.last.intercept, 250.0);
        assert_eq!(got.signal, SignalType::SeasonallyAdjusted);
        assert_eq!(got.range, TimeRange::First5Years);
    }

    #[test]
    fn apply_emits_change_only_for_addressed_control() {
        let mut c = Controls::default();
        let before = c.snapshot();

        let change = c.apply(ControlEvent::Nudge(ControlId::Slope(Segment::Last), 2));
        assert_eq!(change, Some(Change::Slope(Segment::Last, 1.75)));

        let after = c.snapshot();
        assert_eq!(after.first, before.first);
        assert_eq!(after.last.intercept, before.last.intercept);
        assert_eq!(after.last.slope, 1.75);

        assert_eq!(c.apply(ControlEvent::SetRange(TimeRange::First5Years)), None);
        assert_eq!(
            c.apply(ControlEvent::Nudge(ControlId::Range, 2)),
            Some(Change::Range(TimeRange::AllData))
        );
        assert_eq!(
            c.apply(ControlEvent::Nudge(ControlId::Signal, 1)),
            Some(Change::Signal(SignalType::Raw))
        );
    }

    #[test]
    fn labels_name_their_segment() {
        assert_eq!(ControlId::Slope(Segment::First).label(), "Slope (for first 5 years):");
        assert_eq!(ControlId::Intercept(Segment::Last).label(), "Intercept (for last 5 years):");
        assert_eq!(ControlId::Signal.segment(), None);
    }
}
