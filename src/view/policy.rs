//! Which segment controls are shown, and which axis window applies, for each
//! time-range selection.

use serde::Serialize;

use crate::domain::{AxisRanges, Segment, TimeRange};

/// The per-segment widgets whose visibility follows the time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    SlopeSlider,
    SlopeLabel,
    SlopeReadout,
    InterceptSlider,
    InterceptLabel,
    InterceptReadout,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 6] = [
        WidgetKind::SlopeSlider,
        WidgetKind::SlopeLabel,
        WidgetKind::SlopeReadout,
        WidgetKind::InterceptSlider,
        WidgetKind::InterceptLabel,
        WidgetKind::InterceptReadout,
    ];
}

/// One segment control (e.g. the first-segment slope slider).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SegmentWidget {
    pub segment: Segment,
    pub kind: WidgetKind,
}

/// All twelve segment controls, first segment first.
pub fn segment_widgets() -> impl Iterator<Item = SegmentWidget> {
    Segment::ALL
        .into_iter()
        .flat_map(|segment| WidgetKind::ALL.into_iter().map(move |kind| SegmentWidget { segment, kind }))
}

/// Shown/hidden partition of the segment controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visibility {
    pub shown: Vec<SegmentWidget>,
    pub hidden: Vec<SegmentWidget>,
}

impl Visibility {
    pub fn is_shown(&self, segment: Segment) -> bool {
        self.shown.iter().any(|w| w.segment == segment)
    }
}

/// Whether a segment's controls are visible under `range`.
pub fn segment_visible(range: TimeRange, segment: Segment) -> bool {
    matches!(
        (range, segment),
        (TimeRange::AllData, _) | (TimeRange::First5Years, Segment::First) | (TimeRange::Last5Years, Segment::Last)
    )
}

pub fn visibility(range: TimeRange) -> Visibility {
    let (shown, hidden) = segment_widgets().partition(|w| segment_visible(range, w.segment));
    Visibility { shown, hidden }
}

pub fn axis_ranges(range: TimeRange) -> AxisRanges {
    match range {
        TimeRange::First5Years => AxisRanges {
            x: [1958.0, 1963.0],
            y: [312.0, 322.0],
        },
        TimeRange::Last5Years => AxisRanges {
            x: [2015.0, 2020.0],
            y: [395.0, 415.0],
        },
        TimeRange::AllData => AxisRanges {
            x: [1955.0, 2023.0],
            y: [310.0, 440.0],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_range_shows_its_segment_controls() {
        let first = visibility(TimeRange::First5Years);
        assert_eq!(first.shown.len(), 6);
        assert!(first.shown.iter().all(|w| w.segment == Segment::First));
        assert!(first.hidden.iter().all(|w| w.segment == Segment::Last));

        let last = visibility(TimeRange::Last5Years);
        assert_eq!(last.shown.len(), 6);
        assert!(last.shown.iter().all(|w| w.segment == Segment::Last));

        let all = visibility(TimeRange::AllData);
        assert_eq!(all.shown.len(), 12);
        assert!(all.hidden.is_empty());
    }

    #[test]
    fn never_hides_both_segments() {
        for range in TimeRange::ALL {
            let v = visibility(range);
            assert_eq!(v.shown.len() + v.hidden.len(), 12);
            assert!(Segment::ALL.iter().any(|&s| v.is_shown(s)), "{range:?}");
        }
    }

    #[test]
    fn axis_table() {
        assert_eq!(
            axis_ranges(TimeRange::First5Years),
            AxisRanges {
                x: [1958.0, 1963.0],
                y: [312.0, 322.0]
            }
        );
        assert_eq!(
            axis_ranges(TimeRange::Last5Years),
            AxisRanges {
                x: [2015.0, 2020.0],
                y: [395.0, 415.0]
            }
        );
        assert_eq!(
            axis_ranges(TimeRange::AllData),
            AxisRanges {
                x: [1955.0, 2023.0],
                y: [310.0, 440.0]
            }
        );
    }
}
