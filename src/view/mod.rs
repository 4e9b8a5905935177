//! View state: visibility/axis policy, the plot surface, and the controller
//! that binds the controls to it.

pub mod controller;
pub mod figure;
pub mod policy;

pub use controller::{DerivedView, ViewController, title_lines};
pub use figure::{Figure, PlotSurface, Trace, TraceColor, TraceMode};
pub use policy::{SegmentWidget, Visibility, WidgetKind, axis_ranges, segment_visible, visibility};
