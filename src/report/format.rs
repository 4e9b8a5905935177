//! Formatted terminal output.
//!
//! We keep formatting code in one place so the controller stays free of
//! presentation concerns and output changes are localized.

use serde::Serialize;

use crate::domain::{Segment, ViewSnapshot};
use crate::io::DatasetStats;
use crate::math::LineFit;
use crate::view::{Figure, ViewController};

/// Everything `co2 summary --json` prints.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport<'a> {
    pub stats: &'a DatasetStats,
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub row_errors: usize,
    pub controls: ViewSnapshot,
    pub reference_fits: Vec<SegmentFit>,
    pub figure: &'a Figure,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentFit {
    pub segment: Segment,
    pub fit: Option<LineFit>,
}

pub fn summary_report(controller: &ViewController<Figure>) -> SummaryReport<'_> {
    let data = controller.data();
    SummaryReport {
        stats: &data.stats,
        rows_read: data.rows_read,
        rows_dropped: data.rows_dropped,
        row_errors: data.row_errors.len(),
        controls: controller.snapshot(),
        reference_fits: Segment::ALL
            .into_iter()
            .map(|segment| SegmentFit {
                segment,
                fit: controller.reference_fit(segment),
            })
            .collect(),
        figure: controller.surface(),
    }
}

/// Format the dataset summary, current controls, title and reference fits.
pub fn format_summary(controller: &ViewController<Figure>) -> String {
    let data = controller.data();
    let stats = &data.stats;
    let snap = controller.snapshot();
    let mut out = String::new();

    out.push_str("=== co2 - Mauna Loa CO2 trend lines ===\n");
    out.push_str(&format!(
        "Record: n={} | {} .. {} | date=[{:.4}, {:.4}]\n",
        stats.n_points,
        stats.first_month.format("%Y-%m"),
        stats.last_month.format("%Y-%m"),
        stats.date_min,
        stats.date_max,
    ));
    out.push_str(&format!(
        "Raw: [{:.2}, {:.2}] ppm | Seasonally adjusted: [{:.2}, {:.2}] ppm\n",
        stats.raw_min, stats.raw_max, stats.adjusted_min, stats.adjusted_max,
    ));
    out.push_str(&format!(
        "Rows: read={} dropped(missing)={} errors={}\n",
        data.rows_read,
        data.rows_dropped,
        data.row_errors.len(),
    ));

    out.push_str("\nControls:\n");
    out.push_str(&format!("- signal: {}\n", snap.signal.display_name()));
    out.push_str(&format!("- years : {}\n", snap.range.display_name()));
    for segment in Segment::ALL {
        let p = snap.params(segment);
        out.push_str(&format!(
            "- {:<5} slope={:.2} intercept={:.2}\n",
            segment.label(),
            p.slope,
            p.intercept
        ));
    }

    out.push('\n');
    for line in &controller.surface().title {
        out.push_str(line);
        out.push('\n');
    }

    out.push_str("\nLeast-squares reference (");
    out.push_str(snap.signal.display_name());
    out.push_str("):\n");
    for segment in Segment::ALL {
        out.push_str(&format!("- {:<5} {}\n", segment.label(), fmt_fit(controller.reference_fit(segment))));
    }

    out
}

fn fmt_fit(fit: Option<LineFit>) -> String {
    match fit {
        Some(f) => format!(
            "slope={:.3} intercept={:.3} rmse={:.3} ppm (n={})",
            f.slope, f.intercept, f.rmse, f.n
        ),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::Controls;
    use crate::domain::MISSING_SENTINEL;
    use crate::io::ingest::tests::{ROWS, fixture};
    use crate::io::parse_observations;

    fn controller() -> ViewController<Figure> {
        let data = parse_observations(&fixture(&ROWS), 3, MISSING_SENTINEL).unwrap();
        ViewController::new(data, Controls::default(), Figure::new())
    }

    #[test]
    fn summary_lists_record_controls_and_title() {
        let txt = format_summary(&controller());
        assert!(txt.contains("Record: n=3 | 1958-03 .. 1958-05"));
        assert!(txt.contains("Rows: read=5 dropped(missing)=2 errors=0"));
        assert!(txt.contains("- signal: Seasonally adjusted data"));
        assert!(txt.contains("- first slope=2.00 intercept=312.00"));
        assert!(txt.contains("(based on linear fit for first 5 years): 456.00 ppm."));
    }

    #[test]
    fn json_report_serializes() {
        let c = controller();
        let value = serde_json::to_value(summary_report(&c)).unwrap();
        assert_eq!(value["stats"]["n_points"], 3);
        assert_eq!(value["controls"]["range"], "first_5_years");
        assert_eq!(value["figure"]["traces"].as_array().unwrap().len(), 3);
        assert_eq!(value["reference_fits"][0]["segment"], "first");
    }
}
