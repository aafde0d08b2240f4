use std::f64::consts::TAU;

use crate::data::aggregate::{Counts, CrossTab, PairedCounts, Report};

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    /// One value per category, 0 where the series has no such label.
    pub values: Vec<f64>,
}

/// Grouped bars: each category gets one bar per series, side by side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarChartSpec {
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
    pub orientation: Orientation,
    pub category_axis: String,
    pub value_axis: String,
}

/// Share of a category slot taken by its group of bars.
const GROUP_WIDTH: f64 = 0.8;

impl BarChartSpec {
    /// Two independent counts on a shared category axis. Categories follow
    /// the first series' order, then labels only the second series has.
    pub fn paired(
        counts: &PairedCounts,
        names: [&str; 2],
        orientation: Orientation,
        category_axis: &str,
        value_axis: &str,
    ) -> Self {
        let mut categories: Vec<String> = Vec::new();
        for label in counts.first.labels().chain(counts.second.labels()) {
            let label = label.to_string();
            if !categories.contains(&label) {
                categories.push(label);
            }
        }

        let series = [(&counts.first, names[0]), (&counts.second, names[1])]
            .into_iter()
            .map(|(c, name)| BarSeries {
                name: name.to_string(),
                values: aligned(c, &categories),
            })
            .collect();

        BarChartSpec {
            categories,
            series,
            orientation,
            category_axis: category_axis.to_string(),
            value_axis: value_axis.to_string(),
        }
    }

    /// One category per row label, one series per column label.
    pub fn from_cross_tab(tab: &CrossTab, category_axis: &str, value_axis: &str) -> Self {
        let series = tab
            .col_labels
            .iter()
            .enumerate()
            .map(|(i, label)| BarSeries {
                name: label.to_string(),
                values: tab.column_values(i).map(|n| n as f64).collect(),
            })
            .collect();

        BarChartSpec {
            categories: tab.row_labels.iter().map(|l| l.to_string()).collect(),
            series,
            orientation: Orientation::Vertical,
            category_axis: category_axis.to_string(),
            value_axis: value_axis.to_string(),
        }
    }

    pub fn bar_width(&self) -> f64 {
        GROUP_WIDTH / self.series.len().max(1) as f64
    }

    /// Position of series `index`'s bar within category `category`.
    pub fn bar_position(&self, category: usize, index: usize) -> f64 {
        let width = self.bar_width();
        category as f64 - GROUP_WIDTH / 2.0 + width * (index as f64 + 0.5)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Category shown at an axis position, if the position is one.
pub fn category_at(categories: &[String], position: f64) -> Option<&str> {
    let rounded = position.round();
    if (position - rounded).abs() > 1e-6 || rounded < 0.0 {
        return None;
    }
    categories.get(rounded as usize).map(String::as_str)
}

fn aligned(counts: &Counts, categories: &[String]) -> Vec<f64> {
    let mut values = vec![0.0; categories.len()];
    for (label, n) in counts.entries() {
        let label = label.to_string();
        if let Some(i) = categories.iter().position(|c| *c == label) {
            values[i] = *n as f64;
        }
    }
    values
}

// ---------------------------------------------------------------------------
// Pie charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub fraction: f64,
    /// Radians, counter-clockwise from the positive x axis.
    pub start: f64,
    pub sweep: f64,
}

impl PieSlice {
    /// Share of the total as shown on the slice, one decimal.
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.fraction * 100.0)
    }

    pub fn mid_angle(&self) -> f64 {
        self.start + self.sweep / 2.0
    }

    /// Outline of the wedge on the unit circle, centre first.
    pub fn outline(&self, segments_per_turn: usize) -> Vec<[f64; 2]> {
        let steps = ((self.sweep / TAU) * segments_per_turn as f64).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(steps + 2);
        points.push([0.0, 0.0]);
        for i in 0..=steps {
            let a = self.start + self.sweep * i as f64 / steps as f64;
            points.push([a.cos(), a.sin()]);
        }
        points
    }
}

/// Slices laid out counter-clockwise from `start_angle_deg`. Without data
/// there are no slices and the chart draws a placeholder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PieChartSpec {
    pub slices: Vec<PieSlice>,
}

impl PieChartSpec {
    pub fn from_counts(counts: &Counts, start_angle_deg: f64) -> Self {
        let total = counts.total();
        if total == 0 {
            return PieChartSpec { slices: Vec::new() };
        }

        let mut angle = start_angle_deg.to_radians();
        let slices = counts
            .entries()
            .iter()
            .map(|(label, n)| {
                let fraction = *n as f64 / total as f64;
                let slice = PieSlice {
                    label: label.to_string(),
                    count: *n,
                    fraction,
                    start: angle,
                    sweep: fraction * TAU,
                };
                angle += slice.sweep;
                slice
            })
            .collect();

        PieChartSpec { slices }
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

// ---------------------------------------------------------------------------
// The dashboard's charts, in panel order
// ---------------------------------------------------------------------------

pub const PARTY_1: &str = "Contrayente 1";
pub const PARTY_2: &str = "Contrayente 2";
const COUNT_AXIS: &str = "Cantidad";

#[derive(Debug, Clone, PartialEq)]
pub struct ProvincePie {
    pub title: String,
    pub pie: PieChartSpec,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSet {
    pub civil_status: BarChartSpec,
    pub education: BarChartSpec,
    pub top_provinces: PieChartSpec,
    pub divorced_single: BarChartSpec,
    pub province_pies: Vec<ProvincePie>,
}

impl ChartSet {
    pub fn from_report(report: &Report) -> Self {
        ChartSet {
            civil_status: BarChartSpec::paired(
                &report.civil_status,
                [PARTY_1, PARTY_2],
                Orientation::Vertical,
                "Estado Civil",
                COUNT_AXIS,
            ),
            education: BarChartSpec::paired(
                &report.education,
                [PARTY_1, PARTY_2],
                Orientation::Horizontal,
                "Nivel de Instrucción",
                COUNT_AXIS,
            ),
            top_provinces: PieChartSpec::from_counts(&report.top_provinces.counts, 140.0),
            divorced_single: BarChartSpec::from_cross_tab(
                &report.divorced_single,
                "Provincia",
                COUNT_AXIS,
            ),
            province_pies: report
                .province_breakdowns
                .iter()
                .map(|b| ProvincePie {
                    title: format!(
                        "Estado Civil de Contrayentes Divorciados y Solteros en {}",
                        b.province
                    ),
                    pie: PieChartSpec::from_counts(&b.counts, 90.0),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::{cross_tab, value_counts, ReportSettings};
    use crate::data::model::test_support::table;

    fn counts(values: &[&str]) -> Counts {
        let rows: Vec<[&str; 1]> = values.iter().map(|v| [*v]).collect();
        let refs: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
        let t = table(&["c"], &refs);
        value_counts(&t, &(0..t.len()).collect::<Vec<_>>(), "c")
    }

    #[test]
    fn paired_bars_share_category_axis() {
        let paired = PairedCounts {
            first: counts(&["Soltero", "Soltero", "Casado"]),
            second: counts(&["Soltera", "Casado", "Casado", "Casado"]),
        };
        let spec = BarChartSpec::paired(
            &paired,
            ["Contrayente 1", "Contrayente 2"],
            Orientation::Vertical,
            "Estado Civil",
            "Cantidad",
        );
        assert_eq!(spec.categories, vec!["Soltero", "Casado", "Soltera"]);
        assert_eq!(spec.series[0].values, vec![2.0, 1.0, 0.0]);
        assert_eq!(spec.series[1].values, vec![0.0, 3.0, 1.0]);
    }

    #[test]
    fn bars_sit_side_by_side_within_category() {
        let paired = PairedCounts {
            first: counts(&["a"]),
            second: counts(&["a"]),
        };
        let spec = BarChartSpec::paired(&paired, ["1", "2"], Orientation::Horizontal, "", "");
        assert!((spec.bar_width() - 0.4).abs() < 1e-9);
        assert!((spec.bar_position(0, 0) + 0.2).abs() < 1e-9);
        assert!((spec.bar_position(0, 1) - 0.2).abs() < 1e-9);
        assert_eq!(category_at(&spec.categories, 0.0), Some("a"));
        assert_eq!(category_at(&spec.categories, 0.5), None);
        assert_eq!(category_at(&spec.categories, 1.0), None);
    }

    #[test]
    fn cross_tab_becomes_one_series_per_status() {
        let t = table(
            &["prov", "civil"],
            &[&["Guayas", "Soltero"], &["Guayas", "Divorciado"], &["Azuay", "Soltero"]],
        );
        let tab = cross_tab(&t, &[0, 1, 2], "prov", "civil");
        let spec = BarChartSpec::from_cross_tab(&tab, "Provincia", "Cantidad");
        assert_eq!(spec.categories, vec!["Azuay", "Guayas"]);
        assert_eq!(spec.series[0].name, "Divorciado");
        assert_eq!(spec.series[0].values, vec![0.0, 1.0]);
        assert_eq!(spec.series[1].values, vec![1.0, 1.0]);
    }

    #[test]
    fn pie_fractions_cover_the_circle() {
        let spec = PieChartSpec::from_counts(&counts(&["a", "a", "a", "b"]), 90.0);
        assert_eq!(spec.slices.len(), 2);
        assert_eq!(spec.slices[0].percent_label(), "75.0%");
        assert_eq!(spec.slices[1].percent_label(), "25.0%");
        assert!((spec.slices[0].start - 90f64.to_radians()).abs() < 1e-9);
        let swept: f64 = spec.slices.iter().map(|s| s.sweep).sum();
        assert!((swept - TAU).abs() < 1e-9);
        let last = &spec.slices[1];
        assert!((last.start - (spec.slices[0].start + spec.slices[0].sweep)).abs() < 1e-9);
    }

    #[test]
    fn empty_counts_make_empty_pie() {
        let spec = PieChartSpec::from_counts(&Counts::default(), 140.0);
        assert!(spec.is_empty());
    }

    #[test]
    fn wedge_outline_starts_at_centre_and_stays_on_circle() {
        let spec = PieChartSpec::from_counts(&counts(&["a"]), 0.0);
        let outline = spec.slices[0].outline(64);
        assert_eq!(outline[0], [0.0, 0.0]);
        assert_eq!(outline.len(), 66);
        for p in &outline[1..] {
            assert!(((p[0] * p[0] + p[1] * p[1]).sqrt() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn chart_set_follows_report() {
        let t = table(
            &["prov_insc", "est_civi1", "est_civi2", "niv_inst1", "niv_inst2"],
            &[
                &["Guayas", "Soltero", "Soltera", "Superior", "Primaria"],
                &["Guayas", "Divorciado", "Soltera", "Superior", "Superior"],
                &["Pichincha", "Soltero", "Casada", "Primaria", "Superior"],
            ],
        );
        let report = Report::build(&t, &[0, 1, 2], &ReportSettings::default());
        let charts = ChartSet::from_report(&report);
        assert_eq!(charts.civil_status.series[0].name, PARTY_1);
        assert_eq!(charts.education.orientation, Orientation::Horizontal);
        assert_eq!(charts.top_provinces.slices[0].label, "Guayas");
        assert_eq!(charts.top_provinces.slices[0].percent_label(), "66.7%");
        assert_eq!(charts.province_pies.len(), 2);
        assert!(charts.province_pies[1].title.ends_with("Pichincha"));
        assert_eq!(charts.province_pies[1].pie.slices.len(), 1);
        assert_eq!(charts.province_pies[1].pie.slices[0].percent_label(), "100.0%");
    }

    #[test]
    fn empty_report_gives_empty_charts() {
        let charts = ChartSet::from_report(&Report {
            province_breakdowns: Vec::new(),
            ..Default::default()
        });
        assert!(charts.civil_status.is_empty());
        assert!(charts.education.is_empty());
        assert!(charts.top_provinces.is_empty());
        assert!(charts.divorced_single.is_empty());
        assert_eq!(charts.civil_status.series.len(), 2);
    }
}
