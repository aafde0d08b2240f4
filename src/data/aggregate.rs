use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::model::{columns, CellValue, RecordTable};

/// Civil-status labels kept by the divorced/single breakdowns.
pub const DIVORCED: &str = "Divorciado";
pub const SINGLE: &str = "Soltero";

// ---------------------------------------------------------------------------
// Frequency counts
// ---------------------------------------------------------------------------

/// Label → count, most frequent first. Ties are ordered by ascending label.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Counts(Vec<(CellValue, usize)>);

impl Counts {
    pub fn entries(&self) -> &[(CellValue, usize)] {
        &self.0
    }

    pub fn get(&self, label: &CellValue) -> usize {
        self.0
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn labels(&self) -> impl Iterator<Item = &CellValue> {
        self.0.iter().map(|(l, _)| l)
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, n)| n).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Count the non-null values of `column` over `rows`.
pub fn value_counts(table: &RecordTable, rows: &[usize], column: &str) -> Counts {
    let col = table.column_index(column);
    let mut tally: HashMap<&CellValue, usize> = HashMap::new();
    for &row in rows {
        let value = table.cell(row, col);
        if !value.is_null() {
            *tally.entry(value).or_default() += 1;
        }
    }

    let mut entries: Vec<(CellValue, usize)> = tally
        .into_iter()
        .map(|(label, n)| (label.clone(), n))
        .collect();
    entries.sort_by(|(la, na), (lb, nb)| nb.cmp(na).then_with(|| la.cmp(lb)));
    Counts(entries)
}

/// Rows whose `column` value is one of `values`, in view order.
pub fn restrict(
    table: &RecordTable,
    rows: &[usize],
    column: &str,
    values: &[CellValue],
) -> Vec<usize> {
    let col = table.column_index(column);
    rows.iter()
        .copied()
        .filter(|&row| values.contains(table.cell(row, col)))
        .collect()
}

/// Two independent counts meant to be drawn side by side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PairedCounts {
    pub first: Counts,
    pub second: Counts,
}

impl PairedCounts {
    pub fn new(table: &RecordTable, rows: &[usize], first: &str, second: &str) -> Self {
        PairedCounts {
            first: value_counts(table, rows, first),
            second: value_counts(table, rows, second),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-k
// ---------------------------------------------------------------------------

/// The `k` most frequent labels and the rows that carry them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopCategories {
    pub counts: Counts,
    pub rows: Vec<usize>,
}

pub fn top_k(table: &RecordTable, rows: &[usize], column: &str, k: usize) -> TopCategories {
    let leaders: Vec<CellValue> = value_counts(table, rows, column)
        .labels()
        .take(k)
        .cloned()
        .collect();
    let rows = restrict(table, rows, column, &leaders);
    TopCategories {
        counts: value_counts(table, &rows, column),
        rows,
    }
}

// ---------------------------------------------------------------------------
// Cross-tabulation
// ---------------------------------------------------------------------------

/// Counts over (row label, column label) with every combination present;
/// combinations never observed hold 0. Labels are sorted ascending.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CrossTab {
    pub row_labels: Vec<CellValue>,
    pub col_labels: Vec<CellValue>,
    cells: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn get(&self, row: &CellValue, col: &CellValue) -> usize {
        let r = self.row_labels.binary_search(row);
        let c = self.col_labels.binary_search(col);
        match (r, c) {
            (Ok(r), Ok(c)) => self.cells[r][c],
            _ => 0,
        }
    }

    /// Counts of one column label across all row labels, in row-label order.
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = usize> + '_ {
        self.cells.iter().map(move |row| row[col])
    }

    pub fn total(&self) -> usize {
        self.cells.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }
}

/// Rows with a null in either column are left out.
pub fn cross_tab(table: &RecordTable, rows: &[usize], row_column: &str, col_column: &str) -> CrossTab {
    let rc = table.column_index(row_column);
    let cc = table.column_index(col_column);

    let mut tally: BTreeMap<(&CellValue, &CellValue), usize> = BTreeMap::new();
    let mut row_labels = BTreeSet::new();
    let mut col_labels = BTreeSet::new();
    for &row in rows {
        let (r, c) = (table.cell(row, rc), table.cell(row, cc));
        if r.is_null() || c.is_null() {
            continue;
        }
        row_labels.insert(r);
        col_labels.insert(c);
        *tally.entry((r, c)).or_default() += 1;
    }

    let cells = row_labels
        .iter()
        .map(|r| {
            col_labels
                .iter()
                .map(|c| tally.get(&(*r, *c)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    CrossTab {
        row_labels: row_labels.into_iter().cloned().collect(),
        col_labels: col_labels.into_iter().cloned().collect(),
        cells,
    }
}

// ---------------------------------------------------------------------------
// Report: every aggregation the dashboard draws
// ---------------------------------------------------------------------------

/// Tunables of the report. Defaults match the published dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub top_provinces: usize,
    pub focus_provinces: Vec<String>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_provinces: 5,
            focus_provinces: vec!["Guayas".to_string(), "Pichincha".to_string()],
        }
    }
}

/// Divorced/single counts of party 1 within one province.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceBreakdown {
    pub province: String,
    pub counts: Counts,
}

/// All aggregations over one filtered view. Rebuilt from scratch on every
/// filter change; never patched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    pub rows: usize,
    pub civil_status: PairedCounts,
    pub education: PairedCounts,
    pub top_provinces: TopCategories,
    pub divorced_single: CrossTab,
    pub province_breakdowns: Vec<ProvinceBreakdown>,
}

impl Report {
    pub fn build(table: &RecordTable, rows: &[usize], settings: &ReportSettings) -> Self {
        let civil_status = PairedCounts::new(
            table,
            rows,
            columns::CIVIL_STATUS_1,
            columns::CIVIL_STATUS_2,
        );
        let education =
            PairedCounts::new(table, rows, columns::EDUCATION_1, columns::EDUCATION_2);
        let top_provinces = top_k(table, rows, columns::PROVINCE, settings.top_provinces);

        let divorced_single_rows = restrict(
            table,
            rows,
            columns::CIVIL_STATUS_1,
            &[CellValue::from(DIVORCED), CellValue::from(SINGLE)],
        );
        let divorced_single = cross_tab(
            table,
            &divorced_single_rows,
            columns::PROVINCE,
            columns::CIVIL_STATUS_1,
        );

        let province_breakdowns = settings
            .focus_provinces
            .iter()
            .map(|province| {
                let in_province = restrict(
                    table,
                    &divorced_single_rows,
                    columns::PROVINCE,
                    &[CellValue::from(province.as_str())],
                );
                ProvinceBreakdown {
                    province: province.clone(),
                    counts: value_counts(table, &in_province, columns::CIVIL_STATUS_1),
                }
            })
            .collect();

        Report {
            rows: rows.len(),
            civil_status,
            education,
            top_provinces,
            divorced_single,
            province_breakdowns,
        }
    }
}
