use std::collections::BTreeMap;
use std::fmt;

use super::model::{columns, CellValue, RecordTable};

/// Label of the "no filter" entry at the head of every option list.
pub const ALL_LABEL: &str = "Todos";

// ---------------------------------------------------------------------------
// Filterable fields
// ---------------------------------------------------------------------------

/// The four categorical fields exposed in the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    Year,
    Month,
    Nationality1,
    Nationality2,
}

impl FilterField {
    /// Panel order.
    pub const ALL: [FilterField; 4] = [
        FilterField::Year,
        FilterField::Month,
        FilterField::Nationality1,
        FilterField::Nationality2,
    ];

    pub fn column(self) -> &'static str {
        match self {
            FilterField::Year => columns::YEAR,
            FilterField::Month => columns::MONTH,
            FilterField::Nationality1 => columns::NATIONALITY_1,
            FilterField::Nationality2 => columns::NATIONALITY_2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterField::Year => "Año",
            FilterField::Month => "Mes",
            FilterField::Nationality1 => "Nacionalidad Contrayente 1",
            FilterField::Nationality2 => "Nacionalidad Contrayente 2",
        }
    }
}

// ---------------------------------------------------------------------------
// Selection state
// ---------------------------------------------------------------------------

/// What the user picked for one field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Value(CellValue),
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "{ALL_LABEL}"),
            Selection::Value(v) => write!(f, "{v}"),
        }
    }
}

/// Field → selected value. Absent fields are unfiltered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    selected: BTreeMap<FilterField, CellValue>,
}

impl FilterState {
    /// Overwrite one field's selection. Setting the same value twice is a no-op.
    pub fn set(&mut self, field: FilterField, selection: Selection) {
        match selection {
            Selection::All => {
                self.selected.remove(&field);
            }
            Selection::Value(v) => {
                self.selected.insert(field, v);
            }
        }
    }

    pub fn selection(&self, field: FilterField) -> Selection {
        self.selected
            .get(&field)
            .cloned()
            .map(Selection::Value)
            .unwrap_or_default()
    }

    /// Fields currently constraining the view.
    pub fn active(&self) -> impl Iterator<Item = (FilterField, &CellValue)> {
        self.selected.iter().map(|(f, v)| (*f, v))
    }

    pub fn is_unfiltered(&self) -> bool {
        self.selected.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Option lists
// ---------------------------------------------------------------------------

/// Selectable values per field, taken from the full table, never the filtered view.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    options: BTreeMap<FilterField, Vec<CellValue>>,
}

impl FilterOptions {
    pub fn from_table(table: &RecordTable) -> Self {
        let options = FilterField::ALL
            .iter()
            .map(|&field| {
                let values = table.unique_values(field.column()).into_iter().collect();
                (field, values)
            })
            .collect();
        FilterOptions { options }
    }

    /// The sentinel followed by every distinct value, ascending.
    pub fn choices(&self, field: FilterField) -> Vec<Selection> {
        std::iter::once(Selection::All)
            .chain(
                self.options
                    .get(&field)
                    .into_iter()
                    .flatten()
                    .cloned()
                    .map(Selection::Value),
            )
            .collect()
    }

    pub fn contains(&self, field: FilterField, selection: &Selection) -> bool {
        match selection {
            Selection::All => true,
            Selection::Value(v) => self
                .options
                .get(&field)
                .is_some_and(|vals| vals.binary_search(v).is_ok()),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Return indices of rows that pass every active filter, in table order.
///
/// Pure: the same table and state always give the same rows. An empty
/// result is a valid view.
pub fn filtered_indices(table: &RecordTable, filters: &FilterState) -> Vec<usize> {
    let predicates: Vec<(Option<usize>, &CellValue)> = filters
        .active()
        .map(|(field, value)| (table.column_index(field.column()), value))
        .collect();

    (0..table.len())
        .filter(|&row| {
            predicates
                .iter()
                .all(|&(col, value)| table.cell(row, col) == value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::test_support::table;

    fn sample() -> RecordTable {
        table(
            &["anio_insc", "mes_insc", "nac_1", "nac_2"],
            &[
                &["2021", "Enero", "Ecuador", "Ecuador"],
                &["2021", "Febrero", "Colombia", "Ecuador"],
                &["2022", "Enero", "Ecuador", "Venezuela"],
                &["2022", "Marzo", "Ecuador", "Ecuador"],
            ],
        )
    }

    #[test]
    fn unfiltered_view_is_whole_table() {
        let t = sample();
        let state = FilterState::default();
        assert!(state.is_unfiltered());
        assert_eq!(filtered_indices(&t, &state), vec![0, 1, 2, 3]);
    }

    #[test]
    fn single_filter_rows_match_selection() {
        let t = sample();
        let mut state = FilterState::default();
        state.set(FilterField::Month, Selection::Value("Enero".into()));
        let rows = filtered_indices(&t, &state);
        assert_eq!(rows, vec![0, 2]);
        let col = t.column_index(columns::MONTH);
        assert!(rows.iter().all(|&r| t.cell(r, col) == &CellValue::from("Enero")));
    }

    #[test]
    fn filter_order_does_not_matter() {
        let t = sample();
        let mut a = FilterState::default();
        a.set(FilterField::Year, Selection::Value(CellValue::Integer(2022)));
        a.set(FilterField::Nationality1, Selection::Value("Ecuador".into()));
        let mut b = FilterState::default();
        b.set(FilterField::Nationality1, Selection::Value("Ecuador".into()));
        b.set(FilterField::Year, Selection::Value(CellValue::Integer(2022)));
        assert_eq!(a, b);
        assert_eq!(filtered_indices(&t, &a), vec![2, 3]);
        assert_eq!(filtered_indices(&t, &a), filtered_indices(&t, &b));
    }

    #[test]
    fn no_match_gives_empty_view() {
        let t = sample();
        let mut state = FilterState::default();
        state.set(FilterField::Year, Selection::Value(CellValue::Integer(1999)));
        assert!(filtered_indices(&t, &state).is_empty());
    }

    #[test]
    fn selecting_all_clears_the_field() {
        let mut state = FilterState::default();
        state.set(FilterField::Year, Selection::Value(CellValue::Integer(2021)));
        state.set(FilterField::Year, Selection::All);
        assert!(state.is_unfiltered());
        assert_eq!(state.selection(FilterField::Year), Selection::All);
    }

    #[test]
    fn options_come_from_full_table_with_sentinel_first() {
        let t = sample();
        let opts = FilterOptions::from_table(&t);
        let years = opts.choices(FilterField::Year);
        assert_eq!(
            years,
            vec![
                Selection::All,
                Selection::Value(CellValue::Integer(2021)),
                Selection::Value(CellValue::Integer(2022)),
            ]
        );
        assert_eq!(years[0].to_string(), ALL_LABEL);
        assert!(opts.contains(FilterField::Month, &Selection::Value("Marzo".into())));
        assert!(!opts.contains(FilterField::Month, &Selection::Value("Abril".into())));
    }

    #[test]
    fn empty_table_has_only_sentinel() {
        let t = table(&["anio_insc"], &[]);
        let opts = FilterOptions::from_table(&t);
        assert_eq!(opts.choices(FilterField::Nationality2), vec![Selection::All]);
    }
}
