use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

// ---------------------------------------------------------------------------
// Column names of the EMA registration file
// ---------------------------------------------------------------------------

pub mod columns {
    pub const YEAR: &str = "anio_insc";
    pub const MONTH: &str = "mes_insc";
    pub const NATIONALITY_1: &str = "nac_1";
    pub const NATIONALITY_2: &str = "nac_2";
    pub const SEX_1: &str = "sexo_1";
    pub const SEX_2: &str = "sexo_2";
    pub const CIVIL_STATUS_1: &str = "est_civi1";
    pub const CIVIL_STATUS_2: &str = "est_civi2";
    pub const EDUCATION_1: &str = "niv_inst1";
    pub const EDUCATION_2: &str = "niv_inst2";
    pub const PROVINCE: &str = "prov_insc";

    /// Columns the dashboard reads. A source file lacking any of them is malformed.
    pub const REQUIRED: [&str; 11] = [
        YEAR,
        MONTH,
        NATIONALITY_1,
        NATIONALITY_2,
        SEX_1,
        SEX_2,
        CIVIL_STATUS_1,
        CIVIL_STATUS_2,
        EDUCATION_1,
        EDUCATION_2,
        PROVINCE,
    ];
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the record table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a dataframe parser infers.
/// Option lists and counts are keyed by `CellValue`, so it must be `Ord`.
#[derive(Debug, Clone)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

static NULL: CellValue = CellValue::Null;

/// How a missing value reads in option lists and chart labels.
pub const NULL_LABEL: &str = "(vacío)";

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --
// Equality, ordering and hashing all go through `cmp`/`to_bits`, so a float
// equals itself bit for bit. Loaders never produce NaN (see `CellValue::float`).

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn rank(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) | Float(_) => 2,
                String(_) => 3,
            }
        }
        let ra = rank(self);
        let rb = rank(other);
        if ra != rb {
            return ra.cmp(&rb);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            // Mixed numeric columns compare by magnitude, integers first on a tie.
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b).then(std::cmp::Ordering::Less),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)).then(std::cmp::Ordering::Greater),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "{NULL_LABEL}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl CellValue {
    /// A float cell. NaN and infinities are missing values; `-0.0` is stored as `0.0`.
    pub fn float(f: f64) -> Self {
        if !f.is_finite() {
            CellValue::Null
        } else if f == 0.0 {
            CellValue::Float(0.0)
        } else {
            CellValue::Float(f)
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text written to a delimited file: nulls become empty fields.
    pub fn as_field(&self) -> Cow<'_, str> {
        match self {
            CellValue::String(s) => Cow::Borrowed(s),
            CellValue::Null => Cow::Borrowed(""),
            other => Cow::Owned(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordTable – the complete loaded file
// ---------------------------------------------------------------------------

/// The full parsed table. Immutable once built; views over it are row indices.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    /// Column names in file order.
    columns: Vec<String>,
    /// column name → position in `columns`.
    index: HashMap<String, usize>,
    /// Row-major cells, every row exactly `columns.len()` wide.
    rows: Vec<Vec<CellValue>>,
}

impl RecordTable {
    /// Build a table, padding short rows with nulls.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, CellValue::Null);
        }
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        RecordTable {
            columns,
            index,
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn row(&self, row: usize) -> &[CellValue] {
        &self.rows[row]
    }

    /// Cell at `row` in column `col`; a column the table lacks reads as null.
    pub fn cell(&self, row: usize, col: Option<usize>) -> &CellValue {
        match col {
            Some(c) => &self.rows[row][c],
            None => &NULL,
        }
    }

    /// Sorted distinct values of a column over the whole table.
    pub fn unique_values(&self, name: &str) -> BTreeSet<CellValue> {
        let col = self.column_index(name);
        (0..self.rows.len())
            .map(|r| self.cell(r, col).clone())
            .collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{CellValue, RecordTable};

    /// Build a table from string columns; `""` becomes null, digits become integers.
    pub fn table(columns: &[&str], rows: &[&[&str]]) -> RecordTable {
        let columns = columns.iter().map(|c| c.to_string()).collect();
        let rows = rows
            .iter()
            .map(|r| {
                r.iter()
                    .map(|v| {
                        if v.is_empty() {
                            CellValue::Null
                        } else if let Ok(i) = v.parse::<i64>() {
                            CellValue::Integer(i)
                        } else {
                            CellValue::from(*v)
                        }
                    })
                    .collect()
            })
            .collect();
        RecordTable::new(columns, rows)
    }
}
