//! Writes a synthetic `EMA_2021_2022.csv` (and a Parquet copy) with the
//! columns the dashboard reads, for trying it without the published file.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const ROWS: usize = 5_000;

const MONTHS: [&str; 12] = [
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio", "Julio", "Agosto", "Septiembre",
    "Octubre", "Noviembre", "Diciembre",
];

/// (label, relative weight)
const PROVINCES: [(&str, u32); 10] = [
    ("Guayas", 30),
    ("Pichincha", 25),
    ("Manabí", 12),
    ("Azuay", 8),
    ("Los Ríos", 7),
    ("El Oro", 6),
    ("Tungurahua", 4),
    ("Loja", 4),
    ("Imbabura", 3),
    ("Galápagos", 1),
];
const NATIONALITIES: [(&str, u32); 5] = [
    ("Ecuador", 88),
    ("Colombia", 5),
    ("Venezuela", 4),
    ("Perú", 2),
    ("Estados Unidos", 1),
];
const CIVIL_STATUS: [(&str, u32); 5] = [
    ("Soltero", 70),
    ("Divorciado", 18),
    ("Unión de hecho", 7),
    ("Viudo", 3),
    ("Casado", 2),
];
const EDUCATION: [(&str, u32); 6] = [
    ("Secundaria", 35),
    ("Superior", 30),
    ("Primaria", 18),
    ("Educación Básica", 10),
    ("Postgrado", 5),
    ("Ninguno", 2),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn weighted<'a>(&mut self, table: &[(&'a str, u32)]) -> &'a str {
        let total: u32 = table.iter().map(|(_, w)| w).sum();
        let mut pick = self.below(total as u64) as u32;
        for (label, weight) in table {
            if pick < *weight {
                return *label;
            }
            pick -= weight;
        }
        table[table.len() - 1].0
    }
}

/// Feminine form of a one-word civil status ("Soltero" → "Soltera").
fn feminine(label: &str) -> String {
    match label.strip_suffix('o') {
        Some(stem) if !label.contains(' ') => format!("{stem}a"),
        _ => label.to_string(),
    }
}

struct Columns {
    names: [&'static str; 11],
    year: Vec<i64>,
    text: Vec<Vec<String>>,
}

fn generate(rng: &mut SimpleRng) -> Columns {
    let names = [
        "anio_insc", "mes_insc", "nac_1", "nac_2", "sexo_1", "sexo_2", "est_civi1", "est_civi2",
        "niv_inst1", "niv_inst2", "prov_insc",
    ];
    let mut year = Vec::with_capacity(ROWS);
    let mut text: Vec<Vec<String>> = vec![Vec::with_capacity(ROWS); names.len() - 1];

    for _ in 0..ROWS {
        year.push(2021 + rng.below(2) as i64);
        let same_sex = rng.below(100) == 0;
        let row = [
            MONTHS[rng.below(12) as usize].to_string(),
            rng.weighted(&NATIONALITIES).to_string(),
            rng.weighted(&NATIONALITIES).to_string(),
            "Hombre".to_string(),
            if same_sex { "Hombre" } else { "Mujer" }.to_string(),
            rng.weighted(&CIVIL_STATUS).to_string(),
            feminine(rng.weighted(&CIVIL_STATUS)),
            rng.weighted(&EDUCATION).to_string(),
            rng.weighted(&EDUCATION).to_string(),
            rng.weighted(&PROVINCES).to_string(),
        ];
        for (col, value) in text.iter_mut().zip(row) {
            col.push(value);
        }
    }

    Columns { names, year, text }
}

fn write_csv(columns: &Columns, path: &str) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .with_context(|| format!("creating {path}"))?;
    writer.write_record(columns.names)?;
    for row in 0..columns.year.len() {
        let mut record = vec![columns.year[row].to_string()];
        record.extend(columns.text.iter().map(|col| col[row].clone()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(columns: &Columns, path: &str) -> Result<()> {
    let mut fields = vec![Field::new(columns.names[0], DataType::Int64, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(Int64Array::from(columns.year.clone()))];
    for (name, values) in columns.names[1..].iter().zip(&columns.text) {
        fields.push(Field::new(*name, DataType::Utf8, false));
        arrays.push(Arc::new(StringArray::from(values.clone())));
    }
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let columns = generate(&mut rng);

    write_csv(&columns, "EMA_2021_2022.csv")?;
    write_parquet(&columns, "EMA_2021_2022.parquet")?;

    println!("Wrote {ROWS} synthetic registrations to EMA_2021_2022.csv and EMA_2021_2022.parquet");
    Ok(())
}
