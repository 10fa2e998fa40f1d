use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use thiserror::Error;

use super::model::{Record, SalaryTable};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("malformed dataset {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a salary table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the dataset column names
/// * `.json`    – `[{ "ano": 2023, "cargo": "...", ... }, ...]`
/// * `.parquet` – flat columns with the same names
pub fn load_file(path: &Path) -> Result<SalaryTable, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    }
    .map_err(|e| LoadError::Malformed {
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    })?;

    Ok(SalaryTable::from_records(records))
}

fn cache() -> &'static Mutex<HashMap<PathBuf, Arc<SalaryTable>>> {
    static CACHE: OnceLock<Mutex<HashMap<PathBuf, Arc<SalaryTable>>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Load through a process-wide cache keyed by path. The file is read at most
/// once per process; failed loads are not remembered.
pub fn load_cached(path: &Path) -> Result<Arc<SalaryTable>, LoadError> {
    if let Some(table) = cache()
        .lock()
        .ok()
        .and_then(|map| map.get(path).cloned())
    {
        log::debug!("Cache hit for {}", path.display());
        return Ok(table);
    }

    let table = Arc::new(load_file(path)?);
    log::info!("Loaded {} records from {}", table.len(), path.display());

    // A poisoned lock only costs us the memoization.
    if let Ok(mut map) = cache().lock() {
        let entry = map.entry(path.to_path_buf()).or_insert(table);
        return Ok(Arc::clone(entry));
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Accepted names per required column; the first one is canonical.
const REQUIRED_COLUMNS: [&[&str]; 12] = [
    &["ano", "year", "work_year"],
    &["senioridade", "seniority", "experience_level"],
    &["contrato", "contract_type", "employment_type"],
    &["cargo", "job_title"],
    &["salario", "salary"],
    &["moeda", "currency", "salary_currency"],
    &["usd", "salary_in_usd"],
    &["residencia", "residence", "employee_residence"],
    &["remoto", "remote", "remote_ratio"],
    &["empresa", "company_location"],
    &["tamanho_empresa", "company_size"],
    &["residencia_iso3", "residence_iso3"],
];

/// Fail unless every required column is present under one of its names.
fn check_columns(has: impl Fn(&str) -> bool) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|names| !names.iter().any(|n| has(n)))
        .map(|names| names[0])
        .collect();
    if !missing.is_empty() {
        bail!("missing required column(s): {}", missing.join(", "));
    }
    Ok(())
}

/// Columns are matched by header name; extra columns are ignored.
fn load_csv(path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();
    check_columns(|name| headers.iter().any(|h| h == name)).context("CSV header")?;

    reader
        .deserialize::<Record>()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON records")
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Accepts files written by both Pandas and Polars: string columns as
/// Utf8/LargeUtf8, numbers as any of Int32/Int64/Float32/Float64.
fn load_parquet(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let schema = builder.schema().clone();
    check_columns(|name| schema.column_with_name(name).is_some()).context("parquet schema")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let cols = BatchColumns::locate(&batch)?;

        for row in 0..batch.num_rows() {
            let rec = cols
                .record(row)
                .with_context(|| format!("parquet row {}", records.len()))?;
            records.push(rec);
        }
    }
    Ok(records)
}

/// Column handles of one record batch, resolved once per batch.
struct BatchColumns {
    year: ArrayRef,
    seniority: ArrayRef,
    contract: ArrayRef,
    job_title: ArrayRef,
    salary: ArrayRef,
    currency: ArrayRef,
    usd: ArrayRef,
    residence: ArrayRef,
    remote: ArrayRef,
    company_location: ArrayRef,
    company_size: ArrayRef,
    residence_iso3: ArrayRef,
}

impl BatchColumns {
    fn locate(batch: &RecordBatch) -> Result<Self> {
        let col = |names: &[&str]| -> Result<ArrayRef> {
            names
                .iter()
                .find_map(|n| batch.column_by_name(n).cloned())
                .with_context(|| format!("Parquet file missing '{}' column", names[0]))
        };
        let [
            year,
            seniority,
            contract,
            job_title,
            salary,
            currency,
            usd,
            residence,
            remote,
            company_location,
            company_size,
            residence_iso3,
        ] = REQUIRED_COLUMNS;
        Ok(BatchColumns {
            year: col(year)?,
            seniority: col(seniority)?,
            contract: col(contract)?,
            job_title: col(job_title)?,
            salary: col(salary)?,
            currency: col(currency)?,
            usd: col(usd)?,
            residence: col(residence)?,
            remote: col(remote)?,
            company_location: col(company_location)?,
            company_size: col(company_size)?,
            residence_iso3: col(residence_iso3)?,
        })
    }

    fn record(&self, row: usize) -> Result<Record> {
        let year = extract_i64(&self.year, row).context("ano")?;
        Ok(Record {
            year: i32::try_from(year).context("ano")?,
            seniority: extract_string(&self.seniority, row).context("senioridade")?,
            contract: extract_string(&self.contract, row).context("contrato")?,
            job_title: extract_string(&self.job_title, row).context("cargo")?,
            salary: extract_f64(&self.salary, row).context("salario")?,
            currency: extract_string(&self.currency, row).context("moeda")?,
            usd: extract_f64(&self.usd, row).context("usd")?,
            residence: extract_string(&self.residence, row).context("residencia")?,
            remote: extract_string(&self.remote, row).context("remoto")?,
            company_location: extract_string(&self.company_location, row).context("empresa")?,
            company_size: extract_string(&self.company_size, row).context("tamanho_empresa")?,
            residence_iso3: extract_string(&self.residence_iso3, row).context("residencia_iso3")?,
        })
    }
}

// -- Arrow helpers --

fn extract_f64(col: &ArrayRef, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in numeric column");
    }
    let any = col.as_any();
    let v = match col.data_type() {
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64),
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        other => bail!("expected a numeric column, got {other:?}"),
    };
    v.context("column type does not match its declared data type")
}

/// Integer columns directly; float columns only when they hold whole numbers.
fn extract_i64(col: &ArrayRef, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("null value in integer column");
    }
    let any = col.as_any();
    let v = match col.data_type() {
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as i64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row)),
        DataType::Float32 | DataType::Float64 => {
            let v = extract_f64(col, row)?;
            if !v.is_finite() || v.fract() != 0.0 {
                bail!("{v} is not a whole number");
            }
            Some(v as i64)
        }
        other => bail!("expected an integer column, got {other:?}"),
    };
    v.context("column type does not match its declared data type")
}

/// Strings are taken verbatim; integer columns (e.g. `remote_ratio`) are
/// rendered as text so they can act as categories.
fn extract_string(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in text column");
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 | DataType::Int64 => {
            Ok(extract_i64(col, row)?.to_string())
        }
        other => bail!("expected a text column, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::array::StringArray;
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    use crate::data::model::Dimension;

    const HEADER: &str = "ano,senioridade,contrato,cargo,salario,moeda,usd,residencia,remoto,empresa,tamanho_empresa,residencia_iso3";

    fn write_file(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    fn sample_csv() -> String {
        format!(
            "{HEADER}\n\
             2023,senior,integral,Data Scientist,100000,USD,100000,US,remoto,US,media,USA\n\
             2023,junior,integral,Data Analyst,250000,BRL,50000,BR,presencial,BR,grande,BRA\n\
             2024,senior,integral,Data Scientist,120000,USD,120000,US,remoto,US,media,USA\n"
        )
    }

    #[test]
    fn loads_csv_by_header_name() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "dados.csv", &sample_csv());
        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 3);
        let first = &table.records()[0];
        assert_eq!(first.year, 2023);
        assert_eq!(first.job_title, "Data Scientist");
        assert_eq!(table.records()[1].salary, 250_000.0);
        assert_eq!(table.records()[1].residence_iso3, "BRA");
        assert_eq!(table.distinct_values(Dimension::CompanySize).len(), 2);
    }

    #[test]
    fn accepts_english_headers_in_any_order() {
        let dir = TempDir::new().unwrap();
        let body = "job_title,work_year,experience_level,employment_type,salary,salary_currency,salary_in_usd,employee_residence,remote_ratio,company_location,company_size,residence_iso3,extra\n\
                    ML Engineer,2022,SE,FT,90000,EUR,95000,DE,100,DE,L,DEU,ignored\n";
        let path = write_file(&dir, "en.csv", body);
        let table = load_file(&path).unwrap();
        let rec = &table.records()[0];
        assert_eq!(rec.year, 2022);
        assert_eq!(rec.remote, "100");
        assert_eq!(rec.usd, 95_000.0);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "dados.xlsx", "whatever");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn non_numeric_salary_is_malformed() {
        let dir = TempDir::new().unwrap();
        let body = format!(
            "{HEADER}\n2023,senior,integral,Data Scientist,lots,USD,100000,US,remoto,US,media,USA\n"
        );
        let path = write_file(&dir, "bad.csv", &body);
        match load_file(&path) {
            Err(LoadError::Malformed { reason, .. }) => assert!(reason.contains("CSV row 0")),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn missing_column_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "short.csv", "ano,cargo\n2023,Data Scientist\n");
        assert!(matches!(load_file(&path), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn empty_csv_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.csv", "");
        assert!(matches!(load_file(&path), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn header_only_csv_with_missing_columns_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "header_only.csv", "ano,cargo\n");
        match load_file(&path) {
            Err(LoadError::Malformed { reason, .. }) => {
                assert!(reason.contains("missing required column"), "{reason}");
                assert!(reason.contains("senioridade"), "{reason}");
                assert!(reason.contains("usd"), "{reason}");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn header_only_csv_with_all_columns_is_an_empty_table() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "no_rows.csv", &format!("{HEADER}\n"));
        assert!(load_file(&path).unwrap().is_empty());
    }

    #[test]
    fn json_accepts_integer_remote_ratio() {
        let dir = TempDir::new().unwrap();
        let body = r#"[{"work_year": 2022, "experience_level": "SE", "employment_type": "FT",
            "job_title": "ML Engineer", "salary": 90000, "salary_currency": "EUR",
            "salary_in_usd": 95000, "employee_residence": "DE", "remote_ratio": 100,
            "company_location": "DE", "company_size": "L", "residence_iso3": "DEU"}]"#;
        let path = write_file(&dir, "en.json", body);
        let table = load_file(&path).unwrap();
        assert_eq!(table.records()[0].remote, "100");
        assert_eq!(table.records()[0].year, 2022);
    }

    #[test]
    fn numeric_remote_ratio_in_csv_is_kept_as_text() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "ratio.csv",
            &format!("{HEADER}\n2023,senior,integral,Data Scientist,100000,USD,100000,US,50,US,media,USA\n"),
        );
        assert_eq!(load_file(&path).unwrap().records()[0].remote, "50");
    }

    #[test]
    fn loads_json_records() {
        let dir = TempDir::new().unwrap();
        let body = r#"[{"ano": 2021, "senioridade": "pleno", "contrato": "integral",
            "cargo": "Data Engineer", "salario": 80000, "moeda": "USD", "usd": 80000,
            "residencia": "CA", "remoto": "hibrido", "empresa": "CA",
            "tamanho_empresa": "pequena", "residencia_iso3": "CAN"}]"#;
        let path = write_file(&dir, "dados.json", body);
        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].remote, "hibrido");
    }

    /// Two-row parquet file in the Portuguese layout with the given years.
    fn write_salary_parquet(path: &Path, years: [i64; 2]) {
        let text = |name: &str| Field::new(name, DataType::Utf8, false);
        let schema = Arc::new(Schema::new(vec![
            Field::new("ano", DataType::Int64, false),
            text("senioridade"),
            text("contrato"),
            text("cargo"),
            Field::new("salario", DataType::Float64, false),
            text("moeda"),
            Field::new("usd", DataType::Float64, false),
            text("residencia"),
            text("remoto"),
            text("empresa"),
            text("tamanho_empresa"),
            text("residencia_iso3"),
        ]));
        let strings = |v: &[&str]| Arc::new(StringArray::from(v.to_vec())) as ArrayRef;
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(years.to_vec())),
                strings(&["senior", "junior"]),
                strings(&["integral", "freelancer"]),
                strings(&["Data Scientist", "Analyst"]),
                Arc::new(Float64Array::from(vec![100_000.0, 40_000.0])),
                strings(&["USD", "USD"]),
                Arc::new(Float64Array::from(vec![100_000.0, 40_000.0])),
                strings(&["US", "PT"]),
                strings(&["remoto", "presencial"]),
                strings(&["US", "PT"]),
                strings(&["media", "pequena"]),
                strings(&["USA", "PRT"]),
            ],
        )
        .unwrap();

        let file = std::fs::File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn loads_flat_parquet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dados.parquet");
        write_salary_parquet(&path, [2023, 2024]);

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].year, 2024);
        assert_eq!(table.records()[1].contract, "freelancer");
        assert_eq!(table.records()[0].usd, 100_000.0);
    }

    #[test]
    fn out_of_range_parquet_year_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("far_future.parquet");
        write_salary_parquet(&path, [2023, 10_000_000_000]);

        match load_file(&path) {
            Err(LoadError::Malformed { reason, .. }) => {
                assert!(reason.contains("parquet row 1"), "{reason}");
                assert!(reason.contains("ano"), "{reason}");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn parquet_without_required_columns_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("short.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("ano", DataType::Int64, false),
            Field::new("cargo", DataType::Utf8, false),
        ]));
        // Schema only, zero row groups.
        let file = std::fs::File::create(&path).unwrap();
        ArrowWriter::try_new(file, schema, None).unwrap().close().unwrap();

        match load_file(&path) {
            Err(LoadError::Malformed { reason, .. }) => {
                assert!(reason.contains("missing required column"), "{reason}");
                assert!(reason.contains("usd"), "{reason}");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn cached_load_reads_file_once() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "cached.csv", &sample_csv());

        let first = load_cached(&path).unwrap();
        // Even after the file disappears, the cached table is served.
        std::fs::remove_file(&path).unwrap();
        let second = load_cached(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn failed_load_is_not_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("late.csv");
        assert!(load_cached(&path).is_err());

        write_file(&dir, "late.csv", &sample_csv());
        assert_eq!(load_cached(&path).unwrap().len(), 3);
    }
}
