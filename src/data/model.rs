use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// Record – one row of the salary table
// ---------------------------------------------------------------------------

/// A single salary record. Header names follow the Portuguese layout of the
/// published dataset; the English names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    #[serde(rename = "ano", alias = "year", alias = "work_year")]
    pub year: i32,
    #[serde(rename = "senioridade", alias = "seniority", alias = "experience_level")]
    pub seniority: String,
    #[serde(rename = "contrato", alias = "contract_type", alias = "employment_type")]
    pub contract: String,
    #[serde(rename = "cargo", alias = "job_title")]
    pub job_title: String,
    #[serde(rename = "salario", alias = "salary")]
    pub salary: f64,
    #[serde(rename = "moeda", alias = "currency", alias = "salary_currency")]
    pub currency: String,
    #[serde(rename = "usd", alias = "salary_in_usd")]
    pub usd: f64,
    #[serde(rename = "residencia", alias = "residence", alias = "employee_residence")]
    pub residence: String,
    #[serde(
        rename = "remoto",
        alias = "remote",
        alias = "remote_ratio",
        deserialize_with = "text_or_number"
    )]
    pub remote: String,
    #[serde(rename = "empresa", alias = "company_location")]
    pub company_location: String,
    #[serde(rename = "tamanho_empresa", alias = "company_size")]
    pub company_size: String,
    #[serde(rename = "residencia_iso3", alias = "residence_iso3")]
    pub residence_iso3: String,
}

/// Remote-work cells are labels in the Portuguese dataset and ratios (0, 50,
/// 100) in the English one; both are kept as text.
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Cell::deserialize(deserializer)? {
        Cell::Text(s) => s,
        Cell::Integer(n) => n.to_string(),
        Cell::Float(x) => x.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Dimension – a filterable categorical column
// ---------------------------------------------------------------------------

/// Columns the sidebar can filter on. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Year,
    Seniority,
    Contract,
    CompanySize,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Year,
        Dimension::Seniority,
        Dimension::Contract,
        Dimension::CompanySize,
    ];

    /// Localized label shown above the multi-select.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Year => "Ano",
            Dimension::Seniority => "Senioridade",
            Dimension::Contract => "Tipo de Contrato",
            Dimension::CompanySize => "Tamanho da Empresa",
        }
    }

    /// Project a record onto this dimension.
    pub fn value_of(self, record: &Record) -> DimensionValue {
        match self {
            Dimension::Year => DimensionValue::Year(record.year),
            Dimension::Seniority => DimensionValue::Label(record.seniority.clone()),
            Dimension::Contract => DimensionValue::Label(record.contract.clone()),
            Dimension::CompanySize => DimensionValue::Label(record.company_size.clone()),
        }
    }

    /// Borrowing membership test, avoids cloning labels in the filter loop.
    pub fn matches(self, record: &Record, value: &DimensionValue) -> bool {
        match (self, value) {
            (Dimension::Year, DimensionValue::Year(y)) => record.year == *y,
            (Dimension::Seniority, DimensionValue::Label(s)) => record.seniority == *s,
            (Dimension::Contract, DimensionValue::Label(s)) => record.contract == *s,
            (Dimension::CompanySize, DimensionValue::Label(s)) => record.company_size == *s,
            _ => false,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// DimensionValue – a single cell of a filterable column
// ---------------------------------------------------------------------------

/// Years sort numerically, labels lexicographically. Derived `Ord` is enough
/// because a dimension never mixes the two variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DimensionValue {
    Year(i32),
    Label(String),
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionValue::Year(y) => write!(f, "{y}"),
            DimensionValue::Label(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// SalaryTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The immutable source table with pre-computed distinct values per dimension.
#[derive(Debug, Clone)]
pub struct SalaryTable {
    records: Vec<Record>,
    unique_values: BTreeMap<Dimension, BTreeSet<DimensionValue>>,
}

impl SalaryTable {
    /// Build dimension indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut unique_values: BTreeMap<Dimension, BTreeSet<DimensionValue>> = Dimension::ALL
            .iter()
            .map(|&d| (d, BTreeSet::new()))
            .collect();

        for rec in &records {
            for dim in Dimension::ALL {
                unique_values
                    .entry(dim)
                    .or_default()
                    .insert(dim.value_of(rec));
            }
        }

        SalaryTable {
            records,
            unique_values,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Sorted distinct values of `dim` across the whole table.
    pub fn distinct_values(&self, dim: Dimension) -> &BTreeSet<DimensionValue> {
        static EMPTY: BTreeSet<DimensionValue> = BTreeSet::new();
        self.unique_values.get(&dim).unwrap_or(&EMPTY)
    }

    pub fn unique_values(&self) -> &BTreeMap<Dimension, BTreeSet<DimensionValue>> {
        &self.unique_values
    }

    /// Resolve row indices (as produced by the filter engine) into records.
    pub fn view(&self, indices: &[usize]) -> Vec<&Record> {
        indices.iter().filter_map(|&i| self.records.get(i)).collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
