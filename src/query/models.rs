use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::trace;

// Known result fields of the `people` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    LivingProvince,
    EarningsTotal,
    EarnedIncome,
    CapitalIncome,
    TaxRate,
    IncomeAfterTax,
    RemainingTax,
    Refunds,
    BirthYear,
    Rank,
    ProvinceRank,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Name,
        Field::LivingProvince,
        Field::EarningsTotal,
        Field::EarnedIncome,
        Field::CapitalIncome,
        Field::TaxRate,
        Field::IncomeAfterTax,
        Field::RemainingTax,
        Field::Refunds,
        Field::BirthYear,
        Field::Rank,
        Field::ProvinceRank,
    ];

    /// Key used by the query service and the REST backend.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::LivingProvince => "living_province",
            Field::EarningsTotal => "earnings_total",
            Field::EarnedIncome => "earned_income",
            Field::CapitalIncome => "capital_income",
            Field::TaxRate => "tax_rate",
            Field::IncomeAfterTax => "income_after_tax",
            Field::RemainingTax => "remaining_tax",
            Field::Refunds => "refunds",
            Field::BirthYear => "birth_year",
            Field::Rank => "rank",
            Field::ProvinceRank => "province_rank",
        }
    }

    /// Column header used in the published Finnish tax records export.
    pub fn source_header(self) -> &'static str {
        match self {
            Field::Name => "Nimi",
            Field::LivingProvince => "Maakunta",
            Field::EarningsTotal => "Yhteensä",
            Field::EarnedIncome => "Ansiotulo",
            Field::CapitalIncome => "Pääomatulo",
            Field::TaxRate => "Vero%",
            Field::IncomeAfterTax => "Tulo veron jälkeen",
            Field::RemainingTax => "Jäännösvero",
            Field::Refunds => "Palautukset",
            Field::BirthYear => "Syntymävuosi",
            Field::Rank => "Sija",
            Field::ProvinceRank => "Maakunnan sija",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn from_source_header(header: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.source_header() == header)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One result record. Keys outside the known vocabulary are dropped on decode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<(Field, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, replacing any previous value for the same field.
    pub fn with(mut self, field: Field, value: impl Into<Value>) -> Self {
        self.insert(field, value.into());
        self
    }

    pub fn insert(&mut self, field: Field, value: Value) {
        match self.values.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => self.values.push((field, value)),
        }
    }

    /// Returns the value for a field; absent fields read as `Null`.
    pub fn get(&self, field: Field) -> &Value {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v)
            .unwrap_or(&Value::Null)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.values.iter().map(|(f, _)| *f)
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in &self.values {
            map.serialize_entry(field.key(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a result row object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Row, A::Error> {
                let mut row = Row::new();
                while let Some(key) = access.next_key::<String>()? {
                    let value: Value = access.next_value()?;
                    match Field::from_key(&key) {
                        Some(field) => row.insert(field, value),
                        None => trace!("Discarding unrecognized field '{}'", key),
                    }
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// Pagination window of the currently displayed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    #[serde(alias = "currentPageSize")]
    pub page_size: u64,
    pub total_count: u64,
    pub start_index: u64,
    pub end_index: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// Response of the natural-language query service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub results: Vec<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResult {
    /// Total number of matching records across all pages.
    pub fn total(&self) -> u64 {
        self.pagination
            .map(|p| p.total_count)
            .or(self.total_count)
            .or(self.count)
            .unwrap_or(self.results.len() as u64)
    }

    /// Backend-reported reason the question could not be answered.
    pub fn failure_message(&self) -> Option<&str> {
        self.error.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

// Request body of the natural-language query service
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}
