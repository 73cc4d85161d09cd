use crate::query::models::{Field, Row};
use crate::results::format::DataType;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Right,
    Center,
}

/// Display metadata for one known field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub field: Field,
    pub label: &'static str,
    pub data_type: DataType,
    /// Lower sorts first.
    pub priority: u8,
    pub default_visible: bool,
    pub align: Align,
}

const fn column(
    field: Field,
    label: &'static str,
    data_type: DataType,
    priority: u8,
    align: Align,
) -> ColumnDescriptor {
    ColumnDescriptor {
        field,
        label,
        data_type,
        priority,
        default_visible: true,
        align,
    }
}

pub static COLUMNS: [ColumnDescriptor; 12] = [
    column(Field::Name, "Name", DataType::Text, 1, Align::Left),
    column(Field::LivingProvince, "Province", DataType::Text, 3, Align::Left),
    column(Field::EarningsTotal, "Total Earnings", DataType::Currency, 2, Align::Right),
    column(Field::EarnedIncome, "Earned Income", DataType::Currency, 6, Align::Right),
    column(Field::CapitalIncome, "Capital Income", DataType::Currency, 7, Align::Right),
    column(Field::TaxRate, "Tax Rate", DataType::Percentage, 8, Align::Right),
    column(Field::IncomeAfterTax, "After-Tax Income", DataType::Currency, 9, Align::Right),
    column(Field::RemainingTax, "Remaining Tax", DataType::Text, 10, Align::Left),
    column(Field::Refunds, "Refunds", DataType::Currency, 11, Align::Right),
    column(Field::BirthYear, "Birth Year", DataType::Year, 4, Align::Center),
    column(Field::Rank, "Overall Rank", DataType::Rank, 5, Align::Center),
    column(Field::ProvinceRank, "Province Rank", DataType::Rank, 12, Align::Center),
];

pub fn descriptor(field: Field) -> &'static ColumnDescriptor {
    // every Field has exactly one entry in COLUMNS
    COLUMNS
        .iter()
        .find(|c| c.field == field)
        .unwrap_or(&COLUMNS[0])
}

/// Columns for the fields present on the first row, sorted by priority.
pub fn discover_columns(rows: &[Row]) -> Vec<&'static ColumnDescriptor> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };

    let mut columns: Vec<&'static ColumnDescriptor> = first.fields().map(descriptor).collect();
    columns.sort_by_key(|c| c.priority);
    columns
}

/// Default-visible columns, cut to the first `max_columns` when given.
pub fn visible_columns(
    columns: &[&'static ColumnDescriptor],
    max_columns: Option<usize>,
) -> Vec<&'static ColumnDescriptor> {
    let visible = columns.iter().copied().filter(|c| c.default_visible);
    match max_columns.filter(|m| *m > 0) {
        Some(max) => visible.take(max).collect(),
        None => visible.collect(),
    }
}
