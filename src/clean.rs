//! Row-level cleaning stages: type coercion, validity filtering,
//! missing-value policy, categorical normalization, and derived columns.

use anyhow::Result;
use chrono::Datelike;
use log::info;

use crate::{
    data::{Value, parse_naive_date, parse_number},
    schema::{
        self, COUNTRY, DESCRIPTION, INVOICE_DATE, INVOICE_NO, MONTH, QUANTITY, SemanticType,
        TOTAL_VALUE, UNIT_PRICE, YEAR,
    },
    table::Table,
};

/// Converts canonical columns to their declared semantic types. Values that
/// fail to parse become missing; columns absent from the table are skipped.
pub fn coerce_types(mut table: Table) -> Table {
    let headers = table.headers().to_vec();
    for name in headers {
        match schema::declared_type(&name) {
            Some(SemanticType::Date) => {
                table.map_column(&name, coerce_date);
            }
            Some(SemanticType::Numeric) => {
                table.map_column(&name, coerce_number);
            }
            Some(SemanticType::Text) | None => {}
        }
    }
    table
}

fn coerce_date(cell: Option<Value>) -> Option<Value> {
    match cell {
        Some(Value::String(raw)) => parse_naive_date(&raw).ok().map(Value::Date),
        other => other,
    }
}

fn coerce_number(cell: Option<Value>) -> Option<Value> {
    match cell {
        Some(Value::String(raw)) => parse_number(&raw).ok().map(Value::Float),
        other => other,
    }
}

/// Drops rows missing `invoice_no` or `invoice_date`, restricted to
/// whichever of those columns exist. Every surviving row is attributable to
/// a real invoice on a real date.
pub fn drop_invalid_invoices(mut table: Table) -> Table {
    let mandatory = [INVOICE_NO, INVOICE_DATE]
        .iter()
        .filter_map(|name| table.column_index(name))
        .collect::<Vec<_>>();
    if mandatory.is_empty() {
        return table;
    }
    let before = table.row_count();
    table.retain_rows(|row| mandatory.iter().all(|idx| row[*idx].is_some()));
    let dropped = before - table.row_count();
    if dropped > 0 {
        info!("Dropped {dropped} row(s) missing invoice_no/invoice_date");
    }
    table
}

/// Applies per-column missing-value policy: `description` gaps become the
/// literal `"Unknown"` (then trimmed). `customer_id` stays an explicit
/// missing marker so anonymous customers are never confused with real IDs.
pub fn fill_missing(mut table: Table) -> Table {
    table.map_column(DESCRIPTION, |cell| match cell {
        None => Some(Value::String("Unknown".to_string())),
        Some(Value::String(s)) => Some(Value::String(s.trim().to_string())),
        other => other,
    });
    table
}

/// Trims `description` and canonicalizes `country` spellings.
pub fn normalize_categoricals(mut table: Table) -> Table {
    table.map_column(DESCRIPTION, |cell| match cell {
        Some(Value::String(s)) => Some(Value::String(s.trim().to_string())),
        other => other,
    });
    table.map_column(COUNTRY, |cell| match cell {
        Some(Value::String(s)) => {
            let titled = title_case(s.trim());
            Some(Value::String(canonical_country(&titled)))
        }
        other => other,
    });
    table
}

/// Uppercases the first letter of each run of letters and lowercases the
/// rest; every non-letter passes through unchanged, so hyphenated and
/// apostrophized names keep their separators.
fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut word_start = true;
    for c in value.chars() {
        if c.is_alphabetic() {
            if word_start {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            result.push(c);
            word_start = true;
        }
    }
    result
}

/// Alias table applied after title-casing; unmatched values pass through.
fn canonical_country(titled: &str) -> String {
    match titled {
        "Uk" | "United Kingdom" => "United Kingdom".to_string(),
        "Eire" => "Ireland".to_string(),
        other => other.to_string(),
    }
}

/// Computes `total_value` (missing-propagating product) and `year`/`month`
/// from `invoice_date`, each only when its inputs exist.
pub fn add_derived_columns(mut table: Table) -> Result<Table> {
    if let (Some(quantity), Some(unit_price)) = (
        table.column_index(QUANTITY),
        table.column_index(UNIT_PRICE),
    ) {
        let totals = table
            .rows()
            .iter()
            .map(|row| {
                let quantity = row[quantity].as_ref().and_then(Value::as_f64);
                let unit_price = row[unit_price].as_ref().and_then(Value::as_f64);
                match (quantity, unit_price) {
                    (Some(q), Some(p)) => Some(Value::Float(q * p)),
                    _ => None,
                }
            })
            .collect::<Vec<_>>();
        table.push_column(TOTAL_VALUE, totals)?;
    }

    if let Some(date_idx) = table.column_index(INVOICE_DATE) {
        let mut years = Vec::with_capacity(table.row_count());
        let mut months = Vec::with_capacity(table.row_count());
        for row in table.rows() {
            match row[date_idx].as_ref() {
                Some(Value::Date(date)) => {
                    years.push(Some(Value::Integer(i64::from(date.year()))));
                    months.push(Some(Value::Integer(i64::from(date.month()))));
                }
                _ => {
                    years.push(None);
                    months.push(None);
                }
            }
        }
        table.push_column(YEAR, years)?;
        table.push_column(MONTH, months)?;
    }

    Ok(table)
}
