//! Interquartile-range outlier flagging over the configured numeric columns.
//!
//! For each eligible column the quartiles are computed over non-missing
//! values only, with linear interpolation at `q * (n - 1)`. A non-missing
//! value outside `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]` is flagged; missing values
//! are always flagged `false` and never enter the quartile computation.

use anyhow::Result;
use log::{debug, info};

use crate::{
    data::Value,
    schema::{self, outlier_flag_column},
    table::Table,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

// Callers guarantee a sorted, non-empty slice; `iqr_bounds` is the checked
// entry point.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let fraction = position - lower as f64;
        sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
    }
}

/// IQR fence for a set of observed values; `None` when no values exist.
pub fn iqr_bounds(values: &[f64]) -> Option<Bounds> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let q1 = quantile(&sorted, 0.25);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    Some(Bounds {
        lower: q1 - 1.5 * iqr,
        upper: q3 + 1.5 * iqr,
    })
}

pub struct OutlierOutcome {
    pub table: Table,
    pub outliers: Table,
    pub flag_columns: Vec<String>,
}

/// Attaches `is_outlier_<column>` flags for every eligible column present in
/// the table and collects flagged rows into a log table (taken before any
/// removal).
pub fn flag_outliers(mut table: Table) -> Result<OutlierOutcome> {
    let mut flag_columns = Vec::new();
    for column in schema::OUTLIER_COLUMNS {
        let Some(idx) = table.column_index(column) else {
            continue;
        };
        let observed = table
            .column(idx)
            .filter_map(|cell| cell.and_then(Value::as_f64))
            .collect::<Vec<_>>();
        let bounds = iqr_bounds(&observed);
        if let Some(bounds) = bounds {
            debug!(
                "Column '{}' outlier bounds [{:.4}, {:.4}] over {} value(s)",
                column,
                bounds.lower,
                bounds.upper,
                observed.len()
            );
        }
        let flags = table
            .rows()
            .iter()
            .map(|row| {
                let outside = match (bounds, row[idx].as_ref().and_then(Value::as_f64)) {
                    (Some(bounds), Some(value)) => value < bounds.lower || value > bounds.upper,
                    _ => false,
                };
                Some(Value::Boolean(outside))
            })
            .collect::<Vec<_>>();
        let flag_name = outlier_flag_column(column);
        table.push_column(&flag_name, flags)?;
        flag_columns.push(flag_name);
    }

    let flagged = flagged_rows(&table, &flag_columns);
    let outliers = table.select_rows(&flagged);
    if !outliers.is_empty() {
        info!(
            "Flagged {} outlier row(s) across {} column(s)",
            outliers.row_count(),
            flag_columns.len()
        );
    }

    Ok(OutlierOutcome {
        table,
        outliers,
        flag_columns,
    })
}

/// Drops every row carrying a true flag in any of `flag_columns`.
pub fn remove_flagged(mut table: Table, flag_columns: &[String]) -> Table {
    let indices = flag_columns
        .iter()
        .filter_map(|name| table.column_index(name))
        .collect::<Vec<_>>();
    if indices.is_empty() {
        return table;
    }
    let before = table.row_count();
    table.retain_rows(|row| {
        !indices
            .iter()
            .any(|idx| matches!(row[*idx], Some(Value::Boolean(true))))
    });
    info!("Removed {} flagged row(s)", before - table.row_count());
    table
}

fn flagged_rows(table: &Table, flag_columns: &[String]) -> Vec<bool> {
    let indices = flag_columns
        .iter()
        .filter_map(|name| table.column_index(name))
        .collect::<Vec<_>>();
    table
        .rows()
        .iter()
        .map(|row| {
            indices
                .iter()
                .any(|idx| matches!(row[*idx], Some(Value::Boolean(true))))
        })
        .collect()
}
