//! Aggregation of the cleaned table into the fixed report tables.
//!
//! Each builder degrades to an empty/placeholder table when its prerequisite
//! columns are missing; none of them can fail.

use std::cmp::Ordering;
use std::collections::HashMap;

use itertools::Itertools;

use crate::{
    data::Value,
    schema::{CUSTOMER_ID, DESCRIPTION, INVOICE_NO, MONTH, TOTAL_VALUE, YEAR},
    table::Table,
};

/// `total_value` summed per (year, month) pair, ascending by year then
/// month. Missing year/month keys form explicit groups and sort last.
pub fn revenue_by_month(table: &Table) -> Table {
    let mut result = Table::new(vec![
        YEAR.to_string(),
        MONTH.to_string(),
        TOTAL_VALUE.to_string(),
    ]);
    let (Some(year), Some(month), Some(total)) = (
        table.column_index(YEAR),
        table.column_index(MONTH),
        table.column_index(TOTAL_VALUE),
    ) else {
        return result;
    };

    let mut sums: HashMap<(Option<Value>, Option<Value>), f64> = HashMap::new();
    for row in table.rows() {
        let key = (row[year].clone(), row[month].clone());
        let entry = sums.entry(key).or_insert(0.0);
        if let Some(value) = row[total].as_ref().and_then(Value::as_f64) {
            *entry += value;
        }
    }

    for ((year, month), sum) in sums.into_iter().sorted_by(|(a, _), (b, _)| {
        cmp_missing_last(&a.0, &b.0).then_with(|| cmp_missing_last(&a.1, &b.1))
    }) {
        // Arity matches the headers above; push_row cannot fail here.
        let _ = result.push_row(vec![year, month, Some(Value::Float(sum))]);
    }
    result
}

/// Top products by summed `total_value`: descending, stable over ascending
/// description for ties, truncated to 10 groups.
pub fn top_products(table: &Table) -> Table {
    let mut result = Table::new(vec![DESCRIPTION.to_string(), TOTAL_VALUE.to_string()]);
    let (Some(description), Some(total)) = (
        table.column_index(DESCRIPTION),
        table.column_index(TOTAL_VALUE),
    ) else {
        return result;
    };

    let mut sums: HashMap<Value, f64> = HashMap::new();
    for row in table.rows() {
        let Some(key) = row[description].as_ref() else {
            continue;
        };
        let entry = sums.entry(key.clone()).or_insert(0.0);
        if let Some(value) = row[total].as_ref().and_then(Value::as_f64) {
            *entry += value;
        }
    }

    let mut groups = sums
        .into_iter()
        .sorted_by(|(a, _), (b, _)| a.cmp(b))
        .collect::<Vec<_>>();
    groups.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    groups.truncate(10);

    for (description, sum) in groups {
        let _ = result.push_row(vec![Some(description), Some(Value::Float(sum))]);
    }
    result
}

/// Fixed two-row metrics table: distinct non-missing customer count and the
/// mean of per-invoice summed `total_value`. Cells are empty when the
/// prerequisite columns are absent or no invoices exist.
pub fn overall_metrics(table: &Table) -> Table {
    let mut result = Table::new(vec!["metric".to_string(), "value".to_string()]);

    let unique_customers = table.column_index(CUSTOMER_ID).map(|idx| {
        table
            .column(idx)
            .flatten()
            .unique()
            .count() as i64
    });

    let average_order_value = match (table.column_index(INVOICE_NO), table.column_index(TOTAL_VALUE))
    {
        (Some(invoice), Some(total)) => {
            let mut sums: HashMap<Value, f64> = HashMap::new();
            for row in table.rows() {
                let Some(key) = row[invoice].as_ref() else {
                    continue;
                };
                let entry = sums.entry(key.clone()).or_insert(0.0);
                if let Some(value) = row[total].as_ref().and_then(Value::as_f64) {
                    *entry += value;
                }
            }
            if sums.is_empty() {
                None
            } else {
                Some(sums.values().sum::<f64>() / sums.len() as f64)
            }
        }
        _ => None,
    };

    let _ = result.push_row(vec![
        Some(Value::String("unique_customers".to_string())),
        unique_customers.map(Value::Integer),
    ]);
    let _ = result.push_row(vec![
        Some(Value::String("average_order_value".to_string())),
        average_order_value.map(Value::Float),
    ]);
    result
}

fn cmp_missing_last(a: &Option<Value>, b: &Option<Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => left.cmp(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> Option<Value> {
        Some(Value::String(value.to_string()))
    }

    fn i(value: i64) -> Option<Value> {
        Some(Value::Integer(value))
    }

    fn f(value: f64) -> Option<Value> {
        Some(Value::Float(value))
    }

    fn cleaned_table() -> Table {
        let mut table = Table::new(vec![
            INVOICE_NO.to_string(),
            DESCRIPTION.to_string(),
            CUSTOMER_ID.to_string(),
            TOTAL_VALUE.to_string(),
            YEAR.to_string(),
            MONTH.to_string(),
        ]);
        let rows = vec![
            vec![s("A1"), s("LANTERN"), f(17850.0), f(10.0), i(2011), i(2)],
            vec![s("A1"), s("DOORMAT"), f(17850.0), f(5.0), i(2011), i(2)],
            vec![s("B2"), s("LANTERN"), f(13047.0), f(20.0), i(2011), i(1)],
            vec![s("C3"), s("CANDLE"), None, f(7.0), i(2010), i(12)],
        ];
        for row in rows {
            table.push_row(row).unwrap();
        }
        table
    }

    #[test]
    fn revenue_by_month_sorts_ascending_with_unique_pairs() {
        let revenue = revenue_by_month(&cleaned_table());
        assert_eq!(revenue.row_count(), 3);
        assert_eq!(revenue.rows()[0][..2], [i(2010), i(12)]);
        assert_eq!(revenue.rows()[1][..2], [i(2011), i(1)]);
        assert_eq!(revenue.rows()[2][..2], [i(2011), i(2)]);
        assert_eq!(revenue.rows()[2][2], f(15.0));
    }

    #[test]
    fn revenue_by_month_keeps_missing_keys_as_explicit_group_last() {
        let mut table = cleaned_table();
        table
            .push_row(vec![s("D4"), s("CANDLE"), None, f(3.0), None, None])
            .unwrap();
        let revenue = revenue_by_month(&table);
        assert_eq!(revenue.row_count(), 4);
        assert_eq!(revenue.rows()[3][0], None);
        assert_eq!(revenue.rows()[3][1], None);
        assert_eq!(revenue.rows()[3][2], f(3.0));
    }

    #[test]
    fn revenue_by_month_without_prerequisites_is_empty() {
        let table = Table::new(vec![INVOICE_NO.to_string()]);
        let revenue = revenue_by_month(&table);
        assert!(revenue.is_empty());
        assert_eq!(revenue.headers(), [YEAR, MONTH, TOTAL_VALUE]);
    }

    #[test]
    fn top_products_orders_descending_and_truncates() {
        let top = top_products(&cleaned_table());
        assert_eq!(top.row_count(), 3);
        assert_eq!(top.rows()[0][0], s("LANTERN"));
        assert_eq!(top.rows()[0][1], f(30.0));
        assert_eq!(top.rows()[1][0], s("CANDLE"));
        assert_eq!(top.rows()[2][0], s("DOORMAT"));

        let mut crowded = Table::new(vec![DESCRIPTION.to_string(), TOTAL_VALUE.to_string()]);
        for idx in 0..15 {
            crowded
                .push_row(vec![s(&format!("ITEM {idx:02}")), f(idx as f64)])
                .unwrap();
        }
        let top = top_products(&crowded);
        assert_eq!(top.row_count(), 10);
        assert_eq!(top.rows()[0][0], s("ITEM 14"));
    }

    #[test]
    fn top_products_breaks_ties_by_ascending_description() {
        let mut table = Table::new(vec![DESCRIPTION.to_string(), TOTAL_VALUE.to_string()]);
        table.push_row(vec![s("ZEBRA"), f(5.0)]).unwrap();
        table.push_row(vec![s("APPLE"), f(5.0)]).unwrap();
        let top = top_products(&table);
        assert_eq!(top.rows()[0][0], s("APPLE"));
        assert_eq!(top.rows()[1][0], s("ZEBRA"));
    }

    #[test]
    fn overall_metrics_counts_distinct_customers_and_mean_order() {
        let metrics = overall_metrics(&cleaned_table());
        assert_eq!(metrics.row_count(), 2);
        assert_eq!(metrics.rows()[0][0], s("unique_customers"));
        assert_eq!(metrics.rows()[0][1], i(2));
        // Invoice sums: A1 = 15, B2 = 20, C3 = 7 -> mean = 14.
        assert_eq!(metrics.rows()[1][1], f(14.0));
    }

    #[test]
    fn overall_metrics_leaves_cells_empty_without_prerequisites() {
        let table = Table::new(vec![DESCRIPTION.to_string()]);
        let metrics = overall_metrics(&table);
        assert_eq!(metrics.row_count(), 2);
        assert_eq!(metrics.rows()[0][1], None);
        assert_eq!(metrics.rows()[1][1], None);
    }
}
