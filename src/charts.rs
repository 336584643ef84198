//! Best-effort chart rendering for the summary tables.
//!
//! Charts are visual collaborators, not part of the cleaning contract; the
//! pipeline logs a warning and carries on when any renderer fails.

use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;

use crate::{
    data::Value,
    schema::{MONTH, QUANTITY, TOTAL_VALUE, YEAR},
    table::Table,
};

const FIGURE_SIZE: (u32, u32) = (1000, 500);

/// Line chart of `revenue_by_month`, one point per year-month group.
pub fn render_monthly_revenue(revenue: &Table, path: &Path) -> Result<()> {
    if revenue.is_empty() {
        return Ok(());
    }
    let (year, month, total) = (
        revenue.column_index(YEAR).context("year column")?,
        revenue.column_index(MONTH).context("month column")?,
        revenue.column_index(TOTAL_VALUE).context("total_value column")?,
    );
    let labels = revenue
        .rows()
        .iter()
        .map(|row| year_month_label(row[year].as_ref(), row[month].as_ref()))
        .collect::<Vec<_>>();
    let points = revenue
        .rows()
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            (
                idx as i32,
                row[total].as_ref().and_then(Value::as_f64).unwrap_or(0.0),
            )
        })
        .collect::<Vec<_>>();
    let (y_min, y_max) = value_range(points.iter().map(|(_, y)| *y));

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Monthly Revenue", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(-1..points.len() as i32, y_min..y_max)?;
    chart
        .configure_mesh()
        .x_desc("Year-Month")
        .y_desc("Revenue")
        .x_label_formatter(&|idx| {
            usize::try_from(*idx)
                .ok()
                .and_then(|idx| labels.get(idx).cloned())
                .unwrap_or_default()
        })
        .draw()?;
    chart.draw_series(LineSeries::new(points.clone(), &BLUE))?;
    chart.draw_series(points.iter().map(|point| Circle::new(*point, 3, BLUE.filled())))?;
    root.present()?;
    Ok(())
}

/// Bar chart of the top products table, one bar per product.
pub fn render_top_products(top: &Table, path: &Path) -> Result<()> {
    if top.is_empty() {
        return Ok(());
    }
    let total = top.column_index(TOTAL_VALUE).context("total_value column")?;
    let labels = top
        .rows()
        .iter()
        .map(|row| {
            row[0]
                .as_ref()
                .map(Value::as_display)
                .unwrap_or_else(|| "NA".to_string())
        })
        .collect::<Vec<_>>();
    let values = top
        .rows()
        .iter()
        .map(|row| row[total].as_ref().and_then(Value::as_f64).unwrap_or(0.0))
        .collect::<Vec<_>>();
    let (y_min, y_max) = value_range(values.iter().copied());

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Top 10 Products by Sales", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(120)
        .y_label_area_size(80)
        .build_cartesian_2d(0..values.len() as i32, y_min..y_max)?;
    chart
        .configure_mesh()
        .x_desc("Product")
        .y_desc("Total Sales Value")
        .x_label_formatter(&|idx| {
            usize::try_from(*idx)
                .ok()
                .and_then(|idx| labels.get(idx).cloned())
                .unwrap_or_default()
        })
        .draw()?;
    for (idx, value) in values.iter().enumerate() {
        chart.draw_series(std::iter::once(Rectangle::new(
            [(idx as i32, 0.0), (idx as i32 + 1, *value)],
            BLUE.filled(),
        )))?;
    }
    root.present()?;
    Ok(())
}

/// 50-bin histogram of the cleaned `quantity` column.
pub fn render_quantity_histogram(table: &Table, path: &Path) -> Result<()> {
    let Some(quantity) = table.column_index(QUANTITY) else {
        return Ok(());
    };
    let values = table
        .column(quantity)
        .filter_map(|cell| cell.and_then(Value::as_f64))
        .collect::<Vec<_>>();
    if values.is_empty() {
        return Ok(());
    }

    const BINS: usize = 50;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = ((max - min) / BINS as f64).max(f64::EPSILON);
    let mut counts = vec![0usize; BINS];
    for value in &values {
        let bin = (((value - min) / width) as usize).min(BINS - 1);
        counts[bin] += 1;
    }
    let tallest = counts.iter().copied().max().unwrap_or(0);

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Quantity Distribution", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(min..(min + width * BINS as f64), 0usize..tallest + 1)?;
    chart
        .configure_mesh()
        .x_desc("Quantity")
        .y_desc("Frequency")
        .draw()?;
    for (bin, count) in counts.iter().enumerate() {
        let left = min + width * bin as f64;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, 0), (left + width, *count)],
            BLUE.filled(),
        )))?;
    }
    root.present()?;
    Ok(())
}

fn year_month_label(year: Option<&Value>, month: Option<&Value>) -> String {
    match (year, month) {
        (Some(Value::Integer(year)), Some(Value::Integer(month))) => {
            format!("{year}-{month:02}")
        }
        _ => "NA".to_string(),
    }
}

fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values {
        min = min.min(value);
        max = max.max(value);
    }
    let min = min.min(0.0);
    let max = max.max(0.0);
    if min == max {
        (min, max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min, max + padding)
    }
}
