//! Orchestrates the cleaning pipeline: one input table flows through the
//! stages in order, producing the cleaned CSV plus side artifacts.

use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use encoding_rs::Encoding;
use log::{info, warn};

use crate::{
    charts, clean,
    cli::Cli,
    dedupe, io_utils, outliers,
    schema::canonicalize_headers,
    summary,
    table::Table,
};

pub const CLEANED_FILE: &str = "retail_cleaned.csv";
pub const DUPLICATES_FILE: &str = "duplicates_logged.csv";
pub const OUTLIERS_FILE: &str = "outliers_logged.csv";
pub const REVENUE_FILE: &str = "revenue_by_month.csv";
pub const TOP_PRODUCTS_FILE: &str = "top10_products_by_sales.csv";
pub const METRICS_FILE: &str = "overall_metrics.csv";
pub const FIGURES_DIR: &str = "figures";

pub fn execute(args: &Cli) -> Result<()> {
    if !args.input.is_file() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    clean_and_analyze(
        &args.input,
        &args.output,
        delimiter,
        encoding,
        args.remove_outliers,
        !args.no_charts,
    )?;
    Ok(())
}

/// Runs the whole pipeline and returns the cleaned table. Side artifacts
/// land in `output_dir`; duplicate and outlier logs are written only when
/// non-empty.
pub fn clean_and_analyze(
    input: &Path,
    output_dir: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
    remove_outliers: bool,
    render_charts: bool,
) -> Result<Table> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Creating output directory {output_dir:?}"))?;

    let mut table = io_utils::read_table(input, delimiter, encoding)
        .with_context(|| format!("Reading {input:?}"))?;
    info!(
        "Read {} row(s) across {} column(s) from '{}'",
        table.row_count(),
        table.headers().len(),
        input.display()
    );

    let canonical = canonicalize_headers(table.headers());
    table.set_headers(canonical)?;

    let table = clean::coerce_types(table);
    let table = clean::drop_invalid_invoices(table);
    let table = clean::fill_missing(table);
    let table = clean::normalize_categoricals(table);
    let table = clean::add_derived_columns(table)?;

    let deduped = dedupe::collapse_duplicates(table);
    if !deduped.duplicates.is_empty() {
        let path = output_dir.join(DUPLICATES_FILE);
        io_utils::write_table(&path, &deduped.duplicates, b',')?;
        info!("Duplicate log written to {path:?}");
    }

    let flagged = outliers::flag_outliers(deduped.table)?;
    if !flagged.outliers.is_empty() {
        let path = output_dir.join(OUTLIERS_FILE);
        io_utils::write_table(&path, &flagged.outliers, b',')?;
        info!("Outlier log written to {path:?}");
    }
    let table = if remove_outliers {
        outliers::remove_flagged(flagged.table, &flagged.flag_columns)
    } else {
        flagged.table
    };

    let cleaned_path = output_dir.join(CLEANED_FILE);
    io_utils::write_table(&cleaned_path, &table, b',')?;
    info!(
        "Cleaned data with {} row(s) written to {cleaned_path:?}",
        table.row_count()
    );

    let revenue = summary::revenue_by_month(&table);
    if !revenue.is_empty() {
        io_utils::write_table(&output_dir.join(REVENUE_FILE), &revenue, b',')?;
    }
    let top = summary::top_products(&table);
    if !top.is_empty() {
        io_utils::write_table(&output_dir.join(TOP_PRODUCTS_FILE), &top, b',')?;
    }
    let metrics = summary::overall_metrics(&table);
    io_utils::write_table(&output_dir.join(METRICS_FILE), &metrics, b',')?;
    info!("Summary tables written to {output_dir:?}");

    if render_charts {
        let figures_dir = output_dir.join(FIGURES_DIR);
        fs::create_dir_all(&figures_dir)
            .with_context(|| format!("Creating figures directory {figures_dir:?}"))?;
        let renders: [(&str, Result<()>); 3] = [
            (
                "monthly_revenue.png",
                charts::render_monthly_revenue(&revenue, &figures_dir.join("monthly_revenue.png")),
            ),
            (
                "top10_products_by_sales.png",
                charts::render_top_products(
                    &top,
                    &figures_dir.join("top10_products_by_sales.png"),
                ),
            ),
            (
                "quantity_distribution.png",
                charts::render_quantity_histogram(
                    &table,
                    &figures_dir.join("quantity_distribution.png"),
                ),
            ),
        ];
        for (name, outcome) in renders {
            if let Err(err) = outcome {
                warn!("Skipping chart '{name}': {err:#}");
            }
        }
    }

    Ok(table)
}
