//! Exact-duplicate detection and collapse.
//!
//! A row is a duplicate when every cell across every current column equals
//! another row's. All members of an equality group (first occurrence
//! included) are captured into the duplicate log before deduplication;
//! survivors keep the first occurrence per group in original relative order.

use std::collections::{HashMap, HashSet};

use log::info;

use crate::{data::Value, table::Table};

pub struct DedupeOutcome {
    pub table: Table,
    pub duplicates: Table,
}

pub fn collapse_duplicates(table: Table) -> DedupeOutcome {
    let mut counts: HashMap<&[Option<Value>], usize> = HashMap::new();
    for row in table.rows() {
        *counts.entry(row.as_slice()).or_insert(0) += 1;
    }

    let duplicated = table
        .rows()
        .iter()
        .map(|row| counts.get(row.as_slice()).copied().unwrap_or(0) > 1)
        .collect::<Vec<_>>();
    let duplicates = table.select_rows(&duplicated);

    if !duplicates.is_empty() {
        let groups = counts.values().filter(|count| **count > 1).count();
        info!(
            "Logged {} duplicate row(s) across {} equality group(s)",
            duplicates.row_count(),
            groups
        );
    }
    drop(counts);

    let mut seen: HashSet<Vec<Option<Value>>> = HashSet::new();
    let mut deduped = table;
    deduped.retain_rows(|row| seen.insert(row.to_vec()));

    DedupeOutcome {
        table: deduped,
        duplicates,
    }
}
