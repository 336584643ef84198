//! In-memory record table shared by every pipeline stage.
//!
//! A [`Table`] is an ordered header list plus rows of typed cells where
//! `None` marks a missing value. Stages take a table by value and return a
//! new one; nothing mutates a table another stage still holds.

use anyhow::{Result, anyhow};

use crate::data::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<Value>>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<Value>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column)).and_then(|c| c.as_ref())
    }

    pub fn push_row(&mut self, row: Vec<Option<Value>>) -> Result<()> {
        if row.len() != self.headers.len() {
            return Err(anyhow!(
                "Row has {} cell(s) but the table has {} column(s)",
                row.len(),
                self.headers.len()
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn set_headers(&mut self, headers: Vec<String>) -> Result<()> {
        if headers.len() != self.headers.len() {
            return Err(anyhow!(
                "Header list has {} name(s) but the table has {} column(s)",
                headers.len(),
                self.headers.len()
            ));
        }
        self.headers = headers;
        Ok(())
    }

    /// Appends a column; `values` must carry one cell per existing row.
    pub fn push_column(&mut self, name: &str, values: Vec<Option<Value>>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(anyhow!(
                "Column '{}' has {} value(s) but the table has {} row(s)",
                name,
                values.len(),
                self.rows.len()
            ));
        }
        self.headers.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Rewrites every cell of `name` in place; a no-op when the column is
    /// absent. Returns whether the column existed.
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> bool
    where
        F: FnMut(Option<Value>) -> Option<Value>,
    {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        for row in &mut self.rows {
            let current = row[idx].take();
            row[idx] = f(current);
        }
        true
    }

    pub fn retain_rows<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&[Option<Value>]) -> bool,
    {
        self.rows.retain(|row| predicate(row));
    }

    /// Borrowed view of one column, row order preserved.
    pub fn column(&self, index: usize) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.rows.iter().map(move |row| row.get(index).and_then(|c| c.as_ref()))
    }

    /// Shallow copy of `self` holding only the rows selected by `keep`.
    pub fn select_rows(&self, keep: &[bool]) -> Table {
        let rows = self
            .rows
            .iter()
            .zip(keep)
            .filter(|(_, keep)| **keep)
            .map(|(row, _)| row.clone())
            .collect();
        Table {
            headers: self.headers.clone(),
            rows,
        }
    }
}
