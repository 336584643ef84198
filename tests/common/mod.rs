#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    /// Byte-level variant for non-UTF-8 fixtures.
    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }
}

/// Raw export covering the usual data-quality defects: a duplicated row, a
/// row missing its invoice number, an unparseable date and quantity, a
/// missing description, and one extreme quantity.
pub const SAMPLE_EXPORT: &str = "\
InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country
536365,85123A,WHITE HANGING HEART,6,12/1/2010 8:26,2.55,17850,United Kingdom
536365,71053,WHITE METAL LANTERN,6,12/1/2010 8:26,3.39,17850,UK
536365,71053,WHITE METAL LANTERN,6,12/1/2010 8:26,3.39,17850,UK
,84406B,CREAM CUPID HEARTS,8,12/1/2010 8:26,2.75,17850,UK
536366,22633,HAND WARMER UNION JACK,abc,12/1/2010 8:34,1.85,,eire
536367,84879,ASSORTED COLOUR BIRD ORNAMENT,1000,12/2/2010 9:00,1.69,13047,United Kingdom
536367,22960,JAM MAKING SET,4,12/2/2010 9:00,1.25,13047,UK
536368,22961,JAM JAR SMALL,5,soon,1.95,13047,UK
536369,22962,,5,12/3/2010 10:00,1.45,12583,France
";
