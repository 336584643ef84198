use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about = "Clean and analyze retail sales exports", long_about = None)]
pub struct Cli {
    /// Raw retail CSV to clean
    #[arg(short = 'i', long = "input", default_value = "raw_retail.csv")]
    pub input: PathBuf,
    /// Directory for cleaned data, logs, summaries, and figures
    #[arg(short = 'o', long = "output", default_value = "outputs")]
    pub output: PathBuf,
    /// Remove flagged quantity/price outliers instead of only tagging them
    #[arg(long = "remove-outliers")]
    pub remove_outliers: bool,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to iso-8859-1)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Skip chart rendering
    #[arg(long = "no-charts")]
    pub no_charts: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_delimiter_accepts_named_forms() {
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("pipe").unwrap(), b'|');
    }

    #[test]
    fn parse_delimiter_rejects_multibyte_input() {
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("||").is_err());
        assert!(parse_delimiter("→").is_err());
    }
}
