//! Canonical column registry and header harmonization.
//!
//! Raw exports spell the same fields many ways (`InvoiceNo`, `invoice_no`,
//! `Invoice Number`). Every header is first normalized (trim, lowercase,
//! spaces/hyphens to underscores), then matched against an ordered alias
//! table per canonical column. The first alias that matches wins and later
//! aliases for the same target are ignored; at most one source column maps
//! to each canonical name. Unmatched headers keep their normalized form.

pub const INVOICE_NO: &str = "invoice_no";
pub const INVOICE_DATE: &str = "invoice_date";
pub const STOCK_CODE: &str = "stock_code";
pub const DESCRIPTION: &str = "description";
pub const QUANTITY: &str = "quantity";
pub const UNIT_PRICE: &str = "unit_price";
pub const CUSTOMER_ID: &str = "customer_id";
pub const COUNTRY: &str = "country";

pub const TOTAL_VALUE: &str = "total_value";
pub const YEAR: &str = "year";
pub const MONTH: &str = "month";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    Text,
    Numeric,
    Date,
}

#[derive(Debug)]
pub struct CanonicalColumn {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub datatype: SemanticType,
}

/// Priority-ordered alias table; aliases are matched against
/// already-normalized headers.
pub const CANONICAL_COLUMNS: &[CanonicalColumn] = &[
    CanonicalColumn {
        name: INVOICE_NO,
        aliases: &["invoiceno", "invoice_no", "invoice_number"],
        datatype: SemanticType::Text,
    },
    CanonicalColumn {
        name: INVOICE_DATE,
        aliases: &["invoicedate", "invoice_date", "date"],
        datatype: SemanticType::Date,
    },
    CanonicalColumn {
        name: STOCK_CODE,
        aliases: &["stockcode", "stock_code", "product_code"],
        datatype: SemanticType::Text,
    },
    CanonicalColumn {
        name: DESCRIPTION,
        aliases: &["description", "product_description", "item_description"],
        datatype: SemanticType::Text,
    },
    CanonicalColumn {
        name: QUANTITY,
        aliases: &["quantity", "qty"],
        datatype: SemanticType::Numeric,
    },
    CanonicalColumn {
        name: UNIT_PRICE,
        aliases: &["unitprice", "unit_price", "price"],
        datatype: SemanticType::Numeric,
    },
    CanonicalColumn {
        name: CUSTOMER_ID,
        aliases: &["customerid", "customer_id", "cust_id"],
        datatype: SemanticType::Numeric,
    },
    CanonicalColumn {
        name: COUNTRY,
        aliases: &["country", "market"],
        datatype: SemanticType::Text,
    },
];

/// Columns eligible for IQR outlier flagging.
pub const OUTLIER_COLUMNS: &[&str] = &[QUANTITY, UNIT_PRICE];

pub fn outlier_flag_column(column: &str) -> String {
    format!("is_outlier_{column}")
}

pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other,
        })
        .collect()
}

/// Maps a raw header list onto the canonical name set. Pure function of the
/// header list; column order is preserved.
pub fn canonicalize_headers(headers: &[String]) -> Vec<String> {
    let mut result = headers
        .iter()
        .map(|h| normalize_header(h))
        .collect::<Vec<_>>();
    let mut claimed = vec![false; result.len()];
    for column in CANONICAL_COLUMNS {
        'aliases: for alias in column.aliases {
            for idx in 0..result.len() {
                if !claimed[idx] && result[idx].eq_ignore_ascii_case(alias) {
                    result[idx] = column.name.to_string();
                    claimed[idx] = true;
                    break 'aliases;
                }
            }
        }
    }
    result
}

pub fn declared_type(name: &str) -> Option<SemanticType> {
    CANONICAL_COLUMNS
        .iter()
        .find(|column| column.name == name)
        .map(|column| column.datatype)
}
