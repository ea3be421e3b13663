//! Fixed-width record decoding
//!
//! Slices one raw line into the byte ranges of a [`Layout`] and converts
//! each slice into a typed [`Value`]. Numeric failures abort the line;
//! unknown categorical codes fall back to the raw text and are reported
//! as [`UnmappedCategory`] diagnostics.

use std::sync::Arc;
use tracing::warn;

use crate::error::{FwfError, Result};
use crate::models::{Row, UnmappedCategory, Value};
use crate::schema::{ColumnDescriptor, Layout};

/// Decode one line into a row sharing the given layout
pub fn decode_line(
    layout: &Arc<Layout>,
    line: &[u8],
    line_number: usize,
    diagnostics: &mut Vec<UnmappedCategory>,
) -> Result<Row> {
    let values = decode_values(layout, line, line_number, diagnostics)?;
    Ok(Row::new(Arc::clone(layout), values))
}

/// Decode one line into values in layout order
pub fn decode_values(
    layout: &Layout,
    line: &[u8],
    line_number: usize,
    diagnostics: &mut Vec<UnmappedCategory>,
) -> Result<Vec<Value>> {
    let line = strip_line_ending(line);
    layout
        .iter()
        .map(|column| column.decode(line, line_number, diagnostics))
        .collect()
}

impl ColumnDescriptor {
    /// Decode this column's slice of a line
    pub fn decode(
        &self,
        line: &[u8],
        line_number: usize,
        diagnostics: &mut Vec<UnmappedCategory>,
    ) -> Result<Value> {
        let raw = self.slice(line, line_number)?;

        match self {
            ColumnDescriptor::Integer { name, .. } => {
                parse_integer(raw, name, line_number).map(Value::Integer)
            }
            ColumnDescriptor::Decimal { name, decimals, .. } => {
                let scaled = parse_integer(raw, name, line_number)?
                    .map(|value| scale_decimal(value, *decimals));
                Ok(Value::Decimal(scaled))
            }
            ColumnDescriptor::Categorical { name, labels, .. } => {
                let code = String::from_utf8_lossy(raw);
                match labels.get(&*code) {
                    Some(label) => Ok(Value::Label(label.clone())),
                    None => {
                        warn!(
                            field = %name,
                            raw_value = %code,
                            line_number,
                            "No label for categorical code, keeping raw value"
                        );
                        diagnostics.push(UnmappedCategory {
                            field: name.clone(),
                            raw_value: code.to_string(),
                            line_number,
                        });
                        Ok(Value::Label(code.into_owned()))
                    }
                }
            }
        }
    }

    fn slice<'a>(&self, line: &'a [u8], line_number: usize) -> Result<&'a [u8]> {
        line.get(self.byte_range())
            .ok_or_else(|| FwfError::LineTooShort {
                line_number,
                field: self.name().to_string(),
                needed: self.end(),
                actual: line.len(),
            })
    }
}

/// Parse an integer slice, treating blank text as missing
fn parse_integer(raw: &[u8], field: &str, line_number: usize) -> Result<Option<i64>> {
    let numeric_error = || FwfError::NumericParse {
        line_number,
        field: field.to_string(),
        value: String::from_utf8_lossy(raw).into_owned(),
    };

    let text = std::str::from_utf8(raw).map_err(|_| numeric_error())?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed.parse::<i64>().map(Some).map_err(|_| numeric_error())
}

/// Apply the implied decimal places of a raw integer
fn scale_decimal(value: i64, decimals: u32) -> f64 {
    // 10^d is exact up to d = 22, so the quotient is rounded only once
    value as f64 / 10f64.powi(decimals as i32)
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
