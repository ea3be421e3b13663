//! Core data structures for decoded rows.
//!
//! Defines decoded values, rows, read statistics and the non-fatal
//! diagnostics raised while decoding categorical fields.

use crate::constants::UNMAPPED_SAMPLE_LIMIT;
use crate::schema::Layout;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// One decoded field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Integer field; `None` when the field was blank
    Integer(Option<i64>),
    /// Scaled decimal field; `None` when the field was blank
    Decimal(Option<f64>),
    /// Categorical field, either the mapped label or the raw code
    Label(String),
}

impl Value {
    /// Whether the value is a missing numeric
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Integer(None) | Value::Decimal(None))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => *value,
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Decimal(value) => *value,
            Value::Integer(value) => value.map(|v| v as f64),
            Value::Label(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Label(label) => Some(label),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(Some(v)) => write!(f, "{v}"),
            Value::Decimal(Some(v)) => write!(f, "{v}"),
            Value::Integer(None) | Value::Decimal(None) => f.write_str("missing"),
            Value::Label(label) => f.write_str(label),
        }
    }
}

/// A decoded record whose shape is fixed by the table's layout
#[derive(Debug, Clone)]
pub struct Row {
    layout: Arc<Layout>,
    values: Vec<Value>,
}

impl Row {
    pub(crate) fn new(layout: Arc<Layout>, values: Vec<Value>) -> Self {
        Self { layout, values }
    }

    /// Look up a value by column name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.layout.index_of(name).map(|index| &self.values[index])
    }

    /// Values in layout order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Column names paired with their values, in layout order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.layout.names().zip(self.values.iter())
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values && self.layout.names().eq(other.layout.names())
    }
}

/// A categorical code absent from its variable's label mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmappedCategory {
    pub field: String,
    pub raw_value: String,
    pub line_number: usize,
}

impl fmt::Display for UnmappedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: no label for code '{}' in {}",
            self.line_number, self.raw_value, self.field
        )
    }
}

/// Encoding of the data stream detected at open time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compression {
    Plain,
    Gzip,
}

/// Statistics gathered while reading one table
///
/// Memory stays bounded however many codes fall back: only the first
/// [`UNMAPPED_SAMPLE_LIMIT`] diagnostics are kept, the rest are counted.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ReadStats {
    /// Lines pulled from the data stream
    pub lines_read: usize,

    /// Lines successfully decoded into rows
    pub rows_decoded: usize,

    /// Categorical codes that fell back to their raw value
    pub unmapped_total: usize,

    /// Fallback counts per field
    pub unmapped_by_field: BTreeMap<String, usize>,

    /// The earliest fallbacks, in file order
    pub unmapped_sample: Vec<UnmappedCategory>,
}

impl ReadStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of categorical fallbacks seen so far
    pub fn unmapped_count(&self) -> usize {
        self.unmapped_total
    }

    /// Count one fallback, keeping it verbatim while the sample has room
    pub fn record_unmapped(&mut self, diagnostic: UnmappedCategory) {
        self.unmapped_total += 1;
        match self.unmapped_by_field.get_mut(&diagnostic.field) {
            Some(count) => *count += 1,
            None => {
                self.unmapped_by_field.insert(diagnostic.field.clone(), 1);
            }
        }
        if self.unmapped_sample.len() < UNMAPPED_SAMPLE_LIMIT {
            self.unmapped_sample.push(diagnostic);
        }
    }
}
