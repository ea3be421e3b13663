//! Layout compilation from schema documents.
//!
//! Turns a DDI-style XML codebook into an ordered [`Layout`] of column
//! descriptors. Each `var` element becomes one column, classified as an
//! integer, a scaled decimal, or a categorical field depending on its
//! decimal count, its categories and the label decoding policy.

use crate::config::LabelDecoding;
use crate::constants::schema as names;
use crate::error::{FwfError, Result};
use polars::prelude::{DataType, Field, Schema};
use roxmltree::{Document, Node};
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::path::Path;
use tracing::debug;

/// One column of a fixed-width record
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnDescriptor {
    Integer {
        name: String,
        start: usize,
        end: usize,
    },
    Decimal {
        name: String,
        start: usize,
        end: usize,
        decimals: u32,
    },
    Categorical {
        name: String,
        start: usize,
        end: usize,
        labels: HashMap<String, String>,
    },
}

impl ColumnDescriptor {
    pub fn name(&self) -> &str {
        match self {
            ColumnDescriptor::Integer { name, .. }
            | ColumnDescriptor::Decimal { name, .. }
            | ColumnDescriptor::Categorical { name, .. } => name,
        }
    }

    /// One-based inclusive first byte
    pub fn start(&self) -> usize {
        match self {
            ColumnDescriptor::Integer { start, .. }
            | ColumnDescriptor::Decimal { start, .. }
            | ColumnDescriptor::Categorical { start, .. } => *start,
        }
    }

    /// One-based inclusive last byte
    pub fn end(&self) -> usize {
        match self {
            ColumnDescriptor::Integer { end, .. }
            | ColumnDescriptor::Decimal { end, .. }
            | ColumnDescriptor::Categorical { end, .. } => *end,
        }
    }

    pub fn width(&self) -> usize {
        self.end() - self.start() + 1
    }

    /// Zero-based half-open byte range within a line
    pub fn byte_range(&self) -> Range<usize> {
        self.start() - 1..self.end()
    }

    /// Static type of the decoded values
    pub fn data_type(&self) -> DataType {
        match self {
            ColumnDescriptor::Integer { .. } => DataType::Int64,
            ColumnDescriptor::Decimal { .. } => DataType::Float64,
            ColumnDescriptor::Categorical { .. } => DataType::String,
        }
    }
}

/// Ordered column descriptors compiled from one schema document
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    columns: Vec<ColumnDescriptor>,
    index: HashMap<String, usize>,
}

impl Layout {
    /// Build a layout from already classified columns
    ///
    /// Name lookups resolve to the first column with a given name;
    /// [`Layout::compile`] rejects repeated names outright.
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        let mut index = HashMap::with_capacity(columns.len());
        for (position, column) in columns.iter().enumerate() {
            index.entry(column.name().to_string()).or_insert(position);
        }
        Self { columns, index }
    }

    /// Read and compile a schema document from disk
    pub fn from_path(path: &Path, label_decoding: &LabelDecoding) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        debug!("Compiling layout from {}", path.display());
        Self::compile(&text, label_decoding)
    }

    /// Compile a schema document held in memory
    pub fn compile(xml: &str, label_decoding: &LabelDecoding) -> Result<Self> {
        let document = Document::parse(xml)?;
        let root = document.root_element();

        // All variables share the root's default namespace
        let namespace = root.lookup_namespace_uri(None);

        let mut columns = Vec::new();
        let mut seen = HashSet::new();
        for var in root
            .descendants()
            .filter(|node| is_element(node, namespace, names::VAR))
        {
            let column = compile_variable(var, namespace, label_decoding)?;
            if !seen.insert(column.name().to_string()) {
                return Err(FwfError::schema(
                    column.name(),
                    format!("duplicate {} attribute", names::ID),
                ));
            }
            columns.push(column);
        }

        let layout = Self::new(columns);
        debug!(
            "Compiled layout: {} columns, record width {}",
            layout.len(),
            layout.record_width()
        );
        Ok(layout)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDescriptor> {
        self.columns.iter()
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(ColumnDescriptor::name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn field(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.index_of(name).map(|index| &self.columns[index])
    }

    /// Minimum line length that covers every column
    pub fn record_width(&self) -> usize {
        self.columns.iter().map(ColumnDescriptor::end).max().unwrap_or(0)
    }

    /// Row shape as a polars schema
    pub fn polars_schema(&self) -> Schema {
        Schema::from_iter(
            self.columns
                .iter()
                .map(|column| Field::new(column.name().into(), column.data_type())),
        )
    }
}

impl<'a> IntoIterator for &'a Layout {
    type Item = &'a ColumnDescriptor;
    type IntoIter = std::slice::Iter<'a, ColumnDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// Classify a single `var` element
fn compile_variable(
    var: Node<'_, '_>,
    namespace: Option<&str>,
    label_decoding: &LabelDecoding,
) -> Result<ColumnDescriptor> {
    let name = var
        .attribute(names::ID)
        .ok_or_else(|| FwfError::schema("<unnamed>", format!("missing {} attribute", names::ID)))?
        .to_string();

    let decimals: u32 = parse_attribute(var, names::DECIMALS, &name)?;
    if decimals > names::MAX_DECIMALS {
        return Err(FwfError::schema(
            &name,
            format!(
                "{} of {decimals} exceeds the maximum of {}",
                names::DECIMALS,
                names::MAX_DECIMALS
            ),
        ));
    }

    let location = child(var, namespace, names::LOCATION).ok_or_else(|| {
        FwfError::schema(&name, format!("missing {} element", names::LOCATION))
    })?;
    let start: usize = parse_attribute(location, names::START_POS, &name)?;
    let end: usize = parse_attribute(location, names::END_POS, &name)?;

    if start == 0 {
        return Err(FwfError::schema(&name, "start position must be at least 1"));
    }
    if start > end {
        return Err(FwfError::schema(
            &name,
            format!("start position {start} is after end position {end}"),
        ));
    }

    if decimals > 0 {
        return Ok(ColumnDescriptor::Decimal {
            name,
            start,
            end,
            decimals,
        });
    }

    if label_decoding.decodes(&name) {
        let labels = compile_categories(var, namespace, &name)?;
        if !labels.is_empty() {
            return Ok(ColumnDescriptor::Categorical {
                name,
                start,
                end,
                labels,
            });
        }
    }

    Ok(ColumnDescriptor::Integer { name, start, end })
}

/// Collect the code to label mapping of a variable
fn compile_categories(
    var: Node<'_, '_>,
    namespace: Option<&str>,
    variable: &str,
) -> Result<HashMap<String, String>> {
    let mut labels = HashMap::new();

    for category in var
        .children()
        .filter(|node| is_element(node, namespace, names::CATEGORY))
    {
        // Codes are compared byte for byte, so padding is kept
        let code = match child(category, namespace, names::CATEGORY_VALUE) {
            Some(value) => value.text().unwrap_or_default(),
            None => category
                .attribute(names::CATEGORY_VALUE_ATTR)
                .ok_or_else(|| FwfError::schema(variable, "category without a code"))?,
        };

        let label = child(category, namespace, names::CATEGORY_LABEL)
            .ok_or_else(|| {
                FwfError::schema(variable, format!("category '{code}' without a label"))
            })?
            .text()
            .unwrap_or_default()
            .trim();

        labels.insert(code.to_string(), label.to_string());
    }

    Ok(labels)
}

fn is_element(node: &Node<'_, '_>, namespace: Option<&str>, local_name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local_name
        && node.tag_name().namespace() == namespace
}

fn child<'a, 'input>(
    node: Node<'a, 'input>,
    namespace: Option<&str>,
    local_name: &str,
) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|candidate| is_element(candidate, namespace, local_name))
}

fn parse_attribute<T: std::str::FromStr>(
    node: Node<'_, '_>,
    attribute: &str,
    variable: &str,
) -> Result<T> {
    let raw = node.attribute(attribute).ok_or_else(|| {
        FwfError::schema(
            variable,
            format!("missing {attribute} attribute on {}", node.tag_name().name()),
        )
    })?;

    raw.trim().parse().map_err(|_| {
        FwfError::schema(
            variable,
            format!("{attribute} is not a non-negative integer: '{raw}'"),
        )
    })
}
