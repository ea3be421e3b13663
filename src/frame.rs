//! Polars sink for decoded rows.
//!
//! Drains a [`Table`] into a [`DataFrame`] with one typed column per
//! layout column: nullable `Int64` for integers, nullable `Float64` for
//! scaled decimals, `String` for categorical labels.

use polars::prelude::{Column, DataFrame};
use std::path::Path;
use tracing::debug;

use crate::config::ReadOptions;
use crate::error::Result;
use crate::models::Value;
use crate::schema::ColumnDescriptor;
use crate::table::{Table, with_table};

/// Per-column value buffer
enum ColumnBuilder {
    Integer(Vec<Option<i64>>),
    Decimal(Vec<Option<f64>>),
    Label(Vec<String>),
}

impl ColumnBuilder {
    fn for_column(column: &ColumnDescriptor) -> Self {
        match column {
            ColumnDescriptor::Integer { .. } => ColumnBuilder::Integer(Vec::new()),
            ColumnDescriptor::Decimal { .. } => ColumnBuilder::Decimal(Vec::new()),
            ColumnDescriptor::Categorical { .. } => ColumnBuilder::Label(Vec::new()),
        }
    }

    fn push(&mut self, value: Value) {
        match (self, value) {
            (ColumnBuilder::Integer(values), value) => values.push(value.as_i64()),
            (ColumnBuilder::Decimal(values), value) => values.push(value.as_f64()),
            (ColumnBuilder::Label(values), Value::Label(label)) => values.push(label),
            (ColumnBuilder::Label(values), value) => values.push(value.to_string()),
        }
    }

    fn finish(self, name: &str) -> Column {
        match self {
            ColumnBuilder::Integer(values) => Column::new(name.into(), values),
            ColumnBuilder::Decimal(values) => Column::new(name.into(), values),
            ColumnBuilder::Label(values) => Column::new(name.into(), values),
        }
    }
}

impl Table {
    /// Drain the remaining rows into a data frame
    ///
    /// Counts as the table's single pass over its rows.
    pub fn to_dataframe(&mut self) -> Result<DataFrame> {
        let layout = self.shared_layout();
        let mut builders: Vec<ColumnBuilder> =
            layout.iter().map(ColumnBuilder::for_column).collect();

        for row in self.rows()? {
            for (builder, value) in builders.iter_mut().zip(row?.into_values()) {
                builder.push(value);
            }
        }

        let columns = builders
            .into_iter()
            .zip(layout.names())
            .map(|(builder, name)| builder.finish(name))
            .collect();
        let frame = DataFrame::new(columns)?;

        debug!(
            "Materialised {} rows x {} columns",
            frame.height(),
            frame.width()
        );
        Ok(frame)
    }
}

/// Read a whole data file into a data frame, closing it afterwards
pub fn read_dataframe(
    schema_path: impl AsRef<Path>,
    data_path: impl AsRef<Path>,
    options: &ReadOptions,
) -> Result<DataFrame> {
    with_table(schema_path, data_path, options, Table::to_dataframe)
}
