//! Fixed-width Reader Library
//!
//! Reads large fixed-width columnar data files whose layout is described by
//! a DDI-style XML codebook, producing typed rows one line at a time.
//!
//! This library provides tools for:
//! - Compiling a codebook into an ordered column layout
//! - Decoding fixed-width lines into integer, scaled decimal and labelled values
//! - Reading plain or gzip-compressed data files without loading them whole
//! - Collecting rows into a Polars `DataFrame`
//!
//! ```no_run
//! use fwf_reader::{LabelDecoding, ReadOptions, read_dataframe};
//!
//! # fn example() -> fwf_reader::Result<()> {
//! let options = ReadOptions::default().with_label_decoding(LabelDecoding::except(["COUNTY"]));
//! let frame = read_dataframe("usa_00001.xml", "usa_00001.dat.gz", &options)?;
//! println!("{}", frame.height());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod models;
pub mod record;
pub mod schema;
pub mod table;

pub use config::{LabelDecoding, ReadOptions};
pub use error::{FwfError, Result};
pub use frame::read_dataframe;
pub use models::{Compression, ReadStats, Row, UnmappedCategory, Value};
pub use record::{decode_line, decode_values};
pub use schema::{ColumnDescriptor, Layout};
pub use table::{Rows, Table, with_table};
