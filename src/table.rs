//! Table facade over one fixed-width data file.
//!
//! A [`Table`] owns the compiled [`Layout`] and the open data stream. Rows
//! are pulled one line at a time through [`Table::rows`], so files far
//! larger than memory can be read. Gzip input is detected from its magic
//! number when the table is opened.
//!
//! ```no_run
//! use fwf_reader::{ReadOptions, Table};
//!
//! # fn example() -> fwf_reader::Result<()> {
//! let mut table = Table::open("usa_00001.xml", "usa_00001.dat.gz", &ReadOptions::default())?;
//! for row in table.rows()? {
//!     let row = row?;
//!     println!("{:?}", row.get("AGE"));
//! }
//! table.close();
//! # Ok(())
//! # }
//! ```
//!
//! A table is a single-consumer cursor. [`Rows`] borrows it mutably, so one
//! table cannot be iterated from two places at once.

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ReadOptions;
use crate::constants::{GZIP_MAGIC, READ_BUFFER_CAPACITY};
use crate::error::{FwfError, Result};
use crate::models::{Compression, ReadStats, Row, UnmappedCategory};
use crate::record::decode_line;
use crate::schema::Layout;

#[cfg(test)]
mod tests;

type DataReader = Box<dyn BufRead + Send>;

/// An open fixed-width data file and the layout used to decode it
pub struct Table {
    layout: Arc<Layout>,
    reader: Option<DataReader>,
    compression: Compression,
    source: Option<PathBuf>,
    stats: ReadStats,
    consumed: bool,
}

impl Table {
    /// Open a data file described by a schema document
    pub fn open(
        schema_path: impl AsRef<Path>,
        data_path: impl AsRef<Path>,
        options: &ReadOptions,
    ) -> Result<Self> {
        let schema_path = schema_path.as_ref();
        let data_path = data_path.as_ref();

        // Both paths are checked before any parsing starts
        ensure_file(schema_path)?;
        ensure_file(data_path)?;

        let layout = Layout::from_path(schema_path, &options.label_decoding)?;
        let (reader, compression) = open_data(data_path)?;

        info!(
            "Opened {} ({:?}, {} columns)",
            data_path.display(),
            compression,
            layout.len()
        );

        Ok(Self {
            layout: Arc::new(layout),
            reader: Some(reader),
            compression,
            source: Some(data_path.to_path_buf()),
            stats: ReadStats::new(),
            consumed: false,
        })
    }

    /// Wrap an already decoded byte stream
    pub fn from_reader<R>(layout: impl Into<Arc<Layout>>, reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        Self {
            layout: layout.into(),
            reader: Some(Box::new(reader)),
            compression: Compression::Plain,
            source: None,
            stats: ReadStats::new(),
            consumed: false,
        }
    }

    /// Lazy sequence of decoded rows, in file order
    ///
    /// The sequence can be taken once per open table. It stops after the
    /// first error.
    pub fn rows(&mut self) -> Result<Rows<'_>> {
        if self.reader.is_none() {
            return Err(FwfError::Closed);
        }
        if self.consumed {
            return Err(FwfError::AlreadyConsumed);
        }
        self.consumed = true;

        Ok(Rows {
            table: self,
            buffer: Vec::with_capacity(256),
            diagnostics: Vec::new(),
            finished: false,
        })
    }

    /// Release the underlying stream; later calls do nothing
    pub fn close(&mut self) {
        if self.reader.take().is_some() {
            info!(
                "Closed {}: {} lines read, {} rows decoded, {} unmapped codes",
                self.source_name(),
                self.stats.lines_read,
                self.stats.rows_decoded,
                self.stats.unmapped_count()
            );
        }
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Shared handle on the layout, as held by every row
    pub fn shared_layout(&self) -> Arc<Layout> {
        Arc::clone(&self.layout)
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn stats(&self) -> &ReadStats {
        &self.stats
    }

    fn source_name(&self) -> String {
        self.source
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<reader>".to_string())
    }
}

impl Drop for Table {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("source", &self.source)
            .field("compression", &self.compression)
            .field("columns", &self.layout.len())
            .field("closed", &self.is_closed())
            .field("stats", &self.stats)
            .finish()
    }
}

/// Forward-only iterator over the rows of a [`Table`]
pub struct Rows<'a> {
    table: &'a mut Table,
    buffer: Vec<u8>,
    diagnostics: Vec<UnmappedCategory>,
    finished: bool,
}

impl Iterator for Rows<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let Some(reader) = self.table.reader.as_mut() else {
            self.finished = true;
            return Some(Err(FwfError::Closed));
        };

        self.buffer.clear();
        let bytes = match reader.read_until(b'\n', &mut self.buffer) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.finished = true;
                return Some(Err(e.into()));
            }
        };
        if bytes == 0 {
            self.finished = true;
            return None;
        }

        let stats = &mut self.table.stats;
        stats.lines_read += 1;
        let line_number = stats.lines_read;

        let decoded = decode_line(
            &self.table.layout,
            &self.buffer,
            line_number,
            &mut self.diagnostics,
        );
        for diagnostic in self.diagnostics.drain(..) {
            stats.record_unmapped(diagnostic);
        }

        match decoded {
            Ok(row) => {
                stats.rows_decoded += 1;
                Some(Ok(row))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Rows<'_> {}

/// Open a table, hand it to `sink`, and close it whatever the outcome
pub fn with_table<T, F>(
    schema_path: impl AsRef<Path>,
    data_path: impl AsRef<Path>,
    options: &ReadOptions,
    sink: F,
) -> Result<T>
where
    F: FnOnce(&mut Table) -> Result<T>,
{
    let mut table = Table::open(schema_path, data_path, options)?;
    let result = sink(&mut table);
    table.close();
    result
}

fn ensure_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(FwfError::NotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Open the data file, decompressing it when it starts with the gzip magic
fn open_data(path: &Path) -> Result<(DataReader, Compression)> {
    let mut file = File::open(path)?;
    let compression = sniff_compression(&mut file)?;
    debug!("Detected {:?} encoding for {}", compression, path.display());

    let reader: DataReader = match compression {
        Compression::Gzip => Box::new(BufReader::with_capacity(
            READ_BUFFER_CAPACITY,
            MultiGzDecoder::new(file),
        )),
        Compression::Plain => Box::new(BufReader::with_capacity(READ_BUFFER_CAPACITY, file)),
    };
    Ok((reader, compression))
}

/// Inspect the first two bytes, then rewind to the start of the file
fn sniff_compression(file: &mut File) -> Result<Compression> {
    let mut magic = Vec::with_capacity(GZIP_MAGIC.len());
    file.by_ref()
        .take(GZIP_MAGIC.len() as u64)
        .read_to_end(&mut magic)?;
    file.rewind()?;

    if magic == GZIP_MAGIC {
        Ok(Compression::Gzip)
    } else {
        Ok(Compression::Plain)
    }
}
