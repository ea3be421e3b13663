//! Tests for the table facade
//!
//! Fixtures are written into temporary directories: a three-variable
//! codebook (`AGE`, `INCOME`, `SEX`) and matching ten-byte records.

use flate2::Compression as GzLevel;
use flate2::write::GzEncoder;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

pub mod lifecycle;

pub const CENSUS_CODEBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<codeBook xmlns="ddi:codebook:2_5" version="2.5">
  <dataDscr>
    <var ID="AGE" name="AGE" dcml="0">
      <location StartPos="1" EndPos="3" width="3"/>
      <labl>Age</labl>
    </var>
    <var ID="INCOME" name="INCOME" dcml="2">
      <location StartPos="4" EndPos="9" width="6"/>
      <labl>Total personal income</labl>
    </var>
    <var ID="SEX" name="SEX" dcml="0">
      <location StartPos="10" EndPos="10" width="1"/>
      <labl>Sex</labl>
      <catgry><catValu>1</catValu><labl>Male</labl></catgry>
      <catgry><catValu>2</catValu><labl>Female</labl></catgry>
    </var>
  </dataDscr>
</codeBook>"#;

pub const CENSUS_RECORDS: &str = "0251234501\n   0123453\n0670000002\n";

/// Temporary directory holding a codebook and a data file
pub struct Fixture {
    pub dir: TempDir,
    pub schema_path: PathBuf,
    pub data_path: PathBuf,
}

impl Fixture {
    pub fn plain(records: &str) -> Self {
        Self::with_bytes(CENSUS_CODEBOOK, records.as_bytes(), "census.dat")
    }

    pub fn gzip(records: &str) -> Self {
        Self::with_bytes(CENSUS_CODEBOOK, &gzip_bytes(records.as_bytes()), "census.dat")
    }

    pub fn with_bytes(codebook: &str, data: &[u8], data_name: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let schema_path = dir.path().join("census.xml");
        let data_path = dir.path().join(data_name);
        fs::write(&schema_path, codebook).unwrap();
        fs::write(&data_path, data).unwrap();

        Self {
            dir,
            schema_path,
            data_path,
        }
    }
}

pub fn gzip_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), GzLevel::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}
