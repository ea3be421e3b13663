//! Close, single-pass and scoped acquisition behaviour

use super::*;
use crate::config::ReadOptions;
use crate::error::FwfError;
use crate::table::{Table, with_table};

fn open_fixture(fixture: &Fixture) -> Table {
    Table::open(
        &fixture.schema_path,
        &fixture.data_path,
        &ReadOptions::default(),
    )
    .unwrap()
}

#[test]
fn test_close_twice_is_a_no_op() {
    let fixture = Fixture::plain(CENSUS_RECORDS);
    let mut table = open_fixture(&fixture);

    assert!(!table.is_closed());
    table.close();
    assert!(table.is_closed());
    table.close();
    assert!(table.is_closed());
}

#[test]
fn test_rows_after_close_are_rejected() {
    let fixture = Fixture::plain(CENSUS_RECORDS);
    let mut table = open_fixture(&fixture);

    table.close();
    assert!(matches!(table.rows(), Err(FwfError::Closed)));
}

#[test]
fn test_rows_can_only_be_taken_once() {
    let fixture = Fixture::plain(CENSUS_RECORDS);
    let mut table = open_fixture(&fixture);

    let first: Vec<_> = table.rows().unwrap().take(1).collect();
    assert_eq!(first.len(), 1);

    assert!(matches!(table.rows(), Err(FwfError::AlreadyConsumed)));
}

#[test]
fn test_reopen_restarts_from_the_beginning() {
    let fixture = Fixture::plain(CENSUS_RECORDS);

    let mut first = open_fixture(&fixture);
    let first_rows = first.rows().unwrap().collect::<crate::Result<Vec<_>>>().unwrap();
    first.close();

    let mut second = open_fixture(&fixture);
    let second_rows = second.rows().unwrap().collect::<crate::Result<Vec<_>>>().unwrap();

    assert_eq!(first_rows, second_rows);
}

#[test]
fn test_abandoned_iteration_can_still_close() {
    let fixture = Fixture::plain(CENSUS_RECORDS);
    let mut table = open_fixture(&fixture);

    {
        let mut rows = table.rows().unwrap();
        assert!(rows.next().unwrap().is_ok());
    }

    assert_eq!(table.stats().lines_read, 1);
    table.close();
    assert!(table.is_closed());
}

#[test]
fn test_with_table_returns_sink_value_and_closes() {
    let fixture = Fixture::plain(CENSUS_RECORDS);

    let count = with_table(
        &fixture.schema_path,
        &fixture.data_path,
        &ReadOptions::default(),
        |table| {
            let count = table.rows()?.filter(|row| row.is_ok()).count();
            assert!(!table.is_closed());
            Ok(count)
        },
    )
    .unwrap();

    assert_eq!(count, 3);
}

#[test]
fn test_with_table_propagates_sink_error() {
    let fixture = Fixture::plain("0251234501\n02x0000002\n");

    let result = with_table(
        &fixture.schema_path,
        &fixture.data_path,
        &ReadOptions::default(),
        |table| table.rows()?.collect::<crate::Result<Vec<_>>>(),
    );

    match result.unwrap_err() {
        FwfError::NumericParse {
            line_number, field, ..
        } => {
            assert_eq!(line_number, 2);
            assert_eq!(field, "AGE");
        }
        other => panic!("Expected NumericParse error, got {:?}", other),
    }
}

#[test]
fn test_with_table_reports_open_errors() {
    let fixture = Fixture::plain(CENSUS_RECORDS);
    let missing = fixture.dir.path().join("missing.dat");

    let result = with_table(
        &fixture.schema_path,
        &missing,
        &ReadOptions::default(),
        |_| -> crate::Result<()> { panic!("sink must not run when open fails") },
    );

    assert!(matches!(result, Err(FwfError::NotFound { path }) if path == missing));
}
