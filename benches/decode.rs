use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use fwf_reader::{LabelDecoding, Layout, Table, decode_values};
use std::io::Cursor;

const CODEBOOK: &str = r#"<codeBook xmlns="ddi:codebook:2_5"><dataDscr>
  <var ID="YEAR" dcml="0"><location StartPos="1" EndPos="4"/></var>
  <var ID="SERIAL" dcml="0"><location StartPos="5" EndPos="12"/></var>
  <var ID="HHWT" dcml="2"><location StartPos="13" EndPos="22"/></var>
  <var ID="STATEFIP" dcml="0"><location StartPos="23" EndPos="24"/>
    <catgry><catValu>01</catValu><labl>Alabama</labl></catgry>
    <catgry><catValu>06</catValu><labl>California</labl></catgry>
    <catgry><catValu>36</catValu><labl>New York</labl></catgry>
  </var>
  <var ID="AGE" dcml="0"><location StartPos="25" EndPos="27"/></var>
  <var ID="SEX" dcml="0"><location StartPos="28" EndPos="28"/>
    <catgry><catValu>1</catValu><labl>Male</labl></catgry>
    <catgry><catValu>2</catValu><labl>Female</labl></catgry>
  </var>
  <var ID="INCTOT" dcml="0"><location StartPos="29" EndPos="35"/></var>
</dataDscr></codeBook>"#;

const RECORD: &[u8] = b"20190001234500001234500604210045000\n";

fn sample_data(lines: usize) -> Vec<u8> {
    RECORD.repeat(lines)
}

fn bench_decode_line(c: &mut Criterion) {
    let layout = Layout::compile(CODEBOOK, &LabelDecoding::All).unwrap();
    let mut diagnostics = Vec::new();

    c.bench_function("decode_line", |b| {
        b.iter(|| decode_values(black_box(&layout), black_box(RECORD), 1, &mut diagnostics))
    });
}

fn bench_table_rows(c: &mut Criterion) {
    let layout = Layout::compile(CODEBOOK, &LabelDecoding::All).unwrap();
    let lines = 10_000;
    let data = sample_data(lines);

    let mut group = c.benchmark_group("table_rows");
    group.throughput(Throughput::Elements(lines as u64));
    group.bench_function("plain_10k", |b| {
        b.iter(|| {
            let mut table = Table::from_reader(layout.clone(), Cursor::new(data.clone()));
            let count = table.rows().unwrap().filter(|row| row.is_ok()).count();
            black_box(count)
        })
    });
    group.finish();
}

fn bench_compile_layout(c: &mut Criterion) {
    c.bench_function("compile_layout", |b| {
        b.iter(|| Layout::compile(black_box(CODEBOOK), &LabelDecoding::All).unwrap())
    });
}

criterion_group!(
    benches,
    bench_decode_line,
    bench_table_rows,
    bench_compile_layout
);
criterion_main!(benches);
