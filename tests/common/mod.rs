#![allow(dead_code)]

use std::fs;
use std::path::Path;

use exemplar::{
    ForwardIterator, MemorySource, ParsingIterator, SparseEntryParser, SupervisedExample,
};

/// Compare `actual` against `tests/snapshots/<name>`, rewriting the file
/// instead when `EXEMPLAR_UPDATE_SNAPSHOTS` is set.
pub fn assert_snapshot(name: &str, actual: &str) {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/snapshots").join(name);
    if std::env::var_os("EXEMPLAR_UPDATE_SNAPSHOTS").is_some() {
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected = fs::read_to_string(&path).expect("snapshot exists");
    assert_eq!(
        expected.replace("\r\n", "\n").trim_end(),
        actual.trim_end(),
        "snapshot {} is stale; set EXEMPLAR_UPDATE_SNAPSHOTS=1 to regenerate",
        name
    );
}

pub type SparseRows<S> = ParsingIterator<MemorySource<S>, SparseEntryParser>;

/// Sparse-row iterator over in-memory rows.
pub fn sparse_rows<S: AsRef<str>>(rows: Vec<S>) -> SparseRows<S> {
    ParsingIterator::new(MemorySource::new(rows), SparseEntryParser::default())
}

/// Walk `iter` with the raw protocol, panicking on any error.
pub fn drain<I: ForwardIterator<SupervisedExample>>(mut iter: I) -> Vec<SupervisedExample> {
    let mut examples = Vec::new();
    while iter.is_valid() {
        examples.push(iter.get().expect("row parses"));
        iter.advance().expect("row source advances");
    }
    examples
}
