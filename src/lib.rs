//! # Streaming supervised examples from row-oriented text
//!
//! This library turns a raw text dataset into a lazy, single-pass sequence of
//! labeled, weighted feature vectors without materializing more than one row
//! at a time, which keeps ingestion usable under tight memory budgets.
//!
//! ## Core Pieces
//!
//! 1. **Row sources** yield raw rows on demand ([`RowSource`]).
//! 2. **Field parsers** turn one row into features, a label and a weight
//!    ([`FieldParser`]).
//! 3. **Parsing iterators** compose the two behind the [`ForwardIterator`]
//!    protocol ([`ParsingIterator`], [`parsing_iterator`]).
//! 4. **Predictors** score examples and round-trip through type-tagged
//!    archives ([`Predictor`], [`PredictorRegistry`]).
//!
//! ## Usage Example
//!
//! ```
//! use exemplar::{ForwardIterator, MemorySource, SparseEntryParser, parsing_iterator};
//!
//! let rows = MemorySource::new(vec!["1:3.0 2:1.5\t0\t1.0", "1:0.0 2:2.0\t1\t0.5"]);
//! let mut examples = parsing_iterator(rows, SparseEntryParser::default());
//!
//! let mut labels = Vec::new();
//! while examples.is_valid() {
//!     labels.push(examples.get()?.label());
//!     examples.advance()?;
//! }
//! assert_eq!(labels, vec![0.0, 1.0]);
//! # Ok::<(), exemplar::DatasetError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod dataset;     // Row sources, parsers and the parsing iterator
pub mod predictors;  // Predictor family and archives
pub mod evaluation;  // Single-pass dataset consumers

// Re-exports for convenience
pub use dataset::{
    parsing_iterator, DatasetError, DenseEntryParser, ExampleIterator, FieldParser,
    ForwardIterator, LabelWeight, LineSource, MemorySource, ParseError, ParsingIterator,
    RowSource, SparseEntryParser, SupervisedExample, TextFormat,
};
pub use evaluation::{DatasetSummary, Evaluation, RowErrorPolicy};
pub use predictors::{
    Archivable, Archive, ArchiveError, ConstantPredictor, LinearPredictor, Predictor,
    PredictorRegistry,
};

use std::io::{self, BufRead};
use std::path::Path;

/// Encoding of the feature field in a text dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FeatureEncoding {
    /// `index:value` pairs.
    #[default]
    Sparse,
    /// Comma or whitespace separated values.
    Dense,
}

impl FeatureEncoding {
    /// Build an [`ExampleIterator`] over `reader` with the matching parser.
    pub fn examples<R>(self, reader: R, format: TextFormat) -> io::Result<ExampleIterator>
    where
        R: BufRead + 'static,
    {
        let rows = LineSource::new(reader)?;
        Ok(match self {
            FeatureEncoding::Sparse => parsing_iterator(rows, SparseEntryParser::new(format)),
            FeatureEncoding::Dense => parsing_iterator(rows, DenseEntryParser::new(format)),
        })
    }

    /// Open a dataset file as an [`ExampleIterator`].
    pub fn open<P: AsRef<Path>>(self, path: P, format: TextFormat) -> io::Result<ExampleIterator> {
        let file = std::fs::File::open(path)?;
        self.examples(io::BufReader::new(file), format)
    }
}
