//! Streaming access to row-oriented text datasets.
//!
//! A [`ParsingIterator`] composes a [`RowSource`] (where rows come from) with
//! a [`FieldParser`] (what a row means) and exposes the result through the
//! [`ForwardIterator`] protocol, holding at most one row at a time.

mod example;
mod iterator;
mod parsers;
mod parsing;
mod rows;

pub use example::SupervisedExample;
pub use iterator::{DatasetError, ForwardIterator, Results};
pub use parsers::{
    DenseEntryParser, FieldParser, LabelWeight, ParseError, SparseEntryParser, TextFormat,
    DEFAULT_MAX_DIMENSION,
};
pub use parsing::{parsing_iterator, ExampleIterator, ParsingIterator};
pub use rows::{LineSource, MemorySource, RowSource};
