use tracing::{debug, trace};

use super::{DatasetError, FieldParser, ForwardIterator, LabelWeight, RowSource, SupervisedExample};

/// Boxed sequence of examples, independent of the row source and parser.
pub type ExampleIterator = Box<dyn ForwardIterator<SupervisedExample>>;

/// Lazily turns the rows of a [`RowSource`] into [`SupervisedExample`]s.
///
/// The iterator owns both collaborators. Validity and advancement are
/// delegated to the row source; parsing happens only in [`get`], on every
/// call, so rows the caller never inspects are never parsed and no example
/// is cached between calls.
///
/// A row the parser rejects is reported from [`get`] as
/// [`DatasetError::Parse`] while the iterator stays on that row; calling
/// [`advance`] skips it. A failing row source ends iteration with
/// [`DatasetError::Io`].
///
/// [`get`]: ForwardIterator::get
/// [`advance`]: ForwardIterator::advance
#[derive(Debug)]
pub struct ParsingIterator<R, P> {
    rows: R,
    parser: P,
    row: usize,
}

impl<R: RowSource, P: FieldParser> ParsingIterator<R, P> {
    /// Take ownership of a row source and a parser.
    pub fn new(rows: R, parser: P) -> Self {
        debug!(valid = rows.is_valid(), "parsing iterator created");
        Self {
            rows,
            parser,
            row: 0,
        }
    }

    /// Zero-based index of the current row.
    pub fn row_index(&self) -> usize {
        self.row
    }

    /// Release the row source and parser.
    pub fn into_parts(self) -> (R, P) {
        (self.rows, self.parser)
    }
}

impl<R: RowSource, P: FieldParser> ForwardIterator<SupervisedExample> for ParsingIterator<R, P> {
    fn is_valid(&self) -> bool {
        self.rows.is_valid()
    }

    fn advance(&mut self) -> Result<(), DatasetError> {
        if !self.rows.is_valid() {
            return Err(DatasetError::Exhausted);
        }

        let next_row = self.row + 1;
        self.rows
            .advance()
            .map_err(|source| DatasetError::Io {
                row: next_row,
                source,
            })?;
        self.row = next_row;

        if !self.rows.is_valid() {
            debug!(rows = self.row, "row source exhausted");
        }
        Ok(())
    }

    fn get(&self) -> Result<SupervisedExample, DatasetError> {
        let text = self.rows.current().ok_or(DatasetError::Exhausted)?;
        trace!(row = self.row, "parsing row");

        let mut features = Vec::new();
        let LabelWeight { label, weight } = self
            .parser
            .parse(text, &mut features)
            .map_err(|source| DatasetError::Parse {
                row: self.row,
                source,
            })?;
        Ok(SupervisedExample::new(features, label, weight))
    }
}

/// Build a [`ParsingIterator`] behind the uniform [`ExampleIterator`] box.
pub fn parsing_iterator<R, P>(rows: R, parser: P) -> ExampleIterator
where
    R: RowSource + 'static,
    P: FieldParser + 'static,
{
    Box::new(ParsingIterator::new(rows, parser))
}
