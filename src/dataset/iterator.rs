use std::io;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use thiserror::Error;

use super::parsers::ParseError;

/// Errors surfaced while walking a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The row source failed while producing the given row (0-based).
    #[error("failed to read row {row}: {source}")]
    Io {
        /// Index of the row that could not be read.
        row: usize,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The parser rejected the given row (0-based).
    #[error("failed to parse row {row}: {source}")]
    Parse {
        /// Index of the rejected row.
        row: usize,
        /// Parser diagnostic.
        #[source]
        source: ParseError,
    },

    /// `get` or `advance` was called on an exhausted iterator.
    #[error("iterator is exhausted")]
    Exhausted,
}

impl DatasetError {
    /// Whether the error only concerns the current row, leaving the
    /// iterator usable after an `advance`.
    pub fn is_row_local(&self) -> bool {
        matches!(self, DatasetError::Parse { .. })
    }
}

/// Minimal forward-only, single-pass iteration protocol.
///
/// Callers check [`is_valid`](Self::is_valid), read the current item with
/// [`get`](Self::get) as many times as they like, then move on with
/// [`advance`](Self::advance). Once `is_valid` returns `false` it never
/// returns `true` again.
pub trait ForwardIterator<T> {
    /// Whether there is a current item. Has no side effects.
    fn is_valid(&self) -> bool;

    /// Move past the current item.
    ///
    /// Returns [`DatasetError::Exhausted`] when called on an invalid iterator.
    fn advance(&mut self) -> Result<(), DatasetError>;

    /// Produce the current item. Repeated calls without an intervening
    /// `advance` return equal values.
    ///
    /// Returns [`DatasetError::Exhausted`] when called on an invalid iterator.
    fn get(&self) -> Result<T, DatasetError>;

    /// Adapt into a standard [`Iterator`] of results.
    fn into_results(self) -> Results<Self, T>
    where
        Self: Sized,
    {
        Results::new(self)
    }
}

impl<T, I: ForwardIterator<T> + ?Sized> ForwardIterator<T> for Box<I> {
    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }

    fn advance(&mut self) -> Result<(), DatasetError> {
        (**self).advance()
    }

    fn get(&self) -> Result<T, DatasetError> {
        (**self).get()
    }
}

impl<T, I: ForwardIterator<T> + ?Sized> ForwardIterator<T> for &mut I {
    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }

    fn advance(&mut self) -> Result<(), DatasetError> {
        (**self).advance()
    }

    fn get(&self) -> Result<T, DatasetError> {
        (**self).get()
    }
}

/// [`Iterator`] view over a [`ForwardIterator`].
///
/// Each valid position yields its `get` result, so a parse failure is
/// yielded in place of its row and iteration continues. A failed `advance`
/// is yielded once after the current item, then the iterator ends.
#[derive(Debug)]
pub struct Results<I, T> {
    inner: I,
    pending: Option<DatasetError>,
    finished: bool,
    _item: PhantomData<fn() -> T>,
}

impl<I: ForwardIterator<T>, T> Results<I, T> {
    fn new(inner: I) -> Self {
        Self {
            inner,
            pending: None,
            finished: false,
            _item: PhantomData,
        }
    }

    /// Recover the wrapped forward iterator.
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: ForwardIterator<T>, T> Iterator for Results<I, T> {
    type Item = Result<T, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending.take() {
            self.finished = true;
            return Some(Err(err));
        }
        if self.finished || !self.inner.is_valid() {
            return None;
        }

        let item = self.inner.get();
        if let Err(err) = self.inner.advance() {
            self.pending = Some(err);
        }
        Some(item)
    }
}

impl<I: ForwardIterator<T>, T> FusedIterator for Results<I, T> {}
