//! FILENAME: export-engine/src/iterator.rs
//! PURPOSE: Pull-based iteration over resolved rows.
//! CONTEXT: Hides index gaps and lookahead from the render driver. `has_next`
//! resolves one row ahead and keeps it until `next_row` hands it out, so
//! asking twice never consumes a second record.

use model::RowIndex;

use crate::error::ExportError;
use crate::resolver::{ResolvedRow, RowContextResolver};
use crate::source::RecordSource;

pub struct RowContextIterator<'t, T, S> {
    resolver: RowContextResolver<'t, T, S>,
    requested: RowIndex,
    lookahead: Option<ResolvedRow<T>>,
    finished: bool,
}

impl<'t, T, S: RecordSource<T>> RowContextIterator<'t, T, S> {
    pub fn new(resolver: RowContextResolver<'t, T, S>) -> Self {
        RowContextIterator {
            resolver,
            requested: RowIndex::zero(),
            lookahead: None,
            finished: false,
        }
    }

    /// Whether another row exists. Idempotent until `next_row` is called.
    pub fn has_next(&mut self) -> Result<bool, ExportError> {
        if self.lookahead.is_some() {
            return Ok(true);
        }
        if self.finished {
            return Ok(false);
        }
        match self.resolver.resolve(self.requested) {
            Ok(Some(row)) => {
                self.lookahead = Some(row);
                Ok(true)
            }
            Ok(None) => {
                self.finished = true;
                Ok(false)
            }
            Err(e) => {
                self.finished = true;
                Err(e)
            }
        }
    }

    /// Hands out the looked-ahead row, resolving it first if `has_next` was not called.
    pub fn next_row(&mut self) -> Result<Option<ResolvedRow<T>>, ExportError> {
        if !self.has_next()? {
            return Ok(None);
        }
        let row = self.lookahead.take();
        if let Some(row) = &row {
            self.requested = row.next_index;
        }
        Ok(row)
    }

    /// Index the next resolution starts from.
    pub fn requested(&self) -> RowIndex {
        self.requested
    }

    pub fn resolver(&self) -> &RowContextResolver<'t, T, S> {
        &self.resolver
    }
}

impl<'t, T, S: RecordSource<T>> Iterator for RowContextIterator<'t, T, S> {
    type Item = Result<ResolvedRow<T>, ExportError>;

    /// Yields each row; after an error the iterator is exhausted.
    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

impl<'t, T, S: RecordSource<T>> std::iter::FusedIterator for RowContextIterator<'t, T, S> {}

impl<'t, T, S: RecordSource<T>> IntoIterator for RowContextResolver<'t, T, S> {
    type Item = Result<ResolvedRow<T>, ExportError>;
    type IntoIter = RowContextIterator<'t, T, S>;

    fn into_iter(self) -> Self::IntoIter {
        RowContextIterator::new(self)
    }
}
