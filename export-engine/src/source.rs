//! FILENAME: export-engine/src/source.rs
//! PURPOSE: Suppliers of records for collection-sourced rows.
//! CONTEXT: The resolver pulls records one at a time and never looks at the
//! collection directly. `IterSource` streams straight from an iterator;
//! `BufferedSource` is a queue that callers fill and that can take records
//! back at the front after they were looked ahead.

use std::borrow::Borrow;
use std::collections::VecDeque;
use std::iter::Peekable;
use std::marker::PhantomData;

/// A record plus its zero-based position in the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedRecord<R> {
    pub index: usize,
    pub record: R,
}

/// Sequential supplier of records.
pub trait RecordSource<T> {
    /// Owned or borrowed record handed to the resolver.
    type Record: Borrow<T>;

    /// Takes the next record, advancing the cursor.
    fn next_record(&mut self) -> Option<IndexedRecord<Self::Record>>;

    /// Whether another record is available. Does not consume it.
    fn has_remaining(&mut self) -> bool;
}

// ============================================================================
// ITERATOR SOURCE
// ============================================================================

/// Streams records from any iterator.
pub struct IterSource<T, I: Iterator> {
    iter: Peekable<I>,
    next_index: usize,
    _record: PhantomData<fn() -> T>,
}

impl<T, I> IterSource<T, I>
where
    I: Iterator,
    I::Item: Borrow<T>,
{
    pub fn new(records: impl IntoIterator<IntoIter = I>) -> Self {
        IterSource {
            iter: records.into_iter().peekable(),
            next_index: 0,
            _record: PhantomData,
        }
    }

    /// Number of records handed out so far.
    pub fn consumed(&self) -> usize {
        self.next_index
    }
}

impl<T, I> RecordSource<T> for IterSource<T, I>
where
    I: Iterator,
    I::Item: Borrow<T>,
{
    type Record = I::Item;

    fn next_record(&mut self) -> Option<IndexedRecord<I::Item>> {
        let record = self.iter.next()?;
        let index = self.next_index;
        self.next_index += 1;
        Some(IndexedRecord { index, record })
    }

    fn has_remaining(&mut self) -> bool {
        self.iter.peek().is_some()
    }
}

// ============================================================================
// BUFFERED SOURCE
// ============================================================================

/// Queue of records that are pushed in and drained by the resolver.
pub struct BufferedSource<T, R = T> {
    queue: VecDeque<IndexedRecord<R>>,
    next_index: usize,
    _record: PhantomData<fn() -> T>,
}

impl<T, R: Borrow<T>> BufferedSource<T, R> {
    pub fn new() -> Self {
        BufferedSource {
            queue: VecDeque::new(),
            next_index: 0,
            _record: PhantomData,
        }
    }

    /// Appends a record, assigning it the next collection index.
    pub fn push(&mut self, record: R) {
        let index = self.next_index;
        self.next_index += 1;
        self.queue.push_back(IndexedRecord { index, record });
    }

    /// Re-emits a record that was taken earlier; it keeps its original index.
    pub fn push_front(&mut self, record: IndexedRecord<R>) {
        self.queue.push_front(record);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T, R: Borrow<T>> Default for BufferedSource<T, R> {
    fn default() -> Self {
        BufferedSource::new()
    }
}

impl<T, R: Borrow<T>> Extend<R> for BufferedSource<T, R> {
    fn extend<I: IntoIterator<Item = R>>(&mut self, records: I) {
        for record in records {
            self.push(record);
        }
    }
}

impl<T, R: Borrow<T>> FromIterator<R> for BufferedSource<T, R> {
    fn from_iter<I: IntoIterator<Item = R>>(records: I) -> Self {
        let mut source = BufferedSource::new();
        source.extend(records);
        source
    }
}

impl<T, R: Borrow<T>> RecordSource<T> for BufferedSource<T, R> {
    type Record = R;

    fn next_record(&mut self) -> Option<IndexedRecord<R>> {
        self.queue.pop_front()
    }

    fn has_remaining(&mut self) -> bool {
        !self.queue.is_empty()
    }
}
