//! FILENAME: export-engine/src/rows.rs
//! PURPOSE: Index of a table's row definitions by anchor and by predicate.
//! CONTEXT: Built once per resolver. Anchored definitions are materialized into
//! an ordered map so the resolver can ask "is anything anchored here" and
//! "where is the next anchor" cheaply. Predicate definitions are evaluated
//! against every resolved row.

use std::collections::BTreeMap;
use std::ops::Bound;

use model::{EvalError, ModelError, RowDef, RowIndexDef, SourceRow, Table};
use smallvec::SmallVec;

/// Positions of matched definitions in the table's row list, in application order.
pub type MatchedRows = SmallVec<[usize; 4]>;

pub struct IndexedTableRows<'t, T> {
    rows: &'t [RowDef<T>],
    anchored: BTreeMap<RowIndexDef, Vec<usize>>,
    predicated: Vec<usize>,
}

impl<'t, T> IndexedTableRows<'t, T> {
    pub fn new(table: &'t Table<T>) -> Result<Self, ModelError> {
        let rows = table.rows();
        let mut anchored: BTreeMap<RowIndexDef, Vec<usize>> = BTreeMap::new();
        let mut predicated = Vec::new();

        for (position, row) in rows.iter().enumerate() {
            if let Some(anchor) = &row.qualifier.anchor {
                for index in anchor.materialize()? {
                    anchored.entry(index).or_default().push(position);
                }
            }
            if row.qualifier.predicate.is_some() {
                predicated.push(position);
            }
        }

        Ok(IndexedTableRows {
            rows,
            anchored,
            predicated,
        })
    }

    /// Definitions anchored at `index`, in declaration order.
    pub fn rows_at(&self, index: RowIndexDef) -> &[usize] {
        self.anchored
            .get(&index)
            .map(|rows| rows.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_rows_at(&self, index: RowIndexDef) -> bool {
        self.anchored.contains_key(&index)
    }

    /// First anchor strictly after `index`.
    pub fn next_anchor_after(&self, index: RowIndexDef) -> Option<RowIndexDef> {
        self.anchored
            .range((Bound::Excluded(index), Bound::Unbounded))
            .next()
            .map(|(anchor, _)| *anchor)
    }

    /// All definitions that apply to `source_row`: predicate matches first, then
    /// definitions anchored at the row. A definition applies when its anchor
    /// or its predicate matches; one matching both is applied once, with the
    /// anchored rows. Every predicate is evaluated.
    pub fn select(&self, source_row: &SourceRow<'_, T>) -> Result<MatchedRows, EvalError> {
        let anchored_here = self.rows_at(source_row.row_index.def());
        let mut matched = MatchedRows::new();

        for &position in &self.predicated {
            if let Some(predicate) = &self.rows[position].qualifier.predicate {
                if predicate.test(source_row)? && !anchored_here.contains(&position) {
                    matched.push(position);
                }
            }
        }
        matched.extend(anchored_here.iter().copied());

        Ok(matched)
    }

    /// Moves every anchor after `after` (same step) down by `amount` rows.
    pub fn push_back(&mut self, after: RowIndexDef, amount: usize) {
        if amount == 0 {
            return;
        }
        let moved: Vec<RowIndexDef> = self
            .anchored
            .range((Bound::Excluded(after), Bound::Unbounded))
            .map(|(anchor, _)| *anchor)
            .filter(|anchor| anchor.step == after.step)
            .collect();

        let mut shifted = Vec::with_capacity(moved.len());
        for anchor in moved {
            if let Some(rows) = self.anchored.remove(&anchor) {
                shifted.push((anchor.shifted(amount), rows));
            }
        }
        self.anchored.extend(shifted);
    }

    pub fn anchor_count(&self) -> usize {
        self.anchored.len()
    }
}
