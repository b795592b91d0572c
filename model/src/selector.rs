//! FILENAME: model/src/selector.rs
//! PURPOSE: Row indices and the anchors/qualifiers that attach row definitions to them.
//! CONTEXT: A row definition applies to a resolved row either because it is
//! anchored at that row's index or because its predicate matches the row.
//! Indices can be expressed relative to a step (a named phase of the row
//! sequence), so footers can be anchored "right after the last data row"
//! without knowing how many records there are.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::expression::RowPredicate;

// ============================================================================
// STEPS AND INDICES
// ============================================================================

/// Named phase of the row sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Rows placed after the record collection is exhausted.
    TrailingRows,
}

/// Definition-time row index.
///
/// Ordering puts every step-less index before stepped ones, then orders by
/// step and finally by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowIndexDef {
    // Field order drives the derived ordering.
    pub step: Option<Step>,
    pub index: usize,
}

impl RowIndexDef {
    pub fn new(index: usize) -> Self {
        RowIndexDef { step: None, index }
    }

    pub fn in_step(index: usize, step: Step) -> Self {
        RowIndexDef {
            step: Some(step),
            index,
        }
    }

    pub fn trailing(index: usize) -> Self {
        RowIndexDef::in_step(index, Step::TrailingRows)
    }

    /// Same step, index shifted by `amount`.
    pub fn shifted(&self, amount: usize) -> Self {
        RowIndexDef {
            step: self.step,
            index: self.index + amount,
        }
    }
}

impl fmt::Display for RowIndexDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step {
            None => write!(f, "{}", self.index),
            Some(step) => write!(f, "{:?}+{}", step, self.index),
        }
    }
}

/// Position inside a step: the relative index and the absolute row the step began at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepIndex {
    pub step: Step,
    pub index: usize,
    pub start: usize,
}

/// Runtime row index: an absolute row number plus, when inside a step, the
/// position relative to the step start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowIndex {
    pub value: usize,
    pub step: Option<StepIndex>,
}

impl RowIndex {
    pub fn new(value: usize) -> Self {
        RowIndex { value, step: None }
    }

    pub fn zero() -> Self {
        RowIndex::new(0)
    }

    /// The definition index that anchors at this row.
    pub fn def(&self) -> RowIndexDef {
        match self.step {
            Some(step) => RowIndexDef::in_step(step.index, step.step),
            None => RowIndexDef::new(self.value),
        }
    }

    /// Moves `amount` rows forward, staying in the current step.
    pub fn advance(&self, amount: usize) -> RowIndex {
        RowIndex {
            value: self.value + amount,
            step: self.step.map(|s| StepIndex {
                index: s.index + amount,
                ..s
            }),
        }
    }

    pub fn next(&self) -> RowIndex {
        self.advance(1)
    }
}

impl Add<RowIndexDef> for RowIndex {
    type Output = RowIndex;

    /// Places a definition index relative to this row.
    /// A stepped definition lands at `step_start + index`, where the step starts
    /// at this row unless this row is already inside that step.
    fn add(self, def: RowIndexDef) -> RowIndex {
        match def.step {
            None => RowIndex::new(def.index),
            Some(step) => {
                let start = match self.step {
                    Some(current) if current.step == step => current.start,
                    _ => self.value,
                };
                RowIndex {
                    value: start + def.index,
                    step: Some(StepIndex {
                        step,
                        index: def.index,
                        start,
                    }),
                }
            }
        }
    }
}

impl fmt::Display for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step {
            None => write!(f, "{}", self.value),
            Some(step) => write!(f, "{} ({:?}+{})", self.value, step.step, step.index),
        }
    }
}

// ============================================================================
// ANCHORS AND QUALIFIERS
// ============================================================================

/// Fixed position(s) a row definition is inserted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAnchor {
    At(RowIndexDef),
    /// Inclusive range within a single step.
    Range(RowIndexDef, RowIndexDef),
}

impl RowAnchor {
    pub fn at(index: usize) -> Self {
        RowAnchor::At(RowIndexDef::new(index))
    }

    pub fn range(start: usize, end: usize) -> Self {
        RowAnchor::Range(RowIndexDef::new(start), RowIndexDef::new(end))
    }

    /// Expands the anchor to the indices it covers.
    pub fn materialize(&self) -> Result<Vec<RowIndexDef>, ModelError> {
        match *self {
            RowAnchor::At(def) => Ok(vec![def]),
            RowAnchor::Range(start, end) => {
                if start.step != end.step || start.index > end.index {
                    return Err(ModelError::InvalidRange {
                        start: start.index,
                        end: end.index,
                    });
                }
                Ok((start.index..=end.index)
                    .map(|index| RowIndexDef {
                        step: start.step,
                        index,
                    })
                    .collect())
            }
        }
    }
}

impl From<RowIndexDef> for RowAnchor {
    fn from(value: RowIndexDef) -> Self {
        RowAnchor::At(value)
    }
}

/// Decides which rows a definition applies to.
/// A qualifier with neither anchor nor predicate applies to no row.
pub struct RowQualifier<T> {
    pub anchor: Option<RowAnchor>,
    pub predicate: Option<RowPredicate<T>>,
}

impl<T> RowQualifier<T> {
    pub fn anchored(anchor: impl Into<RowAnchor>) -> Self {
        RowQualifier {
            anchor: Some(anchor.into()),
            predicate: None,
        }
    }

    pub fn matching(predicate: RowPredicate<T>) -> Self {
        RowQualifier {
            anchor: None,
            predicate: Some(predicate),
        }
    }
}

impl<T> Clone for RowQualifier<T> {
    fn clone(&self) -> Self {
        RowQualifier {
            anchor: self.anchor,
            predicate: self.predicate.clone(),
        }
    }
}

impl<T> fmt::Debug for RowQualifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowQualifier")
            .field("anchor", &self.anchor)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_def_ordering() {
        let mut defs = vec![
            RowIndexDef::trailing(0),
            RowIndexDef::new(10),
            RowIndexDef::new(2),
            RowIndexDef::trailing(1),
        ];
        defs.sort();
        assert_eq!(
            defs,
            vec![
                RowIndexDef::new(2),
                RowIndexDef::new(10),
                RowIndexDef::trailing(0),
                RowIndexDef::trailing(1),
            ]
        );
    }

    #[test]
    fn test_add_plain_def_is_absolute() {
        let index = RowIndex::new(3) + RowIndexDef::new(7);
        assert_eq!(index, RowIndex::new(7));
    }

    #[test]
    fn test_add_stepped_def_starts_step_here() {
        let index = RowIndex::new(4) + RowIndexDef::trailing(0);
        assert_eq!(index.value, 4);
        assert_eq!(index.def(), RowIndexDef::trailing(0));

        let later = index.next() + RowIndexDef::trailing(3);
        assert_eq!(later.value, 7);
        assert_eq!(later.step.unwrap().start, 4);
    }

    #[test]
    fn test_advance_keeps_step() {
        let index = (RowIndex::new(5) + RowIndexDef::trailing(0)).advance(2);
        assert_eq!(index.value, 7);
        assert_eq!(index.def(), RowIndexDef::trailing(2));
    }

    #[test]
    fn test_materialize_range() {
        let defs = RowAnchor::range(2, 4).materialize().unwrap();
        assert_eq!(
            defs,
            vec![RowIndexDef::new(2), RowIndexDef::new(3), RowIndexDef::new(4)]
        );
    }

    #[test]
    fn test_materialize_rejects_inverted_range() {
        let result = RowAnchor::range(4, 2).materialize();
        assert!(matches!(
            result,
            Err(ModelError::InvalidRange { start: 4, end: 2 })
        ));
    }
}
