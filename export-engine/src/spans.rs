//! FILENAME: export-engine/src/spans.rs
//! PURPOSE: Bookkeeping for cells spanning several rows or columns.
//! CONTEXT: A cell with `row_span = k` at row `r` covers its columns in rows
//! `r+1 ..= r+k-1`. The tracker records those obligations so later rows can
//! drop covered cells, and decides which row-span strategy governs a row.

use model::RowSpanStrategy;
use rustc_hash::FxHashMap;

/// Rows of one column covered by a span, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Shadow {
    from: usize,
    until: usize,
}

#[derive(Debug, Default)]
pub struct SpanTracker {
    shadows: FxHashMap<usize, Shadow>,
}

impl SpanTracker {
    pub fn new() -> Self {
        SpanTracker::default()
    }

    /// Registers a cell at `row` covering `col_span` columns from `column`
    /// and `row_span` rows.
    pub fn register(&mut self, row: usize, column: usize, col_span: u32, row_span: u32) {
        if row_span <= 1 {
            return;
        }
        let until = row.saturating_add(row_span as usize - 1);
        let last = column.saturating_add(col_span.max(1) as usize);
        for covered in column..last {
            let shadow = self.shadows.entry(covered).or_insert(Shadow {
                from: row + 1,
                until,
            });
            if shadow.until < row {
                *shadow = Shadow {
                    from: row + 1,
                    until,
                };
            } else {
                shadow.until = shadow.until.max(until);
            }
            log::trace!(
                target: "RESOLVER",
                "column {} shadowed for rows {}..={}",
                covered,
                shadow.from,
                shadow.until
            );
        }
    }

    /// Whether the cell at (`row`, `column`) lies under an earlier span.
    pub fn is_shadowed(&self, row: usize, column: usize) -> bool {
        self.shadows
            .get(&column)
            .map_or(false, |shadow| shadow.from <= row && row <= shadow.until)
    }

    /// Drops obligations that end before `row`.
    pub fn prune(&mut self, row: usize) {
        self.shadows.retain(|_, shadow| shadow.until >= row);
    }

    pub fn active(&self) -> usize {
        self.shadows.len()
    }
}

/// A row-spanning cell's claim on how the row sequence advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanClaim {
    pub column: String,
    pub span: u32,
    pub strategy: RowSpanStrategy,
}

/// Picks the governing claim: highest priority, first in column order on ties.
pub fn governing_claim<I>(claims: I) -> Option<SpanClaim>
where
    I: IntoIterator<Item = SpanClaim>,
{
    claims.into_iter().fold(None, |best, claim| match best {
        Some(best) if best.strategy.priority() >= claim.strategy.priority() => Some(best),
        _ => Some(claim),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(column: &str, span: u32, strategy: RowSpanStrategy) -> SpanClaim {
        SpanClaim {
            column: column.to_string(),
            span,
            strategy,
        }
    }

    #[test]
    fn test_row_span_shadows_following_rows() {
        let mut tracker = SpanTracker::new();
        tracker.register(0, 1, 1, 3);

        assert!(!tracker.is_shadowed(0, 1));
        assert!(tracker.is_shadowed(1, 1));
        assert!(tracker.is_shadowed(2, 1));
        assert!(!tracker.is_shadowed(3, 1));
        assert!(!tracker.is_shadowed(1, 0));
    }

    #[test]
    fn test_span_rectangle_shadowed() {
        let mut tracker = SpanTracker::new();
        tracker.register(4, 0, 2, 2);
        assert!(tracker.is_shadowed(5, 0));
        assert!(tracker.is_shadowed(5, 1));
        assert!(!tracker.is_shadowed(5, 2));
    }

    #[test]
    fn test_single_row_span_registers_nothing() {
        let mut tracker = SpanTracker::new();
        tracker.register(0, 0, 3, 1);
        assert_eq!(tracker.active(), 0);
    }

    #[test]
    fn test_prune_expired() {
        let mut tracker = SpanTracker::new();
        tracker.register(0, 0, 1, 2);
        tracker.register(0, 1, 1, 5);
        tracker.prune(2);
        assert_eq!(tracker.active(), 1);
        assert!(tracker.is_shadowed(3, 1));
    }

    #[test]
    fn test_expired_shadow_replaced() {
        let mut tracker = SpanTracker::new();
        tracker.register(0, 0, 1, 2);
        tracker.register(5, 0, 1, 2);
        assert!(!tracker.is_shadowed(1, 0));
        assert!(tracker.is_shadowed(6, 0));
        assert!(!tracker.is_shadowed(5, 0));
    }

    #[test]
    fn test_governing_claim_by_priority() {
        let governing = governing_claim(vec![
            claim("a", 2, RowSpanStrategy::Shadow),
            claim("b", 3, RowSpanStrategy::Pushback),
            claim("c", 4, RowSpanStrategy::Skip),
        ]);
        assert_eq!(governing, Some(claim("b", 3, RowSpanStrategy::Pushback)));
    }

    #[test]
    fn test_governing_claim_tie_takes_first() {
        let governing = governing_claim(vec![
            claim("a", 2, RowSpanStrategy::Skip),
            claim("b", 5, RowSpanStrategy::Skip),
        ]);
        assert_eq!(governing.unwrap().column, "a");
        assert_eq!(governing_claim(Vec::new()), None);
    }
}
