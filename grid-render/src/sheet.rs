//! FILENAME: grid-render/src/sheet.rs
//! PURPOSE: Sparse in-memory sheet produced by the grid renderer.
//! CONTEXT: Cells are keyed by absolute (row, col). Spanning cells are stored
//! once at their top-left position and recorded as merged regions; the cells
//! they cover stay empty.

use std::collections::{BTreeMap, HashMap};

use model::{CellType, Value};
use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::format::display_value;
use crate::style::StyleRegistry;

// ============================================================================
// CELLS AND REGIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedCell {
    pub value: Value,
    pub cell_type: Option<CellType>,
    /// Index into the sheet's StyleRegistry.
    pub style_index: usize,
}

/// Rectangle of merged cells, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRegion {
    pub first_row: u32,
    pub first_col: u32,
    pub last_row: u32,
    pub last_col: u32,
}

impl MergedRegion {
    /// Region clamped to the last addressable row and column.
    pub fn new(row: u32, col: u32, row_span: u32, col_span: u32) -> Self {
        MergedRegion {
            first_row: row,
            first_col: col,
            last_row: row.saturating_add(row_span.max(1) - 1),
            last_col: col.saturating_add(col_span.max(1) - 1),
        }
    }

    /// Region covering exactly the requested spans, or None when it would
    /// run past the last addressable row or column.
    pub fn try_new(row: u32, col: u32, row_span: u32, col_span: u32) -> Option<Self> {
        Some(MergedRegion {
            first_row: row,
            first_col: col,
            last_row: row.checked_add(row_span.max(1) - 1)?,
            last_col: col.checked_add(col_span.max(1) - 1)?,
        })
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_col..=self.last_col).contains(&col)
    }

    pub fn overlaps(&self, other: &MergedRegion) -> bool {
        self.first_row <= other.last_row
            && other.first_row <= self.last_row
            && self.first_col <= other.last_col
            && other.first_col <= self.last_col
    }
}

// ============================================================================
// SHEET
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct RenderedSheet {
    pub name: String,
    pub cells: HashMap<(u32, u32), RenderedCell>,
    pub styles: StyleRegistry,
    pub merges: Vec<MergedRegion>,
    pub column_widths: HashMap<u32, f64>,
    pub row_heights: HashMap<u32, f64>,
    pub max_row: u32,
    pub max_col: u32,
}

impl RenderedSheet {
    pub fn new(name: impl Into<String>) -> Self {
        RenderedSheet {
            name: name.into(),
            ..RenderedSheet::default()
        }
    }

    pub fn set_cell(&mut self, row: u32, col: u32, cell: RenderedCell) {
        self.max_row = self.max_row.max(row);
        self.max_col = self.max_col.max(col);
        self.cells.insert((row, col), cell);
    }

    pub fn get_cell(&self, row: u32, col: u32) -> Option<&RenderedCell> {
        self.cells.get(&(row, col))
    }

    /// Display text of the cell at (`row`, `col`), formatted by its style.
    pub fn display(&self, row: u32, col: u32) -> Option<String> {
        let cell = self.get_cell(row, col)?;
        let format = self
            .styles
            .get(cell.style_index)
            .data_format
            .as_ref()
            .and_then(|f| f.number_format.as_ref());
        Some(display_value(&cell.value, format))
    }

    /// Records a merged region, rejecting overlaps with existing ones.
    pub fn add_merge(&mut self, region: MergedRegion) -> Result<(), GridError> {
        if let Some(existing) = self.merges.iter().find(|m| m.overlaps(&region)) {
            return Err(GridError::OverlappingMerge {
                row: region.first_row,
                col: region.first_col,
                existing: *existing,
            });
        }
        self.max_row = self.max_row.max(region.last_row);
        self.max_col = self.max_col.max(region.last_col);
        self.merges.push(region);
        Ok(())
    }

    /// Merged region covering (`row`, `col`), if any.
    pub fn merge_at(&self, row: u32, col: u32) -> Option<&MergedRegion> {
        self.merges.iter().find(|m| m.contains(row, col))
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn to_json(&self) -> Result<String, GridError> {
        Ok(serde_json::to_string(&SheetSnapshot::from_sheet(self))?)
    }

    pub fn from_json(json: &str) -> Result<Self, GridError> {
        let snapshot: SheetSnapshot = serde_json::from_str(json)?;
        Ok(snapshot.into_sheet())
    }
}

// ============================================================================
// SNAPSHOT
// ============================================================================

/// Serializable form of a sheet. JSON object keys must be strings, so the
/// coordinate-keyed maps are flattened into sorted lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetSnapshot {
    pub name: String,
    pub cells: Vec<SavedCell>,
    pub styles: StyleRegistry,
    pub merges: Vec<MergedRegion>,
    pub column_widths: BTreeMap<u32, f64>,
    pub row_heights: BTreeMap<u32, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCell {
    pub row: u32,
    pub col: u32,
    pub cell: RenderedCell,
}

impl SheetSnapshot {
    pub fn from_sheet(sheet: &RenderedSheet) -> Self {
        let mut cells: Vec<SavedCell> = sheet
            .cells
            .iter()
            .map(|(&(row, col), cell)| SavedCell {
                row,
                col,
                cell: cell.clone(),
            })
            .collect();
        cells.sort_by_key(|c| (c.row, c.col));

        SheetSnapshot {
            name: sheet.name.clone(),
            cells,
            styles: sheet.styles.clone(),
            merges: sheet.merges.clone(),
            column_widths: sheet.column_widths.iter().map(|(&k, &v)| (k, v)).collect(),
            row_heights: sheet.row_heights.iter().map(|(&k, &v)| (k, v)).collect(),
        }
    }

    pub fn into_sheet(self) -> RenderedSheet {
        let mut sheet = RenderedSheet::new(self.name);
        sheet.styles = self.styles;
        sheet.styles.rebuild_index();
        for saved in self.cells {
            sheet.set_cell(saved.row, saved.col, saved.cell);
        }
        for region in self.merges {
            sheet.max_row = sheet.max_row.max(region.last_row);
            sheet.max_col = sheet.max_col.max(region.last_col);
            sheet.merges.push(region);
        }
        sheet.column_widths = self.column_widths.into_iter().collect();
        sheet.row_heights = self.row_heights.into_iter().collect();
        sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{CellAttributes, DataFormat, NumberFormat};

    fn create_test_sheet() -> RenderedSheet {
        let mut sheet = RenderedSheet::new("test");
        let percent = CellAttributes::new().with(DataFormat::new(NumberFormat::Percentage {
            decimal_places: 0,
        }));
        let style_index = sheet.styles.get_or_create(&percent);
        sheet.set_cell(
            0,
            0,
            RenderedCell {
                value: Value::text("Share"),
                cell_type: None,
                style_index: 0,
            },
        );
        sheet.set_cell(
            1,
            0,
            RenderedCell {
                value: Value::Number(0.5),
                cell_type: Some(CellType::Numeric),
                style_index,
            },
        );
        sheet
    }

    #[test]
    fn test_display_applies_number_format() {
        let sheet = create_test_sheet();
        assert_eq!(sheet.display(0, 0).as_deref(), Some("Share"));
        assert_eq!(sheet.display(1, 0).as_deref(), Some("50%"));
        assert_eq!(sheet.display(5, 5), None);
    }

    #[test]
    fn test_overlapping_merge_rejected() {
        let mut sheet = RenderedSheet::new("test");
        sheet.add_merge(MergedRegion::new(0, 0, 2, 2)).unwrap();
        sheet.add_merge(MergedRegion::new(2, 0, 1, 3)).unwrap();

        let result = sheet.add_merge(MergedRegion::new(1, 1, 2, 1));
        assert!(matches!(result, Err(GridError::OverlappingMerge { row: 1, col: 1, .. })));
        assert_eq!(sheet.merge_at(1, 1), Some(&MergedRegion::new(0, 0, 2, 2)));
        assert_eq!(sheet.max_row, 2);
        assert_eq!(sheet.max_col, 2);
    }

    #[test]
    fn test_region_past_sheet_end() {
        assert_eq!(MergedRegion::try_new(u32::MAX - 1, 0, 3, 1), None);
        assert_eq!(MergedRegion::try_new(0, u32::MAX, 1, 2), None);
        assert_eq!(
            MergedRegion::try_new(2, 3, 2, 1),
            Some(MergedRegion::new(2, 3, 2, 1))
        );

        let clamped = MergedRegion::new(u32::MAX - 1, 0, 3, 1);
        assert_eq!(clamped.last_row, u32::MAX);
    }

    #[test]
    fn test_json_snapshot_restores_sheet() {
        let mut sheet = create_test_sheet();
        sheet.column_widths.insert(0, 14.0);
        sheet.row_heights.insert(1, 20.0);
        sheet.add_merge(MergedRegion::new(3, 0, 1, 2)).unwrap();

        let json = sheet.to_json().unwrap();
        let restored = RenderedSheet::from_json(&json).unwrap();

        assert_eq!(restored.name, "test");
        assert_eq!(restored.cells, sheet.cells);
        assert_eq!(restored.display(1, 0).as_deref(), Some("50%"));
        assert_eq!(restored.column_widths.get(&0), Some(&14.0));
        assert_eq!(restored.merges, sheet.merges);
        assert_eq!(restored.max_row, 3);
    }

    #[test]
    fn test_snapshot_without_styles_keeps_default() {
        let json = r#"{"name":"bare","cells":[],"styles":{"styles":[]},"merges":[],"column_widths":{},"row_heights":{}}"#;
        let sheet = RenderedSheet::from_json(json).unwrap();

        assert_eq!(sheet.styles.len(), 1);
        assert_eq!(sheet.styles.get(0), &CellAttributes::default());
        assert_eq!(sheet.styles.get(7), &CellAttributes::default());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            RenderedSheet::from_json("{\"name\": 3}"),
            Err(GridError::Json(_))
        ));
    }
}
