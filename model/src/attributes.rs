//! FILENAME: model/src/attributes.rs
//! PURPOSE: Styling attributes attached to tables, columns, rows and cells.
//! CONTEXT: Every attribute is a struct of optional fields. Attributes declared
//! at several levels are merged field by field: a field set on the overriding
//! side wins, an unset field never clobbers what is already there. Each level
//! owns a fixed slot struct so merging is exhaustive over attribute kinds.

use serde::{Deserialize, Serialize};

// ============================================================================
// OVERRIDE
// ============================================================================

/// Field-level merge of two attribute values of the same kind.
pub trait Override {
    /// Returns `self` with every field that `other` sets replaced by `other`'s.
    fn override_with(&self, other: &Self) -> Self;
}

fn pick<V: Clone>(base: &Option<V>, over: &Option<V>) -> Option<V> {
    over.clone().or_else(|| base.clone())
}

fn merge_slot<A: Override + Clone>(base: &Option<A>, over: &Option<A>) -> Option<A> {
    match (base, over) {
        (Some(base), Some(over)) => Some(base.override_with(over)),
        (None, Some(over)) => Some(over.clone()),
        (base, None) => base.clone(),
    }
}

// ============================================================================
// SHARED VALUE TYPES
// ============================================================================

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 128, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const GRAY: Color = Color::new(128, 128, 128);
    pub const LIGHT_GRAY: Color = Color::new(211, 211, 211);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Parses "#RRGGBB" or "#RRGGBBAA" (leading '#' optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).ok();
        match hex.len() {
            6 => Some(Color::new(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Color::with_alpha(
                channel(0)?,
                channel(2)?,
                channel(4)?,
                channel(6)?,
            )),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BorderLineStyle {
    None,
    Solid,
    Dashed,
    Dotted,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FillPattern {
    Solid,
    Dotted,
    Striped,
}

/// Number format applied by render targets that support typed cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberFormat {
    General,
    Number {
        decimal_places: u8,
        use_thousands_separator: bool,
    },
    Percentage {
        decimal_places: u8,
    },
    Date {
        format: String,
    },
    Custom {
        format: String,
    },
}

// ============================================================================
// CELL ATTRIBUTES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_family: Option<String>,
    /// Font size in points.
    pub font_size: Option<u16>,
    pub weight: Option<FontWeight>,
    pub italic: Option<bool>,
    pub strikeout: Option<bool>,
    pub underline: Option<bool>,
    pub color: Option<Color>,
    pub indent: Option<u8>,
    pub wrap: Option<bool>,
    /// Degrees counter-clockwise, -90 to 90.
    pub rotation: Option<i16>,
}

impl TextStyle {
    pub fn new() -> Self {
        TextStyle::default()
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn with_font_size(mut self, size: u16) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.weight = Some(if bold {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        });
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn with_strikeout(mut self, strikeout: bool) -> Self {
        self.strikeout = Some(strikeout);
        self
    }

    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = Some(underline);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = Some(indent);
        self
    }

    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = Some(wrap);
        self
    }

    pub fn with_rotation(mut self, degrees: i16) -> Self {
        self.rotation = Some(degrees.clamp(-90, 90));
        self
    }
}

impl Override for TextStyle {
    fn override_with(&self, other: &Self) -> Self {
        TextStyle {
            font_family: pick(&self.font_family, &other.font_family),
            font_size: pick(&self.font_size, &other.font_size),
            weight: pick(&self.weight, &other.weight),
            italic: pick(&self.italic, &other.italic),
            strikeout: pick(&self.strikeout, &other.strikeout),
            underline: pick(&self.underline, &other.underline),
            color: pick(&self.color, &other.color),
            indent: pick(&self.indent, &other.indent),
            wrap: pick(&self.wrap, &other.wrap),
            rotation: pick(&self.rotation, &other.rotation),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Background {
    pub color: Option<Color>,
    pub fill: Option<FillPattern>,
}

impl Background {
    pub fn color(color: Color) -> Self {
        Background {
            color: Some(color),
            fill: Some(FillPattern::Solid),
        }
    }
}

impl Override for Background {
    fn override_with(&self, other: &Self) -> Self {
        Background {
            color: pick(&self.color, &other.color),
            fill: pick(&self.fill, &other.fill),
        }
    }
}

/// A single border edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Border {
    pub style: Option<BorderLineStyle>,
    pub color: Option<Color>,
}

impl Border {
    pub fn new(style: BorderLineStyle, color: Color) -> Self {
        Border {
            style: Some(style),
            color: Some(color),
        }
    }
}

impl Override for Border {
    fn override_with(&self, other: &Self) -> Self {
        Border {
            style: pick(&self.style, &other.style),
            color: pick(&self.color, &other.color),
        }
    }
}

/// Borders of a cell or a row outline. Edges merge independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Borders {
    pub top: Option<Border>,
    pub right: Option<Border>,
    pub bottom: Option<Border>,
    pub left: Option<Border>,
}

impl Borders {
    /// Same border on all four edges.
    pub fn all(border: Border) -> Self {
        Borders {
            top: Some(border.clone()),
            right: Some(border.clone()),
            bottom: Some(border.clone()),
            left: Some(border),
        }
    }

    pub fn with_top(mut self, border: Border) -> Self {
        self.top = Some(border);
        self
    }

    pub fn with_right(mut self, border: Border) -> Self {
        self.right = Some(border);
        self
    }

    pub fn with_bottom(mut self, border: Border) -> Self {
        self.bottom = Some(border);
        self
    }

    pub fn with_left(mut self, border: Border) -> Self {
        self.left = Some(border);
        self
    }
}

impl Override for Borders {
    fn override_with(&self, other: &Self) -> Self {
        Borders {
            top: merge_slot(&self.top, &other.top),
            right: merge_slot(&self.right, &other.right),
            bottom: merge_slot(&self.bottom, &other.bottom),
            left: merge_slot(&self.left, &other.left),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Alignment {
    pub horizontal: Option<HorizontalAlign>,
    pub vertical: Option<VerticalAlign>,
}

impl Alignment {
    pub fn new(horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        Alignment {
            horizontal: Some(horizontal),
            vertical: Some(vertical),
        }
    }

    pub fn horizontal(horizontal: HorizontalAlign) -> Self {
        Alignment {
            horizontal: Some(horizontal),
            vertical: None,
        }
    }
}

impl Override for Alignment {
    fn override_with(&self, other: &Self) -> Self {
        Alignment {
            horizontal: pick(&self.horizontal, &other.horizontal),
            vertical: pick(&self.vertical, &other.vertical),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFormat {
    pub number_format: Option<NumberFormat>,
}

impl DataFormat {
    pub fn new(number_format: NumberFormat) -> Self {
        DataFormat {
            number_format: Some(number_format),
        }
    }
}

impl Override for DataFormat {
    fn override_with(&self, other: &Self) -> Self {
        DataFormat {
            number_format: pick(&self.number_format, &other.number_format),
        }
    }
}

/// One cell-level attribute, used to add attributes one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum CellAttribute {
    Text(TextStyle),
    Background(Background),
    Borders(Borders),
    Alignment(Alignment),
    DataFormat(DataFormat),
}

impl From<TextStyle> for CellAttribute {
    fn from(value: TextStyle) -> Self {
        CellAttribute::Text(value)
    }
}

impl From<Background> for CellAttribute {
    fn from(value: Background) -> Self {
        CellAttribute::Background(value)
    }
}

impl From<Borders> for CellAttribute {
    fn from(value: Borders) -> Self {
        CellAttribute::Borders(value)
    }
}

impl From<Alignment> for CellAttribute {
    fn from(value: Alignment) -> Self {
        CellAttribute::Alignment(value)
    }
}

impl From<DataFormat> for CellAttribute {
    fn from(value: DataFormat) -> Self {
        CellAttribute::DataFormat(value)
    }
}

/// All attributes a cell can carry.
/// Hashable so render targets can deduplicate resolved cell styles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CellAttributes {
    pub text: Option<TextStyle>,
    pub background: Option<Background>,
    pub borders: Option<Borders>,
    pub alignment: Option<Alignment>,
    pub data_format: Option<DataFormat>,
}

impl CellAttributes {
    pub fn new() -> Self {
        CellAttributes::default()
    }

    /// Adds an attribute, merging it over an existing one of the same kind.
    pub fn with(mut self, attribute: impl Into<CellAttribute>) -> Self {
        match attribute.into() {
            CellAttribute::Text(a) => self.text = merge_slot(&self.text, &Some(a)),
            CellAttribute::Background(a) => {
                self.background = merge_slot(&self.background, &Some(a))
            }
            CellAttribute::Borders(a) => self.borders = merge_slot(&self.borders, &Some(a)),
            CellAttribute::Alignment(a) => {
                self.alignment = merge_slot(&self.alignment, &Some(a))
            }
            CellAttribute::DataFormat(a) => {
                self.data_format = merge_slot(&self.data_format, &Some(a))
            }
        }
        self
    }

    /// Right-biased merge: `other` wins on every field it sets.
    pub fn merge(&self, other: &Self) -> Self {
        CellAttributes {
            text: merge_slot(&self.text, &other.text),
            background: merge_slot(&self.background, &other.background),
            borders: merge_slot(&self.borders, &other.borders),
            alignment: merge_slot(&self.alignment, &other.alignment),
            data_format: merge_slot(&self.data_format, &other.data_format),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.background.is_none()
            && self.borders.is_none()
            && self.alignment.is_none()
            && self.data_format.is_none()
    }
}

// ============================================================================
// ROW ATTRIBUTES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowHeight {
    /// Height in points.
    pub points: Option<f64>,
}

impl RowHeight {
    pub fn points(points: f64) -> Self {
        RowHeight {
            points: Some(points),
        }
    }
}

impl Override for RowHeight {
    fn override_with(&self, other: &Self) -> Self {
        RowHeight {
            points: pick(&self.points, &other.points),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowAttribute {
    Height(RowHeight),
    Borders(Borders),
}

impl From<RowHeight> for RowAttribute {
    fn from(value: RowHeight) -> Self {
        RowAttribute::Height(value)
    }
}

impl From<Borders> for RowAttribute {
    fn from(value: Borders) -> Self {
        RowAttribute::Borders(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowAttributes {
    pub height: Option<RowHeight>,
    pub borders: Option<Borders>,
}

impl RowAttributes {
    pub fn new() -> Self {
        RowAttributes::default()
    }

    pub fn with(mut self, attribute: impl Into<RowAttribute>) -> Self {
        match attribute.into() {
            RowAttribute::Height(a) => self.height = merge_slot(&self.height, &Some(a)),
            RowAttribute::Borders(a) => self.borders = merge_slot(&self.borders, &Some(a)),
        }
        self
    }

    pub fn merge(&self, other: &Self) -> Self {
        RowAttributes {
            height: merge_slot(&self.height, &other.height),
            borders: merge_slot(&self.borders, &other.borders),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.height.is_none() && self.borders.is_none()
    }
}

// ============================================================================
// COLUMN ATTRIBUTES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnWidth {
    pub auto: Option<bool>,
    /// Width in characters.
    pub width: Option<f64>,
}

impl ColumnWidth {
    pub fn fixed(width: f64) -> Self {
        ColumnWidth {
            auto: Some(false),
            width: Some(width),
        }
    }

    pub fn auto() -> Self {
        ColumnWidth {
            auto: Some(true),
            width: None,
        }
    }
}

impl Override for ColumnWidth {
    /// An explicit positive width without an explicit `auto` turns auto sizing off.
    fn override_with(&self, other: &Self) -> Self {
        let sets_width = other.width.map_or(false, |w| w > 0.0);
        let auto = if sets_width && other.auto.is_none() {
            Some(false)
        } else {
            pick(&self.auto, &other.auto)
        };
        ColumnWidth {
            auto,
            width: pick(&self.width, &other.width),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnAttribute {
    Width(ColumnWidth),
}

impl From<ColumnWidth> for ColumnAttribute {
    fn from(value: ColumnWidth) -> Self {
        ColumnAttribute::Width(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAttributes {
    pub width: Option<ColumnWidth>,
}

impl ColumnAttributes {
    pub fn new() -> Self {
        ColumnAttributes::default()
    }

    pub fn with(mut self, attribute: impl Into<ColumnAttribute>) -> Self {
        match attribute.into() {
            ColumnAttribute::Width(a) => self.width = merge_slot(&self.width, &Some(a)),
        }
        self
    }

    pub fn merge(&self, other: &Self) -> Self {
        ColumnAttributes {
            width: merge_slot(&self.width, &other.width),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width.is_none()
    }
}

// ============================================================================
// TABLE ATTRIBUTES
// ============================================================================

/// Offset of the table from the sheet origin, in cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: Option<u32>,
    pub left: Option<u32>,
}

impl Margins {
    pub fn new(top: u32, left: u32) -> Self {
        Margins {
            top: Some(top),
            left: Some(left),
        }
    }
}

impl Override for Margins {
    fn override_with(&self, other: &Self) -> Self {
        Margins {
            top: pick(&self.top, &other.top),
            left: pick(&self.left, &other.left),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableAttribute {
    Margins(Margins),
}

impl From<Margins> for TableAttribute {
    fn from(value: Margins) -> Self {
        TableAttribute::Margins(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableAttributes {
    pub margins: Option<Margins>,
}

impl TableAttributes {
    pub fn new() -> Self {
        TableAttributes::default()
    }

    pub fn with(mut self, attribute: impl Into<TableAttribute>) -> Self {
        match attribute.into() {
            TableAttribute::Margins(a) => self.margins = merge_slot(&self.margins, &Some(a)),
        }
        self
    }

    pub fn merge(&self, other: &Self) -> Self {
        TableAttributes {
            margins: merge_slot(&self.margins, &other.margins),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.margins.is_none()
    }

    /// (top, left) margins, zero when unset.
    pub fn offsets(&self) -> (u32, u32) {
        self.margins
            .as_ref()
            .map(|m| (m.top.unwrap_or(0), m.left.unwrap_or(0)))
            .unwrap_or((0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        let color = Color::from_hex("#FF0000").unwrap();
        assert_eq!(color, Color::RED);

        let translucent = Color::from_hex("00FF0080").unwrap();
        assert_eq!(translucent.g, 255);
        assert_eq!(translucent.a, 128);

        assert!(Color::from_hex("#FFF").is_none());
        assert!(Color::from_hex("zz0000").is_none());
    }

    #[test]
    fn test_color_to_hex() {
        assert_eq!(Color::new(255, 0, 16).to_hex(), "#FF0010");
        assert_eq!(Color::with_alpha(0, 0, 0, 0).to_hex(), "#00000000");
    }

    #[test]
    fn test_text_style_field_override() {
        let base = TextStyle::new().with_bold(true).with_font_size(10);
        let over = TextStyle::new().with_font_size(12);
        let merged = base.override_with(&over);

        assert_eq!(merged.weight, Some(FontWeight::Bold));
        assert_eq!(merged.font_size, Some(12));
    }

    #[test]
    fn test_borders_merge_per_edge() {
        let base = Borders::all(Border::new(BorderLineStyle::Solid, Color::BLACK));
        let over = Borders::default().with_top(Border {
            style: None,
            color: Some(Color::RED),
        });
        let merged = base.override_with(&over);

        let top = merged.top.unwrap();
        assert_eq!(top.style, Some(BorderLineStyle::Solid));
        assert_eq!(top.color, Some(Color::RED));
        assert_eq!(merged.left.unwrap().color, Some(Color::BLACK));
    }

    #[test]
    fn test_column_width_disables_auto() {
        let base = ColumnWidth::auto();
        let over = ColumnWidth {
            auto: None,
            width: Some(20.0),
        };
        let merged = base.override_with(&over);

        assert_eq!(merged.auto, Some(false));
        assert_eq!(merged.width, Some(20.0));

        let keep_auto = base.override_with(&ColumnWidth::default());
        assert_eq!(keep_auto.auto, Some(true));
    }

    #[test]
    fn test_cell_attributes_merge_keeps_unset_slots() {
        let table = CellAttributes::new()
            .with(TextStyle::new().with_bold(true))
            .with(Background::color(Color::LIGHT_GRAY));
        let cell = CellAttributes::new().with(TextStyle::new().with_italic(true));
        let merged = table.merge(&cell);

        let text = merged.text.as_ref().unwrap();
        assert_eq!(text.weight, Some(FontWeight::Bold));
        assert_eq!(text.italic, Some(true));
        assert_eq!(merged.background.unwrap().color, Some(Color::LIGHT_GRAY));
    }

    #[test]
    fn test_with_merges_same_kind() {
        let attrs = CellAttributes::new()
            .with(TextStyle::new().with_bold(true))
            .with(TextStyle::new().with_color(Color::BLUE));
        let text = attrs.text.unwrap();
        assert_eq!(text.weight, Some(FontWeight::Bold));
        assert_eq!(text.color, Some(Color::BLUE));
    }

    #[test]
    fn test_empty_slots() {
        assert!(CellAttributes::new().is_empty());
        assert!(RowAttributes::new().is_empty());
        assert!(!RowAttributes::new().with(RowHeight::points(20.0)).is_empty());
        assert_eq!(TableAttributes::new().offsets(), (0, 0));
        assert_eq!(
            TableAttributes::new().with(Margins::new(2, 1)).offsets(),
            (2, 1)
        );
    }

    #[test]
    fn test_attributes_deserialize_with_defaults() {
        let attrs: CellAttributes =
            serde_json::from_str(r#"{"text": {"italic": true}}"#).unwrap();
        assert_eq!(attrs.text.unwrap().italic, Some(true));
        assert!(attrs.background.is_none());
    }
}
