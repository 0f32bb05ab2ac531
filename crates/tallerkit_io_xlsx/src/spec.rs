//! Export models: inputs, resolved options and report.

use std::collections::BTreeMap;
use std::io::Read;

use serde::Deserialize;

use crate::conf::{
    C_HEADER_BG_COLOR_DEFAULT, C_HEADER_TEXT_COLOR_DEFAULT, C_ROW_EVEN_COLOR_DEFAULT,
    C_ROW_ODD_COLOR_DEFAULT, C_SHEET_NAME_DEFAULT, N_HEADER_FONT_SIZE_DEFAULT,
    N_HEADER_HEIGHT_DEFAULT, N_ROW_HEIGHT_DEFAULT, N_ROWS_PER_PAGE_DEFAULT,
};
use crate::error::XlsxExportError;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormat

/// Declarative cell format, materialized into a `rust_xlsxwriter::Format` at save time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<u32>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Border color for all sides.
    pub border_color: Option<String>,
    /// Text wrap.
    pub text_wrap: Option<bool>,

    /// Number format code.
    pub num_format: Option<String>,
    /// Background fill color.
    pub bg_color: Option<String>,
    /// Font color.
    pub font_color: Option<String>,
    /// Underline (hyperlink cells).
    pub underline: Option<bool>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Overlay `other` onto `self`: every field set in `other` wins.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        fn pick<T: Clone>(base: &Option<T>, patch: &Option<T>) -> Option<T> {
            patch.as_ref().or(base.as_ref()).cloned()
        }

        SpecCellFormat {
            font_name: pick(&self.font_name, &other.font_name),
            font_size: pick(&self.font_size, &other.font_size),
            bold: pick(&self.bold, &other.bold),
            italic: pick(&self.italic, &other.italic),
            underline: pick(&self.underline, &other.underline),
            align: pick(&self.align, &other.align),
            valign: pick(&self.valign, &other.valign),
            border: pick(&self.border, &other.border),
            border_color: pick(&self.border_color, &other.border_color),
            text_wrap: pick(&self.text_wrap, &other.text_wrap),
            num_format: pick(&self.num_format, &other.num_format),
            bg_color: pick(&self.bg_color, &other.bg_color),
            font_color: pick(&self.font_color, &other.font_color),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ValuesAndColumns

/// One record value. Deserializes from JSON `null`, booleans, numbers and strings.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum EnumCellValue {
    /// Missing/blank value.
    #[default]
    None,
    /// Boolean value.
    Boolean(bool),
    /// Numeric value.
    Number(f64),
    /// Text value (dates travel as text too).
    String(String),
}

impl From<&str> for EnumCellValue {
    fn from(value: &str) -> Self {
        EnumCellValue::String(value.to_string())
    }
}

impl From<String> for EnumCellValue {
    fn from(value: String) -> Self {
        EnumCellValue::String(value)
    }
}

impl From<f64> for EnumCellValue {
    fn from(value: f64) -> Self {
        EnumCellValue::Number(value)
    }
}

impl From<i64> for EnumCellValue {
    fn from(value: i64) -> Self {
        EnumCellValue::Number(value as f64)
    }
}

impl From<bool> for EnumCellValue {
    fn from(value: bool) -> Self {
        EnumCellValue::Boolean(value)
    }
}

/// One exported row: field name to value. Absent keys render as blanks.
pub type DataRecord = BTreeMap<String, EnumCellValue>;

/// Horizontal alignment of a data column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl EnumAlignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnumAlignment::Left => "left",
            EnumAlignment::Center => "center",
            EnumAlignment::Right => "right",
        }
    }
}

/// Date rendering variant for date columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumDateFormat {
    /// `05/03/2025`
    #[default]
    Short,
    /// `5 de marzo de 2025`
    Long,
    /// `05/03/2025, 14:30`
    Datetime,
    /// `14:30`
    Time,
}

/// Maps one record field to one spreadsheet column.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecColumn {
    /// Header text.
    pub header: String,
    /// Record field name.
    pub key: String,
    /// Column width in character units.
    #[serde(default)]
    pub width: Option<f64>,
    /// Number format code applied to the data cells.
    #[serde(default)]
    pub num_fmt: Option<String>,
    #[serde(default)]
    pub alignment: Option<EnumAlignment>,
    /// Render values through the date formatter.
    #[serde(default)]
    pub is_date: bool,
    #[serde(default)]
    pub date_format: Option<EnumDateFormat>,
}

impl SpecColumn {
    pub fn new(header: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            key: key.into(),
            ..Default::default()
        }
    }
}

/// Summary tile rendered above the data table.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecStatBox {
    pub title: String,
    pub value: EnumCellValue,
    #[serde(default)]
    pub description: Option<String>,
    /// Overrides the box background.
    #[serde(default)]
    pub bg_color: Option<String>,
    /// Overrides title, value and description colors at once.
    #[serde(default)]
    pub text_color: Option<String>,
}

/// Category/value series rendered as a pseudo-chart table.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecChartSeries {
    pub categories: Vec<String>,
    pub values: Vec<f64>,
    #[serde(default)]
    pub title: Option<String>,
    /// Chart kind hint; every kind renders as the same table.
    #[serde(default, rename = "type")]
    pub chart_type: Option<String>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RawConfiguration

/// Header style overrides as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecHeaderStyleConfig {
    pub bg_color: Option<String>,
    pub text_color: Option<String>,
    pub font_size: Option<u32>,
    pub bold: Option<bool>,
}

/// Row style overrides as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecRowStyleConfig {
    pub alternate_colors: Option<bool>,
    pub even_row_color: Option<String>,
    pub odd_row_color: Option<String>,
}

/// Pagination overrides as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecPaginationConfig {
    pub enabled: Option<bool>,
    pub rows_per_page: Option<usize>,
    pub create_index: Option<bool>,
}

/// Caller-facing export request. `columns` may be left out of JSON but must be
/// non-empty by the time the request is resolved.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecExportConfig {
    #[serde(default)]
    pub data: Vec<DataRecord>,
    /// May be omitted when columns are derived from a DataFrame.
    #[serde(default)]
    pub columns: Vec<SpecColumn>,
    pub file_name: String,
    #[serde(default)]
    pub sheet_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub header_style: Option<SpecHeaderStyleConfig>,
    #[serde(default)]
    pub row_style: Option<SpecRowStyleConfig>,
    #[serde(default)]
    pub row_height: Option<f64>,
    #[serde(default)]
    pub header_height: Option<f64>,
    #[serde(default)]
    pub statistics: Option<Vec<SpecStatBox>>,
    #[serde(default)]
    pub charts: Option<Vec<SpecChartSeries>>,
    #[serde(default)]
    pub include_statistics: Option<bool>,
    #[serde(default)]
    pub include_charts: Option<bool>,
    #[serde(default)]
    pub pagination: Option<SpecPaginationConfig>,
    #[serde(default)]
    pub auto_filter: Option<bool>,
    #[serde(default)]
    pub freeze_header: Option<bool>,
}

impl SpecExportConfig {
    pub fn new(data: Vec<DataRecord>, columns: Vec<SpecColumn>, file_name: impl Into<String>) -> Self {
        Self {
            data,
            columns,
            file_name: file_name.into(),
            ..Default::default()
        }
    }

    /// Parse a JSON export request.
    pub fn from_json_str(text: &str) -> Result<Self, XlsxExportError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a JSON export request from a reader.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, XlsxExportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Apply every default once and validate the result.
    pub fn resolve(&self) -> Result<SpecExportOptions, XlsxExportError> {
        if self.columns.is_empty() {
            return Err(XlsxExportError::InvalidConfig(
                "columns must contain at least one column.".to_string(),
            ));
        }
        if self.file_name.trim().is_empty() {
            return Err(XlsxExportError::InvalidConfig(
                "fileName must not be empty.".to_string(),
            ));
        }

        let header_style_cfg = self.header_style.clone().unwrap_or_default();
        let header_style = SpecHeaderStyle {
            bg_color: header_style_cfg
                .bg_color
                .unwrap_or_else(|| C_HEADER_BG_COLOR_DEFAULT.to_string()),
            text_color: header_style_cfg
                .text_color
                .unwrap_or_else(|| C_HEADER_TEXT_COLOR_DEFAULT.to_string()),
            font_size: header_style_cfg
                .font_size
                .unwrap_or(N_HEADER_FONT_SIZE_DEFAULT),
            bold: header_style_cfg.bold.unwrap_or(true),
        };

        let row_style_cfg = self.row_style.clone().unwrap_or_default();
        let row_style = SpecRowStyle {
            alternate_colors: row_style_cfg.alternate_colors.unwrap_or(true),
            even_row_color: row_style_cfg
                .even_row_color
                .unwrap_or_else(|| C_ROW_EVEN_COLOR_DEFAULT.to_string()),
            odd_row_color: row_style_cfg
                .odd_row_color
                .unwrap_or_else(|| C_ROW_ODD_COLOR_DEFAULT.to_string()),
        };

        let pagination_cfg = self.pagination.clone().unwrap_or_default();
        let pagination = SpecPagination {
            enabled: pagination_cfg.enabled.unwrap_or(false),
            rows_per_page: pagination_cfg
                .rows_per_page
                .unwrap_or(N_ROWS_PER_PAGE_DEFAULT),
            create_index: pagination_cfg.create_index.unwrap_or(true),
        };
        if pagination.rows_per_page == 0 {
            return Err(XlsxExportError::InvalidConfig(
                "pagination.rowsPerPage must be >= 1.".to_string(),
            ));
        }

        let row_height = self.row_height.unwrap_or(N_ROW_HEIGHT_DEFAULT);
        let header_height = self.header_height.unwrap_or(N_HEADER_HEIGHT_DEFAULT);
        if !is_positive_finite(row_height) || !is_positive_finite(header_height) {
            return Err(XlsxExportError::InvalidConfig(
                "rowHeight and headerHeight must be finite and > 0.".to_string(),
            ));
        }

        let include_statistics = self.include_statistics.unwrap_or(false);
        let include_charts = self.include_charts.unwrap_or(false);

        Ok(SpecExportOptions {
            file_name: self.file_name.clone(),
            sheet_name: self
                .sheet_name
                .clone()
                .unwrap_or_else(|| C_SHEET_NAME_DEFAULT.to_string()),
            title: self.title.clone().filter(|val| !val.trim().is_empty()),
            subtitle: self.subtitle.clone().filter(|val| !val.trim().is_empty()),
            header_style,
            row_style,
            row_height,
            header_height,
            statistics: if include_statistics {
                self.statistics.clone().unwrap_or_default()
            } else {
                vec![]
            },
            charts: if include_charts {
                self.charts.clone().unwrap_or_default()
            } else {
                vec![]
            },
            include_statistics,
            include_charts,
            pagination,
            auto_filter: self.auto_filter.unwrap_or(true),
            freeze_header: self.freeze_header.unwrap_or(true),
        })
    }
}

fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ResolvedOptions

#[derive(Debug, Clone, PartialEq)]
pub struct SpecHeaderStyle {
    pub bg_color: String,
    pub text_color: String,
    pub font_size: u32,
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecRowStyle {
    pub alternate_colors: bool,
    pub even_row_color: String,
    pub odd_row_color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecPagination {
    pub enabled: bool,
    pub rows_per_page: usize,
    pub create_index: bool,
}

/// Immutable options produced by [`SpecExportConfig::resolve`].
///
/// `statistics` and `charts` are already emptied when their include flag is off.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecExportOptions {
    pub file_name: String,
    pub sheet_name: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub header_style: SpecHeaderStyle,
    pub row_style: SpecRowStyle,
    pub row_height: f64,
    pub header_height: f64,
    pub statistics: Vec<SpecStatBox>,
    pub charts: Vec<SpecChartSeries>,
    pub include_statistics: bool,
    pub include_charts: bool,
    pub pagination: SpecPagination,
    pub auto_filter: bool,
    pub freeze_header: bool,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PagesAndReport

/// One worksheet produced by pagination.
///
/// `start_row`/`end_row` are 1-based inclusive positions in the source records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecPage {
    /// Actual unique sheet name in workbook.
    pub name: String,
    pub start_row: usize,
    pub end_row: usize,
}

impl SpecPage {
    /// Number of records on this page.
    pub fn row_count(&self) -> usize {
        (self.end_row + 1).saturating_sub(self.start_row)
    }
}

/// Per-export report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecXlsxReport {
    /// Delivered file name.
    pub file_name: String,
    /// Worksheet names in final workbook order.
    pub sheet_names: Vec<String>,
    /// Pages, empty for single-sheet exports.
    pub pages: Vec<SpecPage>,
    /// Serialized workbook size.
    pub byte_len: usize,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }

    /// Whether an index sheet leads the workbook.
    pub fn has_index(&self) -> bool {
        self.pages.len() > 1 && self.sheet_names.len() == self.pages.len() + 1
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_format_overlay_keeps_unset_fields() {
        let base = SpecCellFormat {
            font_name: Some("Calibri".to_string()),
            bold: Some(true),
            bg_color: Some("#FFFFFF".to_string()),
            ..Default::default()
        };
        let fmt = base.with_(SpecCellFormat {
            bold: Some(false),
            bg_color: Some("#F3F4F6".to_string()),
            underline: Some(true),
            ..Default::default()
        });

        assert_eq!(fmt.font_name.as_deref(), Some("Calibri"));
        assert_eq!(fmt.bold, Some(false));
        assert_eq!(fmt.bg_color.as_deref(), Some("#F3F4F6"));
        assert_eq!(fmt.underline, Some(true));
        assert_eq!(fmt.num_format, None);
    }

    #[test]
    fn test_resolve_applies_documented_defaults() {
        let config = SpecExportConfig::new(vec![], vec![SpecColumn::new("Placa", "plate")], "x");
        let options = config.resolve().expect("resolve");

        assert_eq!(options.sheet_name, "Hoja1");
        assert_eq!(options.header_style.bg_color, "#4B5563");
        assert_eq!(options.header_style.text_color, "#FFFFFF");
        assert_eq!(options.header_style.font_size, 12);
        assert!(options.header_style.bold);
        assert!(options.row_style.alternate_colors);
        assert_eq!(options.row_style.even_row_color, "#FFFFFF");
        assert_eq!(options.row_style.odd_row_color, "#F3F4F6");
        assert_eq!(options.row_height, 20.0);
        assert_eq!(options.header_height, 25.0);
        assert!(!options.include_statistics);
        assert!(!options.include_charts);
        assert!(options.auto_filter);
        assert!(options.freeze_header);
        assert_eq!(
            options.pagination,
            SpecPagination {
                enabled: false,
                rows_per_page: 1000,
                create_index: true
            }
        );
    }

    #[test]
    fn test_resolve_drops_statistics_when_not_included() {
        let config = SpecExportConfig {
            statistics: Some(vec![SpecStatBox {
                title: "Total".to_string(),
                value: 10i64.into(),
                ..Default::default()
            }]),
            ..SpecExportConfig::new(vec![], vec![SpecColumn::new("A", "a")], "x")
        };
        assert!(config.resolve().expect("resolve").statistics.is_empty());
    }

    #[test]
    fn test_resolve_rejects_zero_rows_per_page() {
        let config = SpecExportConfig {
            pagination: Some(SpecPaginationConfig {
                enabled: Some(true),
                rows_per_page: Some(0),
                create_index: None,
            }),
            ..SpecExportConfig::new(vec![], vec![SpecColumn::new("A", "a")], "x")
        };
        assert!(matches!(
            config.resolve(),
            Err(XlsxExportError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_resolve_rejects_non_finite_heights() {
        for (row_height, header_height) in [
            (f64::NAN, 25.0),
            (f64::INFINITY, 25.0),
            (20.0, f64::NAN),
            (20.0, f64::INFINITY),
            (-1.0, 25.0),
        ] {
            let config = SpecExportConfig {
                row_height: Some(row_height),
                header_height: Some(header_height),
                ..SpecExportConfig::new(vec![], vec![SpecColumn::new("A", "a")], "x")
            };
            assert!(matches!(
                config.resolve(),
                Err(XlsxExportError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_config_parses_camel_case_json() {
        let config = SpecExportConfig::from_json_str(
            r##"{
                "data": [{"plate": "ABC-123", "km": 1200, "paid": true, "notes": null}],
                "columns": [
                    {"header": "Placa", "key": "plate", "width": 12},
                    {"header": "Km", "key": "km", "numFmt": "#,##0", "alignment": "right"},
                    {"header": "Fecha", "key": "date", "isDate": true, "dateFormat": "long"}
                ],
                "fileName": "vehiculos_{date}.xlsx",
                "headerStyle": {"bgColor": "#000000"},
                "pagination": {"enabled": true, "rowsPerPage": 500}
            }"##,
        )
        .expect("parse");

        assert_eq!(config.data[0]["plate"], EnumCellValue::from("ABC-123"));
        assert_eq!(config.data[0]["km"], EnumCellValue::Number(1200.0));
        assert_eq!(config.data[0]["paid"], EnumCellValue::Boolean(true));
        assert_eq!(config.data[0]["notes"], EnumCellValue::None);
        assert_eq!(config.columns[1].alignment, Some(EnumAlignment::Right));
        assert_eq!(config.columns[2].date_format, Some(EnumDateFormat::Long));
        assert!(config.columns[2].is_date);

        let options = config.resolve().expect("resolve");
        assert_eq!(options.header_style.bg_color, "#000000");
        assert_eq!(options.header_style.text_color, "#FFFFFF");
        assert_eq!(options.pagination.rows_per_page, 500);
        assert!(options.pagination.create_index);
    }

    #[test]
    fn test_page_row_count_is_inclusive() {
        let page = SpecPage {
            name: "p".to_string(),
            start_row: 1001,
            end_row: 2000,
        };
        assert_eq!(page.row_count(), 1000);
    }
}
