//! XLSX export constants and default preset factories.

use crate::spec::SpecCellFormat;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// MIME type attached to every delivered workbook.
pub const C_MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
/// File name placeholder substituted with the export date.
pub const C_FILE_NAME_DATE_PLACEHOLDER: &str = "{date}";

////////////////////////////////////////////////////////////////////////////////
// #region ConfigurationDefaults

/// Default base worksheet name.
pub const C_SHEET_NAME_DEFAULT: &str = "Hoja1";
/// Name of the navigation sheet created for paginated exports.
pub const C_INDEX_SHEET_NAME: &str = "Índice";

pub const C_HEADER_BG_COLOR_DEFAULT: &str = "#4B5563";
pub const C_HEADER_TEXT_COLOR_DEFAULT: &str = "#FFFFFF";
pub const N_HEADER_FONT_SIZE_DEFAULT: u32 = 12;

pub const C_ROW_EVEN_COLOR_DEFAULT: &str = "#FFFFFF";
pub const C_ROW_ODD_COLOR_DEFAULT: &str = "#F3F4F6";
pub const C_ROW_BORDER_COLOR: &str = "#E5E7EB";

/// Data row height in points.
pub const N_ROW_HEIGHT_DEFAULT: f64 = 20.0;
/// Header row height in points.
pub const N_HEADER_HEIGHT_DEFAULT: f64 = 25.0;
/// Column width used when a descriptor carries none.
pub const N_COLUMN_WIDTH_DEFAULT: f64 = 15.0;

/// Records per page before pagination splits the dataset.
pub const N_ROWS_PER_PAGE_DEFAULT: usize = 1_000;

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region LayoutConstants

/// Stat boxes per grid row.
pub const N_STAT_BOXES_PER_ROW: usize = 5;
/// Columns spanned by one stat box.
pub const N_STAT_BOX_WIDTH: usize = 2;
/// Rows spanned by one stat box (title, value, description).
pub const N_STAT_BOX_HEIGHT: usize = 3;
/// Empty columns between two stat boxes.
pub const N_STAT_BOX_GAP: usize = 1;

pub const C_STAT_BG_COLOR_DEFAULT: &str = "#F9FAFB";
pub const C_STAT_TITLE_COLOR_DEFAULT: &str = "#6B7280";
pub const C_STAT_VALUE_COLOR_DEFAULT: &str = "#1F2937";
pub const N_STAT_TITLE_FONT_SIZE: u32 = 9;
pub const N_STAT_VALUE_FONT_SIZE: u32 = 20;
pub const N_STAT_DESCRIPTION_FONT_SIZE: u32 = 8;

/// Vertical distance between the start rows of consecutive charts.
pub const N_CHART_ROW_SPACING: usize = 15;
/// Empty rows between the last table row and the first chart.
pub const N_CHART_TABLE_GAP: usize = 3;
/// Bar length for a category holding 100% of the total.
pub const N_CHART_BAR_WIDTH_MAX: usize = 20;
/// Character repeated to draw a chart bar.
pub const C_CHART_BAR_CHAR: char = '█';
/// Bar colors, cycled by row position.
pub const TUP_CHART_PALETTE: [&str; 8] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#14B8A6", "#F97316",
];
/// Chart table header labels.
pub const TUP_CHART_HEADERS: [&str; 4] = ["Categoría", "Valor", "Porcentaje", "Gráfico"];

/// Index sheet header labels.
pub const TUP_INDEX_HEADERS: [&str; 4] = ["Página", "Hoja", "Registros", "Enlace"];
/// Label of every index hyperlink.
pub const C_INDEX_LINK_TEXT: &str = "Ir a página →";
/// Index sheet column widths.
pub const TUP_INDEX_COLUMN_WIDTHS: [f64; 4] = [10.0, 36.0, 12.0, 18.0];

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FormatPresets

/// Base format shared by every cell written by the exporter.
pub fn derive_base_format() -> SpecCellFormat {
    SpecCellFormat {
        font_name: Some("Calibri".to_string()),
        font_size: Some(11),
        valign: Some("vcenter".to_string()),
        ..Default::default()
    }
}

/// Title row format.
pub fn derive_title_format() -> SpecCellFormat {
    derive_base_format().with_(SpecCellFormat {
        font_size: Some(16),
        bold: Some(true),
        font_color: Some("#111827".to_string()),
        ..Default::default()
    })
}

/// Subtitle row format.
pub fn derive_subtitle_format() -> SpecCellFormat {
    derive_base_format().with_(SpecCellFormat {
        font_size: Some(11),
        italic: Some(true),
        font_color: Some("#6B7280".to_string()),
        ..Default::default()
    })
}

/// Data cell format before fill, alignment and number format are applied.
pub fn derive_data_format() -> SpecCellFormat {
    derive_base_format().with_(SpecCellFormat {
        border: Some(1),
        border_color: Some(C_ROW_BORDER_COLOR.to_string()),
        ..Default::default()
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
