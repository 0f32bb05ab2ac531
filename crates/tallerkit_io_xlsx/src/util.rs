//! Stateless helper utilities: cell/style formatting, naming and layout math.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::conf::{
    C_FILE_NAME_DATE_PLACEHOLDER, C_ROW_BORDER_COLOR, C_SHEET_NAME_DEFAULT,
    N_CHART_BAR_WIDTH_MAX, N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL, derive_base_format,
    derive_data_format,
};
use crate::error::XlsxExportError;
use crate::spec::{
    EnumCellValue, EnumDateFormat, SpecCellFormat, SpecColumn, SpecHeaderStyle, SpecRowStyle,
};

const TUP_MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const TUP_NAIVE_DATETIME_PATTERNS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

////////////////////////////////////////////////////////////////////////////////
// #region CellValueFormatting

/// Parse a date-like string (RFC 3339, ISO date-time or plain ISO date).
pub fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let c_raw = raw.trim();
    if c_raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(c_raw) {
        return Some(dt.naive_local());
    }
    for c_pattern in TUP_NAIVE_DATETIME_PATTERNS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(c_raw, c_pattern) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(c_raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Render a date-like string; unparseable input is returned unchanged.
pub fn format_date(raw: &str, date_format: EnumDateFormat) -> String {
    let Some(dt) = parse_date_time(raw) else {
        return raw.to_string();
    };

    match date_format {
        EnumDateFormat::Short => dt.format("%d/%m/%Y").to_string(),
        EnumDateFormat::Long => format!(
            "{} de {} de {}",
            dt.day(),
            TUP_MONTH_NAMES[dt.month0() as usize],
            dt.year()
        ),
        EnumDateFormat::Datetime => dt.format("%d/%m/%Y, %H:%M").to_string(),
        EnumDateFormat::Time => dt.format("%H:%M").to_string(),
    }
}

/// Normalize a record value for one column: date columns render to text,
/// everything else passes through.
pub fn convert_cell_value(value: &EnumCellValue, column: &SpecColumn) -> EnumCellValue {
    match value {
        EnumCellValue::String(s) if column.is_date => EnumCellValue::String(format_date(
            s,
            column.date_format.unwrap_or_default(),
        )),
        _ => value.clone(),
    }
}

/// Display text of a value; missing values render as an empty string.
pub fn format_display_text(value: &EnumCellValue) -> String {
    match value {
        EnumCellValue::None => String::new(),
        EnumCellValue::Boolean(val) => val.to_string(),
        EnumCellValue::Number(val) => {
            if val.fract() == 0.0 && val.abs() < 1e15 {
                format!("{}", *val as i64)
            } else {
                val.to_string()
            }
        }
        EnumCellValue::String(val) => val.clone(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellStyleFormatting

/// Fill color of the data row at `row_idx` (0-based within the sheet).
pub fn derive_row_fill(row_idx: usize, row_style: &SpecRowStyle) -> &str {
    if row_style.alternate_colors && row_idx % 2 == 1 {
        &row_style.odd_row_color
    } else {
        &row_style.even_row_color
    }
}

/// Header cell format.
pub fn derive_header_format(header_style: &SpecHeaderStyle) -> SpecCellFormat {
    derive_base_format().with_(SpecCellFormat {
        font_size: Some(header_style.font_size),
        bold: Some(header_style.bold),
        align: Some("center".to_string()),
        border: Some(1),
        border_color: Some(C_ROW_BORDER_COLOR.to_string()),
        text_wrap: Some(true),
        bg_color: Some(header_style.bg_color.clone()),
        font_color: Some(header_style.text_color.clone()),
        ..Default::default()
    })
}

/// Data cell format for `column` on the data row at `row_idx`.
pub fn derive_data_cell_format(
    column: &SpecColumn,
    row_idx: usize,
    row_style: &SpecRowStyle,
) -> SpecCellFormat {
    derive_data_format().with_(SpecCellFormat {
        align: Some(column.alignment.unwrap_or_default().as_str().to_string()),
        num_format: column.num_fmt.clone(),
        bg_color: Some(derive_row_fill(row_idx, row_style).to_string()),
        ..Default::default()
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().trim_matches('\'').trim().to_string();
    if c_name.is_empty() {
        c_name = C_SHEET_NAME_DEFAULT.to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Create `"{base} - Pág {n} de {total}"`, shortening `base` to respect the length cap.
pub fn create_page_sheet_name(base_name: &str, page_idx_1based: usize, n_pages: usize) -> String {
    if n_pages <= 1 {
        return base_name.to_string();
    }
    let c_sheet_name_suffix = format!(" - Pág {page_idx_1based} de {n_pages}");
    let n_len_base_name_max =
        N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_sheet_name_suffix.chars().count());

    let c_sheet_name_base: String = base_name
        .chars()
        .take(usize::max(1, n_len_base_name_max))
        .collect();

    format!("{}{c_sheet_name_suffix}", c_sheet_name_base.trim_end())
}

/// Return `name`, or a `__N`-suffixed variant not yet in `existing`. Comparison is
/// case-insensitive like Excel's.
pub fn derive_unique_sheet_name(existing: &mut BTreeSet<String>, name: &str) -> String {
    if existing.insert(name.to_lowercase()) {
        return name.to_string();
    }

    let base_name: String = name
        .chars()
        .take(usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX - 3))
        .collect();

    let mut n_idx = 2usize;
    loop {
        let candidate: String = format!("{base_name}__{n_idx}")
            .chars()
            .take(N_LEN_EXCEL_SHEET_NAME_MAX)
            .collect();
        if existing.insert(candidate.to_lowercase()) {
            return candidate;
        }
        n_idx += 1;
    }
}

/// Split `n_records_total` into `(start, end_exclusive)` ranges of at most `size_page`.
pub fn plan_page_ranges(n_records_total: usize, size_page: usize) -> Vec<(usize, usize)> {
    let mut l_ranges = Vec::new();
    if size_page == 0 {
        return l_ranges;
    }
    let mut n_row_cursor = 0;
    while n_row_cursor < n_records_total {
        let n_row_end = usize::min(n_records_total, n_row_cursor + size_page);
        l_ranges.push((n_row_cursor, n_row_end));
        n_row_cursor = n_row_end;
    }
    l_ranges
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ChartMath

/// Percentage of `value` in `total`; a zero or non-finite total yields 0.
pub fn calculate_share_percent(value: f64, total: f64) -> f64 {
    if total == 0.0 || !total.is_finite() || !value.is_finite() {
        return 0.0;
    }
    value / total * 100.0
}

/// Bar length in block characters for `value` out of `total`.
pub fn calculate_bar_width(value: f64, total: f64) -> usize {
    let n_share = calculate_share_percent(value, total) / 100.0;
    (n_share * N_CHART_BAR_WIDTH_MAX as f64).round().max(0.0) as usize
}

/// `12.5%` style percentage label.
pub fn format_percent(percent: f64) -> String {
    format!("{percent:.1}%")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FileNaming

/// Substitute `{date}` with `YYYY-MM-DD`, neutralize path separators and ensure `.xlsx`.
pub fn resolve_file_name(file_name: &str, date: NaiveDate) -> String {
    let c_date = date.format("%Y-%m-%d").to_string();
    let mut c_name = file_name
        .trim()
        .replace(C_FILE_NAME_DATE_PLACEHOLDER, &c_date)
        .replace(['/', '\\'], "_");
    if !c_name.to_ascii_lowercase().ends_with(".xlsx") {
        c_name.push_str(".xlsx");
    }
    c_name
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region IndexCasts

pub fn cast_row_num(value: usize) -> Result<u32, XlsxExportError> {
    u32::try_from(value).map_err(|_| XlsxExportError::IndexOverflow { kind: "row", value })
}

pub fn cast_col_num(value: usize) -> Result<u16, XlsxExportError> {
    u16::try_from(value).map_err(|_| XlsxExportError::IndexOverflow {
        kind: "column",
        value,
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
