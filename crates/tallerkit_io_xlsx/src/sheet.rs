//! Neutral in-memory worksheet model.
//!
//! Sheets are composed here first and only materialized into a
//! `rust_xlsxwriter::Worksheet` once the final workbook order is known, so
//! reordering never has to rebuild library worksheets.

use std::collections::BTreeMap;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, FormatUnderline, Url, Worksheet};

use crate::error::XlsxExportError;
use crate::spec::{EnumCellValue, SpecCellFormat};
use crate::util::{cast_col_num, cast_row_num};

/// One written cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecSheetCell {
    pub value: EnumCellValue,
    pub format: SpecCellFormat,
}

/// Hyperlink cell. `target` uses the `#'Sheet'!A1` form for in-workbook links.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecSheetHyperlink {
    pub target: String,
    pub text: String,
    pub format: SpecCellFormat,
}

/// Inclusive cell rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecCellRange {
    pub row_start: usize,
    pub col_start: usize,
    pub row_end: usize,
    pub col_end: usize,
}

impl SpecCellRange {
    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.row_start..=self.row_end).contains(&row) && (self.col_start..=self.col_end).contains(&col)
    }
}

/// Merged region with the value shown in its top-left cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecMergeRange {
    pub range: SpecCellRange,
    pub value: EnumCellValue,
    pub format: SpecCellFormat,
}

/// Library-independent worksheet content.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetModel {
    name: String,
    cells: BTreeMap<(usize, usize), SpecSheetCell>,
    links: BTreeMap<(usize, usize), SpecSheetHyperlink>,
    merges: Vec<SpecMergeRange>,
    row_heights: BTreeMap<usize, f64>,
    col_widths: BTreeMap<usize, f64>,
    autofilter: Option<SpecCellRange>,
    freeze_panes: Option<(usize, usize)>,
}

impl SheetModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn write(&mut self, row: usize, col: usize, value: EnumCellValue, format: SpecCellFormat) {
        self.links.remove(&(row, col));
        self.cells.insert((row, col), SpecSheetCell { value, format });
    }

    pub fn write_link(
        &mut self,
        row: usize,
        col: usize,
        target: impl Into<String>,
        text: impl Into<String>,
        format: SpecCellFormat,
    ) {
        self.cells.remove(&(row, col));
        self.links.insert(
            (row, col),
            SpecSheetHyperlink {
                target: target.into(),
                text: text.into(),
                format,
            },
        );
    }

    /// Merge an inclusive rectangle. Overlapping an existing merge is rejected
    /// here rather than at save time; a single-cell range degrades to a plain write.
    pub fn merge_range(
        &mut self,
        range: SpecCellRange,
        value: EnumCellValue,
        format: SpecCellFormat,
    ) -> Result<(), XlsxExportError> {
        if range.row_end < range.row_start || range.col_end < range.col_start {
            return Err(XlsxExportError::Xlsx(format!(
                "invalid merge range in sheet {:?}: {range:?}",
                self.name
            )));
        }
        if range.row_start == range.row_end && range.col_start == range.col_end {
            self.write(range.row_start, range.col_start, value, format);
            return Ok(());
        }
        if let Some(existing) = self.merges.iter().find(|m| overlaps(&m.range, &range)) {
            return Err(XlsxExportError::Xlsx(format!(
                "merge range {range:?} overlaps {:?} in sheet {:?}",
                existing.range, self.name
            )));
        }
        self.merges.push(SpecMergeRange {
            range,
            value,
            format,
        });
        Ok(())
    }

    pub fn set_row_height(&mut self, row: usize, height: f64) {
        self.row_heights.insert(row, height);
    }

    pub fn set_column_width(&mut self, col: usize, width: f64) {
        self.col_widths.insert(col, width);
    }

    pub fn set_autofilter(&mut self, range: SpecCellRange) {
        self.autofilter = Some(range);
    }

    /// Freeze every row above `row` and every column left of `col`.
    pub fn set_freeze_panes(&mut self, row: usize, col: usize) {
        self.freeze_panes = Some((row, col));
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&SpecSheetCell> {
        self.cells.get(&(row, col))
    }

    /// Display text at a position, looking through merges and hyperlinks.
    pub fn cell_text(&self, row: usize, col: usize) -> Option<String> {
        if let Some(link) = self.links.get(&(row, col)) {
            return Some(link.text.clone());
        }
        if let Some(merge) = self
            .merges
            .iter()
            .find(|m| m.range.row_start == row && m.range.col_start == col)
        {
            return Some(crate::util::format_display_text(&merge.value));
        }
        self.cells
            .get(&(row, col))
            .map(|cell| crate::util::format_display_text(&cell.value))
    }

    pub fn link(&self, row: usize, col: usize) -> Option<&SpecSheetHyperlink> {
        self.links.get(&(row, col))
    }

    pub fn cells(&self) -> impl Iterator<Item = (&(usize, usize), &SpecSheetCell)> {
        self.cells.iter()
    }

    pub fn merges(&self) -> &[SpecMergeRange] {
        &self.merges
    }

    pub fn row_height(&self, row: usize) -> Option<f64> {
        self.row_heights.get(&row).copied()
    }

    pub fn column_width(&self, col: usize) -> Option<f64> {
        self.col_widths.get(&col).copied()
    }

    pub fn autofilter(&self) -> Option<SpecCellRange> {
        self.autofilter
    }

    pub fn freeze_panes(&self) -> Option<(usize, usize)> {
        self.freeze_panes
    }

    /// Index of the next row below every written cell, merge and link.
    pub fn next_free_row(&self) -> usize {
        let n_cells = self.cells.keys().map(|(row, _)| row + 1).max().unwrap_or(0);
        let n_links = self.links.keys().map(|(row, _)| row + 1).max().unwrap_or(0);
        let n_merges = self
            .merges
            .iter()
            .map(|m| m.range.row_end + 1)
            .max()
            .unwrap_or(0);
        n_cells.max(n_links).max(n_merges)
    }

    /// Copy the whole model into a library worksheet.
    pub fn materialize(&self, worksheet: &mut Worksheet) -> Result<(), XlsxExportError> {
        worksheet.set_name(&self.name)?;

        for (col, width) in &self.col_widths {
            worksheet.set_column_width(cast_col_num(*col)?, *width)?;
        }
        for (row, height) in &self.row_heights {
            worksheet.set_row_height(cast_row_num(*row)?, *height)?;
        }

        for ((row, col), cell) in &self.cells {
            write_cell_with_format(
                worksheet,
                *row,
                *col,
                &cell.value,
                &derive_rust_xlsx_format(&cell.format),
            )?;
        }

        for merge in &self.merges {
            let fmt = derive_rust_xlsx_format(&merge.format);
            let range = merge.range;
            let c_text = match &merge.value {
                EnumCellValue::String(val) => val.as_str(),
                _ => "",
            };
            worksheet.merge_range(
                cast_row_num(range.row_start)?,
                cast_col_num(range.col_start)?,
                cast_row_num(range.row_end)?,
                cast_col_num(range.col_end)?,
                c_text,
                &fmt,
            )?;
            if !matches!(merge.value, EnumCellValue::String(_) | EnumCellValue::None) {
                write_cell_with_format(
                    worksheet,
                    range.row_start,
                    range.col_start,
                    &merge.value,
                    &fmt,
                )?;
            }
        }

        for ((row, col), link) in &self.links {
            let url = Url::new(derive_library_link_target(&link.target)).set_text(&link.text);
            worksheet.write_url_with_format(
                cast_row_num(*row)?,
                cast_col_num(*col)?,
                url,
                &derive_rust_xlsx_format(&link.format),
            )?;
        }

        if let Some(range) = self.autofilter {
            worksheet.autofilter(
                cast_row_num(range.row_start)?,
                cast_col_num(range.col_start)?,
                cast_row_num(range.row_end)?,
                cast_col_num(range.col_end)?,
            )?;
        }
        if let Some((row, col)) = self.freeze_panes {
            worksheet.set_freeze_panes(cast_row_num(row)?, cast_col_num(col)?)?;
        }

        Ok(())
    }
}

/// `#'Sheet name'!A1` link target for an in-workbook sheet.
pub fn create_internal_link_target(sheet_name: &str) -> String {
    format!("#'{}'!A1", sheet_name.replace('\'', "''"))
}

fn derive_library_link_target(target: &str) -> String {
    match target.strip_prefix('#') {
        Some(location) => format!("internal:{location}"),
        None => target.to_string(),
    }
}

fn overlaps(a: &SpecCellRange, b: &SpecCellRange) -> bool {
    a.row_start <= b.row_end
        && b.row_start <= a.row_end
        && a.col_start <= b.col_end
        && b.col_start <= a.col_end
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), XlsxExportError> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumCellValue::None => {
            worksheet.write_blank(n_row, n_col, format)?;
        }
        EnumCellValue::String(val) if val.is_empty() => {
            worksheet.write_blank(n_row, n_col, format)?;
        }
        EnumCellValue::String(val) => {
            worksheet.write_string_with_format(n_row, n_col, val, format)?;
        }
        EnumCellValue::Number(val) if !val.is_finite() => {
            worksheet.write_string_with_format(n_row, n_col, val.to_string(), format)?;
        }
        EnumCellValue::Number(val) => {
            worksheet.write_number_with_format(n_row, n_col, *val, format)?;
        }
        EnumCellValue::Boolean(val) => {
            worksheet.write_boolean_with_format(n_row, n_col, *val, format)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.as_str());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val);
    }
    if spec.bold == Some(true) {
        format = format.set_bold();
    }
    if spec.italic == Some(true) {
        format = format.set_italic();
    }
    if spec.text_wrap == Some(true) {
        format = format.set_text_wrap();
    }
    if spec.underline == Some(true) {
        format = format.set_underline(FormatUnderline::Single);
    }

    // horizontal and vertical alignment share one setter in the library
    if let Some(align) = spec.align.as_deref().and_then(derive_horizontal_align) {
        format = format.set_align(align);
    }
    if let Some(align) = spec.valign.as_deref().and_then(derive_vertical_align) {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.as_str());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }
    if let Some(border) = spec.border.map(derive_format_border)
        && border != FormatBorder::None
    {
        format = format.set_border(border);
        if let Some(val) = &spec.border_color {
            format = format.set_border_color(val.as_str());
        }
    }

    format
}

/// Border weight: 0 none, 1 thin, 2 medium, 5 thick; other codes fall back to thin.
fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        n if n <= 0 => FormatBorder::None,
        2 => FormatBorder::Medium,
        5 => FormatBorder::Thick,
        _ => FormatBorder::Thin,
    }
}

/// Column alignment names (`left`, `center`, `right`).
fn derive_horizontal_align(align: &str) -> Option<FormatAlign> {
    match align.trim() {
        c if c.eq_ignore_ascii_case("left") => Some(FormatAlign::Left),
        c if c.eq_ignore_ascii_case("center") => Some(FormatAlign::Center),
        c if c.eq_ignore_ascii_case("right") => Some(FormatAlign::Right),
        _ => None,
    }
}

/// Vertical names; `center` here means vertical center, not horizontal.
fn derive_vertical_align(valign: &str) -> Option<FormatAlign> {
    match valign.trim() {
        c if c.eq_ignore_ascii_case("top") => Some(FormatAlign::Top),
        c if c.eq_ignore_ascii_case("bottom") => Some(FormatAlign::Bottom),
        c if c.eq_ignore_ascii_case("center") || c.eq_ignore_ascii_case("vcenter") => {
            Some(FormatAlign::VerticalCenter)
        }
        _ => None,
    }
}
