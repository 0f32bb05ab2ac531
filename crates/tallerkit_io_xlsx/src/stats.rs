//! Statistics panel: a grid of summary tiles above the data table.

use tracing::debug;

use crate::conf::{
    C_STAT_BG_COLOR_DEFAULT, C_STAT_TITLE_COLOR_DEFAULT, C_STAT_VALUE_COLOR_DEFAULT,
    N_STAT_BOX_GAP, N_STAT_BOX_HEIGHT, N_STAT_BOX_WIDTH, N_STAT_BOXES_PER_ROW,
    N_STAT_DESCRIPTION_FONT_SIZE, N_STAT_TITLE_FONT_SIZE, N_STAT_VALUE_FONT_SIZE,
    derive_base_format,
};
use crate::error::XlsxExportError;
use crate::sheet::{SheetModel, SpecCellRange};
use crate::spec::{EnumCellValue, SpecCellFormat, SpecStatBox};

const N_STAT_VALUE_ROW_HEIGHT: f64 = 30.0;

/// Top-left cell of the box at `box_idx`, relative to the panel origin.
pub fn derive_stat_box_origin(box_idx: usize) -> (usize, usize) {
    let n_group = box_idx / N_STAT_BOXES_PER_ROW;
    let n_pos = box_idx % N_STAT_BOXES_PER_ROW;
    (
        n_group * N_STAT_BOX_HEIGHT,
        n_pos * (N_STAT_BOX_WIDTH + N_STAT_BOX_GAP),
    )
}

/// Render `stat_boxes` from `start_row` and return the next free row.
///
/// Returns `start_row` untouched when disabled or empty.
pub fn render_statistics(
    sheet: &mut SheetModel,
    stat_boxes: &[SpecStatBox],
    start_row: usize,
    enabled: bool,
) -> Result<usize, XlsxExportError> {
    if !enabled || stat_boxes.is_empty() {
        return Ok(start_row);
    }

    for (n_idx_box, stat_box) in stat_boxes.iter().enumerate() {
        let (n_row_offset, n_col) = derive_stat_box_origin(n_idx_box);
        let n_row = start_row + n_row_offset;
        let n_col_end = n_col + N_STAT_BOX_WIDTH - 1;
        let [fmt_title, fmt_value, fmt_description] = derive_stat_box_formats(stat_box);

        sheet.merge_range(
            SpecCellRange {
                row_start: n_row,
                col_start: n_col,
                row_end: n_row,
                col_end: n_col_end,
            },
            EnumCellValue::String(stat_box.title.clone()),
            fmt_title,
        )?;
        sheet.merge_range(
            SpecCellRange {
                row_start: n_row + 1,
                col_start: n_col,
                row_end: n_row + 1,
                col_end: n_col_end,
            },
            stat_box.value.clone(),
            fmt_value,
        )?;
        sheet.merge_range(
            SpecCellRange {
                row_start: n_row + 2,
                col_start: n_col,
                row_end: n_row + 2,
                col_end: n_col_end,
            },
            EnumCellValue::String(stat_box.description.clone().unwrap_or_default()),
            fmt_description,
        )?;
        sheet.set_row_height(n_row + 1, N_STAT_VALUE_ROW_HEIGHT);
    }

    let n_groups = stat_boxes.len().div_ceil(N_STAT_BOXES_PER_ROW);
    debug!(
        sheet = sheet.name(),
        start_row,
        n_boxes = stat_boxes.len(),
        "rendered statistics panel"
    );
    // one spacer row below the panel
    Ok(start_row + n_groups * N_STAT_BOX_HEIGHT + 1)
}

/// `[title, value, description]` formats for one box.
fn derive_stat_box_formats(stat_box: &SpecStatBox) -> [SpecCellFormat; 3] {
    let c_bg = stat_box
        .bg_color
        .clone()
        .unwrap_or_else(|| C_STAT_BG_COLOR_DEFAULT.to_string());
    let fmt_box = derive_base_format().with_(SpecCellFormat {
        align: Some("center".to_string()),
        bg_color: Some(c_bg),
        ..Default::default()
    });
    let color_or = |default: &str| {
        stat_box
            .text_color
            .clone()
            .unwrap_or_else(|| default.to_string())
    };

    [
        fmt_box.with_(SpecCellFormat {
            font_size: Some(N_STAT_TITLE_FONT_SIZE),
            font_color: Some(color_or(C_STAT_TITLE_COLOR_DEFAULT)),
            ..Default::default()
        }),
        fmt_box.with_(SpecCellFormat {
            font_size: Some(N_STAT_VALUE_FONT_SIZE),
            bold: Some(true),
            font_color: Some(color_or(C_STAT_VALUE_COLOR_DEFAULT)),
            ..Default::default()
        }),
        fmt_box.with_(SpecCellFormat {
            font_size: Some(N_STAT_DESCRIPTION_FONT_SIZE),
            font_color: Some(color_or(C_STAT_TITLE_COLOR_DEFAULT)),
            ..Default::default()
        }),
    ]
}
