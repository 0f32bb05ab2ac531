//! Chart-as-table rendering: each series becomes a category/value/share/bar block.

use tracing::{debug, warn};

use crate::conf::{
    C_CHART_BAR_CHAR, N_CHART_ROW_SPACING, TUP_CHART_HEADERS, TUP_CHART_PALETTE,
    derive_base_format, derive_data_format,
};
use crate::error::XlsxExportError;
use crate::sheet::{SheetModel, SpecCellRange};
use crate::spec::{EnumCellValue, SpecCellFormat, SpecChartSeries};
use crate::util::{calculate_bar_width, calculate_share_percent, format_percent};

/// One computed chart row.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecChartRow {
    pub category: String,
    pub value: f64,
    pub percent: f64,
    pub bar_width: usize,
}

/// Pair categories with values and compute shares. Extra entries on the longer
/// side are dropped; a zero total yields 0% everywhere.
pub fn derive_chart_rows(series: &SpecChartSeries) -> Vec<SpecChartRow> {
    let n_len = usize::min(series.categories.len(), series.values.len());
    let n_total: f64 = series.values[..n_len]
        .iter()
        .filter(|val| val.is_finite())
        .sum();

    series
        .categories
        .iter()
        .zip(&series.values)
        .map(|(category, value)| SpecChartRow {
            category: category.clone(),
            value: *value,
            percent: calculate_share_percent(*value, n_total),
            bar_width: calculate_bar_width(*value, n_total),
        })
        .collect()
}

/// Rows a chart block occupies: title, header and one row per category.
pub fn calculate_chart_block_rows(series: &SpecChartSeries) -> usize {
    2 + usize::min(series.categories.len(), series.values.len())
}

/// Whether the block runs past its fixed slot into the next chart.
pub fn is_chart_block_overflowing(series: &SpecChartSeries, if_chart_follows: bool) -> bool {
    if_chart_follows && calculate_chart_block_rows(series) > N_CHART_ROW_SPACING
}

/// Render every series; chart `i` starts at `start_row + i * 15`.
///
/// Returns the row right below the last chart slot.
pub fn render_charts(
    sheet: &mut SheetModel,
    charts: &[SpecChartSeries],
    start_row: usize,
) -> Result<usize, XlsxExportError> {
    for (n_idx_chart, series) in charts.iter().enumerate() {
        if is_chart_block_overflowing(series, n_idx_chart + 1 < charts.len()) {
            warn!(
                sheet = sheet.name(),
                n_idx_chart,
                n_rows = calculate_chart_block_rows(series),
                n_rows_slot = N_CHART_ROW_SPACING,
                "chart block overflows its slot; the next chart overwrites its last rows"
            );
        }
        render_chart(
            sheet,
            series,
            n_idx_chart,
            start_row + n_idx_chart * N_CHART_ROW_SPACING,
        )?;
    }
    Ok(start_row + charts.len() * N_CHART_ROW_SPACING)
}

fn render_chart(
    sheet: &mut SheetModel,
    series: &SpecChartSeries,
    n_idx_chart: usize,
    n_row_start: usize,
) -> Result<(), XlsxExportError> {
    if series.categories.len() != series.values.len() {
        warn!(
            sheet = sheet.name(),
            n_categories = series.categories.len(),
            n_values = series.values.len(),
            "chart series lengths differ; extra entries dropped"
        );
    }
    let l_rows = derive_chart_rows(series);
    if !l_rows.is_empty() && l_rows.iter().all(|row| row.percent == 0.0) {
        warn!(sheet = sheet.name(), "chart series total is zero");
    }

    let c_title = series
        .title
        .clone()
        .unwrap_or_else(|| format!("Gráfico {}", n_idx_chart + 1));
    sheet.merge_range(
        SpecCellRange {
            row_start: n_row_start,
            col_start: 0,
            row_end: n_row_start,
            col_end: TUP_CHART_HEADERS.len() - 1,
        },
        EnumCellValue::String(c_title),
        derive_base_format().with_(SpecCellFormat {
            font_size: Some(13),
            bold: Some(true),
            font_color: Some("#111827".to_string()),
            ..Default::default()
        }),
    )?;

    let fmt_header = derive_data_format().with_(SpecCellFormat {
        bold: Some(true),
        align: Some("center".to_string()),
        bg_color: Some("#E5E7EB".to_string()),
        font_color: Some("#1F2937".to_string()),
        ..Default::default()
    });
    for (n_idx_col, c_header) in TUP_CHART_HEADERS.iter().enumerate() {
        sheet.write(
            n_row_start + 1,
            n_idx_col,
            EnumCellValue::from(*c_header),
            fmt_header.clone(),
        );
    }

    let fmt_cell = derive_data_format();
    for (n_idx_row, row) in l_rows.iter().enumerate() {
        let n_row = n_row_start + 2 + n_idx_row;
        sheet.write(
            n_row,
            0,
            EnumCellValue::String(row.category.clone()),
            fmt_cell.clone(),
        );
        sheet.write(
            n_row,
            1,
            EnumCellValue::Number(row.value),
            fmt_cell.with_(SpecCellFormat {
                align: Some("right".to_string()),
                ..Default::default()
            }),
        );
        sheet.write(
            n_row,
            2,
            EnumCellValue::String(format_percent(row.percent)),
            fmt_cell.with_(SpecCellFormat {
                align: Some("right".to_string()),
                ..Default::default()
            }),
        );
        sheet.write(
            n_row,
            3,
            EnumCellValue::String(C_CHART_BAR_CHAR.to_string().repeat(row.bar_width)),
            fmt_cell.with_(SpecCellFormat {
                font_color: Some(TUP_CHART_PALETTE[n_idx_row % TUP_CHART_PALETTE.len()].to_string()),
                ..Default::default()
            }),
        );
    }

    debug!(
        sheet = sheet.name(),
        n_row_start,
        n_categories = l_rows.len(),
        "rendered chart"
    );
    Ok(())
}
