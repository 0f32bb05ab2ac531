//! Data table rendering: styled header, banded body rows, auto-filter and frozen header.

use tracing::debug;

use crate::conf::{N_COLUMN_WIDTH_DEFAULT, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};
use crate::error::XlsxExportError;
use crate::sheet::{SheetModel, SpecCellRange};
use crate::spec::{DataRecord, EnumCellValue, SpecColumn, SpecExportOptions};
use crate::util::{convert_cell_value, derive_data_cell_format, derive_header_format};

/// Write the header at `header_row` followed by one row per record.
///
/// Records missing a column key render a styled blank cell.
pub fn render_table(
    sheet: &mut SheetModel,
    columns: &[SpecColumn],
    records: &[DataRecord],
    header_row: usize,
    options: &SpecExportOptions,
) -> Result<(), XlsxExportError> {
    if columns.is_empty() {
        return Err(XlsxExportError::InvalidConfig(
            "columns must contain at least one column.".to_string(),
        ));
    }
    if columns.len() > N_NCOLS_EXCEL_MAX {
        return Err(XlsxExportError::InvalidConfig(format!(
            "{} columns exceed the Excel limit of {N_NCOLS_EXCEL_MAX}.",
            columns.len()
        )));
    }
    let n_row_last = header_row + records.len();
    if n_row_last >= N_NROWS_EXCEL_MAX {
        return Err(XlsxExportError::InvalidConfig(format!(
            "{} records do not fit in one worksheet; enable pagination.",
            records.len()
        )));
    }

    let fmt_header = derive_header_format(&options.header_style);
    for (n_idx_col, column) in columns.iter().enumerate() {
        sheet.set_column_width(n_idx_col, column.width.unwrap_or(N_COLUMN_WIDTH_DEFAULT));
        sheet.write(
            header_row,
            n_idx_col,
            EnumCellValue::String(column.header.clone()),
            fmt_header.clone(),
        );
    }
    sheet.set_row_height(header_row, options.header_height);

    // [even, odd] body formats per column
    let l_fmts_by_col: Vec<_> = columns
        .iter()
        .map(|column| {
            [
                derive_data_cell_format(column, 0, &options.row_style),
                derive_data_cell_format(column, 1, &options.row_style),
            ]
        })
        .collect();

    for (n_idx_record, record) in records.iter().enumerate() {
        let n_row = header_row + 1 + n_idx_record;
        sheet.set_row_height(n_row, options.row_height);

        for (n_idx_col, column) in columns.iter().enumerate() {
            let value = record
                .get(&column.key)
                .map(|value| convert_cell_value(value, column))
                .unwrap_or(EnumCellValue::None);
            sheet.write(
                n_row,
                n_idx_col,
                value,
                l_fmts_by_col[n_idx_col][n_idx_record % 2].clone(),
            );
        }
    }

    if options.auto_filter {
        sheet.set_autofilter(SpecCellRange {
            row_start: header_row,
            col_start: 0,
            row_end: n_row_last,
            col_end: columns.len() - 1,
        });
    }
    if options.freeze_header {
        sheet.set_freeze_panes(header_row + 1, 0);
    }

    debug!(
        sheet = sheet.name(),
        header_row,
        n_records = records.len(),
        n_columns = columns.len(),
        "rendered table"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::spec::{EnumAlignment, EnumDateFormat, SpecExportConfig, SpecRowStyleConfig};

    fn columns() -> Vec<SpecColumn> {
        let mut col_date = SpecColumn::new("Fecha", "date");
        col_date.is_date = true;
        col_date.date_format = Some(EnumDateFormat::Short);
        let mut col_total = SpecColumn::new("Total", "total");
        col_total.alignment = Some(EnumAlignment::Right);
        col_total.num_fmt = Some("#,##0.00".to_string());
        col_total.width = Some(12.0);
        vec![SpecColumn::new("Cliente", "client"), col_date, col_total]
    }

    fn records() -> Vec<DataRecord> {
        (0..3)
            .map(|n| {
                let mut record = DataRecord::new();
                record.insert("client".to_string(), format!("Cliente {n}").into());
                record.insert("date".to_string(), "2025-03-05".into());
                if n != 1 {
                    record.insert("total".to_string(), EnumCellValue::Number(100.0 * n as f64));
                }
                record
            })
            .collect()
    }

    fn options(config: SpecExportConfig) -> SpecExportOptions {
        config.resolve().expect("resolve")
    }

    #[test]
    fn test_render_table_writes_header_and_rows() {
        let mut sheet = SheetModel::new("Hoja1");
        let opts = options(SpecExportConfig::new(vec![], columns(), "x"));
        render_table(&mut sheet, &columns(), &records(), 2, &opts).expect("render");

        assert_eq!(sheet.cell_text(2, 0).as_deref(), Some("Cliente"));
        assert_eq!(sheet.cell_text(3, 0).as_deref(), Some("Cliente 0"));
        assert_eq!(sheet.cell_text(3, 1).as_deref(), Some("05/03/2025"));
        assert_eq!(sheet.cell(4, 2).map(|c| &c.value), Some(&EnumCellValue::None));
        assert_eq!(
            sheet.cell(5, 2).map(|c| &c.value),
            Some(&EnumCellValue::Number(200.0))
        );
        assert_eq!(sheet.next_free_row(), 6);

        let fmt_header = &sheet.cell(2, 0).expect("header").format;
        assert_eq!(fmt_header.bg_color.as_deref(), Some("#4B5563"));
        assert_eq!(fmt_header.font_color.as_deref(), Some("#FFFFFF"));
        assert_eq!(fmt_header.bold, Some(true));

        let fmt_total = &sheet.cell(3, 2).expect("total").format;
        assert_eq!(fmt_total.align.as_deref(), Some("right"));
        assert_eq!(fmt_total.num_format.as_deref(), Some("#,##0.00"));

        assert_eq!(sheet.row_height(2), Some(25.0));
        assert_eq!(sheet.row_height(3), Some(20.0));
        assert_eq!(sheet.column_width(0), Some(15.0));
        assert_eq!(sheet.column_width(2), Some(12.0));
    }

    #[test]
    fn test_render_table_alternates_fills() {
        let mut sheet = SheetModel::new("Hoja1");
        let opts = options(SpecExportConfig::new(vec![], columns(), "x"));
        render_table(&mut sheet, &columns(), &records(), 0, &opts).expect("render");

        let fill = |row| sheet.cell(row, 0).and_then(|c| c.format.bg_color.clone());
        assert_eq!(fill(1).as_deref(), Some("#FFFFFF"));
        assert_eq!(fill(2).as_deref(), Some("#F3F4F6"));
        assert_eq!(fill(3).as_deref(), Some("#FFFFFF"));

        let opts = options(SpecExportConfig {
            row_style: Some(SpecRowStyleConfig {
                alternate_colors: Some(false),
                ..Default::default()
            }),
            ..SpecExportConfig::new(vec![], columns(), "x")
        });
        let mut sheet = SheetModel::new("Hoja1");
        render_table(&mut sheet, &columns(), &records(), 0, &opts).expect("render");
        assert_eq!(
            sheet.cell(2, 0).and_then(|c| c.format.bg_color.clone()).as_deref(),
            Some("#FFFFFF")
        );
    }

    #[test]
    fn test_render_table_autofilter_and_freeze() {
        let mut sheet = SheetModel::new("Hoja1");
        let opts = options(SpecExportConfig::new(vec![], columns(), "x"));
        render_table(&mut sheet, &columns(), &records(), 4, &opts).expect("render");
        assert_eq!(
            sheet.autofilter(),
            Some(SpecCellRange {
                row_start: 4,
                col_start: 0,
                row_end: 7,
                col_end: 2
            })
        );
        assert_eq!(sheet.freeze_panes(), Some((5, 0)));

        let opts = options(SpecExportConfig {
            auto_filter: Some(false),
            freeze_header: Some(false),
            ..SpecExportConfig::new(vec![], columns(), "x")
        });
        let mut sheet = SheetModel::new("Hoja1");
        render_table(&mut sheet, &columns(), &records(), 4, &opts).expect("render");
        assert_eq!(sheet.autofilter(), None);
        assert_eq!(sheet.freeze_panes(), None);
    }
}
