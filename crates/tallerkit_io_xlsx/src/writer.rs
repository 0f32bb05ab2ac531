//! Export orchestrator: resolves options, composes sheets, serializes and delivers.

use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};
use rust_xlsxwriter::Workbook;
use tracing::{info, warn};

use crate::chart::render_charts;
use crate::conf::{
    C_INDEX_SHEET_NAME, C_MIME_XLSX, N_CHART_TABLE_GAP, derive_subtitle_format,
    derive_title_format,
};
use crate::error::XlsxExportError;
use crate::index::{build_index_sheet, should_create_index};
use crate::pagination::{is_pagination_active, render_pages};
use crate::sheet::{SheetModel, SpecCellRange};
use crate::sink::ExportSink;
use crate::spec::{
    DataRecord, EnumCellValue, SpecColumn, SpecExportConfig, SpecExportOptions, SpecPage,
    SpecXlsxReport,
};
use crate::stats::render_statistics;
use crate::table::render_table;
use crate::util::{
    create_page_sheet_name, derive_unique_sheet_name, resolve_file_name, sanitize_sheet_name,
};

/// Optional blocks of a data sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecSheetSections {
    pub with_statistics: bool,
    pub with_charts: bool,
}

/// Sheets in final workbook order, before serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecWorkbookPlan {
    pub sheets: Vec<SheetModel>,
    pub pages: Vec<SpecPage>,
    pub warnings: Vec<String>,
}

impl SpecWorkbookPlan {
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets
            .iter()
            .map(|sheet| sheet.name().to_string())
            .collect()
    }
}

/// Stateless exporter. Each call owns its own workbook.
#[derive(Debug, Clone, Default)]
pub struct XlsxExporter {
    export_date: Option<NaiveDate>,
}

impl XlsxExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the date substituted into `{date}` file name placeholders.
    pub fn with_export_date(export_date: NaiveDate) -> Self {
        Self {
            export_date: Some(export_date),
        }
    }

    /// File name the export will be delivered under.
    pub fn file_name(&self, options: &SpecExportOptions) -> String {
        let date = self
            .export_date
            .unwrap_or_else(|| Local::now().date_naive());
        resolve_file_name(&options.file_name, date)
    }

    /// Compose every sheet in final order without touching the xlsx library.
    pub fn plan(&self, config: &SpecExportConfig) -> Result<SpecWorkbookPlan, XlsxExportError> {
        let options = config.resolve()?;
        self.plan_with_options(config, &options)
    }

    fn plan_with_options(
        &self,
        config: &SpecExportConfig,
        options: &SpecExportOptions,
    ) -> Result<SpecWorkbookPlan, XlsxExportError> {
        let mut l_warnings = Vec::new();
        let c_base_name = sanitize_sheet_name(&options.sheet_name, "_");
        if c_base_name != options.sheet_name {
            let c_msg = format!(
                "Sheet name {:?} sanitized to {c_base_name:?}.",
                options.sheet_name
            );
            warn!("{c_msg}");
            l_warnings.push(c_msg);
        }

        let mut set_sheet_names = BTreeSet::new();

        if !is_pagination_active(config.data.len(), &options.pagination) {
            let c_name = derive_unique_sheet_name(&mut set_sheet_names, &c_base_name);
            let sheet = compose_data_sheet(
                &c_name,
                &config.columns,
                &config.data,
                options,
                SpecSheetSections {
                    with_statistics: true,
                    with_charts: true,
                },
            )?;
            return Ok(SpecWorkbookPlan {
                sheets: vec![sheet],
                pages: vec![],
                warnings: l_warnings,
            });
        }

        // the index name is reserved before pages are named so it never gets a suffix
        let n_pages_expected = config.data.len().div_ceil(options.pagination.rows_per_page);
        let if_index = options.pagination.create_index && n_pages_expected >= 2;
        if if_index {
            derive_unique_sheet_name(&mut set_sheet_names, C_INDEX_SHEET_NAME);
        }

        let (l_page_sheets, l_pages) = render_pages(
            &c_base_name,
            &config.columns,
            &config.data,
            options,
            &mut set_sheet_names,
        )?;
        for (n_idx_page, page) in l_pages.iter().enumerate() {
            let c_name_planned =
                create_page_sheet_name(&c_base_name, n_idx_page + 1, l_pages.len());
            if page.name != c_name_planned {
                let c_msg = format!(
                    "Sheet name {c_name_planned:?} deduplicated to {:?}.",
                    page.name
                );
                warn!("{c_msg}");
                l_warnings.push(c_msg);
            }
        }

        let mut l_sheets = Vec::with_capacity(l_page_sheets.len() + 1);
        if if_index && should_create_index(&l_pages, &options.pagination) {
            l_sheets.push(build_index_sheet(C_INDEX_SHEET_NAME, &l_pages, options)?);
        }
        l_sheets.extend(l_page_sheets);

        Ok(SpecWorkbookPlan {
            sheets: l_sheets,
            pages: l_pages,
            warnings: l_warnings,
        })
    }

    /// Build and serialize the workbook.
    pub fn render(
        &self,
        config: &SpecExportConfig,
    ) -> Result<(Vec<u8>, SpecXlsxReport), XlsxExportError> {
        let options = config.resolve()?;
        let plan = self.plan_with_options(config, &options)?;
        let bytes = save_workbook_to_buffer(&plan.sheets)?;

        let report = SpecXlsxReport {
            file_name: self.file_name(&options),
            sheet_names: plan.sheet_names(),
            pages: plan.pages,
            byte_len: bytes.len(),
            warnings: plan.warnings,
        };
        Ok((bytes, report))
    }

    /// Build, serialize and hand the workbook to `sink`. Nothing is delivered
    /// unless serialization succeeded.
    pub fn export<S: ExportSink + ?Sized>(
        &self,
        config: &SpecExportConfig,
        sink: &mut S,
    ) -> Result<SpecXlsxReport, XlsxExportError> {
        let (bytes, report) = self.render(config)?;
        sink.deliver(&report.file_name, C_MIME_XLSX, bytes)?;

        info!(
            file_name = report.file_name.as_str(),
            n_sheets = report.sheet_names.len(),
            n_pages = report.pages.len(),
            n_bytes = report.byte_len,
            "xlsx export delivered"
        );
        Ok(report)
    }
}

/// Export with today's date substituted into the file name.
pub fn export_xlsx<S: ExportSink + ?Sized>(
    config: &SpecExportConfig,
    sink: &mut S,
) -> Result<SpecXlsxReport, XlsxExportError> {
    XlsxExporter::new().export(config, sink)
}

/// Compose one data sheet: title/subtitle, statistics, table, then charts
/// three rows below the table.
pub fn compose_data_sheet(
    name: &str,
    columns: &[SpecColumn],
    records: &[DataRecord],
    options: &SpecExportOptions,
    sections: SpecSheetSections,
) -> Result<SheetModel, XlsxExportError> {
    let mut sheet = SheetModel::new(name);

    let if_statistics = options.include_statistics
        && sections.with_statistics
        && !options.statistics.is_empty();
    let mut n_row_cursor = render_title(&mut sheet, options, columns.len(), if_statistics)?;
    n_row_cursor = render_statistics(
        &mut sheet,
        &options.statistics,
        n_row_cursor,
        if_statistics,
    )?;

    render_table(&mut sheet, columns, records, n_row_cursor, options)?;

    if options.include_charts && sections.with_charts && !options.charts.is_empty() {
        let n_row_chart = n_row_cursor + records.len() + 1 + N_CHART_TABLE_GAP;
        render_charts(&mut sheet, &options.charts, n_row_chart)?;
    }

    Ok(sheet)
}

/// Title and subtitle rows; returns the next free row.
///
/// One spacer row follows them unless a statistics panel comes next, since the
/// panel carries its own trailing spacer.
fn render_title(
    sheet: &mut SheetModel,
    options: &SpecExportOptions,
    n_columns: usize,
    if_panel_follows: bool,
) -> Result<usize, XlsxExportError> {
    let n_col_end = n_columns.max(1) - 1;
    let mut n_row = 0;

    if let Some(title) = &options.title {
        sheet.merge_range(
            SpecCellRange {
                row_start: n_row,
                col_start: 0,
                row_end: n_row,
                col_end: n_col_end,
            },
            EnumCellValue::String(title.clone()),
            derive_title_format(),
        )?;
        sheet.set_row_height(n_row, 28.0);
        n_row += 1;
    }
    if let Some(subtitle) = &options.subtitle {
        sheet.merge_range(
            SpecCellRange {
                row_start: n_row,
                col_start: 0,
                row_end: n_row,
                col_end: n_col_end,
            },
            EnumCellValue::String(subtitle.clone()),
            derive_subtitle_format(),
        )?;
        n_row += 1;
    }
    if n_row > 0 && !if_panel_follows {
        n_row += 1;
    }
    Ok(n_row)
}

/// Materialize sheets in the given order and serialize the workbook.
pub fn save_workbook_to_buffer(sheets: &[SheetModel]) -> Result<Vec<u8>, XlsxExportError> {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        sheet.materialize(worksheet)?;
    }
    Ok(workbook.save_to_buffer()?)
}
