//! Pagination: split a large dataset into one worksheet per page.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::XlsxExportError;
use crate::sheet::SheetModel;
use crate::spec::{DataRecord, SpecColumn, SpecExportOptions, SpecPage, SpecPagination};
use crate::util::{create_page_sheet_name, derive_unique_sheet_name, plan_page_ranges};
use crate::writer::{SpecSheetSections, compose_data_sheet};

/// Pagination runs only when enabled and the records overflow one page.
pub fn is_pagination_active(n_records: usize, pagination: &SpecPagination) -> bool {
    pagination.enabled && n_records > pagination.rows_per_page
}

/// Plan one page per `rows_per_page` slice, registering unique names in `existing`.
pub fn plan_pages(
    base_name: &str,
    n_records: usize,
    rows_per_page: usize,
    existing: &mut BTreeSet<String>,
) -> Vec<SpecPage> {
    let l_ranges = plan_page_ranges(n_records, rows_per_page);
    let n_pages = l_ranges.len();

    l_ranges
        .into_iter()
        .enumerate()
        .map(|(n_idx_page, (n_start, n_end))| SpecPage {
            name: derive_unique_sheet_name(
                existing,
                &create_page_sheet_name(base_name, n_idx_page + 1, n_pages),
            ),
            start_row: n_start + 1,
            end_row: n_end,
        })
        .collect()
}

/// Render every page: the title on each, statistics on the first, charts on the last.
pub fn render_pages(
    base_name: &str,
    columns: &[SpecColumn],
    records: &[DataRecord],
    options: &SpecExportOptions,
    existing: &mut BTreeSet<String>,
) -> Result<(Vec<SheetModel>, Vec<SpecPage>), XlsxExportError> {
    let l_pages = plan_pages(
        base_name,
        records.len(),
        options.pagination.rows_per_page,
        existing,
    );

    let n_idx_last = l_pages.len().saturating_sub(1);
    let mut l_sheets = Vec::with_capacity(l_pages.len());
    for (n_idx_page, page) in l_pages.iter().enumerate() {
        let l_records_page = &records[page.start_row - 1..page.end_row];
        let sheet = compose_data_sheet(
            &page.name,
            columns,
            l_records_page,
            options,
            SpecSheetSections {
                with_statistics: n_idx_page == 0,
                with_charts: n_idx_page == n_idx_last,
            },
        )?;
        debug!(
            sheet = page.name.as_str(),
            start_row = page.start_row,
            end_row = page.end_row,
            "rendered page"
        );
        l_sheets.push(sheet);
    }

    Ok((l_sheets, l_pages))
}
