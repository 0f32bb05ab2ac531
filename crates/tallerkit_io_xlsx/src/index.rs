//! Navigation sheet listing every page of a paginated export.

use tracing::debug;

use crate::conf::{
    C_INDEX_LINK_TEXT, TUP_INDEX_COLUMN_WIDTHS, TUP_INDEX_HEADERS, derive_data_format,
    derive_subtitle_format, derive_title_format,
};
use crate::error::XlsxExportError;
use crate::sheet::{SheetModel, SpecCellRange, create_internal_link_target};
use crate::spec::{
    EnumCellValue, SpecCellFormat, SpecExportOptions, SpecPage, SpecPagination,
};
use crate::util::{derive_header_format, derive_row_fill};

const N_INDEX_HEADER_ROW: usize = 3;

/// An index exists only for exports split into at least two pages.
pub fn should_create_index(pages: &[SpecPage], pagination: &SpecPagination) -> bool {
    pagination.create_index && pages.len() >= 2
}

/// Build the index sheet: page number, sheet name, record count and a link per page.
pub fn build_index_sheet(
    name: &str,
    pages: &[SpecPage],
    options: &SpecExportOptions,
) -> Result<SheetModel, XlsxExportError> {
    let mut sheet = SheetModel::new(name);
    let n_col_last = TUP_INDEX_HEADERS.len() - 1;
    let n_records_total: usize = pages.iter().map(SpecPage::row_count).sum();

    let c_title = match &options.title {
        Some(title) => format!("{title} · Índice"),
        None => "Índice de páginas".to_string(),
    };
    sheet.merge_range(
        SpecCellRange {
            row_start: 0,
            col_start: 0,
            row_end: 0,
            col_end: n_col_last,
        },
        EnumCellValue::String(c_title),
        derive_title_format(),
    )?;
    sheet.merge_range(
        SpecCellRange {
            row_start: 1,
            col_start: 0,
            row_end: 1,
            col_end: n_col_last,
        },
        EnumCellValue::String(format!(
            "{} páginas · {n_records_total} registros",
            pages.len()
        )),
        derive_subtitle_format(),
    )?;

    let fmt_header = derive_header_format(&options.header_style);
    for (n_idx_col, c_header) in TUP_INDEX_HEADERS.iter().enumerate() {
        sheet.set_column_width(n_idx_col, TUP_INDEX_COLUMN_WIDTHS[n_idx_col]);
        sheet.write(
            N_INDEX_HEADER_ROW,
            n_idx_col,
            EnumCellValue::from(*c_header),
            fmt_header.clone(),
        );
    }
    sheet.set_row_height(N_INDEX_HEADER_ROW, options.header_height);

    for (n_idx_page, page) in pages.iter().enumerate() {
        let n_row = N_INDEX_HEADER_ROW + 1 + n_idx_page;
        let fmt_row = derive_data_format().with_(SpecCellFormat {
            bg_color: Some(derive_row_fill(n_idx_page, &options.row_style).to_string()),
            ..Default::default()
        });
        let fmt_number = fmt_row.with_(SpecCellFormat {
            align: Some("center".to_string()),
            ..Default::default()
        });

        sheet.set_row_height(n_row, options.row_height);
        sheet.write(
            n_row,
            0,
            EnumCellValue::Number((n_idx_page + 1) as f64),
            fmt_number.clone(),
        );
        sheet.write(n_row, 1, EnumCellValue::String(page.name.clone()), fmt_row.clone());
        sheet.write(
            n_row,
            2,
            EnumCellValue::Number(page.row_count() as f64),
            fmt_number.with_(SpecCellFormat {
                num_format: Some("#,##0".to_string()),
                ..Default::default()
            }),
        );
        sheet.write_link(
            n_row,
            3,
            create_internal_link_target(&page.name),
            C_INDEX_LINK_TEXT,
            fmt_row.with_(SpecCellFormat {
                font_color: Some("#2563EB".to_string()),
                underline: Some(true),
                ..Default::default()
            }),
        );
    }
    sheet.set_freeze_panes(N_INDEX_HEADER_ROW + 1, 0);

    debug!(sheet = name, n_pages = pages.len(), "rendered index sheet");
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::spec::{SpecColumn, SpecExportConfig};

    fn pages() -> Vec<SpecPage> {
        vec![
            SpecPage {
                name: "Hoja1 - Pág 1 de 2".to_string(),
                start_row: 1,
                end_row: 1000,
            },
            SpecPage {
                name: "Hoja1 - Pág 2 de 2".to_string(),
                start_row: 1001,
                end_row: 1200,
            },
        ]
    }

    #[test]
    fn test_should_create_index() {
        let mut pagination = SpecPagination {
            enabled: true,
            rows_per_page: 1000,
            create_index: true,
        };
        assert!(should_create_index(&pages(), &pagination));
        assert!(!should_create_index(&pages()[..1], &pagination));
        pagination.create_index = false;
        assert!(!should_create_index(&pages(), &pagination));
    }

    #[test]
    fn test_build_index_sheet_lists_pages_with_links() {
        let options = SpecExportConfig::new(vec![], vec![SpecColumn::new("A", "a")], "x")
            .resolve()
            .expect("resolve");
        let sheet = build_index_sheet("Índice", &pages(), &options).expect("index");

        assert_eq!(sheet.name(), "Índice");
        assert_eq!(
            sheet.cell_text(1, 0).as_deref(),
            Some("2 páginas · 1200 registros")
        );
        assert_eq!(sheet.cell_text(3, 0).as_deref(), Some("Página"));
        assert_eq!(sheet.cell_text(4, 0).as_deref(), Some("1"));
        assert_eq!(sheet.cell_text(4, 1).as_deref(), Some("Hoja1 - Pág 1 de 2"));
        assert_eq!(sheet.cell_text(4, 2).as_deref(), Some("1000"));
        assert_eq!(sheet.cell_text(5, 2).as_deref(), Some("200"));

        let link = sheet.link(5, 3).expect("link");
        assert_eq!(link.target, "#'Hoja1 - Pág 2 de 2'!A1");
        assert_eq!(link.text, "Ir a página →");
        assert_eq!(sheet.freeze_panes(), Some((4, 0)));
    }
}
