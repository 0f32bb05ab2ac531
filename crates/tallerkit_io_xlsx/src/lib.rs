//! `tallerkit_io_xlsx` v1:
//! XLSX report export for workshop data (vehicles, appointments, services).
//!
//! Sheets are composed into a neutral [`sheet::SheetModel`] first and only
//! materialized into a workbook once their final order is known.
//!
//! - `conf`       : Excel limits, layout constants and format presets
//! - `spec`       : export request, resolved options, cell values and report
//! - `error`      : export error type
//! - `util`       : pure helpers (dates, fills, sheet names, chart math)
//! - `sheet`      : neutral sheet model and workbook materialization
//! - `table`      : header and banded data rows
//! - `stats`      : statistics panel
//! - `chart`      : charts rendered as tables
//! - `pagination` : page planning and per-page sheets
//! - `index`      : navigation sheet for paginated exports
//! - `writer`     : export orchestrator
//! - `sink`       : delivery of the finished bytes
//! - `frame`      : polars DataFrame / IPC input
pub mod chart;
pub mod conf;
pub mod error;
pub mod frame;
pub mod index;
pub mod pagination;
pub mod sheet;
pub mod sink;
pub mod spec;
pub mod stats;
pub mod table;
pub mod util;
pub mod writer;

pub use conf::{C_MIME_XLSX, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};
pub use error::XlsxExportError;
pub use frame::{
    derive_columns_from_dataframe, derive_records_from_dataframe, derive_records_from_ipc_bytes,
};
pub use sheet::SheetModel;
pub use sink::{ExportSink, FileSink, MemorySink};
pub use spec::{
    DataRecord, EnumAlignment, EnumCellValue, EnumDateFormat, SpecCellFormat, SpecChartSeries,
    SpecColumn, SpecExportConfig, SpecExportOptions, SpecPage, SpecStatBox, SpecXlsxReport,
};
pub use util::{format_date, resolve_file_name, sanitize_sheet_name};
pub use writer::{SpecWorkbookPlan, XlsxExporter, export_xlsx};
