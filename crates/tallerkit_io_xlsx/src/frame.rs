//! Polars input: turn DataFrames or Arrow IPC bytes into export records and columns.

use std::io::Cursor;

use polars::prelude::{AnyValue, DataFrame, IpcReader, SerReader};

use crate::error::XlsxExportError;
use crate::spec::{DataRecord, EnumAlignment, EnumCellValue, SpecColumn};

/// Read Arrow IPC file bytes produced by polars or pyarrow.
pub fn derive_dataframe_from_ipc_bytes(v_ipc_df: &[u8]) -> Result<DataFrame, XlsxExportError> {
    IpcReader::new(Cursor::new(v_ipc_df))
        .finish()
        .map_err(|err| XlsxExportError::Frame(format!("Failed to read IPC DataFrame bytes: {err}")))
}

/// One record per row, keyed by column name.
pub fn derive_records_from_dataframe(df: &DataFrame) -> Result<Vec<DataRecord>, XlsxExportError> {
    let l_cols = df.get_columns();
    let mut l_records = Vec::with_capacity(df.height());

    for n_idx_row in 0..df.height() {
        let mut record = DataRecord::new();
        for column in l_cols {
            let value = column.get(n_idx_row)?;
            record.insert(
                column.name().to_string(),
                derive_cell_value_from_any_value(value),
            );
        }
        l_records.push(record);
    }
    Ok(l_records)
}

pub fn derive_records_from_ipc_bytes(v_ipc_df: &[u8]) -> Result<Vec<DataRecord>, XlsxExportError> {
    derive_records_from_dataframe(&derive_dataframe_from_ipc_bytes(v_ipc_df)?)
}

/// Column definitions mirroring the frame schema. Integer columns get `#,##0`,
/// float columns `#,##0.00`, both right-aligned.
pub fn derive_columns_from_dataframe(df: &DataFrame) -> Vec<SpecColumn> {
    df.get_columns()
        .iter()
        .map(|column| {
            let c_name = column.name().to_string();
            let dtype = column.dtype();
            let num_fmt = if dtype.is_integer() {
                Some("#,##0".to_string())
            } else if dtype.is_float() {
                Some("#,##0.00".to_string())
            } else {
                None
            };
            SpecColumn {
                alignment: num_fmt.as_ref().map(|_| EnumAlignment::Right),
                num_fmt,
                ..SpecColumn::new(c_name.clone(), c_name)
            }
        })
        .collect()
}

fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        AnyValue::Null => EnumCellValue::None,
        AnyValue::String(val) => EnumCellValue::String(val.to_string()),
        AnyValue::StringOwned(val) => EnumCellValue::String(val.to_string()),
        AnyValue::Boolean(val) => EnumCellValue::Boolean(val),
        AnyValue::UInt8(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt16(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt32(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int8(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int16(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int128(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float64(val) => EnumCellValue::Number(val),
        _ => EnumCellValue::String(value.to_string()),
    }
}
