use std::io::{Cursor, Read};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tallerkit_io_xlsx::{
    C_MIME_XLSX, DataRecord, EnumCellValue, FileSink, MemorySink, SpecColumn, SpecExportConfig,
    XlsxExporter,
};
use tempfile::tempdir;

fn exporter() -> XlsxExporter {
    XlsxExporter::with_export_date(NaiveDate::from_ymd_opt(2025, 3, 5).expect("date"))
}

fn vehicles(n: usize) -> Vec<DataRecord> {
    (0..n)
        .map(|n_idx| {
            let mut record = DataRecord::new();
            record.insert("placa".to_string(), format!("PLC-{n_idx:04}").into());
            record.insert("km".to_string(), EnumCellValue::Number(1000.0 + n_idx as f64));
            record.insert("activo".to_string(), EnumCellValue::Boolean(n_idx % 2 == 0));
            record.insert("ingreso".to_string(), "2025-03-05T14:30:00".into());
            record
        })
        .collect()
}

fn columns() -> Vec<SpecColumn> {
    vec![
        SpecColumn::new("Placa", "placa"),
        SpecColumn {
            num_fmt: Some("#,##0".to_string()),
            ..SpecColumn::new("Kilometraje", "km")
        },
        SpecColumn::new("Activo", "activo"),
        SpecColumn {
            is_date: true,
            ..SpecColumn::new("Ingreso", "ingreso")
        },
    ]
}

fn read_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("zip archive");
    let mut file = archive.by_name(name).expect("zip entry");
    let mut content = String::new();
    file.read_to_string(&mut content).expect("read entry");
    content
}

fn sheet_names_in_order(workbook_xml: &str) -> Vec<String> {
    workbook_xml
        .split("<sheet ")
        .skip(1)
        .filter_map(|chunk| {
            let rest = chunk.split("name=\"").nth(1)?;
            Some(rest.split('"').next()?.to_string())
        })
        .collect()
}

#[test]
fn exports_single_sheet_workbook() {
    let config = SpecExportConfig {
        title: Some("Vehículos".to_string()),
        subtitle: Some("Generado el 05/03/2025".to_string()),
        ..SpecExportConfig::new(vehicles(10), columns(), "vehiculos_{date}")
    };
    let mut sink = MemorySink::new();
    let report = exporter().export(&config, &mut sink).expect("export");

    assert_eq!(report.file_name, "vehiculos_2025-03-05.xlsx");
    assert_eq!(report.sheet_names, vec!["Hoja1".to_string()]);
    assert!(!report.has_index());

    let bytes = &sink.deliveries[0].bytes;
    assert_eq!(sink.deliveries[0].mime_type, C_MIME_XLSX);
    assert_eq!(
        sheet_names_in_order(&read_entry(bytes, "xl/workbook.xml")),
        vec!["Hoja1".to_string()]
    );

    let sheet_xml = read_entry(bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet_xml.contains("<mergeCell ref=\"A1:D1\"/>"));
    assert!(sheet_xml.contains("<autoFilter ref=\"A4:D14\"/>"));
    assert!(sheet_xml.contains("state=\"frozen\""));
    assert!(sheet_xml.contains("t=\"b\""));

    let shared = read_entry(bytes, "xl/sharedStrings.xml");
    assert!(shared.contains("Vehículos"));
    assert!(shared.contains("PLC-0009"));
    assert!(shared.contains("05/03/2025"));
}

#[test]
fn exports_paginated_workbook_with_index_first() {
    let config = SpecExportConfig {
        pagination: Some(tallerkit_io_xlsx::spec::SpecPaginationConfig {
            enabled: Some(true),
            rows_per_page: Some(100),
            create_index: Some(true),
        }),
        ..SpecExportConfig::new(vehicles(250), columns(), "citas")
    };
    let (bytes, report) = exporter().render(&config).expect("render");

    let l_expected = vec![
        "Índice".to_string(),
        "Hoja1 - Pág 1 de 3".to_string(),
        "Hoja1 - Pág 2 de 3".to_string(),
        "Hoja1 - Pág 3 de 3".to_string(),
    ];
    assert_eq!(report.sheet_names, l_expected);
    assert_eq!(
        report.pages.iter().map(|p| p.row_count()).collect::<Vec<_>>(),
        vec![100, 100, 50]
    );
    assert_eq!(report.byte_len, bytes.len());
    assert_eq!(
        sheet_names_in_order(&read_entry(&bytes, "xl/workbook.xml")),
        l_expected
    );

    let index_xml = read_entry(&bytes, "xl/worksheets/sheet1.xml");
    assert_eq!(index_xml.matches("<hyperlink ").count(), 3);

    let last_page_xml = read_entry(&bytes, "xl/worksheets/sheet4.xml");
    assert!(last_page_xml.contains("<autoFilter ref=\"A1:D51\"/>"));
}

#[test]
fn file_sink_receives_workbook() {
    let dir = tempdir().expect("temp dir");
    let mut sink = FileSink::new(dir.path());
    let config = SpecExportConfig::new(vehicles(3), columns(), "reportes/servicios");

    let report = exporter().export(&config, &mut sink).expect("export");

    assert_eq!(report.file_name, "reportes_servicios.xlsx");
    let path = dir.path().join("reportes_servicios.xlsx");
    assert_eq!(sink.delivered(), &[path.clone()]);
    let bytes = std::fs::read(&path).expect("read output");
    assert_eq!(bytes.len(), report.byte_len);
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn failed_export_delivers_nothing() {
    let dir = tempdir().expect("temp dir");
    let mut sink = FileSink::new(dir.path().join("out"));
    let config = SpecExportConfig::new(vehicles(3), vec![], "vacio");

    assert!(exporter().export(&config, &mut sink).is_err());
    assert!(sink.delivered().is_empty());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn exports_from_json_request() {
    let config = SpecExportConfig::from_json_str(
        r##"{
            "fileName": "servicios_{date}",
            "sheetName": "Servicios",
            "columns": [
                {"header": "Servicio", "key": "servicio", "width": 30},
                {"header": "Total", "key": "total", "numFmt": "#,##0.00", "alignment": "right"}
            ],
            "data": [
                {"servicio": "Cambio de aceite", "total": 45.5},
                {"servicio": "Frenos", "total": null}
            ],
            "includeCharts": true,
            "charts": [{"title": "Por servicio", "categories": ["Aceite", "Frenos"], "values": [3, 1], "type": "bar"}]
        }"##,
    )
    .expect("config");
    let (bytes, report) = exporter().render(&config).expect("render");

    assert_eq!(report.sheet_names, vec!["Servicios".to_string()]);
    let shared = read_entry(&bytes, "xl/sharedStrings.xml");
    assert!(shared.contains("Por servicio"));
    assert!(shared.contains("75.0%"));
}
