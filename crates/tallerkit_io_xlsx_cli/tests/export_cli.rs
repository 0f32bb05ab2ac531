use std::process::Command;

use tempfile::tempdir;

const C_CONFIG: &str = r##"{
    "fileName": "vehiculos",
    "title": "Vehículos",
    "columns": [
        {"header": "Placa", "key": "placa"},
        {"header": "Kilometraje", "key": "km", "numFmt": "#,##0"}
    ],
    "data": [
        {"placa": "ABC-123", "km": 15000},
        {"placa": "XYZ-987", "km": 230}
    ]
}"##;

#[test]
fn exports_workbook_to_out_dir() {
    let dir = tempdir().expect("temp dir");
    let config_path = dir.path().join("request.json");
    let out_dir = dir.path().join("out");
    std::fs::write(&config_path, C_CONFIG).expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_tallerkit-xlsx"))
        .args([
            "export",
            "--config",
            config_path.to_str().expect("config path"),
            "--out-dir",
            out_dir.to_str().expect("out dir"),
        ])
        .output()
        .expect("run CLI");

    assert!(output.status.success());
    let metadata = std::fs::metadata(out_dir.join("vehiculos.xlsx")).expect("output exists");
    assert!(metadata.len() > 0);
    assert!(String::from_utf8_lossy(&output.stdout).contains("vehiculos.xlsx"));
}

#[test]
fn file_name_override_is_applied() {
    let dir = tempdir().expect("temp dir");
    let config_path = dir.path().join("request.json");
    std::fs::write(&config_path, C_CONFIG).expect("write config");

    let status = Command::new(env!("CARGO_BIN_EXE_tallerkit-xlsx"))
        .args([
            "export",
            "-c",
            config_path.to_str().expect("config path"),
            "-o",
            dir.path().to_str().expect("out dir"),
            "--file-name",
            "flota.xlsx",
        ])
        .status()
        .expect("run CLI");

    assert!(status.success());
    assert!(dir.path().join("flota.xlsx").exists());
    assert!(!dir.path().join("vehiculos.xlsx").exists());
}

#[test]
fn invalid_request_exits_with_failure() {
    let dir = tempdir().expect("temp dir");
    let config_path = dir.path().join("request.json");
    std::fs::write(&config_path, r#"{"fileName": "x", "columns": []}"#).expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_tallerkit-xlsx"))
        .args([
            "export",
            "--config",
            config_path.to_str().expect("config path"),
            "--out-dir",
            dir.path().to_str().expect("out dir"),
        ])
        .output()
        .expect("run CLI");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("columns"));
    assert!(!dir.path().join("x.xlsx").exists());
}
