//! tallerkit-xlsx: command-line front end for the XLSX exporter.

mod cli;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tallerkit_io_xlsx::frame::derive_dataframe_from_ipc_bytes;
use tallerkit_io_xlsx::{
    FileSink, SpecExportConfig, SpecXlsxReport, XlsxExporter, derive_columns_from_dataframe,
    derive_records_from_dataframe,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};

const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Command::Export {
            config,
            data_ipc,
            out_dir,
            file_name,
        } => run_export(&config, data_ipc.as_deref(), &out_dir, file_name),
    };

    match result {
        Ok((path_file_out, report)) => {
            for c_warning in &report.warnings {
                warn!("{c_warning}");
            }
            println!(
                "{} ({} sheets, {} bytes)",
                path_file_out.display(),
                report.sheet_names.len(),
                report.byte_len
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("tallerkit-xlsx: error: {err:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tallerkit=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tallerkit=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_export(
    path_config: &Path,
    path_data_ipc: Option<&Path>,
    dir_out: &Path,
    file_name: Option<String>,
) -> Result<(PathBuf, SpecXlsxReport)> {
    let file_config = fs::File::open(path_config)
        .with_context(|| format!("Failed to open config {}", path_config.display()))?;
    let mut config = SpecExportConfig::from_json_reader(std::io::BufReader::new(file_config))
        .with_context(|| format!("Failed to parse config {}", path_config.display()))?;

    if let Some(path_data_ipc) = path_data_ipc {
        let v_ipc = fs::read(path_data_ipc)
            .with_context(|| format!("Failed to read {}", path_data_ipc.display()))?;
        let df = derive_dataframe_from_ipc_bytes(&v_ipc)?;
        config.data = derive_records_from_dataframe(&df)?;
        if config.columns.is_empty() {
            config.columns = derive_columns_from_dataframe(&df);
        }
        debug!(n_records = config.data.len(), "loaded IPC data");
    }
    if let Some(file_name) = file_name {
        config.file_name = file_name;
    }

    let mut sink = FileSink::new(dir_out);
    let report = XlsxExporter::new().export(&config, &mut sink)?;
    Ok((dir_out.join(&report.file_name), report))
}
