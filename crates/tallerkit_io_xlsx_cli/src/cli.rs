//! CLI argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Workshop report exporter
#[derive(Parser, Debug)]
#[command(name = "tallerkit-xlsx")]
#[command(about = "Export workshop data to formatted XLSX workbooks", long_about = None)]
#[command(version)]
pub struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a workbook from a JSON export request
    Export {
        /// JSON export request (`data`, `columns`, `fileName`, ...)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Arrow IPC file whose rows replace the request `data`
        #[arg(long, value_name = "FILE")]
        data_ipc: Option<PathBuf>,

        /// Directory receiving the workbook
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Override the request file name (`{date}` is still substituted)
        #[arg(long, value_name = "NAME")]
        file_name: Option<String>,
    },
}
