//! Download sinks receiving the finished workbook bytes.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::XlsxExportError;

/// Receives a fully serialized workbook. Called at most once per export and
/// only after serialization succeeded.
pub trait ExportSink {
    fn deliver(
        &mut self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), XlsxExportError>;
}

/// Writes deliveries into a directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir_out: PathBuf,
    l_paths_delivered: Vec<PathBuf>,
}

impl FileSink {
    pub fn new(dir_out: impl Into<PathBuf>) -> Self {
        Self {
            dir_out: dir_out.into(),
            l_paths_delivered: Vec::new(),
        }
    }

    pub fn dir_out(&self) -> &Path {
        &self.dir_out
    }

    /// Paths written so far, in delivery order.
    pub fn delivered(&self) -> &[PathBuf] {
        &self.l_paths_delivered
    }
}

impl ExportSink for FileSink {
    fn deliver(
        &mut self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), XlsxExportError> {
        std::fs::create_dir_all(&self.dir_out)?;
        let path_file_out = self.dir_out.join(file_name);
        let path_file_tmp = self.dir_out.join(format!(".{file_name}.part"));

        std::fs::write(&path_file_tmp, &bytes)?;
        if let Err(err) = std::fs::rename(&path_file_tmp, &path_file_out) {
            let _ = std::fs::remove_file(&path_file_tmp);
            return Err(err.into());
        }

        debug!(
            path = %path_file_out.display(),
            mime_type,
            n_bytes = bytes.len(),
            "delivered workbook"
        );
        self.l_paths_delivered.push(path_file_out);
        Ok(())
    }
}

/// One delivery captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDelivery {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Keeps deliveries in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub deliveries: Vec<SpecDelivery>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExportSink for MemorySink {
    fn deliver(
        &mut self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), XlsxExportError> {
        self.deliveries.push(SpecDelivery {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            bytes,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_writes_into_created_directory() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let dir_out = tmp.path().join("descargas");
        let mut sink = FileSink::new(&dir_out);

        sink.deliver("a.xlsx", "application/x", vec![1, 2, 3])
            .expect("deliver");

        assert_eq!(sink.delivered(), &[dir_out.join("a.xlsx")]);
        assert_eq!(std::fs::read(dir_out.join("a.xlsx")).expect("read"), vec![1, 2, 3]);
        assert!(!dir_out.join(".a.xlsx.part").exists());
    }

    #[test]
    fn test_memory_sink_keeps_deliveries() {
        let mut sink = MemorySink::new();
        sink.deliver("a.xlsx", "m", vec![9]).expect("deliver");
        assert_eq!(sink.deliveries.len(), 1);
        assert_eq!(sink.deliveries[0].file_name, "a.xlsx");
        assert_eq!(sink.deliveries[0].mime_type, "m");
    }
}
