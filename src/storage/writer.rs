//! Append-only batch writer for `data/documents.dat`
//!
//! A batch is written with a single `write_all` followed by one fsync.
//! There are no in-place updates and no cross-batch transactions: a failed
//! batch is truncated away and earlier batches stay persisted.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::DocumentRecord;

/// Relative location of the documents file under the data directory
pub const DOCUMENTS_FILE: &str = "documents.dat";

/// Append-only storage writer.
#[derive(Debug)]
pub struct StorageWriter {
    storage_path: PathBuf,
    file: File,
    current_offset: u64,
}

impl StorageWriter {
    /// Opens or creates `<data_dir>/data/documents.dat`.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        let data_subdir = data_dir.join("data");
        let storage_path = data_subdir.join(DOCUMENTS_FILE);

        if !data_subdir.exists() {
            fs::create_dir_all(&data_subdir).map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to create data directory: {}", data_subdir.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&storage_path)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to open storage file: {}", storage_path.display()),
                    e,
                )
            })?;

        let current_offset = file
            .metadata()
            .map_err(|e| StorageError::io_error("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            storage_path,
            file,
            current_offset,
        })
    }

    /// Appends a batch of records and fsyncs once.
    ///
    /// Returns the offset at which the batch starts.
    ///
    /// # Errors
    ///
    /// Returns `EV_STORAGE_WRITE_FAILED` if the write or fsync fails. The
    /// file is first truncated back to `offset`, so none of the batch
    /// survives a reopen.
    pub fn append_batch(&mut self, records: &[DocumentRecord]) -> StorageResult<u64> {
        let offset = self.current_offset;
        if records.is_empty() {
            return Ok(offset);
        }

        let mut buffer = Vec::new();
        for record in records {
            buffer.extend_from_slice(&record.serialize());
        }

        let written = self
            .file
            .write_all(&buffer)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to append batch of {} documents", records.len()),
                    e,
                )
            })
            .and_then(|()| {
                self.file
                    .sync_all()
                    .map_err(|e| StorageError::write_failed("fsync failed after batch append", e))
            });

        if let Err(err) = written {
            self.rollback(offset)?;
            return Err(err);
        }

        self.current_offset += buffer.len() as u64;
        Ok(offset)
    }

    /// Truncates the file back to `offset` and syncs the new length.
    ///
    /// Goes through a fresh handle since the append handle may be the one
    /// that failed.
    fn rollback(&self, offset: u64) -> StorageResult<()> {
        let file = OpenOptions::new()
            .write(true)
            .open(&self.storage_path)
            .map_err(|e| StorageError::write_failed("Failed to reopen storage for rollback", e))?;

        file.set_len(offset)
            .and_then(|()| file.sync_all())
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to truncate partial batch at offset {}", offset),
                    e,
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageReader;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let writer = StorageWriter::open(temp_dir.path()).unwrap();
        assert!(writer.storage_path.exists());
        assert_eq!(writer.current_offset, 0);
    }

    #[test]
    fn test_append_advances_offset() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = StorageWriter::open(temp_dir.path()).unwrap();

        let batch = vec![
            DocumentRecord::new(json!({"vin": "A"})),
            DocumentRecord::new(json!({"vin": "B"})),
        ];
        let first = writer.append_batch(&batch).unwrap();
        let second = writer.append_batch(&batch[..1]).unwrap();

        assert_eq!(first, 0);
        assert!(second > first);
        assert_eq!(
            writer.current_offset,
            fs::metadata(&writer.storage_path).unwrap().len()
        );
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = StorageWriter::open(temp_dir.path()).unwrap();
        writer.append_batch(&[]).unwrap();
        assert_eq!(writer.current_offset, 0);
    }

    #[test]
    fn test_reopen_appends() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut writer = StorageWriter::open(temp_dir.path()).unwrap();
            writer
                .append_batch(&[DocumentRecord::new(json!({"vin": "A"}))])
                .unwrap();
        }
        let writer = StorageWriter::open(temp_dir.path()).unwrap();
        assert!(writer.current_offset > 0);
    }

    #[test]
    fn test_failed_batch_is_truncated_away() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = StorageWriter::open(temp_dir.path()).unwrap();
        writer
            .append_batch(&[DocumentRecord::new(json!({"vin": "A"}))])
            .unwrap();
        let good_len = writer.current_offset;

        // Half a frame left behind by an interrupted write
        let mut contents = fs::read(&writer.storage_path).unwrap();
        contents.extend_from_slice(&[0x2a, 0x00, 0x00, 0x00, b'{', b'"']);
        fs::write(&writer.storage_path, contents).unwrap();

        // A read-only handle makes the next append fail
        writer.file = File::open(&writer.storage_path).unwrap();
        let err = writer
            .append_batch(&[DocumentRecord::new(json!({"vin": "B"}))])
            .unwrap_err();
        assert!(!err.is_fatal());

        assert_eq!(writer.current_offset, good_len);
        assert_eq!(fs::metadata(&writer.storage_path).unwrap().len(), good_len);

        let mut reader = StorageReader::open(&writer.storage_path).unwrap();
        let records = reader.read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body["vin"], "A");
    }
}
