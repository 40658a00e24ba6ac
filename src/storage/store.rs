//! Vehicle store capability
//!
//! The store is a collection of JSON documents supporting bulk append,
//! conjunctive filtering, counting and secondary index creation. Results
//! are always returned in insertion order.
//!
//! Two implementations share one in-memory `Collection`:
//! - `MemoryStore`: nothing persisted
//! - `FileStore`: every batch is appended to `data/documents.dat` before it
//!   becomes visible; index declarations live in `metadata/indexes.json`

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::index::IndexManager;
use crate::vehicle::Vehicle;

use super::errors::{StorageError, StorageResult};
use super::predicate::{Predicate, PredicateFilter};
use super::reader::StorageReader;
use super::record::DocumentRecord;
use super::writer::{StorageWriter, DOCUMENTS_FILE};

/// Store capability consumed by the loader, query engine and checker.
pub trait VehicleStore {
    /// Appends one batch of documents. Returns the number appended.
    ///
    /// A batch is visible to readers only after it has been fully written.
    fn append_batch(&mut self, documents: &[Value]) -> StorageResult<usize>;

    /// Documents matching every predicate, in insertion order.
    fn find(&self, predicates: &[Predicate]) -> StorageResult<Vec<Value>>;

    /// Number of documents matching every predicate.
    fn count(&self, predicates: &[Predicate]) -> StorageResult<usize>;

    /// Creates secondary indexes on the named fields.
    ///
    /// Idempotent: existing indexes are kept as they are.
    fn create_indexes(&mut self, fields: &[&str]) -> StorageResult<()>;

    /// Appends canonical vehicle records as one batch.
    fn insert_vehicles(&mut self, batch: &[Vehicle]) -> StorageResult<usize> {
        let documents: Vec<Value> = batch.iter().map(Vehicle::to_document).collect();
        self.append_batch(&documents)
    }
}

/// In-memory document collection with its indexes
#[derive(Debug, Default)]
struct Collection {
    documents: Vec<Value>,
    indexes: IndexManager,
}

impl Collection {
    fn push(&mut self, document: Value) {
        let position = self.documents.len();
        self.indexes.apply_insert(&document, position);
        self.documents.push(document);
    }

    fn matching<'a>(&'a self, predicates: &'a [Predicate]) -> Box<dyn Iterator<Item = &'a Value> + 'a> {
        let candidates: Box<dyn Iterator<Item = &'a Value> + 'a> = match self.indexes.candidates(predicates) {
            Some(positions) => Box::new(
                positions
                    .into_iter()
                    .filter_map(move |p| self.documents.get(p)),
            ),
            None => Box::new(self.documents.iter()),
        };
        Box::new(candidates.filter(move |doc| PredicateFilter::matches(doc, predicates)))
    }

    fn find(&self, predicates: &[Predicate]) -> Vec<Value> {
        self.matching(predicates).cloned().collect()
    }

    fn count(&self, predicates: &[Predicate]) -> usize {
        self.matching(predicates).count()
    }

    fn create_indexes(&mut self, fields: &[&str]) {
        for field in fields {
            self.indexes.create(field, &self.documents);
        }
    }
}

/// Store that keeps documents in process memory only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collection: Collection,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.collection.documents.len()
    }

    /// Returns true if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.collection.documents.is_empty()
    }

    /// Indexed field names
    pub fn indexed_fields(&self) -> Vec<String> {
        self.collection.indexes.fields()
    }
}

impl VehicleStore for MemoryStore {
    fn append_batch(&mut self, documents: &[Value]) -> StorageResult<usize> {
        for document in documents {
            self.collection.push(document.clone());
        }
        Ok(documents.len())
    }

    fn find(&self, predicates: &[Predicate]) -> StorageResult<Vec<Value>> {
        Ok(self.collection.find(predicates))
    }

    fn count(&self, predicates: &[Predicate]) -> StorageResult<usize> {
        Ok(self.collection.count(predicates))
    }

    fn create_indexes(&mut self, fields: &[&str]) -> StorageResult<()> {
        self.collection.create_indexes(fields);
        Ok(())
    }
}

/// Relative location of the index declaration file
const INDEXES_FILE: &str = "indexes.json";

/// Store persisted as an append-only document file.
///
/// On open the whole file is scanned (checksums verified) and declared
/// indexes are rebuilt. Reads are served from memory.
#[derive(Debug)]
pub struct FileStore {
    data_dir: PathBuf,
    writer: StorageWriter,
    collection: Collection,
}

impl FileStore {
    /// Opens the store rooted at `data_dir`, creating files as needed.
    ///
    /// # Errors
    ///
    /// Returns `EV_DATA_CORRUPTION` if any stored frame fails verification.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        let documents_path = data_dir.join("data").join(DOCUMENTS_FILE);

        let mut collection = Collection::default();
        if documents_path.exists() {
            let mut reader = StorageReader::open_from_data_dir(data_dir)?;
            while let Some(record) = reader.read_next()? {
                collection.documents.push(record.body);
            }
        }

        let declared = Self::read_index_declarations(data_dir)?;
        let declared_refs: Vec<&str> = declared.iter().map(String::as_str).collect();
        collection.create_indexes(&declared_refs);

        let writer = StorageWriter::open(data_dir)?;

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            writer,
            collection,
        })
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.collection.documents.len()
    }

    /// Returns true if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.collection.documents.is_empty()
    }

    /// Indexed field names
    pub fn indexed_fields(&self) -> Vec<String> {
        self.collection.indexes.fields()
    }

    fn index_file(data_dir: &Path) -> PathBuf {
        data_dir.join("metadata").join(INDEXES_FILE)
    }

    fn read_index_declarations(data_dir: &Path) -> StorageResult<Vec<String>> {
        let path = Self::index_file(data_dir);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| StorageError::read_failed("Failed to read index declarations", e))?;
        serde_json::from_str(&content).map_err(|e| {
            StorageError::data_corruption(format!("Invalid index declarations: {}", e))
        })
    }

    fn write_index_declarations(&self) -> StorageResult<()> {
        let path = Self::index_file(&self.data_dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::io_error("Failed to create metadata directory", e)
            })?;
        }

        let content = serde_json::to_string(&self.collection.indexes.fields()).map_err(|e| {
            StorageError::write_failed_no_source(format!("Failed to encode index declarations: {}", e))
        })?;
        fs::write(&path, content)
            .map_err(|e| StorageError::write_failed("Failed to write index declarations", e))
    }
}

impl VehicleStore for FileStore {
    fn append_batch(&mut self, documents: &[Value]) -> StorageResult<usize> {
        let records: Vec<DocumentRecord> = documents.iter().cloned().map(DocumentRecord::new).collect();
        self.writer.append_batch(&records)?;

        for record in records {
            self.collection.push(record.body);
        }
        Ok(documents.len())
    }

    fn find(&self, predicates: &[Predicate]) -> StorageResult<Vec<Value>> {
        Ok(self.collection.find(predicates))
    }

    fn count(&self, predicates: &[Predicate]) -> StorageResult<usize> {
        Ok(self.collection.count(predicates))
    }

    fn create_indexes(&mut self, fields: &[&str]) -> StorageResult<()> {
        self.collection.create_indexes(fields);
        self.write_index_declarations()
    }
}
