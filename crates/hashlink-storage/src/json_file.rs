use async_trait::async_trait;
use hashlink_core::repository::{
    check_unique, InsertOutcome, Mapping, ReadRepository, Repository, Result, ShortCollision,
};
use hashlink_core::StorageError;
use parking_lot::RwLock;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Name of the table holding the mappings.
pub const DEFAULT_TABLE: &str = "_default";

/// JSON file implementation of the repository contract.
///
/// The file keeps the TinyDB document layout:
///
/// ```json
/// {
///     "_default": {
///         "1": {
///             "original_url": "https://example.com/a",
///             "short_url": "http://localhost:8000/2dce0a4"
///         }
///     }
/// }
/// ```
///
/// The file is re-read on every call, so hand edits made while the process
/// runs are picked up. Every mutation rewrites the whole document through a
/// uniquely named temporary sibling file that is synced and renamed into
/// place before the call returns. Other top-level tables are carried over untouched.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    lock: RwLock<()>,
}

impl JsonFileRepository {
    /// Opens the store at `path`, creating an empty document if the file
    /// does not exist yet.
    ///
    /// An existing file is parsed once up front so corruption is reported
    /// at startup instead of on the first request.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let repository = Self {
            path: path.as_ref().to_path_buf(),
            lock: RwLock::new(()),
        };

        if repository.path.exists() {
            let document = repository.load()?;
            info!(
                path = %repository.path.display(),
                records = document.records.len(),
                "opened json file store"
            );
        } else {
            if let Some(parent) = repository.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            repository.persist(&Document::default())?;
            info!(path = %repository.path.display(), "created empty json file store");
        }

        Ok(repository)
    }

    /// Location of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored mapping, in document id order.
    pub fn all(&self) -> Result<Vec<Mapping>> {
        let _guard = self.lock.read();
        let document = self.load()?;
        Ok(document.records.into_iter().map(|(_, record)| record).collect())
    }

    fn load(&self) -> Result<Document> {
        let content = fs::read_to_string(&self.path)?;
        Document::parse(&content)
    }

    fn persist(&self, document: &Document) -> Result<()> {
        let bytes = document.to_pretty_json()?;

        // one temporary file per rewrite, even across openers of the same path
        let mut tmp = NamedTempFile::new_in(parent_dir(&self.path))?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StorageError::from(e.error))?;
        sync_parent_dir(&self.path)?;

        debug!(
            path = %self.path.display(),
            records = document.records.len(),
            "persisted json file store"
        );
        Ok(())
    }
}

#[async_trait]
impl ReadRepository for JsonFileRepository {
    async fn find_by_original(&self, original_url: &str) -> Result<Option<Mapping>> {
        let _guard = self.lock.read();
        let document = self.load()?;
        Ok(document
            .records
            .into_iter()
            .map(|(_, record)| record)
            .find(|record| record.original_url == original_url))
    }

    async fn find_by_short(&self, short_url: &str) -> Result<Option<Mapping>> {
        let _guard = self.lock.read();
        let document = self.load()?;
        Ok(document
            .records
            .into_iter()
            .map(|(_, record)| record)
            .find(|record| record.short_url == short_url))
    }
}

#[async_trait]
impl Repository for JsonFileRepository {
    async fn insert(&self, mapping: Mapping) -> Result<()> {
        let _guard = self.lock.write();
        let mut document = self.load()?;
        document.push(mapping)?;
        self.persist(&document)
    }

    async fn insert_unique(
        &self,
        mapping: Mapping,
        collision: ShortCollision,
    ) -> Result<InsertOutcome> {
        let _guard = self.lock.write();
        let mut document = self.load()?;

        let outcome = check_unique(
            document.records.iter().map(|(_, record)| record),
            &mapping,
            collision,
        );
        if let InsertOutcome::Inserted { .. } = outcome {
            document.push(mapping)?;
            self.persist(&document)?;
        }
        Ok(outcome)
    }

    async fn remove_where(&self, identifier: &str) -> Result<usize> {
        let _guard = self.lock.write();
        let mut document = self.load()?;

        let before = document.records.len();
        document
            .records
            .retain(|(_, record)| !record.matches(identifier));
        let removed = before - document.records.len();

        if removed > 0 {
            self.persist(&document)?;
        }
        Ok(removed)
    }
}

/// In-memory form of the store file.
#[derive(Debug, Default)]
struct Document {
    /// `_default` records sorted by document id.
    records: Vec<(u64, Mapping)>,
    /// Every other top-level table, kept verbatim.
    other_tables: Map<String, Value>,
}

impl Document {
    fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut tables: Map<String, Value> = serde_json::from_str(content)
            .map_err(|e| StorageError::InvalidData(format!("store file is not a json object: {e}")))?;

        let mut records = match tables.remove(DEFAULT_TABLE) {
            None => Vec::new(),
            Some(Value::Object(table)) => table
                .into_iter()
                .map(|(id, record)| parse_record(&id, record))
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(StorageError::InvalidData(format!(
                    "table '{DEFAULT_TABLE}' must be an object, got {other}"
                )))
            }
        };
        records.sort_by_key(|(id, _)| *id);

        Ok(Self {
            records,
            other_tables: tables,
        })
    }

    fn next_id(&self) -> Result<u64> {
        match self.records.last() {
            None => Ok(1),
            Some((id, _)) => id.checked_add(1).ok_or_else(|| {
                StorageError::InvalidData(format!("document id {id} leaves no room for a new record"))
            }),
        }
    }

    fn push(&mut self, mapping: Mapping) -> Result<()> {
        let id = self.next_id()?;
        self.records.push((id, mapping));
        Ok(())
    }

    fn to_pretty_json(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(buffer)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + self.other_tables.len()))?;
        map.serialize_entry(DEFAULT_TABLE, &Table(&self.records))?;
        for (name, table) in &self.other_tables {
            map.serialize_entry(name, table)?;
        }
        map.end()
    }
}

/// Serializes records keyed by stringified id, in id order.
struct Table<'a>(&'a [(u64, Mapping)]);

impl Serialize for Table<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, record) in self.0 {
            map.serialize_entry(&id.to_string(), record)?;
        }
        map.end()
    }
}

fn parse_record(id: &str, record: Value) -> Result<(u64, Mapping)> {
    let id = id
        .parse::<u64>()
        .map_err(|e| StorageError::InvalidData(format!("invalid document id '{id}': {e}")))?;
    let record = serde_json::from_value::<Mapping>(record)
        .map_err(|e| StorageError::InvalidData(format!("invalid record {id}: {e}")))?;
    Ok((id, record))
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<()> {
    fs::File::open(parent_dir(path))?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<()> {
    Ok(())
}
