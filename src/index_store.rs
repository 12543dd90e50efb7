use std::path::{Path, PathBuf};

use bincode::Options;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::{
    corpus::{Corpus, Document},
    error::{Error, Result},
};

/// Encoded documents keyed by their position in the corpus.
const DOCUMENTS: TableDefinition<u64, &[u8]> =
    TableDefinition::new("documents");
const META: TableDefinition<&str, u64> = TableDefinition::new("meta");

const FORMAT_VERSION_KEY: &str = "format_version";
const DOCUMENT_COUNT_KEY: &str = "document_count";
const FORMAT_VERSION: u64 = 2;

/// Persists a [`Corpus`] as a single redb file.
///
/// Each document is stored as one bincode record in the `documents`
/// table, keyed by its position in the corpus.
#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write `corpus`, replacing any previous index at this path.
    ///
    /// The database is built next to the target and renamed into place
    /// once committed.
    ///
    /// # Examples
    ///
    /// ```
    /// # let tmp = tempfile::tempdir().unwrap();
    /// use docseek::{Corpus, IndexStore};
    ///
    /// let store = IndexStore::new(tmp.path().join("index.redb"));
    /// store.save(&Corpus::default()).unwrap();
    /// assert!(store.load().unwrap().is_empty());
    /// ```
    pub fn save(&self, corpus: &Corpus) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let tmp_path = self.tmp_path();
        if tmp_path.exists() {
            std::fs::remove_file(&tmp_path)?;
        }

        {
            let db = Database::create(&tmp_path)?;
            let txn = db.begin_write()?;
            {
                let mut documents = txn.open_table(DOCUMENTS)?;
                for (ordinal, document) in corpus.iter().enumerate() {
                    let bytes = encode_document(document)?;
                    documents.insert(ordinal as u64, bytes.as_slice())?;
                }

                let mut meta = txn.open_table(META)?;
                meta.insert(FORMAT_VERSION_KEY, FORMAT_VERSION)?;
                meta.insert(DOCUMENT_COUNT_KEY, corpus.len() as u64)?;
            }
            txn.commit()?;
        }

        std::fs::rename(&tmp_path, &self.path)?;
        tracing::info!(
            path = %self.path.display(),
            documents = corpus.len(),
            "saved index"
        );
        Ok(())
    }

    /// Read the corpus back. A missing or damaged file is an error.
    pub fn load(&self) -> Result<Corpus> {
        let db = Database::open(&self.path)?;
        let txn = db.begin_read()?;

        let meta = txn.open_table(META)?;
        let version = read_meta(&meta, FORMAT_VERSION_KEY)?;
        if version != FORMAT_VERSION {
            return Err(Error::CorruptIndex(format!(
                "unsupported format version {version}"
            )));
        }
        let expected = read_meta(&meta, DOCUMENT_COUNT_KEY)?;

        let table = txn.open_table(DOCUMENTS)?;
        let mut documents = Vec::new();
        for (position, entry) in table.iter()?.enumerate() {
            let (ordinal, bytes) = entry?;
            if ordinal.value() != position as u64 {
                return Err(Error::CorruptIndex(format!(
                    "document {position} stored under ordinal {}",
                    ordinal.value()
                )));
            }
            documents.push(decode_document(bytes.value())?);
        }

        if documents.len() as u64 != expected {
            return Err(Error::CorruptIndex(format!(
                "expected {expected} documents, found {}",
                documents.len()
            )));
        }

        tracing::debug!(
            path = %self.path.display(),
            documents = documents.len(),
            "loaded index"
        );
        Ok(Corpus::new(documents))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

fn read_meta(
    meta: &impl ReadableTable<&'static str, u64>,
    key: &str,
) -> Result<u64> {
    meta.get(key)?
        .map(|guard| guard.value())
        .ok_or_else(|| Error::CorruptIndex(format!("missing {key}")))
}

/// Record codec: fixed-width little-endian integers, no trailing bytes.
fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

fn encode_document(document: &Document) -> Result<Vec<u8>> {
    Ok(codec().serialize(document)?)
}

fn decode_document(bytes: &[u8]) -> Result<Document> {
    codec().deserialize(bytes).map_err(|e| {
        Error::CorruptIndex(format!("undecodable document record: {e}"))
    })
}
