// # File Stores
//
// File-based implementations of DomainStore and StatusStore with atomic
// writes.
//
// ## Purpose
//
// Both resources are small, human-readable JSON documents that are rewritten
// in full on every mutation. The results file is also written by the
// detection job, so nothing is cached: every `get` reads the file.
//
// ## Crash Recovery
//
// - Atomic writes: Uses write-then-rename for atomicity
// - Corruption detection: Validates JSON on load
// - Automatic backup: Keeps `<file>.backup` of the previous version
// - Reads never write: a corrupt file is reported as unavailable and left
//   for the operator, who can restore it from the backup
//
// ## File Formats
//
// Domain list (`domains.json`):
//
// ```json
// {
//   "domains": ["a.com", "b.org"]
// }
// ```
//
// Detection results (`security_results.json`):
//
// ```json
// {
//   "a.com": {
//     "google_status": "purple",
//     "spamhaus_status": "purple",
//     "timestamp": "2025-01-09T12:00:00.000Z"
//   }
// }
// ```

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::Error;
use crate::domain::Domain;
use crate::status::StatusMap;
use crate::traits::{DomainStore, StatusStore};

/// Outcome of reading one JSON file
enum ReadFailure {
    /// File exists but could not be read
    Io(std::io::Error),
    /// File was read but is not valid for the expected format
    Corrupt(serde_json::Error),
}

/// A JSON document on disk with atomic replacement and a backup copy
#[derive(Debug)]
struct JsonFile {
    path: PathBuf,
    /// Serializes writers so they never share the temp file
    write_lock: Mutex<()>,
}

impl JsonFile {
    async fn new(path: PathBuf) -> Result<Self, Error> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !fs::try_exists(parent).await.unwrap_or(false)
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create state directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    async fn exists(&self) -> Result<bool, Error> {
        fs::try_exists(&self.path).await.map_err(|e| {
            Error::persistence(format!("Failed to stat {}: {}", self.path.display(), e))
        })
    }

    /// Load the document
    ///
    /// - Missing file → `Ok(None)`
    /// - Unreadable or corrupt file → `PersistenceUnavailable`
    ///
    /// Never touches the file on disk.
    async fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, Error> {
        match Self::read(&self.path).await {
            Ok(None) => {
                tracing::debug!("State file does not exist: {}", self.path.display());
                Ok(None)
            }
            Ok(Some(value)) => Ok(Some(value)),
            Err(ReadFailure::Io(e)) => Err(Error::persistence(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
            Err(ReadFailure::Corrupt(e)) => {
                tracing::error!(
                    "State file {} is corrupted: {}. Previous version is in {}.",
                    self.path.display(),
                    e,
                    self.backup_path().display()
                );
                Err(Error::persistence(format!(
                    "{} is corrupted: {}",
                    self.path.display(),
                    e
                )))
            }
        }
    }

    async fn read<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ReadFailure> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ReadFailure::Io(e)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(ReadFailure::Corrupt)
    }

    /// Write the document atomically, keeping the previous version as backup
    async fn store<T: Serialize>(&self, value: &T) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| Error::persistence(format!("Failed to serialize state: {}", e)))?;

        let _guard = self.write_lock.lock().await;

        // Write to temporary file first
        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::persistence(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::persistence(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.sync_all().await.map_err(|e| {
                Error::persistence(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        // Create backup of current file (if it exists)
        if fs::try_exists(&self.path).await.unwrap_or(false) {
            let backup_path = self.backup_path();
            if let Err(e) = fs::copy(&self.path, &backup_path).await {
                tracing::warn!("Failed to create backup of {}: {}", self.path.display(), e);
            }
        }

        // Atomic rename (temp -> actual)
        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::persistence(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("State written to file: {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling("tmp")
    }

    fn backup_path(&self) -> PathBuf {
        self.sibling("backup")
    }

    /// `<file>.<suffix>`; appended so `a.json` and `a.results` stay apart
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    }
}

/// Serializable domain list file format
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct DomainListFile {
    domains: Vec<Domain>,
}

/// File-based domain list store
///
/// # Example
///
/// ```rust,no_run
/// use domsec_core::state::FileDomainStore;
/// use domsec_core::traits::DomainStore;
/// use domsec_core::Domain;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileDomainStore::new("/var/lib/domsec/domains.json").await?;
///     store.put(&[Domain::parse("example.com")?]).await?;
///     assert_eq!(store.get().await?.len(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileDomainStore {
    file: JsonFile,
}

impl FileDomainStore {
    /// Open a domain list file, creating parent directories if needed
    ///
    /// The file itself is not created until the first `put`.
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Ok(Self {
            file: JsonFile::new(path.as_ref().to_path_buf()).await?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file.path
    }
}

#[async_trait]
impl DomainStore for FileDomainStore {
    async fn get(&self) -> Result<Vec<Domain>, Error> {
        Ok(self
            .file
            .load::<DomainListFile>()
            .await?
            .unwrap_or_default()
            .domains)
    }

    async fn put(&self, domains: &[Domain]) -> Result<(), Error> {
        let doc = DomainListFile {
            domains: domains.to_vec(),
        };
        self.file.store(&doc).await
    }

    async fn exists(&self) -> Result<bool, Error> {
        self.file.exists().await
    }
}

/// File-based detection results store
#[derive(Debug)]
pub struct FileStatusStore {
    file: JsonFile,
}

impl FileStatusStore {
    /// Open a results file, creating parent directories if needed
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Ok(Self {
            file: JsonFile::new(path.as_ref().to_path_buf()).await?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file.path
    }
}

#[async_trait]
impl StatusStore for FileStatusStore {
    async fn get(&self) -> Result<StatusMap, Error> {
        Ok(self.file.load::<StatusMap>().await?.unwrap_or_default())
    }

    async fn put(&self, statuses: &StatusMap) -> Result<(), Error> {
        self.file.store(statuses).await
    }
}
