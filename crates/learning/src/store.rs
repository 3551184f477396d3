//! Key-value persistence for learned models.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::rls::VehicleModel;

const KEY_PREFIX: &str = "rsa.model.";

/// Storage key for a vehicle's model.
pub fn model_key(vehicle_id: &str) -> String {
    format!("{KEY_PREFIX}{vehicle_id}")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("model store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("model record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("model store lock was poisoned")]
    Poisoned,
}

/// Model persistence. Implementations must tolerate concurrent callers; the last write wins.
pub trait ModelStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<VehicleModel>, StoreError>;
    fn set(&self, key: &str, model: &VehicleModel) -> Result<(), StoreError>;
    /// Returns whether a record was removed.
    fn delete(&self, key: &str) -> Result<bool, StoreError>;
    /// Keys in ascending order.
    fn list(&self) -> Result<Vec<String>, StoreError>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    models: RwLock<BTreeMap<String, VehicleModel>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<VehicleModel>, StoreError> {
        let models = self.models.read().map_err(|_| StoreError::Poisoned)?;
        Ok(models.get(key).cloned())
    }

    fn set(&self, key: &str, model: &VehicleModel) -> Result<(), StoreError> {
        let mut models = self.models.write().map_err(|_| StoreError::Poisoned)?;
        models.insert(key.to_string(), model.clone());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut models = self.models.write().map_err(|_| StoreError::Poisoned)?;
        Ok(models.remove(key).is_some())
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let models = self.models.read().map_err(|_| StoreError::Poisoned)?;
        Ok(models.keys().cloned().collect())
    }
}

/// On-disk record: the model plus its key and write time.
#[derive(Debug, Serialize, Deserialize)]
struct StoredModel {
    key: String,
    /// RFC 3339 timestamp of the last write.
    updated_at: String,
    model: VehicleModel,
}

const RECORD_EXT: &str = "json";

/// File-name form of a key. Bytes outside `[A-Za-z0-9._-]` become `%XX`, so distinct keys
/// never share a file.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-' | b'_') {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

/// Inverse of [`encode_key`]; `None` for names it could not have produced.
fn decode_key(name: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(name.len());
    let mut rest = name.as_bytes();
    while let Some((&byte, tail)) = rest.split_first() {
        if byte == b'%' {
            let hex = std::str::from_utf8(tail.get(..2)?).ok()?;
            bytes.push(u8::from_str_radix(hex, 16).ok()?);
            rest = &tail[2..];
        } else {
            bytes.push(byte);
            rest = tail;
        }
    }
    String::from_utf8(bytes).ok()
}

/// One pretty-printed JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{RECORD_EXT}", encode_key(key)))
    }

    fn read_record(path: &Path) -> Result<StoredModel, StoreError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl ModelStore for JsonDirStore {
    fn get(&self, key: &str) -> Result<Option<VehicleModel>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(Self::read_record(&path)?.model))
    }

    fn set(&self, key: &str, model: &VehicleModel) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let record = StoredModel {
            key: key.to_string(),
            updated_at: Utc::now().to_rfc3339(),
            model: model.clone(),
        };
        // write-then-rename so readers never see a partial file
        let tmp = path.with_extension(format!("{RECORD_EXT}.tmp"));
        {
            let writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(writer, &record)?;
        }
        fs::rename(&tmp, &path)?;
        debug!(key, n = model.n, path = %path.display(), "stored learned model");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().map(|ext| ext != RECORD_EXT).unwrap_or(true) {
                continue;
            }
            match path.file_stem().and_then(|stem| stem.to_str()).and_then(decode_key) {
                Some(key) => keys.push(key),
                None => debug!(path = %path.display(), "skipping file that is not a model record"),
            }
        }
        keys.sort();
        Ok(keys)
    }
}
