//! Read-only, path-addressed asset stores.
//!
//! Paths are relative and `/`-separated. Absolute paths and `..` components
//! never resolve and are reported as missing.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufReader, Cursor, Read, Seek},
    path::{Path, PathBuf},
};

use parking_lot::Mutex;
use zip::{ZipArchive, result::ZipError};

use crate::error::{AssetError, AssetResult};

/// A packaged bundle of read-only files.
pub trait AssetStore {
    /// Open `path` for reading. Fails with [`AssetError::Missing`] when absent.
    fn open(&self, path: &str) -> AssetResult<Box<dyn Read + '_>>;
}

/// Read a whole asset into memory. No partial result on failure.
pub fn read_bytes<S: AssetStore + ?Sized>(store: &S, path: &str) -> AssetResult<Vec<u8>> {
    let mut reader = store.open(path)?;
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| AssetError::io(path, e))?;
    log::debug!("Read asset {} ({} bytes)", path, bytes.len());
    Ok(bytes)
}

/// Read a whole asset as UTF-8 text.
pub fn read_text<S: AssetStore + ?Sized>(store: &S, path: &str) -> AssetResult<String> {
    let bytes = read_bytes(store, path)?;
    String::from_utf8(bytes)
        .map_err(|e| AssetError::io(path, io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn normalize_path(path: &str) -> Option<String> {
    if path.starts_with('/') || path.contains('\\') {
        return None;
    }
    let mut parts = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => continue,
            ".." => return None,
            p => parts.push(p),
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

fn resolve(path: &str) -> AssetResult<String> {
    normalize_path(path).ok_or_else(|| AssetError::Missing(path.to_owned()))
}

/// Assets laid out under a directory on disk.
#[derive(Clone, Debug)]
pub struct DirAssetStore {
    root: PathBuf,
}

impl DirAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetStore for DirAssetStore {
    fn open(&self, path: &str) -> AssetResult<Box<dyn Read + '_>> {
        let full = self.root.join(resolve(path)?);
        let file = match File::open(&full) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AssetError::Missing(path.to_owned()));
            }
            Err(e) => return Err(AssetError::io(path, e)),
        };
        // Directories open fine on unix but are not assets.
        let meta = file.metadata().map_err(|e| AssetError::io(path, e))?;
        if !meta.is_file() {
            return Err(AssetError::Missing(path.to_owned()));
        }
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Assets held in memory, keyed by normalized path.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetStore {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, bytes: impl Into<Vec<u8>>) {
        let key = normalize_path(path).unwrap_or_else(|| {
            log::warn!("Asset path '{}' can never be opened", path);
            path.to_owned()
        });
        self.files.insert(key, bytes.into());
    }

    pub fn with_file(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetStore for MemoryAssetStore {
    fn open(&self, path: &str) -> AssetResult<Box<dyn Read + '_>> {
        let key = resolve(path)?;
        self.files
            .get(&key)
            .map(|bytes| Box::new(bytes.as_slice()) as Box<dyn Read + '_>)
            .ok_or_else(|| AssetError::Missing(path.to_owned()))
    }
}

const MAX_PREALLOC: u64 = 16 * 1024 * 1024;

/// Assets packed in a zip bundle (APK-style), optionally under a root folder.
pub struct ZipAssetStore<R: Read + Seek = BufReader<File>> {
    archive: Mutex<ZipArchive<R>>,
    root: String,
}

impl ZipAssetStore<BufReader<File>> {
    pub fn open_file(path: impl AsRef<Path>) -> AssetResult<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                AssetError::Missing(name.clone())
            } else {
                AssetError::io(&name, e)
            }
        })?;
        Self::new_named(BufReader::new(file), &name)
    }
}

impl<R: Read + Seek> ZipAssetStore<R> {
    pub fn from_reader(reader: R) -> AssetResult<Self> {
        Self::new_named(reader, "zip archive")
    }

    fn new_named(reader: R, name: &str) -> AssetResult<Self> {
        let archive =
            ZipArchive::new(reader).map_err(|e| AssetError::io(name, io::Error::other(e)))?;
        log::debug!("Opened asset bundle {} ({} entries)", name, archive.len());
        Ok(Self {
            archive: Mutex::new(archive),
            root: String::new(),
        })
    }

    /// Resolve every path below `root` inside the archive, e.g. `assets`.
    pub fn with_root(mut self, root: &str) -> Self {
        self.root = normalize_path(root)
            .map(|r| r + "/")
            .unwrap_or_default();
        self
    }

    pub fn len(&self) -> usize {
        self.archive.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Read + Seek> AssetStore for ZipAssetStore<R> {
    fn open(&self, path: &str) -> AssetResult<Box<dyn Read + '_>> {
        let name = format!("{}{}", self.root, resolve(path)?);
        let mut archive = self.archive.lock();
        let mut entry = match archive.by_name(&name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Err(AssetError::Missing(path.to_owned())),
            Err(e) => return Err(AssetError::io(path, io::Error::other(e))),
        };
        // The declared size comes from the archive and is not trusted.
        let capacity = entry.size().min(MAX_PREALLOC) as usize;
        let mut bytes = Vec::with_capacity(capacity);
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| AssetError::io(path, e))?;
        Ok(Box::new(Cursor::new(bytes)))
    }
}
