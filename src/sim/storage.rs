use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use super::lock;
use crate::storage::{fits_8_3, NameStatus, PhotoStorage, StorageError};

/// 書き込み中のファイル
#[derive(Debug)]
pub struct MemFile {
    name: String,
}

impl MemFile {
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug)]
struct MemInner {
    files: BTreeMap<String, Vec<u8>>,
    mounted: bool,
    reject_long_names: bool,
    /// stat では見えないが作成時に既に存在する名前
    racing: BTreeSet<String>,
    max_write_bytes: Option<usize>,
    write_calls: Vec<usize>,
    stall_writes: bool,
    closed: Vec<String>,
}

/// メモリ上のボリューム
#[derive(Debug, Clone)]
pub struct MemStorage {
    inner: Arc<Mutex<MemInner>>,
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStorage {
    pub fn new() -> Self {
        MemStorage {
            inner: Arc::new(Mutex::new(MemInner {
                files: BTreeMap::new(),
                mounted: true,
                reject_long_names: false,
                racing: BTreeSet::new(),
                max_write_bytes: None,
                write_calls: Vec::new(),
                stall_writes: false,
                closed: Vec::new(),
            })),
        }
    }

    pub fn insert(&self, name: &str, contents: &[u8]) {
        lock(&self.inner)
            .files
            .insert(name.to_string(), contents.to_vec());
    }

    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        lock(&self.inner).files.get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        lock(&self.inner).files.keys().cloned().collect()
    }

    pub fn set_mounted(&self, mounted: bool) {
        lock(&self.inner).mounted = mounted;
    }

    /// 8.3 形式以外の名前を拒否する (LFN 無効の FAT)
    pub fn set_reject_long_names(&self, reject: bool) {
        lock(&self.inner).reject_long_names = reject;
    }

    /// 存在確認の後、作成までの間に他者が作ったことにする
    pub fn add_racing_name(&self, name: &str) {
        lock(&self.inner).racing.insert(name.to_string());
    }

    /// 1 回の書き込みで受け付ける最大バイト数
    pub fn set_max_write_bytes(&self, max: Option<usize>) {
        lock(&self.inner).max_write_bytes = max;
    }

    pub fn set_stall_writes(&self, stall: bool) {
        lock(&self.inner).stall_writes = stall;
    }

    /// 各書き込み呼び出しで要求されたバイト数
    pub fn write_calls(&self) -> Vec<usize> {
        lock(&self.inner).write_calls.clone()
    }

    /// flush_and_close まで済んだファイル名
    pub fn closed(&self) -> Vec<String> {
        lock(&self.inner).closed.clone()
    }

    fn check_mounted(inner: &MemInner) -> Result<(), StorageError> {
        if inner.mounted {
            Ok(())
        } else {
            Err(StorageError::NotMounted("メモリボリューム".to_string()))
        }
    }
}

impl PhotoStorage for MemStorage {
    type File = MemFile;

    fn ensure_mounted(&mut self) -> Result<(), StorageError> {
        Self::check_mounted(&lock(&self.inner))
    }

    fn list_names(&mut self) -> Result<Vec<String>, StorageError> {
        let inner = lock(&self.inner);
        Self::check_mounted(&inner)?;
        Ok(inner.files.keys().cloned().collect())
    }

    fn stat(&mut self, name: &str) -> Result<NameStatus, StorageError> {
        let inner = lock(&self.inner);
        Self::check_mounted(&inner)?;
        if inner.reject_long_names && !fits_8_3(name) {
            return Ok(NameStatus::InvalidName);
        }
        if inner.files.contains_key(name) {
            Ok(NameStatus::Exists)
        } else {
            Ok(NameStatus::NotFound)
        }
    }

    fn create_exclusive(&mut self, name: &str) -> Result<MemFile, StorageError> {
        let mut inner = lock(&self.inner);
        Self::check_mounted(&inner)?;
        if inner.reject_long_names && !fits_8_3(name) {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        if inner.racing.contains(name) || inner.files.contains_key(name) {
            return Err(StorageError::AlreadyExists(name.to_string()));
        }
        inner.files.insert(name.to_string(), Vec::new());
        Ok(MemFile {
            name: name.to_string(),
        })
    }

    fn write(&mut self, file: &mut MemFile, bytes: &[u8]) -> Result<usize, StorageError> {
        let mut inner = lock(&self.inner);
        inner.write_calls.push(bytes.len());
        if inner.stall_writes {
            return Ok(0);
        }
        let n = inner
            .max_write_bytes
            .map_or(bytes.len(), |max| bytes.len().min(max));
        inner
            .files
            .entry(file.name.clone())
            .or_default()
            .extend_from_slice(&bytes[..n]);
        Ok(n)
    }

    fn flush_and_close(&mut self, file: MemFile) -> Result<(), StorageError> {
        lock(&self.inner).closed.push(file.name);
        Ok(())
    }
}
