use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::debug;

use super::{fits_8_3, NameStatus, PhotoStorage, StorageError};

/// ディレクトリ直下に写真を保存する `std::fs` 実装
///
/// ESP-IDF の VFS 経由でマウントした SD カードや、ホスト上のディレクトリで使う。
#[derive(Debug, Clone)]
pub struct DirStorage {
    root: PathBuf,
    short_names_only: bool,
}

impl DirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirStorage {
            root: root.into(),
            short_names_only: false,
        }
    }

    /// 長いファイル名を使えない (LFN 無効の FAT) ボリュームとして扱う
    pub fn with_short_names_only(mut self, enabled: bool) -> Self {
        self.short_names_only = enabled;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        if self.short_names_only && !fits_8_3(name) {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

impl PhotoStorage for DirStorage {
    type File = File;

    fn ensure_mounted(&mut self) -> Result<(), StorageError> {
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StorageError::NotMounted(format!(
                "{} はディレクトリではありません",
                self.root.display()
            ))),
            Err(e) => Err(StorageError::NotMounted(format!(
                "{}: {}",
                self.root.display(),
                e
            ))),
        }
    }

    fn list_names(&mut self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn stat(&mut self, name: &str) -> Result<NameStatus, StorageError> {
        let path = match self.path_for(name) {
            Ok(path) => path,
            Err(StorageError::InvalidName(_)) => return Ok(NameStatus::InvalidName),
            Err(e) => return Err(e),
        };
        match fs::metadata(path) {
            Ok(_) => Ok(NameStatus::Exists),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(NameStatus::NotFound),
            Err(e) if e.kind() == ErrorKind::InvalidInput => Ok(NameStatus::InvalidName),
            Err(e) => Err(e.into()),
        }
    }

    fn create_exclusive(&mut self, name: &str) -> Result<File, StorageError> {
        let path = self.path_for(name)?;
        debug!("ファイル作成: {}", path.display());
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => StorageError::AlreadyExists(name.to_string()),
                ErrorKind::InvalidInput => StorageError::InvalidName(name.to_string()),
                _ => StorageError::Io(e),
            })
    }

    fn write(&mut self, file: &mut File, bytes: &[u8]) -> Result<usize, StorageError> {
        Ok(file.write(bytes)?)
    }

    fn flush_and_close(&mut self, mut file: File) -> Result<(), StorageError> {
        file.flush()?;
        file.sync_all()?;
        Ok(())
    }
}
