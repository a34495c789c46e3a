//! 写真保存先の抽象
//!
//! ファイルシステム本体は外部要素として扱い、このクレートは
//! 列挙・存在確認・排他作成・書き込み・フラッシュのみを要求する。

pub mod dir;
pub mod photo_name;
pub mod photo_store;

pub use dir::DirStorage;
pub use photo_name::{NameForm, PhotoName};
pub use photo_store::{PhotoStore, SavedPhoto, StoreSettings};

/// 名前の存在確認結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStatus {
    Exists,
    NotFound,
    /// ボリュームがその名前を構造的に受け付けない（8.3 形式のみ等）
    InvalidName,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("ストレージがマウントされていません: {0}")]
    NotMounted(String),

    #[error("ファイルが既に存在します: {0}")]
    AlreadyExists(String),

    #[error("このボリュームでは使用できないファイル名です: {0}")]
    InvalidName(String),

    #[error("書き込みが進みません ({written}/{expected} バイト)")]
    WriteStalled { written: usize, expected: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// LCD 表示用
    pub fn status_text(&self) -> String {
        match self {
            StorageError::NotMounted(_) => "SD mount failed".to_string(),
            StorageError::AlreadyExists(_) => "File exists".to_string(),
            StorageError::InvalidName(_) => "Bad filename".to_string(),
            StorageError::WriteStalled { .. } => "Write error".to_string(),
            StorageError::Io(e) => format!("SD error: {}", e.kind()),
        }
    }
}

pub trait PhotoStorage {
    type File;

    fn ensure_mounted(&mut self) -> Result<(), StorageError>;

    /// ルートディレクトリのエントリ名
    fn list_names(&mut self) -> Result<Vec<String>, StorageError>;

    fn stat(&mut self, name: &str) -> Result<NameStatus, StorageError>;

    /// 既存ファイルがある場合は `AlreadyExists` で失敗する（上書きしない）
    fn create_exclusive(&mut self, name: &str) -> Result<Self::File, StorageError>;

    /// 書き込めたバイト数を返す（要求より少ないこともある）
    fn write(&mut self, file: &mut Self::File, bytes: &[u8]) -> Result<usize, StorageError>;

    fn flush_and_close(&mut self, file: Self::File) -> Result<(), StorageError>;
}

/// 8.3 形式に収まる名前か
pub fn fits_8_3(name: &str) -> bool {
    let mut parts = name.split('.');
    let stem = parts.next().unwrap_or("");
    let ext = parts.next().unwrap_or("");
    parts.next().is_none() && !stem.is_empty() && stem.len() <= 8 && ext.len() <= 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names_fit_8_3() {
        assert!(fits_8_3("P00005.JPG"));
        assert!(fits_8_3("README"));
        assert!(!fits_8_3("PHOTO_00005.jpeg"));
        assert!(!fits_8_3("A.B.C"));
        assert!(!fits_8_3(".hidden"));
    }
}
