//! 写真の名前決定と保存
//!
//! 1. 既存ファイル名から最大番号を求め、次の番号から空きを探す
//! 2. 長いファイル名が拒否されたら短い形式へ切り替える
//! 3. 排他作成 → 書き込み → フラッシュ。フラッシュ成功で保存完了とする

use log::{debug, info, warn};
use sha2::{Digest, Sha256};

use super::photo_name::{NameForm, PhotoName};
use super::{NameStatus, PhotoStorage, StorageError};
use crate::core::error::CameraError;
use crate::core::jpeg::find_jpeg_range;

pub const DEFAULT_PROBE_LIMIT: u32 = 100_000;
pub const DEFAULT_WRITE_CHUNK_BYTES: usize = 32 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSettings {
    /// 空き番号探索の最大試行回数
    pub probe_limit: u32,
    /// 1 回の書き込み呼び出しの最大バイト数
    pub write_chunk_bytes: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            probe_limit: DEFAULT_PROBE_LIMIT,
            write_chunk_bytes: DEFAULT_WRITE_CHUNK_BYTES,
        }
    }
}

/// 保存結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPhoto {
    pub name: PhotoName,
    pub bytes_written: usize,
    /// JPEG データの SHA-256（16進）
    pub sha256: String,
}

pub struct PhotoStore<S: PhotoStorage> {
    storage: S,
    settings: StoreSettings,
}

impl<S: PhotoStorage> PhotoStore<S> {
    pub fn new(storage: S, settings: StoreSettings) -> Self {
        PhotoStore { storage, settings }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    /// バッファから JPEG を切り出して保存する
    ///
    /// マーカーが見つからない場合はファイルを作らない。
    pub fn extract_and_save(&mut self, buffer: &[u8]) -> Result<SavedPhoto, CameraError> {
        let range = find_jpeg_range(buffer)?;
        info!(
            "JPEG範囲を検出: {}..{} ({} バイト)",
            range.start,
            range.end,
            range.len()
        );
        self.save(&buffer[range])
    }

    pub fn save(&mut self, jpeg: &[u8]) -> Result<SavedPhoto, CameraError> {
        self.storage.ensure_mounted()?;
        let name = self.allocate_name()?;
        let (name, mut file) = self.create(name)?;

        let bytes_written = match self.write_all(&mut file, jpeg) {
            Ok(n) => n,
            Err(e) => {
                // 書き込み失敗でもハンドルは閉じる
                if let Err(close_err) = self.storage.flush_and_close(file) {
                    warn!("書き込み失敗後のクローズにも失敗しました: {}", close_err);
                }
                return Err(e);
            }
        };
        self.storage.flush_and_close(file)?;

        let sha256 = format!("{:x}", Sha256::digest(jpeg));
        info!(
            "写真を保存しました: {} ({} バイト, SHA256: {})",
            name, bytes_written, sha256
        );
        Ok(SavedPhoto {
            name,
            bytes_written,
            sha256,
        })
    }

    /// 次に使う写真名を決める
    pub fn allocate_name(&mut self) -> Result<PhotoName, CameraError> {
        let max_id = self
            .storage
            .list_names()?
            .iter()
            .filter_map(|name| PhotoName::parse(name))
            .map(|name| name.id())
            .max();
        let mut candidate = match max_id {
            Some(id) => PhotoName::new(id + 1, NameForm::Long),
            None => PhotoName::new(0, NameForm::Long),
        };
        debug!("既存の最大番号: {:?}, 探索開始: {}", max_id, candidate);

        let mut attempts = 0u32;
        let mut switched_to_short = false;
        while attempts < self.settings.probe_limit {
            let name = candidate.to_string();
            match self.storage.stat(&name)? {
                NameStatus::NotFound => return Ok(candidate),
                NameStatus::Exists => {
                    candidate = candidate.next();
                    attempts += 1;
                }
                NameStatus::InvalidName if !switched_to_short => {
                    warn!("長いファイル名が使えません。短い形式に切り替えます: {}", name);
                    candidate = candidate.with_form(NameForm::Short);
                    switched_to_short = true;
                    attempts = 0;
                }
                NameStatus::InvalidName => {
                    return Err(StorageError::InvalidName(name).into());
                }
            }
        }

        Err(CameraError::NoFreeName {
            attempts: self.settings.probe_limit,
        })
    }

    fn create(&mut self, name: PhotoName) -> Result<(PhotoName, S::File), CameraError> {
        match self.storage.create_exclusive(&name.to_string()) {
            Ok(file) => Ok((name, file)),
            Err(StorageError::AlreadyExists(existing)) => Err(CameraError::NameRace(existing)),
            Err(StorageError::InvalidName(_)) if name.form() == NameForm::Long => {
                let short = name.with_form(NameForm::Short);
                warn!("{} を作成できません。{} で再試行します", name, short);
                match self.storage.create_exclusive(&short.to_string()) {
                    Ok(file) => Ok((short, file)),
                    Err(StorageError::AlreadyExists(existing)) => {
                        Err(CameraError::NameRace(existing))
                    }
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// チャンク単位で書き込み、短い書き込みは残りを続けて書く
    fn write_all(&mut self, file: &mut S::File, data: &[u8]) -> Result<usize, CameraError> {
        let chunk_bytes = self.settings.write_chunk_bytes.max(1);
        let mut written = 0;
        while written < data.len() {
            let end = (written + chunk_bytes).min(data.len());
            let n = self.storage.write(file, &data[written..end])?;
            if n == 0 {
                return Err(StorageError::WriteStalled {
                    written,
                    expected: data.len(),
                }
                .into());
            }
            written += n;
        }
        Ok(written)
    }
}
