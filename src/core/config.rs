use crate::core::config_validation::{
    parse_brightness, parse_frame_size, parse_jpeg_quality, parse_photo_dir,
    parse_poll_interval_ms, parse_probe_limit, parse_snapshot_buffer_bytes, parse_timeout_ms,
    parse_write_chunk_bytes, ValidationError,
};
use crate::hardware::camera::{PreviewProfile, SnapshotProfile};
use crate::hardware::video::{AcquisitionTimeouts, ModeSettings};
use crate::storage::StoreSettings;

/// アプリケーション設定
///
/// この構造体はビルド時に`cfg.toml`ファイルから読み込まれた設定を保持します。
/// ファイルが無い場合は各フィールドのデフォルト値が使われます。
#[toml_cfg::toml_config]
pub struct Config {
    // カメラ設定
    #[default("QQVGA")]
    preview_frame_size: &'static str,

    #[default("UXGA")]
    snapshot_frame_size: &'static str,

    #[default(5)] // 2-60, 小さいほど高画質
    jpeg_quality: u8,

    #[default(-2)]
    snapshot_brightness: i8,

    #[default(false)]
    mirror: bool,

    #[default(false)]
    flip: bool,

    // フレーム取得タイムアウト
    #[default(1000)]
    start_timeout_ms: u32,

    #[default(3000)]
    completion_timeout_ms: u32,

    #[default(1)]
    poll_interval_ms: u32,

    #[default(204800)] // 200KB
    snapshot_buffer_bytes: u32,

    // 保存先
    #[default("/sdcard")]
    photo_dir: &'static str,

    #[default(false)]
    short_names_only: bool,

    #[default(100000)]
    name_probe_limit: u32,

    #[default(32768)]
    write_chunk_bytes: u32,

    // 撮影後にプレビューへ戻るまでの待機（ミリ秒）
    #[default(300)]
    revert_delay_ms: u32,

    #[default(false)]
    debug_mode: bool,
}

/// 設定エラー
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("不明なフレームサイズです: {0}")]
    UnknownFrameSize(String),
    #[error("OV2640 が対応していないフレームサイズです: {0}")]
    UnsupportedFrameSize(String),
    #[error("jpeg_quality の値が無効です (2-60): {0}")]
    InvalidJpegQuality(u8),
    #[error("snapshot_brightness の値が無効です (-2 - 2): {0}")]
    InvalidBrightness(i8),
    #[error("{0} は 1 以上を指定してください: {1}")]
    InvalidTimeout(&'static str, u32),
    #[error("poll_interval_ms の値が無効です (1 - start_timeout_ms): {0}")]
    InvalidPollInterval(u32),
    #[error("snapshot_buffer_bytes の値が無効です (16384 以上の 4 の倍数): {0}")]
    InvalidBufferSize(u32),
    #[error("name_probe_limit の値が無効です (1-100000): {0}")]
    InvalidProbeLimit(u32),
    #[error("write_chunk_bytes は 1 以上を指定してください: {0}")]
    InvalidChunkSize(u32),
    #[error("photo_dir が設定されていません。cfg.tomlを確認してください。")]
    MissingPhotoDir,
}

/// アプリケーション設定を表す構造体
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// プレビュー時のセンサー設定
    pub preview: PreviewProfile,

    /// スナップショット時のセンサー設定
    pub snapshot: SnapshotProfile,

    /// フレーム開始/完了待ちのタイムアウト
    pub timeouts: AcquisitionTimeouts,

    /// シグナル待ちのポーリング間隔（ミリ秒）
    pub poll_interval_ms: u32,

    /// スナップショット用バッファサイズ（バイト）
    pub snapshot_buffer_bytes: usize,

    /// 写真の保存先ディレクトリ
    pub photo_dir: String,

    /// 8.3 形式のファイル名しか使えないボリュームとして扱う
    pub short_names_only: bool,

    /// 空き番号探索の最大試行回数
    pub name_probe_limit: u32,

    /// 1 回の書き込み呼び出しの最大バイト数
    pub write_chunk_bytes: usize,

    /// 撮影後プレビューへ戻るまでの待機（ミリ秒）
    pub revert_delay_ms: u32,

    /// デバッグモード（詳細ログ）
    pub debug_mode: bool,
}

impl AppConfig {
    /// 設定ファイルから設定をロードします
    pub fn load() -> Result<Self, ConfigError> {
        // toml_cfg によって生成された定数
        Self::from_config(&CONFIG)
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mirror = config.mirror;
        let flip = config.flip;

        // カメラ設定
        let preview = PreviewProfile {
            frame_size: parse_frame_size(config.preview_frame_size).map_err(map_validation_error)?,
            mirror,
            flip,
        };
        let snapshot = SnapshotProfile {
            frame_size: parse_frame_size(config.snapshot_frame_size)
                .map_err(map_validation_error)?,
            quality: parse_jpeg_quality(config.jpeg_quality).map_err(map_validation_error)?,
            brightness: parse_brightness(config.snapshot_brightness)
                .map_err(map_validation_error)?,
            mirror,
            flip,
        };

        // フレーム取得設定
        let timeouts = AcquisitionTimeouts {
            start_ms: parse_timeout_ms("start_timeout_ms", config.start_timeout_ms)
                .map_err(map_validation_error)?,
            completion_ms: parse_timeout_ms("completion_timeout_ms", config.completion_timeout_ms)
                .map_err(map_validation_error)?,
        };
        let poll_interval_ms = parse_poll_interval_ms(config.poll_interval_ms, timeouts.start_ms)
            .map_err(map_validation_error)?;
        let snapshot_buffer_bytes = parse_snapshot_buffer_bytes(config.snapshot_buffer_bytes)
            .map_err(map_validation_error)?;

        // 保存設定
        let photo_dir = parse_photo_dir(config.photo_dir).map_err(map_validation_error)?;
        let name_probe_limit =
            parse_probe_limit(config.name_probe_limit).map_err(map_validation_error)?;
        let write_chunk_bytes =
            parse_write_chunk_bytes(config.write_chunk_bytes).map_err(map_validation_error)?;

        Ok(AppConfig {
            preview,
            snapshot,
            timeouts,
            poll_interval_ms,
            snapshot_buffer_bytes,
            photo_dir,
            short_names_only: config.short_names_only,
            name_probe_limit,
            write_chunk_bytes,
            revert_delay_ms: config.revert_delay_ms,
            debug_mode: config.debug_mode,
        })
    }

    pub fn mode_settings(&self) -> ModeSettings {
        ModeSettings {
            preview: self.preview,
            snapshot: self.snapshot,
            timeouts: self.timeouts,
            ..ModeSettings::default()
        }
    }

    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            probe_limit: self.name_probe_limit,
            write_chunk_bytes: self.write_chunk_bytes,
        }
    }
}

fn map_validation_error(err: ValidationError) -> ConfigError {
    match err {
        ValidationError::UnknownFrameSize(v) => ConfigError::UnknownFrameSize(v),
        ValidationError::UnsupportedFrameSize(v) => ConfigError::UnsupportedFrameSize(v),
        ValidationError::InvalidJpegQuality(v) => ConfigError::InvalidJpegQuality(v),
        ValidationError::InvalidBrightness(v) => ConfigError::InvalidBrightness(v),
        ValidationError::InvalidTimeout(name, v) => ConfigError::InvalidTimeout(name, v),
        ValidationError::InvalidPollInterval(v) => ConfigError::InvalidPollInterval(v),
        ValidationError::InvalidBufferSize(v) => ConfigError::InvalidBufferSize(v),
        ValidationError::InvalidProbeLimit(v) => ConfigError::InvalidProbeLimit(v),
        ValidationError::InvalidChunkSize(v) => ConfigError::InvalidChunkSize(v),
        ValidationError::MissingPhotoDir => ConfigError::MissingPhotoDir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::camera::FrameSize;

    #[test]
    fn defaults_produce_valid_config() {
        let config = AppConfig::from_config(&CONFIG).expect("default config");
        assert_eq!(config.preview.frame_size, FrameSize::Qqvga);
        assert_eq!(config.snapshot.frame_size, FrameSize::Uxga);
        assert_eq!(config.snapshot.quality, 5);
        assert_eq!(config.snapshot.brightness, -2);
        assert_eq!(config.timeouts.start_ms, 1000);
        assert_eq!(config.snapshot_buffer_bytes, 204_800);
    }

    #[test]
    fn invalid_quality_is_reported() {
        let config = Config {
            jpeg_quality: 90,
            ..CONFIG
        };
        assert!(matches!(
            AppConfig::from_config(&config),
            Err(ConfigError::InvalidJpegQuality(90))
        ));
    }

    #[test]
    fn disallowed_preview_size_is_reported() {
        let config = Config {
            preview_frame_size: "QCIF",
            ..CONFIG
        };
        assert!(matches!(
            AppConfig::from_config(&config),
            Err(ConfigError::UnsupportedFrameSize(_))
        ));
    }

    #[test]
    fn store_settings_follow_config() {
        let config = Config {
            write_chunk_bytes: 512,
            name_probe_limit: 10,
            ..CONFIG
        };
        let app = AppConfig::from_config(&config).unwrap();
        assert_eq!(
            app.store_settings(),
            StoreSettings {
                probe_limit: 10,
                write_chunk_bytes: 512
            }
        );
    }
}
