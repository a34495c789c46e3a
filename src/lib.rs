/*!
 * # OV2640 Snapshot Camera Library
 *
 * OV2640 センサーを DCMI + DMA で取り込み、RGB565 プレビューと
 * JPEG スナップショットを切り替えて SD カードへ保存するためのライブラリ
 *
 * ## モジュール構成
 * - `core`: 制御フロー、設定、エラー、JPEG 切り出し、ステータス表示
 * - `hardware`: センサー設定エンジン、フレーム取得、モード制御、シャッターボタン
 * - `storage`: 写真ファイル名の決定と保存
 * - `sim`: 実機なしで動かすためのシミュレーション実装
 */

// 公開モジュール
pub mod core;
pub mod hardware;
pub mod sim;
pub mod storage;

// 内部で使用する型をまとめてエクスポート
pub use crate::core::{AppConfig, CameraApp, CameraError, ConfigError, LogStatus, StatusSink};
pub use crate::hardware::camera::{FrameSize, PixelFormat};
pub use crate::hardware::video::{CameraMode, ModeSettings};
pub use crate::hardware::{
    CaptureBuffer, CaptureSignal, FrameAcquisition, ModeController, Ov2640, RegisterBus,
    SccbBus, ShutterButton, VideoPort,
};
pub use crate::storage::{DirStorage, PhotoStorage, PhotoStore, SavedPhoto, StorageError};

/// ライブラリのバージョン情報
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
