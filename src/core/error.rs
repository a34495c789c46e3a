use crate::hardware::video::mode::CameraMode;
use crate::hardware::video::port::PortError;
use crate::storage::StorageError;

/// キャプチャパイプライン全体のエラー
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("無効なパラメータ: {0}")]
    InvalidParameter(String),

    #[error("SCCBバスエラー: {0}")]
    Bus(String),

    #[error("OV2640 ではないセンサーを検出しました (PID=0x{0:04X})")]
    UnknownSensor(u16),

    #[error("ビデオポートエラー: {0}")]
    Port(#[from] PortError),

    #[error("フレーム開始待ちがタイムアウトしました ({waited_ms}ms)")]
    StartTimeout { waited_ms: u32 },

    #[error("フレーム完了待ちがタイムアウトしました ({waited_ms}ms)")]
    CompletionTimeout { waited_ms: u32 },

    #[error("モード不一致: {expected:?} が必要ですが現在は {current:?} です")]
    WrongMode {
        expected: CameraMode,
        current: Option<CameraMode>,
    },

    #[error("JPEG開始マーカー (FF D8) が見つかりません")]
    NoStartMarker,

    #[error("JPEG終了マーカー (FF D9) が見つかりません (開始位置 {start})")]
    NoEndMarker { start: usize },

    #[error("JPEG範囲が不正です (start={start}, end={end})")]
    MalformedRange { start: usize, end: usize },

    #[error("空きファイル名が見つかりません ({attempts}回試行)")]
    NoFreeName { attempts: u32 },

    #[error("ファイル {0} は作成直前に他で作成されました")]
    NameRace(String),

    #[error("ストレージエラー: {0}")]
    Storage(#[from] StorageError),
}

impl CameraError {
    /// LCD 表示用の短いステータス文字列
    pub fn status_text(&self) -> String {
        match self {
            CameraError::InvalidParameter(_) => "Bad camera param".to_string(),
            CameraError::Bus(_) | CameraError::UnknownSensor(_) => "Camera bus error".to_string(),
            CameraError::Port(_) => "DCMI error".to_string(),
            CameraError::StartTimeout { .. } => "VSYNC timeout!".to_string(),
            CameraError::CompletionTimeout { .. } => "Frame timeout!".to_string(),
            CameraError::WrongMode { .. } => "Mode error".to_string(),
            CameraError::NoStartMarker => "JPEG SOI not found".to_string(),
            CameraError::NoEndMarker { .. } => "JPEG EOI not found".to_string(),
            CameraError::MalformedRange { .. } => "JPEG range error".to_string(),
            CameraError::NoFreeName { .. } => "No free filename".to_string(),
            CameraError::NameRace(name) => format!("Exists: {}", name),
            CameraError::Storage(e) => e.status_text(),
        }
    }

    pub(crate) fn bus<E: std::fmt::Debug>(err: E) -> Self {
        CameraError::Bus(format!("{:?}", err))
    }
}
