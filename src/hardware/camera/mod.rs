/// OV2640 センサー設定エンジン
pub mod ov2640;
/// レジスタアドレスと固定テーブル
pub mod ov2640_regs;
/// レジスタ書き込みシーケンス
pub mod ov2640_sequence;
/// SCCB レジスタバス
pub mod sccb;
pub mod types;

pub use ov2640::Ov2640;
pub use sccb::{RegisterBus, SccbBus};
pub use types::{
    Bank, ExposureRequest, FrameSize, Level, LightMode, PixelFormat, PreviewProfile,
    SensorState, SnapshotProfile,
};
