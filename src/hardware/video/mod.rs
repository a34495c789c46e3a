/// フレーム取得プロトコル
pub mod acquisition;
pub mod buffer;
/// プレビュー/スナップショットのモード制御
pub mod mode;
/// DCMI + DMA ポートの抽象
pub mod port;
pub mod signal;
pub mod wait;

pub use acquisition::{AcquisitionTimeouts, FrameAcquisition};
pub use buffer::CaptureBuffer;
pub use mode::{CameraMode, ModeController, ModeSettings, PreviewFrame};
pub use port::{InterruptMask, PortError, TransferMode, VideoPort};
pub use signal::{CaptureSignal, DriverSignal, IsrSignal};
pub use wait::{PollingWait, SignalWait, WaitOutcome};
