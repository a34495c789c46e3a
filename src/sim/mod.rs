//! シミュレーション用ハードウェア
//!
//! 実機なしでキャプチャパイプライン全体を動かすための実装。
//! すべて `Clone` で内部状態を共有するため、テストからは複製を手元に残して
//! 記録された操作を検証できる。

pub mod clock;
pub mod frames;
pub mod sensor_bus;
pub mod status;
pub mod storage;
pub mod video_port;

pub use clock::{SignalEvent, SimClock};
pub use frames::{rgb565_test_pattern, synthetic_capture, synthetic_jpeg};
pub use sensor_bus::{BusWrite, SimBusError, SimSensorBus};
pub use status::RecordingStatus;
pub use storage::{MemFile, MemStorage};
pub use video_port::{PortCall, SimVideoPort};

use std::sync::{Mutex, MutexGuard};

/// ポイズニングされていても中身を使う
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
