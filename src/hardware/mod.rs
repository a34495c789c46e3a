/// ハードウェア制御モジュール
pub mod button;
pub mod camera;
pub mod video;

pub use button::ShutterButton;
pub use camera::{Ov2640, RegisterBus, SccbBus};
pub use video::{CaptureBuffer, CaptureSignal, FrameAcquisition, ModeController, VideoPort};
