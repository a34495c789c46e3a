//! プレビュー / スナップショットのモード制御
//!
//! モード切り替えのたびに実行中の DMA を止め、フレーム取得用の割り込みを
//! クリアして有効化し直す。DMA の転送方式の再初期化は実行中の転送を破壊するため、
//! ハードウェア JPEG 設定が目標モードと異なる場合（モード境界）だけ行う。

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use super::acquisition::{AcquisitionTimeouts, FrameAcquisition};
use super::buffer::CaptureBuffer;
use super::port::{InterruptMask, TransferMode, VideoPort};
use super::signal::DriverSignal;
use super::wait::SignalWait;
use crate::core::error::CameraError;
use crate::hardware::camera::{Ov2640, PreviewProfile, RegisterBus, SnapshotProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Preview,
    Snapshot,
}

impl CameraMode {
    pub fn transfer_mode(self) -> TransferMode {
        match self {
            CameraMode::Preview => TransferMode::Continuous,
            CameraMode::Snapshot => TransferMode::OneShot,
        }
    }

    pub fn uses_jpeg(self) -> bool {
        self == CameraMode::Snapshot
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSettings {
    pub preview: PreviewProfile,
    pub snapshot: SnapshotProfile,
    pub timeouts: AcquisitionTimeouts,
    /// DMA 停止後の待機
    pub stop_settle_ms: u32,
    /// プレビュー用センサー設定後の待機
    pub preview_settle_ms: u32,
    /// スナップショット用センサー設定後の待機
    pub snapshot_settle_ms: u32,
}

impl Default for ModeSettings {
    fn default() -> Self {
        ModeSettings {
            preview: PreviewProfile::default(),
            snapshot: SnapshotProfile::default(),
            timeouts: AcquisitionTimeouts::default(),
            stop_settle_ms: 10,
            preview_settle_ms: 80,
            snapshot_settle_ms: 50,
        }
    }
}

/// プレビューの 1 フレーム
#[derive(Debug)]
pub struct PreviewFrame<'a> {
    /// RGB565 画素データ
    pub data: &'a [u8],
    pub width: u16,
    pub height: u16,
    pub fps: u32,
    pub frame_count: u32,
}

pub struct ModeController<B, D, P, W>
where
    B: RegisterBus,
    D: DelayNs,
    P: VideoPort,
    W: SignalWait,
{
    sensor: Ov2640<B, D>,
    port: P,
    wait: W,
    signal: DriverSignal,
    acquisition: FrameAcquisition,
    preview_buffer: CaptureBuffer,
    settings: ModeSettings,
    mode: Option<CameraMode>,
    dma_mode: Option<TransferMode>,
}

impl<B, D, P, W> ModeController<B, D, P, W>
where
    B: RegisterBus,
    D: DelayNs,
    P: VideoPort,
    W: SignalWait,
{
    pub fn new(
        sensor: Ov2640<B, D>,
        port: P,
        wait: W,
        signal: DriverSignal,
        preview_buffer: CaptureBuffer,
        settings: ModeSettings,
    ) -> Result<Self, CameraError> {
        let needed = settings.preview.frame_size.rgb565_bytes();
        if preview_buffer.capacity() < needed {
            return Err(CameraError::InvalidParameter(format!(
                "プレビューバッファが不足しています: {} < {} バイト",
                preview_buffer.capacity(),
                needed
            )));
        }

        Ok(ModeController {
            sensor,
            port,
            wait,
            signal,
            acquisition: FrameAcquisition::new(settings.timeouts),
            preview_buffer,
            settings,
            mode: None,
            dma_mode: None,
        })
    }

    /// 現在のモード（初回切り替え前や切り替え失敗時は `None`）
    pub fn mode(&self) -> Option<CameraMode> {
        self.mode
    }

    pub fn enter(&mut self, target: CameraMode) -> Result<(), CameraError> {
        info!("モード切り替え: {:?} -> {:?}", self.mode, target);

        self.port.stop_transfer()?;
        self.wait.settle(self.settings.stop_settle_ms);
        self.port.clear_interrupts(InterruptMask::ALL);
        self.port.enable_interrupts(InterruptMask::ACQUISITION);

        // 切り替え中に失敗した場合はどちらのモードでもない
        self.mode = None;

        let transfer_mode = target.transfer_mode();
        if self.port.jpeg_enabled() != target.uses_jpeg() || self.dma_mode.is_none() {
            debug!("DMAを {:?} で再初期化します", transfer_mode);
            self.port.set_jpeg_enabled(target.uses_jpeg())?;
            self.port.reinit_dma(transfer_mode)?;
            self.dma_mode = Some(transfer_mode);
        }

        match target {
            CameraMode::Preview => {
                let profile = self.settings.preview;
                self.sensor.init_preview(&profile)?;
                self.wait.settle(self.settings.preview_settle_ms);
                self.acquisition.arm(
                    &mut self.port,
                    &self.signal,
                    &mut self.preview_buffer,
                    TransferMode::Continuous,
                )?;
            }
            CameraMode::Snapshot => {
                let profile = self.settings.snapshot;
                self.sensor.init_snapshot(&profile)?;
                self.wait.settle(self.settings.snapshot_settle_ms);
            }
        }

        self.mode = Some(target);
        Ok(())
    }

    /// スナップショットモードで 1 フレーム取得する
    pub fn capture_snapshot(&mut self, buffer: &mut CaptureBuffer) -> Result<(), CameraError> {
        if self.mode != Some(CameraMode::Snapshot) {
            return Err(CameraError::WrongMode {
                expected: CameraMode::Snapshot,
                current: self.mode,
            });
        }
        self.acquisition
            .capture(&mut self.port, &self.signal, &mut self.wait, buffer)
    }

    /// 新しいプレビューフレームがあれば返す
    pub fn poll_preview(&mut self) -> Option<PreviewFrame<'_>> {
        if self.mode != Some(CameraMode::Preview) || !self.signal.take_frame_complete() {
            return None;
        }

        self.port.invalidate_dcache(self.preview_buffer.as_slice());
        let (width, height) = self.settings.preview.frame_size.dimensions();
        let len = self.settings.preview.frame_size.rgb565_bytes();
        Some(PreviewFrame {
            data: &self.preview_buffer.as_slice()[..len],
            width,
            height,
            fps: self.signal.fps(),
            frame_count: self.signal.frame_count(),
        })
    }

    /// 条件なしの待機（撮影後の表示保持など）
    pub fn settle(&mut self, ms: u32) {
        self.wait.settle(ms);
    }

    pub fn sensor(&self) -> &Ov2640<B, D> {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut Ov2640<B, D> {
        &mut self.sensor
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn signal(&self) -> &DriverSignal {
        &self.signal
    }

    pub fn settings(&self) -> &ModeSettings {
        &self.settings
    }
}
