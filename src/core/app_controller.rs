use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use crate::core::error::CameraError;
use crate::core::status::StatusSink;
use crate::hardware::camera::RegisterBus;
use crate::hardware::video::{
    CameraMode, CaptureBuffer, ModeController, PreviewFrame, SignalWait, VideoPort,
};
use crate::storage::{PhotoStorage, PhotoStore, SavedPhoto};

/// プレビュー表示と JPEG 撮影・保存の制御フローをまとめるモジュール
pub struct CameraApp<B, D, P, W, S, T>
where
    B: RegisterBus,
    D: DelayNs,
    P: VideoPort,
    W: SignalWait,
    S: PhotoStorage,
    T: StatusSink,
{
    modes: ModeController<B, D, P, W>,
    store: PhotoStore<S>,
    status: T,
    snapshot_buffer: CaptureBuffer,
    revert_delay_ms: u32,
}

impl<B, D, P, W, S, T> CameraApp<B, D, P, W, S, T>
where
    B: RegisterBus,
    D: DelayNs,
    P: VideoPort,
    W: SignalWait,
    S: PhotoStorage,
    T: StatusSink,
{
    pub fn new(
        modes: ModeController<B, D, P, W>,
        store: PhotoStore<S>,
        status: T,
        snapshot_buffer: CaptureBuffer,
        revert_delay_ms: u32,
    ) -> Self {
        CameraApp {
            modes,
            store,
            status,
            snapshot_buffer,
            revert_delay_ms,
        }
    }

    /// 起動処理: センサー確認 → プレビュー開始
    pub fn start(&mut self) -> Result<(), CameraError> {
        self.status.show_status("Camera init...");
        if let Err(e) = self.modes.sensor_mut().verify_id() {
            error!("カメラの確認に失敗しました: {}", e);
            self.status.show_status(&e.status_text());
            return Err(e);
        }

        if let Err(e) = self.modes.enter(CameraMode::Preview) {
            error!("プレビューを開始できませんでした: {}", e);
            self.status.show_status(&e.status_text());
            return Err(e);
        }
        self.status.show_status("Preview");
        info!("プレビューを開始しました");
        Ok(())
    }

    pub fn poll_preview(&mut self) -> Option<PreviewFrame<'_>> {
        self.modes.poll_preview()
    }

    /// JPEG を 1 枚撮影して保存し、結果にかかわらずプレビューへ戻す
    pub fn capture_jpeg(&mut self) -> Result<SavedPhoto, CameraError> {
        info!("JPEG撮影を開始します");
        let outcome = self.snapshot();

        match &outcome {
            Ok(photo) => {
                self.status.show_status(&format!("Saved {}", photo.name));
            }
            Err(e) => {
                error!("撮影に失敗しました: {}", e);
                self.status.show_status(&e.status_text());
            }
        }

        // 結果表示を保持してからプレビューへ戻る
        self.modes.settle(self.revert_delay_ms);
        let revert = self.modes.enter(CameraMode::Preview);
        if let Err(e) = &revert {
            warn!("プレビューへの復帰に失敗しました: {}", e);
            self.status.show_status("Preview restart failed");
        }

        let photo = outcome?;
        revert?;
        Ok(photo)
    }

    fn snapshot(&mut self) -> Result<SavedPhoto, CameraError> {
        self.status.show_status("Init camera...");
        self.modes.enter(CameraMode::Snapshot)?;

        self.status.show_status("Capturing...");
        self.modes.capture_snapshot(&mut self.snapshot_buffer)?;

        self.status.show_status("Saving...");
        self.store.extract_and_save(self.snapshot_buffer.as_slice())
    }

    pub fn mode(&self) -> Option<CameraMode> {
        self.modes.mode()
    }

    pub fn modes(&self) -> &ModeController<B, D, P, W> {
        &self.modes
    }

    pub fn modes_mut(&mut self) -> &mut ModeController<B, D, P, W> {
        &mut self.modes
    }

    pub fn store(&self) -> &PhotoStore<S> {
        &self.store
    }

    pub fn snapshot_buffer(&self) -> &CaptureBuffer {
        &self.snapshot_buffer
    }
}
