//! 1 回分の DMA フレーム取得
//!
//! 1. 開始準備: シグナルをクリアし、転送先のキャッシュを無効化して DMA を開始
//! 2. フレーム開始 (VSYNC) 待ち
//! 3. フレーム完了待ち
//! 4. 停止とフェンス: DMA を止め、キャッシュを再度無効化する
//!
//! どの段階で失敗しても、戻る前に転送は必ず停止している。

use log::{debug, error, info, warn};

use super::buffer::CaptureBuffer;
use super::port::{TransferMode, VideoPort};
use super::signal::DriverSignal;
use super::wait::{SignalWait, WaitOutcome};
use crate::core::error::CameraError;

pub const DEFAULT_START_TIMEOUT_MS: u32 = 1000;
pub const DEFAULT_COMPLETION_TIMEOUT_MS: u32 = 3000;

/// バッファ 64 バイトあたり 1ms を完了待ちの下限に加味する
const COMPLETION_BYTES_PER_MS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquisitionTimeouts {
    pub start_ms: u32,
    pub completion_ms: u32,
}

impl Default for AcquisitionTimeouts {
    fn default() -> Self {
        AcquisitionTimeouts {
            start_ms: DEFAULT_START_TIMEOUT_MS,
            completion_ms: DEFAULT_COMPLETION_TIMEOUT_MS,
        }
    }
}

impl AcquisitionTimeouts {
    /// バッファサイズに応じた完了待ち時間
    pub fn completion_for(&self, capacity: usize) -> u32 {
        let scaled = u32::try_from(capacity / COMPLETION_BYTES_PER_MS).unwrap_or(u32::MAX);
        self.completion_ms.max(scaled)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameAcquisition {
    timeouts: AcquisitionTimeouts,
}

impl FrameAcquisition {
    pub fn new(timeouts: AcquisitionTimeouts) -> Self {
        FrameAcquisition { timeouts }
    }

    pub fn timeouts(&self) -> AcquisitionTimeouts {
        self.timeouts
    }

    /// 転送を開始する
    ///
    /// 単発転送では前回の撮影データを再保存しないようバッファをゼロ埋めする。
    pub fn arm<P: VideoPort>(
        &self,
        port: &mut P,
        signal: &DriverSignal,
        buffer: &mut CaptureBuffer,
        mode: TransferMode,
    ) -> Result<(), CameraError> {
        signal.clear();
        buffer.begin_cycle();

        if mode == TransferMode::OneShot {
            buffer.clear();
            port.clean_dcache(buffer.as_slice());
        }
        port.invalidate_dcache(buffer.as_slice());

        let length_units = buffer.length_units();
        debug!(
            "DMA転送開始: {:?}, {} ワード ({} バイト)",
            mode,
            length_units,
            buffer.capacity()
        );
        if let Err(e) = port.start_transfer(mode, buffer.as_mut_slice(), length_units) {
            error!("DMA転送を開始できませんでした: {}", e);
            self.force_stop(port);
            return Err(e.into());
        }
        Ok(())
    }

    /// 単発転送で 1 フレームを取得する
    pub fn capture<P: VideoPort, W: SignalWait>(
        &self,
        port: &mut P,
        signal: &DriverSignal,
        wait: &mut W,
        buffer: &mut CaptureBuffer,
    ) -> Result<(), CameraError> {
        self.arm(port, signal, buffer, TransferMode::OneShot)?;

        match wait.wait_for(self.timeouts.start_ms, &mut || signal.frame_started()) {
            WaitOutcome::Ready { elapsed_ms } => {
                debug!("フレーム開始を検出 ({}ms)", elapsed_ms);
            }
            WaitOutcome::TimedOut { elapsed_ms } => {
                warn!("フレーム開始 (VSYNC) を {}ms 待ちましたが検出できません", elapsed_ms);
                self.force_stop(port);
                return Err(CameraError::StartTimeout {
                    waited_ms: elapsed_ms,
                });
            }
        }

        let completion_ms = self.timeouts.completion_for(buffer.capacity());
        match wait.wait_for(completion_ms, &mut || signal.frame_complete()) {
            WaitOutcome::Ready { elapsed_ms } => {
                debug!("フレーム完了を検出 ({}ms)", elapsed_ms);
            }
            WaitOutcome::TimedOut { elapsed_ms } => {
                warn!("フレーム完了を {}ms 待ちましたが検出できません", elapsed_ms);
                self.force_stop(port);
                return Err(CameraError::CompletionTimeout {
                    waited_ms: elapsed_ms,
                });
            }
        }

        port.stop_transfer()?;
        port.invalidate_dcache(buffer.as_slice());
        buffer.mark_ready();
        info!("フレーム取得完了 (累計 {} フレーム)", signal.frame_count());
        Ok(())
    }

    fn force_stop<P: VideoPort>(&self, port: &mut P) {
        if let Err(e) = port.stop_transfer() {
            error!("DMA転送の停止に失敗しました: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_timeout_never_below_configured_value() {
        let timeouts = AcquisitionTimeouts::default();
        assert_eq!(timeouts.completion_for(1024), 3000);
        assert_eq!(timeouts.completion_for(204_800), 3200);
    }
}
