use std::sync::{Arc, Mutex};

use super::clock::{SignalEvent, SimClock};
use super::lock;
use crate::hardware::video::{InterruptMask, PortError, TransferMode, VideoPort};

/// 記録されたビデオポート操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortCall {
    Start { mode: TransferMode, length_units: u32 },
    Stop,
    ClearInterrupts(InterruptMask),
    EnableInterrupts(InterruptMask),
    SetJpeg(bool),
    ReinitDma(TransferMode),
    Clean(usize),
    Invalidate(usize),
}

#[derive(Debug)]
struct PortInner {
    calls: Vec<PortCall>,
    jpeg: bool,
    /// ハードウェア JPEG 有効時に宛先へ書き込む内容
    jpeg_frame: Vec<u8>,
    /// JPEG 無効時（プレビュー）に宛先へ書き込む内容
    raw_frame: Vec<u8>,
    /// 転送開始から FRAME_START までの時間 (None なら発生しない)
    start_after_ms: Option<u32>,
    /// 転送開始から FRAME_COMPLETE までの時間 (None なら発生しない)
    complete_after_ms: Option<u32>,
    /// 循環転送時のフレーム間隔
    frame_interval_ms: u32,
    fail_start: bool,
}

/// 仮想時間で動く DCMI + DMA
///
/// 転送開始時にフレームを宛先へコピーし、割り込みイベントを [`SimClock`] に予約する。
#[derive(Debug, Clone)]
pub struct SimVideoPort {
    clock: SimClock,
    inner: Arc<Mutex<PortInner>>,
}

impl SimVideoPort {
    pub fn new(clock: SimClock) -> Self {
        SimVideoPort {
            clock,
            inner: Arc::new(Mutex::new(PortInner {
                calls: Vec::new(),
                jpeg: false,
                jpeg_frame: Vec::new(),
                raw_frame: Vec::new(),
                start_after_ms: Some(5),
                complete_after_ms: Some(40),
                frame_interval_ms: 40,
                fail_start: false,
            })),
        }
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn set_jpeg_frame(&self, frame: Vec<u8>) {
        lock(&self.inner).jpeg_frame = frame;
    }

    pub fn set_raw_frame(&self, frame: Vec<u8>) {
        lock(&self.inner).raw_frame = frame;
    }

    pub fn set_timing(&self, start_after_ms: Option<u32>, complete_after_ms: Option<u32>) {
        let mut inner = lock(&self.inner);
        inner.start_after_ms = start_after_ms;
        inner.complete_after_ms = complete_after_ms;
    }

    pub fn set_frame_interval_ms(&self, interval_ms: u32) {
        lock(&self.inner).frame_interval_ms = interval_ms.max(1);
    }

    pub fn set_fail_start(&self, fail: bool) {
        lock(&self.inner).fail_start = fail;
    }

    pub fn calls(&self) -> Vec<PortCall> {
        lock(&self.inner).calls.clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.inner).calls.clear();
    }

    pub fn start_count(&self) -> usize {
        self.count(|call| matches!(call, PortCall::Start { .. }))
    }

    pub fn stop_count(&self) -> usize {
        self.count(|call| matches!(call, PortCall::Stop))
    }

    pub fn reinit_count(&self) -> usize {
        self.count(|call| matches!(call, PortCall::ReinitDma(_)))
    }

    fn count(&self, pred: impl Fn(&PortCall) -> bool) -> usize {
        lock(&self.inner).calls.iter().filter(|call| pred(call)).count()
    }

    fn record(&self, call: PortCall) {
        lock(&self.inner).calls.push(call);
    }
}

impl VideoPort for SimVideoPort {
    fn start_transfer(
        &mut self,
        mode: TransferMode,
        dest: &mut [u8],
        length_units: u32,
    ) -> Result<(), PortError> {
        let mut inner = lock(&self.inner);
        inner.calls.push(PortCall::Start { mode, length_units });
        if inner.fail_start {
            return Err(PortError::Hal("転送を開始できません (シミュレーション)".to_string()));
        }
        let units = length_units as usize;
        if units == 0 || units.saturating_mul(4) > dest.len() + 3 {
            return Err(PortError::InvalidLength(length_units));
        }

        let frame = if inner.jpeg {
            &inner.jpeg_frame
        } else {
            &inner.raw_frame
        };
        let n = frame.len().min(dest.len());
        dest[..n].copy_from_slice(&frame[..n]);

        let period = match mode {
            TransferMode::Continuous => Some(inner.frame_interval_ms),
            TransferMode::OneShot => None,
        };
        if let Some(after) = inner.start_after_ms {
            self.clock.schedule_in(after, SignalEvent::FrameStart, period);
        }
        if let Some(after) = inner.complete_after_ms {
            self.clock.schedule_in(after, SignalEvent::FrameComplete, period);
        }
        Ok(())
    }

    fn stop_transfer(&mut self) -> Result<(), PortError> {
        self.record(PortCall::Stop);
        self.clock.cancel_all();
        Ok(())
    }

    fn clear_interrupts(&mut self, mask: InterruptMask) {
        self.record(PortCall::ClearInterrupts(mask));
    }

    fn enable_interrupts(&mut self, mask: InterruptMask) {
        self.record(PortCall::EnableInterrupts(mask));
    }

    fn jpeg_enabled(&self) -> bool {
        lock(&self.inner).jpeg
    }

    fn set_jpeg_enabled(&mut self, enabled: bool) -> Result<(), PortError> {
        let mut inner = lock(&self.inner);
        inner.jpeg = enabled;
        inner.calls.push(PortCall::SetJpeg(enabled));
        Ok(())
    }

    fn reinit_dma(&mut self, mode: TransferMode) -> Result<(), PortError> {
        self.record(PortCall::ReinitDma(mode));
        self.clock.cancel_all();
        Ok(())
    }

    fn clean_dcache(&mut self, region: &[u8]) {
        self.record(PortCall::Clean(region.len()));
    }

    fn invalidate_dcache(&mut self, region: &[u8]) {
        self.record(PortCall::Invalidate(region.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::video::CaptureSignal;
    use embedded_hal::delay::DelayNs;

    #[test]
    fn one_shot_copies_frame_and_fires_once() {
        let (isr, driver) = CaptureSignal::channel();
        let mut clock = SimClock::new();
        clock.attach(isr);
        let mut port = SimVideoPort::new(clock.clone());
        port.set_raw_frame(vec![1, 2, 3, 4]);

        let mut dest = [0u8; 8];
        port.start_transfer(TransferMode::OneShot, &mut dest, 2).unwrap();
        assert_eq!(dest, [1, 2, 3, 4, 0, 0, 0, 0]);

        clock.delay_ms(100);
        assert!(driver.frame_complete());
        assert_eq!(driver.frame_count(), 1);
        assert_eq!(clock.pending_events(), 0);
    }

    #[test]
    fn length_beyond_destination_is_rejected() {
        let mut port = SimVideoPort::new(SimClock::new());
        let mut dest = [0u8; 8];
        let result = port.start_transfer(TransferMode::OneShot, &mut dest, 3);
        assert!(matches!(result, Err(PortError::InvalidLength(3))));
    }

    #[test]
    fn stop_cancels_pending_events() {
        let clock = SimClock::new();
        let mut port = SimVideoPort::new(clock.clone());
        let mut dest = [0u8; 8];
        port.start_transfer(TransferMode::Continuous, &mut dest, 2).unwrap();
        assert_eq!(clock.pending_events(), 2);
        port.stop_transfer().unwrap();
        assert_eq!(clock.pending_events(), 0);
        assert_eq!(port.stop_count(), 1);
    }
}
