//! 割り込みコンテキストとメインコンテキストの間のフレーム通知
//!
//! フラグは割り込み側 ([`IsrSignal`]) だけが立て、ドライバ側
//! ([`DriverSignal`]) だけが読み出し・クリアする。ロックは使わない。

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

const FPS_WINDOW_MS: u32 = 1000;

#[derive(Debug)]
pub struct CaptureSignal {
    frame_started: AtomicBool,
    frame_complete: AtomicBool,
    frame_count: AtomicU32,
    // フレームレート計測（割り込み側のみ更新）
    fps: AtomicU32,
    fps_window_frames: AtomicU32,
    fps_window_start_ms: AtomicU32,
}

impl Default for CaptureSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSignal {
    pub const fn new() -> Self {
        CaptureSignal {
            frame_started: AtomicBool::new(false),
            frame_complete: AtomicBool::new(false),
            frame_count: AtomicU32::new(0),
            fps: AtomicU32::new(0),
            fps_window_frames: AtomicU32::new(0),
            fps_window_start_ms: AtomicU32::new(0),
        }
    }

    /// 割り込み側とドライバ側のハンドルを作る
    pub fn channel() -> (IsrSignal, DriverSignal) {
        let shared = Arc::new(CaptureSignal::new());
        (IsrSignal(Arc::clone(&shared)), DriverSignal(shared))
    }
}

/// 割り込み/コールバック側のハンドル（フラグを立てるだけ）
#[derive(Debug, Clone)]
pub struct IsrSignal(Arc<CaptureSignal>);

impl IsrSignal {
    /// VSYNC（フレーム開始）
    pub fn on_frame_start(&self) {
        self.0.frame_started.store(true, Ordering::SeqCst);
    }

    /// DMA によるフレーム書き込み完了
    pub fn on_frame_complete(&self) {
        self.0.frame_count.fetch_add(1, Ordering::SeqCst);
        self.0.fps_window_frames.fetch_add(1, Ordering::SeqCst);
        self.0.frame_complete.store(true, Ordering::SeqCst);
    }

    /// 周期ティック。1 秒経過ごとにフレームレートを確定する
    pub fn on_tick(&self, now_ms: u32) {
        let start = self.0.fps_window_start_ms.load(Ordering::SeqCst);
        if now_ms.wrapping_sub(start) >= FPS_WINDOW_MS {
            let frames = self.0.fps_window_frames.swap(0, Ordering::SeqCst);
            self.0.fps.store(frames, Ordering::SeqCst);
            self.0.fps_window_start_ms.store(now_ms, Ordering::SeqCst);
        }
    }
}

/// ドライバ側のハンドル
///
/// クリアは転送を開始する前（転送が止まっている間）にだけ行う。
#[derive(Debug)]
pub struct DriverSignal(Arc<CaptureSignal>);

impl DriverSignal {
    pub fn clear(&self) {
        self.0.frame_started.store(false, Ordering::SeqCst);
        self.0.frame_complete.store(false, Ordering::SeqCst);
    }

    pub fn frame_started(&self) -> bool {
        self.0.frame_started.load(Ordering::SeqCst)
    }

    pub fn frame_complete(&self) -> bool {
        self.0.frame_complete.load(Ordering::SeqCst)
    }

    /// 完了フラグを読み出すと同時に落とす（循環転送用）
    ///
    /// 読み出しとクリアが 1 命令なので、その間の完了通知は失われない。
    pub fn take_frame_complete(&self) -> bool {
        self.0.frame_complete.swap(false, Ordering::SeqCst)
    }

    pub fn frame_count(&self) -> u32 {
        self.0.frame_count.load(Ordering::SeqCst)
    }

    pub fn fps(&self) -> u32 {
        self.0.fps.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isr_raises_and_driver_clears() {
        let (isr, driver) = CaptureSignal::channel();
        assert!(!driver.frame_started());

        isr.on_frame_start();
        isr.on_frame_complete();
        assert!(driver.frame_started());
        assert!(driver.frame_complete());
        assert_eq!(driver.frame_count(), 1);

        driver.clear();
        assert!(!driver.frame_started());
        assert!(!driver.frame_complete());
        // カウンタはクリアされない
        assert_eq!(driver.frame_count(), 1);
    }

    #[test]
    fn take_frame_complete_consumes_once() {
        let (isr, driver) = CaptureSignal::channel();
        isr.on_frame_complete();
        assert!(driver.take_frame_complete());
        assert!(!driver.take_frame_complete());
    }

    #[test]
    fn fps_is_latched_after_one_second_window() {
        let (isr, driver) = CaptureSignal::channel();
        for _ in 0..12 {
            isr.on_frame_complete();
        }
        isr.on_tick(500);
        assert_eq!(driver.fps(), 0);
        isr.on_tick(1000);
        assert_eq!(driver.fps(), 12);

        isr.on_frame_complete();
        isr.on_tick(2000);
        assert_eq!(driver.fps(), 1);
    }
}
