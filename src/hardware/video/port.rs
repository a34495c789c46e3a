use std::ops::BitOr;

/// DMA 転送方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// 循環転送（プレビュー）
    Continuous,
    /// 1 フレームのみ（スナップショット）
    OneShot,
}

/// ビデオポートの割り込み要因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterruptMask(u8);

impl InterruptMask {
    pub const FRAME_START: InterruptMask = InterruptMask(0x01);
    pub const FRAME_COMPLETE: InterruptMask = InterruptMask(0x02);
    pub const OVERRUN: InterruptMask = InterruptMask(0x04);
    pub const ERROR: InterruptMask = InterruptMask(0x08);
    pub const LINE: InterruptMask = InterruptMask(0x10);

    /// フレーム取得で使う要因
    pub const ACQUISITION: InterruptMask = InterruptMask(0x03);
    pub const ALL: InterruptMask = InterruptMask(0x1F);

    pub const fn empty() -> Self {
        InterruptMask(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: InterruptMask) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for InterruptMask {
    type Output = InterruptMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        InterruptMask(self.0 | rhs.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("転送長が不正です: {0} ワード")]
    InvalidLength(u32),
    #[error("DMA/DCMI エラー: {0}")]
    Hal(String),
}

/// DMA 付きパラレルビデオポート (DCMI)
///
/// `start_transfer` に渡した領域は `stop_transfer` が戻るまで DMA が書き込む。
/// 呼び出し側はその間バッファを解放・再利用しないこと。
pub trait VideoPort {
    fn start_transfer(
        &mut self,
        mode: TransferMode,
        dest: &mut [u8],
        length_units: u32,
    ) -> Result<(), PortError>;

    fn stop_transfer(&mut self) -> Result<(), PortError>;

    fn clear_interrupts(&mut self, mask: InterruptMask);
    fn enable_interrupts(&mut self, mask: InterruptMask);

    /// ハードウェア JPEG モードが有効か
    fn jpeg_enabled(&self) -> bool;
    fn set_jpeg_enabled(&mut self, enabled: bool) -> Result<(), PortError>;

    /// DMA を指定の転送方式で初期化し直す（実行中の転送は破棄される）
    fn reinit_dma(&mut self, mode: TransferMode) -> Result<(), PortError>;

    /// CPU 側で書いた内容をメモリへ書き出す
    fn clean_dcache(&mut self, region: &[u8]);
    /// CPU キャッシュを破棄して DMA の書き込みを見えるようにする
    fn invalidate_dcache(&mut self, region: &[u8]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquisition_mask_is_start_and_complete() {
        let mask = InterruptMask::FRAME_START | InterruptMask::FRAME_COMPLETE;
        assert_eq!(mask, InterruptMask::ACQUISITION);
        assert!(InterruptMask::ALL.contains(InterruptMask::OVERRUN | InterruptMask::LINE));
        assert!(!mask.contains(InterruptMask::ERROR));
        assert_eq!(InterruptMask::empty().bits(), 0);
    }
}
