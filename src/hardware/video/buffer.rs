use crate::core::error::CameraError;

/// DMA 転送先に要求するアライメント（キャッシュライン）
pub const DMA_ALIGNMENT: usize = 32;

enum Region {
    Heap(Box<[u8]>),
    Static(&'static mut [u8]),
}

/// DMA から書き込まれる固定長バッファ
///
/// 転送中はフレーム取得側が排他的に保持し、完了通知を確認した後に
/// 利用側（表示または JPEG 抽出）へ渡る。
pub struct CaptureBuffer {
    region: Region,
    ready: bool,
    ready_count: u32,
}

impl CaptureBuffer {
    /// ヒープ上に確保する（ホスト・シミュレーション用）
    pub fn new(capacity: usize) -> Result<Self, CameraError> {
        if capacity == 0 {
            return Err(CameraError::InvalidParameter(
                "キャプチャバッファのサイズが 0 です".to_string(),
            ));
        }
        Ok(CaptureBuffer {
            region: Region::Heap(vec![0u8; capacity].into_boxed_slice()),
            ready: false,
            ready_count: 0,
        })
    }

    /// DMA から到達可能な静的領域（例: AXI SRAM セクション）を使う
    pub fn from_static(region: &'static mut [u8]) -> Result<Self, CameraError> {
        if region.is_empty() {
            return Err(CameraError::InvalidParameter(
                "キャプチャバッファのサイズが 0 です".to_string(),
            ));
        }
        let addr = region.as_ptr() as usize;
        if addr % DMA_ALIGNMENT != 0 {
            return Err(CameraError::InvalidParameter(format!(
                "キャプチャバッファが {} バイト境界にありません: 0x{:08X}",
                DMA_ALIGNMENT, addr
            )));
        }
        Ok(CaptureBuffer {
            region: Region::Static(region),
            ready: false,
            ready_count: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.as_slice().len()
    }

    /// DMA 転送長（32bit ワード単位、端数切り上げ）
    pub fn length_units(&self) -> u32 {
        self.capacity().div_ceil(4) as u32
    }

    pub fn as_slice(&self) -> &[u8] {
        match &self.region {
            Region::Heap(data) => &data[..],
            Region::Static(data) => &data[..],
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.region {
            Region::Heap(data) => &mut data[..],
            Region::Static(data) => &mut data[..],
        }
    }

    pub fn clear(&mut self) {
        self.as_mut_slice().fill(0);
    }

    /// 完了済みフレームを保持しているか
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// これまでに完了フレームとしてマークされた回数
    pub fn ready_count(&self) -> u32 {
        self.ready_count
    }

    pub(crate) fn begin_cycle(&mut self) {
        self.ready = false;
    }

    pub(crate) fn mark_ready(&mut self) {
        self.ready = true;
        self.ready_count += 1;
    }
}

impl std::fmt::Debug for CaptureBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureBuffer")
            .field("capacity", &self.capacity())
            .field("ready", &self.ready)
            .field("ready_count", &self.ready_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_units_round_up_to_words() {
        assert_eq!(CaptureBuffer::new(8).unwrap().length_units(), 2);
        assert_eq!(CaptureBuffer::new(9).unwrap().length_units(), 3);
        assert_eq!(CaptureBuffer::new(204_800).unwrap().length_units(), 51_200);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            CaptureBuffer::new(0),
            Err(CameraError::InvalidParameter(_))
        ));
    }

    #[test]
    fn ready_flag_resets_per_cycle_but_count_accumulates() {
        let mut buffer = CaptureBuffer::new(16).unwrap();
        buffer.begin_cycle();
        buffer.mark_ready();
        assert!(buffer.is_ready());
        buffer.begin_cycle();
        assert!(!buffer.is_ready());
        buffer.mark_ready();
        assert_eq!(buffer.ready_count(), 2);
    }

    #[test]
    fn static_region_must_be_aligned() {
        let leaked: &'static mut [u8] = Box::leak(vec![0u8; 64].into_boxed_slice());
        let addr = leaked.as_ptr() as usize;
        let skip = (DMA_ALIGNMENT - addr % DMA_ALIGNMENT) % DMA_ALIGNMENT;
        let (_, rest) = leaked.split_at_mut(skip);
        let (aligned, _) = rest.split_at_mut(DMA_ALIGNMENT);
        assert!(CaptureBuffer::from_static(aligned).is_ok());
    }
}
