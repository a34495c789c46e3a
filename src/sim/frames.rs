use crate::core::jpeg::{EOI, SOI};
use crate::hardware::camera::FrameSize;

/// SOI + 疑似ペイロード + EOI の JPEG 風バイト列
///
/// ペイロードには 0xFF を含めないので途中に EOI は現れない。
pub fn synthetic_jpeg(payload_len: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(payload_len + 4);
    data.extend_from_slice(&SOI);
    data.extend((0..payload_len).map(|i| (i % 0xFF) as u8));
    data.extend_from_slice(&EOI);
    data
}

/// DMA バッファの内容を模したバイト列（前後にゴミデータ）
pub fn synthetic_capture(leading_garbage: usize, jpeg: &[u8], trailing_garbage: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(leading_garbage + jpeg.len() + trailing_garbage);
    data.extend(std::iter::repeat(0x5A).take(leading_garbage));
    data.extend_from_slice(jpeg);
    data.extend(std::iter::repeat(0xA5).take(trailing_garbage));
    data
}

/// 8 本のカラーバー (RGB565, リトルエンディアン)
pub fn rgb565_test_pattern(size: FrameSize) -> Vec<u8> {
    const BARS: [u16; 8] = [
        0xFFFF, 0xFFE0, 0x07FF, 0x07E0, 0xF81F, 0xF800, 0x001F, 0x0000,
    ];
    let (width, height) = size.dimensions();
    let bar_width = (width as usize / BARS.len()).max(1);
    let mut data = Vec::with_capacity(size.rgb565_bytes());
    for _ in 0..height {
        for x in 0..width as usize {
            let color = BARS[(x / bar_width).min(BARS.len() - 1)];
            data.extend_from_slice(&color.to_le_bytes());
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::jpeg::find_jpeg_range;

    #[test]
    fn synthetic_jpeg_is_self_delimited() {
        let jpeg = synthetic_jpeg(1000);
        assert_eq!(jpeg.len(), 1004);
        let capture = synthetic_capture(17, &jpeg, 33);
        assert_eq!(find_jpeg_range(&capture).unwrap(), 17..1021);
    }

    #[test]
    fn test_pattern_matches_frame_size() {
        assert_eq!(
            rgb565_test_pattern(FrameSize::Qqvga).len(),
            FrameSize::Qqvga.rgb565_bytes()
        );
    }
}
