//! キャプチャバッファからの JPEG 範囲抽出
//!
//! 画素データは解釈せず、SOI (FF D8) から EOI (FF D9) までの
//! 自己区切りのバイト列を切り出すだけ。

use std::ops::Range;

use crate::core::error::CameraError;

pub const SOI: [u8; 2] = [0xFF, 0xD8];
pub const EOI: [u8; 2] = [0xFF, 0xD9];

/// 前方へ 1 回だけ走査し、SOI の先頭から EOI の直後までの範囲を返す
pub fn find_jpeg_range(buffer: &[u8]) -> Result<Range<usize>, CameraError> {
    let start = find_marker(buffer, SOI, 0).ok_or(CameraError::NoStartMarker)?;
    let end = find_marker(buffer, EOI, start + SOI.len())
        .map(|pos| pos + EOI.len())
        .ok_or(CameraError::NoEndMarker { start })?;

    if end <= start {
        return Err(CameraError::MalformedRange { start, end });
    }
    Ok(start..end)
}

pub fn extract_jpeg(buffer: &[u8]) -> Result<&[u8], CameraError> {
    let range = find_jpeg_range(buffer)?;
    Ok(&buffer[range])
}

fn find_marker(buffer: &[u8], marker: [u8; 2], from: usize) -> Option<usize> {
    buffer
        .get(from..)?
        .windows(2)
        .position(|w| w == marker)
        .map(|pos| pos + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_inclusive_range_between_markers() {
        let mut buffer = vec![0x12, 0x34, 0x00];
        buffer.extend_from_slice(&[0xFF, 0xD8, 0xAA, 0xBB, 0xFF, 0xD9]);
        buffer.extend_from_slice(&[0x55; 10]);

        assert_eq!(find_jpeg_range(&buffer).unwrap(), 3..9);
        assert_eq!(
            extract_jpeg(&buffer).unwrap(),
            &[0xFF, 0xD8, 0xAA, 0xBB, 0xFF, 0xD9]
        );
    }

    #[test]
    fn end_marker_overlapping_start_is_not_accepted() {
        // FF D8 D9 : D8 の直後の D9 は FF D9 ではない
        let buffer = [0xFF, 0xD8, 0xD9, 0x00];
        assert!(matches!(
            find_jpeg_range(&buffer),
            Err(CameraError::NoEndMarker { start: 0 })
        ));
    }

    #[test]
    fn minimal_soi_eoi_pair() {
        let buffer = [0xFF, 0xD8, 0xFF, 0xD9];
        assert_eq!(find_jpeg_range(&buffer).unwrap(), 0..4);
    }

    #[test]
    fn empty_and_zero_buffers_have_no_start() {
        assert!(matches!(find_jpeg_range(&[]), Err(CameraError::NoStartMarker)));
        assert!(matches!(
            find_jpeg_range(&[0u8; 64]),
            Err(CameraError::NoStartMarker)
        ));
    }

    #[test]
    fn start_marker_at_very_end_has_no_end() {
        let buffer = [0x00, 0x00, 0xFF, 0xD8];
        assert!(matches!(
            find_jpeg_range(&buffer),
            Err(CameraError::NoEndMarker { start: 2 })
        ));
    }
}
