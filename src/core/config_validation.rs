use crate::hardware::camera::{FrameSize, Level};
use crate::hardware::camera::ov2640::{QUALITY_MAX, QUALITY_MIN};
use crate::storage::PhotoName;

/// スナップショットバッファの最小サイズ
pub const MIN_SNAPSHOT_BUFFER_BYTES: u32 = 16 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    UnknownFrameSize(String),
    UnsupportedFrameSize(String),
    InvalidJpegQuality(u8),
    InvalidBrightness(i8),
    InvalidTimeout(&'static str, u32),
    InvalidPollInterval(u32),
    InvalidBufferSize(u32),
    InvalidProbeLimit(u32),
    InvalidChunkSize(u32),
    MissingPhotoDir,
}

pub fn parse_frame_size(name: &str) -> Result<FrameSize, ValidationError> {
    let size: FrameSize = name
        .parse()
        .map_err(|_| ValidationError::UnknownFrameSize(name.to_string()))?;
    if !size.is_allowed() {
        return Err(ValidationError::UnsupportedFrameSize(name.to_string()));
    }
    Ok(size)
}

pub fn parse_jpeg_quality(value: u8) -> Result<u8, ValidationError> {
    if (QUALITY_MIN..=QUALITY_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::InvalidJpegQuality(value))
    }
}

pub fn parse_brightness(value: i8) -> Result<i8, ValidationError> {
    Level::new(value)
        .map(Level::value)
        .ok_or(ValidationError::InvalidBrightness(value))
}

pub fn parse_timeout_ms(name: &'static str, value: u32) -> Result<u32, ValidationError> {
    if value == 0 {
        Err(ValidationError::InvalidTimeout(name, value))
    } else {
        Ok(value)
    }
}

/// ポーリング間隔は 1ms 以上、開始待ちタイムアウト以下
pub fn parse_poll_interval_ms(value: u32, start_timeout_ms: u32) -> Result<u32, ValidationError> {
    if value == 0 || value > start_timeout_ms {
        Err(ValidationError::InvalidPollInterval(value))
    } else {
        Ok(value)
    }
}

/// DMA はワード単位で転送するため 4 の倍数が必要
pub fn parse_snapshot_buffer_bytes(value: u32) -> Result<usize, ValidationError> {
    if value < MIN_SNAPSHOT_BUFFER_BYTES || value % 4 != 0 {
        Err(ValidationError::InvalidBufferSize(value))
    } else {
        Ok(value as usize)
    }
}

pub fn parse_probe_limit(value: u32) -> Result<u32, ValidationError> {
    if value == 0 || value > PhotoName::ID_MODULUS {
        Err(ValidationError::InvalidProbeLimit(value))
    } else {
        Ok(value)
    }
}

pub fn parse_write_chunk_bytes(value: u32) -> Result<usize, ValidationError> {
    if value == 0 {
        Err(ValidationError::InvalidChunkSize(value))
    } else {
        Ok(value as usize)
    }
}

pub fn parse_photo_dir(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingPhotoDir)
    } else {
        Ok(trimmed.to_string())
    }
}
