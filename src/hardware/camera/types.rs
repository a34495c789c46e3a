use std::fmt;
use std::str::FromStr;

/// レジスタバンク
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bank {
    Dsp,
    Sensor,
}

impl Bank {
    pub fn select_value(self) -> u8 {
        match self {
            Bank::Dsp => super::ov2640_regs::BANK_DSP,
            Bank::Sensor => super::ov2640_regs::BANK_SENSOR,
        }
    }
}

/// 名前付きフレームサイズ
///
/// OV2640 エンジンが受け付けるのは [`FrameSize::ALLOWED`] の 13 種のみで、
/// それ以外（96x96, QCIF など）は `InvalidParameter` になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSize {
    R96x96,
    Qqvga,
    R128x64,
    Qcif,
    Hqvga,
    R240x240,
    Qvga,
    Sif,
    Cif,
    Hvga,
    Vga,
    Wvga2,
    Svga,
    Xga,
    Hd,
    Sxga,
    R960p,
    Uxga,
    Qxga,
}

impl FrameSize {
    pub const ALLOWED: [FrameSize; 13] = [
        FrameSize::Cif,
        FrameSize::Sif,
        FrameSize::Qqvga,
        FrameSize::R128x64,
        FrameSize::Qvga,
        FrameSize::Vga,
        FrameSize::Hvga,
        FrameSize::Wvga2,
        FrameSize::Svga,
        FrameSize::Xga,
        FrameSize::Sxga,
        FrameSize::Uxga,
        FrameSize::R960p,
    ];

    pub const ALL: [FrameSize; 19] = [
        FrameSize::R96x96,
        FrameSize::Qqvga,
        FrameSize::R128x64,
        FrameSize::Qcif,
        FrameSize::Hqvga,
        FrameSize::R240x240,
        FrameSize::Qvga,
        FrameSize::Sif,
        FrameSize::Cif,
        FrameSize::Hvga,
        FrameSize::Vga,
        FrameSize::Wvga2,
        FrameSize::Svga,
        FrameSize::Xga,
        FrameSize::Hd,
        FrameSize::Sxga,
        FrameSize::R960p,
        FrameSize::Uxga,
        FrameSize::Qxga,
    ];

    /// (幅, 高さ)
    pub fn dimensions(self) -> (u16, u16) {
        match self {
            FrameSize::R96x96 => (96, 96),
            FrameSize::Qqvga => (160, 120),
            FrameSize::R128x64 => (128, 64),
            FrameSize::Qcif => (176, 144),
            FrameSize::Hqvga => (240, 176),
            FrameSize::R240x240 => (240, 240),
            FrameSize::Qvga => (320, 240),
            FrameSize::Sif => (352, 240),
            FrameSize::Cif => (352, 288),
            FrameSize::Hvga => (480, 320),
            FrameSize::Vga => (640, 480),
            FrameSize::Wvga2 => (752, 480),
            FrameSize::Svga => (800, 600),
            FrameSize::Xga => (1024, 768),
            FrameSize::Hd => (1280, 720),
            FrameSize::Sxga => (1280, 1024),
            FrameSize::R960p => (1280, 960),
            FrameSize::Uxga => (1600, 1200),
            FrameSize::Qxga => (2048, 1536),
        }
    }

    pub fn width(self) -> u16 {
        self.dimensions().0
    }

    pub fn height(self) -> u16 {
        self.dimensions().1
    }

    pub fn is_allowed(self) -> bool {
        Self::ALLOWED.contains(&self)
    }

    /// SVGA 系タイミング（幅 800 以下）かどうか
    pub fn is_small(self) -> bool {
        self.width() <= super::ov2640_regs::SVGA_WIDTH_THRESHOLD
    }

    /// RGB565 1 フレーム分のバイト数
    pub fn rgb565_bytes(self) -> usize {
        let (w, h) = self.dimensions();
        w as usize * h as usize * 2
    }

    pub fn name(self) -> &'static str {
        match self {
            FrameSize::R96x96 => "96X96",
            FrameSize::Qqvga => "QQVGA",
            FrameSize::R128x64 => "128X64",
            FrameSize::Qcif => "QCIF",
            FrameSize::Hqvga => "HQVGA",
            FrameSize::R240x240 => "240X240",
            FrameSize::Qvga => "QVGA",
            FrameSize::Sif => "SIF",
            FrameSize::Cif => "CIF",
            FrameSize::Hvga => "HVGA",
            FrameSize::Vga => "VGA",
            FrameSize::Wvga2 => "WVGA2",
            FrameSize::Svga => "SVGA",
            FrameSize::Xga => "XGA",
            FrameSize::Hd => "HD",
            FrameSize::Sxga => "SXGA",
            FrameSize::R960p => "960P",
            FrameSize::Uxga => "UXGA",
            FrameSize::Qxga => "QXGA",
        }
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.dimensions();
        write!(f, "{} ({}x{})", self.name(), w, h)
    }
}

impl FromStr for FrameSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        FrameSize::ALL
            .iter()
            .copied()
            .find(|size| size.name() == upper)
            .ok_or_else(|| format!("不明なフレームサイズ: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb565,
    Yuv422,
    Jpeg,
}

/// -2..=2 の調整レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level(i8);

impl Level {
    pub const MIN: i8 = -2;
    pub const MAX: i8 = 2;

    pub fn new(value: i8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Level(value))
    }

    pub fn value(self) -> i8 {
        self.0
    }

    /// テーブル参照用インデックス (0..5)
    pub fn index(self) -> usize {
        (self.0 - Self::MIN) as usize
    }
}

impl Default for Level {
    fn default() -> Self {
        Level(0)
    }
}

/// ホワイトバランスのプリセット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightMode {
    #[default]
    Auto,
    Sunny,
    Cloudy,
    Office,
    Home,
}

impl LightMode {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// 露出操作
///
/// 読み出し・自動露出の有効/無効・手動値設定を 1 つの操作で扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureRequest {
    /// 現在の露出値を読み出す
    Read,
    AutoEnable,
    AutoDisable,
    /// 手動露出値（解像度に応じた上限でクランプ）
    Manual(u16),
}

/// センサーの現在状態
///
/// セッター経由でのみ更新される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorState {
    /// 直近で選択したバンク（書き込み前のバンク選択は省略しない）
    pub active_bank: Option<Bank>,
    pub frame_size: FrameSize,
    pub pixel_format: PixelFormat,
    pub quality: u8,
    pub brightness: Level,
    pub contrast: Level,
    pub saturation: Level,
    pub effect: u8,
    pub light_mode: LightMode,
    pub night_mode: bool,
    pub colorbar: bool,
    pub mirror: bool,
    pub flip: bool,
}

impl Default for SensorState {
    fn default() -> Self {
        SensorState {
            active_bank: None,
            frame_size: FrameSize::Qqvga,
            pixel_format: PixelFormat::Rgb565,
            quality: 12,
            brightness: Level::default(),
            contrast: Level::default(),
            saturation: Level::default(),
            effect: 0,
            light_mode: LightMode::Auto,
            night_mode: false,
            colorbar: false,
            mirror: false,
            flip: false,
        }
    }
}

/// プレビュー時のセンサー設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewProfile {
    pub frame_size: FrameSize,
    pub mirror: bool,
    pub flip: bool,
}

impl Default for PreviewProfile {
    fn default() -> Self {
        PreviewProfile {
            frame_size: FrameSize::Qqvga,
            mirror: false,
            flip: false,
        }
    }
}

/// スナップショット撮影時のセンサー設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotProfile {
    pub frame_size: FrameSize,
    pub quality: u8,
    pub brightness: i8,
    pub mirror: bool,
    pub flip: bool,
}

impl Default for SnapshotProfile {
    fn default() -> Self {
        SnapshotProfile {
            frame_size: FrameSize::Uxga,
            quality: 5,
            brightness: -2,
            mirror: false,
            flip: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_sizes_are_thirteen_distinct_presets() {
        assert_eq!(FrameSize::ALLOWED.len(), 13);
        for size in FrameSize::ALLOWED {
            assert!(size.is_allowed());
        }
        assert!(!FrameSize::Qcif.is_allowed());
        assert!(!FrameSize::Qxga.is_allowed());
    }

    #[test]
    fn frame_size_parses_case_insensitively() {
        assert_eq!("uxga".parse::<FrameSize>(), Ok(FrameSize::Uxga));
        assert_eq!(" QQVGA ".parse::<FrameSize>(), Ok(FrameSize::Qqvga));
        assert_eq!("960p".parse::<FrameSize>(), Ok(FrameSize::R960p));
        assert!("HUGE".parse::<FrameSize>().is_err());
    }

    #[test]
    fn small_frame_threshold_is_inclusive_at_800() {
        assert!(FrameSize::Svga.is_small());
        assert!(!FrameSize::Xga.is_small());
    }

    #[test]
    fn level_rejects_out_of_range() {
        assert!(Level::new(-3).is_none());
        assert!(Level::new(3).is_none());
        assert_eq!(Level::new(-2).map(Level::index), Some(0));
        assert_eq!(Level::new(2).map(Level::index), Some(4));
    }

    #[test]
    fn qqvga_rgb565_frame_is_38400_bytes() {
        assert_eq!(FrameSize::Qqvga.rgb565_bytes(), 38_400);
    }
}
