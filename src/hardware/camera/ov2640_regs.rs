//! OV2640 レジスタアドレスと固定テーブル
//!
//! テーブルはすべて `(reg, value)` の組で、先頭に必ずバンク選択 (0xFF) を含む。
//! 終端マーカーは持たず、スライス長で終わりを表す。

// バンク選択
pub const BANK_SEL: u8 = 0xFF;
pub const BANK_DSP: u8 = 0x00;
pub const BANK_SENSOR: u8 = 0x01;

// DSP バンク
pub const R_BYPASS: u8 = 0x05;
pub const R_BYPASS_DSP_EN: u8 = 0x00;
pub const R_BYPASS_DSP_BYPASS: u8 = 0x01;
pub const QS: u8 = 0x44;
pub const CTRLI: u8 = 0x50;
pub const HSIZE: u8 = 0x51;
pub const VSIZE: u8 = 0x52;
pub const XOFFL: u8 = 0x53;
pub const YOFFL: u8 = 0x54;
pub const VHYX: u8 = 0x55;
pub const TEST: u8 = 0x57;
pub const ZMOW: u8 = 0x5A;
pub const ZMOH: u8 = 0x5B;
pub const ZMHH: u8 = 0x5C;
pub const BPADDR: u8 = 0x7C;
pub const BPDATA: u8 = 0x7D;
pub const CTRL2: u8 = 0x86;
pub const SIZEL: u8 = 0x8C;
pub const HSIZE8: u8 = 0xC0;
pub const VSIZE8: u8 = 0xC1;
pub const AWB_CTRL: u8 = 0xC7;
pub const AWB_GAIN_R: u8 = 0xCC;
pub const AWB_GAIN_G: u8 = 0xCD;
pub const AWB_GAIN_B: u8 = 0xCE;
pub const R_DVP_SP: u8 = 0xD3;
pub const IMAGE_MODE: u8 = 0xDA;
pub const RESET: u8 = 0xE0;
pub const RESET_DVP: u8 = 0x04;

// センサーバンク
pub const COM1: u8 = 0x03;
pub const REG04: u8 = 0x04;
pub const REG04_HFLIP_IMG: u8 = 0x80;
pub const REG04_VFLIP_IMG: u8 = 0x40;
pub const REG04_VREF_EN: u8 = 0x10;
pub const REG04_AEC_LOW: u8 = 0x03;
pub const PIDH: u8 = 0x0A;
pub const PIDL: u8 = 0x0B;
pub const COM4: u8 = 0x0D;
pub const AEC: u8 = 0x10;
pub const CLKRC: u8 = 0x11;
/// クロック倍速（夜間モード解除時）
pub const CLKRC_DOUBLE: u8 = 0x80;
pub const COM7: u8 = 0x12;
pub const COM7_SRST: u8 = 0x80;
pub const COM7_RES_UXGA: u8 = 0x00;
pub const COM7_RES_SVGA: u8 = 0x40;
pub const COM7_COLOR_BAR: u8 = 0x02;
pub const COM8: u8 = 0x13;
pub const COM8_DEFAULT: u8 = 0xC0;
pub const COM8_BNDF_EN: u8 = 0x20;
pub const COM8_AGC_EN: u8 = 0x04;
pub const COM8_AEC_EN: u8 = 0x01;
pub const HSTART: u8 = 0x17;
pub const HSTOP: u8 = 0x18;
pub const VSTART: u8 = 0x19;
pub const VSTOP: u8 = 0x1A;
pub const MIDH: u8 = 0x1C;
pub const MIDL: u8 = 0x1D;
pub const REG32: u8 = 0x32;
pub const ARCOM2: u8 = 0x34;
pub const REG45: u8 = 0x45;
pub const REG45_AEC_HIGH: u8 = 0x3F;
pub const BD50: u8 = 0x4F;
pub const BD60: u8 = 0x50;

/// OV2640 の PID 上位バイト
pub const OV2640_PID_HIGH: u8 = 0x26;

/// SVGA系（幅 800 以下）とUXGA系テンプレートの境界
pub const SVGA_WIDTH_THRESHOLD: u16 = 800;

/// 手動露出の上限値
pub const EXPOSURE_MAX_SVGA: u16 = 672;
pub const EXPOSURE_MAX_UXGA: u16 = 1248;

/// `COM8` に常に立てるビットを付加する
pub const fn com8_set(bits: u8) -> u8 {
    COM8_DEFAULT | bits
}

/// ソフトリセット直後に流すデフォルト設定（低速クロック）
pub const RESET_DEFAULTS: &[(u8, u8)] = &[
    (BANK_SEL, BANK_DSP),
    (0x2C, 0xFF),
    (0x2E, 0xDF),
    (BANK_SEL, BANK_SENSOR),
    (0x3C, 0x32),
    (CLKRC, 0x01),
    (0x09, 0x02),
    (REG04, 0x28),
    (COM8, com8_set(COM8_BNDF_EN | COM8_AGC_EN | COM8_AEC_EN)),
    (0x14, 0x48),
    (0x2C, 0x0C),
    (0x33, 0x78),
    (0x3A, 0x33),
    (0x3B, 0xFB),
    (0x3E, 0x00),
    (0x43, 0x11),
    (0x16, 0x10),
    (0x39, 0x02),
    (0x35, 0x88),
    (0x22, 0x0A),
    (0x37, 0x40),
    (0x23, 0x00),
    (ARCOM2, 0xA0),
    (0x06, 0x02),
    (0x07, 0xC0),
    (COM4, 0xB7),
    (0x0E, 0x01),
    (0x4C, 0x00),
    (0x4A, 0x81),
    (0x21, 0x99),
    (0x24, 0x40),
    (0x25, 0x38),
    (0x26, 0x82),
    (0x5C, 0x00),
    (0x63, 0x00),
    (0x46, 0x22),
    (0x0C, 0x3A),
    (0x5D, 0x55),
    (0x5E, 0x7D),
    (0x5F, 0x7D),
    (0x60, 0x55),
    (0x61, 0x70),
    (0x62, 0x80),
    (0x7C, 0x05),
    (0x20, 0x80),
    (0x28, 0x30),
    (0x6C, 0x00),
    (0x6D, 0x80),
    (0x6E, 0x00),
    (0x70, 0x02),
    (0x71, 0x94),
    (0x73, 0xC1),
    (0x3D, 0x34),
    (0x5A, 0x57),
    (BANK_SEL, BANK_DSP),
    (0xE5, 0x7F),
    (0xF9, 0xC0),
    (0x41, 0x24),
    (RESET, 0x14),
    (0x76, 0xFF),
    (0x33, 0xA0),
    (0x42, 0x20),
    (0x43, 0x18),
    (0x4C, 0x00),
    (0x87, 0xD0),
    (0x88, 0x3F),
    (0xD7, 0x03),
    (0xD9, 0x10),
    (R_DVP_SP, 0x82),
    (0xC8, 0x08),
    (0xC9, 0x80),
    (0xC2, 0x0C),
    (QS, 0x0C),
    (RESET, 0x00),
];

/// 幅 800 以下で使うベーステンプレート
pub const SVGA_BASE: &[(u8, u8)] = &[
    (BANK_SEL, BANK_DSP),
    (RESET, RESET_DVP),
    (R_BYPASS, R_BYPASS_DSP_BYPASS),
    (BANK_SEL, BANK_SENSOR),
    (COM7, COM7_RES_SVGA),
    (COM1, 0x0A),
    (REG32, 0x09),
    (HSTART, 0x11),
    (HSTOP, 0x43),
    (VSTART, 0x00),
    (VSTOP, 0x25),
    (BD50, 0xCA),
    (BD60, 0xA8),
    (0x5A, 0x23),
    (0x6D, 0x00),
    (0x3D, 0x38),
    (0x39, 0x92),
    (0x35, 0xDA),
    (0x22, 0x1A),
    (0x37, 0xC3),
    (0x23, 0x00),
    (ARCOM2, 0xC0),
    (0x06, 0x88),
    (0x07, 0xC0),
    (COM4, 0x87),
    (0x0E, 0x41),
    (0x42, 0x03),
    (0x4C, 0x00),
    (BANK_SEL, BANK_DSP),
    (RESET, RESET_DVP),
    (HSIZE8, 0x64),
    (VSIZE8, 0x4B),
    (SIZEL, 0x00),
    (HSIZE, 0xC8),
    (VSIZE, 0x96),
    (XOFFL, 0x00),
    (YOFFL, 0x00),
    (VHYX, 0x00),
    (TEST, 0x00),
    (CTRL2, 0x3D),
    (CTRLI, 0x80),
    (R_DVP_SP, 0x08),
    (RESET, 0x00),
];

/// 幅 800 超で使うベーステンプレート
pub const UXGA_BASE: &[(u8, u8)] = &[
    (BANK_SEL, BANK_DSP),
    (RESET, RESET_DVP),
    (R_BYPASS, R_BYPASS_DSP_BYPASS),
    (BANK_SEL, BANK_SENSOR),
    (COM7, COM7_RES_UXGA),
    (COM1, 0x0F),
    (REG32, 0x36),
    (HSTART, 0x11),
    (HSTOP, 0x75),
    (VSTART, 0x01),
    (VSTOP, 0x97),
    (BD50, 0xBB),
    (BD60, 0x9C),
    (0x5A, 0x57),
    (0x6D, 0x80),
    (0x3D, 0x34),
    (0x39, 0x02),
    (0x35, 0x88),
    (0x22, 0x0A),
    (0x37, 0x40),
    (ARCOM2, 0xA0),
    (0x06, 0x02),
    (COM4, 0xB7),
    (0x0E, 0x01),
    (0x42, 0x83),
    (BANK_SEL, BANK_DSP),
    (RESET, RESET_DVP),
    (HSIZE8, 0xC8),
    (VSIZE8, 0x96),
    (SIZEL, 0x00),
    (HSIZE, 0x90),
    (VSIZE, 0x2C),
    (XOFFL, 0x00),
    (YOFFL, 0x00),
    (VHYX, 0x88),
    (TEST, 0x00),
    (CTRL2, 0x3D),
    (CTRLI, 0x00),
    (R_DVP_SP, 0x00),
    (RESET, 0x00),
];

pub const RGB565_REGS: &[(u8, u8)] = &[
    (BANK_SEL, BANK_DSP),
    (RESET, RESET_DVP),
    (IMAGE_MODE, 0x08),
    (0xD7, 0x03),
    (0xE1, 0x77),
    (RESET, 0x00),
];

pub const YUV422_REGS: &[(u8, u8)] = &[
    (BANK_SEL, BANK_DSP),
    (RESET, RESET_DVP),
    (IMAGE_MODE, 0x00),
    (0xD7, 0x03),
    (0x33, 0xA0),
    (0xE5, 0x1F),
    (0xE1, 0x67),
    (RESET, 0x00),
];

/// JPEG 用の全体チューニング
pub const JPEG_INIT: &[(u8, u8)] = &[
    (BANK_SEL, BANK_DSP),
    (0x2C, 0xFF),
    (0x2E, 0xDF),
    (BANK_SEL, BANK_SENSOR),
    (0x3C, 0x32),
    (CLKRC, 0x03),
    (0x09, 0x02),
    (REG04, 0x28),
    (COM8, 0xE5),
    (0x14, 0x48),
    (0x2C, 0x0C),
    (0x33, 0x78),
    (0x3A, 0x33),
    (0x3B, 0xFB),
    (0x3E, 0x00),
    (0x43, 0x11),
    (0x16, 0x10),
    (0x39, 0x92),
    (0x35, 0xDA),
    (0x22, 0x1A),
    (0x37, 0xC3),
    (0x23, 0x00),
    (ARCOM2, 0xC0),
    (0x36, 0x1A),
    (0x06, 0x88),
    (0x07, 0xC0),
    (COM4, 0x87),
    (0x0E, 0x41),
    (0x4C, 0x00),
    (0x48, 0x00),
    (0x5B, 0x00),
    (0x42, 0x03),
    (0x4A, 0x81),
    (0x21, 0x99),
    (0x24, 0x40),
    (0x25, 0x38),
    (0x26, 0x82),
    (0x5C, 0x00),
    (0x63, 0x00),
    (0x61, 0x70),
    (0x62, 0x80),
    (0x7C, 0x05),
    (0x20, 0x80),
    (0x28, 0x30),
    (0x6C, 0x00),
    (0x6D, 0x80),
    (0x6E, 0x00),
    (0x70, 0x02),
    (0x71, 0x94),
    (0x73, 0xC1),
    (HSTART, 0x11),
    (HSTOP, 0x43),
    (VSTART, 0x00),
    (VSTOP, 0x4B),
    (REG32, 0x09),
    (0x37, 0xC0),
    (BD50, 0x60),
    (BD60, 0xA8),
    (0x6D, 0x00),
    (0x3D, 0x38),
    (0x46, 0x3F),
    (0x0C, 0x3C),
    (BANK_SEL, BANK_DSP),
    (0xE5, 0x7F),
    (0xF9, 0xC0),
    (0x41, 0x24),
    (RESET, 0x14),
    (0x76, 0xFF),
    (0x33, 0xA0),
    (0x42, 0x20),
    (0x43, 0x18),
    (0x4C, 0x00),
    (0x87, 0xD5),
    (0x88, 0x3F),
    (0xD7, 0x03),
    (0xD9, 0x10),
    (R_DVP_SP, 0x82),
    (0xC8, 0x08),
    (0xC9, 0x80),
    (BPADDR, 0x00),
    (BPDATA, 0x00),
    (BPADDR, 0x03),
    (BPDATA, 0x48),
    (BPDATA, 0x48),
    (BPADDR, 0x08),
    (BPDATA, 0x20),
    (BPDATA, 0x10),
    (BPDATA, 0x0E),
    (0x90, 0x00),
    (0x91, 0x0E),
    (0x91, 0x1A),
    (0x91, 0x31),
    (0x91, 0x5A),
    (0x91, 0x69),
    (0x91, 0x75),
    (0x91, 0x7E),
    (0x91, 0x88),
    (0x91, 0x8F),
    (0x91, 0x96),
    (0x91, 0xA3),
    (0x91, 0xAF),
    (0x91, 0xC4),
    (0x91, 0xD7),
    (0x91, 0xE8),
    (0x91, 0x20),
    (0x92, 0x00),
    (0x93, 0x06),
    (0x93, 0xE3),
    (0x93, 0x05),
    (0x93, 0x05),
    (0x93, 0x00),
    (0x93, 0x04),
    (0x93, 0x00),
    (0x93, 0x00),
    (0x93, 0x00),
    (0x93, 0x00),
    (0x93, 0x00),
    (0x93, 0x00),
    (0x93, 0x00),
    (0x96, 0x00),
    (0x97, 0x08),
    (0x97, 0x19),
    (0x97, 0x02),
    (0x97, 0x0C),
    (0x97, 0x24),
    (0x97, 0x30),
    (0x97, 0x28),
    (0x97, 0x26),
    (0x97, 0x02),
    (0x97, 0x98),
    (0x97, 0x80),
    (0x97, 0x00),
    (0x97, 0x00),
    (0xC3, 0xED),
    (0xA4, 0x00),
    (0xA8, 0x00),
    (0xC5, 0x11),
    (0xC6, 0x51),
    (0xBF, 0x80),
    (AWB_CTRL, 0x10),
    (0xB6, 0x66),
    (0xB8, 0xA5),
    (0xB7, 0x64),
    (0xB9, 0x7C),
    (0xB3, 0xAF),
    (0xB4, 0x97),
    (0xB5, 0xFF),
    (0xB0, 0xC5),
    (0xB1, 0x94),
    (0xB2, 0x0F),
    (0xC4, 0x5C),
    (HSIZE8, 0x64),
    (VSIZE8, 0x4B),
    (SIZEL, 0x00),
    (CTRL2, 0x3D),
    (CTRLI, 0x00),
    (HSIZE, 0xC8),
    (VSIZE, 0x96),
    (XOFFL, 0x00),
    (YOFFL, 0x00),
    (VHYX, 0x00),
    (R_DVP_SP, 0x7F),
    (0xC3, 0xED),
    (0x7F, 0x00),
    (IMAGE_MODE, 0x00),
    (0xE5, 0x1F),
    (0xE1, 0x67),
    (RESET, 0x00),
    (0xDD, 0x7F),
    (R_BYPASS, R_BYPASS_DSP_EN),
];

/// JPEG 前段の色空間選択（YUV422）
pub const JPEG_YUV422: &[(u8, u8)] = &[
    (BANK_SEL, BANK_DSP),
    (R_BYPASS, R_BYPASS_DSP_EN),
    (IMAGE_MODE, 0x10),
    (0xD7, 0x03),
    (0xDF, 0x00),
    (0x33, 0x80),
    (0x3C, 0x40),
    (0xE1, 0x77),
];

/// JPEG 圧縮の有効化
pub const JPEG_ENABLE: &[(u8, u8)] = &[
    (BANK_SEL, BANK_DSP),
    (RESET, 0x14),
    (0xE1, 0x77),
    (0xE5, 0x1F),
    (0xD7, 0x03),
    (IMAGE_MODE, 0x10),
    (RESET, 0x00),
    (BANK_SEL, BANK_SENSOR),
    (REG04, 0x08),
];

/// 小さいフレーム向け JPEG チューニング（幅 800 以下）
pub const JPEG_TUNING_SMALL: &[(u8, u8)] = &[
    (BANK_SEL, BANK_SENSOR),
    (COM7, COM7_RES_SVGA),
    (HSTART, 0x11),
    (HSTOP, 0x43),
    (VSTART, 0x00),
    (VSTOP, 0x4B),
    (REG32, 0x09),
    (BD50, 0xCA),
    (BD60, 0xA8),
    (0x5A, 0x23),
    (0x6D, 0x00),
    (0x39, 0x12),
    (0x35, 0xDA),
    (0x22, 0x1A),
    (0x37, 0xC3),
    (0x23, 0x00),
    (ARCOM2, 0xC0),
    (0x36, 0x1A),
    (0x06, 0x88),
    (0x07, 0xC0),
    (COM4, 0x87),
    (0x0E, 0x41),
    (0x4C, 0x00),
    (BANK_SEL, BANK_DSP),
    (RESET, RESET_DVP),
    (HSIZE8, 0x64),
    (VSIZE8, 0x4B),
    (CTRL2, 0x35),
    (CTRLI, 0x92),
    (HSIZE, 0xC8),
    (VSIZE, 0x96),
    (RESET, 0x00),
];

/// 大きいフレーム向け JPEG チューニング（幅 800 超）
pub const JPEG_TUNING_LARGE: &[(u8, u8)] = &[
    (BANK_SEL, BANK_SENSOR),
    (CLKRC, 0x04),
    (COM7, COM7_RES_UXGA),
    (HSTART, 0x11),
    (HSTOP, 0x75),
    (REG32, 0x36),
    (VSTART, 0x01),
    (VSTOP, 0x97),
    (COM1, 0x0F),
    (0x37, 0x40),
    (BD50, 0xBB),
    (BD60, 0x9C),
    (0x5A, 0x5F),
    (0x6D, 0x80),
    (0x3D, 0x34),
    (0x39, 0x02),
    (0x35, 0x88),
    (0x22, 0x0A),
    (ARCOM2, 0xA0),
    (0x06, 0x02),
    (COM4, 0xB7),
    (0x0E, 0x01),
    (BANK_SEL, BANK_DSP),
    (RESET, RESET_DVP),
    (HSIZE8, 0xA0),
    (VSIZE8, 0x5A),
    (CTRL2, 0x01),
    (CTRLI, 0x00),
    (HSIZE, 0x90),
    (VSIZE, 0x2C),
    (XOFFL, 0x00),
    (YOFFL, 0x02),
    (VHYX, 0x88),
    (TEST, 0x00),
    (R_DVP_SP, 0x02),
    (RESET, 0x00),
    (BANK_SEL, BANK_SENSOR),
    (REG04, 0x08),
    (BANK_SEL, BANK_DSP),
    (IMAGE_MODE, 0x10),
    (RESET, 0x00),
];

/// 特殊効果テーブル（SDE 0x00 / 0x05 / 0x05+1）
pub const EFFECTS: [[u8; 3]; 9] = [
    [0x00, 0x80, 0x80], // ノーマル
    [0x18, 0xA0, 0x40], // 青み
    [0x18, 0x40, 0xC0], // 赤み
    [0x18, 0x80, 0x80], // 白黒
    [0x18, 0x40, 0xA6], // セピア
    [0x40, 0x80, 0x80], // ネガ
    [0x18, 0x50, 0x50], // 緑み
    [0x58, 0x80, 0x80], // 白黒ネガ
    [0x00, 0x80, 0x80], // ノーマル
];

/// 明るさ -2..=2
pub const BRIGHTNESS_LEVELS: [u8; 5] = [0x00, 0x10, 0x20, 0x30, 0x40];

/// コントラスト -2..=2 (SDE 0x07 の 2 バイト)
pub const CONTRAST_LEVELS: [[u8; 2]; 5] = [
    [0x18, 0x34],
    [0x1C, 0x2A],
    [0x20, 0x20],
    [0x24, 0x16],
    [0x28, 0x0C],
];

/// 彩度 -2..=2
pub const SATURATION_LEVELS: [u8; 5] = [0x28, 0x38, 0x48, 0x58, 0x68];

/// ホワイトバランスプリセット (R, G, B ゲイン)
pub const LIGHT_MODE_GAINS: [[u8; 3]; 5] = [
    [0x5E, 0x41, 0x54], // Auto (ゲインは未使用)
    [0x5E, 0x41, 0x54], // Sunny
    [0x65, 0x41, 0x4F], // Cloudy
    [0x52, 0x41, 0x66], // Office
    [0x42, 0x3F, 0x71], // Home
];
