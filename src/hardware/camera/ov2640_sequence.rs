use super::ov2640_regs::*;
use super::types::{Bank, Level, LightMode};

/// 1 回のレジスタ書き込み
///
/// `mask` が `0xFF` 以外の場合は読み出し→変更→書き戻しになる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegWrite {
    pub reg: u8,
    pub mask: u8,
    pub value: u8,
}

impl RegWrite {
    pub const fn full(reg: u8, value: u8) -> Self {
        RegWrite {
            reg,
            mask: 0xFF,
            value,
        }
    }

    pub const fn masked(reg: u8, mask: u8, value: u8) -> Self {
        RegWrite { reg, mask, value }
    }

    pub fn is_masked(&self) -> bool {
        self.mask != 0xFF
    }

    /// 既存値にマスクを適用した結果
    pub fn merge(&self, current: u8) -> u8 {
        (current & !self.mask) | (self.value & self.mask)
    }
}

pub fn bank_select(bank: Bank) -> RegWrite {
    RegWrite::full(BANK_SEL, bank.select_value())
}

/// DSP をバイパスする（レジスタ更新中のティアリング防止）
pub fn dsp_bypass_sequence() -> [RegWrite; 2] {
    [
        bank_select(Bank::Dsp),
        RegWrite::full(R_BYPASS, R_BYPASS_DSP_BYPASS),
    ]
}

pub fn dsp_enable_sequence() -> [RegWrite; 2] {
    [
        bank_select(Bank::Dsp),
        RegWrite::full(R_BYPASS, R_BYPASS_DSP_EN),
    ]
}

/// 出力サイズ (ZMOW/ZMOH/ZMHH)
pub fn output_size_sequence(width: u16, height: u16) -> [RegWrite; 4] {
    [
        bank_select(Bank::Dsp),
        RegWrite::full(ZMOW, ((width >> 2) & 0xFF) as u8),
        RegWrite::full(ZMOH, ((height >> 2) & 0xFF) as u8),
        RegWrite::full(
            ZMHH,
            (((height >> 8) & 0x04) | ((width >> 10) & 0x03)) as u8,
        ),
    ]
}

/// ZMOW/ZMOH/ZMHH から出力サイズを復元する
pub fn decode_output_size(zmow: u8, zmoh: u8, zmhh: u8) -> (u16, u16) {
    let width = ((zmow as u16) << 2) | (((zmhh & 0x03) as u16) << 10);
    let height = ((zmoh as u16) << 2) | (((zmhh & 0x04) as u16) << 8);
    (width, height)
}

pub fn quality_sequence(quality: u8) -> [RegWrite; 2] {
    [bank_select(Bank::Dsp), RegWrite::full(QS, quality)]
}

pub fn brightness_sequence(level: Level) -> [RegWrite; 6] {
    [
        bank_select(Bank::Dsp),
        RegWrite::full(BPADDR, 0x00),
        RegWrite::full(BPDATA, 0x04),
        RegWrite::full(BPADDR, 0x09),
        RegWrite::full(BPDATA, BRIGHTNESS_LEVELS[level.index()]),
        RegWrite::full(BPDATA, 0x00),
    ]
}

pub fn contrast_sequence(level: Level) -> [RegWrite; 8] {
    let [a, b] = CONTRAST_LEVELS[level.index()];
    [
        bank_select(Bank::Dsp),
        RegWrite::full(BPADDR, 0x00),
        RegWrite::full(BPDATA, 0x04),
        RegWrite::full(BPADDR, 0x07),
        RegWrite::full(BPDATA, 0x20),
        RegWrite::full(BPDATA, a),
        RegWrite::full(BPDATA, b),
        RegWrite::full(BPDATA, 0x06),
    ]
}

pub fn saturation_sequence(level: Level) -> [RegWrite; 6] {
    let s = SATURATION_LEVELS[level.index()];
    [
        bank_select(Bank::Dsp),
        RegWrite::full(BPADDR, 0x00),
        RegWrite::full(BPDATA, 0x02),
        RegWrite::full(BPADDR, 0x03),
        RegWrite::full(BPDATA, s),
        RegWrite::full(BPDATA, s),
    ]
}

/// `effect` は `EFFECTS` の範囲内であること
pub fn effect_sequence(effect: usize) -> [RegWrite; 6] {
    let [sde, u, v] = EFFECTS[effect];
    [
        bank_select(Bank::Dsp),
        RegWrite::full(BPADDR, 0x00),
        RegWrite::full(BPDATA, sde),
        RegWrite::full(BPADDR, 0x05),
        RegWrite::full(BPDATA, u),
        RegWrite::full(BPDATA, v),
    ]
}

pub fn light_mode_sequence(mode: LightMode) -> Vec<RegWrite> {
    let mut writes = vec![bank_select(Bank::Dsp)];
    if mode == LightMode::Auto {
        writes.push(RegWrite::full(AWB_CTRL, 0x00));
    } else {
        let [r, g, b] = LIGHT_MODE_GAINS[mode.index()];
        writes.push(RegWrite::full(AWB_CTRL, 0x40));
        writes.push(RegWrite::full(AWB_GAIN_R, r));
        writes.push(RegWrite::full(AWB_GAIN_G, g));
        writes.push(RegWrite::full(AWB_GAIN_B, b));
    }
    writes
}

/// 左右/上下反転（REG04 の該当ビットのみ変更）
pub fn orientation_sequence(mirror: bool, flip: bool) -> [RegWrite; 3] {
    let vflip_bits = REG04_VFLIP_IMG | REG04_VREF_EN;
    [
        bank_select(Bank::Sensor),
        RegWrite::masked(REG04, REG04_HFLIP_IMG, if mirror { REG04_HFLIP_IMG } else { 0 }),
        RegWrite::masked(REG04, vflip_bits, if flip { vflip_bits } else { 0 }),
    ]
}

pub fn night_mode_sequence(enable: bool) -> [RegWrite; 2] {
    [
        bank_select(Bank::Sensor),
        RegWrite::full(CLKRC, if enable { 0x00 } else { CLKRC_DOUBLE }),
    ]
}

pub fn colorbar_sequence(enable: bool) -> [RegWrite; 2] {
    [
        bank_select(Bank::Sensor),
        RegWrite::masked(COM7, COM7_COLOR_BAR, if enable { COM7_COLOR_BAR } else { 0 }),
    ]
}

pub fn auto_exposure_sequence(enable: bool) -> [RegWrite; 2] {
    let value = if enable {
        com8_set(COM8_BNDF_EN | COM8_AGC_EN | COM8_AEC_EN)
    } else {
        com8_set(0)
    };
    [bank_select(Bank::Sensor), RegWrite::full(COM8, value)]
}

/// 手動露出値を REG45[5:0] / AEC / REG04[1:0] に分割して書き込む
pub fn manual_exposure_sequence(exposure: u16) -> [RegWrite; 5] {
    [
        bank_select(Bank::Sensor),
        RegWrite::full(COM8, com8_set(0)),
        RegWrite::masked(REG45, REG45_AEC_HIGH, ((exposure >> 10) & 0x3F) as u8),
        RegWrite::full(AEC, ((exposure >> 2) & 0xFF) as u8),
        RegWrite::masked(REG04, REG04_AEC_LOW, (exposure & 0x03) as u8),
    ]
}

/// REG45 / AEC / REG04 から露出値を組み立てる
pub fn decode_exposure(reg45: u8, aec: u8, reg04: u8) -> u16 {
    (((reg45 & REG45_AEC_HIGH) as u16) << 10) | ((aec as u16) << 2) | (reg04 & REG04_AEC_LOW) as u16
}

/// `(reg, value)` テーブルを書き込み列に変換する
pub fn table_sequence(table: &[(u8, u8)]) -> impl Iterator<Item = RegWrite> + '_ {
    table.iter().map(|&(reg, value)| RegWrite::full(reg, value))
}
