//! OV2640 センサー設定エンジン
//!
//! センサー状態 ([`SensorState`]) を保持し、目標状態に到達するための
//! レジスタ書き込み列を発行する。
//!
//! - すべてのセッターは入力を検証してから書き込む（不正値では何も書かない）
//! - DSP レジスタに触れる操作は「DSP バイパス → 書き込み → DSP 有効化」で囲む
//! - バンク依存の書き込みの前には必ず同じ操作内でバンク選択を書く

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use super::ov2640_regs::*;
use super::ov2640_sequence::*;
use super::sccb::RegisterBus;
use super::types::{
    Bank, ExposureRequest, FrameSize, Level, LightMode, PixelFormat, PreviewProfile,
    SensorState, SnapshotProfile,
};
use crate::core::error::CameraError;

pub const QUALITY_MIN: u8 = 2;
pub const QUALITY_MAX: u8 = 60;

/// JPEG 各段の間に入れる待機
const JPEG_STAGE_SETTLE_MS: u32 = 20;
const FORMAT_SETTLE_MS: u32 = 30;

pub struct Ov2640<B: RegisterBus, D: DelayNs> {
    bus: B,
    delay: D,
    state: SensorState,
}

impl<B: RegisterBus, D: DelayNs> Ov2640<B, D> {
    pub fn new(bus: B, delay: D) -> Self {
        Ov2640 {
            bus,
            delay,
            state: SensorState::default(),
        }
    }

    pub fn state(&self) -> &SensorState {
        &self.state
    }

    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    /// ソフトリセットしてデフォルト設定を書き込む
    pub fn reset(&mut self) -> Result<(), CameraError> {
        info!("OV2640 をソフトリセットします");
        self.apply([bank_select(Bank::Sensor), RegWrite::full(COM7, COM7_SRST)])?;
        self.delay.delay_ms(5);
        self.apply_table(RESET_DEFAULTS)?;
        self.delay.delay_ms(30);

        let active_bank = self.state.active_bank;
        self.state = SensorState {
            active_bank,
            ..SensorState::default()
        };
        Ok(())
    }

    /// (製造者ID, デバイスID) を読み出す
    pub fn get_ids(&mut self) -> Result<(u16, u16), CameraError> {
        self.apply([bank_select(Bank::Sensor)])?;
        let midh = self.read(MIDH)?;
        let midl = self.read(MIDL)?;
        let pidh = self.read(PIDH)?;
        let pidl = self.read(PIDL)?;
        Ok((
            u16::from_be_bytes([midh, midl]),
            u16::from_be_bytes([pidh, pidl]),
        ))
    }

    pub fn verify_id(&mut self) -> Result<(), CameraError> {
        let (mid, pid) = self.get_ids()?;
        info!("センサーID: MID=0x{:04X}, PID=0x{:04X}", mid, pid);
        if (pid >> 8) as u8 != OV2640_PID_HIGH {
            return Err(CameraError::UnknownSensor(pid));
        }
        Ok(())
    }

    pub fn set_resolution(&mut self, size: FrameSize) -> Result<(), CameraError> {
        if !size.is_allowed() {
            return Err(CameraError::InvalidParameter(format!(
                "フレームサイズ {} には対応していません",
                size
            )));
        }

        if self.state.pixel_format == PixelFormat::Jpeg {
            // JPEG チューニングは解像度ごとに異なるため形式ごと適用し直す
            return self.configure(size, PixelFormat::Jpeg);
        }

        self.apply_frame_size(size)?;
        self.delay.delay_ms(FORMAT_SETTLE_MS);
        self.state.frame_size = size;
        info!("解像度を {} に設定しました", size);
        Ok(())
    }

    pub fn set_pixel_format(&mut self, format: PixelFormat) -> Result<(), CameraError> {
        self.configure(self.state.frame_size, format)
    }

    pub fn set_quality(&mut self, quality: u8) -> Result<(), CameraError> {
        if !(QUALITY_MIN..=QUALITY_MAX).contains(&quality) {
            return Err(CameraError::InvalidParameter(format!(
                "JPEG品質は {}-{} の範囲で指定してください: {}",
                QUALITY_MIN, QUALITY_MAX, quality
            )));
        }
        self.with_dsp_bypassed(|s| s.apply(quality_sequence(quality)))?;
        self.state.quality = quality;
        Ok(())
    }

    pub fn set_brightness(&mut self, level: i8) -> Result<(), CameraError> {
        let level = validate_level("明るさ", level)?;
        self.with_dsp_bypassed(|s| s.apply(brightness_sequence(level)))?;
        self.state.brightness = level;
        Ok(())
    }

    pub fn set_contrast(&mut self, level: i8) -> Result<(), CameraError> {
        let level = validate_level("コントラスト", level)?;
        self.with_dsp_bypassed(|s| s.apply(contrast_sequence(level)))?;
        self.state.contrast = level;
        Ok(())
    }

    pub fn set_saturation(&mut self, level: i8) -> Result<(), CameraError> {
        let level = validate_level("彩度", level)?;
        self.with_dsp_bypassed(|s| s.apply(saturation_sequence(level)))?;
        self.state.saturation = level;
        Ok(())
    }

    pub fn set_effect(&mut self, effect: u8) -> Result<(), CameraError> {
        if effect as usize >= EFFECTS.len() {
            return Err(CameraError::InvalidParameter(format!(
                "特殊効果IDは 0-{} の範囲で指定してください: {}",
                EFFECTS.len() - 1,
                effect
            )));
        }
        self.with_dsp_bypassed(|s| s.apply(effect_sequence(effect as usize)))?;
        self.state.effect = effect;
        Ok(())
    }

    pub fn set_light_mode(&mut self, mode: LightMode) -> Result<(), CameraError> {
        self.with_dsp_bypassed(|s| s.apply(light_mode_sequence(mode)))?;
        self.state.light_mode = mode;
        Ok(())
    }

    pub fn set_mirror(&mut self, enable: bool) -> Result<(), CameraError> {
        self.apply(orientation_sequence(enable, self.state.flip))?;
        self.state.mirror = enable;
        Ok(())
    }

    pub fn set_flip(&mut self, enable: bool) -> Result<(), CameraError> {
        self.apply(orientation_sequence(self.state.mirror, enable))?;
        self.state.flip = enable;
        Ok(())
    }

    pub fn set_night_mode(&mut self, enable: bool) -> Result<(), CameraError> {
        self.with_dsp_bypassed(|s| s.apply(night_mode_sequence(enable)))?;
        self.delay.delay_ms(FORMAT_SETTLE_MS);
        self.state.night_mode = enable;
        Ok(())
    }

    pub fn set_colorbar(&mut self, enable: bool) -> Result<(), CameraError> {
        self.apply(colorbar_sequence(enable))?;
        self.state.colorbar = enable;
        Ok(())
    }

    /// 露出の読み出し / 自動露出切り替え / 手動設定
    ///
    /// `Read` と `Manual` は実際の露出値を返す。手動値は解像度に応じて
    /// 672 (幅 800 以下) または 1248 にクランプされる。
    pub fn exposure(&mut self, request: ExposureRequest) -> Result<Option<u16>, CameraError> {
        let max = if self.state.frame_size.is_small() {
            EXPOSURE_MAX_SVGA
        } else {
            EXPOSURE_MAX_UXGA
        };
        if request == ExposureRequest::Manual(0) {
            return Err(CameraError::InvalidParameter(
                "手動露出値は 1 以上で指定してください".to_string(),
            ));
        }

        self.with_dsp_bypassed(|s| match request {
            ExposureRequest::Read => {
                s.apply([bank_select(Bank::Sensor)])?;
                let reg45 = s.read(REG45)?;
                let aec = s.read(AEC)?;
                let reg04 = s.read(REG04)?;
                Ok(Some(decode_exposure(reg45, aec, reg04)))
            }
            ExposureRequest::AutoEnable => {
                s.apply(auto_exposure_sequence(true))?;
                Ok(None)
            }
            ExposureRequest::AutoDisable => {
                s.apply(auto_exposure_sequence(false))?;
                Ok(None)
            }
            ExposureRequest::Manual(value) => {
                let clamped = value.min(max);
                if clamped != value {
                    warn!("露出値 {} を上限 {} にクランプしました", value, max);
                }
                s.apply(manual_exposure_sequence(clamped))?;
                Ok(Some(clamped))
            }
        })
    }

    /// ZMOW/ZMOH/ZMHH から現在の出力サイズを読み出す
    pub fn output_size(&mut self) -> Result<(u16, u16), CameraError> {
        self.apply([bank_select(Bank::Dsp)])?;
        let zmow = self.read(ZMOW)?;
        let zmoh = self.read(ZMOH)?;
        let zmhh = self.read(ZMHH)?;
        Ok(decode_output_size(zmow, zmoh, zmhh))
    }

    /// プレビュー用初期化: リセット → 解像度 → RGB565 → 向き
    pub fn init_preview(&mut self, profile: &PreviewProfile) -> Result<(), CameraError> {
        if !profile.frame_size.is_allowed() {
            return Err(CameraError::InvalidParameter(format!(
                "プレビュー解像度 {} には対応していません",
                profile.frame_size
            )));
        }
        self.reset()?;
        self.configure(profile.frame_size, PixelFormat::Rgb565)?;
        self.set_mirror(profile.mirror)?;
        self.set_flip(profile.flip)?;
        info!("プレビュー設定完了: {}", profile.frame_size);
        Ok(())
    }

    /// スナップショット用初期化: 解像度 → JPEG → 品質 → 明るさ → 向き
    pub fn init_snapshot(&mut self, profile: &SnapshotProfile) -> Result<(), CameraError> {
        if !profile.frame_size.is_allowed() {
            return Err(CameraError::InvalidParameter(format!(
                "スナップショット解像度 {} には対応していません",
                profile.frame_size
            )));
        }
        if !(QUALITY_MIN..=QUALITY_MAX).contains(&profile.quality) {
            return Err(CameraError::InvalidParameter(format!(
                "JPEG品質が範囲外です: {}",
                profile.quality
            )));
        }
        validate_level("明るさ", profile.brightness)?;

        self.configure(profile.frame_size, PixelFormat::Jpeg)?;
        self.set_quality(profile.quality)?;
        self.set_brightness(profile.brightness)?;
        self.set_mirror(profile.mirror)?;
        self.set_flip(profile.flip)?;
        info!(
            "スナップショット設定完了: {} / 品質 {}",
            profile.frame_size, profile.quality
        );
        Ok(())
    }

    fn configure(&mut self, size: FrameSize, format: PixelFormat) -> Result<(), CameraError> {
        let previous = self.state.frame_size;
        self.state.frame_size = size;
        match self.apply_pixel_format(format) {
            Ok(()) => {
                self.state.pixel_format = format;
                info!("出力形式を {:?} / {} に設定しました", format, size);
                Ok(())
            }
            Err(e) => {
                self.state.frame_size = previous;
                Err(e)
            }
        }
    }

    fn apply_pixel_format(&mut self, format: PixelFormat) -> Result<(), CameraError> {
        let size = self.state.frame_size;
        self.apply(dsp_bypass_sequence())?;
        self.apply(auto_exposure_sequence(true))?;
        match format {
            PixelFormat::Rgb565 => self.apply_table(RGB565_REGS)?,
            PixelFormat::Yuv422 => self.apply_table(YUV422_REGS)?,
            PixelFormat::Jpeg => {
                // 順序はセンサー側の要求で入れ替え不可
                self.apply_table(JPEG_INIT)?;
                self.delay.delay_ms(JPEG_STAGE_SETTLE_MS);
                self.apply_table(JPEG_YUV422)?;
                self.delay.delay_ms(JPEG_STAGE_SETTLE_MS);
                self.apply_table(JPEG_ENABLE)?;
                self.delay.delay_ms(JPEG_STAGE_SETTLE_MS);
                self.apply_table(jpeg_tuning_table(size))?;
                self.delay.delay_ms(JPEG_STAGE_SETTLE_MS);
                self.apply(dsp_enable_sequence())?;
            }
        }
        // JPEG テーブルは REG04 と COM7 を上書きするため状態から戻す
        self.apply(orientation_sequence(self.state.mirror, self.state.flip))?;
        self.apply(colorbar_sequence(self.state.colorbar))?;
        self.restore_image_settings()?;
        self.apply_frame_size(size)?;
        self.delay.delay_ms(FORMAT_SETTLE_MS);
        Ok(())
    }

    /// 形式テーブルが上書きした画質設定を状態から書き戻す
    ///
    /// テーブルは SDE を無効・彩度を標準に戻すので、標準でない値だけを
    /// 書き直す。クロック分周はテーブルの値を優先し、夜間モード中のみ戻す。
    fn restore_image_settings(&mut self) -> Result<(), CameraError> {
        let state = self.state.clone();
        self.with_dsp_bypassed(|s| {
            s.apply(light_mode_sequence(state.light_mode))?;
            if state.saturation != Level::default() {
                s.apply(saturation_sequence(state.saturation))?;
            }
            if state.contrast != Level::default() {
                s.apply(contrast_sequence(state.contrast))?;
            }
            if state.brightness != Level::default() {
                s.apply(brightness_sequence(state.brightness))?;
            }
            if state.effect != 0 {
                s.apply(effect_sequence(state.effect as usize))?;
            }
            if state.night_mode {
                s.apply(night_mode_sequence(true))?;
            }
            Ok(())
        })
    }

    /// 解像度テンプレートと出力サイズを書き込む
    ///
    /// カラーバー (COM7) と品質 (QS) はテンプレートで崩れるため、
    /// 事前に退避して最後に戻す。
    fn apply_frame_size(&mut self, size: FrameSize) -> Result<(), CameraError> {
        let (width, height) = size.dimensions();

        self.apply([bank_select(Bank::Sensor)])?;
        let colorbar = self.read(COM7)? & COM7_COLOR_BAR;
        self.apply([bank_select(Bank::Dsp)])?;
        let quality = self.read(QS)?;

        let base = if size.is_small() { SVGA_BASE } else { UXGA_BASE };
        debug!(
            "解像度テンプレート適用: {}x{} ({})",
            width,
            height,
            if size.is_small() { "SVGA" } else { "UXGA" }
        );

        self.apply(dsp_bypass_sequence())?;
        self.apply(output_size_sequence(width, height))?;
        self.apply_table(base)?;
        self.apply([
            bank_select(Bank::Sensor),
            RegWrite::masked(COM7, COM7_COLOR_BAR, colorbar),
        ])?;
        self.apply([bank_select(Bank::Dsp), RegWrite::full(QS, quality)])?;
        self.apply(dsp_enable_sequence())
    }

    fn with_dsp_bypassed<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, CameraError>,
    ) -> Result<T, CameraError> {
        self.apply(dsp_bypass_sequence())?;
        let result = op(self);
        // 途中で失敗しても DSP は戻す
        let restored = self.apply(dsp_enable_sequence());
        let value = result?;
        restored?;
        Ok(value)
    }

    fn apply_table(&mut self, table: &[(u8, u8)]) -> Result<(), CameraError> {
        self.apply(table_sequence(table))
    }

    fn apply(&mut self, writes: impl IntoIterator<Item = RegWrite>) -> Result<(), CameraError> {
        for write in writes {
            let value = if write.is_masked() {
                let current = self.read(write.reg)?;
                write.merge(current)
            } else {
                write.value
            };
            self.write(write.reg, value)?;
        }
        Ok(())
    }

    fn write(&mut self, reg: u8, value: u8) -> Result<(), CameraError> {
        self.bus
            .write_register(reg, value)
            .map_err(CameraError::bus)?;
        if reg == BANK_SEL {
            self.state.active_bank = Some(if value == BANK_DSP {
                Bank::Dsp
            } else {
                Bank::Sensor
            });
        }
        Ok(())
    }

    fn read(&mut self, reg: u8) -> Result<u8, CameraError> {
        self.bus.read_register(reg).map_err(CameraError::bus)
    }
}

/// 現在の解像度に対応する JPEG チューニングテーブル
pub fn jpeg_tuning_table(size: FrameSize) -> &'static [(u8, u8)] {
    if size.is_small() {
        JPEG_TUNING_SMALL
    } else {
        JPEG_TUNING_LARGE
    }
}

fn validate_level(name: &str, level: i8) -> Result<Level, CameraError> {
    Level::new(level).ok_or_else(|| {
        CameraError::InvalidParameter(format!(
            "{}は {}..={} の範囲で指定してください: {}",
            name,
            Level::MIN,
            Level::MAX,
            level
        ))
    })
}
