use std::sync::{Arc, Mutex};

use super::lock;
use crate::hardware::camera::ov2640_regs::{
    BANK_DSP, BANK_SEL, COM7, COM7_SRST, MIDH, MIDL, PIDH, PIDL,
};
use crate::hardware::camera::{Bank, RegisterBus};

/// 記録されたレジスタ書き込み
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusWrite {
    /// 書き込み時点で選択されていたバンク（バンク選択自体は選択前のバンク）
    pub bank: Bank,
    pub reg: u8,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("SCCB通信エラー (シミュレーション)")]
pub struct SimBusError;

#[derive(Debug)]
struct BusInner {
    dsp: [u8; 256],
    sensor: [u8; 256],
    bank: Bank,
    ids: (u16, u16),
    writes: Vec<BusWrite>,
    fail: bool,
}

impl BusInner {
    fn regs(&self, bank: Bank) -> &[u8; 256] {
        match bank {
            Bank::Dsp => &self.dsp,
            Bank::Sensor => &self.sensor,
        }
    }

    fn reset_sensor_bank(&mut self) {
        self.sensor = [0u8; 256];
        let (mid, pid) = self.ids;
        let [midh, midl] = mid.to_be_bytes();
        let [pidh, pidl] = pid.to_be_bytes();
        self.sensor[MIDH as usize] = midh;
        self.sensor[MIDL as usize] = midl;
        self.sensor[PIDH as usize] = pidh;
        self.sensor[PIDL as usize] = pidl;
    }
}

/// OV2640 のレジスタファイルを模した SCCB バス
///
/// DSP / センサーの 2 バンクを持ち、0xFF への書き込みでバンクを切り替える。
#[derive(Debug, Clone)]
pub struct SimSensorBus {
    inner: Arc<Mutex<BusInner>>,
}

impl Default for SimSensorBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SimSensorBus {
    pub const OV2640_MID: u16 = 0x7FA2;
    pub const OV2640_PID: u16 = 0x2642;

    pub fn new() -> Self {
        Self::with_ids(Self::OV2640_MID, Self::OV2640_PID)
    }

    pub fn with_ids(mid: u16, pid: u16) -> Self {
        let mut inner = BusInner {
            dsp: [0u8; 256],
            sensor: [0u8; 256],
            bank: Bank::Dsp,
            ids: (mid, pid),
            writes: Vec::new(),
            fail: false,
        };
        inner.reset_sensor_bank();
        SimSensorBus {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    pub fn writes(&self) -> Vec<BusWrite> {
        lock(&self.inner).writes.clone()
    }

    pub fn clear_writes(&self) {
        lock(&self.inner).writes.clear();
    }

    pub fn register(&self, bank: Bank, reg: u8) -> u8 {
        lock(&self.inner).regs(bank)[reg as usize]
    }

    pub fn set_register(&self, bank: Bank, reg: u8, value: u8) {
        let mut inner = lock(&self.inner);
        match bank {
            Bank::Dsp => inner.dsp[reg as usize] = value,
            Bank::Sensor => inner.sensor[reg as usize] = value,
        }
    }

    /// 両バンクのレジスタ内容
    pub fn snapshot(&self) -> (Vec<u8>, Vec<u8>) {
        let inner = lock(&self.inner);
        (inner.dsp.to_vec(), inner.sensor.to_vec())
    }

    pub fn selected_bank(&self) -> Bank {
        lock(&self.inner).bank
    }

    /// 以降の読み書きをすべて失敗させる
    pub fn set_fail(&self, fail: bool) {
        lock(&self.inner).fail = fail;
    }
}

impl RegisterBus for SimSensorBus {
    type Error = SimBusError;

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        let mut inner = lock(&self.inner);
        if inner.fail {
            return Err(SimBusError);
        }
        let bank = inner.bank;
        inner.writes.push(BusWrite { bank, reg, value });

        if reg == BANK_SEL {
            inner.bank = if value == BANK_DSP { Bank::Dsp } else { Bank::Sensor };
            inner.dsp[BANK_SEL as usize] = value;
            inner.sensor[BANK_SEL as usize] = value;
            return Ok(());
        }

        match bank {
            Bank::Dsp => inner.dsp[reg as usize] = value,
            Bank::Sensor if reg == COM7 && value & COM7_SRST != 0 => {
                inner.reset_sensor_bank();
                inner.sensor[COM7 as usize] = value & !COM7_SRST;
            }
            Bank::Sensor => inner.sensor[reg as usize] = value,
        }
        Ok(())
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, Self::Error> {
        let inner = lock(&self.inner);
        if inner.fail {
            return Err(SimBusError);
        }
        Ok(inner.regs(inner.bank)[reg as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_select_routes_writes() {
        let mut bus = SimSensorBus::new();
        bus.write_register(BANK_SEL, 0x01).unwrap();
        bus.write_register(0x10, 0xAB).unwrap();
        bus.write_register(BANK_SEL, 0x00).unwrap();
        bus.write_register(0x10, 0xCD).unwrap();

        assert_eq!(bus.register(Bank::Sensor, 0x10), 0xAB);
        assert_eq!(bus.register(Bank::Dsp, 0x10), 0xCD);
        assert_eq!(bus.writes()[1].bank, Bank::Sensor);
    }

    #[test]
    fn soft_reset_clears_sensor_bank_but_keeps_ids() {
        let mut bus = SimSensorBus::new();
        bus.write_register(BANK_SEL, 0x01).unwrap();
        bus.write_register(0x10, 0xAB).unwrap();
        bus.write_register(COM7, COM7_SRST).unwrap();
        assert_eq!(bus.register(Bank::Sensor, 0x10), 0x00);
        assert_eq!(bus.read_register(PIDH).unwrap(), 0x26);
        assert_eq!(bus.register(Bank::Sensor, COM7), 0x00);
    }

    #[test]
    fn failing_bus_reports_errors() {
        let mut bus = SimSensorBus::new();
        bus.set_fail(true);
        assert_eq!(bus.write_register(0x00, 0x00), Err(SimBusError));
        assert_eq!(bus.read_register(0x00), Err(SimBusError));
        assert!(bus.writes().is_empty());
    }
}
