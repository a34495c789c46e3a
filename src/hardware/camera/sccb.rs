//! SCCB (I2C 互換) 経由のレジスタアクセス

use embedded_hal::i2c::I2c;

/// OV2640 の 7bit アドレス
pub const OV2640_ADDR: u8 = 0x30;

/// 1 バイト単位のレジスタ読み書き
///
/// 1 回の呼び出しはアトミックとみなす。リトライはこの層では行わない。
pub trait RegisterBus {
    type Error: std::fmt::Debug;

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Self::Error>;
    fn read_register(&mut self, reg: u8) -> Result<u8, Self::Error>;
}

/// `embedded_hal::i2c::I2c` 上の SCCB バス
pub struct SccbBus<I: I2c> {
    i2c: I,
    address: u8,
}

impl<I: I2c> SccbBus<I> {
    pub fn new(i2c: I) -> Self {
        Self::with_address(i2c, OV2640_ADDR)
    }

    pub fn with_address(i2c: I, address: u8) -> Self {
        SccbBus { i2c, address }
    }

    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> RegisterBus for SccbBus<I> {
    type Error = I::Error;

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[reg, value])
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, Self::Error> {
        // SCCB はリピーテッドスタート非対応のため write と read を分ける
        let mut buf = [0u8];
        self.i2c.write(self.address, &[reg])?;
        self.i2c.read(self.address, &mut buf)?;
        Ok(buf[0])
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    type Error = B::Error;

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        (**self).write_register(reg, value)
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, Self::Error> {
        (**self).read_register(reg)
    }
}
