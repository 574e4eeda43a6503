//! JHD1313M1 RGB LCD.
//!
//! Two I2C devices on one module: an HD44780-style 16x2 character controller
//! at `0x3E` and a PCA9633-style backlight controller at `0x62`. Commands and
//! character data go to the LCD controller behind a control byte; the
//! backlight is plain register writes.

use std::thread::sleep;
use std::time::Duration;

use embedded_hal::i2c::I2c;
use thiserror::Error;

pub const LCD_ADDRESS: u8 = 0x3e;
pub const RGB_ADDRESS: u8 = 0x62;

/// Characters per display row.
pub const COLUMNS: usize = 16;

// control bytes for the LCD controller
const CONTROL_COMMAND: u8 = 0x80;
const CONTROL_DATA: u8 = 0x40;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_LTR: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0c;
const CMD_FUNCTION_SET_2LINE: u8 = 0x28;
const ROW_COMMANDS: [u8; 2] = [0x80, 0xc0];

// backlight controller registers
const REG_MODE1: u8 = 0x00;
const REG_MODE2: u8 = 0x01;
const REG_OUTPUT: u8 = 0x08;
const REG_BLUE: u8 = 0x02;
const REG_GREEN: u8 = 0x03;
const REG_RED: u8 = 0x04;

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("lcd bus write failed: {0}")]
    Bus(String),

    #[error("row {0} out of range")]
    BadRow(u8),
}

/// 16x2 character LCD with RGB backlight.
pub struct Jhd1313m1<I2C: I2c> {
    i2c: I2C,
}

impl<I2C: I2c> Jhd1313m1<I2C> {
    /// Bring the display up: 2-line mode, display on, cleared, left-to-right
    /// entry, backlight controller out of sleep with all outputs on PWM.
    pub fn new(i2c: I2C) -> Result<Self, ScreenError> {
        let mut screen = Self { i2c };

        // controller needs >40ms after power-up before it accepts commands
        sleep(Duration::from_millis(50));
        screen.command(CMD_FUNCTION_SET_2LINE)?;
        sleep(Duration::from_millis(5));
        screen.command(CMD_FUNCTION_SET_2LINE)?;
        screen.command(CMD_DISPLAY_ON)?;
        screen.clear()?;
        screen.command(CMD_ENTRY_MODE_LTR)?;

        screen.rgb_register(REG_MODE1, 0x00)?;
        screen.rgb_register(REG_MODE2, 0x00)?;
        screen.rgb_register(REG_OUTPUT, 0xaa)?;

        Ok(screen)
    }

    /// Clear the display and home the cursor.
    pub fn clear(&mut self) -> Result<(), ScreenError> {
        self.command(CMD_CLEAR)?;
        // clear is the one slow command
        sleep(Duration::from_millis(2));
        Ok(())
    }

    /// Move the cursor to `(row, col)`, both zero-based.
    pub fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), ScreenError> {
        let base = *ROW_COMMANDS
            .get(usize::from(row))
            .ok_or(ScreenError::BadRow(row))?;
        self.command(base | (col & 0x0f))
    }

    /// Write `text` at the current cursor position.
    pub fn write(&mut self, text: &str) -> Result<(), ScreenError> {
        for byte in text.bytes() {
            self.data(byte)?;
        }
        Ok(())
    }

    /// Set the backlight color.
    pub fn set_color(&mut self, red: u8, green: u8, blue: u8) -> Result<(), ScreenError> {
        self.rgb_register(REG_RED, red)?;
        self.rgb_register(REG_GREEN, green)?;
        self.rgb_register(REG_BLUE, blue)
    }

    fn command(&mut self, cmd: u8) -> Result<(), ScreenError> {
        self.i2c
            .write(LCD_ADDRESS, &[CONTROL_COMMAND, cmd])
            .map_err(bus_error)
    }

    fn data(&mut self, byte: u8) -> Result<(), ScreenError> {
        self.i2c
            .write(LCD_ADDRESS, &[CONTROL_DATA, byte])
            .map_err(bus_error)
    }

    fn rgb_register(&mut self, register: u8, value: u8) -> Result<(), ScreenError> {
        self.i2c
            .write(RGB_ADDRESS, &[register, value])
            .map_err(bus_error)
    }
}

fn bus_error<E: core::fmt::Debug>(e: E) -> ScreenError {
    ScreenError::Bus(format!("{e:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{self, ErrorKind, ErrorType, Operation, SevenBitAddress};

    #[derive(Debug)]
    struct NoAck;

    impl i2c::Error for NoAck {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    #[derive(Default)]
    struct FakeBus {
        writes: Vec<(u8, Vec<u8>)>,
    }

    impl ErrorType for FakeBus {
        type Error = NoAck;
    }

    impl I2c for FakeBus {
        fn transaction(
            &mut self,
            address: SevenBitAddress,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            for op in operations {
                match op {
                    Operation::Write(bytes) => self.writes.push((address, bytes.to_vec())),
                    Operation::Read(buffer) => buffer.fill(0),
                }
            }
            Ok(())
        }
    }

    #[test]
    fn init_configures_lcd_then_backlight() {
        let screen = Jhd1313m1::new(FakeBus::default()).unwrap();
        let writes = screen.i2c.writes;

        assert_eq!(writes[0], (LCD_ADDRESS, vec![0x80, 0x28]));
        assert!(writes.contains(&(LCD_ADDRESS, vec![0x80, CMD_CLEAR])));
        assert!(writes.contains(&(LCD_ADDRESS, vec![0x80, CMD_DISPLAY_ON])));
        let rgb: Vec<_> = writes.iter().filter(|(a, _)| *a == RGB_ADDRESS).collect();
        assert_eq!(
            rgb,
            [
                &(RGB_ADDRESS, vec![REG_MODE1, 0x00]),
                &(RGB_ADDRESS, vec![REG_MODE2, 0x00]),
                &(RGB_ADDRESS, vec![REG_OUTPUT, 0xaa]),
            ]
        );
    }

    #[test]
    fn cursor_addressing_per_row() {
        let mut screen = Jhd1313m1::new(FakeBus::default()).unwrap();
        screen.i2c.writes.clear();

        screen.set_cursor(0, 0).unwrap();
        screen.set_cursor(1, 3).unwrap();
        assert_eq!(
            screen.i2c.writes,
            [
                (LCD_ADDRESS, vec![0x80, 0x80]),
                (LCD_ADDRESS, vec![0x80, 0xc3]),
            ]
        );
        assert!(matches!(
            screen.set_cursor(2, 0),
            Err(ScreenError::BadRow(2))
        ));
    }

    #[test]
    fn text_goes_out_as_data_bytes() {
        let mut screen = Jhd1313m1::new(FakeBus::default()).unwrap();
        screen.i2c.writes.clear();

        screen.write("Hi").unwrap();
        assert_eq!(
            screen.i2c.writes,
            [
                (LCD_ADDRESS, vec![0x40, b'H']),
                (LCD_ADDRESS, vec![0x40, b'i']),
            ]
        );
    }

    #[test]
    fn backlight_registers() {
        let mut screen = Jhd1313m1::new(FakeBus::default()).unwrap();
        screen.i2c.writes.clear();

        screen.set_color(0x11, 0x22, 0x33).unwrap();
        assert_eq!(
            screen.i2c.writes,
            [
                (RGB_ADDRESS, vec![REG_RED, 0x11]),
                (RGB_ADDRESS, vec![REG_GREEN, 0x22]),
                (RGB_ADDRESS, vec![REG_BLUE, 0x33]),
            ]
        );
    }
}
