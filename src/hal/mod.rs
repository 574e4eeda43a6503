//! Hardware layer boundary.
//!
//! The vendor HAL stays behind this trait seam: platform detection,
//! subplatform registration and the three typed I/O resources the demo
//! needs. The LCD seam is `embedded-hal` I2C; analog input and tone output
//! have no embedded-hal 1.0 trait, so small ones are defined here.

#[cfg(feature = "linux-hal")]
pub mod linux;
pub mod sim;

use crate::config::pins::Platform;

/// One analog input channel, 10-bit reads.
pub trait AnalogInput {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Raw reading in `1..=1022` for a connected sensor.
    fn read_raw(&mut self) -> Result<u16, Self::Error>;
}

/// Square-wave tone output on a PWM-capable pin.
pub trait TonePwm {
    type Error: std::error::Error + Send + Sync + 'static;

    fn play(&mut self, freq_hz: u32) -> Result<(), Self::Error>;
    fn stop(&mut self) -> Result<(), Self::Error>;
}

/// Access to the platform's I/O resources.
///
/// Pin and bus numbers at or above
/// [`SUBPLATFORM_OFFSET`](crate::config::pins::SUBPLATFORM_OFFSET) refer to a
/// registered subplatform.
pub trait Hal {
    type Error: std::error::Error + Send + Sync + 'static;
    type Analog: AnalogInput;
    type Tone: TonePwm;
    type I2c: embedded_hal::i2c::I2c;

    /// Platform family this process is running on.
    fn platform(&self) -> Platform;

    /// Register a serial-attached Firmata board as a subplatform.
    fn add_subplatform(&mut self, port: &str) -> Result<(), Self::Error>;

    fn analog(&mut self, pin: u16) -> Result<Self::Analog, Self::Error>;
    fn tone(&mut self, pin: u16) -> Result<Self::Tone, Self::Error>;
    fn i2c(&mut self, bus: u16) -> Result<Self::I2c, Self::Error>;
}
