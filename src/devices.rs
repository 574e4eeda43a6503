//! The demo's device set.
//!
//! Owns the three peripherals and exposes the handful of operations the
//! bring-up demo needs. Construction does the platform-specific part: pin
//! mapping by platform, and for unrecognized platforms one attempt to
//! register a Firmata subplatform on the configured serial port.

use anyhow::{Context, Result};

use crate::config::pins::{self, PinConfig, Platform};
use crate::hal::Hal;
use crate::peripherals::buzzer::Buzzer;
use crate::peripherals::screen::{self, Jhd1313m1};
use crate::peripherals::temperature::GroveTemp;

/// Backlight color when none is given: blue.
pub const DEFAULT_COLOR: u32 = 0x0000ff;

/// Alarm tone frequency.
pub const ALARM_TONE_HZ: u32 = 266;

/// The three Grove peripherals, ready to use.
///
/// Dropping the value releases the underlying hardware handles.
pub struct Devices<H: Hal> {
    temp: GroveTemp<H::Analog>,
    buzzer: Buzzer<H::Tone>,
    screen: Jhd1313m1<H::I2c>,
    pins: PinConfig,
}

impl<H: Hal> Devices<H> {
    /// Bring up all three peripherals, resolving the subplatform port from
    /// the `PORT` environment variable.
    pub fn init(hal: H) -> Result<Self> {
        Self::init_with_port(hal, pins::port_from_env())
    }

    /// Bring up all three peripherals using `port` for subplatform
    /// registration if the platform is unrecognized.
    ///
    /// Registration failure is logged and otherwise ignored; the demo then
    /// runs against the default subplatform pin offsets, which is the right
    /// thing when the board was registered by an earlier process.
    pub fn init_with_port(mut hal: H, port: String) -> Result<Self> {
        let platform = hal.platform();
        if platform == Platform::Unknown {
            log::info!("unrecognized platform, trying a Firmata subplatform on {port}");
            if let Err(e) = hal.add_subplatform(&port) {
                log::error!("subplatform registration on {port} failed: {e}");
            }
        }
        let pins = PinConfig::for_platform(platform);
        pins::validate_config(&pins).map_err(anyhow::Error::msg)?;
        log::info!("pin assignment: {pins:?}");

        let temp = GroveTemp::new(
            hal.analog(pins.temperature_pin)
                .context("temperature sensor")?,
        );
        let buzzer = Buzzer::new(hal.tone(pins.buzzer_pin).context("buzzer")?);
        let screen = Jhd1313m1::new(hal.i2c(pins.lcd_bus).context("lcd")?)?;

        let mut devices = Self {
            temp,
            buzzer,
            screen,
            pins,
        };
        devices.stop_alarm()?;
        Ok(devices)
    }

    pub fn pins(&self) -> PinConfig {
        self.pins
    }

    /// Show `text` on the first row with the default backlight color.
    pub fn message(&mut self, text: &str) -> Result<()> {
        self.message_with_color(text, DEFAULT_COLOR)
    }

    /// Show `text` on the first row and set the backlight from a `0xRRGGBB`
    /// word. The text is echoed to stdout and padded or truncated to the
    /// full row width so stale characters never show through.
    pub fn message_with_color(&mut self, text: &str, color: u32) -> Result<()> {
        println!("{text}");

        let line: String = text
            .chars()
            .chain(std::iter::repeat(' '))
            .take(screen::COLUMNS)
            .collect();

        self.screen.set_cursor(0, 0)?;
        self.screen.write(&line)?;
        self.screen.set_color(
            (color >> 16) as u8,
            (color >> 8) as u8,
            color as u8,
        )?;
        Ok(())
    }

    /// Sound the alarm: message plus a continuous tone.
    pub fn start_alarm(&mut self) -> Result<()> {
        self.message("Fire alarm!")?;
        self.buzzer.play_sound(ALARM_TONE_HZ)?;
        Ok(())
    }

    /// Silence the alarm and blank the message row.
    pub fn stop_alarm(&mut self) -> Result<()> {
        self.message("")?;
        self.buzzer.stop_sound()?;
        Ok(())
    }

    /// Back to the idle state.
    pub fn reset(&mut self) -> Result<()> {
        self.stop_alarm()?;
        self.message("Ready")
    }

    /// Current temperature in whole °C.
    pub fn temperature(&mut self) -> Result<i32> {
        Ok(self.temp.value()?)
    }
}
