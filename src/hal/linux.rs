//! Sysfs-backed hardware layer for Linux SBCs.
//!
//! Platform detection reads the DMI board name, analog channels go through
//! IIO, the buzzer pin through the kernel PWM class and the LCD bus through
//! `/dev/i2c-*` via `linux-embedded-hal`. Subplatform pins need a Firmata
//! serial transport, which is the vendor stack's job; this backend reports
//! registration as unsupported and rejects offset pins.

use std::fs;
use std::path::PathBuf;

use linux_embedded_hal::I2cdev;
use thiserror::Error;

use crate::config::pins::{Platform, SUBPLATFORM_OFFSET};
use crate::hal::{AnalogInput, Hal, TonePwm};

const DMI_BOARD_NAME: &str = "/sys/devices/virtual/dmi/id/board_name";
const IIO_DEVICE_DIR: &str = "/sys/bus/iio/devices/iio:device0";
const PWM_CHIP_DIR: &str = "/sys/class/pwm/pwmchip0";

#[derive(Debug, Error)]
pub enum LinuxHalError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unreadable value in {path}: {value:?}")]
    Parse { path: String, value: String },

    #[error("opening {0}: {1}")]
    I2cOpen(String, String),

    #[error("tone frequency must be nonzero")]
    ZeroFrequency,

    #[error("pin {0} is on a subplatform, which this backend cannot drive")]
    SubplatformPin(u16),

    #[error("subplatform registration over {0} is not supported by the sysfs backend")]
    SubplatformUnsupported(String),
}

/// Hardware layer for a Linux board with sysfs-exposed I/O.
pub struct LinuxHal {
    platform: Platform,
}

impl LinuxHal {
    pub fn new() -> Self {
        let platform = detect_platform();
        log::info!("detected platform: {platform:?}");
        Self { platform }
    }
}

impl Default for LinuxHal {
    fn default() -> Self {
        Self::new()
    }
}

fn detect_platform() -> Platform {
    match fs::read_to_string(DMI_BOARD_NAME) {
        Ok(name) => platform_from_board_name(&name),
        Err(e) => {
            log::warn!("cannot read {DMI_BOARD_NAME}: {e}");
            Platform::Unknown
        }
    }
}

/// Map a DMI board name to a platform family.
fn platform_from_board_name(name: &str) -> Platform {
    let name = name.trim();
    match name {
        "GalileoGen2" => Platform::GalileoGen2,
        "BODEGA BAY" | "SALT BAY" => Platform::EdisonFabC,
        _ if name.starts_with("Galileo") => Platform::GalileoGen1,
        _ => Platform::Unknown,
    }
}

impl Hal for LinuxHal {
    type Error = LinuxHalError;
    type Analog = SysfsAnalog;
    type Tone = SysfsPwm;
    type I2c = I2cdev;

    fn platform(&self) -> Platform {
        self.platform
    }

    fn add_subplatform(&mut self, port: &str) -> Result<(), Self::Error> {
        Err(LinuxHalError::SubplatformUnsupported(port.to_string()))
    }

    fn analog(&mut self, pin: u16) -> Result<Self::Analog, Self::Error> {
        if pin >= SUBPLATFORM_OFFSET {
            return Err(LinuxHalError::SubplatformPin(pin));
        }
        Ok(SysfsAnalog {
            raw_path: PathBuf::from(IIO_DEVICE_DIR).join(format!("in_voltage{pin}_raw")),
        })
    }

    fn tone(&mut self, pin: u16) -> Result<Self::Tone, Self::Error> {
        if pin >= SUBPLATFORM_OFFSET {
            return Err(LinuxHalError::SubplatformPin(pin));
        }
        SysfsPwm::export(pin)
    }

    fn i2c(&mut self, bus: u16) -> Result<Self::I2c, Self::Error> {
        if bus >= SUBPLATFORM_OFFSET {
            return Err(LinuxHalError::SubplatformPin(bus));
        }
        let path = format!("/dev/i2c-{bus}");
        I2cdev::new(&path).map_err(|e| LinuxHalError::I2cOpen(path, format!("{e:?}")))
    }
}

/// Analog input read from an IIO raw channel.
pub struct SysfsAnalog {
    raw_path: PathBuf,
}

impl AnalogInput for SysfsAnalog {
    type Error = LinuxHalError;

    fn read_raw(&mut self) -> Result<u16, Self::Error> {
        let value = fs::read_to_string(&self.raw_path)?;
        value
            .trim()
            .parse()
            .map_err(|_| LinuxHalError::Parse {
                path: self.raw_path.display().to_string(),
                value: value.trim().to_string(),
            })
    }
}

/// Tone output on a kernel PWM channel, 50% duty cycle.
pub struct SysfsPwm {
    dir: PathBuf,
}

impl SysfsPwm {
    fn export(channel: u16) -> Result<Self, LinuxHalError> {
        let chip = PathBuf::from(PWM_CHIP_DIR);
        let dir = chip.join(format!("pwm{channel}"));
        if !dir.exists() {
            fs::write(chip.join("export"), channel.to_string())?;
        }
        Ok(Self { dir })
    }

    fn write(&self, file: &str, value: u64) -> Result<(), LinuxHalError> {
        fs::write(self.dir.join(file), value.to_string())?;
        Ok(())
    }
}

impl TonePwm for SysfsPwm {
    type Error = LinuxHalError;

    fn play(&mut self, freq_hz: u32) -> Result<(), Self::Error> {
        let period = period_ns(freq_hz).ok_or(LinuxHalError::ZeroFrequency)?;
        // period before duty cycle, the kernel rejects duty > period
        self.write("period", period)?;
        self.write("duty_cycle", period / 2)?;
        self.write("enable", 1)
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.write("enable", 0)
    }
}

fn period_ns(freq_hz: u32) -> Option<u64> {
    if freq_hz == 0 {
        return None;
    }
    Some(1_000_000_000 / u64::from(freq_hz))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_names_map_to_platforms() {
        assert_eq!(
            platform_from_board_name("GalileoGen2\n"),
            Platform::GalileoGen2
        );
        assert_eq!(platform_from_board_name("Galileo"), Platform::GalileoGen1);
        assert_eq!(platform_from_board_name("BODEGA BAY"), Platform::EdisonFabC);
        assert_eq!(platform_from_board_name("SALT BAY"), Platform::EdisonFabC);
        assert_eq!(platform_from_board_name("ThinkPad X1"), Platform::Unknown);
    }

    #[test]
    fn tone_period_is_the_inverse_frequency() {
        assert_eq!(period_ns(266), Some(3_759_398));
        assert_eq!(period_ns(1000), Some(1_000_000));
        assert_eq!(period_ns(0), None);
    }
}
