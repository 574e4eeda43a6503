//! Pin mapping by platform.
//!
//! Grove socket assignment for the demo: temperature sensor on A0, buzzer on
//! D5, LCD on the default I2C bus. Boards reached through a serial-attached
//! subplatform address the same sockets shifted by [`SUBPLATFORM_OFFSET`].

use std::env;

/// Pin/bus offset applied to everything that lives on a subplatform.
pub const SUBPLATFORM_OFFSET: u16 = 512;

/// Serial port used for subplatform registration when `PORT` is not set.
pub const DEFAULT_PORT: &str = "/dev/ttyACM0";

/// Platform family reported by the hardware layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    GalileoGen1,
    GalileoGen2,
    EdisonFabC,
    /// Firmata board wired up as the primary platform.
    Firmata,
    /// Anything else; the demo will try to register a Firmata subplatform.
    Unknown,
}

/// Pin configuration for the three Grove peripherals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinConfig {
    /// I2C bus number of the JHD1313M1 LCD.
    pub lcd_bus: u16,

    /// Analog pin of the temperature sensor (A0).
    pub temperature_pin: u16,

    /// PWM pin of the buzzer (D5).
    pub buzzer_pin: u16,
}

/// On-board socket numbers, valid for the Intel boards the kit ships for.
const BASE: PinConfig = PinConfig {
    lcd_bus: 0,
    temperature_pin: 0,
    buzzer_pin: 5,
};

impl PinConfig {
    /// Pin assignment for a recognized platform.
    ///
    /// `Firmata` and `Unknown` get the subplatform offsets; for `Unknown`
    /// the caller is expected to register the subplatform first.
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::GalileoGen1 | Platform::GalileoGen2 | Platform::EdisonFabC => BASE,
            Platform::Firmata | Platform::Unknown => BASE.shifted(SUBPLATFORM_OFFSET),
        }
    }

    fn shifted(self, offset: u16) -> Self {
        Self {
            lcd_bus: self.lcd_bus + offset,
            temperature_pin: self.temperature_pin + offset,
            buzzer_pin: self.buzzer_pin + offset,
        }
    }
}

/// Serial port for subplatform registration.
///
/// Takes the `PORT` value as an argument so the mapping stays pure; use
/// [`port_from_env`] at the call site.
pub fn resolve_port(port_var: Option<String>) -> String {
    port_var.unwrap_or_else(|| DEFAULT_PORT.to_string())
}

/// [`resolve_port`] fed from the process environment.
pub fn port_from_env() -> String {
    resolve_port(env::var("PORT").ok())
}

/// Validate a pin configuration.
///
/// Rejects assignments where two peripherals share a pin.
pub fn validate_config(config: &PinConfig) -> Result<(), String> {
    if config.temperature_pin == config.buzzer_pin {
        return Err(format!(
            "pin {} assigned to both temperature sensor and buzzer",
            config.temperature_pin
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intel_boards_use_onboard_sockets() {
        for platform in [
            Platform::GalileoGen1,
            Platform::GalileoGen2,
            Platform::EdisonFabC,
        ] {
            let pins = PinConfig::for_platform(platform);
            assert_eq!(pins.lcd_bus, 0);
            assert_eq!(pins.temperature_pin, 0);
            assert_eq!(pins.buzzer_pin, 5);
        }
    }

    #[test]
    fn firmata_pins_carry_the_subplatform_offset() {
        for platform in [Platform::Firmata, Platform::Unknown] {
            let pins = PinConfig::for_platform(platform);
            assert_eq!(pins.lcd_bus, 512);
            assert_eq!(pins.temperature_pin, 512);
            assert_eq!(pins.buzzer_pin, 517);
        }
    }

    #[test]
    fn port_defaults_to_ttyacm0() {
        assert_eq!(resolve_port(None), "/dev/ttyACM0");
        assert_eq!(resolve_port(Some("/dev/ttyUSB1".into())), "/dev/ttyUSB1");
    }

    #[test]
    fn duplicate_pins_are_rejected() {
        let bad = PinConfig {
            lcd_bus: 0,
            temperature_pin: 5,
            buzzer_pin: 5,
        };
        assert!(validate_config(&bad).is_err());
        assert!(validate_config(&PinConfig::for_platform(Platform::Unknown)).is_ok());
    }
}
