//! Grove temperature sensor.
//!
//! NTC thermistor (10 kΩ at 25 °C, B constant 3975) in a voltage divider on
//! an analog pin; the 10-bit raw reading is converted through the
//! steady-state thermistor equation.

use thiserror::Error;

use crate::hal::AnalogInput;

const B_CONSTANT: f32 = 3975.0;
const R0_OHMS: f32 = 10_000.0;
const T0_KELVIN: f32 = 298.15;
const ADC_RANGE: f32 = 1023.0;

#[derive(Debug, Error)]
pub enum TemperatureError {
    #[error("sensor read failed: {0}")]
    Read(String),

    /// Raw reading at the rail, sensor missing or shorted.
    #[error("raw reading {0} out of range")]
    OutOfRange(u16),
}

/// Temperature sensor on one analog channel.
pub struct GroveTemp<A: AnalogInput> {
    adc: A,
}

impl<A: AnalogInput> GroveTemp<A> {
    pub fn new(adc: A) -> Self {
        Self { adc }
    }

    /// Current temperature in °C.
    pub fn celsius(&mut self) -> Result<f32, TemperatureError> {
        let raw = self
            .adc
            .read_raw()
            .map_err(|e| TemperatureError::Read(e.to_string()))?;
        let celsius = convert(raw)?;
        log::debug!("temperature sensor: raw {raw} -> {celsius:.1} C");
        Ok(celsius)
    }

    /// Current temperature rounded to whole °C.
    pub fn value(&mut self) -> Result<i32, TemperatureError> {
        Ok(self.celsius()?.round() as i32)
    }
}

fn convert(raw: u16) -> Result<f32, TemperatureError> {
    if raw == 0 || raw >= ADC_RANGE as u16 {
        return Err(TemperatureError::OutOfRange(raw));
    }
    let resistance = (ADC_RANGE - f32::from(raw)) * R0_OHMS / f32::from(raw);
    let kelvin = 1.0 / ((resistance / R0_OHMS).ln() / B_CONSTANT + 1.0 / T0_KELVIN);
    Ok(kelvin - 273.15)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    struct FixedAdc(u16);

    impl AnalogInput for FixedAdc {
        type Error = Infallible;

        fn read_raw(&mut self) -> Result<u16, Self::Error> {
            Ok(self.0)
        }
    }

    #[test]
    fn midscale_reads_room_temperature() {
        let mut sensor = GroveTemp::new(FixedAdc(512));
        let celsius = sensor.celsius().unwrap();
        assert!((24.5..25.5).contains(&celsius), "got {celsius}");
        assert_eq!(sensor.value().unwrap(), 25);
    }

    #[test]
    fn higher_raw_means_hotter() {
        let cold = convert(300).unwrap();
        let warm = convert(512).unwrap();
        let hot = convert(703).unwrap();
        assert!(cold < warm && warm < hot);
        assert!((43.0..45.0).contains(&hot), "got {hot}");
    }

    #[test]
    fn rail_readings_are_rejected() {
        assert!(matches!(
            convert(0),
            Err(TemperatureError::OutOfRange(0))
        ));
        assert!(matches!(
            convert(1023),
            Err(TemperatureError::OutOfRange(1023))
        ));
    }
}
