//! Simulated hardware layer.
//!
//! In-memory stand-in for a real board, used by the demo binary when no
//! hardware is attached and by the test suite. Everything the peripherals do
//! is recorded in a shared [`SimState`] for later inspection.

use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use embedded_hal::i2c::{self, ErrorKind, ErrorType, I2c, Operation, SevenBitAddress};
use thiserror::Error;

use crate::config::pins::Platform;
use crate::hal::{AnalogInput, Hal, TonePwm};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("subplatform registration on {0} refused")]
    SubplatformRefused(String),
}

/// Everything the simulated board has seen or is currently driving.
#[derive(Debug, Default)]
pub struct SimState {
    /// Raw value the analog channel returns.
    pub raw: u16,

    /// Frequency of the tone currently playing, if any.
    pub tone: Option<u32>,

    /// Every I2C write, as `(address, bytes)` in order.
    pub i2c_writes: Vec<(u8, Vec<u8>)>,

    /// Port a subplatform was registered on, if registration was accepted.
    pub registered_port: Option<String>,

    pub analog_pin: Option<u16>,
    pub tone_pin: Option<u16>,
    pub i2c_bus: Option<u16>,
}

/// Simulated board.
pub struct SimHal {
    platform: Platform,
    accept_subplatform: bool,
    state: Arc<Mutex<SimState>>,
}

impl SimHal {
    pub fn new(platform: Platform) -> Self {
        let state = SimState {
            // reads back as roughly 25 C through the thermistor curve
            raw: 512,
            ..SimState::default()
        };
        Self {
            platform,
            accept_subplatform: true,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Set the raw value the analog channel reports.
    pub fn with_raw(self, raw: u16) -> Self {
        self.state.lock().unwrap().raw = raw;
        self
    }

    /// Make subplatform registration fail, as on a board with no serial link.
    pub fn refuse_subplatform(mut self) -> Self {
        self.accept_subplatform = false;
        self
    }

    /// Handle on the shared state, for inspection after the fact.
    pub fn state(&self) -> Arc<Mutex<SimState>> {
        Arc::clone(&self.state)
    }
}

impl Hal for SimHal {
    type Error = SimError;
    type Analog = SimAnalog;
    type Tone = SimTone;
    type I2c = SimI2c;

    fn platform(&self) -> Platform {
        self.platform
    }

    fn add_subplatform(&mut self, port: &str) -> Result<(), Self::Error> {
        if !self.accept_subplatform {
            return Err(SimError::SubplatformRefused(port.to_string()));
        }
        self.state.lock().unwrap().registered_port = Some(port.to_string());
        Ok(())
    }

    fn analog(&mut self, pin: u16) -> Result<Self::Analog, Self::Error> {
        let state = Arc::clone(&self.state);
        state.lock().unwrap().analog_pin = Some(pin);
        Ok(SimAnalog { state })
    }

    fn tone(&mut self, pin: u16) -> Result<Self::Tone, Self::Error> {
        let state = Arc::clone(&self.state);
        state.lock().unwrap().tone_pin = Some(pin);
        Ok(SimTone { state })
    }

    fn i2c(&mut self, bus: u16) -> Result<Self::I2c, Self::Error> {
        let state = Arc::clone(&self.state);
        state.lock().unwrap().i2c_bus = Some(bus);
        Ok(SimI2c { state })
    }
}

pub struct SimAnalog {
    state: Arc<Mutex<SimState>>,
}

impl AnalogInput for SimAnalog {
    type Error = Infallible;

    fn read_raw(&mut self) -> Result<u16, Self::Error> {
        Ok(self.state.lock().unwrap().raw)
    }
}

pub struct SimTone {
    state: Arc<Mutex<SimState>>,
}

impl TonePwm for SimTone {
    type Error = Infallible;

    fn play(&mut self, freq_hz: u32) -> Result<(), Self::Error> {
        self.state.lock().unwrap().tone = Some(freq_hz);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.state.lock().unwrap().tone = None;
        Ok(())
    }
}

pub struct SimI2c {
    state: Arc<Mutex<SimState>>,
}

#[derive(Debug)]
pub struct SimI2cError;

impl i2c::Error for SimI2cError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl ErrorType for SimI2c {
    type Error = SimI2cError;
}

impl I2c for SimI2c {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.lock().unwrap();
        for op in operations {
            match op {
                Operation::Write(bytes) => state.i2c_writes.push((address, bytes.to_vec())),
                Operation::Read(buffer) => buffer.fill(0),
            }
        }
        Ok(())
    }
}
