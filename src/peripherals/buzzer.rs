//! Grove buzzer on a PWM pin.

use thiserror::Error;

use crate::hal::TonePwm;

#[derive(Debug, Error)]
pub enum BuzzerError {
    #[error("tone output failed: {0}")]
    Tone(String),
}

/// Buzzer driven by a square wave; one tone at a time.
pub struct Buzzer<T: TonePwm> {
    pwm: T,
}

impl<T: TonePwm> Buzzer<T> {
    pub fn new(pwm: T) -> Self {
        Self { pwm }
    }

    /// Start a continuous tone at `freq_hz`.
    pub fn play_sound(&mut self, freq_hz: u32) -> Result<(), BuzzerError> {
        log::debug!("buzzer: tone {freq_hz} Hz");
        self.pwm
            .play(freq_hz)
            .map_err(|e| BuzzerError::Tone(e.to_string()))
    }

    /// Silence the buzzer.
    pub fn stop_sound(&mut self) -> Result<(), BuzzerError> {
        self.pwm
            .stop()
            .map_err(|e| BuzzerError::Tone(e.to_string()))
    }
}
