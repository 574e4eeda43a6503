//! Grove kit bring-up helpers.
//!
//! Wires three Grove peripherals (analog temperature sensor, PWM buzzer,
//! JHD1313M1 RGB LCD) to a pluggable hardware layer and exposes the handful
//! of helpers a demo needs: show a message, read the temperature, sound or
//! silence the alarm.

pub mod config;
pub mod devices;
pub mod hal;
pub mod peripherals;

pub use devices::Devices;
