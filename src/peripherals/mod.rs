//! Typed drivers for the three Grove peripherals.

pub mod buzzer;
pub mod screen;
pub mod temperature;
