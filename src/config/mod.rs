//! Platform and pin configuration.
//!
//! Maps the detected platform to the Grove socket pins the demo uses.

pub mod pins;

pub use pins::{PinConfig, Platform, SUBPLATFORM_OFFSET};
