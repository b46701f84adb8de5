//! Library root for the robot arm firmware.
//!
//! Re-exports all main modules: [`kinematics`], [`protocol`], [`robot`] and,
//! behind the `esp32` feature, [`tasks`]. Used by the main binary and for
//! integration in tests or other binaries.
#![no_std]

pub mod kinematics;
pub mod protocol;
pub mod robot;
#[cfg(feature = "esp32")]
pub mod tasks;

pub const LINE_CHANNEL_SIZE: usize = 4;
pub const RESPONSE_CHANNEL_SIZE: usize = 4;
pub const INDICATOR_CHANNEL_SIZE: usize = 2;
pub const TONE_CHANNEL_SIZE: usize = 2;
