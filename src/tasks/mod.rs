//! Asynchronous tasks for arm operation.
//!
//! This module contains Embassy async tasks for the firmware runtime:
//! - [`control_task`]: The cooperative control loop driving the joints.
//! - [`net_task`]: Manages WiFi, the TCP server, and line reception.
//! - [`buzzer_task`]: Plays commanded tones.
//! - [`indicator_task`]: Drives the indicator LED.
//!
//! Tasks are spawned from `main.rs` and communicate via Embassy channels.
pub mod buzzer_task;
pub mod control_task;
pub mod indicator_task;
pub mod net_task;
