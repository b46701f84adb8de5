//! Command types for inter-task communication.
//!
//! The dispatcher hands these to the indicator and buzzer tasks over their
//! channels; both are fire-and-forget external capabilities.

/// Indicator LED request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorCommand {
    On,
    Off,
}

/// Audio tone request for the buzzer task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneCommand {
    pub frequency_hz: u32,
    pub duration_ms: u32,
}
