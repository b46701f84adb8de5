//! Physical and protocol constants for the arm.
//!
//! Angles on the wire are brads: 1/4096 of a revolution, so 1024 brads is a
//! quarter turn and 2048 marks the right-angle center of the symmetric
//! joint domains. Actuator-side everything is a pulse width in whole
//! microseconds, which keeps the motion arithmetic integer.

/// One ramp step moves a joint by this many microseconds of pulse width.
pub const PULSE_STEP_US: u16 = 6;
/// Slowest inter-step delay; every move starts (and ends) here.
pub const START_INTERVAL_MS: u64 = 10;
/// Fastest inter-step delay reached after ramp up.
pub const MIN_INTERVAL_MS: u64 = 1;

/// Gripper pulse presets for the boolean open/close command.
pub const GRIPPER_OPEN_US: u16 = 1000;
pub const GRIPPER_CLOSED_US: u16 = 1800;

// Line transport.
pub const PORT: u16 = 5000;
pub const RX_BUF_SIZE: usize = 1024;
pub const TX_BUF_SIZE: usize = 1024;

// Protocol buffers. Input past LINE_MAX_LEN is dropped, not carried into
// the next line; responses truncate rather than grow.
pub const LINE_MAX_LEN: usize = 64;
pub const RESPONSE_MAX_LEN: usize = 96;
pub const MAX_ARGS: usize = 6;

/// Stores one joint's fixed limits plus the ramp thresholds that need a
/// derivation at configuration time.
#[derive(Debug, Clone, Copy)]
pub struct JointConfig {
    pub min_us: u16,
    pub home_us: u16,
    pub max_us: u16,
    pub min_brads: i32,
    pub home_brads: i32,
    pub max_brads: i32,
    pub ramp_up_us: u16,
    pub ramp_down_us: u16,
}

impl JointConfig {
    pub const fn new(
        min_us: u16,
        home_us: u16,
        max_us: u16,
        min_brads: i32,
        home_brads: i32,
        max_brads: i32,
    ) -> Self {
        let range = max_us - min_us;
        Self {
            min_us,
            home_us,
            max_us,
            min_brads,
            home_brads,
            max_brads,
            ramp_up_us: range / 3,
            ramp_down_us: range / 9,
        }
    }
}

//[min_us, home_us, max_us, min_brads, home_brads, max_brads]
pub const AZIMUTH: JointConfig = JointConfig::new(600, 1500, 2400, 1024, 2048, 3072);
pub const SHOULDER: JointConfig = JointConfig::new(750, 1500, 2250, 1024, 2048, 3072);
pub const VARM: JointConfig = JointConfig::new(800, 1500, 2200, -1024, 0, 1024);
pub const GRIPPER: JointConfig = JointConfig::new(1000, 1400, 2000, 0, 512, 1024);
