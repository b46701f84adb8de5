//! Asynchronous joint motion.
//!
//! [`JointDriver`] moves one joint toward its target by polling from the
//! control loop, using pulse width as the unit of angular measure so the
//! arithmetic stays integer. Ramping is trapezoidal: the step interval
//! contracts, holds, then relaxes as the joint closes on its target.
//!
//! ```text
//!      ____
//! ____/    \____
//!     u    d
//! ```
use crate::kinematics::conversion::{brads_to_pulse, clamp_brads};
use crate::robot::config::{JointConfig, MIN_INTERVAL_MS, PULSE_STEP_US, START_INTERVAL_MS};
use crate::robot::servo::Servo;
use embassy_time::{Duration, Instant};
use embedded_hal::pwm::SetDutyCycle;
use log::debug;

pub struct JointDriver<PWM> {
    servo: Servo<PWM>,
    cfg: JointConfig,
    current: u16,
    target: u16,
    start_pulse: u16,
    target_brads: i32,
    interval_ms: u64,
    last_update: Instant,
}

impl<PWM> JointDriver<PWM>
where
    PWM: SetDutyCycle,
{
    pub fn new(servo: Servo<PWM>, cfg: JointConfig) -> Self {
        Self {
            servo,
            cfg,
            current: cfg.home_us,
            target: cfg.home_us,
            start_pulse: cfg.home_us,
            target_brads: cfg.home_brads,
            interval_ms: START_INTERVAL_MS,
            last_update: Instant::from_ticks(0),
        }
    }

    /// Synchronously moves the joint to the home position.
    ///
    /// This gives a known starting point for timed movement; the only
    /// path that bypasses ramping.
    pub fn home(&mut self) {
        self.servo.set_pulse(self.cfg.home_us);
        self.current = self.cfg.home_us;
        self.target = self.cfg.home_us;
        self.start_pulse = self.cfg.home_us;
        self.target_brads = self.cfg.home_brads;
        self.interval_ms = START_INTERVAL_MS;
    }

    /// Begins a move to `brads`, saturated into the joint's domain, and
    /// returns the pulse width the joint will converge to.
    ///
    /// `duration_ms` is accepted by the protocol but does not bound the
    /// move time; speed follows distance remaining (see [`Self::update`]).
    pub fn set_target(&mut self, brads: i32, _duration_ms: i32) -> u16 {
        let brads = clamp_brads(brads, &self.cfg);
        self.target_brads = brads;
        self.set_pulse_target(brads_to_pulse(brads, &self.cfg))
    }

    /// Begins a move straight to a pulse width, clamped to the actuator
    /// range. A move already in flight is overridden and the ramp restarts
    /// from the current position.
    pub fn set_pulse_target(&mut self, pulse_us: u16) -> u16 {
        let pulse = pulse_us.clamp(self.cfg.min_us, self.cfg.max_us);
        self.target = pulse;
        self.start_pulse = self.current;
        self.interval_ms = START_INTERVAL_MS;
        debug!(
            "{} move {} -> {}",
            self.servo.joint_id(),
            self.start_pulse,
            self.target
        );
        pulse
    }

    // Update is called every control loop tick to iteratively move the
    // joint into position.
    pub fn update(&mut self, now: Instant) {
        // Nothing to do if the joint is at the target position.
        if self.current == self.target {
            return;
        }

        // The joint requires an update, but only when the interval is
        // exceeded. The interval contracts, holds, then relaxes as the
        // joint ramps.
        if now.duration_since(self.last_update) <= Duration::from_millis(self.interval_ms) {
            return;
        }
        self.last_update = now;

        let remaining = self.current.abs_diff(self.target);
        if remaining < self.cfg.ramp_down_us {
            debug!("{} ramp down", self.servo.joint_id());
            if self.interval_ms < START_INTERVAL_MS {
                self.interval_ms += 1;
            }
        } else if remaining > self.cfg.ramp_up_us {
            debug!("{} ramp up", self.servo.joint_id());
            if self.interval_ms > MIN_INTERVAL_MS {
                self.interval_ms -= 1;
            }
        }

        // The last step is shortened so the joint lands exactly on target.
        let step = PULSE_STEP_US.min(remaining);
        if self.target < self.current {
            self.current -= step;
        } else {
            self.current += step;
        }
        self.servo.set_pulse(self.current);
    }

    pub fn is_idle(&self) -> bool {
        self.current == self.target
    }

    pub fn current_us(&self) -> u16 {
        self.current
    }

    pub fn target_us(&self) -> u16 {
        self.target
    }

    pub fn target_brads(&self) -> i32 {
        self.target_brads
    }

    #[cfg(test)]
    pub(crate) fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::config::AZIMUTH;
    use crate::robot::joint::JointId;
    use crate::robot::servo::mock::MockPwm;
    use fugit::HertzU32;

    fn azimuth_driver() -> JointDriver<MockPwm> {
        let servo = Servo::new(MockPwm::new(), 16383, HertzU32::from_raw(50), JointId::Azimuth);
        let mut driver = JointDriver::new(servo, AZIMUTH);
        driver.home();
        driver
    }

    /// Drives the loop with a 1 ms tick until the joint goes idle and
    /// returns the tick count, panicking if it never converges.
    fn run_to_idle(driver: &mut JointDriver<MockPwm>, start: u64) -> u64 {
        let mut t = start;
        while !driver.is_idle() {
            t += 1;
            assert!(t - start < 50_000, "no convergence after {} ticks", t - start);
            driver.update(Instant::from_millis(t));
        }
        t
    }

    #[test]
    fn converges_to_clamped_target() {
        let mut driver = azimuth_driver();
        // 5000 brads is outside the [1024, 3072] domain and saturates.
        let pulse = driver.set_target(5000, 1000);
        assert_eq!(pulse, 2400, "out-of-domain command must clamp to max");
        run_to_idle(&mut driver, 0);
        assert_eq!(driver.current_us(), 2400);

        // Same landing spot as commanding the boundary itself.
        driver.home();
        assert_eq!(driver.set_target(3072, 1000), pulse);
    }

    #[test]
    fn pulse_never_leaves_actuator_range() {
        let mut driver = azimuth_driver();
        driver.set_target(1024, 500);
        let mut t = 0;
        while !driver.is_idle() {
            t += 1;
            driver.update(Instant::from_millis(t));
            assert!(driver.current_us() >= AZIMUTH.min_us);
            assert!(driver.current_us() <= AZIMUTH.max_us);
            assert!(t < 50_000);
        }
        assert_eq!(driver.current_us(), AZIMUTH.min_us);
    }

    #[test]
    fn home_is_synchronous_and_idempotent() {
        let mut driver = azimuth_driver();
        driver.set_target(3072, 1000);
        driver.update(Instant::from_millis(11));
        assert!(!driver.is_idle());

        driver.home();
        assert!(driver.is_idle(), "home must not leave a pending move");
        assert_eq!(driver.current_us(), AZIMUTH.home_us);
        assert_eq!(driver.target_us(), AZIMUTH.home_us);

        driver.home();
        assert_eq!(driver.current_us(), AZIMUTH.home_us);
        assert_eq!(driver.target_us(), AZIMUTH.home_us);
    }

    #[test]
    fn remaining_distance_is_monotone_and_interval_bounded() {
        let mut driver = azimuth_driver();
        driver.set_target(3072, 1000);
        let mut remaining = driver.current_us().abs_diff(driver.target_us());
        let mut t = 0;
        while !driver.is_idle() {
            t += 1;
            driver.update(Instant::from_millis(t));
            let now_remaining = driver.current_us().abs_diff(driver.target_us());
            assert!(now_remaining <= remaining, "distance to target grew");
            remaining = now_remaining;
            assert!(driver.interval_ms() >= MIN_INTERVAL_MS);
            assert!(driver.interval_ms() <= START_INTERVAL_MS);
            assert!(t < 50_000);
        }
    }

    #[test]
    fn idle_to_moving_to_idle() {
        let mut driver = azimuth_driver();
        assert!(driver.is_idle());

        driver.set_target(2200, 800);
        assert!(!driver.is_idle());

        // No step before the starting interval elapses.
        driver.update(Instant::from_millis(START_INTERVAL_MS));
        assert_eq!(driver.current_us(), AZIMUTH.home_us);

        // First elapsed tick advances by at most one fixed step.
        driver.update(Instant::from_millis(START_INTERVAL_MS + 1));
        assert_eq!(
            driver.current_us().abs_diff(AZIMUTH.home_us),
            PULSE_STEP_US
        );

        run_to_idle(&mut driver, START_INTERVAL_MS + 1);
        assert_eq!(driver.current_us(), driver.target_us());
    }

    #[test]
    fn retarget_overrides_move_and_restarts_ramp() {
        let mut driver = azimuth_driver();
        driver.set_target(3072, 1000);
        let mut t = 0;
        for _ in 0..200 {
            t += 1;
            driver.update(Instant::from_millis(t));
        }
        assert!(driver.interval_ms() < START_INTERVAL_MS, "should have ramped up");
        let midway = driver.current_us();

        // Override mid-move: new target, ramp state reset from here.
        let pulse = driver.set_target(1024, 1000);
        assert_eq!(pulse, AZIMUTH.min_us);
        assert_eq!(driver.current_us(), midway);
        assert_eq!(driver.interval_ms(), START_INTERVAL_MS);

        run_to_idle(&mut driver, t);
        assert_eq!(driver.current_us(), AZIMUTH.min_us);
    }

    #[test]
    fn ramp_accelerates_then_decelerates() {
        let mut driver = azimuth_driver();
        driver.set_target(3072, 1000);
        let mut fastest = START_INTERVAL_MS;
        let mut t = 0;
        while !driver.is_idle() {
            t += 1;
            driver.update(Instant::from_millis(t));
            fastest = fastest.min(driver.interval_ms());
            assert!(t < 50_000);
        }
        assert_eq!(fastest, MIN_INTERVAL_MS, "long move never reached cruise speed");
        assert_eq!(
            driver.interval_ms(),
            START_INTERVAL_MS,
            "deceleration should end back at the slowest interval"
        );
    }
}
