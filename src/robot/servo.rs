use crate::robot::joint::JointId;
use fugit::Hertz;
use log::error;

use embedded_hal::pwm::SetDutyCycle;

#[derive(Debug)]
pub struct Servo<PWM> {
    pwm: PWM,
    pulse_us: u16,
    max_duty: u32,
    frequency: Hertz<u32>,
    joint_id: JointId,
}

impl<PWM> Servo<PWM>
where
    PWM: SetDutyCycle,
{
    pub fn new(pwm: PWM, max_duty: u32, frequency: Hertz<u32>, joint_id: JointId) -> Self {
        Self {
            pwm,
            pulse_us: 0,
            max_duty,
            frequency,
            joint_id,
        }
    }

    /// Drives the actuator with a pulse width in microseconds.
    ///
    /// Range limits are the caller's business; here the value is only
    /// clamped against the PWM register resolution. Driver errors are
    /// logged, never propagated.
    pub fn set_pulse(&mut self, pulse_us: u16) {
        //Avoid setting the same pulse again
        if self.pulse_us == pulse_us {
            return;
        }
        self.pulse_us = pulse_us;

        // Scale pulse to PWM register resolution
        // Example: 1500 µs / 20000 µs * 16383 ≈ 1228
        // THE WIDTH OF THE PULSE DRIVES THE JOINT, NOT FREQ
        let period_us = 1_000_000 / self.frequency.raw();
        let duty = ((pulse_us as u32 * self.max_duty) / period_us).min(self.max_duty) as u16;
        if let Err(e) = self.pwm.set_duty_cycle(duty) {
            error!("{} Error writing pulse {:?}", self.joint_id, e);
        }
    }

    pub fn pulse_us(&self) -> u16 {
        self.pulse_us
    }

    pub fn joint_id(&self) -> JointId {
        self.joint_id
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use core::convert::Infallible;
    use embedded_hal::pwm::{ErrorType, SetDutyCycle};

    /// Records the last duty written, standing in for a LEDC channel.
    pub struct MockPwm {
        pub duty: u16,
        pub max_duty: u16,
    }

    impl MockPwm {
        pub fn new() -> Self {
            Self {
                duty: 0,
                max_duty: 16383,
            }
        }
    }

    impl ErrorType for MockPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            self.max_duty
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
            self.duty = duty;
            Ok(())
        }
    }
}
