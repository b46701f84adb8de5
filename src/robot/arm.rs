//! The manipulator: four joint drivers behind one facade.
//!
//! Owns every [`JointDriver`] so neither the dispatcher nor the control
//! loop needs shared state; both get the arm passed in explicitly.
use crate::kinematics::conversion::varm_contribution;
use crate::robot::config::{GRIPPER_CLOSED_US, GRIPPER_OPEN_US};
use crate::robot::joint::JointId;
use crate::robot::motion::JointDriver;
use core::fmt::Write;
use embassy_time::Instant;
use embedded_hal::pwm::SetDutyCycle;
use log::info;

pub struct Arm<PWM> {
    joints: [JointDriver<PWM>; 4],
}

impl<PWM> Arm<PWM>
where
    PWM: SetDutyCycle,
{
    pub fn new(
        azimuth: JointDriver<PWM>,
        shoulder: JointDriver<PWM>,
        varm: JointDriver<PWM>,
        gripper: JointDriver<PWM>,
    ) -> Self {
        Self {
            joints: [azimuth, shoulder, varm, gripper],
        }
    }

    /// Synchronously homes every joint.
    pub fn home(&mut self) {
        for joint in &mut self.joints {
            joint.home();
        }
        info!("Arm homed");
    }

    /// Begins an asynchronous move of one joint to `brads`.
    ///
    /// The V-arm is a derived joint: its actuator and the shoulder jointly
    /// determine the elbow angle, so it only receives the part the
    /// shoulder's current target does not already provide. The shoulder
    /// target is read live on every command, never cached.
    pub fn set_target(&mut self, id: JointId, brads: i32, duration_ms: i32) -> u16 {
        let brads = match id {
            JointId::Varm => {
                varm_contribution(brads, self.joints[JointId::Shoulder].target_brads())
            }
            _ => brads,
        };
        self.joints[id].set_target(brads, duration_ms)
    }

    /// Ramped move of the gripper to its open or closed preset.
    pub fn set_gripper(&mut self, open: bool) -> u16 {
        let pulse = if open { GRIPPER_OPEN_US } else { GRIPPER_CLOSED_US };
        self.joints[JointId::Gripper].set_pulse_target(pulse)
    }

    /// Advances every joint by at most one ramp step. Called exactly once
    /// per control loop iteration.
    pub fn update(&mut self, now: Instant) {
        for joint in &mut self.joints {
            joint.update(now);
        }
    }

    pub fn joint(&self, id: JointId) -> &JointDriver<PWM> {
        &self.joints[id]
    }

    pub fn is_idle(&self) -> bool {
        self.joints.iter().all(|joint| joint.is_idle())
    }

    /// Writes the position report for the status command.
    pub fn write_status(&self, out: &mut impl Write) {
        let _ = write!(
            out,
            "status - az={} sh={} el={} gr={}",
            self.joints[JointId::Azimuth].current_us(),
            self.joints[JointId::Shoulder].current_us(),
            self.joints[JointId::Varm].current_us(),
            self.joints[JointId::Gripper].current_us(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::conversion::brads_to_pulse;
    use crate::robot::config::{AZIMUTH, GRIPPER, SHOULDER, VARM};
    use crate::robot::servo::mock::MockPwm;
    use crate::robot::servo::Servo;
    use fugit::HertzU32;

    fn mock_arm() -> Arm<MockPwm> {
        let driver = |id: JointId, cfg| {
            JointDriver::new(
                Servo::new(MockPwm::new(), 16383, HertzU32::from_raw(50), id),
                cfg,
            )
        };
        let mut arm = Arm::new(
            driver(JointId::Azimuth, AZIMUTH),
            driver(JointId::Shoulder, SHOULDER),
            driver(JointId::Varm, VARM),
            driver(JointId::Gripper, GRIPPER),
        );
        arm.home();
        arm
    }

    #[test]
    fn varm_subtracts_live_shoulder_target() {
        let mut arm = mock_arm();
        arm.set_target(JointId::Shoulder, 2560, 1000);
        let pulse = arm.set_target(JointId::Varm, 3072, 800);
        assert_eq!(
            pulse,
            brads_to_pulse(3072 - 2560, &VARM),
            "V-arm must be driven to the elbow angle minus the shoulder target"
        );

        // A new shoulder target changes the next elbow command, not the
        // V-arm actuator itself.
        let varm_target = arm.joint(JointId::Varm).target_us();
        arm.set_target(JointId::Shoulder, 1024, 1000);
        assert_eq!(arm.joint(JointId::Varm).target_us(), varm_target);
        let pulse = arm.set_target(JointId::Varm, 1024, 800);
        assert_eq!(pulse, brads_to_pulse(1024 - 1024, &VARM));
    }

    #[test]
    fn elbow_equal_to_shoulder_centers_the_varm() {
        let mut arm = mock_arm();
        arm.set_target(JointId::Shoulder, 2048, 500);
        let pulse = arm.set_target(JointId::Varm, 2048, 500);
        assert_eq!(pulse, VARM.home_us);
    }

    #[test]
    fn gripper_presets() {
        let mut arm = mock_arm();
        assert_eq!(arm.set_gripper(true), GRIPPER_OPEN_US);
        assert_eq!(arm.set_gripper(false), GRIPPER_CLOSED_US);
    }

    #[test]
    fn status_reports_every_joint() {
        let arm = mock_arm();
        let mut out = crate::protocol::Response::new();
        arm.write_status(&mut out);
        assert_eq!(out.as_str(), "status - az=1500 sh=1500 el=1500 gr=1400");
    }

    #[test]
    fn update_converges_all_joints() {
        let mut arm = mock_arm();
        arm.set_target(JointId::Azimuth, 3072, 1000);
        arm.set_target(JointId::Shoulder, 1024, 1000);
        arm.set_gripper(true);
        let mut t = 0;
        while !arm.is_idle() {
            t += 1;
            arm.update(Instant::from_millis(t));
            assert!(t < 50_000, "arm never settled");
        }
        assert_eq!(arm.joint(JointId::Azimuth).current_us(), AZIMUTH.max_us);
        assert_eq!(arm.joint(JointId::Shoulder).current_us(), SHOULDER.min_us);
        assert_eq!(arm.joint(JointId::Gripper).current_us(), GRIPPER_OPEN_US);
    }
}
