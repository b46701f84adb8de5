//! Command dispatch.
//!
//! Resolves one received line against the command table and executes it
//! against the arm. The arm is passed in explicitly so the dispatcher owns
//! no joint state; it only keeps the senders for the indicator and tone
//! capabilities, which are fire-and-forget.
use crate::protocol::commands::{lookup, Action};
use crate::protocol::request::Request;
use crate::protocol::Response;
use crate::robot::arm::Arm;
use crate::robot::commands::{IndicatorCommand, ToneCommand};
use crate::{INDICATOR_CHANNEL_SIZE, TONE_CHANNEL_SIZE};
use core::fmt::Write;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

pub struct Dispatcher {
    indicator:
        Sender<'static, CriticalSectionRawMutex, IndicatorCommand, INDICATOR_CHANNEL_SIZE>,
    tone: Sender<'static, CriticalSectionRawMutex, ToneCommand, TONE_CHANNEL_SIZE>,
}

impl Dispatcher {
    pub fn new(
        indicator: Sender<
            'static,
            CriticalSectionRawMutex,
            IndicatorCommand,
            INDICATOR_CHANNEL_SIZE,
        >,
        tone: Sender<'static, CriticalSectionRawMutex, ToneCommand, TONE_CHANNEL_SIZE>,
    ) -> Self {
        Self { indicator, tone }
    }

    /// Executes one complete line and returns the reply. Never panics on
    /// malformed input: unknown commands and missing arguments degrade
    /// into diagnostic text, out-of-range angles saturate.
    pub fn dispatch<PWM>(&mut self, arm: &mut Arm<PWM>, line: &str) -> Response
    where
        PWM: SetDutyCycle,
    {
        let request = Request::parse(line);
        let mut response = Response::new();

        let Some(command) = lookup(request.hash) else {
            let _ = write!(
                response,
                "{} - unsupported command, hash={}",
                request.token, request.hash
            );
            return response;
        };

        if request.args.len() < command.min_args {
            let _ = write!(response, "{} - insuffcient arguments.", command.name);
            return response;
        }

        match command.action {
            Action::Move(id) => {
                let pulse = arm.set_target(id, request.args[0], request.args[1]);
                let _ = write!(
                    response,
                    "{} - target = {} us, {} ms.",
                    command.name, pulse, request.args[1]
                );
            }
            Action::Grip => {
                let open = request.args[0] == 0;
                arm.set_gripper(open);
                let state = if open { "open" } else { "closed" };
                let _ = write!(response, "{} - {}.", command.name, state);
            }
            Action::Home => {
                arm.home();
                let _ = write!(response, "{}.", command.name);
            }
            Action::Slew => {
                // Reserved for a coordinated multi-joint move; the
                // arguments are parsed and the response stays unchanged.
            }
            Action::Led => {
                let on = request.args[0] != 0;
                let indicator = if on {
                    IndicatorCommand::On
                } else {
                    IndicatorCommand::Off
                };
                if self.indicator.try_send(indicator).is_err() {
                    warn!("indicator channel full, dropping command");
                }
                let level = if on { "high" } else { "low" };
                let _ = write!(response, "{} - {}.", command.name, level);
            }
            Action::Status => arm.write_status(&mut response),
            Action::Tone => {
                let frequency_hz = request.args[0].clamp(1, 20_000) as u32;
                let duration_ms = request.args[1].clamp(0, 10_000) as u32;
                let tone = ToneCommand {
                    frequency_hz,
                    duration_ms,
                };
                if self.tone.try_send(tone).is_err() {
                    warn!("tone channel full, dropping command");
                }
                let _ = write!(
                    response,
                    "{} - frequency {}, duration {}.",
                    command.name, frequency_hz, duration_ms
                );
            }
        }
        response
    }
}
