//! The cooperative control loop.
//!
//! One iteration drains at most one pending command line into the
//! dispatcher, then advances every joint by at most one ramp step. Nothing
//! in the loop blocks: lines are taken with `try_receive` and a joint
//! update is a gated check-and-maybe-step, never a sleep.
extern crate alloc;

use crate::protocol::dispatch::Dispatcher;
use crate::protocol::{Line, Response};
use crate::robot::arm::Arm;
use crate::robot::commands::{IndicatorCommand, ToneCommand};
use crate::robot::config::{JointConfig, AZIMUTH, GRIPPER, SHOULDER, VARM};
use crate::robot::joint::JointId;
use crate::robot::motion::JointDriver;
use crate::robot::servo::Servo;
use crate::{INDICATOR_CHANNEL_SIZE, LINE_CHANNEL_SIZE, RESPONSE_CHANNEL_SIZE, TONE_CHANNEL_SIZE};
use alloc::boxed::Box;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Receiver, Sender};
use embassy_time::{Duration, Instant, Ticker, Timer};
use esp_hal::gpio::AnyPin;
use esp_hal::ledc::channel::{self, Channel, ChannelIFace, Number};
use esp_hal::ledc::timer::{self, LSClockSource, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::peripherals::LEDC;
use esp_hal::time::Rate;
use fugit::HertzU32;
use log::{debug, info};

#[embassy_executor::task]
pub async fn control_task(
    servo_pins: [AnyPin<'static>; 4],
    ledc: LEDC<'static>,
    line_receiver: Receiver<'static, CriticalSectionRawMutex, Line, LINE_CHANNEL_SIZE>,
    response_sender: Sender<'static, CriticalSectionRawMutex, Response, RESPONSE_CHANNEL_SIZE>,
    indicator_sender: Sender<
        'static,
        CriticalSectionRawMutex,
        IndicatorCommand,
        INDICATOR_CHANNEL_SIZE,
    >,
    tone_sender: Sender<'static, CriticalSectionRawMutex, ToneCommand, TONE_CHANNEL_SIZE>,
) {
    info!("Starting control task");
    let mut ledc = Ledc::new(ledc);
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    //Configure the 50Hz servo timer. Leak it to get a static lifetime.
    let mut servo_timer = ledc.timer::<LowSpeed>(timer::Number::Timer0);
    servo_timer
        .configure(timer::config::Config {
            duty: timer::config::Duty::Duty14Bit,
            clock_source: LSClockSource::APBClk,
            frequency: Rate::from_hz(50),
        })
        .expect("Fail creating ledc timer");
    let servo_timer = Box::leak(Box::new(servo_timer));
    Timer::after_millis(500).await;

    let [p_azimuth, p_shoulder, p_varm, p_gripper] = servo_pins;
    let mut make_joint = |number: Number,
                          pin: AnyPin<'static>,
                          id: JointId,
                          cfg: JointConfig|
     -> JointDriver<Channel<'static, LowSpeed>> {
        let mut pwm = ledc.channel(number, pin);
        pwm.configure(channel::config::Config {
            timer: servo_timer,
            duty_pct: 7,
            pin_config: channel::config::PinConfig::PushPull,
        })
        .expect("Fail configurating servo channel");
        let max_duty = pwm.max_duty_cycle() as u32;
        JointDriver::new(Servo::new(pwm, max_duty, HertzU32::from_raw(50), id), cfg)
    };

    let mut arm = Arm::new(
        make_joint(Number::Channel0, p_azimuth, JointId::Azimuth, AZIMUTH),
        make_joint(Number::Channel1, p_shoulder, JointId::Shoulder, SHOULDER),
        make_joint(Number::Channel2, p_varm, JointId::Varm, VARM),
        make_joint(Number::Channel3, p_gripper, JointId::Gripper, GRIPPER),
    );
    arm.home();
    let mut dispatcher = Dispatcher::new(indicator_sender, tone_sender);
    info!("Robot arm initialized!");

    let mut ticker = Ticker::every(Duration::from_millis(1));
    loop {
        // At most one command per iteration keeps joint update jitter
        // bounded.
        if let Ok(line) = line_receiver.try_receive() {
            debug!("[CONTROL_TASK] received: {}", line.as_str());
            let response = dispatcher.dispatch(&mut arm, line.as_str());
            // The TCP handler waits for each reply before forwarding the
            // next line, so this send cannot back up.
            response_sender.send(response).await;
        }

        arm.update(Instant::now());
        ticker.next().await;
    }
}
