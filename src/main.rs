#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

extern crate alloc;

use alloc::boxed::Box;
use core::future::pending;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{AnyPin, Level, Output, OutputConfig, Pin};
use esp_hal::timer::timg::TimerGroup;
use log::info;
use robot_arm::protocol::{Line, Response};
use robot_arm::robot::commands::{IndicatorCommand, ToneCommand};
use robot_arm::tasks::buzzer_task::buzzer_task;
use robot_arm::tasks::control_task::control_task;
use robot_arm::tasks::indicator_task::indicator_task;
use robot_arm::tasks::net_task::{configurate_and_start_wifi, runner_task, tcp_server};
use robot_arm::{
    INDICATOR_CHANNEL_SIZE, LINE_CHANNEL_SIZE, RESPONSE_CHANNEL_SIZE, TONE_CHANNEL_SIZE,
};

esp_bootloader_esp_idf::esp_app_desc!();

//JOINTS: [azimuth, shoulder, varm, gripper]
//SERVOS: [32, 33, 25, 26]
//LED: 2, BUZZER: 27

macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        STATIC_CELL.init_with(|| $val)
    }};
}

static LINE_CHANNEL: Channel<CriticalSectionRawMutex, Line, LINE_CHANNEL_SIZE> = Channel::new();
static RESPONSE_CHANNEL: Channel<CriticalSectionRawMutex, Response, RESPONSE_CHANNEL_SIZE> =
    Channel::new();
static INDICATOR_CHANNEL: Channel<CriticalSectionRawMutex, IndicatorCommand, INDICATOR_CHANNEL_SIZE> =
    Channel::new();
static TONE_CHANNEL: Channel<CriticalSectionRawMutex, ToneCommand, TONE_CHANNEL_SIZE> =
    Channel::new();

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    esp_println::logger::init_logger_from_env();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let p = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 32 * 1024);
    esp_alloc::heap_allocator!(#[unsafe(link_section = ".dram2_uninit")] size: 96 * 1024);

    let timer0 = TimerGroup::new(p.TIMG1);
    esp_hal_embassy::init(timer0.timer0);

    // take important peripherals
    let mut rng = esp_hal::rng::Rng::new(p.RNG);
    let timer1 = TimerGroup::new(p.TIMG0);
    let wifi_init = esp_wifi::init(timer1.timer0, rng, p.RADIO_CLK)
        .expect("Failed to initialize WIFI controller");
    let wifi_init = Box::leak(Box::new(wifi_init));
    let (mut wifi_controller, interfaces) =
        esp_wifi::wifi::new(wifi_init, p.WIFI).expect("Failed to initialize WIFI controller");

    configurate_and_start_wifi(&mut wifi_controller).await;

    let servo_pins: [AnyPin<'static>; 4] = [
        p.GPIO32.degrade(),
        p.GPIO33.degrade(),
        p.GPIO25.degrade(),
        p.GPIO26.degrade(),
    ];
    let led = Output::new(p.GPIO2, Level::Low, OutputConfig::default());
    let buzzer = Output::new(p.GPIO27, Level::Low, OutputConfig::default());

    //Get the embassy net stack up and working.
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;
    let config = NetConfig::dhcpv4(Default::default());
    let device = interfaces.sta;
    let (stack, runner) = embassy_net::new(
        device,
        config,
        mk_static!(StackResources<3>, StackResources::new()),
        seed,
    );

    info!("Starting robot arm...");
    spawner
        .spawn(control_task(
            servo_pins,
            p.LEDC,
            LINE_CHANNEL.receiver(),
            RESPONSE_CHANNEL.sender(),
            INDICATOR_CHANNEL.sender(),
            TONE_CHANNEL.sender(),
        ))
        .expect("Fail spawning control task");
    spawner
        .spawn(indicator_task(led, INDICATOR_CHANNEL.receiver()))
        .expect("Fail spawning indicator task");
    spawner
        .spawn(buzzer_task(buzzer, TONE_CHANNEL.receiver()))
        .expect("Fail spawning buzzer task");
    spawner
        .spawn(runner_task(runner))
        .expect("Fail spawning runner task");
    spawner
        .spawn(tcp_server(
            stack,
            LINE_CHANNEL.sender(),
            RESPONSE_CHANNEL.receiver(),
        ))
        .expect("Fail spawning net task");

    loop {
        pending::<()>().await;
    }
}
