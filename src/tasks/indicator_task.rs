//! Indicator LED task.
use crate::robot::commands::IndicatorCommand;
use crate::INDICATOR_CHANNEL_SIZE;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Receiver;
use esp_hal::gpio::Output;

#[embassy_executor::task]
pub async fn indicator_task(
    mut led: Output<'static>,
    receiver: Receiver<'static, CriticalSectionRawMutex, IndicatorCommand, INDICATOR_CHANNEL_SIZE>,
) {
    loop {
        match receiver.receive().await {
            IndicatorCommand::On => led.set_high(),
            IndicatorCommand::Off => led.set_low(),
        }
    }
}
