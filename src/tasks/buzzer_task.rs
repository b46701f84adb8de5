//! Buzzer task: plays commanded tones.
//!
//! Bit-bangs a square wave on the piezo pin. Good enough for protocol
//! feedback beeps; the pin idles low between tones.
use crate::robot::commands::ToneCommand;
use crate::TONE_CHANNEL_SIZE;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Receiver;
use embassy_time::{Duration, Instant, Timer};
use esp_hal::gpio::Output;
use log::debug;

#[embassy_executor::task]
pub async fn buzzer_task(
    mut pin: Output<'static>,
    receiver: Receiver<'static, CriticalSectionRawMutex, ToneCommand, TONE_CHANNEL_SIZE>,
) {
    loop {
        let tone = receiver.receive().await;
        debug!(
            "[BUZZER_TASK] tone {}Hz for {}ms",
            tone.frequency_hz, tone.duration_ms
        );
        let half_period = Duration::from_micros((500_000 / tone.frequency_hz.max(1)) as u64);
        let deadline = Instant::now() + Duration::from_millis(tone.duration_ms as u64);
        while Instant::now() < deadline {
            pin.toggle();
            Timer::after(half_period).await;
        }
        pin.set_low();
    }
}
