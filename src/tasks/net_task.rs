//! Networking and TCP command server task.
//!
//! Manages the WiFi connection, listens for command lines over TCP,
//! forwards each complete line to the control task, and writes the reply
//! back to the client.
//!
//! Handles network errors and reconnection logic.
extern crate alloc;

use crate::protocol::{Line, Response};
use crate::robot::config::{PORT, RX_BUF_SIZE, TX_BUF_SIZE};
use crate::{LINE_CHANNEL_SIZE, RESPONSE_CHANNEL_SIZE};
use alloc::string::String;
use core::str::FromStr;
use embassy_net::{tcp::TcpSocket, IpListenEndpoint, Stack};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Receiver, Sender};
use embassy_time::Timer;
use embedded_io_async::Write;
use esp_wifi::wifi::{ClientConfiguration, WifiController, WifiDevice};
use log::{error, info, warn};

#[embassy_executor::task]
pub async fn runner_task(mut runner: embassy_net::Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}

#[embassy_executor::task]
pub async fn tcp_server(
    stack: Stack<'static>,
    line_sender: Sender<'static, CriticalSectionRawMutex, Line, LINE_CHANNEL_SIZE>,
    response_receiver: Receiver<'static, CriticalSectionRawMutex, Response, RESPONSE_CHANNEL_SIZE>,
) {
    let mut rx_buf = [0u8; RX_BUF_SIZE];
    let mut tx_buf = [0u8; TX_BUF_SIZE];

    while !stack.is_link_up() {
        Timer::after_millis(500).await;
    }

    if let Some(config) = stack.config_v4() {
        info!(
            "TCP server listening at address {}:{}",
            config.address, PORT
        );
    }

    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buf, &mut tx_buf);

        match socket
            .accept(IpListenEndpoint {
                port: PORT,
                addr: None,
            })
            .await
        {
            Ok(_) => {
                info!("Client connected!");
                handle_connection(&mut socket, &line_sender, &response_receiver).await;
            }
            Err(e) => {
                error!("Accept failed: {:?}", e);
                Timer::after_millis(500).await; // Backoff delay
                continue;
            }
        }
    }
}

pub async fn handle_connection(
    socket: &mut TcpSocket<'_>,
    line_sender: &Sender<'static, CriticalSectionRawMutex, Line, LINE_CHANNEL_SIZE>,
    response_receiver: &Receiver<
        'static,
        CriticalSectionRawMutex,
        Response,
        RESPONSE_CHANNEL_SIZE,
    >,
) {
    let mut rx_buf = [0u8; RX_BUF_SIZE];
    let mut line = Line::new();
    loop {
        match socket.read(&mut rx_buf).await {
            Ok(0) => break,
            Ok(n) => {
                for &byte in &rx_buf[..n] {
                    if byte == b'\r' {
                        continue;
                    }
                    if byte != b'\n' {
                        // Characters past the line buffer are dropped, not
                        // carried into the next line.
                        let _ = line.push(byte as char);
                        continue;
                    }
                    if line.trim().is_empty() {
                        line.clear();
                        continue;
                    }
                    // A dropped client may have left its reply behind.
                    while response_receiver.try_receive().is_ok() {}
                    line_sender.send(line.clone()).await;
                    line.clear();

                    let response = response_receiver.receive().await;
                    if socket.write_all(response.as_bytes()).await.is_err()
                        || socket.write_all(b"\n").await.is_err()
                    {
                        warn!("Client dropped before the reply");
                        return;
                    }
                }
            }
            Err(e) => {
                error!("Read error: {:?}", e);
                break;
            }
        }
    }
}

pub async fn configurate_and_start_wifi(wifi_controller: &mut WifiController<'_>) {
    let ssid = env!("WIFI_SSID");
    let password = env!("WIFI_PASS");
    let config = esp_wifi::wifi::Configuration::Client(ClientConfiguration {
        ssid: String::from_str(ssid).unwrap(),
        password: String::from_str(password).unwrap(),
        ..Default::default()
    });

    info!("Connecting to wifi: {ssid}");
    wifi_controller
        .set_configuration(&config)
        .expect("fail setting configuration of wifi controller");

    wifi_controller
        .set_power_saving(esp_wifi::config::PowerSaveMode::None)
        .expect("Fail setting wifi power mode");

    wifi_controller.start().unwrap();
    wifi_controller
        .connect_async()
        .await
        .inspect_err(|e| error!("An error occured trying to connect to wifi: {e:?}"))
        .unwrap();

    if let Ok(rssi) = wifi_controller.rssi() {
        info!("Wifi connected! signal: {}", rssi)
    }
}
