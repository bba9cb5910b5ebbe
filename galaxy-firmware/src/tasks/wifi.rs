// WiFi Task - Verbindet mit WLAN und managed Connection
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent};

use crate::config::{MAX_WIFI_ATTEMPTS, WIFI_RETRY_DELAY_MS};

/// WiFi Connection Task
///
/// - Startet den Station-Modus mit den Build-Zeit-Credentials
/// - Versucht höchstens `MAX_WIFI_ATTEMPTS` Verbindungen, dann offline
/// - Nach einem Disconnect beginnt eine neue Runde
///
/// Die Taster funktionieren unabhängig davon immer.
#[embassy_executor::task]
pub async fn connection_task(
    mut controller: WifiController<'static>,
    ssid: &'static str,
    password: &'static str,
) {
    info!("WiFi: Starting connection task");

    let client_config = ModeConfig::Client(
        ClientConfig::default()
            .with_ssid(ssid.into())
            .with_password(password.into()),
    );
    if let Err(e) = controller.set_config(&client_config) {
        error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
        return;
    }
    if let Err(e) = controller.start_async().await {
        error!("WiFi: Failed to start: {}", Debug2Format(&e));
        return;
    }

    loop {
        if !connect(&mut controller, ssid).await {
            warn!(
                "WiFi: No connection after {} attempts, continuing offline",
                MAX_WIFI_ATTEMPTS
            );
            return;
        }

        controller.wait_for_event(WifiEvent::StaDisconnected).await;
        warn!("WiFi: Disconnected from AP, will retry...");
    }
}

async fn connect(controller: &mut WifiController<'static>, ssid: &str) -> bool {
    for attempt in 1..=MAX_WIFI_ATTEMPTS {
        info!("WiFi: Connecting to '{}' ({}/{})", ssid, attempt, MAX_WIFI_ATTEMPTS);
        match controller.connect_async().await {
            Ok(()) => {
                info!("WiFi: Connected");
                return true;
            }
            Err(e) => warn!("WiFi: Connection failed: {}", Debug2Format(&e)),
        }
        Timer::after(Duration::from_millis(WIFI_RETRY_DELAY_MS)).await;
    }
    false
}

/// Network Task
///
/// Prozessiert Netzwerk-Pakete des embassy-net Stacks
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// IP Monitor Task
///
/// Loggt die Adresse, sobald der Stack konfiguriert ist (DHCP oder statisch)
#[embassy_executor::task]
pub async fn ip_task(stack: Stack<'static>) {
    stack.wait_config_up().await;

    if let Some(config) = stack.config_v4() {
        info!("WiFi: Got IP address!");
        info!("  IP:      {}", Debug2Format(&config.address.address()));
        info!("  Gateway: {}", Debug2Format(&config.gateway));
        info!("  Open http://{}/ in a browser", Debug2Format(&config.address.address()));
    }
}
