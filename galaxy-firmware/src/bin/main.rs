// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_net::{
    Config as NetConfig, DhcpConfig, Ipv4Address, Ipv4Cidr, StackResources, StaticConfigV4,
};
use embassy_time::{Duration, Timer};
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use static_cell::StaticCell;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

use galaxy_core::Projector;
use galaxy_projector::config::{
    EXTRA_HEAP_SIZE, HOSTNAME, HTTP_TASK_POOL_SIZE, STATIC_IP, WIFI_HEAP_SIZE, WIFI_PASSWORD,
    WIFI_SSID,
};
use galaxy_projector::hal::{PwmPins, SwitchPins, init_pwm};
use galaxy_projector::tasks::{
    connection_task, http_server_task, input_task, ip_task, net_task, output_task,
};
use galaxy_projector::{CommandChannel, CommandSender, SnapshotChannel, on_state_change};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Verdrahtet Ausgänge, Taster und Kanäle, startet Output- und Input-Task
/// und bringt danach optional WiFi + Webserver hoch.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    info!("Galaxy projector booting");

    // Ausgänge: alle Kanäle starten mit Duty 0, Power-FSM startet in "Power Off"
    let rig = init_pwm(
        peripherals.LEDC,
        PwmPins {
            red: peripherals.GPIO4.into(),
            green: peripherals.GPIO5.into(),
            blue: peripherals.GPIO6.into(),
            white: peripherals.GPIO7.into(),
            projector: peripherals.GPIO10.into(),
            motor: peripherals.GPIO11.into(),
        },
    );
    let projector =
        Projector::new(rig, Some(on_state_change)).expect("preset tables exceed MAX_STATES");

    let switches = SwitchPins::new(
        peripherals.GPIO18.into(),
        peripherals.GPIO19.into(),
        peripherals.GPIO20.into(),
        peripherals.GPIO21.into(),
    );

    // Kommandos: Taster + WebSockets → Output-Task
    static COMMAND_CHANNEL: StaticCell<CommandChannel> = StaticCell::new();
    let command_channel = &*COMMAND_CHANNEL.init(CommandChannel::new());
    let command_sender = command_channel.sender();

    // Snapshots: Output-Task → alle WebSocket-Clients
    static SNAPSHOT_CHANNEL: StaticCell<SnapshotChannel> = StaticCell::new();
    let snapshot_channel = &*SNAPSHOT_CHANNEL.init(SnapshotChannel::new());
    let snapshot_publisher = snapshot_channel
        .publisher()
        .expect("snapshot channel has a publisher slot");

    spawner
        .spawn(output_task(
            projector,
            command_channel.receiver(),
            snapshot_publisher,
        ))
        .expect("spawn output task");
    spawner
        .spawn(input_task(switches, command_sender))
        .expect("spawn input task");

    match (WIFI_SSID, WIFI_PASSWORD) {
        (Some(ssid), Some(password)) => {
            start_network(
                spawner,
                peripherals.WIFI,
                ssid,
                password,
                snapshot_channel,
                command_sender,
            );
        }
        _ => warn!("WiFi: no credentials compiled in, continuing offline"),
    }

    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

/// Radio, Netzwerk-Stack und HTTP-Server starten
fn start_network(
    spawner: Spawner,
    wifi: esp_hal::peripherals::WIFI<'static>,
    ssid: &'static str,
    password: &'static str,
    snapshot_channel: &'static SnapshotChannel,
    command_sender: CommandSender,
) {
    static RADIO_INIT: StaticCell<esp_radio::Controller> = StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, wifi, Default::default())
            .expect("Failed to initialize Wi-Fi");

    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    let net_config = match STATIC_IP {
        Some(ip) => {
            let [a, b, c, d] = ip.address;
            let [ga, gb, gc, gd] = ip.gateway;
            NetConfig::ipv4_static(StaticConfigV4 {
                address: Ipv4Cidr::new(Ipv4Address::new(a, b, c, d), ip.prefix_len),
                gateway: Some(Ipv4Address::new(ga, gb, gc, gd)),
                dns_servers: Default::default(),
            })
        }
        None => {
            let mut dhcp = DhcpConfig::default();
            dhcp.hostname = HOSTNAME.try_into().ok();
            NetConfig::dhcpv4(dhcp)
        }
    };

    // HTTP-Listener + DHCP + Reserve
    static RESOURCES: StaticCell<StackResources<{ HTTP_TASK_POOL_SIZE + 2 }>> = StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    let (stack, runner) = embassy_net::new(wifi_interface.sta, net_config, resources, seed);

    spawner
        .spawn(connection_task(wifi_controller, ssid, password))
        .expect("spawn wifi task");
    spawner.spawn(net_task(runner)).expect("spawn net task");
    spawner.spawn(ip_task(stack)).expect("spawn ip task");

    for task_id in 0..HTTP_TASK_POOL_SIZE {
        spawner
            .spawn(http_server_task(task_id, stack, snapshot_channel, command_sender))
            .expect("spawn http task");
    }
}
