// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

// ============================================================================
// Ausgänge (LEDC)
// ============================================================================

/// PWM-Frequenz aller LEDC-Kanäle in kHz
/// 24 kHz liegt über dem Hörbereich (Motor pfeift nicht)
pub const PWM_FREQUENCY_KHZ: u32 = 24;

// GPIO-Zuordnung der sechs PWM-Ausgänge:
//   GPIO4  Rot        GPIO5  Grün       GPIO6  Blau
//   GPIO7  Weiß       GPIO10 Projektor  GPIO11 Motor (BJT)
// Die Pins werden in main.rs direkt aus den Peripherals genommen.

/// Periode des Output-Frames in ms (Kommandos anwenden + FSMs ausführen)
pub const OUTPUT_FRAME_MS: u64 = 5;

// ============================================================================
// Taster
// ============================================================================

// GPIO-Zuordnung der Taster (active-low, interner Pull-up):
//   GPIO18 Power   GPIO19 Brightness   GPIO20 Colour   GPIO21 Motor

/// Abtastperiode des Input-Tasks in ms
pub const INPUT_POLL_MS: u64 = 10;

/// Ruhezeit nach dem Loslassen, bevor ein neuer Druck zählt
pub const RELEASE_QUIET_MS: u64 = galaxy_core::switch::DEFAULT_RELEASE_QUIET_MS;

// ============================================================================
// Task-Kommunikation
// ============================================================================

/// Kapazität der Kommando-Queue (Taster + WebSockets → Output-Task)
pub const COMMAND_QUEUE_SIZE: usize = 8;

/// Maximale Anzahl gleichzeitiger Snapshot-Subscriber (WebSocket-Clients)
pub const MAX_SNAPSHOT_SUBSCRIBERS: usize = 8;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID, zur Build-Zeit aus WIFI_SSID (.env)
/// Fehlt sie, läuft die Firmware offline
pub const WIFI_SSID: Option<&str> = option_env!("WIFI_SSID");

/// WiFi Passwort, zur Build-Zeit aus WIFI_PASSWORD (.env)
pub const WIFI_PASSWORD: Option<&str> = option_env!("WIFI_PASSWORD");

/// Verbindungsversuche pro Runde, danach bleibt das Gerät offline
pub const MAX_WIFI_ATTEMPTS: u32 = 10;

/// Pause zwischen zwei Verbindungsversuchen in ms
pub const WIFI_RETRY_DELAY_MS: u64 = 500;

/// DHCP Hostname
pub const HOSTNAME: &str = "galaxy-projector";

/// Statische IPv4-Konfiguration statt DHCP
pub struct StaticIp {
    pub address: [u8; 4],
    pub prefix_len: u8,
    pub gateway: [u8; 4],
}

/// `None` = DHCP
pub const STATIC_IP: Option<StaticIp> = None;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// HTTP Server Konfiguration
// ============================================================================

/// Anzahl paralleler HTTP-Server-Tasks
pub const HTTP_TASK_POOL_SIZE: usize = 4;

/// HTTP Buffer-Größe in Bytes
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX Buffer-Größe in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// WebSocket Message Buffer-Größe in Bytes
/// Größte Nachricht ist der JSON-Umschlag (< 64 Bytes)
pub const WEBSOCKET_BUFFER_SIZE: usize = 256;

/// JSON Buffer für Snapshots
/// Vier Kanäle mit custom-Wert: ~170 Bytes
pub const JSON_SNAPSHOT_BUFFER_SIZE: usize = 256;

/// JSON Buffer für Fehlermeldungen {"type":"error","message":"..."}
pub const JSON_ERROR_BUFFER_SIZE: usize = 128;
