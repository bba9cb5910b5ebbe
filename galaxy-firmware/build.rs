// Build-Script: Wird vor dem Kompilieren ausgeführt
// Konfiguriert den Linker für ESP32-C6 Embedded Rust

fn main() {
    // Lade .env file für WiFi-Credentials
    // Ohne Credentials startet der Projektor offline (nur Taster)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  .env file nicht gefunden: {}", e);
        eprintln!("   Ohne WIFI_SSID/WIFI_PASSWORD läuft die Firmware offline");
    }
    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rerun-if-env-changed=WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WIFI_PASSWORD");

    // Werte werden zur Compile-Zeit eingebacken (option_env! in config.rs)
    if let Ok(ssid) = std::env::var("WIFI_SSID") {
        println!("cargo:rustc-env=WIFI_SSID={}", ssid);
    }
    if let Ok(password) = std::env::var("WIFI_PASSWORD") {
        println!("cargo:rustc-env=WIFI_PASSWORD={}", password);
    }

    // Registriere hilfsbereiten Error-Handler für Linker-Fehler
    linker_be_nice();

    // Füge Linker-Skripte hinzu:

    // 1. defmt.x - defmt Logging-Support
    //    Definiert Symbole für defmt's binäres Log-Format
    println!("cargo:rustc-link-arg=-Tdefmt.x");

    // 2. linkall.x - ESP32 Memory-Layout
    //    WICHTIG: Muss als LETZTES kommen (sonst Probleme mit flip-link)
    //    Definiert Flash/RAM-Layout und Startup-Code
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

// Error-Handler: Zeigt hilfreiche Tipps bei Linker-Fehlern
// Wird vom Linker als "--error-handling-script" aufgerufen
fn linker_be_nice() {
    let args: Vec<String> = std::env::args().collect();

    // Vom Linker aufgerufen: <kind> <symbol>
    if let [_, kind, what, ..] = args.as_slice() {
        if kind != "undefined-symbol" {
            std::process::exit(1);
        }
        if let Some(hint) = missing_symbol_hint(what) {
            eprintln!();
            eprintln!("💡 {}", hint);
            eprintln!();
        }
        std::process::exit(0);
    }

    println!(
        "cargo:rustc-link-arg=--error-handling-script={}",
        std::env::current_exe().unwrap().display()
    );
}

// Nur Symbole, die diese Firmware tatsächlich braucht
fn missing_symbol_hint(symbol: &str) -> Option<&'static str> {
    match symbol {
        s if s.starts_with("_defmt_") => Some(
            "`defmt` Logger fehlt - `esp-println` braucht das Feature `defmt-espflash` und `defmt.x` muss gelinkt sein",
        ),
        "_stack_start" => Some("Linker-Skript `linkall.x` fehlt"),
        s if s.starts_with("esp_rtos_") => Some(
            "`esp-radio` findet keinen Scheduler - wurde `esp_rtos::start()` in main.rs aufgerufen?",
        ),
        "free" | "malloc" | "calloc" | "malloc_internal" | "calloc_internal"
        | "realloc_internal" | "free_internal" | "get_free_internal_heap_size" => {
            Some("WiFi braucht `esp-alloc` (Heap für die Radio-Pakete)")
        }
        _ => None,
    }
}
