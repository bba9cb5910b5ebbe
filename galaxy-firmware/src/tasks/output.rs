// Output Task - einziger Besitzer der vier FSMs
use defmt::{error, info, warn};
use embassy_time::{Duration, Instant, Ticker};
use embedded_hal::pwm::SetDutyCycle;

use galaxy_core::{Command, Projector};

use crate::config::OUTPUT_FRAME_MS;
use crate::hal::PwmChannel;
use crate::{CommandReceiver, POWER_GATE, STATE_CHANGED, SnapshotPublisher};

/// Output Logic - Testbare Business Logic ohne Hardware-Abhängigkeit
///
/// Pro Frame:
/// 1. alle wartenden Kommandos anwenden (Taster + WebSockets)
/// 2. bei Zustandswechsel oder `Refresh` einen Snapshot publishen
/// 3. Power-Gate für die Taster aktualisieren
/// 4. FSMs in fester Reihenfolge ausführen (Power → Brightness → Colour → Motor)
///
/// Da nur dieser Task die FSMs verändert, ist jeder Snapshot konsistent.
pub async fn output_logic<P: SetDutyCycle>(
    mut projector: Projector<P>,
    command_receiver: CommandReceiver,
    snapshot_publisher: SnapshotPublisher,
) -> ! {
    let mut ticker = Ticker::every(Duration::from_millis(OUTPUT_FRAME_MS));

    snapshot_publisher.publish_immediate(projector.snapshot());

    loop {
        let mut refresh = false;

        while let Ok(command) = command_receiver.try_receive() {
            info!("Output: {}", command);
            match projector.apply(command) {
                Ok(()) => refresh |= command == Command::Refresh,
                Err(e) => warn!("Output: command rejected: {}", e),
            }
        }

        let changed = STATE_CHANGED.try_take().is_some();
        if changed || refresh {
            snapshot_publisher.publish_immediate(projector.snapshot());
        }

        POWER_GATE.set(projector.is_powered());
        projector.render(Instant::now().as_millis());

        if let Some(fault) = projector.take_fault() {
            error!("Output: PWM write failed: {}", fault);
        }

        ticker.next().await;
    }
}

/// Output Task - Embassy Task für parallele Ausführung
///
/// Nimmt den fertig verdrahteten Projektor aus main.rs und ruft die
/// testbare `output_logic()` auf.
#[embassy_executor::task]
pub async fn output_task(
    projector: Projector<PwmChannel>,
    command_receiver: CommandReceiver,
    snapshot_publisher: SnapshotPublisher,
) {
    output_logic(projector, command_receiver, snapshot_publisher).await
}
