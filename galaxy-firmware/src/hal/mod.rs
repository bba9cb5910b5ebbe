// Hardware Abstraction Layer (HAL) Module
//
// Bindet die ESP32-C6 Peripherie an die embedded-hal Traits,
// die galaxy-core erwartet (SetDutyCycle, InputPin).

pub mod pwm;
pub mod switches;

pub use pwm::{PwmChannel, PwmPins, init_pwm};
pub use switches::SwitchPins;
