// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Taster und WebSockets schicken Kommandos an den Output-Task,
// der Output-Task broadcastet Snapshots an die WebSockets.

pub mod http;
pub mod input;
pub mod output;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use http::http_server_task;
pub use input::input_task;
pub use output::output_task;
pub use wifi::{connection_task, ip_task, net_task};
