// HTTP Server Task - Serviert die Steuerseite und den WebSocket
use core::future::pending;
use defmt::{info, warn};
use embassy_futures::select::{Either, select};
use embassy_net::Stack;
use embassy_time::Duration;
use picoserve::{io::embedded_io_async, response::IntoResponse, response::ws, routing::get};

use galaxy_core::{CommandError, Snapshot};

use crate::config::*;
use crate::web::{
    INDEX_HTML,
    protocol::{WsServerMessage, decode},
};
use crate::{CommandSender, SnapshotChannel, SnapshotSubscriber};

/// Response-Enum für WebSocket-Endpoint
/// Ermöglicht Rückgabe von entweder WebSocket-Upgrade oder HTTP-Fehler
enum WebSocketResponse {
    Upgrade(
        ws::UpgradedWebSocket<ws::UnspecifiedProtocol, ws::CallbackNotUsingState<WebSocketHandler>>,
    ),
    ServiceUnavailable,
}

impl IntoResponse for WebSocketResponse {
    async fn write_to<
        R: embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        match self {
            WebSocketResponse::Upgrade(ws) => ws.write_to(connection, response_writer).await,
            WebSocketResponse::ServiceUnavailable => {
                picoserve::response::Response::new(
                    picoserve::response::StatusCode::new(503),
                    "Service Unavailable: too many WebSocket connections",
                )
                .with_header("Retry-After", "5")
                .write_to(connection, response_writer)
                .await
            }
        }
    }
}

/// HTTP Server Task
///
/// - GET /   → Steuerseite
/// - GET /ws → WebSocket: Kommandos rein, Snapshots raus
///
/// **Task Pool:** wird `HTTP_TASK_POOL_SIZE`x gespawnt, damit Seite und
/// WebSockets gleichzeitig bedient werden.
#[embassy_executor::task(pool_size = HTTP_TASK_POOL_SIZE)]
pub async fn http_server_task(
    task_id: usize,
    stack: Stack<'static>,
    snapshot_channel: &'static SnapshotChannel,
    command_sender: CommandSender,
) {
    info!("HTTP: Server task {} starting on port 80...", task_id);

    let app = picoserve::Router::new().route("/", get(serve_html)).route(
        "/ws",
        get(
            move |upgrade: picoserve::response::WebSocketUpgrade| async move {
                // Ein Subscriber pro Client; sind alle vergeben, gibt es HTTP 503
                match snapshot_channel.subscriber() {
                    Ok(snapshot_subscriber) => {
                        info!("HTTP: WebSocket upgrade");
                        let handler = WebSocketHandler {
                            command_sender,
                            snapshot_subscriber,
                        };
                        WebSocketResponse::Upgrade(upgrade.on_upgrade(handler))
                    }
                    Err(_) => {
                        warn!("HTTP: No snapshot subscriber slots left, sending HTTP 503");
                        WebSocketResponse::ServiceUnavailable
                    }
                }
            },
        ),
    );

    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    })
    .keep_connection_alive();

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);
    let _ = server
        .listen_and_serve(task_id, stack, 80, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Server task {} ended", task_id);
}

async fn serve_html() -> impl IntoResponse {
    picoserve::response::Response::new(picoserve::response::StatusCode::OK, INDEX_HTML)
        .with_header("Content-Type", "text/html; charset=utf-8")
}

/// Zustand einer WebSocket-Verbindung
struct WebSocketHandler {
    command_sender: CommandSender,
    snapshot_subscriber: SnapshotSubscriber,
}

impl ws::WebSocketCallback for WebSocketHandler {
    async fn run<R: embedded_io_async::Read, W: embedded_io_async::Write<Error = R::Error>>(
        mut self,
        mut rx: ws::SocketRx<R>,
        mut tx: ws::SocketTx<W>,
    ) -> Result<(), W::Error> {
        let mut buffer = [0u8; WEBSOCKET_BUFFER_SIZE];

        let close_reason = loop {
            match select(
                rx.next_message(&mut buffer, pending()),
                self.snapshot_subscriber.next_message_pure(),
            )
            .await
            {
                Either::First(ws_result) => match ws_result?.ignore_never_b() {
                    Ok(ws::Message::Text(text)) => match decode(text) {
                        // Antwort kommt als Snapshot über den PubSubChannel,
                        // sobald der Output-Task das Kommando angewendet hat
                        Ok(command) => self.command_sender.send(command).await,
                        Err(e) => {
                            warn!("HTTP: Rejected message: {}", e);
                            send_error(&mut tx, e).await?;
                        }
                    },
                    Ok(ws::Message::Binary(data)) => {
                        info!("HTTP: Binary message ignored ({} bytes)", data.len());
                    }
                    Ok(ws::Message::Ping(data)) => tx.send_pong(data).await?,
                    Ok(ws::Message::Pong(_)) => {}
                    Ok(ws::Message::Close(_)) => break None,
                    Err(error) => {
                        warn!("HTTP: WebSocket error");
                        break Some((error.code(), "WebSocket Error"));
                    }
                },
                Either::Second(snapshot) => send_snapshot(&mut tx, &snapshot).await?,
            }
        };

        info!("HTTP: WebSocket connection closed");
        tx.close(close_reason).await
    }
}

async fn send_snapshot<W: embedded_io_async::Write>(
    tx: &mut ws::SocketTx<W>,
    snapshot: &Snapshot,
) -> Result<(), W::Error> {
    let mut json = [0u8; JSON_SNAPSHOT_BUFFER_SIZE];
    match serde_json_core::to_slice(snapshot, &mut json) {
        Ok(n) => send_json(tx, &json[..n]).await,
        Err(_) => {
            warn!("HTTP: Snapshot does not fit JSON buffer");
            Ok(())
        }
    }
}

async fn send_error<W: embedded_io_async::Write>(
    tx: &mut ws::SocketTx<W>,
    error: CommandError,
) -> Result<(), W::Error> {
    let message = WsServerMessage::Error {
        message: error.as_str(),
    };
    let mut json = [0u8; JSON_ERROR_BUFFER_SIZE];
    match serde_json_core::to_slice(&message, &mut json) {
        Ok(n) => send_json(tx, &json[..n]).await,
        Err(_) => Ok(()),
    }
}

async fn send_json<W: embedded_io_async::Write>(
    tx: &mut ws::SocketTx<W>,
    json: &[u8],
) -> Result<(), W::Error> {
    match core::str::from_utf8(json) {
        Ok(text) => tx.send_text(text).await,
        Err(_) => Ok(()),
    }
}
