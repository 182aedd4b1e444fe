//! The connection lifecycle around an [`Engine`].
//!
//! A [`Session`] holds at most one live connection: it starts the relay
//! (or trusts one to be running), opens the loopback socket, waits for
//! the server's greeting, sends the handshake, and then hands every
//! inbound line to the engine when the game calls [`Session::tick`].
//!
//! # Threads of control
//!
//! ```text
//! reader task ──lines──→ unbounded queue ──tick()──→ Engine ──→ hooks
//!                                                       │
//! writer task ←──────────────── Outbox ←────────────────┘
//! ```
//!
//! The reader task only reads; it never parses. Everything else runs on
//! the caller of `tick`, so hooks never need to be thread-safe beyond
//! `Send`.
//!
//! # Shutdown
//!
//! [`Session::disconnect`] flips a `watch` flag that both tasks select
//! on, and stops the relay. Dropping a session has the same effect: the
//! flag's sender goes away, which the tasks also observe, and the relay
//! child is killed on drop.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use honkbridge_protocol::message::parse_room_info;
use honkbridge_protocol::{split_batch, ItemId, LocationId, Slot};
use honkbridge_transport::{
    locate_relay, LineReader, RelayProcess, TcpLineConnection, TransportError,
};
use tokio::io::AsyncRead;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::{
    ConnectConfig, Engine, LogRing, SessionError, SessionHooks, SessionOptions, SessionState,
    SessionStatus, SessionStore, StatusCell,
};

/// A connection to the multiworld server, through the relay.
///
/// [`Session::new`] creates an idle session that owns the hooks and the
/// store; [`Session::connect`] runs one connection attempt. A failed
/// attempt leaves the session `Disconnected` with the reason as its
/// status message. Calling `connect` again tears the old connection down
/// and starts a fresh one with fresh protocol state; only the hooks and
/// the store carry over.
pub struct Session<H, S> {
    engine: Engine<H, S>,
    status: StatusCell,
    relay: Option<RelayProcess>,
    inbound: Option<mpsc::UnboundedReceiver<String>>,
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl<H: SessionHooks, S: SessionStore> Session<H, S> {
    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// An idle session. Nothing is started until [`connect`](Self::connect).
    pub fn new(config: &ConnectConfig, hooks: H, store: S) -> Self {
        let status = StatusCell::new();
        let (shutdown, _) = watch::channel(false);
        Self {
            engine: Engine::new(config, hooks, store, status.clone()),
            status,
            relay: None,
            inbound: None,
            shutdown,
            tasks: Vec::new(),
        }
    }

    /// Runs the connect sequence up to the point where the handshake has
    /// been sent.
    ///
    /// The server's answer arrives later and is processed by
    /// [`tick`](Self::tick). Any previous connection is torn down first.
    /// Receivers from [`watch_status`](Self::watch_status) belong to one
    /// connection; take a new one after reconnecting.
    pub async fn connect(&mut self, config: &ConnectConfig) {
        self.teardown();
        self.tasks.clear();
        self.status = StatusCell::new();
        self.shutdown = watch::channel(false).0;
        self.engine.reset(config, self.status.clone());

        if let Err(error) = self.establish(config).await {
            tracing::warn!(%error, "connection attempt failed");
            self.teardown();
            self.engine.log_system(format!("Connection failed: {error}"));
            self.status.close(error.to_string());
        }
    }

    async fn establish(&mut self, config: &ConnectConfig) -> Result<(), SessionError> {
        config.validate()?;

        match &config.relay {
            Some(relay_config) => {
                self.status.set(SessionState::StartingRelay, "Starting relay...");
                let path = locate_relay(&relay_config.search_paths)?;
                let relay = self.relay.insert(RelayProcess::spawn(
                    &path,
                    &config.server,
                    config.port,
                    config.local_port,
                )?);

                self.status
                    .set(SessionState::AwaitingRelayReady, "Waiting for relay to start...");
                tokio::time::sleep(relay_config.startup_grace).await;
                if let Some(exit) = relay.exit_status()? {
                    return Err(TransportError::RelayExited(exit.to_string()).into());
                }
            }
            None => tracing::info!(port = config.local_port, "using externally managed relay"),
        }

        self.status.set(
            SessionState::SocketConnecting,
            format!("Connecting to relay on port {}...", config.local_port),
        );
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, config.local_port));
        let connection =
            TcpLineConnection::connect(addr, config.retry.attempts, config.retry.backoff).await?;
        let (mut reader, writer) = connection.into_parts();

        let (outbox, writer_task) = writer.spawn(self.shutdown.subscribe());
        self.tasks.push(writer_task);
        self.engine.attach(outbox);

        self.status
            .set(SessionState::AwaitingGreeting, format!("Waiting for {}...", config.server));
        let Some(greeting) = reader.read_line().await? else {
            let reason = "relay closed before the server greeting".to_string();
            return Err(TransportError::ConnectionClosed(reason).into());
        };
        let seed = split_batch(&greeting)
            .first()
            .and_then(|body| parse_room_info(body).seed_name);
        tracing::info!(seed = ?seed, bytes = greeting.len(), "server greeting received");

        self.engine.send_handshake()?;

        let (tx, rx) = mpsc::unbounded_channel();
        self.inbound = Some(rx);
        self.tasks
            .push(spawn_reader(reader, tx, self.shutdown.subscribe(), self.status.clone()));
        Ok(())
    }

    /// Processes every line that arrived since the last call, then
    /// advances the timers by `dt`.
    ///
    /// Meant to be called once per game frame. Never blocks.
    pub fn tick(&mut self, dt: Duration) {
        let mut reader_gone = false;
        if let Some(inbound) = self.inbound.as_mut() {
            loop {
                match inbound.try_recv() {
                    Ok(line) => self.engine.handle_line(&line),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        reader_gone = true;
                        break;
                    }
                }
            }
        }

        if reader_gone {
            self.status.close("Connection closed");
        }
        if self.status.state().is_terminal() {
            self.teardown();
            return;
        }
        self.engine.tick_timers(dt);
    }

    /// Ends the session: stops both tasks and the relay.
    pub fn disconnect(&mut self) {
        self.teardown();
        if self.status.close("Disconnected") {
            self.engine.log_system("Disconnected");
        }
    }

    /// Disconnects, waits for the tasks to finish, and hands back the
    /// hooks and store.
    pub async fn into_parts(mut self) -> (H, S) {
        self.disconnect();
        let Self { engine, tasks, .. } = self;
        for task in tasks {
            if let Err(error) = task.await {
                tracing::warn!(%error, "session task ended abnormally");
            }
        }
        engine.into_parts()
    }

    fn teardown(&mut self) {
        self.shutdown.send_replace(true);
        self.inbound = None;
        if let Some(mut relay) = self.relay.take() {
            relay.kill();
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Reports a checked location. `Ok(false)` means it was already
    /// reported and nothing was sent.
    pub fn send_location_check(&mut self, location: LocationId) -> Result<bool, SessionError> {
        self.engine.send_location_check(location)
    }

    pub fn send_goal_complete(&mut self) -> Result<(), SessionError> {
        self.engine.send_goal_complete()
    }

    /// Broadcasts a companion failure. `Ok(false)` when the feature is
    /// off for this session.
    pub fn send_companion_failure(&mut self, cause: &str) -> Result<bool, SessionError> {
        self.engine.send_companion_failure(cause)
    }

    /// Forgets the item watermark, in memory and in the store.
    pub fn clear_received_items(&mut self) {
        self.engine.clear_received_items();
    }

    /// Forgets applied items and reported locations alike, e.g. when the
    /// player starts a new save.
    pub fn reset_progress(&mut self) {
        self.engine.reset_progress();
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn state(&self) -> SessionState {
        self.status.state()
    }

    pub fn status(&self) -> SessionStatus {
        self.status.get()
    }

    /// A receiver that observes every status change.
    pub fn watch_status(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    pub fn slot(&self) -> Option<Slot> {
        self.engine.slot()
    }

    pub fn log(&self) -> &LogRing {
        self.engine.log()
    }

    pub fn options(&self) -> SessionOptions {
        self.engine.options()
    }

    pub fn watermark(&self) -> Option<u64> {
        self.engine.watermark()
    }

    pub fn catalog_loaded(&self) -> bool {
        self.engine.catalog_loaded()
    }

    /// Name of an item in our own game.
    pub fn item_name(&self, id: ItemId) -> String {
        self.engine.item_name(id)
    }

    /// Name of a location in our own game.
    pub fn location_name(&self, id: LocationId) -> String {
        self.engine.location_name(id)
    }

    pub fn player_name(&self, slot: Slot) -> String {
        self.engine.directory().player_name(slot)
    }

    pub fn player_game(&self, slot: Slot) -> Option<&str> {
        self.engine.directory().player_game(slot)
    }

    pub fn hooks(&self) -> &H {
        self.engine.hooks()
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        self.engine.hooks_mut()
    }

    pub fn store(&self) -> &S {
        self.engine.store()
    }
}

/// Pushes raw lines onto `tx` until EOF, a read error, or shutdown.
fn spawn_reader<R>(
    mut reader: LineReader<R>,
    tx: mpsc::UnboundedSender<String>,
    mut shutdown: watch::Receiver<bool>,
    status: StatusCell,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let reason = loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break "Disconnected".to_string();
                    }
                }
                line = reader.read_line() => match line {
                    Ok(Some(line)) => {
                        if tx.send(line).is_err() {
                            break "Disconnected".to_string();
                        }
                    }
                    Ok(None) => break "Connection closed by relay".to_string(),
                    Err(error) => break format!("Connection lost: {error}"),
                },
            }
        };
        tracing::info!(%reason, "reader task stopped");
        status.close(reason);
    })
}
