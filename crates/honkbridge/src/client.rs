//! The [`Client`]: one configuration, one set of hooks, any number of
//! connections over its lifetime.

use std::future::Future;
use std::time::Duration;

use honkbridge_protocol::{ItemId, LocationId, Slot};
use honkbridge_session::{
    ConnectConfig, LogRing, Session, SessionHooks, SessionOptions, SessionState, SessionStatus,
    SessionStore,
};
use honkbridge_tick::{TickConfig, TickScheduler};
use tokio::sync::watch;

use crate::HonkbridgeError;

/// A multiworld client.
///
/// Owns the hooks and the store and lends them to each connection in
/// turn. A game that has its own frame loop calls [`tick`](Self::tick)
/// from it; anything else can hand control to
/// [`run_until`](Self::run_until).
///
/// # Example
///
/// ```rust,no_run
/// use honkbridge::prelude::*;
///
/// # async fn demo() -> Result<(), HonkbridgeError> {
/// let config = ConnectConfig::new("archipelago.gg", 38281, "Goose");
/// let mut client = Client::new(config, (), MemoryStore::new());
/// client.connect().await?;
/// client.run_until(tokio::signal::ctrl_c()).await;
/// # Ok(())
/// # }
/// ```
pub struct Client<H, S> {
    config: ConnectConfig,
    tick_config: TickConfig,
    session: Session<H, S>,
}

impl<H: SessionHooks, S: SessionStore> Client<H, S> {
    pub fn new(config: ConnectConfig, hooks: H, store: S) -> Self {
        let session = Session::new(&config, hooks, store);
        Self {
            config,
            tick_config: TickConfig::default(),
            session,
        }
    }

    /// Frame rate and overrun policy used by [`run_until`](Self::run_until).
    pub fn with_tick_config(mut self, tick_config: TickConfig) -> Self {
        self.tick_config = tick_config;
        self
    }

    pub fn config(&self) -> &ConnectConfig {
        &self.config
    }

    /// Changes apply from the next [`connect`](Self::connect).
    pub fn config_mut(&mut self) -> &mut ConnectConfig {
        &mut self.config
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Tears down any current connection and starts a new one.
    ///
    /// Returns once the handshake has been sent; the server's answer is
    /// handled by later ticks.
    ///
    /// # Errors
    /// [`HonkbridgeError::ConnectFailed`] with the status message when the
    /// relay, the socket, or the greeting failed.
    pub async fn connect(&mut self) -> Result<(), HonkbridgeError> {
        tracing::info!(
            server = %self.config.server,
            port = self.config.port,
            slot = %self.config.slot_name,
            "connecting"
        );
        self.session.connect(&self.config).await;

        let status = self.session.status();
        if status.state.is_terminal() {
            return Err(HonkbridgeError::ConnectFailed(status.message));
        }
        Ok(())
    }

    pub fn disconnect(&mut self) {
        self.session.disconnect();
    }

    /// Processes pending lines and advances the session timers.
    pub fn tick(&mut self, dt: Duration) {
        self.session.tick(dt);
    }

    /// Ticks at the configured rate until `shutdown` resolves.
    ///
    /// Keeps ticking after a disconnect so late log lines and status
    /// changes are still processed; stop it with `shutdown`.
    pub async fn run_until<F: Future>(&mut self, shutdown: F) -> F::Output {
        let mut scheduler = TickScheduler::new(self.tick_config.clone());
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                output = &mut shutdown => {
                    tracing::debug!(ticks = scheduler.tick_count(), "run loop stopped");
                    return output;
                }
                info = scheduler.wait_for_tick() => {
                    self.session.tick(info.dt);
                    scheduler.record_tick_end();
                }
            }
        }
    }

    /// Disconnects and hands back the hooks and store.
    pub async fn into_parts(self) -> (H, S) {
        self.session.into_parts().await
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Reports a checked location; `Ok(false)` if it was already reported.
    pub fn send_location_check(&mut self, location: LocationId) -> Result<bool, HonkbridgeError> {
        Ok(self.session.send_location_check(location)?)
    }

    pub fn send_goal_complete(&mut self) -> Result<(), HonkbridgeError> {
        Ok(self.session.send_goal_complete()?)
    }

    /// Broadcasts a companion failure; `Ok(false)` if the feature is off.
    pub fn send_companion_failure(&mut self, cause: &str) -> Result<bool, HonkbridgeError> {
        Ok(self.session.send_companion_failure(cause)?)
    }

    pub fn clear_received_items(&mut self) {
        self.session.clear_received_items();
    }

    /// Starts fresh: every item is applied again and every location can
    /// be reported again. Works whether or not a connection is live.
    pub fn reset_progress(&mut self) {
        self.session.reset_progress();
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn session(&self) -> &Session<H, S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<H, S> {
        &mut self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    pub fn watch_status(&self) -> watch::Receiver<SessionStatus> {
        self.session.watch_status()
    }

    pub fn slot(&self) -> Option<Slot> {
        self.session.slot()
    }

    pub fn log(&self) -> &LogRing {
        self.session.log()
    }

    pub fn options(&self) -> SessionOptions {
        self.session.options()
    }

    pub fn catalog_loaded(&self) -> bool {
        self.session.catalog_loaded()
    }

    pub fn item_name(&self, id: ItemId) -> String {
        self.session.item_name(id)
    }

    pub fn location_name(&self, id: LocationId) -> String {
        self.session.location_name(id)
    }

    pub fn player_name(&self, slot: Slot) -> String {
        self.session.player_name(slot)
    }

    pub fn player_game(&self, slot: Slot) -> Option<&str> {
        self.session.player_game(slot)
    }

    pub fn hooks(&self) -> &H {
        self.session.hooks()
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        self.session.hooks_mut()
    }

    pub fn store(&self) -> &S {
        self.session.store()
    }
}
