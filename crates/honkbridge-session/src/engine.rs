//! The synchronous protocol engine.
//!
//! Everything that happens to an inbound line happens here, on whatever
//! task calls [`Engine::handle_line`]: catalog reassembly, batch
//! splitting, dispatch by command tag, registry and directory updates,
//! item delivery, the session log, and the hooks. The engine owns no
//! sockets and never awaits. Outbound commands go into an [`Outbox`],
//! which is either a live writer task or a detached channel in tests.
//!
//! ```text
//! line ─┬─ catalog in progress? ──→ CatalogAssembler
//!       └─ split_batch ─→ classify ─→ on_connected / on_received_items / ...
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use honkbridge_protocol::message::{self, PartKind, TextPart};
use honkbridge_protocol::scan::{command_tags, is_complete_message};
use honkbridge_protocol::{
    encode, split_batch, CatalogAssembler, ClientCommand, Feed, ItemId, LocationId, ServerCommand,
    Slot, COMPANION_FAILURE_TAG,
};
use honkbridge_transport::Outbox;

use crate::{
    ConnectConfig, DeliveryTracker, ItemsWaitTimer, LogCategory, LogEntry, LogRing, PlayerDirectory,
    PersistedState, ReceivedItem, Registries, ResyncTimer, SessionError, SessionHooks,
    SessionOptions, SessionState, SessionStore, StatusCell,
};

/// Everything that belongs to one connection attempt and is rebuilt by
/// [`Engine::reset`].
struct Conn {
    game: String,
    slot_name: String,
    password: Option<String>,
    companion_failure: bool,

    status: StatusCell,
    outbox: Option<Outbox>,

    slot: Option<Slot>,
    options: SessionOptions,
    registries: Registries,
    assembler: CatalogAssembler,
    directory: PlayerDirectory,
    log: LogRing,

    resync: ResyncTimer,
    items_wait: ItemsWaitTimer,
}

impl Conn {
    fn new(config: &ConnectConfig, persisted: &PersistedState, status: StatusCell) -> Self {
        Self {
            game: config.game.clone(),
            slot_name: config.slot_name.clone(),
            password: config.password.clone(),
            companion_failure: config.companion_failure,
            status,
            outbox: None,
            slot: None,
            options: persisted.options.unwrap_or_default(),
            registries: Registries::new(),
            assembler: CatalogAssembler::with_limit(config.catalog_buffer_limit),
            directory: PlayerDirectory::new(),
            log: LogRing::new(),
            resync: ResyncTimer::new(config.timers.resync_interval, config.timers.resync_attempts),
            items_wait: ItemsWaitTimer::new(config.timers.items_wait),
        }
    }
}

fn load_persisted<S: SessionStore>(store: &S) -> PersistedState {
    store.load().unwrap_or_else(|error| {
        tracing::warn!(%error, "failed to load session store, starting empty");
        PersistedState::default()
    })
}

/// Protocol state plus the caller's hooks and store.
///
/// The hooks, the store, and the delivery tracker outlive any one
/// connection: a location reported before a reconnect is not reported
/// again after it. Everything else is per connection.
pub struct Engine<H, S> {
    hooks: H,
    store: S,
    delivery: DeliveryTracker,
    conn: Conn,
}

impl<H: SessionHooks, S: SessionStore> Engine<H, S> {
    /// Creates an engine that is not yet attached to an outbox.
    ///
    /// Options and the watermark are seeded from `store` so accessors have
    /// sensible values before the handshake. A store that fails to load is
    /// treated as empty.
    pub fn new(config: &ConnectConfig, hooks: H, store: S, status: StatusCell) -> Self {
        let persisted = load_persisted(&store);
        Self {
            delivery: DeliveryTracker::with_watermark(persisted.watermark),
            conn: Conn::new(config, &persisted, status),
            hooks,
            store,
        }
    }

    /// Drops all per-connection state and starts over from `config`,
    /// keeping the hooks, the store, and the delivery tracker.
    pub fn reset(&mut self, config: &ConnectConfig, status: StatusCell) {
        let persisted = load_persisted(&self.store);
        self.delivery.restore_watermark(persisted.watermark);
        self.conn = Conn::new(config, &persisted, status);
    }

    /// Connects the engine to the writer.
    pub fn attach(&mut self, outbox: Outbox) {
        self.conn.outbox = Some(outbox);
    }

    /// Sends the handshake and moves to `HandshakeSent`.
    pub fn send_handshake(&mut self) -> Result<(), SessionError> {
        let command = ClientCommand::connect(
            &self.conn.game,
            &self.conn.slot_name,
            self.conn.password.as_deref(),
            self.conn.companion_failure,
        );
        self.send(&command)?;
        self.conn.status.set(SessionState::HandshakeSent, "Authenticating...");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Inbound
    // -----------------------------------------------------------------------

    /// Processes one raw line from the relay.
    ///
    /// A line that opens an array without closing it starts a reassembly
    /// buffer, wherever the relay happened to cut it. While a buffer is
    /// open every line is treated as a continuation, except a complete
    /// `[{`-prefixed message with its own command tag, which is
    /// dispatched on its own. Lines arriving after the session closed are
    /// dropped.
    pub fn handle_line(&mut self, line: &str) {
        tracing::trace!(bytes = line.len(), "inbound line");

        if self.conn.status.state().is_terminal() {
            tracing::debug!(bytes = line.len(), "line after disconnect dropped");
            return;
        }

        if self.conn.assembler.is_accumulating() {
            if is_standalone_message(line) {
                tracing::debug!("standalone message during catalog reassembly");
                self.dispatch_batch(line);
            } else {
                self.feed_catalog(line);
            }
            return;
        }

        let has_catalog = command_tags(line).contains(&"DataPackage");
        if has_catalog || is_partial_message(line) {
            self.feed_catalog(line);
            // Anything batched alongside a complete catalog still counts.
            if has_catalog && is_complete_message(line) {
                for body in split_batch(line) {
                    if ServerCommand::classify(body) != Some(ServerCommand::DataPackage) {
                        self.dispatch(body);
                    }
                }
            }
            return;
        }

        self.dispatch_batch(line);
    }

    fn dispatch_batch(&mut self, line: &str) {
        for body in split_batch(line) {
            self.dispatch(body);
        }
    }

    fn feed_catalog(&mut self, chunk: &str) {
        match self.conn.assembler.feed(chunk, self.conn.registries.catalog_mut()) {
            Feed::Pending => {}
            Feed::Complete(report) => {
                if report.games_failed > 0 {
                    tracing::warn!(
                        failed = report.games_failed,
                        "catalog had unreadable game sections"
                    );
                }
            }
            Feed::Reassembled(text) => self.dispatch_batch(&text),
            Feed::Overflow { discarded } => {
                self.push_log(LogEntry::new(
                    format!("Inbound message too large, discarded {discarded} bytes"),
                    LogCategory::System,
                ));
            }
        }
    }

    fn dispatch(&mut self, body: &str) {
        let Some(command) = ServerCommand::classify(body) else {
            tracing::debug!(bytes = body.len(), "message without command tag ignored");
            return;
        };
        tracing::debug!(cmd = %command, "dispatching");

        match command {
            ServerCommand::RoomInfo => {
                let info = message::parse_room_info(body);
                tracing::debug!(seed = ?info.seed_name, "room info");
            }
            ServerCommand::Connected => self.on_connected(body),
            ServerCommand::ConnectionRefused => self.on_refused(body),
            ServerCommand::ReceivedItems => self.on_received_items(body),
            // Only reached for a complete body, e.g. one batched with
            // other commands.
            ServerCommand::DataPackage => {
                let report = self
                    .conn
                    .assembler
                    .parse_complete(body, self.conn.registries.catalog_mut());
                if report.games_failed > 0 {
                    tracing::warn!(
                        failed = report.games_failed,
                        "catalog had unreadable game sections"
                    );
                }
            }
            ServerCommand::PrintJson => self.on_print_json(body),
            ServerCommand::Bounced => self.on_bounced(body),
            ServerCommand::RoomUpdate => {
                if let Some(players) = message::parse_room_update(body).players {
                    self.conn.directory.update_names(&players);
                }
            }
            ServerCommand::Other(tag) => tracing::debug!(cmd = %tag, "unhandled command ignored"),
        }
    }

    fn on_connected(&mut self, body: &str) {
        let connected = message::parse_connected(body);
        self.conn.slot = connected.slot;
        self.conn.directory.rebuild(&connected.players, &connected.slot_info);

        self.conn.options = SessionOptions::from_slot_data(connected.slot_data.as_deref());
        if let Err(error) = self.store.save_options(self.conn.options) {
            tracing::warn!(%error, "failed to persist session options");
        }

        match self.store.load() {
            Ok(persisted) => self.delivery.restore_watermark(persisted.watermark),
            Err(error) => tracing::warn!(%error, "failed to restore item watermark"),
        }

        self.conn.resync.arm();
        self.conn.items_wait.start();

        for command in [ClientCommand::GetDataPackage, ClientCommand::Sync] {
            if let Err(error) = self.send(&command) {
                tracing::warn!(cmd = command.tag(), %error, "post-handshake request failed");
            }
        }

        self.conn.status.set(SessionState::Connected, "Connected");
        tracing::info!(
            slot = ?self.conn.slot,
            players = self.conn.directory.len(),
            "handshake accepted"
        );

        let who = match self.conn.slot {
            Some(slot) => format!("Connected as {} (slot {slot})", self.conn.slot_name),
            None => format!("Connected as {}", self.conn.slot_name),
        };
        self.push_log(LogEntry::new(who, LogCategory::System));
        self.hooks.on_handshake_complete(self.conn.slot);
    }

    fn on_refused(&mut self, body: &str) {
        let refused = message::parse_connection_refused(body);
        let reason = if refused.errors.is_empty() {
            "Connection refused".to_string()
        } else {
            format!("Connection refused: {}", refused.errors.join(", "))
        };
        tracing::warn!(errors = ?refused.errors, "handshake refused");
        self.conn.resync.disarm();
        self.conn.items_wait.satisfy();
        self.push_log(LogEntry::new(reason.clone(), LogCategory::System));
        self.conn.status.close(reason);
    }

    fn on_received_items(&mut self, body: &str) {
        let delta = match message::parse_received_items(body) {
            Ok(delta) => delta,
            Err(error) => {
                tracing::warn!(%error, "item delta dropped");
                return;
            }
        };
        self.conn.items_wait.satisfy();

        let game = self.conn.game.as_str();
        let registries = &self.conn.registries;
        let directory = &self.conn.directory;
        let hooks = &mut self.hooks;
        self.delivery.apply_delta(&delta, &mut self.store, |index, item| {
            let received = ReceivedItem {
                index,
                item: item.clone(),
                item_name: registries.item_name(item.item, Some(game)),
                sender: directory.player_name(item.player),
            };
            tracing::debug!(
                index,
                item = %received.item_name,
                from = %received.sender,
                "item received"
            );
            hooks.on_item_received(&received);
        });

        self.conn.resync.arm();
    }

    fn on_print_json(&mut self, body: &str) {
        let print = message::parse_print_json(body);
        let text: String = print.parts.iter().map(|part| self.render_part(part)).collect();
        if text.is_empty() {
            return;
        }
        let category = LogCategory::from_print_type(print.kind.as_deref());
        self.push_log(LogEntry::new(text, category));
    }

    fn render_part(&self, part: &TextPart) -> String {
        let owner_game = part.player.and_then(|slot| self.conn.directory.player_game(slot));
        let numeric = || part.text.trim().parse::<i64>().ok();

        match part.kind {
            PartKind::Text => part.text.clone(),
            PartKind::PlayerId => match part.text.trim().parse::<u32>() {
                Ok(slot) => self.conn.directory.player_name(Slot(slot)),
                Err(_) => part.text.clone(),
            },
            PartKind::ItemId => match numeric() {
                Some(id) => self.conn.registries.item_name(ItemId(id), owner_game),
                None => part.text.clone(),
            },
            PartKind::LocationId => match numeric() {
                Some(id) => self.conn.registries.location_name(LocationId(id), owner_game),
                None => part.text.clone(),
            },
        }
    }

    fn on_bounced(&mut self, body: &str) {
        let bounced = message::parse_bounced(body);
        if !bounced.has_tag(COMPANION_FAILURE_TAG) {
            tracing::debug!(tags = ?bounced.tags, "bounce ignored");
            return;
        }
        if !self.conn.companion_failure {
            tracing::debug!("companion failure received but not enabled");
            return;
        }
        if bounced.source.as_deref() == Some(self.conn.slot_name.as_str()) {
            tracing::debug!("own companion failure echoed back, ignored");
            return;
        }

        let source = bounced.source.as_deref().unwrap_or("Someone");
        let text = match bounced.cause.as_deref().filter(|c| !c.is_empty()) {
            Some(cause) => format!("{source} triggered a companion failure: {cause}"),
            None => format!("{source} triggered a companion failure"),
        };
        tracing::info!(source, "companion failure received");
        self.push_log(LogEntry::new(text, LogCategory::System));
        self.hooks
            .on_companion_failure(bounced.source.as_deref(), bounced.cause.as_deref());
    }

    /// Adds a client-generated line to the log.
    pub(crate) fn log_system(&mut self, text: impl Into<String>) {
        self.push_log(LogEntry::new(text, LogCategory::System));
    }

    fn push_log(&mut self, entry: LogEntry) {
        self.conn.log.push(entry);
        if let Some(latest) = self.conn.log.latest() {
            self.hooks.on_log_entry(latest);
        }
    }

    // -----------------------------------------------------------------------
    // Timers
    // -----------------------------------------------------------------------

    /// Advances the post-handshake timers by `dt`.
    pub fn tick_timers(&mut self, dt: Duration) {
        if !self.conn.status.state().is_connected() {
            return;
        }
        if self.conn.items_wait.advance(dt) {
            tracing::warn!("no items received after handshake, forcing resync");
            self.conn.resync.arm();
        }
        if let Some(attempt) = self.conn.resync.advance(dt) {
            tracing::debug!(attempt, "resync");
            self.hooks.on_resync(attempt);
        }
    }

    // -----------------------------------------------------------------------
    // Outbound
    // -----------------------------------------------------------------------

    fn send(&self, command: &ClientCommand) -> Result<(), SessionError> {
        let outbox = self.conn.outbox.as_ref().ok_or(SessionError::NotConnected)?;
        let line = encode(command)?;
        outbox.send(line)?;
        tracing::debug!(cmd = command.tag(), "command queued");
        Ok(())
    }

    fn ensure_connected(&self) -> Result<(), SessionError> {
        if self.conn.status.state().is_connected() {
            Ok(())
        } else {
            Err(SessionError::NotConnected)
        }
    }

    /// Reports a checked location.
    ///
    /// Returns `Ok(false)` without sending anything when the location was
    /// already reported this session.
    pub fn send_location_check(&mut self, location: LocationId) -> Result<bool, SessionError> {
        self.ensure_connected()?;
        if self.delivery.is_sent(location) {
            tracing::debug!(%location, "location already reported");
            return Ok(false);
        }
        self.send(&ClientCommand::location_check(location))?;
        self.delivery.mark_sent(location);
        Ok(true)
    }

    /// Tells the server our goal is complete.
    pub fn send_goal_complete(&mut self) -> Result<(), SessionError> {
        self.ensure_connected()?;
        self.send(&ClientCommand::goal_complete())?;
        self.push_log(LogEntry::new("Goal complete!", LogCategory::Goal));
        Ok(())
    }

    /// Broadcasts a companion failure to the room.
    ///
    /// Returns `Ok(false)` when the feature was not enabled for this
    /// session; nothing is sent in that case.
    pub fn send_companion_failure(&mut self, cause: &str) -> Result<bool, SessionError> {
        self.ensure_connected()?;
        if !self.conn.companion_failure {
            return Ok(false);
        }
        let time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        self.send(&ClientCommand::companion_failure(&self.conn.slot_name, cause, time))?;
        Ok(true)
    }

    /// Forgets which items were applied so the next delta starts over.
    pub fn clear_received_items(&mut self) {
        self.delivery.clear_watermark(&mut self.store);
    }

    /// Starts over completely: forgets applied items and reported
    /// locations, so both are replayed from the server's point of view.
    pub fn reset_progress(&mut self) {
        let forgotten = self.delivery.sent_count();
        self.delivery.clear_watermark(&mut self.store);
        self.delivery.reset_sent();
        tracing::info!(forgotten, "delivery progress reset");
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn status(&self) -> &StatusCell {
        &self.conn.status
    }

    pub fn slot(&self) -> Option<Slot> {
        self.conn.slot
    }

    pub fn options(&self) -> SessionOptions {
        self.conn.options
    }

    pub fn log(&self) -> &LogRing {
        &self.conn.log
    }

    pub fn watermark(&self) -> Option<u64> {
        self.delivery.watermark()
    }

    pub fn catalog_loaded(&self) -> bool {
        self.conn.assembler.is_loaded()
    }

    pub fn registries(&self) -> &Registries {
        &self.conn.registries
    }

    pub fn directory(&self) -> &PlayerDirectory {
        &self.conn.directory
    }

    pub fn item_name(&self, id: ItemId) -> String {
        self.conn.registries.item_name(id, Some(&self.conn.game))
    }

    pub fn location_name(&self, id: LocationId) -> String {
        self.conn.registries.location_name(id, Some(&self.conn.game))
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hands back the hooks and store, e.g. for the next session.
    pub fn into_parts(self) -> (H, S) {
        (self.hooks, self.store)
    }
}

/// The head of a message the relay cut short: it opens an array but does
/// not balance.
fn is_partial_message(line: &str) -> bool {
    line.trim_start().starts_with('[') && !is_complete_message(line)
}

/// A complete message of its own: `[{` at the start, balanced, and
/// carrying a command tag.
fn is_standalone_message(line: &str) -> bool {
    line.trim_start().starts_with("[{")
        && is_complete_message(line)
        && !command_tags(line).is_empty()
}
