//! Client session state.
//!
//! A [`Session`] owns everything learned from one server connection: who we
//! are, which channels we are in, what the server supports and the
//! scrollback. Incoming messages go through [`Session::dispatch`]; the
//! rendering side only reads, through accessors that take the relevant
//! lock and hand back snapshots.

mod dispatch;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::batch::{BatchKind, Batches};
use crate::casemap::CaseMapping;
use crate::channel::Channel;
use crate::command;
use crate::config::SessionConfig;
use crate::isupport::ISupport;
use crate::scrollback::{LogKind, LogStore};
use crate::util::{split_text, MAX_MESSAGE_BODY};
use crate::Message;

/// Source used for log lines produced by the client itself.
pub const SYSTEM_SOURCE: &str = "System";

/// Host length assumed when reserving room for the server-added prefix.
const DEFAULT_HOSTLEN: usize = 63;

/// Where the session is in its lifetime.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectionState {
    /// Nothing sent yet.
    #[default]
    Disconnected,
    /// NICK/USER sent, awaiting RPL_WELCOME.
    Registering,
    /// RPL_WELCOME received.
    Connected,
    /// ERROR received or the transport went away.
    Terminated { reason: String },
}

/// Server identity from RPL_MYINFO.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub user_modes: String,
    pub channel_modes: String,
}

#[derive(Debug)]
struct Identity {
    nick: String,
    username: String,
    realname: String,
}

/// State of one connection to one server.
#[derive(Debug)]
pub struct Session {
    host: String,
    port: u16,
    identity: RwLock<Identity>,
    server_info: RwLock<ServerInfo>,
    /// Keyed by the case-folded channel name.
    channels: RwLock<HashMap<String, Arc<Channel>>>,
    isupport: RwLock<ISupport>,
    batches: Batches,
    log: LogStore,
    state: RwLock<ConnectionState>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Session {
            host: config.host,
            port: config.port,
            identity: RwLock::new(Identity {
                nick: config.nick,
                username: config.username,
                realname: config.realname,
            }),
            server_info: RwLock::new(ServerInfo::default()),
            channels: RwLock::new(HashMap::new()),
            isupport: RwLock::new(ISupport::default()),
            batches: Batches::new(),
            log: LogStore::new(),
            state: RwLock::new(ConnectionState::default()),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Current nickname; follows NICK changes and RPL_WELCOME.
    pub fn nick(&self) -> String {
        self.identity.read().nick.clone()
    }

    pub fn username(&self) -> String {
        self.identity.read().username.clone()
    }

    pub fn realname(&self) -> String {
        self.identity.read().realname.clone()
    }

    /// Session-level scrollback: everything not tied to a channel.
    pub fn log(&self) -> &LogStore {
        &self.log
    }

    pub fn state(&self) -> ConnectionState {
        self.state.read().clone()
    }

    pub fn server_info(&self) -> ServerInfo {
        self.server_info.read().clone()
    }

    pub fn isupport(&self) -> ISupport {
        self.isupport.read().clone()
    }

    /// Display names of joined channels, sorted.
    pub fn channel_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .channels
            .read()
            .values()
            .map(|c| c.name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Look up a joined channel, comparing names under the server's
    /// case-mapping.
    pub fn get_channel(&self, name: &str) -> Option<Arc<Channel>> {
        let key = self.fold(name);
        self.channels.read().get(&key).cloned()
    }

    /// Lines of a multi-line reply that has not finished yet.
    pub fn pending_batch_lines(&self, kind: BatchKind) -> Vec<String> {
        self.batches.pending(kind)
    }

    /// The messages that register the connection. Marks the session as
    /// registering.
    pub fn registration(&self) -> Vec<Message> {
        let identity = self.identity.read();
        let messages = vec![
            Message::new("NICK", [identity.nick.as_str()]),
            Message::new(
                "USER",
                [identity.username.as_str(), "0", "*", identity.realname.as_str()],
            ),
        ];
        drop(identity);
        *self.state.write() = ConnectionState::Registering;
        messages
    }

    /// Build the message for a slash-command line.
    ///
    /// Failures are written to the session log and yield `None`.
    pub fn handle_command(&self, input: &str) -> Option<Message> {
        match command::build(input) {
            Ok(message) => Some(message),
            Err(err) => {
                debug!(input, error = %err, "command rejected");
                self.log.append(SYSTEM_SOURCE, LogKind::Error, err.to_string());
                None
            }
        }
    }

    /// Split plain text typed for `target` into as many PRIVMSGs as needed
    /// to keep every line, as relayed by the server, under the size limit.
    pub fn compose_privmsg(&self, target: &str, text: &str) -> Vec<Message> {
        split_text(text, self.privmsg_budget(target))
            .map(|chunk| Message::privmsg(target, chunk))
            .collect()
    }

    fn privmsg_budget(&self, target: &str) -> usize {
        let hostlen = match self.isupport.read().hostlen {
            0 => DEFAULT_HOSTLEN,
            n => n,
        };
        let identity = self.identity.read();
        // ":nick!user@host " is prepended by the server when relaying.
        let prefix = identity.nick.len() + identity.username.len() + hostlen + 4;
        drop(identity);
        let fixed = "PRIVMSG ".len() + target.len() + " :".len() + "\r\n".len();
        MAX_MESSAGE_BODY.saturating_sub(prefix + fixed).max(1)
    }

    /// Record that the transport is gone.
    pub fn disconnected(&self, reason: &str) {
        self.log
            .append(SYSTEM_SOURCE, LogKind::Error, format!("Disconnected: {}", reason));
        let mut state = self.state.write();
        if !matches!(*state, ConnectionState::Terminated { .. }) {
            *state = ConnectionState::Terminated {
                reason: reason.to_string(),
            };
        }
    }

    fn case_mapping(&self) -> CaseMapping {
        self.isupport.read().case_mapping()
    }

    fn fold(&self, name: &str) -> String {
        self.case_mapping().fold(name)
    }

    fn is_own_nick(&self, nick: &str) -> bool {
        let mapping = self.case_mapping();
        mapping.equal(&self.identity.read().nick, nick)
    }

    fn set_nick(&self, nick: &str) {
        self.identity.write().nick = nick.to_string();
    }

    /// Snapshot of every joined channel, for broadcasts like QUIT.
    fn all_channels(&self) -> Vec<Arc<Channel>> {
        self.channels.read().values().cloned().collect()
    }

    fn status(&self, text: impl Into<String>) {
        self.log.append(self.host.as_str(), LogKind::Status, text);
    }
}
