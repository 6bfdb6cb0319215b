//! A joined channel.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::casemap::CaseMapping;
use crate::scrollback::{LogKind, LogStore};

/// Member nicks keyed by their folded form.
#[derive(Debug)]
struct Members {
    mapping: CaseMapping,
    by_key: HashMap<String, String>,
}

impl Members {
    fn insert(&mut self, nick: String) {
        self.by_key.insert(self.mapping.fold(&nick), nick);
    }

    fn remove(&mut self, nick: &str) -> bool {
        self.by_key.remove(&self.mapping.fold(nick)).is_some()
    }

    fn contains(&self, nick: &str) -> bool {
        self.by_key.contains_key(&self.mapping.fold(nick))
    }
}

/// Membership, topic and scrollback of one channel.
///
/// Readers get snapshots; only the session dispatcher mutates a channel.
/// Nicks compare under the session's case-mapping.
#[derive(Debug)]
pub struct Channel {
    name: String,
    topic: RwLock<String>,
    nicks: RwLock<Members>,
    log: LogStore,
}

impl Channel {
    pub(crate) fn new(name: impl Into<String>, mapping: CaseMapping) -> Self {
        Channel {
            name: name.into(),
            topic: RwLock::new(String::new()),
            nicks: RwLock::new(Members {
                mapping,
                by_key: HashMap::new(),
            }),
            log: LogStore::new(),
        }
    }

    /// Display name, as first seen in the JOIN.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current topic; empty when unset.
    pub fn topic(&self) -> String {
        self.topic.read().clone()
    }

    /// Members, sorted.
    pub fn nicks(&self) -> Vec<String> {
        let mut nicks: Vec<String> = self.nicks.read().by_key.values().cloned().collect();
        nicks.sort_unstable();
        nicks
    }

    pub fn nick_count(&self) -> usize {
        self.nicks.read().by_key.len()
    }

    pub fn contains(&self, nick: &str) -> bool {
        self.nicks.read().contains(nick)
    }

    /// The channel's own scrollback.
    pub fn log(&self) -> &LogStore {
        &self.log
    }

    pub(crate) fn user_join(&self, nick: &str) {
        self.nicks.write().insert(nick.to_string());
        self.log.append(nick, LogKind::Joined, "JOINED");
    }

    /// Merge a NAMES reply. Bulk joins are not logged.
    pub(crate) fn users_join<I, S>(&self, nicks: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut members = self.nicks.write();
        for nick in nicks {
            members.insert(nick.into());
        }
    }

    /// Switch to a new case-mapping, re-folding every member.
    pub(crate) fn set_case_mapping(&self, mapping: CaseMapping) {
        let mut members = self.nicks.write();
        let nicks: Vec<String> = members.by_key.drain().map(|(_, nick)| nick).collect();
        members.mapping = mapping;
        for nick in nicks {
            members.insert(nick);
        }
    }

    /// Take over the members of `other`, a channel that now names the same
    /// one. Its scrollback is not carried over.
    pub(crate) fn absorb(&self, other: &Channel) {
        let nicks: Vec<String> = other.nicks.read().by_key.values().cloned().collect();
        self.users_join(nicks);
    }

    /// Remove `nick`, logging `reason`. Returns false if it was not a member.
    pub(crate) fn user_part(&self, nick: &str, reason: &str) -> bool {
        if !self.nicks.write().remove(nick) {
            return false;
        }
        let text = if reason.is_empty() {
            "left".to_string()
        } else {
            format!("left <{}>", reason)
        };
        self.log.append(nick, LogKind::Left, text);
        true
    }

    /// Remove a kicked member. Returns false if it was not a member.
    pub(crate) fn user_kick(&self, nick: &str, by: &str, reason: &str) -> bool {
        if !self.nicks.write().remove(nick) {
            return false;
        }
        let text = format!("kicked by {} {}", by, reason);
        self.log.append(nick, LogKind::Left, text.trim_end());
        true
    }

    /// Rename a member in place. Returns false if `old` was not a member.
    pub(crate) fn user_rename(&self, old: &str, new: &str) -> bool {
        let mut nicks = self.nicks.write();
        if !nicks.remove(old) {
            return false;
        }
        nicks.insert(new.to_string());
        true
    }

    pub(crate) fn set_topic(&self, source: &str, topic: &str) {
        *self.topic.write() = topic.to_string();
        self.log.append(source, LogKind::System, topic);
    }

    pub(crate) fn clear_topic(&self) {
        self.topic.write().clear();
    }

    pub(crate) fn user_message(&self, nick: &str, text: &str) {
        self.log.append(nick, LogKind::PrivMsg, text);
    }

    pub(crate) fn system(&self, source: &str, text: impl Into<String>) {
        self.log.append(source, LogKind::System, text);
    }
}
