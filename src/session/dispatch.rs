//! Incoming message dispatch.
//!
//! [`Route::of`] picks a handler from the command word or numeric; each
//! handler is a small method on [`Session`]. Handlers never panic on bad
//! input: a missing parameter or an unknown channel comes back as a
//! [`Fault`] and is written to the session log.

use std::collections::hash_map::Entry;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, trace, warn};

use super::{ConnectionState, Session, SYSTEM_SOURCE};
use crate::batch::{self, BatchStep};
use crate::channel::Channel;
use crate::response::{is_error_code, Response};
use crate::scrollback::LogKind;
use crate::Message;

/// Handler selected for an incoming message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Route {
    Ping,
    Pong,
    Error,
    Notice,
    Join,
    Part,
    Quit,
    Nick,
    Privmsg,
    Kick,
    Topic,
    Mode,
    Invite,
    Wallops,
    Reply(Response),
    ErrorReply,
    Malformed,
    Unimplemented,
}

impl Route {
    pub(crate) fn of(message: &Message) -> Route {
        if message.is_malformed() {
            return Route::Malformed;
        }
        if let Some(code) = message.numeric() {
            if is_error_code(code) {
                return Route::ErrorReply;
            }
            return Response::from_code(code).map_or(Route::Unimplemented, Route::Reply);
        }
        match message.command.to_ascii_uppercase().as_str() {
            "PING" => Route::Ping,
            "PONG" => Route::Pong,
            "ERROR" => Route::Error,
            "NOTICE" => Route::Notice,
            "JOIN" => Route::Join,
            "PART" => Route::Part,
            "QUIT" => Route::Quit,
            "NICK" => Route::Nick,
            "PRIVMSG" => Route::Privmsg,
            "KICK" => Route::Kick,
            "TOPIC" => Route::Topic,
            "MODE" => Route::Mode,
            "INVITE" => Route::Invite,
            "WALLOPS" => Route::Wallops,
            _ => Route::Unimplemented,
        }
    }
}

/// Why a message could not be applied.
#[derive(Debug)]
enum Fault {
    /// A parameter the handler needs is absent.
    Malformed,
    UnknownChannel(String),
    Unimplemented,
}

type Handled = Result<(), Fault>;

fn arg(message: &Message, index: usize) -> Result<&str, Fault> {
    message.param(index).ok_or(Fault::Malformed)
}

/// Parameters after the target, joined by spaces.
fn after_target(message: &Message) -> Result<String, Fault> {
    match message.parameters.get(1..) {
        Some(rest) if !rest.is_empty() => Ok(rest.join(" ")),
        _ => Err(Fault::Malformed),
    }
}

/// Numerics that are logged as one line of their parameters.
fn is_informational(response: Response) -> bool {
    use Response::*;
    matches!(
        response,
        RPL_UMODEIS
            | RPL_ADMINME
            | RPL_ADMINLOC1
            | RPL_ADMINLOC2
            | RPL_ADMINEMAIL
            | RPL_AWAY
            | RPL_USERHOST
            | RPL_ISON
            | RPL_UNAWAY
            | RPL_NOWAWAY
            | RPL_CHANNELMODEIS
            | RPL_CREATIONTIME
            | RPL_INVITING
            | RPL_VERSION
            | RPL_YOUREOPER
            | RPL_REHASHING
            | RPL_TIME
            | RPL_HOSTHIDDEN
    )
}

impl Session {
    /// Apply one incoming message and return the replies to send.
    ///
    /// Messages must be dispatched one at a time in arrival order.
    pub fn dispatch(&self, message: &Message) -> Vec<Message> {
        let route = Route::of(message);
        trace!(?route, line = %message, "dispatch");

        let mut replies = Vec::new();
        let handled = match route {
            Route::Ping => {
                replies.push(Message::new("PONG", message.parameters.iter().cloned()));
                Ok(())
            }
            Route::Pong => self.on_pong(message),
            Route::Error => self.on_error(message),
            Route::Notice => self.on_notice(message),
            Route::Join => self.on_join(message),
            Route::Part => self.on_part(message),
            Route::Quit => self.on_quit(message),
            Route::Nick => self.on_nick(message),
            Route::Privmsg => self.on_privmsg(message),
            Route::Kick => self.on_kick(message),
            Route::Topic => self.on_topic(message),
            Route::Mode => self.on_mode(message),
            Route::Invite => self.on_invite(message),
            Route::Wallops => self.on_wallops(message),
            Route::Reply(response) => self.on_reply(response, message),
            Route::ErrorReply => self.on_error_reply(message),
            Route::Malformed => {
                self.log.append(
                    SYSTEM_SOURCE,
                    LogKind::Error,
                    format!("Malformed line: {}", message.encode().trim_end()),
                );
                Ok(())
            }
            Route::Unimplemented => Err(Fault::Unimplemented),
        };

        if let Err(fault) = handled {
            self.report(fault, message);
        }
        replies
    }

    fn report(&self, fault: Fault, message: &Message) {
        let text = match fault {
            Fault::Malformed => format!("Malformed {}: {}", message.command, message),
            Fault::UnknownChannel(name) => {
                warn!(channel = %name, command = %message.command, "message for unknown channel");
                format!("Unknown channel {}: {}", name, message)
            }
            Fault::Unimplemented => {
                debug!(command = %message.command, "unimplemented");
                format!("Unimplemented reply: {}", message)
            }
        };
        self.log.append(SYSTEM_SOURCE, LogKind::Error, text);
    }

    fn joined(&self, name: &str) -> Result<Arc<Channel>, Fault> {
        self.get_channel(name)
            .ok_or_else(|| Fault::UnknownChannel(name.to_string()))
    }

    /// Nick of the sender, or the server host for server messages.
    fn sender<'a>(&'a self, message: &'a Message) -> &'a str {
        match message.source_nick() {
            "" => self.host.as_str(),
            nick => nick,
        }
    }

    fn on_pong(&self, message: &Message) -> Handled {
        let sent = message.last_param().and_then(|p| p.parse::<i64>().ok());
        let elapsed = sent.and_then(|sent| Utc::now().timestamp_millis().checked_sub(sent));
        match elapsed {
            Some(elapsed) => self.status(format!("Pong received, response time {}ms", elapsed)),
            None if sent.is_some() => debug!("pong timestamp out of range"),
            None => {}
        }
        Ok(())
    }

    fn on_error(&self, message: &Message) -> Handled {
        let reason = message.last_param().unwrap_or_default().to_string();
        self.log
            .append(self.host.as_str(), LogKind::Error, reason.as_str());
        self.batches.clear();
        *self.state.write() = ConnectionState::Terminated { reason };
        Ok(())
    }

    fn on_notice(&self, message: &Message) -> Handled {
        let text = arg(message, 1)?;
        self.log.append(self.sender(message), LogKind::Status, text);
        Ok(())
    }

    fn on_join(&self, message: &Message) -> Handled {
        let name = arg(message, 0)?;
        let nick = message.source_nick();
        if self.is_own_nick(nick) {
            let mapping = self.case_mapping();
            let key = mapping.fold(name);
            let channel = Arc::clone(
                self.channels
                    .write()
                    .entry(key)
                    .or_insert_with(|| Arc::new(Channel::new(name, mapping))),
            );
            channel.user_join(nick);
            debug!(channel = name, "joined");
        } else {
            self.joined(name)?.user_join(nick);
        }
        Ok(())
    }

    fn on_part(&self, message: &Message) -> Handled {
        let name = arg(message, 0)?;
        let nick = message.source_nick();
        if self.is_own_nick(nick) {
            let key = self.fold(name);
            if self.channels.write().remove(&key).is_none() {
                return Err(Fault::UnknownChannel(name.to_string()));
            }
            debug!(channel = name, "left");
        } else {
            let reason = message.param(1).unwrap_or_default();
            self.joined(name)?.user_part(nick, reason);
        }
        Ok(())
    }

    fn on_quit(&self, message: &Message) -> Handled {
        let nick = message.source_nick();
        if self.is_own_nick(nick) {
            // The server follows up with ERROR.
            return Ok(());
        }
        let reason = message.param(0).unwrap_or_default();
        for channel in self.all_channels() {
            channel.user_part(nick, reason);
        }
        Ok(())
    }

    fn on_nick(&self, message: &Message) -> Handled {
        let new = arg(message, 0)?;
        let old = message.source_nick();
        if self.is_own_nick(old) {
            self.set_nick(new);
        }
        for channel in self.all_channels() {
            channel.user_rename(old, new);
        }
        Ok(())
    }

    fn on_privmsg(&self, message: &Message) -> Handled {
        let target = arg(message, 0)?;
        let text = arg(message, 1)?;
        let nick = message.source_nick();
        if self.is_own_nick(target) {
            self.log.append(nick, LogKind::PrivMsg, text);
        } else {
            self.joined(target)?.user_message(nick, text);
        }
        Ok(())
    }

    fn on_kick(&self, message: &Message) -> Handled {
        let name = arg(message, 0)?;
        let victim = arg(message, 1)?;
        let reason = message.param(2).unwrap_or_default();
        let by = self.sender(message);
        if self.is_own_nick(victim) {
            let key = self.fold(name);
            if self.channels.write().remove(&key).is_none() {
                return Err(Fault::UnknownChannel(name.to_string()));
            }
            let text = format!("Kicked from {} by {} {}", name, by, reason);
            self.log
                .append(self.host.as_str(), LogKind::Error, text.trim_end());
        } else {
            self.joined(name)?.user_kick(victim, by, reason);
        }
        Ok(())
    }

    fn on_topic(&self, message: &Message) -> Handled {
        let name = arg(message, 0)?;
        let topic = arg(message, 1)?;
        let channel = self.joined(name)?;
        let by = self.sender(message);
        if topic.is_empty() {
            channel.clear_topic();
            channel.system(by, "cleared the topic");
        } else {
            channel.set_topic(by, topic);
        }
        Ok(())
    }

    fn on_mode(&self, message: &Message) -> Handled {
        let target = arg(message, 0)?;
        let modes = after_target(message)?;
        let by = self.sender(message);
        let text = format!("sets mode {}", modes);
        if self.isupport.read().is_channel_name(target) {
            self.joined(target)?.system(by, text);
        } else {
            self.log.append(by, LogKind::Status, text);
        }
        Ok(())
    }

    fn on_invite(&self, message: &Message) -> Handled {
        let channel = arg(message, 1)?;
        let by = self.sender(message);
        self.log
            .append(by, LogKind::Status, format!("invited you to {}", channel));
        Ok(())
    }

    fn on_wallops(&self, message: &Message) -> Handled {
        let text = arg(message, 0)?;
        self.log.append(self.sender(message), LogKind::Status, text);
        Ok(())
    }

    fn on_error_reply(&self, message: &Message) -> Handled {
        self.batches.clear();
        let last = message.last_param().ok_or(Fault::Malformed)?;
        // Skip the target (our nick) at the front and the text at the end.
        let end = message.parameters.len().saturating_sub(1);
        let middle = message.parameters.get(1..end).unwrap_or_default();
        let text = if middle.is_empty() {
            last.to_string()
        } else {
            format!("{} ({})", last, middle.join(" "))
        };
        self.log.append(self.host.as_str(), LogKind::Error, text);
        Ok(())
    }

    fn on_reply(&self, response: Response, message: &Message) -> Handled {
        use Response::*;

        if let Some((kind, step)) = batch::classify(response) {
            match step {
                BatchStep::Start => self.batches.start(kind, &after_target(message)?),
                BatchStep::Line => self.batches.line(kind, &after_target(message)?),
                BatchStep::End => {
                    for line in self.batches.end(kind) {
                        self.status(format!("[{}] {}", kind.tag(), line));
                    }
                }
            }
            return Ok(());
        }
        if is_informational(response) {
            self.status(after_target(message)?);
            return Ok(());
        }

        match response {
            RPL_WELCOME => {
                let nick = arg(message, 0)?;
                let text = arg(message, 1)?;
                self.set_nick(nick);
                *self.state.write() = ConnectionState::Connected;
                self.status(text);
            }
            RPL_YOURHOST | RPL_CREATED | RPL_LUSERCLIENT | RPL_LUSERME => {
                self.status(arg(message, 1)?);
            }
            RPL_LOCALUSERS | RPL_GLOBALUSERS => {
                arg(message, 1)?;
                self.status(message.last_param().unwrap_or_default());
            }
            RPL_LUSEROP | RPL_LUSERUNKNOWN | RPL_LUSERCHANNELS => {
                let count = arg(message, 1)?;
                let text = arg(message, 2)?;
                self.status(format!("{} {}", count, text));
            }
            RPL_MYINFO => self.on_myinfo(message)?,
            RPL_ISUPPORT => self.on_isupport(message)?,
            RPL_NOTOPIC => self.joined(arg(message, 1)?)?.clear_topic(),
            RPL_TOPIC => {
                let channel = self.joined(arg(message, 1)?)?;
                channel.set_topic("*", arg(message, 2)?);
            }
            RPL_TOPICWHOTIME => self.on_topic_who_time(message)?,
            RPL_NAMREPLY => self.on_names(message)?,
            RPL_ENDOFNAMES => {}
            _ => return Err(Fault::Unimplemented),
        }
        Ok(())
    }

    fn on_myinfo(&self, message: &Message) -> Handled {
        let name = arg(message, 1)?;
        let version = arg(message, 2)?;
        let user_modes = arg(message, 3)?;
        let channel_modes = arg(message, 4)?;

        let mut info = self.server_info.write();
        info.name = name.to_string();
        info.version = version.to_string();
        info.user_modes = user_modes.to_string();
        info.channel_modes = channel_modes.to_string();
        Ok(())
    }

    fn on_isupport(&self, message: &Message) -> Handled {
        let params = &message.parameters;
        if params.len() < 2 {
            return Err(Fault::Malformed);
        }
        let tokens = &params[1..params.len() - 1];

        let (before, after) = {
            let mut isupport = self.isupport.write();
            let before = isupport.case_mapping();
            isupport.apply_tokens(tokens);
            (before, isupport.case_mapping())
        };
        if before != after {
            debug!(?before, ?after, "case mapping changed, re-keying channels");
            let mut merged = Vec::new();
            {
                let mut channels = self.channels.write();
                let mut all: Vec<Arc<Channel>> = channels.drain().map(|(_, c)| c).collect();
                all.sort_by(|a, b| a.name().cmp(b.name()));
                for channel in all {
                    channel.set_case_mapping(after);
                    match channels.entry(after.fold(channel.name())) {
                        Entry::Occupied(kept) => {
                            kept.get().absorb(&channel);
                            merged.push((channel.name().to_string(), kept.get().name().to_string()));
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(channel);
                        }
                    }
                }
            }
            for (dropped, kept) in merged {
                warn!(%dropped, %kept, "channels merged by case mapping");
                self.log.append(
                    SYSTEM_SOURCE,
                    LogKind::Error,
                    format!("Channel {} merged into {}; its scrollback was dropped", dropped, kept),
                );
            }
        }
        Ok(())
    }

    fn on_topic_who_time(&self, message: &Message) -> Handled {
        let channel = self.joined(arg(message, 1)?)?;
        let setter = arg(message, 2)?;
        let nick = setter.split('!').next().unwrap_or(setter);
        let set_at = arg(message, 3)?;

        let when = set_at
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| set_at.to_string());
        channel.system("*", format!("Topic set by {} on {}.", nick, when));
        Ok(())
    }

    fn on_names(&self, message: &Message) -> Handled {
        let channel = self.joined(arg(message, 2)?)?;
        let names = arg(message, 3)?;
        let prefixes = self.isupport.read().membership_prefixes().to_string();
        let nicks = names
            .split(' ')
            .map(|n| n.trim_start_matches(|c| prefixes.contains(c)))
            .filter(|n| !n.is_empty());
        channel.users_join(nicks);
        Ok(())
    }
}
