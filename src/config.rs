//! Session configuration.

/// Where to connect and who to be.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    /// Server host name; also the source of server-originated log lines.
    pub host: String,
    pub port: u16,
    /// Desired nickname.
    pub nick: String,
    /// Username (ident). Defaults to the nickname.
    pub username: String,
    /// Real name (gecos). Defaults to the nickname.
    pub realname: String,
}

impl SessionConfig {
    pub fn new(host: impl Into<String>, port: u16, nick: impl Into<String>) -> Self {
        let nick = nick.into();
        SessionConfig {
            host: host.into(),
            port,
            username: nick.clone(),
            realname: nick.clone(),
            nick,
        }
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    #[must_use]
    pub fn with_realname(mut self, realname: impl Into<String>) -> Self {
        self.realname = realname.into();
        self
    }

    /// `host:port`, as dialed.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_nick() {
        let config = SessionConfig::new("irc.libera.chat", 6697, "ferris");
        assert_eq!(config.username, "ferris");
        assert_eq!(config.realname, "ferris");
        assert_eq!(config.address(), "irc.libera.chat:6697");
    }

    #[test]
    fn test_builders() {
        let config = SessionConfig::new("localhost", 6667, "ferris")
            .with_username("crab")
            .with_realname("Ferris the Crab");
        assert_eq!(config.nick, "ferris");
        assert_eq!(config.username, "crab");
        assert_eq!(config.realname, "Ferris the Crab");
    }
}
