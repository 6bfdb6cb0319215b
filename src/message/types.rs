//! The decoded message type.

/// One IRC protocol line, decoded.
///
/// `tags` is kept opaque (the raw `key=value;...` list without the `@`).
/// `command` is either a word like `PRIVMSG` or a three-digit numeric.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Message {
    /// Raw IRCv3 tags, if present.
    pub tags: Option<String>,
    /// Origin of the message: a server name or `nick!user@host`.
    pub source: Option<String>,
    /// Command word or numeric reply code. Empty for a malformed line.
    pub command: String,
    /// Parameters in order; only the last may contain spaces.
    pub parameters: Vec<String>,
}

impl Message {
    /// Build a message with no tags and no source.
    pub fn new<C, I, P>(command: C, parameters: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Message {
            tags: None,
            source: None,
            command: command.into(),
            parameters: parameters.into_iter().map(Into::into).collect(),
        }
    }

    /// `PRIVMSG <target> :<text>`
    pub fn privmsg(target: &str, text: &str) -> Self {
        Self::new("PRIVMSG", [target, text])
    }

    /// Set the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the raw tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Nick part of the source (`nick` in `nick!user@host`).
    ///
    /// Empty when there is no source or the source has no `!`, which is
    /// the case for messages originating from a server.
    pub fn source_nick(&self) -> &str {
        self.source
            .as_deref()
            .and_then(|s| s.find('!').map(|i| &s[..i]))
            .unwrap_or("")
    }

    /// Parameter at `index`, if present.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.parameters.get(index).map(String::as_str)
    }

    /// The final parameter, if any.
    pub fn last_param(&self) -> Option<&str> {
        self.parameters.last().map(String::as_str)
    }

    /// True when decoding found no command.
    pub fn is_malformed(&self) -> bool {
        self.command.is_empty()
    }

    /// The reply code when `command` is a three-digit numeric.
    pub fn numeric(&self) -> Option<u16> {
        if self.command.len() == 3 && self.command.bytes().all(|b| b.is_ascii_digit()) {
            self.command.parse().ok()
        } else {
            None
        }
    }
}

impl From<&str> for Message {
    fn from(line: &str) -> Self {
        Message::decode(line)
    }
}
