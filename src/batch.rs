//! Multi-line reply buffers.
//!
//! Replies like MOTD, WHOIS or LIST arrive as a run of numerics closed by
//! an end numeric. Lines are held here until the end numeric arrives and
//! are then flushed to the session log in one go.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::response::Response;

/// Which multi-line reply a buffer collects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BatchKind {
    Motd,
    Whois,
    Who,
    Whowas,
    Stats,
    List,
    Links,
    Help,
    Info,
}

impl BatchKind {
    pub const ALL: [BatchKind; 9] = [
        BatchKind::Motd,
        BatchKind::Whois,
        BatchKind::Who,
        BatchKind::Whowas,
        BatchKind::Stats,
        BatchKind::List,
        BatchKind::Links,
        BatchKind::Help,
        BatchKind::Info,
    ];

    /// Bracketed tag used when the batch is flushed, e.g. `motd`.
    pub fn tag(self) -> &'static str {
        match self {
            BatchKind::Motd => "motd",
            BatchKind::Whois => "whois",
            BatchKind::Who => "who",
            BatchKind::Whowas => "whowas",
            BatchKind::Stats => "stats",
            BatchKind::List => "list",
            BatchKind::Links => "links",
            BatchKind::Help => "help",
            BatchKind::Info => "info",
        }
    }
}

/// Position of a numeric within its batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchStep {
    Start,
    Line,
    End,
}

/// Map a numeric to the batch it belongs to.
pub fn classify(response: Response) -> Option<(BatchKind, BatchStep)> {
    use BatchKind::*;
    use BatchStep::*;
    use Response::*;

    let entry = match response {
        RPL_MOTDSTART => (Motd, Start),
        RPL_MOTD => (Motd, Line),
        RPL_ENDOFMOTD => (Motd, End),

        RPL_WHOISCERTFP | RPL_WHOISUSER | RPL_WHOISSERVER | RPL_WHOISOPERATOR
        | RPL_WHOISIDLE | RPL_WHOISCHANNELS | RPL_WHOISACCOUNT | RPL_WHOISACTUALLY
        | RPL_WHOISHOST | RPL_WHOISMODES | RPL_WHOISSECURE => (Whois, Line),
        RPL_ENDOFWHOIS => (Whois, End),

        RPL_WHOREPLY => (Who, Line),
        RPL_ENDOFWHO => (Who, End),

        RPL_WHOWASUSER => (Whowas, Line),
        RPL_ENDOFWHOWAS => (Whowas, End),

        RPL_STATSLINKINFO | RPL_STATSCOMMANDS | RPL_STATSKLINE | RPL_STATSDLINE
        | RPL_STATSSHUN | RPL_STATSUPTIME | RPL_STATSOLINE | RPL_STATSPLINE => (Stats, Line),
        RPL_ENDOFSTATS => (Stats, End),

        RPL_LISTSTART => (List, Start),
        RPL_LIST => (List, Line),
        RPL_LISTEND => (List, End),

        RPL_LINKS => (Links, Line),
        RPL_ENDOFLINKS => (Links, End),

        RPL_HELPSTART => (Help, Start),
        RPL_HELPTXT => (Help, Line),
        RPL_ENDOFHELP => (Help, End),

        RPL_INFO => (Info, Line),
        RPL_ENDOFINFO => (Info, End),

        _ => return None,
    };
    Some(entry)
}

/// One accumulator per [`BatchKind`].
///
/// A buffer is non-empty only between its start and end numerics.
#[derive(Debug, Default)]
pub struct Batches {
    buffers: Mutex<HashMap<BatchKind, Vec<String>>>,
}

impl Batches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a batch, discarding anything left over. A non-empty `text`
    /// becomes the first line.
    pub fn start(&self, kind: BatchKind, text: &str) {
        let mut buffers = self.buffers.lock();
        let buffer = buffers.entry(kind).or_default();
        buffer.clear();
        if !text.is_empty() {
            buffer.push(text.to_string());
        }
    }

    pub fn line(&self, kind: BatchKind, text: &str) {
        self.buffers
            .lock()
            .entry(kind)
            .or_default()
            .push(text.to_string());
    }

    /// Close a batch and take its lines. Empty when nothing was collected.
    pub fn end(&self, kind: BatchKind) -> Vec<String> {
        self.buffers.lock().remove(&kind).unwrap_or_default()
    }

    /// Drop every open batch.
    pub fn clear(&self) {
        self.buffers.lock().clear();
    }

    /// Lines collected so far for `kind`.
    pub fn pending(&self, kind: BatchKind) -> Vec<String> {
        self.buffers
            .lock()
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            classify(Response::RPL_MOTDSTART),
            Some((BatchKind::Motd, BatchStep::Start))
        );
        assert_eq!(
            classify(Response::RPL_WHOISIDLE),
            Some((BatchKind::Whois, BatchStep::Line))
        );
        assert_eq!(
            classify(Response::RPL_ENDOFSTATS),
            Some((BatchKind::Stats, BatchStep::End))
        );
        assert_eq!(classify(Response::RPL_TOPIC), None);
        assert_eq!(classify(Response::RPL_AWAY), None);
    }

    #[test]
    fn test_start_line_end() {
        let batches = Batches::new();
        batches.start(BatchKind::Motd, "- irc.example.net Message of the day -");
        batches.line(BatchKind::Motd, "- hello");
        assert_eq!(batches.pending(BatchKind::Motd).len(), 2);

        let lines = batches.end(BatchKind::Motd);
        assert_eq!(lines, ["- irc.example.net Message of the day -", "- hello"]);
        assert!(batches.pending(BatchKind::Motd).is_empty());
        assert!(batches.end(BatchKind::Motd).is_empty());
    }

    #[test]
    fn test_start_discards_leftovers() {
        let batches = Batches::new();
        batches.line(BatchKind::List, "#stale 3 :old");
        batches.start(BatchKind::List, "");
        assert!(batches.pending(BatchKind::List).is_empty());
    }

    #[test]
    fn test_clear_drops_every_kind() {
        let batches = Batches::new();
        for kind in BatchKind::ALL {
            batches.line(kind, "x");
        }
        batches.clear();
        for kind in BatchKind::ALL {
            assert!(batches.pending(kind).is_empty(), "{:?}", kind);
        }
    }

    #[test]
    fn test_tags() {
        assert_eq!(BatchKind::Motd.tag(), "motd");
        assert_eq!(BatchKind::Whowas.tag(), "whowas");
    }
}
