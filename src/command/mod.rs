//! Slash-command builder.
//!
//! Turns a line typed by the user, such as `/join #rust`, into the
//! [`Message`] to send. Each command has a template giving the protocol
//! command, a usage string and the number of parameters it accepts.
//! Building is pure; logging a failure is up to the caller (see
//! [`Session::handle_command`](crate::Session::handle_command)).

use chrono::Utc;

use crate::error::CommandError;
use crate::Message;

/// How many parameters a command takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    /// Between `min` and `max` single-word parameters.
    Fixed { min: usize, max: usize },
    /// At least `min` words; the `slots`-th word and everything after it
    /// are joined back into one parameter.
    Rest { min: usize, slots: usize },
    /// No user parameters; the current UNIX time in milliseconds is sent.
    Timestamp,
}

/// Definition of one slash-command.
#[derive(Clone, Copy, Debug)]
pub struct Template {
    /// What the user types, including the slash.
    pub name: &'static str,
    /// Protocol command sent.
    pub command: &'static str,
    pub usage: &'static str,
    pub arity: Arity,
}

const fn fixed(
    name: &'static str,
    command: &'static str,
    usage: &'static str,
    min: usize,
    max: usize,
) -> Template {
    Template { name, command, usage, arity: Arity::Fixed { min, max } }
}

const fn rest(
    name: &'static str,
    command: &'static str,
    usage: &'static str,
    min: usize,
    slots: usize,
) -> Template {
    Template { name, command, usage, arity: Arity::Rest { min, slots } }
}

/// Every supported command.
pub static TEMPLATES: &[Template] = &[
    Template { name: "/ping", command: "PING", usage: "/ping", arity: Arity::Timestamp },
    rest("/quit", "QUIT", "/quit [<reason>]", 0, 1),
    fixed("/nick", "NICK", "/nick <nickname>", 1, 1),
    fixed("/oper", "OPER", "/oper <name> <password>", 2, 2),
    fixed("/motd", "MOTD", "/motd [<target>]", 0, 1),
    fixed("/version", "VERSION", "/version [<target>]", 0, 1),
    fixed("/admin", "ADMIN", "/admin [<target>]", 0, 1),
    fixed("/connect", "CONNECT", "/connect <target server> [<port> [<remote server>]]", 1, 3),
    fixed("/lusers", "LUSERS", "/lusers", 0, 0),
    fixed("/time", "TIME", "/time [<server>]", 0, 1),
    fixed("/stats", "STATS", "/stats <query> [<server>]", 1, 2),
    fixed("/help", "HELP", "/help [<subject>]", 0, 1),
    fixed("/info", "INFO", "/info", 0, 0),
    fixed("/join", "JOIN", "/join <channel>{,<channel>} [<key>{,<key>}]", 1, 2),
    rest("/part", "PART", "/part <channel>{,<channel>} [<reason>]", 1, 2),
    rest("/topic", "TOPIC", "/topic <channel> [<topic>]", 1, 2),
    fixed("/names", "NAMES", "/names <channel>{,<channel>}", 1, 1),
    fixed(
        "/list",
        "LIST",
        "/list [<channel>{,<channel>}] [<elistcond>{,<elistcond>}]",
        0,
        2,
    ),
    fixed("/invite", "INVITE", "/invite <nickname> <channel>", 2, 2),
    rest("/kick", "KICK", "/kick <channel> <user> *( \",\" <user> ) [<comment>]", 2, 3),
    fixed("/who", "WHO", "/who <mask>", 1, 1),
    fixed("/whois", "WHOIS", "/whois [<target>] <nick>", 1, 2),
    fixed("/whowas", "WHOWAS", "/whowas <nick> [<count>]", 1, 2),
    rest("/kill", "KILL", "/kill <nickname> <comment>", 2, 2),
    fixed("/rehash", "REHASH", "/rehash", 0, 0),
    fixed("/restart", "RESTART", "/restart", 0, 0),
    rest("/squit", "SQUIT", "/squit <server> <comment>", 2, 2),
    rest("/away", "AWAY", "/away [<message>]", 0, 1),
    fixed("/links", "LINKS", "/links", 0, 0),
    fixed("/userhost", "USERHOST", "/userhost <nickname>{ <nickname>}", 1, 5),
    rest("/wallops", "WALLOPS", "/wallops <text>", 1, 1),
];

/// Find the template for a typed command name such as `/join`.
pub fn lookup(name: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}

impl Template {
    /// Apply this template to the words typed after the command name.
    pub fn apply(&self, args: &[&str]) -> Result<Message, CommandError> {
        let usage = CommandError::Usage { usage: self.usage };
        let parameters: Vec<String> = match self.arity {
            Arity::Timestamp => {
                if !args.is_empty() {
                    return Err(usage);
                }
                vec![Utc::now().timestamp_millis().to_string()]
            }
            Arity::Fixed { min, max } => {
                if args.len() < min || args.len() > max {
                    return Err(usage);
                }
                args.iter().map(|s| s.to_string()).collect()
            }
            Arity::Rest { min, slots } => {
                if args.len() < min {
                    return Err(usage);
                }
                let split = args.len().min(slots.saturating_sub(1));
                let (words, tail) = args.split_at(split);
                let mut parameters: Vec<String> = words.iter().map(|s| s.to_string()).collect();
                if !tail.is_empty() {
                    parameters.push(tail.join(" "));
                }
                parameters
            }
        };
        Ok(Message::new(self.command, parameters))
    }
}

/// Build the message for a slash-command line.
///
/// The line is split on spaces, ignoring runs of spaces.
pub fn build(input: &str) -> Result<Message, CommandError> {
    let mut words = input.split(' ').filter(|w| !w.is_empty());
    let name = match words.next() {
        Some(name) if name.starts_with('/') => name,
        _ => return Err(CommandError::NotACommand),
    };
    let template = lookup(name).ok_or_else(|| CommandError::Unimplemented(name.to_string()))?;
    let args: Vec<&str> = words.collect();
    template.apply(&args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(input: &str) -> Vec<String> {
        build(input).unwrap().parameters
    }

    #[test]
    fn test_join() {
        let msg = build("/join #chan key").unwrap();
        assert_eq!(msg.command, "JOIN");
        assert_eq!(msg.parameters, ["#chan", "key"]);
        assert_eq!(params("/join #chan"), ["#chan"]);
    }

    #[test]
    fn test_join_usage_errors() {
        let expected = CommandError::Usage {
            usage: "/join <channel>{,<channel>} [<key>{,<key>}]",
        };
        assert_eq!(build("/join"), Err(expected.clone()));
        assert_eq!(build("/join #a key extra"), Err(expected));
    }

    #[test]
    fn test_rest_of_line() {
        let msg = build("/part #chan bye bye").unwrap();
        assert_eq!(msg.command, "PART");
        assert_eq!(msg.parameters, ["#chan", "bye bye"]);

        assert_eq!(params("/quit"), Vec::<String>::new());
        assert_eq!(params("/quit gone for   lunch"), ["gone for lunch"]);
        assert_eq!(params("/topic #c a new topic"), ["#c", "a new topic"]);
        assert_eq!(params("/kick #c bob you know why"), ["#c", "bob", "you know why"]);
        assert_eq!(params("/kick #c bob"), ["#c", "bob"]);
        assert_eq!(params("/kill bob spam bot"), ["bob", "spam bot"]);
        assert_eq!(params("/squit hub.example.net split time"), ["hub.example.net", "split time"]);
        assert_eq!(params("/away"), Vec::<String>::new());
        assert_eq!(params("/away brb"), ["brb"]);
        assert_eq!(params("/wallops hello opers"), ["hello opers"]);
    }

    #[test]
    fn test_rest_minimums() {
        assert!(matches!(build("/part"), Err(CommandError::Usage { .. })));
        assert!(matches!(build("/kick #c"), Err(CommandError::Usage { .. })));
        assert!(matches!(build("/kill bob"), Err(CommandError::Usage { .. })));
        assert!(matches!(build("/wallops"), Err(CommandError::Usage { .. })));
    }

    #[test]
    fn test_fixed_bounds() {
        assert_eq!(params("/oper root hunter2"), ["root", "hunter2"]);
        assert!(build("/oper root").is_err());
        assert!(build("/lusers now").is_err());
        assert_eq!(params("/connect hub 6667 leaf"), ["hub", "6667", "leaf"]);
        assert!(build("/connect").is_err());
        assert!(build("/connect a b c d").is_err());
        assert_eq!(params("/list"), Vec::<String>::new());
        assert_eq!(params("/list #a,#b >10"), ["#a,#b", ">10"]);
        assert_eq!(params("/userhost a b c d e").len(), 5);
        assert!(build("/userhost a b c d e f").is_err());
        assert!(build("/userhost").is_err());
    }

    #[test]
    fn test_ping_sends_timestamp() {
        let before = Utc::now().timestamp_millis();
        let msg = build("/ping").unwrap();
        assert_eq!(msg.command, "PING");
        let stamp: i64 = msg.parameters[0].parse().unwrap();
        assert!(stamp >= before);
        assert!(build("/ping server").is_err());
    }

    #[test]
    fn test_unknown_and_not_a_command() {
        assert_eq!(
            build("/frobnicate now"),
            Err(CommandError::Unimplemented("/frobnicate".to_string()))
        );
        assert_eq!(build("hello"), Err(CommandError::NotACommand));
        assert_eq!(build(""), Err(CommandError::NotACommand));
    }

    #[test]
    fn test_extra_spaces_are_ignored() {
        assert_eq!(params("  /join   #chan   key "), ["#chan", "key"]);
    }

    #[test]
    fn test_usage_text() {
        let err = build("/nick").unwrap_err();
        assert_eq!(err.to_string(), "Invalid command format, expected '/nick <nickname>'.");
    }

    #[test]
    fn test_every_template_is_reachable() {
        for template in TEMPLATES {
            assert!(std::ptr::eq(lookup(template.name).unwrap(), template));
        }
    }
}
