//! # ribbirc
//!
//! The protocol engine of an IRC client: everything between the socket and
//! the screen.
//!
//! ## Features
//!
//! - IRC line decoding and encoding
//! - A session state machine tracking channels, members and topics
//! - RPL_ISUPPORT negotiation
//! - Buffered multi-line replies (MOTD, WHOIS, LIST, ...)
//! - Slash-command building with per-command usage checks
//! - Windowed scrollback for rendering
//! - Optional Tokio transport with TLS
//!
//! ## Quick Start
//!
//! ```rust
//! use ribbirc::{LogKind, Message, Session, SessionConfig};
//!
//! let session = Session::new(SessionConfig::new("irc.example.net", 6697, "ferris"));
//! for line in session.registration() {
//!     assert!(line.command == "NICK" || line.command == "USER");
//! }
//!
//! session.dispatch(&Message::decode(":ferris!f@host JOIN #rust"));
//! session.dispatch(&Message::decode(":alice!a@host PRIVMSG #rust :hi there"));
//!
//! let channel = session.get_channel("#rust").unwrap();
//! let last = channel.log().get_n_logs(1, 0).remove(0);
//! assert_eq!(last.kind, LogKind::PrivMsg);
//! assert_eq!(last.text, "hi there");
//!
//! let join = session.handle_command("/join #other key").unwrap();
//! assert_eq!(join.encode(), "JOIN #other key");
//! ```

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod batch;
pub mod casemap;
pub mod channel;
pub mod command;
pub mod config;
pub mod error;
pub mod isupport;
pub mod message;
pub mod response;
pub mod scrollback;
pub mod session;
#[cfg(feature = "tokio")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
pub mod transport;
pub mod util;

pub use self::batch::{BatchKind, BatchStep, Batches};
pub use self::casemap::CaseMapping;
pub use self::channel::Channel;
pub use self::command::build as build_command;
pub use self::config::SessionConfig;
pub use self::error::{CommandError, Error, MessageParseError, Result};
pub use self::isupport::ISupport;
pub use self::message::Message;
pub use self::response::Response;
pub use self::scrollback::{LogEntry, LogKind, LogStore};
pub use self::session::{ConnectionState, ServerInfo, Session};
#[cfg(feature = "tokio")]
pub use self::transport::{Client, LineCodec};
