//! IRC message codec.
//!
//! Converts between raw protocol lines and [`Message`].

mod parse;
mod serialize;
mod types;

pub use self::types::Message;
