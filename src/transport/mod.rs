//! Tokio transport.
//!
//! [`LineCodec`] frames the byte stream; [`Client`] runs the reader and
//! writer tasks that connect a stream to a [`Session`](crate::Session).

mod client;
mod codec;

pub use self::client::Client;
pub use self::codec::LineCodec;

/// Longest line accepted from the server, tags included.
pub const MAX_IRC_LINE_LEN: usize = 8191;
