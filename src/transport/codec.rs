//! Line codec for tokio.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use super::MAX_IRC_LINE_LEN;
use crate::error::{Error, Result};
use crate::Message;

/// Frames a byte stream into [`Message`]s on `\n`.
///
/// A trailing `\r` is dropped, invalid UTF-8 is replaced rather than
/// rejected and blank lines are skipped. Outgoing messages are written
/// with `\r\n`.
#[derive(Debug)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    max_len: usize,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::with_max_len(MAX_IRC_LINE_LEN)
    }

    /// Codec rejecting lines longer than `max_len` bytes, terminator included.
    pub fn with_max_len(max_len: usize) -> Self {
        LineCodec {
            next_index: 0,
            max_len,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = Message;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Message>> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                self.next_index = src.len();
                if src.len() > self.max_len {
                    return Err(Error::MessageTooLong(src.len()));
                }
                return Ok(None);
            };

            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;
            if line.len() > self.max_len {
                return Err(Error::MessageTooLong(line.len()));
            }

            let text = String::from_utf8_lossy(&line);
            let text = text.trim_end_matches(['\r', '\n']);
            if !text.is_empty() {
                return Ok(Some(Message::decode(text)));
            }
        }
    }
}

impl Encoder<Message> for LineCodec {
    type Error = Error;

    fn encode(&mut self, message: Message, dst: &mut BytesMut) -> Result<()> {
        let line = message.encode();
        dst.reserve(line.len() + 2);
        dst.put_slice(line.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_complete_lines() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"PING :a\r\n:s 001 me :hi\n"[..]);

        let first = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(first, Message::new("PING", ["a"]));
        let second = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(second.command, "001");
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_decode_partial_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"PRIVMSG #c :hel"[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"lo\r\n");
        let msg = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg.parameters, ["#c", "hello"]);
    }

    #[test]
    fn test_decode_skips_blank_lines() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"\r\n\nPING\r\n"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap().command, "PING");
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"PRIVMSG #c :caf\xe9\r\n"[..]);
        let msg = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg.parameters[1], "caf\u{fffd}");
    }

    #[test]
    fn test_decode_too_long() {
        let mut codec = LineCodec::with_max_len(16);
        let mut buf = BytesMut::from(&b"PRIVMSG #channel :this is far too long\r\n"[..]);
        assert!(matches!(codec.decode(&mut buf), Err(Error::MessageTooLong(_))));

        let mut codec = LineCodec::with_max_len(16);
        let mut buf = BytesMut::from(&b"no newline and far too long"[..]);
        assert!(matches!(codec.decode(&mut buf), Err(Error::MessageTooLong(27))));
    }

    #[test]
    fn test_encode_appends_crlf() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        codec
            .encode(Message::new("USER", ["ferris", "0", "*", "Ferris Crab"]), &mut buf)
            .unwrap();
        assert_eq!(&buf[..], b"USER ferris 0 * :Ferris Crab\r\n");
    }
}
