//! Fuzz target for the session dispatcher
//!
//! Every input line is fed to one session; dispatch must never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ribbirc::{Message, Session, SessionConfig};

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let session = Session::new(SessionConfig::new("irc.example.net", 6697, "fuzz"));
    session.dispatch(&Message::decode(":fuzz!f@h JOIN #fuzz"));
    for line in input.lines() {
        session.dispatch(&Message::decode(line));
    }
});
