//! Fuzz target for IRC line decoding
//!
//! Decoding must never panic, and whatever decodes must encode to a line
//! that decodes again without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    if input.len() > 8191 {
        return;
    }

    let message = ribbirc::Message::decode(&input);
    let _ = ribbirc::Message::decode(&message.encode());
    let _ = input.parse::<ribbirc::Message>();
});
