//! Property-based tests for IRC message decoding.
//!
//! Uses proptest to generate random IRC components and verify that:
//! 1. Decoding never panics, whatever the input
//! 2. Encoded messages decode back to the same message (roundtrip)
//! 3. Session dispatch never panics on decoded input

use proptest::prelude::*;
use ribbirc::{Message, Session, SessionConfig};

// =============================================================================
// STRATEGIES - Generators for valid message components
// =============================================================================

/// A command word or a three-digit numeric.
fn command_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[A-Z]{1,10}").expect("valid regex"),
        prop::string::string_regex("[0-9]{3}").expect("valid regex"),
    ]
}

/// Server name or `nick!user@host`.
fn source_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-z]+\\.[a-z]+\\.[a-z]+").expect("valid regex"),
        prop::string::string_regex("[a-zA-Z_]{1,9}![a-z]{1,10}@[a-z0-9.]{1,30}")
            .expect("valid regex"),
    ]
}

/// Raw tag list; kept opaque by the codec, so any space-free text works.
fn tags_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9=;+/.\\-]{1,60}").expect("valid regex")
}

/// A parameter that is not last: no spaces, no leading colon.
fn middle_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^ :\r\n\0][^ \r\n\0]{0,20}").expect("valid regex")
}

/// The last parameter: free text with a space, or a bare word.
fn last_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[^\r\n\0]{0,100} [^\r\n\0]{0,100}").expect("valid regex"),
        middle_strategy(),
    ]
}

fn message_strategy() -> impl Strategy<Value = Message> {
    (
        proptest::option::of(tags_strategy()),
        proptest::option::of(source_strategy()),
        command_strategy(),
        prop::collection::vec(middle_strategy(), 0..6),
        proptest::option::of(last_strategy()),
    )
        .prop_map(|(tags, source, command, mut parameters, last)| {
            parameters.extend(last);
            Message {
                tags,
                source,
                command,
                parameters,
            }
        })
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn decode_never_panics(line in "[^\r\n]{0,600}") {
        let _ = Message::decode(&line);
        let _ = line.parse::<Message>();
    }

    #[test]
    fn encode_decode_roundtrip(message in message_strategy()) {
        let line = message.encode();
        prop_assert_eq!(Message::decode(&line), message);
    }

    #[test]
    fn encoded_line_has_no_line_breaks(message in message_strategy()) {
        let line = message.encode();
        prop_assert!(!line.contains('\r') && !line.contains('\n'));
    }

    #[test]
    fn dispatch_never_panics(line in "[^\r\n]{0,300}") {
        let session = Session::new(SessionConfig::new("irc.example.net", 6697, "ferris"));
        session.dispatch(&Message::decode(":ferris!f@h JOIN #rust"));
        session.dispatch(&Message::decode(&line));
    }

    #[test]
    fn dispatch_generated_messages_never_panics(message in message_strategy()) {
        let session = Session::new(SessionConfig::new("irc.example.net", 6697, "ferris"));
        session.dispatch(&message);
    }
}
