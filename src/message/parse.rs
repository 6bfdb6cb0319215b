//! Line decoding.
//!
//! The head of a line (`[@tags] [:source] <command>`) is parsed with nom;
//! the parameter list is a plain split on single spaces so that every
//! separator introduces exactly one parameter.

use std::str::FromStr;

use nom::{
    bytes::complete::take_till,
    character::complete::char,
    combinator::opt,
    sequence::{preceded, terminated},
    IResult,
};

use crate::error::MessageParseError;

use super::Message;

type ParseResult<'a, O> = IResult<&'a str, O>;

fn is_space(c: char) -> bool {
    c == ' '
}

/// `@<tags>` followed by at most one space.
fn tags(input: &str) -> ParseResult<'_, &str> {
    terminated(preceded(char('@'), take_till(is_space)), opt(char(' ')))(input)
}

/// `:<source>` followed by at most one space.
fn source(input: &str) -> ParseResult<'_, &str> {
    terminated(preceded(char(':'), take_till(is_space)), opt(char(' ')))(input)
}

fn head(input: &str) -> ParseResult<'_, (Option<&str>, Option<&str>, &str)> {
    let (input, tags) = opt(tags)(input)?;
    let (input, source) = opt(source)(input)?;
    let (input, command) = take_till(is_space)(input)?;
    Ok((input, (tags, source, command)))
}

/// Split what follows the command into parameters.
///
/// The first token starting with `:` swallows the rest of the line.
fn parameters(mut rest: &str) -> Vec<String> {
    let mut params = Vec::new();
    loop {
        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing.to_string());
            break;
        }
        match rest.split_once(' ') {
            Some((param, tail)) => {
                params.push(param.to_string());
                rest = tail;
            }
            None => {
                params.push(rest.to_string());
                break;
            }
        }
    }
    params
}

impl Message {
    /// Decode one line (without its line terminator).
    ///
    /// Never fails: a line without a command decodes to a message whose
    /// `command` is empty, see [`Message::is_malformed`].
    pub fn decode(line: &str) -> Message {
        let (rest, (tags, source, command)) = match head(line) {
            Ok(parsed) => parsed,
            Err(_) => return Message::default(),
        };

        let mut message = Message {
            tags: tags.map(str::to_string),
            source: source.map(str::to_string),
            command: command.to_string(),
            parameters: Vec::new(),
        };
        if message.command.is_empty() {
            return message;
        }

        if let Some(rest) = rest.strip_prefix(' ') {
            message.parameters = parameters(rest);
        }
        message
    }
}

impl FromStr for Message {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }
        let message = Message::decode(line);
        if message.is_malformed() {
            return Err(MessageParseError::MissingCommand);
        }
        Ok(message)
    }
}
