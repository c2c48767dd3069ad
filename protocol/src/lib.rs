//! Wire layer for the Pokemon Showdown battle stream.
//!
//! A server frame is an optional `>ROOMID` header followed by `|`-delimited lines.
//! [`parse_server_message`] turns one line into a [`ServerMessage`]; unknown keywords
//! come back as [`ServerMessage::Raw`] rather than as errors.

use thiserror::Error;

pub mod server;

pub use server::{
    ServerFrame, ServerMessage, parse_server_frame, parse_server_message, split_frame,
};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}
