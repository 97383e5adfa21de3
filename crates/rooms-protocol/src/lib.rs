//! rooms-protocol
//!
//! Wire-level encoding/decoding for the rooms server.
//!
//! This crate is responsible for turning logical lobby messages
//! (`rooms_core::ClientRequest` / `ServerEvent`) into protocol lines
//! and back again.
//!
//! - [`json_codec`] : newline-delimited JSON (one object per line)
//! - [`wire`]       : length limits and inbound field sanitization

pub mod json_codec;
pub mod wire;

pub use json_codec::{
    decode_request, encode_event, error_event, oversized_line_event, ProtocolError,
};
pub use wire::{MAX_LINE_LEN, MAX_NAME_LEN, MAX_PIN_LEN};
