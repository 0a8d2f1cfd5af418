//! Bencode decoding and encoding with source-order dictionaries
//!
//! Bencode is BitTorrent's serialization format: integers, byte strings,
//! lists, and dictionaries. Dictionaries here preserve the key order of the
//! source bytes instead of re-sorting, because the info hash is the SHA-1 of
//! the `info` dictionary exactly as it appeared on the wire. Everything this
//! decoder accepts re-encodes byte-identically.

mod decode;
mod encode;
mod value;

pub use decode::decode;
pub use encode::{encode, encode_into};
pub use value::{Dict, Value};

use thiserror::Error;

/// Errors produced while decoding bencode data.
///
/// All of these describe malformed input, which is an ordinary condition for
/// untrusted torrents; callers convert them into extraction failures.
#[derive(Debug, Error)]
pub enum BencodeError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("invalid integer literal: {text}")]
    InvalidInteger { text: String },

    #[error("invalid string length prefix: {text}")]
    InvalidLength { text: String },

    #[error("unexpected byte {byte:#04x} at offset {offset}")]
    UnexpectedByte { byte: u8, offset: usize },

    #[error("dictionary key is not a byte string at offset {offset}")]
    InvalidDictKey { offset: usize },

    #[error("duplicate dictionary key: {key}")]
    DuplicateKey { key: String },

    #[error("trailing data after top-level value")]
    TrailingData,

    #[error("nesting too deep")]
    NestingTooDeep,
}
