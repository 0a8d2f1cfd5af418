//! Bencode decoder

use bytes::Bytes;

use super::BencodeError;
use super::value::{Dict, Value};

/// Maximum nesting depth accepted by the decoder. Real torrents nest a
/// handful of levels; anything deeper is treated as hostile input.
const MAX_DEPTH: usize = 64;

/// Decodes a complete bencode value from `data`.
///
/// The whole input must form exactly one value; bytes left over after the
/// top-level value are rejected. Every value this function accepts
/// re-encodes to the original input byte for byte, which is what info-hash
/// derivation relies on.
///
/// # Errors
///
/// - `BencodeError::UnexpectedEof` - Input ends inside a value
/// - `BencodeError::InvalidInteger` - Empty, non-numeric, `-0`, or
///   zero-padded integer literal
/// - `BencodeError::InvalidLength` - Non-numeric or zero-padded string
///   length prefix
/// - `BencodeError::TrailingData` - Bytes remain after the top-level value
pub fn decode(data: &[u8]) -> Result<Value, BencodeError> {
    let mut pos = 0;
    let value = decode_value(data, &mut pos, 0)?;

    if pos != data.len() {
        return Err(BencodeError::TrailingData);
    }

    Ok(value)
}

fn decode_value(data: &[u8], pos: &mut usize, depth: usize) -> Result<Value, BencodeError> {
    if depth > MAX_DEPTH {
        return Err(BencodeError::NestingTooDeep);
    }

    if *pos >= data.len() {
        return Err(BencodeError::UnexpectedEof);
    }

    match data[*pos] {
        b'i' => decode_integer(data, pos),
        b'l' => decode_list(data, pos, depth),
        b'd' => decode_dict(data, pos, depth),
        b'0'..=b'9' => Ok(Value::Bytes(decode_bytes(data, pos)?)),
        byte => Err(BencodeError::UnexpectedByte {
            byte,
            offset: *pos,
        }),
    }
}

fn decode_integer(data: &[u8], pos: &mut usize) -> Result<Value, BencodeError> {
    *pos += 1;

    let start = *pos;
    while *pos < data.len() && data[*pos] != b'e' {
        *pos += 1;
    }

    if *pos >= data.len() {
        return Err(BencodeError::UnexpectedEof);
    }

    let text = &data[start..*pos];
    let invalid = || BencodeError::InvalidInteger {
        text: String::from_utf8_lossy(text).into_owned(),
    };

    let literal = std::str::from_utf8(text).map_err(|_| invalid())?;
    if literal.is_empty() {
        return Err(invalid());
    }

    // i-0e and zero-padded forms are forbidden: accepting them would break
    // the decode-then-reencode byte identity.
    if literal.starts_with("-0") || (literal.starts_with('0') && literal.len() > 1) {
        return Err(invalid());
    }

    let value: i64 = literal.parse().map_err(|_| invalid())?;

    *pos += 1;
    Ok(Value::Integer(value))
}

fn decode_bytes(data: &[u8], pos: &mut usize) -> Result<Bytes, BencodeError> {
    let start = *pos;
    while *pos < data.len() && data[*pos] != b':' {
        *pos += 1;
    }

    if *pos >= data.len() {
        return Err(BencodeError::UnexpectedEof);
    }

    let prefix = &data[start..*pos];
    let invalid = || BencodeError::InvalidLength {
        text: String::from_utf8_lossy(prefix).into_owned(),
    };

    let len_str = std::str::from_utf8(prefix).map_err(|_| invalid())?;
    if len_str.len() > 1 && len_str.starts_with('0') {
        return Err(invalid());
    }
    let len: usize = len_str.parse().map_err(|_| invalid())?;

    *pos += 1;

    // Written to avoid overflowing on absurd declared lengths.
    if data.len() - *pos < len {
        return Err(BencodeError::UnexpectedEof);
    }

    let bytes = Bytes::copy_from_slice(&data[*pos..*pos + len]);
    *pos += len;

    Ok(bytes)
}

fn decode_list(data: &[u8], pos: &mut usize, depth: usize) -> Result<Value, BencodeError> {
    *pos += 1;
    let mut list = Vec::new();

    while *pos < data.len() && data[*pos] != b'e' {
        list.push(decode_value(data, pos, depth + 1)?);
    }

    if *pos >= data.len() {
        return Err(BencodeError::UnexpectedEof);
    }

    *pos += 1;
    Ok(Value::List(list))
}

fn decode_dict(data: &[u8], pos: &mut usize, depth: usize) -> Result<Value, BencodeError> {
    *pos += 1;
    let mut dict = Dict::new();

    while *pos < data.len() && data[*pos] != b'e' {
        if !data[*pos].is_ascii_digit() {
            return Err(BencodeError::InvalidDictKey { offset: *pos });
        }
        let key = decode_bytes(data, pos)?;
        if dict.contains_key(&key) {
            return Err(BencodeError::DuplicateKey {
                key: String::from_utf8_lossy(&key).into_owned(),
            });
        }

        let value = decode_value(data, pos, depth + 1)?;
        dict.insert(key, value);
    }

    if *pos >= data.len() {
        return Err(BencodeError::UnexpectedEof);
    }

    *pos += 1;
    Ok(Value::Dict(dict))
}
